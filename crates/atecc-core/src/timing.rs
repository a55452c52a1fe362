use crate::Opcode;

/// Execution time recorded when the dispatcher rejects an opcode.
pub const UNKNOWN_OPCODE_EXECUTION_MS: u32 = 0;

/// Single source-of-truth table of typical command execution times in
/// milliseconds.
pub const EXECUTION_TIME_TABLE: &[(Opcode, u32)] = &[
    (Opcode::Random, 23),
    (Opcode::Nonce, 7),
    (Opcode::GenKey, 115),
    (Opcode::Sign, 60),
    (Opcode::Verify, 72),
    (Opcode::Read, 1),
    (Opcode::Write, 26),
    (Opcode::Lock, 32),
    (Opcode::Info, 1),
];

/// Looks up the nominal execution time for an opcode.
#[must_use]
pub fn execution_time_ms(opcode: Opcode) -> Option<u32> {
    EXECUTION_TIME_TABLE
        .iter()
        .find_map(|(entry, ms)| (*entry == opcode).then_some(*ms))
}
