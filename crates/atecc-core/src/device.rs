//! The simulated chip: owns every piece of state and exposes the host
//! operations.

use tracing::{debug, trace};

use crate::diag::bump;
use crate::{
    crc16_le_bytes, dispatch, encode_command, time_seed, validate_key_id, validate_lock,
    CryptoEngine, DeviceConfig, DeviceState, Diagnostics, DispatchOutcome, ErrorCode, FeedOutcome,
    InboundFramer, ResponseBuffer, ResponseFraming, Zone, ZonedMemory, CRC_BYTES, KEY_SLOT_BYTES,
    MAX_PACKET_BYTES, SIGNATURE_BYTES,
};

/// Status byte of a successful response.
pub const STATUS_SUCCESS: u8 = 0x00;

/// One simulated secure element.
///
/// Every operation runs to completion on the caller's thread. Failures leave
/// memory untouched and latch their code into [`Device::last_error`], which
/// stays set until a later failure overwrites it.
#[derive(Debug, Clone)]
pub struct Device {
    config: DeviceConfig,
    state: DeviceState,
    last_error: u8,
    execution_time_ms: u32,
    memory: ZonedMemory,
    inbound: InboundFramer,
    response: ResponseBuffer,
    crypto: CryptoEngine,
    temp_key: Option<[u8; KEY_SLOT_BYTES]>,
    diagnostics: Diagnostics,
}

impl Default for Device {
    fn default() -> Self {
        Self::new(DeviceConfig::default())
    }
}

impl Device {
    /// Creates an initialized device.
    #[must_use]
    pub fn new(config: DeviceConfig) -> Self {
        let mut device = Self {
            config,
            state: DeviceState::Idle,
            last_error: 0,
            execution_time_ms: 0,
            memory: ZonedMemory::new(),
            inbound: InboundFramer::default(),
            response: ResponseBuffer::default(),
            crypto: CryptoEngine::new(0),
            temp_key: None,
            diagnostics: Diagnostics::default(),
        };
        device.init();
        device
    }

    /// Restores power-on state: idle, no error, empty buffers, factory
    /// memory, reseeded RNG.
    pub fn init(&mut self) {
        let seed = self.config.rng_seed.unwrap_or_else(time_seed);
        self.state = DeviceState::Idle;
        self.last_error = 0;
        self.execution_time_ms = 0;
        self.memory.reset_factory();
        self.inbound.clear();
        self.response.clear();
        self.crypto.reseed(seed);
        self.temp_key = None;
        self.diagnostics.reset();
        debug!(seed, "device initialized");
    }

    /// Same as [`Device::init`].
    pub fn reset(&mut self) {
        self.init();
    }

    /// Delivers one inbound bus byte, dispatching synchronously when it
    /// completes a frame.
    pub fn feed_byte(&mut self, byte: u8) {
        match self.inbound.feed(byte) {
            FeedOutcome::FrameStarted => bump(&mut self.diagnostics.frames_started),
            FeedOutcome::ControlWord(word) => {
                bump(&mut self.diagnostics.control_words);
                self.state = self.state.on_word_address(word);
                debug!(?word, state = ?self.state, "control word address");
            }
            FeedOutcome::Ignored => {
                bump(&mut self.diagnostics.stray_bytes);
                trace!(byte, "ignored byte outside frame");
            }
            FeedOutcome::Buffered => {}
            FeedOutcome::Dropped => {
                bump(&mut self.diagnostics.bytes_dropped);
                trace!(byte, "inbound buffer full, byte dropped");
            }
            FeedOutcome::FrameComplete => {
                let mut frame = [0; MAX_PACKET_BYTES];
                let len = self.inbound.len();
                frame[..len].copy_from_slice(self.inbound.frame());
                dispatch::execute_frame(self, &frame[..len]);
                self.inbound.finish_frame();
            }
        }
    }

    /// Returns the next response byte, or `0` past the end of the buffer.
    pub fn take_byte(&mut self) -> u8 {
        self.response.take_byte()
    }

    /// Builds a stamped frame and dispatches it directly, bypassing the
    /// transport.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::LengthError`] when the payload cannot fit in a
    /// frame; nothing is dispatched in that case.
    pub fn execute_command(
        &mut self,
        opcode: u8,
        param1: u8,
        param2: u16,
        payload: &[u8],
    ) -> Result<DispatchOutcome, ErrorCode> {
        let wire = encode_command(opcode, param1, param2, payload)?;
        Ok(dispatch::execute_frame(self, &wire[1..]))
    }

    /// Configuration this device was built with.
    #[must_use]
    pub const fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Current operating state.
    #[must_use]
    pub const fn state(&self) -> DeviceState {
        self.state
    }

    /// Raw latched error code; `0` when nothing has failed since reset.
    #[must_use]
    pub const fn last_error(&self) -> u8 {
        self.last_error
    }

    /// Latched error as a typed code.
    #[must_use]
    pub const fn last_error_code(&self) -> Option<ErrorCode> {
        ErrorCode::from_u8(self.last_error)
    }

    /// Nominal duration of the last dispatched command.
    #[must_use]
    pub const fn execution_time_ms(&self) -> u32 {
        self.execution_time_ms
    }

    /// Zoned memory contents.
    #[must_use]
    pub const fn memory(&self) -> &ZonedMemory {
        &self.memory
    }

    /// Diagnostic counters.
    #[must_use]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Response buffer contents and read cursor.
    #[must_use]
    pub const fn response(&self) -> &ResponseBuffer {
        &self.response
    }

    /// Inbound framer state.
    #[must_use]
    pub const fn inbound(&self) -> &InboundFramer {
        &self.inbound
    }

    /// TempKey register loaded by `Nonce`.
    #[must_use]
    pub const fn temp_key(&self) -> Option<&[u8; KEY_SLOT_BYTES]> {
        self.temp_key.as_ref()
    }

    /// Seed of the current random stream.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.crypto.seed()
    }

    /// Reads `len` bytes from a zone.
    ///
    /// # Errors
    ///
    /// See [`crate::validate_transfer`].
    pub fn read_zone(&mut self, zone: u8, address: u16, len: usize) -> Result<Vec<u8>, ErrorCode> {
        let result = self.memory.read(zone, address, len);
        self.latch(result)
    }

    /// Writes `data` into a zone, honoring the configured lock policy.
    ///
    /// # Errors
    ///
    /// See [`crate::validate_transfer`]; additionally
    /// [`ErrorCode::ZoneLocked`] under an enforced lock policy.
    pub fn write_zone(&mut self, zone: u8, address: u16, data: &[u8]) -> Result<(), ErrorCode> {
        let result = self.checked_write(zone, address, data);
        self.latch(result)
    }

    fn checked_write(&mut self, zone: u8, address: u16, data: &[u8]) -> Result<(), ErrorCode> {
        let (target, _) = crate::validate_transfer(zone, address, data.len())?;
        validate_lock(self.memory.is_zone_locked(target), self.config.lock_policy)?;
        self.memory.write(zone, address, data)
    }

    /// Locks the config zone. Always succeeds.
    pub fn lock_config_zone(&mut self) {
        self.memory.lock_config_zone();
        debug!("config zone locked");
    }

    /// Locks the OTP and data zones. Always succeeds.
    pub fn lock_data_and_otp_zones(&mut self) {
        self.memory.lock_data_and_otp_zones();
        debug!("data and otp zones locked");
    }

    /// Returns `true` once the config zone is locked.
    #[must_use]
    pub fn is_config_locked(&self) -> bool {
        self.memory.is_config_locked()
    }

    /// Returns `true` once the OTP and data zones are locked.
    #[must_use]
    pub fn is_data_and_otp_locked(&self) -> bool {
        self.memory.is_data_and_otp_locked()
    }

    /// Stores a key into slot `key_id`.
    ///
    /// # Errors
    ///
    /// [`ErrorCode::KeyIdError`] for ids of 16 and above, plus any
    /// [`Device::write_zone`] failure.
    pub fn store_key(
        &mut self,
        key_id: u8,
        key: &[u8; KEY_SLOT_BYTES],
        key_type: u8,
    ) -> Result<(), ErrorCode> {
        let result = validate_key_id(key_id)
            .and_then(|()| {
                validate_lock(
                    self.memory.is_zone_locked(Zone::Data),
                    self.config.lock_policy,
                )
            })
            .and_then(|()| self.memory.store_key(key_id, key, key_type));
        self.latch(result)
    }

    /// Generates a random private key into slot `key_id`.
    ///
    /// # Errors
    ///
    /// Same as [`Device::store_key`].
    pub fn generate_private_key(&mut self, key_id: u8, key_type: u8) -> Result<(), ErrorCode> {
        let mut key = [0; KEY_SLOT_BYTES];
        self.crypto.fill_random(&mut key);
        self.store_key(key_id, &key, key_type)
    }

    /// Mixes the key at `key_id` with `message`.
    ///
    /// # Errors
    ///
    /// [`ErrorCode::BoundsError`] when the key window passes the data zone.
    pub fn compute_hmac(
        &mut self,
        key_id: u8,
        message: &[u8],
    ) -> Result<[u8; KEY_SLOT_BYTES], ErrorCode> {
        let result = self.memory.compute_hmac(key_id, message);
        self.latch(result)
    }

    /// Derives a child of the key at `parent_key_id`.
    ///
    /// # Errors
    ///
    /// [`ErrorCode::BoundsError`] when the key window passes the data zone.
    pub fn derive_key(&mut self, parent_key_id: u8) -> Result<[u8; KEY_SLOT_BYTES], ErrorCode> {
        let result = self.memory.derive_key(parent_key_id);
        self.latch(result)
    }

    /// Draws `len` bytes from the device RNG.
    #[must_use]
    pub fn random_bytes(&mut self, len: usize) -> Vec<u8> {
        self.crypto.random_bytes(len)
    }

    /// Stub-signs a 32-byte message.
    #[must_use]
    pub fn sign(&mut self, message: &[u8; KEY_SLOT_BYTES]) -> [u8; SIGNATURE_BYTES] {
        self.crypto.sign(message)
    }

    /// Stub verification; always `true`.
    #[must_use]
    pub const fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        self.crypto.verify(message, signature)
    }

    pub(crate) fn set_execution_time(&mut self, ms: u32) {
        self.execution_time_ms = ms;
    }

    pub(crate) fn set_temp_key(&mut self, key: [u8; KEY_SLOT_BYTES]) {
        self.temp_key = Some(key);
    }

    pub(crate) fn fill_random(&mut self, out: &mut [u8]) {
        self.crypto.fill_random(out);
    }

    pub(crate) fn note_frame_dispatched(&mut self) {
        bump(&mut self.diagnostics.frames_dispatched);
    }

    pub(crate) fn note_frame_rejected(&mut self) {
        bump(&mut self.diagnostics.frames_rejected);
    }

    pub(crate) fn record_error(&mut self, code: ErrorCode) {
        self.last_error = code.as_u8();
        self.diagnostics.record_error(code);
    }

    /// Latches `code` and returns it as an error.
    pub(crate) fn fail<T>(&mut self, code: ErrorCode) -> Result<T, ErrorCode> {
        self.record_error(code);
        Err(code)
    }

    fn latch<T>(&mut self, result: Result<T, ErrorCode>) -> Result<T, ErrorCode> {
        if let Err(code) = result {
            self.record_error(code);
        }
        result
    }

    /// Loads a successful response in the configured framing.
    pub(crate) fn respond(&mut self, payload: &[u8]) {
        match self.config.response_framing {
            ResponseFraming::Bare => {
                let mut packet = Vec::with_capacity(payload.len() + 1);
                packet.push(STATUS_SUCCESS);
                packet.extend_from_slice(payload);
                self.response.load(&packet);
            }
            ResponseFraming::Counted => {
                let body: &[u8] = if payload.is_empty() {
                    &[STATUS_SUCCESS]
                } else {
                    payload
                };
                let count = u8::try_from(body.len() + 1 + CRC_BYTES).unwrap_or(u8::MAX);
                let mut packet = Vec::with_capacity(usize::from(count));
                packet.push(count);
                packet.extend_from_slice(body);
                let stamp = crc16_le_bytes(&packet);
                packet.extend_from_slice(&stamp);
                self.response.load(&packet);
            }
        }
    }
}
