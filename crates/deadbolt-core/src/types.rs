use crate::{
    Result,
    constants::{DEFAULT_PIN, ENTRY_ERROR_COOLDOWN_MILLIS, PIN_LENGTH, PIN_UPDATED_COOLDOWN_MILLIS},
    error::Error,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use subtle::ConstantTimeEq;

/// One symbol on the 12-key keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Numeric digit (0-9).
    Digit(u8),

    /// Star key (*).
    Star,

    /// Hash/pound key (#).
    Hash,
}

impl Key {
    /// Create a digit key.
    ///
    /// # Errors
    /// Returns `Error::InvalidDigit` if the digit is greater than 9.
    ///
    /// # Examples
    ///
    /// ```
    /// use deadbolt_core::Key;
    ///
    /// let key = Key::digit(5).unwrap();
    /// assert_eq!(key.as_digit(), Some(5));
    ///
    /// assert!(Key::digit(10).is_err());
    /// ```
    pub fn digit(d: u8) -> Result<Self> {
        if d > 9 {
            return Err(Error::InvalidDigit(d));
        }
        Ok(Key::Digit(d))
    }

    /// Map a layout character to a key.
    ///
    /// # Errors
    /// Returns `Error::InvalidKey` for any character outside `0-9`, `*`, `#`.
    pub fn from_char(c: char) -> Result<Self> {
        match c {
            '0'..='9' => Ok(Key::Digit(c as u8 - b'0')),
            '*' => Ok(Key::Star),
            '#' => Ok(Key::Hash),
            other => Err(Error::InvalidKey(other)),
        }
    }

    /// The layout character for this key.
    #[must_use]
    pub fn to_char(self) -> char {
        match self {
            Key::Digit(d) => (b'0' + d) as char,
            Key::Star => '*',
            Key::Hash => '#',
        }
    }

    /// Returns `true` if this key is a digit.
    #[must_use]
    pub fn is_digit(self) -> bool {
        matches!(self, Key::Digit(_))
    }

    /// Get the digit value if this is a digit key.
    #[must_use]
    pub fn as_digit(self) -> Option<u8> {
        match self {
            Key::Digit(d) => Some(d),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A detected key-press edge.
///
/// Produced by the keypad scanner on the released-to-pressed transition
/// of a key. A sustained hold produces exactly one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub key: Key,

    /// When the press edge was detected.
    pub pressed_at: DateTime<Utc>,
}

impl KeyEvent {
    /// Create a key event stamped with the current time.
    #[must_use]
    pub fn new(key: Key) -> Self {
        Self {
            key,
            pressed_at: Utc::now(),
        }
    }
}

/// Device state of the lock controller.
///
/// A single instance of this state is owned by the controller and mutated
/// only through the authentication transitions and the two timed
/// auto-advances driven by the presentation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceState {
    /// Latch closed, collecting an access code.
    Locked,

    /// Latch open; `#` relocks, `*` starts a PIN change.
    Unlocked,

    /// Wrong code entered; held for a fixed cooldown, then relocks.
    EntryError,

    /// Collecting a replacement access code.
    SettingPin,

    /// New code persisted; confirmation held for a fixed cooldown, then
    /// returns to unlocked.
    PinUpdated,
}

impl DeviceState {
    /// Whether the lock actuator is engaged (latch open) in this state.
    ///
    /// The actuator output is a pure function of state and is re-asserted
    /// on every render. The latch closes as soon as a PIN change begins
    /// and reopens only once the device returns to
    /// [`DeviceState::Unlocked`].
    ///
    /// # Examples
    ///
    /// ```
    /// use deadbolt_core::DeviceState;
    ///
    /// assert!(DeviceState::Unlocked.latch_open());
    /// assert!(!DeviceState::Locked.latch_open());
    /// assert!(!DeviceState::SettingPin.latch_open());
    /// ```
    #[must_use]
    pub fn latch_open(self) -> bool {
        matches!(self, DeviceState::Unlocked)
    }

    /// The display hold duration for this state, if it is a cooldown state.
    ///
    /// Returns `Some` for [`DeviceState::EntryError`] (3000 ms) and
    /// [`DeviceState::PinUpdated`] (2000 ms); `None` for states that
    /// render at the normal refresh rate.
    #[must_use]
    pub fn cooldown(self) -> Option<Duration> {
        match self {
            DeviceState::EntryError => Some(Duration::from_millis(ENTRY_ERROR_COOLDOWN_MILLIS)),
            DeviceState::PinUpdated => Some(Duration::from_millis(PIN_UPDATED_COOLDOWN_MILLIS)),
            _ => None,
        }
    }

    /// Returns `true` if this state ignores key input until its cooldown
    /// elapses.
    #[must_use]
    pub fn is_cooldown(self) -> bool {
        self.cooldown().is_some()
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let state_str = match self {
            DeviceState::Locked => "Locked",
            DeviceState::Unlocked => "Unlocked",
            DeviceState::EntryError => "EntryError",
            DeviceState::SettingPin => "SettingPin",
            DeviceState::PinUpdated => "PinUpdated",
        };
        write!(f, "{}", state_str)
    }
}

/// Capacity-bounded digit entry buffer.
///
/// Holds at most [`PIN_LENGTH`] digits. `push` refuses digits past
/// capacity rather than trusting callers to track the length themselves,
/// so the buffer can never overflow regardless of input rate.
///
/// # Examples
///
/// ```
/// use deadbolt_core::PinBuffer;
///
/// let mut buffer = PinBuffer::new();
/// for d in [1, 2, 3, 4, 5, 6] {
///     assert!(buffer.push(d));
/// }
/// assert!(buffer.is_full());
/// assert!(!buffer.push(7)); // rejected, not silently truncated
/// assert_eq!(buffer.as_str(), "123456");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinBuffer {
    digits: String,
}

impl PinBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            digits: String::with_capacity(PIN_LENGTH),
        }
    }

    /// Append a digit, returning whether it was stored.
    ///
    /// Returns `false` once the buffer holds [`PIN_LENGTH`] digits.
    pub fn push(&mut self, digit: u8) -> bool {
        debug_assert!(digit <= 9, "Digit must be 0-9");
        if self.is_full() {
            return false;
        }
        self.digits.push((b'0' + digit) as char);
        true
    }

    /// Remove all digits.
    pub fn clear(&mut self) {
        self.digits.clear();
    }

    /// Number of digits currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    /// Returns `true` if no digits are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Returns `true` if the buffer holds [`PIN_LENGTH`] digits.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.digits.len() == PIN_LENGTH
    }

    /// The entered digits as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.digits
    }
}

impl fmt::Display for PinBuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.digits)
    }
}

/// A validated access code: exactly [`PIN_LENGTH`] ASCII digits.
///
/// # Security
/// This type implements constant-time comparison to prevent timing
/// attacks when checking an entered code against the stored credential.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct AccessCode(String);

impl AccessCode {
    /// Create an access code from raw bytes with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidCodeLength` if `bytes` is not exactly
    /// [`PIN_LENGTH`] bytes, or `Error::InvalidCodeByte` if any byte is
    /// outside `'0'..='9'`.
    ///
    /// # Examples
    ///
    /// ```
    /// use deadbolt_core::AccessCode;
    ///
    /// let code = AccessCode::from_bytes(b"123456").unwrap();
    /// assert_eq!(code.as_str(), "123456");
    ///
    /// assert!(AccessCode::from_bytes(b"12345").is_err());
    /// assert!(AccessCode::from_bytes(b"12345A").is_err());
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PIN_LENGTH {
            return Err(Error::InvalidCodeLength {
                expected: PIN_LENGTH,
                actual: bytes.len(),
            });
        }
        if let Some(position) = bytes.iter().position(|b| !b.is_ascii_digit()) {
            return Err(Error::InvalidCodeByte { position });
        }
        // Every byte verified as an ASCII digit, so this is lossless.
        Ok(AccessCode(String::from_utf8_lossy(bytes).into_owned()))
    }

    /// The factory default code.
    #[must_use]
    pub fn factory_default() -> Self {
        AccessCode(DEFAULT_PIN.to_string())
    }

    /// The code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The code as raw bytes, as persisted by the credential store.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Compare an entered digit sequence against this code in constant
    /// time.
    ///
    /// A candidate of the wrong length never matches.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        candidate.len() == self.0.len()
            && bool::from(candidate.as_bytes().ct_eq(self.0.as_bytes()))
    }
}

impl fmt::Display for AccessCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AccessCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AccessCode::from_bytes(s.as_bytes())
    }
}

/// Constant-time comparison implementation for AccessCode
///
/// This prevents timing attacks by ensuring comparison takes the same
/// time regardless of where the codes differ.
impl PartialEq for AccessCode {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl std::hash::Hash for AccessCode {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
