use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Input errors
    #[error("Not a keypad symbol: {0:?}")]
    InvalidKey(char),

    #[error("Digit must be 0-9, got {0}")]
    InvalidDigit(u8),

    // Access code errors
    #[error("Access code must be {expected} digits, got {actual}")]
    InvalidCodeLength { expected: usize, actual: usize },

    #[error("Access code contains a non-digit byte at position {position}")]
    InvalidCodeByte { position: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
