use thiserror::Error;

pub type PvResult<T> = Result<T, PvError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PvError {
    #[error("Unknown property symbol: {symbol}")]
    UnknownProperty { symbol: String },

    #[error("Invalid id: '{text}'")]
    InvalidId { text: String },

    #[error("Id space exhausted for {what}")]
    IdExhausted { what: &'static str },
}
