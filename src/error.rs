use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// The bucket array is at its maximum length and the overload allowance
    /// past the regular growth threshold has been used up.
    #[error("capacity exhausted: table cannot grow past {capacity} buckets")]
    CapacityExhausted { capacity: usize },
    #[error("identity key must not be a null pointer")]
    NullKey,
}

pub type Result<T> = core::result::Result<T, TableError>;
