use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("embedded document column does not match the expected shape: {0}")]
    MalformedColumn(#[from] serde_json::Error),

    #[error("counter column holds a value outside its range: {0}")]
    OutOfRange(#[from] std::num::TryFromIntError),
}
