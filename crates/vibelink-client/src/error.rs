use thiserror::Error;

use vibelink_shared::error::ApiError;
use vibelink_store::StoreError;

/// Errors raised while assembling a [`crate::Client`].
///
/// Once the client is running, every operation reports [`ApiError`] instead.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Api(#[from] ApiError),
}
