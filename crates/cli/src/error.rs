//! CLI error type.

use thiserror::Error;

use hawk_leather_storefront::error::StorefrontError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Storefront(#[from] StorefrontError),

    #[error("Failed to restore session: {0}")]
    Startup(#[source] StorefrontError),

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input closed")]
    InputClosed,
}

impl CliError {
    /// Whether the user has already seen this failure as a notice.
    pub const fn already_reported(&self) -> bool {
        matches!(self, Self::Storefront(_))
    }
}
