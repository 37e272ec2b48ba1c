use crate::selector::SelectorError;
use connectors::error::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AstError {
    /// A metadata read failed; the build is abandoned as a whole.
    #[error("Metadata store error: {0}")]
    Store(#[from] StoreError),

    /// The caller cancelled while a metadata read was pending.
    #[error("AST build cancelled")]
    Cancelled,

    /// Only raised when strict selector validation is enabled.
    #[error("Invalid query: selector `{selector}`: {reason}")]
    InvalidQuery {
        selector: String,
        #[source]
        reason: SelectorError,
    },
}
