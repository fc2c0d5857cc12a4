use thiserror::Error;

/// Errors raised while adding a document to a [`crate::BulkOperation`].
#[derive(Debug, Error)]
pub enum BulkOpError {
    /// Adding the document would push the request past its payload ceiling.
    ///
    /// The operation is unchanged; flush it, reset it and add the same
    /// document again.
    #[error("bulk operation too large")]
    TooLarge,

    /// The document alone exceeds the payload ceiling and can never be sent.
    #[error("document {id} encodes to {size} bytes, over the {max} byte bulk limit")]
    DocumentTooLarge { id: String, size: usize, max: usize },

    /// The document could not be encoded as JSON.
    #[error("Serialization error: {0}")]
    Encode(#[from] serde_json::Error),
}
