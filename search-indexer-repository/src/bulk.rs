//! Size-bounded bulk request bodies.
//!
//! A [`BulkOperation`] accumulates newline-delimited action/document pairs
//! for one target index:
//!
//! ```text
//! {"index":{"_id":"12"}}
//! {"id":12,...}
//! ```
//!
//! Each pair is encoded into a scratch buffer first and only committed when
//! the whole pair fits under the payload ceiling, so a rejected add leaves
//! the committed body untouched and ready to flush.

use serde::Serialize;

use crate::errors::BulkOpError;

/// Maximum size of a single bulk request body (10 MiB).
pub const MAX_PAYLOAD_SIZE: usize = 10 * 1024 * 1024;

#[derive(Serialize)]
struct ActionLine<'a> {
    index: ActionTarget<'a>,
}

#[derive(Serialize)]
struct ActionTarget<'a> {
    #[serde(rename = "_id")]
    id: &'a str,
}

/// One bulk request body under construction.
#[derive(Debug, Clone)]
pub struct BulkOperation {
    index: String,
    buf: Vec<u8>,
    scratch: Vec<u8>,
    documents: usize,
    max_payload_size: usize,
}

impl BulkOperation {
    /// Create an empty operation targeting `index` with the default ceiling.
    pub fn new(index: impl Into<String>) -> Self {
        Self::with_max_payload_size(index, MAX_PAYLOAD_SIZE)
    }

    /// Create an empty operation with a custom payload ceiling.
    pub fn with_max_payload_size(index: impl Into<String>, max_payload_size: usize) -> Self {
        Self {
            index: index.into(),
            buf: Vec::new(),
            scratch: Vec::new(),
            documents: 0,
            max_payload_size,
        }
    }

    /// Append an index action for `document` under `id`.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The pair was committed
    /// * `Err(BulkOpError::TooLarge)` - The pair does not fit; the committed
    ///   body is unchanged
    /// * `Err(BulkOpError::DocumentTooLarge)` - The pair does not fit even in
    ///   an empty operation
    /// * `Err(BulkOpError::Encode)` - The document could not be encoded
    pub fn index<T>(&mut self, id: &str, document: &T) -> Result<(), BulkOpError>
    where
        T: Serialize + ?Sized,
    {
        self.scratch.clear();

        let encoded = self.encode_pair(id, document);
        if let Err(e) = encoded {
            self.scratch.clear();
            return Err(e);
        }

        if self.buf.len() + self.scratch.len() > self.max_payload_size {
            let size = self.scratch.len();
            self.scratch.clear();

            if self.buf.is_empty() {
                return Err(BulkOpError::DocumentTooLarge {
                    id: id.to_string(),
                    size,
                    max: self.max_payload_size,
                });
            }
            return Err(BulkOpError::TooLarge);
        }

        self.buf.extend_from_slice(&self.scratch);
        self.scratch.clear();
        self.documents += 1;
        Ok(())
    }

    fn encode_pair<T>(&mut self, id: &str, document: &T) -> Result<(), BulkOpError>
    where
        T: Serialize + ?Sized,
    {
        serde_json::to_writer(
            &mut self.scratch,
            &ActionLine {
                index: ActionTarget { id },
            },
        )?;
        self.scratch.push(b'\n');
        serde_json::to_writer(&mut self.scratch, document)?;
        self.scratch.push(b'\n');
        Ok(())
    }

    /// Whether nothing has been committed yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Drop every committed pair, keeping the target index.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.scratch.clear();
        self.documents = 0;
    }

    /// The index this operation writes to.
    pub fn index_name(&self) -> &str {
        &self.index
    }

    /// The committed request body.
    pub fn body(&self) -> &[u8] {
        &self.buf
    }

    /// Size of the committed body in bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Number of committed documents.
    pub fn document_count(&self) -> usize {
        self.documents
    }
}

/// Outcome of sending one bulk request.
///
/// Only the first failed item's error is kept, formatted `type: reason`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkResult {
    pub successful: usize,
    pub failed: usize,
    pub error: Option<String>,
}
