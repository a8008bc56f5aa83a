//! Bulk request: index, create, update and delete operations in one body.

use std::fmt;
use std::io::Write;

use super::{BatchFireable, Fireable, Method};
use crate::params::QueryValues;
use crate::Result;

/// Boxed write operation stored in a bulk request.
pub type BulkOperation = Box<dyn BatchFireable + Send + Sync>;

/// Allows documents to be indexed, created, updated, or deleted in batches.
///
/// Bulk responses are matched to input lines by position, so the first member
/// that fails to serialize aborts the whole body. Output written before the
/// failure is left in the sink and must be discarded by the caller.
#[derive(Default)]
pub struct BulkIndexRequest {
    operations: Vec<BulkOperation>,
}

impl BulkIndexRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<T>(&mut self, operation: T)
    where
        T: BatchFireable + Send + Sync + 'static,
    {
        self.operations.push(Box::new(operation));
    }

    pub fn with<T>(mut self, operation: T) -> Self
    where
        T: BatchFireable + Send + Sync + 'static,
    {
        self.push(operation);
        self
    }

    pub fn operations(&self) -> &[BulkOperation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl From<Vec<BulkOperation>> for BulkIndexRequest {
    fn from(operations: Vec<BulkOperation>) -> Self {
        Self { operations }
    }
}

impl FromIterator<BulkOperation> for BulkIndexRequest {
    fn from_iter<I: IntoIterator<Item = BulkOperation>>(iter: I) -> Self {
        Self {
            operations: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for BulkIndexRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkIndexRequest")
            .field(
                "operations",
                &self
                    .operations
                    .iter()
                    .map(|op| format!("{} {}", op.method(), op.path()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Fireable for BulkIndexRequest {
    fn method(&self) -> Method {
        Method::Post
    }

    fn path(&self) -> String {
        "/_bulk".to_string()
    }

    /// Member options travel in the action headers, never in the query string.
    fn values(&self) -> QueryValues {
        QueryValues::new()
    }

    fn serialize(&self, w: &mut dyn Write) -> Result<()> {
        for (position, operation) in self.operations.iter().enumerate() {
            operation
                .serialize_batch_header(w)
                .map_err(|e| e.at_position(position))?;
            operation
                .serialize(w)
                .map_err(|e| e.at_position(position))?;
        }
        tracing::debug!(operations = self.operations.len(), "serialized bulk body");
        Ok(())
    }
}
