//! Single-document write operations: index, create, update, delete.

use serde::Serialize;
use serde_json::Value;
use std::io::Write;

use super::{
    action_metadata, header_context, join_path, write_json_line, BatchFireable, Fireable, Method,
};
use crate::error::Error;
use crate::params::QueryValues;
use crate::Result;

/// Builder methods shared by every document operation.
macro_rules! document_builders {
    ($name:ident $(<$s:ident>)?) => {
        impl$(<$s>)? $name$(<$s>)? {
            pub fn with_type(mut self, doc_type: impl Into<String>) -> Self {
                self.doc_type = Some(doc_type.into());
                self
            }

            pub fn with_id(mut self, id: impl Into<String>) -> Self {
                self.id = Some(id.into());
                self
            }

            /// Append a query option; it also lands in the bulk header.
            pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
                self.params.add(key, value);
                self
            }

            pub fn with_params(mut self, params: QueryValues) -> Self {
                self.params = params;
                self
            }
        }
    };
}

/// Inserts or replaces a document by index, type, and id.
#[derive(Debug, Clone)]
pub struct IndexRequest<S = Value> {
    pub index: String,
    pub doc_type: Option<String>,
    /// Server-assigned when absent
    pub id: Option<String>,
    pub params: QueryValues,
    pub source: S,
}

impl<S> IndexRequest<S> {
    pub fn new(index: impl Into<String>, source: S) -> Self {
        Self {
            index: index.into(),
            doc_type: None,
            id: None,
            params: QueryValues::new(),
            source,
        }
    }
}

document_builders!(IndexRequest<S>);

impl<S: Serialize> Fireable for IndexRequest<S> {
    fn method(&self) -> Method {
        Method::Put
    }

    fn path(&self) -> String {
        join_path(&[
            self.index.as_str(),
            self.doc_type.as_deref().unwrap_or_default(),
            self.id.as_deref().unwrap_or_default(),
        ])
    }

    fn values(&self) -> QueryValues {
        self.params.clone()
    }

    fn serialize(&self, w: &mut dyn Write) -> Result<()> {
        write_json_line(w, &self.source, |e| {
            Error::payload(e, header_context("index", self.path()))
        })
    }
}

impl<S: Serialize> BatchFireable for IndexRequest<S> {
    fn serialize_batch_header(&self, w: &mut dyn Write) -> Result<()> {
        let header = action_metadata(
            "index",
            self.index.as_str(),
            self.doc_type.as_deref(),
            self.id.as_deref(),
            &self.params,
        );
        write_json_line(w, &header, |e| {
            Error::header(e, header_context("index", self.path()))
        })
    }
}

/// Inserts a document; the cluster rejects it if the id already exists.
#[derive(Debug, Clone)]
pub struct CreateRequest<S = Value> {
    pub index: String,
    pub doc_type: Option<String>,
    pub id: Option<String>,
    pub params: QueryValues,
    pub source: S,
}

impl<S> CreateRequest<S> {
    pub fn new(index: impl Into<String>, source: S) -> Self {
        Self {
            index: index.into(),
            doc_type: None,
            id: None,
            params: QueryValues::new(),
            source,
        }
    }
}

document_builders!(CreateRequest<S>);

impl<S: Serialize> Fireable for CreateRequest<S> {
    fn method(&self) -> Method {
        Method::Put
    }

    fn path(&self) -> String {
        join_path(&[
            self.index.as_str(),
            self.doc_type.as_deref().unwrap_or_default(),
            self.id.as_deref().unwrap_or_default(),
            "_create",
        ])
    }

    fn values(&self) -> QueryValues {
        self.params.clone()
    }

    fn serialize(&self, w: &mut dyn Write) -> Result<()> {
        write_json_line(w, &self.source, |e| {
            Error::payload(e, header_context("create", self.path()))
        })
    }
}

impl<S: Serialize> BatchFireable for CreateRequest<S> {
    fn serialize_batch_header(&self, w: &mut dyn Write) -> Result<()> {
        let header = action_metadata(
            "create",
            self.index.as_str(),
            self.doc_type.as_deref(),
            self.id.as_deref(),
            &self.params,
        );
        write_json_line(w, &header, |e| {
            Error::header(e, header_context("create", self.path()))
        })
    }
}

/// Partially updates a document by index, type, and id.
///
/// `source` is sent as-is, so callers wrap partial documents in `{"doc": ...}`
/// or provide a `script` themselves.
#[derive(Debug, Clone)]
pub struct UpdateRequest<S = Value> {
    pub index: String,
    pub doc_type: Option<String>,
    pub id: Option<String>,
    pub params: QueryValues,
    pub source: S,
}

impl<S> UpdateRequest<S> {
    pub fn new(index: impl Into<String>, source: S) -> Self {
        Self {
            index: index.into(),
            doc_type: None,
            id: None,
            params: QueryValues::new(),
            source,
        }
    }
}

document_builders!(UpdateRequest<S>);

impl<S: Serialize> Fireable for UpdateRequest<S> {
    fn method(&self) -> Method {
        Method::Post
    }

    fn path(&self) -> String {
        join_path(&[
            self.index.as_str(),
            self.doc_type.as_deref().unwrap_or_default(),
            self.id.as_deref().unwrap_or_default(),
            "_update",
        ])
    }

    fn values(&self) -> QueryValues {
        self.params.clone()
    }

    fn serialize(&self, w: &mut dyn Write) -> Result<()> {
        write_json_line(w, &self.source, |e| {
            Error::payload(e, header_context("update", self.path()))
        })
    }
}

impl<S: Serialize> BatchFireable for UpdateRequest<S> {
    fn serialize_batch_header(&self, w: &mut dyn Write) -> Result<()> {
        let header = action_metadata(
            "update",
            self.index.as_str(),
            self.doc_type.as_deref(),
            self.id.as_deref(),
            &self.params,
        );
        write_json_line(w, &header, |e| {
            Error::header(e, header_context("update", self.path()))
        })
    }
}

/// Deletes a document by index, type, and id. Carries no payload.
#[derive(Debug, Clone)]
pub struct DeleteRequest {
    pub index: String,
    pub doc_type: Option<String>,
    pub id: Option<String>,
    pub params: QueryValues,
}

impl DeleteRequest {
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            doc_type: None,
            id: None,
            params: QueryValues::new(),
        }
    }
}

document_builders!(DeleteRequest);

impl Fireable for DeleteRequest {
    fn method(&self) -> Method {
        Method::Delete
    }

    fn path(&self) -> String {
        join_path(&[
            self.index.as_str(),
            self.doc_type.as_deref().unwrap_or_default(),
            self.id.as_deref().unwrap_or_default(),
        ])
    }

    fn values(&self) -> QueryValues {
        self.params.clone()
    }

    // The bulk API expects no source line after a delete action.
    fn serialize(&self, _w: &mut dyn Write) -> Result<()> {
        Ok(())
    }
}

impl BatchFireable for DeleteRequest {
    fn serialize_batch_header(&self, w: &mut dyn Write) -> Result<()> {
        let header = action_metadata(
            "delete",
            self.index.as_str(),
            self.doc_type.as_deref(),
            self.id.as_deref(),
            &self.params,
        );
        write_json_line(w, &header, |e| {
            Error::header(e, header_context("delete", self.path()))
        })
    }
}
