//! Search and multi-search requests.

use serde::Serialize;
use serde_json::Value;
use std::io::Write;

use super::{header_context, write_json_line, Fireable, Method};
use crate::error::Error;
use crate::params::QueryValues;
use crate::Result;

/// A query against zero or more indices and types.
///
/// Empty `indices` means all indices, empty `types` means all types.
#[derive(Debug, Clone)]
pub struct SearchRequest<Q = Value> {
    pub indices: Vec<String>,
    pub types: Vec<String>,
    pub query: Q,
    pub params: QueryValues,
}

/// Multi-search header line; empty lists are left out.
#[derive(Serialize)]
struct SearchHeader<'a> {
    #[serde(rename = "index", skip_serializing_if = "Vec::is_empty")]
    indices: &'a Vec<String>,
    #[serde(rename = "type", skip_serializing_if = "Vec::is_empty")]
    types: &'a Vec<String>,
}

impl<Q> SearchRequest<Q> {
    pub fn new(query: Q) -> Self {
        Self {
            indices: Vec::new(),
            types: Vec::new(),
            query,
            params: QueryValues::new(),
        }
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.indices.push(index.into());
        self
    }

    pub fn with_indices<I, S>(mut self, indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indices.extend(indices.into_iter().map(Into::into));
        self
    }

    pub fn with_type(mut self, doc_type: impl Into<String>) -> Self {
        self.types.push(doc_type.into());
        self
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types.extend(types.into_iter().map(Into::into));
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.add(key, value);
        self
    }

    /// Write the multi-search header line: `{"index": [...], "type": [...]}`.
    pub fn serialize_batch_header(&self, w: &mut dyn Write) -> Result<()> {
        let header = SearchHeader {
            indices: &self.indices,
            types: &self.types,
        };
        write_json_line(w, &header, |e| {
            Error::header(e, header_context("search", self.search_path()))
        })
    }

    fn search_path(&self) -> String {
        match (self.indices.is_empty(), self.types.is_empty()) {
            (true, true) => "/_search".to_string(),
            (false, true) => format!("/{}/_search", self.indices.join(",")),
            (true, false) => format!("/_all/{}/_search", self.types.join(",")),
            (false, false) => format!(
                "/{}/{}/_search",
                self.indices.join(","),
                self.types.join(",")
            ),
        }
    }
}

impl<Q: Serialize> Fireable for SearchRequest<Q> {
    fn method(&self) -> Method {
        Method::Get
    }

    fn path(&self) -> String {
        self.search_path()
    }

    fn values(&self) -> QueryValues {
        self.params.clone()
    }

    fn serialize(&self, w: &mut dyn Write) -> Result<()> {
        write_json_line(w, &self.query, |e| {
            Error::payload(e, header_context("search", self.search_path()))
        })
    }
}

/// Several searches sent as one `/_msearch` body.
///
/// Members that fail to serialize are logged and left out; the rest of the
/// batch is still sent.
#[derive(Debug, Clone)]
pub struct MultiSearchRequest<Q = Value> {
    pub searches: Vec<SearchRequest<Q>>,
}

impl<Q> Default for MultiSearchRequest<Q> {
    fn default() -> Self {
        Self {
            searches: Vec::new(),
        }
    }
}

impl<Q> MultiSearchRequest<Q> {
    pub fn new(searches: Vec<SearchRequest<Q>>) -> Self {
        Self { searches }
    }

    pub fn push(&mut self, search: SearchRequest<Q>) {
        self.searches.push(search);
    }

    pub fn len(&self) -> usize {
        self.searches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.searches.is_empty()
    }
}

impl<Q> FromIterator<SearchRequest<Q>> for MultiSearchRequest<Q> {
    fn from_iter<I: IntoIterator<Item = SearchRequest<Q>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<Q: Serialize> Fireable for MultiSearchRequest<Q> {
    fn method(&self) -> Method {
        Method::Get
    }

    fn path(&self) -> String {
        "/_msearch".to_string()
    }

    fn values(&self) -> QueryValues {
        let mut values = QueryValues::new();
        for search in &self.searches {
            values.merge(&search.values());
        }
        values
    }

    fn serialize(&self, w: &mut dyn Write) -> Result<()> {
        let mut written = 0usize;
        let mut pair = Vec::new();
        for (position, search) in self.searches.iter().enumerate() {
            pair.clear();
            if let Err(e) = search.serialize_batch_header(&mut pair) {
                tracing::warn!(position, path = %search.path(), error = %e, "skipping multi-search header");
                continue;
            }
            if let Err(e) = search.serialize(&mut pair) {
                tracing::warn!(position, path = %search.path(), error = %e, "skipping multi-search body");
                continue;
            }
            w.write_all(&pair)?;
            written += 1;
        }

        // The body must end with a newline even when nothing was written.
        if written == 0 {
            w.write_all(b"\n")?;
        }

        tracing::debug!(
            members = self.searches.len(),
            written,
            skipped = self.searches.len() - written,
            "serialized multi-search body"
        );
        Ok(())
    }
}
