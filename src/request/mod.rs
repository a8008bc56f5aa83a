//! Request values that know how to render themselves for the search cluster
//!
//! Every request type implements [`Fireable`]: it reports an HTTP method, a path,
//! query values, and writes its body into a caller-supplied sink. Write
//! operations additionally implement [`BatchFireable`] so they can be combined
//! into a bulk body.
//!
//! | Type | Method | Path |
//! |------|--------|------|
//! | [`SearchRequest`] | GET | `/<indices>/<types>/_search` |
//! | [`MultiSearchRequest`] | GET | `/_msearch` |
//! | [`IndexRequest`] | PUT | `<index>/<type>/<id>` |
//! | [`CreateRequest`] | PUT | `<index>/<type>/<id>/_create` |
//! | [`UpdateRequest`] | POST | `<index>/<type>/<id>/_update` |
//! | [`DeleteRequest`] | DELETE | `<index>/<type>/<id>` |
//! | [`BulkIndexRequest`] | POST | `/_bulk` |

pub mod bulk;
pub mod document;
pub mod search;

pub use bulk::BulkIndexRequest;
pub use document::{CreateRequest, DeleteRequest, IndexRequest, UpdateRequest};
pub use search::{MultiSearchRequest, SearchRequest};

use bytes::Bytes;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::io::Write;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{Error, ErrorContext};
use crate::params::QueryValues;
use crate::Result;

/// HTTP method a request is fired with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that can be fired against the search cluster.
pub trait Fireable {
    fn method(&self) -> Method;

    fn path(&self) -> String;

    /// Query values for the request; empty when none were set.
    fn values(&self) -> QueryValues;

    /// Write the request body into `w`.
    fn serialize(&self, w: &mut dyn Write) -> Result<()>;

    /// Compile method, path, values and body into one transport-ready value.
    fn to_http_request(&self) -> Result<HttpRequest> {
        let mut body = Vec::new();
        self.serialize(&mut body)?;
        let request = HttpRequest {
            method: self.method(),
            path: self.path(),
            query: self.values(),
            body: Bytes::from(body),
        };
        tracing::debug!(
            method = %request.method,
            path = %request.path,
            body_bytes = request.body.len(),
            "compiled request"
        );
        Ok(request)
    }
}

/// A write operation that can take part in a bulk body.
pub trait BatchFireable: Fireable {
    /// Write the action-metadata line that precedes this operation's body.
    fn serialize_batch_header(&self, w: &mut dyn Write) -> Result<()>;
}

impl<T: Fireable + ?Sized> Fireable for Box<T> {
    fn method(&self) -> Method {
        (**self).method()
    }

    fn path(&self) -> String {
        (**self).path()
    }

    fn values(&self) -> QueryValues {
        (**self).values()
    }

    fn serialize(&self, w: &mut dyn Write) -> Result<()> {
        (**self).serialize(w)
    }
}

impl<T: BatchFireable + ?Sized> BatchFireable for Box<T> {
    fn serialize_batch_header(&self, w: &mut dyn Write) -> Result<()> {
        (**self).serialize_batch_header(w)
    }
}

/// Fully rendered request, ready to hand to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub query: QueryValues,
    pub body: Bytes,
}

impl HttpRequest {
    /// Absolute URL: base URL, request path, then default values followed by request values.
    pub fn url(&self, config: &ClientConfig) -> Result<Url> {
        let mut url = config.base_url.clone();
        // Appending segment by segment percent-encodes ids containing `#`, `?` or `%`.
        url.path_segments_mut()
            .map_err(|_| {
                Error::configuration(format!(
                    "Base URL '{}' cannot carry a path",
                    config.base_url
                ))
            })?
            .pop_if_empty()
            .extend(self.path.split('/').filter(|s| !s.is_empty()));

        let mut query = config.default_params.clone();
        query.merge(&self.query);
        let encoded = query.encode();
        if encoded.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&encoded));
        }
        Ok(url)
    }

    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Join path segments with `/`, skipping empty ones.
pub(crate) fn join_path(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|s| s.trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Render `value` as one compact JSON line and write it, newline-terminated.
///
/// The line is rendered in memory first so a failure never leaves partial bytes in `w`.
pub(crate) fn write_json_line<T, F>(w: &mut dyn Write, value: &T, on_error: F) -> Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(serde_json::Error) -> Error,
{
    let mut line = serde_json::to_vec(value).map_err(on_error)?;
    line.push(b'\n');
    w.write_all(&line)?;
    Ok(())
}

/// Build the bulk action-metadata object: `{action: {_index, _type, _id, extra...}}`.
///
/// Extra values take only their first value per key and are applied last.
pub(crate) fn action_metadata(
    action: &str,
    index: &str,
    doc_type: Option<&str>,
    id: Option<&str>,
    params: &QueryValues,
) -> Value {
    let mut metadata = Map::new();
    metadata.insert("_index".to_string(), Value::String(index.to_string()));
    if let Some(doc_type) = doc_type {
        metadata.insert("_type".to_string(), Value::String(doc_type.to_string()));
    }
    if let Some(id) = id {
        metadata.insert("_id".to_string(), Value::String(id.to_string()));
    }
    for (key, value) in params.first_values() {
        metadata.insert(key.to_string(), Value::String(value.to_string()));
    }

    let mut header = Map::new();
    header.insert(action.to_string(), Value::Object(metadata));
    Value::Object(header)
}

pub(crate) fn header_context(action: &str, path: String) -> ErrorContext {
    ErrorContext::new().with_action(action).with_path(path)
}
