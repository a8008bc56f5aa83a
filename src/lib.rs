//! # es-request-kit
//!
//! Request construction for search-cluster HTTP APIs.
//!
//! Search, index, create, update and delete operations are plain values that
//! render themselves into an HTTP method, a path, query values and a body.
//! Multi-search and bulk requests combine many of them into one
//! newline-delimited body.
//!
//! ## Quick Start
//!
//! ```rust
//! use es_request_kit::request::{BulkIndexRequest, DeleteRequest, Fireable, IndexRequest};
//! use serde_json::json;
//!
//! # fn main() -> es_request_kit::Result<()> {
//! let bulk = BulkIndexRequest::new()
//!     .with(
//!         IndexRequest::new("foo", json!({"name": "John"}))
//!             .with_type("bar")
//!             .with_id("123")
//!             .with_param("refresh", "true"),
//!     )
//!     .with(DeleteRequest::new("foo").with_type("bar").with_id("321"));
//!
//! let request = bulk.to_http_request()?;
//! assert_eq!(request.path, "/_bulk");
//! assert_eq!(request.body_str().map(|b| b.lines().count()), Some(3));
//! # Ok(())
//! # }
//! ```
//!
//! ## Batch semantics
//!
//! - [`request::MultiSearchRequest`] is lossy: members that fail to serialize are
//!   logged and skipped, and the body always ends with a newline.
//! - [`request::BulkIndexRequest`] is strict: the first failure aborts and is returned.
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`request`] | Request types and the [`request::Fireable`] trait |
//! | [`params`] | Multi-valued query parameters |
//! | [`plan`] | Batches described in YAML or JSON |
//! | [`config`] | Base URL and default values |
//! | [`transport`] | Seam for whatever actually sends requests |

pub mod config;
pub mod error;
pub mod params;
pub mod plan;
pub mod request;
pub mod transport;

pub use config::ClientConfig;
pub use error::{Error, ErrorContext};
pub use params::QueryValues;
pub use request::{
    BatchFireable, BulkIndexRequest, CreateRequest, DeleteRequest, Fireable, HttpRequest,
    IndexRequest, Method, MultiSearchRequest, SearchRequest, UpdateRequest,
};
pub use transport::{fire, Transport};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
