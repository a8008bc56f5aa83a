//! Transport seam
//!
//! This crate only builds requests. Sending them is left to an implementation of
//! [`Transport`] supplied by the caller (an HTTP client wrapper, a recorder in tests, ...).

use async_trait::async_trait;

use crate::request::{Fireable, HttpRequest};
use crate::Result;

/// Something that can deliver a rendered request to the search cluster.
#[async_trait]
pub trait Transport: Send + Sync {
    type Response: Send;

    async fn send(&self, request: HttpRequest) -> Result<Self::Response>;
}

/// Render `request` and hand it to `transport`.
///
/// Serialization errors are returned before the transport is called.
pub async fn fire<T, F>(transport: &T, request: &F) -> Result<T::Response>
where
    T: Transport + ?Sized,
    F: Fireable + ?Sized,
{
    let http = request.to_http_request()?;
    tracing::debug!(method = %http.method, path = %http.path, "firing request");
    transport.send(http).await
}
