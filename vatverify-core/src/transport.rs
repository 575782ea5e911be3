//! Sending requests to the registry.
use http::{Request, Response};
use std::io::Read;
use thiserror::Error;

/// Errors raised while exchanging a request with the registry.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("invalid response from registry: {0}")]
    InvalidResponse(#[from] http::Error),
}

/// Sends one request and hands back the raw response.
///
/// [`HttpTransport`] talks to the network. Tests implement this trait to
/// return canned replies.
pub trait Transport {
    type Body: Read;

    fn send(&self, request: Request<String>) -> Result<Response<Self::Body>, TransportError>;
}

/// Blocking HTTP transport backed by a default [`reqwest::blocking::Client`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// # Errors
    /// Returns [`TransportError::Http`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    type Body = reqwest::blocking::Response;

    fn send(&self, request: Request<String>) -> Result<Response<Self::Body>, TransportError> {
        let request = reqwest::blocking::Request::try_from(request)?;
        tracing::debug!(method = %request.method(), url = %request.url(), "sending registry request");

        let response = self.client.execute(request)?;
        let status = response.status();
        let version = response.version();
        tracing::debug!(status = status.as_u16(), "registry responded");

        let mut builder = Response::builder().status(status).version(version);
        if let Some(headers) = builder.headers_mut() {
            headers.extend(
                response
                    .headers()
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone())),
            );
        }
        Ok(builder.body(response)?)
    }
}
