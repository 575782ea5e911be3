//! Check EU VAT numbers against the VIES registry.
//!
//! A raw identifier such as `CZ28987373` is split into country code and
//! number, wrapped in a `checkVat` SOAP request, sent to the registry and the
//! reply is mapped to an [`Outcome`](api::Outcome).
//!
//! # Examples
//! ```rust,no_run
//! let outcome = vatverify_core::process_vat("CZ28987373")?;
//! println!("{outcome}");
//! # Ok::<(), vatverify_core::Error>(())
//! ```
pub mod api;
pub mod config;
pub mod request;
pub mod transport;
pub mod vat;

use thiserror::Error;

pub use api::{Outcome, ValidationReply, ViesClient};
pub use config::Config;

/// Top-level error wrapper for a validation run.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Vat(#[from] vat::VatError),
    #[error(transparent)]
    Request(#[from] request::RequestError),
    #[error(transparent)]
    Transport(#[from] transport::TransportError),
    #[error(transparent)]
    Response(#[from] api::ResponseError),
}

/// Check `pending` against the VIES registry with the default configuration.
///
/// # Errors
/// Returns [`Error`] from whichever step of the pipeline failed.
pub fn process_vat(pending: &str) -> Result<Outcome, Error> {
    ViesClient::new(Config::default())?.check(pending)
}
