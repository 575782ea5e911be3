//! SOAP request rendering for the `checkVat` operation.
use crate::config::{
    CHECK_VAT_TEMPLATE, COUNTRY_CODE_PLACEHOLDER, Config, VAT_NUMBER_PLACEHOLDER,
};
use crate::vat::Vat;
use http::{Method, Request, header::CONTENT_TYPE};
use quick_xml::escape::escape;
use thiserror::Error;

/// Content type sent with every registry request.
pub const XML_CONTENT_TYPE: &str = "text/xml";

/// Errors raised while building the outbound request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to build request: {0}")]
    Build(#[from] http::Error),
}

/// Render the `checkVat` envelope for `vat`.
pub fn render_envelope(vat: &Vat) -> String {
    CHECK_VAT_TEMPLATE
        .replace(COUNTRY_CODE_PLACEHOLDER, &escape(vat.country_code()))
        .replace(VAT_NUMBER_PLACEHOLDER, &escape(vat.number()))
}

/// Build the POST request that asks the registry about `vat`.
///
/// # Errors
/// Returns [`RequestError::Build`] if the configured endpoint is not a valid URI.
pub fn build_request(vat: &Vat, config: &Config) -> Result<Request<String>, RequestError> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(config.endpoint())
        .header(CONTENT_TYPE, XML_CONTENT_TYPE)
        .body(render_envelope(vat))?;
    Ok(request)
}
