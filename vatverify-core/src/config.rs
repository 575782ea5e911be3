//! Registry endpoint and request template.
use std::borrow::Cow;

/// VIES `checkVat` SOAP endpoint.
pub const SERVICE_URI: &str =
    "https://ec.europa.eu/taxation_customs/vies/services/checkVatService";

pub(crate) const CHECK_VAT_TEMPLATE: &str =
    include_str!("../assets/templates/check_vat_request.xml");
pub(crate) const COUNTRY_CODE_PLACEHOLDER: &str = "{country_code}";
pub(crate) const VAT_NUMBER_PLACEHOLDER: &str = "{vat_number}";

/// Configuration for the registry client.
///
/// The default configuration targets [`SERVICE_URI`]. Another endpoint can be
/// supplied for tests that run against a local mock server.
///
/// # Examples
/// ```rust
/// use vatverify_core::config::{Config, SERVICE_URI};
///
/// let config = Config::default();
/// assert_eq!(config.endpoint(), SERVICE_URI);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    endpoint: Cow<'static, str>,
}

impl Config {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Cow::Owned(endpoint.into()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: Cow::Borrowed(SERVICE_URI),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_service_uri() {
        assert_eq!(Config::default().endpoint(), SERVICE_URI);
    }

    #[test]
    fn custom_endpoint_is_kept() {
        let config = Config::new("http://127.0.0.1:8080/checkVatService");
        assert_eq!(config.endpoint(), "http://127.0.0.1:8080/checkVatService");
    }

    #[test]
    fn template_carries_both_placeholders() {
        assert!(CHECK_VAT_TEMPLATE.contains(COUNTRY_CODE_PLACEHOLDER));
        assert!(CHECK_VAT_TEMPLATE.contains(VAT_NUMBER_PLACEHOLDER));
        assert!(CHECK_VAT_TEMPLATE.contains("urn:ec.europa.eu:taxud:vies:services:checkVat:types"));
    }
}
