//! VIES registry client and `checkVat` reply types.
use crate::{
    Error,
    config::Config,
    request::build_request,
    transport::{HttpTransport, Transport},
    vat::split_vat,
};
use http::{Response, StatusCode};
use quick_xml::{Reader, events::Event};
use std::{fmt, io::Read, str::Utf8Error};

/// Errors returned while interpreting a registry response.
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("expected status 200, received {}", .status.as_u16())]
    UnexpectedStatus { status: StatusCode },
    #[error("failed to read response body: {0}")]
    Body(#[from] std::io::Error),
    #[error("response body is not valid UTF-8: {0}")]
    Encoding(#[from] Utf8Error),
    #[error("failed to parse response XML: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("response XML ended before all elements were closed")]
    UnexpectedEof,
    #[error("response XML has no {0} element")]
    MissingElement(&'static str),
}

/// Final result of one validation call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Outcome {
    Valid,
    Invalid,
    /// Fault text reported by the registry, e.g. `INVALID_INPUT`.
    Fault(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Valid => f.write_str("Valid"),
            Outcome::Invalid => f.write_str("Invalid"),
            Outcome::Fault(message) => f.write_str(message),
        }
    }
}

/// Decoded `checkVat` reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationReply {
    Checked(CheckVatResult),
    Fault(Fault),
}

impl ValidationReply {
    /// Map the reply to an [`Outcome`].
    ///
    /// A fault wins over any validity flag. Only the exact flag text `true`
    /// counts as valid.
    pub fn outcome(&self) -> Outcome {
        match self {
            ValidationReply::Fault(fault) => Outcome::Fault(fault.fault_string.clone()),
            ValidationReply::Checked(result) if result.is_valid() => Outcome::Valid,
            ValidationReply::Checked(_) => Outcome::Invalid,
        }
    }

    pub fn result(&self) -> Option<&CheckVatResult> {
        match self {
            ValidationReply::Checked(result) => Some(result),
            ValidationReply::Fault(_) => None,
        }
    }
}

/// Registrant data returned for a successful lookup.
///
/// Field text is kept exactly as sent, surrounding whitespace included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CheckVatResult {
    country_code: String,
    vat_number: String,
    request_date: String,
    valid: String,
    name: String,
    address: String,
}

impl CheckVatResult {
    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn vat_number(&self) -> &str {
        &self.vat_number
    }

    pub fn request_date(&self) -> &str {
        &self.request_date
    }

    /// Raw validity flag as sent by the registry.
    pub fn valid(&self) -> &str {
        &self.valid
    }

    pub fn is_valid(&self) -> bool {
        self.valid == "true"
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

/// SOAP fault reported inside an HTTP 200 response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Fault {
    fault_code: String,
    fault_string: String,
}

impl Fault {
    pub fn fault_code(&self) -> &str {
        &self.fault_code
    }

    pub fn fault_string(&self) -> &str {
        &self.fault_string
    }
}

const BODY: &[u8] = b"Body";
const CHECK_VAT_RESPONSE: &[u8] = b"checkVatResponse";
const FAULT: &[u8] = b"Fault";

#[derive(Debug, Clone, Copy)]
enum ReplyField {
    CountryCode,
    VatNumber,
    RequestDate,
    Valid,
    Name,
    Address,
    FaultCode,
    FaultString,
}

impl ReplyField {
    fn lookup(parent: &[u8], name: &[u8]) -> Option<Self> {
        let field = match (parent, name) {
            (b"checkVatResponse", b"countryCode") => ReplyField::CountryCode,
            (b"checkVatResponse", b"vatNumber") => ReplyField::VatNumber,
            (b"checkVatResponse", b"requestDate") => ReplyField::RequestDate,
            (b"checkVatResponse", b"valid") => ReplyField::Valid,
            (b"checkVatResponse", b"name") => ReplyField::Name,
            (b"checkVatResponse", b"address") => ReplyField::Address,
            (b"Fault", b"faultcode") => ReplyField::FaultCode,
            (b"Fault", b"faultstring") => ReplyField::FaultString,
            _ => return None,
        };
        Some(field)
    }
}

/// Walks the reply events, tracking the open elements by local name.
///
/// Layout: `Envelope / Body / (checkVatResponse | Fault) / field`.
#[derive(Debug, Default)]
struct ReplyScanner {
    open: Vec<Vec<u8>>,
    seen_envelope: bool,
    seen_body: bool,
    result: Option<CheckVatResult>,
    fault: Option<Fault>,
}

impl ReplyScanner {
    fn in_body(&self) -> bool {
        self.open.get(1).is_some_and(|name| name.as_slice() == BODY)
    }

    fn start(&mut self, name: &[u8]) {
        self.open.push(name.to_vec());
        match self.open.len() {
            1 => self.seen_envelope = true,
            2 if name == BODY => self.seen_body = true,
            3 if self.in_body() && name == CHECK_VAT_RESPONSE => {
                self.result.get_or_insert_with(CheckVatResult::default);
            }
            3 if self.in_body() && name == FAULT => {
                self.fault.get_or_insert_with(Fault::default);
            }
            _ => {}
        }
    }

    fn end(&mut self) {
        self.open.pop();
    }

    fn text(&mut self, text: &str) {
        if self.open.len() != 4 || !self.in_body() {
            return;
        }
        let Some(field) = ReplyField::lookup(&self.open[2], &self.open[3]) else {
            return;
        };
        if let Some(slot) = self.slot(field) {
            slot.push_str(text);
        }
    }

    fn slot(&mut self, field: ReplyField) -> Option<&mut String> {
        match field {
            ReplyField::CountryCode => self.result.as_mut().map(|r| &mut r.country_code),
            ReplyField::VatNumber => self.result.as_mut().map(|r| &mut r.vat_number),
            ReplyField::RequestDate => self.result.as_mut().map(|r| &mut r.request_date),
            ReplyField::Valid => self.result.as_mut().map(|r| &mut r.valid),
            ReplyField::Name => self.result.as_mut().map(|r| &mut r.name),
            ReplyField::Address => self.result.as_mut().map(|r| &mut r.address),
            ReplyField::FaultCode => self.fault.as_mut().map(|f| &mut f.fault_code),
            ReplyField::FaultString => self.fault.as_mut().map(|f| &mut f.fault_string),
        }
    }

    fn finish(self) -> Result<ValidationReply, ResponseError> {
        if !self.open.is_empty() {
            return Err(ResponseError::UnexpectedEof);
        }
        if !self.seen_envelope {
            return Err(ResponseError::MissingElement("Envelope"));
        }
        if !self.seen_body {
            return Err(ResponseError::MissingElement("Body"));
        }
        let reply = match (self.fault, self.result) {
            (Some(fault), _) => ValidationReply::Fault(fault),
            (None, result) => ValidationReply::Checked(result.unwrap_or_default()),
        };
        Ok(reply)
    }
}

/// Decode a `checkVat` reply envelope.
///
/// Elements are matched on their local name, so namespace prefixes do not
/// matter. Text is not trimmed.
///
/// # Errors
/// Returns [`ResponseError`] when the XML is malformed, truncated or has no
/// `Body`.
pub fn parse_reply_xml(xml: &str) -> Result<ValidationReply, ResponseError> {
    let mut reader = Reader::from_str(xml);
    let mut scanner = ReplyScanner::default();
    loop {
        match reader.read_event()? {
            Event::Start(element) => scanner.start(element.local_name().as_ref()),
            Event::Empty(element) => {
                scanner.start(element.local_name().as_ref());
                scanner.end();
            }
            Event::End(_) => scanner.end(),
            Event::Text(text) => scanner.text(&text.unescape()?),
            Event::CData(data) => scanner.text(std::str::from_utf8(&data)?),
            Event::Eof => break,
            _ => {}
        }
    }
    scanner.finish()
}

/// Check the status, read the body and decode the reply.
///
/// # Errors
/// Returns [`ResponseError`] for a non-200 status, an unreadable body or
/// undecodable XML.
pub fn parse_reply<B: Read>(response: Response<B>) -> Result<ValidationReply, ResponseError> {
    let status = response.status();
    if status != StatusCode::OK {
        tracing::warn!(status = status.as_u16(), "registry returned unexpected status");
        return Err(ResponseError::UnexpectedStatus { status });
    }

    let mut body = Vec::new();
    response.into_body().read_to_end(&mut body)?;
    let reply = parse_reply_xml(std::str::from_utf8(&body)?)?;
    if let ValidationReply::Fault(fault) = &reply {
        tracing::warn!(
            fault_code = fault.fault_code(),
            fault_string = fault.fault_string(),
            "registry reported a fault"
        );
    }
    Ok(reply)
}

/// Map a registry response straight to an [`Outcome`].
///
/// # Errors
/// See [`parse_reply`].
pub fn parse_response<B: Read>(response: Response<B>) -> Result<Outcome, ResponseError> {
    parse_reply(response).map(|reply| reply.outcome())
}

/// VIES registry client.
///
/// # Examples
/// ```rust,no_run
/// use vatverify_core::api::ViesClient;
/// use vatverify_core::config::Config;
///
/// let client = ViesClient::new(Config::default())?;
/// let outcome = client.check("CZ28987373")?;
/// println!("{outcome}");
/// # Ok::<(), vatverify_core::Error>(())
/// ```
#[derive(Debug)]
pub struct ViesClient<T = HttpTransport> {
    config: Config,
    transport: T,
}

impl ViesClient<HttpTransport> {
    /// Create a client that talks to the configured endpoint over HTTP.
    ///
    /// # Errors
    /// Returns [`Error::Transport`] if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self, Error> {
        let transport = HttpTransport::new()?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> ViesClient<T> {
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Look up `raw` and return the full registry reply.
    ///
    /// # Errors
    /// Returns [`Error`] if the identifier is malformed, the request cannot be
    /// built or sent, or the response cannot be decoded.
    pub fn lookup(&self, raw: &str) -> Result<ValidationReply, Error> {
        let vat = split_vat(raw)?;
        tracing::debug!(
            country_code = vat.country_code(),
            number = vat.number(),
            "checking VAT number"
        );
        let request = build_request(&vat, &self.config)?;
        let response = self.transport.send(request)?;
        Ok(parse_reply(response)?)
    }

    /// Check `raw` against the registry.
    ///
    /// # Errors
    /// See [`ViesClient::lookup`].
    pub fn check(&self, raw: &str) -> Result<Outcome, Error> {
        self.lookup(raw).map(|reply| reply.outcome())
    }
}
