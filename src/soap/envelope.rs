//! SOAP envelopes for the `publish` operation.

use roxmltree::{Document, Node};

use crate::{
    core::errors::{AppError, AppResult},
    xml::{convert::convert, record::NestedRecord},
};

pub const TARGET_NAMESPACE: &str = "http://soap.publiccommons.ne.jp/";
pub const SOAP11_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const SOAP12_ENVELOPE_NS: &str = "http://www.w3.org/2003/05/soap-envelope";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultCode {
    Client,
    Server,
}

impl FaultCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "soap11env:Client",
            Self::Server => "soap11env:Server",
        }
    }
}

/// Parses a `publish` request and converts the bulletin it carries.
///
/// The bulletin is the first element inside `publish/message`.
pub fn parse_publish_request(xml: &str) -> AppResult<NestedRecord> {
    let document = Document::parse(xml)?;
    let bulletin = publish_message(&document)?;
    Ok(convert(bulletin))
}

fn publish_message<'a, 'input>(document: &'a Document<'input>) -> AppResult<Node<'a, 'input>> {
    let envelope = document.root_element();
    let envelope_ns = envelope.tag_name().namespace().unwrap_or_default();
    if envelope.tag_name().name() != "Envelope"
        || !matches!(envelope_ns, SOAP11_ENVELOPE_NS | SOAP12_ENVELOPE_NS)
    {
        return Err(AppError::InvalidInput("request is not a SOAP envelope".to_string()));
    }

    let body = child_element(envelope, Some(envelope_ns), "Body")
        .ok_or_else(|| AppError::InvalidInput("SOAP envelope has no Body".to_string()))?;
    let publish = child_element(body, Some(TARGET_NAMESPACE), "publish").ok_or_else(|| {
        AppError::InvalidInput(format!("SOAP Body has no {{{TARGET_NAMESPACE}}}publish"))
    })?;
    let message = publish
        .children()
        .find(|node| node.is_element() && node.tag_name().name() == "message")
        .ok_or_else(|| AppError::InvalidInput("publish has no message".to_string()))?;

    message
        .children()
        .find(Node::is_element)
        .ok_or_else(|| AppError::InvalidInput("publish message is empty".to_string()))
}

fn child_element<'a, 'input>(
    parent: Node<'a, 'input>,
    namespace: Option<&str>,
    name: &str,
) -> Option<Node<'a, 'input>> {
    parent.children().find(|node| {
        node.is_element() && node.tag_name().name() == name && node.tag_name().namespace() == namespace
    })
}

pub fn render_publish_response(code: i64) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<soap11env:Envelope xmlns:soap11env="{env}" xmlns:tns="{tns}">"#,
            "<soap11env:Body><tns:publishResponse><tns:publishResult><tns:response>",
            "<tns:code>{code}</tns:code>",
            "</tns:response></tns:publishResult></tns:publishResponse></soap11env:Body>",
            "</soap11env:Envelope>"
        ),
        env = SOAP11_ENVELOPE_NS,
        tns = TARGET_NAMESPACE,
        code = code,
    )
}

pub fn render_fault(code: FaultCode, message: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            r#"<soap11env:Envelope xmlns:soap11env="{env}">"#,
            "<soap11env:Body><soap11env:Fault>",
            "<faultcode>{code}</faultcode><faultstring>{message}</faultstring>",
            "</soap11env:Fault></soap11env:Body></soap11env:Envelope>"
        ),
        env = SOAP11_ENVELOPE_NS,
        code = code.as_str(),
        message = escape_text(message),
    )
}

fn escape_text(raw: &str) -> String {
    raw.replace('&', "&amp;").replace('<', "&lt;")
}
