//! # SOAP 1.1 Envelope Encoding
//!
//! `TransactionProcess` takes the request document as a single string
//! parameter and returns the response document as a string. On the wire
//! both travel as escaped text inside a SOAP 1.1 envelope:
//!
//! ```text
//! <soap:Envelope>
//!   <soap:Body>
//!     <bs:TransactionProcess><bs:trnXML>&lt;transaction&gt;…</bs:trnXML></bs:TransactionProcess>
//!   </soap:Body>
//! </soap:Envelope>
//! ```
//!
//! and back as `<TransactionProcessResponse><TransactionProcessResult>…`.

use std::borrow::Cow;

use quick_xml::escape::{escape, unescape};
use quick_xml::events::Event;
use quick_xml::name::QName;
use quick_xml::Reader;

use crate::error::TransportError;

pub const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Name of the string parameter carrying the request document.
pub const REQUEST_PARAMETER: &str = "trnXML";

/// `SOAPAction` header value for an operation, quoted as SOAP 1.1 requires.
pub fn soap_action(namespace: &str, operation: &str) -> String {
    format!("\"{namespace}{operation}\"")
}

/// Wrap a request document in a SOAP envelope.
pub fn encode_envelope(namespace: &str, operation: &str, request_xml: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<soap:Envelope xmlns:soap="{envelope_ns}" xmlns:bs="{ns}">"#,
            "<soap:Body><bs:{op}><bs:{param}>{body}</bs:{param}></bs:{op}></soap:Body>",
            "</soap:Envelope>"
        ),
        envelope_ns = SOAP_ENVELOPE_NS,
        ns = escape(namespace),
        op = operation,
        param = REQUEST_PARAMETER,
        body = escape(request_xml),
    )
}

/// Extract the response document from a SOAP envelope.
///
/// Returns the text of `<{operation}Result>`. A SOAP fault becomes
/// [`TransportError::Fault`]; an envelope with neither is
/// [`TransportError::Envelope`].
pub fn decode_envelope(operation: &str, envelope: &str) -> Result<String, TransportError> {
    let result_name = format!("{operation}Result");
    let mut reader = Reader::from_str(envelope);

    let mut in_fault = false;
    let mut fault_code = None;
    let mut fault_string = None;

    loop {
        match reader.read_event().map_err(envelope_error)? {
            Event::Start(e) => match e.local_name().as_ref() {
                name if name == result_name.as_bytes() => {
                    let raw = reader.read_text(e.name()).map_err(envelope_error)?;
                    return decode_result(&raw);
                }
                b"Fault" => in_fault = true,
                b"faultcode" => fault_code = Some(read_unescaped(&mut reader, e.name())?),
                b"faultstring" => fault_string = Some(read_unescaped(&mut reader, e.name())?),
                _ => {}
            },
            Event::Empty(e) if e.local_name().as_ref() == result_name.as_bytes() => {
                return Ok(String::new());
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if in_fault {
        return Err(TransportError::Fault {
            operation: operation.to_string(),
            code: fault_code.unwrap_or_default(),
            message: fault_string.unwrap_or_default(),
        });
    }
    Err(TransportError::Envelope(format!(
        "no <{result_name}> element in response"
    )))
}

/// The result is normally escaped text. Some gateway builds return it as
/// CDATA or inline markup instead; both are passed through as-is.
fn decode_result(raw: &str) -> Result<String, TransportError> {
    let trimmed = raw.trim();
    if let Some(inner) = trimmed
        .strip_prefix("<![CDATA[")
        .and_then(|s| s.strip_suffix("]]>"))
    {
        return Ok(inner.to_string());
    }
    if trimmed.starts_with('<') {
        return Ok(trimmed.to_string());
    }
    unescape(trimmed)
        .map(Cow::into_owned)
        .map_err(|e| TransportError::Envelope(format!("undecodable result text: {e}")))
}

fn read_unescaped(reader: &mut Reader<&[u8]>, end: QName<'_>) -> Result<String, TransportError> {
    let raw = reader.read_text(end).map_err(envelope_error)?;
    unescape(raw.trim())
        .map(Cow::into_owned)
        .map_err(|e| TransportError::Envelope(e.to_string()))
}

fn envelope_error(e: quick_xml::Error) -> TransportError {
    TransportError::Envelope(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "http://www.beanstream.com/soap/";

    fn response_envelope(result: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <soap:Envelope xmlns:soap=\"{SOAP_ENVELOPE_NS}\"><soap:Body>\
             <TransactionProcessResponse xmlns=\"{NS}\">\
             <TransactionProcessResult>{result}</TransactionProcessResult>\
             </TransactionProcessResponse></soap:Body></soap:Envelope>"
        )
    }

    #[test]
    fn action_is_quoted_namespace_plus_operation() {
        assert_eq!(
            soap_action(NS, "TransactionProcess"),
            "\"http://www.beanstream.com/soap/TransactionProcess\""
        );
    }

    #[test]
    fn envelope_carries_escaped_request() {
        let request = "<transaction><trnType>P</trnType></transaction>";
        let env = encode_envelope(NS, "TransactionProcess", request);
        assert!(env.contains("<bs:TransactionProcess><bs:trnXML>"));
        assert!(env.contains("&lt;trnType&gt;P&lt;/trnType&gt;"));
        assert!(env.contains(&format!("xmlns:bs=\"{NS}\"")));
    }

    #[test]
    fn encoded_request_decodes_back_through_a_result_element() {
        let request = "<transaction><ordName>A &amp; B</ordName></transaction>";
        let env = response_envelope(&escape(request));
        assert_eq!(decode_envelope("TransactionProcess", &env).unwrap(), request);
    }

    #[test]
    fn inline_and_cdata_results_pass_through() {
        let doc = "<response><errorType>N</errorType></response>";
        let inline = response_envelope(doc);
        assert_eq!(decode_envelope("TransactionProcess", &inline).unwrap(), doc);

        let cdata = response_envelope(&format!("<![CDATA[{doc}]]>"));
        assert_eq!(decode_envelope("TransactionProcess", &cdata).unwrap(), doc);
    }

    #[test]
    fn fault_is_reported() {
        let env = format!(
            "<soap:Envelope xmlns:soap=\"{SOAP_ENVELOPE_NS}\"><soap:Body><soap:Fault>\
             <faultcode>soap:Server</faultcode>\
             <faultstring>Server was unable to process request.</faultstring>\
             </soap:Fault></soap:Body></soap:Envelope>"
        );
        let err = decode_envelope("TransactionProcess", &env).unwrap_err();
        let TransportError::Fault { code, message, .. } = err else {
            panic!("expected a SOAP fault");
        };
        assert_eq!(code, "soap:Server");
        assert_eq!(message, "Server was unable to process request.");
    }

    #[test]
    fn missing_result_is_an_envelope_error() {
        let env = format!(
            "<soap:Envelope xmlns:soap=\"{SOAP_ENVELOPE_NS}\"><soap:Body/></soap:Envelope>"
        );
        assert!(matches!(
            decode_envelope("TransactionProcess", &env).unwrap_err(),
            TransportError::Envelope(_)
        ));
        assert!(matches!(
            decode_envelope("TransactionProcess", "<html>").unwrap_err(),
            TransportError::Envelope(_)
        ));
    }

    #[test]
    fn empty_result_is_an_empty_document() {
        let env = format!(
            "<soap:Envelope xmlns:soap=\"{SOAP_ENVELOPE_NS}\"><soap:Body>\
             <TransactionProcessResponse><TransactionProcessResult/></TransactionProcessResponse>\
             </soap:Body></soap:Envelope>"
        );
        assert_eq!(decode_envelope("TransactionProcess", &env).unwrap(), "");
    }
}
