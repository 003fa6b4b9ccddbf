//! # Response Normalizer
//!
//! The gateway answers `TransactionProcess` with a flat XML document: a
//! root element whose children are the response fields, each occurring
//! once, with empty elements standing for "no value".
//!
//! [`parse_response`] reads that document straight into a scalar mapping
//! ([`RawResponse`]). [`normalize`] then coerces the fixed set of
//! boolean fields from `"0"`/`"1"` and keeps everything else as text.
//! Anything that cannot be read as a flat key/value document is a
//! [`ResponseError::Malformed`].

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use crate::error::ResponseError;
use crate::fields;
use crate::verification::{AvsResult, CvdResult};

/// Format of `trnDate`, e.g. `3/17/2014 6:37:50 PM`.
pub const TRN_DATE_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// Field name to value, as read from the document. Empty, self-closing and
/// whitespace-only elements are `None`; other text is kept verbatim.
pub type RawResponse = BTreeMap<String, Option<String>>;

/// A normalized response value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
    Null,
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Response fields after boolean coercion. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedResponse {
    fields: BTreeMap<String, FieldValue>,
}

impl NormalizedResponse {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Text value of a field. `None` when absent, null or boolean.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// Boolean value of a field. `None` unless the field is one of the
    /// coerced boolean fields and present.
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(FieldValue::as_flag)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `errorType`: `N`, `U` or `S`.
    pub fn error_type(&self) -> Option<&str> {
        self.text(fields::ERROR_TYPE)
    }

    /// `trnApproved`.
    pub fn approved(&self) -> Option<bool> {
        self.flag(fields::TRN_APPROVED)
    }

    /// `trnOrderNumber` echoed back by the gateway.
    pub fn order_number(&self) -> Option<&str> {
        self.text(fields::TRN_ORDER_NUMBER)
    }

    /// `trnId`, the reference used as `adjId` by follow-up transactions.
    pub fn transaction_id(&self) -> Option<&str> {
        self.text(fields::TRN_ID)
    }

    pub fn message_id(&self) -> Option<&str> {
        self.text(fields::MESSAGE_ID)
    }

    pub fn message_text(&self) -> Option<&str> {
        self.text(fields::MESSAGE_TEXT)
    }

    pub fn auth_code(&self) -> Option<&str> {
        self.text(fields::AUTH_CODE)
    }

    /// `cvdId` as a typed result.
    pub fn cvd_result(&self) -> Option<CvdResult> {
        self.text(fields::CVD_ID).map(CvdResult::from_code)
    }

    /// AVS indicators, present only when all three flags were returned.
    pub fn avs(&self) -> Option<AvsResult> {
        Some(AvsResult {
            processed: self.flag(fields::AVS_PROCESSED)?,
            postal_match: self.flag(fields::AVS_POSTAL_MATCH)?,
            address_match: self.flag(fields::AVS_ADDR_MATCH)?,
        })
    }

    /// `trnDate` in gateway local time. `None` when absent or not in
    /// [`TRN_DATE_FORMAT`].
    pub fn transaction_date(&self) -> Option<NaiveDateTime> {
        let raw = self.text(fields::TRN_DATE)?;
        NaiveDateTime::parse_from_str(raw, TRN_DATE_FORMAT).ok()
    }
}

impl FromIterator<(String, FieldValue)> for NormalizedResponse {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Read a response document into a flat field mapping.
pub fn parse_response(xml: &str) -> Result<RawResponse, ResponseError> {
    let mut reader = Reader::from_str(xml);

    let mut raw = RawResponse::new();
    let mut root: Option<String> = None;
    let mut depth = 0usize;
    let mut current: Option<(String, Option<String>)> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            ResponseError::malformed(format!(
                "invalid XML at byte {}: {e}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(e) => {
                let name = element_name(&e)?;
                match depth {
                    0 => open_root(&mut root, name)?,
                    1 => current = Some((name, None)),
                    _ => return Err(nested(&name, current.as_ref())),
                }
                depth += 1;
            }
            Event::Empty(e) => {
                let name = element_name(&e)?;
                match depth {
                    0 => open_root(&mut root, name)?,
                    1 => insert_field(&mut raw, name, None),
                    _ => return Err(nested(&name, current.as_ref())),
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if depth == 1 {
                    if let Some((name, value)) = current.take() {
                        let value = value.filter(|v| !v.trim().is_empty());
                        insert_field(&mut raw, name, value);
                    }
                }
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| {
                    ResponseError::malformed(format!("undecodable text: {e}"))
                })?;
                push_text(depth, &mut current, &text)?;
            }
            Event::CData(c) => {
                let text = String::from_utf8(c.into_inner().into_owned())
                    .map_err(|_| ResponseError::malformed("CDATA is not valid UTF-8"))?;
                push_text(depth, &mut current, &text)?;
            }
            Event::Eof => break,
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    if root.is_none() {
        return Err(ResponseError::malformed("no root element"));
    }
    if depth != 0 {
        return Err(ResponseError::malformed("unexpected end of document"));
    }
    Ok(raw)
}

/// Coerce the boolean fields of a raw response.
pub fn normalize(raw: RawResponse) -> Result<NormalizedResponse, ResponseError> {
    raw.into_iter()
        .map(|(name, value)| {
            let value = if fields::BOOLEAN_FIELDS.contains(&name.as_str()) {
                FieldValue::Flag(parse_flag(&name, value.as_deref())?)
            } else {
                value.map_or(FieldValue::Null, FieldValue::Text)
            };
            Ok::<_, ResponseError>((name, value))
        })
        .collect()
}

fn parse_flag(name: &str, value: Option<&str>) -> Result<bool, ResponseError> {
    match value {
        Some("1") => Ok(true),
        Some("0") => Ok(false),
        Some(other) => Err(ResponseError::malformed(format!(
            "{name} must be \"0\" or \"1\", got {other:?}"
        ))),
        None => Err(ResponseError::malformed(format!(
            "{name} must be \"0\" or \"1\", got an empty element"
        ))),
    }
}

fn element_name(e: &BytesStart<'_>) -> Result<String, ResponseError> {
    std::str::from_utf8(e.local_name().as_ref())
        .map(str::to_string)
        .map_err(|_| ResponseError::malformed("element name is not valid UTF-8"))
}

fn open_root(root: &mut Option<String>, name: String) -> Result<(), ResponseError> {
    if let Some(first) = root {
        return Err(ResponseError::malformed(format!(
            "second root element <{name}> after <{first}>"
        )));
    }
    *root = Some(name);
    Ok(())
}

fn nested(name: &str, parent: Option<&(String, Option<String>)>) -> ResponseError {
    let parent = parent.map_or("?", |(p, _)| p.as_str());
    ResponseError::malformed(format!(
        "nested element <{name}> inside <{parent}>; response is not a flat field list"
    ))
}

fn push_text(
    depth: usize,
    current: &mut Option<(String, Option<String>)>,
    text: &str,
) -> Result<(), ResponseError> {
    match (depth, current.as_mut()) {
        (2, Some((_, value))) => {
            value.get_or_insert_with(String::new).push_str(text);
            Ok(())
        }
        _ if text.trim().is_empty() => Ok(()),
        (0, _) => Err(ResponseError::malformed("text outside of a root element")),
        _ => Err(ResponseError::malformed(
            "text directly inside the root element",
        )),
    }
}

fn insert_field(raw: &mut RawResponse, name: String, value: Option<String>) {
    if raw.contains_key(&name) {
        tracing::warn!(field = %name, "duplicate response field; keeping the first value");
        return;
    }
    raw.insert(name, value);
}
