//! # Field Mapper
//!
//! Builds the outgoing field set for each transaction type. Three layers
//! are merged, later layers winning:
//!
//! 1. defaulted optional fields (`ordAddress2` is a single space, the
//!    3-D-Secure flags are disabled),
//! 2. caller-supplied values, which replace a default only when non-empty,
//! 3. the fixed per-client authentication fields.
//!
//! No format validation happens here. Card numbers, expiry dates and
//! amounts are passed through untouched; the gateway is the authority on
//! their validity and reports problems as a user error.
//!
//! Empty values never reach the wire: [`TransactionRequest::to_xml`] omits
//! them instead of emitting empty elements.

use std::collections::BTreeMap;
use std::fmt;

use quick_xml::escape::escape;
use zeroize::Zeroizing;

use crate::fields;
use crate::transaction::TransactionType;

/// Service version sent when the caller does not pick one.
pub const DEFAULT_SERVICE_VERSION: &str = "1.2";

/// Placeholder the gateway expects when there is no second address line.
pub const BLANK_ADDRESS_LINE: &str = " ";

/// Root element of the request document.
pub const REQUEST_ROOT: &str = "transaction";

/// Fixed authentication fields sent with every transaction.
#[derive(Clone)]
pub struct AuthFields {
    pub username: String,
    pub password: Zeroizing<String>,
    pub merchant_id: String,
    pub service_version: String,
}

impl AuthFields {
    /// Auth fields with the default service version.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        merchant_id: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: Zeroizing::new(password.into()),
            merchant_id: merchant_id.into(),
            service_version: DEFAULT_SERVICE_VERSION.to_string(),
        }
    }

    /// Override the service version.
    pub fn with_service_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = version.into();
        self
    }
}

impl fmt::Debug for AuthFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthFields")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("merchant_id", &self.merchant_id)
            .field("service_version", &self.service_version)
            .finish()
    }
}

/// Card, amount and customer data for a purchase or pre-authorization.
#[derive(Clone, Default)]
pub struct PaymentDetails {
    pub card_owner: String,
    pub card_number: String,
    pub card_cvd: String,
    pub exp_month: String,
    pub exp_year: String,
    pub amount: String,
    pub order_number: String,
    pub email: String,
    pub customer_name: String,
    pub phone: String,
    pub address_line1: String,
    /// Sent as a single space when absent or empty.
    pub address_line2: Option<String>,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
    /// Return URL for 3-D Secure redirects.
    pub term_url: Option<String>,
    /// Verified by Visa.
    pub vbv_enabled: bool,
    /// MasterCard SecureCode.
    pub sc_enabled: bool,
}

impl fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentDetails")
            .field("card_owner", &self.card_owner)
            .field("card_number", &"<redacted>")
            .field("card_cvd", &"<redacted>")
            .field("amount", &self.amount)
            .field("order_number", &self.order_number)
            .field("customer_name", &self.customer_name)
            .field("country", &self.country)
            .finish_non_exhaustive()
    }
}

/// Reference to an earlier transaction for completion, refund or void.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjustmentDetails {
    pub amount: String,
    pub order_number: String,
    /// `trnId` of the transaction being adjusted.
    pub adj_id: String,
}

impl AdjustmentDetails {
    pub fn new(
        amount: impl Into<String>,
        order_number: impl Into<String>,
        adj_id: impl Into<String>,
    ) -> Self {
        Self {
            amount: amount.into(),
            order_number: order_number.into(),
            adj_id: adj_id.into(),
        }
    }
}

/// The field set sent to `TransactionProcess`, keyed by wire name.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TransactionRequest {
    fields: BTreeMap<String, String>,
}

impl TransactionRequest {
    /// A purchase (`P`): authorize and capture.
    pub fn purchase(auth: &AuthFields, payment: &PaymentDetails) -> Self {
        Self::payment(TransactionType::Purchase, auth, payment)
    }

    /// A pre-authorization (`PA`).
    pub fn preauth(auth: &AuthFields, payment: &PaymentDetails) -> Self {
        Self::payment(TransactionType::PreAuth, auth, payment)
    }

    /// Completion (`PAC`) of a pre-authorization.
    pub fn completion(auth: &AuthFields, adjustment: &AdjustmentDetails) -> Self {
        Self::adjustment(TransactionType::Completion, auth, adjustment)
    }

    /// Refund (`R`) of a purchase or completion.
    pub fn refund(auth: &AuthFields, adjustment: &AdjustmentDetails) -> Self {
        Self::adjustment(TransactionType::Refund, auth, adjustment)
    }

    /// Void (`VP`) of a purchase.
    pub fn void(auth: &AuthFields, adjustment: &AdjustmentDetails) -> Self {
        Self::adjustment(TransactionType::Void, auth, adjustment)
    }

    fn payment(trn_type: TransactionType, auth: &AuthFields, p: &PaymentDetails) -> Self {
        let mut req = Self::default();
        req.set_default(fields::ORD_ADDRESS_2, BLANK_ADDRESS_LINE);
        req.set_default(fields::VBV_ENABLED, flag(p.vbv_enabled));
        req.set_default(fields::SC_ENABLED, flag(p.sc_enabled));

        req.set(fields::TRN_TYPE, trn_type.as_code());
        req.set(fields::TRN_CARD_OWNER, &p.card_owner);
        req.set(fields::TRN_CARD_NUMBER, &p.card_number);
        req.set(fields::TRN_CARD_CVD, &p.card_cvd);
        req.set(fields::TRN_EXP_MONTH, &p.exp_month);
        req.set(fields::TRN_EXP_YEAR, &p.exp_year);
        req.set(fields::TRN_ORDER_NUMBER, &p.order_number);
        req.set(fields::TRN_AMOUNT, &p.amount);
        req.set(fields::ORD_EMAIL_ADDRESS, &p.email);
        req.set(fields::ORD_NAME, &p.customer_name);
        req.set(fields::ORD_PHONE_NUMBER, &p.phone);
        req.set(fields::ORD_ADDRESS_1, &p.address_line1);
        req.set_opt(fields::ORD_ADDRESS_2, p.address_line2.as_deref());
        req.set(fields::ORD_CITY, &p.city);
        req.set(fields::ORD_PROVINCE, &p.province);
        req.set(fields::ORD_POSTAL_CODE, &p.postal_code);
        req.set(fields::ORD_COUNTRY, &p.country);
        req.set_opt(fields::TERM_URL, p.term_url.as_deref());

        req.apply_auth(auth);
        req
    }

    fn adjustment(trn_type: TransactionType, auth: &AuthFields, a: &AdjustmentDetails) -> Self {
        let mut req = Self::default();
        req.set(fields::TRN_TYPE, trn_type.as_code());
        req.set(fields::TRN_AMOUNT, &a.amount);
        req.set(fields::TRN_ORDER_NUMBER, &a.order_number);
        req.set(fields::ADJ_ID, &a.adj_id);
        req.apply_auth(auth);
        req
    }

    fn apply_auth(&mut self, auth: &AuthFields) {
        self.set(fields::USERNAME, &auth.username);
        self.set(fields::PASSWORD, &auth.password);
        self.set(fields::MERCHANT_ID, &auth.merchant_id);
        self.set(fields::SERVICE_VERSION, &auth.service_version);
    }

    fn set_default(&mut self, name: &str, value: &str) {
        self.fields.insert(name.to_string(), value.to_string());
    }

    /// An empty value leaves any existing value (or default) in place.
    fn set(&mut self, name: &str, value: &str) {
        if !value.is_empty() {
            self.fields.insert(name.to_string(), value.to_string());
        }
    }

    fn set_opt(&mut self, name: &str, value: Option<&str>) {
        if let Some(v) = value {
            self.set(name, v);
        }
    }

    /// Value of a field, if set.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The `trnType` of this request, if it is one this client issues.
    pub fn transaction_type(&self) -> Option<TransactionType> {
        self.get(fields::TRN_TYPE)?.parse().ok()
    }

    /// The `trnOrderNumber` of this request.
    pub fn order_number(&self) -> Option<&str> {
        self.get(fields::TRN_ORDER_NUMBER)
    }

    /// Non-empty fields in wire-name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize to the request document: a `<transaction>` root with one
    /// child per non-empty field.
    pub fn to_xml(&self) -> String {
        let mut xml = format!("<{REQUEST_ROOT}>");
        for (name, value) in self.fields() {
            xml.push_str(&format!("<{name}>{}</{name}>", escape(value)));
        }
        xml.push_str(&format!("</{REQUEST_ROOT}>"));
        xml
    }
}

impl fmt::Debug for TransactionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, value) in self.fields() {
            if fields::SENSITIVE_FIELDS.contains(&name) {
                map.entry(&name, &"<redacted>");
            } else {
                map.entry(&name, &value);
            }
        }
        map.finish()
    }
}

fn flag(enabled: bool) -> &'static str {
    if enabled {
        "1"
    } else {
        "0"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> AuthFields {
        AuthFields::new("a_username", "a_password", "a_merchant_id")
    }

    fn payment() -> PaymentDetails {
        PaymentDetails {
            card_owner: "John Doe".into(),
            card_number: "4030000010001234".into(),
            card_cvd: "123".into(),
            exp_month: "05".into(),
            exp_year: "15".into(),
            amount: "10.00".into(),
            order_number: "138889".into(),
            email: "john.doe@pranana.com".into(),
            customer_name: "John Doe".into(),
            phone: "5145555555".into(),
            address_line1: "88 Mont-Royal Est".into(),
            city: "Montreal".into(),
            province: "QC".into(),
            postal_code: "H2T1N6".into(),
            country: "CA".into(),
            ..Default::default()
        }
    }

    #[test]
    fn purchase_maps_card_and_customer_fields() {
        let req = TransactionRequest::purchase(&auth(), &payment());
        assert_eq!(req.get("trnType"), Some("P"));
        assert_eq!(req.get("trnCardNumber"), Some("4030000010001234"));
        assert_eq!(req.get("trnExpYear"), Some("15"));
        assert_eq!(req.get("ordPostalCode"), Some("H2T1N6"));
        assert_eq!(req.transaction_type(), Some(TransactionType::Purchase));
        assert_eq!(req.order_number(), Some("138889"));
    }

    #[test]
    fn auth_fields_are_merged_into_every_request() {
        let auth = auth().with_service_version("1.3");
        let reqs = [
            TransactionRequest::purchase(&auth, &payment()),
            TransactionRequest::refund(&auth, &AdjustmentDetails::new("0.01", "1", "2")),
        ];
        for req in reqs {
            assert_eq!(req.get("username"), Some("a_username"));
            assert_eq!(req.get("password"), Some("a_password"));
            assert_eq!(req.get("merchant_id"), Some("a_merchant_id"));
            assert_eq!(req.get("serviceVersion"), Some("1.3"));
        }
    }

    #[test]
    fn default_service_version_is_1_2() {
        let req = TransactionRequest::purchase(&auth(), &payment());
        assert_eq!(req.get("serviceVersion"), Some("1.2"));
    }

    #[test]
    fn missing_second_address_line_is_a_single_space() {
        let req = TransactionRequest::purchase(&auth(), &payment());
        assert_eq!(req.get("ordAddress2"), Some(" "));
        assert!(req.to_xml().contains("<ordAddress2> </ordAddress2>"));
    }

    #[test]
    fn empty_second_address_line_keeps_the_placeholder() {
        let mut p = payment();
        p.address_line2 = Some(String::new());
        let req = TransactionRequest::preauth(&auth(), &p);
        assert_eq!(req.get("ordAddress2"), Some(" "));
    }

    #[test]
    fn supplied_second_address_line_is_kept_verbatim() {
        let mut p = payment();
        p.address_line2 = Some("rr2".into());
        let req = TransactionRequest::purchase(&auth(), &p);
        assert_eq!(req.get("ordAddress2"), Some("rr2"));
    }

    #[test]
    fn secure_flags_default_to_disabled() {
        let req = TransactionRequest::purchase(&auth(), &payment());
        assert_eq!(req.get("vbvEnabled"), Some("0"));
        assert_eq!(req.get("scEnabled"), Some("0"));

        let mut p = payment();
        p.vbv_enabled = true;
        p.term_url = Some("https://shop.example/3ds".into());
        let req = TransactionRequest::purchase(&auth(), &p);
        assert_eq!(req.get("vbvEnabled"), Some("1"));
        assert_eq!(req.get("scEnabled"), Some("0"));
        assert_eq!(req.get("termURL"), Some("https://shop.example/3ds"));
    }

    #[test]
    fn empty_optional_fields_are_omitted_from_the_payload() {
        let mut p = payment();
        p.phone = String::new();
        let req = TransactionRequest::purchase(&auth(), &p);
        let xml = req.to_xml();
        assert!(!xml.contains("ordPhoneNumber"));
        assert!(!xml.contains("termURL"));
        assert_eq!(req.get("ordPhoneNumber"), None);
    }

    #[test]
    fn values_are_passed_through_unvalidated() {
        let mut p = payment();
        p.card_number = "not-a-card".into();
        p.exp_month = "13".into();
        let req = TransactionRequest::purchase(&auth(), &p);
        assert_eq!(req.get("trnCardNumber"), Some("not-a-card"));
        assert_eq!(req.get("trnExpMonth"), Some("13"));
    }

    #[test]
    fn adjustment_requests_carry_adj_id() {
        let adj = AdjustmentDetails::new("10.00", "243364", "10000770");
        for (req, code) in [
            (TransactionRequest::completion(&auth(), &adj), "PAC"),
            (TransactionRequest::refund(&auth(), &adj), "R"),
            (TransactionRequest::void(&auth(), &adj), "VP"),
        ] {
            assert_eq!(req.get("trnType"), Some(code));
            assert_eq!(req.get("adjId"), Some("10000770"));
            assert_eq!(req.get("trnAmount"), Some("10.00"));
            assert_eq!(req.get("trnOrderNumber"), Some("243364"));
            assert_eq!(req.get("trnCardNumber"), None);
            assert_eq!(req.get("ordAddress2"), None);
        }
    }

    #[test]
    fn xml_has_one_child_per_field_and_escapes_text() {
        let mut p = payment();
        p.customer_name = "Smith & <Sons>".into();
        let xml = TransactionRequest::purchase(&auth(), &p).to_xml();
        assert!(xml.starts_with("<transaction>"));
        assert!(xml.ends_with("</transaction>"));
        assert!(xml.contains("<ordName>Smith &amp; &lt;Sons&gt;</ordName>"));
        assert!(xml.contains("<trnOrderNumber>138889</trnOrderNumber>"));
    }

    #[test]
    fn request_document_reads_back_as_its_fields() {
        let mut p = payment();
        p.customer_name = "a><b & c".into();
        p.address_line2 = Some("rr2".into());
        let req = TransactionRequest::purchase(&auth(), &p);

        let parsed = crate::response::parse_response(&req.to_xml()).unwrap();
        let expected: Vec<_> = req.fields().map(|(k, v)| (k, Some(v))).collect();
        let actual: Vec<_> = parsed.iter().map(|(k, v)| (k.as_str(), v.as_deref())).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn non_ascii_values_pass_through() {
        let mut p = payment();
        p.card_owner = "Jérémy Noël".into();
        let xml = TransactionRequest::purchase(&auth(), &p).to_xml();
        assert!(xml.contains("<trnCardOwner>Jérémy Noël</trnCardOwner>"));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let req = TransactionRequest::purchase(&auth(), &payment());
        let dbg = format!("{req:?}");
        assert!(!dbg.contains("4030000010001234"));
        assert!(!dbg.contains("a_password"));
        assert!(dbg.contains("<redacted>"));
        assert!(dbg.contains("138889"));

        assert!(!format!("{:?}", payment()).contains("4030000010001234"));
        assert!(!format!("{:?}", auth()).contains("a_password"));
    }
}
