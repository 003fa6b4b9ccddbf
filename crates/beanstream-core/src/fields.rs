//! Wire field names used by the `TransactionProcess` request and response
//! documents. Element name equals field name on the wire.

// Authentication
pub const USERNAME: &str = "username";
pub const PASSWORD: &str = "password";
pub const MERCHANT_ID: &str = "merchant_id";
pub const SERVICE_VERSION: &str = "serviceVersion";

// Transaction
pub const TRN_TYPE: &str = "trnType";
pub const TRN_CARD_OWNER: &str = "trnCardOwner";
pub const TRN_CARD_NUMBER: &str = "trnCardNumber";
pub const TRN_CARD_CVD: &str = "trnCardCvd";
pub const TRN_EXP_MONTH: &str = "trnExpMonth";
pub const TRN_EXP_YEAR: &str = "trnExpYear";
pub const TRN_AMOUNT: &str = "trnAmount";
pub const TRN_ORDER_NUMBER: &str = "trnOrderNumber";
pub const ADJ_ID: &str = "adjId";

// Customer / billing
pub const ORD_EMAIL_ADDRESS: &str = "ordEmailAddress";
pub const ORD_NAME: &str = "ordName";
pub const ORD_PHONE_NUMBER: &str = "ordPhoneNumber";
pub const ORD_ADDRESS_1: &str = "ordAddress1";
pub const ORD_ADDRESS_2: &str = "ordAddress2";
pub const ORD_CITY: &str = "ordCity";
pub const ORD_PROVINCE: &str = "ordProvince";
pub const ORD_POSTAL_CODE: &str = "ordPostalCode";
pub const ORD_COUNTRY: &str = "ordCountry";

// 3-D Secure
pub const TERM_URL: &str = "termURL";
pub const VBV_ENABLED: &str = "vbvEnabled";
pub const SC_ENABLED: &str = "scEnabled";

// Response
pub const ERROR_TYPE: &str = "errorType";
pub const ERROR_FIELDS: &str = "errorFields";
pub const MESSAGE_ID: &str = "messageId";
pub const MESSAGE_TEXT: &str = "messageText";
pub const TRN_APPROVED: &str = "trnApproved";
pub const TRN_ID: &str = "trnId";
pub const TRN_DATE: &str = "trnDate";
pub const AUTH_CODE: &str = "authCode";
pub const CVD_ID: &str = "cvdId";
pub const AVS_PROCESSED: &str = "avsProcessed";
pub const AVS_POSTAL_MATCH: &str = "avsPostalMatch";
pub const AVS_ADDR_MATCH: &str = "avsAddrMatch";

/// Response fields carried as `"0"`/`"1"` on the wire and exposed as booleans.
pub const BOOLEAN_FIELDS: [&str; 4] = [
    TRN_APPROVED,
    AVS_PROCESSED,
    AVS_POSTAL_MATCH,
    AVS_ADDR_MATCH,
];

/// Fields whose values must never appear in logs or `Debug` output.
pub(crate) const SENSITIVE_FIELDS: [&str; 3] = [PASSWORD, TRN_CARD_NUMBER, TRN_CARD_CVD];
