//! Classification of Viva Payments answers.
//!
//! The gateway reports failures in several shapes: an HTTP status of 400 or
//! above, an `ErrorCode` in an otherwise successful body, or both. Both
//! response kinds below look at all of them.

use common_utils::{ext_traits::ByteSliceExt, CustomResult};
use domain_types::{errors::ConnectorError, router_response_types::Response};
use error_stack::ResultExt;
use serde_json::{Map, Value};

const ERROR_CODE: &str = "ErrorCode";
const ERROR_TEXT: &str = "ErrorText";
const MESSAGE: &str = "Message";
const TRANSACTION_ID: &str = "TransactionId";
const ORDER_CODE: &str = "OrderCode";

const CHECKOUT_PATH: &str = "/web/checkout?ref=";

/// Decodes a raw answer body. A blank body becomes an empty object; anything
/// other than a JSON object is rejected.
pub fn parse_response_body(res: &Response) -> CustomResult<Map<String, Value>, ConnectorError> {
    parse_body(&res.response[..]).attach_printable_lazy(|| {
        format!("unable to decode answer with status {}", res.status_code)
    })
}

fn parse_body(body: &[u8]) -> CustomResult<Map<String, Value>, ConnectorError> {
    if body.is_blank() {
        return Ok(Map::new());
    }
    body.parse_struct::<Map<String, Value>>("VivapaymentsResponse")
        .change_context(ConnectorError::ResponseDeserializationFailed)
}

/// Generic answer of the REST API: HTTP status plus the decoded body.
#[derive(Debug, Clone, PartialEq)]
pub struct RestResponse {
    status_code: u16,
    body: Map<String, Value>,
}

impl RestResponse {
    pub fn new(status_code: u16, body: Map<String, Value>) -> Self {
        Self { status_code, body }
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// The decoded body, e.g. the `Transactions` list of a lookup.
    pub fn data(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn is_redirect(&self) -> bool {
        false
    }

    pub fn is_successful(&self) -> bool {
        !self.is_error() && !self.is_redirect()
    }

    pub fn transaction_reference(&self) -> Option<String> {
        [TRANSACTION_ID, ORDER_CODE]
            .into_iter()
            .filter_map(|key| self.body.get(key))
            .find(|value| !is_empty(value))
            .map(render)
    }

    pub fn message(&self) -> Option<String> {
        self.first_set(&[ERROR_TEXT, MESSAGE])
    }

    /// `ErrorCode` when the body carries one, the HTTP status otherwise.
    pub fn code(&self) -> String {
        self.first_set(&[ERROR_CODE])
            .unwrap_or_else(|| self.status_code.to_string())
    }

    fn is_error(&self) -> bool {
        self.status_code >= 400 || self.body.get(ERROR_CODE).is_some_and(|v| !is_empty(v))
    }

    fn first_set(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|key| self.body.get(*key))
            .find(|value| !value.is_null())
            .map(render)
    }
}

/// Answer of a hosted checkout order: the customer has to be sent to the
/// Viva Payments checkout page to finish the payment.
#[derive(Debug, Clone, PartialEq)]
pub struct RedirectResponse {
    inner: RestResponse,
    base_endpoint: String,
}

impl RedirectResponse {
    pub fn new(inner: RestResponse, base_endpoint: impl Into<String>) -> Self {
        Self {
            inner,
            base_endpoint: base_endpoint.into(),
        }
    }

    pub fn base_endpoint(&self) -> &str {
        &self.base_endpoint
    }

    pub fn is_redirect(&self) -> bool {
        !self.inner.is_error()
    }

    /// Never true: a created order still waits for the customer.
    pub fn is_successful(&self) -> bool {
        !self.inner.is_error() && !self.is_redirect()
    }

    pub fn redirect_url(&self) -> Option<String> {
        self.transaction_reference()
            .map(|reference| format!("{}{CHECKOUT_PATH}{reference}", self.base_endpoint))
    }

    pub fn redirect_method(&self) -> common_utils::request::Method {
        common_utils::request::Method::Get
    }

    pub fn redirect_data(&self) -> Map<String, Value> {
        Map::new()
    }

    pub fn transaction_reference(&self) -> Option<String> {
        self.inner.transaction_reference()
    }

    pub fn message(&self) -> Option<String> {
        self.inner.message()
    }

    pub fn code(&self) -> String {
        self.inner.code()
    }

    pub fn status_code(&self) -> u16 {
        self.inner.status_code()
    }

    pub fn data(&self) -> &Map<String, Value> {
        self.inner.data()
    }
}

/// Loose emptiness of a body field: null, `false`, `0`, `0.0`, `""`, `"0"`
/// and empty collections.
pub(crate) fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n == 0.0),
        Value::String(text) => text.is_empty() || text == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn blank_and_bom_prefixed_bodies_are_accepted() {
        assert!(parse_body(b"  \n").unwrap().is_empty());
        let parsed = parse_body(b"\xEF\xBB\xBF{\"OrderCode\":1}").unwrap();
        assert_eq!(parsed.get("OrderCode"), Some(&json!(1)));
    }

    #[test]
    fn non_object_bodies_are_rejected() {
        let raws: [&[u8]; 3] = [b"[1,2]", b"<html>", b"\"text\""];
        for raw in raws {
            assert_eq!(
                parse_body(raw).unwrap_err().current_context(),
                &ConnectorError::ResponseDeserializationFailed
            );
        }
    }

    #[test]
    fn emptiness_follows_loose_rules() {
        for value in [
            json!(null),
            json!(false),
            json!(0),
            json!(0.0),
            json!(""),
            json!("0"),
            json!([]),
            json!({}),
        ] {
            assert!(is_empty(&value), "{value} should be empty");
        }
        for value in [json!(true), json!(403), json!("00"), json!(" "), json!([0])] {
            assert!(!is_empty(&value), "{value} should not be empty");
        }
    }

    #[test]
    fn error_status_is_never_successful() {
        let response = RestResponse::new(500, body(json!({"TransactionId": "abc"})));
        assert!(!response.is_successful());
        assert_eq!(response.code(), "500");
    }

    #[test]
    fn error_code_overrides_ok_status() {
        let response = RestResponse::new(
            200,
            body(json!({"ErrorCode": 403, "ErrorText": "Non reversible transaction"})),
        );
        assert!(!response.is_successful());
        assert_eq!(response.code(), "403");
        assert_eq!(
            response.message().as_deref(),
            Some("Non reversible transaction")
        );
    }

    #[test]
    fn zero_error_code_is_not_an_error() {
        let response = RestResponse::new(200, body(json!({"ErrorCode": 0, "ErrorText": null})));
        assert!(response.is_successful());
        assert_eq!(response.code(), "0");
        assert_eq!(response.message(), None);
    }

    #[test]
    fn message_falls_back_to_message_field() {
        let response = RestResponse::new(404, body(json!({"Message": "Not found"})));
        assert_eq!(response.message().as_deref(), Some("Not found"));
    }

    #[test]
    fn transaction_id_wins_over_order_code() {
        let response = RestResponse::new(
            200,
            body(json!({"TransactionId": "d051e50c", "OrderCode": 7685364763872608_u64})),
        );
        assert_eq!(response.transaction_reference().as_deref(), Some("d051e50c"));

        let response = RestResponse::new(
            200,
            body(json!({"TransactionId": "", "OrderCode": 7685364763872608_u64})),
        );
        assert_eq!(
            response.transaction_reference().as_deref(),
            Some("7685364763872608")
        );

        assert_eq!(RestResponse::new(200, Map::new()).transaction_reference(), None);
    }

    #[test]
    fn created_order_redirects_to_checkout() {
        let response = RedirectResponse::new(
            RestResponse::new(200, body(json!({"OrderCode": "7685364763872608"}))),
            "http://demo.vivapayments.com",
        );
        assert!(response.is_redirect());
        assert!(!response.is_successful());
        assert_eq!(
            response.redirect_url().as_deref(),
            Some("http://demo.vivapayments.com/web/checkout?ref=7685364763872608")
        );
        assert_eq!(
            response.redirect_method(),
            common_utils::request::Method::Get
        );
        assert!(response.redirect_data().is_empty());
    }

    #[test]
    fn rejected_order_does_not_redirect() {
        let response = RedirectResponse::new(
            RestResponse::new(401, Map::new()),
            "http://demo.vivapayments.com",
        );
        assert!(!response.is_redirect());
        assert!(!response.is_successful());
        assert_eq!(response.code(), "401");
        assert_eq!(response.redirect_url(), None);
    }
}
