use common_enums::Currency;
use common_utils::types::StringMajorUnit;
use hyperswitch_masking::Secret;
use serde::{Deserialize, Serialize};

use crate::types::Connectors;

/// Data shared by every payment flow of a connector call.
#[derive(Debug, Clone)]
pub struct PaymentFlowData {
    pub connectors: Connectors,
    pub test_mode: bool,
}

impl PaymentFlowData {
    pub fn new(connectors: Connectors, test_mode: bool) -> Self {
        Self {
            connectors,
            test_mode,
        }
    }
}

/// Merchant supplied parameters of a single operation.
///
/// Every field is optional; each flow checks the subset it needs before any
/// request leaves the process.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RequestParameters {
    /// Amount in the major unit, e.g. `"10.00"`.
    pub amount: Option<StringMajorUnit>,
    /// Currency of `amount`; EUR when absent.
    pub currency: Option<Currency>,
    /// Merchant side reference of the payment.
    pub transaction_id: Option<String>,
    /// Gateway side reference: a transaction id or an order code.
    pub transaction_reference: Option<String>,
    /// Token of a card stored with the gateway.
    pub card_reference: Option<Secret<String>>,
    pub description: Option<String>,
    pub source_code: Option<String>,
    pub request_lang: Option<String>,
    pub date: Option<String>,
    pub clearance_date: Option<String>,
}

impl RequestParameters {
    pub fn get_currency(&self) -> Currency {
        self.currency.unwrap_or_default()
    }
}

/// Order creation, for hosted and native checkouts alike.
#[derive(Debug, Clone)]
pub struct OrderRequestData {
    pub params: RequestParameters,
    /// Holds the funds instead of capturing them.
    pub is_pre_auth: bool,
}

/// Card charge against an order created in an earlier step.
#[derive(Debug, Clone)]
pub struct TransactionRequestData {
    pub params: RequestParameters,
    pub is_pre_auth: bool,
    pub order_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_defaults_to_euro() {
        assert_eq!(RequestParameters::default().get_currency(), Currency::EUR);

        let params = RequestParameters {
            currency: Some(Currency::RON),
            ..RequestParameters::default()
        };
        assert_eq!(params.get_currency(), Currency::RON);
    }

    #[test]
    fn parameters_deserialize_from_snake_case_keys() {
        let params: RequestParameters = serde_json::from_value(serde_json::json!({
            "amount": "10.00",
            "currency": "EUR",
            "transaction_reference": "d051e50c-ad9e-4218-b635-edccb36fe71a",
            "request_lang": "en-US"
        }))
        .unwrap();

        assert_eq!(params.amount, Some(StringMajorUnit::from("10.00")));
        assert_eq!(
            params.transaction_reference.as_deref(),
            Some("d051e50c-ad9e-4218-b635-edccb36fe71a")
        );
        assert!(params.card_reference.is_none());
    }
}
