#[cfg(test)]
mod tests {
    use common_utils::{
        request::{Method, Request},
        types::StringMajorUnit,
    };
    use domain_types::{
        connector_flow::{
            CreateOrder, CreateTransaction, FetchTransactions, RedirectCheckout, Refund,
        },
        connector_types::{
            OrderRequestData, PaymentFlowData, RequestParameters, TransactionRequestData,
        },
        errors::ConnectorError,
        router_data::ConnectorAuthType,
        router_data_v2::RouterDataV2,
        router_response_types::Response,
        types::Connectors,
    };
    use hyperswitch_masking::{Maskable, PeekInterface, Secret};
    use interfaces::connector_integration_v2::ConnectorIntegrationV2;
    use serde_json::{json, Value};

    use crate::connectors::vivapayments::{
        transformers::VivapaymentsAuthType, RedirectResponse, RestResponse, Vivapayments,
    };

    fn auth() -> ConnectorAuthType {
        ConnectorAuthType::BodyKey {
            api_key: Secret::new("apikey".to_string()),
            key1: Secret::new("merchant".to_string()),
        }
    }

    fn params() -> RequestParameters {
        RequestParameters {
            amount: Some(StringMajorUnit::from("10.00")),
            ..RequestParameters::default()
        }
    }

    fn router_data<F, Req, Resp>(
        request: Req,
        test_mode: bool,
    ) -> RouterDataV2<F, PaymentFlowData, Req, Resp> {
        RouterDataV2::new(
            PaymentFlowData::new(Connectors::default(), test_mode),
            auth(),
            request,
        )
    }

    fn json_body(request: &Request) -> Value {
        let body = request
            .body
            .as_ref()
            .map(|body| body.get_inner_value().peek().clone())
            .unwrap_or_default();
        serde_json::from_str(&body).unwrap()
    }

    fn header<'a>(request: &'a Request, name: &str) -> Option<&'a Maskable<String>> {
        request
            .headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    fn ok_response(status_code: u16, body: Value) -> Response {
        Response {
            headers: None,
            response: body.to_string().into(),
            status_code,
        }
    }

    #[test]
    fn test_vivapayments_auth_type_conversion() {
        let vivapayments_auth = VivapaymentsAuthType::try_from(&auth()).unwrap();
        assert_eq!(vivapayments_auth.merchant_id.peek(), "merchant");
        assert_eq!(vivapayments_auth.api_key.peek(), "apikey");
    }

    #[test]
    fn test_vivapayments_auth_type_invalid_conversion() {
        let auth_type = ConnectorAuthType::HeaderKey {
            api_key: Secret::new("test_key".to_string()),
        };
        let error = VivapaymentsAuthType::try_from(&auth_type).err().unwrap();
        assert_eq!(error.current_context(), &ConnectorError::FailedToObtainAuthType);
    }

    #[test]
    fn redirect_checkout_posts_order_with_basic_auth() {
        let data: RouterDataV2<RedirectCheckout, _, _, RedirectResponse> = router_data(
            OrderRequestData {
                params: RequestParameters {
                    transaction_id: Some("order-42".to_string()),
                    description: Some("Two tickets".to_string()),
                    ..params()
                },
                is_pre_auth: false,
            },
            true,
        );
        let request = Vivapayments::new()
            .build_request_v2(&data)
            .unwrap()
            .unwrap();

        assert_eq!(request.method, Method::Post);
        assert_eq!(request.url, "http://demo.vivapayments.com/api/Orders");
        assert_eq!(
            json_body(&request),
            json!({"Amount": 1000, "MerchantTrns": "order-42", "CustomerTrns": "Two tickets"})
        );
        assert_eq!(
            header(&request, "Authorization"),
            Some(&Maskable::new_masked(Secret::new(
                "Basic bWVyY2hhbnQ6YXBpa2V5".to_string()
            )))
        );
        assert_eq!(
            header(&request, "Content-Type"),
            Some(&Maskable::new_normal("application/json".to_string()))
        );
    }

    #[test]
    fn pre_auth_flag_is_sent_only_for_authorizations() {
        let data: RouterDataV2<CreateOrder, _, _, RestResponse> = router_data(
            OrderRequestData {
                params: params(),
                is_pre_auth: true,
            },
            false,
        );
        let request = Vivapayments::new()
            .build_request_v2(&data)
            .unwrap()
            .unwrap();

        assert_eq!(request.url, "https://www.vivapayments.com/api/orders");
        assert_eq!(json_body(&request), json!({"isPreAuth": true, "Amount": 1000}));
    }

    #[test]
    fn transaction_carries_order_code_and_card_token() {
        let data: RouterDataV2<CreateTransaction, _, _, RestResponse> = router_data(
            TransactionRequestData {
                params: RequestParameters {
                    card_reference: Some(Secret::new("card-token".to_string())),
                    request_lang: Some("el-GR".to_string()),
                    ..params()
                },
                is_pre_auth: false,
                order_code: "175936509216".to_string(),
            },
            true,
        );
        let request = Vivapayments::new()
            .build_request_v2(&data)
            .unwrap()
            .unwrap();

        assert_eq!(request.url, "http://demo.vivapayments.com/api/transactions");
        assert_eq!(
            json_body(&request),
            json!({
                "Amount": 1000,
                "OrderCode": "175936509216",
                "CreditCard": {"Token": "card-token"},
                "RequestLang": "el-GR"
            })
        );
    }

    #[test]
    fn refund_sends_query_without_body() {
        let data: RouterDataV2<Refund, _, _, RestResponse> = router_data(
            RequestParameters {
                transaction_reference: Some("d051e50c-ad9e-4218-b635-edccb36fe71a".to_string()),
                description: Some("admin".to_string()),
                ..params()
            },
            true,
        );
        let request = Vivapayments::new()
            .build_request_v2(&data)
            .unwrap()
            .unwrap();

        assert_eq!(request.method, Method::Delete);
        assert_eq!(
            request.url,
            "http://demo.vivapayments.com/api/transactions/d051e50c-ad9e-4218-b635-edccb36fe71a?Amount=1000&ActionUser=admin&CustomerTrns=admin"
        );
        assert!(request.body.is_none());
        assert!(header(&request, "Content-Type").is_none());
        assert!(header(&request, "Accept").is_some());
    }

    #[test]
    fn refund_requires_amount_and_reference() {
        let without_reference: RouterDataV2<Refund, _, _, RestResponse> =
            router_data(params(), true);
        let error = Vivapayments::new()
            .build_request_v2(&without_reference)
            .unwrap_err();
        assert_eq!(
            error.current_context(),
            &ConnectorError::MissingRequiredField {
                field_name: "transaction_reference"
            }
        );

        let without_amount: RouterDataV2<Refund, _, _, RestResponse> = router_data(
            RequestParameters {
                transaction_reference: Some("abc".to_string()),
                ..RequestParameters::default()
            },
            true,
        );
        let error = Vivapayments::new()
            .build_request_v2(&without_amount)
            .unwrap_err();
        assert_eq!(
            error.current_context(),
            &ConnectorError::MissingRequiredField {
                field_name: "amount"
            }
        );
    }

    #[test]
    fn fetch_transactions_builds_list_url_and_filters() {
        let data: RouterDataV2<FetchTransactions, _, _, RestResponse> = router_data(
            RequestParameters {
                date: Some("2015-04-01".to_string()),
                transaction_id: Some("175936509216".to_string()),
                ..RequestParameters::default()
            },
            true,
        );
        let request = Vivapayments::new()
            .build_request_v2(&data)
            .unwrap()
            .unwrap();

        assert_eq!(request.method, Method::Get);
        assert_eq!(
            request.url,
            "http://demo.vivapayments.com/api/transactions/?date=2015-04-01&ordercode=175936509216&MerchantTrns=175936509216"
        );
        assert!(request.body.is_none());
        assert!(header(&request, "Content-Type").is_none());
        assert!(header(&request, "Authorization").is_some());
    }

    #[test]
    fn fetch_single_transaction_without_filters() {
        let data: RouterDataV2<FetchTransactions, _, _, RestResponse> = router_data(
            RequestParameters {
                transaction_reference: Some("252b950e-27f2-4300-ada1-4dedd7c17904".to_string()),
                ..RequestParameters::default()
            },
            false,
        );
        let request = Vivapayments::new()
            .build_request_v2(&data)
            .unwrap()
            .unwrap();

        assert_eq!(
            request.url,
            "https://www.vivapayments.com/api/transactions/252b950e-27f2-4300-ada1-4dedd7c17904"
        );
    }

    #[test]
    fn negative_amount_is_rejected_before_sending() {
        let data: RouterDataV2<CreateOrder, _, _, RestResponse> = router_data(
            OrderRequestData {
                params: RequestParameters {
                    amount: Some(StringMajorUnit::from("-1.00")),
                    ..RequestParameters::default()
                },
                is_pre_auth: false,
            },
            true,
        );
        let error = Vivapayments::new().build_request_v2(&data).unwrap_err();
        assert_eq!(
            error.current_context(),
            &ConnectorError::InvalidDataFormat {
                field_name: "amount"
            }
        );
    }

    #[test]
    fn amount_overflowing_minor_units_is_rejected_before_sending() {
        let data: RouterDataV2<RedirectCheckout, _, _, RedirectResponse> = router_data(
            OrderRequestData {
                params: RequestParameters {
                    amount: Some(StringMajorUnit::from("79228162514264337593543950335")),
                    ..RequestParameters::default()
                },
                is_pre_auth: false,
            },
            false,
        );
        let error = Vivapayments::new().build_request_v2(&data).unwrap_err();
        assert_eq!(
            error.current_context(),
            &ConnectorError::InvalidDataFormat {
                field_name: "amount"
            }
        );
    }

    #[test]
    fn server_error_is_classified_not_raised() {
        let data: RouterDataV2<CreateTransaction, _, _, RestResponse> = router_data(
            TransactionRequestData {
                params: params(),
                is_pre_auth: false,
                order_code: "175936509216".to_string(),
            },
            true,
        );
        let handled = Vivapayments::new()
            .handle_response_v2(
                &data,
                ok_response(500, json!({"ErrorCode": 500, "ErrorText": "Internal error"})),
            )
            .unwrap();
        let response = handled.response.unwrap();

        assert!(!response.is_successful());
        assert_eq!(response.status_code(), 500);
        assert_eq!(response.message().as_deref(), Some("Internal error"));
    }

    #[test]
    fn redirect_response_uses_environment_root() {
        let data: RouterDataV2<RedirectCheckout, _, _, RedirectResponse> = router_data(
            OrderRequestData {
                params: params(),
                is_pre_auth: false,
            },
            true,
        );
        let handled = Vivapayments::new()
            .handle_response_v2(&data, ok_response(200, json!({"OrderCode": "7685364763872608"})))
            .unwrap();
        let response = handled.response.unwrap();

        assert!(response.is_redirect());
        assert_eq!(
            response.redirect_url().as_deref(),
            Some("http://demo.vivapayments.com/web/checkout?ref=7685364763872608")
        );
    }

    #[test]
    fn empty_error_body_keeps_status_code() {
        let data: RouterDataV2<Refund, _, _, RestResponse> = router_data(params(), true);
        let handled = Vivapayments::new()
            .handle_response_v2(
                &data,
                Response {
                    headers: None,
                    response: "".into(),
                    status_code: 401,
                },
            )
            .unwrap();
        let response = handled.response.unwrap();

        assert!(!response.is_successful());
        assert_eq!(response.code(), "401");
        assert!(response.data().is_empty());
    }
}
