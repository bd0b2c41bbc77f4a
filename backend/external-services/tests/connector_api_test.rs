#![allow(clippy::unwrap_used)]

use common_utils::request::{Method, RequestBuilder, RequestContent};
use domain_types::{errors::ApiClientError, types::Proxy};
use external_services::call_connector_api;
use httpmock::prelude::*;
use hyperswitch_masking::Mask;
use serde_json::json;

#[tokio::test]
async fn json_body_and_headers_reach_the_server() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/orders")
                .header("Authorization", "Basic c2VjcmV0")
                .json_body(json!({"Amount": 1000}));
            then.status(200).json_body(json!({"OrderCode": 1}));
        })
        .await;

    let request = RequestBuilder::new()
        .method(Method::Post)
        .url(&format!("{}/api/orders", server.base_url()))
        .headers(vec![(
            "Authorization".to_string(),
            "Basic c2VjcmV0".to_string().into_masked(),
        )])
        .set_body(RequestContent::Json(Box::new(json!({"Amount": 1000}))))
        .build();

    let response = call_connector_api(&Proxy::default(), request, "CreateOrder")
        .await
        .unwrap()
        .unwrap();

    mock.assert_hits_async(1).await;
    assert_eq!(response.status_code, 200);
    assert_eq!(&response.response[..], br#"{"OrderCode":1}"#);
}

#[tokio::test]
async fn client_errors_are_returned_as_data() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/transactions/abc");
            then.status(403).body("");
        })
        .await;

    let request = RequestBuilder::new()
        .method(Method::Delete)
        .url(&format!("{}/api/transactions/abc?Amount=100", server.base_url()))
        .build();

    let response = call_connector_api(&Proxy::default(), request, "Refund")
        .await
        .unwrap()
        .unwrap_err();

    assert_eq!(response.status_code, 403);
    assert!(response.response.is_empty());
}

#[tokio::test]
async fn invalid_url_is_rejected_before_sending() {
    let request = RequestBuilder::new()
        .method(Method::Get)
        .url("not a url")
        .build();

    let error = call_connector_api(&Proxy::default(), request, "FetchTransactions")
        .await
        .unwrap_err();

    assert_eq!(error.current_context(), &ApiClientError::UrlEncodingFailed);
}
