use std::{str::FromStr, time::Duration};

use common_utils::{
    ext_traits::ByteSliceExt,
    request::{Headers, Method, Request, RequestContent},
    CustomResult,
};
use domain_types::{
    errors::{ApiClientError, ConnectorError},
    router_data_v2::RouterDataV2,
    router_response_types::Response,
    types::Proxy,
};
use error_stack::{report, ResultExt};
use hyperswitch_masking::{ErasedMaskSerialize, Maskable};
use interfaces::connector_integration_v2::BoxedConnectorIntegrationV2;
use once_cell::sync::OnceCell;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::field::Empty;

use crate::shared_metrics as metrics;

const MASKED_HEADER_VALUE: &str = "*** alloc::string::String ***";

/// Builds the connector request for one flow, sends it and lets the connector
/// turn the raw HTTP answer into the flow response.
///
/// Every HTTP status reaches the connector; only transport failures end up in
/// the error branch, as [`ConnectorError::ProcessingStepFailed`].
#[tracing::instrument(
    name = "execute_connector_processing_step",
    skip_all,
    fields(
        connector = connector_name,
        flow = flow_name,
        request.headers = Empty,
        request.body = Empty,
        request.url = Empty,
        request.method = Empty,
        response.body = Empty,
        response.headers = Empty,
        response.status_code = Empty,
        message_ = "Golden Log Line (outgoing)",
        latency = Empty,
    )
)]
pub async fn execute_connector_processing_step<F, ResourceCommonData, Req, Resp>(
    proxy: &Proxy,
    connector: BoxedConnectorIntegrationV2<'_, F, ResourceCommonData, Req, Resp>,
    router_data: RouterDataV2<F, ResourceCommonData, Req, Resp>,
    connector_name: &str,
    flow_name: &str,
) -> CustomResult<RouterDataV2<F, ResourceCommonData, Req, Resp>, ConnectorError>
where
    F: Clone,
    ResourceCommonData: Clone,
    Req: Clone + std::fmt::Debug,
    Resp: Clone + std::fmt::Debug,
{
    let start = tokio::time::Instant::now();
    let connector_request = connector.build_request_v2(&router_data)?;

    let headers_for_logging = connector_request
        .as_ref()
        .map(|connector_request| mask_headers(&connector_request.headers))
        .unwrap_or(Value::Null);
    tracing::Span::current().record(
        "request.headers",
        tracing::field::display(&headers_for_logging),
    );

    let masked_request = connector_request
        .as_ref()
        .map(|connector_request| match connector_request.body.as_ref() {
            Some(RequestContent::Json(i)) => (**i)
                .masked_serialize()
                .unwrap_or(json!({ "error": "failed to mask serialize connector request"})),
            None => Value::Null,
        });
    if let Some(masked_request) = masked_request.as_ref() {
        tracing::info!(request = %masked_request, "request of connector");
        tracing::Span::current().record("request.body", tracing::field::display(masked_request));
    }

    let result = match connector_request {
        Some(request) => {
            let url = request.url.clone();
            let method = request.method;
            let method_label = method.to_string();
            metrics::EXTERNAL_SERVICE_TOTAL_API_CALLS
                .with_label_values(&[&method_label, flow_name, connector_name])
                .inc();
            tracing::Span::current().record("request.url", tracing::field::display(&url));
            tracing::Span::current().record("request.method", tracing::field::display(method));

            let external_service_start_latency = tokio::time::Instant::now();
            let response = call_connector_api(proxy, request, flow_name).await;
            metrics::EXTERNAL_SERVICE_API_CALLS_LATENCY
                .with_label_values(&[&method_label, flow_name, connector_name])
                .observe(external_service_start_latency.elapsed().as_secs_f64());

            match response {
                Ok(body) => {
                    let body = match body {
                        Ok(body) => body,
                        Err(body) => {
                            metrics::EXTERNAL_SERVICE_API_CALLS_ERRORS
                                .with_label_values(&[
                                    &method_label,
                                    flow_name,
                                    connector_name,
                                    body.status_code.to_string().as_str(),
                                ])
                                .inc();
                            body
                        }
                    };
                    record_response(&body);
                    connector.handle_response_v2(&router_data, body)
                }
                Err(err) => {
                    info_log(
                        "NETWORK_ERROR",
                        &json!(format!(
                            "Failed getting response from connector. Error: {:?}",
                            err
                        )),
                    );
                    Err(err.change_context(ConnectorError::ProcessingStepFailed(None)))
                }
            }
        }
        None => Ok(router_data),
    };

    tracing::Span::current().record("latency", start.elapsed().as_millis());
    tracing::info!(tag = ?Tag::OutgoingApi, log_type = "api", "Outgoing Request completed");
    result
}

fn mask_headers(headers: &Headers) -> Value {
    let masked_headers = headers
        .iter()
        .fold(serde_json::Map::new(), |mut acc, (k, v)| {
            let value = match v {
                Maskable::Masked(_) => Value::String(MASKED_HEADER_VALUE.to_string()),
                Maskable::Normal(iv) => Value::String(iv.to_owned()),
            };
            acc.insert(k.clone(), value);
            acc
        });
    Value::Object(masked_headers)
}

fn record_response(body: &Response) {
    let span = tracing::Span::current();
    span.record(
        "response.status_code",
        tracing::field::display(body.status_code),
    );

    let headers = body.headers.clone().unwrap_or_default();
    let header_map = headers
        .iter()
        .fold(serde_json::Map::new(), |mut acc, (left, right)| {
            let header_value = if right.is_sensitive() {
                Value::String(MASKED_HEADER_VALUE.to_string())
            } else if let Ok(x) = right.to_str() {
                Value::String(x.to_string())
            } else {
                return acc;
            };
            acc.insert(left.as_str().to_string(), header_value);
            acc
        });
    span.record(
        "response.headers",
        tracing::field::display(Value::Object(header_map)),
    );

    if let Ok(response) = body.response[..].parse_struct::<Value>("Value") {
        span.record("response.body", tracing::field::display(response));
    }
}

/// Sends a request over HTTP.
///
/// `Ok(Ok(_))` carries 1xx-3xx answers, `Ok(Err(_))` carries 4xx and 5xx
/// answers; the outer error is reserved for requests that never got one.
pub async fn call_connector_api(
    proxy: &Proxy,
    request: Request,
    flow_name: &str,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let url =
        reqwest::Url::parse(&request.url).change_context(ApiClientError::UrlEncodingFailed)?;

    let should_bypass_proxy = proxy.bypass_proxy_urls.contains(&url.to_string());

    let client = create_client(proxy, should_bypass_proxy)?;

    let headers = request.headers.construct_header_map()?;

    let request_builder = match request.method {
        Method::Get => client.get(url),
        Method::Post => client.post(url),
        Method::Delete => client.delete(url),
    };
    let request_builder = match request.body {
        Some(RequestContent::Json(payload)) => request_builder.json(&payload),
        None => request_builder,
    }
    .add_headers(headers);

    let response = request_builder.send().await.map_err(|error| {
        let api_error = match error {
            error if error.is_timeout() => ApiClientError::RequestTimeoutReceived,
            _ => ApiClientError::RequestNotSent(error.to_string()),
        };
        info_log(
            "REQUEST_FAILURE",
            &json!(format!("Unable to send request to connector for {flow_name}.")),
        );
        report!(api_error)
    })?;

    handle_response(response).await
}

static NON_PROXIED_CLIENT: OnceCell<Client> = OnceCell::new();
static PROXIED_CLIENT: OnceCell<Client> = OnceCell::new();

pub fn create_client(
    proxy_config: &Proxy,
    should_bypass_proxy: bool,
) -> CustomResult<Client, ApiClientError> {
    Ok(if proxy_config.is_proxy_configured(should_bypass_proxy) {
        &PROXIED_CLIENT
    } else {
        &NON_PROXIED_CLIENT
    }
    .get_or_try_init(|| {
        get_client_builder(proxy_config, should_bypass_proxy)?
            .build()
            .change_context(ApiClientError::ClientConstructionFailed)
            .inspect_err(|err| {
                info_log(
                    "ERROR",
                    &json!(format!("Failed to construct base client. Error: {:?}", err)),
                );
            })
    })?
    .clone())
}

fn get_client_builder(
    proxy_config: &Proxy,
    should_bypass_proxy: bool,
) -> CustomResult<reqwest::ClientBuilder, ApiClientError> {
    let mut client_builder = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_idle_timeout(Duration::from_secs(
            proxy_config
                .idle_pool_connection_timeout
                .unwrap_or_default(),
        ));

    if should_bypass_proxy {
        return Ok(client_builder);
    }

    // Proxy all HTTPS traffic through the configured HTTPS proxy
    if let Some(url) = proxy_config.https_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::https(url)
                .change_context(ApiClientError::InvalidProxyConfiguration)
                .inspect_err(|err| {
                    info_log(
                        "PROXY_ERROR",
                        &json!(format!("HTTPS proxy configuration error. Error: {:?}", err)),
                    );
                })?,
        );
    }

    // Proxy all HTTP traffic through the configured HTTP proxy
    if let Some(url) = proxy_config.http_url.as_ref() {
        client_builder = client_builder.proxy(
            reqwest::Proxy::http(url)
                .change_context(ApiClientError::InvalidProxyConfiguration)
                .inspect_err(|err| {
                    info_log(
                        "PROXY_ERROR",
                        &json!(format!("HTTP proxy configuration error. Error: {:?}", err)),
                    );
                })?,
        );
    }

    Ok(client_builder)
}

async fn handle_response(
    resp: reqwest::Response,
) -> CustomResult<Result<Response, Response>, ApiClientError> {
    let status_code = resp.status().as_u16();
    let headers = Some(resp.headers().to_owned());
    match status_code {
        100..=399 => {
            let response = resp
                .bytes()
                .await
                .change_context(ApiClientError::ResponseDecodingFailed)?;
            Ok(Ok(Response {
                headers,
                response,
                status_code,
            }))
        }
        400..=599 => {
            let bytes = resp
                .bytes()
                .await
                .change_context(ApiClientError::ResponseDecodingFailed)?;

            Ok(Err(Response {
                headers,
                response: bytes,
                status_code,
            }))
        }
        _ => {
            info_log(
                "UNEXPECTED_RESPONSE",
                &json!("Unexpected response from server."),
            );
            Err(report!(ApiClientError::UnexpectedServerResponse))
        }
    }
}

pub(super) trait HeaderExt {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError>;
}

impl HeaderExt for Headers {
    fn construct_header_map(self) -> CustomResult<reqwest::header::HeaderMap, ApiClientError> {
        use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

        self.into_iter().try_fold(
            HeaderMap::new(),
            |mut header_map, (header_name, header_value)| {
                let header_name = HeaderName::from_str(&header_name)
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                let is_sensitive = matches!(header_value, Maskable::Masked(_));
                let mut header_value = HeaderValue::from_str(&header_value.into_inner())
                    .change_context(ApiClientError::HeaderMapConstructionFailed)?;
                header_value.set_sensitive(is_sensitive);
                header_map.append(header_name, header_value);
                Ok(header_map)
            },
        )
    }
}

pub(super) trait RequestBuilderExt {
    fn add_headers(self, headers: reqwest::header::HeaderMap) -> Self;
}

impl RequestBuilderExt for reqwest::RequestBuilder {
    fn add_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self = self.headers(headers);
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Tag {
    /// Api Outgoing Request
    OutgoingApi,
}

#[inline]
pub fn info_log(action: &str, message: &Value) {
    tracing::info!(tags = %action, json_value= %message);
}

#[cfg(test)]
mod tests {
    use hyperswitch_masking::Mask;

    use super::*;

    #[test]
    fn masked_headers_hide_secret_values() {
        let headers: Headers = [
            ("Accept".to_string(), "application/json".to_string().into()),
            (
                "Authorization".to_string(),
                "Basic c2VjcmV0".to_string().into_masked(),
            ),
        ]
        .into_iter()
        .collect();

        let masked = mask_headers(&headers);
        assert_eq!(masked["Accept"], json!("application/json"));
        assert_eq!(masked["Authorization"], json!(MASKED_HEADER_VALUE));
    }

    #[test]
    fn header_map_marks_masked_values_sensitive() {
        let headers: Headers = [(
            "Authorization".to_string(),
            "Basic c2VjcmV0".to_string().into_masked(),
        )]
        .into_iter()
        .collect();

        let header_map = headers.construct_header_map().unwrap();
        let value = header_map.get("Authorization").unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().unwrap(), "Basic c2VjcmV0");
    }

    #[test]
    fn invalid_header_name_is_rejected() {
        let headers: Headers = [("bad header".to_string(), "x".to_string().into())]
            .into_iter()
            .collect();
        let error = headers.construct_header_map().unwrap_err();
        assert_eq!(
            error.current_context(),
            &ApiClientError::HeaderMapConstructionFailed
        );
    }
}
