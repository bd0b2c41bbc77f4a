pub mod responses;
pub mod transformers;

#[cfg(test)]
mod test;

use base64::Engine;
use common_utils::{
    consts::BASE64_ENGINE,
    errors::CustomResult,
    ext_traits::Encode,
    request::{Method, RequestContent},
};
use domain_types::{
    connector_flow::{CreateOrder, CreateTransaction, FetchTransactions, RedirectCheckout, Refund},
    connector_types::{
        OrderRequestData, PaymentFlowData, RequestParameters, TransactionRequestData,
    },
    errors::ConnectorError,
    router_data::ConnectorAuthType,
    router_data_v2::RouterDataV2,
    router_response_types::Response,
    types::Connectors,
};
use error_stack::ResultExt;
use hyperswitch_masking::{Mask, Maskable, PeekInterface};
use interfaces::{api::ConnectorCommon, connector_integration_v2::ConnectorIntegrationV2};
use serde::Serialize;

pub use self::responses::{RedirectResponse, RestResponse};
use self::transformers::{
    get_transaction_reference, to_response_router_data, VivapaymentsAuthType,
    VivapaymentsFetchTransactionsRequest, VivapaymentsOrderRequest, VivapaymentsRefundRequest,
    VivapaymentsTransactionRequest,
};

pub(crate) mod headers {
    pub const ACCEPT: &str = "Accept";
    pub const AUTHORIZATION: &str = "Authorization";
    pub const CONTENT_TYPE: &str = "Content-Type";
}

const API_PATH: &str = "/api";

#[derive(Clone, Copy, Debug, Default)]
pub struct Vivapayments;

impl Vivapayments {
    pub const fn new() -> &'static Self {
        &Self
    }

    /// API root of the environment the merchant runs in.
    pub fn connector_base_url<'a, F, Req, Res>(
        &self,
        req: &'a RouterDataV2<F, PaymentFlowData, Req, Res>,
    ) -> &'a str {
        self.base_url(
            &req.resource_common_data.connectors,
            req.resource_common_data.test_mode,
        )
        .trim_end_matches('/')
    }

    fn api_endpoint<F, Req, Res>(
        &self,
        req: &RouterDataV2<F, PaymentFlowData, Req, Res>,
    ) -> String {
        format!("{}{API_PATH}", self.connector_base_url(req))
    }

    /// `Accept` and Basic auth on every call; `Content-Type` only on calls
    /// carrying a JSON body.
    pub fn build_headers<F, Req, Res>(
        &self,
        req: &RouterDataV2<F, PaymentFlowData, Req, Res>,
        method: Method,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, ConnectorError> {
        let content_type = self.common_get_content_type().to_string();
        let mut header = vec![(headers::ACCEPT.to_string(), content_type.clone().into())];
        if method == Method::Post {
            header.push((headers::CONTENT_TYPE.to_string(), content_type.into()));
        }
        let mut auth = self.get_auth_header(&req.connector_auth_type)?;
        header.append(&mut auth);
        Ok(header)
    }
}

fn with_query<T: Serialize + std::fmt::Debug>(
    url: String,
    query: &T,
) -> CustomResult<String, ConnectorError> {
    let query = query
        .url_encode()
        .change_context(ConnectorError::RequestEncodingFailed)?;
    if query.is_empty() {
        Ok(url)
    } else {
        Ok(format!("{url}?{query}"))
    }
}

impl ConnectorCommon for Vivapayments {
    fn id(&self) -> &'static str {
        "vivapayments"
    }

    fn base_url<'a>(&self, connectors: &'a Connectors, test_mode: bool) -> &'a str {
        connectors.vivapayments.base_url_for(test_mode)
    }

    fn get_auth_header(
        &self,
        auth_type: &ConnectorAuthType,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, ConnectorError> {
        let auth = VivapaymentsAuthType::try_from(auth_type)?;
        let encoded = BASE64_ENGINE.encode(format!(
            "{}:{}",
            auth.merchant_id.peek(),
            auth.api_key.peek()
        ));
        Ok(vec![(
            headers::AUTHORIZATION.to_string(),
            format!("Basic {encoded}").into_masked(),
        )])
    }
}

impl ConnectorIntegrationV2<RedirectCheckout, PaymentFlowData, OrderRequestData, RedirectResponse>
    for Vivapayments
{
    fn get_headers(
        &self,
        req: &RouterDataV2<RedirectCheckout, PaymentFlowData, OrderRequestData, RedirectResponse>,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, ConnectorError> {
        self.build_headers(req, Method::Post)
    }

    fn get_url(
        &self,
        req: &RouterDataV2<RedirectCheckout, PaymentFlowData, OrderRequestData, RedirectResponse>,
    ) -> CustomResult<String, ConnectorError> {
        Ok(format!("{}/Orders", self.api_endpoint(req)))
    }

    fn get_request_body(
        &self,
        req: &RouterDataV2<RedirectCheckout, PaymentFlowData, OrderRequestData, RedirectResponse>,
    ) -> CustomResult<Option<RequestContent>, ConnectorError> {
        let connector_req = VivapaymentsOrderRequest::try_from(req)?;
        Ok(Some(RequestContent::Json(Box::new(connector_req))))
    }

    fn handle_response_v2(
        &self,
        data: &RouterDataV2<RedirectCheckout, PaymentFlowData, OrderRequestData, RedirectResponse>,
        res: Response,
    ) -> CustomResult<
        RouterDataV2<RedirectCheckout, PaymentFlowData, OrderRequestData, RedirectResponse>,
        ConnectorError,
    > {
        RouterDataV2::try_from(to_response_router_data(data, &res)?)
    }
}

impl ConnectorIntegrationV2<CreateOrder, PaymentFlowData, OrderRequestData, RestResponse>
    for Vivapayments
{
    fn get_headers(
        &self,
        req: &RouterDataV2<CreateOrder, PaymentFlowData, OrderRequestData, RestResponse>,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, ConnectorError> {
        self.build_headers(req, Method::Post)
    }

    fn get_url(
        &self,
        req: &RouterDataV2<CreateOrder, PaymentFlowData, OrderRequestData, RestResponse>,
    ) -> CustomResult<String, ConnectorError> {
        Ok(format!("{}/orders", self.api_endpoint(req)))
    }

    fn get_request_body(
        &self,
        req: &RouterDataV2<CreateOrder, PaymentFlowData, OrderRequestData, RestResponse>,
    ) -> CustomResult<Option<RequestContent>, ConnectorError> {
        let connector_req = VivapaymentsOrderRequest::try_from(req)?;
        Ok(Some(RequestContent::Json(Box::new(connector_req))))
    }

    fn handle_response_v2(
        &self,
        data: &RouterDataV2<CreateOrder, PaymentFlowData, OrderRequestData, RestResponse>,
        res: Response,
    ) -> CustomResult<
        RouterDataV2<CreateOrder, PaymentFlowData, OrderRequestData, RestResponse>,
        ConnectorError,
    > {
        RouterDataV2::try_from(to_response_router_data(data, &res)?)
    }
}

impl
    ConnectorIntegrationV2<
        CreateTransaction,
        PaymentFlowData,
        TransactionRequestData,
        RestResponse,
    > for Vivapayments
{
    fn get_headers(
        &self,
        req: &RouterDataV2<
            CreateTransaction,
            PaymentFlowData,
            TransactionRequestData,
            RestResponse,
        >,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, ConnectorError> {
        self.build_headers(req, Method::Post)
    }

    fn get_url(
        &self,
        req: &RouterDataV2<
            CreateTransaction,
            PaymentFlowData,
            TransactionRequestData,
            RestResponse,
        >,
    ) -> CustomResult<String, ConnectorError> {
        Ok(format!("{}/transactions", self.api_endpoint(req)))
    }

    fn get_request_body(
        &self,
        req: &RouterDataV2<
            CreateTransaction,
            PaymentFlowData,
            TransactionRequestData,
            RestResponse,
        >,
    ) -> CustomResult<Option<RequestContent>, ConnectorError> {
        let connector_req = VivapaymentsTransactionRequest::try_from(req)?;
        Ok(Some(RequestContent::Json(Box::new(connector_req))))
    }

    fn handle_response_v2(
        &self,
        data: &RouterDataV2<
            CreateTransaction,
            PaymentFlowData,
            TransactionRequestData,
            RestResponse,
        >,
        res: Response,
    ) -> CustomResult<
        RouterDataV2<CreateTransaction, PaymentFlowData, TransactionRequestData, RestResponse>,
        ConnectorError,
    > {
        RouterDataV2::try_from(to_response_router_data(data, &res)?)
    }
}

impl ConnectorIntegrationV2<Refund, PaymentFlowData, RequestParameters, RestResponse>
    for Vivapayments
{
    fn get_headers(
        &self,
        req: &RouterDataV2<Refund, PaymentFlowData, RequestParameters, RestResponse>,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, ConnectorError> {
        self.build_headers(req, <Self as ConnectorIntegrationV2<Refund, PaymentFlowData, RequestParameters, RestResponse>>::get_http_method(self))
    }

    fn get_http_method(&self) -> Method {
        Method::Delete
    }

    fn get_url(
        &self,
        req: &RouterDataV2<Refund, PaymentFlowData, RequestParameters, RestResponse>,
    ) -> CustomResult<String, ConnectorError> {
        let query = VivapaymentsRefundRequest::try_from(req)?;
        let reference = get_transaction_reference(&req.request)?;
        with_query(
            format!("{}/transactions/{reference}", self.api_endpoint(req)),
            &query,
        )
    }

    fn handle_response_v2(
        &self,
        data: &RouterDataV2<Refund, PaymentFlowData, RequestParameters, RestResponse>,
        res: Response,
    ) -> CustomResult<
        RouterDataV2<Refund, PaymentFlowData, RequestParameters, RestResponse>,
        ConnectorError,
    > {
        RouterDataV2::try_from(to_response_router_data(data, &res)?)
    }
}

impl ConnectorIntegrationV2<FetchTransactions, PaymentFlowData, RequestParameters, RestResponse>
    for Vivapayments
{
    fn get_headers(
        &self,
        req: &RouterDataV2<FetchTransactions, PaymentFlowData, RequestParameters, RestResponse>,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, ConnectorError> {
        self.build_headers(req, <Self as ConnectorIntegrationV2<FetchTransactions, PaymentFlowData, RequestParameters, RestResponse>>::get_http_method(self))
    }

    fn get_http_method(&self) -> Method {
        Method::Get
    }

    fn get_url(
        &self,
        req: &RouterDataV2<FetchTransactions, PaymentFlowData, RequestParameters, RestResponse>,
    ) -> CustomResult<String, ConnectorError> {
        let query = VivapaymentsFetchTransactionsRequest::from(req);
        let reference = req
            .request
            .transaction_reference
            .as_deref()
            .filter(|reference| !reference.is_empty())
            .unwrap_or_default();
        with_query(
            format!("{}/transactions/{reference}", self.api_endpoint(req)),
            &query,
        )
    }

    fn handle_response_v2(
        &self,
        data: &RouterDataV2<FetchTransactions, PaymentFlowData, RequestParameters, RestResponse>,
        res: Response,
    ) -> CustomResult<
        RouterDataV2<FetchTransactions, PaymentFlowData, RequestParameters, RestResponse>,
        ConnectorError,
    > {
        RouterDataV2::try_from(to_response_router_data(data, &res)?)
    }
}
