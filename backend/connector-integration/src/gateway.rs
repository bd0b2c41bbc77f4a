//! Merchant facing entry points.
//!
//! A gateway holds the merchant credentials and the environment, and hands
//! out one request object per operation. Nothing goes over the wire until the
//! request object is sent.

pub mod requests;

use common_utils::CustomResult;
use domain_types::{
    connector_types::{PaymentFlowData, RequestParameters},
    errors::ConnectorError,
    router_data::ConnectorAuthType,
    router_data_v2::RouterDataV2,
    types::{Connectors, Proxy},
};
use error_stack::report;
use external_services::{configs::Settings, execute_connector_processing_step};
use hyperswitch_masking::Secret;
use interfaces::{
    api::ConnectorCommon,
    connector_integration_v2::{BoxedConnectorIntegrationV2, ConnectorIntegrationV2},
};

pub use self::requests::{
    FetchTransactionsRequest, NativeCheckoutProgress, NativeCheckoutStage, NativePurchaseRequest,
    NativePurchaseResponse, RedirectPurchaseRequest, RefundRequest,
};
use crate::connectors::Vivapayments;

/// Credentials and environment of a merchant account.
#[derive(Debug, Clone, Default)]
pub struct GatewayParameters {
    pub merchant_id: String,
    pub api_key: Secret<String>,
    /// Targets the demo environment when set.
    pub test_mode: bool,
}

impl GatewayParameters {
    pub fn new(
        merchant_id: impl Into<String>,
        api_key: impl Into<String>,
        test_mode: bool,
    ) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            api_key: Secret::new(api_key.into()),
            test_mode,
        }
    }
}

/// Everything a request object needs to reach the gateway.
#[derive(Debug, Clone, Default)]
pub struct GatewayContext {
    parameters: GatewayParameters,
    connectors: Connectors,
    proxy: Proxy,
}

impl GatewayContext {
    pub fn new(parameters: GatewayParameters) -> Self {
        Self {
            parameters,
            ..Self::default()
        }
    }

    pub fn from_settings(settings: &Settings, parameters: GatewayParameters) -> Self {
        Self {
            parameters,
            connectors: settings.connectors.clone(),
            proxy: settings.proxy.clone(),
        }
    }

    pub fn parameters(&self) -> &GatewayParameters {
        &self.parameters
    }

    /// API root of the configured environment.
    pub fn base_endpoint(&self) -> &str {
        Vivapayments::new().base_url(&self.connectors, self.parameters.test_mode)
    }

    fn auth_type(&self) -> ConnectorAuthType {
        ConnectorAuthType::BodyKey {
            api_key: self.parameters.api_key.clone(),
            key1: Secret::new(self.parameters.merchant_id.clone()),
        }
    }

    /// Runs one connector flow and returns the classified answer.
    pub(crate) async fn execute<F, Req, Resp>(
        &self,
        flow_name: &str,
        request: Req,
    ) -> CustomResult<Resp, ConnectorError>
    where
        Vivapayments: ConnectorIntegrationV2<F, PaymentFlowData, Req, Resp>,
        F: Clone,
        Req: Clone + std::fmt::Debug,
        Resp: Clone + std::fmt::Debug,
    {
        let connector: BoxedConnectorIntegrationV2<'_, F, PaymentFlowData, Req, Resp> =
            Box::new(Vivapayments::new());
        let router_data = RouterDataV2::new(
            PaymentFlowData::new(self.connectors.clone(), self.parameters.test_mode),
            self.auth_type(),
            request,
        );

        let router_data = execute_connector_processing_step(
            &self.proxy,
            connector,
            router_data,
            Vivapayments::new().id(),
            flow_name,
        )
        .await?;

        router_data.response.ok_or_else(|| {
            report!(ConnectorError::ResponseDeserializationFailed)
                .attach_printable(format!("no answer recorded for {flow_name}"))
        })
    }
}

/// Operations every Viva Payments integration style offers.
pub trait RestGateway {
    fn context(&self) -> &GatewayContext;

    fn name(&self) -> &'static str;

    /// Refunds, or cancels on the same day, a card transaction.
    fn refund(&self, params: RequestParameters) -> RefundRequest {
        RefundRequest::new(self.context().clone(), params)
    }

    /// Looks up one transaction, or lists those matching the date and order filters.
    fn fetch_transactions(&self, params: RequestParameters) -> FetchTransactionsRequest {
        FetchTransactionsRequest::new(self.context().clone(), params)
    }
}

/// Hosted checkout: the shopper pays on the Viva Payments checkout page.
#[derive(Debug, Clone, Default)]
pub struct RedirectGateway {
    context: GatewayContext,
}

impl RedirectGateway {
    pub fn new(parameters: GatewayParameters) -> Self {
        Self {
            context: GatewayContext::new(parameters),
        }
    }

    pub fn from_settings(settings: &Settings, parameters: GatewayParameters) -> Self {
        Self {
            context: GatewayContext::from_settings(settings, parameters),
        }
    }

    pub fn purchase(&self, params: RequestParameters) -> RedirectPurchaseRequest {
        RedirectPurchaseRequest::new(self.context.clone(), params, false)
    }

    /// Like [`Self::purchase`], but the funds are only held.
    pub fn authorize(&self, params: RequestParameters) -> RedirectPurchaseRequest {
        RedirectPurchaseRequest::new(self.context.clone(), params, true)
    }
}

impl RestGateway for RedirectGateway {
    fn context(&self) -> &GatewayContext {
        &self.context
    }

    fn name(&self) -> &'static str {
        "Viva Payments v1.0 Redirect"
    }
}

/// Native checkout: a card tokenized on the merchant page is charged directly.
#[derive(Debug, Clone, Default)]
pub struct NativeGateway {
    context: GatewayContext,
}

impl NativeGateway {
    pub fn new(parameters: GatewayParameters) -> Self {
        Self {
            context: GatewayContext::new(parameters),
        }
    }

    pub fn from_settings(settings: &Settings, parameters: GatewayParameters) -> Self {
        Self {
            context: GatewayContext::from_settings(settings, parameters),
        }
    }

    pub fn purchase(&self, params: RequestParameters) -> NativePurchaseRequest {
        NativePurchaseRequest::new(self.context.clone(), params, false)
    }

    pub fn authorize(&self, params: RequestParameters) -> NativePurchaseRequest {
        NativePurchaseRequest::new(self.context.clone(), params, true)
    }
}

impl RestGateway for NativeGateway {
    fn context(&self) -> &GatewayContext {
        &self.context
    }

    fn name(&self) -> &'static str {
        "Viva Payments v1.0 Native"
    }
}
