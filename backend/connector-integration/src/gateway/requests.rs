use common_utils::CustomResult;
use domain_types::{
    connector_flow::{CreateOrder, CreateTransaction, FetchTransactions, RedirectCheckout, Refund},
    connector_types::{OrderRequestData, RequestParameters, TransactionRequestData},
    errors::ConnectorError,
};
use error_stack::report;

use super::GatewayContext;
use crate::{
    connectors::vivapayments::{RedirectResponse, RestResponse},
    utils::missing_field_err,
};

/// Creates an order for the hosted checkout page.
#[derive(Debug, Clone)]
pub struct RedirectPurchaseRequest {
    context: GatewayContext,
    params: RequestParameters,
    is_pre_auth: bool,
}

impl RedirectPurchaseRequest {
    pub(crate) fn new(
        context: GatewayContext,
        params: RequestParameters,
        is_pre_auth: bool,
    ) -> Self {
        Self {
            context,
            params,
            is_pre_auth,
        }
    }

    pub fn params(&self) -> &RequestParameters {
        &self.params
    }

    pub fn is_pre_auth(&self) -> bool {
        self.is_pre_auth
    }

    pub async fn send(&self) -> CustomResult<RedirectResponse, ConnectorError> {
        let request = OrderRequestData {
            params: self.params.clone(),
            is_pre_auth: self.is_pre_auth,
        };
        self.context
            .execute::<RedirectCheckout, _, _>("RedirectCheckout", request)
            .await
    }
}

#[derive(Debug, Clone)]
pub struct RefundRequest {
    context: GatewayContext,
    params: RequestParameters,
}

impl RefundRequest {
    pub(crate) fn new(context: GatewayContext, params: RequestParameters) -> Self {
        Self { context, params }
    }

    pub fn params(&self) -> &RequestParameters {
        &self.params
    }

    pub async fn send(&self) -> CustomResult<RestResponse, ConnectorError> {
        self.context
            .execute::<Refund, _, _>("Refund", self.params.clone())
            .await
    }
}

#[derive(Debug, Clone)]
pub struct FetchTransactionsRequest {
    context: GatewayContext,
    params: RequestParameters,
}

impl FetchTransactionsRequest {
    pub(crate) fn new(context: GatewayContext, params: RequestParameters) -> Self {
        Self { context, params }
    }

    pub fn params(&self) -> &RequestParameters {
        &self.params
    }

    pub async fn send(&self) -> CustomResult<RestResponse, ConnectorError> {
        self.context
            .execute::<FetchTransactions, _, _>("FetchTransactions", self.params.clone())
            .await
    }
}

/// Position in the two call native checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeCheckoutStage {
    /// No order exists yet.
    AwaitingOrder,
    /// The order exists; the card still has to be charged against it.
    AwaitingTransaction { order_code: String },
}

/// Result of running one stage of a native checkout.
#[derive(Debug, Clone)]
pub enum NativeCheckoutProgress {
    /// The order was created; `next` charges the card.
    OrderCreated {
        next: NativeCheckoutStage,
        response: RestResponse,
    },
    /// The sequence ended with this answer, successful or not.
    Completed(RestResponse),
}

/// Final answer of a native checkout.
#[derive(Debug, Clone)]
pub struct NativePurchaseResponse {
    pub response: RestResponse,
    /// Order created by the first call, when it got that far.
    pub order_code: Option<String>,
}

impl NativePurchaseResponse {
    pub fn is_successful(&self) -> bool {
        self.response.is_successful()
    }

    /// The order exists but charging the card failed. The order is left as is.
    pub fn is_partially_completed(&self) -> bool {
        self.order_code.is_some() && !self.response.is_successful()
    }

    pub fn transaction_reference(&self) -> Option<String> {
        self.response.transaction_reference()
    }
}

/// Charges a tokenized card: an order is created first, then a transaction
/// against it.
#[derive(Debug, Clone)]
pub struct NativePurchaseRequest {
    context: GatewayContext,
    params: RequestParameters,
    is_pre_auth: bool,
}

impl NativePurchaseRequest {
    pub(crate) fn new(
        context: GatewayContext,
        params: RequestParameters,
        is_pre_auth: bool,
    ) -> Self {
        Self {
            context,
            params,
            is_pre_auth,
        }
    }

    pub fn params(&self) -> &RequestParameters {
        &self.params
    }

    pub fn is_pre_auth(&self) -> bool {
        self.is_pre_auth
    }

    /// Runs both calls. A failed order creation stops the sequence.
    pub async fn send(&self) -> CustomResult<NativePurchaseResponse, ConnectorError> {
        let order = self.create_order().await?;
        if !order.is_successful() {
            return Ok(NativePurchaseResponse {
                response: order,
                order_code: None,
            });
        }

        let order_code = Self::order_code(&order)?;
        let response = self.create_transaction(order_code.clone()).await?;
        Ok(NativePurchaseResponse {
            response,
            order_code: Some(order_code),
        })
    }

    /// Runs a single stage, so a checkout interrupted after its order was
    /// created can be resumed.
    pub async fn advance(
        &self,
        stage: NativeCheckoutStage,
    ) -> CustomResult<NativeCheckoutProgress, ConnectorError> {
        match stage {
            NativeCheckoutStage::AwaitingOrder => {
                let response = self.create_order().await?;
                if !response.is_successful() {
                    return Ok(NativeCheckoutProgress::Completed(response));
                }
                let order_code = Self::order_code(&response)?;
                Ok(NativeCheckoutProgress::OrderCreated {
                    next: NativeCheckoutStage::AwaitingTransaction { order_code },
                    response,
                })
            }
            NativeCheckoutStage::AwaitingTransaction { order_code } => self
                .create_transaction(order_code)
                .await
                .map(NativeCheckoutProgress::Completed),
        }
    }

    async fn create_order(&self) -> CustomResult<RestResponse, ConnectorError> {
        self.params
            .amount
            .as_ref()
            .ok_or_else(missing_field_err("amount"))?;
        self.params
            .card_reference
            .as_ref()
            .ok_or_else(missing_field_err("card_reference"))?;

        let request = OrderRequestData {
            params: self.params.clone(),
            is_pre_auth: self.is_pre_auth,
        };
        self.context
            .execute::<CreateOrder, _, _>("CreateOrder", request)
            .await
    }

    async fn create_transaction(
        &self,
        order_code: String,
    ) -> CustomResult<RestResponse, ConnectorError> {
        let request = TransactionRequestData {
            params: self.params.clone(),
            is_pre_auth: self.is_pre_auth,
            order_code: order_code.clone(),
        };
        let response = self
            .context
            .execute::<CreateTransaction, _, _>("CreateTransaction", request)
            .await?;

        if !response.is_successful() {
            tracing::warn!(
                order_code = %order_code,
                code = %response.code(),
                "card charge failed after the order was created"
            );
        }
        Ok(response)
    }

    fn order_code(response: &RestResponse) -> CustomResult<String, ConnectorError> {
        response.transaction_reference().ok_or_else(|| {
            report!(ConnectorError::MissingConnectorTransactionID)
                .attach_printable("order creation succeeded without an order code")
        })
    }
}
