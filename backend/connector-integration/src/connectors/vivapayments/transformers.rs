use common_utils::types::{MinorUnit, StringMajorUnitForConnector};
use domain_types::{
    connector_types::{OrderRequestData, PaymentFlowData, RequestParameters, TransactionRequestData},
    errors::ConnectorError,
    router_data::ConnectorAuthType,
    router_data_v2::RouterDataV2,
};
use hyperswitch_masking::Secret;
use serde::Serialize;
use serde_with::skip_serializing_none;

use super::responses::{parse_response_body, RedirectResponse, RestResponse};
use crate::{
    types::ResponseRouterData,
    utils::{convert_back_amount_to_minor_units, missing_field_err},
};

type Error = error_stack::Report<ConnectorError>;
type ResponseBody = serde_json::Map<String, serde_json::Value>;
type RestRouterData<F, Req> = RouterDataV2<F, PaymentFlowData, Req, RestResponse>;
type RedirectRouterData<F, Req> = RouterDataV2<F, PaymentFlowData, Req, RedirectResponse>;

pub struct VivapaymentsAuthType {
    pub merchant_id: Secret<String>,
    pub api_key: Secret<String>,
}

impl TryFrom<&ConnectorAuthType> for VivapaymentsAuthType {
    type Error = Error;
    fn try_from(auth_type: &ConnectorAuthType) -> Result<Self, Self::Error> {
        match auth_type {
            ConnectorAuthType::BodyKey { api_key, key1 } => Ok(Self {
                merchant_id: key1.to_owned(),
                api_key: api_key.to_owned(),
            }),
            _ => Err(ConnectorError::FailedToObtainAuthType.into()),
        }
    }
}

/// Optional fields accepted by every endpoint.
#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VivapaymentsCommonFields {
    pub request_lang: Option<String>,
    pub merchant_trns: Option<String>,
    pub customer_trns: Option<String>,
    pub source_code: Option<String>,
}

impl From<&RequestParameters> for VivapaymentsCommonFields {
    fn from(params: &RequestParameters) -> Self {
        Self {
            request_lang: params.request_lang.clone(),
            merchant_trns: params.transaction_id.clone(),
            customer_trns: params.description.clone(),
            source_code: params.source_code.clone(),
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VivapaymentsOrderRequest {
    #[serde(rename = "isPreAuth")]
    pub is_pre_auth: Option<bool>,
    pub amount: MinorUnit,
    #[serde(flatten)]
    pub common: VivapaymentsCommonFields,
}

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VivapaymentsTransactionRequest {
    #[serde(rename = "isPreAuth")]
    pub is_pre_auth: Option<bool>,
    pub amount: MinorUnit,
    pub order_code: String,
    pub credit_card: VivapaymentsCreditCard,
    #[serde(flatten)]
    pub common: VivapaymentsCommonFields,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VivapaymentsCreditCard {
    pub token: Secret<String>,
}

/// Query of a refund; travels in the URL of the `DELETE` call.
#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VivapaymentsRefundRequest {
    pub amount: MinorUnit,
    pub action_user: Option<String>,
    #[serde(flatten)]
    pub common: VivapaymentsCommonFields,
}

#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct VivapaymentsFetchTransactionsRequest {
    pub date: Option<String>,
    #[serde(rename = "clearancedate")]
    pub clearance_date: Option<String>,
    #[serde(rename = "ordercode")]
    pub order_code: Option<String>,
    #[serde(flatten)]
    pub common: VivapaymentsCommonFields,
}

fn get_amount(params: &RequestParameters) -> Result<MinorUnit, Error> {
    let amount = params
        .amount
        .clone()
        .ok_or_else(missing_field_err("amount"))?;
    convert_back_amount_to_minor_units(
        &StringMajorUnitForConnector,
        amount,
        params.get_currency(),
    )
}

fn pre_auth_flag(is_pre_auth: bool) -> Option<bool> {
    is_pre_auth.then_some(true)
}

impl<F, Resp> TryFrom<&RouterDataV2<F, PaymentFlowData, OrderRequestData, Resp>>
    for VivapaymentsOrderRequest
{
    type Error = Error;
    fn try_from(
        item: &RouterDataV2<F, PaymentFlowData, OrderRequestData, Resp>,
    ) -> Result<Self, Self::Error> {
        let params = &item.request.params;
        Ok(Self {
            is_pre_auth: pre_auth_flag(item.request.is_pre_auth),
            amount: get_amount(params)?,
            common: VivapaymentsCommonFields::from(params),
        })
    }
}

impl<F, Resp> TryFrom<&RouterDataV2<F, PaymentFlowData, TransactionRequestData, Resp>>
    for VivapaymentsTransactionRequest
{
    type Error = Error;
    fn try_from(
        item: &RouterDataV2<F, PaymentFlowData, TransactionRequestData, Resp>,
    ) -> Result<Self, Self::Error> {
        let params = &item.request.params;
        let amount = get_amount(params)?;
        let token = params
            .card_reference
            .clone()
            .ok_or_else(missing_field_err("card_reference"))?;
        Ok(Self {
            is_pre_auth: pre_auth_flag(item.request.is_pre_auth),
            amount,
            order_code: item.request.order_code.clone(),
            credit_card: VivapaymentsCreditCard { token },
            common: VivapaymentsCommonFields::from(params),
        })
    }
}

impl<F, Resp> TryFrom<&RouterDataV2<F, PaymentFlowData, RequestParameters, Resp>>
    for VivapaymentsRefundRequest
{
    type Error = Error;
    fn try_from(
        item: &RouterDataV2<F, PaymentFlowData, RequestParameters, Resp>,
    ) -> Result<Self, Self::Error> {
        let params = &item.request;
        Ok(Self {
            amount: get_amount(params)?,
            action_user: params.description.clone(),
            common: VivapaymentsCommonFields::from(params),
        })
    }
}

impl<F, Resp> From<&RouterDataV2<F, PaymentFlowData, RequestParameters, Resp>>
    for VivapaymentsFetchTransactionsRequest
{
    fn from(item: &RouterDataV2<F, PaymentFlowData, RequestParameters, Resp>) -> Self {
        let params = &item.request;
        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
        Self {
            date: non_empty(&params.date),
            clearance_date: non_empty(&params.clearance_date),
            order_code: non_empty(&params.transaction_id),
            common: VivapaymentsCommonFields::from(params),
        }
    }
}

/// Path segment naming the transaction a refund or lookup is about.
pub fn get_transaction_reference(params: &RequestParameters) -> Result<&str, Error> {
    params
        .transaction_reference
        .as_deref()
        .filter(|reference| !reference.is_empty())
        .ok_or_else(missing_field_err("transaction_reference"))
}

impl<F, Req> TryFrom<ResponseRouterData<ResponseBody, RestRouterData<F, Req>>>
    for RestRouterData<F, Req>
{
    type Error = Error;
    fn try_from(
        item: ResponseRouterData<ResponseBody, RestRouterData<F, Req>>,
    ) -> Result<Self, Self::Error> {
        Ok(item
            .router_data
            .set_response(RestResponse::new(item.http_code, item.response)))
    }
}

impl<F, Req> TryFrom<ResponseRouterData<ResponseBody, RedirectRouterData<F, Req>>>
    for RedirectRouterData<F, Req>
{
    type Error = Error;
    fn try_from(
        item: ResponseRouterData<ResponseBody, RedirectRouterData<F, Req>>,
    ) -> Result<Self, Self::Error> {
        let flow_data = &item.router_data.resource_common_data;
        let base_endpoint = flow_data
            .connectors
            .vivapayments
            .base_url_for(flow_data.test_mode)
            .trim_end_matches('/')
            .to_string();
        let response = RedirectResponse::new(
            RestResponse::new(item.http_code, item.response),
            base_endpoint,
        );
        Ok(item.router_data.set_response(response))
    }
}

/// Decodes the raw answer and pairs it with the router data it belongs to.
pub fn to_response_router_data<RouterData>(
    router_data: &RouterData,
    res: &domain_types::router_response_types::Response,
) -> Result<ResponseRouterData<ResponseBody, RouterData>, Error>
where
    RouterData: Clone,
{
    Ok(ResponseRouterData {
        response: parse_response_body(res)?,
        router_data: router_data.clone(),
        http_code: res.status_code,
    })
}
