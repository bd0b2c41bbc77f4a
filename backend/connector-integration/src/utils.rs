use common_enums::Currency;
use common_utils::types::{AmountConvertor, MinorUnit};
use domain_types::errors;
use error_stack::{Report, ResultExt};

type Error = Report<errors::ConnectorError>;

pub fn missing_field_err(message: &'static str) -> Box<dyn Fn() -> Error + 'static> {
    Box::new(move || {
        errors::ConnectorError::MissingRequiredField {
            field_name: message,
        }
        .into()
    })
}

pub fn convert_back_amount_to_minor_units<T>(
    amount_convertor: &dyn AmountConvertor<Output = T>,
    amount: T,
    currency: Currency,
) -> Result<MinorUnit, Error> {
    amount_convertor
        .convert_back(amount, currency)
        .change_context(errors::ConnectorError::InvalidDataFormat {
            field_name: "amount",
        })
}
