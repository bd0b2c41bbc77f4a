//! Types that can be used in other crates

use std::{fmt::Display, str::FromStr};

use common_enums::Currency;
use rust_decimal::{prelude::ToPrimitive, Decimal};

use crate::errors::ParsingError;

/// Amount convertor trait for connector
pub trait AmountConvertor: Send {
    /// Output type for the connector
    type Output;
    /// helps in conversion of connector required amount type
    fn convert(
        &self,
        amount: MinorUnit,
        currency: Currency,
    ) -> Result<Self::Output, error_stack::Report<ParsingError>>;

    /// helps in converting back connector required amount type to core minor unit
    fn convert_back(
        &self,
        amount: Self::Output,
        currency: Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>>;
}

/// Connector required amount type
#[derive(Default, Debug, serde::Deserialize, serde::Serialize, Clone, Copy, PartialEq)]
pub struct StringMajorUnitForConnector;

impl AmountConvertor for StringMajorUnitForConnector {
    type Output = StringMajorUnit;
    fn convert(
        &self,
        amount: MinorUnit,
        currency: Currency,
    ) -> Result<Self::Output, error_stack::Report<ParsingError>> {
        amount.to_major_unit_as_string(currency)
    }

    fn convert_back(
        &self,
        amount: StringMajorUnit,
        currency: Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>> {
        amount.to_minor_unit_as_i64(currency)
    }
}

/// This Unit struct represents MinorUnit in which core amount works
#[derive(
    Default,
    Debug,
    serde::Deserialize,
    serde::Serialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
)]
pub struct MinorUnit(pub i64);

impl MinorUnit {
    /// forms a new minor unit from amount
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Convert the amount to its major denomination based on Currency and return String
    fn to_major_unit_as_string(
        self,
        currency: Currency,
    ) -> Result<StringMajorUnit, error_stack::Report<ParsingError>> {
        let amount = Decimal::try_new(self.0, currency.number_of_digits_after_decimal_point())
            .map_err(|_| ParsingError::I64ToDecimalConversionFailure)?;
        Ok(StringMajorUnit::new(amount.to_string()))
    }
}

impl Display for MinorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Amount in the major denomination as entered by the merchant, e.g. "10.00"
#[derive(Default, Debug, serde::Deserialize, serde::Serialize, Clone, PartialEq, Eq)]
pub struct StringMajorUnit(String);

impl StringMajorUnit {
    /// forms a new major unit from amount
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Converts to minor unit as i64 from StringMajorUnit.
    ///
    /// Negative amounts and amounts carrying more decimals than the currency
    /// allows are rejected instead of being rounded.
    fn to_minor_unit_as_i64(
        &self,
        currency: Currency,
    ) -> Result<MinorUnit, error_stack::Report<ParsingError>> {
        let amount_decimal = Decimal::from_str(self.0.trim()).map_err(|e| {
            ParsingError::StringToDecimalConversionFailure {
                error: e.to_string(),
            }
        })?;

        if amount_decimal.is_sign_negative() && !amount_decimal.is_zero() {
            return Err(ParsingError::NegativeAmount.into());
        }

        let amount = amount_decimal
            .checked_mul(Decimal::from(
                10_i64.pow(currency.number_of_digits_after_decimal_point()),
            ))
            .ok_or(ParsingError::DecimalToI64ConversionFailure)?;
        if !amount.fract().is_zero() {
            return Err(ParsingError::AmountPrecisionExceeded { currency }.into());
        }

        let amount_i64 = amount
            .to_i64()
            .ok_or(ParsingError::DecimalToI64ConversionFailure)?;
        Ok(MinorUnit::new(amount_i64))
    }

    pub fn get_amount_as_string(&self) -> String {
        self.0.clone()
    }
}

impl From<&str> for StringMajorUnit {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for StringMajorUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
