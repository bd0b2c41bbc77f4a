/// The three-letter ISO 4217 currency code (e.g., "EUR", "USD") for the payment amount.
///
/// Only the currencies the connectors in this workspace settle in are listed.
#[allow(clippy::upper_case_acronyms)]
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::VariantNames,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Currency {
    BGN,
    BHD,
    CHF,
    CZK,
    DKK,
    #[default]
    EUR,
    GBP,
    HRK,
    HUF,
    JPY,
    KWD,
    NOK,
    PLN,
    RON,
    SEK,
    USD,
}

impl Currency {
    pub fn is_zero_decimal_currency(self) -> bool {
        matches!(self, Self::JPY)
    }

    pub fn is_three_decimal_currency(self) -> bool {
        matches!(self, Self::BHD | Self::KWD)
    }

    /// Number of digits after the decimal separator in the major unit.
    pub fn number_of_digits_after_decimal_point(self) -> u32 {
        if self.is_zero_decimal_currency() {
            0
        } else if self.is_three_decimal_currency() {
            3
        } else {
            2
        }
    }
}
