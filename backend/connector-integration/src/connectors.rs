pub mod vivapayments;

pub use self::vivapayments::Vivapayments;
