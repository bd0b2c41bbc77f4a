use common_utils::errors::ValidationError;
use serde::{Deserialize, Serialize};

/// Live and sandbox API roots of Viva Payments.
pub const VIVAPAYMENTS_LIVE_BASE_URL: &str = "https://www.vivapayments.com";
pub const VIVAPAYMENTS_TEST_BASE_URL: &str = "http://demo.vivapayments.com";

#[derive(Clone, Deserialize, Serialize, Debug, PartialEq)]
#[serde(default)]
pub struct Connectors {
    pub vivapayments: ConnectorParams,
}

impl Default for Connectors {
    fn default() -> Self {
        Self {
            vivapayments: ConnectorParams::new(
                VIVAPAYMENTS_LIVE_BASE_URL.to_string(),
                Some(VIVAPAYMENTS_TEST_BASE_URL.to_string()),
            ),
        }
    }
}

impl Connectors {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.vivapayments.validate("connectors.vivapayments")
    }
}

#[derive(Clone, Deserialize, Serialize, Debug, Default, PartialEq)]
pub struct ConnectorParams {
    /// base url
    #[serde(default)]
    pub base_url: String,
    /// base url used when the merchant runs in test mode
    #[serde(default)]
    pub secondary_base_url: Option<String>,
}

impl ConnectorParams {
    pub fn new(base_url: String, secondary_base_url: Option<String>) -> Self {
        Self {
            base_url,
            secondary_base_url,
        }
    }

    /// Picks the sandbox root in test mode, the live root otherwise.
    pub fn base_url_for(&self, test_mode: bool) -> &str {
        match (test_mode, self.secondary_base_url.as_deref()) {
            (true, Some(sandbox)) => sandbox,
            _ => &self.base_url,
        }
    }

    pub fn validate(&self, parent_field: &str) -> Result<(), ValidationError> {
        std::iter::once(self.base_url.as_str())
            .chain(self.secondary_base_url.as_deref())
            .try_for_each(|base_url| {
                if base_url.trim().is_empty() {
                    return Err(ValidationError::MissingRequiredField {
                        field_name: format!("{parent_field}.base_url"),
                    });
                }
                url::Url::parse(base_url)
                    .map(|_| ())
                    .map_err(|_| ValidationError::IncorrectValueProvided {
                        field_name: "base_url",
                    })
            })
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq, Hash)]
#[serde(default)]
pub struct Proxy {
    pub http_url: Option<String>,
    pub https_url: Option<String>,
    pub idle_pool_connection_timeout: Option<u64>,
    pub bypass_proxy_urls: Vec<String>,
}

impl Proxy {
    pub fn is_proxy_configured(&self, should_bypass_proxy: bool) -> bool {
        !should_bypass_proxy && (self.http_url.is_some() || self.https_url.is_some())
    }
}
