//! Commonly used constants

/// Base64 engine used for HTTP basic authorization credentials
pub const BASE64_ENGINE: base64::engine::GeneralPurpose = base64::engine::general_purpose::STANDARD;

/// Prefix of environment variables overriding configuration values
pub const ENV_PREFIX: &str = "VIVA";

/// Env variable that sets Development/Sandbox/Production env
pub const RUN_ENV: &str = "VIVA_ENV";

/// UTF-8 byte order mark some connectors prefix their JSON bodies with
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Current environment.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Env {
    #[default]
    Development,
    Sandbox,
    Production,
}

impl Env {
    /// Environment picked from `VIVA_ENV`, falling back to development.
    pub fn current_env() -> Self {
        std::env::var(RUN_ENV)
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    pub const fn config_path(self) -> &'static str {
        match self {
            Self::Development => "development.toml",
            Self::Sandbox => "sandbox.toml",
            Self::Production => "production.toml",
        }
    }
}
