pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "fuelrun")]
#[command(about = "Fetch NSW fuel price snapshots, or reload the most recent one")]
pub struct CliConfig {
    /// Fetch fresh data from the NSW API instead of reloading the last snapshot
    #[arg(long)]
    pub update: bool,

    #[arg(
        long,
        default_value = "https://api.onegov.nsw.gov.au/oauth/client_credential/accesstoken"
    )]
    pub token_endpoint: String,

    #[arg(
        long,
        default_value = "https://api.onegov.nsw.gov.au/FuelPriceCheck/v2/fuel/prices"
    )]
    pub prices_endpoint: String,

    #[arg(long, default_value = "NSW")]
    pub states: String,

    #[arg(long, default_value = "data")]
    pub data_dir: String,

    /// Base64 client credential for the OAuth endpoint (falls back to $BASE64_AUTH)
    #[arg(long)]
    pub authorization: Option<String>,

    /// NSW API key header (falls back to $FUEL_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Enable system monitoring")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// CLI 參數優先，沒給就退回環境變數
    pub fn resolve_env(&mut self) {
        if self.authorization.is_none() {
            self.authorization = std::env::var("BASE64_AUTH").ok();
        }
        if self.api_key.is_none() {
            self.api_key = std::env::var("FUEL_API_KEY").ok();
        }
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn token_endpoint(&self) -> &str {
        &self.token_endpoint
    }

    fn prices_endpoint(&self) -> &str {
        &self.prices_endpoint
    }

    fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn states(&self) -> &str {
        &self.states
    }

    fn data_dir(&self) -> &str {
        &self.data_dir
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("token_endpoint", &self.token_endpoint)?;
        validation::validate_url("prices_endpoint", &self.prices_endpoint)?;
        validation::validate_non_empty_string("states", &self.states)?;
        validation::validate_path("data_dir", &self.data_dir)?;

        // 只有抓取模式需要憑證
        if self.update {
            validation::validate_required_field("authorization (or BASE64_AUTH)", &self.authorization)?;
        }

        Ok(())
    }
}
