use crate::core::ConfigProvider;
use crate::utils::error::{FuelError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_STATES: &str = "NSW";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelTomlConfig {
    pub pipeline: PipelineInfo,
    pub api: ApiConfig,
    pub auth: Option<AuthConfig>,
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineInfo {
    pub name: String,
    pub description: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub token_endpoint: String,
    pub prices_endpoint: String,
    pub states: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub authorization: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl FuelTomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FuelError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FuelError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${BASE64_AUTH})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("api.token_endpoint", &self.api.token_endpoint)?;
        validation::validate_url("api.prices_endpoint", &self.api.prices_endpoint)?;
        validation::validate_path("output.data_dir", &self.output.data_dir)?;

        if let Some(states) = &self.api.states {
            validation::validate_non_empty_string("api.states", states)?;
        }

        // 沒被替換掉的 ${VAR} 不能當成憑證送出去
        if let Some(auth) = &self.auth {
            for (field, value) in [
                ("auth.authorization", auth.authorization.as_deref()),
                ("auth.api_key", auth.api_key.as_deref()),
            ] {
                if let Some(value) = value {
                    if value.contains("${") {
                        return Err(FuelError::InvalidConfigValueError {
                            field: field.to_string(),
                            value: value.to_string(),
                            reason: "environment variable placeholder was not resolved"
                                .to_string(),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    pub fn states(&self) -> &str {
        self.api.states.as_deref().unwrap_or(DEFAULT_STATES)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for FuelTomlConfig {
    fn token_endpoint(&self) -> &str {
        &self.api.token_endpoint
    }

    fn prices_endpoint(&self) -> &str {
        &self.api.prices_endpoint
    }

    fn authorization(&self) -> Option<&str> {
        self.auth.as_ref().and_then(|a| a.authorization.as_deref())
    }

    fn api_key(&self) -> Option<&str> {
        self.auth.as_ref().and_then(|a| a.api_key.as_deref())
    }

    fn states(&self) -> &str {
        self.states()
    }

    fn data_dir(&self) -> &str {
        &self.output.data_dir
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.api.timeout_seconds
    }
}

impl Validate for FuelTomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
