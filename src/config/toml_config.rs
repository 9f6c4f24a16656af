use crate::core::normalizer::ResponseMode;
use crate::core::retry::{DEFAULT_RETRIES, DEFAULT_RETRY_DELAY};
use crate::core::transport::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::core::ConfigProvider;
use crate::utils::error::{ClientError, Result};
use crate::utils::validation::{
    validate_positive_number, validate_range, validate_required_field, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^}]+)\}").expect("environment placeholder pattern is valid")
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub client: ClientSection,
    pub retry: Option<RetrySection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSection {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub response_mode: Option<ResponseMode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySection {
    pub attempts: Option<u32>,
    pub delay_ms: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ClientError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ClientError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GOODS_API_URL})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        let base_url = validate_required_field("client.base_url", &self.client.base_url)?;
        validate_url("client.base_url", base_url)?;

        if let Some(timeout) = self.client.timeout_seconds {
            validate_positive_number("client.timeout_seconds", timeout, 1)?;
        }

        if let Some(attempts) = self.retry.as_ref().and_then(|r| r.attempts) {
            validate_range("retry.attempts", attempts, 0, 5)?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        self.client.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    fn timeout(&self) -> Duration {
        self.client
            .timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    fn retries(&self) -> u32 {
        self.retry
            .as_ref()
            .and_then(|r| r.attempts)
            .unwrap_or(DEFAULT_RETRIES)
    }

    fn retry_delay(&self) -> Duration {
        self.retry
            .as_ref()
            .and_then(|r| r.delay_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_RETRY_DELAY)
    }

    fn response_mode(&self) -> ResponseMode {
        self.client.response_mode.unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[client]
base_url = "https://dash.example.com/api"
timeout_seconds = 30
response_mode = "envelope"

[retry]
attempts = 2
delay_ms = 250
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.base_url(), "https://dash.example.com/api");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.response_mode(), ResponseMode::Envelope);
        assert_eq!(config.retries(), 2);
        assert_eq!(config.retry_delay(), Duration::from_millis(250));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_for_missing_values() {
        let config = TomlConfig::from_toml_str(
            r#"
[client]
base_url = "http://localhost:8000/api"
"#,
        )
        .unwrap();

        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(config.retries(), 1);
        assert_eq!(config.retry_delay(), Duration::from_millis(1000));
        assert_eq!(config.response_mode(), ResponseMode::PassThrough);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("GOODS_CLIENT_TEST_BASE_URL", "https://env.example.com/api");

        let config = TomlConfig::from_toml_str(
            r#"
[client]
base_url = "${GOODS_CLIENT_TEST_BASE_URL}"
"#,
        )
        .unwrap();
        assert_eq!(config.base_url(), "https://env.example.com/api");

        std::env::remove_var("GOODS_CLIENT_TEST_BASE_URL");
    }

    #[test]
    fn test_config_validation() {
        let missing_url = TomlConfig::from_toml_str("[client]\ntimeout_seconds = 5\n").unwrap();
        assert!(matches!(
            missing_url.validate(),
            Err(ClientError::MissingConfigError { .. })
        ));

        let bad_url = TomlConfig::from_toml_str("[client]\nbase_url = \"invalid-url\"\n").unwrap();
        assert!(bad_url.validate().is_err());

        let too_many = TomlConfig::from_toml_str(
            "[client]\nbase_url = \"http://x.test/api\"\n[retry]\nattempts = 9\n",
        )
        .unwrap();
        assert!(too_many.validate().is_err());
    }

    #[test]
    fn test_unknown_response_mode_is_rejected() {
        let result = TomlConfig::from_toml_str(
            "[client]\nbase_url = \"http://x.test/api\"\nresponse_mode = \"xml\"\n",
        );
        assert!(matches!(
            result,
            Err(ClientError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[client]\nbase_url = \"https://file.example.com/api\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.base_url(), "https://file.example.com/api");
    }
}
