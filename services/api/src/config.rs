use biolearn_core::llm_client::{DEFAULT_CHAT_MODEL, GROQ_API_BASE, LlmSettings};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// `None` selects the demo backend.
    pub groq_api_key: Option<String>,
    pub api_base: String,
    pub chat_model: String,
    /// Wall-clock bound for one upstream request.
    pub request_timeout: Duration,
    pub log_level: Level,
    /// Optional directory of `<name>.md` prompt overrides.
    pub prompts_path: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3001".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let groq_api_key = std::env::var("GROQ_API_KEY").ok();

        let api_base = std::env::var("LLM_API_BASE").unwrap_or_else(|_| GROQ_API_BASE.to_string());
        let chat_model =
            std::env::var("CHAT_MODEL").unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string());

        let timeout_str = std::env::var("REQUEST_TIMEOUT_SECS").unwrap_or_else(|_| "60".to_string());
        let request_timeout = match timeout_str.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                return Err(ConfigError::InvalidValue(
                    "REQUEST_TIMEOUT_SECS".to_string(),
                    format!("'{}' is not a positive number of seconds", timeout_str),
                ));
            }
        };

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let prompts_path = std::env::var("PROMPTS_PATH").ok().map(PathBuf::from);

        Ok(Self {
            bind_address,
            groq_api_key,
            api_base,
            chat_model,
            request_timeout,
            log_level,
            prompts_path,
        })
    }

    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            api_key: self.groq_api_key.clone(),
            api_base: self.api_base.clone(),
            model: self.chat_model.clone(),
            timeout: self.request_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tracing::Level;

    fn clear_env_vars() {
        unsafe {
            env::remove_var("BIND_ADDRESS");
            env::remove_var("GROQ_API_KEY");
            env::remove_var("LLM_API_BASE");
            env::remove_var("CHAT_MODEL");
            env::remove_var("REQUEST_TIMEOUT_SECS");
            env::remove_var("RUST_LOG");
            env::remove_var("PROMPTS_PATH");
        }
    }

    #[test]
    fn test_config_error_display() {
        let invalid_value =
            ConfigError::InvalidValue("TEST_VAR".to_string(), "bad_value".to_string());
        assert_eq!(
            format!("{}", invalid_value),
            "Invalid value for environment variable TEST_VAR: bad_value"
        );
    }

    #[test]
    #[serial]
    fn test_config_from_env_defaults() {
        clear_env_vars();

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "0.0.0.0:3001");
        assert_eq!(config.groq_api_key, None);
        assert_eq!(config.api_base, GROQ_API_BASE);
        assert_eq!(config.chat_model, DEFAULT_CHAT_MODEL);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.prompts_path, None);
        assert_eq!(config.llm_settings().credential(), None);
    }

    #[test]
    #[serial]
    fn test_config_from_env_custom_values() {
        clear_env_vars();
        unsafe {
            env::set_var("BIND_ADDRESS", "127.0.0.1:8080");
            env::set_var("GROQ_API_KEY", "gsk_custom");
            env::set_var("LLM_API_BASE", "http://localhost:11434/v1");
            env::set_var("CHAT_MODEL", "llama3-70b-8192");
            env::set_var("REQUEST_TIMEOUT_SECS", "15");
            env::set_var("RUST_LOG", "debug");
            env::set_var("PROMPTS_PATH", "/custom/prompts");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8080");
        assert_eq!(config.groq_api_key, Some("gsk_custom".to_string()));
        assert_eq!(config.api_base, "http://localhost:11434/v1");
        assert_eq!(config.chat_model, "llama3-70b-8192");
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.prompts_path, Some(PathBuf::from("/custom/prompts")));

        let settings = config.llm_settings();
        assert_eq!(settings.credential(), Some("gsk_custom"));
        assert_eq!(settings.timeout, Duration::from_secs(15));
        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_config_invalid_bind_address() {
        clear_env_vars();
        unsafe {
            env::set_var("BIND_ADDRESS", "not-a-valid-address");
        }

        let err = Config::from_env().unwrap_err();
        let ConfigError::InvalidValue(var, _) = err;
        assert_eq!(var, "BIND_ADDRESS");
        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_config_invalid_timeout() {
        for bad in ["0", "soon", "-5"] {
            clear_env_vars();
            unsafe {
                env::set_var("REQUEST_TIMEOUT_SECS", bad);
            }

            let err = Config::from_env().unwrap_err();
            let ConfigError::InvalidValue(var, _) = err;
            assert_eq!(var, "REQUEST_TIMEOUT_SECS");
        }
        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_config_invalid_log_level() {
        clear_env_vars();
        unsafe {
            env::set_var("RUST_LOG", "not-a-level");
        }

        let err = Config::from_env().unwrap_err();
        let ConfigError::InvalidValue(var, _) = err;
        assert_eq!(var, "RUST_LOG");
        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_placeholder_key_selects_demo() {
        clear_env_vars();
        unsafe {
            env::set_var("GROQ_API_KEY", "your_groq_api_key_here");
        }

        let config = Config::from_env().expect("Config should load successfully");
        assert!(config.groq_api_key.is_some());
        assert_eq!(config.llm_settings().credential(), None);
        clear_env_vars();
    }
}
