//! Client configuration: build profile defaults plus environment overrides.

use std::time::Duration;

/// Which build profile the defaults come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Gateway every service call goes through.
    pub api_base_url: String,
    pub auth_service_url: String,
    pub content_service_url: String,
    pub assignment_service_url: String,
    /// The AI service is addressed directly, not through the gateway.
    pub ai_service_url: String,
    pub enable_debug_logs: bool,
    pub enable_analytics: bool,
    pub items_per_page: u32,
    pub timeout_ms: u64,
    pub app_name: String,
    pub version: String,
    pub environment: Environment,
}

impl AppConfig {
    pub fn development() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            auth_service_url: "http://localhost:8001".to_string(),
            content_service_url: "http://localhost:8082".to_string(),
            assignment_service_url: "http://localhost:8004".to_string(),
            ai_service_url: "http://localhost:8002/api/v1/ai".to_string(),
            enable_debug_logs: true,
            enable_analytics: false,
            items_per_page: 10,
            timeout_ms: 30_000,
            app_name: "LMS Platform".to_string(),
            version: "1.0.0".to_string(),
            environment: Environment::Development,
        }
    }

    pub fn production() -> Self {
        Self {
            api_base_url: "https://api.lms.example.com".to_string(),
            auth_service_url: "https://auth.lms.example.com".to_string(),
            content_service_url: "https://content.lms.example.com".to_string(),
            assignment_service_url: "https://assignments.lms.example.com".to_string(),
            ai_service_url: "https://content.lms.example.com/api/v1/ai".to_string(),
            enable_debug_logs: false,
            enable_analytics: true,
            items_per_page: 20,
            timeout_ms: 30_000,
            app_name: "LMS Platform".to_string(),
            version: "1.0.0".to_string(),
            environment: Environment::Production,
        }
    }

    /// Build the configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `LMS_ENV`: "production" | "prod" selects production defaults, anything else development
    /// - `LMS_API_BASE_URL`, `LMS_AUTH_SERVICE_URL`, `LMS_CONTENT_SERVICE_URL`,
    ///   `LMS_ASSIGNMENT_SERVICE_URL`, `LMS_AI_SERVICE_URL`: service URLs
    /// - `LMS_DEBUG_LOGS`: "true" | "false"
    /// - `LMS_TIMEOUT_MS`, `LMS_ITEMS_PER_PAGE`: integers
    /// - `LMS_APP_NAME`: display name
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let env = lookup("LMS_ENV")
            .unwrap_or_default()
            .to_lowercase();

        let mut config = match env.as_str() {
            "production" | "prod" => Self::production(),
            _ => Self::development(),
        };

        let url_overrides: [(&str, &mut String); 5] = [
            ("LMS_API_BASE_URL", &mut config.api_base_url),
            ("LMS_AUTH_SERVICE_URL", &mut config.auth_service_url),
            ("LMS_CONTENT_SERVICE_URL", &mut config.content_service_url),
            ("LMS_ASSIGNMENT_SERVICE_URL", &mut config.assignment_service_url),
            ("LMS_AI_SERVICE_URL", &mut config.ai_service_url),
        ];
        for (key, slot) in url_overrides {
            if let Some(value) = lookup(key) {
                match url::Url::parse(value.trim()) {
                    Ok(_) => *slot = value.trim().trim_end_matches('/').to_string(),
                    Err(e) => crate::log_warn!("ignoring {key}={value}: {e}"),
                }
            }
        }

        if let Some(raw) = lookup("LMS_DEBUG_LOGS") {
            match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => config.enable_debug_logs = true,
                "0" | "false" | "no" | "off" => config.enable_debug_logs = false,
                _ => crate::log_warn!("ignoring LMS_DEBUG_LOGS={raw}: expected a boolean"),
            }
        }
        if let Some(raw) = lookup("LMS_TIMEOUT_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => config.timeout_ms = ms,
                _ => crate::log_warn!("ignoring LMS_TIMEOUT_MS={raw}: expected a positive integer"),
            }
        }
        if let Some(raw) = lookup("LMS_ITEMS_PER_PAGE") {
            match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => config.items_per_page = n,
                _ => crate::log_warn!("ignoring LMS_ITEMS_PER_PAGE={raw}: expected a positive integer"),
            }
        }
        if let Some(name) = lookup("LMS_APP_NAME") {
            if !name.trim().is_empty() {
                config.app_name = name;
            }
        }

        config
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn is_dev(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn is_prod(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Join a path onto the gateway base. Absolute URLs pass through.
    pub fn api_url(&self, path: &str) -> String {
        join_url(&self.api_base_url, path)
    }

    /// Join a path onto the AI service base.
    pub fn ai_url(&self, path: &str) -> String {
        join_url(&self.ai_service_url, path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::development()
    }
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    if base.is_empty() {
        if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        }
    } else {
        let base = base.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_development_profile() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config, AppConfig::development());
        assert!(config.is_dev());
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn production_profile_with_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("LMS_ENV", "Production"),
            ("LMS_API_BASE_URL", "https://gateway.school.test/"),
            ("LMS_DEBUG_LOGS", "on"),
            ("LMS_TIMEOUT_MS", "5000"),
        ]));
        assert!(config.is_prod());
        assert_eq!(config.api_base_url, "https://gateway.school.test");
        assert!(config.enable_debug_logs);
        assert_eq!(config.timeout_ms, 5000);
    }

    #[test]
    fn bad_overrides_keep_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            ("LMS_API_BASE_URL", "not a url"),
            ("LMS_TIMEOUT_MS", "soon"),
            ("LMS_ITEMS_PER_PAGE", "0"),
        ]));
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.items_per_page, 10);
    }

    #[test]
    fn url_joining() {
        let config = AppConfig::development();
        assert_eq!(
            config.api_url("/api/decks/"),
            "http://localhost:8000/api/decks/"
        );
        assert_eq!(
            config.api_url("https://elsewhere.test/x"),
            "https://elsewhere.test/x"
        );
        assert_eq!(
            config.ai_url("generate-flashcards"),
            "http://localhost:8002/api/v1/ai/generate-flashcards"
        );
        assert_eq!(join_url("", "api/x"), "/api/x");
    }
}
