//! Configuration for the evaluation pipeline.
//!
//! Supports both environment variables and YAML config file.
//! Environment variables take precedence over config file values.
//! The resulting [`Config`] is built once at startup and handed to
//! every component; nothing else reads the environment.

use crate::error::{EvalError, Result};
use crate::text::Charset;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Text-generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// OpenAI chat completions.
    #[default]
    OpenAi,
    /// Google generative content (Gemini).
    Google,
}

impl FromStr for Provider {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "google" | "gemini" => Ok(Provider::Google),
            other => Err(EvalError::InvalidConfig(format!(
                "unknown LLM provider '{}' (expected 'openai' or 'google')",
                other
            ))),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::OpenAi => write!(f, "openai"),
            Provider::Google => write!(f, "google"),
        }
    }
}

/// OpenAI-compatible backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Base URL for the API (e.g., "https://api.openai.com")
    pub api_base: String,

    /// API key for authentication
    pub api_key: String,

    /// Model name
    pub model: String,

    /// Maximum tokens for response (sent only when set)
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Temperature for generation (sent only when set)
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: None,
            temperature: None,
        }
    }
}

/// Google generative-content backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com".to_string(),
            api_key: String::new(),
            model: "gemini-2.0-flash".to_string(),
        }
    }
}

/// LLM configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LlmConfig {
    /// Which backend answers generation calls.
    pub provider: Provider,
    pub openai: OpenAiConfig,
    pub google: GoogleConfig,
}

impl LlmConfig {
    /// Model name of the selected backend.
    pub fn model(&self) -> &str {
        match self.provider {
            Provider::OpenAi => &self.openai.model,
            Provider::Google => &self.google.model,
        }
    }
}

/// Content store (Supabase/PostgREST) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Project URL, e.g. "https://xyz.supabase.co"
    pub url: String,

    /// Service-role key
    pub service_key: String,

    #[serde(default = "default_chunks_table")]
    pub chunks_table: String,

    #[serde(default = "default_normalized_table")]
    pub normalized_table: String,
}

fn default_chunks_table() -> String {
    "rag_chunks".to_string()
}

fn default_normalized_table() -> String {
    "normalized_inquiries".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            service_key: String::new(),
            chunks_table: default_chunks_table(),
            normalized_table: default_normalized_table(),
        }
    }
}

/// Settings for a single evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of synthetic inquiries to generate.
    #[serde(default = "default_inquiry_count")]
    pub inquiry_count: usize,

    /// Pause after each generation call, in milliseconds.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Candidates fetched from the store per search.
    #[serde(default = "default_search_limit")]
    pub candidate_limit: usize,

    /// Chunks kept after ranking.
    #[serde(default = "default_search_limit")]
    pub top_k: usize,

    /// Characters retained when tokenizing queries and context.
    #[serde(default)]
    pub charset: Charset,
}

fn default_inquiry_count() -> usize {
    200
}

fn default_request_delay_ms() -> u64 {
    500
}

fn default_search_limit() -> usize {
    6
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            inquiry_count: default_inquiry_count(),
            request_delay_ms: default_request_delay_ms(),
            candidate_limit: default_search_limit(),
            top_k: default_search_limit(),
            charset: Charset::default(),
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub run: RunConfig,
}

/// Configuration file structure (YAML format).
#[derive(Debug, Deserialize)]
struct ConfigFile {
    llm: Option<LlmFileSection>,
    store: Option<StoreFileSection>,
    run: Option<RunFileSection>,
}

#[derive(Debug, Deserialize)]
struct LlmFileSection {
    provider: Option<String>,
    openai: Option<OpenAiFileSection>,
    google: Option<GoogleFileSection>,
}

#[derive(Debug, Deserialize)]
struct OpenAiFileSection {
    api_base: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct GoogleFileSection {
    api_base: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StoreFileSection {
    url: Option<String>,
    service_key: Option<String>,
    chunks_table: Option<String>,
    normalized_table: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RunFileSection {
    inquiry_count: Option<usize>,
    request_delay_ms: Option<u64>,
    candidate_limit: Option<usize>,
    top_k: Option<usize>,
    charset: Option<Charset>,
}

impl Config {
    /// Load configuration from environment variables and optional config file.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (LLM_PROVIDER, OPENAI_API_KEY, SUPABASE_URL, ...)
    /// 2. Config file (`path`, or ~/.config/concierge-eval/config.yaml)
    /// 3. Default values
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file_path = path
            .map(Path::to_path_buf)
            .or_else(Self::config_file_path);

        let mut config = match file_path {
            Some(p) if p.exists() => Self::load_from_file(&p)?,
            Some(p) if path.is_some() => {
                return Err(EvalError::Config(format!(
                    "config file not found at '{}'",
                    p.display()
                )));
            }
            _ => Config::default(),
        };

        config.apply_env(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Override values from a variable lookup (the process environment in
    /// production, a map in tests).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = lookup("LLM_PROVIDER") {
            self.llm.provider = provider.parse()?;
        }

        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.llm.openai.api_key = key;
        }
        if let Some(base) = lookup("OPENAI_API_BASE") {
            self.llm.openai.api_base = base;
        }
        if let Some(model) = lookup("OPENAI_MODEL") {
            self.llm.openai.model = model;
        }

        if let Some(key) = lookup("GOOGLE_GENERATIVE_AI_API_KEY") {
            self.llm.google.api_key = key;
        }
        if let Some(base) = lookup("GOOGLE_API_BASE") {
            self.llm.google.api_base = base;
        }
        if let Some(model) = lookup("GOOGLE_MODEL") {
            self.llm.google.model = model;
        }

        if let Some(url) = lookup("SUPABASE_URL") {
            self.store.url = url;
        }
        if let Some(key) = lookup("SUPABASE_SERVICE_KEY") {
            self.store.service_key = key;
        }

        if let Some(count) = lookup("EVAL_INQUIRY_COUNT") {
            self.run.inquiry_count = parse_number("EVAL_INQUIRY_COUNT", &count)?;
        }
        if let Some(delay) = lookup("EVAL_REQUEST_DELAY_MS") {
            self.run.request_delay_ms = parse_number("EVAL_REQUEST_DELAY_MS", &delay)?;
        }

        Ok(())
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EvalError::io(path, e))?;

        let file_config: ConfigFile = serde_yaml::from_str(&content)
            .map_err(|e| EvalError::Config(format!("Failed to parse config file: {}", e)))?;

        let mut config = Config::default();

        if let Some(llm) = file_config.llm {
            if let Some(provider) = llm.provider {
                config.llm.provider = provider.parse()?;
            }
            if let Some(openai) = llm.openai {
                if let Some(api_base) = openai.api_base {
                    config.llm.openai.api_base = api_base;
                }
                if let Some(api_key) = openai.api_key {
                    config.llm.openai.api_key = api_key;
                }
                if let Some(model) = openai.model {
                    config.llm.openai.model = model;
                }
                config.llm.openai.max_tokens = openai.max_tokens;
                config.llm.openai.temperature = openai.temperature;
            }
            if let Some(google) = llm.google {
                if let Some(api_base) = google.api_base {
                    config.llm.google.api_base = api_base;
                }
                if let Some(api_key) = google.api_key {
                    config.llm.google.api_key = api_key;
                }
                if let Some(model) = google.model {
                    config.llm.google.model = model;
                }
            }
        }

        if let Some(store) = file_config.store {
            if let Some(url) = store.url {
                config.store.url = url;
            }
            if let Some(service_key) = store.service_key {
                config.store.service_key = service_key;
            }
            if let Some(table) = store.chunks_table {
                config.store.chunks_table = table;
            }
            if let Some(table) = store.normalized_table {
                config.store.normalized_table = table;
            }
        }

        if let Some(run) = file_config.run {
            if let Some(count) = run.inquiry_count {
                config.run.inquiry_count = count;
            }
            if let Some(delay) = run.request_delay_ms {
                config.run.request_delay_ms = delay;
            }
            if let Some(limit) = run.candidate_limit {
                config.run.candidate_limit = limit;
            }
            if let Some(top_k) = run.top_k {
                config.run.top_k = top_k;
            }
            if let Some(charset) = run.charset {
                config.run.charset = charset;
            }
        }

        Ok(config)
    }

    /// Get the default config file path.
    pub fn config_file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "concierge-eval")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Validate that everything a live run needs is present.
    pub fn validate(&self) -> Result<()> {
        self.validate_llm()?;

        if self.store.url.is_empty() || self.store.service_key.is_empty() {
            return Err(EvalError::Config(
                "SUPABASE_URL and SUPABASE_SERVICE_KEY are required".to_string(),
            ));
        }

        if self.run.top_k == 0 || self.run.candidate_limit == 0 {
            return Err(EvalError::InvalidConfig(
                "candidate_limit and top_k must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Check only the selected LLM backend's credentials.
    pub fn validate_llm(&self) -> Result<()> {
        match self.llm.provider {
            Provider::OpenAi if self.llm.openai.api_key.is_empty() => {
                return Err(EvalError::Config(
                    "OPENAI_API_KEY is required when LLM_PROVIDER=openai".to_string(),
                ));
            }
            Provider::Google if self.llm.google.api_key.is_empty() => {
                return Err(EvalError::Config(
                    "GOOGLE_GENERATIVE_AI_API_KEY is required when LLM_PROVIDER=google"
                        .to_string(),
                ));
            }
            _ => Ok(()),
        }
    }
}

/// Parse a numeric environment override, naming the variable on failure.
fn parse_number<T: FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| {
        EvalError::InvalidConfig(format!("{} must be a non-negative integer, got '{}'", name, raw))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn complete_config() -> Config {
        let mut config = Config::default();
        config
            .apply_env(lookup(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("SUPABASE_URL", "https://example.supabase.co"),
                ("SUPABASE_SERVICE_KEY", "service"),
            ]))
            .unwrap();
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.provider, Provider::OpenAi);
        assert_eq!(config.llm.openai.model, "gpt-4o-mini");
        assert_eq!(config.llm.google.model, "gemini-2.0-flash");
        assert_eq!(config.store.chunks_table, "rag_chunks");
        assert_eq!(config.run.inquiry_count, 200);
        assert_eq!(config.run.request_delay_ms, 500);
        assert_eq!(config.run.top_k, 6);
        assert_eq!(config.run.candidate_limit, 6);
        assert_eq!(config.run.charset, Charset::Cjk);
    }

    #[test]
    fn test_validate_fails_without_required_fields() {
        assert!(Config::default().validate().is_err());
    }

    #[test]
    fn test_validate_requires_store() {
        let mut config = Config::default();
        config
            .apply_env(lookup(&[("OPENAI_API_KEY", "sk-test")]))
            .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("SUPABASE_URL"));
        assert!(config.validate_llm().is_ok());
    }

    #[test]
    fn test_validate_checks_selected_provider_key() {
        let mut config = complete_config();
        assert!(config.validate().is_ok());

        config
            .apply_env(lookup(&[("LLM_PROVIDER", "google")]))
            .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("GOOGLE_GENERATIVE_AI_API_KEY"));

        config
            .apply_env(lookup(&[("GOOGLE_GENERATIVE_AI_API_KEY", "g-key")]))
            .unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.llm.model(), "gemini-2.0-flash");
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_env(lookup(&[("LLM_PROVIDER", "anthropic")]));
        assert!(matches!(result, Err(EvalError::InvalidConfig(_))));
    }

    #[test]
    fn test_provider_parsing_is_case_insensitive() {
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!(" Google ".parse::<Provider>().unwrap(), Provider::Google);
    }

    #[test]
    fn test_numeric_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env(lookup(&[
                ("EVAL_INQUIRY_COUNT", "12"),
                ("EVAL_REQUEST_DELAY_MS", " 0 "),
            ]))
            .unwrap();
        assert_eq!(config.run.inquiry_count, 12);
        assert_eq!(config.run.request_delay_ms, 0);
    }

    #[test]
    fn test_unparsable_numeric_env_is_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_env(lookup(&[("EVAL_REQUEST_DELAY_MS", "1s")]))
            .unwrap_err();
        assert!(matches!(err, EvalError::InvalidConfig(ref m) if m.contains("EVAL_REQUEST_DELAY_MS")));
        assert_eq!(config.run.request_delay_ms, 500);

        let err = config
            .apply_env(lookup(&[("EVAL_INQUIRY_COUNT", "-5")]))
            .unwrap_err();
        assert!(matches!(err, EvalError::InvalidConfig(ref m) if m.contains("EVAL_INQUIRY_COUNT")));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            r#"
llm:
  provider: google
  google:
    api_key: g-key
    model: gemini-1.5-pro
store:
  url: https://example.supabase.co
  service_key: service
run:
  inquiry_count: 30
  request_delay_ms: 0
  charset: legacy
"#,
        )
        .unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.llm.provider, Provider::Google);
        assert_eq!(config.llm.google.model, "gemini-1.5-pro");
        assert_eq!(config.llm.openai.model, "gpt-4o-mini");
        assert_eq!(config.store.url, "https://example.supabase.co");
        assert_eq!(config.run.inquiry_count, 30);
        assert_eq!(config.run.request_delay_ms, 0);
        assert_eq!(config.run.charset, Charset::Legacy);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let result = Config::load(Some(Path::new("/nonexistent/concierge.yaml")));
        assert!(matches!(result, Err(EvalError::Config(_))));
    }
}
