//! Client configuration.
//!
//! A [`Config`] is built once per program run and passed by value into
//! [`Client::new`](crate::v4::rest::Client::new). It is resolved from a
//! lookup function so the process environment is only read at the edges
//! ([`Config::from_env`] and [`Config::load`]).

use crate::error::{Error, Result};
use derive_new::new;
use derive_setters::Setters;
use std::collections::HashMap;
use std::fmt::Formatter;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const API_KEY_VAR: &str = "Z_AI_API_KEY";
pub const BASE_URL_VAR: &str = "Z_AI_BASE_URL";
pub const TEMPERATURE_VAR: &str = "Z_AI_TEMPERATURE";
pub const MAX_TOKENS_VAR: &str = "Z_AI_MAX_TOKENS";

pub const DEFAULT_BASE_URL: &str = "https://api.z.ai/api/paas/v4";
pub const CODING_BASE_URL: &str = "https://api.z.ai/api/coding/paas/v4";
pub const DEFAULT_ENV_FILE: &str = ".env";

pub mod models {
    pub const LLM: &str = "glm-4.7";
    pub const LLM_FLASH: &str = "glm-4.5-flash";
    pub const LLM_AIR: &str = "glm-4.5-air";
    pub const VLM: &str = "glm-4.6v";
    pub const VLM_FLASH: &str = "glm-4.6v-flash";
    pub const IMAGE_GEN: &str = "cogView-4-250304";
    pub const VIDEO_GEN: &str = "cogvideox-3";
    pub const AUDIO_ASR: &str = "glm-asr-2512";
}

/// Sampling defaults. Requests should set either a temperature or a top_p, not both.
pub mod defaults {
    pub const TEMPERATURE: f32 = 1.0;
    pub const TOP_P: f32 = 0.95;
    pub const MAX_TOKENS: u32 = 4096;
    pub const MAX_TOKENS_LONG: u32 = 8192;
    pub const MAX_TOKENS_MAX: u32 = 128_000;
    pub const CONTEXT_WINDOW: u32 = 200_000;
}

/// Publicly reachable assets used when a demo is run without input flags.
pub mod samples {
    pub const IMAGES: [&str; 2] = [
        "https://aigc-files.bigmodel.cn/api/cogview/20250723213827da171a419b9b4906_0.png",
        "https://cloudcovert-1305175928.cos.ap-guangzhou.myqcloud.com/%E5%9B%BE%E7%89%87grounding.PNG",
    ];
    pub const VIDEO: &str =
        "https://cloud.video.taobao.com/play/u/null/p/1/e/6/t/1/d/ud/50782830612.mp4";
    pub const FIRST_FRAME: &str = "https://gd-hbimg.huaban.com/ccee58d77afe8f5e17a572246b1994f7e027657fe9e6-qD66In_fw1200webp";
    pub const LAST_FRAME: &str = "https://gd-hbimg.huaban.com/cc2601d568a72d18d90b2cc7f1065b16b2d693f7fa3f7-hDAwNq_fw1200webp";
}

#[derive(Clone, new, Setters)]
#[setters(prefix = "with_", into, strip_option)]
pub struct Config {
    #[setters(skip)]
    #[new(into)]
    api_key: String,
    #[new(value = "DEFAULT_BASE_URL.to_string()")]
    base_url: String,
    #[new(value = "defaults::TEMPERATURE")]
    temperature: f32,
    #[new(value = "defaults::MAX_TOKENS")]
    max_tokens: u32,
    /// Whole-request timeout. Unset means the HTTP client default (none).
    #[new(default)]
    timeout: Option<Duration>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Config {
    /// Loads `.env` from the working directory (if any) and then reads the
    /// process environment, which takes precedence.
    pub fn from_env() -> Result<Self> {
        Self::load(Some(Path::new(DEFAULT_ENV_FILE)))
    }

    /// Like [`Config::from_env`] with an explicit `.env` path. A missing file is
    /// not an error.
    pub fn load(env_file: Option<&Path>) -> Result<Self> {
        let file_vars = match env_file {
            Some(path) => env_file_vars(path)?,
            None => HashMap::new(),
        };
        Self::from_lookup(|key| {
            std::env::var(key)
                .ok()
                .or_else(|| file_vars.get(key).cloned())
        })
    }

    /// Resolves a configuration from an arbitrary key lookup. Blank values are
    /// treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let api_key = get(API_KEY_VAR).ok_or_else(|| {
            Error::Configuration(format!(
                "{API_KEY_VAR} not found in environment variables. \
                 Please set it in your environment or in your {DEFAULT_ENV_FILE} file."
            ))
        })?;

        let mut config = Config::new(api_key);

        if let Some(base_url) = get(BASE_URL_VAR) {
            Url::parse(&base_url).map_err(|e| {
                Error::Configuration(format!("invalid {BASE_URL_VAR} '{base_url}': {e}"))
            })?;
            config.base_url = base_url;
        }
        if let Some(raw) = get(TEMPERATURE_VAR) {
            config.temperature = parse_override(TEMPERATURE_VAR, &raw)?;
        }
        if let Some(raw) = get(MAX_TOKENS_VAR) {
            config.max_tokens = parse_override(MAX_TOKENS_VAR, &raw)?;
        }

        debug!(?config, "configuration resolved");
        Ok(config)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Reads `KEY=value` pairs from a `.env`-style file without touching the
/// process environment. Returns an empty map when the file does not exist.
pub fn env_file_vars(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        debug!(path = %path.display(), "no env file, skipping");
        return Ok(HashMap::new());
    }

    let iter = dotenv::from_path_iter(path).map_err(|e| {
        Error::Configuration(format!("failed to read '{}': {e}", path.display()))
    })?;

    iter.map(|item| {
        item.map_err(|e| {
            Error::Configuration(format!("failed to parse '{}': {e}", path.display()))
        })
    })
    .collect()
}

fn parse_override<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e| Error::Configuration(format!("invalid {key} '{raw}': {e}")))
}
