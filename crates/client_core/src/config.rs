use std::{fs, io, path::Path, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use url::Url;

use crate::provider::DEFAULT_CANNED_LATENCY;

pub const SETTINGS_FILE: &str = "lexi.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `None` selects the canned provider.
    pub answer_endpoint: Option<Url>,
    pub request_timeout: Duration,
    pub canned_latency: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            answer_endpoint: None,
            request_timeout: Duration::from_secs(30),
            canned_latency: DEFAULT_CANNED_LATENCY,
        }
    }
}

/// Command-line values that take precedence over file and environment.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    pub latency_ms: Option<u64>,
}

impl Settings {
    /// Layers the command-line values on top and validates the merged result.
    pub fn apply(&mut self, overrides: &SettingsOverrides) -> anyhow::Result<()> {
        if let Some(endpoint) = &overrides.endpoint {
            self.answer_endpoint = parse_endpoint(endpoint)?;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = overrides.latency_ms {
            self.canned_latency = Duration::from_millis(ms);
        }
        self.validate()
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.request_timeout.is_zero(),
            "request timeout must be at least one second"
        );
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    answer_endpoint: Option<String>,
    request_timeout_secs: Option<u64>,
    canned_latency_ms: Option<u64>,
}

/// Defaults, then `lexi.toml` in the working directory, then the environment.
///
/// The result is not validated yet; [`Settings::apply`] does that once the
/// command-line layer is on top.
pub fn load_settings() -> anyhow::Result<Settings> {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let file_cfg = match fs::read_to_string(path) {
        Ok(raw) => toml::from_str::<FileSettings>(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => FileSettings::default(),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    };

    if let Some(v) = file_cfg.answer_endpoint {
        settings.answer_endpoint = parse_endpoint(&v)?;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout = Duration::from_secs(v);
    }
    if let Some(v) = file_cfg.canned_latency_ms {
        settings.canned_latency = Duration::from_millis(v);
    }

    if let Some(v) = env("LEXI_ANSWER_ENDPOINT") {
        settings.answer_endpoint = parse_endpoint(&v)?;
    }
    if let Some(v) = env("APP__ANSWER_ENDPOINT") {
        settings.answer_endpoint = parse_endpoint(&v)?;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        let secs = v
            .trim()
            .parse::<u64>()
            .with_context(|| format!("APP__REQUEST_TIMEOUT_SECS is not a number: '{v}'"))?;
        settings.request_timeout = Duration::from_secs(secs);
    }
    if let Some(v) = env("APP__CANNED_LATENCY_MS") {
        let millis = v
            .trim()
            .parse::<u64>()
            .with_context(|| format!("APP__CANNED_LATENCY_MS is not a number: '{v}'"))?;
        settings.canned_latency = Duration::from_millis(millis);
    }

    Ok(settings)
}

/// Blank means "no endpoint".
pub fn parse_endpoint(raw: &str) -> anyhow::Result<Option<Url>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let url = Url::parse(raw).with_context(|| format!("invalid answer endpoint url '{raw}'"))?;
    Ok(Some(url))
}
