//! Co-pilot configuration.
//!
//! Settings come from TOML, merged in this order (later wins):
//! - bundled defaults (`include_str!` of the workspace `storyloom.toml`)
//! - `~/.config/storyloom/storyloom.toml`
//! - `./storyloom.toml`
//!
//! The API key is never part of the file; backends read it from the
//! environment.

use crate::AssetQueue;
use config::{Config, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use storyloom_error::{ConfigError, ConfigErrorKind, StoryloomResult};
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../storyloom.toml");

/// Agent Client and executor settings (`[copilot]`).
///
/// # Example
///
/// ```toml
/// [copilot]
/// model = "gemini-2.5-flash"
/// temperature = 0.7
/// timeout_secs = 60
/// asset_queue = "unresolved"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct CopilotConfig {
    /// Model override; the backend default is used when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Cap on reply length
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    /// Upper bound on one Agent Client call
    timeout_secs: u64,
    /// Queue receiving asset suggestions
    asset_queue: AssetQueue,
    /// Greeting shown as the first conversation entry, never sent as history
    #[serde(skip_serializing_if = "Option::is_none")]
    welcome_message: Option<String>,
}

impl Default for CopilotConfig {
    fn default() -> Self {
        Self {
            model: None,
            temperature: None,
            max_output_tokens: None,
            timeout_secs: 60,
            asset_queue: AssetQueue::Discovered,
            welcome_message: None,
        }
    }
}

impl CopilotConfig {
    /// Agent Client timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Debounced narrative analysis settings (`[analysis]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Whether script edits schedule analysis at all
    enabled: bool,
    /// Quiet period after the last edit before analysis runs
    quiet_period_ms: u64,
    /// Model override for analysis
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            quiet_period_ms: 2_000,
            model: None,
        }
    }
}

impl AnalysisConfig {
    /// Quiet period as a [`Duration`].
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }
}

/// Top-level storyloom configuration.
///
/// # Example
///
/// ```no_run
/// use storyloom_copilot::StoryloomConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = StoryloomConfig::load()?;
/// println!("timeout: {:?}", config.copilot().timeout());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct StoryloomConfig {
    /// `[copilot]` table
    copilot: CopilotConfig,
    /// `[analysis]` table
    analysis: AnalysisConfig,
}

impl StoryloomConfig {
    /// Load configuration from one explicit file, on top of built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns a config error if the file cannot be read, does not parse, or
    /// holds out-of-range values.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> StoryloomResult<Self> {
        debug!("Loading configuration from file");
        let builder = Config::builder().add_source(File::from(path.as_ref()));
        Self::finish(builder)
    }

    /// Load configuration with precedence: current dir > home dir > bundled.
    ///
    /// Missing user files are skipped silently.
    #[instrument]
    pub fn load() -> StoryloomResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/storyloom/storyloom.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("storyloom").required(false));

        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> StoryloomResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Load(e.to_string())))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Parse(e.to_string())))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot work.
    ///
    /// # Errors
    ///
    /// [`ConfigErrorKind::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.copilot.timeout_secs == 0 {
            return Err(invalid("copilot.timeout_secs", "must be greater than zero"));
        }
        if let Some(temperature) = self.copilot.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            return Err(invalid("copilot.temperature", "must be between 0.0 and 2.0"));
        }
        if self.copilot.max_output_tokens == Some(0) {
            return Err(invalid(
                "copilot.max_output_tokens",
                "must be greater than zero",
            ));
        }
        if self.analysis.enabled && self.analysis.quiet_period_ms == 0 {
            return Err(invalid(
                "analysis.quiet_period_ms",
                "must be greater than zero when analysis is enabled",
            ));
        }
        Ok(())
    }
}

#[track_caller]
fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::new(ConfigErrorKind::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    })
}
