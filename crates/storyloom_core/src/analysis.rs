//! Narrative analysis report.
//!
//! Scores are read leniently: any JSON number (or numeric string) is rounded
//! and clamped to `1..=10`. A missing, `null` or non-numeric score reads as
//! `0`, meaning unscored, instead of failing the whole report.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Read a model-supplied score into `1..=10`, or `0` when unscored.
fn lenient_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let score = match &raw {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(score
        .filter(|score| score.is_finite())
        .map_or(0, |score| score.round().clamp(1.0, 10.0) as u8))
}

/// Tension reading for one scene.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScenePacing {
    /// Scene heading or label
    pub scene: String,
    /// 1 (flat) to 10 (peak)
    #[serde(deserialize_with = "lenient_score")]
    pub tension: u8,
    /// One-line observation
    pub note: String,
}

/// How consistently a character sounds like themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VoiceConsistency {
    /// Character name
    pub character: String,
    /// 1 (erratic) to 10 (consistent)
    #[serde(deserialize_with = "lenient_score")]
    pub consistency: u8,
    /// One-line observation
    pub note: String,
}

/// How strongly a theme is carried by the script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeCoverage {
    /// Theme name
    pub theme: String,
    /// 1 (absent) to 10 (pervasive)
    #[serde(deserialize_with = "lenient_score")]
    pub coverage: u8,
}

/// Pacing, character voice and theme report for a script.
///
/// Every field defaults when the model omits it.
///
/// # Examples
///
/// ```
/// use storyloom_core::NarrativeAnalysis;
///
/// let analysis: NarrativeAnalysis = serde_json::from_str(
///     r#"{"summary": "Tight heist", "themes": [{"theme": "greed", "coverage": 7}]}"#,
/// ).unwrap();
/// assert_eq!(analysis.themes[0].coverage, 7);
/// assert!(analysis.pacing.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NarrativeAnalysis {
    /// Short overall summary
    pub summary: String,
    /// Per-scene pacing
    pub pacing: Vec<ScenePacing>,
    /// Per-character voice consistency
    pub character_voice: Vec<VoiceConsistency>,
    /// Theme coverage
    pub themes: Vec<ThemeCoverage>,
}

impl NarrativeAnalysis {
    /// True when the report carries nothing.
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
            && self.pacing.is_empty()
            && self.character_voice.is_empty()
            && self.themes.is_empty()
    }
}
