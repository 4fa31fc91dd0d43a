use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::io::IsTerminal;
use std::path::Path;

use crate::replay::RenamePolicy;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub replay: ReplayConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplayConfig {
    #[serde(default)]
    pub rename: RenamePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Minimum hub score for a file to be listed in `hub_files`.
    #[serde(default = "default_hub_threshold")]
    pub hub_threshold: f64,
    /// Length cap for `hub_files` and `abandoned_files`.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Share of files (by in-degree) counted as "top" for hub concentration.
    #[serde(default = "default_hub_top_fraction")]
    pub hub_top_fraction: f64,
    /// Files at or below this size are never abandoned.
    #[serde(default = "default_abandoned_min_size")]
    pub abandoned_min_size: u64,
    /// Percentile of modification times that marks the staleness cutoff.
    #[serde(default = "default_abandoned_percentile")]
    pub abandoned_percentile: f64,
    /// Count imports of paths outside the snapshot toward out-degree.
    #[serde(default = "default_true")]
    pub count_external_imports: bool,
    #[serde(default)]
    pub scalability: ScalabilityWeights,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            hub_threshold: default_hub_threshold(),
            top_n: default_top_n(),
            hub_top_fraction: default_hub_top_fraction(),
            abandoned_min_size: default_abandoned_min_size(),
            abandoned_percentile: default_abandoned_percentile(),
            count_external_imports: default_true(),
            scalability: ScalabilityWeights::default(),
        }
    }
}

/// Penalty weights of the scalability composite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalabilityWeights {
    #[serde(default = "default_hub_weight")]
    pub hub: f64,
    #[serde(default = "default_dead_code_weight")]
    pub dead_code: f64,
    #[serde(default = "default_instability_weight")]
    pub instability: f64,
}

impl Default for ScalabilityWeights {
    fn default() -> Self {
        Self {
            hub: default_hub_weight(),
            dead_code: default_dead_code_weight(),
            instability: default_instability_weight(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    pub resolved_output: String,
}

pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(".codecity/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("codecity/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Project config, user config and the output mode they resolve to.
///
/// `cli_format` is the explicit `--format` value, if any; `--json` wins over
/// everything.
pub fn resolve_config(
    project_root: &Path,
    cli_json: bool,
    cli_format: Option<&str>,
) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;

    let env_format = env::var("FORMAT").ok();
    let resolved_output = resolve_output(
        cli_json,
        cli_format.map(str::to_string),
        user.output.clone(),
        env_format,
    );

    Ok(EffectiveConfig {
        project,
        user,
        resolved_output,
    })
}

fn normalize_output_mode(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        // canonical values
        "pretty" => Some("pretty"),
        "text" => Some("text"),
        "json" => Some("json"),
        // legacy compatibility
        "human" => Some("pretty"),
        "table" => Some("text"),
        _ => None,
    }
}

fn resolve_output(
    cli_json: bool,
    cli_format: Option<String>,
    user_output: Option<String>,
    env_format: Option<String>,
) -> String {
    if cli_json {
        return "json".to_string();
    }

    let explicit = [cli_format, env_format, user_output]
        .into_iter()
        .flatten()
        .find_map(|raw| normalize_output_mode(&raw));
    if let Some(mode) = explicit {
        return mode.to_string();
    }

    if std::io::stdout().is_terminal() {
        "pretty".to_string()
    } else {
        "text".to_string()
    }
}

const fn default_true() -> bool {
    true
}

const fn default_hub_threshold() -> f64 {
    0.05
}

const fn default_top_n() -> usize {
    10
}

const fn default_hub_top_fraction() -> f64 {
    0.1
}

const fn default_abandoned_min_size() -> u64 {
    10
}

const fn default_abandoned_percentile() -> f64 {
    0.25
}

const fn default_hub_weight() -> f64 {
    0.4
}

const fn default_dead_code_weight() -> f64 {
    0.4
}

const fn default_instability_weight() -> f64 {
    0.2
}
