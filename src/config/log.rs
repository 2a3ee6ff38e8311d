use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Target whose level is pinned unless overridden. Command lines of spawned
/// tools are logged under it at debug level.
const PROCESS_TARGET: &str = "twig::process";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_dir")]
    pub dir: Option<String>,

    #[serde(default = "default_console_format")]
    pub console_format: String,

    #[serde(default = "default_true")]
    pub file_enabled: bool,

    #[serde(
        default = "default_ext_level",
        deserialize_with = "deserialize_ext_level"
    )]
    pub ext_level: Option<HashMap<String, String>>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: default_log_dir(),
            console_format: default_console_format(),
            file_enabled: default_true(),
            ext_level: default_ext_level(),
        }
    }
}

impl LogConfig {
    /// `EnvFilter` directive string: the base level followed by per-target
    /// overrides in a stable order.
    pub fn filter_directives(&self) -> String {
        let mut directives = vec![self.level.clone()];
        if let Some(ext_levels) = &self.ext_level {
            let mut targets: Vec<_> = ext_levels.iter().collect();
            targets.sort();
            directives.extend(
                targets
                    .into_iter()
                    .map(|(target, level)| format!("{}={}", target, level)),
            );
        }
        directives.join(",")
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> Option<String> {
    Some("./logs".to_string())
}

fn default_console_format() -> String {
    "pretty".to_string()
}

fn default_true() -> bool {
    true
}

fn default_ext_level() -> Option<HashMap<String, String>> {
    let mut map = HashMap::new();
    map.insert(PROCESS_TARGET.to_string(), "info".to_string());
    Some(map)
}

/// Parses `target:level, target:level`. Targets may contain `::`, so the
/// level is whatever follows the last colon.
fn deserialize_ext_level<'de, D>(
    deserializer: D,
) -> Result<Option<HashMap<String, String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;

    let mut map = default_ext_level().unwrap_or_default();

    for pair in s.iter().flat_map(|s| s.split(',')) {
        if let Some((target, level)) = pair.trim().rsplit_once(':') {
            let target = target.trim();
            if !target.is_empty() && !target.ends_with(':') {
                map.insert(target.to_string(), level.trim().to_string());
            }
        }
    }

    Ok(Some(map))
}
