use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default clearance kept around every obstacle.
pub const DEFAULT_SPACING: i32 = 15;
/// Default stride between candidate trial positions. Smaller improves route
/// quality at a higher search cost.
pub const DEFAULT_STEP_SIZE: i32 = 5;
/// Default cap on trial positions examined while routing one path.
pub const DEFAULT_MAX_LINE_COUNT: u32 = 200_000;

/// Engine tunables. These are per-router knobs, not per-call arguments.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RouterConfig {
    pub spacing: i32,
    pub step_size: i32,
    pub max_line_count: u32,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_SPACING,
            step_size: DEFAULT_STEP_SIZE,
            max_line_count: DEFAULT_MAX_LINE_COUNT,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RouterConfigFile {
    spacing: Option<i32>,
    step_size: Option<i32>,
    max_line_count: Option<u32>,
}

/// Load a config from a camelCase JSON file of optional overrides; absent
/// fields keep their defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<RouterConfig> {
    let mut config = RouterConfig::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: RouterConfigFile = serde_json::from_str(&contents)?;

    if let Some(v) = parsed.spacing {
        config.spacing = v.max(0);
    }
    if let Some(v) = parsed.step_size {
        config.step_size = v.max(1);
    }
    if let Some(v) = parsed.max_line_count {
        config.max_line_count = v;
    }
    Ok(config)
}
