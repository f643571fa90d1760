use serde::{Deserialize, Serialize};

use crate::error::{SfcError, SfcResult};
use crate::font_face::FontFaceReplacements;

/// Script heap limit per synthesized callable: 1 MB.
pub const DEFAULT_MEMORY_LIMIT_BYTES: usize = 1024 * 1024;

/// Wall-clock budget for one call into a synthesized callable.
pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 200;

pub const MEMORY_LIMIT_ENV: &str = "SFC_MEMORY_LIMIT_BYTES";
pub const CALL_TIMEOUT_ENV: &str = "SFC_CALL_TIMEOUT_MS";

/// Limits applied by the bundled script engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub memory_limit_bytes: usize,
    pub call_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            memory_limit_bytes: DEFAULT_MEMORY_LIMIT_BYTES,
            call_timeout_ms: DEFAULT_CALL_TIMEOUT_MS,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `SFC_MEMORY_LIMIT_BYTES` / `SFC_CALL_TIMEOUT_MS`.
    pub fn from_env() -> SfcResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            memory_limit_bytes: env_or(MEMORY_LIMIT_ENV, defaults.memory_limit_bytes)?,
            call_timeout_ms: env_or(CALL_TIMEOUT_ENV, defaults.call_timeout_ms)?,
        })
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> SfcResult<T> {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            SfcError::ConfigError(format!("{} must be a non-negative integer, got '{}'", name, raw))
        }),
        Err(_) => Ok(default),
    }
}

/// CLI configuration file:
///
/// ```yaml
/// engine:
///   call_timeout_ms: 500
/// font_faces:
///   italic: "@font-face { font-family: PrintItalic; }"
///   bold: "@font-face { font-family: PrintBold; }"
///   classic: "@font-face { font-family: Print; }"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PrintConfig {
    pub engine: EngineConfig,
    pub font_faces: FontFaceReplacements,
}

/// Engine keys present in a YAML file; absent keys keep the base value.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EngineOverrides {
    memory_limit_bytes: Option<usize>,
    call_timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PrintConfigFile {
    engine: EngineOverrides,
    font_faces: FontFaceReplacements,
}

impl PrintConfig {
    /// Parse a config file on top of the built-in defaults.
    pub fn from_yaml_str(yaml: &str) -> SfcResult<Self> {
        Self::from_yaml_over(yaml, EngineConfig::default())
    }

    /// Engine limits from the environment, then the YAML file (if any) on top.
    pub fn load(yaml: Option<&str>) -> SfcResult<Self> {
        let base = EngineConfig::from_env()?;
        match yaml {
            Some(yaml) => Self::from_yaml_over(yaml, base),
            None => Ok(Self {
                engine: base,
                font_faces: FontFaceReplacements::default(),
            }),
        }
    }

    fn from_yaml_over(yaml: &str, base: EngineConfig) -> SfcResult<Self> {
        let file: PrintConfigFile = serde_yaml::from_str(yaml)?;
        Ok(Self {
            engine: EngineConfig {
                memory_limit_bytes: file
                    .engine
                    .memory_limit_bytes
                    .unwrap_or(base.memory_limit_bytes),
                call_timeout_ms: file.engine.call_timeout_ms.unwrap_or(base.call_timeout_ms),
            },
            font_faces: file.font_faces,
        })
    }
}
