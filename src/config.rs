//! Pipeline configuration, loaded from JSON.
//!
//! Predefined emoji entries may be written as bare names or as
//! `{name, label, url}` objects. Both forms are normalized into
//! [`PredefinedEmoji`] when the configuration is loaded, so nothing
//! downstream has to branch on their shape.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::emoji::{emoji_url, ensure_name};
use crate::error::{EmojiError, Result};
use crate::palette_builder::DEFAULT_MAX_PALETTE_SIZE;
use crate::quantize::DEFAULT_QUANTIZATION_STEP;
use crate::sampler::DEFAULT_SAMPLING_SIZE;

pub const DEFAULT_BASE_PATH: &str = "/all_emoji";

/// Largest grid the sampler accepts.
pub const MAX_SAMPLING_SIZE: u32 = 256;

/// A selectable emoji: the name the pipeline resolves, a display label and
/// the URL of its image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredefinedEmoji {
    pub name: String,
    pub label: String,
    pub url: String,
}

/// Predefined entry as written in the configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawPredefined {
    Name(String),
    Detailed {
        name: Option<String>,
        label: Option<String>,
        url: Option<String>,
    },
}

impl RawPredefined {
    fn normalize(self, base_path: &str) -> Result<PredefinedEmoji> {
        match self {
            RawPredefined::Name(raw) => {
                let name = ensure_name(&raw)?;
                Ok(PredefinedEmoji {
                    label: name.clone(),
                    url: emoji_url(base_path, &name),
                    name,
                })
            }
            RawPredefined::Detailed { name, label, url } => {
                let raw_name = name
                    .as_deref()
                    .or(label.as_deref())
                    .ok_or_else(|| {
                        EmojiError::invalid_name("", "entry has neither name nor label")
                    })?;
                let clean = ensure_name(raw_name)?;
                Ok(PredefinedEmoji {
                    label: label.or(name).unwrap_or_else(|| clean.clone()),
                    url: url.unwrap_or_else(|| emoji_url(base_path, &clean)),
                    name: clean,
                })
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawConfig {
    sampling_size: u32,
    quantization_step: u16,
    max_palette_size: usize,
    base_path: String,
    predefined: Vec<RawPredefined>,
}

impl Default for RawConfig {
    fn default() -> Self {
        let defaults = EmojiConfig::default();
        RawConfig {
            sampling_size: defaults.sampling_size,
            quantization_step: defaults.quantization_step,
            max_palette_size: defaults.max_palette_size,
            base_path: defaults.base_path,
            predefined: Vec::new(),
        }
    }
}

/// Settings for sampling, quantization and name resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConfig", rename_all = "camelCase")]
pub struct EmojiConfig {
    /// Side length of the sampled grid.
    pub sampling_size: u32,
    /// Channel rounding granularity.
    pub quantization_step: u16,
    /// Upper bound on palette entries.
    pub max_palette_size: usize,
    /// URL prefix that emoji images are served under.
    pub base_path: String,
    /// Configured override for the selectable emoji list.
    pub predefined: Vec<PredefinedEmoji>,
}

impl Default for EmojiConfig {
    fn default() -> Self {
        EmojiConfig {
            sampling_size: DEFAULT_SAMPLING_SIZE,
            quantization_step: DEFAULT_QUANTIZATION_STEP,
            max_palette_size: DEFAULT_MAX_PALETTE_SIZE,
            base_path: DEFAULT_BASE_PATH.to_string(),
            predefined: Vec::new(),
        }
    }
}

impl TryFrom<RawConfig> for EmojiConfig {
    type Error = EmojiError;

    fn try_from(raw: RawConfig) -> Result<Self> {
        let predefined = raw
            .predefined
            .into_iter()
            .map(|entry| entry.normalize(&raw.base_path))
            .collect::<Result<Vec<_>>>()?;

        let config = EmojiConfig {
            sampling_size: raw.sampling_size,
            quantization_step: raw.quantization_step,
            max_palette_size: raw.max_palette_size,
            base_path: raw.base_path,
            predefined,
        };
        config.validate()?;
        Ok(config)
    }
}

impl EmojiConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| EmojiError::InvalidConfig {
            field: "path",
            reason: format!("cannot read '{}': {e}", path.display()),
        })?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.quantization_step == 0 {
            return Err(EmojiError::InvalidConfig {
                field: "quantizationStep",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.sampling_size > MAX_SAMPLING_SIZE {
            return Err(EmojiError::InvalidConfig {
                field: "samplingSize",
                reason: format!("{} exceeds {MAX_SAMPLING_SIZE}", self.sampling_size),
            });
        }
        Ok(())
    }

    /// URL of the image for `name` under this configuration's base path.
    pub fn emoji_url(&self, name: &str) -> Result<String> {
        Ok(emoji_url(&self.base_path, &ensure_name(name)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = EmojiConfig::from_json("{}").unwrap();
        assert_eq!(config, EmojiConfig::default());
        assert_eq!(config.sampling_size, 16);
        assert_eq!(config.quantization_step, 32);
        assert_eq!(config.max_palette_size, 12);
    }

    #[test]
    fn normalizes_both_entry_shapes() {
        let config = EmojiConfig::from_json(
            r#"{
                "basePath": "/faces/",
                "predefined": [
                    "smile.png",
                    {"label": "Heart"},
                    {"name": "wink", "label": "Wink", "url": "https://cdn.example/wink.png"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.predefined,
            vec![
                PredefinedEmoji {
                    name: "smile".into(),
                    label: "smile".into(),
                    url: "/faces/smile.png".into(),
                },
                PredefinedEmoji {
                    name: "Heart".into(),
                    label: "Heart".into(),
                    url: "/faces/Heart.png".into(),
                },
                PredefinedEmoji {
                    name: "wink".into(),
                    label: "Wink".into(),
                    url: "https://cdn.example/wink.png".into(),
                },
            ]
        );
    }

    #[test]
    fn entry_without_name_or_label_is_rejected() {
        let err = EmojiConfig::from_json(r#"{"predefined": [{"url": "/x.png"}]}"#).unwrap_err();
        assert!(err.to_string().contains("neither name nor label"), "{err}");
    }

    #[test]
    fn zero_step_is_rejected() {
        let err = EmojiConfig::from_json(r#"{"quantizationStep": 0}"#).unwrap_err();
        assert!(err.to_string().contains("quantizationStep"), "{err}");
    }

    #[test]
    fn oversized_grid_is_rejected() {
        assert!(EmojiConfig::from_json(r#"{"samplingSize": 257}"#).is_err());
        assert!(EmojiConfig::from_json(r#"{"samplingSize": 256}"#).is_ok());
    }

    #[test]
    fn serialized_config_loads_back() {
        let config =
            EmojiConfig::from_json(r#"{"predefined": ["smile"], "maxPaletteSize": 4}"#).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(EmojiConfig::from_json(&json).unwrap(), config);
    }
}
