//! The list of emojis a user can pick from.

use crate::config::{EmojiConfig, PredefinedEmoji};
use crate::emoji::{emoji_url, ensure_name};
use crate::error::Result;

/// Configured entries take precedence; the discovered manifest is the
/// fallback when none are configured.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmojiCatalog {
    predefined: Vec<PredefinedEmoji>,
    manifest: Vec<PredefinedEmoji>,
}

impl EmojiCatalog {
    pub fn new(config: &EmojiConfig, manifest: Vec<PredefinedEmoji>) -> Self {
        Self {
            predefined: config.predefined.clone(),
            manifest,
        }
    }

    /// Build the manifest from bare image names, e.g. file names reported by
    /// the page that hosts the images.
    pub fn from_names<I, S>(config: &EmojiConfig, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let manifest = names
            .into_iter()
            .map(|raw| {
                let name = ensure_name(raw.as_ref())?;
                Ok(PredefinedEmoji {
                    label: name.clone(),
                    url: emoji_url(&config.base_path, &name),
                    name,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(config, manifest))
    }

    pub fn list_predefined_emojis(&self) -> &[PredefinedEmoji] {
        if self.predefined.is_empty() {
            &self.manifest
        } else {
            &self.predefined
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_manifest() {
        let catalog =
            EmojiCatalog::from_names(&EmojiConfig::default(), ["smile.png", "wink"]).unwrap();
        let names: Vec<_> = catalog
            .list_predefined_emojis()
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["smile", "wink"]);
        assert_eq!(catalog.list_predefined_emojis()[0].url, "/all_emoji/smile.png");
    }

    #[test]
    fn configured_list_wins() {
        let config =
            EmojiConfig::from_json(r#"{"predefined": [{"name": "heart", "label": "Love"}]}"#)
                .unwrap();
        let catalog = EmojiCatalog::from_names(&config, ["smile"]).unwrap();
        let list = catalog.list_predefined_emojis();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].label, "Love");
    }

    #[test]
    fn bad_manifest_name_is_an_error() {
        assert!(EmojiCatalog::from_names(&EmojiConfig::default(), [".png"]).is_err());
    }

    #[test]
    fn empty_catalog_lists_nothing() {
        assert!(EmojiCatalog::default().list_predefined_emojis().is_empty());
    }
}
