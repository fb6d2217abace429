use std::{fs, path::Path};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::PreparationMode;

pub const DEFAULT_STR_MULTIPLIER: f64 = 15.0;
pub const DEFAULT_CURRENCY_PER_WEIGHT: f64 = 50.0;
pub const DEFAULT_ITEM_IMG: &str = "icons/svg/mystery-man.svg";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncumbranceConfig {
    /// Pounds of capacity per point of strength.
    #[serde(default = "default_str_multiplier")]
    pub str_multiplier: f64,
    /// Coins that weigh one pound.
    #[serde(default = "default_currency_per_weight")]
    pub currency_per_weight: f64,
}

impl Default for EncumbranceConfig {
    fn default() -> Self {
        Self {
            str_multiplier: DEFAULT_STR_MULTIPLIER,
            currency_per_weight: DEFAULT_CURRENCY_PER_WEIGHT,
        }
    }
}

fn default_str_multiplier() -> f64 {
    DEFAULT_STR_MULTIPLIER
}

fn default_currency_per_weight() -> f64 {
    DEFAULT_CURRENCY_PER_WEIGHT
}

fn default_true() -> bool {
    true
}

fn default_item_img() -> String {
    DEFAULT_ITEM_IMG.to_string()
}

fn default_preparation_modes() -> IndexMap<PreparationMode, String> {
    IndexMap::from([
        (PreparationMode::Prepared, "SW5E.PowerPrepPrepared".to_string()),
        (PreparationMode::Always, "SW5E.PowerPrepAlways".to_string()),
        (PreparationMode::Atwill, "SW5E.PowerPrepAtWill".to_string()),
        (PreparationMode::Innate, "SW5E.PowerPrepInnate".to_string()),
    ])
}

/// Settings and constant tables a sheet render depends on.
///
/// Passed explicitly into every render so nothing reads ambient state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetConfig {
    #[serde(default = "default_true")]
    pub currency_weight: bool,
    #[serde(default)]
    pub disable_experience_tracking: bool,
    #[serde(default)]
    pub encumbrance: EncumbranceConfig,
    #[serde(default = "default_preparation_modes")]
    pub preparation_modes: IndexMap<PreparationMode, String>,
    #[serde(default = "default_item_img")]
    pub default_item_img: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            currency_weight: true,
            disable_experience_tracking: false,
            encumbrance: EncumbranceConfig::default(),
            preparation_modes: default_preparation_modes(),
            default_item_img: default_item_img(),
        }
    }
}

impl SheetConfig {
    /// Label key for a preparation mode, falling back to the mode's own name.
    pub fn preparation_label(&self, mode: PreparationMode) -> String {
        match self.preparation_modes.get(&mode) {
            Some(label) => label.clone(),
            None => format!("{:?}", mode).to_lowercase(),
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("failed to parse sheet config YAML")
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("failed to parse sheet config JSON")
    }

    /// Load from a `.json` file, or YAML for any other extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read sheet config: {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let cfg = if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        };
        cfg.with_context(|| format!("invalid sheet config: {}", path.display()))
    }
}
