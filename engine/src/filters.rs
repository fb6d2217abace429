use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::classify::ItemView;
use crate::model::PreparationMode;

/// A named filter toggled on one of the sheet's item lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemFilter {
    Action,
    Bonus,
    Reaction,
    Ritual,
    Concentration,
    Prepared,
    Equipped,
}

impl ItemFilter {
    fn activation_key(self) -> Option<&'static str> {
        match self {
            ItemFilter::Action => Some("action"),
            ItemFilter::Bonus => Some("bonus"),
            ItemFilter::Reaction => Some("reaction"),
            _ => None,
        }
    }
}

/// Active filters for one list. All filters must pass for an item to stay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet(pub IndexSet<ItemFilter>);

impl FilterSet {
    pub fn new(filters: impl IntoIterator<Item = ItemFilter>) -> Self {
        Self(filters.into_iter().collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, f: ItemFilter) -> bool {
        self.0.contains(&f)
    }

    pub fn matches(&self, view: &ItemView<'_>) -> bool {
        let data = &view.item.data;

        for f in [ItemFilter::Action, ItemFilter::Bonus, ItemFilter::Reaction] {
            if !self.has(f) {
                continue;
            }
            // Items without an activation block are not filtered by activation type.
            if let Some(activation) = &data.activation {
                if activation.kind.as_deref() != f.activation_key() {
                    return false;
                }
            }
        }

        let components = data.components.clone().unwrap_or_default();
        if self.has(ItemFilter::Ritual) && !components.ritual {
            return false;
        }
        if self.has(ItemFilter::Concentration) && !components.concentration {
            return false;
        }

        if self.has(ItemFilter::Prepared) {
            let mode = data.preparation_mode();
            if data.level == 0 || matches!(mode, PreparationMode::Innate | PreparationMode::Always)
            {
                return true;
            }
            return data.is_prepared();
        }

        if self.has(ItemFilter::Equipped) && !data.equipped {
            return false;
        }
        true
    }

    pub fn apply<'a>(&self, views: Vec<ItemView<'a>>) -> Vec<ItemView<'a>> {
        if self.is_empty() {
            return views;
        }
        views.into_iter().filter(|v| self.matches(v)).collect()
    }
}

/// Filter state for each filterable list on the sheet. Owned by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetFilters {
    #[serde(default)]
    pub inventory: FilterSet,
    #[serde(default)]
    pub powerbook: FilterSet,
    #[serde(default)]
    pub features: FilterSet,
}
