use serde::Serialize;
use tracing::debug;

use crate::config::SheetConfig;
use crate::model::{Item, ItemKind, PreparationMode};

/// The six item kinds that live in the inventory, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryKind {
    Weapon,
    Equipment,
    Consumable,
    Tool,
    Backpack,
    Loot,
}

impl InventoryKind {
    pub const ALL: [InventoryKind; 6] = [
        InventoryKind::Weapon,
        InventoryKind::Equipment,
        InventoryKind::Consumable,
        InventoryKind::Tool,
        InventoryKind::Backpack,
        InventoryKind::Loot,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InventoryKind::Weapon => "weapon",
            InventoryKind::Equipment => "equipment",
            InventoryKind::Consumable => "consumable",
            InventoryKind::Tool => "tool",
            InventoryKind::Backpack => "backpack",
            InventoryKind::Loot => "loot",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InventoryKind::Weapon => "SW5E.ItemTypeWeaponPl",
            InventoryKind::Equipment => "SW5E.ItemTypeEquipmentPl",
            InventoryKind::Consumable => "SW5E.ItemTypeConsumablePl",
            InventoryKind::Tool => "SW5E.ItemTypeToolPl",
            InventoryKind::Backpack => "SW5E.ItemTypeContainerPl",
            InventoryKind::Loot => "SW5E.ItemTypeLootPl",
        }
    }
}

/// Which sheet section an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Inventory(InventoryKind),
    Power,
    Feature,
    Class,
    /// Not shown anywhere on the sheet.
    Unrecognized,
}

impl Category {
    pub fn of(kind: &ItemKind) -> Self {
        match kind {
            ItemKind::Weapon => Category::Inventory(InventoryKind::Weapon),
            ItemKind::Equipment => Category::Inventory(InventoryKind::Equipment),
            ItemKind::Consumable => Category::Inventory(InventoryKind::Consumable),
            ItemKind::Tool => Category::Inventory(InventoryKind::Tool),
            ItemKind::Backpack => Category::Inventory(InventoryKind::Backpack),
            ItemKind::Loot => Category::Inventory(InventoryKind::Loot),
            ItemKind::Power => Category::Power,
            ItemKind::Feat => Category::Feature,
            ItemKind::Class => Category::Class,
            ItemKind::Other(_) => Category::Unrecognized,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleClass {
    Active,
    Fixed,
    #[serde(rename = "")]
    Inactive,
}

/// Prepared/equipped indicator shown next to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleState {
    pub class: ToggleClass,
    pub title: String,
}

impl ToggleState {
    pub fn for_item(item: &Item, cfg: &SheetConfig) -> Self {
        match item.kind {
            ItemKind::Power => {
                let mode = item.data.preparation_mode();
                if mode == PreparationMode::Always {
                    ToggleState {
                        class: ToggleClass::Fixed,
                        title: cfg.preparation_label(PreparationMode::Always),
                    }
                } else if item.data.is_prepared() {
                    ToggleState {
                        class: ToggleClass::Active,
                        title: cfg.preparation_label(PreparationMode::Prepared),
                    }
                } else {
                    ToggleState {
                        class: ToggleClass::Inactive,
                        title: "SW5E.PowerUnprepared".to_string(),
                    }
                }
            }
            _ if item.data.equipped => ToggleState {
                class: ToggleClass::Active,
                title: "SW5E.Equipped".to_string(),
            },
            _ => ToggleState {
                class: ToggleClass::Inactive,
                title: "SW5E.Unequipped".to_string(),
            },
        }
    }

    pub fn is_on(&self) -> bool {
        !matches!(self.class, ToggleClass::Inactive)
    }
}

/// Display-only view of an owned item. The underlying record is left untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView<'a> {
    pub item: &'a Item,
    pub img: &'a str,
    pub is_stack: bool,
    pub has_uses: bool,
    pub is_on_cooldown: bool,
    pub is_depleted: bool,
    pub has_target: bool,
    pub toggle: ToggleState,
}

impl<'a> ItemView<'a> {
    pub fn new(item: &'a Item, cfg: &'a SheetConfig) -> Self {
        let data = &item.data;
        let is_stack = data.quantity.is_some_and(|q| q > 1.0);
        let has_uses = data
            .uses
            .as_ref()
            .and_then(|u| u.max)
            .is_some_and(|max| max > 0.0);
        let is_on_cooldown = data
            .recharge
            .as_ref()
            .is_some_and(|r| r.value.is_some_and(|v| v != 0) && r.charged == Some(false));
        let is_depleted = is_on_cooldown
            && data.uses.as_ref().is_some_and(|u| {
                u.per.as_deref().is_some_and(|p| !p.is_empty()) && u.value.is_some_and(|v| v > 0.0)
            });
        let has_target = data
            .target
            .as_ref()
            .and_then(|t| t.kind.as_deref())
            .is_some_and(|kind| !matches!(kind, "" | "none"));
        let img = item
            .img
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(cfg.default_item_img.as_str());

        Self {
            item,
            img,
            is_stack,
            has_uses,
            is_on_cooldown,
            is_depleted,
            has_target,
            toggle: ToggleState::for_item(item, cfg),
        }
    }

    pub fn category(&self) -> Category {
        Category::of(&self.item.kind)
    }
}

/// Items split by sheet section, input order kept within each part.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partitions<'a> {
    pub inventory: Vec<ItemView<'a>>,
    pub powers: Vec<ItemView<'a>>,
    pub features: Vec<ItemView<'a>>,
    pub classes: Vec<ItemView<'a>>,
}

impl<'a> Partitions<'a> {
    pub fn len(&self) -> usize {
        self.inventory.len() + self.powers.len() + self.features.len() + self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn classify<'a>(items: &'a [Item], cfg: &'a SheetConfig) -> Partitions<'a> {
    let mut parts = Partitions::default();
    for item in items {
        let view = ItemView::new(item, cfg);
        match view.category() {
            Category::Inventory(_) => parts.inventory.push(view),
            Category::Power => parts.powers.push(view),
            Category::Feature => parts.features.push(view),
            Category::Class => parts.classes.push(view),
            Category::Unrecognized => {
                debug!(item = %item.id, kind = item.kind.as_str(), "item left off the sheet");
            }
        }
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemData, Recharge, Uses};

    fn item(kind: &str, data: ItemData) -> Item {
        Item {
            id: kind.to_string(),
            name: kind.to_string(),
            img: None,
            kind: ItemKind::from(kind.to_string()),
            data,
        }
    }

    #[test]
    fn depleted_needs_cooldown_and_remaining_uses() {
        let cfg = SheetConfig::default();
        let charged = item(
            "weapon",
            ItemData {
                recharge: Some(Recharge {
                    value: Some(5),
                    charged: Some(true),
                }),
                uses: Some(Uses {
                    value: Some(1.0),
                    max: Some(1.0),
                    per: Some("day".into()),
                }),
                ..Default::default()
            },
        );
        let view = ItemView::new(&charged, &cfg);
        assert!(!view.is_on_cooldown);
        assert!(!view.is_depleted);

        let spent = item(
            "weapon",
            ItemData {
                recharge: Some(Recharge {
                    value: Some(5),
                    charged: Some(false),
                }),
                uses: Some(Uses {
                    value: Some(1.0),
                    max: Some(1.0),
                    per: Some("day".into()),
                }),
                ..Default::default()
            },
        );
        let view = ItemView::new(&spent, &cfg);
        assert!(view.is_on_cooldown);
        assert!(view.is_depleted);
        assert!(view.has_uses);
    }

    #[test]
    fn missing_charged_flag_is_not_cooldown() {
        let cfg = SheetConfig::default();
        let it = item(
            "feat",
            ItemData {
                recharge: Some(Recharge {
                    value: Some(6),
                    charged: None,
                }),
                ..Default::default()
            },
        );
        assert!(!ItemView::new(&it, &cfg).is_on_cooldown);
    }

    #[test]
    fn default_image_fills_blank() {
        let cfg = SheetConfig::default();
        let it = item("loot", ItemData::default());
        assert_eq!(ItemView::new(&it, &cfg).img, cfg.default_item_img);
    }
}
