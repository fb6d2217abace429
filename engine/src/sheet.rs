use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::classify::classify;
use crate::config::SheetConfig;
use crate::features::{group_features, FeatureGroup};
use crate::filters::SheetFilters;
use crate::inventory::{aggregate, Encumbrance, InventoryBucket};
use crate::model::{Actor, HitPoints, Item, ItemKind, RecordSet, Resource};
use crate::powerbook::{organize, PowerbookGrouper, PowerbookSection};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetError {
    #[error("item '{0}' is not owned by this actor")]
    ItemNotFound(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceView {
    pub name: &'static str,
    pub placeholder: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ResourceView {
    /// Zero value/max are left blank so the sheet shows the placeholder.
    fn new(name: &'static str, placeholder: &'static str, res: Option<&Resource>) -> Self {
        let res = res.cloned().unwrap_or_default();
        Self {
            name,
            placeholder,
            value: res.value.filter(|v| *v != 0.0),
            max: res.max.filter(|v| *v != 0.0),
            label: res.label,
        }
    }
}

pub fn resources(actor: &Actor) -> Vec<ResourceView> {
    let r = &actor.data.resources;
    vec![
        ResourceView::new("primary", "SW5E.ResourcePrimary", r.primary.as_ref()),
        ResourceView::new("secondary", "SW5E.ResourceSecondary", r.secondary.as_ref()),
        ResourceView::new("tertiary", "SW5E.ResourceTertiary", r.tertiary.as_ref()),
    ]
}

/// Hit points with zero temporary values dropped.
pub fn hit_points(actor: &Actor) -> HitPoints {
    let hp = actor.data.attributes.hp;
    HitPoints {
        temp: hp.temp.filter(|t| *t != 0),
        tempmax: hp.tempmax.filter(|t| *t != 0),
        ..hp
    }
}

/// Everything the character sheet template renders. Rebuilt on every render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetView<'a> {
    pub inventory_buckets: Vec<InventoryBucket<'a>>,
    pub powerbook: Vec<PowerbookSection<'a>>,
    pub prepared_powers_count: usize,
    pub feature_groups: Vec<FeatureGroup<'a>>,
    pub encumbrance: Encumbrance,
    pub total_weight: f64,
    pub resources: Vec<ResourceView>,
    pub hp: HitPoints,
    pub disable_experience: bool,
}

/// Inputs a render needs besides the records themselves.
pub struct SheetContext<'c> {
    pub config: &'c SheetConfig,
    pub filters: &'c SheetFilters,
    pub grouper: &'c dyn PowerbookGrouper,
}

pub fn build_sheet<'a>(
    actor: &'a Actor,
    items: &'a [Item],
    ctx: &SheetContext<'a>,
) -> SheetView<'a> {
    let cfg = ctx.config;
    let parts = classify(items, cfg);

    let inventory = ctx.filters.inventory.apply(parts.inventory);
    let powers = ctx.filters.powerbook.apply(parts.powers);
    let features = ctx.filters.features.apply(parts.features);

    let powerbook = organize(powers, actor, cfg, ctx.grouper);
    let inventory = aggregate(inventory, actor, cfg);
    let feature_groups = group_features(features, parts.classes);

    SheetView {
        inventory_buckets: inventory.buckets,
        powerbook: powerbook.sections,
        prepared_powers_count: powerbook.prepared_count,
        feature_groups,
        encumbrance: inventory.encumbrance,
        total_weight: inventory.total_weight,
        resources: resources(actor),
        hp: hit_points(actor),
        disable_experience: cfg.disable_experience_tracking,
    }
}

impl RecordSet {
    pub fn sheet<'a>(&'a self, ctx: &SheetContext<'a>) -> SheetView<'a> {
        build_sheet(&self.actor, &self.items, ctx)
    }

    pub fn toggle(&self, item_id: &str) -> Result<ItemUpdate, SheetError> {
        toggle_item(&self.items, item_id)
    }
}

/* ---------------- item toggles ---------------- */

/// The field a toggle flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleField {
    Prepared,
    Equipped,
}

impl ToggleField {
    pub fn for_kind(kind: &ItemKind) -> Self {
        match kind {
            ItemKind::Power => ToggleField::Prepared,
            ItemKind::Weapon
            | ItemKind::Equipment
            | ItemKind::Consumable
            | ItemKind::Tool
            | ItemKind::Backpack
            | ItemKind::Loot
            | ItemKind::Feat
            | ItemKind::Class
            | ItemKind::Other(_) => ToggleField::Equipped,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            ToggleField::Prepared => "data.preparation.prepared",
            ToggleField::Equipped => "data.equipped",
        }
    }
}

/// A single-field item update, serialized as `{ "<path>": value }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUpdate {
    pub item_id: String,
    pub field: ToggleField,
    pub value: bool,
}

impl Serialize for ItemUpdate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.field.path(), &self.value)?;
        map.end()
    }
}

pub fn toggle_update(item: &Item) -> ItemUpdate {
    let field = ToggleField::for_kind(&item.kind);
    let current = match field {
        ToggleField::Prepared => item.data.is_prepared(),
        ToggleField::Equipped => item.data.equipped,
    };
    ItemUpdate {
        item_id: item.id.clone(),
        field,
        value: !current,
    }
}

pub fn toggle_item(items: &[Item], item_id: &str) -> Result<ItemUpdate, SheetError> {
    items
        .iter()
        .find(|i| i.id == item_id)
        .map(toggle_update)
        .ok_or_else(|| SheetError::ItemNotFound(item_id.to_string()))
}
