use serde::Serialize;
use tracing::debug;

use crate::classify::{Category, InventoryKind, ItemView};
use crate::config::SheetConfig;
use crate::model::Actor;
use crate::round_tenths;

/// Highest size multiplier reachable through powerful build.
pub const MAX_CARRY_MULTIPLIER: f64 = 8.0;
/// Encumbrance percentage never reaches 100.
pub const MAX_ENCUMBRANCE_PCT: f64 = 99.0;
/// `pct` above this (two thirds, on the 0-100 scale) counts as encumbered.
pub const ENCUMBERED_PCT: f64 = 200.0 / 3.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntry<'a> {
    #[serde(flatten)]
    pub view: ItemView<'a>,
    pub total_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketDataset {
    #[serde(rename = "type")]
    pub kind: InventoryKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryBucket<'a> {
    pub label: &'static str,
    pub items: Vec<InventoryEntry<'a>>,
    pub dataset: BucketDataset,
}

impl<'a> InventoryBucket<'a> {
    fn empty(kind: InventoryKind) -> Self {
        Self {
            label: kind.label(),
            items: Vec::new(),
            dataset: BucketDataset { kind },
        }
    }

    pub fn kind(&self) -> InventoryKind {
        self.dataset.kind
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Encumbrance {
    pub value: f64,
    pub max: f64,
    pub pct: f64,
    pub encumbered: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory<'a> {
    pub buckets: Vec<InventoryBucket<'a>>,
    /// Item weight only; coins are added when computing encumbrance.
    pub total_weight: f64,
    pub encumbrance: Encumbrance,
}

impl<'a> Inventory<'a> {
    pub fn bucket(&self, kind: InventoryKind) -> Option<&InventoryBucket<'a>> {
        self.buckets.iter().find(|b| b.kind() == kind)
    }
}

/// Weight of a stack, rounded to a tenth. Missing numbers count as zero.
pub fn stack_weight(view: &ItemView<'_>) -> f64 {
    let quantity = view.item.data.quantity.unwrap_or(0.0);
    let weight = view.item.data.weight.unwrap_or(0.0);
    round_tenths(quantity * weight)
}

/// Size-based capacity multiplier, doubled by powerful build up to the cap.
pub fn carry_multiplier(actor: &Actor) -> f64 {
    let base = actor.data.traits.size.carry_multiplier();
    if actor.flags.powerful_build {
        (base * 2.0).min(MAX_CARRY_MULTIPLIER)
    } else {
        base
    }
}

pub fn compute_encumbrance(total_weight: f64, actor: &Actor, cfg: &SheetConfig) -> Encumbrance {
    let modifier = carry_multiplier(actor);

    let mut carried = total_weight;
    if cfg.currency_weight && cfg.encumbrance.currency_per_weight > 0.0 {
        carried += actor.total_coins() / cfg.encumbrance.currency_per_weight;
    }

    let max = actor.strength() * cfg.encumbrance.str_multiplier * modifier;
    let value = round_tenths(carried);
    let pct = if max > 0.0 {
        (value * 100.0 / max).clamp(0.0, MAX_ENCUMBRANCE_PCT)
    } else if value > 0.0 {
        MAX_ENCUMBRANCE_PCT
    } else {
        0.0
    };

    Encumbrance {
        value,
        max,
        pct,
        encumbered: pct > ENCUMBERED_PCT,
    }
}

/// Bucket the (already filtered) inventory items and weigh them.
pub fn aggregate<'a>(items: Vec<ItemView<'a>>, actor: &Actor, cfg: &SheetConfig) -> Inventory<'a> {
    let mut buckets: Vec<InventoryBucket<'a>> =
        InventoryKind::ALL.into_iter().map(InventoryBucket::empty).collect();
    let mut total_weight = 0.0;

    for view in items {
        let Category::Inventory(kind) = view.category() else {
            continue;
        };
        let weight = stack_weight(&view);
        total_weight += weight;
        if let Some(bucket) = buckets.iter_mut().find(|b| b.kind() == kind) {
            bucket.items.push(InventoryEntry {
                view,
                total_weight: weight,
            });
        }
    }

    let encumbrance = compute_encumbrance(total_weight, actor, cfg);
    debug!(
        actor = %actor.id,
        total_weight,
        value = encumbrance.value,
        max = encumbrance.max,
        pct = encumbrance.pct,
        encumbered = encumbrance.encumbered,
        "computed encumbrance"
    );

    Inventory {
        buckets,
        total_weight,
        encumbrance,
    }
}
