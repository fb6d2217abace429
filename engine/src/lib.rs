pub mod advancement;
pub mod classify;
pub mod config;
pub mod features;
pub mod filters;
pub mod inventory;
pub mod model;
pub mod powerbook;
pub mod sheet;

pub use advancement::{
    ActorRoller, Advancement, AdvancementError, AdvancementFlow, AdvancementForm,
    AdvancementUpdate, AdvancementValue, FlowState, HitDie, HitPointsFlow, HitPointsStrategy,
    PointStrategy, ShieldPointsFlow, ShieldPointsStrategy,
};
pub use classify::{classify, Category, InventoryKind, ItemView, Partitions, ToggleClass};
pub use config::SheetConfig;
pub use filters::{FilterSet, ItemFilter, SheetFilters};
pub use inventory::{compute_encumbrance, Encumbrance};
pub use model::{Actor, Item, ItemKind, PreparationMode, RecordSet, Size};
pub use powerbook::{LevelGrouper, PowerbookGrouper};
pub use sheet::{build_sheet, toggle_item, ItemUpdate, SheetContext, SheetError, SheetView};

/* ---------------- shared helpers ---------------- */

/// Round to one decimal place, halves away from zero.
pub fn round_tenths(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
