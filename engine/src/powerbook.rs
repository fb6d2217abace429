use serde::Serialize;

use crate::classify::ItemView;
use crate::config::SheetConfig;
use crate::model::{Actor, PreparationMode};

/// Identifies a powerbook section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "level")]
pub enum SectionKey {
    Atwill,
    Innate,
    Level(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerbookSection<'a> {
    pub key: SectionKey,
    pub label: String,
    pub can_prepare: bool,
    pub powers: Vec<ItemView<'a>>,
}

/// Groups powers into presentation sections. Implemented by whoever owns the layout.
pub trait PowerbookGrouper {
    fn organize<'a>(
        &self,
        actor: &Actor,
        powers: &[ItemView<'a>],
        cfg: &SheetConfig,
    ) -> Vec<PowerbookSection<'a>>;
}

/// At-will and innate sections first, then one section per power level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelGrouper;

impl LevelGrouper {
    fn key_for(view: &ItemView<'_>) -> SectionKey {
        match view.item.data.preparation_mode() {
            PreparationMode::Atwill => SectionKey::Atwill,
            PreparationMode::Innate => SectionKey::Innate,
            PreparationMode::Prepared | PreparationMode::Always | PreparationMode::Other => {
                SectionKey::Level(view.item.data.level)
            }
        }
    }

    fn label_for(key: SectionKey, cfg: &SheetConfig) -> String {
        match key {
            SectionKey::Atwill => cfg.preparation_label(PreparationMode::Atwill),
            SectionKey::Innate => cfg.preparation_label(PreparationMode::Innate),
            SectionKey::Level(n) => format!("SW5E.PowerLevel{}", n),
        }
    }
}

impl PowerbookGrouper for LevelGrouper {
    fn organize<'a>(
        &self,
        _actor: &Actor,
        powers: &[ItemView<'a>],
        cfg: &SheetConfig,
    ) -> Vec<PowerbookSection<'a>> {
        let mut sections: Vec<PowerbookSection<'a>> = Vec::new();
        for view in powers {
            let key = Self::key_for(view);
            match sections.iter_mut().find(|s| s.key == key) {
                Some(section) => section.powers.push(view.clone()),
                None => sections.push(PowerbookSection {
                    key,
                    label: Self::label_for(key, cfg),
                    can_prepare: matches!(key, SectionKey::Level(n) if n > 0),
                    powers: vec![view.clone()],
                }),
            }
        }
        // Stable: powers keep their relative order inside each section.
        sections.sort_by_key(|s| s.key);
        sections
    }
}

/// Leveled powers that were prepared by choice. Always-prepared and at-will powers don't count.
pub fn prepared_count(powers: &[ItemView<'_>]) -> usize {
    powers
        .iter()
        .filter(|v| {
            let data = &v.item.data;
            data.level > 0
                && data.preparation_mode() == PreparationMode::Prepared
                && data.is_prepared()
        })
        .count()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Powerbook<'a> {
    pub sections: Vec<PowerbookSection<'a>>,
    pub prepared_count: usize,
}

pub fn organize<'a>(
    powers: Vec<ItemView<'a>>,
    actor: &Actor,
    cfg: &SheetConfig,
    grouper: &dyn PowerbookGrouper,
) -> Powerbook<'a> {
    let prepared_count = prepared_count(&powers);
    let sections = grouper.organize(actor, &powers, cfg);
    Powerbook {
        sections,
        prepared_count,
    }
}
