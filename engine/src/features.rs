use serde::Serialize;

use crate::classify::ItemView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureGroupKind {
    Classes,
    Active,
    Passive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureDataset {
    #[serde(rename = "type")]
    pub item_type: &'static str,
    #[serde(rename = "activation.type", skip_serializing_if = "Option::is_none")]
    pub activation_type: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureGroup<'a> {
    pub kind: FeatureGroupKind,
    pub label: &'static str,
    pub items: Vec<ItemView<'a>>,
    pub has_actions: bool,
    pub is_class: bool,
    pub dataset: FeatureDataset,
}

impl<'a> FeatureGroup<'a> {
    fn new(kind: FeatureGroupKind) -> Self {
        let (label, has_actions, dataset) = match kind {
            FeatureGroupKind::Classes => (
                "SW5E.ItemTypeClassPl",
                false,
                FeatureDataset {
                    item_type: "class",
                    activation_type: None,
                },
            ),
            FeatureGroupKind::Active => (
                "SW5E.FeatureActive",
                true,
                FeatureDataset {
                    item_type: "feat",
                    activation_type: Some("action"),
                },
            ),
            FeatureGroupKind::Passive => (
                "SW5E.FeaturePassive",
                false,
                FeatureDataset {
                    item_type: "feat",
                    activation_type: None,
                },
            ),
        };
        Self {
            kind,
            label,
            items: Vec::new(),
            has_actions,
            is_class: kind == FeatureGroupKind::Classes,
            dataset,
        }
    }
}

/// Classes (most levels first), then features with an activation, then the rest.
pub fn group_features<'a>(
    features: Vec<ItemView<'a>>,
    mut classes: Vec<ItemView<'a>>,
) -> Vec<FeatureGroup<'a>> {
    let mut class_group = FeatureGroup::new(FeatureGroupKind::Classes);
    let mut active = FeatureGroup::new(FeatureGroupKind::Active);
    let mut passive = FeatureGroup::new(FeatureGroupKind::Passive);

    for view in features {
        if view.item.data.activation_kind().is_some() {
            active.items.push(view);
        } else {
            passive.items.push(view);
        }
    }

    classes.sort_by(|a, b| b.item.data.levels.cmp(&a.item.data.levels));
    class_group.items = classes;

    vec![class_group, active, passive]
}
