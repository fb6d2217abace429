use engine::features::FeatureGroupKind;
use engine::powerbook::SectionKey;
use engine::sheet::{toggle_update, ToggleField};
use engine::{
    build_sheet, FilterSet, InventoryKind, ItemFilter, LevelGrouper, RecordSet, SheetConfig,
    SheetContext, SheetError, SheetFilters,
};

fn fixture() -> RecordSet {
    let text = include_str!("fixtures/kestrel.json");
    serde_json::from_str(text).expect("fixture parses")
}

#[test]
fn kestrel_sheet_view() {
    let records = fixture();
    let cfg = SheetConfig::default();
    let filters = SheetFilters::default();
    let ctx = SheetContext {
        config: &cfg,
        filters: &filters,
        grouper: &LevelGrouper,
    };
    let view = records.sheet(&ctx);

    // the holocron has an unknown type and is left off
    let inventory_items: usize = view.inventory_buckets.iter().map(|b| b.items.len()).sum();
    assert_eq!(inventory_items, 2);
    assert_eq!(view.total_weight, 3.5);
    // 3.5 lb of gear plus 100 coins at 50 per lb
    assert_eq!(view.encumbrance.value, 5.5);
    assert_eq!(view.encumbrance.max, 180.0);
    assert!(!view.encumbrance.encumbered);

    let weapons = &view.inventory_buckets[0];
    assert_eq!(weapons.kind(), InventoryKind::Weapon);
    assert!(weapons.items[0].view.has_target);

    assert_eq!(view.prepared_powers_count, 1);
    let keys: Vec<_> = view.powerbook.iter().map(|s| s.key).collect();
    assert_eq!(
        keys,
        vec![SectionKey::Atwill, SectionKey::Level(1), SectionKey::Level(2)]
    );

    let groups: Vec<_> = view.feature_groups.iter().map(|g| g.kind).collect();
    assert_eq!(
        groups,
        vec![
            FeatureGroupKind::Classes,
            FeatureGroupKind::Active,
            FeatureGroupKind::Passive
        ]
    );
    let classes: Vec<_> = view.feature_groups[0]
        .items
        .iter()
        .map(|c| c.item.id.as_str())
        .collect();
    assert_eq!(classes, vec!["operative", "consular"]);
    let second_wind = &view.feature_groups[1].items[0];
    assert!(second_wind.is_on_cooldown);
    assert!(second_wind.is_depleted);
    assert_eq!(view.feature_groups[2].items[0].item.id, "alert");

    assert_eq!(view.resources[0].value, Some(2.0));
    assert_eq!(view.resources[1].value, None);
    assert_eq!(view.resources[1].placeholder, "SW5E.ResourceSecondary");
    assert_eq!(view.hp.temp, None);
    assert_eq!(view.hp.tempmax, Some(5));
    assert!(!view.disable_experience);
}

#[test]
fn view_serializes_with_stable_field_names() {
    let records = fixture();
    let cfg = SheetConfig {
        disable_experience_tracking: true,
        ..Default::default()
    };
    let filters = SheetFilters::default();
    let ctx = SheetContext {
        config: &cfg,
        filters: &filters,
        grouper: &LevelGrouper,
    };
    let json = serde_json::to_value(build_sheet(&records.actor, &records.items, &ctx)).unwrap();
    for field in [
        "inventoryBuckets",
        "powerbook",
        "preparedPowersCount",
        "featureGroups",
        "encumbrance",
    ] {
        assert!(json.get(field).is_some(), "missing {}", field);
    }
    assert_eq!(json["disableExperience"], true);
    assert_eq!(json["inventoryBuckets"][4]["dataset"]["type"], "backpack");
    assert_eq!(json["inventoryBuckets"][0]["items"][0]["toggle"]["class"], "active");
    assert_eq!(json["inventoryBuckets"][0]["items"][0]["totalWeight"], 2.0);
}

#[test]
fn filters_apply_before_aggregation() {
    let records = fixture();
    let cfg = SheetConfig::default();
    let filters = SheetFilters {
        inventory: FilterSet::new([ItemFilter::Equipped]),
        powerbook: FilterSet::new([ItemFilter::Prepared]),
        features: FilterSet::new([ItemFilter::Bonus]),
    };
    let ctx = SheetContext {
        config: &cfg,
        filters: &filters,
        grouper: &LevelGrouper,
    };
    let view = records.sheet(&ctx);

    // only the equipped blaster is weighed
    assert_eq!(view.total_weight, 2.0);
    let powers: Vec<_> = view
        .powerbook
        .iter()
        .flat_map(|s| s.powers.iter().map(|p| p.item.id.as_str()))
        .collect();
    assert_eq!(powers, vec!["feel-force", "force-push", "saber-ward"]);
    // "alert" has no activation block, so the activation filter lets it through
    assert_eq!(view.feature_groups[1].items.len(), 1);
    assert_eq!(view.feature_groups[2].items.len(), 1);
}

#[test]
fn toggling_a_power_prepares_it() {
    let records = fixture();
    let update = records.toggle("battle-meditation").unwrap();
    assert_eq!(update.field, ToggleField::Prepared);
    insta::assert_snapshot!(
        serde_json::to_string(&update).unwrap(),
        @r#"{"data.preparation.prepared":true}"#
    );
}

#[test]
fn toggling_equipped_gear_unequips_it() {
    let records = fixture();
    let blaster = records.items.iter().find(|i| i.id == "blaster").unwrap();
    let update = toggle_update(blaster);
    insta::assert_snapshot!(serde_json::to_string(&update).unwrap(), @r#"{"data.equipped":false}"#);
    assert_eq!(update.item_id, "blaster");
}

#[test]
fn toggling_unknown_item_fails() {
    let records = fixture();
    let err = records.toggle("nope").unwrap_err();
    assert_eq!(err, SheetError::ItemNotFound("nope".into()));
    insta::assert_snapshot!(err.to_string(), @"item 'nope' is not owned by this actor");
}

#[test]
fn config_loads_from_yaml_with_defaults() {
    let yaml = "currencyWeight: false\n\
                encumbrance:\n  strMultiplier: 10\n\
                preparationModes:\n  always: Always\n";
    let cfg = SheetConfig::from_yaml_str(yaml).unwrap();
    assert!(!cfg.currency_weight);
    assert_eq!(cfg.encumbrance.str_multiplier, 10.0);
    assert_eq!(cfg.encumbrance.currency_per_weight, 50.0);
    assert_eq!(cfg.preparation_label(engine::PreparationMode::Always), "Always");
    assert_eq!(cfg.preparation_label(engine::PreparationMode::Prepared), "prepared");
    assert!(!cfg.disable_experience_tracking);
}

#[test]
fn null_fields_fall_back_to_defaults() {
    let records: RecordSet =
        serde_json::from_str(include_str!("fixtures/nulls.json")).expect("nulls parse");
    let knife = &records.items[0];
    assert!(!knife.data.equipped);
    assert_eq!(knife.data.level, 0);
    assert_eq!(knife.name, "");
    assert!(!records.items[1].data.is_prepared());
    assert_eq!(records.items[2].data.levels, 0);
    assert_eq!(records.actor.strength(), 0.0);

    let cfg = SheetConfig::default();
    let filters = SheetFilters::default();
    let ctx = SheetContext {
        config: &cfg,
        filters: &filters,
        grouper: &LevelGrouper,
    };
    let view = records.sheet(&ctx);
    // no quantity means nothing is weighed, and zero strength still renders
    assert_eq!(view.total_weight, 0.0);
    assert_eq!(view.encumbrance.pct, 0.0);
    assert_eq!(view.prepared_powers_count, 0);
    // a null preparation mode reads as prepared, so level 0 gets its own section
    assert_eq!(view.powerbook[0].key, SectionKey::Level(0));
    assert_eq!(view.feature_groups[0].items.len(), 1);
}
