use engine::inventory::{aggregate, carry_multiplier, stack_weight, MAX_CARRY_MULTIPLIER};
use engine::model::{AbilityScore, ItemData};
use engine::{
    classify, compute_encumbrance, round_tenths, Actor, InventoryKind, Item, ItemKind,
    SheetConfig, Size,
};
use proptest::prelude::*;

fn actor(size: Size, strength: f64) -> Actor {
    let mut a = Actor::default();
    a.id = "tester".into();
    a.data.traits.size = size;
    a.data
        .abilities
        .insert("str".into(), AbilityScore { value: strength });
    a
}

fn gear(id: &str, kind: &str, quantity: Option<f64>, weight: Option<f64>) -> Item {
    Item {
        id: id.into(),
        name: id.into(),
        img: None,
        kind: ItemKind::from(kind.to_string()),
        data: ItemData {
            quantity,
            weight,
            ..Default::default()
        },
    }
}

fn no_coins() -> SheetConfig {
    SheetConfig {
        currency_weight: false,
        ..Default::default()
    }
}

#[test]
fn buckets_come_in_fixed_order() {
    let cfg = no_coins();
    let a = actor(Size::Med, 10.0);
    let items = vec![
        gear("rope", "loot", Some(1.0), Some(10.0)),
        gear("vibro", "weapon", Some(1.0), Some(3.0)),
        gear("pack", "backpack", Some(1.0), Some(5.0)),
    ];
    let inv = aggregate(classify(&items, &cfg).inventory, &a, &cfg);
    let kinds: Vec<_> = inv.buckets.iter().map(|b| b.kind()).collect();
    assert_eq!(kinds, InventoryKind::ALL.to_vec());
    assert_eq!(inv.bucket(InventoryKind::Loot).unwrap().items.len(), 1);
    assert_eq!(inv.bucket(InventoryKind::Weapon).unwrap().items[0].total_weight, 3.0);
    assert_eq!(inv.bucket(InventoryKind::Backpack).unwrap().label, "SW5E.ItemTypeContainerPl");
    assert!(inv.bucket(InventoryKind::Tool).unwrap().items.is_empty());
    assert_eq!(inv.total_weight, 18.0);
}

#[test]
fn missing_quantity_or_weight_weighs_nothing() {
    let cfg = no_coins();
    let a = actor(Size::Med, 10.0);
    let items = vec![
        gear("ghost", "loot", None, Some(4.0)),
        gear("feather", "loot", Some(2.0), None),
    ];
    let inv = aggregate(classify(&items, &cfg).inventory, &a, &cfg);
    assert_eq!(inv.total_weight, 0.0);
    assert_eq!(inv.encumbrance.value, 0.0);
    assert_eq!(inv.encumbrance.pct, 0.0);
}

#[test]
fn coins_count_when_enabled() {
    let mut a = actor(Size::Med, 10.0);
    a.data.currency.insert("gc".into(), 400.0);
    a.data.currency.insert("sc".into(), 100.0);

    let on = SheetConfig::default();
    let enc = compute_encumbrance(10.0, &a, &on);
    assert_eq!(enc.value, 20.0);
    assert_eq!(enc.max, 150.0);

    let off = no_coins();
    assert_eq!(compute_encumbrance(10.0, &a, &off).value, 10.0);
}

#[test]
fn pct_is_clamped_to_99() {
    let a = actor(Size::Tiny, 3.0);
    let enc = compute_encumbrance(5000.0, &a, &no_coins());
    assert_eq!(enc.pct, 99.0);
    assert!(enc.encumbered);
}

#[test]
fn powerful_build_caps_at_gargantuan() {
    let mut a = actor(Size::Grg, 10.0);
    a.flags.powerful_build = true;
    assert_eq!(carry_multiplier(&a), MAX_CARRY_MULTIPLIER);
    a.data.traits.size = Size::Lg;
    assert_eq!(carry_multiplier(&a), 4.0);
}

#[test]
fn unknown_size_deserializes_to_default_multiplier() {
    let a: Actor = serde_json::from_str(
        r#"{
            "data": {
                "traits": { "size": "colossal" },
                "abilities": { "str": { "value": 10 } }
            }
        }"#,
    )
    .unwrap();
    assert_eq!(a.data.traits.size, Size::Unknown);
    assert_eq!(carry_multiplier(&a), 1.0);
}

fn sizes() -> impl Strategy<Value = Size> {
    prop_oneof![
        Just(Size::Tiny),
        Just(Size::Sm),
        Just(Size::Med),
        Just(Size::Lg),
        Just(Size::Huge),
        Just(Size::Grg),
        Just(Size::Unknown),
    ]
}

proptest! {
    #[test]
    fn total_weight_is_sum_of_rounded_stacks(
        stacks in proptest::collection::vec((0u32..20, 0.0f64..50.0), 0..25)
    ) {
        let cfg = no_coins();
        let a = actor(Size::Med, 10.0);
        let items: Vec<Item> = stacks
            .iter()
            .enumerate()
            .map(|(i, (q, w))| gear(&format!("g{}", i), "equipment", Some(*q as f64), Some(*w)))
            .collect();
        let views = classify(&items, &cfg).inventory;
        let expected: f64 = views.iter().map(stack_weight).sum();
        let by_hand: f64 = stacks.iter().map(|(q, w)| round_tenths(*q as f64 * w)).sum();
        let inv = aggregate(views, &a, &cfg);
        prop_assert_eq!(inv.total_weight, expected);
        prop_assert_eq!(inv.total_weight, by_hand);
    }

    #[test]
    fn pct_stays_in_range(
        weight in 0.0f64..100_000.0,
        strength in 1.0f64..30.0,
        size in sizes(),
        powerful in any::<bool>(),
    ) {
        let mut a = actor(size, strength);
        a.flags.powerful_build = powerful;
        let enc = compute_encumbrance(weight, &a, &no_coins());
        prop_assert!(enc.pct >= 0.0 && enc.pct <= 99.0);
        prop_assert!(carry_multiplier(&a) <= MAX_CARRY_MULTIPLIER);
    }
}
