use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Reads an explicit `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Creature size category, as stored on the actor's traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Tiny,
    Sm,
    #[default]
    Med,
    Lg,
    Huge,
    Grg,
    #[serde(other)]
    Unknown,
}

impl Size {
    /// Carrying capacity multiplier for the size. Unknown sizes carry like medium.
    pub fn carry_multiplier(self) -> f64 {
        match self {
            Size::Tiny => 0.5,
            Size::Sm | Size::Med => 1.0,
            Size::Lg => 2.0,
            Size::Huge => 4.0,
            Size::Grg => 8.0,
            Size::Unknown => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AbilityScore {
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Traits {
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: Size,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    #[serde(default)]
    pub primary: Option<Resource>,
    #[serde(default)]
    pub secondary: Option<Resource>,
    #[serde(default)]
    pub tertiary: Option<Resource>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HitPoints {
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub max: i32,
    #[serde(default)]
    pub temp: Option<i32>,
    #[serde(default)]
    pub tempmax: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(default, deserialize_with = "null_as_default")]
    pub hp: HitPoints,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub abilities: IndexMap<String, AbilityScore>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub traits: Traits,
    #[serde(default, deserialize_with = "null_as_default")]
    pub currency: IndexMap<String, f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resources: Resources,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Attributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorFlags {
    #[serde(default, deserialize_with = "null_as_default")]
    pub powerful_build: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: ActorData,
    #[serde(default, deserialize_with = "null_as_default")]
    pub flags: ActorFlags,
}

impl Actor {
    /// Score for an ability key such as `"str"`; missing abilities score 0.
    pub fn ability_score(&self, key: &str) -> f64 {
        self.data.abilities.get(key).map(|a| a.value).unwrap_or(0.0)
    }

    pub fn strength(&self) -> f64 {
        self.ability_score("str")
    }

    pub fn total_coins(&self) -> f64 {
        self.data.currency.values().sum()
    }
}

/* ---------------- items ---------------- */

/// Kind of an owned item. Unrecognized type strings are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemKind {
    Weapon,
    Equipment,
    Consumable,
    Tool,
    Backpack,
    Loot,
    Power,
    Feat,
    Class,
    Other(String),
}

impl From<String> for ItemKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "weapon" => ItemKind::Weapon,
            "equipment" => ItemKind::Equipment,
            "consumable" => ItemKind::Consumable,
            "tool" => ItemKind::Tool,
            "backpack" => ItemKind::Backpack,
            "loot" => ItemKind::Loot,
            "power" => ItemKind::Power,
            "feat" => ItemKind::Feat,
            "class" => ItemKind::Class,
            _ => ItemKind::Other(s),
        }
    }
}

impl From<ItemKind> for String {
    fn from(kind: ItemKind) -> Self {
        kind.as_str().to_string()
    }
}

impl ItemKind {
    pub fn as_str(&self) -> &str {
        match self {
            ItemKind::Weapon => "weapon",
            ItemKind::Equipment => "equipment",
            ItemKind::Consumable => "consumable",
            ItemKind::Tool => "tool",
            ItemKind::Backpack => "backpack",
            ItemKind::Loot => "loot",
            ItemKind::Power => "power",
            ItemKind::Feat => "feat",
            ItemKind::Class => "class",
            ItemKind::Other(s) => s,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreparationMode {
    #[default]
    Prepared,
    Always,
    Atwill,
    Innate,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preparation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub mode: PreparationMode,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prepared: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Uses {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub per: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recharge {
    #[serde(default)]
    pub value: Option<u32>,
    #[serde(default)]
    pub charged: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Target {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Activation {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub cost: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Components {
    #[serde(default, deserialize_with = "null_as_default")]
    pub concentration: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ritual: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemData {
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub uses: Option<Uses>,
    #[serde(default)]
    pub recharge: Option<Recharge>,
    #[serde(default)]
    pub target: Option<Target>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub equipped: bool,
    #[serde(default)]
    pub preparation: Option<Preparation>,
    #[serde(default)]
    pub activation: Option<Activation>,
    #[serde(default)]
    pub components: Option<Components>,
    /// Power level; 0 for at-will tier powers.
    #[serde(default, deserialize_with = "null_as_default")]
    pub level: u32,
    /// Class levels, only meaningful on `class` items.
    #[serde(default, deserialize_with = "null_as_default")]
    pub levels: u32,
}

impl ItemData {
    pub fn preparation_mode(&self) -> PreparationMode {
        self.preparation.as_ref().map(|p| p.mode).unwrap_or_default()
    }

    pub fn is_prepared(&self) -> bool {
        self.preparation.as_ref().is_some_and(|p| p.prepared)
    }

    pub fn activation_kind(&self) -> Option<&str> {
        self.activation
            .as_ref()
            .and_then(|a| a.kind.as_deref())
            .filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub img: Option<String>,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: ItemData,
}

/// Everything a sheet render reads: the actor plus its owned items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    pub actor: Actor,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Item>,
}
