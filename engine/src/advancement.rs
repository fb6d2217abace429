use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use tracing::{info, warn};

/* ---------------- hit dice ---------------- */

/// Largest die a record may name.
pub const MAX_DIE_FACES: u32 = 1000;
/// Dice granted at the first class level are capped here.
pub const MAX_SHIELD_DICE_START: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hit die '{0}' (expected dN with 2 <= N <= 1000, e.g. d8)")]
pub struct HitDieError(pub String);

/// A die size such as d8, kept as its face count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HitDie(u32);

impl HitDie {
    pub fn new(faces: u32) -> Result<Self, HitDieError> {
        if !(2..=MAX_DIE_FACES).contains(&faces) {
            return Err(HitDieError(format!("d{}", faces)));
        }
        Ok(Self(faces))
    }

    pub fn faces(self) -> i32 {
        // bounded by MAX_DIE_FACES in `new`
        i32::try_from(self.0).unwrap_or(i32::MAX)
    }

    /// Rounded-up average of one die: floor(faces / 2) + 1.
    pub fn average(self) -> i32 {
        self.faces() / 2 + 1
    }
}

impl FromStr for HitDie {
    type Err = HitDieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('d')
            .or_else(|| trimmed.strip_prefix('D'))
            .unwrap_or(trimmed);
        let faces: u32 = digits.parse().map_err(|_| HitDieError(s.to_string()))?;
        HitDie::new(faces).map_err(|_| HitDieError(s.to_string()))
    }
}

impl TryFrom<String> for HitDie {
    type Error = HitDieError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<HitDie> for String {
    fn from(die: HitDie) -> Self {
        die.to_string()
    }
}

impl fmt::Display for HitDie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.0)
    }
}

/* ---------------- advancement record ---------------- */

/// A resolved per-level grant: a number, or "take the maximum" for storage to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawValue", into = "RawValue")]
pub enum AdvancementValue {
    Points(i32),
    Max,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(i32),
    Text(String),
}

impl TryFrom<RawValue> for AdvancementValue {
    type Error = String;

    fn try_from(raw: RawValue) -> Result<Self, Self::Error> {
        match raw {
            RawValue::Number(n) => Ok(AdvancementValue::Points(n)),
            RawValue::Text(s) if s == "max" => Ok(AdvancementValue::Max),
            RawValue::Text(s) => Err(format!("unknown advancement value '{}'", s)),
        }
    }
}

impl From<AdvancementValue> for RawValue {
    fn from(v: AdvancementValue) -> Self {
        match v {
            AdvancementValue::Points(n) => RawValue::Number(n),
            AdvancementValue::Max => RawValue::Text("max".to_string()),
        }
    }
}

impl AdvancementValue {
    pub fn points(self, die: HitDie) -> i32 {
        match self {
            AdvancementValue::Points(n) => n,
            AdvancementValue::Max => die.faces(),
        }
    }
}

/// Per-class record of points granted at each level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advancement {
    #[serde(default)]
    pub class_id: String,
    pub hit_die: HitDie,
    /// Current class level.
    #[serde(default)]
    pub level: u32,
    /// Dice granted at the first class level (shield points).
    #[serde(default = "default_shld_dice_start")]
    pub shld_dice_start: u32,
    #[serde(default)]
    pub value: BTreeMap<u32, AdvancementValue>,
}

fn default_shld_dice_start() -> u32 {
    1
}

impl Advancement {
    pub fn new(class_id: impl Into<String>, hit_die: HitDie) -> Self {
        Self {
            class_id: class_id.into(),
            hit_die,
            level: 0,
            shld_dice_start: 1,
            value: BTreeMap::new(),
        }
    }

    pub fn hit_die_value(&self) -> i32 {
        self.hit_die.faces()
    }

    /// Upsert the update's entry; re-applying a level overwrites it.
    pub fn apply(&mut self, update: &AdvancementUpdate) {
        self.value.insert(update.level, update.value);
    }

    pub fn value_at(&self, level: u32) -> Option<AdvancementValue> {
        self.value.get(&level).copied()
    }

    /// Dice beyond the first one granted at the first class level.
    pub fn first_level_extra_dice(&self) -> u32 {
        self.shld_dice_start.clamp(1, MAX_SHIELD_DICE_START) - 1
    }

    /// Sum of all granted points, with "max" entries counted as a full die. Saturates.
    pub fn total(&self) -> i32 {
        self.value
            .values()
            .fold(0i32, |acc, v| acc.saturating_add(v.points(self.hit_die)))
    }
}

/// Level-keyed update payload, serialized as `{ "<level>": value }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvancementUpdate {
    pub level: u32,
    pub value: AdvancementValue,
}

impl Serialize for AdvancementUpdate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.level.to_string(), &self.value)?;
        map.end()
    }
}

/* ---------------- strategies ---------------- */

/// Actor-side roll operations a strategy can ask for.
pub trait ActorRoller {
    fn roll_hit_points(&mut self, advancement: &Advancement, level: u32) -> i32;
    fn roll_shield_points(&mut self, advancement: &Advancement, level: u32) -> i32;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StrategyLabels {
    pub average: &'static str,
    pub roll: &'static str,
}

/// What differs between point kinds. The resolution flow itself is shared.
pub trait PointStrategy {
    /// Localization key prefix for this strategy's errors.
    fn key_prefix(&self) -> &'static str;

    fn labels(&self) -> StrategyLabels;

    fn compute_average(&self, advancement: &Advancement, level: u32) -> i32;

    fn perform_roll(
        &self,
        advancement: &Advancement,
        level: u32,
        roller: &mut dyn ActorRoller,
    ) -> i32;
}

/// Hit points: the first class level grants a full die.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitPointsStrategy;

impl PointStrategy for HitPointsStrategy {
    fn key_prefix(&self) -> &'static str {
        "SW5E.AdvancementHitPoints"
    }

    fn labels(&self) -> StrategyLabels {
        StrategyLabels {
            average: "SW5E.AdvancementHitPointsAverage",
            roll: "SW5E.AdvancementHitPointsRollButton",
        }
    }

    fn compute_average(&self, advancement: &Advancement, level: u32) -> i32 {
        if level == 0 {
            advancement.hit_die.faces()
        } else {
            advancement.hit_die.average()
        }
    }

    fn perform_roll(
        &self,
        advancement: &Advancement,
        level: u32,
        roller: &mut dyn ActorRoller,
    ) -> i32 {
        roller.roll_hit_points(advancement, level)
    }
}

/// Shield points: the first level grants a full die plus `shldDiceStart - 1` average dice.
/// `shldDiceStart` is read through `Advancement::first_level_extra_dice`, which caps it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShieldPointsStrategy;

impl PointStrategy for ShieldPointsStrategy {
    fn key_prefix(&self) -> &'static str {
        "SW5E.AdvancementShieldPoints"
    }

    fn labels(&self) -> StrategyLabels {
        StrategyLabels {
            average: "SW5E.AdvancementShieldPointsAverage",
            roll: "SW5E.AdvancementShieldPointsRollButton",
        }
    }

    fn compute_average(&self, advancement: &Advancement, level: u32) -> i32 {
        let avg = advancement.hit_die.average();
        if level == 0 {
            let extra_dice = i32::try_from(advancement.first_level_extra_dice()).unwrap_or(0);
            advancement
                .hit_die
                .faces()
                .saturating_add(extra_dice.saturating_mul(avg))
        } else {
            avg
        }
    }

    fn perform_roll(
        &self,
        advancement: &Advancement,
        level: u32,
        roller: &mut dyn ActorRoller,
    ) -> i32 {
        roller.roll_shield_points(advancement, level)
    }
}

/* ---------------- resolution flow ---------------- */

/// Level-up form input. At most one strategy is expected to be chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancementForm {
    #[serde(default)]
    pub use_average: bool,
    #[serde(default)]
    pub use_max: bool,
    #[serde(default)]
    pub value: Option<String>,
}

impl AdvancementForm {
    pub fn average() -> Self {
        Self {
            use_average: true,
            ..Default::default()
        }
    }

    pub fn max() -> Self {
        Self {
            use_max: true,
            ..Default::default()
        }
    }

    pub fn manual(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    fn raw_value(&self) -> Option<&str> {
        self.value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RejectReason {
    Empty,
    Invalid,
}

/// Form input that could not be turned into a point value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvancementError {
    #[error("{key}")]
    Empty { key: String },
    #[error("{key}")]
    Invalid { key: String },
}

impl AdvancementError {
    fn new(reason: RejectReason, prefix: &str) -> Self {
        match reason {
            RejectReason::Empty => AdvancementError::Empty {
                key: format!("{}EmptyError", prefix),
            },
            RejectReason::Invalid => AdvancementError::Invalid {
                key: format!("{}InvalidError", prefix),
            },
        }
    }

    pub fn reason(&self) -> RejectReason {
        match self {
            AdvancementError::Empty { .. } => RejectReason::Empty,
            AdvancementError::Invalid { .. } => RejectReason::Invalid,
        }
    }

    /// Localization key for the message.
    pub fn key(&self) -> &str {
        match self {
            AdvancementError::Empty { key } | AdvancementError::Invalid { key } => key,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Resolving,
    Applied(AdvancementValue),
    Rejected(RejectReason),
}

/// The roll result box shown on the level-up form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RollDisplay {
    pub value: Option<i32>,
    pub errored: bool,
}

/// Resolves the points granted for one class level.
///
/// Precedence when several inputs are present: average, then max, then the manual value.
#[derive(Debug, Clone)]
pub struct AdvancementFlow<S> {
    strategy: S,
    level: u32,
    state: FlowState,
    display: RollDisplay,
}

impl<S: PointStrategy> AdvancementFlow<S> {
    pub fn new(strategy: S, level: u32) -> Self {
        Self {
            strategy,
            level,
            state: FlowState::Idle,
            display: RollDisplay::default(),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn display(&self) -> &RollDisplay {
        &self.display
    }

    pub fn labels(&self) -> StrategyLabels {
        self.strategy.labels()
    }

    pub fn average(&self, advancement: &Advancement) -> i32 {
        self.strategy.compute_average(advancement, self.level)
    }

    /// Show the average in the roll result box, as when "take average" is ticked.
    pub fn preview_average(&mut self, advancement: &Advancement) -> i32 {
        let avg = self.average(advancement);
        self.display = RollDisplay {
            value: Some(avg),
            errored: false,
        };
        avg
    }

    /// Ask the actor to roll and show the result. Nothing is applied yet.
    pub fn roll(&mut self, advancement: &Advancement, roller: &mut dyn ActorRoller) -> i32 {
        let rolled = self.strategy.perform_roll(advancement, self.level, roller);
        self.display = RollDisplay {
            value: Some(rolled),
            errored: false,
        };
        rolled
    }

    /// Pick the value the form asks for without touching the record.
    pub fn resolve(
        &self,
        advancement: &Advancement,
        form: &AdvancementForm,
    ) -> Result<AdvancementValue, AdvancementError> {
        if form.use_average {
            return Ok(AdvancementValue::Points(self.average(advancement)));
        }
        if form.use_max {
            return Ok(AdvancementValue::Max);
        }
        match form.raw_value() {
            None => Err(AdvancementError::new(RejectReason::Empty, self.strategy.key_prefix())),
            Some(raw) => raw.parse::<i32>().map(AdvancementValue::Points).map_err(|_| {
                AdvancementError::new(RejectReason::Invalid, self.strategy.key_prefix())
            }),
        }
    }

    /// Resolve the form and, on success, upsert the level's entry into the record.
    pub fn submit(
        &mut self,
        advancement: &mut Advancement,
        form: &AdvancementForm,
    ) -> Result<AdvancementUpdate, AdvancementError> {
        self.state = FlowState::Resolving;
        match self.resolve(advancement, form) {
            Ok(value) => {
                let update = AdvancementUpdate {
                    level: self.level,
                    value,
                };
                advancement.apply(&update);
                self.state = FlowState::Applied(value);
                self.display.errored = false;
                info!(
                    class = %advancement.class_id,
                    level = self.level,
                    ?value,
                    "advancement applied"
                );
                Ok(update)
            }
            Err(err) => {
                self.state = FlowState::Rejected(err.reason());
                // a rejected value always flags the roll result box
                self.display.errored = true;
                warn!(
                    class = %advancement.class_id,
                    level = self.level,
                    key = err.key(),
                    "advancement rejected"
                );
                Err(err)
            }
        }
    }
}

pub type HitPointsFlow = AdvancementFlow<HitPointsStrategy>;
pub type ShieldPointsFlow = AdvancementFlow<ShieldPointsStrategy>;
