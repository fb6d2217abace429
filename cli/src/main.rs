mod roller;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use encoding_rs::Encoding;
use engine::{
    Advancement, AdvancementFlow, AdvancementForm, AdvancementUpdate, HitPointsStrategy,
    LevelGrouper, PointStrategy, RecordSet, SheetConfig, SheetContext, SheetFilters,
    ShieldPointsStrategy,
};
use serde::de::DeserializeOwned;
use std::io::IsTerminal;
use std::{fs, path::Path, path::PathBuf};
use tracing::{info, Level};

use crate::roller::SeededRoller;

#[derive(Copy, Clone, ValueEnum)]
enum PointKind {
    Hit,
    Shield,
}

#[derive(Subcommand)]
enum Cmd {
    /// Build the character sheet view-model for a record set (JSON to stdout)
    Sheet {
        /// Record set JSON: { "actor": ..., "items": [...] }
        #[arg(long)]
        records: PathBuf,
        /// Sheet settings (YAML, or JSON by extension)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Per-list filter state JSON with "inventory", "powerbook" and "features" arrays
        #[arg(long)]
        filters: Option<PathBuf>,
        /// Single-line JSON instead of pretty-printed
        #[arg(long, default_value_t = false)]
        compact: bool,
    },
    /// Print the update that toggles an item's prepared/equipped state
    Toggle {
        #[arg(long)]
        records: PathBuf,
        /// Id of the owned item
        #[arg(long)]
        item: String,
    },
    /// Resolve the points granted for a level and print the advancement update
    Advance {
        /// Advancement record JSON
        #[arg(long)]
        advancement: PathBuf,
        /// Which points are being granted
        #[arg(long, value_enum, default_value_t = PointKind::Hit)]
        kind: PointKind,
        /// Level being resolved (defaults to the record's current level)
        #[arg(long)]
        level: Option<u32>,
        /// Take the average
        #[arg(long, default_value_t = false)]
        average: bool,
        /// Take the maximum
        #[arg(long, default_value_t = false)]
        max: bool,
        /// Manually entered value
        #[arg(long)]
        value: Option<String>,
        /// Roll instead of entering a value
        #[arg(long, default_value_t = false)]
        roll: bool,
        /// RNG seed for --roll
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

#[derive(Parser)]
#[command(name = "sheet-cli")]
#[command(about = "Character sheet view-model and level-up harness")]
struct Cli {
    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    cmd: Cmd,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn read_text_auto(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        String::from_utf8(bytes).with_context(|| format!("{} is not UTF-8", path.display()))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = read_text_auto(path)?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse JSON: {}", path.display()))
}

fn print_json(value: &impl serde::Serialize, compact: bool) -> Result<()> {
    if compact {
        println!("{}", serde_json::to_string(value)?);
    } else {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

fn advance<S: PointStrategy>(
    strategy: S,
    advancement: &mut Advancement,
    level: u32,
    mut form: AdvancementForm,
    roll_seed: Option<u64>,
) -> Result<AdvancementUpdate> {
    let mut flow = AdvancementFlow::new(strategy, level);
    if let Some(seed) = roll_seed {
        let mut roller = SeededRoller::from_seed(seed);
        let rolled = flow.roll(advancement, &mut roller);
        info!(level, rolled, "rolled points");
        form.value = Some(rolled.to_string());
    }
    let update = flow.submit(advancement, &form)?;
    info!(total = advancement.total(), "advancement total");
    Ok(update)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Cmd::Sheet {
            records,
            config,
            filters,
            compact,
        } => {
            let records: RecordSet = read_json(&records)?;
            let cfg = match config {
                Some(path) => SheetConfig::load(path)?,
                None => SheetConfig::default(),
            };
            let filters: SheetFilters = match filters {
                Some(path) => read_json(&path)?,
                None => SheetFilters::default(),
            };
            let ctx = SheetContext {
                config: &cfg,
                filters: &filters,
                grouper: &LevelGrouper,
            };
            print_json(&records.sheet(&ctx), compact)?;
        }
        Cmd::Toggle { records, item } => {
            let records: RecordSet = read_json(&records)?;
            let update = records.toggle(&item)?;
            print_json(&update, true)?;
        }
        Cmd::Advance {
            advancement,
            kind,
            level,
            average,
            max,
            value,
            roll,
            seed,
        } => {
            let mut record: Advancement = read_json(&advancement)?;
            let level = level.unwrap_or(record.level);
            let form = AdvancementForm {
                use_average: average,
                use_max: max,
                value,
            };
            let roll_seed = roll.then_some(seed);
            let update = match kind {
                PointKind::Hit => advance(HitPointsStrategy, &mut record, level, form, roll_seed)?,
                PointKind::Shield => {
                    advance(ShieldPointsStrategy, &mut record, level, form, roll_seed)?
                }
            };
            print_json(&update, true)?;
        }
    }
    Ok(())
}
