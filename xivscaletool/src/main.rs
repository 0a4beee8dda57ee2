use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use fallible_iterator::{FallibleIterator, IteratorExt};
use log::info;
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};
use xivscale::{
    config::ScalingConfig,
    customize::{Customize, Gender, Race, Tribe},
    record::{Character, Field, LocalCharacter, LocalModel},
    scaling,
};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List struct layouts known to a configuration file
    Layouts {
        /// Path to scaling configuration (.toml)
        config: Box<Path>,
    },
    /// Validate a configuration file against the running game version
    Check {
        /// Path to scaling configuration (.toml)
        config: Box<Path>,
        /// Path to "ffxivgame.ver", overrides the version in the configuration
        #[arg(short, long)]
        game_ver: Option<Box<Path>>,
    },
    /// Replay scaling hooks against records described in a .csv scenario
    Simulate {
        /// Scenario with "operation,character,model" columns, customize as hex
        scenario: Box<Path>,
    },
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
enum Operation {
    Mount,
    Ornament,
    Minion,
    Height,
}

#[derive(Debug, Deserialize)]
struct ScenarioRow {
    operation: Operation,
    character: Box<str>,
    model: Option<Box<str>>,
}

#[derive(Debug, Serialize)]
struct Observation {
    operation: Operation,
    phase: &'static str,
    race: String,
    tribe: String,
    gender: String,
    customize_gender: String,
    body_type: u8,
    height: u8,
}

impl Observation {
    fn of(operation: Operation, phase: &'static str, c: &LocalCharacter) -> Self {
        Self {
            operation,
            phase,
            race: Race::from_raw(c.read(Field::Race)).to_string(),
            tribe: Tribe::from_raw(c.read(Field::Tribe)).to_string(),
            gender: Gender::from_raw(c.read(Field::ObjectSex)).to_string(),
            customize_gender: Gender::from_raw(c.read(Field::Sex)).to_string(),
            body_type: c.read(Field::BodyType),
            height: c.read(Field::Height),
        }
    }
}

fn list_layouts(config_path: &Path) -> anyhow::Result<()> {
    let config = ScalingConfig::load(config_path)?;
    for layout in config.layouts.iter() {
        let marker = if layout.game_version == config.game_version { "*" } else { " " };
        println!(
            "{marker} {} companion owner at {:#x} (slot {:#x})",
            layout.game_version,
            layout.companion_owner_offset,
            layout.companion_owner_slot()
        );
    }
    Ok(())
}

fn check_config(config_path: &Path, game_ver: Option<&Path>) -> anyhow::Result<()> {
    let mut config = ScalingConfig::load(config_path)?;
    if let Some(path) = game_ver {
        let version = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        config.game_version = xivscale::layout::GameVersion::parse(version)?;
    }

    let layout = config.layout()?;
    println!("game version:   {}", config.game_version);
    println!("companion:      owner at {:#x}", layout.companion_owner_offset);
    println!("SetupMount:     {:?}", xivscale::service::SETUP_MOUNT);
    println!("SetupOrnament:  {}", config.signatures.setup_ornament.as_str());
    println!("PlaceMinion:    {}", config.signatures.place_minion.as_str());
    println!("CalculateHeight: {:?}", xivscale::service::CALCULATE_HEIGHT);
    Ok(())
}

fn simulate_row(row: ScenarioRow) -> anyhow::Result<Vec<Observation>> {
    let model = match row.model.as_deref().map(str::trim) {
        None | Some("") => LocalModel::NonHuman,
        Some(hex) => LocalModel::Human(Customize::from_hex(hex)?),
    };
    let c = LocalCharacter::new(Customize::from_hex(&row.character)?, model);

    let op = row.operation;
    let mut observations = vec![Observation::of(op, "before", &c)];
    let during = || Observation::of(op, "during", &c);

    let seen = match op {
        Operation::Mount => scaling::on_setup_mount(Some(&c), during),
        Operation::Ornament => scaling::on_setup_ornament(Some(&c), during),
        Operation::Minion => scaling::on_place_minion(Some(&c), during),
        Operation::Height => {
            let mut seen = None;
            scaling::on_calculate_height(Some(&c), || {
                seen = Some(during());
                0.0
            });
            seen.ok_or(anyhow!("CalculateHeight did not run"))?
        }
    };
    observations.push(seen);
    observations.push(Observation::of(op, "after", &c));

    if c.customize() != Customize::from_hex(&row.character)? {
        return Err(anyhow!("{op:?} left the character modified"));
    }
    Ok(observations)
}

fn simulate(scenario: &Path) -> anyhow::Result<()> {
    let rows: Vec<Vec<Observation>> = csv::Reader::from_path(scenario)?
        .deserialize::<ScenarioRow>()
        .transpose_into_fallible()
        .map_err(From::from)
        .map(simulate_row)
        .collect()?;
    info!("Simulated {} scenario rows", rows.len());

    let mut w = csv::Writer::from_writer(io::stdout());
    for observation in rows.iter().flatten() {
        w.serialize(observation)?;
    }
    w.flush()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Layouts { config } => list_layouts(&config),
        Commands::Check { config, game_ver } => check_config(&config, game_ver.as_deref()),
        Commands::Simulate { scenario } => simulate(&scenario),
    }
}
