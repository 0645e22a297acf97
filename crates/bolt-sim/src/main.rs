//! bolt-sim: fire bolts through JSON scenarios
//!
//! Main entry point for the simulator.

mod scenario;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use strum::IntoEnumIterator;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use bolt_core::beam::{
    Bolt, ExplosionMap, Thrower, TraversalReport, ZapCatalog, ZapOutcome, ZapType, fire_beam,
    fire_tracer, player_tracer, zapping,
};
use bolt_core::dungeon::{Coord, Level};
use bolt_core::world::{Env, MessageLog, Scripted, World};
use bolt_core::{EngineOptions, GameRng, MAX_EXPLOSION_RADIUS};
use bolt_data::standard_catalog;

use scenario::Scenario;

#[derive(Debug, Parser)]
#[command(name = "bolt-sim", version, about = "Fire bolts, beams and explosions through a grid")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a scenario file
    Run {
        scenario: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
        /// Engine options as JSON; missing keys keep their defaults
        #[arg(long)]
        options: Option<PathBuf>,
        /// Print the reports as JSON
        #[arg(long)]
        json: bool,
        #[arg(short, long)]
        verbose: bool,
        /// Skip the confirmation tracer
        #[arg(long)]
        no_tracer: bool,
    },
    /// List the zap catalog
    Catalog,
    /// Print an explosion's shape on an open map
    Explode {
        #[arg(long, default_value_t = 3)]
        radius: i32,
    },
}

/// What a scenario run produced
#[derive(Debug, Default, Serialize)]
struct RunSummary {
    seed: u64,
    /// A prompt was declined or the monster held fire
    cancelled: bool,
    tracer: Option<TraversalReport>,
    report: Option<TraversalReport>,
    messages: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = matches!(cli.command, Command::Run { verbose: true, .. });
    init_logging(verbose);

    match cli.command {
        Command::Run {
            scenario,
            seed,
            options,
            json,
            no_tracer,
            ..
        } => run(&scenario, seed, options.as_deref(), json, no_tracer),
        Command::Catalog => {
            print_catalog(&standard_catalog()?);
            Ok(())
        }
        Command::Explode { radius } => {
            print_explosion(radius);
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_options(path: Option<&Path>) -> Result<EngineOptions> {
    let Some(path) = path else {
        return Ok(EngineOptions::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("reading options {}", path.display()))?;
    EngineOptions::from_json(&text).with_context(|| format!("parsing options {}", path.display()))
}

fn run(
    path: &Path,
    seed: Option<u64>,
    options: Option<&Path>,
    json: bool,
    no_tracer: bool,
) -> Result<()> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading scenario {}", path.display()))?;
    let scenario = Scenario::from_json(&text)
        .with_context(|| format!("parsing scenario {}", path.display()))?;
    let options = load_options(options)?;
    let mut level = scenario
        .level()
        .with_context(|| format!("building scenario {}", path.display()))?;
    let catalog = standard_catalog()?;

    let mut rng = match seed {
        Some(seed) => GameRng::new(seed),
        None => GameRng::from_entropy(),
    };
    let mut log = MessageLog::new();
    let mut prompter = Scripted::new(scenario.answers.iter().copied());
    let mut summary = RunSummary {
        seed: rng.seed(),
        ..RunSummary::default()
    };
    info!(seed = summary.seed, scenario = %path.display(), "running scenario");

    {
        let mut env = Env::new(&mut rng, &mut log, &mut prompter, &options);
        let mut bolt = scenario.bolt();
        match (scenario.thrower, scenario.zap) {
            (Thrower::Monster(id), zap) => {
                if let Some(zap) = zap {
                    catalog.configure(zap, scenario.power, &mut bolt, false, env.rng)?;
                }
                if bolt.range <= 0 {
                    bolt.range = options.default_range;
                }
                if !no_tracer {
                    let outcome = fire_tracer(id, &mut bolt, &level, &mut env, false);
                    summary.cancelled = !outcome.proceed;
                    summary.tracer = Some(outcome.report);
                }
                if !summary.cancelled {
                    summary.report = Some(fire_beam(&mut bolt, &mut level, &mut env));
                }
            }
            (Thrower::Player, Some(zap)) => {
                let outcome = zapping(
                    &catalog,
                    zap,
                    scenario.power,
                    &mut bolt,
                    &mut level,
                    &mut env,
                    !no_tracer,
                )?;
                summary.cancelled = outcome.is_cancelled();
                summary.report = outcome.report().cloned();
                summary.tracer = match outcome {
                    ZapOutcome::Cancelled { tracer } => Some(tracer),
                    ZapOutcome::Fired { tracer, .. } => tracer,
                };
            }
            (thrower, zap) => {
                if let Some(zap) = zap {
                    catalog.configure(zap, scenario.power, &mut bolt, false, env.rng)?;
                }
                if bolt.range <= 0 {
                    bolt.range = options.default_range;
                }
                if thrower.is_player() && !no_tracer {
                    let outcome = player_tracer(&mut bolt, &level, &mut env);
                    summary.cancelled = !outcome.proceed;
                    summary.tracer = Some(outcome.report);
                }
                if !summary.cancelled {
                    summary.report = Some(fire_beam(&mut bolt, &mut level, &mut env));
                }
            }
        }
        debug!(cancelled = summary.cancelled, "scenario finished");
    }
    summary.messages = log.texts().into_iter().map(String::from).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary, &level);
    }
    Ok(())
}

fn print_summary(summary: &RunSummary, level: &Level) {
    for text in &summary.messages {
        println!("{text}");
    }
    if summary.cancelled {
        println!("-- cancelled");
    }
    let Some(report) = &summary.report else {
        return;
    };
    println!("-- {} after {} cells", report.termination, report.path.len());
    let path: Vec<String> = report
        .path
        .iter()
        .map(|s| format!("({},{})", s.pos.x, s.pos.y))
        .collect();
    if !path.is_empty() {
        println!("path: {}", path.join(" "));
    }
    for r in &report.resolutions {
        let name = level
            .actor(r.actor)
            .map(|a| a.name.as_str())
            .unwrap_or("?");
        match r.enchantment {
            Some(result) => println!("  {name}: {result}"),
            None => println!(
                "  {name}: {:?}, rolled {}, took {} ({:?})",
                r.hit, r.rolled, r.final_damage, r.resist
            ),
        }
    }
    for id in &report.killed {
        if let Some(actor) = level.actor(*id) {
            println!("  killed {}", actor.name);
        }
    }
    if let Some(blast) = &report.explosion {
        println!(
            "explosion at ({},{}) radius {}, {} cells",
            blast.centre.x,
            blast.centre.y,
            blast.radius,
            blast.cells.len()
        );
    }
}

fn print_catalog(catalog: &ZapCatalog) {
    for line in catalog_lines(catalog) {
        println!("{line}");
    }
}

/// One line per zap identifier, in identifier order
fn catalog_lines(catalog: &ZapCatalog) -> Vec<String> {
    ZapType::iter()
        .map(|id| {
            let Ok(entry) = catalog.lookup(id) else {
                return format!("{:<20} (no entry)", id.to_string());
            };
            let mut flags = Vec::new();
            if entry.is_enchantment {
                flags.push("ench");
            }
            if entry.can_beam {
                flags.push("beam");
            }
            if entry.is_explosion {
                flags.push("explodes");
            }
            if entry.always_obvious {
                flags.push("obvious");
            }
            format!(
                "{:<20} {:<24} {:>6} {:<14} {}",
                entry.id.to_string(),
                entry.name.unwrap_or("-"),
                entry.power_cap,
                entry.flavour.to_string(),
                flags.join(",")
            )
        })
        .collect()
}

fn print_explosion(radius: i32) {
    let radius = radius.clamp(0, MAX_EXPLOSION_RADIUS);
    let size = radius * 2 + 3;
    let level = Level::new(size, size);
    let centre = Coord::new(size / 2, size / 2);
    let map = ExplosionMap::discover(&level, &Bolt::default(), centre, radius);
    for y in 0..size {
        let row: String = (0..size)
            .map(|x| {
                let offset = Coord::new(x, y) - centre;
                if offset.is_origin() {
                    '@'
                } else if map.contains(offset) {
                    '*'
                } else {
                    '.'
                }
            })
            .collect();
        println!("{row}");
    }
    println!("{} cells", map.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lists_every_zap() {
        let catalog = standard_catalog().unwrap();
        let lines = catalog_lines(&catalog);
        assert_eq!(lines.len(), ZapType::iter().count());
        assert!(lines.iter().all(|l| !l.contains("(no entry)")));
        assert!(lines.iter().any(|l| l.starts_with("Fireball") && l.contains("explodes")));
    }

    #[test]
    fn test_catalog_marks_missing_rows() {
        let catalog = ZapCatalog::default();
        let lines = catalog_lines(&catalog);
        assert!(lines.iter().all(|l| l.ends_with("(no entry)")));
    }
}
