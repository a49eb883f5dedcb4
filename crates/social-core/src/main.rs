//! Social Simulation Driver
//!
//! Builds a cast, feeds scripted player lines, runs ticks on a virtual clock
//! and prints reactions, decisions and events. Meant for play-testing tuning
//! files without a game client.

use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use cast_events::{CastMember, PlayerAction};
use narrator::{NarratorConfig, ResponseNarrator};
use social_core::{default_config_toml, write_snapshot, EngineConfig, GameEngine, VirtualClock};
use tracing_subscriber::EnvFilter;

/// Command line arguments for the driver
#[derive(Parser, Debug)]
#[command(name = "cast_sim")]
#[command(about = "Play-test driver for the social simulation core")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 20)]
    ticks: u64,

    /// TOML tuning file (defaults apply to anything it omits)
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Narrator TOML file (render timeout, fixed line, templates_path)
    #[arg(long)]
    narrator: Option<PathBuf>,

    /// JSON cast file: an array of {id, name, dispositions, is_player}
    #[arg(long)]
    cast: Option<PathBuf>,

    /// Player line as "Name: text"; repeatable, one per tick
    #[arg(long)]
    say: Vec<String>,

    /// Write the final state snapshot here
    #[arg(long)]
    snapshot_out: Option<PathBuf>,

    /// Print the default tuning file and exit
    #[arg(long)]
    print_config: bool,

    /// Ticks per in-game day
    #[arg(long, default_value_t = 10)]
    ticks_per_day: u64,
}

fn default_cast() -> Vec<CastMember> {
    vec![
        CastMember::new(0, "Jordan Reyes").as_player(),
        CastMember::new(1, "Mira Vance").with_dispositions(["paranoid", "strategic"]),
        CastMember::new(2, "Theo Park").with_dispositions(["loyal", "calm"]),
        CastMember::new(3, "Sasha Okafor").with_dispositions(["charming", "flirt", "emotional"]),
        CastMember::new(4, "Dex Moreau").with_dispositions(["aggressive", "schemer", "risk-taker"]),
        CastMember::new(5, "Lena Cho").with_dispositions(["smart", "cautious"]),
        CastMember::new(6, "Omar Haddad").with_dispositions(["social", "honest"]),
        CastMember::new(7, "Priya Nair").with_dispositions(["competitive", "volatile"]),
    ]
}

fn load_cast(path: &PathBuf) -> Result<Vec<CastMember>, String> {
    let json = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    serde_json::from_str(&json).map_err(|e| format!("{}: {}", path.display(), e))
}

/// Splits "Name: text" into a talk action.
fn parse_line(line: &str) -> Option<PlayerAction> {
    let (name, text) = line.split_once(':')?;
    let (name, text) = (name.trim(), text.trim());
    if name.is_empty() {
        return None;
    }
    Some(PlayerAction::talk(name, text))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    if args.print_config {
        print!("{}", default_config_toml());
        return;
    }

    let config = match &args.tuning {
        Some(path) => match EngineConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: could not load tuning file {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };
    let cast = match &args.cast {
        Some(path) => match load_cast(path) {
            Ok(cast) => cast,
            Err(e) => {
                eprintln!("Error: could not load cast: {}", e);
                std::process::exit(1);
            }
        },
        None => default_cast(),
    };

    let narrator_config = match &args.narrator {
        Some(path) => match NarratorConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: could not load narrator config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => NarratorConfig::default(),
    };
    let narrator = match ResponseNarrator::from_config(narrator_config) {
        Ok(narrator) => narrator,
        Err(e) => {
            eprintln!("Error: could not load templates: {}", e);
            std::process::exit(1);
        }
    };

    println!("Social Simulation Driver");
    println!("========================");
    println!("Seed: {}", args.seed);
    println!("Ticks: {}", args.ticks);
    println!("Cast: {}", cast.len());
    println!();

    let interval = config.tick.interval_ms;
    let clock = VirtualClock::new(0);
    let mut engine = GameEngine::with_clock(cast, config, args.seed, Arc::new(clock.clone()))
        .with_templates(narrator.templates().clone());
    let mut lines = args.say.iter();

    for tick in 0..args.ticks {
        if tick > 0 && args.ticks_per_day > 0 && tick % args.ticks_per_day == 0 {
            let day = engine.advance_day();
            println!("--- Day {} ---", day);
        }

        if let Some(line) = lines.next() {
            match parse_line(line) {
                Some(action) => {
                    let turn = engine.respond(&action);
                    let reaction = &turn.reaction;
                    println!(
                        "[Tick {:>3}] You -> {}: \"{}\"",
                        tick,
                        action.target.as_deref().unwrap_or("?"),
                        action.content.as_deref().unwrap_or("")
                    );
                    println!(
                        "           {:?} ({}) trust {:+.1} suspicion {:+.1}",
                        reaction.take, reaction.context, reaction.deltas.trust, reaction.deltas.suspicion
                    );
                    if let (Some(npc), Some(request)) = (turn.npc, turn.render.as_ref()) {
                        let rendered = narrator.render(request).await;
                        println!("           {}: \"{}\"", request.npc_name, rendered.text);
                        if let Err(e) = engine.apply_rendered_line(npc, &rendered) {
                            eprintln!("Warning: {}", e);
                        }
                    }
                }
                None => eprintln!("Warning: ignoring malformed line {:?} (expected \"Name: text\")", line),
            }
        }

        let report = engine.tick();
        for decision in &report.decisions {
            println!(
                "[Tick {:>3}] {} -> {}: {}",
                tick,
                decision.npc_name,
                decision.decision.as_str(),
                decision.content
            );
        }
        for event in &report.events {
            println!(
                "[Tick {:>3}] EVENT {:?} (tension {:.0}): {}",
                tick, event.event_type, event.drama_tension, event.description
            );
        }
        for warning in &report.warnings {
            println!("[Tick {:>3}] health: {}", tick, warning.message);
        }

        clock.advance(interval);
    }

    println!();
    println!("Standings (day {}):", engine.day());
    let ids: Vec<_> = engine.roster().ids().collect();
    for id in ids {
        let standing = engine.social_standing(id);
        println!(
            "  {:<16} power {:>5.1}  trust {:>6.1}  suspicion {:>5.1}  alliances {}",
            engine.roster().name(id),
            standing.social_power,
            standing.avg_trust,
            standing.avg_suspicion,
            standing.alliance_count
        );
    }

    if let Some(path) = &args.snapshot_out {
        let snapshot = engine.export_snapshot();
        match write_snapshot(&snapshot, path) {
            Ok(()) => println!("Wrote {} to {}", snapshot.snapshot_id, path.display()),
            Err(e) => eprintln!("Warning: could not write snapshot: {}", e),
        }
    }
}
