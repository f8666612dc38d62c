use std::path::PathBuf;

use clap::Args;
use wheelpick_core::simulation;
use wheelpick_core::{Config, Event, GestureScript};

#[derive(Args)]
pub struct SimulateArgs {
    /// Path to a JSON gesture script
    script: PathBuf,
    /// Pretty-print the replay
    #[arg(long)]
    pretty: bool,
    /// Print only the committed values
    #[arg(long)]
    commit_only: bool,
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let json = std::fs::read_to_string(&args.script)?;
    let script = GestureScript::from_json(&json)?;
    tracing::debug!(
        script = %args.script.display(),
        picker = ?script.picker,
        gestures = script.gestures.len(),
        "replaying"
    );

    let mut replay = simulation::replay(&script, &config.preset_options())?;
    if !config.feedback_enabled() {
        replay.events.retain(|e| !matches!(e, Event::Tick { .. }));
    }
    if !replay.at_rest {
        tracing::warn!(ended_at = replay.ended_at, "replay ended before every column settled");
    }

    if args.commit_only {
        let values: Vec<String> = replay.commit.iter().map(ToString::to_string).collect();
        println!("{}", values.join(" "));
        return Ok(());
    }

    let out = if args.pretty {
        serde_json::to_string_pretty(&replay)?
    } else {
        serde_json::to_string(&replay)?
    };
    println!("{out}");
    Ok(())
}
