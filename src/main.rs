//! fightpad - replays a frame script through the input history and prints it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fightpad::config::AppConfig;
use fightpad::mapping::KEYBOARD_IDENTIFIER;
use fightpad::replay::{self, Replay};
use fightpad::socd::SocdMode;

#[derive(Parser, Debug)]
#[command(version, about = "Fighting game input history replay")]
struct Args {
    /// Frame script: one frame per line, pad control names, `*N` to repeat
    script: PathBuf,

    /// Config file, created with defaults when missing
    #[arg(long, default_value = "Config.toml")]
    config: PathBuf,

    /// Device identifier selecting the button map
    #[arg(long, default_value = KEYBOARD_IDENTIFIER)]
    device: String,

    /// Overrides the configured SOCD mode
    #[arg(long)]
    socd: Option<SocdMode>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = AppConfig::load_or_create(&args.config)
        .with_context(|| format!("Failed to load configuration {}", args.config.display()))?;

    let text = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read script {}", args.script.display()))?;
    let frames = replay::parse_script(&text, replay::keyboard_for(&config, &args.device))?;

    let mut replay = Replay::new(&config, &args.device);
    if let Some(mode) = args.socd {
        replay.set_socd(mode);
    }
    replay.run(&frames);

    for line in replay.lines() {
        println!("{line}");
    }

    Ok(())
}
