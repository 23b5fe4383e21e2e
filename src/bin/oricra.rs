// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::{Parser, ValueEnum};
use log::{error, info, warn};
use oricra::core::error::{CoordinatorError, Result};
use oricra::core::headless::{HeadlessEngine, HeadlessHost, HeadlessMachine};
use oricra::core::{CoordinatorConfig, MediaKind, Session};
use std::path::PathBuf;

/// Environment variable naming the config file
const CONFIG_ENV: &str = "ORICRA_CONFIG";

/// Oric media coordinator
///
/// Loads media into a headless session and prints the resulting state.
#[derive(Parser)]
#[command(name = "oricra")]
#[command(about = "Oric media identity and achievement activation coordinator", long_about = None)]
struct Args {
    /// Tape (.tap) or disk (.dsk) images, loaded in order
    media: Vec<PathBuf>,

    /// Path to a TOML config file (defaults to $ORICRA_CONFIG)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Register an image as a known title, as PATH=TITLE_ID
    #[arg(short = 'i', long = "identify", value_parser = parse_identify)]
    titles: Vec<(PathBuf, u32)>,

    /// Enable hardcore mode before loading
    #[arg(long)]
    hardcore: bool,

    /// Refuse hardcore warnings instead of accepting them
    #[arg(long)]
    decline_warnings: bool,

    /// Eject a slot after loading
    #[arg(short = 'e', long)]
    eject: Option<Slot>,

    /// Reset the machine after loading
    #[arg(short = 'r', long)]
    reset: bool,

    /// Emulated memory size in bytes
    #[arg(long, default_value = "65536")]
    memory_size: usize,

    /// Number of achievement frames to process
    #[arg(short = 'n', long, default_value = "1")]
    frames: usize,
}

#[derive(Clone, Copy, ValueEnum)]
enum Slot {
    Tape,
    Disk,
}

impl From<Slot> for MediaKind {
    fn from(slot: Slot) -> Self {
        match slot {
            Slot::Tape => MediaKind::Tape,
            Slot::Disk => MediaKind::Disk,
        }
    }
}

fn parse_identify(value: &str) -> std::result::Result<(PathBuf, u32), String> {
    let (path, id) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("expected PATH=TITLE_ID, got '{}'", value))?;
    let id = id
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid title id '{}': {}", id, e))?;
    Ok((PathBuf::from(path), id))
}

fn load_config(args: &Args) -> Result<CoordinatorConfig> {
    let path = args
        .config
        .clone()
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

    match path {
        Some(path) => Ok(CoordinatorConfig::load(path)?),
        None => Ok(CoordinatorConfig::default()),
    }
}

fn main() -> Result<()> {
    // Load .env before the logger so RUST_LOG set there applies; a missing file is fine
    let env_file = dotenvy::dotenv().ok();

    // Initialize logger with default level INFO
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Some(path) = env_file {
        info!("Loaded environment from {}", path.display());
    }

    info!("oricra v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = load_config(&args)?;

    let mut engine = HeadlessEngine::new();
    for (path, title_id) in &args.titles {
        let data = std::fs::read(path).map_err(|source| CoordinatorError::Io {
            path: path.clone(),
            source,
        })?;
        engine.register_title(&data, *title_id);
        info!("Registered {} as title {}", path.display(), title_id);
    }
    engine.set_hardcore(args.hardcore);
    engine.set_warn_response(!args.decline_warnings);

    let mut session = Session::new(engine, HeadlessHost::new(), config);
    session.init_system();
    session.init_ui(HeadlessMachine::new(args.memory_size));

    for path in &args.media {
        info!("Loading {}", path.display());
        match session.load_rom(path) {
            Ok(()) => {}
            Err(CoordinatorError::UserDeclined(name)) => {
                warn!("Skipped '{}': hardcore warning declined", name);
            }
            Err(e) => {
                error!("Failed to load {}: {}", path.display(), e);
                return Err(e);
            }
        }
    }

    if let Some(slot) = args.eject {
        let kind = MediaKind::from(slot);
        info!("Ejecting {}", kind);
        session.eject(kind);
    }

    if args.reset {
        info!("Resetting machine");
        session.reset_emulation()?;
    }

    for _ in 0..args.frames {
        session.process_frame();
    }

    let status = session.status();
    match serde_json::to_string_pretty(&status) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to serialize status: {}", e),
    }

    info!("Window title: {:?}", session.estimated_title());

    Ok(())
}
