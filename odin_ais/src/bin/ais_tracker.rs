/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::path::PathBuf;
use anyhow::Result;
use clap::Parser;
use lazy_static::lazy_static;
use tracing_subscriber::EnvFilter;
use odin_ais::{AisConfig, AisTracker};

/// track vessels from a live AIS stream. Vessel reports are logged at info level
#[derive(Parser)]
#[command(about="track vessels from a live AIS stream")]
struct CliOpts {
    /// pathname of the RON config (uses built-in defaults if not set)
    #[arg(short,long)]
    config: Option<PathBuf>,

    /// directory to record raw messages to (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// do not record raw messages
    #[arg(long)]
    no_record: bool,

    /// pathname of the vessel type code table (overrides config)
    #[arg(long)]
    vessel_codes: Option<PathBuf>,
}

lazy_static! {
    static ref ARGS: CliOpts = CliOpts::parse();
}

#[tokio::main]
async fn main ()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))  // use RUST_LOG to set max level
        .init();

    let mut config = match &ARGS.config {
        Some(path) => AisConfig::load( path)?,
        None => {
            let mut config = AisConfig::default();
            config.apply_env_overrides();
            config
        }
    };
    if let Some(data_dir) = &ARGS.data_dir { config.data_dir = Some(data_dir.clone()) }
    if ARGS.no_record { config.data_dir = None }
    if let Some(vessel_codes) = &ARGS.vessel_codes { config.vessel_codes = vessel_codes.clone() }

    let tracker = AisTracker::new( config)?;
    let stats = tracker.run().await?;
    println!("processed {} frames ({} positions, {} static, {} ignored, {} failed)",
             stats.n_frames, stats.n_positions, stats.n_static, stats.n_ignored, stats.n_failed);

    Ok(())
}
