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

use std::{path::PathBuf, sync::Arc, time::Duration};
use anyhow::{anyhow,Result};
use chrono::TimeDelta;
use clap::Parser;
use lazy_static::lazy_static;
use tracing_subscriber::EnvFilter;
use odin_ais::{
    recorder::{load_recorded, NullRecorder},
    vessel_codes::VesselTypeTable,
    AisConfig, CollectingReporter, FrameProcessor, VesselStore
};

/// feed recorded AIS messages through the frame processor and report the vessels that are moving
/// at the time of the last message (plus optional offset)
#[derive(Parser)]
#[command(about="replay recorded AIS messages")]
struct CliOpts {
    /// pathname of the RON config (uses built-in defaults if not set)
    #[arg(short,long)]
    config: Option<PathBuf>,

    /// pathname of the vessel type code table (overrides config)
    #[arg(long)]
    vessel_codes: Option<PathBuf>,

    /// time offset for the sweep after the last recorded message (e.g. "30s")
    #[arg(short,long, value_parser=parse_duration::parse, default_value="0s")]
    offset: Duration,

    /// recorded message files (`<MessageType>.json`)
    #[arg(required=true)]
    files: Vec<PathBuf>,
}

lazy_static! {
    static ref ARGS: CliOpts = CliOpts::parse();
}

fn main ()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))  // use RUST_LOG to set max level
        .init();

    let mut config = match &ARGS.config {
        Some(path) => AisConfig::load( path)?,
        None => AisConfig::default()
    };
    if let Some(vessel_codes) = &ARGS.vessel_codes { config.vessel_codes = vessel_codes.clone() }

    let codes = VesselTypeTable::load( &config.vessel_codes)?;
    let store = Arc::new( VesselStore::with_limits( Arc::new(codes), config.max_age, config.min_moving_speed)?);
    let mut processor = FrameProcessor::new( store.clone(), config.projection(), Box::new(NullRecorder));

    for frame in load_recorded( &ARGS.files)? {
        processor.handle_frame( &frame);
    }
    let stats = processor.stats();
    println!("replayed {} frames ({} positions, {} static, {} ignored, {} failed)",
             stats.n_frames, stats.n_positions, stats.n_static, stats.n_ignored, stats.n_failed);

    let last = store.latest_observation().ok_or_else(|| anyhow!("no position reports in replayed data"))?;
    let at = last + TimeDelta::from_std( ARGS.offset)?;

    let reporter = CollectingReporter::new();
    let sweep_stats = store.sweep( &at, &reporter);
    for report in reporter.take() {
        println!("{report}");
    }
    println!("{sweep_stats:?}");

    Ok(())
}
