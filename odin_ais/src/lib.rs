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

//! tracking of vessels from a live AIS (Automatic Identification System) stream. Position reports are
//! projected onto a local plane around the subscribed bounding box and extrapolated from the last known
//! velocity, static reports provide name, call sign and vessel type

pub mod errors;
pub mod datetime;
pub mod vector;
pub mod geo;
pub mod vessel_codes;

pub mod ais;
pub mod vessel;

pub mod store;
pub use store::{VesselStore, VesselReport, VesselReporter, LogReporter, CollectingReporter, SweepStats, spawn_sweep};

pub mod recorder;
pub mod reconnect;

pub mod config;
pub use config::AisConfig;

pub mod stream;
pub use stream::{AisStreamClient, ConnectionState, FrameProcessor, FrameOutcome, FrameStats};

pub mod service;
pub use service::AisTracker;

pub use errors::{OdinAisError, Result};
