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

use std::{fs, path::{Path,PathBuf}, time::Duration};
use serde::{Serialize,Deserialize};
use crate::{
    ais::{default_message_types, SubscribeMsg},
    datetime::{deserialize_duration, serialize_duration, secs},
    errors::{OdinAisError,Result},
    geo::{GeoBox, LocalProjection, LAT_METERS_PER_DEGREE, LON_METERS_PER_DEGREE},
    reconnect::ReconnectConfig,
    store::DEFAULT_MAX_AGE,
    vessel::MIN_MOVING_SPEED
};

/// env var that overrides the configured `api_key`
pub const API_KEY_ENV: &str = "AISSTREAM_API_KEY";

#[derive(Serialize,Deserialize,Debug,Clone)]
#[serde(default)]
pub struct AisConfig {
    pub ws_uri: String,
    pub(crate) api_key: String,

    pub bounding_box: GeoBox, // [[lat,lon],[lat,lon]]
    pub message_types: Vec<String>,

    pub vessel_codes: PathBuf, // pathname of the vessel type table
    pub data_dir: Option<PathBuf>, // where to record raw messages (None: don't record)

    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub sweep_interval: Duration,

    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub max_age: Duration, // after which we drop position samples

    pub min_moving_speed: f64, // m/s

    pub lat_meters_per_degree: f64,
    pub lon_meters_per_degree: f64,

    pub reconnect: ReconnectConfig,
}

impl Default for AisConfig {
    fn default()->Self {
        AisConfig {
            //--- the ones that need to be set
            ws_uri: "wss://stream.aisstream.io/v0/stream".to_string(),
            api_key: "?".to_string(),

            //--- the fields for which we have defaults
            bounding_box: GeoBox::default(),
            message_types: default_message_types(),
            vessel_codes: PathBuf::from("odin_ais/resources/vessel-codes.txt"),
            data_dir: Some( PathBuf::from("data/ais")),
            sweep_interval: secs(10),
            max_age: DEFAULT_MAX_AGE,
            min_moving_speed: MIN_MOVING_SPEED,
            lat_meters_per_degree: LAT_METERS_PER_DEGREE,
            lon_meters_per_degree: LON_METERS_PER_DEGREE,
            reconnect: ReconnectConfig::default(),
        }
    }
}

impl AisConfig {
    /// load from a RON file. The `AISSTREAM_API_KEY` env var takes precedence over the configured api_key
    pub fn load (path: impl AsRef<Path>)->Result<Self> {
        let path = path.as_ref();
        let src = fs::read_to_string( path)
            .map_err(|e| OdinAisError::ConfigError( format!("failed to read config {path:?}: {e}")))?;
        let mut config = Self::from_ron( &src)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides (&mut self) {
        if let Ok(api_key) = std::env::var( API_KEY_ENV) {
            if !api_key.is_empty() { self.api_key = api_key }
        }
    }

    pub fn from_ron (src: &str)->Result<Self> {
        Ok( ron::from_str( src)?)
    }

    pub fn with_api_key (mut self, api_key: impl ToString)->Self {
        self.api_key = api_key.to_string();
        self
    }

    pub fn has_api_key (&self)->bool {
        !self.api_key.is_empty() && self.api_key != "?"
    }

    pub fn projection (&self)->LocalProjection {
        LocalProjection::new( &self.bounding_box, self.lat_meters_per_degree, self.lon_meters_per_degree)
    }

    pub fn subscribe_msg (&self)->SubscribeMsg {
        SubscribeMsg {
            api_key: self.api_key.clone(),
            bounding_boxes: vec![ self.bounding_box.corners() ],
            filter_message_types: self.message_types.clone(),
        }
    }
}
