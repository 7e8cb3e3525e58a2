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

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error,info};

use crate::{
    config::AisConfig,
    errors::{op_failed,Result},
    recorder::{FileRecorder, MessageRecorder, NullRecorder},
    store::{spawn_sweep, LogReporter, VesselReporter, VesselStore},
    stream::{AisStreamClient, FrameProcessor, FrameStats},
    vessel_codes::VesselTypeTable
};

/// the assembled tracker: vessel code table, store, sweep task and stream client
pub struct AisTracker {
    config: Arc<AisConfig>,
    store: Arc<VesselStore>,
    reporter: Arc<dyn VesselReporter>,
}

impl AisTracker {
    /// this fails if the vessel code table cannot be loaded, in which case we should not start
    pub fn new (config: AisConfig)->Result<Self> {
        let codes = VesselTypeTable::load( &config.vessel_codes)?;
        info!("loaded {} vessel type codes from {:?}", codes.len(), config.vessel_codes);
        Self::with_codes( config, codes)
    }

    pub fn with_codes (config: AisConfig, codes: VesselTypeTable)->Result<Self> {
        let store = Arc::new( VesselStore::with_limits( Arc::new(codes), config.max_age, config.min_moving_speed)?);
        Ok( AisTracker { config: Arc::new(config), store, reporter: Arc::new(LogReporter) } )
    }

    pub fn with_reporter (mut self, reporter: Arc<dyn VesselReporter>)->Self {
        self.reporter = reporter;
        self
    }

    pub fn config (&self)->&AisConfig { &self.config }

    pub fn store (&self)->&Arc<VesselStore> { &self.store }

    pub fn create_recorder (&self)->Result<Box<dyn MessageRecorder>> {
        match &self.config.data_dir {
            Some(dir) => {
                info!("recording AIS messages to {dir:?}");
                Ok( Box::new( FileRecorder::new( dir)?) )
            }
            None => Ok( Box::new( NullRecorder) )
        }
    }

    /// run until the process receives a ctrl-c (SIGINT)
    pub async fn run (self)->Result<FrameStats> {
        let cancel = CancellationToken::new();
        let ctrl_c_cancel = cancel.clone();

        tokio::spawn( async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("received shutdown signal"),
                Err(e) => error!("cannot listen for shutdown signal: {e}")
            }
            ctrl_c_cancel.cancel();
        });

        self.run_until( cancel).await
    }

    /// run the sweep task and the stream client until `cancel` is triggered or the client gives up
    pub async fn run_until (self, cancel: CancellationToken)->Result<FrameStats> {
        if !self.config.has_api_key() {
            return Err( op_failed("no API key (set AISSTREAM_API_KEY or the config api_key)"))
        }

        let recorder = self.create_recorder()?;
        let projection = self.config.projection();
        let processor = FrameProcessor::new( self.store.clone(), projection, recorder);
        let client = AisStreamClient::new( self.config.clone(), processor);

        let sweep_task = spawn_sweep( self.store.clone(), self.config.sweep_interval, self.reporter.clone(), cancel.clone());

        let result = client.run( cancel.clone()).await;
        cancel.cancel(); // the client might have given up on its own

        if let Err(e) = sweep_task.await {
            error!("vessel sweep task failed: {e}");
        }

        match &result {
            Ok(stats) => info!("AIS tracker terminated: {stats:?}"),
            Err(e) => error!("AIS tracker terminated: {e}")
        }
        result
    }
}
