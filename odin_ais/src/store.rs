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

use std::{fmt, sync::{Arc, Mutex, atomic::{AtomicI64,Ordering}}, time::Duration};
use chrono::{DateTime,TimeDelta,Utc};
use dashmap::{DashMap, mapref::entry::Entry};
use serde::{Serialize,Deserialize};
use tokio::{task::JoinHandle, time::{self,MissedTickBehavior}};
use tokio_util::sync::CancellationToken;
use tracing::{debug,info,warn};

use crate::{
    errors::{OdinAisError,Result},
    ais::{PositionReport, StaticPayload, VesselId},
    vector::Vec2,
    vessel::{PositionSample, StaticInfo, MIN_MOVING_SPEED},
    vessel_codes::VesselTypeTable
};

pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(15 * 60);

/* #region reporting ************************************************************************************/

/// what the sweep emits for each moving vessel we know the static info of
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct VesselReport {
    pub info: StaticInfo,
    pub position: Vec2, // extrapolated to `at`
    pub velocity: Vec2,
    pub at: DateTime<Utc>,
}

impl fmt::Display for VesselReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "{} at {} -> pos: {}, vel: {}", self.info.name, self.at, self.position, self.velocity)
    }
}

/// the collaborator that receives sweep results
pub trait VesselReporter: Send + Sync {
    fn report (&self, report: &VesselReport);
}

/// default reporter that just logs
pub struct LogReporter;

impl VesselReporter for LogReporter {
    fn report (&self, report: &VesselReport) {
        info!("{}", report.info);
        info!("{} position {} velocity {}", report.info.vessel_id, report.position, report.velocity);
    }
}

/// reporter that accumulates reports until they are taken
#[derive(Default)]
pub struct CollectingReporter {
    reports: Mutex<Vec<VesselReport>>
}

impl CollectingReporter {
    pub fn new ()->Self { CollectingReporter::default() }

    pub fn take (&self)->Vec<VesselReport> {
        match self.reports.lock() {
            Ok(mut reports) => std::mem::take( &mut *reports),
            Err(poisoned) => std::mem::take( &mut *poisoned.into_inner())
        }
    }
}

impl VesselReporter for CollectingReporter {
    fn report (&self, report: &VesselReport) {
        match self.reports.lock() {
            Ok(mut reports) => reports.push( report.clone()),
            Err(poisoned) => poisoned.into_inner().push( report.clone())
        }
    }
}

/// result of a single sweep
#[derive(Debug,Default,Clone,Copy,PartialEq,Eq)]
pub struct SweepStats {
    pub n_evicted: usize,
    pub n_moving: usize,
    pub n_reported: usize,
    pub n_missing_static: usize,
}

/* #endregion reporting */

/* #region VesselStore **********************************************************************************/

/// the in-memory model of currently tracked vessels.
/// 
/// The store is shared between the stream client (which reports static and position data) and the
/// sweep task (which reads positions and evicts stale ones). Both maps are `DashMap`s that guard
/// each entry, hence static info insertion is atomic per vessel id (first one wins). Position updates
/// and the subsequent eviction happen on the stream task, i.e. updates for the same vessel are applied
/// in frame order.
pub struct VesselStore {
    codes: Arc<VesselTypeTable>,
    max_age: TimeDelta,
    min_moving_speed: f64,

    static_info: DashMap<VesselId,StaticInfo>,
    positions: DashMap<VesselId,PositionSample>,
    latest: AtomicI64, // epoch millis of the freshest position sample we have seen so far
}

impl VesselStore {
    pub fn new (codes: Arc<VesselTypeTable>)->Self {
        Self::create( codes, TimeDelta::minutes(15), MIN_MOVING_SPEED)
    }

    /// this fails if `max_age` is not representable as a time difference
    pub fn with_limits (codes: Arc<VesselTypeTable>, max_age: Duration, min_moving_speed: f64)->Result<Self> {
        let max_age = TimeDelta::from_std( max_age)
            .map_err(|e| OdinAisError::ConfigError( format!("max_age {max_age:?} out of range: {e}")))?;
        Ok( Self::create( codes, max_age, min_moving_speed) )
    }

    fn create (codes: Arc<VesselTypeTable>, max_age: TimeDelta, min_moving_speed: f64)->Self {
        VesselStore {
            codes, max_age, min_moving_speed,
            static_info: DashMap::new(),
            positions: DashMap::new(),
            latest: AtomicI64::new( i64::MIN),
        }
    }

    pub fn vessel_types (&self)->&VesselTypeTable { self.codes.as_ref() }

    /// store static info for the vessel unless we already have one. Partial (split) reports
    /// are dropped. Returns true if a new entry was added
    pub fn report_static (&self, observed_at: DateTime<Utc>, payload: &StaticPayload)->bool {
        match self.static_info.entry( payload.user_id()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(e) => {
                if let Some(info) = StaticInfo::from_payload( observed_at, payload, &self.codes) {
                    debug!("new {info}");
                    e.insert(info);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// replace the position sample of the reporting vessel and evict all samples that are older than
    /// `max_age` relative to the freshest observation time. Returns the number of evicted samples
    pub fn report_position (&self, observed_at: DateTime<Utc>, position: Vec2, report: &PositionReport)->usize {
        let sample = PositionSample::from_report( observed_at, position, report);
        self.positions.insert( sample.vessel_id, sample);

        let t = observed_at.timestamp_millis();
        let latest = self.latest.fetch_max( t, Ordering::Relaxed).max(t);
        match DateTime::from_timestamp_millis( latest) {
            Some(now) => self.evict_stale( &now),
            None => 0
        }
    }

    /// remove all position samples that are more than `max_age` older than `now`
    pub fn evict_stale (&self, now: &DateTime<Utc>)->usize {
        let max_age = self.max_age;
        let mut n_evicted = 0;
        self.positions.retain( |id,sample| {
            if sample.age_at( now) > max_age {
                debug!("evicting stale position of {id} from {}", sample.observed_at);
                n_evicted += 1;
                false
            } else {
                true
            }
        });
        n_evicted
    }

    /// evict stale samples and report the extrapolated positions of all moving vessels. Moving
    /// vessels without static info are skipped with a warning - that is expected until we get
    /// their first static report
    pub fn sweep (&self, now: &DateTime<Utc>, reporter: &dyn VesselReporter)->SweepStats {
        let mut stats = SweepStats::default();
        stats.n_evicted = self.evict_stale( now);

        let mut reports: Vec<VesselReport> = Vec::new();
        for e in self.positions.iter() {
            let sample = e.value();
            if sample.is_moving_above( self.min_moving_speed) {
                stats.n_moving += 1;
                if let Some(info) = self.static_info.get( &sample.vessel_id) {
                    reports.push( VesselReport {
                        info: info.value().clone(),
                        position: sample.position_at( now),
                        velocity: sample.velocity,
                        at: *now
                    });
                } else {
                    warn!("no static info for moving vessel {}", sample.vessel_id);
                    stats.n_missing_static += 1;
                }
            }
        }

        // don't call the reporter while holding map locks
        for report in &reports {
            reporter.report( report);
        }
        stats.n_reported = reports.len();
        stats
    }

    pub fn static_info (&self, id: VesselId)->Option<StaticInfo> {
        self.static_info.get( &id).map( |e| e.value().clone())
    }

    pub fn position (&self, id: VesselId)->Option<PositionSample> {
        self.positions.get( &id).map( |e| e.value().clone())
    }

    pub fn num_static (&self)->usize { self.static_info.len() }
    pub fn num_positions (&self)->usize { self.positions.len() }

    /// observation time of the freshest position sample so far
    pub fn latest_observation (&self)->Option<DateTime<Utc>> {
        match self.latest.load( Ordering::Relaxed) {
            i64::MIN => None,
            millis => DateTime::from_timestamp_millis( millis)
        }
    }
}

/* #endregion VesselStore */

/* #region sweep task ***********************************************************************************/

/// spawn the periodic sweep over `store`. The first sweep runs right away, the task terminates
/// once `cancel` is triggered
pub fn spawn_sweep (store: Arc<VesselStore>, interval: Duration, reporter: Arc<dyn VesselReporter>, cancel: CancellationToken)->JoinHandle<()> {
    tokio::spawn( async move {
        info!("starting vessel sweep with interval {interval:?}");
        let mut timer = time::interval( interval);
        timer.set_missed_tick_behavior( MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = timer.tick() => {
                    let stats = store.sweep( &Utc::now(), reporter.as_ref());
                    debug!("sweep: {stats:?}, tracking {} positions, {} static", store.num_positions(), store.num_static());
                }
            }
        }
        info!("vessel sweep terminated");
    })
}

/* #endregion sweep task */
