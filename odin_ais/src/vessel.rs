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

use std::fmt;
use chrono::{DateTime,TimeDelta,Utc};
use serde::{Serialize,Deserialize};
use crate::{
    ais::{Dimension, Eta, PositionReport, ShipStaticData, StaticDataReport, StaticPayload, VesselId},
    datetime::secs_between,
    vector::Vec2,
    vessel_codes::VesselTypeTable
};

/// navigational status values for which heading and speed over ground are meaningful
/// (0: under way using engine, 8: under way sailing, 11/12: towing, 15: undefined)
pub const MOBILE_NAV_STATUS: [u8;5] = [0, 8, 11, 12, 15];

pub const HEADING_NOT_AVAILABLE: f64 = 511.0;
pub const COG_NOT_AVAILABLE: f64 = 360.0; // and above
pub const SOG_NOT_AVAILABLE: f64 = 102.3; // and above

pub const KNOTS_TO_METERS_PER_SECOND: f64 = 0.514444;

/// minimum speed in m/s for a vessel to be considered moving
pub const MIN_MOVING_SPEED: f64 = 0.5;

#[inline]
pub fn is_mobile_status (nav_status: u8)->bool {
    MOBILE_NAV_STATUS.contains( &nav_status)
}

/* #region StaticInfo ***********************************************************************************/

/// identity and attributes of a vessel. Those change rarely, we keep the first one we get
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct StaticInfo {
    pub vessel_id: VesselId,
    pub name: String,
    pub call_sign: String,
    pub destination: String, // empty if not known
    pub eta: Option<Eta>,
    pub dimension: Dimension,
    pub vessel_group: String,
    pub vessel_classification: String,
    pub observed_at: DateTime<Utc>,
}

impl StaticInfo {
    pub fn from_ship_static_data (observed_at: DateTime<Utc>, sd: &ShipStaticData, codes: &VesselTypeTable)->StaticInfo {
        StaticInfo {
            vessel_id: sd.user_id,
            name: sd.name.trim().to_string(),
            call_sign: sd.call_sign.clone(),
            destination: sd.destination.trim().to_string(),
            eta: Some(sd.eta),
            dimension: sd.dimension,
            vessel_group: codes.group( sd.ship_type).to_string(),
            vessel_classification: codes.classification( sd.ship_type).to_string(),
            observed_at
        }
    }

    /// this only succeeds if the report contains both parts, partial reports are not turned into StaticInfos
    pub fn from_static_data_report (observed_at: DateTime<Utc>, sr: &StaticDataReport, codes: &VesselTypeTable)->Option<StaticInfo> {
        let (Some(a), Some(b)) = (&sr.report_a, &sr.report_b) else { return None };

        Some( StaticInfo {
            vessel_id: sr.user_id,
            name: a.name.trim().to_string(),
            call_sign: b.call_sign.clone(),
            destination: String::new(),
            eta: None,
            dimension: b.dimension,
            vessel_group: codes.group( b.ship_type).to_string(),
            vessel_classification: codes.classification( b.ship_type).to_string(),
            observed_at
        })
    }

    pub fn from_payload (observed_at: DateTime<Utc>, payload: &StaticPayload, codes: &VesselTypeTable)->Option<StaticInfo> {
        match payload {
            StaticPayload::Full(sd) => Some( Self::from_ship_static_data( observed_at, sd, codes)),
            StaticPayload::Split(sr) => Self::from_static_data_report( observed_at, sr, codes)
        }
    }
}

impl fmt::Display for StaticInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "StaticInfo( id: {}, name: \"{}\", cs: \"{}\"", self.vessel_id, self.name, self.call_sign)?;
        if !self.destination.is_empty() { write!( f, ", dest: \"{}\"", self.destination)?; }
        write!( f, ", dim: {}, type: {}/{}, time: {})", self.dimension, self.vessel_group, self.vessel_classification, self.observed_at)
    }
}

/* #endregion StaticInfo */

/* #region PositionSample *******************************************************************************/

/// the last observed position and velocity of a vessel. Positions are in meters on the local plane
/// (see [`crate::geo::LocalProjection`]), velocities in m/s
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct PositionSample {
    pub vessel_id: VesselId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub course_over_ground: f64, // as reported
    pub speed_over_ground: f64, // as reported (knots)
    pub navigational_status: u8,
    pub observed_at: DateTime<Utc>,
}

impl PositionSample {
    pub fn from_report (observed_at: DateTime<Utc>, position: Vec2, report: &PositionReport)->PositionSample {
        let navigational_status = report.navigational_status.unwrap_or(0);
        let velocity = velocity_of( navigational_status, report.true_heading, report.cog, report.sog);

        PositionSample {
            vessel_id: report.user_id,
            position,
            velocity,
            course_over_ground: report.cog,
            speed_over_ground: report.sog,
            navigational_status,
            observed_at
        }
    }

    /// extrapolated position at time `t`
    pub fn position_at (&self, t: &DateTime<Utc>)->Vec2 {
        self.position + self.velocity * secs_between( t, &self.observed_at)
    }

    /// extrapolated position at `t + offset`
    pub fn position_at_offset (&self, t: &DateTime<Utc>, offset: TimeDelta)->Vec2 {
        self.position_at( &(*t + offset))
    }

    pub fn speed (&self)->f64 {
        self.velocity.magnitude()
    }

    pub fn is_moving (&self)->bool {
        self.is_moving_above( MIN_MOVING_SPEED)
    }

    pub fn is_moving_above (&self, min_speed: f64)->bool {
        is_mobile_status( self.navigational_status) && self.velocity.magnitude() >= min_speed
    }

    pub fn age_at (&self, now: &DateTime<Utc>)->TimeDelta {
        *now - self.observed_at
    }
}

impl fmt::Display for PositionSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!( f, "PositionSample( id: {}, pos: {}, vel: {}, status: {}, time: {})",
                self.vessel_id, self.position, self.velocity, self.navigational_status, self.observed_at)
    }
}

/// velocity vector in m/s. Heading and speed are only used for mobile nav status values, with
/// fallbacks for the "not available" sentinels (heading -> cog -> 0, sog -> 0)
pub fn velocity_of (nav_status: u8, true_heading: f64, cog: f64, sog: f64)->Vec2 {
    let (heading, sog) = if is_mobile_status( nav_status) {
        let heading = if true_heading == HEADING_NOT_AVAILABLE {
            if cog >= COG_NOT_AVAILABLE { 0.0 } else { cog }
        } else {
            true_heading
        };
        let sog = if sog >= SOG_NOT_AVAILABLE { 0.0 } else { sog };
        (heading, sog)
    } else {
        (0.0, 0.0)
    };

    Vec2::from_heading_degrees( heading).with_magnitude( sog * KNOTS_TO_METERS_PER_SECOND)
}

/* #endregion PositionSample */
