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

//! the AIS stream wire format. This is the parse boundary - everything past [`AisMessage::decode`]
//! works with typed payloads and does not have to check for key presence anymore

use std::fmt;
use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize};
use serde_json::{Map,Value};
use crate::{datetime::parse_time_utc, errors::{parse_error,Result}};

pub type VesselId = u32;

//--- message kinds we subscribe to and route
pub const POSITION_REPORT: &str = "PositionReport";
pub const STANDARD_CLASS_B_POSITION_REPORT: &str = "StandardClassBPositionReport";
pub const SHIP_STATIC_DATA: &str = "ShipStaticData";
pub const STATIC_DATA_REPORT: &str = "StaticDataReport";

pub fn default_message_types ()->Vec<String> {
    [POSITION_REPORT, STANDARD_CLASS_B_POSITION_REPORT, SHIP_STATIC_DATA, STATIC_DATA_REPORT].iter().map(|s| s.to_string()).collect()
}

/// discriminator values (AIS message id) of the two static report shapes
pub const FULL_STATIC_MSG_ID: u64 = 5;
pub const SPLIT_STATIC_MSG_ID: u64 = 24;

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum MessageKind {
    Position,
    Static,
    Other
}

impl MessageKind {
    pub fn of (message_type: &str)->MessageKind {
        match message_type {
            POSITION_REPORT | STANDARD_CLASS_B_POSITION_REPORT => MessageKind::Position,
            SHIP_STATIC_DATA | STATIC_DATA_REPORT => MessageKind::Static,
            _ => MessageKind::Other
        }
    }
}

/* #region outbound *************************************************************************************/

/// the control message we have to send right after connecting
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct SubscribeMsg {
    #[serde(rename="APIKey")]
    pub api_key: String,

    #[serde(rename="BoundingBoxes")]
    pub bounding_boxes: Vec<[[f64;2];2]>, // [[lat,lon],[lat,lon]]

    #[serde(rename="FilterMessageTypes")]
    pub filter_message_types: Vec<String>,
}

/* #endregion outbound */

/* #region inbound envelope *****************************************************************************/

// in: {"MessageType":"PositionReport","MetaData":{"MMSI":368207620,"time_utc":"2024-06-06 14:25:41.887286862 +0000 UTC",..},
//      "Message":{"PositionReport":{"Cog":308,"Latitude":40.75,"Longitude":-74.01,"NavigationalStatus":0,"Sog":0.1,"TrueHeading":511,"UserID":368207620,..}}}

#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct AisMessage {
    #[serde(rename="MessageType")]
    pub message_type: String,

    #[serde(rename="MetaData")]
    pub meta_data: MetaData,

    #[serde(rename="Message")]
    pub message: Map<String,Value>,
}

#[derive(Serialize,Deserialize,Debug,Clone)]
pub struct MetaData {
    pub time_utc: String,

    #[serde(flatten)]
    pub other: Map<String,Value>, // preserved so that recorded messages are complete
}

impl AisMessage {
    pub fn from_json (json: &str)->Result<AisMessage> {
        Ok( serde_json::from_str(json)?)
    }

    pub fn kind (&self)->MessageKind {
        MessageKind::of( &self.message_type)
    }

    pub fn timestamp (&self)->Result<DateTime<Utc>> {
        parse_time_utc( &self.meta_data.time_utc)
    }

    /// the kind-specific payload, which is keyed by the message type
    pub fn payload (&self)->Result<&Value> {
        self.message.get( &self.message_type).ok_or_else( || parse_error!("no '{}' payload", self.message_type))
    }

    pub fn decode (&self)->Result<AisPayload> {
        match self.kind() {
            MessageKind::Position => {
                let report = PositionReport::deserialize( self.payload()?)?;
                Ok( AisPayload::Position(report) )
            }
            MessageKind::Static => {
                match StaticPayload::from_value( self.payload()?)? {
                    Some(sp) => Ok( AisPayload::Static(sp) ),
                    None => Ok( AisPayload::Ignored )
                }
            }
            MessageKind::Other => Ok( AisPayload::Ignored )
        }
    }
}

/// the decoded, routable payload of an [`AisMessage`]
#[derive(Debug,Clone)]
pub enum AisPayload {
    Position(PositionReport),
    Static(StaticPayload),
    Ignored // not routed (unknown kind or static discriminator)
}

/* #endregion inbound envelope */

/* #region payloads *************************************************************************************/

#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Default)]
#[serde(rename_all="UPPERCASE")]
pub struct Dimension {
    pub a: u32, // reference point to bow (m)
    pub b: u32, // to stern
    pub c: u32, // to port
    pub d: u32, // to starboard
}

impl Dimension {
    pub fn length (&self)->u32 { self.a + self.b }
    pub fn beam (&self)->u32 { self.c + self.d }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}m", self.length(), self.beam())
    }
}

#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Default)]
#[serde(rename_all="PascalCase")]
pub struct Eta {
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

/// shape A of static data ("full static report", AIS message 5)
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(rename_all="PascalCase")]
pub struct ShipStaticData {
    #[serde(rename="MessageID")]
    pub message_id: u64,

    #[serde(rename="UserID")]
    pub user_id: VesselId,

    pub name: String,
    pub call_sign: String,
    pub destination: String,
    pub eta: Eta,
    pub dimension: Dimension,

    #[serde(rename="Type")]
    pub ship_type: u32,
}

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(rename_all="PascalCase")]
pub struct StaticReportA {
    pub name: String,
}

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(rename_all="PascalCase")]
pub struct StaticReportB {
    pub call_sign: String,
    pub dimension: Dimension,
    pub ship_type: u32,
}

/// shape B of static data ("split static report", AIS message 24). Each message might only carry
/// one of the two parts
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(rename_all="PascalCase")]
pub struct StaticDataReport {
    #[serde(rename="MessageID")]
    pub message_id: u64,

    #[serde(rename="UserID")]
    pub user_id: VesselId,

    #[serde(default)]
    pub report_a: Option<StaticReportA>,

    #[serde(default)]
    pub report_b: Option<StaticReportB>,
}

#[derive(Debug,Clone,PartialEq)]
pub enum StaticPayload {
    Full(ShipStaticData),
    Split(StaticDataReport)
}

impl StaticPayload {
    /// pick the shape based on the payload `MessageID`. Unknown discriminators yield `None`
    pub fn from_value (v: &Value)->Result<Option<StaticPayload>> {
        match v.get("MessageID").and_then(Value::as_u64) {
            Some(FULL_STATIC_MSG_ID) => Ok( Some( StaticPayload::Full( ShipStaticData::deserialize(v)?))),
            Some(SPLIT_STATIC_MSG_ID) => Ok( Some( StaticPayload::Split( StaticDataReport::deserialize(v)?))),
            _ => Ok(None)
        }
    }

    pub fn user_id (&self)->VesselId {
        match self {
            StaticPayload::Full(sd) => sd.user_id,
            StaticPayload::Split(sr) => sr.user_id
        }
    }
}

/// position reports of class A ("PositionReport") and class B ("StandardClassBPositionReport") transponders.
/// Class B reports do not have a navigational status
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(rename_all="PascalCase")]
pub struct PositionReport {
    #[serde(rename="UserID")]
    pub user_id: VesselId,

    pub latitude: f64,
    pub longitude: f64,
    pub cog: f64, // course over ground in degrees, >= 360 if not available
    pub sog: f64, // speed over ground in knots, >= 102.3 if not available
    pub true_heading: f64, // degrees, 511 if not available

    #[serde(default)]
    pub navigational_status: Option<u8>,
}

/* #endregion payloads */
