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

use chrono::{DateTime,Utc};
use odin_ais::{
    ais::{AisMessage, AisPayload, StaticPayload, PositionReport, MessageKind},
    geo::LocalProjection,
    vector::Vec2,
    vessel::{velocity_of, PositionSample, StaticInfo, KNOTS_TO_METERS_PER_SECOND},
    vessel_codes::VesselTypeTable
};

//--- test data

const CODES: &str = "code|group|classification\n70|Cargo|Cargo, all ships of this type\n";

const SHIP_STATIC_DATA: &str = r#"{"MessageType":"ShipStaticData","MetaData":{"MMSI":366999712,"ShipName":"FOO","time_utc":"2024-06-06 14:25:41.887286862 +0000 UTC"},
  "Message":{"ShipStaticData":{"MessageID":5,"UserID":366999712,"Name":" Foo ","CallSign":"WDA1234","Destination":"NEW YORK  ",
   "Eta":{"Month":6,"Day":7,"Hour":12,"Minute":30},"Dimension":{"A":100,"B":20,"C":10,"D":12},"Type":70,"Valid":true}}}"#;

const REPORT_A_ONLY: &str = r#"{"MessageType":"StaticDataReport","MetaData":{"time_utc":"2024-06-06 14:25:41.887286862 +0000 UTC"},
  "Message":{"StaticDataReport":{"MessageID":24,"UserID":338123456,"ReportA":{"Valid":true,"Name":"BAR"}}}}"#;

const REPORT_A_AND_B: &str = r#"{"MessageType":"StaticDataReport","MetaData":{"time_utc":"2024-06-06 14:25:41.887286862 +0000 UTC"},
  "Message":{"StaticDataReport":{"MessageID":24,"UserID":338123456,"ReportA":{"Valid":true,"Name":"BAR "},
   "ReportB":{"Valid":true,"CallSign":"KBAR","Dimension":{"A":5,"B":5,"C":2,"D":2},"ShipType":37}}}}"#;

const UNKNOWN_STATIC_ID: &str = r#"{"MessageType":"ShipStaticData","MetaData":{"time_utc":"2024-06-06 14:25:41.887286862 +0000 UTC"},
  "Message":{"ShipStaticData":{"MessageID":19,"UserID":1}}}"#;

const POSITION_REPORT: &str = r#"{"MessageType":"PositionReport","MetaData":{"MMSI":368207620,"time_utc":"2024-06-06 14:25:41.887286862 +0000 UTC"},
  "Message":{"PositionReport":{"Cog":308,"Latitude":40.75,"Longitude":-74.02,"MessageID":1,"NavigationalStatus":0,"Sog":10.0,"TrueHeading":511,"UserID":368207620}}}"#;

const CLASS_B_POSITION_REPORT: &str = r#"{"MessageType":"StandardClassBPositionReport","MetaData":{"time_utc":"2024-06-06 14:25:41 +0000 UTC"},
  "Message":{"StandardClassBPositionReport":{"Cog":90,"Latitude":40.75,"Longitude":-74.02,"MessageID":18,"Sog":2,"TrueHeading":90,"UserID":367000001}}}"#;

fn t0 ()->DateTime<Utc> {
    DateTime::from_timestamp( 1717683941, 0).unwrap()
}

fn decode_static (json: &str)->StaticPayload {
    match AisMessage::from_json( json).unwrap().decode().unwrap() {
        AisPayload::Static(sp) => sp,
        other => panic!("not a static payload: {other:?}")
    }
}

fn report (status: Option<u8>, heading: f64, cog: f64, sog: f64)->PositionReport {
    PositionReport { user_id: 42, latitude: 40.75, longitude: -74.02, cog, sog, true_heading: heading, navigational_status: status }
}

fn assert_close (a: f64, b: f64) {
    assert!( (a - b).abs() < 1e-6, "{a} != {b}");
}

// run with "cargo test --test test_vessel -- --nocapture"

#[test]
fn test_ship_static_data () {
    let codes = VesselTypeTable::parse( CODES).unwrap();
    let msg = AisMessage::from_json( SHIP_STATIC_DATA).unwrap();
    assert_eq!( msg.kind(), MessageKind::Static);

    let payload = decode_static( SHIP_STATIC_DATA);
    let info = StaticInfo::from_payload( msg.timestamp().unwrap(), &payload, &codes).expect("no static info for shape A");
    println!("{info}");

    assert_eq!( info.vessel_id, 366999712);
    assert_eq!( info.name, "Foo");
    assert_eq!( info.destination, "NEW YORK");
    assert_eq!( info.call_sign, "WDA1234");
    assert_eq!( info.dimension.length(), 120);
    assert_eq!( info.dimension.beam(), 22);
    assert_eq!( info.vessel_group, "Cargo");
    assert_eq!( info.eta.map(|eta| eta.minute), Some(30));
    assert_eq!( info.observed_at.timestamp(), 1717683941);
}

#[test]
fn test_partial_static_data_report () {
    let codes = VesselTypeTable::default();
    let payload = decode_static( REPORT_A_ONLY);
    assert!( matches!( payload, StaticPayload::Split(_)));
    assert!( StaticInfo::from_payload( t0(), &payload, &codes).is_none());
}

#[test]
fn test_complete_static_data_report () {
    let codes = VesselTypeTable::default();
    let payload = decode_static( REPORT_A_AND_B);
    let info = StaticInfo::from_payload( t0(), &payload, &codes).expect("no static info for complete shape B");
    println!("{info}");

    assert_eq!( info.name, "BAR");
    assert_eq!( info.call_sign, "KBAR");
    assert_eq!( info.destination, "");
    assert!( info.eta.is_none());
    assert_eq!( info.vessel_group, "Unknown"); // not in the (empty) table
    assert_eq!( info.vessel_classification, "Unknown");
}

#[test]
fn test_unknown_static_discriminator () {
    let msg = AisMessage::from_json( UNKNOWN_STATIC_ID).unwrap();
    assert!( matches!( msg.decode().unwrap(), AisPayload::Ignored));
}

#[test]
fn test_position_report () {
    let msg = AisMessage::from_json( POSITION_REPORT).unwrap();
    let AisPayload::Position(report) = msg.decode().unwrap() else { panic!("not a position report") };
    assert_eq!( report.user_id, 368207620);
    assert_eq!( report.navigational_status, Some(0));

    let proj = LocalProjection::default();
    let sample = PositionSample::from_report( msg.timestamp().unwrap(), proj.to_local( report.latitude, report.longitude), &report);
    println!("{sample}");

    // heading not available -> cog
    let expected = Vec2::from_heading_degrees( 308.0).with_magnitude( 10.0 * KNOTS_TO_METERS_PER_SECOND);
    assert_close( sample.velocity.x, expected.x);
    assert_close( sample.velocity.y, expected.y);
    assert!( sample.is_moving());
}

#[test]
fn test_class_b_position_report () {
    let msg = AisMessage::from_json( CLASS_B_POSITION_REPORT).unwrap();
    let AisPayload::Position(report) = msg.decode().unwrap() else { panic!("not a position report") };
    assert_eq!( report.navigational_status, None);

    let sample = PositionSample::from_report( msg.timestamp().unwrap(), Vec2::ZERO, &report);
    assert_eq!( sample.navigational_status, 0);
    assert_close( sample.speed(), 2.0 * KNOTS_TO_METERS_PER_SECOND);
}

#[test]
fn test_velocity_fallbacks () {
    // heading not available, use cog
    let v = velocity_of( 0, 511.0, 45.0, 10.0);
    let expected = Vec2::from_heading_degrees( 45.0).with_magnitude( 10.0 * KNOTS_TO_METERS_PER_SECOND);
    assert_close( v.x, expected.x);
    assert_close( v.y, expected.y);

    // neither heading nor cog available
    let v = velocity_of( 0, 511.0, 360.0, 10.0);
    assert_close( v.x, 10.0 * KNOTS_TO_METERS_PER_SECOND);
    assert_close( v.y, 0.0);

    // speed not available
    assert!( velocity_of( 0, 90.0, 90.0, 102.3).is_zero());

    // not under way
    assert!( velocity_of( 1, 90.0, 90.0, 10.0).is_zero());
    assert!( velocity_of( 5, 90.0, 90.0, 10.0).is_zero());

    // all mobile states
    for status in [0u8, 8, 11, 12, 15] {
        assert_close( velocity_of( status, 90.0, 90.0, 10.0).magnitude(), 10.0 * KNOTS_TO_METERS_PER_SECOND);
    }
}

#[test]
fn test_moving_threshold () {
    let slow = PositionSample::from_report( t0(), Vec2::ZERO, &report( Some(0), 90.0, 90.0, 0.9)); // 0.463 m/s
    assert!( !slow.is_moving());

    let fast = PositionSample::from_report( t0(), Vec2::ZERO, &report( Some(0), 90.0, 90.0, 1.0)); // 0.514 m/s
    assert!( fast.is_moving());

    let moored = PositionSample::from_report( t0(), Vec2::ZERO, &report( Some(5), 90.0, 90.0, 10.0));
    assert!( !moored.is_moving());
}

#[test]
fn test_extrapolation () {
    let sample = PositionSample::from_report( t0(), Vec2::new( 100.0, 200.0), &report( Some(0), 90.0, 90.0, 10.0));
    let t = t0() + chrono::TimeDelta::seconds(5);

    let p = sample.position_at( &t);
    println!("extrapolated to {p}");
    assert_close( p.x, 100.0);
    assert_close( p.y, 200.0 + 10.0 * KNOTS_TO_METERS_PER_SECOND * 5.0);

    assert_eq!( sample.position_at( &t0()), sample.position);
}

#[test]
fn test_extrapolation_is_linear () {
    let sample = PositionSample::from_report( t0(), Vec2::new( -50.0, 20.0), &report( Some(0), 30.0, 30.0, 8.0));
    let original = sample.clone();
    let unit = sample.position_at( &(t0() + chrono::TimeDelta::seconds(1))) - sample.position;

    for dt in [-120i64, -7, -1, 0, 1, 3, 60, 900] {
        let p = sample.position_at( &(t0() + chrono::TimeDelta::seconds(dt)));
        let d = p - sample.position;
        println!("{dt:5}s -> {p}");
        assert_close( d.x, unit.x * dt as f64);
        assert_close( d.y, unit.y * dt as f64);
    }

    // sub-second elapsed time
    let p = sample.position_at( &(t0() + chrono::TimeDelta::milliseconds(2500)));
    assert_close( (p - sample.position).magnitude(), 2.5 * 8.0 * KNOTS_TO_METERS_PER_SECOND);

    // offset variant is the same as shifting the time
    for (secs,offset) in [(10i64, 5i64), (10, -15), (-3, 0), (0, 42)] {
        let t = t0() + chrono::TimeDelta::seconds(secs);
        let d = chrono::TimeDelta::seconds(offset);
        assert_eq!( sample.position_at_offset( &t, d), sample.position_at( &(t + d)));
    }

    assert_eq!( sample, original); // extrapolation does not change the sample
}
