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

use std::{fs, time::Duration};
use odin_ais::{vessel_codes::{VesselTypeTable, UNKNOWN}, AisConfig, OdinAisError};

const VALID_TABLE: &str = "code|group|classification
# comment lines and blank lines are skipped

30|Fishing|Fishing
 52 | Tug | Tug
70|Cargo|Cargo, all ships of this type
";

// run with "cargo test --test test_config -- --nocapture"

#[test]
fn test_vessel_codes () {
    let codes = VesselTypeTable::parse( VALID_TABLE).unwrap();
    assert_eq!( codes.len(), 3);
    assert_eq!( codes.group(52), "Tug");
    assert_eq!( codes.classification(70), "Cargo, all ships of this type");
    assert_eq!( codes.group(99), UNKNOWN);
    assert_eq!( codes.classification(99), UNKNOWN);
}

#[test]
fn test_malformed_vessel_codes () {
    let src = "code|group|classification\n30|Fishing|Fishing\n31|Tug\n";
    match VesselTypeTable::parse( src) {
        Err(OdinAisError::VesselCodesError{line,..}) => assert_eq!( line, 3),
        other => panic!("malformed table accepted: {other:?}")
    }

    let src = "code|group|classification\nthirty|Fishing|Fishing\n";
    assert!( matches!( VesselTypeTable::parse( src), Err(OdinAisError::VesselCodesError{line:2,..})));
}

#[test]
fn test_vessel_codes_resource () {
    let codes = VesselTypeTable::load("resources/vessel-codes.txt").unwrap();
    assert_eq!( codes.len(), 100);
    assert_eq!( codes.group(70), "Cargo");
    assert_eq!( codes.group(37), "Pleasure Craft");

    assert!( matches!( VesselTypeTable::load("resources/no-such-file.txt"), Err(OdinAisError::IOError(_))));
}

#[test]
fn test_config_resource () {
    let config = AisConfig::load("configs/ais.ron").unwrap();
    println!("{config:?}");
    assert_eq!( config.sweep_interval, Duration::from_secs(10));
    assert_eq!( config.max_age, Duration::from_secs(15*60));
    assert_eq!( config.reconnect.initial_delay, Duration::from_millis(500));
    assert_eq!( config.reconnect.max_attempts, None);
    assert_eq!( config.bounding_box.corners(), [[40.8, -74.06], [40.7, -73.98]]);
    assert_eq!( config.message_types.len(), 4);
}

#[test]
fn test_partial_config () {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ais.ron");
    fs::write( &path, r#"AisConfig( ws_uri: "ws://localhost:9000", data_dir: None, max_age: "5m", reconnect: ( max_attempts: Some(3) ) )"#).unwrap();

    let config = AisConfig::load( &path).unwrap();
    assert_eq!( config.ws_uri, "ws://localhost:9000");
    assert_eq!( config.data_dir, None);
    assert_eq!( config.max_age, Duration::from_secs(300));
    assert_eq!( config.sweep_interval, Duration::from_secs(10)); // default
    assert_eq!( config.reconnect.max_attempts, Some(3));
    assert_eq!( config.reconnect.backoff_factor, 2.0);

    let sub = config.with_api_key("xyz").subscribe_msg();
    assert_eq!( sub.api_key, "xyz");
    let json = serde_json::to_string( &sub).unwrap();
    assert!( json.contains(r#""APIKey":"xyz""#));
    assert!( json.contains(r#""BoundingBoxes":[[[40.8,-74.06],[40.7,-73.98]]]"#));
}

#[test]
fn test_malformed_config () {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.ron");
    fs::write( &path, "AisConfig( sweep_interval: 10 ").unwrap();
    assert!( matches!( AisConfig::load( &path), Err(OdinAisError::ConfigError(_))));
}
