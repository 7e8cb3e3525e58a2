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

use std::time::Duration;
use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::{Serializer,Deserialize,Deserializer};
use parse_duration::parse;
use crate::errors::{OdinAisError,Result};

#[inline] pub fn millis (n: u64)->Duration { Duration::from_millis(n) }
#[inline] pub fn secs (n: u64)->Duration { Duration::from_secs(n) }
#[inline] pub fn minutes (n: u64)->Duration { Duration::from_secs(n * 60) }

/// fractional seconds between two instants (negative if `later` is before `earlier`)
pub fn secs_between (later: &DateTime<Utc>, earlier: &DateTime<Utc>)->f64 {
    let dt: TimeDelta = *later - *earlier;
    match dt.num_microseconds() {
        Some(us) => us as f64 / 1e6,
        None => dt.num_milliseconds() as f64 / 1e3
    }
}

/// parse the `time_utc` metadata of AIS stream messages.
/// The feed sends Go `time.Time` strings such as "2024-06-06 14:25:41.887286862 +0000 UTC", which
/// optionally carry a monotonic clock reading (" m=+0.00123"). We drop the zone abbreviation and
/// the monotonic part and parse the rest as an offset-qualified instant. RFC 3339 and offset-less
/// (assumed UTC) inputs are accepted as fallbacks
pub fn parse_time_utc (s: &str)->Result<DateTime<Utc>> {
    let s = match s.find(" m=") {
        Some(idx) => &s[..idx],
        None => s
    }.trim();

    let s = match s.rsplit_once(' ') {
        Some((head,zone)) if !zone.is_empty() && zone.chars().all(|c| c.is_ascii_alphabetic()) => head.trim_end(),
        _ => s
    };

    if let Ok(dt) = DateTime::parse_from_str( s, "%Y-%m-%d %H:%M:%S%.f %z") {
        return Ok( dt.with_timezone(&Utc))
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339( s) {
        return Ok( dt.with_timezone(&Utc))
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str( s, fmt) {
            return Ok( ndt.and_utc())
        }
    }

    Err( OdinAisError::TimestampError( format!("unsupported time format '{s}'")))
}

//--- support for serde

pub fn deserialize_duration <'a,D>(deserializer: D) -> std::result::Result<Duration,D::Error>
    where D: Deserializer<'a>
{
    String::deserialize(deserializer).and_then( |string| {
        parse(string.as_str())
            .map_err( |e| serde::de::Error::custom(format!("{:?}",e)))
    })
}

pub fn serialize_duration<S: Serializer> (dur: &Duration, s: S) -> std::result::Result<S::Ok, S::Error>  {
    let dfm = format!("{:?}", dur);
    s.serialize_str(&dfm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_go_time_format () {
        let dt = parse_time_utc( "2024-06-06 14:25:41.887286862 +0000 UTC").unwrap();
        assert_eq!( dt.timestamp(), 1717683941);
        assert_eq!( dt.nanosecond(), 887286862);
    }

    #[test]
    fn test_monotonic_suffix () {
        let dt = parse_time_utc( "2024-06-06 14:25:41.5 +0000 UTC m=+0.001234567").unwrap();
        assert_eq!( dt.timestamp(), 1717683941);
    }

    #[test]
    fn test_offset () {
        let dt = parse_time_utc( "2024-06-06 16:25:41 +0200 CEST").unwrap();
        assert_eq!( dt.timestamp(), 1717683941);
    }

    #[test]
    fn test_fallbacks () {
        assert_eq!( parse_time_utc( "2024-06-06T14:25:41Z").unwrap().timestamp(), 1717683941);
        assert_eq!( parse_time_utc( "2024-06-06 14:25:41.250").unwrap().timestamp(), 1717683941);
        assert!( parse_time_utc( "yesterday noon").is_err());
    }

    #[test]
    fn test_secs_between () {
        let t0 = parse_time_utc( "2024-06-06T14:25:41Z").unwrap();
        let t1 = parse_time_utc( "2024-06-06T14:25:46.5Z").unwrap();
        assert_eq!( secs_between( &t1, &t0), 5.5);
        assert_eq!( secs_between( &t0, &t1), -5.5);
    }
}
