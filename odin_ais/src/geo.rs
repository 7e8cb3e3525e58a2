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

use serde::{Serialize,Deserialize};
use crate::vector::Vec2;

/// meters per degree latitude
pub const LAT_METERS_PER_DEGREE: f64 = 111_049.0;

/// meters per degree longitude. This depends on latitude - the default is for ~40.7°N
pub const LON_METERS_PER_DEGREE: f64 = 84_465.0;

/// a geographic rectangle given as upper-left and lower-right `[lat,lon]` corners (the
/// format the AIS stream subscription uses)
#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq)]
pub struct GeoBox(pub [[f64;2];2]);

impl GeoBox {
    pub fn new (ul_lat: f64, ul_lon: f64, lr_lat: f64, lr_lon: f64)->Self {
        GeoBox( [[ul_lat,ul_lon],[lr_lat,lr_lon]] )
    }

    /// (lat,lon) of the box center
    pub fn center (&self)->(f64,f64) {
        let [[lat0,lon0],[lat1,lon1]] = self.0;
        ( (lat0 + lat1) / 2.0, (lon0 + lon1) / 2.0 )
    }

    pub fn corners (&self)->[[f64;2];2] { self.0 }
}

impl Default for GeoBox {
    fn default()->Self { GeoBox::new( 40.8, -74.06, 40.7, -73.98) } // New York harbor
}

/// equirectangular projection of lat/lon degrees onto a flat plane that is centered on a bounding box.
/// x points east and y north, both in meters. This is only accurate for small areas
#[derive(Debug,Clone,Copy)]
pub struct LocalProjection {
    center_lat: f64,
    center_lon: f64,
    lat_meters_per_degree: f64,
    lon_meters_per_degree: f64,
}

impl LocalProjection {
    pub fn new (bbox: &GeoBox, lat_meters_per_degree: f64, lon_meters_per_degree: f64)->Self {
        let (center_lat, center_lon) = bbox.center();
        LocalProjection { center_lat, center_lon, lat_meters_per_degree, lon_meters_per_degree }
    }

    pub fn to_local (&self, lat: f64, lon: f64)->Vec2 {
        Vec2::new(
            (lon - self.center_lon) * self.lon_meters_per_degree,
            (lat - self.center_lat) * self.lat_meters_per_degree
        )
    }

    /// inverse of [`Self::to_local`]
    pub fn to_lat_lon (&self, p: &Vec2)->(f64,f64) {
        ( self.center_lat + p.y / self.lat_meters_per_degree, self.center_lon + p.x / self.lon_meters_per_degree )
    }
}

impl Default for LocalProjection {
    fn default()->Self { LocalProjection::new( &GeoBox::default(), LAT_METERS_PER_DEGREE, LON_METERS_PER_DEGREE) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection () {
        let proj = LocalProjection::default();
        let (lat,lon) = GeoBox::default().center();
        assert!( (lat - 40.75).abs() < 1e-9 && (lon + 74.02).abs() < 1e-9);

        let p = proj.to_local( lat, lon);
        assert!( p.magnitude() < 1e-6);

        let p = proj.to_local( lat + 0.01, lon - 0.01);
        assert!( (p.y - 1110.49).abs() < 1e-6);
        assert!( (p.x + 844.65).abs() < 1e-6);

        let (lat1,lon1) = proj.to_lat_lon( &p);
        assert!( (lat1 - (lat + 0.01)).abs() < 1e-9 && (lon1 - (lon - 0.01)).abs() < 1e-9);
    }
}
