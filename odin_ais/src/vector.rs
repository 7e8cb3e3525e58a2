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

use std::{fmt, ops::{Add, Mul, Neg, Sub}};
use serde::{Serialize,Deserialize};

/// a 2D point or velocity in a local (flat) coordinate plane.
/// Note that all operations return new values, `Vec2` is never mutated in place. Units are
/// whatever the context uses (meters for positions, meters per second for velocities)
#[derive(Debug,Clone,Copy,PartialEq,Default,Serialize,Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new (x: f64, y: f64)->Vec2 {
        Vec2{x,y}
    }

    /// unit vector for given heading: x = cos(heading), y = sin(heading)
    pub fn from_heading_degrees (deg: f64)->Vec2 {
        let rad = deg.to_radians();
        Vec2 { x: rad.cos(), y: rad.sin() }
    }

    pub fn add (&self, v: &Vec2)->Vec2 {
        Vec2 { x: self.x + v.x, y: self.y + v.y }
    }

    pub fn sub (&self, v: &Vec2)->Vec2 {
        Vec2 { x: self.x - v.x, y: self.y - v.y }
    }

    pub fn scale (&self, k: f64)->Vec2 {
        Vec2 { x: self.x * k, y: self.y * k }
    }

    pub fn magnitude (&self)->f64 {
        (self.x*self.x + self.y*self.y).sqrt()
    }

    pub fn is_zero (&self)->bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// same direction with the given magnitude. The zero vector has no direction and is returned as is
    pub fn with_magnitude (&self, m: f64)->Vec2 {
        let mag = self.magnitude();
        if mag == 0.0 { *self } else { self.scale( m / mag) }
    }

    pub fn distance_to (&self, p: &Vec2)->f64 {
        self.sub(p).magnitude()
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vec2({:.1}, {:.1})", self.x, self.y)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add (self, rhs: Vec2) -> Vec2 { Vec2::add( &self, &rhs) }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub (self, rhs: Vec2) -> Vec2 { Vec2::sub( &self, &rhs) }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul (self, rhs: f64) -> Vec2 { self.scale( rhs) }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg (self) -> Vec2 { Vec2 { x: -self.x, y: -self.y } }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_zero_with_magnitude () {
        for m in [0.0, 0.5, 1.0, 42.0, -3.0] {
            assert_eq!( Vec2::ZERO.with_magnitude(m), Vec2::ZERO);
        }
    }

    #[test]
    fn test_heading_unit_length () {
        let mut h = -720.0;
        while h <= 720.0 {
            let v = Vec2::from_heading_degrees(h);
            assert!( (v.magnitude() - 1.0).abs() < EPS, "heading {h} -> {v}");
            h += 7.5;
        }
    }

    #[test]
    fn test_with_magnitude () {
        let v = Vec2::new( 3.0, 4.0);
        assert_eq!( v.magnitude(), 5.0);

        let w = v.with_magnitude( 10.0);
        assert!( (w.x - 6.0).abs() < EPS);
        assert!( (w.y - 8.0).abs() < EPS);
    }

    #[test]
    fn test_ops () {
        let a = Vec2::new( 1.0, 2.0);
        let b = Vec2::new( -3.0, 0.5);
        assert_eq!( a + b, Vec2::new( -2.0, 2.5));
        assert_eq!( a - b, Vec2::new( 4.0, 1.5));
        assert_eq!( a * 2.0, Vec2::new( 2.0, 4.0));
        assert_eq!( -a, Vec2::new( -1.0, -2.0));
        assert_eq!( (a + b) - b, a);
    }
}
