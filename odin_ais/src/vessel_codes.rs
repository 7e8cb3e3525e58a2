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

use std::{collections::HashMap, fs, path::Path};
use crate::errors::{OdinAisError,Result};

pub const UNKNOWN: &str = "Unknown";

#[derive(Debug,Clone,PartialEq)]
pub struct VesselType {
    pub group: String,
    pub classification: String,
}

/// read-only mapping from AIS ship type codes to (group,classification) pairs.
/// The table is read from a text file that has a header line followed by `code|group|classification`
/// lines. Lines starting with '#' are comments. Loading either succeeds as a whole or fails, we never
/// expose a partial table
#[derive(Debug,Clone,Default)]
pub struct VesselTypeTable {
    types: HashMap<u32,VesselType>
}

impl VesselTypeTable {
    pub fn load (path: impl AsRef<Path>)->Result<Self> {
        let path = path.as_ref();
        let src = fs::read_to_string(path)
            .map_err(|e| OdinAisError::IOError( format!("failed to read vessel codes {path:?}: {e}")))?;
        Self::parse( &src)
    }

    pub fn parse (src: &str)->Result<Self> {
        let mut types = HashMap::new();

        for (i,line) in src.lines().enumerate().skip(1) { // first line is the header
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') { continue }

            let fields: Vec<&str> = line.split('|').collect();
            if fields.len() != 3 {
                return Err( OdinAisError::VesselCodesError{ line: i+1, msg: format!("expected 3 fields, got {}", fields.len()) })
            }

            let code: u32 = fields[0].trim().parse()
                .map_err(|e| OdinAisError::VesselCodesError{ line: i+1, msg: format!("invalid code '{}': {e}", fields[0]) })?;
            let group = fields[1].trim().to_string();
            let classification = fields[2].trim().to_string();

            types.insert( code, VesselType{ group, classification });
        }

        Ok( VesselTypeTable{types} )
    }

    pub fn get (&self, code: u32)->Option<&VesselType> {
        self.types.get(&code)
    }

    pub fn group (&self, code: u32)->&str {
        self.types.get(&code).map( |t| t.group.as_str()).unwrap_or(UNKNOWN)
    }

    pub fn classification (&self, code: u32)->&str {
        self.types.get(&code).map( |t| t.classification.as_str()).unwrap_or(UNKNOWN)
    }

    pub fn len (&self)->usize { self.types.len() }

    pub fn is_empty (&self)->bool { self.types.is_empty() }
}
