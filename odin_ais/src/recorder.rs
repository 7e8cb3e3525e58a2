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

use std::{collections::HashMap, fs::{self,File,OpenOptions}, io::{BufWriter,Write}, path::{Path,PathBuf}};
use chrono::{DateTime,Utc};
use tracing::{debug,info,warn};
use crate::{ais::AisMessage, errors::{OdinAisError,Result}};

/// sink for raw (decoded) AIS messages. Recording is fire-and-forget from the perspective of the
/// stream client, i.e. failures are logged but do not affect message processing
pub trait MessageRecorder: Send + Sync {
    fn record (&mut self, message_type: &str, json: &str)->Result<()>;

    /// flush and close all open sinks
    fn close (&mut self)->Result<()>;
}

/// recorder that drops everything
pub struct NullRecorder;

impl MessageRecorder for NullRecorder {
    fn record (&mut self, _message_type: &str, _json: &str)->Result<()> { Ok(()) }
    fn close (&mut self)->Result<()> { Ok(()) }
}

/// append-only recorder with one newline-delimited JSON file per message type (`<data_dir>/<message_type>.json`).
/// Files are opened on first use of a message type and flushed after every record. They are closed
/// when the recorder is closed or dropped
pub struct FileRecorder {
    data_dir: PathBuf,
    sinks: HashMap<String,BufWriter<File>>,
}

impl FileRecorder {
    pub fn new (data_dir: impl AsRef<Path>)->Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        if !data_dir.is_dir() {
            fs::create_dir_all( &data_dir)?;
        }
        info!("recording raw AIS data to {data_dir:?}");
        Ok( FileRecorder { data_dir, sinks: HashMap::new() } )
    }

    pub fn data_dir (&self)->&Path { &self.data_dir }

    pub fn path_for (&self, message_type: &str)->PathBuf {
        let name: String = message_type.chars()
            .map( |c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.data_dir.join( format!("{name}.json"))
    }

    pub fn num_open (&self)->usize { self.sinks.len() }

    fn sink_for (&mut self, message_type: &str)->Result<&mut BufWriter<File>> {
        if !self.sinks.contains_key( message_type) {
            let path = self.path_for( message_type);
            let file = OpenOptions::new().create(true).append(true).open( &path)
                .map_err(|e| OdinAisError::IOError( format!("failed to open {path:?}: {e}")))?;
            debug!("opened recorder sink {path:?}");
            self.sinks.insert( message_type.to_string(), BufWriter::new(file));
        }
        self.sinks.get_mut( message_type).ok_or_else(|| OdinAisError::OpFailed( format!("no sink for {message_type}")))
    }
}

impl MessageRecorder for FileRecorder {
    fn record (&mut self, message_type: &str, json: &str)->Result<()> {
        let w = self.sink_for( message_type)?;
        w.write_all( json.as_bytes())?;
        w.write_all( b"\n")?;
        w.flush()?;
        Ok(())
    }

    fn close (&mut self)->Result<()> {
        let mut res = Ok(());
        for (message_type, mut w) in self.sinks.drain() {
            if let Err(e) = w.flush() {
                warn!("failed to flush recorder sink for {message_type}: {e}");
                res = Err( e.into());
            }
        }
        res
    }
}

impl Drop for FileRecorder {
    fn drop (&mut self) {
        let _ = self.close();
    }
}

/* #region replay ***************************************************************************************/

/// read the frames of recorded message files and return them ordered by their `time_utc`. Lines
/// without a parsable timestamp stay in file order before all timestamped ones, so that they
/// still get reported as bad frames when processed
pub fn load_recorded<P: AsRef<Path>> (paths: &[P])->Result<Vec<String>> {
    let mut frames: Vec<(Option<DateTime<Utc>>,String)> = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let src = fs::read_to_string( path)
            .map_err(|e| OdinAisError::IOError( format!("failed to read {path:?}: {e}")))?;
        let n0 = frames.len();
        for line in src.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let t = AisMessage::from_json( line).and_then( |msg| msg.timestamp()).ok();
            frames.push( (t, line.to_string()) );
        }
        info!("read {} recorded frames from {path:?}", frames.len() - n0);
    }

    frames.sort_by_key( |(t,_)| *t); // stable, None < Some
    Ok( frames.into_iter().map( |(_,line)| line).collect() )
}

/* #endregion replay */
