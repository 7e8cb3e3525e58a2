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
use serde::{Serialize,Deserialize};
use crate::datetime::{deserialize_duration, serialize_duration, millis, secs};

/// reconnect policy of the stream client. Delays grow exponentially from `initial_delay` up to `max_delay`.
/// `max_attempts` limits the number of consecutive failed connection attempts (`None` retries forever).
/// The count is reset once we receive data after a subscription
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(default)]
pub struct ReconnectConfig {
    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub initial_delay: Duration,

    #[serde(deserialize_with="deserialize_duration", serialize_with="serialize_duration")]
    pub max_delay: Duration,

    pub backoff_factor: f64,
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectConfig {
    fn default()->Self {
        ReconnectConfig {
            initial_delay: millis(500),
            max_delay: secs(60),
            backoff_factor: 2.0,
            max_attempts: None,
        }
    }
}

#[derive(Debug,Clone)]
pub struct Backoff {
    config: ReconnectConfig,
    failures: u32,
    delay: Duration,
}

impl Backoff {
    pub fn new (config: ReconnectConfig)->Self {
        let delay = config.initial_delay.min( config.max_delay);
        Backoff { config, failures: 0, delay }
    }

    /// number of consecutive failures so far
    pub fn failures (&self)->u32 { self.failures }

    pub fn reset (&mut self) {
        self.failures = 0;
        self.delay = self.config.initial_delay.min( self.config.max_delay);
    }

    /// delay after a successful session ended. This does not count as failure
    pub fn session_delay (&self)->Duration {
        self.config.initial_delay.min( self.config.max_delay)
    }

    /// record a failed attempt and return how long to wait before the next one, or `None`
    /// if we have exhausted our budget
    pub fn next_delay (&mut self)->Option<Duration> {
        self.failures = self.failures.saturating_add(1);
        if let Some(max_attempts) = self.config.max_attempts {
            if self.failures >= max_attempts { return None }
        }

        let delay = self.delay;
        let factor = self.config.backoff_factor.max(1.0);
        self.delay = Duration::try_from_secs_f64( delay.as_secs_f64() * factor)
            .unwrap_or( self.config.max_delay)
            .min( self.config.max_delay);
        Some(delay)
    }
}
