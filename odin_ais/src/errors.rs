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

use thiserror::Error;

pub type Result<T> = std::result::Result<T, OdinAisError>;

/// odin_ais specific error type. We need those to be Clone (errors are reported through
/// the connection state and the sweep) hence foreign errors are mapped into opaque variants
/// that only keep the error message
#[derive(Error,Debug,Clone)]
pub enum OdinAisError {
    #[error("IO error {0}")]
    IOError(String),

    #[error("config error {0}")]
    ConfigError(String),

    #[error("JSON error {0}")]
    JsonError(String),

    #[error("websock error {0}")]
    WsError(String),

    #[error("websocket closed by server")]
    WsClosedError,

    #[error("parse error {0}")]
    ParseError(String),

    #[error("timestamp error {0}")]
    TimestampError(String),

    #[error("vessel code table error in line {line}: {msg}")]
    VesselCodesError { line: usize, msg: String },

    #[error("giving up after {0} failed connection attempts")]
    ReconnectExhausted(u32),

    /// a generic error
    #[error("operation failed {0}")]
    OpFailed(String)
}

macro_rules! map_to_opaque_error {
    ($from_error:ty => $to_error:ident :: $variant:ident) => {
        impl From<$from_error> for $to_error {
            fn from (e: $from_error)->Self { $to_error :: $variant ( e.to_string()) }
        }
    };
}

map_to_opaque_error!{ std::io::Error => OdinAisError::IOError }
map_to_opaque_error!{ serde_json::Error => OdinAisError::JsonError }
map_to_opaque_error!{ ron::error::SpannedError => OdinAisError::ConfigError }
map_to_opaque_error!{ tokio_tungstenite::tungstenite::Error => OdinAisError::WsError }
map_to_opaque_error!{ chrono::ParseError => OdinAisError::TimestampError }

pub fn op_failed (msg: impl ToString)->OdinAisError {
    OdinAisError::OpFailed(msg.to_string())
}

macro_rules! parse_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::OdinAisError::ParseError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use parse_error;
