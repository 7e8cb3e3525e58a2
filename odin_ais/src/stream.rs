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

//! the AIS stream client: connect, subscribe, decode frames and route them to the [`VesselStore`]
//! and the [`MessageRecorder`]. Transport failures lead to reconnects, frame failures are logged
//! and skipped

use std::{fmt, sync::Arc};
use futures::{SinkExt,StreamExt};
use tokio::{net::TcpStream, sync::watch, time::sleep};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream, tungstenite::protocol::Message};
use tokio_util::sync::CancellationToken;
use tracing::{debug,error,info,warn};

use crate::{
    ais::{AisMessage, AisPayload, VesselId},
    config::AisConfig,
    errors::{OdinAisError,Result},
    geo::LocalProjection,
    reconnect::Backoff,
    recorder::MessageRecorder,
    store::VesselStore
};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Subscribed,
    Streaming,
    Reconnecting,
    Closed
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt( self, f)
    }
}

/* #region frame processing *****************************************************************************/

/// what happened to a single frame
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum FrameOutcome {
    Position { vessel_id: VesselId, n_evicted: usize },
    Static { vessel_id: VesselId, inserted: bool },
    Ignored
}

#[derive(Debug,Default,Clone,Copy,PartialEq,Eq)]
pub struct FrameStats {
    pub n_frames: u64,
    pub n_positions: u64,
    pub n_static: u64,
    pub n_ignored: u64,
    pub n_failed: u64,
}

/// the synchronous part of the stream client. Frames are processed strictly in the order in which
/// they are received.
///
/// Recording runs inline on the calling task, i.e. a [`crate::recorder::FileRecorder`] does a blocking
/// write and flush per frame. That is fine for feed rates of a single subscription. Recorders that
/// might block longer have to hand off records themselves (e.g. through a channel to a blocking task)
pub struct FrameProcessor {
    store: Arc<VesselStore>,
    projection: LocalProjection,
    recorder: Box<dyn MessageRecorder>,
    stats: FrameStats,
}

impl FrameProcessor {
    pub fn new (store: Arc<VesselStore>, projection: LocalProjection, recorder: Box<dyn MessageRecorder>)->Self {
        FrameProcessor { store, projection, recorder, stats: FrameStats::default() }
    }

    pub fn store (&self)->&Arc<VesselStore> { &self.store }

    pub fn stats (&self)->FrameStats { self.stats }

    /// decode and route one frame. Every successfully decoded envelope is recorded, including
    /// the ones we don't route
    pub fn process_frame (&mut self, text: &str)->Result<FrameOutcome> {
        let msg = AisMessage::from_json( text)?;
        self.record( &msg);

        match msg.decode()? {
            AisPayload::Position(report) => {
                let observed_at = msg.timestamp()?;
                let position = self.projection.to_local( report.latitude, report.longitude);
                let n_evicted = self.store.report_position( observed_at, position, &report);
                Ok( FrameOutcome::Position { vessel_id: report.user_id, n_evicted } )
            }
            AisPayload::Static(payload) => {
                let observed_at = msg.timestamp()?;
                let inserted = self.store.report_static( observed_at, &payload);
                Ok( FrameOutcome::Static { vessel_id: payload.user_id(), inserted } )
            }
            AisPayload::Ignored => Ok( FrameOutcome::Ignored )
        }
    }

    /// process a frame, logging (instead of returning) failures. Never stops the stream
    pub fn handle_frame (&mut self, text: &str) {
        self.stats.n_frames += 1;
        match self.process_frame( text) {
            Ok(FrameOutcome::Position{..}) => self.stats.n_positions += 1,
            Ok(FrameOutcome::Static{..}) => self.stats.n_static += 1,
            Ok(FrameOutcome::Ignored) => self.stats.n_ignored += 1,
            Err(e) => {
                self.stats.n_failed += 1;
                warn!("dropping frame: {e}, raw: {text}");
            }
        }
    }

    fn record (&mut self, msg: &AisMessage) {
        match serde_json::to_string( msg) {
            Ok(json) => {
                if let Err(e) = self.recorder.record( &msg.message_type, &json) {
                    error!("failed to record {} message: {e}", msg.message_type);
                }
            }
            Err(e) => error!("failed to serialize {} message: {e}", msg.message_type)
        }
    }

    pub fn close (&mut self)->Result<()> {
        self.recorder.close()
    }
}

/* #endregion frame processing */

/* #region stream client ********************************************************************************/

enum SessionEnd {
    Shutdown,
    Dropped(String)
}

pub struct AisStreamClient {
    config: Arc<AisConfig>,
    processor: FrameProcessor,
    state_tx: watch::Sender<ConnectionState>,
}

impl AisStreamClient {
    pub fn new (config: Arc<AisConfig>, processor: FrameProcessor)->Self {
        let (state_tx, _) = watch::channel( ConnectionState::Disconnected);
        AisStreamClient { config, processor, state_tx }
    }

    /// observe connection state transitions
    pub fn state_receiver (&self)->watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    pub fn state (&self)->ConnectionState { *self.state_tx.borrow() }

    fn set_state (&self, new_state: ConnectionState) {
        let old_state = self.state_tx.send_replace( new_state);
        if old_state != new_state {
            info!("AIS stream {old_state} -> {new_state}");
        }
    }

    /// run the connect/receive loop until `cancel` is triggered or we run out of connection attempts.
    /// The websocket and the recorder are closed on all exit paths
    pub async fn run (mut self, cancel: CancellationToken)->Result<FrameStats> {
        let mut backoff = Backoff::new( self.config.reconnect.clone());

        let result = loop {
            if cancel.is_cancelled() { break Ok(()) }
            self.set_state( ConnectionState::Connecting);

            let connected = tokio::select! {
                _ = cancel.cancelled() => break Ok(()),
                res = self.connect_and_subscribe() => res
            };

            let delay = match connected {
                Ok(mut ws) => {
                    self.set_state( ConnectionState::Subscribed);

                    let end = self.read_frames( &mut ws, &cancel).await;
                    if let Err(e) = ws.close(None).await {
                        debug!("websocket close: {e}");
                    }
                    match end {
                        SessionEnd::Shutdown => break Ok(()),
                        SessionEnd::Dropped(reason) => {
                            warn!("AIS stream connection lost: {reason}");
                            if self.state() == ConnectionState::Streaming {
                                // we got data, hence the subscription was accepted
                                backoff.reset();
                                backoff.session_delay()
                            } else {
                                // closed before the first frame (e.g. rejected API key) counts as failed attempt
                                match backoff.next_delay() {
                                    Some(delay) => delay,
                                    None => break Err( OdinAisError::ReconnectExhausted( backoff.failures()))
                                }
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!("AIS stream connection attempt failed: {e}");
                    match backoff.next_delay() {
                        Some(delay) => delay,
                        None => break Err( OdinAisError::ReconnectExhausted( backoff.failures()))
                    }
                }
            };

            self.set_state( ConnectionState::Reconnecting);
            warn!("reconnecting in {delay:?} (failed attempts: {})", backoff.failures());
            tokio::select! {
                _ = cancel.cancelled() => break Ok(()),
                _ = sleep( delay) => {}
            }
        };

        if let Err(e) = self.processor.close() {
            error!("failed to close recorder: {e}");
        }
        self.set_state( ConnectionState::Closed);

        result.map( |_| self.processor.stats())
    }

    async fn connect_and_subscribe (&self)->Result<WsStream> {
        let (mut ws, _response) = connect_async( self.config.ws_uri.as_str()).await?;
        let subscribe = serde_json::to_string( &self.config.subscribe_msg())?;
        ws.send( Message::text( subscribe)).await?;
        Ok(ws)
    }

    async fn read_frames (&mut self, ws: &mut WsStream, cancel: &CancellationToken)->SessionEnd {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return SessionEnd::Shutdown,
                maybe_msg = ws.next() => {
                    match maybe_msg {
                        Some(Ok(msg)) => {
                            match msg {
                                Message::Text(text) => {
                                    self.set_streaming();
                                    self.processor.handle_frame( text.as_str())
                                }
                                Message::Binary(data) => {
                                    self.set_streaming();
                                    match std::str::from_utf8( &data) {
                                        Ok(text) => self.processor.handle_frame( text),
                                        Err(e) => warn!("dropping non UTF-8 binary frame: {e}")
                                    }
                                }
                                Message::Close(frame) => {
                                    return SessionEnd::Dropped( format!("server closed websocket: {frame:?}"))
                                }
                                _ => {} // ping/pong are answered by tungstenite
                            }
                        }
                        Some(Err(e)) => return SessionEnd::Dropped( format!("websocket read failed: {e}")),
                        None => return SessionEnd::Dropped( OdinAisError::WsClosedError.to_string())
                    }
                }
            }
        }
    }

    fn set_streaming (&self) {
        if self.state() != ConnectionState::Streaming {
            self.set_state( ConnectionState::Streaming)
        }
    }
}

/* #endregion stream client */
