//! Transport abstraction over the WebSocket.
//!
//! The client core only sees [`FrameSink`] and [`FrameSource`]; the real
//! WebSocket lives in [`connection`], and tests substitute in-memory
//! channels via [`channel`]. Connection lifecycle is tracked in a shared
//! [`LinkState`] so the reader task, the call pipeline, and `close()` all
//! agree on what the socket is currently doing.

pub mod connection;
pub mod reader;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use tokio::sync::mpsc;

/// A frame the driver cares about. Everything else (pongs, continuation
/// frames) is handled inside the transport and never surfaces here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A complete text payload
    Text(String),
    /// A ping that must be answered with a pong carrying the same payload
    Ping(Vec<u8>),
}

/// Transport-level error types
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connect failed: {0}")]
    Connect(String),
    #[error("send failed: {0}")]
    Send(String),
    #[error("receive failed: {0}")]
    Receive(String),
    #[error("transport closed")]
    Closed,
}

/// Write half of the transport, shared across tasks.
#[async_trait]
pub trait FrameSink: Send + Sync {
    /// Send one text frame
    async fn send_text(&self, text: String) -> Result<(), TransportError>;
    /// Answer a ping
    async fn send_pong(&self, payload: Vec<u8>) -> Result<(), TransportError>;
    /// Start the close handshake
    async fn close(&self) -> Result<(), TransportError>;
}

/// Read half of the transport, owned by the reader task.
#[async_trait]
pub trait FrameSource: Send {
    /// Next frame. `Ok(None)` means the peer closed cleanly.
    async fn next_frame(&mut self) -> Result<Option<Frame>, TransportError>;
}

/// Connection lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    /// Handshake in progress
    Connecting = 0,
    /// Calls may be issued
    Open = 1,
    /// Close initiated, in-flight calls draining
    Closing = 2,
    /// Terminal
    Closed = 3,
}

impl ConnectionState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => ConnectionState::Connecting,
            1 => ConnectionState::Open,
            2 => ConnectionState::Closing,
            _ => ConnectionState::Closed,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closing => "closing",
            ConnectionState::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Shared connection status, updated by the reader task and `close()`.
pub struct LinkState {
    state: AtomicU8,
    /// First transport failure observed; later failures are ignored
    failure: RwLock<Option<String>>,
}

impl LinkState {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(ConnectionState::Connecting as u8),
            failure: RwLock::new(None),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Force a state. Used for the Connecting → Open and → Closed edges.
    pub fn set(&self, next: ConnectionState) {
        self.state.store(next as u8, Ordering::Release);
    }

    /// Move Open → Closing. Returns false if the connection was not open,
    /// which makes a second `close()` a no-op.
    pub fn begin_close(&self) -> bool {
        self.state
            .compare_exchange(
                ConnectionState::Open as u8,
                ConnectionState::Closing as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Record why the transport died. Only the first reason is kept.
    pub fn record_failure(&self, message: impl Into<String>) {
        let mut slot = self.failure.write();
        if slot.is_none() {
            *slot = Some(message.into());
        }
    }

    /// The recorded transport failure, if any.
    pub fn failure(&self) -> Option<String> {
        self.failure.read().clone()
    }
}

impl Default for LinkState {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory transport for testing
pub mod channel {
    use super::*;

    pub struct ChannelSink {
        pub frames: mpsc::Sender<String>,
        pub pongs: mpsc::Sender<Vec<u8>>,
    }

    pub struct ChannelSource(pub mpsc::Receiver<Result<Frame, TransportError>>);

    #[async_trait]
    impl FrameSink for ChannelSink {
        async fn send_text(&self, text: String) -> Result<(), TransportError> {
            self.frames
                .send(text)
                .await
                .map_err(|_| TransportError::Closed)
        }

        async fn send_pong(&self, payload: Vec<u8>) -> Result<(), TransportError> {
            self.pongs
                .send(payload)
                .await
                .map_err(|_| TransportError::Closed)
        }

        async fn close(&self) -> Result<(), TransportError> {
            Ok(())
        }
    }

    #[async_trait]
    impl FrameSource for ChannelSource {
        async fn next_frame(&mut self) -> Result<Option<Frame>, TransportError> {
            match self.0.recv().await {
                Some(Ok(frame)) => Ok(Some(frame)),
                Some(Err(e)) => Err(e),
                None => Ok(None),
            }
        }
    }

    /// The far end of a test transport: observe frames the client sent,
    /// inject frames for the client to read.
    pub struct TransportProbe {
        /// Text frames the client wrote
        pub sent: mpsc::Receiver<String>,
        /// Feed of frames (or errors) for the client's reader
        pub inbound: mpsc::Sender<Result<Frame, TransportError>>,
        /// Pongs the client wrote in response to pings
        pub pongs: mpsc::Receiver<Vec<u8>>,
    }

    /// Create a paired in-memory transport
    pub fn create_test_transport(buffer: usize) -> (ChannelSink, ChannelSource, TransportProbe) {
        let (frame_tx, frame_rx) = mpsc::channel(buffer);
        let (pong_tx, pong_rx) = mpsc::channel(buffer);
        let (inbound_tx, inbound_rx) = mpsc::channel(buffer);

        let sink = ChannelSink {
            frames: frame_tx,
            pongs: pong_tx,
        };
        let source = ChannelSource(inbound_rx);
        let probe = TransportProbe {
            sent: frame_rx,
            inbound: inbound_tx,
            pongs: pong_rx,
        };

        (sink, source, probe)
    }
}
