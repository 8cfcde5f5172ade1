//! WebSocket transport backed by tokio-tungstenite.

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

use super::{Frame, FrameSink, FrameSource, TransportError};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Write half of the socket. The reader task (pongs) and the call pipeline
/// (request frames) both send through this, so the sink lives behind an
/// async mutex.
pub struct WsSink {
    writer: Mutex<SplitSink<WsStream, Message>>,
}

/// Read half of the socket, owned by the reader task.
pub struct WsSource {
    reader: SplitStream<WsStream>,
}

/// Perform the WebSocket handshake within the connect timeout.
pub(crate) async fn open(
    endpoint: &str,
    connect_timeout: Duration,
) -> Result<(WsSink, WsSource), TransportError> {
    let handshake = tokio::time::timeout(connect_timeout, connect_async(endpoint))
        .await
        .map_err(|_| {
            TransportError::Connect(format!("handshake timed out after {connect_timeout:?}"))
        })?;

    let (stream, _) = handshake.map_err(|e| TransportError::Connect(e.to_string()))?;
    debug!(endpoint, "websocket handshake complete");

    let (write, read) = stream.split();
    Ok((
        WsSink {
            writer: Mutex::new(write),
        },
        WsSource { reader: read },
    ))
}

#[async_trait]
impl FrameSink for WsSink {
    async fn send_text(&self, text: String) -> Result<(), TransportError> {
        let mut writer = self.writer.lock().await;
        writer
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }

    async fn send_pong(&self, payload: Vec<u8>) -> Result<(), TransportError> {
        let mut writer = self.writer.lock().await;
        writer
            .send(Message::Pong(payload.into()))
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }

    async fn close(&self) -> Result<(), TransportError> {
        let frame = CloseFrame {
            code: CloseCode::Normal,
            reason: "".into(),
        };
        let mut writer = self.writer.lock().await;
        writer
            .send(Message::Close(Some(frame)))
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }
}

#[async_trait]
impl FrameSource for WsSource {
    async fn next_frame(&mut self) -> Result<Option<Frame>, TransportError> {
        while let Some(message) = self.reader.next().await {
            match message {
                Ok(Message::Text(text)) => return Ok(Some(Frame::Text(text.to_string()))),
                // Servers may answer in binary mode; the payload is still JSON
                Ok(Message::Binary(raw)) => match String::from_utf8(raw.to_vec()) {
                    Ok(text) => return Ok(Some(Frame::Text(text))),
                    Err(_) => {
                        debug!("skipping non-utf8 binary frame");
                        continue;
                    }
                },
                Ok(Message::Ping(data)) => return Ok(Some(Frame::Ping(data.to_vec()))),
                Ok(Message::Close(_)) => return Ok(None),
                // Pong and raw frames are transport noise
                Ok(_) => continue,
                Err(e) => return Err(TransportError::Receive(e.to_string())),
            }
        }
        Ok(None)
    }
}
