//! WebSocket client for the exchange depth stream
//!
//! Handles connection, TLS policy, and message reception for a single
//! stream URL.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async, connect_async_tls_with_config,
    tungstenite::protocol::Message,
    Connector, MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, error, info, warn};

use crate::error::{CaptureError, Result};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Outcome of one receive call
///
/// A clean, peer-initiated close is not a transport error; only protocol
/// failures surface as `Err` from [`WebSocketClient::recv`].
#[derive(Debug)]
pub enum Received {
    /// A data frame carrying feed text
    Text(String),
    /// A protocol frame (ping/pong/raw) that needed no caller action
    Control,
    /// The peer closed the connection, with the close reason when sent
    Closed(Option<String>),
}

/// WebSocket client for a single connection
pub struct WebSocketClient {
    stream: Option<WsStream>,
    url: String,
    verify_tls_certs: bool,
}

impl WebSocketClient {
    /// Create a new WebSocket client
    pub fn new(url: String, verify_tls_certs: bool) -> Self {
        Self {
            stream: None,
            url,
            verify_tls_certs,
        }
    }

    /// Connect to the stream endpoint
    pub async fn connect(&mut self) -> Result<()> {
        info!(url = %self.url, "Connecting to exchange WebSocket");

        let (ws_stream, response) = if self.verify_tls_certs {
            connect_async(&self.url).await.map_err(|e| {
                CaptureError::WebSocketConnection(format!("Failed to connect: {}", e))
            })?
        } else {
            let tls = native_tls::TlsConnector::builder()
                .danger_accept_invalid_certs(true)
                .build()?;
            connect_async_tls_with_config(&self.url, None, false, Some(Connector::NativeTls(tls)))
                .await
                .map_err(|e| {
                    CaptureError::WebSocketConnection(format!("Failed to connect: {}", e))
                })?
        };

        info!(status = ?response.status(), "WebSocket connected");
        self.stream = Some(ws_stream);

        Ok(())
    }

    /// Receive the next frame
    ///
    /// A close frame or a drained stream clears the connection and returns
    /// [`Received::Closed`]; transport errors clear it and return `Err`.
    pub async fn recv(&mut self) -> Result<Received> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| CaptureError::WebSocketConnection("Not connected".to_string()))?;

        match stream.next().await {
            Some(Ok(Message::Text(text))) => {
                debug!(len = text.len(), "Received text message");
                Ok(Received::Text(text))
            }
            Some(Ok(Message::Binary(data))) => {
                Ok(Received::Text(String::from_utf8_lossy(&data).to_string()))
            }
            Some(Ok(Message::Ping(data))) => {
                debug!("Received ping, sending pong");
                if let Some(stream) = self.stream.as_mut() {
                    let _ = stream.send(Message::Pong(data)).await;
                }
                Ok(Received::Control)
            }
            Some(Ok(Message::Pong(_))) => Ok(Received::Control),
            Some(Ok(Message::Frame(_))) => Ok(Received::Control),
            Some(Ok(Message::Close(frame))) => {
                self.stream = None;
                let reason = frame.map(|f| format!("{} {}", f.code, f.reason));
                info!(reason = reason.as_deref().unwrap_or("none"), "Received close frame");
                Ok(Received::Closed(reason))
            }
            Some(Err(e)) => {
                error!(error = %e, "WebSocket error");
                self.stream = None;
                Err(CaptureError::WebSocketMessage(e.to_string()))
            }
            None => {
                warn!("WebSocket stream ended");
                self.stream = None;
                Ok(Received::Closed(None))
            }
        }
    }

    /// Send a close frame and drop the connection, if one is still up
    ///
    /// After `recv` reported a close or an error there is nothing left to
    /// do here; this matters when the session ends for a non-transport
    /// reason while the socket is still healthy.
    pub async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.close(None).await;
        }
    }
}
