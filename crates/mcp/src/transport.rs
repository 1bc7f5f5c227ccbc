//! Line-oriented message transports.
//!
//! `StdioTransport` is the production implementation (newline-delimited JSON
//! over stdin/stdout); `ChannelTransport` backs the in-process tests.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::error::McpError;

/// One JSON-RPC frame per line, in either direction.
#[async_trait]
pub trait McpTransport: Send + Sync {
    /// Next message line, or `None` once the peer has closed the connection.
    async fn receive(&mut self) -> Result<Option<String>, McpError>;

    /// Write one message line.
    async fn send(&mut self, message: &str) -> Result<(), McpError>;
}

/// Reads stdin, writes stdout. Logging must go to stderr when this transport
/// is in use; stdout carries only protocol frames.
pub struct StdioTransport {
    reader: BufReader<tokio::io::Stdin>,
    writer: tokio::io::Stdout,
}

impl StdioTransport {
    pub fn new() -> Self {
        Self {
            reader: BufReader::new(tokio::io::stdin()),
            writer: tokio::io::stdout(),
        }
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl McpTransport for StdioTransport {
    async fn receive(&mut self) -> Result<Option<String>, McpError> {
        loop {
            let mut line = String::new();
            let bytes_read = self.reader.read_line(&mut line).await?;
            if bytes_read == 0 {
                return Ok(None); // EOF
            }
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_string()));
            }
            // Blank line between frames, keep reading.
        }
    }

    async fn send(&mut self, message: &str) -> Result<(), McpError> {
        self.writer.write_all(message.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/// In-memory transport pair for exercising the server loop in tests.
pub struct ChannelTransport {
    rx: tokio::sync::mpsc::Receiver<String>,
    tx: tokio::sync::mpsc::Sender<String>,
}

impl ChannelTransport {
    /// Two connected ends; what one sends, the other receives.
    pub fn pair() -> (Self, Self) {
        let (tx_a, rx_b) = tokio::sync::mpsc::channel(32);
        let (tx_b, rx_a) = tokio::sync::mpsc::channel(32);
        (Self { rx: rx_a, tx: tx_a }, Self { rx: rx_b, tx: tx_b })
    }
}

#[async_trait]
impl McpTransport for ChannelTransport {
    async fn receive(&mut self) -> Result<Option<String>, McpError> {
        Ok(self.rx.recv().await)
    }

    async fn send(&mut self, message: &str) -> Result<(), McpError> {
        self.tx.send(message.to_string()).await.map_err(|e| {
            McpError::Transport(std::io::Error::new(std::io::ErrorKind::BrokenPipe, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_transport_pair() {
        let (mut a, mut b) = ChannelTransport::pair();

        a.send("ping").await.unwrap();
        assert_eq!(b.receive().await.unwrap(), Some("ping".to_string()));

        b.send("pong").await.unwrap();
        assert_eq!(a.receive().await.unwrap(), Some("pong".to_string()));
    }

    #[tokio::test]
    async fn test_channel_transport_closed() {
        let (mut a, b) = ChannelTransport::pair();
        drop(b);
        assert_eq!(a.receive().await.unwrap(), None);
    }
}
