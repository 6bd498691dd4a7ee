//! Connection session for the command listener.

use crate::{CommandFramer, ListenerConfig};
use std::io;
use std::net::SocketAddr;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use uuid::Uuid;

/// Session identifier, used to correlate log lines.
pub type SessionId = Uuid;

/// One accepted client connection.
#[derive(Debug)]
pub struct ConnectionSession {
    pub id: SessionId,
    pub peer: SocketAddr,
    stream: TcpStream,
    framer: CommandFramer,
    buf: Vec<u8>,
}

impl ConnectionSession {
    /// Wraps an accepted stream.
    pub fn new(stream: TcpStream, peer: SocketAddr, config: &ListenerConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            peer,
            stream,
            framer: CommandFramer::new(config.token_mode, config.max_residual_bytes),
            buf: vec![0; config.read_chunk_size],
        }
    }

    /// Reads one bounded chunk and returns the tokens it completed.
    ///
    /// `Ok(None)` means the peer closed the stream. Cancelling this future
    /// loses no bytes.
    pub async fn read_tokens(&mut self) -> io::Result<Option<Vec<String>>> {
        let n = self.stream.read(&mut self.buf).await?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(self.framer.push(&self.buf[..n])))
    }

    /// Flushes any partial token left when the stream ended.
    pub fn finish(&mut self) -> Option<String> {
        self.framer.finish()
    }
}
