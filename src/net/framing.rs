//! # Framing
//!
//! Cuts the raw byte stream of one connection into command tokens.

use crate::TokenMode;
use log::warn;

/// Per-connection tokenizer holding bytes that have not formed a token yet.
#[derive(Debug, Clone)]
pub struct CommandFramer {
    mode: TokenMode,
    max_residual_bytes: usize,
    residual: Vec<u8>,
    /// Set after an overflow; bytes are skipped until the next delimiter.
    discarding: bool,
}

impl CommandFramer {
    pub fn new(mode: TokenMode, max_residual_bytes: usize) -> Self {
        Self {
            mode,
            max_residual_bytes,
            residual: Vec::new(),
            discarding: false,
        }
    }

    pub fn mode(&self) -> TokenMode {
        self.mode
    }

    /// Bytes currently carried over to the next read.
    pub fn residual_len(&self) -> usize {
        self.residual.len()
    }

    /// Feeds one read chunk and returns the complete, trimmed, non-empty
    /// tokens it produced, in arrival order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        match self.mode {
            TokenMode::WholeChunk => {
                let token = String::from_utf8_lossy(chunk).trim().to_string();
                if token.is_empty() {
                    Vec::new()
                } else {
                    vec![token]
                }
            }
            TokenMode::Delimited => self.push_delimited(chunk),
        }
    }

    fn push_delimited(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut rest = chunk;

        if self.discarding {
            match rest.iter().position(u8::is_ascii_whitespace) {
                Some(pos) => {
                    self.discarding = false;
                    rest = &rest[pos..];
                }
                None => return tokens,
            }
        }

        self.residual.extend_from_slice(rest);

        if let Some(last) = self.residual.iter().rposition(u8::is_ascii_whitespace) {
            let tail = self.residual.split_off(last + 1);
            tokens.extend(
                self.residual
                    .split(u8::is_ascii_whitespace)
                    .filter(|piece| !piece.is_empty())
                    .map(|piece| String::from_utf8_lossy(piece).into_owned()),
            );
            self.residual = tail;
        }

        if self.residual.len() > self.max_residual_bytes {
            warn!(
                "Dropping {} bytes of undelimited input (limit {})",
                self.residual.len(),
                self.max_residual_bytes
            );
            self.residual.clear();
            self.discarding = true;
        }

        tokens
    }

    /// Flushes the residual at end of stream as a final token.
    pub fn finish(&mut self) -> Option<String> {
        let residual = std::mem::take(&mut self.residual);
        let discarding = std::mem::replace(&mut self.discarding, false);
        if discarding {
            return None;
        }
        let token = String::from_utf8_lossy(&residual).trim().to_string();
        (!token.is_empty()).then_some(token)
    }
}
