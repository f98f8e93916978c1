// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run token: a per-run random identifier that guards against cross-run crosstalk.

use rand::Rng;
use std::fmt;

/// A per-run random hex identifier prefixed to every wire message.
///
/// Workers and relays from a foreign run present a different token and are
/// rejected with `Response::WrongRun`. This is not an authentication
/// mechanism — it only distinguishes one run of the executor from another
/// sharing the same host or network.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RunToken(String);

impl RunToken {
    /// Generate a fresh random token (16 bytes, hex-encoded).
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let bytes: [u8; 16] = rng.random();
        Self(hex_encode(&bytes))
    }

    /// Wrap an existing hex string as a token (used for `relay_token` configs
    /// that fix a known run token across hosts).
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push_str(&format!("{:02x}", b));
    }
    s
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
