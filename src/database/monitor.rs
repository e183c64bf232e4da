use serde::Serialize;
use std::sync::atomic::{AtomicU8, Ordering};

/// Connection state of the persistence backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum ConnectionState {
    Disconnected = 0,
    Connected = 1,
    Connecting = 2,
    Disconnecting = 3,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connected => "connected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Disconnecting => "disconnecting",
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => ConnectionState::Connected,
            2 => ConnectionState::Connecting,
            3 => ConnectionState::Disconnecting,
            _ => ConnectionState::Disconnected,
        }
    }
}

/// Lock-free holder for the current connection state.
#[derive(Debug)]
pub struct ConnectionMonitor {
    state: AtomicU8,
}

impl ConnectionMonitor {
    pub fn new(initial: ConnectionState) -> Self {
        Self {
            state: AtomicU8::new(initial as u8),
        }
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Store `next` and return the previous state.
    pub fn set(&self, next: ConnectionState) -> ConnectionState {
        let previous = ConnectionState::from_u8(self.state.swap(next as u8, Ordering::AcqRel));
        if previous != next {
            match next {
                ConnectionState::Connected => tracing::info!("Database connection state: {} -> {}", previous.as_str(), next.as_str()),
                _ => tracing::warn!("Database connection state: {} -> {}", previous.as_str(), next.as_str()),
            }
        }
        previous
    }
}
