//! Server identity disclosed to clients.

use std::ffi::OsString;
use std::fmt;
use std::io;

/// The serving host, or the reason it could not be determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Hostname lookup succeeded.
    Known(String),
    /// Hostname lookup failed; holds the error description.
    Unknown(String),
}

impl Identity {
    /// Look up the local hostname. Never fails.
    pub fn lookup() -> Self {
        Self::from_lookup(hostname::get())
    }

    /// Build an identity from a hostname lookup result.
    pub fn from_lookup(result: io::Result<OsString>) -> Self {
        match result {
            Ok(name) => Identity::Known(name.to_string_lossy().into_owned()),
            Err(e) => {
                tracing::warn!(error = %e, "Hostname lookup failed");
                Identity::Unknown(e.to_string())
            }
        }
    }

    /// The hostname, when known.
    pub fn hostname(&self) -> Option<&str> {
        match self {
            Identity::Known(name) => Some(name),
            Identity::Unknown(_) => None,
        }
    }

    /// One-line banner sent ahead of echoed content.
    pub fn banner(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Known(name) => write!(f, "Request served by {}", name),
            Identity::Unknown(err) => write!(f, "Server hostname unknown: {}", err),
        }
    }
}
