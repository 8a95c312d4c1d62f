//! Layered error definitions
//!
//! Categorized by source: config / bus / process / shutdown

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum SimError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Bus Errors =====
    /// Failed to bind or join a multicast channel
    #[error("bus error on channel {channel}: {message}")]
    Bus { channel: String, message: String },

    // ===== Process Errors =====
    /// Failed to spawn a managed process
    #[error("spawn error for '{agent}': {message}")]
    Spawn { agent: String, message: String },

    /// Error during the shutdown cascade
    #[error("shutdown error: {message}")]
    Shutdown { message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl SimError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create bus error
    pub fn bus(channel: impl std::fmt::Display, message: impl Into<String>) -> Self {
        Self::Bus {
            channel: channel.to_string(),
            message: message.into(),
        }
    }

    /// Create spawn error
    pub fn spawn(agent: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Spawn {
            agent: agent.into(),
            message: message.into(),
        }
    }

    /// Create shutdown error
    pub fn shutdown(message: impl Into<String>) -> Self {
        Self::Shutdown {
            message: message.into(),
        }
    }
}
