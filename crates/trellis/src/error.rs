//! Error and fault types for the layout crate.

use std::path::PathBuf;

use thiserror::Error;
use trellis_core::ViewId;

/// Programmer errors detected by surfaces and containers.
///
/// These are never returned to callers. They are passed to
/// [`trellis_core::report_fault`], which logs them and panics in debug
/// builds, then the operation degrades to a no-op or a clamped result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutFault {
    /// `configure` was called on a container that already has a measurement.
    #[error("{view}: stack view is already configured")]
    AlreadyConfigured { view: String },

    /// An arrangement was requested before `configure`.
    #[error("{view}: missing measurement")]
    MissingMeasurement { view: String },

    /// The number of arranged children and measured infos differ.
    #[error("{view}: arranged subviews ({subviews}) and subview infos ({infos}) differ in count")]
    CountMismatch {
        view: String,
        subviews: usize,
        infos: usize,
    },

    /// A child was registered twice with the same container.
    #[error("{view}: subview {child:?} was already added")]
    DuplicateSubview { view: String, child: ViewId },

    /// A child id is not registered with the container or the tree.
    #[error("{view}: unknown subview {child:?}")]
    UnknownSubview { view: String, child: ViewId },

    /// A measured size was negative or not finite.
    #[error("invalid measured size: {width} x {height}")]
    InvalidMeasuredSize { width: f32, height: f32 },

    /// Spacing was negative or not finite.
    #[error("invalid spacing: {0}")]
    InvalidSpacing(f32),
}

/// Errors loading or saving stack configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML parsing failed.
    #[error("failed to parse stack configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization failed.
    #[error("failed to serialize stack configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Reading the configuration file failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration parsed but holds values the engine rejects.
    #[error("invalid stack configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
