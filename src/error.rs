use crate::location::Position;
use std::fmt;

/// Errors raised by structure construction and grid mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StructureError {
    /// The position lies outside the structure's dimensions.
    OutOfBounds(Position),
    /// A structure was requested with a zero or negative extent, or with more
    /// cells than can be addressed.
    InvalidDimensions { width: i32, depth: i32, height: i32 },
}

impl fmt::Display for StructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureError::OutOfBounds(pos) => write!(f, "position {} is out of bounds", pos),
            StructureError::InvalidDimensions {
                width,
                depth,
                height,
            } => write!(
                f,
                "invalid dimensions {}x{}x{}: axes must be positive with an addressable volume",
                width, depth, height
            ),
        }
    }
}

impl std::error::Error for StructureError {}

/// Errors raised while loading an evaluation config.
#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Json(e) => write!(f, "config parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Json(e) => Some(e),
        }
    }
}
