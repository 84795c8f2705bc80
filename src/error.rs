//! Error types
//!
//! Setup errors are fatal and surface at construction. Settings errors come
//! from reading or parsing a settings file.

use std::fmt;
use std::io;

/// The drawing surface could not be acquired
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// Width or height is zero
    EmptySurface { width: u32, height: u32 },
    /// Pixel count does not fit in memory addressing
    SurfaceTooLarge { width: u32, height: u32 },
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::EmptySurface { width, height } => {
                write!(f, "Surface unavailable: {}x{} has no pixels", width, height)
            }
            SetupError::SurfaceTooLarge { width, height } => {
                write!(f, "Surface unavailable: {}x{} is too large", width, height)
            }
        }
    }
}

impl std::error::Error for SetupError {}

/// Settings could not be loaded
#[derive(Debug)]
pub enum SettingsError {
    /// File could not be read
    Io(io::Error),
    /// JSON was malformed or had the wrong shape
    Parse(serde_json::Error),
    /// Values parsed but are out of range
    Invalid(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(err) => write!(f, "Settings IO error: {}", err),
            SettingsError::Parse(err) => write!(f, "Settings parse error: {}", err),
            SettingsError::Invalid(msg) => write!(f, "Invalid settings: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(err) => Some(err),
            SettingsError::Parse(err) => Some(err),
            SettingsError::Invalid(_) => None,
        }
    }
}

impl From<io::Error> for SettingsError {
    fn from(err: io::Error) -> Self {
        SettingsError::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Parse(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_error_display() {
        let err = SetupError::EmptySurface { width: 0, height: 600 };
        let msg = format!("{}", err);
        assert!(msg.contains("0x600"));
        assert!(msg.contains("unavailable"));
    }

    #[test]
    fn test_settings_error_source() {
        use std::error::Error;

        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err = SettingsError::from(io_err);
        assert!(err.source().is_some());
        assert!(format!("{}", err).contains("missing"));

        let err = SettingsError::Invalid("levels".to_string());
        assert!(err.source().is_none());
    }
}
