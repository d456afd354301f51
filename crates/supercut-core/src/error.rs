//! Error types for the fallible edges of the editor core
//!
//! The interactive core (marker store, gestures, zoom, playback, detection)
//! never fails: it clamps or no-ops. Errors only surface where text or files
//! enter the system: typed timecodes, waveform peak payloads and project files.

use thiserror::Error;

/// Errors produced while parsing an `HH:MM:SS:FF` timecode
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimecodeError {
    /// The string did not split into exactly four colon-delimited fields
    #[error("Timecode must have 4 fields (HH:MM:SS:FF), found {0}")]
    FieldCount(usize),

    /// A field was not a non-negative integer
    #[error("Invalid timecode field '{0}'")]
    InvalidField(String),
}

/// Result type for timecode parsing
pub type TimecodeResult<T> = Result<T, TimecodeError>;

/// Errors produced while decoding a waveform peaks payload
#[derive(Error, Debug)]
pub enum PeaksError {
    /// Payload was not valid JSON or did not match the expected shape
    #[error("Failed to parse peaks JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Payload parsed but carried no samples
    #[error("Peaks payload contains no data")]
    MissingData,

    /// Bit depth outside the supported range
    #[error("Unsupported peaks bit depth: {0} (expected 1-32)")]
    InvalidBits(u32),
}

/// Result type for peaks decoding
pub type PeaksResult<T> = Result<T, PeaksError>;

/// Errors produced while importing or exporting a marker project
#[derive(Error, Debug)]
pub enum ProjectError {
    /// Reading or writing the project file failed
    #[error("Project file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Project JSON was malformed
    #[error("Failed to parse project JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Frame rate missing, zero or not finite
    #[error("Invalid project frame rate: {0}")]
    InvalidFrameRate(f64),

    /// A clip whose end frame does not come after its start frame
    #[error("Clip {id} has invalid bounds: start={start}, end={end}")]
    InvalidClip { id: String, start: i64, end: i64 },
}

/// Result type for project import/export
pub type ProjectResult<T> = Result<T, ProjectError>;
