//! Error handling for Pedalboard
//!
//! Every error is raised at construction or configuration time. The per-buffer
//! hot path (`process`, `get_signal`, `Pipeline::run`) never fails.

use thiserror::Error;

/// Result type alias for Pedalboard operations
pub type Result<T> = std::result::Result<T, PedalboardError>;

/// Main error type for Pedalboard operations
#[derive(Error, Debug)]
pub enum PedalboardError {
    // Parameter Errors
    #[error("Invalid parameter {param}: {value} (expected {expected})")]
    InvalidParameter {
        param: String,
        value: String,
        expected: String,
    },

    #[error("Unsupported filter type: {name}")]
    UnsupportedFilterType { name: String },

    #[error("Unsupported waveform: {name}")]
    UnsupportedWaveform { name: String },

    // Format Errors
    #[error("Unsupported bit depth: {bit_depth} (expected 16, 32 or 64)")]
    UnsupportedBitDepth { bit_depth: u16 },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Signal format mismatch: pipeline is {expected}, module was built for {actual}")]
    FormatMismatch { expected: String, actual: String },

    // Audio Data Errors
    #[error("Invalid audio data: {reason}")]
    InvalidAudio { reason: String },

    #[error("Audio contains no samples")]
    EmptyAudio,

    // Chain Errors
    #[error("Effect not found: {effect_id}")]
    EffectNotFound { effect_id: String },

    // Configuration Errors
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV decoding error: {0}")]
    Wav(#[from] hound::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PedalboardError {
    /// Shorthand for an [`PedalboardError::InvalidParameter`]
    pub fn invalid_parameter(
        param: impl Into<String>,
        value: impl ToString,
        expected: impl Into<String>,
    ) -> Self {
        PedalboardError::InvalidParameter {
            param: param.into(),
            value: value.to_string(),
            expected: expected.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            PedalboardError::InvalidParameter { .. } => "INVALID_PARAMETER",
            PedalboardError::UnsupportedFilterType { .. } => "UNSUPPORTED_FILTER_TYPE",
            PedalboardError::UnsupportedWaveform { .. } => "UNSUPPORTED_WAVEFORM",
            PedalboardError::UnsupportedBitDepth { .. } => "UNSUPPORTED_BIT_DEPTH",
            PedalboardError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            PedalboardError::FormatMismatch { .. } => "FORMAT_MISMATCH",
            PedalboardError::InvalidAudio { .. } => "INVALID_AUDIO",
            PedalboardError::EmptyAudio => "EMPTY_AUDIO",
            PedalboardError::EffectNotFound { .. } => "EFFECT_NOT_FOUND",
            PedalboardError::InvalidConfig { .. } => "INVALID_CONFIG",
            PedalboardError::Io(_) => "IO_ERROR",
            PedalboardError::Wav(_) => "WAV_ERROR",
            PedalboardError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable by changing the configuration
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PedalboardError::InvalidParameter { .. }
                | PedalboardError::UnsupportedFilterType { .. }
                | PedalboardError::UnsupportedWaveform { .. }
                | PedalboardError::UnsupportedBitDepth { .. }
                | PedalboardError::FormatMismatch { .. }
                | PedalboardError::EffectNotFound { .. }
                | PedalboardError::InvalidConfig { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            PedalboardError::InvalidParameter { .. } => vec![
                "Check the parameter against its documented range",
                "Remove the parameter to fall back to its default",
            ],
            PedalboardError::UnsupportedFilterType { .. } => vec![
                "Supported filter types: low_pass, high_pass, band_pass, low_shelf, high_shelf",
            ],
            PedalboardError::UnsupportedWaveform { .. } => {
                vec!["Supported waveforms: sine, triangle, square, sawtooth"]
            }
            PedalboardError::UnsupportedBitDepth { .. } => vec![
                "Use a 16-bit or 32-bit output format",
                "Convert 64-bit float sources before playback",
            ],
            PedalboardError::UnsupportedFormat { .. } => vec![
                "Convert the file to 16-bit or 32-bit WAV",
                "Only mono and stereo audio is supported",
            ],
            PedalboardError::FormatMismatch { .. } => vec![
                "Build every module with the pipeline's signal format",
                "Use Pipeline::format() when constructing modules",
            ],
            PedalboardError::InvalidAudio { .. } | PedalboardError::EmptyAudio => vec![
                "Check if the file plays in another application",
                "The file may be corrupted - try re-exporting from source",
            ],
            PedalboardError::EffectNotFound { .. } => {
                vec!["List the chain to find valid effect ids"]
            }
            PedalboardError::InvalidConfig { .. } | PedalboardError::Serialization(_) => vec![
                "Validate the configuration file as JSON",
                "Every module entry needs a \"type\" field",
            ],
            _ => vec![],
        }
    }
}
