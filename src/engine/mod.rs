//! Audio Engine Module
//!
//! Core streaming engine including:
//! - Signal format description
//! - Audio buffer management
//! - Output sample conversion
//! - WAV decoding for the file source
//! - The pull-based pipeline

pub mod buffer;
pub mod format;
pub mod io;
pub mod output;
pub mod pipeline;

pub use buffer::{db_to_linear, linear_to_db, AudioBuffer};
pub use format::{SignalFormat, DEFAULT_BUFFER_SIZE, SUPPORTED_BIT_DEPTHS};
pub use io::{decode_wav, DecodedAudio, SampleData};
pub use output::OutputBuffer;
pub use pipeline::Pipeline;
