//! Signal Sources
//!
//! Producers of one buffer of float samples per call. The set of sources is
//! closed (`File`, `Oscillator`), so the pipeline holds a [`Source`] enum and
//! dispatches with a match.

mod file;
mod oscillator;

pub use file::FileSource;
pub use oscillator::{Oscillator, OscillatorConfig, WaveTable, Waveform, DEFAULT_TABLE_SIZE};

use crate::engine::{AudioBuffer, SignalFormat};

/// Contract shared by every signal source
///
/// Implementations never block and never fail: past end-of-data they produce
/// full-size silent buffers.
pub trait SignalSource {
    /// Format of the produced stream (constant for the source's lifetime)
    fn signal_info(&self) -> SignalFormat;

    /// Overwrite `buffer` with the next block of frames
    ///
    /// `buffer` must have the shape given by `signal_info()`.
    fn read_into(&mut self, buffer: &mut AudioBuffer);

    /// Return the source to its initial position
    fn reset(&mut self);

    /// Produce the next buffer in a freshly allocated `AudioBuffer`
    fn get_signal(&mut self) -> AudioBuffer {
        let info = self.signal_info();
        let mut buffer = AudioBuffer::new(info.buffer_size(), info.channels());
        self.read_into(&mut buffer);
        buffer
    }
}

/// Closed set of sources a pipeline can own
#[derive(Debug, Clone)]
pub enum Source {
    /// Pre-loaded audio data
    File(FileSource),
    /// Table-lookup waveform synthesis
    Oscillator(Oscillator),
}

impl SignalSource for Source {
    fn signal_info(&self) -> SignalFormat {
        match self {
            Source::File(s) => s.signal_info(),
            Source::Oscillator(s) => s.signal_info(),
        }
    }

    fn read_into(&mut self, buffer: &mut AudioBuffer) {
        match self {
            Source::File(s) => s.read_into(buffer),
            Source::Oscillator(s) => s.read_into(buffer),
        }
    }

    fn reset(&mut self) {
        match self {
            Source::File(s) => s.reset(),
            Source::Oscillator(s) => s.reset(),
        }
    }
}

impl From<FileSource> for Source {
    fn from(source: FileSource) -> Self {
        Source::File(source)
    }
}

impl From<Oscillator> for Source {
    fn from(source: Oscillator) -> Self {
        Source::Oscillator(source)
    }
}
