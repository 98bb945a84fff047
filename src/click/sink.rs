//! Click sinks — where a [`ClickPlan`] ends up.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::PathBuf;

use tracing::info;

use super::plan::{ClickPlan, PlaybackMode};
use super::render::ClickRenderer;
use super::ClickError;

/// Consumes a click plan: plays it, stores it, or writes it out.
pub trait ClickSink {
    fn deliver(&mut self, plan: &ClickPlan) -> Result<(), ClickError>;
}

/// Renders the plan and writes it to a 16-bit mono WAV file.
pub struct WavSink {
    path: PathBuf,
    renderer: ClickRenderer,
    mode: PlaybackMode,
    bars: Option<usize>,
}

impl WavSink {
    pub fn new(path: impl Into<PathBuf>, renderer: ClickRenderer, mode: PlaybackMode) -> Self {
        Self {
            path: path.into(),
            renderer,
            mode,
            bars: None,
        }
    }

    /// Click this many bars instead of the song's length.
    pub fn with_bars(mut self, bars: usize) -> Self {
        self.bars = Some(bars);
        self
    }
}

impl ClickSink for WavSink {
    fn deliver(&mut self, plan: &ClickPlan) -> Result<(), ClickError> {
        let samples = self.renderer.render(plan, self.mode, self.bars)?;
        let file = File::create(&self.path).map_err(hound::Error::IoError)?;
        write_wav(BufWriter::new(file), &samples, self.renderer.sample_rate())?;
        info!(
            path = %self.path.display(),
            seconds = samples.len() as f64 / self.renderer.sample_rate() as f64,
            "wrote click track"
        );
        Ok(())
    }
}

/// Write mono samples as 16-bit PCM WAV to any seekable writer.
pub fn write_wav<W: Write + Seek>(
    writer: W,
    samples: &[f32],
    sample_rate: u32,
) -> Result<(), ClickError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::new(writer, spec)?;
    for &s in samples {
        writer.write_sample((s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}
