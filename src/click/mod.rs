//! Click tracks — turning a validated song into clicks a playback engine
//! (or a WAV file) can use.
//!
//! A [`ClickPlan`] carries tempo, lead-in and per-bar beat counts. Sinks
//! consume plans; [`WavSink`] renders them offline with [`ClickRenderer`].

pub mod config;
pub mod plan;
pub mod render;
pub mod sink;
pub mod synth;
pub mod time;

pub use config::ClickConfig;
pub use plan::{Click, ClickPlan, PlaybackMode, MAX_CLICKS};
pub use render::{ClickRenderer, MAX_RENDER_SAMPLES};
pub use sink::{write_wav, ClickSink, WavSink};
pub use time::MusicalTime;

/// Errors raised while scheduling or writing clicks.
#[derive(Debug)]
pub enum ClickError {
    /// WAV encoding or I/O error.
    Wav(hound::Error),
    /// The plan has no bars to click.
    EmptyPlan,
    /// Tempo is not a positive, finite BPM.
    InvalidTempo(f64),
    /// The click track is too long to schedule or render.
    TooLong,
}

impl std::fmt::Display for ClickError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClickError::Wav(e) => write!(f, "WAV error: {e}"),
            ClickError::EmptyPlan => write!(f, "click plan has no bars"),
            ClickError::InvalidTempo(bpm) => write!(f, "invalid tempo: {bpm} BPM"),
            ClickError::TooLong => write!(f, "click track is too long"),
        }
    }
}

impl std::error::Error for ClickError {}

impl From<hound::Error> for ClickError {
    fn from(e: hound::Error) -> Self {
        ClickError::Wav(e)
    }
}
