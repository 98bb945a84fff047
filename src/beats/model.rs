//! Beats read from an annotation file and the bar structure derived from them.

use std::time::Duration;

use super::token::Position;

/// One annotated onset: a timestamp plus its place in the bar structure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beat {
    /// Seconds from the start of the recording.
    pub timestamp: f64,
    /// 1-based position within the bar.
    pub beat: u32,
    /// 1-based bar number.
    pub bar: u32,
    /// Where the record starts in the source.
    pub position: Position,
}

impl Beat {
    pub fn new(timestamp: f64, beat: u32, bar: u32) -> Self {
        Self {
            timestamp,
            beat,
            bar,
            position: Position::START,
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }
}

/// A bar reconstructed from its beats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub tempo_bpm: f64,
    /// Highest beat number seen in the bar.
    pub beat_count: u32,
}

/// Bars in musical order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Song {
    bars: Vec<Bar>,
}

impl Song {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bar: Bar) {
        self.bars.push(bar);
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Beat count of each bar, in order.
    pub fn beat_counts(&self) -> Vec<u32> {
        self.bars.iter().map(|b| b.beat_count).collect()
    }

    /// Arithmetic mean of the bar tempos, or `None` for an empty song.
    pub fn mean_tempo(&self) -> Option<f64> {
        if self.bars.is_empty() {
            return None;
        }
        let total: f64 = self.bars.iter().map(|b| b.tempo_bpm).sum();
        Some(total / self.bars.len() as f64)
    }
}

impl FromIterator<Bar> for Song {
    fn from_iter<I: IntoIterator<Item = Bar>>(iter: I) -> Self {
        Self {
            bars: iter.into_iter().collect(),
        }
    }
}

/// A successfully validated song.
#[derive(Debug, Clone, PartialEq)]
pub struct SongAnalysis {
    /// Mean of the per-bar tempos.
    pub tempo_bpm: f64,
    /// Time before the first beat.
    pub lead_in: Duration,
    pub song: Song,
}
