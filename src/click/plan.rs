//! Click plan — what a playback engine needs to click along with a song.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::time::MusicalTime;
use super::ClickError;
use crate::beats::SongAnalysis;

/// Most clicks a single plan may schedule.
pub const MAX_CLICKS: u64 = 1 << 20;

/// How bars are laid out when clicking.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum PlaybackMode {
    /// Repeat one measure shaped like the first bar.
    #[default]
    Repeat,
    /// Follow each bar's own beat count, looping the song if needed.
    PerBar,
}

/// A scheduled click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Click {
    /// Musical position from the first click.
    pub time: MusicalTime,
    /// Wall-clock offset from the start of playback, lead-in included.
    pub offset: Duration,
    /// First beat of a bar.
    pub accent: bool,
}

/// Tempo, lead-in and bar layout handed to a playback engine.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickPlan {
    pub tempo_bpm: f64,
    pub lead_in: Duration,
    pub bar_beat_counts: Vec<u32>,
}

impl From<&SongAnalysis> for ClickPlan {
    fn from(analysis: &SongAnalysis) -> Self {
        Self {
            tempo_bpm: analysis.tempo_bpm,
            lead_in: analysis.lead_in,
            bar_beat_counts: analysis.song.beat_counts(),
        }
    }
}

impl ClickPlan {
    /// Beats per measure when repeating the first bar.
    pub fn measure(&self) -> Option<u32> {
        self.bar_beat_counts.first().copied()
    }

    /// Beat counts of the bars to click. `bars` defaults to the song length.
    pub fn bars(&self, mode: PlaybackMode, bars: Option<usize>) -> impl Iterator<Item = u32> + '_ {
        let n = bars.unwrap_or(self.bar_beat_counts.len());
        let pattern = match mode {
            PlaybackMode::Repeat => &self.bar_beat_counts[..self.bar_beat_counts.len().min(1)],
            PlaybackMode::PerBar => &self.bar_beat_counts[..],
        };
        pattern.iter().copied().cycle().take(n)
    }

    /// Every click, in order.
    pub fn clicks(&self, mode: PlaybackMode, bars: Option<usize>) -> Result<Vec<Click>, ClickError> {
        let total = self.checked_total_beats(mode, bars)?;

        let mut clicks = Vec::with_capacity(total as usize);
        let mut time = MusicalTime::ZERO;
        for beat_count in self.bars(mode, bars) {
            for beat in 0..beat_count {
                clicks.push(Click {
                    time,
                    offset: self.offset(time)?,
                    accent: beat == 0,
                });
                time += MusicalTime::from_beats(1);
            }
        }
        Ok(clicks)
    }

    /// Total beats clicked for the given layout, saturating at `u64::MAX`.
    pub fn total_beats(&self, mode: PlaybackMode, bars: Option<usize>) -> u64 {
        let n = bars.unwrap_or(self.bar_beat_counts.len()) as u64;
        match mode {
            PlaybackMode::Repeat => self
                .measure()
                .map_or(0, |m| u64::from(m).saturating_mul(n)),
            PlaybackMode::PerBar => {
                let len = self.bar_beat_counts.len() as u64;
                if len == 0 {
                    return 0;
                }
                let cycle: u64 = self.bar_beat_counts.iter().map(|&c| u64::from(c)).sum();
                let rest: u64 = self.bar_beat_counts[..(n % len) as usize]
                    .iter()
                    .map(|&c| u64::from(c))
                    .sum();
                cycle.saturating_mul(n / len).saturating_add(rest)
            }
        }
    }

    /// Lead-in plus every beat of the layout.
    pub fn duration(&self, mode: PlaybackMode, bars: Option<usize>) -> Result<Duration, ClickError> {
        let total = self.checked_total_beats(mode, bars)?;
        self.offset(MusicalTime::from_beats(total))
    }

    /// Wall-clock offset of `time`, lead-in included.
    fn offset(&self, time: MusicalTime) -> Result<Duration, ClickError> {
        Duration::try_from_secs_f64(time.to_seconds(self.tempo_bpm))
            .ok()
            .and_then(|d| self.lead_in.checked_add(d))
            .ok_or(ClickError::TooLong)
    }

    fn checked_total_beats(&self, mode: PlaybackMode, bars: Option<usize>) -> Result<u64, ClickError> {
        if !(self.tempo_bpm.is_finite() && self.tempo_bpm > 0.0) {
            return Err(ClickError::InvalidTempo(self.tempo_bpm));
        }
        if self.bar_beat_counts.is_empty() {
            return Err(ClickError::EmptyPlan);
        }
        let total = self.total_beats(mode, bars);
        if total > MAX_CLICKS {
            return Err(ClickError::TooLong);
        }
        Ok(total)
    }
}
