//! Song validation — rebuilds bars, per-bar tempo and the lead-in from
//! an ordered list of beats.
//!
//! Bar boundaries are inferred from the beat number wrapping around; the
//! final pair of beats always closes the last bar. Structural problems are
//! fatal, timing jitter and tempo drift are only warnings.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::{BeatError, Violation};
use super::model::{Bar, Beat, Song, SongAnalysis};

/// Largest spread between adjacent inter-beat deltas in a bar before a
/// jitter warning is raised.
pub const DEFAULT_JITTER_TOLERANCE_SECS: f64 = 0.02;

/// Largest tempo change between adjacent bars before a drift warning.
pub const DEFAULT_DRIFT_TOLERANCE_BPM: f64 = 5.0;

/// Warning thresholds for the validator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    pub jitter_tolerance_secs: f64,
    pub drift_tolerance_bpm: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            jitter_tolerance_secs: DEFAULT_JITTER_TOLERANCE_SECS,
            drift_tolerance_bpm: DEFAULT_DRIFT_TOLERANCE_BPM,
        }
    }
}

/// A non-fatal observation made during validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// Two adjacent inter-beat deltas in a bar differ by more than the
    /// jitter tolerance.
    Jitter {
        bar: u32,
        previous_secs: f64,
        current_secs: f64,
    },
    /// Adjacent bars differ in tempo by more than the drift tolerance.
    /// `bar` is the later of the two.
    Drift {
        bar: u32,
        previous_bpm: f64,
        current_bpm: f64,
    },
    /// The first timestamp could not be turned into a lead-in duration.
    LeadIn { timestamp: f64 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::Jitter {
                bar,
                previous_secs,
                current_secs,
            } => write!(
                f,
                "bar {bar}: beat increments {previous_secs:.3}s and {current_secs:.3}s should be similar"
            ),
            Warning::Drift {
                bar,
                previous_bpm,
                current_bpm,
            } => write!(
                f,
                "bar {bar}: tempo moved from {previous_bpm:.2} to {current_bpm:.2} BPM"
            ),
            Warning::LeadIn { timestamp } => write!(
                f,
                "first timestamp {timestamp} is not a usable lead-in, starting immediately"
            ),
        }
    }
}

/// What validation produced when no structural error was found.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Song(SongAnalysis),
    /// No bar could be closed (fewer than two beats). Not an error.
    NoBars,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    pub outcome: Outcome,
    pub warnings: Vec<Warning>,
}

impl Validation {
    pub fn analysis(&self) -> Option<&SongAnalysis> {
        match &self.outcome {
            Outcome::Song(analysis) => Some(analysis),
            Outcome::NoBars => None,
        }
    }

    pub fn into_analysis(self) -> Option<SongAnalysis> {
        match self.outcome {
            Outcome::Song(analysis) => Some(analysis),
            Outcome::NoBars => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Validator {
    tolerances: Tolerances,
}

impl Validator {
    pub fn new(tolerances: Tolerances) -> Self {
        Self { tolerances }
    }

    /// Reconstruct the song from `beats`, which must be in input order.
    pub fn validate(&self, beats: &[Beat]) -> Result<Validation, BeatError> {
        let mut warnings = Vec::new();
        let Some(first) = beats.first() else {
            return Ok(Validation {
                outcome: Outcome::NoBars,
                warnings,
            });
        };

        let mut song = Song::new();
        let mut current_bar = first.bar;
        let mut deltas: Vec<f64> = Vec::new();
        let last_pair = beats.len().saturating_sub(2);

        for (i, pair) in beats.windows(2).enumerate() {
            let (prev, cur) = (&pair[0], &pair[1]);

            if cur.timestamp <= prev.timestamp {
                return Err(BeatError::validation(
                    Violation::TimestampNotIncreasing,
                    format!(
                        "timestamp {} does not come after {}",
                        cur.timestamp, prev.timestamp
                    ),
                    cur.position,
                ));
            }
            deltas.push(cur.timestamp - prev.timestamp);

            if let Some(beat_count) = boundary(prev, cur, current_bar, i == last_pair)? {
                let bar = self.close_bar(current_bar, beat_count, &deltas, &mut warnings);
                song.push(bar);
                current_bar = current_bar.saturating_add(1);
                deltas.clear();
            }
        }

        let Some(tempo_bpm) = song.mean_tempo() else {
            return Ok(Validation {
                outcome: Outcome::NoBars,
                warnings,
            });
        };

        let mut bar = first.bar;
        for pair in song.bars().windows(2) {
            bar = bar.saturating_add(1);
            let (previous, current) = (pair[0].tempo_bpm, pair[1].tempo_bpm);
            if (current - previous).abs() > self.tolerances.drift_tolerance_bpm {
                let warning = Warning::Drift {
                    bar,
                    previous_bpm: previous,
                    current_bpm: current,
                };
                warn!("{warning}");
                warnings.push(warning);
            }
        }

        let lead_in = Duration::try_from_secs_f64(first.timestamp).unwrap_or_else(|_| {
            let warning = Warning::LeadIn {
                timestamp: first.timestamp,
            };
            warn!("{warning}");
            warnings.push(warning);
            Duration::ZERO
        });

        debug!(bars = song.len(), tempo_bpm, ?lead_in, "validated song");
        Ok(Validation {
            outcome: Outcome::Song(SongAnalysis {
                tempo_bpm,
                lead_in,
                song,
            }),
            warnings,
        })
    }

    fn close_bar(
        &self,
        bar: u32,
        beat_count: u32,
        deltas: &[f64],
        warnings: &mut Vec<Warning>,
    ) -> Bar {
        for pair in deltas.windows(2) {
            if (pair[1] - pair[0]).abs() > self.tolerances.jitter_tolerance_secs {
                let warning = Warning::Jitter {
                    bar,
                    previous_secs: pair[0],
                    current_secs: pair[1],
                };
                warn!("{warning}");
                warnings.push(warning);
            }
        }

        // A wrapped bar carries one delta per beat (the last one reaches the
        // next downbeat); the final bar carries one fewer.
        let seconds_per_beat = deltas.iter().sum::<f64>() / deltas.len() as f64;
        let tempo_bpm = 60.0 / seconds_per_beat;
        debug!(bar, beat_count, tempo_bpm, "closed bar");

        Bar {
            tempo_bpm,
            beat_count,
        }
    }
}

/// Decide whether `cur` closes the bar in progress.
///
/// Returns the closed bar's beat count on a boundary, `None` mid-bar, or
/// the structural error the pair exhibits.
fn boundary(
    prev: &Beat,
    cur: &Beat,
    current_bar: u32,
    is_last: bool,
) -> Result<Option<u32>, BeatError> {
    let next_bar = current_bar.checked_add(1);

    if cur.bar != current_bar && Some(cur.bar) != next_bar {
        return Err(BeatError::validation(
            Violation::BarNotMonotonic,
            format!("bar {} does not follow bar {current_bar}", cur.bar),
            cur.position,
        ));
    }

    if cur.beat < prev.beat {
        if is_last {
            if cur.bar != current_bar {
                return Err(final_beat_error(cur, current_bar));
            }
        } else if Some(cur.bar) != next_bar {
            return Err(BeatError::validation(
                Violation::BarNotMonotonic,
                format!(
                    "beat wrapped around to {} but bar stayed at {}",
                    cur.beat, cur.bar
                ),
                cur.position,
            ));
        }
        return Ok(Some(prev.beat));
    }

    if prev.beat.checked_add(1) != Some(cur.beat) {
        return Err(BeatError::validation(
            Violation::BeatNotSequential,
            format!(
                "beat {} follows beat {} in bar {current_bar}",
                cur.beat, prev.beat
            ),
            cur.position,
        ));
    }

    if cur.bar != current_bar {
        if is_last {
            return Err(final_beat_error(cur, current_bar));
        }
        return Err(BeatError::validation(
            Violation::BarDrift,
            format!(
                "beat {} moved to bar {} without starting a new bar",
                cur.beat, cur.bar
            ),
            cur.position,
        ));
    }

    Ok(is_last.then_some(cur.beat))
}

fn final_beat_error(cur: &Beat, current_bar: u32) -> BeatError {
    BeatError::validation(
        Violation::FinalBeatInWrongBar,
        format!(
            "final beat is in bar {} but bar {current_bar} is being closed",
            cur.bar
        ),
        cur.position,
    )
}
