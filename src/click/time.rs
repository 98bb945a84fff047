//! Musical time for click scheduling, in integer ticks.
//!
//! Click positions are counted in ticks so long click tracks do not pick up
//! floating-point error; conversion to seconds or sample offsets happens
//! only at the rendering boundary.

use std::ops::{Add, AddAssign};

/// Ticks per beat.
pub const TICKS_PER_BEAT: u64 = 960;

/// A position in musical time, measured from the first click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MusicalTime {
    ticks: u64,
}

impl MusicalTime {
    pub const ZERO: MusicalTime = MusicalTime { ticks: 0 };

    pub fn from_beats(beats: u64) -> Self {
        Self {
            ticks: beats.saturating_mul(TICKS_PER_BEAT),
        }
    }

    pub fn ticks(self) -> u64 {
        self.ticks
    }

    pub fn as_beats_f64(self) -> f64 {
        self.ticks as f64 / TICKS_PER_BEAT as f64
    }

    /// Seconds from the first click at `bpm`.
    pub fn to_seconds(self, bpm: f64) -> f64 {
        self.as_beats_f64() * 60.0 / bpm
    }

    /// Sample offset from the first click.
    ///
    /// Formula: `(ticks * 60 * sample_rate) / (TICKS_PER_BEAT * bpm)`
    pub fn to_sample_offset(self, bpm: f64, sample_rate: u32) -> u64 {
        let numerator = self.ticks as f64 * 60.0 * sample_rate as f64;
        let denominator = TICKS_PER_BEAT as f64 * bpm;
        (numerator / denominator).round() as u64
    }
}

impl Add for MusicalTime {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            ticks: self.ticks + rhs.ticks,
        }
    }
}

impl AddAssign for MusicalTime {
    fn add_assign(&mut self, rhs: Self) {
        self.ticks += rhs.ticks;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_beats_converts_to_ticks() {
        assert_eq!(MusicalTime::from_beats(1).ticks(), TICKS_PER_BEAT);
        assert_eq!(MusicalTime::from_beats(4).ticks(), 4 * TICKS_PER_BEAT);
        assert_eq!(MusicalTime::ZERO.ticks(), 0);
    }

    #[test]
    fn seconds_at_tempo() {
        let two_beats = MusicalTime::from_beats(2);
        assert!((two_beats.to_seconds(120.0) - 1.0).abs() < 1e-12);
        assert!((two_beats.to_seconds(60.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn sample_offset_at_120_bpm() {
        // One beat at 120 BPM is half a second.
        assert_eq!(MusicalTime::from_beats(1).to_sample_offset(120.0, 44100), 22050);
    }

    #[test]
    fn sample_offset_at_fractional_tempo() {
        let t = MusicalTime::from_beats(3);
        assert_eq!(t.to_sample_offset(90.0, 48000), 96000);
    }

    #[test]
    fn accumulating_beats_does_not_drift() {
        let mut t = MusicalTime::ZERO;
        for _ in 0..10_000 {
            t += MusicalTime::from_beats(1);
        }
        assert_eq!(t, MusicalTime::from_beats(10_000));
        assert_eq!(t.to_sample_offset(120.0, 44100), 10_000 * 22050);
    }

    #[test]
    fn addition_and_ordering() {
        let a = MusicalTime::from_beats(1);
        let b = MusicalTime::from_beats(2);
        assert_eq!(a + b, MusicalTime::from_beats(3));
        assert!(a < a + b);
        assert_eq!(MusicalTime::from_beats(u64::MAX).ticks(), u64::MAX);
    }
}
