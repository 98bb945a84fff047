//! Offline click-track rendering to mono samples.

use tracing::debug;

use super::config::ClickConfig;
use super::plan::{ClickPlan, PlaybackMode};
use super::synth::generate_click;
use super::ClickError;

/// Longest buffer [`ClickRenderer::render`] will produce.
pub const MAX_RENDER_SAMPLES: usize = 1 << 28;

/// Longest click sound, in seconds.
const MAX_CLICK_SECS: f64 = 10.0;

/// Renders a [`ClickPlan`] into a mono sample buffer.
#[derive(Debug, Clone)]
pub struct ClickRenderer {
    sample_rate: u32,
    downbeat: Vec<f32>,
    beat: Vec<f32>,
}

impl ClickRenderer {
    pub fn new(config: &ClickConfig) -> Self {
        let gain = config.gain.clamp(0.0, 1.0);
        let click_secs = config.click_secs.min(MAX_CLICK_SECS);
        let scale = |sound: Vec<f32>| -> Vec<f32> { sound.into_iter().map(|s| s * gain).collect() };
        Self {
            sample_rate: config.sample_rate,
            downbeat: scale(generate_click(
                config.sample_rate,
                config.downbeat_hz,
                click_secs,
            )),
            beat: scale(generate_click(
                config.sample_rate,
                config.beat_hz,
                click_secs,
            )),
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Render lead-in silence followed by the clicks of `plan`.
    ///
    /// The buffer runs to the end of the last beat, or to the end of the
    /// last click sound if that rings longer.
    pub fn render(
        &self,
        plan: &ClickPlan,
        mode: PlaybackMode,
        bars: Option<usize>,
    ) -> Result<Vec<f32>, ClickError> {
        let clicks = plan.clicks(mode, bars)?;
        let total = plan.duration(mode, bars)?;
        let sr = self.sample_rate;

        let len = (total.as_secs_f64() * sr as f64).round();
        if len > MAX_RENDER_SAMPLES as f64 {
            return Err(ClickError::TooLong);
        }
        let lead_in = (plan.lead_in.as_secs_f64() * sr as f64).round() as usize;
        let mut output = vec![0.0f32; len as usize];

        for click in &clicks {
            let sound = if click.accent {
                &self.downbeat
            } else {
                &self.beat
            };
            let start = lead_in + click.time.to_sample_offset(plan.tempo_bpm, sr) as usize;
            let end = start + sound.len();
            if end > MAX_RENDER_SAMPLES {
                return Err(ClickError::TooLong);
            }
            if end > output.len() {
                output.resize(end, 0.0);
            }
            for (out, &s) in output[start..end].iter_mut().zip(sound) {
                *out += s;
            }
        }

        for sample in output.iter_mut() {
            *sample = sample.clamp(-1.0, 1.0);
        }

        debug!(
            clicks = clicks.len(),
            samples = output.len(),
            sample_rate = sr,
            "rendered click track"
        );
        Ok(output)
    }
}
