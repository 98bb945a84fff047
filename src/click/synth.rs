//! Synthetic click sounds.

use std::f64::consts::PI;

/// Generate a click: a sine burst at `freq_hz` with a fast exponential
/// decay, `length_secs` long.
///
/// The first millisecond ramps up linearly so the click starts without a
/// discontinuity.
pub fn generate_click(sample_rate: u32, freq_hz: f64, length_secs: f64) -> Vec<f32> {
    let num_samples = (sample_rate as f64 * length_secs.max(0.0)) as usize;
    let attack = (sample_rate as f64 * 0.001).max(1.0);
    let mut output = Vec::with_capacity(num_samples);

    for i in 0..num_samples {
        let t = i as f64 / sample_rate as f64;
        let norm = i as f64 / num_samples as f64;

        let ramp = (i as f64 / attack).min(1.0);
        let amp = ramp * (-norm * 6.0).exp();

        let sample = (2.0 * PI * freq_hz * t).sin() * amp;
        output.push(sample as f32);
    }

    output
}
