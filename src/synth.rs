use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

/// Offline stand-in for the capture session's analyser node: synthesizes a
/// pad-plus-kick signal, windows it, and FFTs it into magnitude frames on
/// the 0..=255 scale the analyzer expects.
pub struct SpectrumSynth {
    fft: Arc<dyn Fft<f32>>,
    fft_buf: Vec<Complex<f32>>,
    hann: Vec<f32>,
    sample_rate: f32,
    kick_period: f32,
}

impl SpectrumSynth {
    pub fn new(fft_size: usize, sample_rate_hz: u32) -> Self {
        let n = fft_size.max(2);
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(n);
        let hann = (0..n)
            .map(|i| 0.5 - 0.5 * ((2.0 * PI * i as f32) / (n as f32)).cos())
            .collect::<Vec<_>>();
        Self {
            fft,
            fft_buf: vec![Complex { re: 0.0, im: 0.0 }; n],
            hann,
            sample_rate: sample_rate_hz as f32,
            // 120 BPM kick grid.
            kick_period: 0.5,
        }
    }

    pub fn bin_count(&self) -> usize {
        self.fft_buf.len() / 2
    }

    /// Magnitude frame for the window starting at time `t` (seconds).
    pub fn frame(&mut self, t: f32) -> Vec<f32> {
        let n = self.fft_buf.len();
        for i in 0..n {
            let ts = t + i as f32 / self.sample_rate;
            let s = self.sample_at(ts);
            self.fft_buf[i] = Complex {
                re: s * self.hann[i],
                im: 0.0,
            };
        }
        self.fft.process(&mut self.fft_buf);

        // A full-scale sine under a Hann window peaks near N/4 in magnitude;
        // rescale so strong partials land close to full scale.
        let scale = FULL_SCALE * 4.0 / n as f32;
        self.fft_buf
            .iter()
            .take(n / 2)
            .map(|c| ((c.re * c.re + c.im * c.im).sqrt() * scale).clamp(0.0, FULL_SCALE))
            .collect()
    }

    fn sample_at(&self, t: f32) -> f32 {
        let pad = (2.0 * PI * 220.0 * t).sin() * 0.30
            + (2.0 * PI * (440.0 + 16.0 * (t * 0.17).cos()) * t).sin() * 0.18
            + (2.0 * PI * 3_200.0 * t).sin() * 0.08;

        // Short low burst with a fast-attack decay envelope on each grid hit.
        let phase = (t / self.kick_period).fract();
        let kick = if phase < 0.08 {
            let env = (1.0 - phase / 0.08).powf(2.4);
            (2.0 * PI * 60.0 * t).sin() * env
        } else {
            0.0
        };

        (pad + kick).clamp(-1.0, 1.0)
    }
}

const FULL_SCALE: f32 = 255.0;
