use std::time::{Duration, Instant};

/// FFT size of the upstream analyser; the analyzer sees half as many bins.
pub const DEFAULT_FFT_SIZE: usize = 256;

/// First-order IIR coefficient for the per-bin low-pass.
pub const SMOOTHING_FACTOR: f32 = 0.8;

/// Relative energy threshold of the beat detector.
pub const BEAT_THRESHOLD: f32 = 0.8;

/// Refractory window between consecutive beats.
pub const MIN_BEAT_INTERVAL: Duration = Duration::from_millis(500);

/// Bass-weighted short window the beat energy is averaged over.
const BEAT_WINDOW_BINS: usize = 32;

const FULL_SCALE: f32 = 255.0;

/// Per-update snapshot of the derived scalars, handed to the render layer
/// the same way the capture thread publishes features per hop.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpectrumFeatures {
    pub volume: f32,
    pub bass: f32,
    pub mid: f32,
    pub high: f32,
    pub centroid: f32,
    pub beat: bool,
}

/// Relative-threshold, refractory-gated beat trigger over the short-window
/// energy signal.
#[derive(Debug, Clone)]
struct BeatDetector {
    threshold: f32,
    min_interval: Duration,
    last_beat: Option<Instant>,
    energy: f32,
    previous_energy: f32,
}

impl BeatDetector {
    fn new(threshold: f32, min_interval: Duration) -> Self {
        Self {
            threshold,
            min_interval,
            last_beat: None,
            energy: 0.0,
            previous_energy: 0.0,
        }
    }

    fn update(&mut self, raw: &[f32], now: Instant) -> bool {
        let window = raw.len().min(BEAT_WINDOW_BINS);
        self.energy = if window == 0 {
            0.0
        } else {
            raw[..window].iter().sum::<f32>() / window as f32
        };

        let gate_open = self
            .last_beat
            .is_none_or(|t| now.duration_since(t) >= self.min_interval);
        let fired = gate_open && self.energy > self.previous_energy * self.threshold;
        if fired {
            self.last_beat = Some(now);
        }
        self.previous_energy = self.energy;
        fired
    }
}

/// Spectrum analysis state for one audio session: the latest raw frame, the
/// exponentially smoothed magnitudes, and the beat detector. Constructed at
/// session start, dropped at session end; nothing here is global.
pub struct SpectrumAnalyzer {
    raw: Vec<f32>,
    smoothed: Vec<f32>,
    smoothing: f32,
    beat: BeatDetector,
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectrumAnalyzer {
    pub fn new() -> Self {
        Self::with_fft_size(DEFAULT_FFT_SIZE)
    }

    pub fn with_fft_size(fft_size: usize) -> Self {
        Self::with_config(fft_size, BEAT_THRESHOLD, MIN_BEAT_INTERVAL)
    }

    pub fn with_config(fft_size: usize, beat_threshold: f32, min_beat_interval: Duration) -> Self {
        let bins = (fft_size / 2).max(1);
        Self {
            raw: vec![0.0; bins],
            smoothed: vec![0.0; bins],
            smoothing: SMOOTHING_FACTOR,
            beat: BeatDetector::new(beat_threshold, min_beat_interval),
        }
    }

    pub fn bin_count(&self) -> usize {
        self.raw.len()
    }

    /// Ingest one frame of raw magnitudes (each in 0..=255) at the given
    /// frame-clock instant. Returns whether a beat fired on this update.
    ///
    /// A frame of the wrong length is ignored; frame sizing is fixed by the
    /// capture session that owns the analyser node.
    pub fn update(&mut self, frame: &[f32], now: Instant) -> bool {
        if frame.len() != self.raw.len() {
            return false;
        }
        for (i, &sample) in frame.iter().enumerate() {
            let sample = sample.clamp(0.0, FULL_SCALE);
            self.raw[i] = sample;
            self.smoothed[i] = self.smoothed[i] * self.smoothing + sample * (1.0 - self.smoothing);
        }
        self.beat.update(&self.raw, now)
    }

    /// Smoothed magnitudes, same length and order as the raw frame.
    pub fn smoothed(&self) -> &[f32] {
        &self.smoothed
    }

    /// Mean of the raw frame, normalized to [0, 1].
    pub fn average_volume(&self) -> f32 {
        band_mean(&self.raw, 0, self.raw.len())
    }

    /// Mean over the first 12.5% of bins, normalized to [0, 1].
    pub fn bass_energy(&self) -> f32 {
        band_mean(&self.raw, 0, self.raw.len() / 8)
    }

    /// Mean over the 12.5%..50% bin range, normalized to [0, 1].
    pub fn mid_energy(&self) -> f32 {
        band_mean(&self.raw, self.raw.len() / 8, self.raw.len() / 2)
    }

    /// Mean over the upper half of the bins, normalized to [0, 1].
    pub fn high_energy(&self) -> f32 {
        band_mean(&self.raw, self.raw.len() / 2, self.raw.len())
    }

    /// Magnitude-weighted mean bin index in [0, 1]; 0 for a silent frame.
    pub fn spectral_centroid(&self) -> f32 {
        let mut numerator = 0.0f32;
        let mut denominator = 0.0f32;
        for (i, &m) in self.raw.iter().enumerate() {
            numerator += i as f32 * m;
            denominator += m;
        }
        if denominator > 0.0 {
            numerator / denominator / self.raw.len() as f32
        } else {
            0.0
        }
    }

    /// Current short-window beat energy (raw scale, 0..=255).
    pub fn energy(&self) -> f32 {
        self.beat.energy
    }

    pub fn features(&self, beat: bool) -> SpectrumFeatures {
        SpectrumFeatures {
            volume: self.average_volume(),
            bass: self.bass_energy(),
            mid: self.mid_energy(),
            high: self.high_energy(),
            centroid: self.spectral_centroid(),
            beat,
        }
    }
}

fn band_mean(raw: &[f32], start: usize, end: usize) -> f32 {
    if end <= start || start >= raw.len() {
        return 0.0;
    }
    let slice = &raw[start..end.min(raw.len())];
    slice.iter().sum::<f32>() / slice.len() as f32 / FULL_SCALE
}
