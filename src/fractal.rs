use std::fmt;
use std::ops::{Add, Mul};

/// Squared escape radius shared by every variant.
pub const ESCAPE_RADIUS_SQ: f64 = 4.0;

/// Hard ceiling on the per-evaluation iteration budget.
pub const MAX_ITERATION_LIMIT: u32 = 512;

/// Fixed auxiliary constant for the Julia variant.
pub const JULIA_C: Complex = Complex { re: -0.7, im: 0.27015 };

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    pub fn norm_sqr(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    pub fn conj(self) -> Self {
        Self {
            re: self.re,
            im: -self.im,
        }
    }

    pub fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}

impl Add for Complex {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl Mul for Complex {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self {
            re: self.re * rhs.re - self.im * rhs.im,
            im: self.re * rhs.im + self.im * rhs.re,
        }
    }
}

/// Per-evaluation parameter set. Owned and mutated by the UI layer between
/// frames; immutable for the duration of one call.
///
/// `dimension_shift` and `chaos_parameter` are transported for the shader
/// layer and validated here, but no escape loop reads them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractalParameters {
    pub max_iterations: u32,
    pub zoom: f64,
    pub offset: Complex,
    pub quantum_phase: f64,
    pub dimension_shift: f64,
    pub chaos_parameter: f64,
}

impl Default for FractalParameters {
    fn default() -> Self {
        Self {
            max_iterations: 128,
            zoom: 1.0,
            offset: Complex::new(0.0, 0.0),
            quantum_phase: 0.0,
            dimension_shift: 2.0,
            chaos_parameter: 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterError {
    InvalidIterations(u32),
    InvalidZoom(f64),
    NonFiniteOffset { re: f64, im: f64 },
    NonFinitePhase(f64),
    InvalidDimensionShift(f64),
    InvalidChaosParameter(f64),
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIterations(v) => {
                write!(f, "iterations must be in 1..={MAX_ITERATION_LIMIT}: {v}")
            }
            Self::InvalidZoom(v) => write!(f, "zoom must be a positive finite value: {v}"),
            Self::NonFiniteOffset { re, im } => {
                write!(f, "offset must be finite: ({re}, {im})")
            }
            Self::NonFinitePhase(v) => write!(f, "quantum phase must be finite: {v}"),
            Self::InvalidDimensionShift(v) => {
                write!(f, "dimension shift must be in [1.5, 3.0]: {v}")
            }
            Self::InvalidChaosParameter(v) => {
                write!(f, "chaos parameter must be in [0.1, 3.0]: {v}")
            }
        }
    }
}

impl std::error::Error for ParameterError {}

impl FractalParameters {
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.max_iterations == 0 || self.max_iterations > MAX_ITERATION_LIMIT {
            return Err(ParameterError::InvalidIterations(self.max_iterations));
        }
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            return Err(ParameterError::InvalidZoom(self.zoom));
        }
        if !self.offset.is_finite() {
            return Err(ParameterError::NonFiniteOffset {
                re: self.offset.re,
                im: self.offset.im,
            });
        }
        if !self.quantum_phase.is_finite() {
            return Err(ParameterError::NonFinitePhase(self.quantum_phase));
        }
        if !self.dimension_shift.is_finite() || !(1.5..=3.0).contains(&self.dimension_shift) {
            return Err(ParameterError::InvalidDimensionShift(self.dimension_shift));
        }
        if !self.chaos_parameter.is_finite() || !(0.1..=3.0).contains(&self.chaos_parameter) {
            return Err(ParameterError::InvalidChaosParameter(self.chaos_parameter));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FractalVariant {
    Mandelbrot,
    Julia,
    BurningShip,
    Tricorn,
    QuantumHybrid,
}

impl FractalVariant {
    pub const fn all() -> [Self; 5] {
        [
            Self::Mandelbrot,
            Self::Julia,
            Self::BurningShip,
            Self::Tricorn,
            Self::QuantumHybrid,
        ]
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mandelbrot" => Some(Self::Mandelbrot),
            "julia" => Some(Self::Julia),
            "burning-ship" | "burning_ship" => Some(Self::BurningShip),
            "tricorn" => Some(Self::Tricorn),
            "quantum-hybrid" | "quantum_hybrid" => Some(Self::QuantumHybrid),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mandelbrot => "mandelbrot",
            Self::Julia => "julia",
            Self::BurningShip => "burning-ship",
            Self::Tricorn => "tricorn",
            Self::QuantumHybrid => "quantum-hybrid",
        }
    }

    /// Only the quantum-hybrid variant draws from the random source.
    pub fn is_stochastic(self) -> bool {
        matches!(self, Self::QuantumHybrid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EscapeResult {
    pub iteration_count: u32,
    pub smoothed_value: f64,
    pub escaped: bool,
}

impl EscapeResult {
    fn raw_escape(n: u32) -> Self {
        Self {
            iteration_count: n,
            smoothed_value: n as f64,
            escaped: true,
        }
    }

    fn interior(max_iterations: u32) -> Self {
        Self {
            iteration_count: max_iterations,
            smoothed_value: 0.0,
            escaped: false,
        }
    }
}

/// Escape-time evaluator. One instance per render session; it owns the
/// random source consumed by the quantum-hybrid variant so that seeded
/// instances replay identically.
pub struct FractalEvaluator {
    rng: fastrand::Rng,
}

impl Default for FractalEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl FractalEvaluator {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn evaluate(
        &mut self,
        coord: Complex,
        variant: FractalVariant,
        params: &FractalParameters,
    ) -> EscapeResult {
        evaluate_with(coord, variant, params, &mut self.rng)
    }

    /// Dense row-major field of normalized values in [0, 1], one slot per
    /// pixel: `raw / max_iterations`, where raw is the smoothed escape count
    /// for Mandelbrot and the integer count for every other variant.
    pub fn generate_field(
        &mut self,
        width: usize,
        height: usize,
        variant: FractalVariant,
        params: &FractalParameters,
    ) -> Vec<f32> {
        let mut field = vec![0.0f32; width.saturating_mul(height)];
        if width == 0 || height == 0 {
            return field;
        }
        let map = CoordMap::new(width, height, params);
        for y in 0..height {
            for x in 0..width {
                let r = evaluate_with(map.coord(x, y), variant, params, &mut self.rng);
                field[y * width + x] = normalize(variant, &r, params.max_iterations);
            }
        }
        field
    }

    /// Same output as [`generate_field`](Self::generate_field), rows split
    /// across scoped worker threads writing disjoint chunks. Each worker gets
    /// a child random source forked off this evaluator's, so the stochastic
    /// variant stays seed-driven.
    pub fn generate_field_threaded(
        &mut self,
        width: usize,
        height: usize,
        variant: FractalVariant,
        params: &FractalParameters,
        workers: usize,
    ) -> Vec<f32> {
        let workers = workers.max(1).min(height.max(1));
        if workers <= 1 {
            return self.generate_field(width, height, variant, params);
        }
        let mut field = vec![0.0f32; width.saturating_mul(height)];
        if width == 0 {
            return field;
        }
        let map = CoordMap::new(width, height, params);
        let rows_per = height.div_ceil(workers);
        std::thread::scope(|s| {
            for (chunk_idx, rows) in field.chunks_mut(rows_per * width).enumerate() {
                let mut rng = fastrand::Rng::with_seed(self.rng.u64(..));
                let map = &map;
                s.spawn(move || {
                    let y0 = chunk_idx * rows_per;
                    for (dy, row) in rows.chunks_mut(width).enumerate() {
                        for (x, slot) in row.iter_mut().enumerate() {
                            let r =
                                evaluate_with(map.coord(x, y0 + dy), variant, params, &mut rng);
                            *slot = normalize(variant, &r, params.max_iterations);
                        }
                    }
                });
            }
        });
        field
    }
}

/// Viewport mapping used by the full-frame generators: a 4-unit-tall window
/// on the complex plane, stretched by the aspect ratio, scaled by zoom, and
/// recentered on the offset.
struct CoordMap {
    inv_w: f64,
    inv_h: f64,
    span_x: f64,
    span_y: f64,
    offset: Complex,
}

impl CoordMap {
    fn new(width: usize, height: usize, params: &FractalParameters) -> Self {
        let aspect = width as f64 / height.max(1) as f64;
        Self {
            inv_w: 1.0 / width.max(1) as f64,
            inv_h: 1.0 / height.max(1) as f64,
            span_x: 4.0 * aspect / params.zoom,
            span_y: 4.0 / params.zoom,
            offset: params.offset,
        }
    }

    fn coord(&self, x: usize, y: usize) -> Complex {
        Complex::new(
            (x as f64 * self.inv_w - 0.5) * self.span_x + self.offset.re,
            (y as f64 * self.inv_h - 0.5) * self.span_y + self.offset.im,
        )
    }
}

fn normalize(variant: FractalVariant, r: &EscapeResult, max_iterations: u32) -> f32 {
    let raw = match variant {
        FractalVariant::Mandelbrot => r.smoothed_value,
        _ => r.iteration_count as f64,
    };
    (raw / max_iterations.max(1) as f64).clamp(0.0, 1.0) as f32
}

fn evaluate_with(
    coord: Complex,
    variant: FractalVariant,
    params: &FractalParameters,
    rng: &mut fastrand::Rng,
) -> EscapeResult {
    match variant {
        FractalVariant::Mandelbrot => mandelbrot(coord, params.max_iterations),
        FractalVariant::Julia => julia(coord, JULIA_C, params.max_iterations),
        FractalVariant::BurningShip => burning_ship(coord, params.max_iterations),
        FractalVariant::Tricorn => tricorn(coord, params.max_iterations),
        FractalVariant::QuantumHybrid => {
            quantum_hybrid(coord, params.max_iterations, params.quantum_phase, rng)
        }
    }
}

/// Iteration `n` applies the recurrence first and then tests the escape
/// radius, so a point whose very first update already leaves the radius
/// escapes at iteration 0.
fn mandelbrot(c: Complex, max_iterations: u32) -> EscapeResult {
    let mut z = Complex::default();
    for n in 0..max_iterations {
        z = z * z + c;
        let m2 = z.norm_sqr();
        if m2 > ESCAPE_RADIUS_SQ {
            return EscapeResult {
                iteration_count: n,
                smoothed_value: smooth_escape(n, m2),
                escaped: true,
            };
        }
    }
    EscapeResult::interior(max_iterations)
}

fn julia(z0: Complex, c: Complex, max_iterations: u32) -> EscapeResult {
    let mut z = z0;
    for n in 0..max_iterations {
        z = z * z + c;
        if z.norm_sqr() > ESCAPE_RADIUS_SQ {
            return EscapeResult::raw_escape(n);
        }
    }
    EscapeResult::interior(max_iterations)
}

fn burning_ship(c: Complex, max_iterations: u32) -> EscapeResult {
    let mut z = Complex::default();
    for n in 0..max_iterations {
        z = Complex::new(z.re.abs(), z.im.abs());
        z = z * z + c;
        if z.norm_sqr() > ESCAPE_RADIUS_SQ {
            return EscapeResult::raw_escape(n);
        }
    }
    EscapeResult::interior(max_iterations)
}

fn tricorn(c: Complex, max_iterations: u32) -> EscapeResult {
    let mut z = Complex::default();
    for n in 0..max_iterations {
        let zc = z.conj();
        z = zc * zc + c;
        if z.norm_sqr() > ESCAPE_RADIUS_SQ {
            return EscapeResult::raw_escape(n);
        }
    }
    EscapeResult::interior(max_iterations)
}

/// Two-phase stochastic variant: a one-shot additive perturbation on the
/// first iteration whose draw falls under the phase-derived probability,
/// then a fixed rotation of every update from that iteration on.
fn quantum_hybrid(
    c: Complex,
    max_iterations: u32,
    phase: f64,
    rng: &mut fastrand::Rng,
) -> EscapeResult {
    let mut z = Complex::default();
    let mut collapsed = false;
    let (rot_sin, rot_cos) = (phase * 0.1).sin_cos();
    for n in 0..max_iterations {
        let probability = (phase + n as f64 * 0.1).sin() * 0.5 + 0.5;
        if !collapsed && rng.f64() < probability {
            z.re += phase.cos() * 0.1;
            z.im += phase.sin() * 0.1;
            collapsed = true;
        }
        let next = z * z + c;
        z = if collapsed {
            Complex::new(
                next.re * rot_cos - next.im * rot_sin,
                next.re * rot_sin + next.im * rot_cos,
            )
        } else {
            next
        };
        if z.norm_sqr() > ESCAPE_RADIUS_SQ {
            return EscapeResult::raw_escape(n);
        }
    }
    EscapeResult::interior(max_iterations)
}

/// Continuous escape count `n + 1 - log2(log2(|z|^2))`. With the escape
/// radius at 4 both logs stay positive; the clamp keeps the inner log above
/// zero for magnitudes at or below 1 so no NaN ever reaches a caller.
fn smooth_escape(n: u32, m2: f64) -> f64 {
    let inner = m2.max(1.0 + 1e-9).log2();
    n as f64 + 1.0 - inner.log2()
}
