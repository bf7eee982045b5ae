/// Default Euler time step, one step per frame tick.
pub const DEFAULT_DT: f64 = 0.01;

/// State vector of an attractor session. Created when the attractor is
/// selected, advanced only through [`step`], discarded on reset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChaosState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl ChaosState {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for ChaosState {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<ChaosState> for [f64; 3] {
    fn from(s: ChaosState) -> Self {
        [s.x, s.y, s.z]
    }
}

/// Named attractor with its constant parameter bundle. The constructors
/// return the canonical parameter sets; payloads are never mutated at
/// runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttractorSpec {
    Lorenz { a: f64, b: f64, c: f64 },
    Rossler { a: f64, b: f64, c: f64 },
    Chua { alpha: f64, beta: f64, m0: f64, m1: f64 },
}

impl AttractorSpec {
    pub const fn lorenz() -> Self {
        Self::Lorenz {
            a: 10.0,
            b: 28.0,
            c: 8.0 / 3.0,
        }
    }

    pub const fn rossler() -> Self {
        Self::Rossler {
            a: 0.2,
            b: 0.2,
            c: 5.7,
        }
    }

    pub const fn chua() -> Self {
        Self::Chua {
            alpha: 15.6,
            beta: 28.0,
            m0: -1.143,
            m1: -0.714,
        }
    }

    pub const fn all() -> [Self; 3] {
        [Self::lorenz(), Self::rossler(), Self::chua()]
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "lorenz" => Some(Self::lorenz()),
            "rossler" => Some(Self::rossler()),
            "chua" => Some(Self::chua()),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lorenz { .. } => "lorenz",
            Self::Rossler { .. } => "rossler",
            Self::Chua { .. } => "chua",
        }
    }
}

/// One explicit forward-Euler step. Every derivative is computed from the
/// previous full state, never from partially updated components.
pub fn step(state: ChaosState, spec: AttractorSpec, dt: f64) -> ChaosState {
    let ChaosState { x, y, z } = state;
    let (dx, dy, dz) = match spec {
        AttractorSpec::Lorenz { a, b, c } => (a * (y - x), x * (b - z) - y, x * y - c * z),
        AttractorSpec::Rossler { a, b, c } => (-y - z, x + a * y, b + z * (x - c)),
        AttractorSpec::Chua {
            alpha,
            beta,
            m0,
            m1,
        } => {
            let f = m1 * x + 0.5 * (m0 - m1) * ((x + 1.0).abs() - (x - 1.0).abs());
            (alpha * (y - x - f), x - y + z, -beta * y)
        }
    };
    ChaosState {
        x: x + dt * dx,
        y: y + dt * dy,
        z: z + dt * dz,
    }
}

/// Name-based entry point for callers that route attractor selection as a
/// string. An unrecognized name is a documented no-op: the input state comes
/// back unchanged so a miswired caller degrades to a frozen trajectory
/// instead of crashing the frame loop.
pub fn step_named(state: ChaosState, name: &str, dt: f64) -> ChaosState {
    match AttractorSpec::parse(name) {
        Some(spec) => step(state, spec, dt),
        None => state,
    }
}
