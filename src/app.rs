use crate::chaos::{self, AttractorSpec, ChaosState};
use crate::config::Config;
use crate::fractal::{Complex, FractalEvaluator, FractalParameters, FractalVariant};
use crate::spectrum::SpectrumAnalyzer;
use crate::synth::SpectrumSynth;
use anyhow::{anyhow, Result};
use std::io::{self, Write};
use std::time::{Duration, Instant};

const DENSITY_RAMP: &[u8] = b" .:-=+*#%@";

/// Simulated frame clock of the external render loop.
const FRAME_DT: Duration = Duration::from_millis(16);

pub fn list_variants() -> Result<()> {
    let mut out = io::stdout();
    writeln!(out, "Fractal variants:")?;
    for v in FractalVariant::all() {
        writeln!(out, "  - {}", v.as_str())?;
    }
    writeln!(out, "Attractors:")?;
    for a in AttractorSpec::all() {
        writeln!(out, "  - {}", a.as_str())?;
    }
    Ok(())
}

/// Offline driver: plays the per-frame collaborator roles once, end to end.
pub fn run(cfg: Config) -> Result<()> {
    let variant = FractalVariant::parse(&cfg.variant)
        .ok_or_else(|| anyhow!("unsupported fractal variant: {}", cfg.variant))?;
    let spec = AttractorSpec::parse(&cfg.attractor)
        .ok_or_else(|| anyhow!("unsupported attractor: {}", cfg.attractor))?;

    let params = FractalParameters {
        max_iterations: cfg.iterations,
        zoom: cfg.zoom,
        offset: Complex::new(cfg.offset_x, cfg.offset_y),
        quantum_phase: cfg.phase,
        dimension_shift: cfg.dimension_shift,
        chaos_parameter: cfg.chaos_parameter,
    };
    params.validate()?;

    let mut out = io::stdout();
    render_field(&mut out, variant, &params, &cfg)?;
    run_attractor(&mut out, spec, &cfg)?;
    run_spectrum(&mut out, &cfg)?;
    Ok(())
}

fn render_field(
    out: &mut impl Write,
    variant: FractalVariant,
    params: &FractalParameters,
    cfg: &Config,
) -> Result<()> {
    let mut evaluator = match cfg.seed {
        Some(seed) => FractalEvaluator::with_seed(seed),
        None => FractalEvaluator::new(),
    };

    let start = Instant::now();
    let field = if cfg.threads > 1 {
        evaluator.generate_field_threaded(cfg.width, cfg.height, variant, params, cfg.threads)
    } else {
        evaluator.generate_field(cfg.width, cfg.height, variant, params)
    };
    let elapsed = start.elapsed();

    writeln!(
        out,
        "{} field {}x{} iter={} zoom={} ({:.1} ms)",
        variant.as_str(),
        cfg.width,
        cfg.height,
        params.max_iterations,
        params.zoom,
        elapsed.as_secs_f64() * 1000.0
    )?;

    for row in field.chunks(cfg.width.max(1)) {
        let mut line = Vec::with_capacity(row.len());
        for &v in row {
            let idx = (v * (DENSITY_RAMP.len() - 1) as f32).round() as usize;
            line.push(DENSITY_RAMP[idx.min(DENSITY_RAMP.len() - 1)]);
        }
        out.write_all(&line)?;
        writeln!(out)?;
    }

    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut sum = 0.0f64;
    for &v in &field {
        min = min.min(v);
        max = max.max(v);
        sum += v as f64;
    }
    if field.is_empty() {
        min = 0.0;
        max = 0.0;
    }
    writeln!(
        out,
        "field stats: min={:.4} mean={:.4} max={:.4}",
        min,
        sum / field.len().max(1) as f64,
        max
    )?;
    Ok(())
}

fn run_attractor(out: &mut impl Write, spec: AttractorSpec, cfg: &Config) -> Result<()> {
    let mut state = ChaosState::new(1.0, 1.0, 1.0);
    let print_every = (cfg.steps / 10).max(1);

    writeln!(
        out,
        "{} attractor: {} steps, dt={}",
        spec.as_str(),
        cfg.steps,
        cfg.dt
    )?;
    for i in 1..=cfg.steps {
        state = chaos::step(state, spec, cfg.dt);
        if i % print_every == 0 || i == cfg.steps {
            writeln!(
                out,
                "  step {:>6}: ({:>10.5}, {:>10.5}, {:>10.5})",
                i, state.x, state.y, state.z
            )?;
        }
    }
    Ok(())
}

fn run_spectrum(out: &mut impl Write, cfg: &Config) -> Result<()> {
    let mut analyzer = SpectrumAnalyzer::with_fft_size(cfg.fft_size);
    let mut synth = SpectrumSynth::new(cfg.fft_size, 48_000);
    if synth.bin_count() != analyzer.bin_count() {
        anyhow::bail!(
            "synth/analyzer bin mismatch: {} vs {}",
            synth.bin_count(),
            analyzer.bin_count()
        );
    }

    writeln!(
        out,
        "spectrum: {} frames of {} bins",
        cfg.frames,
        analyzer.bin_count()
    )?;

    let t0 = Instant::now();
    let mut beats = 0usize;
    for f in 0..cfg.frames {
        let t = f as f32 * FRAME_DT.as_secs_f32();
        let frame = synth.frame(t);
        let now = t0 + FRAME_DT * f as u32;
        let beat = analyzer.update(&frame, now);
        if beat {
            beats += 1;
            let feats = analyzer.features(true);
            writeln!(
                out,
                "  beat @ {:>6.2}s  vol={:.3} bass={:.3} mid={:.3} high={:.3} centroid={:.3}",
                t, feats.volume, feats.bass, feats.mid, feats.high, feats.centroid
            )?;
        }
    }

    let feats = analyzer.features(false);
    writeln!(
        out,
        "spectrum summary: beats={} vol={:.3} bass={:.3} mid={:.3} high={:.3} centroid={:.3}",
        beats, feats.volume, feats.bass, feats.mid, feats.high, feats.centroid
    )?;
    Ok(())
}
