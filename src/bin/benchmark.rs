use std::time::{Duration, Instant};

use anyhow::Result;
use quantum_viz::fractal::{FractalEvaluator, FractalParameters, FractalVariant};

struct Args {
    frames: usize,
    w: usize,
    h: usize,
    threads: usize,
    ci_smoke: bool,
    max_ms: f64,
}

fn parse_args() -> Args {
    let mut args = Args {
        frames: 120,
        w: 160,
        h: 88,
        threads: 4,
        ci_smoke: false,
        max_ms: 40.0,
    };

    let argv = std::env::args().skip(1).collect::<Vec<_>>();
    let mut i = 0usize;
    while i < argv.len() {
        let k = argv[i].as_str();
        let v = argv.get(i + 1).map(|s| s.as_str());
        match (k, v) {
            ("--frames", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.frames = n.max(1);
                }
                i += 2;
            }
            ("--w", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.w = n.max(1);
                }
                i += 2;
            }
            ("--h", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.h = n.max(1);
                }
                i += 2;
            }
            ("--threads", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.threads = n.max(1);
                }
                i += 2;
            }
            ("--ci-smoke", Some(x)) if !x.starts_with("--") => {
                args.ci_smoke = parse_bool(x).unwrap_or(true);
                i += 2;
            }
            ("--ci-smoke", _) => {
                args.ci_smoke = true;
                i += 1;
            }
            ("--max-ms", Some(x)) => {
                if let Ok(v) = x.parse::<f64>() {
                    args.max_ms = v.max(0.1);
                }
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    args
}

fn parse_bool(s: &str) -> Option<bool> {
    let v = s.trim().to_ascii_lowercase();
    match v.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn bench_variant(
    variant: FractalVariant,
    args: &Args,
    threads: usize,
) -> (Duration, f64) {
    let mut evaluator = FractalEvaluator::with_seed(7);
    let mut params = FractalParameters::default();
    let mut checksum = 0.0f64;

    let start = Instant::now();
    for _ in 0..args.frames {
        // The render loop advances the phase 0.01 per frame.
        params.quantum_phase += 0.01;
        let field = if threads > 1 {
            evaluator.generate_field_threaded(args.w, args.h, variant, &params, threads)
        } else {
            evaluator.generate_field(args.w, args.h, variant, &params)
        };
        checksum += field.iter().step_by(97).map(|&v| v as f64).sum::<f64>();
    }
    (start.elapsed(), checksum)
}

fn main() -> Result<()> {
    let args = parse_args();
    let mut slow = Vec::<(String, f64)>::new();

    println!(
        "field benchmark: variants={} frames/variant={} size={}x{}",
        FractalVariant::all().len(),
        args.frames,
        args.w,
        args.h
    );

    let mut modes = vec![1usize];
    if args.threads > 1 {
        modes.push(args.threads);
    }
    for mode_threads in modes {
        let label = if mode_threads > 1 {
            format!("threaded x{mode_threads}")
        } else {
            "sequential".to_string()
        };
        println!("{label}:");
        for variant in FractalVariant::all() {
            let (elapsed, checksum) = bench_variant(variant, &args, mode_threads);
            let ms = elapsed.as_secs_f64() * 1000.0 / args.frames as f64;
            println!(
                "  {:<16} {:>8.3} ms/frame  checksum={:.3}",
                variant.as_str(),
                ms,
                checksum
            );
            if args.ci_smoke && ms > args.max_ms {
                slow.push((format!("{label}/{}", variant.as_str()), ms));
            }
        }
    }

    if args.ci_smoke {
        if !slow.is_empty() {
            eprintln!("CI smoke: FAIL");
            for (name, ms) in slow {
                eprintln!("  slow variant: {} ({:.3} ms/frame > {:.3})", name, ms, args.max_ms);
            }
            anyhow::bail!("ci smoke failed");
        }
        println!("CI smoke: PASS (max_ms={:.3})", args.max_ms);
    }

    Ok(())
}
