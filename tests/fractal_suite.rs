use quantum_viz::fractal::{
    Complex, FractalEvaluator, FractalParameters, FractalVariant, ParameterError,
};

fn params(max_iterations: u32) -> FractalParameters {
    FractalParameters {
        max_iterations,
        ..Default::default()
    }
}

fn sample_coords() -> Vec<Complex> {
    let mut coords = Vec::new();
    for i in -4i32..=4 {
        for j in -4i32..=4 {
            coords.push(Complex::new(i as f64 * 0.5, j as f64 * 0.5));
        }
    }
    coords
}

#[test]
fn iteration_count_bounded_for_every_variant() {
    for max in [1u32, 2, 17, 100] {
        let p = params(max);
        let mut evaluator = FractalEvaluator::with_seed(1);
        for variant in FractalVariant::all() {
            for coord in sample_coords() {
                let r = evaluator.evaluate(coord, variant, &p);
                assert!(
                    r.iteration_count <= max,
                    "{} at ({}, {}): count {} > max {}",
                    variant.as_str(),
                    coord.re,
                    coord.im,
                    r.iteration_count,
                    max
                );
                if !r.escaped {
                    assert_eq!(r.iteration_count, max);
                    assert_eq!(r.smoothed_value, 0.0);
                }
            }
        }
    }
}

#[test]
fn mandelbrot_origin_never_escapes() {
    for max in [1u32, 8, 64, 512] {
        let mut evaluator = FractalEvaluator::new();
        let r = evaluator.evaluate(Complex::new(0.0, 0.0), FractalVariant::Mandelbrot, &params(max));
        assert!(!r.escaped);
        assert_eq!(r.iteration_count, max);
        assert_eq!(r.smoothed_value, 0.0);
    }
}

#[test]
fn mandelbrot_far_exterior_escapes_immediately() {
    let mut evaluator = FractalEvaluator::new();
    let r = evaluator.evaluate(Complex::new(2.0, 2.0), FractalVariant::Mandelbrot, &params(100));
    assert!(r.escaped);
    assert_eq!(r.iteration_count, 0);
    assert!(r.smoothed_value.is_finite());
}

#[test]
fn mandelbrot_smooth_value_stays_finite() {
    let mut evaluator = FractalEvaluator::new();
    let p = params(256);
    for coord in sample_coords() {
        let r = evaluator.evaluate(coord, FractalVariant::Mandelbrot, &p);
        assert!(
            r.smoothed_value.is_finite(),
            "non-finite smooth value at ({}, {})",
            coord.re,
            coord.im
        );
    }
}

#[test]
fn julia_iteration_count_is_deterministic() {
    let mut evaluator = FractalEvaluator::new();
    let p = params(100);
    let first = evaluator.evaluate(Complex::new(0.0, 0.0), FractalVariant::Julia, &p);
    let second = evaluator.evaluate(Complex::new(0.0, 0.0), FractalVariant::Julia, &p);
    assert_eq!(first, second);

    // Orbit of the origin under the fixed constant leaves the radius on
    // iteration 95.
    assert!(first.escaped);
    assert_eq!(first.iteration_count, 95);
}

#[test]
fn burning_ship_origin_stays_interior() {
    let mut evaluator = FractalEvaluator::new();
    let r = evaluator.evaluate(Complex::new(0.0, 0.0), FractalVariant::BurningShip, &params(64));
    assert!(!r.escaped);
    assert_eq!(r.iteration_count, 64);
}

#[test]
fn tricorn_far_exterior_escapes_immediately() {
    let mut evaluator = FractalEvaluator::new();
    let r = evaluator.evaluate(Complex::new(2.0, 2.0), FractalVariant::Tricorn, &params(50));
    assert!(r.escaped);
    assert_eq!(r.iteration_count, 0);
}

#[test]
fn quantum_hybrid_replays_with_same_seed() {
    let p = FractalParameters {
        max_iterations: 200,
        quantum_phase: 1.3,
        ..Default::default()
    };
    for coord in sample_coords() {
        let a = FractalEvaluator::with_seed(42).evaluate(coord, FractalVariant::QuantumHybrid, &p);
        let b = FractalEvaluator::with_seed(42).evaluate(coord, FractalVariant::QuantumHybrid, &p);
        assert_eq!(a, b);
    }
}

#[test]
fn quantum_hybrid_stays_bounded_unseeded() {
    let mut evaluator = FractalEvaluator::new();
    for phase in [0.0, 0.7, 3.9, 12.0] {
        let p = FractalParameters {
            max_iterations: 80,
            quantum_phase: phase,
            ..Default::default()
        };
        for coord in sample_coords() {
            let r = evaluator.evaluate(coord, FractalVariant::QuantumHybrid, &p);
            assert!(r.iteration_count <= 80);
            assert!(r.smoothed_value.is_finite());
        }
    }
}

#[test]
fn field_is_row_major_and_normalized() {
    let (w, h) = (32usize, 18usize);
    let mut evaluator = FractalEvaluator::new();
    let p = FractalParameters::default();
    let field = evaluator.generate_field(w, h, FractalVariant::Mandelbrot, &p);

    assert_eq!(field.len(), w * h);
    for &v in &field {
        assert!((0.0..=1.0).contains(&v));
    }

    // The center pixel maps to the origin, a known interior point.
    assert_eq!(field[(h / 2) * w + w / 2], 0.0);
}

#[test]
fn julia_field_marks_interior_as_full_scale() {
    let mut evaluator = FractalEvaluator::new();
    let p = FractalParameters::default();
    let field = evaluator.generate_field(16, 16, FractalVariant::Julia, &p);
    // Raw-count variants normalize interior points to max_iterations / max_iterations.
    assert!(field.iter().any(|&v| v == 1.0));
}

#[test]
fn threaded_field_matches_sequential() {
    let p = FractalParameters {
        max_iterations: 96,
        zoom: 1.4,
        offset: Complex::new(-0.4, 0.1),
        ..Default::default()
    };
    for variant in [
        FractalVariant::Mandelbrot,
        FractalVariant::Julia,
        FractalVariant::BurningShip,
        FractalVariant::Tricorn,
    ] {
        let sequential = FractalEvaluator::new().generate_field(40, 23, variant, &p);
        let threaded =
            FractalEvaluator::new().generate_field_threaded(40, 23, variant, &p, 4);
        assert_eq!(sequential, threaded, "variant {}", variant.as_str());
    }
}

#[test]
fn empty_field_dimensions_yield_empty_output() {
    let mut evaluator = FractalEvaluator::new();
    let p = FractalParameters::default();
    assert!(evaluator.generate_field(0, 10, FractalVariant::Julia, &p).is_empty());
    assert!(evaluator.generate_field(10, 0, FractalVariant::Julia, &p).is_empty());
}

#[test]
fn parameter_validation_flags_each_field() {
    let ok = FractalParameters::default();
    assert!(ok.validate().is_ok());

    let mut p = ok;
    p.max_iterations = 0;
    assert!(matches!(p.validate(), Err(ParameterError::InvalidIterations(0))));
    p.max_iterations = 513;
    assert!(matches!(p.validate(), Err(ParameterError::InvalidIterations(513))));

    let mut p = ok;
    p.zoom = 0.0;
    assert!(matches!(p.validate(), Err(ParameterError::InvalidZoom(_))));
    p.zoom = f64::NAN;
    assert!(matches!(p.validate(), Err(ParameterError::InvalidZoom(_))));

    let mut p = ok;
    p.offset = Complex::new(f64::INFINITY, 0.0);
    assert!(matches!(p.validate(), Err(ParameterError::NonFiniteOffset { .. })));

    let mut p = ok;
    p.quantum_phase = f64::NAN;
    assert!(matches!(p.validate(), Err(ParameterError::NonFinitePhase(_))));

    let mut p = ok;
    p.dimension_shift = 1.2;
    assert!(matches!(
        p.validate(),
        Err(ParameterError::InvalidDimensionShift(_))
    ));

    let mut p = ok;
    p.chaos_parameter = 3.5;
    assert!(matches!(
        p.validate(),
        Err(ParameterError::InvalidChaosParameter(_))
    ));
}

#[test]
fn variant_names_round_trip() {
    for variant in FractalVariant::all() {
        assert_eq!(FractalVariant::parse(variant.as_str()), Some(variant));
    }
    assert_eq!(FractalVariant::parse("newton"), None);
    assert!(FractalVariant::QuantumHybrid.is_stochastic());
    assert!(!FractalVariant::Mandelbrot.is_stochastic());
}
