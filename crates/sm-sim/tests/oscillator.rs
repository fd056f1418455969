//! Integration test: damped spring-mass oscillator physics.
//!
//! Scenarios:
//! - Undamped, unforced motion conserves mechanical energy
//! - Damped, unforced motion decays toward rest with the expected envelope
//! - Force-free, spring-free mass drifts linearly
//! - Fixed-step RK4 agrees with the adaptive method

use sm_model::{Parameters, SpringMassDamper, State};
use sm_sim::{Method, SimulationConfig, SolverOptions, run_simulation};

/// Default config minus damping: m = 1 kg, k = 10 N/m, x0 = (1, 0), 10 s.
fn undamped_config() -> SimulationConfig {
    SimulationConfig {
        damping: 0.0,
        ..SimulationConfig::default()
    }
}

fn oscillator_for(config: &SimulationConfig) -> SpringMassDamper {
    let params = Parameters::from_si(
        config.mass,
        config.spring_constant,
        config.damping,
        config.force,
    )
    .expect("valid test parameters");
    SpringMassDamper::new(params)
}

#[test]
fn undamped_motion_conserves_energy() {
    let config = undamped_config();
    let traj = run_simulation(&config).expect("simulation failed");
    let model = oscillator_for(&config);

    let e0 = model.mechanical_energy(&traj.states()[0]).value;
    assert!(e0 > 0.0, "initial energy must be positive");

    let mut worst = 0.0_f64;
    for state in traj.states() {
        let drift = (model.mechanical_energy(state).value - e0).abs() / e0;
        worst = worst.max(drift);
    }
    println!("worst relative energy drift: {:.3e}", worst);
    assert!(
        worst < 5e-3,
        "energy drift {:.3e} exceeds solver-tolerance scale",
        worst
    );
}

#[test]
fn energy_drift_shrinks_with_tighter_tolerances() {
    let config = SimulationConfig {
        solver: SolverOptions::default().with_tolerances(1e-8, 1e-10),
        ..undamped_config()
    };
    let traj = run_simulation(&config).expect("simulation failed");
    let model = oscillator_for(&config);

    let e0 = model.mechanical_energy(&traj.states()[0]).value;
    let mut worst = 0.0_f64;
    for state in traj.states() {
        worst = worst.max((model.mechanical_energy(state).value - e0).abs() / e0);
    }
    println!("worst relative energy drift at rtol 1e-8: {:.3e}", worst);
    assert!(
        worst < 1e-6,
        "drift {:.3e} should track the tightened tolerance",
        worst
    );
}

#[test]
fn damped_motion_decays_toward_rest() {
    // m = 1, k = 10, c = 0.5, u = 0, x0 = (1, 0) over 10 s
    let traj = run_simulation(&SimulationConfig::default()).expect("simulation failed");

    // Peak |position| per quarter of the run; each window spans a full period
    let window = traj.len() / 4;
    let peaks: Vec<f64> = traj
        .states()
        .chunks(window)
        .map(|w| w.iter().map(|s| s.position.abs()).fold(0.0, f64::max))
        .collect();
    println!("peak |x| per quarter: {:?}", peaks);
    for pair in peaks.windows(2) {
        assert!(
            pair[1] < pair[0],
            "oscillation peaks should decay: {} then {}",
            pair[0],
            pair[1]
        );
    }

    // The oscillation keeps crossing zero while it decays
    let crossings = traj
        .states()
        .windows(2)
        .filter(|w| w[0].position * w[1].position < 0.0)
        .count();
    assert!(
        (9..=11).contains(&crossings),
        "expected about 10 zero crossings for omega_d near 3.15, got {}",
        crossings
    );

    let (t_final, s_final) = traj.final_point().expect("non-empty trajectory");
    assert_eq!(t_final, 10.0);
    assert!(
        s_final.position.abs() < 0.1,
        "position should be near rest by t = 10, got {}",
        s_final.position
    );
    assert!(
        s_final.velocity.abs() < 0.35,
        "velocity should be near rest by t = 10, got {}",
        s_final.velocity
    );
}

#[test]
fn decay_envelope_matches_the_damping_ratio() {
    let config = SimulationConfig::default();
    let traj = run_simulation(&config).expect("simulation failed");

    let sigma = config.damping / (2.0 * config.mass);
    let omega_d = (config.spring_constant / config.mass - sigma * sigma).sqrt();

    // Phase-free amplitude of a damped sinusoid at a sampled (x, v)
    let amplitude = |s: &State| {
        let q = (s.velocity + sigma * s.position) / omega_d;
        (s.position * s.position + q * q).sqrt()
    };

    let a0 = amplitude(&traj.states()[0]);
    let (t_final, s_final) = traj.final_point().expect("non-empty trajectory");
    let predicted = a0 * (-sigma * t_final).exp();
    let measured = amplitude(&s_final);

    let rel = (measured - predicted).abs() / predicted;
    println!(
        "envelope at t = {}: measured {:.6}, predicted {:.6}, rel err {:.2e}",
        t_final, measured, predicted, rel
    );
    assert!(
        rel < 5e-3,
        "envelope error {:.2e} exceeds solver-tolerance scale",
        rel
    );
}

#[test]
fn free_mass_drifts_linearly() {
    let config = SimulationConfig {
        spring_constant: 0.0,
        damping: 0.0,
        initial_position: 0.0,
        initial_velocity: 5.0,
        ..SimulationConfig::default()
    };
    let traj = run_simulation(&config).expect("simulation failed");

    for (t, s) in traj.iter() {
        assert!(
            (s.position - 5.0 * t).abs() < 1e-9,
            "position at t = {} should be 5t, got {}",
            t,
            s.position
        );
        assert!(
            (s.velocity - 5.0).abs() < 1e-12,
            "velocity must stay 5, got {}",
            s.velocity
        );
    }
}

#[test]
fn fixed_step_rk4_matches_the_adaptive_method() {
    let adaptive = run_simulation(&SimulationConfig::default()).expect("simulation failed");

    let rk4_config = SimulationConfig {
        solver: SolverOptions::default().with_method(Method::Rk4 { step: 0.005 }),
        ..SimulationConfig::default()
    };
    let fixed = run_simulation(&rk4_config).expect("simulation failed");

    assert_eq!(adaptive.times(), fixed.times());
    let mut worst = 0.0_f64;
    for (a, b) in adaptive.states().iter().zip(fixed.states()) {
        worst = worst.max((a.position - b.position).abs());
    }
    println!("max |dx| between methods: {:.3e}", worst);
    assert!(worst < 2e-3, "methods disagree by {:.3e}", worst);
}
