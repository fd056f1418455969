use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use sm_model::{Parameters, SpringMassDamper};
use sm_sim::{
    DEFAULT_SAMPLES, Method, SimError, SimulationConfig, SolverOptions, Trajectory,
    run_simulation,
};

#[derive(Parser)]
#[command(name = "springsim")]
#[command(
    about = "Damped spring-mass simulator - position and velocity trajectories",
    long_about = None
)]
struct Cli {
    /// Oscillator mass in kg
    #[arg(long, default_value_t = 1.0)]
    mass: f64,
    /// Spring constant in N/m
    #[arg(long, default_value_t = 10.0)]
    spring_constant: f64,
    /// Damping coefficient in N*s/m
    #[arg(long, default_value_t = 0.5)]
    damping: f64,
    /// Constant external force in N
    #[arg(long, default_value_t = 0.0)]
    force: f64,
    /// Initial displacement in m
    #[arg(long, default_value_t = 1.0)]
    initial_position: f64,
    /// Initial velocity in m/s
    #[arg(long, default_value_t = 0.0)]
    initial_velocity: f64,
    /// Simulation duration in s, starting from t = 0
    #[arg(long, default_value_t = 10.0)]
    simulation_time: f64,
    /// Number of evenly spaced output samples
    #[arg(long, default_value_t = DEFAULT_SAMPLES)]
    samples: usize,
    /// Relative integration tolerance
    #[arg(long, default_value_t = 1e-3)]
    rtol: f64,
    /// Absolute integration tolerance
    #[arg(long, default_value_t = 1e-6)]
    atol: f64,
    /// Integration method
    #[arg(long, value_enum, default_value = "rk45")]
    method: MethodArg,
    /// Fixed step size in s, used by the rk4 method
    #[arg(long, default_value_t = 0.001)]
    rk4_step: f64,
    /// Output file path (optional, defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value = "csv")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum MethodArg {
    /// Adaptive Dormand-Prince 5(4)
    Rk45,
    /// Classic fixed-step RK4
    Rk4,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

impl Cli {
    fn to_config(&self) -> SimulationConfig {
        let method = match self.method {
            MethodArg::Rk45 => Method::DormandPrince45,
            MethodArg::Rk4 => Method::Rk4 { step: self.rk4_step },
        };
        SimulationConfig {
            mass: self.mass,
            spring_constant: self.spring_constant,
            damping: self.damping,
            force: self.force,
            initial_position: self.initial_position,
            initial_velocity: self.initial_velocity,
            simulation_time: self.simulation_time,
            samples: self.samples,
            solver: SolverOptions::default()
                .with_tolerances(self.rtol, self.atol)
                .with_method(method),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Simulation failed: {0}")]
    Sim(#[from] SimError),

    #[error("Failed to write output file: {path}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode trajectory as JSON")]
    Encode { source: serde_json::Error },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        report_failure(&err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = cli.to_config();
    // Keep stdout clean for piped data when no output file is given
    let quiet = cli.output.is_none();

    if !quiet {
        println!(
            "Simulating spring-mass system: m = {} kg, k = {} N/m, c = {} N*s/m, u = {} N",
            config.mass, config.spring_constant, config.damping, config.force
        );
        println!(
            "  x0 = ({}, {}), t in [0, {}] s, {} samples",
            config.initial_position,
            config.initial_velocity,
            config.simulation_time,
            config.samples
        );
    }

    let trajectory = run_simulation(&config)?;

    if !quiet {
        let stats = trajectory.stats();
        println!("✓ Simulation completed: {} samples", trajectory.len());
        println!(
            "  Steps: {} accepted, {} rejected, {} derivative evaluations",
            stats.accepted_steps, stats.rejected_steps, stats.evaluations
        );
        if let Some((t, s)) = trajectory.final_point() {
            println!(
                "  Final state: x = {:.6} m, v = {:.6} m/s at t = {:.3} s",
                s.position, s.velocity, t
            );
            let params = Parameters::from_si(
                config.mass,
                config.spring_constant,
                config.damping,
                config.force,
            )
            .map_err(SimError::from)?;
            let model = SpringMassDamper::new(params);
            println!(
                "  Mechanical energy: {:.6} J",
                model.mechanical_energy(&s).value
            );
        }
    }

    let rendered = match cli.format {
        OutputFormat::Csv => render_csv(&trajectory),
        OutputFormat::Json => render_json(&trajectory)?,
    };

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &rendered).map_err(|source| CliError::OutputWrite {
                path: path.clone(),
                source,
            })?;
            println!("✓ Wrote {} samples to {}", trajectory.len(), path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

fn render_csv(trajectory: &Trajectory) -> String {
    let mut csv = String::from("time_s,position_m,velocity_mps\n");
    for (t, state) in trajectory.iter() {
        csv.push_str(&format!("{},{},{}\n", t, state.position, state.velocity));
    }
    csv
}

fn render_json(trajectory: &Trajectory) -> Result<String, CliError> {
    let mut json = serde_json::to_string_pretty(trajectory)
        .map_err(|source| CliError::Encode { source })?;
    json.push('\n');
    Ok(json)
}

fn report_failure(err: &CliError) {
    eprintln!("error: {}", err);
    if let CliError::Sim(sim) = err {
        if let Some((t, state)) = sim.last_reached() {
            eprintln!("  furthest reached: t = {:.6} s, state = {:?}", t, state);
        }
    }
}
