use ljsim::{Engine, Metric, Scenario, ScenarioConfig, SeriesRecorder};
use ljsim::{bench_forces, bench_verlet};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under `scenarios/`
    #[arg(short, default_value = "default.yaml")]
    file_name: String,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Samples kept per recorded series
    #[arg(long, default_value_t = 10_000)]
    history: usize,

    /// Run the force / integrator benchmarks instead of a simulation
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let file = File::open(&config_path).with_context(|| format!("opening {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig =
        serde_yaml::from_reader(reader).with_context(|| format!("parsing {}", config_path.display()))?;

    Ok(scenario_cfg)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if args.bench {
        bench_forces();
        bench_verlet();
        return Ok(());
    }

    let mut scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    if args.seed.is_some() {
        scenario_cfg.parameters.seed = args.seed;
    }

    let mut engine: Engine = Scenario::build_scenario(scenario_cfg)?.into_engine()?;
    let mut recorder = SeriesRecorder::with_capacity(args.history);

    for (phase, outcome) in engine.run(&mut recorder) {
        info!(%phase, ?outcome, "phase summary");
    }

    for metric in Metric::ALL {
        if let Some(value) = recorder.latest(metric) {
            info!(metric = metric.label(), value, "final");
        }
    }
    info!(
        ticks = engine.ticks(),
        recorded = recorder.recorded(),
        retained = recorder.len(),
        "run finished"
    );

    Ok(())
}
