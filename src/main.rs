//! solar-sim entry point: CLI wiring and config-driven engine construction.

mod cli;

use std::process;

use tracing::{error, info};

use cli::{CliOptions, Command};
use solar_sim::config::ScenarioConfig;
use solar_sim::error::SimError;
use solar_sim::io::export::export_csv;
use solar_sim::io::payload::{DevicePayload, PayloadContext, payloads};
use solar_sim::logging::init_tracing;
use solar_sim::sim::engine::Engine;
use solar_sim::sim::kpi::RunSummary;

/// Preset used when neither `--scenario` nor `--preset` is given.
const DEFAULT_PRESET: &str = "seoul_summer";

/// Resolves the scenario source and applies command-line overrides.
fn load_scenario(opts: &CliOptions) -> Result<ScenarioConfig, SimError> {
    let mut scenario = match (&opts.scenario, &opts.preset) {
        (Some(path), _) => ScenarioConfig::from_toml_file(path),
        (None, Some(name)) => ScenarioConfig::from_preset(name),
        (None, None) => ScenarioConfig::from_preset(DEFAULT_PRESET),
    }
    .map_err(|e| SimError::InvalidConfig(vec![e]))?;

    if let Some(seed) = opts.seed {
        scenario.simulation.seed = seed;
    }
    if let Some(hours) = opts.hours {
        scenario.simulation.hours = hours;
    }
    if opts.no_noise {
        scenario.simulation.noise = false;
    }
    Ok(scenario)
}

fn run(opts: &CliOptions) -> Result<(), SimError> {
    let scenario = load_scenario(opts)?;
    let interval_seconds = f64::from(scenario.simulation.interval_seconds);

    let mut engine = Engine::from_config(scenario)?;
    let results = engine.run()?;
    let summary = RunSummary::from_results(&results, interval_seconds);
    let payloads = payloads(&results, &PayloadContext::from_config(engine.config()));

    if opts.json {
        for p in &payloads {
            println!("{}", p.to_json()?);
        }
        eprintln!("{summary}");
    } else {
        for r in &results {
            println!("{r}");
        }
        println!("\n{summary}");
    }

    if let Some(path) = &opts.telemetry_out {
        export_csv(&results, path)?;
        info!(path = %path.display(), rows = results.len(), "telemetry written");
    }

    if opts.serve {
        serve(engine.config().clone(), summary, payloads, opts.port)?;
    }
    Ok(())
}

#[cfg(feature = "api")]
fn serve(
    scenario: ScenarioConfig,
    summary: RunSummary,
    payloads: Vec<DevicePayload>,
    port: u16,
) -> Result<(), SimError> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use solar_sim::api::{AppState, serve};

    let state = Arc::new(AppState {
        scenario,
        summary,
        payloads,
    });
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(serve(state, addr))
}

#[cfg(not(feature = "api"))]
fn serve(
    _scenario: ScenarioConfig,
    _summary: RunSummary,
    _payloads: Vec<DevicePayload>,
    _port: u16,
) -> Result<(), SimError> {
    tracing::warn!("--serve needs the `api` feature; rebuild with `--features api`");
    Ok(())
}

fn main() {
    let opts = match cli::parse_args() {
        Ok(Command::Run(opts)) => opts,
        Ok(Command::Help) => {
            cli::print_usage();
            return;
        }
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(2);
        }
    };

    init_tracing(opts.log_json);

    if let Err(e) = run(&opts) {
        error!(error = %e, "simulation failed");
        process::exit(1);
    }
}
