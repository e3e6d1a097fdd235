use std::env;
use std::path::PathBuf;

/// Default API port for `--serve`.
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug)]
pub struct CliOptions {
    pub scenario: Option<PathBuf>,
    pub preset: Option<String>,
    pub seed: Option<u64>,
    pub hours: Option<f64>,
    pub no_noise: bool,
    pub telemetry_out: Option<PathBuf>,
    pub json: bool,
    pub log_json: bool,
    pub serve: bool,
    pub port: u16,
}

/// Outcome of argument parsing.
#[derive(Debug)]
pub enum Command {
    Run(CliOptions),
    Help,
}

pub fn parse_args() -> Result<Command, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_options(&args)
}

fn parse_options(args: &[String]) -> Result<Command, String> {
    let mut i = 0usize;
    let mut scenario = None;
    let mut preset = None;
    let mut seed = None;
    let mut hours = None;
    let mut no_noise = false;
    let mut telemetry_out = None;
    let mut json = false;
    let mut log_json = false;
    let mut serve = false;
    let mut port = DEFAULT_PORT;

    while i < args.len() {
        match args[i].as_str() {
            "--scenario" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --scenario (expected a TOML file path)",
                )?;
                if scenario.replace(PathBuf::from(path)).is_some() {
                    return Err("--scenario provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name =
                    args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--seed" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --seed (expected a u64)")?;
                let value = raw
                    .parse::<u64>()
                    .map_err(|_| format!("--seed value \"{raw}\" is not a valid u64"))?;
                seed = Some(value);
            }
            "--hours" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --hours (expected a number)")?;
                let value = raw
                    .parse::<f64>()
                    .map_err(|_| format!("--hours value \"{raw}\" is not a number"))?;
                hours = Some(value);
            }
            "--no-noise" => no_noise = true,
            "--telemetry-out" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --telemetry-out (expected a file path)",
                )?;
                if telemetry_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--telemetry-out provided more than once".to_string());
                }
            }
            "--json" => json = true,
            "--log-json" => log_json = true,
            "--serve" => serve = true,
            "--port" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port (expected a u16)")?;
                port = raw
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
            }
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if scenario.is_some() && preset.is_some() {
        return Err(
            "arguments `--scenario` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    Ok(Command::Run(CliOptions {
        scenario,
        preset,
        seed,
        hours,
        no_noise,
        telemetry_out,
        json,
        log_json,
        serve,
        port,
    }))
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("solar-sim: residential solar-plus-battery simulator");
    eprintln!();
    eprintln!("Usage: solar-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset (seoul_summer, seoul_winter, no_battery)");
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --hours <f64>            Override simulated duration");
    eprintln!("  --no-noise               Disable sensor noise");
    eprintln!("  --telemetry-out <path>   Export step results to CSV");
    eprintln!("  --json                   Print one device payload JSON per step");
    eprintln!("  --log-json               Emit logs as JSON lines on stderr");
    eprintln!("  --serve                  Start REST API server after simulation (api feature)");
    eprintln!("  --port <u16>             API server port (default: {DEFAULT_PORT})");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the seoul_summer preset is used.");
}
