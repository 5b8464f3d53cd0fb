use clap::Parser;
use currency_input::replay::{self, Script};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Filter directives for the engine's log targets, e.g. `debug` or
/// `input.handler=trace`.
const LOG_ENV: &str = "CURRENCY_MASK_LOG";

/// Replay masked numeric input scenarios and print every committed state.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Compare each replay against the script's `expected` lines.
    #[arg(long)]
    check: bool,

    /// TOML scenario scripts.
    #[arg(required = true)]
    scenarios: Vec<PathBuf>,
}

fn init_logging() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::OFF.into())
        .with_env_var(LOG_ENV)
        .from_env()?;
    // `log` records from the library crates are bridged into the subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| format!("failed to install logger: {err}"))?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging()?;

    let show_headers = cli.scenarios.len() > 1;
    for scenario in &cli.scenarios {
        let path = scenario.display();
        let content =
            fs::read_to_string(scenario).map_err(|err| format!("failed to read {path}: {err}"))?;
        let script = Script::from_toml_str(&content).map_err(|err| format!("{path}: {err}"))?;
        log::debug!(target: "currency_mask", "{path}: {} steps", script.steps.len());

        let lines = if cli.check {
            replay::check(&script).map_err(|err| format!("{path}: {err}"))?
        } else {
            replay::run(&script).map_err(|err| format!("{path}: {err}"))?
        };
        if show_headers {
            println!("# {path}");
        }
        for line in lines {
            println!("{line}");
        }
    }
    Ok(())
}
