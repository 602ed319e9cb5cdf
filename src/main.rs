use autoreducer::LogLevel;
use autoreducer::core::config::{self, CliOverrides};
use autoreducer::core::script;
use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "autoreducer", about = "Replay a dispatch script against an auto reducer")]
struct Args {
    /// Script to replay (.json or .toml)
    script: PathBuf,

    /// Log verbosity
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,

    /// Log file path
    #[arg(long)]
    log_file: Option<String>,

    /// Print snapshots on one line each
    #[arg(long)]
    compact: bool,

    /// Run an update pass after every step
    #[arg(long)]
    flush_each_step: bool,

    /// Do not register the `reset` and `merge` actions
    #[arg(long)]
    no_builtins: bool,
}

impl From<&Args> for CliOverrides {
    fn from(args: &Args) -> Self {
        CliOverrides {
            log_level: args.log_level,
            log_file: args.log_file.clone(),
            compact: args.compact,
            flush_each_step: args.flush_each_step,
            no_builtins: args.no_builtins,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = config::load_config()?;
    let resolved = config::resolve(&file_config, &CliOverrides::from(&args));

    // Initialize file logger
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level.filter(), log_config, log_file);
    }

    log::info!("autoreducer starting with script: {}", args.script.display());

    let script = script::load_script(&args.script)?;
    let snapshots = script::run(&script, &resolved.run_options())?;

    for snapshot in &snapshots {
        let rendered = if resolved.pretty {
            serde_json::to_string_pretty(snapshot)?
        } else {
            serde_json::to_string(snapshot)?
        };
        println!("{rendered}");
    }

    Ok(())
}
