use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;

use multi_app::app::{AppLoader, AppRegistry, Dispatch, DispatchError, Dispatcher, FsAppLoader};
use multi_app::lifecycle::startup;

#[derive(Parser)]
#[command(name = "app-cli")]
#[command(about = "Inspect multi-app resolution without running the server", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve and activate the app for a request, printing the outcome as JSON
    Resolve {
        /// Request path
        #[arg(short, long, default_value = "/")]
        path: String,

        /// Host header
        #[arg(long, default_value = "localhost")]
        host: String,

        /// Entry-point name used as the script hint (defaults to `app.entry`)
        #[arg(short, long, conflicts_with = "exe_hint")]
        script: Option<String>,

        /// Use this executable's file name as the script hint
        #[arg(long)]
        exe_hint: bool,

        /// App pinned by an earlier routing layer
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Validate the configuration and the app tables
    Check,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = startup::load_or_default(cli.config.as_deref())?;
    let registry = Arc::new(AppRegistry::with_builtins());
    let loader: Arc<dyn AppLoader> = Arc::new(FsAppLoader::new(registry.clone()));
    let dispatcher = Dispatcher::from_config(&config, &registry, loader)?;

    match cli.command {
        Commands::Check => {
            println!("Configuration OK");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Resolve {
            path,
            host,
            script,
            exe_hint,
            bind,
        } => {
            let dispatcher = match (script, exe_hint) {
                (Some(script), _) => dispatcher.with_script_hint(script),
                (None, true) => dispatcher.with_script_hint(exe_script_name()),
                (None, false) => dispatcher,
            };

            let script_hint = dispatcher.script_hint().to_string();
            let mut ctx = dispatcher.context(&path, &host);
            let (output, code) = match dispatcher.dispatch(&mut ctx, bind.as_deref()) {
                Ok(Dispatch::Forwarded) => (
                    json!({ "outcome": "forwarded", "script_hint": script_hint, "context": ctx }),
                    ExitCode::SUCCESS,
                ),
                Ok(Dispatch::Activated { resolution, app }) => (
                    json!({
                        "outcome": "activated",
                        "script_hint": script_hint,
                        "resolution": resolution,
                        "context": ctx,
                        "app": app,
                    }),
                    ExitCode::SUCCESS,
                ),
                Err(e @ DispatchError::NotFound(_)) => (
                    json!({ "outcome": "not_found", "message": e.to_string() }),
                    ExitCode::FAILURE,
                ),
                Err(e) => return Err(e.into()),
            };

            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(code)
        }
    }
}

/// File stem of the running executable.
fn exe_script_name() -> String {
    std::env::args()
        .next()
        .map(PathBuf::from)
        .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_default()
}
