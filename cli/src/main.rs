//! svcprof CLI: driving adapter for the route match compiler.
//!
//! Subcommands:
//! - `check <file>`: convert every route, report the first error
//! - `convert <file>`: print the converted routes as JSON

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use svcprof::prelude::*;
use tracing_subscriber::EnvFilter;

/// Validate and convert service-profile route matches.
#[derive(Parser, Debug)]
#[command(name = "svcprof", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert every route and report the first error, if any.
    Check {
        #[command(flatten)]
        input: InputArgs,

        /// Also compile every path pattern as a regular expression.
        #[arg(long)]
        compile_paths: bool,
    },

    /// Print the converted routes as JSON.
    Convert {
        #[command(flatten)]
        input: InputArgs,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Route document (YAML, or JSON with a `.json` extension).
    file: PathBuf,

    /// Reject method names that are not registered HTTP methods.
    #[arg(long)]
    strict_methods: bool,

    /// Maximum nesting depth of any match tree.
    #[arg(long, default_value_t = svcprof::MAX_DEPTH)]
    max_depth: usize,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read \"{path}\": {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("route {index} (\"{name}\"): {source}")]
    Route {
        index: usize,
        name: String,
        source: ProfileError,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Check {
            input,
            compile_paths,
        } => cmd_check(&input, compile_paths),
        Command::Convert { input, pretty } => cmd_convert(&input, pretty),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_check(input: &InputArgs, compile_paths: bool) -> Result<(), CliError> {
    let profile = load_profile(&input.file)?;
    let routes = convert_profile(&profile, input)?;

    if compile_paths {
        check_paths(&profile, &routes)?;
    }

    println!("ok: {} route(s)", routes.len());
    Ok(())
}

fn cmd_convert(input: &InputArgs, pretty: bool) -> Result<(), CliError> {
    let profile = load_profile(&input.file)?;
    let routes = convert_profile(&profile, input)?;

    let json = if pretty {
        serde_json::to_string_pretty(&routes)?
    } else {
        serde_json::to_string(&routes)?
    };
    println!("{json}");
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Conversion (composition root)
// ═══════════════════════════════════════════════════════════════════════════════

fn build_converter(input: &InputArgs) -> Converter<Box<dyn MethodResolver>> {
    let resolver: Box<dyn MethodResolver> = if input.strict_methods {
        Box::new(RegisteredOnly)
    } else {
        Box::new(StandardMethods)
    };
    Converter::new(resolver).with_max_depth(input.max_depth)
}

/// Convert routes one by one so the error can name the failing route.
fn convert_profile(profile: &ProfileSpec, input: &InputArgs) -> Result<Vec<Route>, CliError> {
    let converter = build_converter(input);
    tracing::info!(
        routes = profile.routes.len(),
        strict_methods = input.strict_methods,
        max_depth = input.max_depth,
        "converting profile"
    );

    profile
        .routes
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            converter.route(spec).map_err(|source| CliError::Route {
                index,
                name: spec.name.clone(),
                source,
            })
        })
        .collect()
}

fn check_paths(profile: &ProfileSpec, routes: &[Route]) -> Result<(), CliError> {
    for (index, (spec, route)) in profile.routes.iter().zip(routes).enumerate() {
        for path in route.condition.paths() {
            path.compile().map_err(|source| CliError::Route {
                index,
                name: spec.name.clone(),
                source,
            })?;
        }
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Document loading
// ═══════════════════════════════════════════════════════════════════════════════

fn load_profile(path: &Path) -> Result<ProfileSpec, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_profile(&content, is_json(path))
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn parse_profile(content: &str, json: bool) -> Result<ProfileSpec, CliError> {
    if json {
        Ok(serde_json::from_str(content)?)
    } else {
        // Default to YAML (handles .yaml and .yml)
        Ok(serde_yaml::from_str(content)?)
    }
}
