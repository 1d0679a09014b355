//! cpct - command-line driver for the cpc compiler.
//!
//! Thin wrapper over `cpc-drv`: parses arguments, merges them with an
//! optional `cpct.toml` project config, initializes logging, and runs the
//! pipeline once per input file.

mod commands;
mod config;
mod error;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{run_build, BuildArgs};
use config::ProjectConfig;

/// Command-line driver for the cpc compiler.
#[derive(Parser, Debug)]
#[command(name = "cpct")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compiles occam-family source to Go source", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose pipeline logging.
    #[arg(short, long, global = true, env = "CPCT_VERBOSE")]
    verbose: bool,

    /// Path to a cpct.toml project config file (default: discovered automatically).
    #[arg(long, global = true, env = "CPCT_CONFIG")]
    config: Option<PathBuf>,

    /// Disable colored log output.
    #[arg(long, global = true, env = "CPCT_NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile one or more source files to Go source.
    Build(BuildCommand),
}

#[derive(Parser, Debug)]
struct BuildCommand {
    /// Source files to compile.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Where to write generated Go source (a file for one input, a directory
    /// for several; stdout if omitted and there is exactly one input).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Additional `#INCLUDE` search directory. May be given more than once.
    #[arg(short = 'I', long = "include", action = clap::ArgAction::Append)]
    include: Vec<PathBuf>,

    /// Preprocessor define, as `NAME` or `NAME=VALUE`. May be given more than once.
    #[arg(short = 'D', long = "define", action = clap::ArgAction::Append)]
    define: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.no_color)?;

    let project = load_project_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Build(args) => {
            let build_args = BuildArgs {
                inputs: args.inputs,
                output: args.output,
                search_dirs: merge_search_dirs(project.search_dirs, args.include),
                defines: merge_defines(project.defines, args.define)?,
                verbose: cli.verbose || project.verbose,
            };
            run_build(build_args).context("build failed")?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, no_color: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let subscriber = fmt::layer().with_ansi(!no_color).with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .context("failed to initialize logging")?;

    Ok(())
}

fn load_project_config(path: Option<&std::path::Path>) -> anyhow::Result<ProjectConfig> {
    let config = match path {
        Some(path) => ProjectConfig::load_from_path(path)?,
        None => ProjectConfig::load()?,
    };
    Ok(config)
}

fn merge_search_dirs(mut from_config: Vec<PathBuf>, from_cli: Vec<PathBuf>) -> Vec<PathBuf> {
    from_config.extend(from_cli);
    from_config
}

fn merge_defines(
    from_config: std::collections::BTreeMap<String, String>,
    from_cli: Vec<String>,
) -> anyhow::Result<Vec<(String, String)>> {
    let mut defines: Vec<(String, String)> = from_config.into_iter().collect();
    for raw in from_cli {
        let (name, value) = match raw.split_once('=') {
            Some((name, value)) => (name.to_string(), value.to_string()),
            None => (raw, "1".to_string()),
        };
        defines.push((name, value));
    }
    Ok(defines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_build_with_inputs() {
        let cli = Cli::parse_from(["cpct", "build", "main.occ"]);
        match cli.command {
            Commands::Build(args) => assert_eq!(args.inputs, vec![PathBuf::from("main.occ")]),
        }
    }

    #[test]
    fn parses_repeated_include_and_define_flags() {
        let cli = Cli::parse_from([
            "cpct", "build", "main.occ", "-I", "lib", "-I", "vendor", "-D", "DEBUG", "-D", "TARGET.BITS.PER.WORD=32",
        ]);
        match cli.command {
            Commands::Build(args) => {
                assert_eq!(args.include, vec![PathBuf::from("lib"), PathBuf::from("vendor")]);
                assert_eq!(args.define, vec!["DEBUG".to_string(), "TARGET.BITS.PER.WORD=32".to_string()]);
            }
        }
    }

    #[test]
    fn global_verbose_flag_is_recognized_before_subcommand() {
        let cli = Cli::parse_from(["cpct", "--verbose", "build", "main.occ"]);
        assert!(cli.verbose);
    }

    #[test]
    fn define_without_equals_defaults_value_to_one() {
        let defines = merge_defines(Default::default(), vec!["DEBUG".to_string()]).unwrap();
        assert_eq!(defines, vec![("DEBUG".to_string(), "1".to_string())]);
    }

    #[test]
    fn define_with_equals_splits_name_and_value() {
        let defines = merge_defines(Default::default(), vec!["BITS=32".to_string()]).unwrap();
        assert_eq!(defines, vec![("BITS".to_string(), "32".to_string())]);
    }
}
