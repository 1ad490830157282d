//! Cerata CLI: the command-line interface of the Cerata hardware generator.
//!
//! Provides `cerata init` for project scaffolding, `cerata check` for
//! validating a design description, `cerata flatten` for inspecting types,
//! and `cerata generate` for emitting VHDL and DOT.

#![warn(missing_docs)]

mod check;
mod flatten;
mod generate;
mod init;
mod pipeline;

use std::io::IsTerminal;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// Cerata: typed hardware graphs lowered to VHDL.
#[derive(Parser, Debug)]
#[command(name = "cerata", version, about = "Cerata hardware generator")]
pub struct Cli {
    /// Only print errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log elaboration and generation steps.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// When to color diagnostics.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `cerata.toml` file or the directory holding one.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands of `cerata`.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new Cerata project.
    Init {
        /// Directory to create. Defaults to the current directory.
        name: Option<String>,
    },
    /// Elaborate the design and report diagnostics.
    Check(CheckArgs),
    /// Print the flattened form of a declared type.
    Flatten(FlattenArgs),
    /// Generate VHDL and DOT for the design.
    Generate(GenerateArgs),
}

/// Arguments for the `cerata check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// How to print the diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `cerata flatten` subcommand.
#[derive(Parser, Debug)]
pub struct FlattenArgs {
    /// Name of the type.
    #[arg(value_name = "TYPE")]
    pub ty: String,
}

/// Arguments for the `cerata generate` subcommand.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Output directory, overriding `output.dir`.
    #[arg(short, long)]
    pub out: Option<String>,

    /// Skip the DOT graph even if `output.dot` is set.
    #[arg(long)]
    pub no_dot: bool,

    /// Run the stream profiling pass even if `profile.enabled` is unset.
    #[arg(long)]
    pub profile: bool,
}

/// Values of `--color`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when stderr is a terminal.
    Auto,
    /// Color even when not writing to a terminal.
    Always,
    /// Plain text only.
    Never,
}

/// Diagnostic output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Rendered for a terminal.
    Text,
    /// A JSON array on stdout.
    Json,
}

/// Flags shared by every subcommand, resolved.
pub struct GlobalArgs {
    /// `--quiet`.
    pub quiet: bool,
    /// `--verbose`.
    pub verbose: bool,
    /// Resolved `--color`.
    pub color: bool,
    /// `--config`, if given.
    pub config: Option<String>,
}

impl GlobalArgs {
    /// The log level selected by `--quiet` and `--verbose`.
    pub fn log_level(&self) -> log::LevelFilter {
        if self.quiet {
            log::LevelFilter::Error
        } else if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    env_logger::Builder::new()
        .format_timestamp(None)
        .filter_level(global.log_level())
        .write_style(if color {
            env_logger::WriteStyle::Always
        } else {
            env_logger::WriteStyle::Never
        })
        .target(env_logger::Target::Stderr)
        .init();

    let result = match cli.command {
        Command::Init { name } => init::run(name),
        Command::Check(ref args) => check::run(args, &global),
        Command::Flatten(ref args) => flatten::run(args, &global),
        Command::Generate(ref args) => generate::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_init_default() {
        let cli = Cli::parse_from(["cerata", "init"]);
        match cli.command {
            Command::Init { name } => assert!(name.is_none()),
            _ => panic!("expected Init command"),
        }
    }

    #[test]
    fn parse_init_with_name() {
        let cli = Cli::parse_from(["cerata", "init", "typeconv"]);
        match cli.command {
            Command::Init { name } => assert_eq!(name.as_deref(), Some("typeconv")),
            _ => panic!("expected Init command"),
        }
    }

    #[test]
    fn parse_check_default() {
        let cli = Cli::parse_from(["cerata", "check"]);
        match cli.command {
            Command::Check(ref args) => assert_eq!(args.format, ReportFormat::Text),
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_check_json() {
        let cli = Cli::parse_from(["cerata", "check", "--format", "json"]);
        match cli.command {
            Command::Check(ref args) => assert_eq!(args.format, ReportFormat::Json),
            _ => panic!("expected Check command"),
        }
    }

    #[test]
    fn parse_flatten() {
        let cli = Cli::parse_from(["cerata", "flatten", "rec_a"]);
        match cli.command {
            Command::Flatten(ref args) => assert_eq!(args.ty, "rec_a"),
            _ => panic!("expected Flatten command"),
        }
    }

    #[test]
    fn parse_generate_default() {
        let cli = Cli::parse_from(["cerata", "generate"]);
        match cli.command {
            Command::Generate(ref args) => {
                assert!(args.out.is_none());
                assert!(!args.no_dot);
                assert!(!args.profile);
            }
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn parse_generate_with_args() {
        let cli = Cli::parse_from([
            "cerata", "generate", "--out", "hdl", "--no-dot", "--profile",
        ]);
        match cli.command {
            Command::Generate(ref args) => {
                assert_eq!(args.out.as_deref(), Some("hdl"));
                assert!(args.no_dot);
                assert!(args.profile);
            }
            _ => panic!("expected Generate command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["cerata", "--quiet", "--color", "never", "check"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from(["cerata", "--config", "/path/to/cerata.toml", "check"]);
        assert_eq!(cli.config.as_deref(), Some("/path/to/cerata.toml"));
    }

    #[test]
    fn log_level_follows_flags() {
        let mut global = GlobalArgs {
            quiet: false,
            verbose: false,
            color: false,
            config: None,
        };
        assert_eq!(global.log_level(), log::LevelFilter::Warn);
        global.verbose = true;
        assert_eq!(global.log_level(), log::LevelFilter::Debug);
        global.quiet = true;
        assert_eq!(global.log_level(), log::LevelFilter::Error);
    }
}
