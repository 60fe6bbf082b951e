//! This module defines the command line arguments we accept.

use clap::{Parser, Subcommand, ValueEnum};
use std::{io::IsTerminal, path::PathBuf};
use termcolor::ColorChoice;


#[derive(Debug, Parser)]
#[command(about = "GraphQL API serving in-memory todos and users.", version)]
pub(crate) struct Args {
    /// Whether to use colors in the terminal output.
    #[arg(long, value_enum, default_value_t = ColorOption::Auto, global = true)]
    pub(crate) color: ColorOption,

    #[command(subcommand)]
    pub(crate) cmd: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Starts the HTTP server serving the GraphQL API.
    Serve {
        #[command(flatten)]
        shared: Shared,
    },

    /// Checks the config, the seed data and whether the configured address
    /// can be bound to.
    ///
    /// Exits with 0 if everything is Ok, and with 1 otherwise.
    Check {
        #[command(flatten)]
        shared: Shared,
    },

    /// Outputs a template for the configuration file (which includes
    /// descriptions of all options).
    WriteConfig {
        /// Target file. If not specified, the template is written to stdout.
        target: Option<PathBuf>,
    },

    /// Exports the API as GraphQL schema.
    ExportApiSchema {
        /// Target file. If not specified, the schema is written to stdout.
        target: Option<PathBuf>,
    },
}

impl Command {
    /// Short name of the command, used for the log file name.
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Serve { .. } => "serve",
            Self::Check { .. } => "check",
            Self::WriteConfig { .. } => "write-config",
            Self::ExportApiSchema { .. } => "export-api-schema",
        }
    }
}

#[derive(Debug, clap::Args)]
pub(crate) struct Shared {
    /// Path to the configuration file. If this is not specified, we try
    /// `$TODO_API_CONFIG_PATH`, `config.toml` and `/etc/todo-api/config.toml`,
    /// and fall back to the default configuration.
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ColorOption {
    Auto,
    Always,
    Never,
}

impl Args {
    pub(crate) fn stdout_color(&self) -> ColorChoice {
        self.color.resolve(std::io::stdout().is_terminal())
    }

    pub(crate) fn stderr_color(&self) -> ColorChoice {
        self.color.resolve(std::io::stderr().is_terminal())
    }
}

impl ColorOption {
    fn resolve(self, is_terminal: bool) -> ColorChoice {
        match self {
            Self::Always => ColorChoice::Always,
            Self::Never => ColorChoice::Never,
            Self::Auto if is_terminal => ColorChoice::Auto,
            Self::Auto => ColorChoice::Never,
        }
    }
}


#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use std::path::PathBuf;

    use super::{Args, ColorOption, Command};

    #[test]
    fn verify_cli() {
        Args::command().debug_assert();
    }

    #[test]
    fn parse_serve() {
        let args = Args::try_parse_from(["todo-api", "serve", "-c", "dev.toml", "--color", "never"])
            .unwrap();
        assert_eq!(args.color, ColorOption::Never);
        match args.cmd {
            Command::Serve { shared } => assert_eq!(shared.config, Some(PathBuf::from("dev.toml"))),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn command_required() {
        Args::try_parse_from(["todo-api"]).unwrap_err();
    }
}
