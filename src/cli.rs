//! Clap adapter for the `udl` binary.
//!
//! Compiled only when the `clap` Cargo feature is enabled (on by default). The
//! only bridge to the core is [`Cli::into_invocation()`], which turns the
//! parsed command line into an [`Invocation`](crate::Invocation); the library
//! itself never depends on clap.

use clap::Parser;

use crate::types::Invocation;

/// Apply UDL_* environment directives to config files, then run COMMAND.
///
/// Directives are read from the environment, never from arguments. Everything
/// after the options is the program to run and its arguments, passed through
/// untouched.
#[derive(Debug, Parser)]
#[command(name = "udl", version)]
pub struct Cli {
    /// Program to run once configuration is in place, followed by its arguments.
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<String>,
}

impl Cli {
    /// The program to run, if one was given.
    pub fn into_invocation(self) -> Option<Invocation> {
        let mut parts = self.command.into_iter();
        let program = parts.next()?;
        Some(Invocation {
            program,
            args: parts.collect(),
        })
    }
}
