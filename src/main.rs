use std::process;

use clap::Parser;
use tracing::debug;

use udl::{Cli, Launcher, Settings};

fn main() {
    let invocation = Cli::parse().into_invocation();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e.report());
            process::exit(1);
        }
    };
    udl::logging::init_logging(settings.logging_level.as_deref());

    let launcher = Launcher::builder()
        .prefixes(settings.env_prefixes.clone())
        .build();
    if let Err(e) = launcher.apply(environment()) {
        eprintln!("{}", e.report());
        process::exit(1);
    }

    let Some(invocation) = invocation else {
        debug!("No command given, exiting");
        return;
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start async runtime: {e}");
            process::exit(1);
        }
    };

    let result = runtime.block_on(udl::exec::run(
        &invocation.program,
        &invocation.args,
        settings.kill_delay(),
    ));
    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{}", e.report());
            process::exit(1);
        }
    }
}

/// Process environment, minus variables that are not valid UTF-8.
fn environment() -> Vec<(String, String)> {
    std::env::vars_os()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                debug!(env_var = ?key, "Skipping variable that is not valid UTF-8");
                None
            }
        })
        .collect()
}
