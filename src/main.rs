//! AOT native metadata extractor - command-line entry point.
//!
//! Starts an application in AOT mode, walks its container and writes the GraalVM
//! native-image configuration below the class output directory.
//!
//! # Usage
//!
//! ```bash
//! aot-native-metadata [OPTIONS] <APPLICATION_CLASS> <CLASS_OUTPUT> <GENERATED_SOURCES> <GROUP_ID> <ARTIFACT_ID> [APP_ARGS]...
//! ```
//!
//! # Examples
//!
//! Process an application described by a descriptor:
//! ```bash
//! aot-native-metadata app.yaml target/classes target/generated-sources com.example demo
//! ```
//!
//! Forward arguments to the application and enable verbose logging:
//! ```bash
//! aot-native-metadata -v app.yaml target/classes target/generated-sources com.example demo --env=prod
//! ```

use aot_native_metadata::cli;
use anyhow::Result;
use clap::Parser;
use log::{error, info};

fn main() -> Result<()> {
    // Fewer than five positionals exits here with a usage message, before any side effect
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("aot processor start, args: {:?}", std::env::args().skip(1).collect::<Vec<_>>());

    let args = cli::parse_args_from_parsed(args_for_verbose).map_err(|e| {
        error!("aot processor: {:#}", e);
        e
    })?;

    // Processing failures are logged where they happen
    cli::run(args)?;

    Ok(())
}
