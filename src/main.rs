// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! tether CLI - inspect CommonJS module resolution from the command line
//!
//! No script engine is linked in; the commands drive the resolver chain and
//! the path service directly.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tether_modules::module_system::CoreModules;
use tether_modules::runtime::default_chain;
use tether_modules::{ParsedPath, PathFlavor, RuntimeConfig, VERSION};

#[derive(Parser)]
#[command(
    name = "tether",
    about = "CommonJS module resolution for embedded script runtimes",
    version = VERSION,
    author = "Pegasus Heavy Industries"
)]
struct Cli {
    /// Enable verbose logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Read configuration from this file instead of the default locations
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a module identifier to its canonical identity
    Resolve {
        /// Module identifier, e.g. `./lib/util` or `lodash`
        id: String,

        /// Directory the identifier is requested from
        #[arg(long, default_value = ".")]
        wd: PathBuf,
    },

    /// Print the source of a module
    Load {
        /// Module identifier
        id: String,
    },

    /// Run a path service operation
    Path {
        /// `posix` or `win32`
        flavor: PathFlavor,

        /// basename, dirname, extname, isAbsolute, normalize, parse or format
        op: String,

        /// Operation arguments (`format` takes a JSON object)
        args: Vec<String>,
    },

    /// List the embedded core modules
    Core,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("tether=debug,tether_modules=debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("tether=warn,tether_modules=warn")
            .with_writer(std::io::stderr)
            .init();
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => RuntimeConfig::from_file(path)?,
        None => RuntimeConfig::load()?,
    };

    match cli.command {
        Command::Resolve { id, wd } => {
            let chain = default_chain(&config, CoreModules::builtin())?;
            println!("{}", chain.resolve(&id, &wd)?);
        }
        Command::Load { id } => {
            let chain = default_chain(&config, CoreModules::builtin())?;
            let source = chain.load(&id)?;
            std::io::stdout()
                .write_all(&source)
                .context("failed to write module source")?;
        }
        Command::Path { flavor, op, args } => println!("{}", path_op(flavor, &op, &args)?),
        Command::Core => {
            for key in CoreModules::builtin().keys() {
                println!("{}", key.cyan());
            }
        }
    }
    Ok(())
}

fn path_op(flavor: PathFlavor, op: &str, args: &[String]) -> anyhow::Result<String> {
    let path = || {
        args.first()
            .map(String::as_str)
            .with_context(|| format!("{} requires a path argument", op))
    };

    Ok(match op {
        "basename" => flavor.basename(path()?, args.get(1).map(String::as_str)),
        "dirname" => flavor.dirname(path()?),
        "extname" => flavor.extname(path()?),
        "isAbsolute" | "is-absolute" => flavor.is_absolute(path()?).to_string(),
        "normalize" => flavor.normalize(path()?),
        "parse" => serde_json::to_string_pretty(&flavor.parse(path()?))?,
        "format" => {
            let parsed: ParsedPath =
                serde_json::from_str(path()?).context("format expects a JSON path object")?;
            flavor.format(&parsed)
        }
        other => bail!("unknown path operation '{}'", other),
    })
}
