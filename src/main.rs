// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: CLI entry point for the csv2json converter.
// Author: Lukas Bower

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::Parser;
use csv2json::{convert, ConflictPolicy, ConvertOptions, OutputStyle, DEFAULT_SEPARATOR};
use env_logger::Env;
use log::{debug, LevelFilter};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to the two-column CSV input (`dotted.key,value`).
    input: PathBuf,
    /// Path for the JSON document; standard output when omitted.
    output: Option<PathBuf>,
    /// Field delimiter (a single ASCII character).
    #[arg(long, default_value_t = ',')]
    delimiter: char,
    /// Separator between key segments.
    #[arg(long, default_value_t = DEFAULT_SEPARATOR)]
    separator: char,
    /// What to do when a key descends through an existing value: fail or replace.
    #[arg(long = "on-conflict", default_value_t = ConflictPolicy::Fail)]
    on_conflict: ConflictPolicy,
    /// Emit indented JSON.
    #[arg(long, default_value_t = false)]
    pretty: bool,
    /// Enable debug logging on stderr.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Args {
    fn into_options(self) -> Result<ConvertOptions> {
        if !self.delimiter.is_ascii() {
            bail!(
                "delimiter must be a single ASCII character, got '{}'",
                self.delimiter
            );
        }
        if self.delimiter == '"' || self.delimiter == '\n' || self.delimiter == '\r' {
            bail!(
                "delimiter {:?} conflicts with CSV quoting or line breaks",
                self.delimiter
            );
        }
        Ok(ConvertOptions {
            input: self.input,
            output: self.output,
            delimiter: self.delimiter as u8,
            separator: self.separator,
            conflict: self.on_conflict,
            style: if self.pretty {
                OutputStyle::Pretty
            } else {
                OutputStyle::Compact
            },
        })
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let mut builder =
        env_logger::Builder::from_env(Env::default().default_filter_or(default_level.as_str()));
    builder.format_timestamp_millis();
    let _ = builder.try_init();
}

fn run(args: Args) -> Result<()> {
    let options = args.into_options()?;
    debug!("converting {} with {:?}", options.input.display(), options);
    convert(&options)?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("csv2json: {err}");
            ExitCode::FAILURE
        }
    }
}
