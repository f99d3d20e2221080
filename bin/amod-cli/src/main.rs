// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # amod
//!
//! Command-line tooling for analytics module specifications.
//!
//! ## Usage
//! ```bash
//! # Print module metadata and method signatures
//! amod inspect --spec ./specification.json
//!
//! # Parse a type string, optionally checking a wire value against it
//! amod check-type "ndarray/uint8///3" --value "file:///data/image.png"
//!
//! # Decode a wire value and describe it
//! amod decode --type "[numeric/float]" "0.2,0.7,0.1"
//!
//! # Encode a JSON value or a raw file to its wire form
//! amod encode --type "ndarray/uint8//" --file mask.png
//!
//! # Replay the specification's test cases against the bundled demo method
//! amod test --spec ./specification.json --test-data ./testdata
//! ```

mod commands;
mod demo;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "amod",
    about = "Type specifications, wire codec and test replay for analytics modules",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file (CLI arguments override it).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print module metadata, method signatures and output categories.
    Inspect {
        /// Path to the specification document.
        #[arg(short, long)]
        spec: Option<PathBuf>,
    },

    /// Parse a type string and print its canonical form.
    CheckType {
        /// The type string, e.g. "ndarray/float32/3/".
        type_spec: String,

        /// A wire value to decode and validate against the type.
        #[arg(long)]
        value: Option<String>,
    },

    /// Decode a wire value and describe the native result.
    Decode {
        /// The slot type string.
        #[arg(short = 't', long = "type")]
        type_spec: String,

        /// The wire value (data URL, http(s):// or file:// reference, literal).
        wire: String,

        /// Fetch timeout in milliseconds.
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Encode a JSON value or raw file contents to the wire form.
    Encode {
        /// The slot type string.
        #[arg(short = 't', long = "type")]
        type_spec: String,

        /// The value as JSON (numbers, strings, arrays, data URLs).
        #[arg(long, conflicts_with = "file")]
        json: Option<String>,

        /// A raw image, .npy or .npz file.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Emit .npz instead of .npy for non-image arrays.
        #[arg(long)]
        npz: bool,
    },

    /// Replay the specification's test cases against the bundled
    /// bright-pixel segmentation method.
    Test {
        /// Path to the specification document.
        #[arg(short, long)]
        spec: Option<PathBuf>,

        /// Directory that test-case filenames are resolved against.
        #[arg(short = 'd', long)]
        test_data: Option<PathBuf>,

        /// The method to replay.
        #[arg(short, long, default_value = "process")]
        method: String,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose);

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Inspect { spec } => commands::inspect::execute(config, spec).await,
        Commands::CheckType { type_spec, value } => {
            commands::check_type::execute(config, type_spec, value).await
        }
        Commands::Decode {
            type_spec,
            wire,
            timeout_ms,
        } => commands::codec::decode(config, type_spec, wire, timeout_ms).await,
        Commands::Encode {
            type_spec,
            json,
            file,
            npz,
        } => commands::codec::encode(config, type_spec, json, file, npz).await,
        Commands::Test {
            spec,
            test_data,
            method,
            json,
        } => commands::test::execute(config, spec, test_data, method, json).await,
    }
}
