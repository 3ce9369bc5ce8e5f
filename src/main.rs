// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "framesift")]
#[command(about = "Per-frame filter pipeline for forensic frame review")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a preset to a still image
    Apply {
        /// Input image file
        #[arg(short, long)]
        input: PathBuf,

        /// Output image file (default: <input>_filtered.png)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Preset file to apply (default: neutral preset)
        #[arg(short, long)]
        preset: Option<PathBuf>,

        /// Named filter to apply first (Original, DocumentEnhancer, ColorHistogram)
        #[arg(short, long, default_value = "Original")]
        filter: String,

        /// Crop the result back to the input dimensions
        #[arg(long)]
        clamp: bool,
    },

    /// Capture a still image into the gallery with a preset snapshot
    Capture {
        /// Input image file
        #[arg(short, long)]
        input: PathBuf,

        /// Preset file frozen into the gallery entry (default: neutral)
        #[arg(short, long)]
        preset: Option<PathBuf>,

        /// Gallery root directory (default: application data directory)
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Inspect or edit the capture gallery
    Gallery {
        #[command(subcommand)]
        command: GalleryCommands,

        /// Gallery root directory (default: application data directory)
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Manage preset files
    Preset {
        #[command(subcommand)]
        command: PresetCommands,
    },
}

#[derive(Subcommand)]
enum GalleryCommands {
    /// List gallery entries
    List,

    /// Remove the entry at a position
    Remove {
        /// Position in the gallery listing
        position: usize,
    },

    /// Remove every entry
    Clear,
}

#[derive(Subcommand)]
enum PresetCommands {
    /// Write a neutral preset file
    Init {
        /// Output file (default: the application-private preset location)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the decoded contents of a preset file
    Show {
        /// Preset file
        file: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=framesift=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Apply {
            input,
            output,
            preset,
            filter,
            clamp,
        } => cli::apply(input, output, preset, &filter, clamp),
        Commands::Capture {
            input,
            preset,
            root,
        } => cli::capture(input, preset, root),
        Commands::Gallery { command, root } => match command {
            GalleryCommands::List => cli::gallery_list(root),
            GalleryCommands::Remove { position } => cli::gallery_remove(root, position),
            GalleryCommands::Clear => cli::gallery_clear(root),
        },
        Commands::Preset { command } => match command {
            PresetCommands::Init { output } => cli::preset_init(output),
            PresetCommands::Show { file } => cli::preset_show(file),
        },
    }
}
