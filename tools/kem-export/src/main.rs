//! kem-export - KEM model export tool
//!
//! Converts OBJ/glTF/GLB meshes into `.kem` binary model containers and
//! inspects existing containers.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

// Use modules from library
use kem_export::{KEM_EXTENSION, inspect, manifest, mesh};

#[derive(Parser)]
#[command(name = "kem-export")]
#[command(about = "KEM model export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build models from a manifest file
    Build {
        /// Path to kem.toml manifest
        #[arg(default_value = "kem.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate manifest without building
    Check {
        /// Path to kem.toml manifest
        #[arg(default_value = "kem.toml")]
        manifest: PathBuf,
    },

    /// Export mesh files into one container
    Mesh {
        /// Input mesh files (OBJ/glTF/GLB), exported in order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output .kem file (default: first input with .kem extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the structure of a .kem file
    Inspect {
        /// Input .kem file
        input: PathBuf,

        /// Decode and list every mesh
        #[arg(long)]
        meshes: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            manifest,
            output,
            verbose,
        } => {
            if verbose {
                tracing::info!("Building models from {:?}", manifest);
            }
            let config = manifest::load_manifest(&manifest)?;
            manifest::build_all(&config, output.as_deref())?;
            tracing::info!("Build complete!");
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            manifest::validate(&config)?;
            tracing::info!("Manifest is valid!");
        }

        Commands::Mesh { inputs, output } => {
            let output = match output {
                Some(output) => output,
                None => inputs[0].with_extension(KEM_EXTENSION),
            };
            tracing::info!("Converting {:?} -> {:?}", inputs, output);
            mesh::convert(&inputs, &output)?;
            tracing::info!("Done!");
        }

        Commands::Inspect { input, meshes } => {
            inspect::inspect(&input, meshes)?;
        }
    }

    Ok(())
}
