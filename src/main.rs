//! Layered manifest CLI
//!
//! Entry point for the `layered-manifest` command-line tool.

use clap::{Parser, Subcommand};
use layered_manifest::{document_to_json, BuildSystem, LayeredManifest};
use serde::Serialize;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "layered-manifest")]
#[command(about = "Inspect and patch a layered project manifest", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the merged manifest view
    Show {
        /// Path to the manifest file (default: project.toml)
        #[arg(long, short = 'm', default_value = "project.toml")]
        manifest: PathBuf,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Check that the manifest and any override file parse and merge cleanly
    Check {
        /// Path to the manifest file (default: project.toml)
        #[arg(long, short = 'm', default_value = "project.toml")]
        manifest: PathBuf,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Stage a build-system declaration and save the manifest
    SetBuildSystem {
        /// Path to the manifest file (default: project.toml)
        #[arg(long, short = 'm', default_value = "project.toml")]
        manifest: PathBuf,

        /// Requirements for the build backend (comma-separated)
        #[arg(long, short = 'r', value_delimiter = ',')]
        requires: Vec<String>,

        /// Build backend identifier
        #[arg(long, short = 'b')]
        backend: String,
    },
}

/// Report emitted by `check`.
#[derive(Serialize)]
struct CheckReport {
    manifest: String,
    override_present: bool,
    top_level_keys: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    build_system: Option<BuildSystem>,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Show { manifest, json } => {
            run_show(manifest, json);
        }
        Commands::Check { manifest, json } => {
            run_check(manifest, json);
        }
        Commands::SetBuildSystem {
            manifest,
            requires,
            backend,
        } => {
            run_set_build_system(manifest, requires, backend);
        }
    }
}

fn run_show(path: PathBuf, json_output: bool) {
    let mut manifest = LayeredManifest::new(path);

    let data = match manifest.data() {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error loading manifest: {}", e);
            process::exit(1);
        }
    };

    if json_output {
        match serde_json::to_string_pretty(&document_to_json(data)) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        print!("{}", data);
    }
}

fn run_check(path: PathBuf, json_output: bool) {
    let mut manifest = LayeredManifest::new(path);
    let override_present = manifest.override_file().exists();

    let (top_level_keys, build_system) = match manifest.data() {
        Ok(data) => (data.as_table().len(), BuildSystem::from_document(data)),
        Err(e) => {
            eprintln!("Manifest error: {}", e);
            process::exit(1);
        }
    };

    let report = CheckReport {
        manifest: manifest.file().path().display().to_string(),
        override_present,
        top_level_keys,
        build_system,
    };

    if json_output {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                process::exit(1);
            }
        }
    } else {
        println!("Manifest valid: {}", report.manifest);
        println!();
        println!("  Top-level keys: {}", report.top_level_keys);
        println!(
            "  Override file: {}",
            if report.override_present { "present" } else { "absent" }
        );
        if let Some(ref build_system) = report.build_system {
            println!("  Build backend: {}", build_system.build_backend);
            println!("  Build requires: {}", build_system.requires.join(", "));
        }
    }
}

fn run_set_build_system(path: PathBuf, requires: Vec<String>, backend: String) {
    let mut manifest = LayeredManifest::new(path);
    manifest.set_build_system(BuildSystem::new(requires, backend));

    if let Err(e) = manifest.save() {
        eprintln!("Error saving manifest: {}", e);
        process::exit(1);
    }

    println!("Updated {}", manifest.file().path().display());
}
