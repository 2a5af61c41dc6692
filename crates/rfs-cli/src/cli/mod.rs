//! CLI for the RFS remote file service.

mod commands;
mod hooks;
mod terminal;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use rfs_core::config;
use std::path::PathBuf;

use commands::{run_checksum, run_fetch, run_module, run_subject_file, run_update};

/// Top-level CLI for the RFS remote file service.
#[derive(Debug, Parser)]
#[command(name = "rfs", version)]
#[command(about = "RFS: fetch files, modules and updates with progress and post-processing", long_about = None)]
pub struct Cli {
    /// Debug-level logging (RUST_LOG still wins).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Where to save and what to call a download.
#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Destination file, or an existing directory to save into (default: current directory).
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Title shown in progress output (default: derived from the URL).
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download a file, optionally skipping it when a checksum already matches.
    Fetch {
        /// Direct HTTP/HTTPS URL to download.
        url: String,

        #[command(flatten)]
        out: OutputArgs,

        /// Expected MD5 (hex); an existing matching file is not downloaded again.
        #[arg(long, value_name = "HEX", conflicts_with = "sha256")]
        md5: Option<String>,

        /// Expected SHA-256 (hex); an existing matching file is not downloaded again.
        #[arg(long, value_name = "HEX")]
        sha256: Option<String>,
    },

    /// Download a module archive and repackage it as an installable zip.
    Module {
        /// URL of the module archive (e.g. a repository zipball).
        url: String,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Download an update package and hand it to an installer program.
    Update {
        /// URL of the update package.
        url: String,

        /// Version being installed (for logs and the subject identity).
        #[arg(long = "version", value_name = "VERSION")]
        target_version: String,

        /// Program run as `<program> <package path>` once the package is written.
        #[arg(long, value_name = "PROGRAM")]
        apply: String,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Run the download described by a subject TOML file.
    Run {
        /// Path to the subject file.
        path: PathBuf,
    },

    /// Print the checksum of a file (SHA-256 unless --md5).
    Checksum {
        /// Path to the file.
        path: PathBuf,

        /// Use MD5 instead of SHA-256.
        #[arg(long)]
        md5: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match self.command {
            CliCommand::Fetch {
                url,
                out,
                md5,
                sha256,
            } => run_fetch(&cfg, &url, out, md5, sha256).await?,
            CliCommand::Module { url, out } => run_module(&cfg, &url, out).await?,
            CliCommand::Update {
                url,
                target_version,
                apply,
                out,
            } => run_update(&cfg, &url, &target_version, apply, out).await?,
            CliCommand::Run { path } => run_subject_file(&cfg, &path).await?,
            CliCommand::Checksum { path, md5 } => run_checksum(&path, md5).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
