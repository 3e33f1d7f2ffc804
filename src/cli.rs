/// CLI interface and commands.

/// Site lifecycle commands.
pub mod site;

/// Per-site Caddy module commands.
pub mod module;

/// PHP runtime and extension commands.
pub mod php;

/// Backup scheduling commands.
pub mod backup;

/// Shell completion generation.
pub mod completion;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::caddy;
use crate::config::Config;

#[derive(Parser)]
#[command(name = "caddyboard")]
#[command(version)]
#[command(about = "🧰 Caddy Server Panel - manage sites, PHP runtimes, modules and backups")]
pub struct Cli {
    /// Config file overriding the default directory layout
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🌐 Manage sites (create, delete, webroot)
    #[command(subcommand)]
    Site(site::SiteAction),
    /// 📦 Manage Caddy modules for a site
    #[command(subcommand)]
    Module(module::ModuleAction),
    /// 🐘 Manage PHP runtimes, bindings and extensions
    #[command(subcommand)]
    Php(php::PhpAction),
    /// 💾 Manage scheduled backups
    #[command(subcommand)]
    Backup(backup::BackupAction),
    /// 🔧 Install Caddy and prepare the panel directory layout
    Setup,
    /// Print the panel version
    Version,
    /// Generate shell completion scripts
    Completion(completion::CompletionArgs),
}

pub fn run_setup(config: &Config) -> Result<()> {
    if caddy::setup(&config.paths)? {
        println!("✅ Caddy installed and panel directories prepared");
    } else {
        println!("Caddy is already installed");
    }

    Ok(())
}
