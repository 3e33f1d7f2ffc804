use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;
use crate::{caddy, php};

#[derive(Subcommand, Debug, Clone)]
pub enum PhpAction {
    /// Bind a site to an installed PHP version
    Enable { domain: String, version: String },
    /// Remove a site's PHP binding
    Disable { domain: String },
    /// Re-apply a site's current PHP binding
    Update { domain: String },
    /// Install a PHP runtime (interpreter + FPM)
    Install { version: String },
    /// Uninstall a PHP runtime
    Uninstall { version: String },
    /// List installed PHP versions
    ListInstalled,
    /// Manage PHP extensions
    #[command(subcommand)]
    Module(PhpModuleAction),
}

#[derive(Subcommand, Debug, Clone)]
pub enum PhpModuleAction {
    /// Install an extension for a PHP version
    Add { version: String, extension: String },
    /// Remove an extension from a PHP version
    Remove { version: String, extension: String },
    /// List extensions available for a PHP version
    Available { version: String },
}

impl PhpAction {
    pub fn execute(&self, config: &Config) -> Result<()> {
        match self {
            PhpAction::Enable { domain, version } => {
                let swapped = php::enable(config, domain, version)?;
                caddy::reload()?;
                if swapped {
                    println!("✅ PHP version updated to {} for site {}", version, domain);
                } else {
                    println!("✅ PHP {} enabled for site {}", version, domain);
                }
            }
            PhpAction::Disable { domain } => {
                php::disable(config, domain)?;
                caddy::reload()?;
                println!("✅ PHP disabled for site {}", domain);
            }
            PhpAction::Update { domain } => {
                let version = php::update(config, domain)?;
                caddy::reload()?;
                println!(
                    "✅ PHP {} configuration refreshed for site {}",
                    version, domain
                );
            }
            PhpAction::Install { version } => {
                php::install(config, version)?;
                println!("✅ PHP {} installed", version);
            }
            PhpAction::Uninstall { version } => {
                php::uninstall(config, version)?;
                println!("✅ PHP {} uninstalled", version);
            }
            PhpAction::ListInstalled => {
                let versions = php::list_installed(config);
                if versions.is_empty() {
                    println!("📝 No PHP versions installed");
                } else {
                    println!("🐘 Installed PHP versions:");
                    for version in versions {
                        println!("  - {}", version);
                    }
                }
            }
            PhpAction::Module(action) => action.execute(config)?,
        }

        Ok(())
    }
}

impl PhpModuleAction {
    pub fn execute(&self, _config: &Config) -> Result<()> {
        match self {
            PhpModuleAction::Add { version, extension } => {
                php::add_extension(version, extension)?;
                println!("✅ PHP extension {} installed for PHP {}", extension, version);
            }
            PhpModuleAction::Remove { version, extension } => {
                php::remove_extension(version, extension)?;
                println!("✅ PHP extension {} removed from PHP {}", extension, version);
            }
            PhpModuleAction::Available { version } => {
                let extensions = php::available_extensions(version)?;
                if extensions.is_empty() {
                    println!("📝 No available extensions found for PHP {}", version);
                } else {
                    println!("🐘 Available extensions for PHP {}:", version);
                    for name in extensions {
                        println!("  - {}", name);
                    }
                }
            }
        }

        Ok(())
    }
}
