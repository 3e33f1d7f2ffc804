use anyhow::Result;
use clap::Subcommand;

use crate::caddy;
use crate::config::Config;

#[derive(Subcommand, Debug, Clone)]
pub enum ModuleAction {
    /// Enable a Caddy module for a site
    Add { domain: String, module: String },
    /// Disable a Caddy module for a site
    Remove { domain: String, module: String },
    /// List active modules for a site
    List { domain: String },
    /// List modules available for enabling
    Available,
}

impl ModuleAction {
    pub fn execute(&self, config: &Config) -> Result<()> {
        match self {
            ModuleAction::Add { domain, module } => {
                crate::module::add(&config.paths, domain, module)?;
                caddy::reload()?;
                println!("✅ Module {} added to site {}", module, domain);
            }
            ModuleAction::Remove { domain, module } => {
                crate::module::remove(&config.paths, domain, module)?;
                caddy::reload()?;
                println!("✅ Module {} removed from site {}", module, domain);
            }
            ModuleAction::List { domain } => {
                let modules = crate::module::list(&config.paths, domain)?;
                if modules.is_empty() {
                    println!("📝 No active modules for site {}", domain);
                } else {
                    println!("📦 Active modules for site {}:", domain);
                    for name in modules {
                        println!("  - {}", name);
                    }
                }
            }
            ModuleAction::Available => {
                let modules = crate::module::list_available(&config.paths)?;
                if modules.is_empty() {
                    println!("📝 No available modules found");
                } else {
                    println!("📦 Available Caddy modules ({}):", modules.len());
                    for name in modules {
                        println!("  - {}", name);
                    }
                }
            }
        }

        Ok(())
    }
}
