use anyhow::{anyhow, Result};
use clap::Subcommand;
use dialoguer::Confirm;

use crate::config::Config;
use crate::{caddy, site};

#[derive(Subcommand, Debug, Clone)]
pub enum SiteAction {
    /// Create a new site
    Create {
        /// Domain the site is served under
        domain: String,
    },
    /// Delete an existing site and its configuration
    Delete {
        domain: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Update the webroot path for a site
    Webroot {
        domain: String,
        /// Path below the site directory to serve from
        path: String,
    },
}

impl SiteAction {
    pub fn execute(&self, config: &Config) -> Result<()> {
        match self {
            SiteAction::Create { domain } => {
                site::create(&config.paths, domain)?;
                caddy::reload()?;
                println!("✅ Site {} created", domain);
            }
            SiteAction::Delete { domain, yes } => {
                if !site::exists(&config.paths, domain) {
                    return Err(anyhow!("site {} does not exist", domain));
                }

                if !*yes {
                    let confirmed = Confirm::new()
                        .with_prompt(format!(
                            "Delete site {} and all of its files?",
                            domain
                        ))
                        .default(false)
                        .interact()?;
                    if !confirmed {
                        println!("Site deletion cancelled");
                        return Ok(());
                    }
                }

                site::delete(&config.paths, domain)?;
                caddy::reload()?;
                println!("✅ Site {} deleted", domain);
            }
            SiteAction::Webroot { domain, path } => {
                let webroot = site::update_webroot(&config.paths, domain, path)?;
                caddy::reload()?;
                println!(
                    "✅ Webroot for site {} updated to {}",
                    domain,
                    webroot.display()
                );
            }
        }

        Ok(())
    }
}
