use anyhow::Result;
use clap::Subcommand;

use crate::backup;
use crate::config::Config;

#[derive(Subcommand, Debug, Clone)]
pub enum BackupAction {
    /// Site backup schedules
    #[command(subcommand)]
    Site(SiteBackupAction),
    /// Database backup schedules
    #[command(subcommand)]
    Database(DatabaseBackupAction),
}

#[derive(Subcommand, Debug, Clone)]
pub enum SiteBackupAction {
    /// Enable daily and weekly backups for a site
    Enable { domain: String },
    /// Disable backups for a site
    Disable { domain: String },
}

#[derive(Subcommand, Debug, Clone)]
pub enum DatabaseBackupAction {
    /// Enable daily and weekly database dumps
    Enable,
    /// Disable database dumps
    Disable,
}

impl BackupAction {
    pub fn execute(&self, config: &Config) -> Result<()> {
        match self {
            BackupAction::Site(action) => action.execute(config),
            BackupAction::Database(action) => action.execute(config),
        }
    }
}

impl SiteBackupAction {
    pub fn execute(&self, config: &Config) -> Result<()> {
        match self {
            SiteBackupAction::Enable { domain } => {
                backup::enable_site(&config.paths, domain)?;
                println!("✅ Automatic backups enabled for site {}", domain);
            }
            SiteBackupAction::Disable { domain } => {
                backup::disable_site(&config.paths, domain)?;
                println!("✅ Automatic backups disabled for site {}", domain);
            }
        }

        Ok(())
    }
}

impl DatabaseBackupAction {
    pub fn execute(&self, config: &Config) -> Result<()> {
        match self {
            DatabaseBackupAction::Enable => {
                backup::enable_database(&config.paths)?;
                println!("✅ Automatic database backups enabled");
            }
            DatabaseBackupAction::Disable => {
                backup::disable_database(&config.paths)?;
                println!("✅ Automatic database backups disabled");
            }
        }

        Ok(())
    }
}
