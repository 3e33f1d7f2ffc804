/// Configuration serialization and deserialization.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: Paths,
    pub php: PhpConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;

        Ok(config)
    }

    /// An explicit path wins, then the user config dir, then built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        if let Some(dir) = dirs::config_dir() {
            let path = dir.join("caddyboard").join("config.toml");
            if path.exists() {
                return Self::load(&path);
            }
        }

        Ok(Self::default())
    }
}

// config like:
// [paths]
// sites_root = "/srv/www"
// sites_dir = "/etc/caddy/sites.d"
//
// [php]
// versions = ["8.1", "8.2", "8.3"]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Paths {
    pub sites_root: PathBuf,
    pub caddy_root: PathBuf,
    pub modules_dir: PathBuf,
    pub php_dir: PathBuf,
    pub sites_dir: PathBuf,
    pub backup_daily: PathBuf,
    pub backup_weekly: PathBuf,
    pub cron_dir: PathBuf,
    pub bin_dir: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            sites_root: "/apps/sites".into(),
            caddy_root: "/etc/caddy".into(),
            modules_dir: "/etc/caddy/modules.d".into(),
            php_dir: "/etc/caddy/php.d".into(),
            sites_dir: "/etc/caddy/sites.d".into(),
            backup_daily: "/backup/daily".into(),
            backup_weekly: "/backup/weekly".into(),
            cron_dir: "/etc/cron.d".into(),
            bin_dir: "/usr/local/bin".into(),
        }
    }
}

impl Paths {
    /// Directory holding a site's files.
    pub fn site_dir(&self, domain: &str) -> PathBuf {
        self.sites_root.join(domain)
    }

    /// Caddy configuration file for a site.
    pub fn site_config(&self, domain: &str) -> PathBuf {
        self.sites_dir.join(format!("{}.caddy", domain))
    }

    /// Caddy snippet binding the PHP-FPM socket for one PHP version.
    pub fn php_config(&self, version: &str) -> PathBuf {
        self.php_dir.join(format!("php{}_config", version))
    }

    /// Reusable module snippet file.
    pub fn module_path(&self, module: &str) -> PathBuf {
        self.modules_dir.join(module)
    }

    pub fn backup_daily_for(&self, domain: &str) -> PathBuf {
        self.backup_daily.join(domain)
    }

    pub fn backup_weekly_for(&self, domain: &str) -> PathBuf {
        self.backup_weekly.join(domain)
    }

    /// Cron fragment driving a site's backup schedule.
    pub fn backup_cron_file(&self, domain: &str) -> PathBuf {
        self.cron_dir.join(format!("caddyboard-backup-{}", domain))
    }

    /// Cron fragment driving the database backup schedule.
    pub fn db_backup_cron_file(&self) -> PathBuf {
        self.cron_dir.join("caddyboard-db-backup")
    }

    /// Helper script invoked by the database backup cron jobs.
    pub fn db_backup_script(&self) -> PathBuf {
        self.bin_dir.join("caddyboard-db-backup")
    }
}

#[cfg(test)]
impl Paths {
    /// The default layout relocated under a scratch directory.
    pub fn rooted(root: &Path) -> Self {
        Self {
            sites_root: root.join("apps/sites"),
            caddy_root: root.join("etc/caddy"),
            modules_dir: root.join("etc/caddy/modules.d"),
            php_dir: root.join("etc/caddy/php.d"),
            sites_dir: root.join("etc/caddy/sites.d"),
            backup_daily: root.join("backup/daily"),
            backup_weekly: root.join("backup/weekly"),
            cron_dir: root.join("etc/cron.d"),
            bin_dir: root.join("usr/local/bin"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhpConfig {
    /// Versions probed when deriving the installed set.
    pub versions: Vec<String>,
}

impl Default for PhpConfig {
    fn default() -> Self {
        Self {
            versions: ["7.0", "7.1", "7.2", "7.3", "7.4", "8.0", "8.1", "8.2", "8.3"]
                .iter()
                .map(|version| version.to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_match_layout() {
        let paths = Paths::default();

        assert_eq!(
            paths.site_dir("example.com"),
            PathBuf::from("/apps/sites/example.com")
        );
        assert_eq!(
            paths.site_config("example.com"),
            PathBuf::from("/etc/caddy/sites.d/example.com.caddy")
        );
        assert_eq!(
            paths.php_config("8.2"),
            PathBuf::from("/etc/caddy/php.d/php8.2_config")
        );
        assert_eq!(
            paths.module_path("security"),
            PathBuf::from("/etc/caddy/modules.d/security")
        );
        assert_eq!(
            paths.backup_cron_file("example.com"),
            PathBuf::from("/etc/cron.d/caddyboard-backup-example.com")
        );
        assert_eq!(
            paths.db_backup_script(),
            PathBuf::from("/usr/local/bin/caddyboard-db-backup")
        );
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [paths]
            sites_root = "/srv/www"

            [php]
            versions = ["8.3"]
            "#,
        )
        .unwrap();

        assert_eq!(config.paths.sites_root, PathBuf::from("/srv/www"));
        assert_eq!(config.paths.caddy_root, PathBuf::from("/etc/caddy"));
        assert_eq!(config.php.versions, vec!["8.3".to_string()]);
    }

    #[test]
    fn empty_config_is_default() {
        let config: Config = toml::from_str("").unwrap();

        assert_eq!(config.paths.sites_root, Paths::default().sites_root);
        assert_eq!(config.php.versions.len(), 9);
    }
}
