/// Backup scheduling via cron fragments.
///
/// A schedule exists exactly when its fragment file under the cron directory
/// exists; there is no other state.
use std::fs;
use std::io::ErrorKind;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::info;

use crate::config::Paths;
use crate::probe;

const DB_BACKUP_SCRIPT: &str = r#"#!/bin/bash

BACKUP_DIR="$1"
DATE=$(date +%Y%m%d)
MYSQL_USER="root"
MYSQL_PASSWORD=$(cat /root/.mysql_password 2>/dev/null || echo "")

mkdir -p "$BACKUP_DIR/$DATE"

DATABASES=$(mysql -u$MYSQL_USER ${MYSQL_PASSWORD:+-p$MYSQL_PASSWORD} -e "SHOW DATABASES;" | grep -Ev "(Database|information_schema|performance_schema)")

for DB in $DATABASES; do
    mysqldump -u$MYSQL_USER ${MYSQL_PASSWORD:+-p$MYSQL_PASSWORD} --single-transaction --skip-lock-tables "$DB" > "$BACKUP_DIR/$DATE/$DB.sql"
done

ln -sf "$BACKUP_DIR/$DATE" "$BACKUP_DIR/latest"
"#;

/// Enables rotating rsync backups for a site: daily hard-link snapshots and
/// weekly full copies, driven by a cron fragment keyed by domain.
pub fn enable_site(paths: &Paths, domain: &str) -> Result<()> {
    if !paths.site_dir(domain).exists() {
        return Err(anyhow!("site {} does not exist", domain));
    }

    let daily = paths.backup_daily_for(domain);
    let weekly = paths.backup_weekly_for(domain);
    fs::create_dir_all(&daily)
        .with_context(|| format!("failed to create daily backup directory {}", daily.display()))?;
    fs::create_dir_all(&weekly).with_context(|| {
        format!("failed to create weekly backup directory {}", weekly.display())
    })?;

    let site_dir = paths.site_dir(domain);
    let daily_job = format!(
        "0 1 * * * root rsync -a --delete --link-dest={0}/latest {1} {0}/$(date +%Y%m%d) && ln -sf {0}/$(date +%Y%m%d) {0}/latest\n",
        daily.display(),
        site_dir.display()
    );
    let weekly_job = format!(
        "0 2 * * 0 root rsync -a --delete {0} {1}/$(date +%Y%m%d) && ln -sf {1}/$(date +%Y%m%d) {1}/latest\n",
        site_dir.display(),
        weekly.display()
    );

    let cron_file = paths.backup_cron_file(domain);
    let content = format!(
        "# Caddyboard backup jobs for {}\n{}{}",
        domain, daily_job, weekly_job
    );
    fs::write(&cron_file, content)
        .with_context(|| format!("failed to write backup schedule {}", cron_file.display()))?;

    info!("backups enabled for site {}", domain);

    Ok(())
}

/// Disables site backups by removing the cron fragment. A fragment that is
/// already gone counts as disabled.
pub fn disable_site(paths: &Paths, domain: &str) -> Result<()> {
    remove_if_present(&paths.backup_cron_file(domain))
}

/// Enables daily and weekly database dumps via a helper script and a cron
/// fragment. Re-running overwrites both in place.
pub fn enable_database(paths: &Paths) -> Result<()> {
    if !probe::database_installed() {
        return Err(anyhow!("MariaDB/MySQL is not installed"));
    }

    let daily = paths.backup_daily.join("database");
    let weekly = paths.backup_weekly.join("database");
    fs::create_dir_all(&daily)
        .with_context(|| format!("failed to create daily backup directory {}", daily.display()))?;
    fs::create_dir_all(&weekly).with_context(|| {
        format!("failed to create weekly backup directory {}", weekly.display())
    })?;

    let script_path = paths.db_backup_script();
    fs::write(&script_path, DB_BACKUP_SCRIPT)
        .with_context(|| format!("failed to write backup script {}", script_path.display()))?;
    fs::set_permissions(&script_path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("failed to mark {} executable", script_path.display()))?;

    let daily_job = format!(
        "0 3 * * * root {} {}\n",
        script_path.display(),
        daily.display()
    );
    let weekly_job = format!(
        "0 4 * * 0 root {} {}\n",
        script_path.display(),
        weekly.display()
    );

    let cron_file = paths.db_backup_cron_file();
    let content = format!(
        "# Caddyboard database backup jobs\n{}{}",
        daily_job, weekly_job
    );
    fs::write(&cron_file, content)
        .with_context(|| format!("failed to write backup schedule {}", cron_file.display()))?;

    info!("database backups enabled");

    Ok(())
}

/// Disables database dumps: cron fragment and helper script are removed.
pub fn disable_database(paths: &Paths) -> Result<()> {
    remove_if_present(&paths.db_backup_cron_file())?;
    remove_if_present(&paths.db_backup_script())
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("failed to remove {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch() -> (tempfile::TempDir, Paths) {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::rooted(dir.path());
        fs::create_dir_all(&paths.cron_dir).unwrap();
        (dir, paths)
    }

    #[test]
    fn enable_requires_an_existing_site() {
        let (_dir, paths) = scratch();

        let err = enable_site(&paths, "ghost.example").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn enable_writes_the_cron_fragment() {
        let (_dir, paths) = scratch();
        fs::create_dir_all(paths.site_dir("example.com")).unwrap();

        enable_site(&paths, "example.com").unwrap();

        assert!(paths.backup_daily_for("example.com").is_dir());
        assert!(paths.backup_weekly_for("example.com").is_dir());

        let content = fs::read_to_string(paths.backup_cron_file("example.com")).unwrap();
        assert!(content.starts_with("# Caddyboard backup jobs for example.com\n"));
        assert!(content.contains("0 1 * * * root rsync -a --delete --link-dest="));
        assert!(content.contains("0 2 * * 0 root rsync -a --delete "));
    }

    #[test]
    fn disable_removes_the_fragment() {
        let (_dir, paths) = scratch();
        fs::create_dir_all(paths.site_dir("example.com")).unwrap();
        enable_site(&paths, "example.com").unwrap();

        disable_site(&paths, "example.com").unwrap();
        assert!(!paths.backup_cron_file("example.com").exists());
    }

    #[test]
    fn disable_of_absent_schedule_succeeds() {
        let (_dir, paths) = scratch();

        disable_site(&paths, "example.com").unwrap();
        disable_database(&paths).unwrap();
    }

    #[test]
    fn database_script_dumps_each_database() {
        assert!(DB_BACKUP_SCRIPT.contains("mysqldump"));
        assert!(DB_BACKUP_SCRIPT.contains("--single-transaction"));
        assert!(DB_BACKUP_SCRIPT.contains("ln -sf"));
    }
}
