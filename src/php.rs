/// PHP runtime lifecycle and the per-site PHP-FPM binding.
///
/// A site's PHP binding is an `import php<version>_config` line like any
/// other module import. At most one binding is assumed per site; configs
/// hand-edited to carry several get first-match behavior.
use std::fs;
use std::io::ErrorKind;

use anyhow::{anyhow, Context, Result};
use log::info;

use crate::caddyfile;
use crate::config::Config;
use crate::{probe, utils};

/// Import name of the Caddy snippet binding one PHP version.
pub fn config_name(version: &str) -> String {
    format!("php{}_config", version)
}

pub fn fpm_service(version: &str) -> String {
    format!("php{}-fpm", version)
}

fn write_php_config(config: &Config, version: &str) -> Result<()> {
    let snippet = format!(
        "(php{v}_config) {{\n    php_fastcgi unix//run/php/php{v}-fpm.sock\n}}\n",
        v = version
    );

    fs::create_dir_all(&config.paths.php_dir).with_context(|| {
        format!(
            "failed to create PHP configuration directory {}",
            config.paths.php_dir.display()
        )
    })?;

    let path = config.paths.php_config(version);
    fs::write(&path, snippet)
        .with_context(|| format!("failed to write PHP configuration {}", path.display()))
}

fn ensure_php_config(config: &Config, version: &str) -> Result<()> {
    if config.paths.php_config(version).exists() {
        return Ok(());
    }

    write_php_config(config, version)
}

/// Binds a site to an installed PHP version. If another installed version is
/// already imported, the import is swapped in place so one rewrite covers the
/// change. Returns true when an existing binding was replaced.
pub fn enable(config: &Config, domain: &str, version: &str) -> Result<bool> {
    let config_path = config.paths.site_config(domain);
    if !config_path.exists() {
        return Err(anyhow!("site {} does not exist", domain));
    }

    if !probe::php_installed(version) {
        return Err(anyhow!("PHP version {} is not installed", version));
    }

    ensure_php_config(config, version)?;

    let content = caddyfile::read(&config_path)?;
    let new_import = config_name(version);

    for installed in probe::installed_php_versions(&config.php.versions) {
        let old_import = config_name(&installed);
        if caddyfile::has_import(&content, &old_import) {
            let updated = caddyfile::replace_import(&content, &old_import, &new_import);
            caddyfile::write(&config_path, &updated)?;
            return Ok(true);
        }
    }

    let updated = caddyfile::insert_import(&content, domain, &new_import);
    caddyfile::write(&config_path, &updated)?;

    Ok(false)
}

/// Unbinds PHP from a site. One import line is removed per installed version
/// found in the config.
pub fn disable(config: &Config, domain: &str) -> Result<()> {
    let config_path = config.paths.site_config(domain);
    if !config_path.exists() {
        return Err(anyhow!("site {} does not exist", domain));
    }

    let mut content = caddyfile::read(&config_path)?;
    let mut found = false;

    for installed in probe::installed_php_versions(&config.php.versions) {
        let import = config_name(&installed);
        if caddyfile::has_import(&content, &import) {
            content = caddyfile::delete_import(&content, &import);
            found = true;
        }
    }

    if !found {
        return Err(anyhow!("PHP is not enabled for site {}", domain));
    }

    caddyfile::write(&config_path, &content)
}

/// Re-applies the site's current PHP binding, recreating the snippet file if
/// it went missing. Returns the version that was refreshed.
pub fn update(config: &Config, domain: &str) -> Result<String> {
    let config_path = config.paths.site_config(domain);
    if !config_path.exists() {
        return Err(anyhow!("site {} does not exist", domain));
    }

    let content = caddyfile::read(&config_path)?;
    let current = probe::installed_php_versions(&config.php.versions)
        .into_iter()
        .find(|version| caddyfile::has_import(&content, &config_name(version)));

    let Some(version) = current else {
        return Err(anyhow!("PHP is not enabled for site {}", domain));
    };

    enable(config, domain, &version)?;

    Ok(version)
}

/// Installs a PHP runtime: interpreter, FPM and base packages, then brings
/// the FPM service up and seeds the Caddy snippet.
pub fn install(config: &Config, version: &str) -> Result<()> {
    if probe::php_installed(version) {
        return Err(anyhow!("PHP version {} is already installed", version));
    }

    info!("installing PHP {}", version);
    let packages = vec![
        format!("php{}", version),
        format!("php{}-fpm", version),
        format!("php{}-common", version),
        format!("php{}-cli", version),
    ];
    utils::apt_install(&packages)?;

    let service = fpm_service(version);
    utils::enable_service(&service)?;
    utils::start_service(&service)?;

    write_php_config(config, version)
}

/// Removes a PHP runtime. Service shutdown is best-effort; package removal
/// and snippet deletion follow.
pub fn uninstall(config: &Config, version: &str) -> Result<()> {
    if !probe::php_installed(version) {
        return Err(anyhow!("PHP version {} is not installed", version));
    }

    info!("uninstalling PHP {}", version);
    let service = fpm_service(version);
    let _ = utils::stop_service(&service);
    let _ = utils::disable_service(&service);

    let packages = vec![
        format!("php{}", version),
        format!("php{}-fpm", version),
        format!("php{}-common", version),
    ];
    utils::apt_remove(&packages)?;

    let path = config.paths.php_config(version);
    if let Err(e) = fs::remove_file(&path) {
        if e.kind() != ErrorKind::NotFound {
            return Err(e).with_context(|| {
                format!("failed to remove PHP configuration {}", path.display())
            });
        }
    }

    Ok(())
}

/// Installed versions from the configured candidate list, in list order.
pub fn list_installed(config: &Config) -> Vec<String> {
    probe::installed_php_versions(&config.php.versions)
}

/// Extensions installable for a version, from the package index.
pub fn available_extensions(version: &str) -> Result<Vec<String>> {
    if !probe::php_installed(version) {
        return Err(anyhow!("PHP version {} is not installed", version));
    }

    let prefix = format!("php{}-", version);
    let output = utils::apt_search(&prefix)?;

    Ok(parse_extension_search(&output, &prefix))
}

fn parse_extension_search(output: &str, prefix: &str) -> Vec<String> {
    let mut extensions = Vec::new();

    for line in output.lines() {
        if !line.contains(prefix) {
            continue;
        }

        let package = match line.split_once(" - ") {
            Some((package, _)) => package,
            None => line,
        };
        let name = package.strip_prefix(prefix).unwrap_or(package);
        extensions.push(name.to_string());
    }

    extensions
}

/// Installs one extension package and restarts FPM so it is loaded.
pub fn add_extension(version: &str, extension: &str) -> Result<()> {
    if !probe::php_installed(version) {
        return Err(anyhow!("PHP version {} is not installed", version));
    }

    let package = format!("php{}-{}", version, extension);
    info!("installing PHP extension {}", package);
    utils::apt_install(&[package])?;

    utils::restart_service(&fpm_service(version))
}

/// Removes one extension package and restarts FPM.
pub fn remove_extension(version: &str, extension: &str) -> Result<()> {
    if !probe::php_installed(version) {
        return Err(anyhow!("PHP version {} is not installed", version));
    }

    let package = format!("php{}-{}", version, extension);
    info!("removing PHP extension {}", package);
    utils::apt_remove(&[package])?;

    utils::restart_service(&fpm_service(version))
}
