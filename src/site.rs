/// Site lifecycle: a directory per domain plus one Caddy config file.
///
/// The filesystem is the data store. Nothing about a site is tracked outside
/// its directory and its configuration file.
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use log::info;

use crate::caddyfile;
use crate::config::Paths;

/// Returns true when the site's directory exists.
pub fn exists(paths: &Paths, domain: &str) -> bool {
    paths.site_dir(domain).exists()
}

/// Creates the site directory, a starter page and the Caddy site block.
pub fn create(paths: &Paths, domain: &str) -> Result<()> {
    let site_dir = paths.site_dir(domain);
    fs::create_dir_all(&site_dir)
        .with_context(|| format!("failed to create site directory {}", site_dir.display()))?;

    let index = format!(
        "<html><body><h1>Welcome to {}</h1><p>Served by Caddyboard</p></body></html>",
        domain
    );
    fs::write(site_dir.join("index.html"), index).context("failed to write index.html")?;

    let site_config = format!(
        "{} {{\n    root * {}\n    file_server\n}}\n",
        domain,
        site_dir.display()
    );
    caddyfile::write(&paths.site_config(domain), &site_config)?;

    info!("created site {}", domain);

    Ok(())
}

/// Removes the site directory and its Caddy config.
pub fn delete(paths: &Paths, domain: &str) -> Result<()> {
    if !exists(paths, domain) {
        return Err(anyhow!("site {} does not exist", domain));
    }

    let site_dir = paths.site_dir(domain);
    fs::remove_dir_all(&site_dir)
        .with_context(|| format!("failed to remove site directory {}", site_dir.display()))?;

    let config_path = paths.site_config(domain);
    if let Err(e) = fs::remove_file(&config_path) {
        if e.kind() != ErrorKind::NotFound {
            return Err(e).with_context(|| {
                format!("failed to remove site configuration {}", config_path.display())
            });
        }
    }

    info!("deleted site {}", domain);

    Ok(())
}

/// Points the site's `root` directive at a subdirectory of the site dir.
///
/// The substitution targets the `root * <site_dir>` text written at creation
/// time, first occurrence only. A config whose root was already rewritten
/// keeps whatever that substitution produces.
pub fn update_webroot(paths: &Paths, domain: &str, path: &str) -> Result<PathBuf> {
    if !exists(paths, domain) {
        return Err(anyhow!("site {} does not exist", domain));
    }

    let site_dir = paths.site_dir(domain);
    let webroot = site_dir.join(path.trim_start_matches('/'));
    fs::create_dir_all(&webroot)
        .with_context(|| format!("failed to create webroot directory {}", webroot.display()))?;

    let config_path = paths.site_config(domain);
    let content = caddyfile::read(&config_path)?;
    let updated = caddyfile::replace_first(
        &content,
        &format!("root * {}", site_dir.display()),
        &format!("root * {}", webroot.display()),
    );
    caddyfile::write(&config_path, &updated)?;

    Ok(webroot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module;

    fn scratch() -> (tempfile::TempDir, Paths) {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::rooted(dir.path());
        fs::create_dir_all(&paths.sites_root).unwrap();
        fs::create_dir_all(&paths.sites_dir).unwrap();
        (dir, paths)
    }

    #[test]
    fn create_writes_block_and_starter_page() {
        let (_dir, paths) = scratch();

        create(&paths, "example.com").unwrap();

        let content = caddyfile::read(&paths.site_config("example.com")).unwrap();
        assert!(content.starts_with("example.com {\n"));
        assert!(content.contains("file_server"));
        assert!(paths.site_dir("example.com").join("index.html").exists());

        // A fresh site has no active modules.
        assert!(module::list(&paths, "example.com").unwrap().is_empty());
    }

    #[test]
    fn delete_requires_an_existing_site() {
        let (_dir, paths) = scratch();

        let err = delete(&paths, "ghost.example").unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn delete_removes_directory_and_config() {
        let (_dir, paths) = scratch();
        create(&paths, "example.com").unwrap();

        delete(&paths, "example.com").unwrap();

        assert!(!paths.site_dir("example.com").exists());
        assert!(!paths.site_config("example.com").exists());
    }

    #[test]
    fn webroot_update_rewrites_the_creation_root() {
        let (_dir, paths) = scratch();
        create(&paths, "example.com").unwrap();

        let webroot = update_webroot(&paths, "example.com", "public").unwrap();
        assert_eq!(webroot, paths.site_dir("example.com").join("public"));
        assert!(webroot.is_dir());

        let content = caddyfile::read(&paths.site_config("example.com")).unwrap();
        assert!(content.contains(&format!("root * {}", webroot.display())));
    }

    #[test]
    fn webroot_update_is_textual_not_semantic() {
        let (_dir, paths) = scratch();
        create(&paths, "example.com").unwrap();

        update_webroot(&paths, "example.com", "public").unwrap();
        update_webroot(&paths, "example.com", "dist").unwrap();

        // The second update substitutes the creation-time prefix inside the
        // already-rewritten directive.
        let site_dir = paths.site_dir("example.com");
        let content = caddyfile::read(&paths.site_config("example.com")).unwrap();
        assert!(content.contains(&format!("root * {}/dist/public", site_dir.display())));
    }
}
