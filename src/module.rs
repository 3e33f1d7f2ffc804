/// Per-site Caddy module management.
///
/// A site's active modules are exactly the `import` lines in its config
/// block; there is no separate manifest.
use std::fs;

use anyhow::{anyhow, Context, Result};

use crate::caddyfile;
use crate::config::Paths;

/// Enables a module for a site by importing it at the top of the site block.
/// Refused if the module is already imported.
pub fn add(paths: &Paths, domain: &str, module: &str) -> Result<()> {
    if !paths.module_path(module).exists() {
        return Err(anyhow!("module {} does not exist", module));
    }

    let config_path = paths.site_config(domain);
    if !config_path.exists() {
        return Err(anyhow!("site {} does not exist", domain));
    }

    let content = caddyfile::read(&config_path)?;
    if caddyfile::has_import(&content, module) {
        return Err(anyhow!(
            "module {} is already enabled for site {}",
            module,
            domain
        ));
    }

    let updated = caddyfile::insert_import(&content, domain, module);
    caddyfile::write(&config_path, &updated)
}

/// Disables a module by dropping its import line. Refused if absent.
pub fn remove(paths: &Paths, domain: &str, module: &str) -> Result<()> {
    let config_path = paths.site_config(domain);
    if !config_path.exists() {
        return Err(anyhow!("site {} does not exist", domain));
    }

    let content = caddyfile::read(&config_path)?;
    if !caddyfile::has_import(&content, module) {
        return Err(anyhow!(
            "module {} is not enabled for site {}",
            module,
            domain
        ));
    }

    let updated = caddyfile::delete_import(&content, module);
    caddyfile::write(&config_path, &updated)
}

/// Imports active for a site, in file order.
pub fn list(paths: &Paths, domain: &str) -> Result<Vec<String>> {
    let config_path = paths.site_config(domain);
    if !config_path.exists() {
        return Err(anyhow!("site {} does not exist", domain));
    }

    let content = caddyfile::read(&config_path)?;

    Ok(caddyfile::imports(&content))
}

/// Module names present in the modules directory, sorted.
pub fn list_available(paths: &Paths) -> Result<Vec<String>> {
    let entries = fs::read_dir(&paths.modules_dir).with_context(|| {
        format!(
            "failed to read modules directory {}",
            paths.modules_dir.display()
        )
    })?;

    let mut modules = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        modules.push(entry.file_name().to_string_lossy().into_owned());
    }
    modules.sort();

    Ok(modules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site;

    fn scratch() -> (tempfile::TempDir, Paths) {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::rooted(dir.path());
        fs::create_dir_all(&paths.sites_root).unwrap();
        fs::create_dir_all(&paths.sites_dir).unwrap();
        fs::create_dir_all(&paths.modules_dir).unwrap();
        site::create(&paths, "example.com").unwrap();
        (dir, paths)
    }

    fn seed_module(paths: &Paths, name: &str) {
        fs::write(paths.module_path(name), format!("({}) {{\n}}", name)).unwrap();
    }

    #[test]
    fn add_requires_a_known_module() {
        let (_dir, paths) = scratch();

        let err = add(&paths, "example.com", "ghost").unwrap_err();
        assert!(err.to_string().contains("module ghost does not exist"));
    }

    #[test]
    fn add_requires_an_existing_site() {
        let (_dir, paths) = scratch();
        seed_module(&paths, "security");

        let err = add(&paths, "other.com", "security").unwrap_err();
        assert!(err.to_string().contains("site other.com does not exist"));
    }

    #[test]
    fn duplicate_add_is_refused_without_mutation() {
        let (_dir, paths) = scratch();
        seed_module(&paths, "security");

        add(&paths, "example.com", "security").unwrap();
        let before = caddyfile::read(&paths.site_config("example.com")).unwrap();

        let err = add(&paths, "example.com", "security").unwrap_err();
        assert!(err.to_string().contains("already enabled"));

        let after = caddyfile::read(&paths.site_config("example.com")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn remove_of_absent_module_is_refused() {
        let (_dir, paths) = scratch();

        let err = remove(&paths, "example.com", "security").unwrap_err();
        assert!(err.to_string().contains("not enabled"));
    }

    #[test]
    fn add_then_remove_restores_the_config() {
        let (_dir, paths) = scratch();
        seed_module(&paths, "security");
        let before = caddyfile::read(&paths.site_config("example.com")).unwrap();

        add(&paths, "example.com", "security").unwrap();
        remove(&paths, "example.com", "security").unwrap();

        let after = caddyfile::read(&paths.site_config("example.com")).unwrap();
        assert_eq!(before, after);
        assert!(list(&paths, "example.com").unwrap().is_empty());
    }

    #[test]
    fn list_reflects_file_order_not_insertion_order() {
        let (_dir, paths) = scratch();
        seed_module(&paths, "security");
        seed_module(&paths, "compression");

        add(&paths, "example.com", "security").unwrap();
        add(&paths, "example.com", "compression").unwrap();

        // Every add lands at the top of the block.
        assert_eq!(
            list(&paths, "example.com").unwrap(),
            vec!["compression", "security"]
        );
    }

    #[test]
    fn available_modules_are_sorted_files() {
        let (_dir, paths) = scratch();
        seed_module(&paths, "spa");
        seed_module(&paths, "compression");
        fs::create_dir(paths.modules_dir.join("subdir")).unwrap();

        assert_eq!(list_available(&paths).unwrap(), vec!["compression", "spa"]);
    }

    #[test]
    fn available_fails_without_modules_directory() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::rooted(dir.path());

        let err = list_available(&paths).unwrap_err();
        assert!(err.to_string().contains("modules directory"));
    }
}
