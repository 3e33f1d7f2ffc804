/// Text-level editing of Caddy site configurations.
///
/// The configuration is treated as opaque text except for three conventions:
/// a block opens with `<name> {`, import directives are four-space indented
/// `import <name>` lines, and every import line is newline terminated. All
/// substitutions are first-occurrence; hand-edited files with duplicate or
/// malformed blocks get first-match-wins behavior.
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Returns true if the configuration already imports `name`.
pub fn has_import(content: &str, name: &str) -> bool {
    content.contains(&format!("import {}", name))
}

/// Inserts `import <name>` as the first directive of the `<block> {` block.
/// Content without a matching block opener is returned unchanged.
pub fn insert_import(content: &str, block: &str, name: &str) -> String {
    content.replacen(
        &format!("{} {{", block),
        &format!("{} {{\n    import {}", block, name),
        1,
    )
}

/// Removes the first `    import <name>` line.
pub fn delete_import(content: &str, name: &str) -> String {
    content.replacen(&format!("    import {}\n", name), "", 1)
}

/// Swaps one import for another in place, keeping its position in the block
/// so a single rewrite covers the change.
pub fn replace_import(content: &str, old: &str, new: &str) -> String {
    content.replacen(
        &format!("import {}", old),
        &format!("import {}", new),
        1,
    )
}

/// First-occurrence substitution for directives outside the import set.
pub fn replace_first(content: &str, old: &str, new: &str) -> String {
    content.replacen(old, new, 1)
}

/// Import names in file order. The order is significant: it is the order
/// Caddy applies the imported directives in.
pub fn imports(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix("import "))
        .map(|name| name.to_string())
        .collect()
}

pub fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed to read site configuration {}", path.display()))
}

pub fn write(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)
        .with_context(|| format!("failed to write site configuration {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: &str =
        "example.com {\n    root * /apps/sites/example.com\n    file_server\n}\n";

    #[test]
    fn insert_puts_import_first_in_block() {
        let updated = insert_import(SITE, "example.com", "security");

        let lines: Vec<&str> = updated.lines().collect();
        assert_eq!(lines[0], "example.com {");
        assert_eq!(lines[1], "    import security");
        assert_eq!(lines[2], "    root * /apps/sites/example.com");
    }

    #[test]
    fn insert_without_block_is_noop() {
        let updated = insert_import(SITE, "other.com", "security");
        assert_eq!(updated, SITE);
    }

    #[test]
    fn delete_restores_original_content() {
        let updated = insert_import(SITE, "example.com", "security");
        let restored = delete_import(&updated, "security");
        assert_eq!(restored, SITE);
    }

    #[test]
    fn replace_keeps_import_position() {
        let content = insert_import(SITE, "example.com", "php8.1_config");
        let content = insert_import(&content, "example.com", "security");

        let swapped = replace_import(&content, "php8.1_config", "php8.2_config");

        let lines: Vec<&str> = swapped.lines().collect();
        assert_eq!(lines[1], "    import security");
        assert_eq!(lines[2], "    import php8.2_config");
        assert!(!has_import(&swapped, "php8.1_config"));
    }

    #[test]
    fn imports_returns_file_order() {
        let content = insert_import(SITE, "example.com", "security");
        let content = insert_import(&content, "example.com", "compression");

        // Each insert lands at the top, so file order is the reverse of
        // insertion order.
        assert_eq!(imports(&content), vec!["compression", "security"]);
    }

    #[test]
    fn has_import_matches_substrings() {
        let content = insert_import(SITE, "example.com", "security-headers");
        assert!(has_import(&content, "security-headers"));
        assert!(has_import(&content, "security"));
    }

    #[test]
    fn read_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = read(&dir.path().join("missing.caddy")).unwrap_err();
        assert!(err.to_string().contains("missing.caddy"));
    }

    #[test]
    fn write_then_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("example.com.caddy");

        write(&path, SITE).unwrap();
        assert_eq!(read(&path).unwrap(), SITE);
    }
}
