/// Installed-software probing.
///
/// Availability is derived from executable resolution on the search path,
/// never from a package manifest. Absence is a normal outcome, not an error.
use log::debug;

/// Returns true if `binary` resolves on the executable search path.
pub fn resolves(binary: &str) -> bool {
    which::which(binary).is_ok()
}

/// Returns true if the interpreter for a PHP version is reachable.
pub fn php_installed(version: &str) -> bool {
    resolves(&format!("php{}", version))
}

/// Probes the candidate list and returns the versions that resolve, in
/// candidate order. Versions outside the list are never reported, even when
/// actually installed.
pub fn installed_php_versions(candidates: &[String]) -> Vec<String> {
    let versions: Vec<String> = candidates
        .iter()
        .filter(|version| php_installed(version))
        .cloned()
        .collect();

    debug!(
        "probed {} PHP candidates, {} installed",
        candidates.len(),
        versions.len()
    );

    versions
}

/// MariaDB or MySQL client present on the host.
pub fn database_installed() -> bool {
    resolves("mariadb") || resolves("mysql")
}

pub fn caddy_installed() -> bool {
    resolves("caddy")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_finds_the_shell() {
        assert!(resolves("sh"));
    }

    #[test]
    fn resolves_rejects_unknown_binaries() {
        assert!(!resolves("caddyboard-no-such-binary"));
    }

    #[test]
    fn probing_is_limited_to_the_candidate_list() {
        // "0.0" never ships as php0.0, and an empty list probes nothing.
        assert!(installed_php_versions(&["0.0".to_string()]).is_empty());
        assert!(installed_php_versions(&[]).is_empty());
    }
}
