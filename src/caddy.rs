/// Caddy server lifecycle and first-time panel setup.
use std::fs;

use anyhow::{anyhow, Context, Result};
use log::info;

use crate::config::Paths;
use crate::{probe, utils};

const REPO_BOOTSTRAP: &str = r#"
apt-get update
apt-get install -y debian-keyring debian-archive-keyring apt-transport-https curl
curl -1sLf 'https://dl.cloudsmith.io/public/caddy/stable/gpg.key' | gpg --dearmor -o /usr/share/keyrings/caddy-stable-archive-keyring.gpg
curl -1sLf 'https://dl.cloudsmith.io/public/caddy/stable/debian.deb.txt' | tee /etc/apt/sources.list.d/caddy-stable.list
apt-get update
apt-get install -y caddy
"#;

const CADDYFILE: &str = r#"{
    admin off
    log {
        output file /var/log/caddy/access.log
        format json
    }
    email admin@localhost
}

(common) {
    log {
        output file /var/log/caddy/{host}.access.log
        format json
    }
    header ?Server "Caddyboard"
    encode gzip
}

import modules.d/*
import php.d/*
import sites.d/*
"#;

/// Module snippets seeded during setup.
const STOCK_MODULES: &[(&str, &str)] = &[
    (
        "cache-headers",
        "(cache-headers) {\n    header Cache-Control \"public, max-age=3600\"\n}",
    ),
    (
        "compression",
        "(compression) {\n    encode zstd gzip\n}",
    ),
    (
        "local-access",
        "(local-access) {\n    @local {\n        remote_ip 127.0.0.1\n        remote_ip 10.0.0.0/8\n        remote_ip 172.16.0.0/12\n        remote_ip 192.168.0.0/16\n    }\n}",
    ),
    (
        "ratelimit",
        "(ratelimit) {\n    rate_limit {\n        zone dynamic {\n            key {remote_host}\n            events 10\n            window 10s\n        }\n    }\n}",
    ),
    (
        "security",
        "(security) {\n    header {\n        X-Content-Type-Options \"nosniff\"\n        X-Frame-Options \"SAMEORIGIN\"\n        X-XSS-Protection \"1; mode=block\"\n        Referrer-Policy \"strict-origin-when-cross-origin\"\n    }\n}",
    ),
    (
        "spa",
        "(spa) {\n    try_files {path} /index.html\n}",
    ),
    (
        "static_cache",
        "(static_cache) {\n    @static {\n        file {\n            try_files {path}\n        }\n        path *.ico *.css *.js *.gif *.jpg *.jpeg *.png *.svg *.woff *.woff2\n    }\n    header @static Cache-Control \"public, max-age=86400\"\n}",
    ),
];

/// Reloads the Caddy server so configuration edits take effect.
pub fn reload() -> Result<()> {
    if !probe::caddy_installed() {
        return Err(anyhow!("Caddy is not installed"));
    }

    utils::reload_service("caddy")
}

/// Installs Caddy and prepares the panel directory layout. Returns false if
/// Caddy was already present and nothing was done.
pub fn setup(paths: &Paths) -> Result<bool> {
    if probe::caddy_installed() {
        return Ok(false);
    }

    info!("installing Caddy from the Cloudsmith repository");
    utils::run_shell("Caddy installation", REPO_BOOTSTRAP)?;

    for dir in [
        &paths.caddy_root,
        &paths.modules_dir,
        &paths.php_dir,
        &paths.sites_dir,
    ] {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }

    let caddyfile = paths.caddy_root.join("Caddyfile");
    fs::write(&caddyfile, CADDYFILE)
        .with_context(|| format!("failed to write {}", caddyfile.display()))?;

    for (name, content) in STOCK_MODULES {
        let path = paths.module_path(name);
        fs::write(&path, content)
            .with_context(|| format!("failed to write module {}", name))?;
    }

    fs::create_dir_all(&paths.sites_root).with_context(|| {
        format!("failed to create sites directory {}", paths.sites_root.display())
    })?;

    utils::restart_service("caddy")?;

    Ok(true)
}
