/// Configuration and path resolution.
pub mod config;

/// First-occurrence text editing of Caddy site configurations.
pub mod caddyfile;

/// Installed-software probing via the executable search path.
pub mod probe;

/// Wrappers around the host package and service managers.
pub mod utils;

/// Caddy server lifecycle and first-time panel setup.
pub mod caddy;

/// Site lifecycle management.
pub mod site;

/// Per-site Caddy module management.
pub mod module;

/// PHP runtime and extension management.
pub mod php;

/// Backup scheduling via cron fragments.
pub mod backup;

/// CLI interface and commands.
pub mod cli;
