//! Startup load pipelines.
//!
//! Neither pipeline ever fails: any error is logged and the in-memory
//! defaults are used without touching the stored documents, so a file the
//! user can still repair is never overwritten.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::migration::{merge_client_config, migrate_server_config, version_of, MigrationReport};
use super::store::{store_typed, ConfigStore};
use super::{ClientConfig, ServerConfig};
use crate::constants::{
    CLIENT_CONFIG_FILE, CLIENT_CONFIG_VERSION, LEGACY_CONFIG_FILE, SERVER_CONFIG_FILE,
    SERVER_CONFIG_VERSION,
};

/// Where the returned config came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Stored document already at the current version
    Current,
    /// Stored document of another version, copied forward
    Migrated,
    /// Pre-split combined document, copied forward and removed
    Legacy,
    /// Nothing stored; defaults written
    Defaults,
    /// Load failed; defaults in memory only
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub source: ConfigSource,
    /// Version of the document that was migrated
    pub migrated_from: Option<String>,
    /// Whether a document was written during the load
    pub persisted: bool,
    pub migration: Option<MigrationReport>,
}

impl LoadReport {
    fn new(source: ConfigSource, persisted: bool) -> Self {
        Self {
            source,
            migrated_from: None,
            persisted,
            migration: None,
        }
    }

    fn migrated(source: ConfigSource, migration: MigrationReport) -> Self {
        Self {
            source,
            migrated_from: migration.original_version.clone(),
            persisted: true,
            migration: Some(migration),
        }
    }
}

/// Load, migrate or create the server config.
pub fn load_server_config(store: &dyn ConfigStore) -> (ServerConfig, LoadReport) {
    match try_load_server(store) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!(error = %format!("{e:#}"), "failed to load server config, using defaults");
            (
                ServerConfig::default(),
                LoadReport::new(ConfigSource::Fallback, false),
            )
        }
    }
}

fn try_load_server(store: &dyn ConfigStore) -> anyhow::Result<(ServerConfig, LoadReport)> {
    if let Some(doc) = store
        .load(SERVER_CONFIG_FILE)
        .context("reading server config")?
    {
        let stored = version_of(&doc);
        if stored.as_deref() == Some(SERVER_CONFIG_VERSION) {
            let config: ServerConfig =
                serde_json::from_value(doc).context("parsing server config")?;
            return Ok((config, LoadReport::new(ConfigSource::Current, false)));
        }

        info!(
            from = stored.as_deref().unwrap_or("unversioned"),
            to = SERVER_CONFIG_VERSION,
            "migrating server config"
        );
        let (config, migration) = migrate_server_config(&doc);
        store_typed(store, SERVER_CONFIG_FILE, &config).context("writing migrated server config")?;
        return Ok((config, LoadReport::migrated(ConfigSource::Migrated, migration)));
    }

    if let Some(legacy) = store
        .load(LEGACY_CONFIG_FILE)
        .context("reading legacy config")?
    {
        info!(file = LEGACY_CONFIG_FILE, "migrating legacy config");
        let (config, migration) = migrate_server_config(&legacy);
        store_typed(store, SERVER_CONFIG_FILE, &config).context("writing migrated server config")?;
        store
            .remove(LEGACY_CONFIG_FILE)
            .context("removing legacy config")?;
        return Ok((config, LoadReport::migrated(ConfigSource::Legacy, migration)));
    }

    info!(file = SERVER_CONFIG_FILE, "no server config found, writing defaults");
    let config = ServerConfig::default();
    store_typed(store, SERVER_CONFIG_FILE, &config).context("writing default server config")?;
    Ok((config, LoadReport::new(ConfigSource::Defaults, true)))
}

/// Load the client config, merging any stored values onto the defaults.
///
/// The merged document is always written back so new keys appear in the file.
pub fn load_client_config(store: &dyn ConfigStore) -> (ClientConfig, LoadReport) {
    match try_load_client(store) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!(error = %format!("{e:#}"), "failed to load client config, using defaults");
            (
                ClientConfig::default(),
                LoadReport::new(ConfigSource::Fallback, false),
            )
        }
    }
}

fn try_load_client(store: &dyn ConfigStore) -> anyhow::Result<(ClientConfig, LoadReport)> {
    let Some(doc) = store
        .load(CLIENT_CONFIG_FILE)
        .context("reading client config")?
    else {
        info!(file = CLIENT_CONFIG_FILE, "no client config found, writing defaults");
        let config = ClientConfig::default();
        store_typed(store, CLIENT_CONFIG_FILE, &config).context("writing default client config")?;
        return Ok((config, LoadReport::new(ConfigSource::Defaults, true)));
    };

    let (config, merge) = merge_client_config(&doc);
    store_typed(store, CLIENT_CONFIG_FILE, &config).context("writing client config")?;

    let report = if merge.original_version.as_deref() == Some(CLIENT_CONFIG_VERSION) {
        LoadReport {
            migration: Some(merge),
            ..LoadReport::new(ConfigSource::Current, true)
        }
    } else {
        info!(
            from = merge.original_version.as_deref().unwrap_or("unversioned"),
            to = CLIENT_CONFIG_VERSION,
            "migrated client config"
        );
        LoadReport::migrated(ConfigSource::Migrated, merge)
    };
    Ok((config, report))
}
