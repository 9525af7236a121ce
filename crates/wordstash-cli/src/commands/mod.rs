//! Subcommand implementations.
//!
//! Each command opens one [`Session`] and passes its store by reference to
//! the core components it needs.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{FixedOffset, Local, NaiveDate, Utc};

use wordstash_core::store::Store;
use wordstash_providers::{load_config_from, WordstashConfig};

pub mod collections;
pub mod define;
pub mod history;
pub mod init;
pub mod quiz;
pub mod refresh;
pub mod revise;
pub mod stats;
pub mod status;

/// Configuration plus the open database for one invocation.
pub struct Session {
    pub config: WordstashConfig,
    pub store: Store,
}

impl Session {
    pub fn open(config_path: Option<&Path>) -> Result<Self> {
        let config = load_config_from(config_path)?;

        if let Some(parent) = config.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create data directory: {}", parent.display())
                })?;
            }
        }

        let offset = match config.utc_offset_minutes {
            Some(minutes) => FixedOffset::east_opt(minutes * 60)
                .with_context(|| format!("invalid utc_offset_minutes: {minutes}"))?,
            None => *Local::now().offset(),
        };

        let store = Store::open(&config.database_path)
            .with_context(|| {
                format!("failed to open database: {}", config.database_path.display())
            })?
            .with_utc_offset(offset);
        tracing::debug!(db = %config.database_path.display(), %offset, "opened session");

        Ok(Self { config, store })
    }

    /// Today's date in the session's offset.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.store.utc_offset()).date_naive()
    }
}
