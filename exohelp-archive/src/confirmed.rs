//! Confirmed-exoplanet catalog loader.
//!
//! Implements the cache-or-download policy:
//! 1. If caching is requested and a snapshot exists → read it as-is
//! 2. Otherwise → download, optionally project onto the reduced column set,
//!    persist a dated snapshot, and return the fresh table
//!
//! Without an output directory nothing is cached and every load downloads.

use crate::config::ArchiveConfig;
use exohelp_core::data::{
    parse_csv, ConfirmedSchema, DataError, HttpSource, SnapshotCache, TableSource,
};
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// File-name marker shared by every dated snapshot of this table.
pub const SNAPSHOT_MARKER: &str = "confirmed_exoplanets";

pub struct ConfirmedExoplanetLoader {
    url: String,
    source: Arc<dyn TableSource>,
    cache: Option<SnapshotCache>,
}

impl ConfirmedExoplanetLoader {
    /// Loader fetching over HTTP with the configured timeout and user agent.
    pub fn new(config: &ArchiveConfig) -> Result<Self, DataError> {
        config.validate()?;
        let source = HttpSource::new(config.timeout(), &config.user_agent)?;
        Self::with_source(config, Arc::new(source))
    }

    /// Loader fetching through `source`. Creates the output directory if one is configured.
    pub fn with_source(config: &ArchiveConfig, source: Arc<dyn TableSource>) -> Result<Self, DataError> {
        let cache = config
            .output_dir
            .as_ref()
            .map(|dir| SnapshotCache::dated(dir, SNAPSHOT_MARKER))
            .transpose()?;
        Ok(Self {
            url: config.confirmed_url.clone(),
            source,
            cache,
        })
    }

    /// The snapshot directory, or a configuration error when caching is disabled.
    pub fn output_dir(&self) -> Result<&Path, DataError> {
        self.cache
            .as_ref()
            .map(SnapshotCache::dir)
            .ok_or_else(|| DataError::Configuration("output directory is not set".into()))
    }

    /// Return the catalog, from the newest snapshot when `use_cache` allows it.
    ///
    /// A cached snapshot is returned exactly as stored; `reduced_columns`
    /// only shapes fresh downloads.
    pub fn load(&self, reduced_columns: bool, use_cache: bool) -> Result<DataFrame, DataError> {
        if use_cache {
            if let (Some(cache), Some(path)) = (self.cache.as_ref(), self.most_recent_snapshot()?) {
                info!(path = %path.display(), "loading confirmed exoplanets from snapshot");
                return cache.read(&path);
            }
            debug!("no confirmed-exoplanet snapshot available, downloading");
        }
        self.download(reduced_columns)
    }

    /// Fetch the catalog from the archive and persist it.
    ///
    /// Nothing is written unless the download parses and, for
    /// `reduced_columns`, every reduced-set column is present.
    pub fn download(&self, reduced_columns: bool) -> Result<DataFrame, DataError> {
        info!(source = self.source.name(), url = %self.url, reduced_columns, "downloading confirmed exoplanets");
        let body = self.source.fetch(&self.url)?;
        let mut df = parse_csv(&body)?;
        if reduced_columns {
            df = ConfirmedSchema::project(&df)?;
        }
        info!(rows = df.height(), columns = df.width(), "confirmed exoplanets downloaded");

        self.save(&df)?;
        Ok(df)
    }

    /// Newest snapshot in the output directory, if any.
    pub fn most_recent_snapshot(&self) -> Result<Option<PathBuf>, DataError> {
        match &self.cache {
            Some(cache) => cache.latest(),
            None => Ok(None),
        }
    }

    /// Write `df` as today's snapshot. No-op without an output directory.
    pub fn save(&self, df: &DataFrame) -> Result<Option<PathBuf>, DataError> {
        self.cache.as_ref().map(|cache| cache.write(df)).transpose()
    }
}
