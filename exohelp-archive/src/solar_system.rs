//! Solar-system reference table loader.
//!
//! The table is scraped from a single HTML page, cleaned into one numeric
//! row per body, and kept as one fixed-name snapshot that every download
//! replaces.

use crate::config::ArchiveConfig;
use exohelp_core::data::{
    extract_first_table, DataError, HttpSource, ReferenceTable, SnapshotCache, TableSource,
};
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Name of the single snapshot file.
pub const SNAPSHOT_FILE: &str = "solar_system_planets.csv";

pub struct SolarSystemPlanetLoader {
    url: String,
    source: Arc<dyn TableSource>,
    cache: Option<SnapshotCache>,
}

impl SolarSystemPlanetLoader {
    pub fn new(config: &ArchiveConfig) -> Result<Self, DataError> {
        config.validate()?;
        let source = HttpSource::new(config.timeout(), &config.user_agent)?;
        Self::with_source(config, Arc::new(source))
    }

    pub fn with_source(config: &ArchiveConfig, source: Arc<dyn TableSource>) -> Result<Self, DataError> {
        let cache = config
            .output_dir
            .as_ref()
            .map(|dir| SnapshotCache::fixed(dir, SNAPSHOT_FILE))
            .transpose()?;
        Ok(Self {
            url: config.solar_system_url.clone(),
            source,
            cache,
        })
    }

    pub fn output_dir(&self) -> Result<&Path, DataError> {
        self.cache
            .as_ref()
            .map(SnapshotCache::dir)
            .ok_or_else(|| DataError::Configuration("output directory is not set".into()))
    }

    /// Return the reference table, from the snapshot when `use_cache` allows it.
    pub fn load(&self, use_cache: bool) -> Result<DataFrame, DataError> {
        if use_cache {
            if let (Some(cache), Some(path)) = (self.cache.as_ref(), self.snapshot_path()?) {
                info!(path = %path.display(), "loading solar-system table from snapshot");
                return ReferenceTable::restore_types(cache.read(&path)?);
            }
            debug!("no solar-system snapshot available, downloading");
        }
        self.download_and_clean()
    }

    /// Fetch the page, clean its first table, and persist the result.
    pub fn download_and_clean(&self) -> Result<DataFrame, DataError> {
        info!(source = self.source.name(), url = %self.url, "downloading solar-system table");
        let html = self.source.fetch(&self.url)?;
        let grid = extract_first_table(&html)?;
        let df = ReferenceTable::clean(&grid)?;
        info!(bodies = df.height(), parameters = df.width() - 1, "solar-system table cleaned");

        self.save(&df)?;
        Ok(df)
    }

    /// The snapshot file, if one has been written.
    pub fn snapshot_path(&self) -> Result<Option<PathBuf>, DataError> {
        match &self.cache {
            Some(cache) => cache.latest(),
            None => Ok(None),
        }
    }

    /// Write `df` over the snapshot. No-op without an output directory.
    pub fn save(&self, df: &DataFrame) -> Result<Option<PathBuf>, DataError> {
        self.cache.as_ref().map(|cache| cache.write(df)).transpose()
    }
}
