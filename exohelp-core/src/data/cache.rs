//! CSV snapshot cache.
//!
//! Layout: `{dir}/{YYYY}_{MM}_{DD}_{marker}.csv` for dated series, or
//! `{dir}/{file_name}` for a single fixed snapshot, plus a `snapshots.json`
//! manifest shared by every series in the directory.
//!
//! Features:
//! - Atomic writes (stage to .tmp, rename into place, roll back on failure)
//! - Manifest entry per snapshot (retrieval timestamp, shape, BLAKE3 hash)
//! - Newest snapshot resolved from the manifest timestamp, with a lexical
//!   filename scan as fallback when no manifest is present
//! - Same-day writes overwrite the day's file and manifest entry

use super::provider::DataError;
use chrono::{DateTime, Local, NaiveDateTime};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name of the manifest sidecar.
pub const MANIFEST_FILE: &str = "snapshots.json";

/// How snapshot files in a directory are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotNaming {
    /// One file per retrieval day: `{YYYY}_{MM}_{DD}_{marker}.csv`.
    Dated { marker: String },
    /// A single file that every write replaces.
    Fixed { file_name: String },
}

impl SnapshotNaming {
    fn file_name(&self, retrieved_at: NaiveDateTime) -> String {
        match self {
            SnapshotNaming::Dated { marker } => {
                format!("{}_{marker}.csv", retrieved_at.format("%Y_%m_%d"))
            }
            SnapshotNaming::Fixed { file_name } => file_name.clone(),
        }
    }

    fn matches(&self, name: &str) -> bool {
        match self {
            SnapshotNaming::Dated { marker } => name.contains(marker.as_str()) && name.ends_with(".csv"),
            SnapshotNaming::Fixed { file_name } => name == file_name,
        }
    }
}

/// Manifest entry for one snapshot file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    pub file_name: String,
    pub retrieved_at: NaiveDateTime,
    pub row_count: usize,
    pub column_count: usize,
    pub data_hash: String,
}

/// Index of every snapshot written into a directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotManifest {
    pub snapshots: Vec<SnapshotMeta>,
}

impl SnapshotManifest {
    fn upsert(&mut self, meta: SnapshotMeta) {
        self.snapshots.retain(|m| m.file_name != meta.file_name);
        self.snapshots.push(meta);
        self.snapshots.sort_by(|a, b| a.retrieved_at.cmp(&b.retrieved_at));
    }
}

/// A directory of CSV snapshots for one table.
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    dir: PathBuf,
    naming: SnapshotNaming,
}

impl SnapshotCache {
    /// Open (creating if needed) a snapshot directory.
    pub fn new(dir: impl Into<PathBuf>, naming: SnapshotNaming) -> Result<Self, DataError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            DataError::Cache(format!("failed to create {}: {e}", dir.display()))
        })?;
        Ok(Self { dir, naming })
    }

    /// Dated series whose file names contain `marker`.
    pub fn dated(dir: impl Into<PathBuf>, marker: &str) -> Result<Self, DataError> {
        Self::new(
            dir,
            SnapshotNaming::Dated {
                marker: marker.to_string(),
            },
        )
    }

    /// Single snapshot stored under `file_name`.
    pub fn fixed(dir: impl Into<PathBuf>, file_name: &str) -> Result<Self, DataError> {
        Self::new(
            dir,
            SnapshotNaming::Fixed {
                file_name: file_name.to_string(),
            },
        )
    }

    /// Root directory of the cache.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn naming(&self) -> &SnapshotNaming {
        &self.naming
    }

    fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    /// Path a snapshot retrieved at `retrieved_at` is written to.
    pub fn path_for(&self, retrieved_at: NaiveDateTime) -> PathBuf {
        self.dir.join(self.naming.file_name(retrieved_at))
    }

    /// Read the manifest. A missing file is an empty manifest.
    pub fn manifest(&self) -> Result<Option<SnapshotManifest>, DataError> {
        let path = self.manifest_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| DataError::Cache(format!("manifest read: {e}")))?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| DataError::Cache(format!("manifest parse: {e}")))
    }

    /// Newest snapshot for this table, if any.
    ///
    /// Uses the manifest's stored timestamps; falls back to the last file
    /// name in lexical order when the directory has no readable manifest or
    /// the manifest knows no file of this series.
    pub fn latest(&self) -> Result<Option<PathBuf>, DataError> {
        match self.manifest() {
            Ok(Some(manifest)) => {
                let newest = manifest
                    .snapshots
                    .iter()
                    .filter(|m| self.naming.matches(&m.file_name))
                    .filter(|m| self.dir.join(&m.file_name).exists())
                    .max_by_key(|m| m.retrieved_at)
                    .map(|m| self.dir.join(&m.file_name));
                if newest.is_some() {
                    debug!(path = ?newest, "snapshot resolved from manifest");
                    return Ok(newest);
                }
            }
            Ok(None) => {}
            Err(e) => warn!(dir = %self.dir.display(), "ignoring unreadable manifest: {e}"),
        }
        self.latest_by_name()
    }

    /// Newest snapshot by lexical file-name order.
    ///
    /// Correct only while names carry a zero-padded date prefix.
    pub fn latest_by_name(&self) -> Result<Option<PathBuf>, DataError> {
        let entries = fs::read_dir(&self.dir)
            .map_err(|e| DataError::Cache(format!("read dir {}: {e}", self.dir.display())))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| DataError::Cache(format!("dir entry: {e}")))?;
            if let Some(name) = entry.file_name().to_str() {
                if self.naming.matches(name) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();

        let newest = names.pop().map(|name| self.dir.join(name));
        if newest.is_some() {
            debug!(path = ?newest, "snapshot resolved by file name");
        }
        Ok(newest)
    }

    /// Read a snapshot file into a frame.
    pub fn read(&self, path: &Path) -> Result<DataFrame, DataError> {
        read_csv_file(path)
    }

    /// Persist `df` as the snapshot retrieved now.
    pub fn write(&self, df: &DataFrame) -> Result<PathBuf, DataError> {
        self.write_at(df, Local::now().naive_local())
    }

    /// Persist `df` as the snapshot retrieved at `retrieved_at`.
    ///
    /// The CSV and the updated manifest are both staged as `.tmp` files
    /// before either is renamed into place. If the manifest cannot be
    /// committed the new CSV is removed and any file it replaced is restored,
    /// so a failed write leaves the directory as it was.
    pub fn write_at(&self, df: &DataFrame, retrieved_at: NaiveDateTime) -> Result<PathBuf, DataError> {
        let bytes = csv_bytes(df)?;
        let path = self.path_for(retrieved_at);
        let meta = SnapshotMeta {
            file_name: self.naming.file_name(retrieved_at),
            retrieved_at,
            row_count: df.height(),
            column_count: df.width(),
            data_hash: blake3::hash(&bytes).to_hex().to_string(),
        };

        let mut manifest = match self.manifest() {
            Ok(m) => m.unwrap_or_default(),
            Err(e) => {
                warn!(dir = %self.dir.display(), "rebuilding unreadable manifest from directory: {e}");
                self.scan_manifest()?
            }
        };
        manifest.upsert(meta);
        let json = serde_json::to_string_pretty(&manifest)
            .map_err(|e| DataError::Cache(format!("manifest serialization: {e}")))?;

        let manifest_path = self.manifest_path();
        let csv_tmp = stage(&path, &bytes)?;
        let manifest_tmp = match stage(&manifest_path, json.as_bytes()) {
            Ok(tmp) => tmp,
            Err(e) => {
                let _ = fs::remove_file(&csv_tmp);
                return Err(e);
            }
        };

        let backup = sibling(&path, ".bak");
        let replaced = path.exists();
        if replaced {
            fs::rename(&path, &backup).map_err(|e| {
                let _ = fs::remove_file(&csv_tmp);
                let _ = fs::remove_file(&manifest_tmp);
                DataError::Cache(format!("back up {}: {e}", path.display()))
            })?;
        }

        let committed = fs::rename(&csv_tmp, &path)
            .map_err(|e| format!("atomic rename of {} failed: {e}", path.display()))
            .and_then(|()| {
                fs::rename(&manifest_tmp, &manifest_path).map_err(|e| {
                    let _ = fs::remove_file(&path);
                    format!("manifest commit failed: {e}")
                })
            });

        if let Err(reason) = committed {
            let _ = fs::remove_file(&csv_tmp);
            let _ = fs::remove_file(&manifest_tmp);
            if replaced {
                let _ = fs::rename(&backup, &path);
            }
            warn!(path = %path.display(), "snapshot write rolled back: {reason}");
            return Err(DataError::Cache(reason));
        }
        if replaced {
            let _ = fs::remove_file(&backup);
        }

        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "snapshot written"
        );
        Ok(path)
    }

    /// Manifest reconstructed from the CSV files present in the directory.
    ///
    /// Retrieval times come from file modification times. Files that cannot
    /// be read as CSV are left out.
    fn scan_manifest(&self) -> Result<SnapshotManifest, DataError> {
        let entries = fs::read_dir(&self.dir)
            .map_err(|e| DataError::Cache(format!("read dir {}: {e}", self.dir.display())))?;

        let mut manifest = SnapshotManifest::default();
        for entry in entries {
            let entry = entry.map_err(|e| DataError::Cache(format!("dir entry: {e}")))?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !name.ends_with(".csv") {
                continue;
            }
            let path = entry.path();
            let scanned = fs::read(&path)
                .map_err(|e| DataError::Cache(format!("read {}: {e}", path.display())))
                .and_then(|bytes| {
                    let df = read_csv_file(&path)?;
                    let modified = entry
                        .metadata()
                        .and_then(|m| m.modified())
                        .map_err(|e| DataError::Cache(format!("mtime {}: {e}", path.display())))?;
                    Ok(SnapshotMeta {
                        file_name: name.clone(),
                        retrieved_at: DateTime::<Local>::from(modified).naive_local(),
                        row_count: df.height(),
                        column_count: df.width(),
                        data_hash: blake3::hash(&bytes).to_hex().to_string(),
                    })
                });
            match scanned {
                Ok(meta) => manifest.upsert(meta),
                Err(e) => warn!(file = %name, "left out of rebuilt manifest: {e}"),
            }
        }
        Ok(manifest)
    }
}

// ── CSV I/O helpers ─────────────────────────────────────────────────

/// Parse CSV text with a header row, inferring types over every row.
pub fn parse_csv(text: &str) -> Result<DataFrame, DataError> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(Cursor::new(text.as_bytes().to_vec()))
        .finish()
        .map_err(|e| DataError::Parse(format!("csv: {e}")))
}

/// Read a CSV file with a header row, inferring types over every row.
pub fn read_csv_file(path: &Path) -> Result<DataFrame, DataError> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|e| DataError::Parse(format!("{}: {e}", path.display())))
}

/// Serialize a frame to CSV bytes with a header row.
pub fn csv_bytes(df: &DataFrame) -> Result<Vec<u8>, DataError> {
    let mut buf = Vec::new();
    CsvWriter::new(&mut buf)
        .include_header(true)
        .finish(&mut df.clone())
        .map_err(|e| DataError::Cache(format!("csv serialization: {e}")))?;
    Ok(buf)
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Write `bytes` next to `path` as `{path}.tmp`, ready to be renamed into place.
fn stage(path: &Path, bytes: &[u8]) -> Result<PathBuf, DataError> {
    let tmp_path = sibling(path, ".tmp");
    fs::write(&tmp_path, bytes).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        DataError::Cache(format!("write {}: {e}", tmp_path.display()))
    })?;
    Ok(tmp_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn sample_frame() -> DataFrame {
        df!(
            "pl_name" => &["51 Peg b", "HD 209458 b"],
            "default_flag" => &[1i64, 1],
            "pl_orbper" => &[4.230785, 3.52474859],
        )
        .unwrap()
    }

    #[test]
    fn dated_file_names_are_zero_padded() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::dated(dir.path(), "confirmed_exoplanets").unwrap();
        let path = cache.path_for(at(2024, 3, 7, 12));
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "2024_03_07_confirmed_exoplanets.csv"
        );
    }

    #[test]
    fn write_and_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::dated(dir.path(), "confirmed_exoplanets").unwrap();

        let df = sample_frame();
        let path = cache.write_at(&df, at(2024, 1, 2, 9)).unwrap();
        let loaded = cache.read(&path).unwrap();

        assert!(loaded.equals_missing(&df));
    }

    #[test]
    fn latest_prefers_manifest_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::new(
            dir.path(),
            SnapshotNaming::Dated {
                marker: "confirmed_exoplanets".into(),
            },
        )
        .unwrap();

        cache.write_at(&sample_frame(), at(2024, 5, 1, 8)).unwrap();
        cache.write_at(&sample_frame(), at(2024, 6, 1, 8)).unwrap();

        let latest = cache.latest().unwrap().unwrap();
        assert!(latest.ends_with("2024_06_01_confirmed_exoplanets.csv"));

        // A stray file that sorts last lexically is ignored while the manifest knows the series.
        fs::write(dir.path().join("zz_confirmed_exoplanets.csv"), "a\n1\n").unwrap();
        let latest = cache.latest().unwrap().unwrap();
        assert!(latest.ends_with("2024_06_01_confirmed_exoplanets.csv"));
        let by_name = cache.latest_by_name().unwrap().unwrap();
        assert!(by_name.ends_with("zz_confirmed_exoplanets.csv"));
    }

    #[test]
    fn latest_falls_back_to_lexical_scan_without_manifest() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("2023_12_31_confirmed_exoplanets.csv"), "a\n1\n").unwrap();
        fs::write(dir.path().join("2024_01_01_confirmed_exoplanets.csv"), "a\n2\n").unwrap();
        fs::write(dir.path().join("2024_01_02_confirmed_exoplanets.csv.tmp"), "a\n3\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();

        let cache = SnapshotCache::dated(dir.path(), "confirmed_exoplanets").unwrap();
        let latest = cache.latest().unwrap().unwrap();
        assert!(latest.ends_with("2024_01_01_confirmed_exoplanets.csv"));
    }

    #[test]
    fn empty_directory_has_no_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::fixed(dir.path(), "solar_system_planets.csv").unwrap();
        assert!(cache.latest().unwrap().is_none());
        assert!(cache.manifest().unwrap().is_none());
    }

    #[test]
    fn same_day_write_overwrites_file_and_entry() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::dated(dir.path(), "confirmed_exoplanets").unwrap();

        let first = cache.write_at(&sample_frame(), at(2024, 2, 2, 8)).unwrap();
        let smaller = sample_frame().head(Some(1));
        let second = cache.write_at(&smaller, at(2024, 2, 2, 17)).unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.read(&second).unwrap().height(), 1);

        let manifest = cache.manifest().unwrap().unwrap();
        assert_eq!(manifest.snapshots.len(), 1);
        assert_eq!(manifest.snapshots[0].row_count, 1);
        assert_eq!(manifest.snapshots[0].retrieved_at, at(2024, 2, 2, 17));
    }

    #[test]
    fn series_share_one_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let dated = SnapshotCache::dated(dir.path(), "confirmed_exoplanets").unwrap();
        let fixed = SnapshotCache::fixed(dir.path(), "solar_system_planets.csv").unwrap();

        dated.write_at(&sample_frame(), at(2024, 1, 1, 0)).unwrap();
        fixed.write_at(&sample_frame(), at(2024, 1, 2, 0)).unwrap();

        assert!(dated
            .latest()
            .unwrap()
            .unwrap()
            .ends_with("2024_01_01_confirmed_exoplanets.csv"));
        assert!(fixed
            .latest()
            .unwrap()
            .unwrap()
            .ends_with("solar_system_planets.csv"));
        assert_eq!(dated.manifest().unwrap().unwrap().snapshots.len(), 2);
    }

    #[test]
    fn manifest_hash_tracks_content() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::dated(dir.path(), "confirmed_exoplanets").unwrap();

        cache.write_at(&sample_frame(), at(2024, 1, 1, 0)).unwrap();
        cache.write_at(&sample_frame(), at(2024, 1, 2, 0)).unwrap();
        cache.write_at(&sample_frame().head(Some(1)), at(2024, 1, 3, 0)).unwrap();

        let manifest = cache.manifest().unwrap().unwrap();
        assert_eq!(manifest.snapshots[0].data_hash, manifest.snapshots[1].data_hash);
        assert_ne!(manifest.snapshots[1].data_hash, manifest.snapshots[2].data_hash);
    }

    #[test]
    fn corrupt_manifest_falls_back_to_scan() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::dated(dir.path(), "confirmed_exoplanets").unwrap();
        cache.write_at(&sample_frame(), at(2024, 1, 1, 0)).unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "{ not json").unwrap();

        assert!(cache.manifest().is_err());
        let latest = cache.latest().unwrap().unwrap();
        assert!(latest.ends_with("2024_01_01_confirmed_exoplanets.csv"));
    }

    fn block_manifest(dir: &Path) {
        let manifest = dir.join(MANIFEST_FILE);
        let _ = fs::remove_file(&manifest);
        fs::create_dir_all(&manifest).unwrap();
        fs::write(manifest.join("occupied"), "x").unwrap();
    }

    fn leftovers(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n != MANIFEST_FILE)
            .collect();
        names.sort();
        names
    }

    #[test]
    fn failed_manifest_commit_leaves_no_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::dated(dir.path(), "confirmed_exoplanets").unwrap();
        block_manifest(dir.path());

        let result = cache.write_at(&sample_frame(), at(2024, 1, 1, 0));
        assert!(matches!(result, Err(DataError::Cache(_))), "got {result:?}");
        assert!(leftovers(dir.path()).is_empty(), "left {:?}", leftovers(dir.path()));
        assert!(cache.latest().unwrap().is_none());
    }

    #[test]
    fn failed_same_day_write_restores_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::dated(dir.path(), "confirmed_exoplanets").unwrap();
        let path = cache.write_at(&sample_frame(), at(2024, 1, 1, 8)).unwrap();
        block_manifest(dir.path());

        let result = cache.write_at(&sample_frame().head(Some(1)), at(2024, 1, 1, 17));
        assert!(result.is_err());
        assert_eq!(leftovers(dir.path()), vec!["2024_01_01_confirmed_exoplanets.csv".to_string()]);
        assert_eq!(cache.read(&path).unwrap().height(), 2);
    }

    #[test]
    fn latest_uses_newest_timestamp_in_unsorted_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SnapshotCache::dated(dir.path(), "confirmed_exoplanets").unwrap();
        cache.write_at(&sample_frame(), at(2024, 1, 1, 0)).unwrap();
        cache.write_at(&sample_frame(), at(2024, 3, 1, 0)).unwrap();

        let mut manifest = cache.manifest().unwrap().unwrap();
        manifest.snapshots.reverse();
        fs::write(
            dir.path().join(MANIFEST_FILE),
            serde_json::to_string(&manifest).unwrap(),
        )
        .unwrap();

        let latest = cache.latest().unwrap().unwrap();
        assert!(latest.ends_with("2024_03_01_confirmed_exoplanets.csv"));
    }

    #[test]
    fn unreadable_manifest_is_rebuilt_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let dated = SnapshotCache::dated(dir.path(), "confirmed_exoplanets").unwrap();
        let fixed = SnapshotCache::fixed(dir.path(), "solar_system_planets.csv").unwrap();
        fixed.write_at(&sample_frame(), at(2024, 1, 1, 0)).unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "{ not json").unwrap();

        dated.write_at(&sample_frame(), at(2024, 2, 1, 0)).unwrap();

        let manifest = dated.manifest().unwrap().unwrap();
        let names: Vec<&str> = manifest.snapshots.iter().map(|m| m.file_name.as_str()).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"solar_system_planets.csv"));
        assert!(names.contains(&"2024_02_01_confirmed_exoplanets.csv"));

        let solar = manifest
            .snapshots
            .iter()
            .find(|m| m.file_name == "solar_system_planets.csv")
            .unwrap();
        assert_eq!(solar.row_count, 2);
        assert_eq!(solar.column_count, 3);
    }

    #[test]
    fn parse_csv_infers_late_floats() {
        let mut text = String::from("id,value\n");
        for i in 0..150 {
            text.push_str(&format!("{i},{i}\n"));
        }
        text.push_str("150,0.5\n");
        let df = parse_csv(&text).unwrap();
        assert_eq!(df.height(), 151);
        assert_eq!(df.column("value").unwrap().dtype(), &DataType::Float64);
    }
}
