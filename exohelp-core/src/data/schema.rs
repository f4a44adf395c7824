use polars::prelude::*;

/// Reduced column set for the confirmed-exoplanet table, in output order.
///
/// Physical/orbital parameters carry their `err1`/`err2` uncertainty columns
/// and `lim` flag alongside them.
pub const CONFIRMED_COLUMNS: [&str; 92] = [
    "pl_name",
    "hostname",
    "default_flag",
    "sy_snum",
    "sy_pnum",
    "discoverymethod",
    "disc_year",
    "disc_facility",
    "soltype",
    "pl_controv_flag",
    "pl_refname",
    "pl_orbper",
    "pl_orbpererr1",
    "pl_orbpererr2",
    "pl_orbperlim",
    "pl_orbsmax",
    "pl_orbsmaxerr1",
    "pl_orbsmaxerr2",
    "pl_orbsmaxlim",
    "pl_rade",
    "pl_radeerr1",
    "pl_radeerr2",
    "pl_radelim",
    "pl_radj",
    "pl_radjerr1",
    "pl_radjerr2",
    "pl_radjlim",
    "pl_bmasse",
    "pl_bmasseerr1",
    "pl_bmasseerr2",
    "pl_bmasselim",
    "pl_bmassj",
    "pl_bmassjerr1",
    "pl_bmassjerr2",
    "pl_bmassjlim",
    "pl_bmassprov",
    "pl_orbeccen",
    "pl_orbeccenerr1",
    "pl_orbeccenerr2",
    "pl_orbeccenlim",
    "pl_insol",
    "pl_insolerr1",
    "pl_insolerr2",
    "pl_insollim",
    "pl_eqt",
    "pl_eqterr1",
    "pl_eqterr2",
    "pl_eqtlim",
    "ttv_flag",
    "st_refname",
    "st_spectype",
    "st_teff",
    "st_tefferr1",
    "st_tefferr2",
    "st_tefflim",
    "st_rad",
    "st_raderr1",
    "st_raderr2",
    "st_radlim",
    "st_mass",
    "st_masserr1",
    "st_masserr2",
    "st_masslim",
    "st_met",
    "st_meterr1",
    "st_meterr2",
    "st_metlim",
    "st_metratio",
    "st_logg",
    "st_loggerr1",
    "st_loggerr2",
    "st_logglim",
    "sy_refname",
    "rastr",
    "ra",
    "decstr",
    "dec",
    "sy_dist",
    "sy_disterr1",
    "sy_disterr2",
    "sy_vmag",
    "sy_vmagerr1",
    "sy_vmagerr2",
    "sy_kmag",
    "sy_kmagerr1",
    "sy_kmagerr2",
    "sy_gaiamag",
    "sy_gaiamagerr1",
    "sy_gaiamagerr2",
    "rowupdate",
    "pl_pubdate",
    "releasedate",
];

/// Column set of the confirmed-exoplanet table.
pub struct ConfirmedSchema;

impl ConfirmedSchema {
    /// Columns of `df` missing from the reduced set, in reduced-set order.
    pub fn missing_columns(df: &DataFrame) -> Vec<String> {
        CONFIRMED_COLUMNS
            .iter()
            .filter(|name| df.column(name).is_err())
            .map(|name| name.to_string())
            .collect()
    }

    /// Check every reduced-set column is present.
    pub fn validate(df: &DataFrame) -> Result<(), SchemaError> {
        let missing = Self::missing_columns(df);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::MissingColumns(missing))
        }
    }

    /// Project `df` onto exactly [`CONFIRMED_COLUMNS`], in that order.
    pub fn project(df: &DataFrame) -> Result<DataFrame, SchemaError> {
        Self::validate(df)?;
        df.select(CONFIRMED_COLUMNS)
            .map_err(|e| SchemaError::Projection(e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("column projection failed: {0}")]
    Projection(String),

    #[error("no table found in document")]
    NoTable,

    #[error("table has no data rows")]
    EmptyTable,

    #[error("row {row:?} has {found} cells, header has {expected}")]
    RaggedRow {
        row: String,
        expected: usize,
        found: usize,
    },
}
