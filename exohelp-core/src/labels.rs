//! Display metadata for archive columns.
//!
//! Maps archive column identifiers (`pl_orbper`, `st_mass`, ...) to a LaTeX
//! unit, a LaTeX symbol, and a plain English name. Presentation only; nothing
//! in the loaders or formulas reads it.

use polars::prelude::*;
use std::sync::OnceLock;

/// Display metadata for a single archive column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLabel {
    pub column: &'static str,
    /// LaTeX unit, empty for dimensionless columns.
    pub unit: &'static str,
    pub latex_name: &'static str,
    pub common_name: &'static str,
}

impl ColumnLabel {
    /// LaTeX symbol with its unit appended, e.g. `$P_{\mathrm{orb}}\,(\mathrm{days})$`.
    ///
    /// Dimensionless columns return the bare symbol.
    pub fn latex_name_with_units(&self) -> String {
        if self.unit.is_empty() {
            return self.latex_name.to_string();
        }
        let symbol = self.latex_name.strip_suffix('$').unwrap_or(self.latex_name);
        format!(r"{symbol}\,({})$", self.unit.replace('$', ""))
    }
}

const LABELS: [ColumnLabel; 19] = [
    label("pl_name", "", "Name", "Planet Name"),
    label("pl_orbper", r"$\mathrm{days}$", r"$P_{\mathrm{orb}}$", "Orbital Period"),
    label("pl_orbsmax", r"$\mathrm{AU}$", r"$a_{\mathrm{orb}}$", "Orbital Semi-Major Axis"),
    label("pl_rade", r"$\mathrm{R}_{\oplus}$", r"$R_{\mathrm{p}}$", "Planet Radius"),
    label("pl_radj", r"$\mathrm{R}_{\mathrm{J}}$", r"$R_{\mathrm{j}}$", "Jupiter Radius"),
    label("pl_bmasse", r"$\mathrm{M}_{\oplus}$", r"$M_{\mathrm{p}}$", "Planet Mass"),
    label("pl_bmassj", r"$\mathrm{M}_{\mathrm{J}}$", r"$M_{\mathrm{j}}$", "Jupiter Mass"),
    label("pl_orbeccen", "", r"$e$", "Orbital Eccentricity"),
    label("pl_insol", r"$\mathrm{S}_{\odot}$", r"$S_{\mathrm{ins}}$", "Incident Stellar Flux"),
    label("pl_eqt", r"$\mathrm{K}$", r"$T_{\mathrm{eq}}$", "Equilibrium Temperature"),
    label("st_teff", r"$\mathrm{K}$", r"$T_{\mathrm{eff}}$", "Stellar Effective Temperature"),
    label("st_rad", r"$\mathrm{R}_{\odot}$", r"$R_{\star}$", "Stellar Radius"),
    label("st_mass", r"$\mathrm{M}_{\odot}$", r"$M_{\star}$", "Stellar Mass"),
    label("st_met", "", r"$Z$", "Stellar Metallicity"),
    label("st_logg", r"$\mathrm{cm/s^2}$", r"$\log(g)$", "Stellar Surface Gravity"),
    label("sy_dist", r"$\mathrm{parsecs}$", r"$d_{\mathrm{sy}}$", "System Distance"),
    label("sy_vmag", r"$\mathrm{mag}$", r"$V_{\mathrm{mag}}$", "System Visual Magnitude"),
    label("sy_kmag", r"$\mathrm{mag}$", r"$K_{\mathrm{mag}}$", "System K-band Magnitude"),
    label("sy_gaiamag", r"$\mathrm{mag}$", r"$G_{\mathrm{mag}}$", "System G-band Magnitude"),
];

const fn label(
    column: &'static str,
    unit: &'static str,
    latex_name: &'static str,
    common_name: &'static str,
) -> ColumnLabel {
    ColumnLabel {
        column,
        unit,
        latex_name,
        common_name,
    }
}

/// Immutable lookup from archive column to [`ColumnLabel`].
#[derive(Debug, Clone)]
pub struct LabelTable {
    labels: Vec<ColumnLabel>,
}

impl LabelTable {
    /// The built-in table, constructed on first use.
    pub fn standard() -> &'static LabelTable {
        static TABLE: OnceLock<LabelTable> = OnceLock::new();
        TABLE.get_or_init(|| LabelTable {
            labels: LABELS.to_vec(),
        })
    }

    pub fn get(&self, column: &str) -> Option<&ColumnLabel> {
        self.labels.iter().find(|l| l.column == column)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnLabel> {
        self.labels.iter()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Render the table as a frame: one row per column identifier.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let columns: Vec<&str> = self.labels.iter().map(|l| l.column).collect();
        let units: Vec<&str> = self.labels.iter().map(|l| l.unit).collect();
        let latex: Vec<&str> = self.labels.iter().map(|l| l.latex_name).collect();
        let common: Vec<&str> = self.labels.iter().map(|l| l.common_name).collect();
        let with_units: Vec<String> = self
            .labels
            .iter()
            .map(ColumnLabel::latex_name_with_units)
            .collect();

        DataFrame::new(vec![
            Column::new("column".into(), columns),
            Column::new("unit".into(), units),
            Column::new("latex_name".into(), latex),
            Column::new("common_name".into(), common),
            Column::new("latex_name_with_units".into(), with_units),
        ])
    }
}
