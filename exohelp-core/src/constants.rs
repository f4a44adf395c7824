//! Physical and astronomical constants in SI units.
//!
//! Values follow CODATA 2018 and the IAU 2015 nominal solar/planetary
//! constants, so results agree with the common astronomy toolkits.

/// Newtonian gravitational constant (m³ kg⁻¹ s⁻²).
pub const GRAVITATIONAL_CONSTANT: f64 = 6.674_30e-11;

/// Solar mass (kg), derived from the IAU nominal GM☉.
pub const SOLAR_MASS_KG: f64 = 1.988_409_870_698_051e30;

/// Earth mass (kg), derived from the IAU nominal GM⊕.
pub const EARTH_MASS_KG: f64 = 5.972_167_867_791_379e24;

/// Jupiter mass (kg), derived from the IAU nominal GMJ.
pub const JUPITER_MASS_KG: f64 = 1.898_124_597_336_050_5e27;

/// Nominal equatorial Earth radius (m).
pub const EARTH_RADIUS_M: f64 = 6.378_1e6;

/// Nominal equatorial Jupiter radius (m).
pub const JUPITER_RADIUS_M: f64 = 7.149_2e7;

/// Nominal solar radius (m).
pub const SOLAR_RADIUS_M: f64 = 6.957e8;

/// Astronomical unit (m).
pub const ASTRONOMICAL_UNIT_M: f64 = 1.495_978_707e11;

/// Seconds per day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Days per Julian year.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Earth-to-Jupiter mass ratio (M⊕ / MJ).
pub const EARTH_TO_JUPITER_MASS: f64 = EARTH_MASS_KG / JUPITER_MASS_KG;
