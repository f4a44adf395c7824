//! Unit-tagged quantities for formula inputs.
//!
//! Every formula parameter is a [`Measure`]: either a plain number, which the
//! formula interprets in its documented default unit, or a [`Quantity`] that
//! carries its unit explicitly and is converted before use.

use crate::constants::{
    ASTRONOMICAL_UNIT_M, DAYS_PER_YEAR, EARTH_MASS_KG, EARTH_RADIUS_M, JUPITER_MASS_KG,
    JUPITER_RADIUS_M, SECONDS_PER_DAY, SOLAR_MASS_KG, SOLAR_RADIUS_M,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A unit of one physical dimension.
pub trait Unit: Copy + fmt::Debug {
    /// Size of one of this unit in the dimension's SI base unit.
    fn si_factor(self) -> f64;

    /// Short display symbol.
    fn symbol(self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MassUnit {
    Gram,
    Kilogram,
    EarthMass,
    JupiterMass,
    SolarMass,
}

impl Unit for MassUnit {
    fn si_factor(self) -> f64 {
        match self {
            MassUnit::Gram => 1e-3,
            MassUnit::Kilogram => 1.0,
            MassUnit::EarthMass => EARTH_MASS_KG,
            MassUnit::JupiterMass => JUPITER_MASS_KG,
            MassUnit::SolarMass => SOLAR_MASS_KG,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            MassUnit::Gram => "g",
            MassUnit::Kilogram => "kg",
            MassUnit::EarthMass => "M_earth",
            MassUnit::JupiterMass => "M_jup",
            MassUnit::SolarMass => "M_sun",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthUnit {
    Centimeter,
    Meter,
    Kilometer,
    EarthRadius,
    JupiterRadius,
    SolarRadius,
    AstronomicalUnit,
}

impl Unit for LengthUnit {
    fn si_factor(self) -> f64 {
        match self {
            LengthUnit::Centimeter => 1e-2,
            LengthUnit::Meter => 1.0,
            LengthUnit::Kilometer => 1e3,
            LengthUnit::EarthRadius => EARTH_RADIUS_M,
            LengthUnit::JupiterRadius => JUPITER_RADIUS_M,
            LengthUnit::SolarRadius => SOLAR_RADIUS_M,
            LengthUnit::AstronomicalUnit => ASTRONOMICAL_UNIT_M,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Centimeter => "cm",
            LengthUnit::Meter => "m",
            LengthUnit::Kilometer => "km",
            LengthUnit::EarthRadius => "R_earth",
            LengthUnit::JupiterRadius => "R_jup",
            LengthUnit::SolarRadius => "R_sun",
            LengthUnit::AstronomicalUnit => "AU",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VelocityUnit {
    CentimetersPerSecond,
    MetersPerSecond,
    KilometersPerSecond,
}

impl Unit for VelocityUnit {
    fn si_factor(self) -> f64 {
        match self {
            VelocityUnit::CentimetersPerSecond => 1e-2,
            VelocityUnit::MetersPerSecond => 1.0,
            VelocityUnit::KilometersPerSecond => 1e3,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            VelocityUnit::CentimetersPerSecond => "cm/s",
            VelocityUnit::MetersPerSecond => "m/s",
            VelocityUnit::KilometersPerSecond => "km/s",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    Second,
    Hour,
    Day,
    /// Julian year of 365.25 days.
    Year,
}

impl Unit for TimeUnit {
    fn si_factor(self) -> f64 {
        match self {
            TimeUnit::Second => 1.0,
            TimeUnit::Hour => 3_600.0,
            TimeUnit::Day => SECONDS_PER_DAY,
            TimeUnit::Year => DAYS_PER_YEAR * SECONDS_PER_DAY,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            TimeUnit::Second => "s",
            TimeUnit::Hour => "h",
            TimeUnit::Day => "d",
            TimeUnit::Year => "yr",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AngleUnit {
    Degree,
    Radian,
}

impl Unit for AngleUnit {
    fn si_factor(self) -> f64 {
        match self {
            AngleUnit::Degree => std::f64::consts::PI / 180.0,
            AngleUnit::Radian => 1.0,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            AngleUnit::Degree => "deg",
            AngleUnit::Radian => "rad",
        }
    }
}

/// A value paired with an explicit unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity<U> {
    pub value: f64,
    pub unit: U,
}

impl<U: Unit> Quantity<U> {
    pub fn new(value: f64, unit: U) -> Self {
        Self { value, unit }
    }

    /// Numeric value expressed in `target`.
    pub fn to(self, target: U) -> f64 {
        self.value * self.unit.si_factor() / target.si_factor()
    }

    /// Same quantity re-expressed in `target`.
    pub fn convert(self, target: U) -> Self {
        Self::new(self.to(target), target)
    }
}

impl<U: Unit> fmt::Display for Quantity<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.symbol())
    }
}

/// A formula input: plain number in the formula's default unit, or a tagged quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Measure<U> {
    Plain(f64),
    Tagged(Quantity<U>),
}

impl<U: Unit> Measure<U> {
    /// Resolve to a number in `default`, converting tagged quantities.
    pub fn resolve(self, default: U) -> f64 {
        match self {
            Measure::Plain(value) => value,
            Measure::Tagged(quantity) => quantity.to(default),
        }
    }
}

impl<U> From<f64> for Measure<U> {
    fn from(value: f64) -> Self {
        Measure::Plain(value)
    }
}

impl<U> From<Quantity<U>> for Measure<U> {
    fn from(quantity: Quantity<U>) -> Self {
        Measure::Tagged(quantity)
    }
}
