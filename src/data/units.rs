//! Length units accepted by `\hspace`, `\rule`, `p{...}` columns and `\\[...]`

use lazy_static::lazy_static;
use phf::phf_map;
use regex::Regex;
use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use super::metrics::X_HEIGHT;

/// A TeX length unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Unit {
    /// TeX point, 1/72.27 in
    Pt,
    /// Current font size
    Em,
    /// Current x-height
    Ex,
    /// Math unit, 1/18 em
    Mu,
    /// CSS pixel, 1/96 in
    Px,
    Cm,
    Mm,
    In,
    /// Big (PostScript) point, 1/72 in
    Bp,
    /// Pica, 12 pt
    Pc,
}

/// Unit suffix table
pub static UNITS: phf::Map<&'static str, Unit> = phf_map! {
    "pt" => Unit::Pt,
    "em" => Unit::Em,
    "ex" => Unit::Ex,
    "mu" => Unit::Mu,
    "px" => Unit::Px,
    "cm" => Unit::Cm,
    "mm" => Unit::Mm,
    "in" => Unit::In,
    "bp" => Unit::Bp,
    "pc" => Unit::Pc,
};

impl Unit {
    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Pt => "pt",
            Unit::Em => "em",
            Unit::Ex => "ex",
            Unit::Mu => "mu",
            Unit::Px => "px",
            Unit::Cm => "cm",
            Unit::Mm => "mm",
            Unit::In => "in",
            Unit::Bp => "bp",
            Unit::Pc => "pc",
        }
    }

    /// Size of one unit in points; font-relative units scale with `em`
    pub fn points(self, em: f64) -> f64 {
        match self {
            Unit::Pt => 1.0,
            Unit::Em => em,
            Unit::Ex => X_HEIGHT * em,
            Unit::Mu => em / 18.0,
            Unit::Px => 72.27 / 96.0,
            Unit::Cm => 72.27 / 2.54,
            Unit::Mm => 72.27 / 25.4,
            Unit::In => 72.27,
            Unit::Bp => 72.27 / 72.0,
            Unit::Pc => 12.0,
        }
    }
}

/// A signed length with its unit, resolved to points at layout time
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Length {
    pub value: f64,
    pub unit: Unit,
}

lazy_static! {
    static ref LENGTH_RE: Regex =
        Regex::new(r"^\s*([+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+))\s*([a-z]{2})\s*$").unwrap();
}

impl Length {
    pub const ZERO: Length = Length::new(0.0, Unit::Pt);

    pub const fn new(value: f64, unit: Unit) -> Self {
        Length { value, unit }
    }

    pub const fn mu(value: f64) -> Self {
        Length::new(value, Unit::Mu)
    }

    pub const fn em(value: f64) -> Self {
        Length::new(value, Unit::Em)
    }

    /// Parse a length such as `"3pt"`, `"-0.5em"` or `".25 in"`
    pub fn parse(s: &str) -> Option<Length> {
        let caps = LENGTH_RE.captures(s)?;
        let value = caps[1].parse::<f64>().ok()?;
        let unit = *UNITS.get(&caps[2])?;
        Some(Length { value, unit })
    }

    /// Resolve to points for a font whose em is `em` points
    pub fn to_points(&self, em: f64) -> f64 {
        self.value * self.unit.points(em)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}
