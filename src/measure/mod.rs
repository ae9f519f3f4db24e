//! Klinische maten van de voet en hun opslag.
//!
//! Alle hoekmaten gebruiken dezelfde regel: de gerichte hoek van lijn A
//! naar lijn B, teruggebracht tot de kleinste ongerichte hoek via
//! `min(hoek, 360 - hoek)`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::geom::Line2;

/// Identificatie van een berekende parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Param {
    /// Voetlengte in mm.
    Length,
    /// Voetbreedte in mm.
    WidthFoot,
    /// Hielbreedte in mm.
    WidthHeel,
    /// Hoek tussen BG en GL.
    Alpha,
    /// Hoek tussen HM en FH.
    Beta,
    /// Hoek tussen BG en FH.
    Gamma,
    /// Hoek van Clark: tussen GN en de verse lijn G-B.
    Clark,
    /// Coëfficiënt van Chijin: |DE| / |EI|, dimensieloos.
    Chijin,
    /// Coëfficiënt w: lengte / voetbreedte, dimensieloos.
    W,
}

impl Param {
    pub const ALL: [Self; 9] = [
        Self::Length,
        Self::WidthFoot,
        Self::WidthHeel,
        Self::Alpha,
        Self::Beta,
        Self::Gamma,
        Self::Clark,
        Self::Chijin,
        Self::W,
    ];

    /// Naam zoals die in snapshots en de projectbestanden staat.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Length => "length",
            Self::WidthFoot => "width_foot",
            Self::WidthHeel => "width_heel",
            Self::Alpha => "alpha",
            Self::Beta => "beta",
            Self::Gamma => "gamma",
            Self::Clark => "clark",
            Self::Chijin => "chijin",
            Self::W => "w",
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Param {
    type Err = UnknownParam;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|param| param.name() == s)
            .ok_or_else(|| UnknownParam(s.to_owned()))
    }
}

impl Serialize for Param {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Fout voor een naam die geen bekende parameter is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownParam(pub String);

impl fmt::Display for UnknownParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "onbekende parameter `{}`", self.0)
    }
}

impl std::error::Error for UnknownParam {}

/// Parameterverzameling: een parameter is afwezig tot de engine hem
/// berekend heeft. Een afwezige parameter lezen levert bewust `None` en
/// nooit een stille 0.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    values: BTreeMap<Param, f64>,
}

impl Parameters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, param: Param) -> Option<f64> {
        self.values.get(&param).copied()
    }

    #[must_use]
    pub fn contains(&self, param: Param) -> bool {
        self.values.contains_key(&param)
    }

    /// Zet een waarde en geeft terug of die veranderde.
    pub fn set(&mut self, param: Param, value: f64) -> bool {
        self.values.insert(param, value) != Some(value)
    }

    /// Laat een parameter vervallen; geeft de oude waarde terug.
    pub fn remove(&mut self, param: Param) -> Option<f64> {
        self.values.remove(&param)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Param, f64)> + '_ {
        self.values.iter().map(|(param, value)| (*param, *value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Kleinste ongerichte hoek tussen twee lijnen in graden.
///
/// Berekent de gerichte hoek van `a` naar `b` en geeft
/// `min(hoek, 360 - hoek)` terug; nooit negatief en in de praktijk nooit
/// groter dan 180.
#[must_use]
pub fn angle_between(a: Line2, b: Line2) -> f64 {
    let angle = a.angle_to(b);
    angle.min(360.0 - angle)
}

/// Zet een pixelafstand om naar millimeters via de dpmm-kalibratie.
#[must_use]
pub fn to_millimeters(pixels: f64, dpmm: f64) -> f64 {
    pixels / dpmm
}
