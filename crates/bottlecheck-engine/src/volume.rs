//! Bottle volume parsing.
//!
//! Volumes are compared in canonical millilitres, held as [`Decimal`] so
//! `1.75l` is exactly `1750` and equality never depends on float rounding.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

/// `<number>[.<number>] <unit>` with optional whitespace. Retailer spellings
/// such as `mls`, `cls` and `ltr` are accepted. The trailing word boundary
/// keeps label text such as `"No. 7 Label"` from reading as litres.
static VOLUME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(ml|cl|litre|liter|l)(?:s|tr|trs)?\b")
        .expect("valid volume regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeUnit {
    Millilitre,
    Centilitre,
    Litre,
}

impl VolumeUnit {
    fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "ml" => Some(Self::Millilitre),
            "cl" => Some(Self::Centilitre),
            "l" | "liter" | "litre" => Some(Self::Litre),
            _ => None,
        }
    }

    fn millilitres_per_unit(self) -> Decimal {
        match self {
            Self::Millilitre => Decimal::ONE,
            Self::Centilitre => Decimal::TEN,
            Self::Litre => Decimal::ONE_THOUSAND,
        }
    }
}

/// A volume in canonical millilitres.
///
/// Equality is numeric: `Millilitres` parsed from `"75cl"` equals one parsed
/// from `"750 ml"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Millilitres(Decimal);

impl Millilitres {
    #[must_use]
    pub fn new(value: Decimal, unit: VolumeUnit) -> Self {
        Self((value * unit.millilitres_per_unit()).normalize())
    }

    #[must_use]
    pub fn value(self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Millilitres {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ml", self.0)
    }
}

/// Finds the first volume phrase in `text` and converts it to millilitres.
///
/// Returns `None` when no phrase is present; that means "volume unknown",
/// not zero.
#[must_use]
pub fn parse_volume(text: &str) -> Option<Millilitres> {
    let caps = VOLUME_RE.captures(text)?;
    let value = Decimal::from_str(caps.get(1)?.as_str()).ok()?;
    let unit = VolumeUnit::from_label(caps.get(2)?.as_str())?;
    Some(Millilitres::new(value, unit))
}
