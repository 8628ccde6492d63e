//! Surveillance modules and population qualifiers.
//!
//! Both are closed enumerations. Formula selection and population applicability are decided by
//! exhaustive matches here, so adding a module forces a decision on both.

use crate::{FalconError, FalconResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A surveillance category with its own rate convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurveillanceModule {
    /// Ventilator-Associated Event
    #[serde(rename = "VAE")]
    Vae,
    /// Central Line-Associated Bloodstream Infection
    #[serde(rename = "CLABSI")]
    Clabsi,
    /// Catheter-Associated Urinary Tract Infection
    #[serde(rename = "CAUTI")]
    Cauti,
    /// Surgical Site Infection
    #[serde(rename = "SSI")]
    Ssi,
    /// Dialysis Events
    #[serde(rename = "DE")]
    De,
}

/// Multiplier applied to `numerator / denominator`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateScale {
    /// Per 1000 device-days.
    PerThousand,
    /// Per 100 procedures or patients.
    PerHundred,
}

impl RateScale {
    pub fn multiplier(self) -> f64 {
        match self {
            RateScale::PerThousand => 1000.0,
            RateScale::PerHundred => 100.0,
        }
    }
}

impl SurveillanceModule {
    /// Every module, in dashboard order.
    pub const ALL: [SurveillanceModule; 5] = [
        SurveillanceModule::Vae,
        SurveillanceModule::Clabsi,
        SurveillanceModule::Cauti,
        SurveillanceModule::Ssi,
        SurveillanceModule::De,
    ];

    pub fn code(self) -> &'static str {
        match self {
            SurveillanceModule::Vae => "VAE",
            SurveillanceModule::Clabsi => "CLABSI",
            SurveillanceModule::Cauti => "CAUTI",
            SurveillanceModule::Ssi => "SSI",
            SurveillanceModule::De => "DE",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SurveillanceModule::Vae => "Ventilator-Associated Event",
            SurveillanceModule::Clabsi => "Central Line-Associated Bloodstream Infection",
            SurveillanceModule::Cauti => "Catheter-Associated Urinary Tract Infection",
            SurveillanceModule::Ssi => "Surgical Site Infection",
            SurveillanceModule::De => "Dialysis Events",
        }
    }

    /// Whether entries for this module carry an Adults/NICU qualifier.
    pub fn tracks_population(self) -> bool {
        match self {
            SurveillanceModule::Vae | SurveillanceModule::Clabsi | SurveillanceModule::Cauti => {
                true
            }
            SurveillanceModule::Ssi | SurveillanceModule::De => false,
        }
    }

    pub fn rate_scale(self) -> RateScale {
        match self {
            SurveillanceModule::Vae | SurveillanceModule::Clabsi | SurveillanceModule::Cauti => {
                RateScale::PerThousand
            }
            SurveillanceModule::Ssi | SurveillanceModule::De => RateScale::PerHundred,
        }
    }

    /// Drops the population qualifier for modules that do not track one.
    pub fn applicable_population(self, population: Option<Population>) -> Option<Population> {
        if self.tracks_population() {
            population
        } else {
            None
        }
    }
}

impl fmt::Display for SurveillanceModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SurveillanceModule {
    type Err = FalconError;

    fn from_str(s: &str) -> FalconResult<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FalconError::UnknownModule(s.to_owned()))
    }
}

/// Patient population qualifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Population {
    Adults,
    #[serde(rename = "NICU")]
    Nicu,
}

impl Population {
    pub const ALL: [Population; 2] = [Population::Adults, Population::Nicu];

    pub fn label(self) -> &'static str {
        match self {
            Population::Adults => "Adults",
            Population::Nicu => "NICU",
        }
    }
}

impl fmt::Display for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Population {
    type Err = FalconError;

    fn from_str(s: &str) -> FalconResult<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| FalconError::UnknownPopulation(s.to_owned()))
    }
}
