use crate::error::ValidationError;
use crate::placement::{parse_v3_placement, parse_v4_placement, UnitPlacement};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bundle format generation, selecting the placement grammar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleFormat {
    /// Legacy bundles: `container:target=index`, bootstrap machine only.
    V3,
    /// Current bundles: `container:target/index`, any machine or `new`.
    #[default]
    V4,
}

impl BundleFormat {
    /// Character separating a unit name from its index.
    pub fn unit_separator(self) -> char {
        match self {
            Self::V3 => '=',
            Self::V4 => '/',
        }
    }

    pub fn parse_placement(self, raw: &str) -> Result<UnitPlacement, ValidationError> {
        match self {
            Self::V3 => parse_v3_placement(raw),
            Self::V4 => parse_v4_placement(raw),
        }
    }
}

impl fmt::Display for BundleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V3 => f.write_str("v3"),
            Self::V4 => f.write_str("v4"),
        }
    }
}

impl FromStr for BundleFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v3" => Ok(Self::V3),
            "v4" => Ok(Self::V4),
            _ => Err(ValidationError::UnknownFormat(s.to_owned())),
        }
    }
}
