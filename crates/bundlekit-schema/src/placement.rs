//! Unit placement directives for both bundle format generations.
//!
//! Legacy (v3) bundles write `[container:]target[=index]` and may only target
//! the bootstrap machine `0`. Current (v4) bundles write
//! `[container:]target[/index]`, accept any machine number, and use `new` to
//! request a freshly provisioned machine.

use crate::error::ValidationError;
use crate::format::BundleFormat;
use serde::Serialize;
use std::fmt;

/// Container kinds a unit may be placed inside.
pub const CONTAINER_TYPES: &[&str] = &["lxc", "kvm"];

/// Machine token asking for a new machine (v4 only).
pub const NEW_MACHINE: &str = "new";

/// The only machine legacy bundles may target.
pub const BOOTSTRAP_MACHINE: &str = "0";

/// Where a unit should be deployed.
///
/// At most one of `machine` and `unit` is set. When both are empty the unit
/// may land on any machine; `container` may accompany any of the three cases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct UnitPlacement {
    pub container: String,
    pub machine: String,
    pub unit: String,
    pub unit_index: Option<u32>,
}

/// Typed view over the placement target of a [`UnitPlacement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementTarget<'a> {
    Any,
    Machine { id: &'a str },
    NewMachine,
    Unit { name: &'a str, index: Option<u32> },
}

impl UnitPlacement {
    pub fn new(
        container: impl Into<String>,
        machine: impl Into<String>,
        unit: impl Into<String>,
        unit_index: Option<u32>,
    ) -> Self {
        Self {
            container: container.into(),
            machine: machine.into(),
            unit: unit.into(),
            unit_index,
        }
    }

    /// True for the "no constraint" placement.
    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
            && self.machine.is_empty()
            && self.unit.is_empty()
            && self.unit_index.is_none()
    }

    pub fn target(&self) -> PlacementTarget<'_> {
        if self.machine == NEW_MACHINE {
            PlacementTarget::NewMachine
        } else if !self.machine.is_empty() {
            PlacementTarget::Machine { id: &self.machine }
        } else if !self.unit.is_empty() {
            PlacementTarget::Unit {
                name: &self.unit,
                index: self.unit_index,
            }
        } else {
            PlacementTarget::Any
        }
    }

    /// Render the placement as a v4 directive.
    ///
    /// Legacy unit names may hold characters the v4 grammar reads differently:
    /// a unit named `new` would become a new-machine request, and a `/` would
    /// split off an index. Those placements are rejected.
    pub fn to_v4(&self) -> Result<String, ValidationError> {
        if self.unit == NEW_MACHINE || self.unit.contains(BundleFormat::V4.unit_separator()) {
            return Err(ValidationError::NotV4Representable {
                unit: self.unit.clone(),
            });
        }
        Ok(self.to_string())
    }
}

/// Renders the placement in the v4 grammar.
///
/// Only placements from [`parse_v4_placement`] are guaranteed to parse back to
/// an equal value; convert legacy placements with [`UnitPlacement::to_v4`].
impl fmt::Display for UnitPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.container.is_empty() {
            write!(f, "{}:", self.container)?;
        }
        if self.machine.is_empty() {
            f.write_str(&self.unit)?;
        } else {
            f.write_str(&self.machine)?;
        }
        if let Some(index) = self.unit_index {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

pub fn is_valid_container(container: &str) -> bool {
    CONTAINER_TYPES.contains(&container)
}

/// Parse a legacy (v3) placement such as `lxc:mysql=1`.
pub fn parse_v3_placement(raw: &str) -> Result<UnitPlacement, ValidationError> {
    parse_directive(BundleFormat::V3, raw)
}

/// Parse a current (v4) placement such as `lxc:mysql/1` or `lxc:new`.
pub fn parse_v4_placement(raw: &str) -> Result<UnitPlacement, ValidationError> {
    parse_directive(BundleFormat::V4, raw)
}

fn parse_directive(format: BundleFormat, raw: &str) -> Result<UnitPlacement, ValidationError> {
    if raw.is_empty() {
        return Ok(UnitPlacement::default());
    }

    let (container, rest) = split_pair(raw, ':', raw)?.unwrap_or(("", raw));
    let (target, index) = match split_pair(rest, format.unit_separator(), raw)? {
        Some((target, index)) => (target, Some(index)),
        None => (rest, None),
    };

    let is_machine = is_digits(target) || (format == BundleFormat::V4 && target == NEW_MACHINE);
    let (machine, unit) = if is_machine {
        (target, "")
    } else {
        ("", target)
    };

    if !container.is_empty() && !is_valid_container(container) {
        return Err(ValidationError::InvalidContainer {
            container: container.to_owned(),
            placement: raw.to_owned(),
        });
    }

    let unit_index = match index {
        Some(index) => parse_unit_index(index, raw)?,
        None => None,
    };

    if format == BundleFormat::V3 && !machine.is_empty() && machine != BOOTSTRAP_MACHINE {
        return Err(ValidationError::LegacyMachine {
            placement: raw.to_owned(),
        });
    }

    Ok(UnitPlacement::new(container, machine, unit, unit_index))
}

/// Split `value` at the first `sep`, rejecting a second occurrence.
fn split_pair<'a>(
    value: &'a str,
    sep: char,
    raw: &str,
) -> Result<Option<(&'a str, &'a str)>, ValidationError> {
    match value.split_once(sep) {
        Some((_, tail)) if tail.contains(sep) => Err(ValidationError::TooManyParts {
            placement: raw.to_owned(),
        }),
        other => Ok(other),
    }
}

fn parse_unit_index(index: &str, raw: &str) -> Result<Option<u32>, ValidationError> {
    if index.is_empty() {
        return Ok(None);
    }
    if !is_digits(index) {
        return Err(ValidationError::NonDigitUnit {
            placement: raw.to_owned(),
        });
    }
    index
        .parse()
        .map(Some)
        .map_err(|_| ValidationError::UnitOutOfRange {
            placement: raw.to_owned(),
        })
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
