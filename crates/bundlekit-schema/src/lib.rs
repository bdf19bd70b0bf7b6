//! Placement directive parsing and machine map normalization for deployment bundles.
//!
//! This crate is the validation core used once a bundle document has been
//! decoded: `parse_v3_placement` / `parse_v4_placement` turn a raw placement
//! string into a [`UnitPlacement`], and `normalize_machines` re-keys a raw
//! `machines` section by machine number. Every operation is pure and reports
//! failures as a [`ValidationError`].

pub mod error;
pub mod format;
pub mod machines;
pub mod placement;

pub use error::ValidationError;
pub use format::BundleFormat;
pub use machines::{normalize_machines, MachineMap};
pub use placement::{
    is_valid_container, parse_v3_placement, parse_v4_placement, PlacementTarget, UnitPlacement,
    BOOTSTRAP_MACHINE, CONTAINER_TYPES, NEW_MACHINE,
};
