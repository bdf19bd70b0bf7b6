use thiserror::Error;

/// Failure raised while validating a placement directive or a machine map.
///
/// Every message echoes the offending input so callers can surface it verbatim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("placement {placement} is malformed, too many parts")]
    TooManyParts { placement: String },
    #[error("invalid container {container} for placement {placement}")]
    InvalidContainer {
        container: String,
        placement: String,
    },
    #[error("unit in placement {placement} must be digit")]
    NonDigitUnit { placement: String },
    #[error("unit in placement {placement} is out of range")]
    UnitOutOfRange { placement: String },
    #[error("legacy bundles may not place units on machines other than 0")]
    LegacyMachine { placement: String },
    #[error("unit {unit} cannot be expressed in a v4 placement")]
    NotV4Representable { unit: String },
    #[error("Malformed machines {0}")]
    MalformedMachines(String),
    #[error("Malformed machines {machines}: duplicate machine {machine}")]
    DuplicateMachine { machines: String, machine: u64 },
    #[error("unknown bundle format '{0}', expected 'v3' or 'v4'")]
    UnknownFormat(String),
}
