use strum_macros::{Display, EnumString};

/// What removing a nonexistent record does: `Strict` surfaces a not-found
/// error, `Lenient` treats it as a no-op.
#[derive(Debug, Copy, Clone, Display, EnumString, PartialEq, Eq, PartialOrd, Ord)]
pub enum RemovalPolicy {
    #[strum(serialize = "STRICT")]
    Strict,
    #[strum(serialize = "LENIENT")]
    Lenient,
}
