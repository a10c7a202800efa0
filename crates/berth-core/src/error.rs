//! Error types for berth

use thiserror::Error;

/// Core berth errors.
///
/// Absent configuration and split-brain are deliberately not here: the
/// first is a normal state (readiness simply evaluates false) and the
/// second is reported through the sticky split-brain flag. What remains
/// are fail-fast wiring violations.
#[derive(Error, Debug)]
pub enum BerthError {
    /// A node may be related to exactly one controller relation.
    #[error("structural violation: {relations} controller relations, expected 1")]
    StructuralViolation { relations: usize },

    /// No controller relation attached yet.
    #[error("no controller relation attached")]
    NoRelation,

    /// The framework has not resolved this node's own address yet.
    #[error("ingress-address not present in the publish bag")]
    MissingIngressAddress,
}

/// Result type for berth operations.
pub type BerthResult<T> = Result<T, BerthError>;
