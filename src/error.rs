use thiserror::Error;

/// Domain errors reported by the operations that have a restricted domain
/// or an unbounded result.
///
/// Plain overflow of the fixed-capacity arithmetic primitives is reported
/// as a carry/borrow `bool` on the operation itself, not through this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MathError {
    /// The result does not fit in the chosen width.
    #[error("overflow")]
    Overflow,
    /// The argument is outside the domain of the function.
    #[error("improper argument")]
    ImproperArgument,
    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,
    /// An internal invariant was violated.
    #[error("internal error")]
    InternalError,
}
