use thiserror::Error;

/// Runtime errors (spec.md §7's "Runtime type errors" / "Runtime
/// arithmetic errors" / "Stack overflow" taxonomy). Unlike compile
/// diagnostics these carry no span: spec.md §7 describes them as "a
/// string set on the state" that unwinds the dispatch loop, not a
/// located, recoverable diagnostic — the dispatch loop does not
/// recover, it stops (§7 "The interpreter does not recover").
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("uninitialised variable {name}")]
    UninitialisedVariable { name: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("stack overflow")]
    StackOverflow,
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
