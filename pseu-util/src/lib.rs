//! pseu-util - shared foundation types for the pseu pipeline.
//!
//! Every other crate in the workspace depends on this one for source
//! locations (`span`), error reporting (`diagnostic`), identifier
//! interning (`symbol`), and a typed index vector (`index_vec`) used to
//! back the symbol table's three ordered lists.

pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, Handler, Level};
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, Span};
pub use symbol::{Symbol, SymbolInterner};
