//! Dialect implementations and type-name mapping.
//!
//! Concrete vendor dialects live outside this crate; they only need to
//! implement [`Dialect`](crate::core::Dialect). This module provides:
//!
//! - [`TypeNameMap`]: type code (plus size bounds) → type-name template
//! - [`GenericDialect`]: a dialect built from a [`Capabilities`] profile
//!
//! # Usage
//!
//! ```rust,ignore
//! let dialect = GenericDialect::new()
//!     .with_quote('[', ']')
//!     .with_identity_clause("IDENTITY(1,1)");
//! let generator = ScriptGenerator::new(Arc::new(dialect), GeneratorOptions::default());
//! ```

mod generic;
mod typemap;

pub use generic::{Capabilities, GenericDialect};
pub use typemap::TypeNameMap;
