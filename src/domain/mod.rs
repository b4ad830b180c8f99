//! Domain layer for ls-lint
//!
//! Architecture: Domain Model - Pure vocabulary of naming enforcement
//! - Violations, read diagnostics and run statistics are the ubiquitous language
//! - Independent of the filesystem, configuration format and output formats

pub mod violations;

// Re-export main domain types for convenience
pub use violations::*;
