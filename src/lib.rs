//! Recursive-descent syntax checker for a small `begin … end` procedural language.
//!
//! The checker pulls tokens one at a time from a [`source::TokenSource`], validates them
//! against a fixed LL(1) grammar and stops at the first violation with a
//! [`parser::Diagnostic`] that names every grammar rule still open at that point.
//!
//! ```rust
//! use rd_check::limits::CheckerLimits;
//! use rd_check::parser::check_source;
//!
//! let limits = CheckerLimits::default();
//! assert!(check_source("begin x := 1 end", (), &limits).is_ok());
//!
//! let err = check_source("begin x := 1 ; end", (), &limits).unwrap_err();
//! assert!(err.to_string().contains("at <StatementList>"));
//! ```

pub mod lexer;
pub mod limits;
pub mod parser;
pub mod sink;
pub mod source;
