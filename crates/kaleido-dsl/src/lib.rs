//! # kaleido-dsl
//!
//! Lexer, parser and printer for the Kaleido schema DSL.
//!
//! This crate provides:
//! - A lexer that tokenizes `.kld` source text, tracking lines and columns
//! - A line-oriented parser that produces a `SchemaDocument`
//! - A printer that converts a `SchemaDocument` back to normalized DSL text
//! - Round-trip fidelity: `parse(print_document(doc))` equals `doc`
//!
//! # Example
//!
//! ```
//! use kaleido_dsl::{parse, print_document};
//!
//! let source = r#"
//! model User {
//!     name: string
//!     email: string @unique
//!     timestamps
//! }
//! "#;
//!
//! let doc = parse(source).expect("parse failed");
//! let user = doc.get("User").unwrap();
//! assert_eq!(user.len(), 4);
//! assert!(user.field("created_at").unwrap().is_nullable());
//!
//! let text = print_document(&doc);
//! assert!(text.contains("    timestamps\n"));
//! ```

pub mod error;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod token;

pub use error::{DslError, DslWarning, Span};
pub use lexer::{tokenize, Lexer, SpannedToken};
pub use parser::{parse, parse_with_warnings, Parsed};
pub use printer::{print_document, print_model};
