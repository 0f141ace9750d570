//! This crate implements the lexical analysis of SOOP source code. The analysis turns the source
//! text into a stream of classified tokens, recovering from every lexical error it meets.
//!
//! The final output is an [`token_stream::AnalysisResult`], holding the tokens of a source file and
//! the lexical errors found in it.

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    clippy::missing_errors_doc
)]
#![allow(clippy::missing_panics_doc, clippy::missing_const_for_fn)]

pub mod classifier;
pub mod error;
pub mod scanner;
pub mod token;
pub mod token_stream;

pub use token_stream::{analyze, AnalysisResult, Analyzer, Options};
