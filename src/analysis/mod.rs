//! Structural analysis: containers, complexity and reference attribution.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Source File │────▶│ Lang + Query │────▶│  Captures    │
//! └─────────────┘     └──────────────┘     │ (node, tag)  │
//!                                          └──────────────┘
//!                                                  │
//!                                                  ▼
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ FileReport  │◀────│ Attribution  │◀────│ Extraction   │
//! └─────────────┘     │ (extends,    │     │ (containers, │
//!                     │  calls)      │     │  complexity) │
//!                     └──────────────┘     └──────────────┘
//! ```
//!
//! The complexity estimator and the attributor are pure: they read the
//! tree and the extracted facts and never perform I/O.
//!
//! # Adding a New Language
//!
//! 1. Add a grammar dependency and a variant to `languages::Lang`
//! 2. Write `src/queries/<language>.scm` using the `definition.<kind>`,
//!    `name`, and `reference.{call,extends,import}` captures
//! 3. Map its file extensions in `Lang::from_extension`

mod analyzer;
mod attribution;
mod captures;
mod complexity;
mod facts;
mod languages;

pub use analyzer::Analyzer;
pub use attribution::{attribute, AttributionPass, TieBreak};
pub use captures::{extract, CaptureTag, Extractor, NAME_CAPTURE};
pub use complexity::{classify, counts_as_branch, estimate, BranchCategory};
pub use facts::{Container, ContainerKind, Extraction, Reference, ReferenceKind, Span};
pub use languages::{supported_extensions, Lang, LangQuery};
