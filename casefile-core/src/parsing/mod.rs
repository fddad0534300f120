//! Output Parsing
//!
//! Pulls structured answers out of free-form model text.
//!
//! # Parsers
//!
//! - **Culprit extraction**: finds the `MAIN CULPRIT(S)` statement in a
//!   detective's written solution, tagged or as a plain heading
//! - **Verdict normalization**: maps a judge completion onto `Yes` / `No`
//!
//! # Example
//!
//! ```rust
//! use casefile_core::parsing::extract_main_culprit;
//!
//! let text = "<MAIN CULPRIT(S)>Colonel Mustard</MAIN CULPRIT(S)>";
//! assert_eq!(extract_main_culprit(text).as_deref(), Some("Colonel Mustard"));
//! ```

mod culprit;
mod parser;
mod verdict;

pub use culprit::{CulpritParser, CulpritStrategy, extract_main_culprit, extract_main_culprit_value};
pub use parser::{OutputParser, ParseError, ParseResult};
pub use verdict::{Verdict, VerdictMatch, parse_verdict};
