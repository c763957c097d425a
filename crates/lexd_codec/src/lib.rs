//! # lexd Codec
//!
//! Conversion between the in-memory dictionary table and its line-oriented
//! flat-file representation.
//!
//! The persisted format is one line per word:
//!
//! ```text
//! word,definition1;definition2;...
//! ```
//!
//! Words are stored lower-case. The file has no header row. Parsing is
//! lenient: lines that do not split into exactly one word field and one
//! definitions field are skipped, as are lines with an empty word or no
//! usable definitions. Rendering is deterministic, so saving the same table
//! twice produces identical bytes.
//!
//! This crate is pure: no file I/O and no locking. The store in `lexd_core`
//! owns the backing file and calls [`parse`] and [`render`] inside its
//! critical section.
//!
//! ## Usage
//!
//! ```
//! use lexd_codec::{parse, render, DictionaryTable};
//!
//! let table = parse("cat,a feline\ndog,bark;woof\n");
//! assert_eq!(table.get("cat"), Some(&["a feline".to_string()][..]));
//!
//! let text = render(&table);
//! assert_eq!(parse(&text), table);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;
mod table;

pub use decoder::parse;
pub use encoder::render;
pub use error::{CodecError, CodecResult};
pub use table::{normalize_word, split_definitions, DictionaryTable};

/// Separates the word field from the definitions field on a file line.
pub const FIELD_DELIMITER: char = ',';

/// Separates individual definitions within the definitions field.
pub const DEFINITION_DELIMITER: char = ';';
