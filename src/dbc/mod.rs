//! # dbc
//!
//! `dbc` is the module that turns a `.dbc` file on disk into a [`Database`].
//!
//! The DBC text grammar itself is delegated to the `can-dbc` crate; this
//! module owns the file I/O, the character-set decoding, and the mapping of
//! the parser's output onto the crate's model types.
//!
//! [`Database`]: crate::types::database::Database

pub mod load;

pub use load::from_file;
