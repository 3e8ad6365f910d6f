//! # dbc_utility
//!
//! Rust utilities for viewing, searching and exporting **CAN bus databases** (`.dbc` files).
//!
//! ## Highlights
//! - **Loading**: read a `.dbc` file into a SlotMap-backed [`Database`]; the text
//!   grammar is decoded by the `can-dbc` crate, this crate owns the model.
//! - **Stable keys**: Messages/Signals use SlotMap keys that remain valid across edits.
//! - **Fast lookups**: normalized helpers (`get_message_by_id/_hex/_name`, `get_signal_by_name`).
//! - **Search**: case-insensitive substring filtering by message name, signal fields,
//!   or frame ID, producing a non-mutating [`FilteredView`].
//! - **Export**: deterministic C++ map literal of every signal's attributes.
//! - **Editing**: in-memory add/rename/remove with duplicate guards, plus
//!   [`changes_between`] summaries of two snapshots.
//!

pub mod dbc;
pub mod edit;
pub mod export;
pub mod report;
pub mod search;
#[doc(hidden)]
pub mod types;

// Top-level re-exports (appear under Crate Items → Structs)
#[doc(inline)]
pub use crate::types::{
    database::{Database, MessageKey, SignalKey},
    errors::{EditError, ExportError, LoadError},
    message::{IdFormat, Message},
    signal::{Signal, Signess},
};

pub use crate::edit::{ChangeSummary, changes_between};
pub use crate::search::{FilterKind, FilteredView, MessageView};
