use std::io;
use thiserror::Error;

use crate::types::database::{MessageKey, SignalKey};

/// Errors produced while loading a `.dbc` file into a [`Database`](crate::types::database::Database).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("No .dbc file path provided")]
    EmptyPath,
    #[error("Not a valid .dbc file: {path}")]
    InvalidExtension { path: String },
    #[error("Failed to open '{path}'. \nError: {source}")]
    OpenFile {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed while reading '{path}'. \nError: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse '{path}'. \nError: {details}")]
    Parse { path: String, details: String },
}

/// Errors produced while exporting a database to a signal-map file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No messages loaded, nothing to export")]
    EmptyDatabase,
    #[error("Failed to create '{path}'. \nError: {source}")]
    CreateFile {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed while writing '{path}'. \nError: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Errors returned by in-memory edit operations on [`Database`](crate::types::database::Database).
#[derive(Debug, Error)]
pub enum EditError {
    #[error("Message name cannot be empty")]
    EmptyMessageName,
    #[error("Signal name cannot be empty")]
    EmptySignalName,
    #[error("Message '{name}' already exists")]
    MessageAlreadyExists { name: String },
    #[error("Message ID {id_hex} already assigned to an existing message")]
    MessageIdAlreadyAssigned { id_hex: String },
    #[error("Message not found for key {message_key:?}")]
    MessageMissing { message_key: MessageKey },
    #[error("Signal not found for key {signal_key:?}")]
    SignalMissing { signal_key: SignalKey },
    #[error("Signal '{signal}' already exists in message '{message}'")]
    SignalAlreadyExists { message: String, signal: String },
}
