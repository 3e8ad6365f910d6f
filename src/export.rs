//! # export
//!
//! Serializes the signal metadata of a [`Database`] into a C++ map literal:
//! a fixed header describing an example record struct, one entry line per
//! signal in stored order, and a fixed closing line. The output is a text
//! artifact for a human or a downstream source compiler; nothing in this
//! crate parses it back.

use std::fs::File;
use std::io::{BufWriter, Write};

use tracing::info;

use crate::types::database::Database;
use crate::types::errors::ExportError;
use crate::types::signal::Signal;

const HEADER: &[&str] = &[
    "// C++ Signal Definition (example, adjust as needed):",
    "// struct SignalAttributes {",
    "//     double min_val;",
    "//     double max_val;",
    "//     bool is_signed;",
    "//     std::string comment;",
    "// };",
    "// std::map<std::string, SignalAttributes> signalMap = {",
];

const FOOTER: &str = "// };";

/// Renders the C++ map literal for every signal of `db`.
///
/// One line per signal, message order first and declaration order within
/// each message, no signal skipped. Each entry carries the quoted signal
/// name, the min/max bounds, the sign as `true`/`false`, and the comment
/// with embedded `"` escaped. An unset bound renders as
/// `std::numeric_limits<double>::quiet_NaN()` so the emitted source still
/// compiles and the "unknown" is unambiguous.
///
/// # Errors
/// [`ExportError::EmptyDatabase`] when no messages are loaded; no text is
/// produced in that case.
pub fn render(db: &Database) -> Result<String, ExportError> {
    if db.is_empty() {
        return Err(ExportError::EmptyDatabase);
    }

    let mut out: String = String::new();
    for line in HEADER {
        out.push_str(line);
        out.push('\n');
    }
    for msg in db.iter_messages() {
        for sig in msg.signals(db) {
            out.push_str(&entry_line(sig));
            out.push('\n');
        }
    }
    out.push_str(FOOTER);
    out.push('\n');
    Ok(out)
}

/// Renders `db` and writes the result to `path`.
///
/// The file is opened, written through a buffer, and flushed before this
/// function returns `Ok`; a failure on any of those steps is reported and
/// never silently treated as success.
pub fn save_to_file(path: &str, db: &Database) -> Result<(), ExportError> {
    let serialized: String = render(db)?;

    let file: File = File::create(path).map_err(|source| ExportError::CreateFile {
        path: path.to_string(),
        source,
    })?;
    let mut writer: BufWriter<File> = BufWriter::new(file);
    writer
        .write_all(serialized.as_bytes())
        .map_err(|source| ExportError::Write {
            path: path.to_string(),
            source,
        })?;
    writer.flush().map_err(|source| ExportError::Write {
        path: path.to_string(),
        source,
    })?;

    info!(path, signals = db.signal_count(), "signal map exported");
    Ok(())
}

fn entry_line(sig: &Signal) -> String {
    let is_signed: &str = if sig.is_signed() { "true" } else { "false" };
    let comment: String = sig.comment.replace('"', "\\\"");
    format!(
        "    {{\"{}\", {{{}, {}, {}, \"{}\"}}}},",
        sig.name,
        bound_literal(sig.min),
        bound_literal(sig.max),
        is_signed,
        comment
    )
}

fn bound_literal(bound: Option<f64>) -> String {
    match bound {
        Some(value) => format!("static_cast<double>({value})"),
        None => "std::numeric_limits<double>::quiet_NaN()".to_string(),
    }
}
