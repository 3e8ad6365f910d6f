use crate::types::database::{Database, MessageKey};

/// Signal defined within a CAN message.
///
/// Carries the searchable metadata of a signal: name, normalized comment,
/// receiver nodes, sign, and the optional physical range. Bit-layout and
/// scaling details stay with the parsing collaborator; they are not part of
/// this model.
#[derive(Default, Clone, PartialEq, Debug)]
pub struct Signal {
    /// Parent message key.
    pub message: MessageKey,
    /// Signal name.
    pub name: String,
    /// Associated comment (DBC `CM_ SG_` section), normalized: NUL bytes
    /// removed, newlines collapsed to single spaces. Empty when absent.
    pub comment: String,
    /// Receiver nodes. The `Vector__XXX` placeholder is never stored.
    pub receiver_nodes: Vec<String>,
    /// Sign of the raw value.
    pub sign: Signess,
    /// Minimum physical value. `None` when the source leaves the range unset.
    pub min: Option<f64>,
    /// Maximum physical value. `None` when the source leaves the range unset.
    pub max: Option<f64>,
}

impl Signal {
    /// `true` for signed signals.
    pub fn is_signed(&self) -> bool {
        self.sign == Signess::Signed
    }

    /// Display key `"<message>.<signal>"`, computed from the owning message.
    ///
    /// Falls back to the bare signal name if the owner key does not resolve
    /// (a signal detached mid-edit).
    pub fn item_text(&self, db: &Database) -> String {
        match db.get_message_by_key(self.message) {
            Some(msg) => format!("{}.{}", msg.name, self.name),
            None => self.name.clone(),
        }
    }

    /// Replaces the comment with a normalized copy of `raw`.
    pub fn set_comment(&mut self, raw: &str) {
        self.comment = normalize_comment(raw);
    }

    /// Textual rendering of the minimum bound; empty when unset.
    pub(crate) fn min_text(&self) -> String {
        self.min.map(|v| v.to_string()).unwrap_or_default()
    }

    /// Textual rendering of the maximum bound; empty when unset.
    pub(crate) fn max_text(&self) -> String {
        self.max.map(|v| v.to_string()).unwrap_or_default()
    }
}

/// Sign of a signal's raw value.
#[derive(Default, Copy, Clone, PartialEq, Eq, Debug)]
pub enum Signess {
    #[default]
    Unsigned, // -
    Signed, // +
}

/// Strips NUL bytes and collapses newlines to single spaces.
///
/// Comments in DBC files may span physical lines; the tree and the exporter
/// both want them on one line.
pub(crate) fn normalize_comment(raw: &str) -> String {
    let mut out: String = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\0' => {}
            '\r' => {
                // treat CRLF as one newline
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push(' ');
            }
            '\n' => out.push(' '),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_comment() {
        assert_eq!(normalize_comment("engine speed"), "engine speed");
        assert_eq!(normalize_comment("line one\nline two"), "line one line two");
        assert_eq!(normalize_comment("a\r\nb\rc"), "a b c");
        assert_eq!(normalize_comment("nul\0ls\0"), "nulls");
        assert_eq!(normalize_comment(""), "");
    }

    #[test]
    fn test_bound_text() {
        let mut sig = Signal {
            name: "RPM".to_string(),
            min: Some(0.0),
            max: Some(8000.0),
            ..Default::default()
        };
        assert_eq!(sig.min_text(), "0");
        assert_eq!(sig.max_text(), "8000");

        sig.min = None;
        sig.max = None;
        assert_eq!(sig.min_text(), "");
        assert_eq!(sig.max_text(), "");
    }

    #[test]
    fn test_sign_accessor() {
        let mut sig = Signal::default();
        assert!(!sig.is_signed());
        sig.sign = Signess::Signed;
        assert!(sig.is_signed());
    }
}
