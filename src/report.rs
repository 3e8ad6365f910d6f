//! # report
//!
//! Flattened snapshot of a (possibly filtered) database view: plain records
//! with a fixed, declared field list, ready for presentation code or a
//! machine-readable dump. Presentation iterates these fields explicitly;
//! nothing reflects over the model.

use serde::Serialize;

use crate::search::FilteredView;
use crate::types::database::Database;

/// One signal entry of a [`MessageReport`].
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct SignalReport {
    pub signal_name: String,
    pub comments: String,
    pub receivers: Vec<String>,
    pub is_signed: bool,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    /// Display key `"<message>.<signal>"`.
    pub item_text: String,
}

/// One message of a report, with its selected signals.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct MessageReport {
    pub message_name: String,
    pub frame_id: u32,
    pub frame_id_hex: String,
    pub id_format: String,
    pub senders: Vec<String>,
    pub signals: Vec<SignalReport>,
}

/// Builds the report records for a filtered view, view order preserved.
pub fn from_view(db: &Database, view: &FilteredView) -> Vec<MessageReport> {
    view.messages
        .iter()
        .filter_map(|mv| {
            let msg = db.get_message_by_key(mv.message)?;
            let signals: Vec<SignalReport> = mv
                .signals
                .iter()
                .filter_map(|&sig_key| {
                    let sig = db.get_signal_by_key(sig_key)?;
                    Some(SignalReport {
                        signal_name: sig.name.clone(),
                        comments: sig.comment.clone(),
                        receivers: sig.receiver_nodes.clone(),
                        is_signed: sig.is_signed(),
                        minimum: sig.min,
                        maximum: sig.max,
                        item_text: format!("{}.{}", msg.name, sig.name),
                    })
                })
                .collect();
            Some(MessageReport {
                message_name: msg.name.clone(),
                frame_id: msg.id,
                frame_id_hex: msg.id_hex.clone(),
                id_format: msg.id_format.as_str().to_string(),
                senders: msg.sender_nodes.clone(),
                signals,
            })
        })
        .collect()
}

/// Builds the report records for the whole database.
pub fn from_database(db: &Database) -> Vec<MessageReport> {
    from_view(db, &FilteredView::full(db))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{self, FilterKind};
    use crate::types::database::MessageKey;
    use crate::types::message::{IdFormat, Message};
    use crate::types::signal::{Signal, Signess};

    fn sample_db() -> Database {
        let mut db = Database::default();
        let engine: MessageKey = db.push_message(Message {
            id_format: IdFormat::Standard,
            id: 0x100,
            name: "EngineStatus".to_string(),
            byte_length: 8,
            sender_nodes: vec!["Motor".to_string()],
            ..Default::default()
        });
        db.push_signal(
            engine,
            Signal {
                name: "RPM".to_string(),
                comment: "engine speed".to_string(),
                receiver_nodes: vec!["Gateway".to_string()],
                min: Some(0.0),
                max: Some(8000.0),
                ..Default::default()
            },
        );
        db.push_signal(
            engine,
            Signal {
                name: "Temp".to_string(),
                sign: Signess::Signed,
                ..Default::default()
            },
        );
        db
    }

    #[test]
    fn test_full_report() {
        let db = sample_db();
        let report = from_database(&db);
        assert_eq!(report.len(), 1);

        let msg = &report[0];
        assert_eq!(msg.message_name, "EngineStatus");
        assert_eq!(msg.frame_id, 0x100);
        assert_eq!(msg.frame_id_hex, "0x100");
        assert_eq!(msg.id_format, "Standard");
        assert_eq!(msg.senders, vec!["Motor"]);
        assert_eq!(msg.signals.len(), 2);

        let rpm = &msg.signals[0];
        assert_eq!(rpm.signal_name, "RPM");
        assert_eq!(rpm.item_text, "EngineStatus.RPM");
        assert!(!rpm.is_signed);
        assert_eq!(rpm.minimum, Some(0.0));

        let temp = &msg.signals[1];
        assert!(temp.is_signed);
        assert_eq!(temp.minimum, None);
        assert_eq!(temp.comments, "");
    }

    #[test]
    fn test_filtered_report_narrows_signals() {
        let db = sample_db();
        let view = search::apply(&db, "rpm", FilterKind::Signal);
        let report = from_view(&db, &view);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].signals.len(), 1);
        assert_eq!(report[0].signals[0].signal_name, "RPM");
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_dump_renders_unset_bounds_as_null() {
        let db = sample_db();
        let report = from_database(&db);
        let json = serde_json::to_string(&report).expect("serialize");
        assert!(json.contains("\"signal_name\":\"Temp\""));
        assert!(json.contains("\"minimum\":null"));
    }
}
