use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};

use can_dbc::DBC;
use encoding_rs::WINDOWS_1252;
use tracing::debug;

use crate::types::database::{Database, MessageKey};
use crate::types::errors::LoadError;
use crate::types::message::{IdFormat, Message};
use crate::types::signal::{Signal, Signess, normalize_comment};

/// Loads a DBC file and returns a populated [`Database`] instance.
///
/// This function reads a DBC file from disk, decodes it as Windows-1252
/// (the usual encoding of DBC files in the wild), hands the text to the
/// `can-dbc` parser, and maps the result onto the crate's model:
/// - **Messages** in file declaration order, with normalized hexadecimal IDs;
/// - **Signals** per message, declaration order, comments normalized;
/// - **Sender nodes** merged from the `BO_` transmitter and `BO_TX_BU_` lines;
/// - **Receiver nodes** per signal, with the `Vector__XXX` placeholder dropped;
/// - Signal ranges `[0|0]` mapped to an unset `min`/`max`.
///
/// No reordering and no deduplication is applied; duplicate names stay in
/// the model and the lookup maps resolve to the most recent declaration.
///
/// # Errors
/// - [`LoadError::EmptyPath`] when `path` is empty or whitespace;
/// - [`LoadError::InvalidExtension`] when `path` does not end in `.dbc`;
/// - [`LoadError::OpenFile`] / [`LoadError::Read`] on I/O failures;
/// - [`LoadError::Parse`] when the parser rejects the content, carrying the
///   parser's diagnostic text.
///
/// A failed load leaves caller state untouched; callers replace their
/// previous [`Database`] wholesale only on `Ok`.
///
/// # Example
/// ```no_run
/// let db = dbc_utility::dbc::from_file("example.dbc").expect("Failed to load DBC file");
/// println!("Loaded {} messages", db.message_count());
/// ```
pub fn from_file(path: &str) -> Result<Database, LoadError> {
    if path.trim().is_empty() {
        return Err(LoadError::EmptyPath);
    }
    if !path.to_ascii_lowercase().ends_with(".dbc") {
        return Err(LoadError::InvalidExtension {
            path: path.to_string(),
        });
    }

    let file: File = File::open(path).map_err(|source| LoadError::OpenFile {
        path: path.to_string(),
        source,
    })?;
    let mut reader: BufReader<File> = BufReader::new(file);

    // read raw bytes
    let mut bytes: Vec<u8> = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|source| LoadError::Read {
            path: path.to_string(),
            source,
        })?;

    // Decode in Windows-1252
    let (text, _, _) = WINDOWS_1252.decode(&bytes);

    let dbc: DBC = DBC::from_slice(text.as_bytes()).map_err(|err| LoadError::Parse {
        path: path.to_string(),
        details: format!("{err:?}"),
    })?;

    let db: Database = build(path, &dbc);
    debug!(
        path,
        messages = db.message_count(),
        signals = db.signal_count(),
        "dbc loaded"
    );
    Ok(db)
}

/// Key for the comment lookups: extended flag plus plain arbitration id.
type IdKey = (bool, u32);

fn id_key(id: &can_dbc::MessageId) -> IdKey {
    match id {
        can_dbc::MessageId::Standard(v) => (false, *v as u32),
        can_dbc::MessageId::Extended(v) => (true, *v),
    }
}

/// Maps the parser output onto a fresh [`Database`].
fn build(path: &str, dbc: &DBC) -> Database {
    let mut db: Database = Database {
        path: path.to_string(),
        ..Default::default()
    };

    // Index CM_ BO_ / CM_ SG_ entries up front; the comment list is flat.
    let mut msg_comments: HashMap<IdKey, &str> = HashMap::new();
    let mut sig_comments: HashMap<(IdKey, &str), &str> = HashMap::new();
    for entry in dbc.comments() {
        match entry {
            can_dbc::Comment::Message {
                message_id,
                comment,
            } => {
                msg_comments.insert(id_key(message_id), comment.as_str());
            }
            can_dbc::Comment::Signal {
                message_id,
                signal_name,
                comment,
            } => {
                sig_comments.insert((id_key(message_id), signal_name.as_str()), comment.as_str());
            }
            _ => {}
        }
    }

    for msg in dbc.messages() {
        let key: IdKey = id_key(msg.message_id());
        let (extended, id) = key;
        let id_format: IdFormat = if extended {
            IdFormat::Extended
        } else {
            IdFormat::Standard
        };

        let msg_key: MessageKey = db.push_message(Message {
            id_format,
            id,
            id_hex: String::new(), // normalized by push_message
            name: msg.message_name().clone(),
            byte_length: *msg.message_size() as u16,
            sender_nodes: senders_of(dbc, msg),
            signals: Vec::new(),
            comment: msg_comments
                .get(&key)
                .map(|raw| normalize_comment(raw))
                .unwrap_or_default(),
        });

        for sig in msg.signals() {
            let (min, max) = optional_range(*sig.min(), *sig.max());
            let sign: Signess = match sig.value_type() {
                can_dbc::ValueType::Signed => Signess::Signed,
                can_dbc::ValueType::Unsigned => Signess::Unsigned,
            };
            db.push_signal(
                msg_key,
                Signal {
                    message: msg_key,
                    name: sig.name().clone(),
                    comment: sig_comments
                        .get(&(key, sig.name().as_str()))
                        .map(|raw| normalize_comment(raw))
                        .unwrap_or_default(),
                    receiver_nodes: named_nodes(sig.receivers()),
                    sign,
                    min,
                    max,
                },
            );
        }
    }

    db
}

/// Transmitters of a message: the `BO_` transmitter first, then any
/// `BO_TX_BU_` entries. No duplicates, declaration order kept.
fn senders_of(dbc: &DBC, msg: &can_dbc::Message) -> Vec<String> {
    let mut senders: Vec<String> = Vec::new();
    if let can_dbc::Transmitter::NodeName(name) = msg.transmitter() {
        senders.push(name.clone());
    }
    for entry in dbc.message_transmitters() {
        if entry.message_id() != msg.message_id() {
            continue;
        }
        for tx in entry.transmitter() {
            if let can_dbc::Transmitter::NodeName(name) = tx
                && !senders.iter().any(|s| s == name)
            {
                senders.push(name.clone());
            }
        }
    }
    senders
}

/// Receiver node names with the `Vector__XXX` placeholder removed.
fn named_nodes(receivers: &[String]) -> Vec<String> {
    receivers
        .iter()
        .filter(|name| !name.is_empty() && name.as_str() != "Vector__XXX")
        .cloned()
        .collect()
}

/// The grammar always carries a `[min|max]` pair; `[0|0]` conventionally
/// means "range unspecified" and loads as unset bounds.
fn optional_range(min: f64, max: f64) -> (Option<f64>, Option<f64>) {
    if min == 0.0 && max == 0.0 {
        (None, None)
    } else {
        (Some(min), Some(max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DBC_CONTENT: &str = r#"VERSION "1.1"

NS_ :
	NS_DESC_
	CM_
	BA_DEF_
	BA_
	VAL_
	CAT_DEF_
	CAT_
	FILTER
	BA_DEF_DEF_
	EV_DATA_
	ENVVAR_DATA_
	SGTYPE_
	SGTYPE_VAL_
	BA_DEF_SGTYPE_
	BA_SGTYPE_
	SIG_TYPE_REF_
	VAL_TABLE_
	SIG_GROUP_
	SIG_VALTYPE_
	SIGTYPE_VALTYPE_
	BO_TX_BU_
	BA_DEF_REL_
	BA_REL_
	BA_DEF_DEF_REL_
	BU_SG_REL_
	BU_EV_REL_
	BU_BO_REL_
	SG_MUL_VAL_

BS_:

BU_: Motor Infotainment Gateway BackupEcu

BO_ 256 EngineStatus: 8 Motor
 SG_ RPM : 0|16@1+ (1,0) [0|8000] "rpm"  Infotainment,Gateway
 SG_ Temp : 16|8@1- (1,-40) [-40|215] "degC"  Gateway
 SG_ Raw : 24|8@1+ (1,0) [0|0] ""  Vector__XXX

BO_ 2527679645 Motor_01: 8 Motor
 SG_ Status : 61|1@1+ (1,0) [0|1] ""  Infotainment,Gateway

BO_TX_BU_ 256 : Motor,BackupEcu;

CM_ BO_ 256 "Engine status frame";
CM_ SG_ 256 RPM "engine speed
measured at the crankshaft";
CM_ SG_ 256 Temp "coolant temperature";
"#;

    fn write_fixture(dir: &tempfile::TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "test.dbc", DBC_CONTENT);

        let db: Database = from_file(&path).expect("Failed to load DBC");
        assert_eq!(db.path, path);
        assert_eq!(db.message_count(), 2);
        assert_eq!(db.signal_count(), 4);

        // --- EngineStatus ---
        let engine = db.get_message_by_name("EngineStatus").expect("message");
        assert_eq!(engine.id, 256);
        assert_eq!(engine.id_hex, "0x100");
        assert_eq!(engine.id_format, IdFormat::Standard);
        assert_eq!(engine.byte_length, 8);
        assert_eq!(engine.comment, "Engine status frame");
        // BO_ transmitter merged with BO_TX_BU_, no duplicates
        assert_eq!(engine.sender_nodes, vec!["Motor", "BackupEcu"]);

        let names: Vec<&str> = engine.signals(&db).map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["RPM", "Temp", "Raw"]);

        let rpm = db
            .get_signal_by_name(db.get_msg_key_by_name("EngineStatus").unwrap(), "RPM")
            .unwrap();
        assert_eq!(rpm.comment, "engine speed measured at the crankshaft");
        assert_eq!(rpm.receiver_nodes, vec!["Infotainment", "Gateway"]);
        assert!(!rpm.is_signed());
        assert_eq!(rpm.min, Some(0.0));
        assert_eq!(rpm.max, Some(8000.0));

        let temp = db
            .get_signal_by_name(db.get_msg_key_by_name("EngineStatus").unwrap(), "Temp")
            .unwrap();
        assert!(temp.is_signed());
        assert_eq!(temp.min, Some(-40.0));
        assert_eq!(temp.max, Some(215.0));
        assert_eq!(temp.comment, "coolant temperature");

        // [0|0] loads as unset, Vector__XXX receiver dropped, no comment
        let raw = db
            .get_signal_by_name(db.get_msg_key_by_name("EngineStatus").unwrap(), "Raw")
            .unwrap();
        assert_eq!(raw.min, None);
        assert_eq!(raw.max, None);
        assert!(raw.receiver_nodes.is_empty());
        assert_eq!(raw.comment, "");

        // --- Motor_01 (extended id, flag bit excluded) ---
        let motor = db.get_message_by_name("Motor_01").expect("message");
        assert_eq!(motor.id_format, IdFormat::Extended);
        assert_eq!(motor.id, 0x16A9549D);
        assert_eq!(motor.id_hex, "0x16A9549D");
        assert_eq!(motor.sender_nodes, vec!["Motor"]);

        // declaration order preserved
        let order: Vec<&str> = db.iter_messages().map(|m| m.name.as_str()).collect();
        assert_eq!(order, vec!["EngineStatus", "Motor_01"]);
    }

    #[test]
    fn test_loaded_signal_invariants() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "test.dbc", DBC_CONTENT);
        let db = from_file(&path).unwrap();

        for msg in db.iter_messages() {
            for sig in msg.signals(&db) {
                assert_eq!(sig.item_text(&db), format!("{}.{}", msg.name, sig.name));
                assert!(!sig.comment.contains('\0'));
                assert!(!sig.comment.contains('\n'));
                assert!(!sig.comment.contains('\r'));
            }
        }
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(matches!(from_file(""), Err(LoadError::EmptyPath)));
        assert!(matches!(from_file("   "), Err(LoadError::EmptyPath)));
    }

    #[test]
    fn test_wrong_extension_rejected() {
        let err = from_file("signals.txt").unwrap_err();
        assert!(matches!(err, LoadError::InvalidExtension { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = from_file("/nonexistent/dir/missing.dbc").unwrap_err();
        assert!(matches!(err, LoadError::OpenFile { .. }));
    }

    #[test]
    fn test_malformed_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "broken.dbc", "this is not a can database\n");
        let err = from_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }
}
