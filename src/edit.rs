//! # edit
//!
//! In-memory edit operations on a loaded [`Database`]: add, rename, and
//! remove messages and signals, plus a key-independent change summary
//! between two database snapshots. Field-level tweaks (comment, bounds,
//! receivers) go through the `*_mut` accessors on [`Database`] directly.
//!
//! Editing never touches the disk; writing DBC text back out belongs to the
//! grammar-owning parser, not to this crate.

use crate::types::database::{Database, MessageKey, SignalKey, id_to_hex};
use crate::types::errors::EditError;
use crate::types::message::Message;
use crate::types::signal::Signal;

impl Database {
    /// Adds a new, initially signal-less message.
    ///
    /// Rejects empty names, names already present (case-insensitive), and
    /// IDs already assigned. Any keys in `msg.signals` are discarded; use
    /// [`Database::add_signal`] to populate the message.
    pub fn add_message(&mut self, mut msg: Message) -> Result<MessageKey, EditError> {
        if msg.name.trim().is_empty() {
            return Err(EditError::EmptyMessageName);
        }
        if self.get_msg_key_by_name(&msg.name).is_some() {
            return Err(EditError::MessageAlreadyExists { name: msg.name });
        }
        if self.get_msg_key_by_id(msg.id).is_some() {
            return Err(EditError::MessageIdAlreadyAssigned {
                id_hex: id_to_hex(msg.id),
            });
        }
        msg.signals = Vec::new();
        Ok(self.push_message(msg))
    }

    /// Renames the message at `key`, keeping the name lookup consistent.
    pub fn rename_message(&mut self, key: MessageKey, new_name: &str) -> Result<(), EditError> {
        if new_name.trim().is_empty() {
            return Err(EditError::EmptyMessageName);
        }
        if let Some(existing) = self.get_msg_key_by_name(new_name)
            && existing != key
        {
            return Err(EditError::MessageAlreadyExists {
                name: new_name.to_string(),
            });
        }
        let Some(msg) = self.messages.get_mut(key) else {
            return Err(EditError::MessageMissing { message_key: key });
        };
        let old_name: String = msg.name.to_lowercase();
        msg.name = new_name.to_string();

        if self.msg_key_by_name.get(&old_name) == Some(&key) {
            self.msg_key_by_name.remove(&old_name);
        }
        self.msg_key_by_name.insert(new_name.to_lowercase(), key);
        Ok(())
    }

    /// Removes the message at `key` together with all its signals.
    pub fn remove_message(&mut self, key: MessageKey) -> Result<Message, EditError> {
        let Some(msg) = self.messages.remove(key) else {
            return Err(EditError::MessageMissing { message_key: key });
        };
        for &sig_key in &msg.signals {
            self.signals.remove(sig_key);
        }
        self.messages_order.retain(|&k| k != key);
        self.msg_key_by_id.retain(|_, &mut v| v != key);
        self.msg_key_by_hex.retain(|_, &mut v| v != key);
        self.msg_key_by_name.retain(|_, &mut v| v != key);
        Ok(msg)
    }

    /// Appends a signal to the message at `msg_key`.
    ///
    /// Rejects empty names and names already present in the same message
    /// (case-insensitive). Signal names only need to be unique per message.
    pub fn add_signal(&mut self, msg_key: MessageKey, sig: Signal) -> Result<SignalKey, EditError> {
        if sig.name.trim().is_empty() {
            return Err(EditError::EmptySignalName);
        }
        let Some(msg) = self.get_message_by_key(msg_key) else {
            return Err(EditError::MessageMissing {
                message_key: msg_key,
            });
        };
        if self.get_signal_by_name(msg_key, &sig.name).is_some() {
            return Err(EditError::SignalAlreadyExists {
                message: msg.name.clone(),
                signal: sig.name,
            });
        }
        Ok(self.push_signal(msg_key, sig))
    }

    /// Removes the signal at `key` and detaches it from its owning message.
    pub fn remove_signal(&mut self, key: SignalKey) -> Result<Signal, EditError> {
        let Some(sig) = self.signals.remove(key) else {
            return Err(EditError::SignalMissing { signal_key: key });
        };
        if let Some(msg) = self.messages.get_mut(sig.message) {
            msg.signals.retain(|&k| k != key);
        }
        Ok(sig)
    }
}

/// Names of the messages that differ between two database snapshots.
#[derive(Default, Clone, PartialEq, Debug)]
pub struct ChangeSummary {
    pub messages_added: Vec<String>,
    pub messages_removed: Vec<String>,
    pub messages_modified: Vec<String>,
}

impl ChangeSummary {
    pub fn is_empty(&self) -> bool {
        self.messages_added.is_empty()
            && self.messages_removed.is_empty()
            && self.messages_modified.is_empty()
    }
}

/// Compares two snapshots by message name, independent of arena keys, so an
/// edited clone can be diffed against the database it was cloned from (or
/// against a fresh load of the same file).
pub fn changes_between(original: &Database, edited: &Database) -> ChangeSummary {
    let mut summary = ChangeSummary::default();

    for msg in edited.iter_messages() {
        match original.get_message_by_name(&msg.name) {
            None => summary.messages_added.push(msg.name.clone()),
            Some(before) => {
                if message_differs(original, before, edited, msg) {
                    summary.messages_modified.push(msg.name.clone());
                }
            }
        }
    }
    for msg in original.iter_messages() {
        if edited.get_message_by_name(&msg.name).is_none() {
            summary.messages_removed.push(msg.name.clone());
        }
    }

    summary
}

fn message_differs(a_db: &Database, a: &Message, b_db: &Database, b: &Message) -> bool {
    a.id != b.id
        || a.id_format != b.id_format
        || a.byte_length != b.byte_length
        || a.sender_nodes != b.sender_nodes
        || a.comment != b.comment
        || a.signals.len() != b.signals.len()
        || a.signals(a_db)
            .zip(b.signals(b_db))
            .any(|(sa, sb)| signal_differs(sa, sb))
}

fn signal_differs(a: &Signal, b: &Signal) -> bool {
    a.name != b.name
        || a.comment != b.comment
        || a.receiver_nodes != b.receiver_nodes
        || a.sign != b.sign
        || a.min != b.min
        || a.max != b.max
}
