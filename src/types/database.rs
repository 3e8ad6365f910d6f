//! Database model (SlotMap-backed).
//!
//! Storage uses **SlotMap** arenas with **stable keys**: [`MessageKey`] and
//! [`SignalKey`]. Public iteration follows the declaration-order vector via
//! [`Database::iter_messages`]. Lookups are normalized: names are
//! case-insensitive, hexadecimal IDs accept `"12dd54e3"`, `"0x12DD54E3"` and
//! similar forms.

use slotmap::{SlotMap, new_key_type};
use std::collections::HashMap;

use crate::types::message::Message;
use crate::types::signal::Signal;

// --- Stable keys (SlotMap) ---
new_key_type! { pub struct MessageKey; }
new_key_type! { pub struct SignalKey; }

const CAN_SFF_MASK: u32 = 0x0000_07FF; // 11 bit
const CAN_EFF_MASK: u32 = 0x1FFF_FFFF; // 29 bit

/// In-memory representation of a loaded CAN database.
///
/// Holds the source path, the arenas of messages/signals (SlotMaps with
/// stable keys), the declaration-order vector, and normalized lookup maps.
/// A database is built wholesale by [`crate::dbc::load::from_file`] and
/// replaced wholesale by the next load; the filter in [`crate::search`]
/// never mutates it.
#[derive(Default, Clone, Debug)]
pub struct Database {
    /// Path of the `.dbc` file this database was loaded from.
    pub path: String,

    // --- Main storage (stable-key maps) ---
    pub messages: SlotMap<MessageKey, Message>,
    pub signals: SlotMap<SignalKey, Signal>,

    // --- Order view ---
    pub messages_order: Vec<MessageKey>,

    // --- Lookups (case-normalized). Duplicates resolve to the most recent entry.
    pub(crate) msg_key_by_id: HashMap<u32, MessageKey>,
    pub(crate) msg_key_by_hex: HashMap<String, MessageKey>, // "0x..." uppercase → MessageKey
    pub(crate) msg_key_by_name: HashMap<String, MessageKey>, // lower(name) → MessageKey
}

impl Database {
    // ------------- Messages ------------

    /// Appends a message and indexes its id/name. Loader path: duplicates are
    /// kept in declaration order, the lookup maps resolve to the last one.
    pub(crate) fn push_message(&mut self, mut msg: Message) -> MessageKey {
        msg.id_hex = id_to_hex(msg.id);
        let id: u32 = msg.id;
        let id_hex: String = msg.id_hex.clone();
        let name_key: String = msg.name.to_lowercase();

        let msg_key: MessageKey = self.messages.insert(msg);
        self.messages_order.push(msg_key);

        self.msg_key_by_id.insert(id, msg_key);
        self.msg_key_by_hex.insert(id_hex, msg_key);
        self.msg_key_by_name.insert(name_key, msg_key);
        msg_key
    }

    pub fn get_msg_key_by_name(&self, name: &str) -> Option<MessageKey> {
        self.msg_key_by_name.get(&name.to_lowercase()).copied()
    }

    pub fn get_msg_key_by_id(&self, id: u32) -> Option<MessageKey> {
        self.msg_key_by_id.get(&id).copied()
    }

    pub fn get_msg_key_by_id_hex(&self, id_hex: &str) -> Option<MessageKey> {
        let key: String = normalize_id_hex(id_hex)?;
        self.msg_key_by_hex.get(&key).copied()
    }

    pub fn get_message_by_key(&self, key: MessageKey) -> Option<&Message> {
        self.messages.get(key)
    }

    pub fn get_message_by_key_mut(&mut self, key: MessageKey) -> Option<&mut Message> {
        self.messages.get_mut(key)
    }

    /// Returns a `&Message` given the name (case-insensitive).
    pub fn get_message_by_name(&self, name: &str) -> Option<&Message> {
        let key: MessageKey = self.get_msg_key_by_name(name)?;
        self.get_message_by_key(key)
    }

    /// Returns a `&Message` given the numeric CAN ID.
    pub fn get_message_by_id(&self, id: u32) -> Option<&Message> {
        let key: MessageKey = self.get_msg_key_by_id(id)?;
        self.get_message_by_key(key)
    }

    /// Returns a `&Message` given a hexadecimal ID (case-insensitive).
    ///
    /// The argument may come in various forms, e.g., `"12dd54e3"`,
    /// `"0x12dd54e3"`, `"12DD54E3"`; it is normalized internally.
    pub fn get_message_by_id_hex(&self, id_hex: &str) -> Option<&Message> {
        let key: MessageKey = self.get_msg_key_by_id_hex(id_hex)?;
        self.get_message_by_key(key)
    }

    /// Iterates messages in declaration order.
    pub fn iter_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages_order
            .iter()
            .filter_map(move |&key| self.messages.get(key))
    }

    // -------------- Signals ------------

    /// Appends a signal to `msg_key` and stores it in the arena. Loader path:
    /// no duplicate-name check, declaration order preserved.
    pub(crate) fn push_signal(&mut self, msg_key: MessageKey, mut sig: Signal) -> SignalKey {
        sig.message = msg_key;
        let sig_key: SignalKey = self.signals.insert(sig);
        if let Some(msg) = self.messages.get_mut(msg_key) {
            msg.signals.push(sig_key);
        }
        sig_key
    }

    pub fn get_signal_by_key(&self, key: SignalKey) -> Option<&Signal> {
        self.signals.get(key)
    }

    pub fn get_signal_by_key_mut(&mut self, key: SignalKey) -> Option<&mut Signal> {
        self.signals.get_mut(key)
    }

    /// Returns a `&Signal` of message `msg_key` given the signal name
    /// (case-insensitive).
    pub fn get_signal_by_name(&self, msg_key: MessageKey, name: &str) -> Option<&Signal> {
        let msg: &Message = self.get_message_by_key(msg_key)?;
        msg.signals(self)
            .find(|sig| sig.name.eq_ignore_ascii_case(name))
    }

    /// Display key `"<message>.<signal>"` for the signal at `key`.
    pub fn item_text(&self, key: SignalKey) -> Option<String> {
        self.get_signal_by_key(key).map(|sig| sig.item_text(self))
    }

    // -------------- Counters ------------

    pub fn message_count(&self) -> usize {
        self.messages_order.len()
    }

    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    /// `true` when no messages are loaded.
    pub fn is_empty(&self) -> bool {
        self.messages_order.is_empty()
    }
}

/// Normalized hexadecimal rendering: 3 hex digits for standard-range IDs,
/// 8 for extended, uppercase, `0x` prefix.
pub(crate) fn id_to_hex(id: u32) -> String {
    if id <= CAN_SFF_MASK {
        format!("0x{:03X}", id)
    } else {
        format!("0x{:08X}", id & CAN_EFF_MASK)
    }
}

/// Normalizes a free-form hexadecimal ID to the stored `"0x..."` form.
fn normalize_id_hex(raw: &str) -> Option<String> {
    let trimmed: &str = raw.trim();
    let digits: &str = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let id: u32 = u32::from_str_radix(digits, 16).ok()?;
    Some(id_to_hex(id))
}
