//! # search
//!
//! Pure, case-insensitive substring filtering over a [`Database`].
//!
//! [`apply`] never mutates the source database: it returns a [`FilteredView`]
//! of message keys plus, for partially matched messages, the selected signal
//! keys. The shell re-runs the filter synchronously on every query or kind
//! change; only one filter operation is ever in flight.

use crate::types::database::{Database, MessageKey, SignalKey};
use crate::types::message::Message;
use crate::types::signal::Signal;

/// Search scope selector.
#[derive(Default, Copy, Clone, PartialEq, Eq, Debug)]
pub enum FilterKind {
    /// Match message names, frame IDs, and signal fields.
    #[default]
    All,
    /// Match message names only.
    Message,
    /// Match signal fields only (name, comment, receivers, min/max).
    Signal,
    /// Select whole messages by decimal or hexadecimal frame ID.
    FrameId,
}

/// One message selected by [`apply`]: the message key plus the selected
/// subset of its signals (the full list when the message itself matched).
#[derive(Clone, PartialEq, Debug)]
pub struct MessageView {
    pub message: MessageKey,
    pub signals: Vec<SignalKey>,
}

/// Non-owning filtered view over a [`Database`], message order preserved.
#[derive(Default, Clone, PartialEq, Debug)]
pub struct FilteredView {
    pub messages: Vec<MessageView>,
}

impl FilteredView {
    /// The unfiltered view: every message with its full signal list.
    pub fn full(db: &Database) -> Self {
        let messages: Vec<MessageView> = db
            .messages_order
            .iter()
            .filter_map(|&msg_key| {
                db.get_message_by_key(msg_key).map(|msg| MessageView {
                    message: msg_key,
                    signals: msg.signals.clone(),
                })
            })
            .collect();
        FilteredView { messages }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn signal_count(&self) -> usize {
        self.messages.iter().map(|m| m.signals.len()).sum()
    }
}

/// Filters `db` with a query string and a scope selector.
///
/// Matching is case-insensitive substring containment on the trimmed,
/// lowercased query. A message is included with its **full** signal list
/// when the message level matches (name for `All`/`Message`, decimal/hex
/// frame ID for `All`/`FrameId`). Otherwise it is included narrowed to
/// exactly the matching signals when at least one signal matches
/// (`All`/`Signal`: name, comment, comma-joined receivers, min/max text).
///
/// `FrameId` selects and deselects whole messages; an empty query counts as
/// a vacuous frame-ID match, so `apply(db, "", FrameId)` returns every
/// message with all signals. This is deliberate, not "no filter".
pub fn apply(db: &Database, query: &str, kind: FilterKind) -> FilteredView {
    let query: String = query.trim().to_lowercase();
    if query.is_empty() && kind == FilterKind::All {
        return FilteredView::full(db);
    }

    let mut messages: Vec<MessageView> = Vec::new();
    for &msg_key in &db.messages_order {
        let Some(msg) = db.get_message_by_key(msg_key) else {
            continue;
        };

        let frame_id_match: bool = frame_id_matches(msg, &query);
        let message_matches: bool = (matches!(kind, FilterKind::All | FilterKind::Message)
            && msg.name.to_lowercase().contains(&query))
            || (matches!(kind, FilterKind::All | FilterKind::FrameId) && frame_id_match);

        let mut signals_matching: Vec<SignalKey> = Vec::new();
        for &sig_key in &msg.signals {
            let Some(sig) = db.get_signal_by_key(sig_key) else {
                continue;
            };
            let signal_level_match: bool = matches!(kind, FilterKind::All | FilterKind::Signal)
                && signal_matches(sig, &query);
            if kind == FilterKind::FrameId && frame_id_match {
                if query.is_empty() || signal_level_match {
                    signals_matching.push(sig_key);
                }
            } else if signal_level_match {
                signals_matching.push(sig_key);
            }
        }

        if message_matches {
            messages.push(MessageView {
                message: msg_key,
                signals: msg.signals.clone(),
            });
        } else if !signals_matching.is_empty() {
            messages.push(MessageView {
                message: msg_key,
                signals: signals_matching,
            });
        }
    }

    FilteredView { messages }
}

/// Frame-ID text match: decimal and unpadded lowercase hex renderings.
fn frame_id_matches(msg: &Message, query: &str) -> bool {
    format!("{:#x}", msg.id).contains(query) || msg.id.to_string().contains(query)
}

fn signal_matches(sig: &Signal, query: &str) -> bool {
    sig.name.to_lowercase().contains(query)
        || sig.comment.to_lowercase().contains(query)
        || sig.receiver_nodes.join(",").to_lowercase().contains(query)
        || sig.min_text().contains(query)
        || sig.max_text().contains(query)
}
