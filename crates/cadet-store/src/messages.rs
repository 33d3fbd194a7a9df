use std::cmp::Reverse;
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use cadet_shared::{Id, Message, MessageContact, NewMessage, Validate, ValidationError};

use crate::error::Result;
use crate::store::Store;

impl Store {
    /// Store a message from `sender_id`. The receiver must exist.
    pub fn create_message(
        &mut self,
        new: NewMessage,
        sender_id: Id,
        now: DateTime<Utc>,
    ) -> Result<Message> {
        new.validate()?;
        let (Some(receiver_id), Some(content)) = (new.receiver_id, new.content) else {
            return Err(ValidationError::new("receiverId", "Receiver ID and content are required").into());
        };
        self.check_user("senderId", sender_id, None)?;
        self.check_user("receiverId", receiver_id, None)?;

        let message = self
            .messages
            .insert_with(|id| Message {
                id,
                sender_id,
                receiver_id,
                content,
                timestamp: now,
                is_read: false,
            })
            .clone();

        tracing::debug!(id = message.id, from = sender_id, to = receiver_id, "message stored");
        Ok(message)
    }

    pub fn get_message(&self, id: Id) -> Option<&Message> {
        self.messages.get(id)
    }

    /// The conversation between two users, oldest first.
    pub fn messages_between(&self, a: Id, b: Id) -> Vec<&Message> {
        let mut messages: Vec<_> = self
            .messages
            .values()
            .filter(|m| {
                (m.sender_id == a && m.receiver_id == b) || (m.sender_id == b && m.receiver_id == a)
            })
            .collect();
        messages.sort_by_key(|m| m.timestamp);
        messages
    }

    /// Every message sent or received by a user, newest first.
    pub fn messages_for_user(&self, user_id: Id) -> Vec<&Message> {
        let mut messages: Vec<_> = self
            .messages
            .values()
            .filter(|m| m.sender_id == user_id || m.receiver_id == user_id)
            .collect();
        messages.sort_by_key(|m| Reverse(m.timestamp));
        messages
    }

    /// Mark every unread message from `sender_id` to `receiver_id` as read.
    /// Returns how many were flipped.
    pub fn mark_messages_read(&mut self, sender_id: Id, receiver_id: Id) -> usize {
        let mut flipped = 0;
        for message in self.messages.values_mut() {
            if message.sender_id == sender_id && message.receiver_id == receiver_id && !message.is_read {
                message.is_read = true;
                flipped += 1;
            }
        }
        if flipped > 0 {
            tracing::debug!(from = sender_id, to = receiver_id, flipped, "messages marked read");
        }
        flipped
    }

    /// Conversation list for a user: one entry per counterpart, most recent
    /// conversation first. Counterparts whose account no longer exists are
    /// skipped.
    pub fn message_contacts(&self, user_id: Id) -> Vec<MessageContact> {
        let counterparts: BTreeSet<Id> = self
            .messages
            .values()
            .filter_map(|m| {
                if m.sender_id == user_id {
                    Some(m.receiver_id)
                } else if m.receiver_id == user_id {
                    Some(m.sender_id)
                } else {
                    None
                }
            })
            .collect();

        let mut contacts: Vec<MessageContact> = counterparts
            .into_iter()
            .filter_map(|contact_id| {
                let contact = self.users.get(contact_id)?;
                let conversation = self.messages_between(user_id, contact_id);
                let last = conversation.last();
                let unread_count = conversation
                    .iter()
                    .filter(|m| m.sender_id == contact_id && !m.is_read)
                    .count();

                Some(MessageContact {
                    id: contact_id,
                    name: contact.full_name(),
                    role: contact.role,
                    last_message: last.map(|m| m.content.clone()),
                    last_message_time: last.map(|m| m.timestamp),
                    unread_count,
                    profile_image: contact.profile_image.clone(),
                })
            })
            .collect();

        // Newest first; `None` sorts below any timestamp, so it lands last.
        contacts.sort_by(|a, b| b.last_message_time.cmp(&a.last_message_time));
        contacts
    }
}
