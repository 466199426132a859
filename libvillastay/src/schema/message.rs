//! Inbox threads and thread messages

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Schema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SenderRole {
    Guest,
    Host,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Text,
    File,
    Template,
}

/// A single message in a booking-scoped thread
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageEntry {
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_role: Option<SenderRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    #[serde(default, alias = "sender_id", skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
    #[serde(default, alias = "recipient_id", skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub read: bool,
    #[serde(rename = "type", default)]
    pub kind: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
}

impl MessageEntry {
    pub fn is_read(&self) -> bool {
        self.read || self.read_at.is_some()
    }

    pub fn is_from_host(&self) -> bool {
        self.sender_role == Some(SenderRole::Host)
    }
}

impl Schema for MessageEntry {
    const ENTITY: &'static str = "MessageEntry";

    fn extra_checks(&self) -> Result<(), String> {
        if self.kind == MessageType::Template && self.template_id.is_none() {
            return Err("template message without templateId".to_string());
        }
        Ok(())
    }
}

/// Body of `POST /messages`
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageInput {
    #[validate(length(min = 1))]
    pub booking_id: String,
    #[validate(length(min = 1))]
    pub body: String,
}

impl Schema for SendMessageInput {
    const ENTITY: &'static str = "SendMessageInput";
}

/// Booking status as seen by the inbox (an inquiry has no booking yet)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ThreadStatus {
    Inquiry,
    Confirmed,
    Cancelled,
    Completed,
}

impl ThreadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreadStatus::Inquiry => "inquiry",
            ThreadStatus::Confirmed => "confirmed",
            ThreadStatus::Cancelled => "cancelled",
            ThreadStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for ThreadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary row of the host inbox thread list
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThreadEntry {
    #[validate(length(min = 1))]
    pub booking_id: String,
    pub villa_id: String,
    pub villa_title: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_avatar_url: Option<String>,
    pub guest_name: String,
    #[serde(default)]
    pub last_message_snippet: String,
    pub last_ts: DateTime<Utc>,
    #[serde(default)]
    pub unread_count: u32,
    pub status: ThreadStatus,
}

impl Schema for ThreadEntry {
    const ENTITY: &'static str = "ThreadEntry";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_inbox_message() {
        let msg: MessageEntry = serde_json::from_str(
            r#"{"id":"m1","senderRole":"host","senderName":"Marta","body":"Welcome!",
                "sentAt":"2024-05-01T09:30:00Z","type":"text"}"#,
        )
        .unwrap();
        assert!(msg.is_from_host());
        assert!(!msg.is_read());
        assert_eq!(msg.kind, MessageType::Text);
        assert!(msg.check().is_ok());
    }

    #[test]
    fn test_decode_schema_style_message() {
        let msg: MessageEntry = serde_json::from_str(
            r#"{"id":"m2","sender_id":"u1","recipient_id":"u2","body":"Hi",
                "sentAt":"2024-05-01T09:31:00Z","read":true}"#,
        )
        .unwrap();
        assert_eq!(msg.sender_id.as_deref(), Some("u1"));
        assert_eq!(msg.recipient_id.as_deref(), Some("u2"));
        assert!(msg.is_read());
        assert!(msg.sender_role.is_none());
    }

    #[test]
    fn test_template_without_id_fails_check() {
        let msg: MessageEntry = serde_json::from_str(
            r#"{"id":"m3","body":"Check-in instructions","sentAt":"2024-05-01T09:31:00Z","type":"template"}"#,
        )
        .unwrap();
        assert!(msg.check().is_err());
    }

    #[test]
    fn test_send_message_input_wire_format() {
        let input = SendMessageInput {
            booking_id: "b1".to_string(),
            body: "See you soon".to_string(),
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json, serde_json::json!({"bookingId": "b1", "body": "See you soon"}));
    }

    #[test]
    fn test_decode_thread_entry() {
        let thread: ThreadEntry = serde_json::from_str(
            r#"{"bookingId":"b1","villaId":"v1","villaTitle":"Casa Azul","checkIn":"2024-06-01",
                "checkOut":"2024-06-05","guestName":"Ana","lastMessageSnippet":"Is parking free?",
                "lastTs":"2024-05-01T09:31:00Z","unreadCount":2,"status":"inquiry"}"#,
        )
        .unwrap();
        assert_eq!(thread.status, ThreadStatus::Inquiry);
        assert_eq!(thread.unread_count, 2);
        assert!(thread.guest_avatar_url.is_none());
        assert!(thread.check().is_ok());
    }
}
