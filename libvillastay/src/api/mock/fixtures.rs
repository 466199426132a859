//! Canned records for the mock backend

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use super::MockApiConfig;
use crate::schema::{
    Booking, BookingStatus, MessageEntry, MessageType, Role, SenderRole, ThreadEntry, ThreadStatus,
    User,
};

/// User id of the demo host
pub const DEMO_HOST_ID: &str = "host-demo";

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

pub fn host_user(id: &str) -> User {
    User {
        id: id.to_string(),
        email: "marta@villastay.test".to_string(),
        role: Role::Host,
        verified: true,
        first_name: Some("Marta".to_string()),
        last_name: Some("Ruiz".to_string()),
        avatar_url: None,
        phone_e164: None,
    }
}

pub fn thread(booking_id: &str, status: ThreadStatus) -> ThreadEntry {
    ThreadEntry {
        booking_id: booking_id.to_string(),
        villa_id: "villa-azul".to_string(),
        villa_title: "Casa Azul".to_string(),
        check_in: date(2024, 6, 1),
        check_out: date(2024, 6, 5),
        guest_avatar_url: None,
        guest_name: format!("Guest {}", booking_id),
        last_message_snippet: "Is parking included?".to_string(),
        last_ts: epoch(),
        unread_count: 1,
        status,
    }
}

/// Message `index` of a thread, one minute after the previous one
pub fn message(index: usize) -> MessageEntry {
    let from_host = index % 2 == 1;
    MessageEntry {
        id: format!("m{:03}", index),
        sender_role: Some(if from_host { SenderRole::Host } else { SenderRole::Guest }),
        sender_name: Some(if from_host { "Marta" } else { "Ana" }.to_string()),
        sender_id: None,
        recipient_id: None,
        body: format!("Message number {}", index),
        sent_at: epoch() + Duration::minutes(index as i64),
        read_at: None,
        read: from_host,
        kind: MessageType::Text,
        template_id: None,
    }
}

/// `count` messages in chronological order
pub fn history(count: usize) -> Vec<MessageEntry> {
    (0..count).map(message).collect()
}

pub fn booking(id: &str) -> Booking {
    Booking {
        id: id.to_string(),
        villa_id: "villa-azul".to_string(),
        guest_user_id: "guest-ana".to_string(),
        check_in: date(2024, 6, 1),
        check_out: date(2024, 6, 5),
        guests: 2,
        amount_usd: 1200.0,
        status: BookingStatus::Completed,
        created_at: epoch(),
        updated_at: epoch(),
    }
}

/// A small inbox covering every tab
pub fn demo_config() -> MockApiConfig {
    let threads = vec![
        ThreadEntry {
            villa_title: "Casa Azul".to_string(),
            guest_name: "Ana Souza".to_string(),
            last_message_snippet: "Is the pool heated in June?".to_string(),
            unread_count: 2,
            ..thread("bk-1001", ThreadStatus::Inquiry)
        },
        ThreadEntry {
            villa_title: "Villa Limonaia".to_string(),
            guest_name: "Tom Becker".to_string(),
            last_message_snippet: "We land at 14:20".to_string(),
            unread_count: 0,
            ..thread("bk-1002", ThreadStatus::Confirmed)
        },
        ThreadEntry {
            villa_title: "Casa Azul".to_string(),
            guest_name: "Lea Martin".to_string(),
            last_message_snippet: "Thanks for everything!".to_string(),
            unread_count: 0,
            ..thread("bk-0990", ThreadStatus::Completed)
        },
    ];

    let mut messages = HashMap::new();
    messages.insert("bk-1001".to_string(), history(7));
    messages.insert("bk-1002".to_string(), history(64));
    messages.insert("bk-0990".to_string(), history(3));

    MockApiConfig {
        users: vec![host_user(DEMO_HOST_ID)],
        threads,
        messages,
        bookings: vec![booking("bk-0990"), booking("bk-1002")],
        ..Default::default()
    }
}
