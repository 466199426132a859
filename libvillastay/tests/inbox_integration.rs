//! Integration tests for the host inbox
//!
//! Drives `InboxService` through the facade against the mock backend.

use std::collections::HashMap;
use std::sync::Arc;

use libvillastay::api::mock::{fixtures, MockApiConfig, MockBookingApi};
use libvillastay::api::PageRequest;
use libvillastay::error::ApiError;
use libvillastay::schema::ThreadStatus;
use libvillastay::service::inbox::{InboxTab, MessageHistory, SEND_FAILED_BODY, SEND_FAILED_TITLE};
use libvillastay::service::VillaService;
use libvillastay::{Config, NotificationKind};

const HOST: &str = "host-1";

/// Signed-in service over `api`; the mock handle stays with the test
async fn setup(config: MockApiConfig) -> (VillaService, Arc<MockBookingApi>) {
    let config = MockApiConfig {
        users: vec![fixtures::host_user(HOST)],
        ..config
    };
    let api = Arc::new(MockBookingApi::new(config));
    let mut settings = Config::default_config();
    settings.session.user_id = Some(HOST.to_string());

    let service = VillaService::with_api(settings, api.clone());
    service.sign_in_configured().await.unwrap();
    (service, api)
}

fn mixed_threads() -> Vec<libvillastay::schema::ThreadEntry> {
    vec![
        fixtures::thread("b-inq", ThreadStatus::Inquiry),
        fixtures::thread("b-conf", ThreadStatus::Confirmed),
        fixtures::thread("b-canc", ThreadStatus::Cancelled),
        fixtures::thread("b-done", ThreadStatus::Completed),
    ]
}

#[tokio::test]
async fn test_tab_statuses_sent_to_backend() {
    let (service, api) = setup(MockApiConfig {
        threads: mixed_threads(),
        ..Default::default()
    })
    .await;

    for tab in InboxTab::ALL {
        service.inbox().threads(tab).await.unwrap();
    }

    assert_eq!(
        api.thread_requests(),
        vec![
            vec![ThreadStatus::Inquiry],
            vec![ThreadStatus::Confirmed],
            vec![ThreadStatus::Cancelled, ThreadStatus::Completed],
            vec![],
        ]
    );
}

#[tokio::test]
async fn test_threads_always_match_tab_even_if_backend_ignores_filter() {
    let (service, _api) = setup(MockApiConfig {
        threads: mixed_threads(),
        honor_status_filter: false,
        ..Default::default()
    })
    .await;

    let past = service.inbox().threads(InboxTab::Past).await.unwrap();
    let ids: Vec<_> = past.iter().map(|t| t.booking_id.as_str()).collect();
    assert_eq!(ids, vec!["b-canc", "b-done"]);

    let support = service.inbox().threads(InboxTab::Support).await.unwrap();
    assert_eq!(support.len(), 4);
}

#[tokio::test]
async fn test_empty_thread_list() {
    let (service, _api) = setup(MockApiConfig::default()).await;
    let threads = service.inbox().threads(InboxTab::Inquiries).await.unwrap();
    assert!(threads.is_empty());
}

#[tokio::test]
async fn test_no_request_without_signed_in_user() {
    let api = Arc::new(MockBookingApi::new(MockApiConfig {
        threads: mixed_threads(),
        ..Default::default()
    }));
    let service = VillaService::with_api(Config::default_config(), api.clone());

    let error = service.inbox().threads(InboxTab::Upcoming).await.unwrap_err();
    assert_eq!(error.exit_code(), 2);
    assert_eq!(api.thread_call_count(), 0);
}

#[tokio::test]
async fn test_120_messages_paged_in_chronological_order() {
    // Backend returns newest first; the client must still show oldest first
    let mut newest_first = fixtures::history(120);
    newest_first.reverse();
    let mut messages = HashMap::new();
    messages.insert("b1".to_string(), newest_first);

    let (service, api) = setup(MockApiConfig {
        messages,
        ..Default::default()
    })
    .await;

    let history = service.inbox().load_all("b1").await.unwrap();
    assert_eq!(history.pages_loaded(), 3);
    assert!(!history.has_more());

    let loaded = history.messages();
    assert_eq!(loaded.len(), 120);
    assert!(loaded.windows(2).all(|pair| pair[0].sent_at <= pair[1].sent_at));
    assert_eq!(loaded[0].id, "m000");
    assert_eq!(loaded[119].id, "m119");

    let offsets: Vec<_> = api.page_requests().into_iter().map(|(_, page)| page.offset).collect();
    assert_eq!(offsets, vec![0, 50, 100]);
}

#[tokio::test]
async fn test_load_more_is_noop_after_short_page() {
    let mut messages = HashMap::new();
    messages.insert("b1".to_string(), fixtures::history(20));
    let (service, api) = setup(MockApiConfig {
        messages,
        ..Default::default()
    })
    .await;

    let mut history = MessageHistory::new("b1");
    assert_eq!(service.inbox().load_more(&mut history).await.unwrap(), 20);
    assert!(!history.has_more());

    assert_eq!(service.inbox().load_more(&mut history).await.unwrap(), 0);
    assert_eq!(api.page_requests(), vec![("b1".to_string(), PageRequest::first())]);
}

#[tokio::test]
async fn test_whitespace_send_issues_no_request() {
    let (service, api) = setup(MockApiConfig::default()).await;

    assert!(service.inbox().send("b1", "").await.unwrap().is_none());
    assert!(service.inbox().send("b1", "   \n\t ").await.unwrap().is_none());
    assert_eq!(api.send_call_count(), 0);
}

#[tokio::test]
async fn test_send_posts_text_as_typed_and_refetch_shows_message() {
    let mut messages = HashMap::new();
    messages.insert("b1".to_string(), fixtures::history(3));
    let (service, api) = setup(MockApiConfig {
        messages,
        ..Default::default()
    })
    .await;

    let sent = service.inbox().send("b1", "  See you at noon  ").await.unwrap().unwrap();
    assert_eq!(sent.body, "  See you at noon  ");
    assert_eq!(api.sent_messages()[0].body, "  See you at noon  ");

    let history = service.inbox().reload("b1", 1).await.unwrap();
    let last = history.messages().pop().unwrap();
    assert_eq!(last.id, sent.id);
}

#[tokio::test]
async fn test_send_failure_queues_notification() {
    let (service, api) = setup(MockApiConfig {
        send_error: Some(ApiError::Server("status 503".to_string())),
        ..Default::default()
    })
    .await;

    assert!(service.inbox().send("b1", "Hello").await.is_err());
    assert_eq!(api.send_call_count(), 1);

    let notifications = service.store().drain_notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Error);
    assert_eq!(notifications[0].title, SEND_FAILED_TITLE);
    assert_eq!(notifications[0].body, SEND_FAILED_BODY);
}
