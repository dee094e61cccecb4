use async_trait::async_trait;
use guestbook::adapters::memory::MemoryStore;
use guestbook::core::runtimevar::{bytes_decoder, json_decoder, string_decoder, Variable};
use guestbook::domain::model::RawValue;
use guestbook::domain::ports::{VariableOpener, Watcher};
use guestbook::{GuestbookError, Result, WatchOptions};
use serde::Deserialize;
use std::time::Duration;

const MOTD: &str = "motd";

fn every_second() -> WatchOptions {
    WatchOptions {
        wait_time: Duration::from_secs(1),
    }
}

async fn open_motd(store: &MemoryStore) -> Variable<String> {
    store
        .new_variable(MOTD, string_decoder, every_second())
        .await
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_latest_returns_first_value() {
    let store = MemoryStore::new();
    store.set(MOTD, "hello");
    let mut motd = open_motd(&store).await;

    let snapshot = motd.latest().await.unwrap();
    assert_eq!(snapshot.value, "hello");
    assert_eq!(snapshot.version, None);
}

#[tokio::test(start_paused = true)]
async fn test_watch_sees_each_change() {
    let store = MemoryStore::new();
    store.set(MOTD, "v1");
    let mut motd = open_motd(&store).await;

    assert_eq!(motd.watch().await.unwrap().value, "v1");

    store.set(MOTD, "v2");
    assert_eq!(motd.watch().await.unwrap().value, "v2");
    assert_eq!(motd.latest().await.unwrap().value, "v2");
}

#[tokio::test(start_paused = true)]
async fn test_unchanged_value_is_not_republished() {
    let store = MemoryStore::new();
    store.set(MOTD, "same");
    let mut motd = open_motd(&store).await;
    assert_eq!(motd.watch().await.unwrap().value, "same");

    store.set(MOTD, "same");
    let next = tokio::time::timeout(Duration::from_secs(10), motd.watch()).await;
    assert!(next.is_err(), "no change should be reported");
}

#[tokio::test(start_paused = true)]
async fn test_missing_value_then_recovery() {
    let store = MemoryStore::new();
    let mut motd = open_motd(&store).await;

    assert!(matches!(
        motd.latest().await,
        Err(GuestbookError::VariableNotFoundError { name }) if name == MOTD
    ));

    store.set(MOTD, "back");
    assert_eq!(motd.watch().await.unwrap().value, "back");
    assert_eq!(motd.latest().await.unwrap().value, "back");
}

#[tokio::test(start_paused = true)]
async fn test_failure_keeps_last_good_value() {
    let store = MemoryStore::new();
    store.set(MOTD, "good");
    let mut motd = open_motd(&store).await;
    assert_eq!(motd.watch().await.unwrap().value, "good");

    store.remove(MOTD);
    assert!(matches!(
        motd.watch().await,
        Err(GuestbookError::VariableNotFoundError { .. })
    ));
    assert_eq!(motd.latest().await.unwrap().value, "good");

    // The same value coming back counts as a change after a failure.
    store.set(MOTD, "good");
    assert_eq!(motd.watch().await.unwrap().value, "good");
}

#[tokio::test(start_paused = true)]
async fn test_decode_error_is_reported() {
    #[derive(Debug, Clone, Deserialize)]
    struct Banner {
        #[allow(dead_code)]
        text: String,
    }

    let store = MemoryStore::new();
    store.set("banner", "{not json");
    let mut banner = store
        .new_variable("banner", json_decoder::<Banner>, every_second())
        .await
        .unwrap();

    match banner.latest().await {
        Err(err @ GuestbookError::DecodeError { .. }) => {
            assert!(
                err.to_string().starts_with("Decode error: value is not valid JSON: "),
                "unexpected message: {}",
                err
            );
        }
        other => panic!("expected DecodeError, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_close_stops_reads() {
    let store = MemoryStore::new();
    store.set(MOTD, "bye");
    let mut motd = open_motd(&store).await;
    assert_eq!(motd.latest().await.unwrap().value, "bye");

    motd.close();
    assert!(motd.is_closed());
    assert!(matches!(
        motd.latest().await,
        Err(GuestbookError::VariableClosedError { .. })
    ));
    assert!(matches!(
        motd.watch().await,
        Err(GuestbookError::VariableClosedError { .. })
    ));
}

#[tokio::test]
async fn test_zero_wait_time_uses_default() {
    let store = MemoryStore::new();
    let motd = store
        .new_variable(
            MOTD,
            string_decoder,
            WatchOptions {
                wait_time: Duration::ZERO,
            },
        )
        .await
        .unwrap();

    assert_eq!(motd.wait_time(), WatchOptions::DEFAULT_WAIT_TIME);
}

#[tokio::test]
async fn test_empty_name_is_rejected() {
    let store = MemoryStore::new();
    let result = store.new_variable("", string_decoder, every_second()).await;

    assert!(matches!(
        result,
        Err(GuestbookError::InvalidConfigValueError { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_watch_after_latest_waits_for_a_new_value() {
    let store = MemoryStore::new();
    store.set(MOTD, "hello");
    let mut motd = open_motd(&store).await;
    assert_eq!(motd.latest().await.unwrap().value, "hello");

    let next = tokio::time::timeout(Duration::from_secs(10), motd.watch()).await;
    assert!(next.is_err(), "latest value must not be delivered again");

    store.set(MOTD, "goodbye");
    assert_eq!(motd.watch().await.unwrap().value, "goodbye");
}

struct DeniedWatcher;

#[async_trait]
impl Watcher for DeniedWatcher {
    async fn fetch(&self) -> Result<RawValue> {
        Err(GuestbookError::VariableError {
            name: "/motd".to_string(),
            message: "AccessDenied".to_string(),
        })
    }
}

#[tokio::test(start_paused = true)]
async fn test_watcher_error_keeps_original_message() {
    let mut motd = Variable::open("/motd", DeniedWatcher, string_decoder, every_second()).unwrap();

    let err = motd.latest().await.unwrap_err();
    assert_eq!(err.to_string(), "Variable /motd failed: AccessDenied");
    match err {
        GuestbookError::VariableError { name, message } => {
            assert_eq!(name, "/motd");
            assert_eq!(message, "AccessDenied");
        }
        other => panic!("expected VariableError, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_bytes_variable_keeps_non_utf8_values() {
    let store = MemoryStore::new();
    store.set("logo", vec![0x89, b'P', b'N', b'G']);
    let mut logo = store
        .new_variable("logo", bytes_decoder, every_second())
        .await
        .unwrap();

    assert_eq!(logo.latest().await.unwrap().value, vec![0x89, b'P', b'N', b'G']);
}
