//! Conversation Reaper Tests

use beanwire_infrastructure::config::AppConfig;
use beanwire_infrastructure::di::ContainerBuilder;
use beanwire_infrastructure::infrastructure::spawn_conversation_reaper;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn config_with_reaper(interval_ms: u64) -> AppConfig {
    let mut config = AppConfig::default();
    config.conversation.reaper_interval_ms = interval_ms;
    config
}

#[tokio::test]
async fn test_reaper_evicts_idle_conversations() {
    let container = ContainerBuilder::new(config_with_reaper(10)).build().unwrap();
    let session = container.new_session();

    let unit = container.begin_unit_of_work(Some(&session), None).unwrap();
    container.conversations().begin(None).unwrap();
    unit.conversation().unwrap().set_timeout(Duration::ZERO);
    unit.end().unwrap();
    assert_eq!(session.conversation_ids().len(), 1);

    let token = CancellationToken::new();
    let handle = container.spawn_reaper(token.clone());
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(session.conversation_ids().is_empty());
    token.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_reaper_keeps_active_conversations() {
    let container = ContainerBuilder::new(AppConfig::default()).build().unwrap();
    let session = container.new_session();

    let unit = container.begin_unit_of_work(Some(&session), None).unwrap();
    container.conversations().begin(Some("checkout")).unwrap();
    unit.end().unwrap();

    let token = CancellationToken::new();
    let handle = spawn_conversation_reaper(
        container.conversations().clone(),
        Duration::from_millis(5),
        token.clone(),
    );
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(session.conversation_ids(), vec!["checkout".to_string()]);
    token.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_reaper_stops_on_cancel() {
    let container = ContainerBuilder::new(AppConfig::default()).build().unwrap();
    let token = CancellationToken::new();
    let handle = container.spawn_reaper(token.clone());

    token.cancel();

    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("reaper should stop after cancellation")
        .unwrap();
}
