use std::error::Error;
use std::sync::Arc;

use herald_core::domain::{TaskEvent, topics};
use herald_core::impls::{BroadcastSideChannel, InMemoryEventSource};
use herald_core::{
    BackgroundTaskPatch, EngineConfig, NotificationCenter, NotificationCenterBuilder,
    NotificationKey, NotificationPatch, OnChange, OverrideSpec, Payload, TaskId, TaskPromise,
    TaskStatus,
};
use tokio::time::{Duration, sleep};
use tracing_subscriber::EnvFilter;

/// 擬似的な clone 処理（300ms 後に成功）
async fn clone_repository(name: &'static str) -> Result<serde_json::Value, String> {
    sleep(Duration::from_millis(300)).await;
    Ok(serde_json::json!({ "name": name }))
}

/// settle するまでポーリング
async fn wait_settled(center: &NotificationCenter, key: &NotificationKey) {
    loop {
        let settled = center
            .get(key)
            .and_then(|n| n.status())
            .is_some_and(|s| s.is_terminal());
        if settled {
            return;
        }
        sleep(Duration::from_millis(50)).await;
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // (A) transport と side channel を用意（サンプルなので in-memory）
    let events = Arc::new(InMemoryEventSource::new());
    let signals = Arc::new(BroadcastSideChannel::new());
    let mut rescans = signals.subscribe();

    let center = NotificationCenterBuilder::new(EngineConfig::default())
        .event_source(events.clone())
        .side_channel(signals.clone())
        .build()?;

    // (B) promise で追跡するタスク
    let clone_key = center.upsert_notification(
        NotificationPatch::new()
            .key("clone:demo")
            .message("Clone")
            .description("Cloning demo volume")
            .open(true)
            .background_task(
                BackgroundTaskPatch::with_status(TaskStatus::Pending)
                    .promise(TaskPromise::new(clone_repository("demo-copy")))
                    .on_change(OnChange::new().on(
                        TaskStatus::Resolved,
                        OverrideSpec::computed(|payload: Option<&Payload>, _: &herald_core::Notification| {
                            let name = payload
                                .and_then(|p| p.value().get("name"))
                                .and_then(|v| v.as_str())
                                .unwrap_or("copy");
                            format!("Cloned to {name}")
                        }),
                    )),
            ),
    );

    // (C) サーバー側タスク（event stream で追跡）
    let task_id = TaskId::from("rescan-1");
    let rescan_key = center.upsert_notification(
        NotificationPatch::new()
            .key("rescan:images")
            .message("Rescan images")
            .open(true)
            .background_task(
                BackgroundTaskPatch::with_status(TaskStatus::Pending)
                    .task_id(task_id.clone())
                    .topic(topics::IMAGE_RESCANNED)
                    .on_change(OnChange::new().on(TaskStatus::Resolved, "Image list updated")),
            ),
    );

    for step in 1..=10 {
        events.emit(&task_id, TaskEvent::progress(step as f64, 10.0));
        sleep(Duration::from_millis(30)).await;
    }
    events.emit(&task_id, TaskEvent::done(10.0, 10.0));

    // (D) 完了を待つ
    wait_settled(&center, &clone_key).await;
    wait_settled(&center, &rescan_key).await;
    if let Ok(Ok(signal)) = tokio::time::timeout(Duration::from_secs(1), rescans.recv()).await {
        tracing::info!(topic = %signal.topic, task_id = %signal.task_id, "side signal received");
    }

    // (E) 履歴を JSON で出力
    println!("{}", serde_json::to_string_pretty(&center.notifications())?);
    println!("counts: {:?}", center.counts());
    Ok(())
}
