use std::time::Duration;

use tokio::sync::mpsc;

use crate::api::ApiClient;
use crate::cli::commands::WatchArgs;
use crate::cli::output::{format_live_event, live_event_to_json};
use crate::model::ClientConfig;
use crate::sync::{LiveChannel, LiveEvent, SyncEvent};

use super::CmdResult;

/// Print live-update signals until `--count` updates have arrived (or forever).
pub fn cmd_watch(api: &ApiClient, config: &ClientConfig, args: WatchArgs, json: bool) -> CmdResult {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _live = LiveChannel::spawn(
        runtime.handle(),
        api.clone(),
        Duration::from_millis(config.live.retry_ms),
        tx,
    );

    runtime.block_on(async {
        let mut updates = 0u64;
        while let Some(event) = rx.recv().await {
            let SyncEvent::Live(event) = event else {
                continue;
            };
            if json {
                println!("{}", serde_json::to_string(&live_event_to_json(&event))?);
            } else {
                println!("{}", format_live_event(&event));
            }
            if matches!(event, LiveEvent::Update) {
                updates += 1;
                if args.count.is_some_and(|n| updates >= n) {
                    break;
                }
            }
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
