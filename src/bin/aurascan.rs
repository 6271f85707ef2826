// Headless entrypoint: drives the session loop and reports page updates
// through the logger. Presentation layers attach to the same App surface.

use anyhow::{Context, Result};
use tokio::sync::mpsc::unbounded_channel;

use aurascan::{
    app::App,
    config,
    poller::PollScheduler,
    source_ws,
    types::AppEvent,
    views::ResourceKind,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    let _ = dotenvy::dotenv();
    env_logger::init();

    let cfg = config::load().context("Failed to load configuration")?;
    log::info!("[main] api={} ws={}", cfg.api_url, cfg.ws_url);

    let (tx, mut rx) = unbounded_channel::<AppEvent>();

    let mut app = App::new(&cfg);
    app.load_all().await;
    report(&app);

    // Push channel task runs for the session lifetime, reconnecting forever.
    let ws_cfg = cfg.clone();
    let ws_tx = tx.clone();
    tokio::spawn(async move {
        source_ws::run_channel(ws_cfg, ws_tx).await;
    });

    let mut poller = PollScheduler::new(cfg.poll_interval_ms, tx.clone());
    poller.start();

    loop {
        tokio::select! {
            maybe_event = rx.recv() => {
                let Some(event) = maybe_event else { break };
                if matches!(event, AppEvent::Quit) {
                    break;
                }
                let was_tick = matches!(event, AppEvent::PollTick | AppEvent::FromWs(_));
                app.handle_event(event).await;
                if was_tick {
                    report(&app);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                log::info!("[main] shutting down");
                break;
            }
        }
    }

    poller.stop();
    Ok(())
}

fn report(app: &App) {
    let stats = &app.stats().data;
    let when = stats
        .latest_block_time
        .as_deref()
        .map(aurascan::models::format_when)
        .unwrap_or_else(|| "-".to_string());
    log::info!(
        "[main] channel={} height={:?} ({when}) blocks_page={} txs_page={} blocks={} txs={}",
        app.channel_state(),
        stats.latest_block,
        app.page(ResourceKind::Blocks),
        app.page(ResourceKind::Transactions),
        app.blocks().data.blocks.len(),
        app.transactions().data.transactions.len(),
    );
}
