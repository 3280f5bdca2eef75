#![forbid(unsafe_code)]

use contacts_core::{init_logging, ContactStore};
use contacts_server::{build_router, AppState, ServerConfig};
use log::{error, info};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        error!("event=server_stop module=server status=error reason={err}");
        eprintln!("contacts_server: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    init_logging(&config.log_level, config.log_dir.as_deref())?;

    let store = ContactStore::open(config.store.clone())?;
    let app = build_router(AppState::new(store, &config));

    let listener = TcpListener::bind(config.bind).await?;
    info!(
        "event=server_start module=server status=ok bind={} static_dir={} denylist={}",
        listener.local_addr()?,
        config.static_dir.display(),
        config.store.sanitize.denylist
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let (Ok(mut sigterm), Ok(mut sigint)) = (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) else {
            let _ = tokio::signal::ctrl_c().await;
            return;
        };
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
