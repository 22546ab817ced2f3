use anyhow::Context;
use photo_gallery::bootstrap::{self, wire_dependencies};
use photo_gallery::PhotoGallery;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let config_path = bootstrap::default_config_path();
    let config = bootstrap::load_or_default(config_path.as_deref())?;
    bootstrap::tracing::init_tracing_subscriber(config.file_logging)
        .context("Failed to initialize tracing")?;

    let deps = wire_dependencies(&config).context("Failed to wire dependencies")?;
    let gallery = PhotoGallery::start(deps);
    info!(
        config = ?config_path,
        storage_root = %config.storage_root.display(),
        "Photo gallery started"
    );

    let mut session_rx = gallery.session().observe_session();
    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(err) = signal {
                    warn!(error = %err, "Failed to listen for ctrl-c");
                }
                break;
            }
            changed = session_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = session_rx.borrow_and_update().clone();
                match current {
                    Some(identity) => info!(user_id = %identity.id, name = %identity.display_name, "Session active"),
                    None => info!("No active session"),
                }
            }
        }
    }

    gallery.shutdown().await;
    info!("Photo gallery stopped");
    Ok(())
}
