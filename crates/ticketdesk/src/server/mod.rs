//! HTTP facade over the record store.
//!
//! Three routes map one-to-one onto store operations:
//!
//! | Route               | Store operation     |
//! |---------------------|---------------------|
//! | `GET /api/users`    | `list_records`      |
//! | `GET /api/devices`  | `list_devices`      |
//! | `POST /api/users`   | `replace_records`   |
//!
//! Uploads are full replaces: the body is the complete collection.

mod error;
mod routes;
mod state;

use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::store::RecordStore;

pub use error::ApiError;
pub use routes::SAVED_MESSAGE;
pub use state::AppState;

use routes::{list_devices_handler, list_records_handler, replace_records_handler};

/// Build the application router.
pub fn router(state: AppState, cors_max_age: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(cors_max_age);

    Router::new()
        .route(
            "/api/users",
            get(list_records_handler).post(replace_records_handler),
        )
        .route("/api/devices", get(list_devices_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(config: &Config, store: Box<dyn RecordStore>) -> Result<()> {
    let state = AppState::new(store, config.server.require_fields);
    let app = router(state, config.cors_max_age());

    let address = config.bind_address();
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| Error::Bind {
            address: address.clone(),
            source,
        })?;
    info!("Server running on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
