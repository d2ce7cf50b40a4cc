//! Chat server - HTTP front end for the session store

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::api::web::{self, AppState};
use crate::chat::SessionStore;
use crate::config::ChatConfig;
use crate::error::Result;

/// HTTP server exposing the chat pages and fragments
pub struct ChatServer {
    state: Arc<AppState>,
    addr: String,
}

impl ChatServer {
    /// Create a new chat server around an existing store
    pub fn new(config: &ChatConfig, store: Arc<SessionStore>) -> Self {
        let state = Arc::new(AppState {
            store,
            session: config.session.clone(),
        });

        Self {
            state,
            addr: config.server.listen_addr.clone(),
        }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(web::index))
            .route("/get-messages", get(web::get_messages))
            .route("/post-message", post(web::post_message))
            .route("/register-prompt", get(web::register_prompt))
            .route("/close-modal", get(web::close_modal))
            .route("/health", get(health))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the server and serve until Ctrl+C or SIGTERM
    pub async fn run(&self) -> Result<()> {
        let router = self.router();

        let listener = tokio::net::TcpListener::bind(self.addr.as_str()).await?;
        let local_addr = listener.local_addr()?;
        info!("Chat server listening on {}", local_addr);
        info!("Visit http://localhost:{} in your browser", local_addr.port());

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Chat server stopped");
        Ok(())
    }
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stats = state.store.stats().await;

    Json(serde_json::json!({
        "status": "healthy",
        "service": "chat-rs",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": stats.sessions,
        "messages": stats.messages,
    }))
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
