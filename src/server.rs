//! HTTP server lifecycle: startup, serving and graceful shutdown

use tokio::net::TcpListener;
use tokio::signal;

use crate::config::Settings;
use crate::db::{establish_async_connection_pool, run_pending_migrations};
use crate::state::AppState;
use crate::web::routes::create_router;

pub struct Server {
    settings: Settings,
}

impl Server {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Connect to the database, optionally migrate, then serve until
    /// Ctrl+C or SIGTERM.
    ///
    /// # Errors
    /// - The database cannot be reached or migrations fail
    /// - The listen address cannot be bound
    pub async fn run(self) -> anyhow::Result<()> {
        let settings = &self.settings;

        tracing::info!(
            app_name = %settings.application.name,
            app_version = %settings.application.version,
            "Application starting"
        );
        tracing::info!(
            host = %settings.server.host,
            port = settings.server.port,
            base_path = %settings.web.base_path,
            user_list = ?settings.web.user_list,
            debug = settings.web.debug,
            "Server configuration loaded"
        );
        tracing::info!(
            max_connections = settings.database.max_connections,
            min_connections = settings.database.min_connections,
            connection_timeout = settings.database.connection_timeout,
            auto_migrate = settings.database.auto_migrate,
            "Database configuration loaded"
        );

        let pool = establish_async_connection_pool(&settings.database)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Database connection failed");
                anyhow::anyhow!("Database connection failed: {}", e)
            })?;

        if settings.database.auto_migrate {
            let applied = run_pending_migrations(settings.database.connection_url()).await?;
            tracing::info!(count = applied.len(), migrations = ?applied, "Migrations applied");
        }

        let state = AppState::new(pool, settings.web.clone());
        let router = create_router(state);

        let address = settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Resolves on Ctrl+C or SIGTERM.
///
/// A handler that cannot be installed is logged and never fires; the other
/// one still does.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
