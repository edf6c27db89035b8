use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use freightdesk::config::{Config, LogFormat};
use freightdesk::core::calendar::today_local;
use freightdesk::middleware::RequestId;
use freightdesk::{DemoStore, Repositories, Services};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "freightdesk=debug,actix_web=info".into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    init_tracing(config.app.log_format);

    tracing::info!("Starting freight desk back office");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    let repos = match (&config.database, config.app.demo_data) {
        (Some(database), false) => {
            let pool = database
                .create_pool()
                .await
                .context("Failed to create database pool")?;
            tracing::info!(
                "Database pool initialized ({}..{} connections)",
                database.pool_size,
                database.max_connections
            );

            if database.run_migrations {
                database.migrate(&pool).await.context("Failed to run migrations")?;
                tracing::info!("Database migrations applied");
            }

            Repositories::mysql(pool)
        }
        _ => {
            tracing::warn!("DEMO_DATA enabled; serving seeded in-memory data");
            Repositories::demo(DemoStore::seeded(today_local()))
        }
    };

    let services = Services::new(repos, &config.app);

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        let services = services.clone();
        App::new()
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .configure(|cfg| services.configure(cfg))
            .route("/", web::get().to(index))
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!(
        "Server started at http://{} ({} workers)",
        bind_address,
        config.server.workers
    );

    server.await?;
    Ok(())
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "service": "freightdesk",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}
