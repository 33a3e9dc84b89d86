use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use ledger_service::{
    config::Config, database::Database, events::EventPublisher, handlers,
    services::TransferService,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize tracing
    let _subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(false)
        .json()
        .init();

    info!("Starting Ledger Service...");

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    config.validate().expect("Invalid configuration");

    info!("Configuration loaded successfully");

    // Initialize database
    let db = Arc::new(
        Database::new(&config.database.url, config.database.max_connections)
            .await
            .expect("Failed to connect to database"),
    );

    info!("Database connected successfully");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(db.pool())
        .await
        .expect("Failed to run database migrations");

    info!("Database migrations applied");

    // Initialize event publisher
    let publisher = Arc::new(
        EventPublisher::connect(
            &config.nats.url,
            Duration::from_secs(config.nats.publish_timeout_secs),
        )
        .await
        .expect("Failed to connect to NATS"),
    );

    info!("Event publisher initialized successfully");

    // Initialize service
    let service = Arc::new(TransferService::new(db, publisher));

    info!("Transfer service initialized successfully");

    // Start HTTP server
    let server_config = config.server.clone();
    let service_data = web::Data::new(service);

    info!(
        "Starting HTTP server on {}:{}",
        server_config.host, server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(service_data.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(handlers::configure_routes)
    })
    .workers(server_config.workers)
    .bind((server_config.host, server_config.port))?
    .run()
    .await
}
