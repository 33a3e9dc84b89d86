use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use analytics_service::{
    config::Config,
    consumer::{self, ConsumerConfig},
    database::Database,
    handlers,
    service::AnalyticsService,
};
use dotenv::dotenv;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, Level};
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

    info!("Starting Analytics Service...");

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

    // Start NATS consumer for operation events
    let consumer_config = ConsumerConfig {
        durable_name: config.nats.durable_name.clone(),
        ack_wait: Duration::from_secs(config.nats.ack_wait_secs),
        max_deliver: config.nats.max_deliver,
    };
    if let Err(e) =
        consumer::start_operations_consumer(&config.nats.url, consumer_config, db.clone()).await
    {
        error!("Failed to start NATS consumer: {}", e);
        return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
    }

    info!("NATS consumer started successfully");

    // Initialize service
    let service = Arc::new(AnalyticsService::new(db));

    info!("Analytics service initialized successfully");

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
