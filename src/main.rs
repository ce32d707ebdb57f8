use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware, error};
use pharma_garde::config::{LoggingSettings, Settings};
use pharma_garde::core::LocalClock;
use pharma_garde::models::ErrorResponse;
use pharma_garde::routes::{self, pharmacies::AppState};
use pharma_garde::services::{DatasetCache, FixedGeocoder, PharmacyLoader};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ErrorResponse::bad_request("invalid_json", format!("Invalid JSON: {}", err)).into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Query payload error on {}: {}", req.path(), err);
    ErrorResponse::bad_request("invalid_query", format!("Invalid query: {}", err)).into()
}

/// Initialize logging from settings; `RUST_LOG` overrides the configured level
fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match logging.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "json" => subscriber.json().init(),
        _ => subscriber.init(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration; PHARMA_CONFIG points at an explicit file
    let settings = match std::env::var("PHARMA_CONFIG") {
        Ok(path) => Settings::load_from(path),
        Err(_) => Settings::load(),
    }
    .map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("Configuration error: {}", e))
    })?;

    init_logging(&settings.logging);

    info!("Starting pharmacy service...");
    info!("Configuration loaded successfully");

    // Load the data set up front so the first request does not pay for it
    let source = settings.data.source();
    let dataset = Arc::new(DatasetCache::new(
        PharmacyLoader::new(source.clone()),
        settings.cache.ttl_secs,
    ));
    let pharmacies = dataset.get_or_load().await;

    info!(
        "{} pharmacies available from {:?} (cache TTL: {}s)",
        pharmacies.len(),
        source,
        settings.cache.ttl_secs
    );

    let map = settings.map;
    let geocoder = Arc::new(FixedGeocoder::new(map.default_center()));

    // Build application state
    let app_state = AppState {
        dataset,
        geocoder,
        clock: Arc::new(LocalClock),
        map,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
