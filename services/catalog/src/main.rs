use sea_orm::Database;
use tracing::info;

use cinelog_auth_types::token::TokenCodec;
use cinelog_catalog::config::CatalogConfig;
use cinelog_catalog::router::build_router;
use cinelog_catalog::state::AppState;
use cinelog_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = CatalogConfig::from_env().expect("invalid configuration");

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        tokens: TokenCodec::new(&config.jwt_secret, config.token_ttl()),
        otp_ttl: config.otp_ttl(),
        cors_origin: config.cors_origin.clone(),
    };

    let router = build_router(state);
    let http_addr = format!("0.0.0.0:{}", config.catalog_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("catalog service listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}
