use axum::{
    routing::{get, post},
    serve, Json, Router,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokoku_types::ports::region_directory::RegionDirectory;
use tokoku_types::ports::MarketStore;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::inbound::http::handlers::{
    auth, category, destination, product, region, toko, transaction, user,
};
use crate::inbound::http::state::AppState;

#[derive(Clone)]
pub struct HttpServerConfig {
    pub port: String,
}

pub struct HttpServer<R, D>
where
    R: MarketStore,
    D: RegionDirectory,
{
    pub state: AppState<R, D>,
    pub config: HttpServerConfig,
}

impl<R, D> HttpServer<R, D>
where
    R: MarketStore,
    D: RegionDirectory,
{
    pub async fn new(state: AppState<R, D>, config: HttpServerConfig) -> anyhow::Result<Self> {
        Ok(Self { state, config })
    }

    pub fn router(&self) -> Router {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http_request",
                    %request_id,
                    method = %request.method(),
                    uri
                )
            })
            .on_request(
                |request: &axum::extract::Request<_>, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        method = %request.method(),
                        uri = %request.uri(),
                        "request"
                    );
                },
            )
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        status = %response.status(),
                        latency_ms = %latency.as_millis(),
                        "response"
                    );
                },
            );

        let api = Router::new()
            .route("/auth/register", post(auth::register::<R, D>))
            .route("/auth/login", post(auth::login::<R, D>))
            .route(
                "/user/profile",
                get(user::get_profile::<R, D>).put(user::update_profile::<R, D>),
            )
            .route(
                "/user/alamat",
                get(destination::list::<R, D>).post(destination::create::<R, D>),
            )
            .route(
                "/user/alamat/{id}",
                get(destination::get::<R, D>)
                    .put(destination::update::<R, D>)
                    .delete(destination::delete::<R, D>),
            )
            .route("/toko", get(toko::list_all::<R, D>))
            .route("/toko/my", get(toko::list_mine::<R, D>))
            .route(
                "/toko/{id}",
                get(toko::get::<R, D>).put(toko::update::<R, D>),
            )
            .route(
                "/category",
                get(category::list::<R, D>).post(category::create::<R, D>),
            )
            .route(
                "/category/{id}",
                get(category::get::<R, D>)
                    .put(category::update::<R, D>)
                    .delete(category::delete::<R, D>),
            )
            .route(
                "/product",
                get(product::list::<R, D>).post(product::create::<R, D>),
            )
            .route(
                "/product/{id}",
                get(product::get::<R, D>)
                    .put(product::update::<R, D>)
                    .delete(product::delete::<R, D>),
            )
            .route(
                "/trx",
                get(transaction::list::<R, D>).post(transaction::create::<R, D>),
            )
            .route("/trx/{id}", get(transaction::get::<R, D>))
            .route(
                "/provcity/listprovincies",
                get(region::list_provinces::<R, D>),
            )
            .route(
                "/provcity/detailprovince/{province_id}",
                get(region::province_detail::<R, D>),
            )
            .route(
                "/provcity/listcities/{province_id}",
                get(region::list_cities::<R, D>),
            )
            .route(
                "/provcity/detailcity/{province_id}/cities/{city_id}",
                get(region::city_detail::<R, D>),
            );

        Router::new()
            .route("/health", get(health))
            .nest("/api/v1", api)
            .layer(trace_layer)
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let app = self.router();
        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

async fn health() -> (axum::http::StatusCode, Json<serde_json::Value>) {
    (
        axum::http::StatusCode::OK,
        Json(serde_json::json!({ "status": "ok" })),
    )
}
