use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    middleware as axum_middleware,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    auth::GoogleOAuth,
    cache::Cache,
    config::Config,
    db::{PgListRepository, PgRatingRepository, PgUserRepository, UserRepository},
    middleware::{make_span_with_request_id, request_id_middleware, require_auth},
    services::{providers::TmdbProvider, CatalogService, ListService, RatingService},
};

pub mod auth;
pub mod catalog;
pub mod lists;
pub mod ratings;

/// How often the cache sweep evicts expired entries
const CACHE_SWEEP_PERIOD: Duration = Duration::from_secs(10 * 60);

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: Arc<dyn UserRepository>,
    pub lists: ListService,
    pub ratings: RatingService,
    pub catalog: CatalogService,
    pub google: Option<Arc<GoogleOAuth>>,
}

impl AppState {
    /// Wires the production dependencies: Postgres repositories, the TMDB
    /// provider behind the TTL cache (sweeper included), and Google OAuth
    /// when configured.
    pub fn new(config: Config, pool: PgPool) -> Self {
        let cache = Cache::new();
        cache.start_sweeper(CACHE_SWEEP_PERIOD);

        let provider = Arc::new(TmdbProvider::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
        ));
        let catalog = CatalogService::new(provider, cache);

        let lists = ListService::new(Arc::new(PgListRepository::new(pool.clone())));
        let ratings = RatingService::new(
            Arc::new(PgRatingRepository::new(pool.clone())),
            lists.clone(),
        );
        let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool));

        let google = GoogleOAuth::from_config(&config).map(Arc::new);

        Self {
            config: Arc::new(config),
            users,
            lists,
            ratings,
            catalog,
            google,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes(&state))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(cors),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/google", get(auth::google_redirect))
        .route("/auth/google/callback", get(auth::google_callback))
        .route("/catalog/featured", get(catalog::featured))
        .route("/catalog/genres", get(catalog::genres))
        .route("/catalog/trending", get(catalog::trending))
        .route("/catalog/search", get(catalog::search))
        .route("/catalog/movies", get(catalog::movies))
        .route("/catalog/movies/:id", get(catalog::movie_details))
        .route("/catalog/movies/:id/credits", get(catalog::movie_credits))
        .route("/catalog/tv", get(catalog::tv))
        .route("/catalog/tv/:id", get(catalog::tv_details));

    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/lists", get(lists::all).post(lists::create))
        .route("/lists/type/:list_type", get(lists::by_type))
        .route(
            "/lists/:id",
            get(lists::one).patch(lists::rename).delete(lists::remove),
        )
        .route("/lists/:id/movies", post(lists::add_movie))
        .route("/lists/:id/movies/:movie_id", delete(lists::remove_movie))
        .route("/ratings", post(ratings::rate).get(ratings::all))
        .route(
            "/ratings/:movie_id",
            get(ratings::one).delete(ratings::remove),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    public.merge(protected)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    match HeaderValue::from_str(&config.frontend_url) {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            tracing::warn!(
                origin = %config.frontend_url,
                "Invalid CORS origin, cross-origin requests disabled"
            );
            layer
        }
    }
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Uniform success envelope
pub fn success<T: Serialize>(data: T) -> Json<Value> {
    Json(json!({ "status": "success", "data": data }))
}
