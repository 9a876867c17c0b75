use std::net::SocketAddr;

use axum::{http::HeaderValue, middleware, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::{
    auth,
    goals::Goal,
    graphql,
    meals::Meal,
    relations,
    resource::{self, Entity},
    state::AppState,
    trainers::Trainer,
    users::User,
    weather,
    workouts::Workout,
};

pub fn build_app(state: AppState) -> Router {
    let mut protected = Router::new()
        .nest(User::PATH, resource::router::<User>())
        .nest(Workout::PATH, resource::router::<Workout>())
        .nest(Meal::PATH, resource::router::<Meal>())
        .nest(Goal::PATH, resource::router::<Goal>())
        .nest(Trainer::PATH, resource::router::<Trainer>())
        .merge(relations::router())
        .merge(graphql::router());
    if state.config.require_auth {
        protected = protected.route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));
    }

    Router::new()
        .route("/", get(|| async { "FitFusion API is running!" }))
        .route("/health", get(|| async { "Healthy!" }))
        .merge(auth::router())
        .merge(weather::router())
        .merge(graphql::explorer())
        .merge(protected)
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

/// Empty list or `*` allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring malformed CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub async fn serve(app: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
