// server.rs - Router assembly and the HTTP listener

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{admin, protected, public};
use crate::middleware::authenticate;
use crate::state::AppState;

/// Full application router with state applied
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);

    let router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Everything under /api passes through the authentication gate
        .merge(api_routes(state.clone()))
        .with_state(state);

    let router = match cors {
        Some(layer) => router.layer(layer),
        None => router,
    };
    router.layer(TraceLayer::new_for_http())
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/me", get(protected::me))
        .merge(log_routes())
        .merge(admin_routes())
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}

fn log_routes() -> Router<AppState> {
    use protected::{assignments, logs};

    Router::new()
        .route("/api/logs/list", get(logs::logs_list))
        .route("/api/logs/save", post(logs::logs_save))
        .route("/api/assignments/my-clients", get(assignments::my_clients))
}

fn admin_routes() -> Router<AppState> {
    use admin::{assignments, caregivers, clients, users};

    Router::new()
        // Caregiver roster
        .route("/api/admin/caregivers/list", get(caregivers::caregivers_list))
        .route("/api/admin/caregivers/invite", post(caregivers::caregivers_invite))
        .route("/api/admin/caregivers/update", patch(caregivers::caregivers_update))
        // Clients
        .route("/api/admin/clients/list", get(clients::clients_list))
        .route("/api/admin/clients/create", post(clients::clients_create))
        .route("/api/admin/clients/update", patch(clients::clients_update))
        // Admin accounts
        .route("/api/admin/users/list", get(users::users_list))
        .route("/api/admin/users/create", post(users::users_create))
        .route("/api/admin/users/update", patch(users::users_update))
        .route("/api/admin/users/reset-password", post(users::users_reset_password))
        // Assignments
        .route("/api/admin/assignments/list", get(assignments::assignments_list))
        .route("/api/admin/assignments/set", post(assignments::assignments_set))
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if security.cors_origins.iter().any(|origin| origin == "*") {
        return Some(layer.allow_origin(Any));
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();
    Some(layer.allow_origin(AllowOrigin::list(origins)))
}

/// Bind `0.0.0.0:<port>` and serve until the process is stopped
pub async fn serve(state: AppState, port: u16) -> std::io::Result<()> {
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("CareFull API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await
}
