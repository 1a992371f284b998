use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth::require_session;
use super::handlers;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Public routes — no session required
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    // Everything under /api requires a valid session
    let protected = Router::new()
        // Balance engine
        .route(
            "/api/balance",
            get(handlers::balance::get)
                .post(handlers::balance::create)
                .put(handlers::balance::set)
                .delete(handlers::balance::remove),
        )
        .route("/api/balance/current", get(handlers::balance::current))
        .route("/api/balance/exists", get(handlers::balance::exists))
        .route("/api/balance/init", post(handlers::balance::init))
        // Journal
        .route("/api/trades", get(handlers::trades::list).post(handlers::trades::create))
        .route("/api/trades/:id", delete(handlers::trades::remove))
        .route("/api/trades/:id/close", post(handlers::trades::close))
        // Subscription
        .route("/api/subscription", get(handlers::subscription::detail))
        .route("/api/subscription/cancel", post(handlers::subscription::cancel))
        // Admin
        .route("/api/admin/subscriptions/grant", post(handlers::admin::grant_subscription))
        .route("/api/admin/users", get(handlers::admin::list_users))
        // Analytics (premium)
        .route("/api/analytics/pnl-history", get(handlers::analytics::pnl_history))
        .route("/api/analytics/performance", get(handlers::analytics::performance))
        // Preference stores
        .route(
            "/api/prefs/:store",
            get(handlers::prefs::get_store).put(handlers::prefs::put_store),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_session));

    // CORS: the desktop shell and the web dashboard hit this API directly
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
