//! Defines how requests are routed to response handlers and which routes
//! require a valid bearer token.

use axum::{
    Json, Router,
    extract::FromRef,
    http::StatusCode,
    middleware,
    routing::{get, post},
};
use serde_json::json;

use crate::{
    app_state::{AppState, TokenState},
    auth::{auth_guard, log_in, register_user},
    endpoints,
    stores::{TransactionStore, UserStore},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_summary_endpoint,
        get_transaction_endpoint, get_transactions_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router<T, U>(state: AppState<T, U>) -> Router
where
    T: TransactionStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
{
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index))
        .route(endpoints::REGISTER, post(register_user::<U>))
        .route(endpoints::LOG_IN, post(log_in::<U>));

    let protected_routes = Router::new()
        .route(endpoints::SUMMARY, get(get_summary_endpoint::<T>))
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint::<T>).post(create_transaction_endpoint::<T>),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint::<T>)
                .put(update_transaction_endpoint::<T>)
                .delete(delete_transaction_endpoint::<T>),
        )
        .layer(middleware::from_fn_with_state(
            TokenState::from_ref(&state),
            auth_guard,
        ));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Liveness check for the API root.
async fn get_index() -> Json<serde_json::Value> {
    Json(json!({ "message": "API is running" }))
}

async fn get_404_not_found() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Not found" })))
}
