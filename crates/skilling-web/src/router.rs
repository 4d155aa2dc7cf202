//! Axum router wiring.
//!
//! Page routes sit behind `auth::authenticate`; `/manage-graph` additionally
//! requires the admin policy. `/healthz` is outside both.

use axum::{middleware, routing::get, Router};

use crate::{app_state::AppState, auth, ops, pages};

pub fn build_router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/manage-graph", get(pages::manage_graph))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::gate::require_admin,
        ));

    Router::new()
        .route("/", get(pages::index))
        .route("/debug", get(pages::debug))
        .route(pages::account::SIGN_IN_PATH, get(pages::account::sign_in))
        .route("/account/sign-out", get(pages::account::sign_out))
        .merge(admin)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::authenticate,
        ))
        .route("/healthz", get(ops::healthz))
        .with_state(state)
}
