//! Wishgroup Server — the HTTP surface.
//!
//! Routes are assembled per resource family, each wrapped in the
//! capability gate for its permission pair. Handlers then walk the fixed
//! chain: parse the path id, load the resource, query live scope facts,
//! evaluate the pure policy, and only then mutate. Every failure funnels
//! through [`error::ApiError`] into the fixed response shape.

pub mod error;
pub mod gate;
pub mod provider;
pub mod routes;
pub mod scope;
pub mod state;
pub mod validate;

use axum::Router;
use axum::middleware;
use axum::routing::get;
use surrealdb::Connection;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::gate::{
    GROUP_PERMISSIONS, INVITATION_PERMISSIONS, USER_PERMISSIONS, WISHLIST_PERMISSIONS,
    capability_gate,
};
use crate::state::AppState;

/// Assemble the full application router.
pub fn create_router<C: Connection + Clone>(state: AppState<C>) -> Router {
    let auth_routes = Router::new().route("/federated", get(routes::auth::federated));

    let user_routes = Router::new()
        .route("/me", get(routes::users::me))
        .route_layer(middleware::from_fn_with_state(
            (state.clone(), USER_PERMISSIONS),
            capability_gate::<C>,
        ));

    let group_routes = Router::new()
        .route(
            "/",
            get(routes::groups::query).post(routes::groups::create),
        )
        .route(
            "/{uuid}",
            get(routes::groups::read)
                .put(routes::groups::replace)
                .patch(routes::groups::patch)
                .delete(routes::groups::remove),
        )
        .route_layer(middleware::from_fn_with_state(
            (state.clone(), GROUP_PERMISSIONS),
            capability_gate::<C>,
        ));

    let invitation_routes = Router::new()
        .route(
            "/",
            get(routes::invitations::query).post(routes::invitations::create),
        )
        .route(
            "/{uuid}",
            get(routes::invitations::read)
                .put(routes::invitations::replace)
                .patch(routes::invitations::patch)
                .delete(routes::invitations::remove),
        )
        .route_layer(middleware::from_fn_with_state(
            (state.clone(), INVITATION_PERMISSIONS),
            capability_gate::<C>,
        ));

    let wishlist_routes = Router::new()
        .route(
            "/",
            get(routes::wishlists::query).post(routes::wishlists::create),
        )
        .route(
            "/{uuid}",
            get(routes::wishlists::read)
                .put(routes::wishlists::replace)
                .patch(routes::wishlists::patch)
                .delete(routes::wishlists::remove),
        )
        .route_layer(middleware::from_fn_with_state(
            (state.clone(), WISHLIST_PERMISSIONS),
            capability_gate::<C>,
        ));

    Router::new()
        .route("/api", get(routes::health))
        .nest("/api/auth", auth_routes)
        .nest("/api/v1/users", user_routes)
        .nest("/api/v1/groups", group_routes)
        .nest("/api/v1/invitations", invitation_routes)
        .nest("/api/v1/wishlists", wishlist_routes)
        .fallback(routes::endpoint_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
