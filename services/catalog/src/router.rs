use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{MethodRouter, delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use cinelog_auth_types::gate::gate;
use cinelog_auth_types::policy::{Action, Resource, rule_for};
use cinelog_core::health::healthz;
use cinelog_core::middleware::{cors_layer, propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    film::{create_film, delete_film, get_film, list_films, update_film},
    readyz,
    review::{create_review, delete_review, get_review, list_reviews, update_review},
    user::{delete_user, get_user, list_users, login, register, update_user, verify_login},
    watchlist::{
        add_film, create_watchlist, delete_watchlist, get_watchlist, list_watchlists,
        remove_film, update_watchlist,
    },
};
use crate::state::AppState;

/// Guard one method of a route with the policy rule for `(resource, action)`.
fn guarded(
    state: &AppState,
    resource: Resource,
    action: Action,
    route: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    route.route_layer(from_fn_with_state(
        state.gate(rule_for(resource, action)),
        gate,
    ))
}

pub fn build_router(state: AppState) -> Router {
    use Action::*;
    use Resource::*;

    let s = &state;
    let cors = cors_layer(state.cors_origin.clone());
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Films
        .route(
            "/films",
            guarded(s, Film, List, get(list_films)).merge(guarded(s, Film, Create, post(create_film))),
        )
        .route(
            "/films/{id}",
            guarded(s, Film, Read, get(get_film))
                .merge(guarded(s, Film, Update, put(update_film)))
                .merge(guarded(s, Film, Delete, delete(delete_film))),
        )
        // Accounts
        .route("/users/register", guarded(s, User, Create, post(register)))
        .route("/users/login", guarded(s, Session, Create, post(login)))
        .route("/users/verify-login", guarded(s, Session, Create, post(verify_login)))
        .route("/users", guarded(s, User, List, get(list_users)))
        .route(
            "/users/{id}",
            guarded(s, User, Read, get(get_user))
                .merge(guarded(s, User, Update, put(update_user)))
                .merge(guarded(s, User, Delete, delete(delete_user))),
        )
        // Reviews
        .route(
            "/reviews",
            guarded(s, Review, List, get(list_reviews))
                .merge(guarded(s, Review, Create, post(create_review))),
        )
        .route(
            "/reviews/{id}",
            guarded(s, Review, Read, get(get_review))
                .merge(guarded(s, Review, Update, put(update_review)))
                .merge(guarded(s, Review, Delete, delete(delete_review))),
        )
        // Watchlists
        .route(
            "/watchlists",
            guarded(s, Watchlist, List, get(list_watchlists))
                .merge(guarded(s, Watchlist, Create, post(create_watchlist))),
        )
        .route(
            "/watchlists/{id}",
            guarded(s, Watchlist, Read, get(get_watchlist))
                .merge(guarded(s, Watchlist, Update, put(update_watchlist)))
                .merge(guarded(s, Watchlist, Delete, delete(delete_watchlist))),
        )
        .route(
            "/watchlists/{id}/films/add",
            guarded(s, Watchlist, Update, put(add_film)),
        )
        .route(
            "/watchlists/{id}/films/remove",
            guarded(s, Watchlist, Update, put(remove_film)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .layer(cors)
        .with_state(state)
}
