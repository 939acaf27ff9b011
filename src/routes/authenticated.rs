use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Authenticated Router Module
///
/// Routes for any caller with a valid access token. The token-verification
/// layer is applied above this module in `create_router`, so every handler
/// here receives a resolved `AuthUser`. The `/:email` routes additionally
/// enforce the self-scope guard: the path email must equal the token email.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /user/{email}
        // The caller's own profile document. Self-scope guarded.
        .route("/user/{email}", get(handlers::get_user))
        // GET /user/admin/{email}
        // Admin flag for the caller; an absent user record reads as false.
        .route("/user/admin/{email}", get(handlers::check_admin))
        // PUT /user/role/{email}
        // Membership upgrade: badge + payment id, merged with upsert.
        .route("/user/role/{email}", put(handlers::update_membership))
        // --- Posts ---
        // POST /posts — submit a post; the author email comes from the token.
        .route("/posts", post(handlers::create_post))
        // PUT/DELETE /posts/{id}
        // Vote-count update (last write wins) and deletion (no cascade).
        .route(
            "/posts/{id}",
            put(handlers::update_post_votes).delete(handlers::delete_post),
        )
        // GET /posts/user/{email}
        // The caller's posts, newest first, with the total count.
        .route("/posts/user/{email}", get(handlers::user_posts))
        // GET /posts/user/table/{email}?page=
        // Paged variant for the profile table view.
        .route("/posts/user/table/{email}", get(handlers::user_posts_table))
        // POST /comments
        .route("/comments", post(handlers::create_comment))
        // GET /create-payment-intent
        // Card payment intent for the fixed membership price.
        .route(
            "/create-payment-intent",
            get(handlers::create_payment_intent),
        )
        // GET /statistics
        // Dashboard counters; per-user count scoped to the token identity.
        .route("/statistics", get(handlers::statistics))
}
