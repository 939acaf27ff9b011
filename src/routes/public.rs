use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Public Router Module
///
/// Endpoints that are **unauthenticated** and accessible to any client. This
/// covers the read-only forum surface (posts, tags, announcements, comments),
/// registration, token issuance, and the comment-report toggle.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // Service status probe for monitors and the deployment platform.
        .route("/", get(handlers::service_status))
        // POST /jwt
        // Issues the access token the frontend sends on every guarded request.
        .route("/jwt", post(handlers::issue_token))
        // POST /users — idempotent registration.
        // GET /users — all users, unpaged.
        .route("/users", get(handlers::list_users).post(handlers::create_user))
        // GET /tags
        // Tag labels for the post filter sidebar.
        .route("/tags", get(handlers::list_tags))
        // GET /announcements
        // Site announcements, newest first.
        .route("/announcements", get(handlers::list_announcements))
        // GET /posts?page=&sort=&search=
        // The composed listing: tag search, popularity ranking, or newest-first.
        .route("/posts", get(handlers::list_posts))
        // GET /posts-count
        .route("/posts-count", get(handlers::posts_count))
        // GET /posts/{id}
        .route("/posts/{id}", get(handlers::get_post))
        // GET /comments
        .route("/comments", get(handlers::list_comments))
        // GET /comments/{email}
        // Per-user comment count.
        .route("/comments/{email}", get(handlers::comment_count))
        // PUT /comments/report/{id} — set the report annotation.
        .route("/comments/report/{id}", put(handlers::report_comment))
        // PUT /comments/report/remove/{id} — dismiss the report.
        .route(
            "/comments/report/remove/{id}",
            put(handlers::remove_report),
        )
        // DELETE /comments/delete/{id}
        .route("/comments/delete/{id}", delete(handlers::delete_comment))
}
