use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post, put},
};

/// Admin Router Module
///
/// Routes restricted to users with `role = "admin"`. Every handler here takes
/// the `AdminUser` extractor, which runs the full two-stage guard (token
/// verification, then the repository role lookup) before any handler logic
/// executes. A missing user record counts as not-admin, never as an error.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /users/admin/{email}?page=
        // Paged user listing for the admin dashboard, ten per page.
        .route("/users/admin/{email}", get(handlers::list_users_admin))
        // PUT /user/updaterole/{email}
        // Role change, e.g. promoting a member to admin.
        .route("/user/updaterole/{email}", put(handlers::update_role))
        // POST /tags
        // Tags are admin-curated; the read side is public.
        .route("/tags", post(handlers::create_tag))
        // POST /announcements
        .route("/announcements", post(handlers::create_announcement))
        // GET /comments/status/reported?page=
        // The moderation queue, ten reported comments per page.
        .route(
            "/comments/status/reported",
            get(handlers::reported_comments),
        )
}
