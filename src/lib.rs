use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod payments;
pub mod query;
pub mod repository;

// Module for routing segregation (Public, Authenticated, Admin).
pub mod routes;
use auth::AuthUser;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

// Makes core state types easily accessible to the entry point and tests.
pub use config::AppConfig;
pub use error::ApiError;
pub use payments::{MockPaymentService, PaymentState, StripeClient};
pub use repository::{PostgresRepository, RepositoryState};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) for the API,
/// aggregating every handler decorated with `#[utoipa::path]` and every schema
/// used in request/response bodies. Served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::service_status, handlers::issue_token,
        handlers::create_user, handlers::list_users, handlers::get_user,
        handlers::check_admin, handlers::update_membership,
        handlers::list_users_admin, handlers::update_role,
        handlers::list_tags, handlers::create_tag,
        handlers::list_announcements, handlers::create_announcement,
        handlers::list_posts, handlers::posts_count, handlers::get_post,
        handlers::create_post, handlers::update_post_votes, handlers::delete_post,
        handlers::user_posts, handlers::user_posts_table,
        handlers::list_comments, handlers::create_comment, handlers::comment_count,
        handlers::reported_comments, handlers::report_comment,
        handlers::remove_report, handlers::delete_comment,
        handlers::create_payment_intent, handlers::statistics,
    ),
    components(
        schemas(
            models::User, models::Post, models::Comment, models::Tag,
            models::Announcement, models::CreateUserRequest,
            models::MembershipUpdate, models::RoleUpdate,
            models::CreatePostRequest, models::VoteUpdate,
            models::CreateCommentRequest, models::ReportRequest,
            models::CreateTagRequest, models::CreateAnnouncementRequest,
            models::TokenRequest, models::TokenResponse, models::AdminCheck,
            models::PostsCount, models::UserPosts, models::CommentCount,
            models::Statistics, models::PaymentIntentResponse,
            models::ServiceStatus,
        )
    ),
    tags(
        (name = "react-hub", description = "React Hub community forum API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe, immutable container holding all application
/// services and configuration, shared across every request.
#[derive(Clone)]
pub struct AppState {
    /// Repository layer: abstracts database access via the connection pool.
    pub repo: RepositoryState,
    /// Payment layer: abstracts the Stripe payment-intent API.
    pub payments: PaymentState,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These let extractors and handlers selectively pull components from the
// shared AppState, which is what makes the guards testable against mocks.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for PaymentState {
    fn from_ref(app_state: &AppState) -> PaymentState {
        app_state.payments.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Enforces authentication for the authenticated router tier. Extracting
/// `AuthUser` runs the token verification; on failure the request is rejected
/// with the verifier's `{"message"}` body before the handler executes.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the entire routing structure, applies global and scoped
/// middleware, and registers the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration — the API serves a browser frontend on another origin.
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public routes: no middleware applied.
        .merge(public::public_routes())
        // Authenticated routes: token verifier applied as a route layer.
        .merge(
            authenticated::authenticated_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        )
        // Admin routes: the full two-stage guard runs inside the `AdminUser`
        // extractor each handler takes, so no separate layer is needed.
        .merge(admin::admin_routes())
        // Apply the unified state to all routes.
        .with_state(state);

    // 3. Observability and correlation layers (applied outermost).
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID generation: a unique UUID per incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request tracing: wraps the request/response lifecycle in a
                // span carrying the generated request id.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID propagation back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS layer.
        .layer(cors)
}

/// trace_span_logger
///
/// Customizes the tracing span creation for `TraceLayer`: includes the
/// `x-request-id` header so every log line of a request is correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
