use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Core Application Schemas (Mapped to Database) ---

/// User
///
/// Canonical identity record from the `users` table, keyed by email. The email
/// is the unique handle the whole API authorizes against; there is no separate
/// numeric identity. `role` is the RBAC field ("admin" or absent), `badge` and
/// `payment_id` track the membership upgrade flow.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    // "admin" grants access to the admin tier; anything else (or NULL) does not.
    pub role: Option<String>,
    pub badge: Option<String>,
    pub payment_id: Option<String>,
}

/// Post
///
/// A forum post from the `posts` table. `popularity` is never stored: it is
/// derived as `up_vote_count - down_vote_count` at query time by the ranked
/// listing.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Post {
    pub id: Uuid,
    // Author email (FK to users.email by convention, not enforced).
    pub email: String,
    pub author_name: Option<String>,
    pub author_image: Option<String>,
    pub title: String,
    pub description: String,
    // Single tag label; the search filter equality-matches this field.
    pub tags: Option<String>,
    pub up_vote_count: i64,
    pub down_vote_count: i64,
    #[ts(type = "string")]
    pub time: DateTime<Utc>,
}

/// Comment
///
/// A comment from the `comments` table. A non-NULL `report` marks the comment
/// as reported and pending moderator action; clearing the field returns it to
/// a state indistinguishable from never-reported.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Option<Uuid>,
    pub post_title: Option<String>,
    // Commenter email.
    pub email: String,
    pub comment: String,
    // Report reason; presence marks the comment "reported".
    pub report: Option<String>,
    pub reported_by: Option<String>,
    #[ts(type = "string")]
    pub time: DateTime<Utc>,
}

/// Tag
///
/// A label usable as a post filter. Admin-created, globally readable.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}

/// Announcement
///
/// Admin-authored site announcement, listed newest-first.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub author_name: Option<String>,
    pub author_image: Option<String>,
    #[ts(type = "string")]
    pub time: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// CreateUserRequest
///
/// Input for the idempotent registration endpoint (POST /users). The role is
/// never client-settable; promotion happens through the admin tier.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub badge: Option<String>,
}

/// MembershipUpdate
///
/// Partial payload for PUT /user/role/{email}: records the badge and payment
/// id after a successful membership payment. Merged partially, upserting.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MembershipUpdate {
    pub badge: Option<String>,
    pub payment_id: Option<String>,
}

/// RoleUpdate
///
/// Admin payload for PUT /user/updaterole/{email} (e.g. promote to "admin").
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RoleUpdate {
    pub role: String,
}

/// CreatePostRequest
///
/// Input for POST /posts. The author email is taken from the authenticated
/// identity, never from the body.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreatePostRequest {
    pub title: String,
    pub description: String,
    pub tags: Option<String>,
    pub author_name: Option<String>,
    pub author_image: Option<String>,
}

/// VoteUpdate
///
/// Payload for PUT /posts/{id}: the client sends the full new counters and the
/// update replaces both counters wholesale. Last write wins under concurrency.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VoteUpdate {
    pub up_vote_count: i64,
    pub down_vote_count: i64,
}

/// CreateCommentRequest
///
/// Input for POST /comments. The commenter email comes from the token.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateCommentRequest {
    pub post_id: Option<Uuid>,
    pub post_title: Option<String>,
    pub comment: String,
}

/// ReportRequest
///
/// Payload for PUT /comments/report/{id}: sets the report reason and reporter.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReportRequest {
    pub report: String,
    pub reported_by: Option<String>,
}

/// CreateTagRequest
///
/// Admin payload for POST /tags.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateTagRequest {
    pub name: String,
}

/// CreateAnnouncementRequest
///
/// Admin payload for POST /announcements.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub description: String,
    pub author_name: Option<String>,
    pub author_image: Option<String>,
}

/// TokenRequest
///
/// Input for POST /jwt: the identity the access token is issued for.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TokenRequest {
    pub email: String,
}

// --- Response Schemas (Output) ---

/// TokenResponse
///
/// Output of POST /jwt.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TokenResponse {
    pub token: String,
}

/// AdminCheck
///
/// Output of GET /user/admin/{email}. An absent user is reported as `false`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AdminCheck {
    pub admin: bool,
}

/// PostsCount
///
/// Output of GET /posts-count, used by the frontend to size pagination.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PostsCount {
    pub posts_count: i64,
}

/// UserPosts
///
/// Output of the own-posts routes: the author's posts plus their total count.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserPosts {
    pub user_created_posts: Vec<Post>,
    pub total_post_by_user: i64,
}

/// CommentCount
///
/// Output of GET /comments/{email}.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CommentCount {
    pub total_user_comments: i64,
}

/// Statistics
///
/// Output of GET /statistics. Each counter is an independent read; the numbers
/// are not a consistent snapshot under concurrent writes.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Statistics {
    pub total_users: i64,
    pub total_posts: i64,
    pub total_comments: i64,
    pub reported_comments_count: i64,
    pub total_post_by_user: i64,
}

/// PaymentIntentResponse
///
/// Output of GET /create-payment-intent: the client secret the frontend hands
/// to Stripe.js to confirm the payment.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

/// ServiceStatus
///
/// Output of the root status route.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ServiceStatus {
    pub status: String,
}
