use crate::{
    AppState,
    auth::{self, AdminUser, AuthUser},
    error::ApiError,
    models::{
        AdminCheck, Announcement, Comment, CommentCount, CreateAnnouncementRequest,
        CreateCommentRequest, CreatePostRequest, CreateTagRequest, CreateUserRequest,
        MembershipUpdate, PaymentIntentResponse, Post, PostsCount, ReportRequest, RoleUpdate,
        ServiceStatus, Statistics, Tag, TokenRequest, TokenResponse, User, UserPosts, VoteUpdate,
    },
    query::{
        PageParams, PostListParams, PostListPlan, REPORTED_COMMENTS_PAGE_SIZE,
        USER_POSTS_PAGE_SIZE, USERS_PAGE_SIZE,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;

// --- Service Status & Token Issuance ---

/// service_status
///
/// [Public Route] Liveness probe for monitors and load balancers.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service status", body = ServiceStatus))
)]
pub async fn service_status() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        status: "React Hub is running".to_string(),
    })
}

/// issue_token
///
/// [Public Route] Issues an access token for the given email. The frontend
/// calls this after its own login flow completes and stores the token for the
/// Authorization header.
#[utoipa::path(
    post,
    path = "/jwt",
    request_body = TokenRequest,
    responses((status = 200, description = "Signed access token", body = TokenResponse))
)]
pub async fn issue_token(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = auth::issue_token(&payload.email, &state.config.jwt_secret)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(TokenResponse { token }))
}

// --- Users ---

/// create_user
///
/// [Public Route] Idempotent registration: a second create with the same email
/// reports "User already exists" and stores nothing. This is a
/// check-then-insert, never an overwrite.
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "Created", body = User),
        (status = 409, description = "User already exists")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Response, ApiError> {
    if state.repo.find_user(&payload.email).await?.is_some() {
        let body = Json(json!({ "message": "User already exists" }));
        return Ok((StatusCode::CONFLICT, body).into_response());
    }

    let user = state
        .repo
        .insert_user(User {
            email: payload.email,
            name: payload.name,
            image: payload.image,
            role: None,
            badge: payload.badge,
            payment_id: None,
        })
        .await?;
    Ok(Json(user).into_response())
}

/// list_users
///
/// [Public Route] All registered users, unpaged.
#[utoipa::path(
    get,
    path = "/users",
    responses((status = 200, description = "All users", body = [User]))
)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.repo.list_all_users().await?))
}

/// get_user
///
/// [Authenticated Route] The caller's own user document. The path email must
/// match the token email.
#[utoipa::path(
    get,
    path = "/user/{email}",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "User document", body = User),
        (status = 401, description = "Path email does not match token"),
        (status = 404, description = "No such user")
    )
)]
pub async fn get_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<User>, ApiError> {
    auth.require_self(&email)?;
    let user = state.repo.find_user(&email).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(user))
}

/// check_admin
///
/// [Authenticated Route] Reports whether the caller holds the admin role. An
/// absent user document reads as `false`; this route never errors on a missing
/// user.
#[utoipa::path(
    get,
    path = "/user/admin/{email}",
    params(("email" = String, Path, description = "User email")),
    responses((status = 200, description = "Admin flag", body = AdminCheck))
)]
pub async fn check_admin(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<AdminCheck>, ApiError> {
    auth.require_self(&email)?;
    let admin = state
        .repo
        .find_user(&email)
        .await?
        .and_then(|u| u.role)
        .map(|role| role == "admin")
        .unwrap_or(false);
    Ok(Json(AdminCheck { admin }))
}

/// update_membership
///
/// [Authenticated Route] Records the badge and payment id after a successful
/// membership payment. A partial merge with upsert semantics.
#[utoipa::path(
    put,
    path = "/user/role/{email}",
    params(("email" = String, Path, description = "User email")),
    request_body = MembershipUpdate,
    responses((status = 200, description = "Updated user", body = User))
)]
pub async fn update_membership(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(payload): Json<MembershipUpdate>,
) -> Result<Json<User>, ApiError> {
    auth.require_self(&email)?;
    let user = state
        .repo
        .update_membership(&email, payload.badge, payload.payment_id)
        .await?;
    Ok(Json(user))
}

/// list_users_admin
///
/// [Admin Route] Paged user listing for the admin dashboard, ten per page.
#[utoipa::path(
    get,
    path = "/users/admin/{email}",
    params(("email" = String, Path, description = "Admin email"), PageParams),
    responses((status = 200, description = "Users page", body = [User]))
)]
pub async fn list_users_admin(
    admin: AdminUser,
    State(state): State<AppState>,
    Path(email): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<User>>, ApiError> {
    admin.require_self(&email)?;
    let page = params.resolve(USERS_PAGE_SIZE);
    Ok(Json(state.repo.list_users(page).await?))
}

/// update_role
///
/// [Admin Route] Changes a user's role (e.g. promotes to "admin"). Upserts so
/// a role can be staged for an email that has not registered yet.
#[utoipa::path(
    put,
    path = "/user/updaterole/{email}",
    params(("email" = String, Path, description = "Target user email")),
    request_body = RoleUpdate,
    responses((status = 200, description = "Updated user", body = User))
)]
pub async fn update_role(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(payload): Json<RoleUpdate>,
) -> Result<Json<User>, ApiError> {
    let user = state.repo.update_role(&email, &payload.role).await?;
    Ok(Json(user))
}

// --- Tags ---

/// list_tags
///
/// [Public Route] All tag labels, used by the frontend for post filtering.
#[utoipa::path(
    get,
    path = "/tags",
    responses((status = 200, description = "All tags", body = [Tag]))
)]
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
    Ok(Json(state.repo.list_tags().await?))
}

/// create_tag
///
/// [Admin Route] Adds a new tag label.
#[utoipa::path(
    post,
    path = "/tags",
    request_body = CreateTagRequest,
    responses((status = 200, description = "Created tag", body = Tag))
)]
pub async fn create_tag(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateTagRequest>,
) -> Result<Json<Tag>, ApiError> {
    Ok(Json(state.repo.create_tag(payload).await?))
}

// --- Announcements ---

/// list_announcements
///
/// [Public Route] All announcements, newest first.
#[utoipa::path(
    get,
    path = "/announcements",
    responses((status = 200, description = "Announcements", body = [Announcement]))
)]
pub async fn list_announcements(
    State(state): State<AppState>,
) -> Result<Json<Vec<Announcement>>, ApiError> {
    Ok(Json(state.repo.list_announcements().await?))
}

/// create_announcement
///
/// [Admin Route] Publishes a new announcement.
#[utoipa::path(
    post,
    path = "/announcements",
    request_body = CreateAnnouncementRequest,
    responses((status = 200, description = "Created announcement", body = Announcement))
)]
pub async fn create_announcement(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateAnnouncementRequest>,
) -> Result<Json<Announcement>, ApiError> {
    Ok(Json(state.repo.create_announcement(payload).await?))
}

// --- Posts ---

/// list_posts
///
/// [Public Route] The composed post listing: `search` equality-filters on the
/// tag label (unsorted page), otherwise `sort=popularity` ranks by the derived
/// vote difference and anything else ranks newest-first. Five per page.
///
/// Database failures surface as a 500 here, never as an error payload inside
/// a 200 body.
#[utoipa::path(
    get,
    path = "/posts",
    params(PostListParams),
    responses((status = 200, description = "Posts page", body = [Post]))
)]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<PostListParams>,
) -> Result<Json<Vec<Post>>, ApiError> {
    let plan = PostListPlan::from_params(&params);
    Ok(Json(state.repo.list_posts(plan).await?))
}

/// posts_count
///
/// [Public Route] Total number of posts, used to size the pagination bar.
#[utoipa::path(
    get,
    path = "/posts-count",
    responses((status = 200, description = "Post count", body = PostsCount))
)]
pub async fn posts_count(State(state): State<AppState>) -> Result<Json<PostsCount>, ApiError> {
    let posts_count = state.repo.count_posts().await?;
    Ok(Json(PostsCount { posts_count }))
}

/// get_post
///
/// [Public Route] A single post by id.
#[utoipa::path(
    get,
    path = "/posts/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post", body = Post),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Post>, ApiError> {
    let post = state.repo.find_post(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(post))
}

/// create_post
///
/// [Authenticated Route] Submits a new post. The author email is taken from
/// the authenticated identity, never from the body.
#[utoipa::path(
    post,
    path = "/posts",
    request_body = CreatePostRequest,
    responses((status = 200, description = "Created post", body = Post))
)]
pub async fn create_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<Json<Post>, ApiError> {
    let post = state.repo.create_post(payload, &auth.email).await?;
    Ok(Json(post))
}

/// update_post_votes
///
/// [Authenticated Route] Replaces both vote counters with the client's values.
/// An upserting replacement; concurrent votes are last-write-wins.
#[utoipa::path(
    put,
    path = "/posts/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = VoteUpdate,
    responses((status = 200, description = "Updated post", body = Post))
)]
pub async fn update_post_votes(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VoteUpdate>,
) -> Result<Json<Post>, ApiError> {
    let post = state
        .repo
        .update_post_votes(id, payload.up_vote_count, payload.down_vote_count)
        .await?;
    Ok(Json(post))
}

/// delete_post
///
/// [Authenticated Route] Removes a post by id. Comments on the post are left
/// in place; there is no cascade.
#[utoipa::path(
    delete,
    path = "/posts/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_post(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.repo.delete_post(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

/// user_posts
///
/// [Authenticated Route] The caller's own posts, newest first, with the total.
#[utoipa::path(
    get,
    path = "/posts/user/{email}",
    params(("email" = String, Path, description = "Author email")),
    responses((status = 200, description = "Author's posts", body = UserPosts))
)]
pub async fn user_posts(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<UserPosts>, ApiError> {
    auth.require_self(&email)?;
    let posts = state.repo.posts_by_author(&email).await?;
    let total = posts.len() as i64;
    Ok(Json(UserPosts {
        user_created_posts: posts,
        total_post_by_user: total,
    }))
}

/// user_posts_table
///
/// [Authenticated Route] Paged variant of the own-posts listing for the
/// profile table view, ten per page. The total is the author's full post
/// count, not the page length.
#[utoipa::path(
    get,
    path = "/posts/user/table/{email}",
    params(("email" = String, Path, description = "Author email"), PageParams),
    responses((status = 200, description = "Author's posts page", body = UserPosts))
)]
pub async fn user_posts_table(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(email): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<UserPosts>, ApiError> {
    auth.require_self(&email)?;
    let page = params.resolve(USER_POSTS_PAGE_SIZE);
    let posts = state.repo.posts_by_author_page(&email, page).await?;
    let total = state.repo.count_posts_by_author(&email).await?;
    Ok(Json(UserPosts {
        user_created_posts: posts,
        total_post_by_user: total,
    }))
}

// --- Comments ---

/// list_comments
///
/// [Public Route] All comments, unfiltered.
#[utoipa::path(
    get,
    path = "/comments",
    responses((status = 200, description = "All comments", body = [Comment]))
)]
pub async fn list_comments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    Ok(Json(state.repo.list_comments().await?))
}

/// create_comment
///
/// [Authenticated Route] Posts a new comment. The commenter email comes from
/// the token.
#[utoipa::path(
    post,
    path = "/comments",
    request_body = CreateCommentRequest,
    responses((status = 200, description = "Created comment", body = Comment))
)]
pub async fn create_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<Json<Comment>, ApiError> {
    let comment = state.repo.create_comment(payload, &auth.email).await?;
    Ok(Json(comment))
}

/// comment_count
///
/// [Public Route] How many comments a user has written.
#[utoipa::path(
    get,
    path = "/comments/{email}",
    params(("email" = String, Path, description = "Commenter email")),
    responses((status = 200, description = "Comment count", body = CommentCount))
)]
pub async fn comment_count(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<CommentCount>, ApiError> {
    let total_user_comments = state.repo.count_comments_by_author(&email).await?;
    Ok(Json(CommentCount {
        total_user_comments,
    }))
}

/// reported_comments
///
/// [Admin Route] The moderation queue: comments carrying a report annotation,
/// ten per page.
#[utoipa::path(
    get,
    path = "/comments/status/reported",
    params(PageParams),
    responses((status = 200, description = "Reported comments page", body = [Comment]))
)]
pub async fn reported_comments(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let page = params.resolve(REPORTED_COMMENTS_PAGE_SIZE);
    Ok(Json(state.repo.reported_comments(page).await?))
}

/// report_comment
///
/// [Public Route] Marks a comment as reported: sets the reason and reporter.
/// Idempotent — re-reporting overwrites the annotation.
#[utoipa::path(
    put,
    path = "/comments/report/{id}",
    params(("id" = Uuid, Path, description = "Comment ID")),
    request_body = ReportRequest,
    responses((status = 200, description = "Reported comment", body = Comment))
)]
pub async fn report_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReportRequest>,
) -> Result<Json<Comment>, ApiError> {
    let comment = state
        .repo
        .set_report(id, &payload.report, payload.reported_by)
        .await?;
    Ok(Json(comment))
}

/// remove_report
///
/// [Public Route] Dismisses a report: clears the annotation so the comment is
/// indistinguishable from one that was never reported. Idempotent in effect —
/// clearing an unreported comment changes nothing.
#[utoipa::path(
    put,
    path = "/comments/report/remove/{id}",
    params(("id" = Uuid, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Report cleared"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn remove_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.repo.clear_report(id).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ApiError::NotFound)
    }
}

/// delete_comment
///
/// [Public Route] Removes a comment by id.
#[utoipa::path(
    delete,
    path = "/comments/delete/{id}",
    params(("id" = Uuid, Path, description = "Comment ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.repo.delete_comment(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

// --- Payments & Statistics ---

/// Fixed membership price in cents.
const MEMBERSHIP_PRICE_CENTS: i64 = 500;

/// create_payment_intent
///
/// [Authenticated Route] Creates a card payment intent for the fixed
/// membership price and returns the client secret the frontend confirms with.
#[utoipa::path(
    get,
    path = "/create-payment-intent",
    responses(
        (status = 200, description = "Client secret", body = PaymentIntentResponse),
        (status = 502, description = "Payment provider failure")
    )
)]
pub async fn create_payment_intent(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<PaymentIntentResponse>, ApiError> {
    let intent = state
        .payments
        .create_intent(MEMBERSHIP_PRICE_CENTS, "usd", &["card"])
        .await
        .map_err(ApiError::Payment)?;
    Ok(Json(PaymentIntentResponse {
        client_secret: intent.client_secret,
    }))
}

/// statistics
///
/// [Authenticated Route] Site-wide counters for the dashboard. Each count is
/// an independent read; the per-user count uses the verified token identity.
#[utoipa::path(
    get,
    path = "/statistics",
    responses((status = 200, description = "Site statistics", body = Statistics))
)]
pub async fn statistics(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Statistics>, ApiError> {
    Ok(Json(state.repo.statistics(&auth.email).await?))
}
