use crate::models::{
    Announcement, Comment, CreateAnnouncementRequest, CreateCommentRequest, CreatePostRequest,
    CreateTagRequest, Post, Statistics, Tag, User,
};
use crate::query::{Page, PostListPlan, PostOrder};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Repository
///
/// Abstract contract for all persistence operations. Handlers only ever see
/// this trait, so the Postgres implementation can be swapped for an in-memory
/// mock in tests. Every method returns `Result` and failures surface as HTTP
/// 500s instead of being silently defaulted away.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across request tasks.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn find_user(&self, email: &str) -> Result<Option<User>, sqlx::Error>;
    async fn insert_user(&self, user: User) -> Result<User, sqlx::Error>;
    async fn list_all_users(&self) -> Result<Vec<User>, sqlx::Error>;
    // Paged admin listing, ordered by email for stable pages.
    async fn list_users(&self, page: Page) -> Result<Vec<User>, sqlx::Error>;
    // Membership upgrade: merge of badge + payment id, upserting.
    async fn update_membership(
        &self,
        email: &str,
        badge: Option<String>,
        payment_id: Option<String>,
    ) -> Result<User, sqlx::Error>;
    // Admin role change, upserting.
    async fn update_role(&self, email: &str, role: &str) -> Result<User, sqlx::Error>;

    // --- Tags & Announcements ---
    async fn list_tags(&self) -> Result<Vec<Tag>, sqlx::Error>;
    async fn create_tag(&self, req: CreateTagRequest) -> Result<Tag, sqlx::Error>;
    // Newest first.
    async fn list_announcements(&self) -> Result<Vec<Announcement>, sqlx::Error>;
    async fn create_announcement(
        &self,
        req: CreateAnnouncementRequest,
    ) -> Result<Announcement, sqlx::Error>;

    // --- Posts ---
    // Executes a composed listing plan: tag filter or ranked page.
    async fn list_posts(&self, plan: PostListPlan) -> Result<Vec<Post>, sqlx::Error>;
    async fn count_posts(&self) -> Result<i64, sqlx::Error>;
    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, sqlx::Error>;
    async fn create_post(&self, req: CreatePostRequest, email: &str) -> Result<Post, sqlx::Error>;
    // Vote-count replacement with upsert semantics; last write wins.
    async fn update_post_votes(
        &self,
        id: Uuid,
        up_vote_count: i64,
        down_vote_count: i64,
    ) -> Result<Post, sqlx::Error>;
    async fn posts_by_author(&self, email: &str) -> Result<Vec<Post>, sqlx::Error>;
    async fn posts_by_author_page(&self, email: &str, page: Page)
    -> Result<Vec<Post>, sqlx::Error>;
    async fn count_posts_by_author(&self, email: &str) -> Result<i64, sqlx::Error>;
    // No cascade: a post's comments survive its deletion.
    async fn delete_post(&self, id: Uuid) -> Result<bool, sqlx::Error>;

    // --- Comments ---
    async fn list_comments(&self) -> Result<Vec<Comment>, sqlx::Error>;
    async fn create_comment(
        &self,
        req: CreateCommentRequest,
        email: &str,
    ) -> Result<Comment, sqlx::Error>;
    async fn count_comments_by_author(&self, email: &str) -> Result<i64, sqlx::Error>;
    async fn reported_comments(&self, page: Page) -> Result<Vec<Comment>, sqlx::Error>;
    // Sets report + reported_by, upserting.
    async fn set_report(
        &self,
        id: Uuid,
        report: &str,
        reported_by: Option<String>,
    ) -> Result<Comment, sqlx::Error>;
    // Clears the report annotation entirely, returning the comment to a
    // never-reported state.
    async fn clear_report(&self, id: Uuid) -> Result<bool, sqlx::Error>;
    async fn delete_comment(&self, id: Uuid) -> Result<bool, sqlx::Error>;

    // --- Statistics ---
    // Five independent counts; no snapshot isolation across them.
    async fn statistics(&self, email: &str) -> Result<Statistics, sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of `Repository`, backed by Postgres. Partial
/// writes are `INSERT ... ON CONFLICT DO UPDATE ... RETURNING` so every update
/// route can upsert, a dismissed report is `SET report = NULL`, "reported" is
/// `report IS NOT NULL`, and the popularity ranking is an `ORDER BY` on the
/// derived vote difference.
pub struct PostgresRepository {
    pool: PgPool,
}

const POST_COLUMNS: &str = "id, email, author_name, author_image, title, description, tags, \
     up_vote_count, down_vote_count, time";

const COMMENT_COLUMNS: &str = "id, post_id, post_title, email, comment, report, reported_by, time";

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn find_user(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT email, name, image, role, badge, payment_id FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn insert_user(&self, user: User) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, image, role, badge, payment_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING email, name, image, role, badge, payment_id
            "#,
        )
        .bind(user.email)
        .bind(user.name)
        .bind(user.image)
        .bind(user.role)
        .bind(user.badge)
        .bind(user.payment_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_all_users(&self) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT email, name, image, role, badge, payment_id FROM users")
            .fetch_all(&self.pool)
            .await
    }

    async fn list_users(&self, page: Page) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT email, name, image, role, badge, payment_id
            FROM users ORDER BY email LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await
    }

    async fn update_membership(
        &self,
        email: &str,
        badge: Option<String>,
        payment_id: Option<String>,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, badge, payment_id) VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE
            SET badge = EXCLUDED.badge, payment_id = EXCLUDED.payment_id
            RETURNING email, name, image, role, badge, payment_id
            "#,
        )
        .bind(email)
        .bind(badge)
        .bind(payment_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_role(&self, email: &str, role: &str) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, role) VALUES ($1, $2)
            ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
            RETURNING email, name, image, role, badge, payment_id
            "#,
        )
        .bind(email)
        .bind(role)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, sqlx::Error> {
        sqlx::query_as::<_, Tag>("SELECT id, name FROM tags")
            .fetch_all(&self.pool)
            .await
    }

    async fn create_tag(&self, req: CreateTagRequest) -> Result<Tag, sqlx::Error> {
        sqlx::query_as::<_, Tag>("INSERT INTO tags (id, name) VALUES ($1, $2) RETURNING id, name")
            .bind(Uuid::new_v4())
            .bind(req.name)
            .fetch_one(&self.pool)
            .await
    }

    async fn list_announcements(&self) -> Result<Vec<Announcement>, sqlx::Error> {
        sqlx::query_as::<_, Announcement>(
            r#"
            SELECT id, title, description, author_name, author_image, time
            FROM announcements ORDER BY time DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn create_announcement(
        &self,
        req: CreateAnnouncementRequest,
    ) -> Result<Announcement, sqlx::Error> {
        sqlx::query_as::<_, Announcement>(
            r#"
            INSERT INTO announcements (id, title, description, author_name, author_image)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, author_name, author_image, time
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(req.title)
        .bind(req.description)
        .bind(req.author_name)
        .bind(req.author_image)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_posts(&self, plan: PostListPlan) -> Result<Vec<Post>, sqlx::Error> {
        match plan {
            // Equality match on the tag label; the filtered page carries no
            // ranking, but pages must be stable across invocations, so the
            // key is the tiebreak.
            PostListPlan::TagFilter { tag, page } => {
                let sql = format!(
                    "SELECT {POST_COLUMNS} FROM posts WHERE tags = $1 ORDER BY id LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, Post>(&sql)
                    .bind(tag)
                    .bind(page.limit)
                    .bind(page.skip)
                    .fetch_all(&self.pool)
                    .await
            }
            PostListPlan::Ranked { order, page } => {
                // Popularity is derived at query time, never stored.
                let order_by = match order {
                    PostOrder::Popularity => "(up_vote_count - down_vote_count) DESC",
                    PostOrder::Newest => "time DESC",
                };
                let sql = format!(
                    "SELECT {POST_COLUMNS} FROM posts ORDER BY {order_by} LIMIT $1 OFFSET $2"
                );
                sqlx::query_as::<_, Post>(&sql)
                    .bind(page.limit)
                    .bind(page.skip)
                    .fetch_all(&self.pool)
                    .await
            }
        }
    }

    async fn count_posts(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, sqlx::Error> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_post(&self, req: CreatePostRequest, email: &str) -> Result<Post, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO posts (id, email, author_name, author_image, title, description, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {POST_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(Uuid::new_v4())
            .bind(email)
            .bind(req.author_name)
            .bind(req.author_image)
            .bind(req.title)
            .bind(req.description)
            .bind(req.tags)
            .fetch_one(&self.pool)
            .await
    }

    async fn update_post_votes(
        &self,
        id: Uuid,
        up_vote_count: i64,
        down_vote_count: i64,
    ) -> Result<Post, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO posts (id, up_vote_count, down_vote_count) VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE
            SET up_vote_count = EXCLUDED.up_vote_count,
                down_vote_count = EXCLUDED.down_vote_count
            RETURNING {POST_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .bind(up_vote_count)
            .bind(down_vote_count)
            .fetch_one(&self.pool)
            .await
    }

    async fn posts_by_author(&self, email: &str) -> Result<Vec<Post>, sqlx::Error> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE email = $1 ORDER BY time DESC");
        sqlx::query_as::<_, Post>(&sql)
            .bind(email)
            .fetch_all(&self.pool)
            .await
    }

    async fn posts_by_author_page(
        &self,
        email: &str,
        page: Page,
    ) -> Result<Vec<Post>, sqlx::Error> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE email = $1 ORDER BY time DESC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Post>(&sql)
            .bind(email)
            .bind(page.limit)
            .bind(page.skip)
            .fetch_all(&self.pool)
            .await
    }

    async fn count_posts_by_author(&self, email: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_comments(&self) -> Result<Vec<Comment>, sqlx::Error> {
        let sql = format!("SELECT {COMMENT_COLUMNS} FROM comments");
        sqlx::query_as::<_, Comment>(&sql).fetch_all(&self.pool).await
    }

    async fn create_comment(
        &self,
        req: CreateCommentRequest,
        email: &str,
    ) -> Result<Comment, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO comments (id, post_id, post_title, email, comment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COMMENT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Comment>(&sql)
            .bind(Uuid::new_v4())
            .bind(req.post_id)
            .bind(req.post_title)
            .bind(email)
            .bind(req.comment)
            .fetch_one(&self.pool)
            .await
    }

    async fn count_comments_by_author(&self, email: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await
    }

    async fn reported_comments(&self, page: Page) -> Result<Vec<Comment>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {COMMENT_COLUMNS} FROM comments
            WHERE report IS NOT NULL
            ORDER BY time DESC LIMIT $1 OFFSET $2
            "#
        );
        sqlx::query_as::<_, Comment>(&sql)
            .bind(page.limit)
            .bind(page.skip)
            .fetch_all(&self.pool)
            .await
    }

    async fn set_report(
        &self,
        id: Uuid,
        report: &str,
        reported_by: Option<String>,
    ) -> Result<Comment, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO comments (id, report, reported_by) VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE
            SET report = EXCLUDED.report, reported_by = EXCLUDED.reported_by
            RETURNING {COMMENT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Comment>(&sql)
            .bind(id)
            .bind(report)
            .bind(reported_by)
            .fetch_one(&self.pool)
            .await
    }

    async fn clear_report(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        // Both fields go so the comment is indistinguishable from never-reported.
        let result = sqlx::query(
            "UPDATE comments SET report = NULL, reported_by = NULL WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_comment(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn statistics(&self, email: &str) -> Result<Statistics, sqlx::Error> {
        let total_users = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        let total_posts = self.count_posts().await?;
        let total_comments = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments")
            .fetch_one(&self.pool)
            .await?;
        let reported_comments_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE report IS NOT NULL")
                .fetch_one(&self.pool)
                .await?;
        let total_post_by_user = self.count_posts_by_author(email).await?;

        Ok(Statistics {
            total_users,
            total_posts,
            total_comments,
            reported_comments_count,
            total_post_by_user,
        })
    }
}
