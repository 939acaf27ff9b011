// Shared fixtures; each integration test binary pulls in the subset it needs.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use react_hub_api::{
    AppState,
    config::AppConfig,
    models::{
        Announcement, Comment, CreateAnnouncementRequest, CreateCommentRequest, CreatePostRequest,
        CreateTagRequest, Post, Statistics, Tag, User,
    },
    payments::MockPaymentService,
    query::{Page, PostListPlan, PostOrder},
    repository::Repository,
};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// InMemoryRepo
///
/// A fake persistence collaborator backed by plain Vecs. It implements the
/// full `Repository` semantics (upserts, derived popularity ordering, report
/// toggling) so guards, handlers, and the whole router can be exercised
/// without a live Postgres.
#[derive(Default)]
pub struct InMemoryRepo {
    pub users: Mutex<Vec<User>>,
    pub posts: Mutex<Vec<Post>>,
    pub comments: Mutex<Vec<Comment>>,
    pub tags: Mutex<Vec<Tag>>,
    pub announcements: Mutex<Vec<Announcement>>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Mutex::new(users),
            ..Self::default()
        }
    }

    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: Mutex::new(posts),
            ..Self::default()
        }
    }

    pub fn with_comments(comments: Vec<Comment>) -> Self {
        Self {
            comments: Mutex::new(comments),
            ..Self::default()
        }
    }
}

fn page_slice<T: Clone>(items: &[T], page: Page) -> Vec<T> {
    items
        .iter()
        .skip(page.skip.max(0) as usize)
        .take(page.limit.max(0) as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl Repository for InMemoryRepo {
    async fn find_user(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert_user(&self, user: User) -> Result<User, sqlx::Error> {
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn list_all_users(&self) -> Result<Vec<User>, sqlx::Error> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn list_users(&self, page: Page) -> Result<Vec<User>, sqlx::Error> {
        let mut users = self.users.lock().unwrap().clone();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(page_slice(&users, page))
    }

    async fn update_membership(
        &self,
        email: &str,
        badge: Option<String>,
        payment_id: Option<String>,
    ) -> Result<User, sqlx::Error> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.email == email) {
            user.badge = badge;
            user.payment_id = payment_id;
            return Ok(user.clone());
        }
        let user = User {
            email: email.to_string(),
            badge,
            payment_id,
            ..User::default()
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update_role(&self, email: &str, role: &str) -> Result<User, sqlx::Error> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.email == email) {
            user.role = Some(role.to_string());
            return Ok(user.clone());
        }
        let user = User {
            email: email.to_string(),
            role: Some(role.to_string()),
            ..User::default()
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, sqlx::Error> {
        Ok(self.tags.lock().unwrap().clone())
    }

    async fn create_tag(&self, req: CreateTagRequest) -> Result<Tag, sqlx::Error> {
        let tag = Tag {
            id: Uuid::new_v4(),
            name: req.name,
        };
        self.tags.lock().unwrap().push(tag.clone());
        Ok(tag)
    }

    async fn list_announcements(&self) -> Result<Vec<Announcement>, sqlx::Error> {
        let mut items = self.announcements.lock().unwrap().clone();
        items.sort_by(|a, b| b.time.cmp(&a.time));
        Ok(items)
    }

    async fn create_announcement(
        &self,
        req: CreateAnnouncementRequest,
    ) -> Result<Announcement, sqlx::Error> {
        let announcement = Announcement {
            id: Uuid::new_v4(),
            title: req.title,
            description: req.description,
            author_name: req.author_name,
            author_image: req.author_image,
            time: Utc::now(),
        };
        self.announcements.lock().unwrap().push(announcement.clone());
        Ok(announcement)
    }

    async fn list_posts(&self, plan: PostListPlan) -> Result<Vec<Post>, sqlx::Error> {
        let posts = self.posts.lock().unwrap().clone();
        match plan {
            PostListPlan::TagFilter { tag, page } => {
                // Unranked, but keyed on id so pages are stable.
                let mut filtered: Vec<Post> = posts
                    .into_iter()
                    .filter(|p| p.tags.as_deref() == Some(tag.as_str()))
                    .collect();
                filtered.sort_by_key(|p| p.id);
                Ok(page_slice(&filtered, page))
            }
            PostListPlan::Ranked { order, page } => {
                let mut ranked = posts;
                match order {
                    PostOrder::Popularity => ranked.sort_by_key(|p| {
                        std::cmp::Reverse(p.up_vote_count - p.down_vote_count)
                    }),
                    PostOrder::Newest => ranked.sort_by(|a, b| b.time.cmp(&a.time)),
                }
                Ok(page_slice(&ranked, page))
            }
        }
    }

    async fn count_posts(&self) -> Result<i64, sqlx::Error> {
        Ok(self.posts.lock().unwrap().len() as i64)
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, sqlx::Error> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn create_post(&self, req: CreatePostRequest, email: &str) -> Result<Post, sqlx::Error> {
        let post = Post {
            id: Uuid::new_v4(),
            email: email.to_string(),
            author_name: req.author_name,
            author_image: req.author_image,
            title: req.title,
            description: req.description,
            tags: req.tags,
            up_vote_count: 0,
            down_vote_count: 0,
            time: Utc::now(),
        };
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn update_post_votes(
        &self,
        id: Uuid,
        up_vote_count: i64,
        down_vote_count: i64,
    ) -> Result<Post, sqlx::Error> {
        let mut posts = self.posts.lock().unwrap();
        if let Some(post) = posts.iter_mut().find(|p| p.id == id) {
            post.up_vote_count = up_vote_count;
            post.down_vote_count = down_vote_count;
            return Ok(post.clone());
        }
        // Upsert semantics: a vote update on an unknown id creates the row.
        let post = Post {
            id,
            up_vote_count,
            down_vote_count,
            time: Utc::now(),
            ..Post::default()
        };
        posts.push(post.clone());
        Ok(post)
    }

    async fn posts_by_author(&self, email: &str) -> Result<Vec<Post>, sqlx::Error> {
        let mut posts: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.email == email)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.time.cmp(&a.time));
        Ok(posts)
    }

    async fn posts_by_author_page(
        &self,
        email: &str,
        page: Page,
    ) -> Result<Vec<Post>, sqlx::Error> {
        let posts = self.posts_by_author(email).await?;
        Ok(page_slice(&posts, page))
    }

    async fn count_posts_by_author(&self, email: &str) -> Result<i64, sqlx::Error> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.email == email)
            .count() as i64)
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != id);
        Ok(posts.len() < before)
    }

    async fn list_comments(&self) -> Result<Vec<Comment>, sqlx::Error> {
        Ok(self.comments.lock().unwrap().clone())
    }

    async fn create_comment(
        &self,
        req: CreateCommentRequest,
        email: &str,
    ) -> Result<Comment, sqlx::Error> {
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id: req.post_id,
            post_title: req.post_title,
            email: email.to_string(),
            comment: req.comment,
            report: None,
            reported_by: None,
            time: Utc::now(),
        };
        self.comments.lock().unwrap().push(comment.clone());
        Ok(comment)
    }

    async fn count_comments_by_author(&self, email: &str) -> Result<i64, sqlx::Error> {
        Ok(self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.email == email)
            .count() as i64)
    }

    async fn reported_comments(&self, page: Page) -> Result<Vec<Comment>, sqlx::Error> {
        let mut reported: Vec<Comment> = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.report.is_some())
            .cloned()
            .collect();
        reported.sort_by(|a, b| b.time.cmp(&a.time));
        Ok(page_slice(&reported, page))
    }

    async fn set_report(
        &self,
        id: Uuid,
        report: &str,
        reported_by: Option<String>,
    ) -> Result<Comment, sqlx::Error> {
        let mut comments = self.comments.lock().unwrap();
        if let Some(comment) = comments.iter_mut().find(|c| c.id == id) {
            comment.report = Some(report.to_string());
            comment.reported_by = reported_by;
            return Ok(comment.clone());
        }
        let comment = Comment {
            id,
            report: Some(report.to_string()),
            reported_by,
            time: Utc::now(),
            ..Comment::default()
        };
        comments.push(comment.clone());
        Ok(comment)
    }

    async fn clear_report(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut comments = self.comments.lock().unwrap();
        if let Some(comment) = comments.iter_mut().find(|c| c.id == id) {
            comment.report = None;
            comment.reported_by = None;
            return Ok(true);
        }
        Ok(false)
    }

    async fn delete_comment(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut comments = self.comments.lock().unwrap();
        let before = comments.len();
        comments.retain(|c| c.id != id);
        Ok(comments.len() < before)
    }

    async fn statistics(&self, email: &str) -> Result<Statistics, sqlx::Error> {
        // No guard may be alive across the await below.
        let total_users = self.users.lock().unwrap().len() as i64;
        let total_posts = self.posts.lock().unwrap().len() as i64;
        let (total_comments, reported_comments_count) = {
            let comments = self.comments.lock().unwrap();
            let reported = comments.iter().filter(|c| c.report.is_some()).count();
            (comments.len() as i64, reported as i64)
        };
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

/// Builds an AppState around the given fake repository and mock payments.
pub fn test_state(repo: InMemoryRepo) -> AppState {
    AppState {
        repo: Arc::new(repo),
        payments: Arc::new(MockPaymentService::new()),
        config: AppConfig::default(),
    }
}

/// An admin user record for seeding.
pub fn admin_record(email: &str) -> User {
    User {
        email: email.to_string(),
        role: Some("admin".to_string()),
        ..User::default()
    }
}

/// A plain member record for seeding.
pub fn member_record(email: &str) -> User {
    User {
        email: email.to_string(),
        ..User::default()
    }
}
