use serde::Deserialize;
use utoipa::IntoParams;

/// Page size for the public post listing.
pub const POSTS_PAGE_SIZE: i64 = 5;
/// Page size for the admin user listing.
pub const USERS_PAGE_SIZE: i64 = 10;
/// Page size for the reported-comments moderation queue.
pub const REPORTED_COMMENTS_PAGE_SIZE: i64 = 10;
/// Page size for the per-user post table.
pub const USER_POSTS_PAGE_SIZE: i64 = 10;

/// Page
///
/// A resolved pagination window: `skip` rows, then take at most `limit`.
/// Pages are zero-based with a fixed size per route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl Page {
    /// Resolves the raw `page` query parameter against a route's page size.
    ///
    /// A missing, non-numeric, or negative value resolves to page 0, so
    /// malformed input serves the first page instead of skipping everything.
    /// The offset multiplication saturates: a page index near `i64::MAX` is a
    /// far-off empty page, never a panic or a negative offset.
    pub fn from_raw(raw: Option<&str>, size: i64) -> Self {
        let page = raw
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 0)
            .unwrap_or(0);
        Self {
            skip: page.saturating_mul(size),
            limit: size,
        }
    }
}

/// PostListParams
///
/// Accepted query parameters for GET /posts. All three are optional; `page`
/// stays a string so malformed input degrades to page 0 instead of a 400.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct PostListParams {
    /// Zero-based page index.
    pub page: Option<String>,
    /// `popularity` for derived vote ranking; anything else means newest-first.
    pub sort: Option<String>,
    /// Exact tag label to filter by. The literal string "undefined" is treated
    /// as absent (the frontend serializes an unset search box that way).
    pub search: Option<String>,
}

/// PageParams
///
/// Query parameters for the routes that paginate without sort/search
/// (admin user list, reported comments, per-user post table).
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct PageParams {
    pub page: Option<String>,
}

impl PageParams {
    pub fn resolve(&self, size: i64) -> Page {
        Page::from_raw(self.page.as_deref(), size)
    }
}

/// PostOrder
///
/// The two ranked orderings the post listing supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOrder {
    /// Descending by derived popularity (`up_vote_count - down_vote_count`),
    /// computed at query time.
    Popularity,
    /// Descending by creation time.
    Newest,
}

/// PostListPlan
///
/// The composed query plan for GET /posts. The two branches are mutually
/// exclusive: a tag search returns the filtered page unsorted, everything else
/// goes through one of the ranked orderings. Pagination applies to both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostListPlan {
    TagFilter { tag: String, page: Page },
    Ranked { order: PostOrder, page: Page },
}

impl PostListPlan {
    /// Translates the request query parameters into a plan.
    pub fn from_params(params: &PostListParams) -> Self {
        let page = Page::from_raw(params.page.as_deref(), POSTS_PAGE_SIZE);

        // Search wins over sort when a real term is present.
        if let Some(tag) = params
            .search
            .as_deref()
            .filter(|s| !s.is_empty() && *s != "undefined")
        {
            return PostListPlan::TagFilter {
                tag: tag.to_string(),
                page,
            };
        }

        let order = match params.sort.as_deref() {
            Some("popularity") => PostOrder::Popularity,
            _ => PostOrder::Newest,
        };
        PostListPlan::Ranked { order, page }
    }

    pub fn page(&self) -> Page {
        match self {
            PostListPlan::TagFilter { page, .. } => *page,
            PostListPlan::Ranked { page, .. } => *page,
        }
    }
}
