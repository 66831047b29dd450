//! Post Service
//!
//! Community posts: the listing operations plus likes, comments and the
//! resolved flag.

use std::sync::Arc;

use kernel::id::{PostId, UserId};

use crate::application::config::MarketConfig;
use crate::application::listing;
use crate::domain::entity::{Comment, Post};
use crate::domain::filter::{Page, PostFilter};
use crate::domain::repository::ListingRepository;
use crate::domain::search::SearchQuery;
use crate::domain::validator::{CommentInput, PostInput, validate_comment, validate_post};
use crate::error::{MarketError, MarketResult};

/// Post store
pub struct PostService<Q>
where
    Q: ListingRepository<Post>,
{
    posts: Arc<Q>,
    config: Arc<MarketConfig>,
}

impl<Q> PostService<Q>
where
    Q: ListingRepository<Post> + Sync,
{
    pub fn new(posts: Arc<Q>, config: Arc<MarketConfig>) -> Self {
        Self { posts, config }
    }

    pub async fn create(&self, author: UserId, input: PostInput) -> MarketResult<Post> {
        let draft = validate_post(input)?;
        let post = Post::new(author, draft);
        self.posts.create(&post).await?;

        tracing::info!(post_id = %post.id, author = %author, "Post published");

        Ok(post)
    }

    pub async fn get(&self, id: PostId) -> MarketResult<Post> {
        listing::fetch(self.posts.as_ref(), id).await
    }

    pub async fn list(
        &self,
        filter: &PostFilter,
        page: Page,
        q: Option<&str>,
        fields: Option<&str>,
    ) -> MarketResult<Vec<Post>> {
        let pattern = filter.pattern()?;
        let query = SearchQuery::parse::<Post>(q, fields)?;
        listing::browse(self.posts.as_ref(), &pattern, &query, self.config.slice(page)).await
    }

    pub async fn update(&self, id: PostId, requester: UserId, patch: PostInput) -> MarketResult<Post> {
        listing::edit(self.posts.as_ref(), id, requester, |post: &mut Post| {
            let merged = PostInput::from(&*post).merge(patch.clone());
            post.apply(validate_post(merged)?);
            Ok(())
        })
        .await
    }

    pub async fn delete(&self, id: PostId, requester: UserId) -> MarketResult<()> {
        listing::remove::<Post, _>(self.posts.as_ref(), id, requester).await
    }

    // ========================================================================
    // Engagement
    // ========================================================================

    /// Like once per user; repeating is a no-op
    pub async fn like(&self, id: PostId, user: UserId) -> MarketResult<Post> {
        self.engage(id, |post| {
            post.like(user);
        })
        .await
    }

    pub async fn unlike(&self, id: PostId, user: UserId) -> MarketResult<Post> {
        self.engage(id, |post| {
            post.unlike(user);
        })
        .await
    }

    pub async fn comment(&self, id: PostId, user: UserId, input: CommentInput) -> MarketResult<Comment> {
        let text = validate_comment(input)?;

        self.posts
            .modify(id, |post| Ok(post.add_comment(user, text.clone())))
            .await?
            .ok_or(MarketError::NotFound("Post"))
    }

    /// Author only
    pub async fn set_resolved(&self, id: PostId, requester: UserId, resolved: bool) -> MarketResult<Post> {
        listing::edit(self.posts.as_ref(), id, requester, |post: &mut Post| {
            post.set_resolved(resolved);
            Ok(())
        })
        .await
    }

    async fn engage<F>(&self, id: PostId, mut f: F) -> MarketResult<Post>
    where
        F: FnMut(&mut Post) + Send,
    {
        self.posts
            .modify(id, |post| {
                f(post);
                Ok(post.clone())
            })
            .await?
            .ok_or(MarketError::NotFound("Post"))
    }
}
