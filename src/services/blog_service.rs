use crate::error::{AppError, AppResult, RepositoryError};
use crate::models::{BlogPost, BlogPostInput};
use crate::repositories::blog_post_repository::BlogPostRecord;
use crate::repositories::BlogPostRepository;
use crate::validation::{optional_text, require_text, slugify, validate_slug};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

const MAX_TAGS: usize = 10;

/// Validated and normalized post fields
#[derive(Debug, Clone, PartialEq, Eq)]
struct NormalizedPost {
    title: String,
    slug: String,
    excerpt: Option<String>,
    content: String,
    tags: Vec<String>,
    published: bool,
}

impl NormalizedPost {
    fn record(&self) -> BlogPostRecord<'_> {
        BlogPostRecord {
            title: &self.title,
            slug: &self.slug,
            excerpt: self.excerpt.as_deref(),
            content: &self.content,
            tags: &self.tags,
            published: self.published,
        }
    }
}

/// Trim, lowercase and deduplicate tags, keeping first-seen order
pub fn normalize_tags(raw: &[String]) -> AppResult<Vec<String>> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() || tags.contains(&tag) {
            continue;
        }
        if tag.chars().count() > 40 {
            return Err(AppError::Validation("Tags must be at most 40 characters".into()));
        }
        tags.push(tag);
    }

    if tags.len() > MAX_TAGS {
        return Err(AppError::Validation(format!("A post can have at most {} tags", MAX_TAGS)));
    }
    Ok(tags)
}

fn normalize(input: &BlogPostInput) -> AppResult<NormalizedPost> {
    let title = require_text("Title", &input.title, 200)?;
    let content = require_text("Content", &input.content, 500_000)?;

    let slug = match optional_text(input.slug.as_deref()) {
        Some(explicit) => validate_slug(&explicit)?,
        None => {
            let derived = slugify(&title);
            if derived.is_empty() {
                return Err(AppError::Validation(
                    "Could not derive a slug from the title; please provide one".into(),
                ));
            }
            validate_slug(&derived)?
        }
    };

    Ok(NormalizedPost {
        title,
        slug,
        excerpt: optional_text(input.excerpt.as_deref()),
        content,
        tags: normalize_tags(&input.tags)?,
        published: input.published,
    })
}

/// Service for blog posts
pub struct BlogService {
    blog_repo: Arc<BlogPostRepository>,
}

impl BlogService {
    pub fn new(blog_repo: Arc<BlogPostRepository>) -> Self {
        Self { blog_repo }
    }

    /// Published posts for the public blog
    pub async fn list_published(&self, tag: Option<&str>) -> AppResult<Vec<BlogPost>> {
        let tag = tag.map(|t| t.trim().to_lowercase()).filter(|t| !t.is_empty());
        Ok(self.blog_repo.list_published(tag.as_deref()).await?)
    }

    /// A published post by slug; drafts are not visible
    pub async fn get_published(&self, slug: &str) -> AppResult<BlogPost> {
        self.blog_repo
            .find_published_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Blog post not found".into()))
    }

    /// Every post including drafts
    pub async fn list_all(&self) -> AppResult<Vec<BlogPost>> {
        Ok(self.blog_repo.list_all().await?)
    }

    /// Any post by id
    pub async fn get(&self, id: Uuid) -> AppResult<BlogPost> {
        self.blog_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Blog post not found".into()))
    }

    /// Create a post
    pub async fn create(&self, input: BlogPostInput, author_id: Option<Uuid>) -> AppResult<BlogPost> {
        let post = normalize(&input)?;
        self.ensure_slug_free(&post.slug, None).await?;

        let created = self
            .blog_repo
            .create(&post.record(), author_id)
            .await
            .map_err(|e| Self::map_duplicate(e, &post.slug))?;

        info!("Created blog post {} ({})", created.slug, created.id);
        Ok(created)
    }

    /// Replace a post's fields
    pub async fn update(&self, id: Uuid, input: BlogPostInput) -> AppResult<BlogPost> {
        let post = normalize(&input)?;
        self.ensure_slug_free(&post.slug, Some(id)).await?;

        let updated = self
            .blog_repo
            .update(id, &post.record())
            .await
            .map_err(|e| Self::map_duplicate(e, &post.slug))?
            .ok_or_else(|| AppError::NotFound("Blog post not found".into()))?;

        info!("Updated blog post {} ({})", updated.slug, updated.id);
        Ok(updated)
    }

    /// Delete a post
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.blog_repo.delete(id).await? {
            return Err(AppError::NotFound("Blog post not found".into()));
        }
        info!("Deleted blog post {}", id);
        Ok(())
    }

    async fn ensure_slug_free(&self, slug: &str, exclude_id: Option<Uuid>) -> AppResult<()> {
        if self.blog_repo.slug_exists(slug, exclude_id).await? {
            return Err(Self::slug_conflict(slug));
        }
        Ok(())
    }

    fn slug_conflict(slug: &str) -> AppError {
        AppError::Conflict(format!("A blog post with slug '{}' already exists", slug))
    }

    // The unique index still guards against a race between check and write
    fn map_duplicate(err: sqlx::Error, slug: &str) -> AppError {
        match RepositoryError::from(err) {
            RepositoryError::Duplicate(_) => Self::slug_conflict(slug),
            other => other.into(),
        }
    }
}
