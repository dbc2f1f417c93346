use crate::models::BlogPost;
use sqlx::{PgPool, Result as SqlxResult};
use uuid::Uuid;

const BLOG_POST_COLUMNS: &str = "id, title, slug, excerpt, content, tags, published, published_at, \
     author_id, created_at, updated_at";

/// Fields written on create and update, already validated and normalized
#[derive(Debug, Clone)]
pub struct BlogPostRecord<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub excerpt: Option<&'a str>,
    pub content: &'a str,
    pub tags: &'a [String],
    pub published: bool,
}

/// Repository for blog post data access
pub struct BlogPostRepository {
    pool: PgPool,
}

impl BlogPostRepository {
    /// Create a new BlogPostRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new post
    pub async fn create(
        &self,
        record: &BlogPostRecord<'_>,
        author_id: Option<Uuid>,
    ) -> SqlxResult<BlogPost> {
        sqlx::query_as::<_, BlogPost>(&format!(
            r#"
            INSERT INTO blog_posts (title, slug, excerpt, content, tags, published, published_at, author_id)
            VALUES ($1, $2, $3, $4, $5, $6, CASE WHEN $6 THEN NOW() END, $7)
            RETURNING {BLOG_POST_COLUMNS}
            "#
        ))
        .bind(record.title)
        .bind(record.slug)
        .bind(record.excerpt)
        .bind(record.content)
        .bind(record.tags)
        .bind(record.published)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Update a post.
    ///
    /// `published_at` is stamped the first time the post is published and kept
    /// afterwards.
    pub async fn update(&self, id: Uuid, record: &BlogPostRecord<'_>) -> SqlxResult<Option<BlogPost>> {
        sqlx::query_as::<_, BlogPost>(&format!(
            r#"
            UPDATE blog_posts
            SET title = $2,
                slug = $3,
                excerpt = $4,
                content = $5,
                tags = $6,
                published = $7,
                published_at = CASE
                    WHEN $7 AND published_at IS NULL THEN NOW()
                    ELSE published_at
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BLOG_POST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(record.title)
        .bind(record.slug)
        .bind(record.excerpt)
        .bind(record.content)
        .bind(record.tags)
        .bind(record.published)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find a post by UUID
    pub async fn find_by_id(&self, id: Uuid) -> SqlxResult<Option<BlogPost>> {
        sqlx::query_as::<_, BlogPost>(&format!(
            "SELECT {BLOG_POST_COLUMNS} FROM blog_posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find a published post by slug
    pub async fn find_published_by_slug(&self, slug: &str) -> SqlxResult<Option<BlogPost>> {
        sqlx::query_as::<_, BlogPost>(&format!(
            "SELECT {BLOG_POST_COLUMNS} FROM blog_posts WHERE slug = $1 AND published = TRUE"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
    }

    /// Whether a slug is taken by a post other than `exclude_id`
    pub async fn slug_exists(&self, slug: &str, exclude_id: Option<Uuid>) -> SqlxResult<bool> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM blog_posts
                WHERE slug = $1 AND ($2::UUID IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
    }

    /// List published posts, newest first, optionally filtered by tag
    pub async fn list_published(&self, tag: Option<&str>) -> SqlxResult<Vec<BlogPost>> {
        sqlx::query_as::<_, BlogPost>(&format!(
            r#"
            SELECT {BLOG_POST_COLUMNS}
            FROM blog_posts
            WHERE published = TRUE AND ($1::TEXT IS NULL OR $1 = ANY(tags))
            ORDER BY published_at DESC NULLS LAST, created_at DESC
            "#
        ))
        .bind(tag)
        .fetch_all(&self.pool)
        .await
    }

    /// List every post including drafts
    pub async fn list_all(&self) -> SqlxResult<Vec<BlogPost>> {
        sqlx::query_as::<_, BlogPost>(&format!(
            "SELECT {BLOG_POST_COLUMNS} FROM blog_posts ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
    }

    /// Delete a post
    pub async fn delete(&self, id: Uuid) -> SqlxResult<bool> {
        let rows_affected = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }
}
