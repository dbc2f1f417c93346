mod helpers;

use chrono::{Duration, Utc};
use greenkeep_backend::models::*;
use greenkeep_backend::repositories::blog_post_repository::BlogPostRecord;
use greenkeep_backend::repositories::quote_repository::QuoteRecord;
use helpers::*;
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};

// ============================================================================
// Migration Tests
// ============================================================================

#[sqlx::test]
async fn test_migrations_ran(pool: PgPool) {
    let tables = ["users", "waitlist_entries", "blog_posts", "email_templates", "quote_requests"];

    for table in tables {
        let row = sqlx::query(
            "SELECT EXISTS (SELECT FROM information_schema.tables WHERE table_name = $1)",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .expect("Failed to query information_schema");

        let exists: bool = row.get(0);
        assert!(exists, "Table {} should exist", table);
    }
}

// ============================================================================
// User Repository Tests
// ============================================================================

#[sqlx::test]
async fn test_user_create_and_find(pool: PgPool) {
    let db = TestDatabase::from_pool(pool);

    let user = db
        .user_repo
        .create("Owner", Some("owner@example.com"), "$argon2id$fake", true)
        .await
        .expect("Failed to create user");

    assert!(user.is_admin);
    assert_eq!(db.user_repo.count().await.unwrap(), 1);

    let found = db
        .user_repo
        .find_by_username("owner")
        .await
        .unwrap()
        .expect("Lookup should be case-insensitive");
    assert_eq!(found.id, user.id);
    assert_eq!(found.email.as_deref(), Some("owner@example.com"));
}

#[sqlx::test]
async fn test_user_duplicate_username_rejected(pool: PgPool) {
    let db = TestDatabase::from_pool(pool);
    db.user_repo.create("owner", None, "hash", true).await.unwrap();

    let err = db.user_repo.create("owner", None, "hash", false).await.unwrap_err();
    let repo_err = greenkeep_backend::error::RepositoryError::from(err);
    assert!(matches!(
        repo_err,
        greenkeep_backend::error::RepositoryError::Duplicate(_)
    ));
}

#[sqlx::test]
async fn test_user_update_password_and_delete(pool: PgPool) {
    let db = TestDatabase::from_pool(pool);
    let user = db.user_repo.create("owner", None, "old", true).await.unwrap();

    assert!(db.user_repo.update_password(user.id, "new").await.unwrap());
    let found = db.user_repo.find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(found.password_hash, "new");

    assert!(db.user_repo.delete(user.id).await.unwrap());
    assert!(!db.user_repo.delete(user.id).await.unwrap());
}

// ============================================================================
// Waitlist Repository Tests
// ============================================================================

#[sqlx::test]
async fn test_waitlist_upsert_refreshes_pending_entry(pool: PgPool) {
    let db = TestDatabase::from_pool(pool);
    let expires = Utc::now() + Duration::seconds(90);

    let first = db
        .waitlist_repo
        .upsert_pending("jane@example.com", "78701", "hash-1", expires)
        .await
        .unwrap()
        .expect("New entry should be inserted");

    let second = db
        .waitlist_repo
        .upsert_pending("jane@example.com", "78702", "hash-2", expires)
        .await
        .unwrap()
        .expect("Unverified entry should be refreshed");

    assert_eq!(first.id, second.id);
    assert_eq!(second.zip_code, "78702");
    assert_eq!(second.verification_code_hash.as_deref(), Some("hash-2"));
}

#[sqlx::test]
async fn test_waitlist_mark_verified_consumes_code(pool: PgPool) {
    let db = TestDatabase::from_pool(pool);
    let expires = Utc::now() + Duration::seconds(90);
    let entry = db
        .waitlist_repo
        .upsert_pending("jane@example.com", "78701", "hash-1", expires)
        .await
        .unwrap()
        .unwrap();

    assert!(db.waitlist_repo.mark_verified(entry.id, "wrong").await.unwrap().is_none());

    let verified = db
        .waitlist_repo
        .mark_verified(entry.id, "hash-1")
        .await
        .unwrap()
        .expect("Matching hash should verify");
    assert!(verified.verified);
    assert!(verified.verified_at.is_some());
    assert!(verified.verification_code_hash.is_none());
    assert!(verified.code_expires_at.is_none());

    // Second redemption finds nothing to update
    assert!(db.waitlist_repo.mark_verified(entry.id, "hash-1").await.unwrap().is_none());

    // Verified entries are not reopened by a new signup
    let again = db
        .waitlist_repo
        .upsert_pending("jane@example.com", "78701", "hash-3", expires)
        .await
        .unwrap();
    assert!(again.is_none());
}

#[sqlx::test]
async fn test_waitlist_mark_verified_rejects_expired_code(pool: PgPool) {
    let db = TestDatabase::from_pool(pool);
    let already_expired = Utc::now() - Duration::seconds(1);
    let entry = db
        .waitlist_repo
        .upsert_pending("jane@example.com", "78701", "hash-1", already_expired)
        .await
        .unwrap()
        .unwrap();

    assert!(db.waitlist_repo.mark_verified(entry.id, "hash-1").await.unwrap().is_none());

    let stored = db.waitlist_repo.find_by_id(entry.id).await.unwrap().unwrap();
    assert!(!stored.verified);
}

#[sqlx::test]
async fn test_waitlist_list_and_stats(pool: PgPool) {
    let db = TestDatabase::from_pool(pool);
    let expires = Utc::now() + Duration::seconds(90);

    for (i, email) in ["a@example.com", "b@example.com", "c@example.com"].iter().enumerate() {
        let entry = db
            .waitlist_repo
            .upsert_pending(email, "78701", &format!("h{}", i), expires)
            .await
            .unwrap()
            .unwrap();
        if i == 0 {
            db.waitlist_repo.mark_verified(entry.id, "h0").await.unwrap();
        }
    }

    assert_eq!(db.waitlist_repo.list(None).await.unwrap().len(), 3);
    assert_eq!(db.waitlist_repo.list(Some(true)).await.unwrap().len(), 1);
    assert_eq!(db.waitlist_repo.list(Some(false)).await.unwrap().len(), 2);

    let stats = db.waitlist_repo.stats().await.unwrap();
    assert_eq!(
        stats,
        WaitlistStats {
            total: 3,
            verified: 1,
            pending: 2
        }
    );
}

// ============================================================================
// Blog Repository Tests
// ============================================================================

fn record<'a>(title: &'a str, slug: &'a str, tags: &'a [String], published: bool) -> BlogPostRecord<'a> {
    BlogPostRecord {
        title,
        slug,
        excerpt: Some("Excerpt"),
        content: "Content",
        tags,
        published,
    }
}

#[sqlx::test]
async fn test_blog_post_round_trip(pool: PgPool) {
    let db = TestDatabase::from_pool(pool);
    let tags = vec!["mowing".to_string(), "spring".to_string()];

    let created = db
        .blog_repo
        .create(&record("Spring Mowing", "spring-mowing", &tags, false), None)
        .await
        .unwrap();
    assert!(created.published_at.is_none());

    let found = db.blog_repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_posts_equal(&created, &found);
    assert_eq!(found.tags, tags);
}

#[sqlx::test]
async fn test_blog_published_at_stamped_once(pool: PgPool) {
    let db = TestDatabase::from_pool(pool);
    let tags = Vec::new();

    let post = db
        .blog_repo
        .create(&record("Draft", "draft", &tags, false), None)
        .await
        .unwrap();

    let published = db
        .blog_repo
        .update(post.id, &record("Draft", "draft", &tags, true))
        .await
        .unwrap()
        .unwrap();
    let first_stamp = published.published_at.expect("published_at should be set");

    let edited = db
        .blog_repo
        .update(post.id, &record("Edited", "draft", &tags, true))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(edited.published_at, Some(first_stamp));
    assert_eq!(edited.title, "Edited");
}

#[sqlx::test]
async fn test_blog_published_filters(pool: PgPool) {
    let db = TestDatabase::from_pool(pool);
    let mowing = vec!["mowing".to_string()];
    let empty = Vec::new();

    db.blog_repo.create(&record("A", "a", &mowing, true), None).await.unwrap();
    db.blog_repo.create(&record("B", "b", &empty, true), None).await.unwrap();
    db.blog_repo.create(&record("C", "c", &mowing, false), None).await.unwrap();

    assert_eq!(db.blog_repo.list_published(None).await.unwrap().len(), 2);
    assert_eq!(db.blog_repo.list_published(Some("mowing")).await.unwrap().len(), 1);
    assert_eq!(db.blog_repo.list_all().await.unwrap().len(), 3);

    assert!(db.blog_repo.find_published_by_slug("a").await.unwrap().is_some());
    assert!(db.blog_repo.find_published_by_slug("c").await.unwrap().is_none());

    assert!(db.blog_repo.slug_exists("a", None).await.unwrap());
    let a = db.blog_repo.find_published_by_slug("a").await.unwrap().unwrap();
    assert!(!db.blog_repo.slug_exists("a", Some(a.id)).await.unwrap());
}

// ============================================================================
// Email Template Repository Tests
// ============================================================================

#[sqlx::test]
async fn test_email_template_round_trip(pool: PgPool) {
    let db = TestDatabase::from_pool(pool);
    let style = EmailStyle {
        accent_color: "#00aa00".to_string(),
        ..EmailStyle::default()
    };

    let created = db
        .template_repo
        .create("spring-promo", "Spring is here", "<p>Hi {{name}}</p>", &style)
        .await
        .unwrap();

    let found = db.template_repo.find_by_name("spring-promo").await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.subject, "Spring is here");
    assert_eq!(found.html_content, "<p>Hi {{name}}</p>");
    assert_eq!(found.style.0, style);

    let updated = db
        .template_repo
        .update(created.id, "spring-promo", "Updated", "<p>New</p>", &EmailStyle::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.subject, "Updated");
    assert_eq!(updated.style.0, EmailStyle::default());

    assert!(db.template_repo.delete(created.id).await.unwrap());
    assert!(db.template_repo.find_by_id(created.id).await.unwrap().is_none());
}

// ============================================================================
// Quote Repository Tests
// ============================================================================

#[sqlx::test]
async fn test_quote_create_and_status(pool: PgPool) {
    let db = TestDatabase::from_pool(pool);

    let quote = db
        .quote_repo
        .create(&QuoteRecord {
            name: "Jane Doe",
            email: "jane@example.com",
            phone: None,
            address: Some("1 Elm St"),
            zip_code: "78701",
            service_slug: "mowing",
            lawn_size_sqft: Some(6000),
            message: None,
            estimated_price: Some(Decimal::new(5000, 2)),
        })
        .await
        .unwrap();

    assert_eq!(quote.status_enum(), QuoteStatus::New);
    assert_eq!(quote.estimated_price, Some(Decimal::new(5000, 2)));

    let contacted = db
        .quote_repo
        .update_status(quote.id, QuoteStatus::Contacted)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(contacted.status_enum(), QuoteStatus::Contacted);

    assert_eq!(db.quote_repo.list(Some(QuoteStatus::New)).await.unwrap().len(), 0);
    assert_eq!(db.quote_repo.list(Some(QuoteStatus::Contacted)).await.unwrap().len(), 1);
}

#[sqlx::test]
async fn test_quote_rejects_non_positive_lawn_size(pool: PgPool) {
    let db = TestDatabase::from_pool(pool);

    let result = db
        .quote_repo
        .create(&QuoteRecord {
            name: "Jane Doe",
            email: "jane@example.com",
            phone: None,
            address: None,
            zip_code: "78701",
            service_slug: "mowing",
            lawn_size_sqft: Some(0),
            message: None,
            estimated_price: None,
        })
        .await;

    assert!(result.is_err());
}
