pub mod blog_post_repository;
pub mod email_template_repository;
pub mod quote_repository;
pub mod user_repository;
pub mod waitlist_repository;

// Re-export all repositories for convenient access
pub use blog_post_repository::BlogPostRepository;
pub use email_template_repository::EmailTemplateRepository;
pub use quote_repository::QuoteRepository;
pub use user_repository::UserRepository;
pub use waitlist_repository::WaitlistRepository;
