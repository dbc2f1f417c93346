//! Domain models for the Greenkeep backend.
//!
//! This module contains the database-backed records and the request
//! payloads accepted by the JSON API.

pub mod blog_post;
pub mod email_template;
pub mod quote;
pub mod user;
pub mod waitlist;

// Re-export all models for convenient access
pub use blog_post::{BlogPost, BlogPostInput};
pub use email_template::{EmailStyle, EmailTemplate, EmailTemplateInput};
pub use quote::{QuoteRequest, QuoteRequestInput, QuoteStatus};
pub use user::{NewUserInput, User};
pub use waitlist::{WaitlistEntry, WaitlistStats};
