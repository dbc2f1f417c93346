pub mod blog_service;
pub mod email_service;
pub mod quote_service;
pub mod user_service;
pub mod waitlist_service;

pub use blog_service::BlogService;
pub use email_service::{EmailService, RenderedEmail};
pub use quote_service::QuoteService;
pub use user_service::{LoginResponse, UserService};
pub use waitlist_service::{PendingVerification, WaitlistService};
