//! # API Module
//!
//! HTTP interface of the content service.
//!
//! ## Endpoints Overview
//!
//! ### Content Collections
//! - `GET /api/content/{collection}[?id=]` - List a collection or get one document
//! - `POST /api/content/{collection}` - Create a document (admin)
//! - `PUT /api/content/{collection}?id=` - Shallow-merge update (admin)
//! - `DELETE /api/content/{collection}?id=` - Delete a document (admin)
//!
//! ### Site
//! - `GET /api/page` - Every public section in one response
//! - `GET /api/projects[?id=]` - Normalised project listing
//! - `POST /api/admin/projects`, `PUT|DELETE /api/admin/projects?id=` - Project editing (admin)
//! - `POST /api/contacts` - Public inquiry form
//! - `GET /api/forms/{collection}` - Form descriptors for the admin UI
//! - `POST /api/upload` - Image upload (admin)
//!
//! ### Sessions
//! - `POST /api/auth/login`, `POST /api/auth/logout`, `GET /api/auth/session`
//!
//! ### System Essentials
//! - `GET /health` - Health check
//! - `GET /api` - Endpoint index
//! - `GET /api/admin/stats` - Document counts (admin)
//! - `GET /api/store/status` - Backing store reachability (admin)

pub mod error;
pub mod extract;
pub mod handlers;
pub mod server;

// Re-export commonly used items
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use extract::{AdminSession, JsonRequest};
pub use server::{create_app, start_server};
