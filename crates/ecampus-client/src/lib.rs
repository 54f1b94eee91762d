//! E-Campus Backend Client
//!
//! Connects the wizard and the schema editor to the portal backend:
//! - [`AdmissionApi`] seam with the reqwest-based [`HttpBackend`]
//! - [`SessionContext`] holding the credential, cleared on any 401
//! - [`ApplicationSession`] for applicants, [`EditorSession`] for content administrators
//! - [`ClientConfig`] loaded from TOML and the environment
//!
//! # Example
//!
//! ```rust
//! use ecampus_client::{ClientConfig, HttpBackend, SchemaFallback, SessionContext};
//! use std::sync::Arc;
//!
//! let config = ClientConfig::default()
//!     .with_base_url("https://portal.example.edu")
//!     .with_schema_fallback(SchemaFallback::FailClosed);
//! let session = Arc::new(SessionContext::new().with_student_id("s-1"));
//! let backend = HttpBackend::new(config, session).unwrap();
//! assert!(!backend.session().is_authenticated());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod api;
pub mod application;
pub mod config;
pub mod editor;
pub mod error;
pub mod http;
pub mod session;

pub use api::{AdmissionApi, ApiError, ApiMessage};
pub use application::ApplicationSession;
pub use config::{ClientConfig, ConfigError, EnvOverrides, SchemaFallback};
pub use editor::EditorSession;
pub use error::SessionError;
pub use http::HttpBackend;
pub use session::SessionContext;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for talking to the backend
    pub use crate::{
        AdmissionApi, ApiError, ApplicationSession, ClientConfig, EditorSession, HttpBackend,
        SchemaFallback, SessionContext, SessionError,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
