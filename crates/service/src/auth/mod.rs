//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Login checks the employee's argon2 hash and opens a server-side session keyed
//! by an opaque token.

pub mod domain;
pub mod errors;
pub mod password;
pub mod repository;
pub mod service;
pub mod session;
pub mod repo;

pub use service::AuthService;
