//! Authentication primitives library
//!
//! Provides the two leaf building blocks of the credential flow:
//! - Password hashing (Argon2id, salted, constant-time verification)
//! - Signed, time-bounded bearer tokens (HS256 JWT)
//!
//! Neither component touches storage or holds mutable state; the service crate
//! wires them together with a credential store.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("other_password", &hash));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::TokenService;
//! use chrono::Duration;
//!
//! let tokens = TokenService::new(b"secret_key_at_least_32_bytes_long!");
//! let issued = tokens.issue("alice", Duration::hours(1)).unwrap();
//! let subject = tokens.verify(&issued.token).unwrap();
//! assert_eq!(subject, "alice");
//! ```

pub mod password;
pub mod token;

pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::IssuedToken;
pub use token::TokenError;
pub use token::TokenService;
