//! Authentication and authorization
//!
//! Identity is established by a server-side session referenced from an
//! HttpOnly cookie; authorization is enforced by the role-guard
//! extractors in [`extractor`].
//!
//! - [`password`] - argon2 password hashing and verification
//! - [`session`] - session store and principal references
//! - [`extractor`] - request guards resolving the current principal

pub mod extractor;
pub mod password;
pub mod session;

pub use extractor::{CurrentCustomer, CurrentMerchant, CurrentPrincipal};
pub use session::{PrincipalRef, SessionStore};
