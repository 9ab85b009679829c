//! Authentication and authorization module

pub mod clock;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod resolver;

pub use clock::{Clock, SystemClock};
pub use jwt::{Claims, JwtService, TokenKind, TokenPair};
pub use middleware::{extract_token, AdminUser, CurrentUser};
pub use password::PasswordHasher;
pub use resolver::{
    require_elevated, AuthenticatedIdentity, CredentialRecord, CredentialStore, IdentityResolver,
};
