pub mod claims;
pub mod errors;
pub mod issuer;
pub mod validator;

pub use claims::Claims;
pub use errors::TokenError;
pub use issuer::TokenIssuer;
pub use issuer::ACCESS_TOKEN_LIFETIME_SECS;
pub use validator::TokenValidator;
