use std::sync::Arc;

use async_trait::async_trait;
use auth::LookupError;
use auth::PrincipalLookup;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::ports::UserRepository;

/// Resolves token subjects to users for the auth gate.
///
/// Backed by whichever `UserRepository` the service was built with: Postgres
/// in production, an in-memory store in tests.
pub struct UserPrincipalLookup<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
}

impl<UR> UserPrincipalLookup<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<UR> PrincipalLookup for UserPrincipalLookup<UR>
where
    UR: UserRepository,
{
    type Principal = User;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, LookupError> {
        // Subjects are minted from UserId, so anything else cannot name a user
        let user_id = match UserId::from_string(id) {
            Ok(user_id) => user_id,
            Err(e) => {
                tracing::debug!(error = %e, "Token subject is not a user id");
                return Ok(None);
            }
        };

        self.repository
            .find_by_id(&user_id)
            .await
            .map_err(|e| LookupError(e.to_string()))
    }
}
