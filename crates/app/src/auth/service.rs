//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{Span, debug};

use crate::{
    auth::{
        ApiTokenMetadata, ApiTokenSecret, ApiTokenUuid, ApiTokenVersion, AuthServiceError,
        IssuedApiToken, NewApiToken, format_api_token, hash_api_token, parse_api_token,
        repository::PgAuthRepository, verifiers_match,
    },
    database::Db,
    domain::users::records::UserUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    db: Db,
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAuthRepository::new(),
        }
    }

    /// Issue a new API token for the given user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::InvalidReference`] when the user does not exist.
    #[tracing::instrument(name = "auth.service.issue_api_token", skip(self), err)]
    pub async fn issue_api_token(
        &self,
        user_uuid: UserUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token_uuid = ApiTokenUuid::new();
        let version = ApiTokenVersion::V1;
        let secret = ApiTokenSecret::generate();

        let token = format_api_token(token_uuid, version, &secret);

        let mut tx = self.db.begin().await?;

        let metadata = self
            .repository
            .create_api_token(
                &mut tx,
                NewApiToken {
                    uuid: token_uuid,
                    user_uuid,
                    version,
                    token_hash: hash_api_token(token_uuid, version, user_uuid, &secret),
                    expires_at,
                },
            )
            .await?;

        tx.commit().await?;

        Ok(IssuedApiToken { token, metadata })
    }

    /// List all tokens for the given user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_api_tokens(
        &self,
        user_uuid: UserUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let tokens = self.repository.list_api_tokens(&mut tx, user_uuid).await?;

        tx.commit().await?;

        Ok(tokens)
    }

    /// Revoke a token. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(&self, token: ApiTokenUuid) -> Result<bool, AuthServiceError> {
        let mut tx = self.db.begin().await?;

        let revoked = self.repository.revoke_api_token(&mut tx, token).await?;

        tx.commit().await?;

        Ok(revoked.is_some())
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    #[tracing::instrument(
        name = "auth.service.authenticate_bearer",
        skip(self, bearer_token),
        fields(token_uuid = tracing::field::Empty),
        err
    )]
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError> {
        let parsed =
            parse_api_token(bearer_token).map_err(|_ignored| AuthServiceError::NotFound)?;

        Span::current().record("token_uuid", tracing::field::display(parsed.token_uuid));

        let mut tx = self.db.begin().await?;

        let token = self
            .repository
            .find_active_api_token(&mut tx, parsed.token_uuid, parsed.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        tx.commit().await?;

        let expected = hash_api_token(
            parsed.token_uuid,
            parsed.version,
            token.user_uuid,
            &parsed.secret,
        );

        if token.version != parsed.version || !verifiers_match(&token.token_hash, &expected) {
            return Err(AuthServiceError::NotFound);
        }

        // Usage tracking never fails an otherwise valid request.
        if let Err(error) = self.touch(parsed.token_uuid).await {
            debug!(%error, "failed to record token use");
        }

        Ok(token.user_uuid)
    }
}

impl PgAuthService {
    async fn touch(&self, token: ApiTokenUuid) -> Result<(), AuthServiceError> {
        let mut tx = self.db.begin().await?;

        self.repository.touch_api_token(&mut tx, token).await?;

        tx.commit().await?;

        Ok(())
    }
}

/// Resolves bearer credentials to the shopper they belong to.
#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn issued_token_authenticates_as_its_user() -> TestResult {
        let ctx = TestContext::new().await;

        let issued = ctx.auth.issue_api_token(ctx.user_uuid, None).await?;

        let user = ctx.auth.authenticate_bearer(&issued.token).await?;

        assert_eq!(user, ctx.user_uuid);

        let tokens = ctx.auth.list_api_tokens(ctx.user_uuid).await?;

        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].last_used_at.is_some(), "use should be recorded");

        Ok(())
    }

    #[tokio::test]
    async fn tampered_secret_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        let issued = ctx.auth.issue_api_token(ctx.user_uuid, None).await?;

        let (head, _) = issued.token.split_once('.').ok_or("malformed token")?;
        let forged = format!("{head}.{}", "0".repeat(64));

        let result = ctx.auth.authenticate_bearer(&forged).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn revoked_token_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        let issued = ctx.auth.issue_api_token(ctx.user_uuid, None).await?;

        assert!(ctx.auth.revoke_api_token(issued.metadata.uuid).await?);
        assert!(!ctx.auth.revoke_api_token(issued.metadata.uuid).await?);

        let result = ctx.auth.authenticate_bearer(&issued.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn expired_token_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        let issued = ctx
            .auth
            .issue_api_token(
                ctx.user_uuid,
                Some(Timestamp::now() - SignedDuration::from_mins(1)),
            )
            .await?;

        let result = ctx.auth.authenticate_bearer(&issued.token).await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn garbage_bearer_is_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.auth.authenticate_bearer("not-a-token").await;

        assert!(
            matches!(result, Err(AuthServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn issuing_for_unknown_user_is_invalid_reference() {
        let ctx = TestContext::new().await;

        let result = ctx.auth.issue_api_token(UserUuid::new(), None).await;

        assert!(
            matches!(result, Err(AuthServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );
    }
}
