use crate::domain::entities::Token;
use crate::domain::errors::SyncError;
use crate::domain::ports::StateStore;
use crate::domain::remote::{CommentsApi, RegisterOutcome, RegistrationFields};
use crate::use_cases::mirror::StateMirror;

// Response returned by the logout use case.
#[derive(Debug, PartialEq, Eq)]
pub struct LogoutResponse {
    pub success: bool,
}

// Owns the link between remote auth responses and the cached token.
pub struct CredentialBroker<A, S> {
    pub api: A,
    pub mirror: StateMirror<S>,
}

impl<A, S> CredentialBroker<A, S>
where
    A: CommentsApi,
    S: StateStore,
{
    pub async fn login(&self, username: &str, password: &str) -> Result<Token, SyncError> {
        let token = self.api.login(username, password).await.map_err(|err| {
            tracing::warn!(error = %err, "login rejected by auth issuer.");
            SyncError::Remote(err)
        })?;

        self.mirror.save_token(&token).await?;
        Ok(token)
    }

    // The client id is injected by the API client, which owns the client credentials.
    pub async fn register(&self, fields: RegistrationFields) -> Result<Token, SyncError> {
        let outcome = self.api.register(fields).await.map_err(|err| {
            tracing::warn!(error = %err, "registration failed.");
            SyncError::Remote(err)
        })?;

        match outcome {
            RegisterOutcome::Rejected { errors } => Err(SyncError::Rejected { errors }),
            RegisterOutcome::Issued(token) => {
                self.mirror.save_token(&token).await?;
                Ok(token)
            }
        }
    }

    // Drops the cached token and site. Succeeds when nothing is cached.
    pub async fn logout(&self) -> Result<LogoutResponse, SyncError> {
        self.mirror.clear_all().await?;
        Ok(LogoutResponse { success: true })
    }

    pub async fn cached_token(&self) -> Result<Option<Token>, SyncError> {
        self.mirror.token().await
    }
}
