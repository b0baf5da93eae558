use tracing::{info, warn};

use crate::domain::entities::session::{AuthSession, Credentials};
use crate::domain::entities::validation::ValidationIssue;
use crate::usecase::ports::api::AdminApi;
use crate::usecase::services::submit::SubmitError;

pub struct AccountService<'a, A> {
    api: &'a A,
}

impl<'a, A: AdminApi> AccountService<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthSession, SubmitError> {
        credentials.validate().map_err(SubmitError::Invalid)?;
        let response = self.api.login(credentials).await.map_err(|err| {
            warn!(username = %credentials.username, error = %err, "login error");
            SubmitError::from(err)
        })?;
        let session = AuthSession::from_login(response, &credentials.username);
        info!(user_id = session.user_id, username = %session.username, "logged in");
        Ok(session)
    }

    /// Best effort: the local session is dropped by the caller whatever the
    /// backend answers.
    pub async fn logout(&self) {
        match self.api.logout().await {
            Ok(()) => info!("logged out"),
            Err(err) => warn!(error = %err, "logout request failed"),
        }
    }

    pub async fn update_account(
        &self,
        session: &AuthSession,
        credentials: &Credentials,
    ) -> Result<(), SubmitError> {
        credentials.validate().map_err(SubmitError::Invalid)?;
        self.api
            .update_user(session.user_id, credentials)
            .await
            .map_err(|err| {
                warn!(user_id = session.user_id, error = %err, "update error");
                SubmitError::from(err)
            })?;
        info!(user_id = session.user_id, "account updated");
        Ok(())
    }

    pub async fn register_user(
        &self,
        session: &AuthSession,
        credentials: &Credentials,
    ) -> Result<(), SubmitError> {
        if !session.is_super_admin {
            return Err(SubmitError::Invalid(vec![ValidationIssue::new(
                "account",
                "Only super administrators can create users",
            )]));
        }
        credentials.validate().map_err(SubmitError::Invalid)?;
        self.api.register_user(credentials).await.map_err(|err| {
            warn!(error = %err, "create user error");
            SubmitError::from(err)
        })?;
        info!(username = %credentials.username, "user created");
        Ok(())
    }
}
