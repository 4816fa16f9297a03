//! Administrator endpoints: sign-in, profile and account management.

use bicho_core::AdministratorId;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use super::{
    Administrator, AdministratorInput, ApiError, BackendClient, PasswordInput, SignInPayload,
    segment,
};

impl BackendClient {
    /// Exchange credentials for a bearer token.
    ///
    /// The backend reads the credentials from the `bank_account` and
    /// `password` request headers.
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the credentials or is unreachable.
    #[instrument(skip(self, bank_account, password))]
    pub async fn authenticate(
        &self,
        bank_account: &str,
        password: &SecretString,
    ) -> Result<SignInPayload, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/administrator/auth"))
            .header("bank_account", bank_account)
            .header("password", password.expose_secret())
            .json(&serde_json::json!({}))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Profile of the administrator owning the bearer token.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the token is not accepted.
    #[instrument(skip(self))]
    pub async fn my_profile(&self) -> Result<Option<Administrator>, ApiError> {
        self.get("/administrator/me/profile").await
    }

    /// List every administrator.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn list_administrators(&self) -> Result<Vec<Administrator>, ApiError> {
        self.get("/administrator/").await
    }

    /// Get one administrator, `None` if the backend has no such record.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self), fields(administrator_id = %id))]
    pub async fn get_administrator(
        &self,
        id: &AdministratorId,
    ) -> Result<Option<Administrator>, ApiError> {
        match self
            .get(&format!("/administrator/{}", segment(id.as_str())))
            .await
        {
            Err(ApiError::NotFound(_)) => Ok(None),
            other => other,
        }
    }

    /// Register a new administrator.
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the input.
    #[instrument(skip(self, input), fields(role = %input.role))]
    pub async fn create_administrator(&self, input: &AdministratorInput) -> Result<(), ApiError> {
        let _: serde_json::Value = self.post("/administrator/create", input).await?;
        Ok(())
    }

    /// Replace an administrator's role, contact data and password.
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the input.
    #[instrument(skip(self, input), fields(administrator_id = %id))]
    pub async fn update_administrator(
        &self,
        id: &AdministratorId,
        input: &AdministratorInput,
    ) -> Result<(), ApiError> {
        self.patch(
            &format!("/administrator/update/{}", segment(id.as_str())),
            Some(input),
        )
        .await
    }

    /// Change an administrator's password.
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the password.
    #[instrument(skip(self, password), fields(administrator_id = %id))]
    pub async fn update_password(
        &self,
        id: &AdministratorId,
        password: &SecretString,
    ) -> Result<(), ApiError> {
        let body = PasswordInput {
            password: password.expose_secret().to_string(),
        };
        self.patch(
            &format!("/administrator/update/password/{}", segment(id.as_str())),
            Some(&body),
        )
        .await
    }

    /// Delete an administrator.
    ///
    /// # Errors
    ///
    /// Returns error if the backend refuses.
    #[instrument(skip(self), fields(administrator_id = %id))]
    pub async fn delete_administrator(&self, id: &AdministratorId) -> Result<(), ApiError> {
        self.delete(&format!("/administrator/delete/{}", segment(id.as_str())))
            .await
    }
}
