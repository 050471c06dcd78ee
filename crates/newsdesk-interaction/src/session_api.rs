use crate::client::ApiClient;
use async_trait::async_trait;
use newsdesk_core::ApiError;
use newsdesk_core::session::{Account, CredentialCheck, LoginGrant, SessionApi};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    access_token: String,
    user: Account,
}

#[derive(Deserialize)]
struct ValidateResponse {
    valid: bool,
    #[serde(default)]
    user: Option<Account>,
}

/// [`SessionApi`] over `POST /auth/login` and `POST /auth/validate`.
#[derive(Debug, Clone)]
pub struct HttpSessionApi {
    client: ApiClient,
}

impl HttpSessionApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SessionApi for HttpSessionApi {
    async fn login(&self, username: &str, password: &str) -> Result<LoginGrant, ApiError> {
        let response: LoginResponse = self
            .client
            .post_json("/auth/login", &LoginRequest { username, password }, None)
            .await?;

        Ok(LoginGrant {
            credential: response.access_token,
            account: response.user,
        })
    }

    async fn validate_credential(&self, credential: &str) -> Result<CredentialCheck, ApiError> {
        match self
            .client
            .post_empty::<ValidateResponse>("/auth/validate", Some(credential))
            .await
        {
            Ok(response) => Ok(CredentialCheck {
                valid: response.valid,
                account: response.user,
            }),
            // The backend answers an expired or unknown token with 401.
            Err(e) if e.is_unauthorized() => Ok(CredentialCheck::invalid()),
            Err(e) => Err(e),
        }
    }
}
