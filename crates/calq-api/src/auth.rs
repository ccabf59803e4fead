//! Authentication and profile endpoints.

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use calq_core::api::AuthApi;
use calq_core::error::{CalqError, Result};
use calq_core::profile::{Profile, ProfileField};

use crate::client::ApiClient;

const LOGIN_PATH: &str = "/api/auth/login/";
const REGISTER_PATH: &str = "/api/auth/register/";
const LOGOUT_PATH: &str = "/api/auth/logout/";
const PROFILE_PATH: &str = "/api/auth/profile/";
const DELETE_ACCOUNT_PATH: &str = "/api/auth/deletar-conta/";

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    senha: &'a str,
}

/// The login endpoint wraps the profile; the envelope key has drifted
/// between `user` and `usuario` across server versions, so both are
/// accepted, and an envelope without a profile falls back to a profile
/// fetch over the fresh session.
#[derive(Deserialize)]
struct LoginResponse {
    #[serde(alias = "usuario")]
    user: Option<Profile>,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    nome: &'a str,
    email: &'a str,
    senha: &'a str,
    confirmar_senha: &'a str,
}

/// Registration answers either `{user: profile, ...}` or the bare profile.
#[derive(Deserialize)]
#[serde(untagged)]
enum RegisterResponse {
    Enveloped { user: Profile },
    Bare(Profile),
}

impl RegisterResponse {
    fn into_profile(self) -> Profile {
        match self {
            RegisterResponse::Enveloped { user } => user,
            RegisterResponse::Bare(profile) => profile,
        }
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<Profile> {
        tracing::debug!(email, "logging in");

        let body = LoginRequest {
            email,
            senha: password,
        };
        let builder = self.request(Method::POST, LOGIN_PATH)?.json(&body);
        let response: LoginResponse = self.execute_public(builder, "Erro ao fazer login").await?;

        match response.user {
            Some(profile) => Ok(profile),
            None => self.fetch_profile().await,
        }
    }

    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Profile> {
        tracing::debug!(email, "registering account");

        let body = RegisterRequest {
            nome: name,
            email,
            senha: password,
            confirmar_senha: confirm_password,
        };
        let builder = self.request(Method::POST, REGISTER_PATH)?.json(&body);
        let response: RegisterResponse = self
            .execute_public(builder, "Erro ao registrar usuário")
            .await?;

        Ok(response.into_profile())
    }

    async fn logout(&self) -> Result<()> {
        let builder = self.request(Method::POST, LOGOUT_PATH)?;
        self.execute_discarding(builder, "Erro ao fazer logout").await
    }

    async fn fetch_profile(&self) -> Result<Profile> {
        let builder = self.request(Method::GET, PROFILE_PATH)?;
        self.execute(builder, "Erro ao carregar perfil").await
    }

    async fn verify_session(&self) -> Result<Profile> {
        match tokio::time::timeout(self.verify_timeout(), self.fetch_profile()).await {
            Ok(result) => result,
            Err(_) => {
                tracing::debug!("profile verification timed out");
                Err(CalqError::network("verificação de sessão expirou"))
            }
        }
    }

    async fn update_profile_field(
        &self,
        user_id: i64,
        field: ProfileField,
        value: &str,
    ) -> Result<Profile> {
        tracing::debug!(user_id, field = field.wire_name(), "updating profile field");

        let path = format!("/api/usuarios/{user_id}/");
        let body = std::collections::HashMap::from([(field.wire_name(), value)]);
        let builder = self.request(Method::PATCH, &path)?.json(&body);
        self.execute(builder, "Erro ao atualizar perfil").await
    }

    async fn delete_account(&self) -> Result<()> {
        tracing::debug!("deleting account");

        let builder = self.request(Method::DELETE, DELETE_ACCOUNT_PATH)?;
        self.execute_discarding(builder, "Erro ao deletar conta")
            .await
    }
}
