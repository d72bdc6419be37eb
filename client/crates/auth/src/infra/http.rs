//! HTTP Authority Gateway
//!
//! Talks to the remote authority's `/auth/*` endpoints over JSON.

use platform::http::{HttpConfig, build_client, endpoint, post_empty, post_json};
use serde::Serialize;
use url::Url;

use crate::domain::entity::authority::{LinkDispatch, SessionCheck, TokenVerification};
use crate::domain::repository::AuthorityGateway;
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

pub const CHECK_PATH: &str = "/auth/check";
pub const MAGIC_LINK_PATH: &str = "/auth/magic-link";
pub const VERIFY_TOKEN_PATH: &str = "/auth/verify-token";
pub const LOGOUT_PATH: &str = "/auth/logout";

#[derive(Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct TokenBody<'a> {
    token: &'a str,
}

/// Authority gateway over `reqwest`
#[derive(Debug, Clone)]
pub struct HttpAuthorityGateway {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpAuthorityGateway {
    pub fn new(config: &HttpConfig) -> AuthResult<Self> {
        Ok(Self {
            client: build_client(config)?,
            base_url: config.base_url.clone(),
        })
    }

    /// Gateway sharing an existing client
    pub fn with_client(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

impl AuthorityGateway for HttpAuthorityGateway {
    async fn check_session(&self, email: &Email) -> AuthResult<SessionCheck> {
        let url = endpoint(&self.base_url, CHECK_PATH)?;
        let body = EmailBody {
            email: email.as_str(),
        };
        Ok(post_json(&self.client, url, Some(&body)).await?)
    }

    async fn request_magic_link(&self, email: &Email) -> AuthResult<LinkDispatch> {
        let url = endpoint(&self.base_url, MAGIC_LINK_PATH)?;
        let body = EmailBody {
            email: email.as_str(),
        };
        Ok(post_json(&self.client, url, Some(&body)).await?)
    }

    async fn verify_token(&self, token: &str) -> AuthResult<TokenVerification> {
        let url = endpoint(&self.base_url, VERIFY_TOKEN_PATH)?;
        Ok(post_json(&self.client, url, Some(&TokenBody { token })).await?)
    }

    async fn logout(&self) -> AuthResult<()> {
        let url = endpoint(&self.base_url, LOGOUT_PATH)?;
        let status = post_empty(&self.client, url).await?;
        tracing::debug!(status = status.as_u16(), "Authority acknowledged logout");
        Ok(())
    }
}
