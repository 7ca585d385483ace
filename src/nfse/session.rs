//! Login handshake against the NFS-e portal.
//!
//! The portal uses an ASP.NET style form: a GET of the login page hands out
//! an anti-forgery token and cookies, and a POST of the token plus the
//! credentials either lands somewhere inside the portal or bounces back to
//! the login page. Every session gets its own client and cookie jar.

use anyhow::Result;
use once_cell::sync::Lazy;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, UPGRADE_INSECURE_REQUESTS};
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

use super::utils::{is_login_url, login_url, page_url};
use crate::core::config::FaturamentoConfig;
use crate::core::types::{PageFetcher, PageResponse, Portal};
use crate::error::AuthError;
use crate::input::Credentials;

pub const TOKEN_FIELD: &str = "__RequestVerificationToken";

static TOKEN_INPUT: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(&format!(r#"input[name="{}"]"#, TOKEN_FIELD)).expect("token selector is valid")
});

/// Why a login failed. Only ever logged; callers see a plain `AuthError`.
#[derive(Debug, Error)]
enum LoginFailure {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error("login page has no {} field", TOKEN_FIELD)]
    MissingToken,
    #[error("credentials rejected, landed on {0}")]
    Rejected(Url),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// The real portal, reached over HTTPS.
#[derive(Clone, Debug)]
pub struct NfsePortal {
    config: FaturamentoConfig,
}

/// An authenticated session. Dropping it discards the cookies.
pub struct PortalSession {
    client: Client,
    portal_url: Url,
}

impl NfsePortal {
    pub fn new(config: FaturamentoConfig) -> Self {
        Self { config }
    }

    fn build_client(&self) -> reqwest::Result<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("pt-BR,pt;q=0.9,en-US;q=0.8,en;q=0.7"),
        );
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        Client::builder()
            .user_agent(self.config.user_agent.clone())
            .default_headers(headers)
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(self.config.timeout)
            .build()
    }

    async fn login(&self, client: &Client, credentials: &Credentials) -> Result<(), LoginFailure> {
        let url = login_url(&self.config.portal_url)?;

        log::debug!("Fetching login page {}", url);
        let response = client.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(LoginFailure::Status(response.status()));
        }
        let page = response.text().await?;
        let token = extract_token(&page).ok_or(LoginFailure::MissingToken)?;

        log::debug!("Posting credentials for {}", credentials.identifier());
        let response = client
            .post(url)
            .form(&[
                (TOKEN_FIELD, token.as_str()),
                ("Inscricao", credentials.identifier()),
                ("Senha", credentials.secret()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(LoginFailure::Status(response.status()));
        }
        if is_login_url(response.url()) {
            return Err(LoginFailure::Rejected(response.url().clone()));
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl Portal for NfsePortal {
    type Session = PortalSession;

    async fn authenticate(&self, credentials: Credentials) -> Result<PortalSession, AuthError> {
        let client = self.build_client().map_err(|e| {
            log::error!("Could not build HTTP client: {}", e);
            AuthError
        })?;

        match self.login(&client, &credentials).await {
            Ok(()) => {
                log::info!("Logged in as {}", credentials.identifier());
                Ok(PortalSession {
                    client,
                    portal_url: self.config.portal_url.clone(),
                })
            }
            Err(failure) => {
                log::debug!("Login failed: {}", failure);
                Err(AuthError)
            }
        }
    }
}

#[async_trait::async_trait]
impl PageFetcher for PortalSession {
    async fn fetch_page(&self, page: u32) -> Result<PageResponse> {
        let url = page_url(&self.portal_url, page)?;
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(PageResponse { status, body })
    }
}

/// Reads the hidden anti-forgery token from a login form. A field without
/// a value counts as missing.
pub fn extract_token(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&TOKEN_INPUT)
        .filter_map(|input| input.value().attr("value"))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}
