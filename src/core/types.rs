use anyhow::Result;

use crate::error::AuthError;
use crate::input::Credentials;

/// Raw body and HTTP status of one listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    pub status: u16,
    pub body: String,
}

impl PageResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fetches listing pages within one authenticated session. Page numbers
/// start at 1.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<PageResponse>;
}

/// Something that can log in and hand out a session exclusively owned by
/// the caller.
#[async_trait::async_trait]
pub trait Portal: Send + Sync {
    type Session: PageFetcher;

    async fn authenticate(&self, credentials: Credentials) -> Result<Self::Session, AuthError>;
}
