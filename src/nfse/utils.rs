use anyhow::Result;
use url::Url;

pub const LOGIN_PATH: &str = "/EmissorNacional/Login";
pub const ISSUED_NOTES_PATH: &str = "/EmissorNacional/Notas/Emitidas";

pub fn login_url(portal_url: &Url) -> Result<Url> {
    Ok(portal_url.join(LOGIN_PATH)?)
}

/// Page 1 is the bare listing URL; later pages add `?pg=N`.
pub fn page_url(portal_url: &Url, page: u32) -> Result<Url> {
    let mut url = portal_url.join(ISSUED_NOTES_PATH)?;
    if page > 1 {
        url.query_pairs_mut().append_pair("pg", &page.to_string());
    }
    Ok(url)
}

/// The portal bounces rejected logins back to a login URL.
pub fn is_login_url(url: &Url) -> bool {
    url.path().to_ascii_lowercase().contains("login")
}
