#![allow(dead_code)]

use faturamento::FaturamentoConfig;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CNPJ: &str = "12345678000199";
pub const PASSWORD: &str = "senha-certa";
pub const TOKEN: &str = "CfDJ8-token-123";
pub const SESSION_COOKIE: &str = "portal_session=abc123";

pub const LOGIN_PATH: &str = "/EmissorNacional/Login";
pub const NOTES_PATH: &str = "/EmissorNacional/Notas/Emitidas";

pub fn login_page(token: Option<&str>) -> String {
    let token_input = token
        .map(|t| format!(r#"<input name="__RequestVerificationToken" type="hidden" value="{}" />"#, t))
        .unwrap_or_default();
    format!(
        r#"<html><body><form action="{}" method="post">{}
            <input name="Inscricao" type="text" /><input name="Senha" type="password" />
        </form></body></html>"#,
        LOGIN_PATH, token_input
    )
}

pub fn row(issued: bool, competence: &str, value: &str) -> String {
    let icon = if issued { "tb-gerada.svg" } else { "tb-cancelada.svg" };
    format!(
        r#"<tr><td class="td-situacao"><img src="/EmissorNacional/img/{}"></td><td class="td-competencia">{}</td><td class="td-valor">{}</td></tr>"#,
        icon, competence, value
    )
}

pub fn notes_page(rows: &[String], next_page: Option<u32>) -> String {
    let next = match next_page {
        Some(n) => format!(r#"<a title="Próxima" href="{}?pg={}">›</a>"#, NOTES_PATH, n),
        None => r#"<a title="Próxima" href="javascript:;">›</a>"#.to_string(),
    };
    format!(
        r#"<html><body><table class="table"><thead><tr><th>Situação</th><th>Competência</th><th>Valor</th></tr></thead>
        <tbody>{}</tbody></table><div class="paginacao">{}</div></body></html>"#,
        rows.concat(),
        next
    )
}

pub fn config_for(server: &MockServer) -> FaturamentoConfig {
    FaturamentoConfig {
        portal_url: Url::parse(&server.uri()).unwrap(),
        timeout: Duration::from_secs(2),
        max_pages: 50,
        ..FaturamentoConfig::default()
    }
}

/// Login page plus a POST that accepts only the right password.
pub async fn mount_login(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(LOGIN_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", format!("{}; Path=/", SESSION_COOKIE).as_str())
                .set_body_string(login_page(Some(TOKEN))),
        )
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .and(header("cookie", SESSION_COOKIE))
        .and(body_string_contains(format!("__RequestVerificationToken={}", TOKEN).as_str()))
        .and(body_string_contains(format!("Inscricao={}", CNPJ).as_str()))
        .and(body_string_contains(format!("Senha={}", PASSWORD).as_str()))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/EmissorNacional/Dashboard"))
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "/EmissorNacional/Login?ReturnUrl=%2FEmissorNacional"),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/EmissorNacional/Dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>Bem-vindo</body></html>"))
        .mount(server)
        .await;
}

/// Serves `pages[i]` as page `i + 1`, only to requests carrying the session cookie.
pub async fn mount_pages(server: &MockServer, pages: &[String]) {
    for (i, body) in pages.iter().enumerate() {
        let page = i + 1;
        let mock = Mock::given(method("GET"))
            .and(path(NOTES_PATH))
            .and(header("cookie", SESSION_COOKIE));
        let mock = if page == 1 {
            mock.and(query_param_is_missing("pg"))
        } else {
            mock.and(query_param("pg", page.to_string().as_str()))
        };
        mock.respond_with(ResponseTemplate::new(200).set_body_string(body.clone()))
            .expect(1)
            .mount(server)
            .await;
    }
}
