use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Raw inputs as typed by a user or posted to the API. Absent fields come
/// through empty so `validate` reports them.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct FaturamentoRequest {
    pub cnpj: String,
    pub senha: String,
    pub ano: String,
    pub mes: Option<String>,
}

impl fmt::Debug for FaturamentoRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaturamentoRequest")
            .field("cnpj", &self.cnpj)
            .field("senha", &"***")
            .field("ano", &self.ano)
            .field("mes", &self.mes)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("CNPJ é obrigatório!")]
    MissingCnpj,
    #[error("Senha é obrigatória!")]
    MissingSenha,
    #[error("Ano é obrigatório e deve ter 4 dígitos!")]
    InvalidYear,
    #[error("Mês inválido! Digite um número entre 1 e 12.")]
    InvalidMonth,
}

/// Portal login. The secret is consumed by authentication and never printed.
#[derive(Clone)]
pub struct Credentials {
    identifier: String,
    secret: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"***")
            .finish()
    }
}

/// Year, optionally narrowed to a month in `1..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodFilter {
    year: i32,
    month: Option<u32>,
}

impl PeriodFilter {
    pub fn new(year: i32, month: Option<u32>) -> Result<Self, InputError> {
        if !(1000..=9999).contains(&year) {
            return Err(InputError::InvalidYear);
        }
        if let Some(m) = month {
            if !(1..=12).contains(&m) {
                return Err(InputError::InvalidMonth);
            }
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> Option<u32> {
        self.month
    }

    /// `"03/2025"` or `"2025"`.
    pub fn period_label(&self) -> String {
        match self.month {
            Some(m) => format!("{:02}/{}", m, self.year),
            None => self.year.to_string(),
        }
    }

    /// `"03"` or `"Ano todo"`.
    pub fn month_label(&self) -> String {
        match self.month {
            Some(m) => format!("{:02}", m),
            None => "Ano todo".to_string(),
        }
    }
}

pub fn validate_cnpj(cnpj: &str) -> Result<String, InputError> {
    let cnpj = cnpj.trim();
    if cnpj.is_empty() {
        return Err(InputError::MissingCnpj);
    }
    Ok(cnpj.to_string())
}

pub fn validate_senha(senha: &str) -> Result<String, InputError> {
    let senha = senha.trim();
    if senha.is_empty() {
        return Err(InputError::MissingSenha);
    }
    Ok(senha.to_string())
}

pub fn validate_year(ano: &str) -> Result<i32, InputError> {
    let ano = ano.trim();
    if ano.len() != 4 || !ano.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InputError::InvalidYear);
    }
    ano.parse().map_err(|_| InputError::InvalidYear)
}

/// Blank means the whole year.
pub fn validate_month(mes: &str) -> Result<Option<u32>, InputError> {
    let mes = mes.trim();
    if mes.is_empty() {
        return Ok(None);
    }
    if !mes.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InputError::InvalidMonth);
    }
    match mes.parse::<u32>() {
        Ok(m) if (1..=12).contains(&m) => Ok(Some(m)),
        _ => Err(InputError::InvalidMonth),
    }
}

impl FaturamentoRequest {
    pub fn validate(&self) -> Result<(Credentials, PeriodFilter), InputError> {
        let cnpj = validate_cnpj(&self.cnpj)?;
        let senha = validate_senha(&self.senha)?;
        let year = validate_year(&self.ano)?;
        let month = validate_month(self.mes.as_deref().unwrap_or(""))?;

        Ok((Credentials::new(cnpj, senha), PeriodFilter::new(year, month)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(cnpj: &str, senha: &str, ano: &str, mes: Option<&str>) -> FaturamentoRequest {
        FaturamentoRequest {
            cnpj: cnpj.to_string(),
            senha: senha.to_string(),
            ano: ano.to_string(),
            mes: mes.map(str::to_string),
        }
    }

    #[test]
    fn test_validate_full_request() {
        let (credentials, filter) = request(" 12345678000199 ", "s3cret", "2025", Some("3"))
            .validate()
            .unwrap();
        assert_eq!(credentials.identifier(), "12345678000199");
        assert_eq!(credentials.secret(), "s3cret");
        assert_eq!(filter.year(), 2025);
        assert_eq!(filter.month(), Some(3));
        assert_eq!(filter.month_label(), "03");
        assert_eq!(filter.period_label(), "03/2025");
    }

    #[test]
    fn test_whole_year() {
        for mes in [None, Some(""), Some("  ")] {
            let (_, filter) = request("1", "x", "2024", mes).validate().unwrap();
            assert_eq!(filter.month(), None);
            assert_eq!(filter.month_label(), "Ano todo");
            assert_eq!(filter.period_label(), "2024");
        }
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(request("", "x", "2025", None).validate().unwrap_err(), InputError::MissingCnpj);
        assert_eq!(request("1", " ", "2025", None).validate().unwrap_err(), InputError::MissingSenha);
        assert_eq!(request("1", "x", "25", None).validate().unwrap_err(), InputError::InvalidYear);
        assert_eq!(request("1", "x", "２０２５", None).validate().unwrap_err(), InputError::InvalidYear);
        assert_eq!(request("1", "x", "20a5", None).validate().unwrap_err(), InputError::InvalidYear);
        assert_eq!(request("1", "x", "2025", Some("13")).validate().unwrap_err(), InputError::InvalidMonth);
        assert_eq!(request("1", "x", "2025", Some("0")).validate().unwrap_err(), InputError::InvalidMonth);
        assert_eq!(request("1", "x", "2025", Some("-1")).validate().unwrap_err(), InputError::InvalidMonth);
    }

    #[test]
    fn test_month_is_zero_padded() {
        assert_eq!(validate_month("03").unwrap(), Some(3));
        assert_eq!(PeriodFilter::new(2025, Some(9)).unwrap().month_label(), "09");
        assert_eq!(PeriodFilter::new(2025, Some(12)).unwrap().month_label(), "12");
    }

    #[test]
    fn test_absent_fields_fail_validation() {
        let request: FaturamentoRequest = serde_json::from_str(r#"{"cnpj": "1", "ano": "2025"}"#).unwrap();
        assert_eq!(request.validate().unwrap_err(), InputError::MissingSenha);

        let request: FaturamentoRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.validate().unwrap_err(), InputError::MissingCnpj);
    }

    #[test]
    fn test_secret_is_redacted() {
        let credentials = Credentials::new("12345678000199", "hunter2");
        let printed = format!("{:?}", credentials);
        assert!(printed.contains("12345678000199"));
        assert!(!printed.contains("hunter2"));

        let printed = format!("{:?}", request("1", "hunter2", "2025", None));
        assert!(!printed.contains("hunter2"));
    }
}
