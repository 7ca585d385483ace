use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::input::PeriodFilter;
use crate::nfse::ExtractionResult;
use crate::utils::dirs;

/// What gets shown to the user and written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaturamentoSummary {
    #[serde(rename = "CNPJ")]
    pub cnpj: String,
    #[serde(rename = "Faturamento")]
    pub faturamento: String,
    #[serde(rename = "Notas_Encontradas")]
    pub notas_encontradas: u32,
    #[serde(rename = "Periodo")]
    pub periodo: String,
    #[serde(rename = "Mes")]
    pub mes: String,
}

/// `12345678000199` becomes `12.345.678/0001-99`. Anything that is not
/// exactly 14 digits once punctuation is stripped comes back untouched.
pub fn format_cnpj(raw: &str) -> String {
    let digits = cnpj_digits(raw);
    if digits.len() != 14 {
        return raw.to_string();
    }
    format!(
        "{}.{}.{}/{}-{}",
        &digits[..2],
        &digits[2..5],
        &digits[5..8],
        &digits[8..12],
        &digits[12..]
    )
}

fn cnpj_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

impl FaturamentoSummary {
    pub fn build(cnpj: &str, filter: &PeriodFilter, result: &ExtractionResult) -> Self {
        Self {
            cnpj: format_cnpj(cnpj),
            faturamento: result.total_value.to_string(),
            notas_encontradas: result.total_count,
            periodo: filter.period_label(),
            mes: filter.month_label(),
        }
    }

    /// `faturamento_<digits>_<period>.json`, with `/` in the period turned into `-`.
    pub fn file_name(&self) -> String {
        format!(
            "faturamento_{}_{}.json",
            cnpj_digits(&self.cnpj),
            self.periodo.replace('/', "-")
        )
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_json(&self, dir: &Path) -> Result<PathBuf> {
        dirs::ensure_dir(dir)?;
        let path = dir.join(self.file_name());
        fs::write(&path, self.to_pretty_json()?)?;
        log::debug!("Saved summary to {:?}", path);
        Ok(path)
    }
}
