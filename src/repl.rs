use anyhow::{anyhow, Result};
use colored::*;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::input::{
    validate_cnpj, validate_month, validate_senha, validate_year, Credentials, InputError,
    PeriodFilter,
};

/// Values already supplied on the command line; anything missing is asked for.
#[derive(Debug, Default, Clone)]
pub struct Preset {
    pub cnpj: Option<String>,
    pub senha: Option<String>,
    pub ano: Option<String>,
    pub mes: Option<String>,
}

pub fn create_editor() -> Result<DefaultEditor> {
    Ok(DefaultEditor::new()?)
}

/// Collects and validates the inputs, asking again for a field until its
/// answer is valid.
pub fn prompt_inputs(rl: &mut DefaultEditor, preset: Preset) -> Result<(Credentials, PeriodFilter)> {
    let cnpj = ask(rl, "Digite o CNPJ: ", preset.cnpj, validate_cnpj)?;
    let senha = ask(rl, "Digite a senha: ", preset.senha, validate_senha)?;
    let year = ask(rl, "Digite o ano (ex: 2025): ", preset.ano, validate_year)?;
    let month = ask(
        rl,
        "Digite o mês (1-12) ou deixe em branco para o ano todo: ",
        preset.mes,
        validate_month,
    )?;

    Ok((Credentials::new(cnpj, senha), PeriodFilter::new(year, month)?))
}

fn ask<T>(
    rl: &mut DefaultEditor,
    prompt: &str,
    preset: Option<String>,
    validate: impl Fn(&str) -> Result<T, InputError>,
) -> Result<T> {
    if let Some(value) = preset {
        match validate(&value) {
            Ok(v) => return Ok(v),
            Err(e) => print_error(&e),
        }
    }

    loop {
        match rl.readline(prompt) {
            Ok(line) => match validate(&line) {
                Ok(v) => return Ok(v),
                Err(e) => print_error(&e),
            },
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                return Err(anyhow!("Entrada cancelada"))
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn print_error(e: &InputError) {
    eprintln!("{} {}", "❌ ERRO:".red().bold(), e);
}
