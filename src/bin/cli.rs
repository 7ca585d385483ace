use faturamento::{
    core::config::FaturamentoConfig,
    repl::{self, Preset},
    summary::format_cnpj,
    FaturamentoService,
};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "faturamento-cli",
    about = "Sum the issued NFS-e of a CNPJ for a year or a month"
)]
struct Opt {
    /// CNPJ used to log in to the portal
    #[structopt(long)]
    cnpj: Option<String>,

    /// Portal password
    #[structopt(long, env = "FATURAMENTO_SENHA", hide_env_values = true)]
    senha: Option<String>,

    /// Four digit year, e.g. 2025
    #[structopt(long)]
    ano: Option<String>,

    /// Month (1-12); leave out for the whole year
    #[structopt(long)]
    mes: Option<String>,

    /// Where the JSON summary is written
    #[structopt(long, parse(from_os_str))]
    output_dir: Option<PathBuf>,

    /// Do not ask for missing values; treat a missing month as the whole year
    #[structopt(long)]
    no_prompt: bool,
}

fn banner() {
    let rule = "=".repeat(70);
    println!("{}", rule);
    println!("{}", "🚀 EXTRATOR DE FATURAMENTO - PORTAL NFS-E NACIONAL".bold());
    println!("{}", rule);
    println!();
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Buscando notas fiscais...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let opt = Opt::from_args();
    let config = FaturamentoConfig::from_env()?;
    let output_dir = opt.output_dir.clone().unwrap_or_else(|| config.output_dir.clone());

    banner();

    let preset = Preset {
        cnpj: opt.cnpj,
        senha: opt.senha,
        ano: opt.ano,
        mes: opt.mes,
    };
    let inputs = if opt.no_prompt {
        faturamento::FaturamentoRequest {
            cnpj: preset.cnpj.unwrap_or_default(),
            senha: preset.senha.unwrap_or_default(),
            ano: preset.ano.unwrap_or_default(),
            mes: preset.mes,
        }
        .validate()
        .map_err(anyhow::Error::from)
    } else {
        let mut rl = repl::create_editor()?;
        repl::prompt_inputs(&mut rl, preset)
    };
    let (credentials, filter) = match inputs {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("\n{} {}", "❌ ERRO:".red().bold(), e);
            std::process::exit(1);
        }
    };

    println!("\n📊 Buscando dados para: {}", filter.period_label().bold());
    println!("📋 CNPJ: {}", format_cnpj(credentials.identifier()));
    println!("{}", "-".repeat(70));

    let service = FaturamentoService::from_config(&config);
    let pb = spinner();
    let outcome = service
        .faturamento_with_progress(credentials, filter, Some(&pb))
        .await;
    pb.finish_and_clear();

    let summary = match outcome {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("\n{} {}", "❌ ERRO:".red().bold(), e);
            std::process::exit(1);
        }
    };

    let rule = "=".repeat(70);
    println!("\n{}", rule);
    println!("{}", "📈 RESULTADO".green().bold());
    println!("{}", rule);
    println!("{}", summary.to_pretty_json()?);
    println!("{}", rule);

    match summary.save_json(&output_dir) {
        Ok(path) => println!("\n💾 Resultado salvo em: {}", path.display()),
        Err(e) => {
            eprintln!("\n{} {:#}", "❌ ERRO:".red().bold(), e);
            std::process::exit(1);
        }
    }

    Ok(())
}
