//! finanzas main entry point

use clap::{Parser, Subcommand};
use finanzas_api::start_server;
use finanzas_config::{Config, ConfigError};
use finanzas_core::{Finances, MonthKey, MonthReport};
use finanzas_store::JsonFileStore;
use finanzas_utils::{format_amount, format_percent, NumberFormat};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::RwLock;

#[derive(Parser, Debug)]
#[command(name = "finanzas")]
#[command(version = "0.1.0")]
#[command(about = "Monthly budget vs actual tracking with comparative reports", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Override the user whose document is opened
    #[arg(short, long)]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API (default)
    Serve,
    /// Print the report for one month
    Summary {
        /// Month as YYYY-MM, defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Print the default configuration file
    InitConfig,
}

/// Load the configuration, falling back to defaults when the file is absent
fn load_config(path: &Path) -> Result<(Config, bool), ConfigError> {
    match Config::load(path) {
        Ok(config) => Ok((config, true)),
        Err(ConfigError::FileNotFound { .. }) => Ok((Config::default(), false)),
        Err(e) => Err(e),
    }
}

fn print_report(report: &MonthReport, fmt: &NumberFormat) {
    let t = &report.totales;
    println!("{}", t.mes.label());
    println!("{:<22}{:>16}{:>16}", "", "Estimado", "Real");
    for (label, estimado, real) in [
        ("Ingreso", t.ingreso_estimado, t.ingreso_real),
        ("Gastos", t.total_gastos_estimado, t.total_gastos_real),
        ("Inversión", t.inversion_estimada, t.inversion_real),
        ("Ahorro", t.ahorro_estimado, t.ahorro_real),
    ] {
        println!(
            "{:<22}{:>16}{:>16}",
            label,
            format_amount(estimado, fmt),
            format_amount(real, fmt)
        );
    }
    println!("{:<22}{:>32}", "Ganancia inversión", format_amount(t.ganado_inversion, fmt));
    println!();
    println!("Cumplimiento: {}", format_percent(report.cumplimiento, 0));
    println!(
        "Ejecución de gastos: {} ({})",
        format_percent(report.kpis.ejecucion_gastos, 0),
        report.kpis.estado
    );

    if !report.desvios.is_empty() {
        println!();
        println!("{:<22}{:>16}{:>16}{:>10}", "Concepto", "Estimado", "Real", "Desvío");
        for d in &report.desvios {
            println!(
                "{:<22}{:>16}{:>16}{:>10}",
                d.nombre,
                format_amount(d.estimado, fmt),
                format_amount(d.real, fmt),
                format_percent(d.desvio_porcentaje, 1)
            );
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(Command::InitConfig) = args.command {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let (mut config, from_file) = load_config(&args.config)?;
    if let Some(user) = args.user.clone() {
        config.data.user = user;
        config.validate()?;
    }

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    if from_file {
        log::info!("Config loaded from {}", args.config.display());
    } else {
        log::warn!("Config file {} not found, using defaults", args.config.display());
    }
    log::info!(
        "Document for user {}: {}",
        config.data.user,
        config.state_path().display()
    );

    let rt = Runtime::new()?;
    rt.block_on(run(config, args.command))
}

async fn run(config: Config, command: Option<Command>) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(JsonFileStore::new(config.data.path.clone()));
    let mut finances = Finances::new(config.clone(), store);
    finances.load().await?;

    match command {
        Some(Command::Summary { month }) => {
            let mes = match month {
                Some(raw) => raw.parse::<MonthKey>()?,
                None => MonthKey::current(),
            };
            let report = finances.month_report(&mes)?;
            print_report(&report, &config.currency.number_format());
        }
        _ => {
            let finances = Arc::new(RwLock::new(finances));
            start_server(config, finances).await?;
        }
    }

    Ok(())
}
