use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use backend::admin::insertion_site_visible;
use backend::BackendClient;
use uti_core::constants::SCALE_TEMPLATE_FILENAME;
use uti_core::indicators::IndicatorFilter;
use uti_core::roster::RosterFilter;
use uti_core::{import, CoreConfig, EnvValues, Ward};

#[derive(Parser)]
#[command(name = "uti")]
#[command(about = "UTI ward dashboard CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List roster patients
    List {
        /// Case-insensitive text matched against name, bed and diagnosis
        #[arg(long)]
        search: Option<String>,
        /// all, critical, stable or recovering
        #[arg(long)]
        status: Option<String>,
    },
    /// Print the scale CSV template, or write it to a directory
    Template {
        /// Directory to write the template file into
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Import a staffing scale CSV against the seeded roster
    Import {
        /// Path to a .csv file
        file: PathBuf,
    },
    /// Print the quality indicator summary
    Indicators {
        /// all, lpp, falls, extubation or medication
        #[arg(long = "type")]
        indicator_type: Option<String>,
        /// all, morning, afternoon or night
        #[arg(long)]
        shift: Option<String>,
    },
    /// Fetch the patient list from the record backend
    FetchPatients {
        /// Backend base URL (defaults to UTI_BACKEND_URL)
        #[arg(long)]
        url: Option<String>,
    },
    /// Show whether the device form displays the insertion-site field for a type code
    InsertionSite {
        /// Device type code, e.g. CVC or SNE
        code: String,
    },
}

fn ward(cfg: Arc<CoreConfig>) -> anyhow::Result<Ward> {
    Ok(Ward::seeded(cfg, chrono::Utc::now())?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("uti_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = Arc::new(CoreConfig::from_env_values(EnvValues::from_process_env())?);

    match cli.command {
        Some(Commands::List { search, status }) => {
            let filter = RosterFilter {
                search: search.unwrap_or_default(),
                status: status.as_deref().unwrap_or_default().parse()?,
            };
            let ward = ward(cfg)?;
            let roster = ward.roster();
            let patients = roster.filter(&filter);
            if let Some(hint) = roster.empty_hint(&filter) {
                println!("{}", hint.message());
            }
            for detail in patients {
                let p = &detail.patient;
                println!(
                    "ID: {}, Nome: {}, Leito: {}, Status: {}, Última mudança de decúbito: {} min",
                    p.id, p.name, p.bed_number, p.status, p.decubitus_timer
                );
            }
            let counts = roster.counts();
            println!(
                "Total: {}, Críticos: {}, Estáveis: {}, Em recuperação: {}",
                counts.total, counts.critical, counts.stable, counts.recovering
            );
        }
        Some(Commands::Template { out_dir }) => match out_dir {
            Some(dir) => {
                let path = dir.join(SCALE_TEMPLATE_FILENAME);
                std::fs::write(&path, import::template())?;
                println!("Template written to {}", path.display());
            }
            None => println!("{}", import::template()),
        },
        Some(Commands::Import { file }) => {
            let mut ward = ward(cfg)?;
            let report = ward.import_scale_file(&file, chrono::Utc::now())?;
            println!(
                "{}: {} válidos, {} inválidos",
                report.file_name, report.valid, report.invalid
            );
            for error in &report.errors {
                println!("  {error}");
            }
        }
        Some(Commands::Indicators {
            indicator_type,
            shift,
        }) => {
            let ward = ward(cfg)?;
            let summary = ward.indicators().summary_for(IndicatorFilter {
                indicator_type: indicator_type.as_deref().unwrap_or_default().parse()?,
                shift: shift.as_deref().unwrap_or_default().parse()?,
            });
            println!(
                "LPP: {}, Quedas: {}, Extubação: {}, Medicação: {}",
                summary.counts.lpp,
                summary.counts.falls,
                summary.counts.extubation,
                summary.counts.medication
            );
            for indicator in &summary.indicators {
                println!(
                    "{} [{}] {} - {}",
                    indicator.date,
                    indicator.shift,
                    indicator.indicator_type(),
                    indicator.description
                );
            }
            for share in &summary.shift_distribution {
                println!("{}: {} ({:.1}%)", share.shift, share.count, share.percentage);
            }
        }
        Some(Commands::FetchPatients { url }) => {
            let url = url.unwrap_or_else(|| cfg.backend_url().to_string());
            let client = BackendClient::new(&url)?;
            let patients = client.fetch_patients().await?;
            if patients.is_empty() {
                println!("No patients found.");
            }
            for patient in patients {
                println!("{}", patient.label());
            }
        }
        Some(Commands::InsertionSite { code }) => {
            let shown = if insertion_site_visible(&code) {
                "visible"
            } else {
                "hidden"
            };
            println!("{code}: insertion site {shown}");
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
