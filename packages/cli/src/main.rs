#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the hackathon registration toolkit.

mod input;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use hackathon_ai::{ApplicantProfile, analyze};
use hackathon_announce::{Announcement, Audience, LoggingQueue, fan_out, notify_preselected};
use hackathon_pdf::inscription_list::{InscriptionListRow, render_inscription_list};
use hackathon_pdf::{PdfExtractor, is_text_document};
use hackathon_preselection::{
    PreselectionConfig, PreselectionReport, process_pdf, process_text, roster_from_inscriptions,
};
use hackathon_registration_models::RosterEntry;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "hackathon", about = "Hackathon registration toolkit")]
struct Cli {
    /// Pre-selection settings (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract participants from a PDF (or a `.txt` dump of one)
    Extract {
        /// Document to read
        file: PathBuf,
    },
    /// Match a pre-selection document against the registered users
    Match {
        /// Pre-selection PDF (or `.txt`)
        file: PathBuf,
        /// Roster CSV (`email,last_name,first_name`)
        #[arg(long, conflicts_with = "inscriptions")]
        roster: Option<PathBuf>,
        /// Inscriptions export (JSON) to build the roster from
        #[arg(long, requires = "hackathon")]
        inscriptions: Option<PathBuf>,
        /// Hackathon the roster is built for
        #[arg(long)]
        hackathon: Option<String>,
        /// Log the pre-selection notices that would be sent
        #[arg(long)]
        notify: bool,
    },
    /// Print the list of validated registrants
    RenderList {
        /// Inscriptions export (JSON)
        #[arg(long)]
        inscriptions: PathBuf,
        /// Name printed in the list title
        #[arg(long, default_value = "Hackathon")]
        hackathon_name: String,
    },
    /// Score an applicant's registrations
    Score {
        /// Inscriptions export (JSON)
        #[arg(long)]
        inscriptions: PathBuf,
        /// Applicant email
        #[arg(long)]
        email: String,
    },
    /// Dry-run the email fan-out of an announcement to registrants
    Announce {
        /// Inscriptions export (JSON)
        #[arg(long)]
        inscriptions: PathBuf,
        /// Announcement title
        #[arg(long)]
        title: String,
        /// Announcement body
        #[arg(long)]
        content: String,
        /// Restrict to the registrants of this hackathon
        #[arg(long)]
        hackathon: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PreselectionConfig::load(path)?,
        None => PreselectionConfig::default(),
    };

    match cli.command {
        Commands::Extract { file } => {
            let extraction = PdfExtractor::new().extract_from_path(&file)?;
            print_json(&extraction)?;
        }
        Commands::Match {
            file,
            roster,
            inscriptions,
            hackathon,
            notify,
        } => {
            let roster = load_roster(roster.as_deref(), inscriptions.as_deref(), hackathon.as_deref())?;
            let report = process_document(&file, &roster, &config)?;
            print_json(&report)?;

            if notify {
                let name = hackathon.as_deref().unwrap_or("Hackathon");
                let summary = notify_preselected(&LoggingQueue, &report.preselected, &roster, name).await;
                log::info!("{} pre-selection notices queued", summary.dispatched);
            }
        }
        Commands::RenderList {
            inscriptions,
            hackathon_name,
        } => {
            let inscriptions = input::read_inscriptions(&inscriptions)?;
            let rows = InscriptionListRow::from_inscriptions(&inscriptions);
            println!("{}", render_inscription_list(&hackathon_name, &rows));
        }
        Commands::Score {
            inscriptions,
            email,
        } => {
            let inscriptions = input::read_inscriptions(&inscriptions)?;
            let profile = ApplicantProfile::from_inscriptions(&email, &inscriptions);
            print_json(&analyze(&profile))?;
        }
        Commands::Announce {
            inscriptions,
            title,
            content,
            hackathon,
        } => {
            let inscriptions = input::read_inscriptions(&inscriptions)?;
            let announcement = Announcement {
                id: "cli".to_string(),
                title,
                content,
                audience: Audience::Inscrits,
                hackathon_id: hackathon,
            };
            let summary = fan_out(&LoggingQueue, &announcement, &inscriptions).await;
            print_json(&summary)?;
        }
    }

    Ok(())
}

fn load_roster(
    roster: Option<&Path>,
    inscriptions: Option<&Path>,
    hackathon: Option<&str>,
) -> Result<Vec<RosterEntry>, Box<dyn std::error::Error>> {
    match (roster, inscriptions, hackathon) {
        (Some(path), _, _) => Ok(input::read_roster(path)?),
        (None, Some(path), Some(hackathon_id)) => {
            let inscriptions = input::read_inscriptions(path)?;
            Ok(roster_from_inscriptions(&inscriptions, hackathon_id))
        }
        _ => Err("either --roster or --inscriptions with --hackathon is required".into()),
    }
}

/// Processes a pre-selection document on disk. Only I/O failures are
/// errors; an unreadable PDF gives an empty report.
fn process_document(
    path: &Path,
    roster: &[RosterEntry],
    config: &PreselectionConfig,
) -> Result<PreselectionReport, std::io::Error> {
    let name = document_name(path);
    if is_text_document(path) {
        let text = std::fs::read_to_string(path)?;
        return Ok(process_text(&name, &text, roster, config));
    }

    let bytes = std::fs::read(path)?;
    Ok(process_pdf(&name, &bytes, roster, config))
}

fn document_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<RosterEntry> {
        vec![RosterEntry {
            id: "u1".to_string(),
            email: "jean@test.fr".to_string(),
            last_name: "Dupont".to_string(),
            first_name: "Jean".to_string(),
        }]
    }

    #[test]
    fn unreadable_pdf_gives_empty_report() {
        let path = std::env::temp_dir().join("hackathon_cli_broken.pdf");
        std::fs::write(&path, b"not a pdf").unwrap();

        let report = process_document(&path, &roster(), &PreselectionConfig::default());
        std::fs::remove_file(&path).ok();

        let report = report.unwrap();
        assert_eq!(report.document_name, "hackathon_cli_broken.pdf");
        assert_eq!(report.extracted_count, 0);
        assert!(report.preselected.is_empty());
    }

    #[test]
    fn text_dump_is_matched() {
        let path = std::env::temp_dir().join("hackathon_cli_preselection.txt");
        std::fs::write(&path, "Jean Dupont jean@test.fr L2 VALIDE").unwrap();

        let report = process_document(&path, &roster(), &PreselectionConfig::default());
        std::fs::remove_file(&path).ok();

        assert_eq!(report.unwrap().preselected, vec!["jean@test.fr"]);
    }

    #[test]
    fn missing_document_is_an_error() {
        let path = std::env::temp_dir().join("hackathon_cli_no_such_document.pdf");
        assert!(process_document(&path, &roster(), &PreselectionConfig::default()).is_err());
    }
}
