//! Medicheck CLI
//!
//! Analyze prescription text and compare brands against the formulary.
//!
//! Usage:
//!   medicheck parse <FILE|->
//!   medicheck check <NAME[:DOSAGE]>...
//!   medicheck interactions <NAME[:DOSAGE]>...
//!   medicheck compare <GENERIC> <BRAND1> <BRAND2> <DOSAGE1> <DOSAGE2>
//!   medicheck search <QUERY>
//!   medicheck info <GENERIC>

use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use medicheck_lib::analysis::MedicineRecord;
use medicheck_lib::config::{self, AnalysisConfig};
use medicheck_lib::formulary::{Formulary, FormularyLookup};
use medicheck_lib::parser::{LineParser, Vocabulary};
use medicheck_lib::pipeline::{PlainTextExtractor, PrescriptionAnalyzer};

#[derive(Parser)]
#[command(name = "medicheck")]
#[command(version)]
#[command(about = "Prescription parsing, formulary enrichment and safety checks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Formulary JSON file (defaults to $MEDICHECK_FORMULARY, ~/.medicheck/formulary.json, then the bundled data)
    #[arg(long, global = true)]
    formulary: Option<PathBuf>,

    /// Newline-separated medicine vocabulary (defaults to $MEDICHECK_VOCABULARY, then ~/.medicheck/vocabulary.txt)
    #[arg(long, global = true)]
    vocabulary: Option<PathBuf>,

    /// Convert dosages to milligrams before comparing with the max daily dose
    #[arg(long, global = true)]
    strict_units: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse prescription text and produce a safety report
    Parse {
        /// Text file, or "-" for stdin
        input: String,
    },

    /// Enrich and validate manually entered medicines
    Check {
        /// Medicine names, optionally with a dosage ("Calpol:500mg")
        #[arg(required = true)]
        medicines: Vec<String>,
    },

    /// Cross-check two or more medicines for interactions
    Interactions {
        /// Medicine names, optionally with a dosage ("Calpol:500mg")
        #[arg(required = true)]
        medicines: Vec<String>,
    },

    /// Compare two brands of one generic at the given strengths
    Compare {
        generic: String,
        brand1: String,
        brand2: String,
        dosage1: String,
        dosage2: String,
    },

    /// Substring search over generic names and brand names
    Search {
        query: String,
    },

    /// Show a generic's formulary entry and brands
    Info {
        generic: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    medicheck_lib::init_tracing();

    let cli = Cli::parse();
    let analyzer = build_analyzer(&cli)?;

    let result: serde_json::Value = match cli.command {
        Commands::Parse { input } => {
            let bytes = read_input(&input)?;
            let analysis = analyzer
                .analyze_document(Arc::new(PlainTextExtractor), bytes)
                .await?;
            serde_json::to_value(analysis)?
        }
        Commands::Check { medicines } => {
            let records = medicines.iter().map(|m| parse_record(m));
            serde_json::to_value(analyzer.analyze_records(records))?
        }
        Commands::Interactions { medicines } => {
            let records = medicines.iter().map(|m| parse_record(m));
            serde_json::to_value(analyzer.check_interactions(records)?)?
        }
        Commands::Compare {
            generic,
            brand1,
            brand2,
            dosage1,
            dosage2,
        } => match analyzer.compare_brands(&generic, &brand1, &brand2, &dosage1, &dosage2) {
            Ok(comparison) => serde_json::to_value(comparison)?,
            Err(err) => {
                println!("{}", serde_json::to_string_pretty(&err.to_body())?);
                std::process::exit(1);
            }
        },
        Commands::Search { query } => {
            let hits = analyzer.formulary().search_all(&query);
            serde_json::to_value(hits)?
        }
        Commands::Info { generic } => match analyzer.formulary().get_by_generic_name(&generic) {
            Some(entry) => serde_json::to_value(entry)?,
            None => {
                println!(
                    "{}",
                    serde_json::json!({ "error": format!("Medicine not found: {generic}") })
                );
                std::process::exit(1);
            }
        },
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn build_analyzer(cli: &Cli) -> Result<PrescriptionAnalyzer, Box<dyn std::error::Error>> {
    let formulary_path = cli.formulary.clone().or_else(config::formulary_path);
    let vocabulary_path = cli.vocabulary.clone().or_else(config::vocabulary_path);

    let formulary = Formulary::load_or_bundled(formulary_path.as_deref())?;
    let vocabulary = Vocabulary::load_or_default(vocabulary_path.as_deref())?;

    let analysis_config = if cli.strict_units {
        AnalysisConfig::strict_units()
    } else {
        AnalysisConfig::default()
    };

    tracing::debug!(
        generics = formulary.len(),
        vocabulary = vocabulary.len(),
        strict_units = cli.strict_units,
        "Analyzer ready"
    );

    Ok(PrescriptionAnalyzer::new(Arc::new(formulary))
        .with_parser(LineParser::new(vocabulary))
        .with_config(analysis_config))
}

fn read_input(input: &str) -> io::Result<Vec<u8>> {
    if input == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read(input)
    }
}

/// "Calpol:500mg" -> name and dosage; a bare name has no dosage.
fn parse_record(arg: &str) -> MedicineRecord {
    match arg.split_once(':') {
        Some((name, dosage)) if !dosage.trim().is_empty() => {
            MedicineRecord::named(name.trim()).with_dosage(dosage.trim())
        }
        Some((name, _)) => MedicineRecord::named(name.trim()),
        None => MedicineRecord::named(arg.trim()),
    }
}
