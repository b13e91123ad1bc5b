use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cv_tag_engine_lib::core::errors::CoreError;
use cv_tag_engine_lib::core::record::CandidateRecord;
use cv_tag_engine_lib::core::service::{tag_external_record, BatchParser};
use cv_tag_engine_lib::core::settings_store::SettingsStore;
use cv_tag_engine_lib::core::tags::tag_catalogue;

const USAGE: &str = "Usage: cv_tagger <resume.pdf|docx|txt>...\n       cv_tagger --record <candidate.json>\n       cv_tagger --catalogue";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cv_tag_engine_lib=info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None => {
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
        Some("--catalogue") => {
            println!("{}", serde_json::to_string_pretty(&tag_catalogue())?);
        }
        Some("--record") => {
            let path = args
                .get(1)
                .ok_or_else(|| CoreError::InvalidRequest("--record needs a JSON file".to_string()))?;
            tag_record_file(Path::new(path)).await?;
        }
        Some(_) => {
            let paths: Vec<PathBuf> = args.iter().map(PathBuf::from).collect();
            if let Some(missing) = paths.iter().find(|path| !path.exists()) {
                eprintln!("File not found: {}", missing.display());
                std::process::exit(2);
            }

            let settings = SettingsStore::new().load().await?;
            let documents = BatchParser::new(settings).parse_files(&paths).await;
            println!("{}", serde_json::to_string_pretty(&documents)?);
        }
    }
    Ok(())
}

async fn tag_record_file(path: &Path) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let record: CandidateRecord = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a candidate record", path.display()))?;

    let report = tag_external_record(&record);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
