use agrigrow::application::store_document::DocumentInput;
use agrigrow::cli::commands::{Cli, Commands};
use agrigrow::domain::entities::scheme::{ApplicationDetails, Eligibility, Scheme};
use agrigrow::domain::values::farmer_profile::FarmerProfile;
use agrigrow::domain::values::scheme_category::SchemeCategory;
use agrigrow::AgriGrow;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let db_path = std::env::var("AGRIGROW_DB").unwrap_or_else(|_| "./agrigrow.db".into());

    let ag = match AgriGrow::new(&db_path) {
        Ok(ag) => ag,
        Err(e) => {
            eprintln!("Error initializing AgriGrow: {e}");
            std::process::exit(1);
        }
    };

    let result = run_command(ag, cli.command).await;
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(ag: AgriGrow, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Diagnose { description } => {
            let diagnosis = ag.diagnose_text(&description).await?;
            println!("{}", serde_json::to_string_pretty(&diagnosis).unwrap());
        }
        Commands::DiagnoseImage { path, mime } => {
            let bytes = std::fs::read(&path)?;
            let diagnosis = ag.diagnose_image(bytes, &mime).await?;
            println!("{}", serde_json::to_string_pretty(&diagnosis).unwrap());
        }
        Commands::Ask {
            transcript,
            language,
        } => {
            let advice = ag.voice_query(&transcript, &language).await?;
            let speech = ag.speech_format(&advice.response);
            let out = serde_json::json!({ "advice": advice, "speech": speech });
            println!("{}", serde_json::to_string_pretty(&out).unwrap());
        }
        Commands::Intent { transcript } => {
            let intent = ag.detect_intent(&transcript).await?;
            println!("{}", serde_json::to_string_pretty(&intent).unwrap());
        }
        Commands::CropAdvice { crop, issue } => {
            let advice = ag.crop_advice(&crop, &issue).await?;
            println!("{}", serde_json::to_string_pretty(&advice).unwrap());
        }
        Commands::Schemes { profile } => {
            let profile: FarmerProfile = serde_json::from_str(&profile)?;
            let matches = ag.find_eligible_schemes(&profile).await?;
            println!("{}", serde_json::to_string_pretty(&matches).unwrap());
        }
        Commands::SchemeAdd { json } => {
            let data: serde_json::Value = serde_json::from_str(&json)?;

            let name = data["name"]
                .as_str()
                .ok_or("Missing required field: name")?
                .to_string();
            let description = data["description"].as_str().unwrap_or_default().to_string();
            let category: SchemeCategory = data["category"]
                .as_str()
                .ok_or("Missing required field: category")?
                .parse()
                .map_err(|e: String| e)?;
            let benefit = data["benefit"].as_str().map(String::from);
            let eligibility: Eligibility = data
                .get("eligibility")
                .cloned()
                .map(serde_json::from_value)
                .transpose()?
                .unwrap_or_default();
            let application: ApplicationDetails = data
                .get("application")
                .cloned()
                .map(serde_json::from_value)
                .transpose()?
                .unwrap_or_default();

            let scheme = ag
                .add_scheme(Scheme::new(
                    name,
                    description,
                    category,
                    benefit,
                    eligibility,
                    application,
                ))
                .await?;
            println!("{}", serde_json::to_string_pretty(&scheme).unwrap());
        }
        Commands::SchemeList { category } => {
            let cat = category
                .map(|c| c.parse())
                .transpose()
                .map_err(|e: String| e)?;
            let schemes = ag.schemes(cat)?;
            println!("{}", serde_json::to_string_pretty(&schemes).unwrap());
        }
        Commands::SchemeShow { id } => {
            let scheme = ag.scheme_by_id(&id)?;
            println!("{}", serde_json::to_string_pretty(&scheme).unwrap());
        }
        Commands::SchemeSearch { keyword } => {
            let schemes = ag.search_schemes(&keyword)?;
            println!("{}", serde_json::to_string_pretty(&schemes).unwrap());
        }
        Commands::Analyze { id, profile } => {
            let profile: FarmerProfile = serde_json::from_str(&profile)?;
            let analysis = ag.analyze_eligibility(&id, &profile).await?;
            println!("{}", serde_json::to_string_pretty(&analysis).unwrap());
        }
        Commands::Market { crop } => {
            let insight = ag.market_advice(&crop).await?;
            println!("{}", serde_json::to_string_pretty(&insight).unwrap());
        }
        Commands::StoreDoc { namespace, json } => {
            let doc: DocumentInput = serde_json::from_str(&json)?;
            let id = doc.id.clone();
            ag.store_document(&namespace, doc).await?;
            println!("Stored document {id} in {namespace}");
        }
        Commands::StoreBatch { namespace, json } => {
            let docs: Vec<DocumentInput> = serde_json::from_str(&json)?;
            let count = ag.store_documents_batch(&namespace, docs).await?;
            println!("Stored {count} documents in {namespace}");
        }
        Commands::Query {
            query,
            namespace,
            limit,
            filter,
        } => {
            let filter_map = filter
                .map(|f| serde_json::from_str(&f))
                .transpose()?;
            let matches = ag
                .semantic_query(&query, limit, &namespace, filter_map.as_ref())
                .await?;
            println!("{}", serde_json::to_string_pretty(&matches).unwrap());
        }
        Commands::DeleteDocs { namespace, ids } => {
            let deleted = ag.delete_documents(&namespace, &ids)?;
            println!("Deleted {deleted} documents from {namespace}");
        }
        Commands::ClearNamespace { namespace } => {
            ag.clear_namespace(&namespace)?;
            println!("Cleared namespace {namespace}");
        }
    }
    Ok(())
}
