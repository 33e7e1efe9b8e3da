use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "agrigrow", about = "Agricultural advisory knowledge base")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Diagnose a crop problem from a text description
    Diagnose {
        /// Symptom description (crop, appearance, spread)
        description: String,
    },
    /// Diagnose a crop problem from a photo
    DiagnoseImage {
        /// Path to the image file
        path: String,
        #[arg(long, default_value = "image/jpeg")]
        mime: String,
    },
    /// Ask the voice advisor a free-form question
    Ask {
        /// Transcribed farmer query
        transcript: String,
        #[arg(long, default_value = "en")]
        language: String,
    },
    /// Classify the intent of a transcribed query
    Intent {
        transcript: String,
    },
    /// Get structured advice for a crop issue
    CropAdvice {
        crop: String,
        issue: String,
    },
    /// Find schemes a farmer is eligible for (structured + semantic)
    Schemes {
        /// JSON farmer profile with landSize, region, crops, farmerType, income
        profile: String,
    },
    /// Add a government scheme
    SchemeAdd {
        /// JSON with name, description, category, benefit, eligibility, application
        json: String,
    },
    /// List schemes
    SchemeList {
        /// Category filter (income, insurance, subsidy, loan, training)
        #[arg(long)]
        category: Option<String>,
    },
    /// Show a single scheme
    SchemeShow {
        /// Scheme ID
        id: String,
    },
    /// Keyword search over schemes
    SchemeSearch {
        keyword: String,
    },
    /// Explain whether a farmer qualifies for a scheme
    Analyze {
        /// Scheme ID
        id: String,
        /// JSON farmer profile
        profile: String,
    },
    /// Market price outlook for a crop
    Market {
        crop: String,
    },
    /// Store a document in the vector index
    StoreDoc {
        /// Target namespace (e.g. treatments, schemes)
        namespace: String,
        /// JSON with id, text, metadata
        json: String,
    },
    /// Store a batch of documents in the vector index
    StoreBatch {
        /// Target namespace
        namespace: String,
        /// JSON array of {id, text, metadata} documents
        json: String,
    },
    /// Semantic (vector) query
    Query {
        query: String,
        #[arg(long, default_value = "treatments")]
        namespace: String,
        #[arg(long, default_value = "5")]
        limit: usize,
        /// JSON object of exact-match metadata filters
        #[arg(long)]
        filter: Option<String>,
    },
    /// Delete documents by ID
    DeleteDocs {
        namespace: String,
        /// IDs to delete
        ids: Vec<String>,
    },
    /// Delete every document in a namespace
    ClearNamespace {
        namespace: String,
    },
}
