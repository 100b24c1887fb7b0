use std::path::PathBuf;

use clap::Parser;
use profile_persistence_mongodb::{MongoConfig, fixture::load_fixture};

/// Load a sample data JSON file into MongoDB.
///
/// Connects using MONGODB_URI, the same variable the profile server reads.
/// Every existing document in the profiles collection is deleted first.
#[derive(Parser)]
struct Args {
    /// Fixture file produced by generate_sample_data.
    data_file: PathBuf,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = match MongoConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match load_fixture(&args.data_file, &config).await {
        Ok(count) => println!("Loaded {} profiles.", count),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
