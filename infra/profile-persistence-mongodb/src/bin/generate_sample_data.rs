use std::path::PathBuf;

use clap::Parser;
use profile_persistence_mongodb::{
    fixture::write_fixture,
    generator::{SAMPLE_PROFILE_COUNT, generate_sample_data},
};

/// Generate a JSON file containing random sample profiles, encoded as
/// canonical extended JSON.
#[derive(Parser)]
struct Args {
    /// Where to write the fixture file.
    output_path: PathBuf,
}

fn main() {
    let args = Args::parse();

    let result = generate_sample_data(&mut rand::rng(), SAMPLE_PROFILE_COUNT)
        .map_err(|e| e.to_string())
        .and_then(|profiles| {
            write_fixture(&args.output_path, &profiles).map_err(|e| e.to_string())?;
            Ok(profiles.len())
        });

    match result {
        Ok(count) => println!(
            "Wrote {} profiles to {}",
            count,
            args.output_path.display()
        ),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
