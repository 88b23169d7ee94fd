//! # Seed Data Generator
//!
//! Populates the database with a demo clinic catalog for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p clinic-db --bin seed
//!
//! # Specify database path
//! cargo run -p clinic-db --bin seed -- --db ./data/clinic.db
//! ```

use clinic_core::money::Money;
use clinic_core::types::ServiceDraft;
use clinic_db::{Database, DbConfig};
use std::env;

/// (title, details, price in centavos, available)
const SERVICES: &[(&str, &str, i64, bool)] = &[
    ("Consultation", "General physician", 50_000, true),
    ("CBC", "Complete blood count", 35_000, true),
    ("Urinalysis", "Routine urine exam", 15_000, true),
    ("Fecalysis", "Routine stool exam", 15_000, true),
    ("Chest X-Ray", "PA view", 45_000, true),
    ("ECG", "12-lead electrocardiogram", 40_000, true),
    ("FBS", "Fasting blood sugar", 18_000, true),
    ("Lipid Profile", "Cholesterol, HDL, LDL, triglycerides", 90_000, true),
    ("Ultrasound", "Whole abdomen", 250_000, true),
    ("Drug Test", "Five-panel screen", 30_000, false),
    ("Medical Certificate", "Fit-to-work", 20_000, true),
    ("Pregnancy Test", "Urine hCG", 12_500, true),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./clinic_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Clinic POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./clinic_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Clinic POS Seed Data Generator");
    println!("=================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Schema ready");

    let existing = db.services().counts().await?.total;
    if existing > 0 {
        println!("⚠ Database already has {} services", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let repo = db.services();
    for (title, details, cents, available) in SERVICES {
        repo.insert(&ServiceDraft {
            title: title.to_string(),
            details: details.to_string(),
            price: Money::from_cents(*cents),
            available: *available,
        })
        .await?;
    }

    println!("✓ Seeded {} services", SERVICES.len());
    db.close().await;
    Ok(())
}
