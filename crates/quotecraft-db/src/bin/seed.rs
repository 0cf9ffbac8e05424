//! # Seed Catalog
//!
//! Populates a database with a small made-to-measure catalog for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p quotecraft-db --bin seed
//!
//! # Specify database path
//! cargo run -p quotecraft-db --bin seed -- --db ./data/quotecraft.db
//! ```
//!
//! ## Generated Catalog
//! - Windows: priced per m², extras on the window's own area
//! - Blinds: per m², with a motor (flat) and side channels (own dimensions)
//! - Awnings: flat priced
//! - Installation: a non-exportable service line

use std::env;

use quotecraft_core::Money;
use quotecraft_db::{Database, DbConfig, NewExtraOption, NewProduct};

/// (name, price cents, per m², use product dimensions)
type ExtraSeed = (&'static str, i64, bool, bool);

struct ProductSeed {
    category: &'static str,
    name: &'static str,
    description: &'static str,
    base_price_cents: i64,
    per_square_meter: bool,
    can_export: bool,
    extras: &'static [ExtraSeed],
}

const CATALOG: &[ProductSeed] = &[
    ProductSeed {
        category: "Windows",
        name: "Casement Window",
        description: "PVC frame, double glazed, tilt and turn",
        base_price_cents: 18_000,
        per_square_meter: true,
        can_export: true,
        extras: &[
            ("Tinted glass", 2_500, true, true),
            ("Triple glazing", 6_000, true, true),
            ("Mosquito net", 3_500, true, false),
        ],
    },
    ProductSeed {
        category: "Windows",
        name: "Fixed Window",
        description: "Non-opening pane for maximum light",
        base_price_cents: 12_000,
        per_square_meter: true,
        can_export: true,
        extras: &[("Tinted glass", 2_500, true, true)],
    },
    ProductSeed {
        category: "Blinds",
        name: "Roller Blind",
        description: "Blackout fabric on an aluminium tube",
        base_price_cents: 4_500,
        per_square_meter: true,
        can_export: true,
        extras: &[
            ("Motor", 12_000, false, true),
            ("Side channels", 1_800, true, false),
        ],
    },
    ProductSeed {
        category: "Blinds",
        name: "Venetian Blind",
        description: "25 mm aluminium slats",
        base_price_cents: 5_200,
        per_square_meter: true,
        can_export: true,
        extras: &[("Wand control", 900, false, true)],
    },
    ProductSeed {
        category: "Outdoor",
        name: "Folding Arm Awning",
        description: "Acrylic canvas, manual crank",
        base_price_cents: 89_000,
        per_square_meter: false,
        can_export: true,
        extras: &[
            ("Wind sensor", 15_000, false, true),
            ("Valance", 2_000, true, false),
        ],
    },
    ProductSeed {
        category: "Services",
        name: "Installation",
        description: "On-site fitting",
        base_price_cents: 1_500,
        per_square_meter: true,
        can_export: false,
        extras: &[("Old frame removal", 4_000, false, true)],
    },
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./quotecraft_dev.db");

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
                println!("QuoteCraft Seed Catalog");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./quotecraft_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 QuoteCraft Seed Catalog");
    println!("=========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.catalog().count_products().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut categories: Vec<(&str, i64)> = Vec::new();
    let mut generated = 0;

    for seed in CATALOG {
        let category_id = match categories.iter().find(|(name, _)| *name == seed.category) {
            Some((_, id)) => *id,
            None => {
                let category = db.catalog().insert_category(seed.category).await?;
                categories.push((seed.category, category.id));
                category.id
            }
        };

        let product = new_product(seed, category_id);
        if let Err(e) = db.catalog().insert_product(&product).await {
            eprintln!("Failed to insert {}: {}", seed.name, e);
            continue;
        }
        generated += 1;
    }

    println!();
    println!(
        "✓ Inserted {} products in {} categories",
        generated,
        categories.len()
    );
    Ok(())
}

fn new_product(seed: &ProductSeed, category_id: i64) -> NewProduct {
    NewProduct {
        name: seed.name.to_string(),
        description: seed.description.to_string(),
        pros: None,
        cons: None,
        category_id,
        base_price: Money::from_cents(seed.base_price_cents),
        price_per_square_meter: seed.per_square_meter,
        can_export: seed.can_export,
        extras: seed
            .extras
            .iter()
            .map(|(name, cents, per_m2, own)| NewExtraOption {
                name: name.to_string(),
                price: Money::from_cents(*cents),
                price_per_square_meter: *per_m2,
                use_product_dimensions: *own,
            })
            .collect(),
        images: vec![format!(
            "/uploads/{}.jpg",
            seed.name.to_lowercase().replace(' ', "-")
        )],
    }
}
