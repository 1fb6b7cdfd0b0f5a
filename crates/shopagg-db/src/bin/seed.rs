//! # Seed Data Generator
//!
//! Populates a development database with a demo account, a few shops and a
//! small barcoded catalogue.
//!
//! ## Usage
//! ```bash
//! # Seed ./shopagg_dev.db
//! cargo run -p shopagg-db --bin seed
//!
//! # Specify database path
//! cargo run -p shopagg-db --bin seed -- --db ./data/shopagg.db
//! ```
//!
//! Seeding goes through the same find-or-create rules as the API, so running
//! it twice adds nothing.

use std::env;
use std::sync::Arc;

use shopagg_core::{CoreError, NewStore, Product, StoreType};
use shopagg_db::{Database, DbConfig};
use shopagg_service::{ProductService, StoreService, UserService};

/// (company, city, address, zip code)
const SHOPS: &[(&str, &str, &str, &str)] = &[
    ("Carrefour", "Paris", "12 rue de Rivoli", "75001"),
    ("Carrefour", "Lyon", "4 place Bellecour", "69002"),
    ("Monoprix", "Paris", "50 rue de Rennes", "75006"),
    ("Lidl", "Marseille", "8 boulevard Baille", "13005"),
];

/// (ean, product name, brand)
const PRODUCTS: &[(&str, &str, &str)] = &[
    ("3017620422003", "Nutella 400g", "Ferrero"),
    ("3033490004743", "Yaourt nature x4", "Danone"),
    ("5449000000996", "Coca-Cola 1.5L", "Coca-Cola"),
    ("3228857000166", "Baguette", "Harry's"),
    ("3175680011480", "Evian 1L", "Evian"),
    ("7622210449283", "Prince chocolat", "LU"),
];

const DEMO_LOGIN: &str = "demo";
const DEMO_EMAIL: &str = "demo@example.com";
const DEMO_PASSWORD: &str = "demo-password";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./shopagg_dev.db");

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
                println!("Shopagg Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./shopagg_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Shopagg Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let users = UserService::new(Arc::new(db.users()));
    match users.create_user(DEMO_LOGIN, DEMO_EMAIL, DEMO_PASSWORD).await {
        Ok(user) => println!("✓ Demo user '{}' ({})", user.login, user.user_id),
        Err(CoreError::EmailTaken(_)) | Err(CoreError::LoginTaken(_)) => {
            println!("⚠ Demo user already exists")
        }
        Err(e) => return Err(e.into()),
    }

    let stores = StoreService::new(Arc::new(db.stores()), Arc::new(db.companies()));
    for (company, city, address, zip) in SHOPS {
        let store = stores
            .create_store(
                NewStore {
                    address: address.to_string(),
                    zip_code: zip.to_string(),
                    city: city.to_string(),
                    country: "FR".to_string(),
                    store_name: format!("{company} {city}"),
                    store_type: StoreType::Shop,
                    url: String::new(),
                },
                company,
            )
            .await?;
        println!("✓ Store {} ({})", store.store_name, store.zip_code);
    }

    let products = ProductService::new(Arc::new(db.products()), Arc::new(db.brands()));
    for (ean, name, brand) in PRODUCTS {
        let product = products
            .create(
                &Product {
                    product_id: String::new(),
                    ean: ean.to_string(),
                    product_name: name.to_string(),
                    brand_id: String::new(),
                },
                brand,
            )
            .await?;
        println!("✓ Product {} [{}]", product.product_name, product.ean);
    }

    println!();
    println!("Login with '{}' / '{}'", DEMO_LOGIN, DEMO_PASSWORD);

    db.close().await;
    Ok(())
}
