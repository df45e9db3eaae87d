//! # Seed Data Generator
//!
//! Fills the order history with sample orders for local development.
//!
//! ## Usage
//! ```bash
//! # Generate 50 orders (default)
//! cargo run -p orderdesk-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p orderdesk-db --bin seed -- --count 500
//!
//! # Specify database path (otherwise ORDERDESK_DB_PATH or ./orderdesk.db)
//! cargo run -p orderdesk-db --bin seed -- --db ./data/orders.db
//! ```
//!
//! Orders cycle through the sample catalog's products, plans, contract
//! lengths and add-ons, one day apart, ending today. Tax comes from
//! `ORDERDESK_TAX_RATE` like everywhere else.

use chrono::{Days, Duration, Utc};
use orderdesk_core::calculations::order_total;
use orderdesk_core::catalog::{duration_options, sample_add_ons, sample_products};
use orderdesk_core::{Address, CoreResult, Customer, NewOrderRecord, OrderConfig, OrderSession};
use orderdesk_db::{Database, DbConfig};
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_COUNT: usize = 50;

const COMPANIES: &[(&str, &str, &str, &str)] = &[
    ("Acme Corporation", "Austin", "TX", "78701"),
    ("Globex Industries", "Denver", "CO", "80202"),
    ("Initech LLC", "Portland", "OR", "97201"),
    ("Umbrella Logistics", "Raleigh", "NC", "27601"),
    ("Stark Analytics", "Boston", "MA", "02108"),
    ("Wayne Data Systems", "Chicago", "IL", "60601"),
    ("Hooli Cloud", "San Jose", "CA", "95113"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut count = DEFAULT_COUNT;
    let mut db_config = DbConfig::from_env();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(DEFAULT_COUNT);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_config = DbConfig::new(&args[i + 1]);
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Order History Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of orders to generate (default: {DEFAULT_COUNT})");
                println!("  -d, --db <PATH>    Database file path (default: $ORDERDESK_DB_PATH or ./orderdesk.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => warn!(argument = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    let order_config = OrderConfig::from_env()?;

    info!(
        path = %db_config.database_path.display(),
        count,
        tax_rate = %order_config.tax_rate_percent,
        "Seeding order history"
    );

    let db = Database::new(db_config).await?;
    let orders = db.orders();

    let existing = orders.count().await?;
    if existing > 0 {
        warn!(existing, "Order history is not empty, skipping seed");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let now = Utc::now();
    let mut generated = 0;

    for seed in 0..count {
        let record = sample_order(seed, &order_config)?;
        let created_at = now - Duration::days((count - seed) as i64);

        match orders.save(record.with_created_at(created_at)).await {
            Ok(saved) => {
                generated += 1;
                info!(
                    id = %saved.id,
                    customer = %saved.order.customer.name,
                    total = %order_config.format_money(order_total(&saved.order)),
                    "Seeded order"
                );
            }
            Err(err) => warn!(seed, error = %err, "Failed to save order"),
        }
    }

    info!(
        generated,
        elapsed = ?start.elapsed(),
        stored = orders.count().await?,
        "Seed complete"
    );

    db.close().await;
    Ok(())
}

/// Initializes the tracing subscriber. `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,orderdesk=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Walks a session through the wizard the way a user would.
fn sample_order(seed: usize, config: &OrderConfig) -> CoreResult<NewOrderRecord> {
    let mut session = OrderSession::new(config.clone());

    let (company, city, state, zip) = COMPANIES[seed % COMPANIES.len()];
    session.update_customer(Customer {
        name: company.to_string(),
        pre_populated: seed % 2 == 0,
        company_address: Some(Address {
            line1: format!("{} Main Street", 100 + seed),
            line2: None,
            city: city.to_string(),
            state: state.to_string(),
            zip: zip.to_string(),
        }),
    });
    session.next_step();

    let products = sample_products();
    let product = products[seed % products.len()].clone();
    let plan_id = product.plans[(seed / products.len()) % product.plans.len()]
        .id
        .clone();
    session.select_product(product);
    session.select_plan(&plan_id)?;
    session.next_step();

    // Skip the trailing "custom duration" entry
    let presets: Vec<i32> = duration_options()
        .into_iter()
        .map(|option| option.value)
        .filter(|months| *months > 0)
        .collect();
    session.set_start_date(Utc::now().date_naive().checked_add_days(Days::new((seed % 30) as u64)));
    session.set_duration_months(presets[seed % presets.len()]);
    session.next_step();

    let add_ons = sample_add_ons();
    for (index, add_on) in add_ons.iter().enumerate() {
        if (seed + index) % 3 == 0 {
            session.toggle_add_on(&add_on.id)?;
            session.set_add_on_quantity(&add_on.id, ((seed + index) % 5 + 1) as i64)?;
        }
    }

    session.finalize()
}
