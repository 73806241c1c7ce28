//! Catalog seeding command.

use rust_decimal::Decimal;

use super::CliError;

/// Demo products inserted by `shop-cli seed`. Prices are in major units
/// with two decimal places.
const DEMO_PRODUCTS: &[(&str, i64)] = &[
    ("Mechanical Keyboard", 12_999),
    ("Wireless Mouse", 4_950),
    ("USB-C Hub", 3_499),
    ("Laptop Stand", 5_900),
    ("Webcam Cover (3-pack)", 799),
];

/// Insert demo catalog products. Skips products whose name already exists
/// so the command is safe to re-run.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), CliError> {
    let pool = super::connect().await?;

    let mut inserted = 0_u32;
    for (name, cents) in DEMO_PRODUCTS {
        let price = Decimal::new(*cents, 2);
        let result = sqlx::query(
            "INSERT INTO products (name, price, active) \
             SELECT $1, $2, TRUE \
             WHERE NOT EXISTS (SELECT 1 FROM products WHERE name = $1)",
        )
        .bind(name)
        .bind(price)
        .execute(&pool)
        .await?;

        inserted += u32::try_from(result.rows_affected()).unwrap_or(0);
    }

    tracing::info!(inserted, "Catalog seeded");
    Ok(())
}
