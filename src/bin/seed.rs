use product_catalog_api::{config::AppConfig, db::create_pool};
use rust_decimal::Decimal;

const CATEGORIES: [&str; 3] = ["Dry Food", "Wet Food", "Treats"];

/// (code, name, description, category, price in cents, variant weights in grams)
const PRODUCTS: [(&str, &str, &str, &str, i64, &[i64]); 4] = [
    ("P001", "Salmon Kibble", "Grain-free salmon kibble", "Dry Food", 89900, &[500, 1500]),
    ("P002", "Chicken Pate", "Smooth chicken pate", "Wet Food", 4500, &[85]),
    ("P003", "Tuna Flakes", "Tuna flakes in broth", "Wet Food", 5200, &[]),
    ("P004", "Freeze-dried Liver", "Single-ingredient liver treats", "Treats", 32000, &[30, 100]),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    for name in CATEGORIES {
        sqlx::query(
            "INSERT INTO categories (category_name) VALUES ($1) ON CONFLICT (category_name) DO NOTHING",
        )
        .bind(name)
        .execute(&pool)
        .await?;
    }
    println!("Seeded categories");

    for (code, name, description, category, cents, weights) in PRODUCTS {
        let existing: Option<i64> =
            sqlx::query_scalar("SELECT id FROM products WHERE product_code = $1")
                .bind(code)
                .fetch_optional(&pool)
                .await?;
        if existing.is_some() {
            println!("Skipping {code}, already present");
            continue;
        }

        let product_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO products (product_code, name, description, category_id, price)
            SELECT $1, $2, $3, c.id, $5 FROM categories c WHERE c.category_name = $4
            RETURNING id
            "#,
        )
        .bind(code)
        .bind(name)
        .bind(description)
        .bind(category)
        .bind(Decimal::new(cents, 2))
        .fetch_one(&pool)
        .await?;

        for grams in weights {
            sqlx::query("INSERT INTO product_variants (product_id, weight) VALUES ($1, $2)")
                .bind(product_id)
                .bind(Decimal::new(*grams, 0))
                .execute(&pool)
                .await?;
        }
        println!("Seeded {code} ({} variants)", weights.len());
    }

    Ok(())
}
