use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum_workshop_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_admin(&pool, "admin@taller.mx", "admin123").await?;
    seed_orders(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}");
    Ok(())
}

async fn ensure_admin(pool: &sqlx::PgPool, email: &str, password: &str) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, 'admin')
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .fetch_optional(pool)
    .await?;

    // If the admin already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured admin {email}");
    Ok(user_id)
}

async fn seed_orders(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let status: (Uuid,) = sqlx::query_as("SELECT id FROM statuses ORDER BY position LIMIT 1")
        .fetch_one(pool)
        .await?;
    let priority: (Uuid,) = sqlx::query_as("SELECT id FROM priorities WHERE name = 'Media'")
        .fetch_one(pool)
        .await?;

    let orders = vec![
        ("UJ-2026-001", "María Rodríguez", "Reloj de pulsera", "Rolex"),
        ("UJ-2026-002", "Andrés López", "Collar", "Cartier"),
        ("UJ-2026-003", "Sofía Martínez", "Anillo", "Tiffany"),
    ];

    for (number, client, device, brand) in orders {
        sqlx::query(
            r#"
            INSERT INTO orders (id, order_number, client_name, device_type, device_brand,
                                status_id, priority_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (order_number) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(number)
        .bind(client)
        .bind(device)
        .bind(brand)
        .bind(status.0)
        .bind(priority.0)
        .execute(pool)
        .await?;
    }

    println!("Seeded sample orders");
    Ok(())
}
