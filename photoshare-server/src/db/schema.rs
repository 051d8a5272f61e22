//! Table setup for photos and users
//!
//! Both statements are `IF NOT EXISTS`; re-running against an existing
//! database is a no-op. Columns added later are not migrated.

use sqlx::PgPool;

pub const CREATE_PHOTOS: &str = r#"
    CREATE TABLE IF NOT EXISTS photos (
        id TEXT PRIMARY KEY,
        filename TEXT NOT NULL,
        "originalName" TEXT NOT NULL,
        title TEXT,
        description TEXT,
        date TEXT NOT NULL,
        "createdAt" TEXT NOT NULL,
        "qrCodeData" TEXT,
        "isPublic" INTEGER DEFAULT 1
    )
"#;

pub const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY DEFAULT 'current-user',
        "firstName" TEXT,
        "lastName" TEXT,
        "birthDate" TEXT,
        email TEXT,
        phone TEXT,
        profession TEXT,
        "zipCode" TEXT,
        city TEXT,
        country TEXT,
        "cryptoSignature" TEXT,
        "updatedAt" TEXT
    )
"#;

/// Create the photos and users tables on a single pooled connection.
pub async fn create_tables(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Creating photos/users tables if missing...");

    let mut conn = pool.acquire().await?;
    sqlx::query(CREATE_PHOTOS).execute(&mut *conn).await?;
    sqlx::query(CREATE_USERS).execute(&mut *conn).await?;

    tracing::info!("Schema ready");
    Ok(())
}
