use sqlx::PgPool;
use uuid::Uuid;

/// A persisted preference-store snapshot: schema version plus payload.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PrefSnapshot {
    pub version: i32,
    pub data: serde_json::Value,
}

/// Load a user's snapshot for one store (e.g. "tour", "filters").
pub async fn get_snapshot(
    pool: &PgPool,
    user_id: Uuid,
    store: &str,
) -> anyhow::Result<Option<PrefSnapshot>> {
    let snapshot = sqlx::query_as::<_, PrefSnapshot>(
        "SELECT version, data FROM user_prefs WHERE user_id = $1 AND store = $2",
    )
    .bind(user_id)
    .bind(store)
    .fetch_optional(pool)
    .await?;

    Ok(snapshot)
}

/// Upsert a user's snapshot for one store.
pub async fn put_snapshot(
    pool: &PgPool,
    user_id: Uuid,
    store: &str,
    version: i32,
    data: &serde_json::Value,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_prefs (user_id, store, version, data, updated_at)
        VALUES ($1, $2, $3, $4, NOW())
        ON CONFLICT (user_id, store) DO UPDATE
            SET version = $3, data = $4, updated_at = NOW()
        "#,
    )
    .bind(user_id)
    .bind(store)
    .bind(version)
    .bind(data)
    .execute(pool)
    .await?;

    Ok(())
}
