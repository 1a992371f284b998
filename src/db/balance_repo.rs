use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::AccountBalance;

/// Fetch the balance row for a user, if one exists.
///
/// Takes any executor so the combined balance+trades read can run it
/// inside a transaction.
pub async fn get_balance<'e, E>(
    executor: E,
    user_id: Uuid,
) -> anyhow::Result<Option<AccountBalance>>
where
    E: sqlx::PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, AccountBalance>(
        "SELECT * FROM account_balances WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await?;

    Ok(row)
}

/// Insert a new balance row. The unique constraint on user_id makes a
/// duplicate insert fail; the caller maps that to a conflict error.
pub async fn insert_balance(
    pool: &PgPool,
    user_id: Uuid,
    initial: Decimal,
) -> Result<AccountBalance, sqlx::Error> {
    sqlx::query_as::<_, AccountBalance>(
        r#"
        INSERT INTO account_balances (user_id, base_balance)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(initial)
    .fetch_one(pool)
    .await
}

/// Idempotent create: inserts only when no row exists, then reads back
/// whichever row won. A second call is a plain read.
pub async fn ensure_balance(
    pool: &PgPool,
    user_id: Uuid,
    initial: Decimal,
) -> anyhow::Result<AccountBalance> {
    sqlx::query(
        r#"
        INSERT INTO account_balances (user_id, base_balance)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(initial)
    .execute(pool)
    .await?;

    let row = sqlx::query_as::<_, AccountBalance>(
        "SELECT * FROM account_balances WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Update the base balance of an existing row. Returns None when the user
/// has no balance row; never inserts.
pub async fn update_balance(
    pool: &PgPool,
    user_id: Uuid,
    amount: Decimal,
) -> anyhow::Result<Option<AccountBalance>> {
    let row = sqlx::query_as::<_, AccountBalance>(
        r#"
        UPDATE account_balances
        SET base_balance = $2, updated_at = NOW()
        WHERE user_id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(amount)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Existence check for a user's balance row.
pub async fn balance_exists(pool: &PgPool, user_id: Uuid) -> anyhow::Result<bool> {
    let row: (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM account_balances WHERE user_id = $1)",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}

/// Delete a user's balance row. Returns the number of rows removed.
pub async fn delete_balance(pool: &PgPool, user_id: Uuid) -> anyhow::Result<u64> {
    let result = sqlx::query("DELETE FROM account_balances WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
