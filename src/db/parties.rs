//! Parties database operations

use crate::db::models::{DeletedParty, Party, PartySummary};
use crate::db::DbPool;
use crate::error::Result;
use sqlx::{Executor, Sqlite, SqliteConnection};
use tracing::info;

async fn select_party<'e, E>(executor: E, name: &str) -> Result<Option<Party>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let party = sqlx::query_as::<_, Party>("SELECT id, name FROM parties WHERE name = ?1")
        .bind(name)
        .fetch_optional(executor)
        .await?;

    Ok(party)
}

/// Get party by exact name
pub async fn get_party_by_name(pool: &DbPool, name: &str) -> Result<Option<Party>> {
    select_party(pool, name).await
}

/// Insert a party row.
///
/// A name that already exists fails with `ScraperError::ConstraintViolation`.
pub async fn insert_party(conn: &mut SqliteConnection, name: &str) -> Result<Party> {
    let id = sqlx::query_scalar::<_, i64>("INSERT INTO parties (name) VALUES (?1) RETURNING id")
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;

    Ok(Party {
        id,
        name: name.to_string(),
    })
}

/// Look up a party by exact name, creating it when absent.
///
/// The lookup avoids needless inserts; the UNIQUE constraint still decides,
/// so a concurrent insert of the same name surfaces as a constraint violation.
pub async fn find_or_create_party(conn: &mut SqliteConnection, name: &str) -> Result<Party> {
    if let Some(party) = select_party(&mut *conn, name).await? {
        return Ok(party);
    }

    let party = insert_party(conn, name).await?;
    info!("Created party '{}' (id={})", party.name, party.id);
    Ok(party)
}

/// Party with its derived case count
pub async fn party_summary(pool: &DbPool, name: &str) -> Result<Option<PartySummary>> {
    let summary = sqlx::query_as::<_, PartySummary>(
        r#"
        SELECT p.id, p.name, COUNT(c.id) AS total_cases
        FROM parties p
        LEFT JOIN cases c ON c.party_id = p.id
        WHERE p.name = ?1
        GROUP BY p.id, p.name
        "#,
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(summary)
}

/// Count all parties
pub async fn count_parties(pool: &DbPool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM parties")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Delete a party and, through the foreign key cascade, all of its cases.
///
/// Runs in one transaction. Returns `None` when no party has that name.
pub async fn delete_party(pool: &DbPool, name: &str) -> Result<Option<DeletedParty>> {
    let mut tx = pool.begin().await?;

    let Some(party) = select_party(&mut *tx, name).await? else {
        return Ok(None);
    };

    let cases_removed =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cases WHERE party_id = ?1")
            .bind(party.id)
            .fetch_one(&mut *tx)
            .await?;

    sqlx::query("DELETE FROM parties WHERE id = ?1")
        .bind(party.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(
        "Deleted party '{}' (id={}) with {} case(s)",
        party.name, party.id, cases_removed
    );
    Ok(Some(DeletedParty {
        party,
        cases_removed,
    }))
}
