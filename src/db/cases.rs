//! Cases database operations

use crate::db::models::{Case, NewCase};
use crate::db::DbPool;
use crate::error::Result;
use sqlx::SqliteConnection;
use tracing::debug;

/// Insert one case row per record, all owned by `party_id`.
///
/// Run this inside a transaction: if any insert fails the caller drops the
/// transaction and none of the rows persist. Existing rows are never checked,
/// so repeating a lookup appends another copy of each case.
pub async fn save_cases(
    conn: &mut SqliteConnection,
    party_id: i64,
    cases: &[NewCase],
) -> Result<Vec<i64>> {
    let mut ids = Vec::with_capacity(cases.len());

    for case in cases {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO cases (
                case_number, plaintiff, defendant, subject, last_event, detail_link, party_id
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id
            "#,
        )
        .bind(&case.case_number)
        .bind(&case.plaintiff)
        .bind(&case.defendant)
        .bind(&case.subject)
        .bind(&case.last_event)
        .bind(&case.detail_link)
        .bind(party_id)
        .fetch_one(&mut *conn)
        .await?;

        ids.push(id);
    }

    debug!("Inserted {} case(s) for party {}", ids.len(), party_id);
    Ok(ids)
}

/// List a party's cases in insertion order
pub async fn list_cases_for_party(pool: &DbPool, party_id: i64) -> Result<Vec<Case>> {
    let cases = sqlx::query_as::<_, Case>("SELECT * FROM cases WHERE party_id = ?1 ORDER BY id")
        .bind(party_id)
        .fetch_all(pool)
        .await?;

    Ok(cases)
}

/// Count a party's cases
pub async fn count_cases_for_party(pool: &DbPool, party_id: i64) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM cases WHERE party_id = ?1")
        .bind(party_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Replace the last event text of a case; `updated_at` is refreshed by the store
pub async fn update_last_event(pool: &DbPool, case_id: i64, last_event: &str) -> Result<()> {
    sqlx::query("UPDATE cases SET last_event = ?2 WHERE id = ?1")
        .bind(case_id)
        .bind(last_event)
        .execute(pool)
        .await?;

    Ok(())
}
