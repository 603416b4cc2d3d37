//! Database operations for calls

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use crate::shared::messaging::{Call, CallStatus, CallVerdict};
use crate::shared::{SharedError, UserStatus};

const CALL_COLUMNS: &str = "c.id, c.kind, c.from_user_id, c.to_user_id, c.verdict, c.status, c.started_at, c.ended_at";

fn decode_err(e: SharedError) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(e))
}

fn call_from_row(row: &SqliteRow) -> Result<Call, sqlx::Error> {
    let kind: String = row.try_get("kind")?;
    let verdict: Option<String> = row.try_get("verdict")?;
    let status: String = row.try_get("status")?;

    Ok(Call {
        id: row.try_get("id")?,
        kind: kind.parse().map_err(decode_err)?,
        from: row.try_get("from_user_id")?,
        to: row.try_get("to_user_id")?,
        verdict: verdict
            .map(|v| v.parse::<CallVerdict>())
            .transpose()
            .map_err(decode_err)?,
        status: status.parse().map_err(decode_err)?,
        started_at: row.try_get("started_at")?,
        ended_at: row.try_get("ended_at")?,
    })
}

/// A call joined with the other party's display fields
#[derive(Debug, Clone)]
pub struct CallLogRow {
    pub call: Call,
    pub other_name: String,
    pub other_avatar: Option<String>,
    pub other_status: UserStatus,
}

pub async fn insert_call(pool: &SqlitePool, call: &Call) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO calls (id, kind, from_user_id, to_user_id, verdict, status, started_at, ended_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(call.id)
    .bind(call.kind.as_str())
    .bind(call.from)
    .bind(call.to)
    .bind(call.verdict.map(|v| v.as_str()))
    .bind(call.status.as_str())
    .bind(call.started_at)
    .bind(call.ended_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_call(pool: &SqlitePool, id: Uuid) -> Result<Option<Call>, sqlx::Error> {
    let query = format!("SELECT {CALL_COLUMNS} FROM calls c WHERE c.id = $1");
    let row = sqlx::query(&query).bind(id).fetch_optional(pool).await?;
    row.as_ref().map(call_from_row).transpose()
}

/// Persist verdict, status and end time of a call
pub async fn update_call_state(
    pool: &SqlitePool,
    id: Uuid,
    verdict: Option<CallVerdict>,
    status: CallStatus,
    ended_at: Option<DateTime<Utc>>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE calls SET verdict = $1, status = $2, ended_at = $3 WHERE id = $4")
        .bind(verdict.map(|v| v.as_str()))
        .bind(status.as_str())
        .bind(ended_at)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Calls `user_id` took part in, newest first
pub async fn list_calls_for_user(
    pool: &SqlitePool,
    user_id: Uuid,
) -> Result<Vec<CallLogRow>, sqlx::Error> {
    let query = format!(
        r#"
        SELECT {CALL_COLUMNS},
               u.first_name AS other_name, u.avatar AS other_avatar, u.status AS other_status
        FROM calls c
        JOIN users u ON u.id = CASE WHEN c.from_user_id = $1 THEN c.to_user_id ELSE c.from_user_id END
        WHERE c.from_user_id = $1 OR c.to_user_id = $1
        "#
    );

    let rows = sqlx::query(&query).bind(user_id).fetch_all(pool).await?;

    let mut log = rows
        .iter()
        .map(|row| -> Result<CallLogRow, sqlx::Error> {
            let other_status: String = row.try_get("other_status")?;
            Ok(CallLogRow {
                call: call_from_row(row)?,
                other_name: row.try_get("other_name")?,
                other_avatar: row.try_get("other_avatar")?,
                other_status: other_status.parse().map_err(decode_err)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    log.sort_by(|a, b| b.call.started_at.cmp(&a.call.started_at));
    Ok(log)
}
