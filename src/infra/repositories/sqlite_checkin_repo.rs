use crate::domain::models::checkin::{CheckinEvent, CheckinOutcome};
use crate::domain::ports::CheckinRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};

pub struct SqliteCheckinRepo {
    pool: SqlitePool,
}

impl SqliteCheckinRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn append_event(
    tx: &mut Transaction<'_, Sqlite>,
    event: &CheckinEvent,
) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO checkin_events (id, guest_id, scope, activity, slot, outcome, scanned_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&event.id)
    .bind(&event.guest_id)
    .bind(&event.scope)
    .bind(&event.activity)
    .bind(&event.slot)
    .bind(&event.outcome)
    .bind(event.scanned_at)
    .execute(&mut **tx)
    .await
    .map_err(AppError::Database)?;
    Ok(())
}

#[async_trait]
impl CheckinRepository for SqliteCheckinRepo {
    async fn check_in_main(&self, guest_id: &str) -> Result<CheckinOutcome, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Single conditional update: of N concurrent scans exactly one
        // flips the flag, the rest observe zero affected rows.
        let result = sqlx::query(
            "UPDATE guests SET checked_in = 1, updated_at = ? WHERE id = ? AND checked_in = 0",
        )
        .bind(Utc::now())
        .bind(guest_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        let outcome = if result.rows_affected() == 1 {
            CheckinOutcome::Success
        } else {
            CheckinOutcome::Duplicate
        };

        append_event(&mut tx, &CheckinEvent::main(guest_id, outcome)).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(outcome)
    }

    async fn check_in_workshop(
        &self,
        guest_id: &str,
        activity: &str,
        slot: &str,
    ) -> Result<CheckinOutcome, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Guarded insert: the success row goes in only if no success exists
        // yet for this (guest, workshop). One statement, so concurrent
        // scans cannot both see "no success yet".
        let event = CheckinEvent::workshop(guest_id, activity, slot, CheckinOutcome::Success);
        let result = sqlx::query(
            "INSERT INTO checkin_events (id, guest_id, scope, activity, slot, outcome, scanned_at)
             SELECT ?, ?, 'workshop', ?, ?, 'success', ?
             WHERE NOT EXISTS (
                 SELECT 1 FROM checkin_events
                 WHERE guest_id = ? AND scope = 'workshop' AND activity = ? AND outcome = 'success'
             )",
        )
        .bind(&event.id)
        .bind(guest_id)
        .bind(activity)
        .bind(slot)
        .bind(event.scanned_at)
        .bind(guest_id)
        .bind(activity)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Database)?;

        let outcome = if result.rows_affected() == 1 {
            CheckinOutcome::Success
        } else {
            let duplicate =
                CheckinEvent::workshop(guest_id, activity, slot, CheckinOutcome::Duplicate);
            append_event(&mut tx, &duplicate).await?;
            CheckinOutcome::Duplicate
        };

        tx.commit().await.map_err(AppError::Database)?;
        Ok(outcome)
    }

    async fn list_events(&self, guest_id: &str) -> Result<Vec<CheckinEvent>, AppError> {
        sqlx::query_as::<_, CheckinEvent>(
            "SELECT * FROM checkin_events WHERE guest_id = ? ORDER BY scanned_at ASC",
        )
        .bind(guest_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::Database)
    }
}
