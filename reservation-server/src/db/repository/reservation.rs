//! Reservation Repository

use super::{RepoError, RepoResult};
use shared::models::{NewReservation, Reservation};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, code, full_name, email, number_of_guests, status, date, amount, discount, total_amount, payment_type, csv_id";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Reservation>> {
    let sql = format!("SELECT {COLUMNS} FROM reservation ORDER BY id");
    let rows = sqlx::query_as::<_, Reservation>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Reservations whose email contains `fragment`, case-insensitively
pub async fn search_by_email(pool: &SqlitePool, fragment: &str) -> RepoResult<Vec<Reservation>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM reservation WHERE instr(lower(email), lower(?)) > 0 ORDER BY id"
    );
    let rows = sqlx::query_as::<_, Reservation>(&sql)
        .bind(fragment)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Reservation>> {
    let sql = format!("SELECT {COLUMNS} FROM reservation WHERE id = ?");
    let row = sqlx::query_as::<_, Reservation>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_code(pool: &SqlitePool, code: i64) -> RepoResult<Option<Reservation>> {
    let sql = format!("SELECT {COLUMNS} FROM reservation WHERE code = ? LIMIT 1");
    let row = sqlx::query_as::<_, Reservation>(&sql)
        .bind(code)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_csv_id(pool: &SqlitePool, csv_id: &str) -> RepoResult<Option<Reservation>> {
    let sql = format!("SELECT {COLUMNS} FROM reservation WHERE csv_id = ? LIMIT 1");
    let row = sqlx::query_as::<_, Reservation>(&sql)
        .bind(csv_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(
    pool: &SqlitePool,
    data: &NewReservation,
    total_amount: f64,
) -> RepoResult<Reservation> {
    let sql = format!(
        "INSERT INTO reservation (code, full_name, email, number_of_guests, status, date, amount, discount, total_amount, payment_type, csv_id) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {COLUMNS}"
    );
    let row = sqlx::query_as::<_, Reservation>(&sql)
        .bind(data.code)
        .bind(&data.full_name)
        .bind(&data.email)
        .bind(data.number_of_guests)
        .bind(data.status)
        .bind(data.date)
        .bind(data.amount)
        .bind(data.discount)
        .bind(total_amount)
        .bind(data.payment_type)
        .bind(&data.csv_id)
        .fetch_one(pool)
        .await?;
    Ok(row)
}

/// Replace every mutable column of reservation `id`
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: &NewReservation,
    total_amount: f64,
) -> RepoResult<Reservation> {
    let sql = format!(
        "UPDATE reservation SET code = ?, full_name = ?, email = ?, number_of_guests = ?, status = ?, date = ?, \
         amount = ?, discount = ?, total_amount = ?, payment_type = ?, csv_id = ? \
         WHERE id = ? RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, Reservation>(&sql)
        .bind(data.code)
        .bind(&data.full_name)
        .bind(&data.email)
        .bind(data.number_of_guests)
        .bind(data.status)
        .bind(data.date)
        .bind(data.amount)
        .bind(data.discount)
        .bind(total_amount)
        .bind(data.payment_type)
        .bind(&data.csv_id)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Reservation {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query("DELETE FROM reservation WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
