//! Reservation Service
//!
//! Create/update/delete orchestration over the repository: validation,
//! code uniqueness and the derived total.

use serde_json::json;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{NewReservation, Reservation, ReservationInput, Violation};
use sqlx::SqlitePool;

use super::money;
use crate::db::repository::{RepoError, reservation as repo};

#[derive(Clone)]
pub struct ReservationService {
    pool: SqlitePool,
}

impl ReservationService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Every reservation, ordered by id
    pub async fn list(&self) -> AppResult<Vec<Reservation>> {
        Ok(repo::find_all(&self.pool).await?)
    }

    /// Reservations whose email contains `fragment` (case-insensitive)
    pub async fn search(&self, fragment: &str) -> AppResult<Vec<Reservation>> {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return self.list().await;
        }
        Ok(repo::search_by_email(&self.pool, fragment).await?)
    }

    pub async fn get(&self, id: i64) -> AppResult<Reservation> {
        repo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Reservation previously imported from the CSV row with this id
    pub async fn find_by_import_id(&self, csv_id: &str) -> AppResult<Option<Reservation>> {
        Ok(repo::find_by_csv_id(&self.pool, csv_id).await?)
    }

    /// Fail with a conflict when another reservation already holds `code`
    pub async fn verify_unique_code(&self, code: i64, excluding_id: Option<i64>) -> AppResult<()> {
        match repo::find_by_code(&self.pool, code).await? {
            Some(existing) if Some(existing.id) != excluding_id => Err(code_conflict(code)),
            _ => Ok(()),
        }
    }

    pub async fn create(&self, input: ReservationInput) -> AppResult<Reservation> {
        let data = input.validate_into().map_err(validation_error)?;
        self.create_validated(data).await
    }

    /// Store an already-validated candidate
    pub async fn create_validated(&self, data: NewReservation) -> AppResult<Reservation> {
        self.verify_unique_code(data.code, None).await?;

        let total = money::reservation_total(data.number_of_guests, data.amount, data.discount)
            .map_err(out_of_range)?;
        let created = repo::create(&self.pool, &data, total)
            .await
            .map_err(|e| map_write_error(e, &data))?;

        tracing::info!(id = created.id, code = created.code, "Reservation created");
        Ok(created)
    }

    /// Replace every mutable field of reservation `id`
    ///
    /// The import id is kept from the stored record when the input has none.
    pub async fn update(&self, id: i64, input: ReservationInput) -> AppResult<Reservation> {
        let existing = self.get(id).await?;
        let mut data = input.validate_into().map_err(validation_error)?;
        self.verify_unique_code(data.code, Some(existing.id)).await?;

        if data.csv_id.is_none() {
            data.csv_id = existing.csv_id;
        }

        let total = money::reservation_total(data.number_of_guests, data.amount, data.discount)
            .map_err(out_of_range)?;
        let updated = repo::update(&self.pool, id, &data, total)
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => not_found(id),
                other => map_write_error(other, &data),
            })?;

        tracing::info!(id, code = updated.code, "Reservation updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let existing = self.get(id).await?;
        if !repo::delete(&self.pool, existing.id).await? {
            return Err(not_found(id));
        }
        tracing::info!(id, code = existing.code, "Reservation deleted");
        Ok(())
    }
}

fn not_found(id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::ReservationNotFound,
        format!("No se encontro reserva con id {id}"),
    )
    .with_detail("id", id)
}

fn code_conflict(code: i64) -> AppError {
    AppError::with_message(
        ErrorCode::ReservationCodeExists,
        format!("Ya existe una reserva con el codigo {code}"),
    )
    .with_detail("code", code)
}

pub(crate) fn import_id_conflict(csv_id: &str) -> AppError {
    AppError::with_message(
        ErrorCode::ReservationImportIdExists,
        format!("Ya existe una reserva relacionada a ese id {csv_id}"),
    )
    .with_detail("csvId", csv_id)
}

/// Translate a UNIQUE violation raised by the store into the matching conflict
fn map_write_error(err: RepoError, data: &NewReservation) -> AppError {
    if err.is_duplicate_of("code") {
        return code_conflict(data.code);
    }
    if err.is_duplicate_of("csv_id") {
        return import_id_conflict(data.csv_id.as_deref().unwrap_or_default());
    }
    err.into()
}

fn out_of_range(err: money::OutOfRange) -> AppError {
    validation_error(vec![Violation::new(err.field, err.to_string())])
}

/// One `ValidationFailed` error carrying every violation
pub fn validation_error(violations: Vec<Violation>) -> AppError {
    let message = violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    AppError::validation(message).with_detail("violations", json!(violations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::{Numeric, PaymentType, ReservationStatus};

    async fn service() -> ReservationService {
        ReservationService::new(DbService::in_memory().await.unwrap().pool)
    }

    fn input(code: i64) -> ReservationInput {
        ReservationInput {
            code: Some(code.into()),
            full_name: Some("Carla Gómez".into()),
            email: Some(format!("carla{code}@example.com")),
            number_of_guests: Some(3.into()),
            status: Some("PENDING".into()),
            date: Some("2024-08-20".into()),
            amount: Some(220.0.into()),
            discount: Some(15.5.into()),
            total_amount: Some(1.0.into()),
            payment_type: Some("CASH".into()),
            csv_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_computes_total() {
        let svc = service().await;
        let r = svc.create(input(1)).await.unwrap();
        assert_eq!(r.total_amount, 3.0 * 220.0 - 15.5);
        assert_eq!(r.status, ReservationStatus::Pending);
        assert_eq!(r.payment_type, PaymentType::Cash);
        assert_eq!(svc.get(r.id).await.unwrap(), r);
    }

    #[tokio::test]
    async fn test_duplicate_code_conflicts() {
        let svc = service().await;
        svc.create(input(7)).await.unwrap();
        let err = svc.create(input(7)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationCodeExists);
        assert_eq!(err.message, "Ya existe una reserva con el codigo 7");

        let all = svc.list().await.unwrap();
        assert_eq!(all.iter().filter(|r| r.code == 7).count(), 1);
    }

    #[tokio::test]
    async fn test_validation_failure_lists_violations() {
        let svc = service().await;
        let mut bad = input(1);
        bad.number_of_guests = Some(13.into());
        bad.email = Some("nope".into());
        let err = svc.create(bad).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let violations = &err.details.as_ref().unwrap()["violations"];
        assert_eq!(violations[0]["field"], "email");
        assert_eq!(violations[1]["message"], "La cantidad de huéspedes máxima es 12");
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_own_code_succeeds_and_recomputes_total() {
        let svc = service().await;
        let r = svc.create(input(1)).await.unwrap();

        let mut changed = input(1);
        changed.number_of_guests = Some(5.into());
        changed.discount = Some(0.0.into());
        let updated = svc.update(r.id, changed).await.unwrap();
        assert_eq!(updated.id, r.id);
        assert_eq!(updated.number_of_guests, 5);
        assert_eq!(updated.total_amount, 1100.0);
    }

    #[tokio::test]
    async fn test_update_to_taken_code_conflicts() {
        let svc = service().await;
        svc.create(input(1)).await.unwrap();
        let second = svc.create(input(2)).await.unwrap();

        let err = svc.update(second.id, input(1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationCodeExists);
        assert_eq!(svc.get(second.id).await.unwrap().code, 2);
    }

    #[tokio::test]
    async fn test_update_keeps_import_id_when_omitted() {
        let svc = service().await;
        let mut with_id = input(1);
        with_id.csv_id = Some("ROW-9".into());
        let r = svc.create(with_id).await.unwrap();

        let updated = svc.update(r.id, input(1)).await.unwrap();
        assert_eq!(updated.csv_id.as_deref(), Some("ROW-9"));
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let svc = service().await;
        for err in [
            svc.get(42).await.unwrap_err(),
            svc.update(42, input(1)).await.unwrap_err(),
            svc.delete(42).await.unwrap_err(),
        ] {
            assert_eq!(err.code, ErrorCode::ReservationNotFound);
            assert_eq!(err.message, "No se encontro reserva con id 42");
        }
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let svc = service().await;
        let r = svc.create(input(1)).await.unwrap();
        svc.delete(r.id).await.unwrap();
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_by_email_fragment() {
        let svc = service().await;
        svc.create(input(1)).await.unwrap();
        svc.create(input(22)).await.unwrap();

        let hits = svc.search("CARLA22").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code, 22);
        assert_eq!(svc.search("  ").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_import_id_unique_violation_is_translated() {
        let svc = service().await;
        let mut first = input(1);
        first.csv_id = Some("X".into());
        svc.create(first).await.unwrap();

        let mut second = input(2);
        second.csv_id = Some("X".into());
        let err = svc.create(second).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ReservationImportIdExists);
        assert_eq!(err.message, "Ya existe una reserva relacionada a ese id X");
    }

    #[tokio::test]
    async fn test_non_numeric_code_is_rejected() {
        let svc = service().await;
        let mut bad = input(1);
        bad.code = Some(Numeric::Text("uno".into()));
        let err = svc.create(bad).await.unwrap_err();
        assert_eq!(err.message, "El código debe ser un número válido");
    }

    #[tokio::test]
    async fn test_overflowing_total_is_rejected() {
        let svc = service().await;
        let mut huge = input(1);
        huge.amount = Some(1e28.into());
        huge.number_of_guests = Some(12.into());
        huge.discount = Some(0.0.into());
        let err = svc.create(huge).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.message, money::MSG_OUT_OF_RANGE);
        assert_eq!(
            err.details.as_ref().unwrap()["violations"][0]["field"],
            "totalAmount"
        );
        assert!(svc.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unrepresentable_amount_is_not_stored_as_zero() {
        let svc = service().await;
        let mut huge = input(1);
        huge.amount = Some(1e30.into());
        huge.discount = Some(5.0.into());
        let err = svc.create(huge).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details.as_ref().unwrap()["violations"][0]["field"], "amount");

        let r = svc.create(input(2)).await.unwrap();
        let mut changed = input(2);
        changed.discount = Some((-1e30).into());
        let err = svc.update(r.id, changed).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(svc.get(r.id).await.unwrap().total_amount, r.total_amount);
    }
}
