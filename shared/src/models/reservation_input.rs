//! Reservation candidate and its validation rules
//!
//! `ReservationInput` is the shape both the JSON API and the CSV importer
//! produce. The rules are declared once on this struct; a candidate that
//! passes them is turned into a typed [`NewReservation`].

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::reservation::{MAX_GUESTS, MIN_GUESTS, NewReservation, PaymentType, ReservationStatus};

// ── Rule messages ───────────────────────────────────────────────────

pub const MSG_CODE_REQUIRED: &str = "El código no puede ser nulo";
pub const MSG_CODE_NUMERIC: &str = "El código debe ser un número válido";
pub const MSG_NAME_REQUIRED: &str = "El nombre es requerido";
pub const MSG_EMAIL_REQUIRED: &str = "El email es requerido";
pub const MSG_EMAIL_FORMAT: &str = "Formato de email inválido";
pub const MSG_GUESTS_REQUIRED: &str = "La cantidad de huéspedes es requerida";
pub const MSG_GUESTS_NUMERIC: &str = "La cantidad de huéspedes debe ser un número";
pub const MSG_GUESTS_MIN: &str = "La cantidad de huéspedes mínima es 1";
pub const MSG_GUESTS_MAX: &str = "La cantidad de huéspedes máxima es 12";
pub const MSG_STATUS_REQUIRED: &str = "El estado de reserva es requerida";
pub const MSG_STATUS_INVALID: &str = "Estado de reserva inválida";
pub const MSG_DATE_REQUIRED: &str = "La fecha es requerida";
pub const MSG_DATE_FORMAT: &str = "El formato de fecha es incorrecto";
pub const MSG_AMOUNT_REQUIRED: &str = "El monto es requerido";
pub const MSG_DISCOUNT_REQUIRED: &str = "El descuento es requerido";
pub const MSG_PAYMENT_REQUIRED: &str = "El tipo de pago es requerido";
pub const MSG_PAYMENT_INVALID: &str = "Tipo de pago inválido";

/// Largest integer an `f64` (and a JavaScript number) represents exactly
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A numeric-looking value: either a number or the text that failed to parse.
///
/// Keeping the raw text means "not a number" surfaces as a rule violation
/// instead of a decoding failure of the whole candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    /// Coerce a raw cell: numeric-looking text becomes a number.
    pub fn from_cell(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Self::Number(n),
            _ => Self::Text(raw.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    /// The value as an integer, if it is a whole number in the safe range.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_f64()
            .filter(|n| n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER)
            .map(|n| n as i64)
    }
}

impl From<f64> for Numeric {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Numeric {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

/// One field-level rule violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Wire (camelCase) field name
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Reservation-shaped candidate submitted by a client or mapped from a CSV row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReservationInput {
    #[validate(required(message = "El código no puede ser nulo"), custom(function = "validate_code"))]
    pub code: Option<Numeric>,

    #[validate(
        required(message = "El nombre es requerido"),
        length(min = 1, message = "El nombre es requerido")
    )]
    pub full_name: Option<String>,

    #[validate(
        required(message = "El email es requerido"),
        email(message = "Formato de email inválido")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "La cantidad de huéspedes es requerida"),
        custom(function = "validate_guests")
    )]
    pub number_of_guests: Option<Numeric>,

    #[validate(
        required(message = "El estado de reserva es requerida"),
        custom(function = "validate_status")
    )]
    pub status: Option<String>,

    #[validate(required(message = "La fecha es requerida"), custom(function = "validate_date"))]
    pub date: Option<String>,

    #[validate(required(message = "El monto es requerido"), custom(function = "validate_amount"))]
    pub amount: Option<Numeric>,

    #[validate(
        required(message = "El descuento es requerido"),
        custom(function = "validate_discount")
    )]
    pub discount: Option<Numeric>,

    /// Accepted for parity with exported rows; always recomputed by the store
    pub total_amount: Option<Numeric>,

    #[validate(
        required(message = "El tipo de pago es requerido"),
        custom(function = "validate_payment_type")
    )]
    pub payment_type: Option<String>,

    pub csv_id: Option<String>,
}

/// Rust field name → wire field name, in report order
const FIELD_ORDER: [(&str, &str); 9] = [
    ("code", "code"),
    ("full_name", "fullName"),
    ("email", "email"),
    ("number_of_guests", "numberOfGuests"),
    ("status", "status"),
    ("date", "date"),
    ("amount", "amount"),
    ("discount", "discount"),
    ("payment_type", "paymentType"),
];

impl ReservationInput {
    /// Every rule violation, ordered by field declaration order.
    pub fn violations(&self) -> Vec<Violation> {
        let Err(errors) = self.validate() else {
            return Vec::new();
        };
        let by_field = errors.field_errors();

        let mut out = Vec::new();
        for (field, wire) in FIELD_ORDER {
            let Some(list) = by_field.get(field).or_else(|| by_field.get(wire)) else {
                continue;
            };
            for err in list.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                out.push(Violation::new(wire, message));
            }
        }
        out
    }

    /// Run the rules and, on success, produce the typed candidate.
    pub fn validate_into(self) -> Result<NewReservation, Vec<Violation>> {
        let violations = self.violations();
        if !violations.is_empty() {
            return Err(violations);
        }
        self.to_new_reservation()
            .ok_or_else(|| vec![Violation::new("reservation", "Datos inválidos")])
    }

    fn to_new_reservation(&self) -> Option<NewReservation> {
        Some(NewReservation {
            code: self.code.as_ref()?.as_i64()?,
            full_name: self.full_name.clone()?,
            email: self.email.clone()?,
            number_of_guests: self.number_of_guests.as_ref()?.as_i64()?,
            status: self.status.as_deref()?.parse().ok()?,
            date: parse_date(self.date.as_deref()?)?,
            amount: self.amount.as_ref()?.as_f64()?,
            discount: self.discount.as_ref()?.as_f64()?,
            payment_type: self.payment_type.as_deref()?.parse().ok()?,
            csv_id: self
                .csv_id
                .as_ref()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
        })
    }
}

/// Parse an ISO-8601 date or date-time string down to its calendar date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

// ── Custom rules ────────────────────────────────────────────────────

fn violation(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_code(value: &Numeric) -> Result<(), ValidationError> {
    match value.as_i64() {
        Some(_) => Ok(()),
        None => Err(violation("numeric", MSG_CODE_NUMERIC)),
    }
}

fn validate_guests(value: &Numeric) -> Result<(), ValidationError> {
    let guests = value
        .as_i64()
        .ok_or_else(|| violation("numeric", MSG_GUESTS_NUMERIC))?;
    if guests < MIN_GUESTS {
        return Err(violation("min", MSG_GUESTS_MIN));
    }
    if guests > MAX_GUESTS {
        return Err(violation("max", MSG_GUESTS_MAX));
    }
    Ok(())
}

fn validate_status(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<ReservationStatus>()
        .map(|_| ())
        .map_err(|_| violation("enum", MSG_STATUS_INVALID))
}

fn validate_payment_type(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<PaymentType>()
        .map(|_| ())
        .map_err(|_| violation("enum", MSG_PAYMENT_INVALID))
}

fn validate_date(value: &str) -> Result<(), ValidationError> {
    match parse_date(value) {
        Some(_) => Ok(()),
        None => Err(violation("date", MSG_DATE_FORMAT)),
    }
}

fn validate_amount(value: &Numeric) -> Result<(), ValidationError> {
    match value.as_f64() {
        Some(_) => Ok(()),
        None => Err(violation("numeric", MSG_AMOUNT_REQUIRED)),
    }
}

fn validate_discount(value: &Numeric) -> Result<(), ValidationError> {
    match value.as_f64() {
        Some(_) => Ok(()),
        None => Err(violation("numeric", MSG_DISCOUNT_REQUIRED)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> ReservationInput {
        ReservationInput {
            code: Some(1001.into()),
            full_name: Some("Ana Pérez".into()),
            email: Some("ana@example.com".into()),
            number_of_guests: Some(4.into()),
            status: Some("PAID".into()),
            date: Some("2024-05-01".into()),
            amount: Some(220.0.into()),
            discount: Some(20.0.into()),
            total_amount: None,
            payment_type: Some("CARD".into()),
            csv_id: None,
        }
    }

    fn messages(input: &ReservationInput) -> Vec<String> {
        input.violations().into_iter().map(|v| v.message).collect()
    }

    #[test]
    fn test_valid_input_has_no_violations() {
        assert!(valid_input().violations().is_empty());
        let new = valid_input().validate_into().unwrap();
        assert_eq!(new.code, 1001);
        assert_eq!(new.number_of_guests, 4);
        assert_eq!(new.status, ReservationStatus::Paid);
        assert_eq!(new.payment_type, PaymentType::Card);
        assert_eq!(new.date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    }

    #[test]
    fn test_guest_boundaries() {
        for (guests, expected) in [
            (0, Some(MSG_GUESTS_MIN)),
            (1, None),
            (12, None),
            (13, Some(MSG_GUESTS_MAX)),
        ] {
            let mut input = valid_input();
            input.number_of_guests = Some(Numeric::from(guests as i64));
            let got = messages(&input);
            match expected {
                Some(msg) => assert_eq!(got, vec![msg.to_string()], "guests = {guests}"),
                None => assert!(got.is_empty(), "guests = {guests}: {got:?}"),
            }
        }
    }

    #[test]
    fn test_fractional_guests_is_not_a_number() {
        let mut input = valid_input();
        input.number_of_guests = Some(2.5.into());
        assert_eq!(messages(&input), vec![MSG_GUESTS_NUMERIC.to_string()]);
    }

    #[test]
    fn test_missing_fields_report_required_messages_in_field_order() {
        let input = ReservationInput::default();
        assert_eq!(
            messages(&input),
            vec![
                MSG_CODE_REQUIRED,
                MSG_NAME_REQUIRED,
                MSG_EMAIL_REQUIRED,
                MSG_GUESTS_REQUIRED,
                MSG_STATUS_REQUIRED,
                MSG_DATE_REQUIRED,
                MSG_AMOUNT_REQUIRED,
                MSG_DISCOUNT_REQUIRED,
                MSG_PAYMENT_REQUIRED,
            ]
        );
        let fields: Vec<_> = input.violations().into_iter().map(|v| v.field).collect();
        assert_eq!(fields[1], "fullName");
        assert_eq!(fields[8], "paymentType");
    }

    #[test]
    fn test_invalid_email() {
        let mut input = valid_input();
        input.email = Some("not-an-email".into());
        assert_eq!(
            input.violations(),
            vec![Violation::new("email", MSG_EMAIL_FORMAT)]
        );
    }

    #[test]
    fn test_empty_name() {
        let mut input = valid_input();
        input.full_name = Some(String::new());
        assert_eq!(messages(&input), vec![MSG_NAME_REQUIRED.to_string()]);
    }

    #[test]
    fn test_unknown_enum_members() {
        let mut input = valid_input();
        input.status = Some("REFUNDED".into());
        input.payment_type = Some("cash".into());
        assert_eq!(
            messages(&input),
            vec![
                MSG_STATUS_INVALID.to_string(),
                MSG_PAYMENT_INVALID.to_string()
            ]
        );
    }

    #[test]
    fn test_text_code_is_not_numeric() {
        let mut input = valid_input();
        input.code = Some(Numeric::from_cell("ABC-1"));
        assert_eq!(messages(&input), vec![MSG_CODE_NUMERIC.to_string()]);
    }

    #[test]
    fn test_date_formats() {
        assert_eq!(
            parse_date("2024-02-29"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(
            parse_date("2024-03-10T18:30:00Z"),
            NaiveDate::from_ymd_opt(2024, 3, 10)
        );
        assert_eq!(
            parse_date("2024-03-10T18:30:00"),
            NaiveDate::from_ymd_opt(2024, 3, 10)
        );
        assert_eq!(parse_date("2023-02-29"), None);
        assert_eq!(parse_date("10/03/2024"), None);

        let mut input = valid_input();
        input.date = Some("mañana".into());
        assert_eq!(messages(&input), vec![MSG_DATE_FORMAT.to_string()]);
    }

    #[test]
    fn test_numeric_from_cell() {
        assert_eq!(Numeric::from_cell("12"), Numeric::Number(12.0));
        assert_eq!(Numeric::from_cell(" 3.5 "), Numeric::Number(3.5));
        assert_eq!(Numeric::from_cell("NaN"), Numeric::Text("NaN".into()));
        assert_eq!(Numeric::from_cell("doce"), Numeric::Text("doce".into()));
        assert_eq!(Numeric::Number(7.0).as_i64(), Some(7));
        assert_eq!(Numeric::Number(7.5).as_i64(), None);
    }

    #[test]
    fn test_deserialize_camel_case_json() {
        let json = serde_json::json!({
            "code": 5,
            "fullName": "Luis",
            "email": "luis@example.com",
            "numberOfGuests": "3",
            "status": "PENDING",
            "date": "2024-06-01",
            "amount": 220,
            "discount": 0,
            "paymentType": "TRANSFER",
            "id": 99
        });
        let input: ReservationInput = serde_json::from_value(json).unwrap();
        assert_eq!(input.code, Some(Numeric::Number(5.0)));
        assert_eq!(input.number_of_guests, Some(Numeric::Text("3".into())));
        assert_eq!(
            messages(&input),
            vec![MSG_GUESTS_NUMERIC.to_string()]
        );
    }

    #[test]
    fn test_blank_csv_id_is_dropped() {
        let mut input = valid_input();
        input.csv_id = Some("  ".into());
        assert_eq!(input.validate_into().unwrap().csv_id, None);
    }
}
