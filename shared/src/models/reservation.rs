//! Reservation Model
//!
//! The single persisted entity plus the two enumerations every layer
//! (validation, storage, JSON API, browser UI) reads its members from.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default per-guest amount applied by the store and pre-filled by the UI
pub const DEFAULT_AMOUNT: f64 = 220.0;

/// Default discount applied by the store and pre-filled by the UI
pub const DEFAULT_DISCOUNT: f64 = 0.0;

/// Minimum number of guests per reservation
pub const MIN_GUESTS: i64 = 1;

/// Maximum number of guests per reservation
pub const MAX_GUESTS: i64 = 12;

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
pub enum ReservationStatus {
    Paid,
    Pending,
    Cancelled,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 3] = [Self::Paid, Self::Pending, Self::Cancelled];

    /// Wire / storage form
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "PAID",
            Self::Pending => "PENDING",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Label shown by the UI
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Paid => "Pagada",
            Self::Pending => "Pendiente",
            Self::Cancelled => "Cancelada",
        }
    }
}

/// Payment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
pub enum PaymentType {
    Cash,
    Card,
    Transfer,
}

impl PaymentType {
    pub const ALL: [PaymentType; 3] = [Self::Cash, Self::Card, Self::Transfer];

    /// Wire / storage form
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Card => "CARD",
            Self::Transfer => "TRANSFER",
        }
    }

    /// Label shown by the UI
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Efectivo",
            Self::Card => "Tarjeta",
            Self::Transfer => "Transferencia",
        }
    }
}

/// Returned by `FromStr` when text is not a member of the enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown variant: {}", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

macro_rules! text_enum {
    ($ty:ident) => {
        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| UnknownVariant(s.to_string()))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

text_enum!(ReservationStatus);
text_enum!(PaymentType);

/// Strip every whitespace character and upper-case the rest.
///
/// Applied to status and payment-type cells coming from spreadsheets
/// (`" pending "`, `"Bank Transfer"` style input) before enum lookup.
pub fn normalize_enum_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Reservation entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Reservation {
    pub id: i64,
    /// Caller-assigned business code, unique across all reservations
    pub code: i64,
    pub full_name: String,
    pub email: String,
    pub number_of_guests: i64,
    pub status: ReservationStatus,
    pub date: NaiveDate,
    /// Per-guest amount
    pub amount: f64,
    pub discount: f64,
    /// `number_of_guests * amount - discount`
    pub total_amount: f64,
    pub payment_type: PaymentType,
    /// Identifier of the CSV row this reservation was imported from
    pub csv_id: Option<String>,
}

/// A candidate that passed every validation rule, ready for the store.
///
/// Only [`super::ReservationInput::validate_into`] builds one outside tests.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReservation {
    pub code: i64,
    pub full_name: String,
    pub email: String,
    pub number_of_guests: i64,
    pub status: ReservationStatus,
    pub date: NaiveDate,
    pub amount: f64,
    pub discount: f64,
    pub payment_type: PaymentType,
    pub csv_id: Option<String>,
}

/// One selectable enumeration member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumOption {
    pub value: String,
    pub label: String,
}

/// Enumeration members exposed to the UI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationOptions {
    pub statuses: Vec<EnumOption>,
    pub payment_types: Vec<EnumOption>,
    pub default_amount: f64,
    pub default_discount: f64,
    pub min_guests: i64,
    pub max_guests: i64,
}

impl ReservationOptions {
    pub fn current() -> Self {
        Self {
            statuses: ReservationStatus::ALL
                .iter()
                .map(|s| EnumOption {
                    value: s.as_str().to_string(),
                    label: s.label().to_string(),
                })
                .collect(),
            payment_types: PaymentType::ALL
                .iter()
                .map(|p| EnumOption {
                    value: p.as_str().to_string(),
                    label: p.label().to_string(),
                })
                .collect(),
            default_amount: DEFAULT_AMOUNT,
            default_discount: DEFAULT_DISCOUNT,
            min_guests: MIN_GUESTS,
            max_guests: MAX_GUESTS,
        }
    }
}
