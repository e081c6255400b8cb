//! Typed row models for the platform resources.
//!
//! These mirror the wire shapes produced by the list endpoints. The cache
//! itself treats rows as opaque JSON objects; these types are used by the
//! data backend and by views that want typed access.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Resource identifiers used in query keys and endpoint paths.
pub mod resources {
    pub const USERS: &str = "users";
    pub const BOOKINGS: &str = "bookings";
    pub const TRANSACTIONS: &str = "transactions";
    pub const TOURS: &str = "tours";
    pub const VERIFICATIONS: &str = "verifications";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub date_joined: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub is_verified: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserRole {
    TourGuide,
    Traveler,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub tour_name: String,
    pub user_name: String,
    pub guide_name: String,
    pub date: DateTime<Utc>,
    pub amount: f64,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Upcoming,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub date: DateTime<Utc>,
    pub description: String,
    pub amount: f64,
    pub status: TransactionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tour_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    TourEarnings,
    Withdrawal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Completed,
    Pending,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub id: String,
    pub title: String,
    pub status: TourStatus,
    pub price: f64,
    pub location: String,
    pub guide: String,
    pub dates: String,
    pub bookings: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TourStatus {
    Active,
    #[serde(rename = "Pending Review")]
    PendingReview,
    Completed,
    Paused,
}

/// An identity-verification request awaiting admin review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    pub id: String,
    pub user: VerificationUser,
    pub nin: String,
    pub submitted_at: DateTime<Utc>,
    pub status: VerificationStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationUser {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

/// Row-level actions exposed by the mutation endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationAction {
    Approve,
    Reject,
}

impl VerificationAction {
    pub fn resulting_status(&self) -> VerificationStatus {
        match self {
            VerificationAction::Approve => VerificationStatus::Approved,
            VerificationAction::Reject => VerificationStatus::Rejected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationAction::Approve => "approve",
            VerificationAction::Reject => "reject",
        }
    }
}

impl std::str::FromStr for VerificationAction {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(VerificationAction::Approve),
            "reject" => Ok(VerificationAction::Reject),
            other => Err(crate::Error::Validation(format!(
                "unknown verification action: {other}"
            ))),
        }
    }
}
