use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::BadgeVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrescriptionStatus {
    Active,
    Pending,
    Completed,
    Expired,
    Cancelled,
}

impl PrescriptionStatus {
    pub fn badge(&self) -> BadgeVariant {
        match self {
            PrescriptionStatus::Active => BadgeVariant::Success,
            PrescriptionStatus::Pending => BadgeVariant::Warning,
            PrescriptionStatus::Completed => BadgeVariant::Info,
            PrescriptionStatus::Expired => BadgeVariant::Neutral,
            PrescriptionStatus::Cancelled => BadgeVariant::Danger,
        }
    }
}

impl fmt::Display for PrescriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrescriptionStatus::Active => write!(f, "Active"),
            PrescriptionStatus::Pending => write!(f, "Pending"),
            PrescriptionStatus::Completed => write!(f, "Completed"),
            PrescriptionStatus::Expired => write!(f, "Expired"),
            PrescriptionStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: String,
    pub patient_name: String,
    pub medication: String,
    pub dosage: String,
    pub prescriber: String,
    pub issued_on: NaiveDate,
    pub refills: u8,
    pub status: PrescriptionStatus,
}

/// Counts shown on the summary cards above the prescriptions table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrescriptionStats {
    pub total: usize,
    pub active: usize,
    pub pending: usize,
    pub completed: usize,
}

impl PrescriptionStats {
    pub fn from_records(records: &[Prescription]) -> Self {
        let count = |status: PrescriptionStatus| {
            records.iter().filter(|p| p.status == status).count()
        };
        Self {
            total: records.len(),
            active: count(PrescriptionStatus::Active),
            pending: count(PrescriptionStatus::Pending),
            completed: count(PrescriptionStatus::Completed),
        }
    }
}
