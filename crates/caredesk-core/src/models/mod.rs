//! Data models for the console.
//!
//! - `Session`, `Principal`, `PrincipalKind`: authentication results
//! - `Credentials`, `SignupPayload`: transient form input
//! - `Prescription`, `TeamMember`: records shown on the dashboard
//! - `sample`: the embedded datasets behind the dashboard

pub mod badge;
pub mod prescription;
pub mod principal;
pub mod sample;
pub mod team;

pub use badge::BadgeVariant;
pub use prescription::{Prescription, PrescriptionStats, PrescriptionStatus};
pub use principal::{Credentials, Principal, PrincipalKind, Session, SignupPayload};
pub use team::{MemberStatus, TeamMember, TeamStats};
