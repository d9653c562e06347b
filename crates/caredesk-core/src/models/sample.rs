//! Embedded sample collections backing the dashboard list views.
//!
//! The console has no records API yet; these fixtures are deterministic so
//! the views render the same content on every run.

use chrono::NaiveDate;

use super::{MemberStatus, Prescription, PrescriptionStatus, TeamMember};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

#[allow(clippy::too_many_arguments)]
fn prescription(
    id: &str,
    patient_name: &str,
    medication: &str,
    dosage: &str,
    prescriber: &str,
    issued_on: NaiveDate,
    refills: u8,
    status: PrescriptionStatus,
) -> Prescription {
    Prescription {
        id: id.to_string(),
        patient_name: patient_name.to_string(),
        medication: medication.to_string(),
        dosage: dosage.to_string(),
        prescriber: prescriber.to_string(),
        issued_on,
        refills,
        status,
    }
}

pub fn prescriptions() -> Vec<Prescription> {
    use PrescriptionStatus::*;
    vec![
        prescription(
            "RX-1001",
            "Margaret Hollis",
            "Lisinopril",
            "10mg daily",
            "Dr. Amara Okafor",
            date(2025, 1, 6),
            3,
            Active,
        ),
        prescription(
            "RX-1002",
            "Daniel Reyes",
            "Metformin",
            "500mg twice daily",
            "Dr. Amara Okafor",
            date(2025, 1, 9),
            5,
            Active,
        ),
        prescription(
            "RX-1003",
            "Priya Natarajan",
            "Amoxicillin",
            "500mg every 8h",
            "Dr. Lucas Brandt",
            date(2025, 1, 12),
            0,
            Completed,
        ),
        prescription(
            "RX-1004",
            "Thomas Whitfield",
            "Atorvastatin",
            "20mg nightly",
            "Dr. Hana Sato",
            date(2025, 1, 15),
            2,
            Pending,
        ),
        prescription(
            "RX-1005",
            "Grace Mbeki",
            "Levothyroxine",
            "75mcg daily",
            "Dr. Lucas Brandt",
            date(2025, 1, 18),
            6,
            Active,
        ),
        prescription(
            "RX-1006",
            "Oliver Quist",
            "Ibuprofen",
            "400mg as needed",
            "Dr. Hana Sato",
            date(2024, 12, 2),
            0,
            Expired,
        ),
        prescription(
            "RX-1007",
            "Sofia Lindqvist",
            "Sertraline",
            "50mg daily",
            "Dr. Amara Okafor",
            date(2025, 1, 21),
            1,
            Pending,
        ),
        prescription(
            "RX-1008",
            "Marcus Bell",
            "Prednisone",
            "5mg taper",
            "Dr. Lucas Brandt",
            date(2024, 12, 19),
            0,
            Cancelled,
        ),
        prescription(
            "RX-1009",
            "Eleanor Voss",
            "Omeprazole",
            "20mg before breakfast",
            "Dr. Hana Sato",
            date(2025, 1, 24),
            2,
            Completed,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn member(
    id: &str,
    name: &str,
    email: &str,
    phone: Option<&str>,
    role: &str,
    department: &str,
    joined_on: NaiveDate,
    status: MemberStatus,
) -> TeamMember {
    TeamMember {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.map(str::to_string),
        role: role.to_string(),
        department: department.to_string(),
        joined_on,
        status,
    }
}

pub fn team_members() -> Vec<TeamMember> {
    use MemberStatus::*;
    vec![
        member(
            "TM-01",
            "Amara Okafor",
            "amara.okafor@caredesk.example",
            Some("5550142233"),
            "Attending Physician",
            "Internal Medicine",
            date(2021, 4, 12),
            Active,
        ),
        member(
            "TM-02",
            "Lucas Brandt",
            "lucas.brandt@caredesk.example",
            Some("15550198841"),
            "Physician",
            "Family Practice",
            date(2022, 9, 1),
            Active,
        ),
        member(
            "TM-03",
            "Hana Sato",
            "hana.sato@caredesk.example",
            None,
            "Physician",
            "Internal Medicine",
            date(2023, 2, 20),
            OnLeave,
        ),
        member(
            "TM-04",
            "Rafael Ortega",
            "rafael.ortega@caredesk.example",
            Some("555-013-7720"),
            "Clinical Pharmacist",
            "Pharmacy",
            date(2020, 11, 3),
            Active,
        ),
        member(
            "TM-05",
            "Ingrid Halvorsen",
            "ingrid.halvorsen@caredesk.example",
            Some("5550167702"),
            "Nurse Practitioner",
            "Nursing",
            date(2024, 6, 17),
            Active,
        ),
        member(
            "TM-06",
            "Kwame Asante",
            "kwame.asante@caredesk.example",
            None,
            "Pharmacy Technician",
            "Pharmacy",
            date(2019, 8, 26),
            Inactive,
        ),
        member(
            "TM-07",
            "Mei Chen",
            "mei.chen@caredesk.example",
            Some("5550173315"),
            "Operations Coordinator",
            "Administration",
            date(2024, 1, 8),
            Active,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PrescriptionStats, TeamStats};

    #[test]
    fn test_sample_prescriptions_are_stable() {
        let records = prescriptions();
        assert_eq!(records.len(), 9);
        assert_eq!(records[0].id, "RX-1001");
        let stats = PrescriptionStats::from_records(&records);
        assert_eq!(stats.active, 3);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.completed, 2);
    }

    #[test]
    fn test_sample_dates_are_valid() {
        assert!(prescriptions().iter().all(|p| p.issued_on != NaiveDate::MIN));
        assert!(team_members().iter().all(|m| m.joined_on != NaiveDate::MIN));
    }

    #[test]
    fn test_sample_team() {
        let members = team_members();
        let stats = TeamStats::from_members(&members);
        assert_eq!(stats.total, 7);
        assert_eq!(stats.active, 5);
        assert_eq!(stats.on_leave, 1);
        assert_eq!(stats.departments, 5);
    }
}
