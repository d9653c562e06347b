use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::BadgeVariant;
use crate::utils::format::initials;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Active,
    OnLeave,
    Inactive,
}

impl MemberStatus {
    pub fn badge(&self) -> BadgeVariant {
        match self {
            MemberStatus::Active => BadgeVariant::Success,
            MemberStatus::OnLeave => BadgeVariant::Warning,
            MemberStatus::Inactive => BadgeVariant::Neutral,
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberStatus::Active => write!(f, "Active"),
            MemberStatus::OnLeave => write!(f, "On leave"),
            MemberStatus::Inactive => write!(f, "Inactive"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: String,
    pub department: String,
    pub joined_on: NaiveDate,
    pub status: MemberStatus,
}

impl TeamMember {
    /// Avatar text for the member row
    pub fn initials(&self) -> String {
        initials(&self.name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamStats {
    pub total: usize,
    pub active: usize,
    pub on_leave: usize,
    pub departments: usize,
}

impl TeamStats {
    pub fn from_members(members: &[TeamMember]) -> Self {
        let departments: HashSet<&str> = members.iter().map(|m| m.department.as_str()).collect();
        Self {
            total: members.len(),
            active: members.iter().filter(|m| m.status == MemberStatus::Active).count(),
            on_leave: members.iter().filter(|m| m.status == MemberStatus::OnLeave).count(),
            departments: departments.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str, department: &str, status: MemberStatus) -> TeamMember {
        TeamMember {
            id: "TM-1".to_string(),
            name: name.to_string(),
            email: "someone@example.com".to_string(),
            phone: None,
            role: "Pharmacist".to_string(),
            department: department.to_string(),
            joined_on: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            status,
        }
    }

    #[test]
    fn test_team_stats() {
        let members = vec![
            member("Ana Ruiz", "Pharmacy", MemberStatus::Active),
            member("Ben Ode", "Pharmacy", MemberStatus::OnLeave),
            member("Cy Lam", "Nursing", MemberStatus::Inactive),
        ];
        let stats = TeamStats::from_members(&members);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.on_leave, 1);
        assert_eq!(stats.departments, 2);
    }

    #[test]
    fn test_member_initials() {
        assert_eq!(member("Ana Ruiz", "Pharmacy", MemberStatus::Active).initials(), "AR");
    }

    #[test]
    fn test_status_display_and_badge() {
        assert_eq!(MemberStatus::OnLeave.to_string(), "On leave");
        assert_eq!(MemberStatus::OnLeave.badge(), BadgeVariant::Warning);
        assert_eq!(MemberStatus::Active.badge(), BadgeVariant::Success);
    }
}
