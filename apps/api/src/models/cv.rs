//! CV data record as sent by the editor. Every section is optional on the
//! wire; missing lists deserialize as empty and simply produce no blocks.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CvData {
    pub personal: PersonalInfo,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    /// In the order the user arranged them.
    pub skill_groups: Vec<SkillGroup>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub job_title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub summary: Option<String>,
    /// Storage path of the uploaded avatar, resolved through the image cache.
    pub avatar_path: Option<String>,
}

impl PersonalInfo {
    /// Non-empty contact fields in display order.
    pub fn contact_items(&self) -> Vec<&str> {
        [&self.email, &self.phone, &self.location, &self.website]
            .into_iter()
            .filter_map(|field| non_empty(field.as_deref()))
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub id: Option<Uuid>,
    pub company: String,
    pub role: String,
    pub location: Option<String>,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    pub description: Option<String>,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub id: Option<Uuid>,
    pub institution: String,
    pub degree: String,
    pub field: Option<String>,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillGroup {
    pub id: Option<Uuid>,
    pub name: String,
    pub skills: Vec<String>,
}

/// Trims and drops empty strings.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// "Jan 2020 - Present", "2018 - Jun 2019" style range. `None` when no start.
pub fn format_date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<String> {
    let start = start?;
    let end = end
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|| "Present".to_string());
    Some(format!("{} - {}", start.format("%b %Y"), end))
}
