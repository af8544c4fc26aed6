use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// One job listing from the export. Every field is required and non-empty;
/// `loader` rejects the whole file otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "Job No")]
    pub job_no: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Job Page Link")]
    pub link: String,
    #[serde(rename = "Posted")]
    pub posted: String,
    #[serde(rename = "Type")]
    pub job_type: String,
    #[serde(rename = "Level")]
    pub level: String,
    #[serde(rename = "Estimated Time")]
    pub estimated_time: String,
    #[serde(rename = "Skill")]
    pub skill: String,
    #[serde(rename = "Detail")]
    pub detail: String,
}

impl Job {
    /// One-line summary shown in list views.
    pub fn summary(&self) -> String {
        format!(
            "{} - {} - {} - {}",
            self.title, self.job_type, self.level, self.skill
        )
    }

    pub fn is_complete(&self) -> bool {
        [
            &self.job_no,
            &self.title,
            &self.link,
            &self.posted,
            &self.job_type,
            &self.level,
            &self.estimated_time,
            &self.skill,
            &self.detail,
        ]
        .iter()
        .all(|field| !field.is_empty())
    }

    /// Posted timestamp, if the string parses under any accepted format.
    /// Only used for sort comparison; display always shows the raw string.
    pub fn posted_at(&self) -> Option<NaiveDateTime> {
        parse_posted(&self.posted)
    }
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%b %d, %Y"];

fn parse_posted(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date.and_time(NaiveTime::MIN));
        }
    }

    None
}
