use anyhow::{Result, bail};
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::Job;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    None,
    Title,
    Posted,
}

impl SortKey {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "none" => Ok(SortKey::None),
            "title" => Ok(SortKey::Title),
            "posted" => Ok(SortKey::Posted),
            other => bail!("unknown sort key '{other}' (expected none, title, or posted)"),
        }
    }

    /// Cycle order used by the browse screen.
    pub fn next(self) -> Self {
        match self {
            SortKey::None => SortKey::Title,
            SortKey::Title => SortKey::Posted,
            SortKey::Posted => SortKey::None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::None => "none",
            SortKey::Title => "title",
            SortKey::Posted => "posted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn flip(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// One filtering pass worth of selections. Rebuilt from CLI flags or browse
/// state on every pass; never stored.
#[derive(Debug, Clone, Default)]
pub struct Criteria {
    pub level: Option<String>,
    pub job_type: Option<String>,
    pub skill: Option<String>,
    pub search: String,
    pub sort: SortKey,
    pub order: SortOrder,
}

impl Criteria {
    /// A job passes when every set filter matches exactly and the search
    /// string, if any, appears in the title or detail (case-insensitive).
    pub fn matches(&self, job: &Job) -> bool {
        if self.level.as_deref().is_some_and(|level| job.level != level) {
            return false;
        }
        if self
            .job_type
            .as_deref()
            .is_some_and(|job_type| job.job_type != job_type)
        {
            return false;
        }
        if self.skill.as_deref().is_some_and(|skill| job.skill != skill) {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        job.title.to_lowercase().contains(&needle) || job.detail.to_lowercase().contains(&needle)
    }

    /// Filter, then sort. The sort is stable and descending reverses the
    /// comparator rather than the output, so jobs with equal keys keep their
    /// filtered (input) order in both directions.
    pub fn apply(&self, jobs: &[Job]) -> Vec<Job> {
        let mut matched: Vec<Job> = jobs.iter().filter(|job| self.matches(job)).cloned().collect();

        if self.sort != SortKey::None {
            matched.sort_by(|a, b| {
                let ordering = match self.sort {
                    SortKey::Title => compare_titles(&a.title, &b.title),
                    SortKey::Posted => a.posted_at().cmp(&b.posted_at()),
                    SortKey::None => Ordering::Equal,
                };
                match self.order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        matched
    }
}

/// Case-insensitive title ordering, falling back to the raw strings so
/// titles differing only by case still compare deterministically.
fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Distinct values present for each filterable field, in first-occurrence
/// order. The "All" choice is the caller's concern, never derived from data.
#[derive(Debug, Clone, Default)]
pub struct FilterChoices {
    pub levels: Vec<String>,
    pub types: Vec<String>,
    pub skills: Vec<String>,
}

impl FilterChoices {
    pub fn derive(jobs: &[Job]) -> Self {
        Self {
            levels: distinct(jobs, |job| &job.level),
            types: distinct(jobs, |job| &job.job_type),
            skills: distinct(jobs, |job| &job.skill),
        }
    }
}

fn distinct<'a, F>(jobs: &'a [Job], field: F) -> Vec<String>
where
    F: Fn(&'a Job) -> &'a str,
{
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for job in jobs {
        let value = field(job);
        if seen.insert(value) {
            values.push(value.to_string());
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(no: &str, title: &str, posted: &str, kind: &str, level: &str, skill: &str) -> Job {
        Job {
            job_no: no.to_string(),
            title: title.to_string(),
            link: format!("https://jobs.example.com/{no}"),
            posted: posted.to_string(),
            job_type: kind.to_string(),
            level: level.to_string(),
            estimated_time: "3 months".to_string(),
            skill: skill.to_string(),
            detail: format!("Work on {title}."),
        }
    }

    fn sample() -> Vec<Job> {
        vec![
            job("J-1", "Banana Job", "2024-01-05", "Full-time", "Mid", "Rust"),
            job("J-2", "Apple Job", "2023-06-01", "Part-time", "Entry", "SQL"),
            job("J-3", "Cherry Job", "2023-09-15", "Full-time", "Mid", "Go"),
        ]
    }

    fn titles(jobs: &[Job]) -> Vec<&str> {
        jobs.iter().map(|job| job.title.as_str()).collect()
    }

    #[test]
    fn test_unset_criteria_returns_all_in_input_order() {
        let jobs = sample();
        let result = Criteria::default().apply(&jobs);
        assert_eq!(titles(&result), ["Banana Job", "Apple Job", "Cherry Job"]);
    }

    #[test]
    fn test_level_filter_is_exact_equality() {
        let jobs = sample();
        let criteria = Criteria {
            level: Some("Mid".to_string()),
            ..Criteria::default()
        };
        let result = criteria.apply(&jobs);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|job| job.level == "Mid"));

        // A value present in no record matches nothing, not "contains".
        let criteria = Criteria {
            level: Some("Mi".to_string()),
            ..Criteria::default()
        };
        assert!(criteria.apply(&jobs).is_empty());
    }

    #[test]
    fn test_type_and_skill_filters_combine_with_and() {
        let jobs = sample();
        let criteria = Criteria {
            job_type: Some("Full-time".to_string()),
            skill: Some("Go".to_string()),
            ..Criteria::default()
        };
        let result = criteria.apply(&jobs);
        assert_eq!(titles(&result), ["Cherry Job"]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_and_detail() {
        let jobs = sample();

        let criteria = Criteria {
            search: "BANANA".to_string(),
            ..Criteria::default()
        };
        assert_eq!(titles(&criteria.apply(&jobs)), ["Banana Job"]);

        // "work on" only appears in the detail text.
        let criteria = Criteria {
            search: "Work ON cherry".to_string(),
            ..Criteria::default()
        };
        assert_eq!(titles(&criteria.apply(&jobs)), ["Cherry Job"]);

        let criteria = Criteria {
            search: "no such job".to_string(),
            ..Criteria::default()
        };
        assert!(criteria.apply(&jobs).is_empty());
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let jobs = sample();
        let criteria = Criteria {
            job_type: Some("Full-time".to_string()),
            search: "job".to_string(),
            ..Criteria::default()
        };
        let once = criteria.apply(&jobs);
        let twice = criteria.apply(&once);
        assert_eq!(titles(&once), titles(&twice));
    }

    #[test]
    fn test_title_sort_ascending_and_descending() {
        let jobs = sample();

        let criteria = Criteria {
            sort: SortKey::Title,
            ..Criteria::default()
        };
        assert_eq!(
            titles(&criteria.apply(&jobs)),
            ["Apple Job", "Banana Job", "Cherry Job"]
        );

        let criteria = Criteria {
            sort: SortKey::Title,
            order: SortOrder::Descending,
            ..Criteria::default()
        };
        assert_eq!(
            titles(&criteria.apply(&jobs)),
            ["Cherry Job", "Banana Job", "Apple Job"]
        );
    }

    #[test]
    fn test_title_sort_ignores_case() {
        let jobs = vec![
            job("J-1", "banana Job", "2024-01-05", "Full-time", "Mid", "Rust"),
            job("J-2", "Apple Job", "2023-06-01", "Part-time", "Entry", "SQL"),
        ];
        let criteria = Criteria {
            sort: SortKey::Title,
            ..Criteria::default()
        };
        assert_eq!(titles(&criteria.apply(&jobs)), ["Apple Job", "banana Job"]);
    }

    #[test]
    fn test_posted_sort_ascending_and_descending() {
        let jobs = sample();

        let criteria = Criteria {
            sort: SortKey::Posted,
            ..Criteria::default()
        };
        assert_eq!(
            titles(&criteria.apply(&jobs)),
            ["Apple Job", "Cherry Job", "Banana Job"]
        );

        let criteria = Criteria {
            sort: SortKey::Posted,
            order: SortOrder::Descending,
            ..Criteria::default()
        };
        assert_eq!(
            titles(&criteria.apply(&jobs)),
            ["Banana Job", "Cherry Job", "Apple Job"]
        );
    }

    #[test]
    fn test_unparseable_posted_sorts_earliest() {
        let jobs = vec![
            job("J-1", "Dated", "2023-06-01", "Full-time", "Mid", "Rust"),
            job("J-2", "Undated", "whenever", "Full-time", "Mid", "Rust"),
        ];
        let criteria = Criteria {
            sort: SortKey::Posted,
            ..Criteria::default()
        };
        assert_eq!(titles(&criteria.apply(&jobs)), ["Undated", "Dated"]);
    }

    #[test]
    fn test_equal_sort_keys_keep_filtered_order_both_directions() {
        let jobs = vec![
            job("J-1", "Same Title", "2024-01-05", "Full-time", "Mid", "Rust"),
            job("J-2", "Same Title", "2023-06-01", "Part-time", "Entry", "SQL"),
            job("J-3", "Same Title", "2023-09-15", "Full-time", "Mid", "Go"),
        ];
        let nos = |jobs: &[Job]| -> Vec<String> {
            jobs.iter().map(|job| job.job_no.clone()).collect()
        };

        let criteria = Criteria {
            sort: SortKey::Title,
            ..Criteria::default()
        };
        assert_eq!(nos(&criteria.apply(&jobs)), ["J-1", "J-2", "J-3"]);

        let criteria = Criteria {
            sort: SortKey::Title,
            order: SortOrder::Descending,
            ..Criteria::default()
        };
        assert_eq!(nos(&criteria.apply(&jobs)), ["J-1", "J-2", "J-3"]);
    }

    #[test]
    fn test_filter_applies_before_sort() {
        let jobs = sample();
        let criteria = Criteria {
            job_type: Some("Full-time".to_string()),
            sort: SortKey::Title,
            ..Criteria::default()
        };
        assert_eq!(titles(&criteria.apply(&jobs)), ["Banana Job", "Cherry Job"]);
    }

    #[test]
    fn test_filter_choices_first_occurrence_deduplicated() {
        let jobs = vec![
            job("J-1", "A", "2024-01-05", "Full-time", "Mid", "Rust"),
            job("J-2", "B", "2023-06-01", "Part-time", "Entry", "SQL"),
            job("J-3", "C", "2023-09-15", "Full-time", "Mid", "Rust"),
        ];
        let choices = FilterChoices::derive(&jobs);
        assert_eq!(choices.levels, ["Mid", "Entry"]);
        assert_eq!(choices.types, ["Full-time", "Part-time"]);
        assert_eq!(choices.skills, ["Rust", "SQL"]);
    }

    #[test]
    fn test_filter_choices_empty_input() {
        let choices = FilterChoices::derive(&[]);
        assert!(choices.levels.is_empty());
        assert!(choices.types.is_empty());
        assert!(choices.skills.is_empty());
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::parse("none").unwrap(), SortKey::None);
        assert_eq!(SortKey::parse("title").unwrap(), SortKey::Title);
        assert_eq!(SortKey::parse("posted").unwrap(), SortKey::Posted);
        assert!(SortKey::parse("salary").is_err());
    }

    #[test]
    fn test_sort_key_cycle_wraps() {
        assert_eq!(SortKey::None.next(), SortKey::Title);
        assert_eq!(SortKey::Title.next(), SortKey::Posted);
        assert_eq!(SortKey::Posted.next(), SortKey::None);
    }
}
