//! Canonical job model, payload normalization, and the pure filter/sort engine.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

pub const CRATE_NAME: &str = "joblens-core";

/// Display placeholder for absent or unparseable optional fields.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Tolerant decode target for one element of the raw `/jobs` payload.
///
/// Every field is optional and loosely typed so one malformed record can
/// never fail the whole fetch; [`normalize_job`] coerces it into shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawJob {
    #[serde(default, alias = "_id")]
    pub id: Option<JsonValue>,
    #[serde(default)]
    pub title: Option<JsonValue>,
    #[serde(default)]
    pub company: Option<JsonValue>,
    #[serde(default)]
    pub location: Option<JsonValue>,
    #[serde(default, alias = "workLocation")]
    pub work_location: Option<JsonValue>,
    #[serde(default, alias = "jobType")]
    pub job_type: Option<JsonValue>,
    #[serde(default)]
    pub experience: Option<JsonValue>,
    #[serde(default, alias = "salaryMin")]
    pub salary_min: Option<JsonValue>,
    #[serde(default, alias = "salaryMax")]
    pub salary_max: Option<JsonValue>,
    #[serde(default, alias = "salaryType")]
    pub salary_type: Option<JsonValue>,
    #[serde(default, alias = "datePosted")]
    pub date_posted: Option<JsonValue>,
    #[serde(default, alias = "companySize")]
    pub company_size: Option<JsonValue>,
    #[serde(default)]
    pub skills: Option<JsonValue>,
    #[serde(default, alias = "hiringMultiple")]
    pub hiring_multiple: Option<JsonValue>,
    #[serde(default, alias = "urgentHiring")]
    pub urgent_hiring: Option<JsonValue>,
    #[serde(default, alias = "jobPriority")]
    pub job_priority: Option<JsonValue>,
    #[serde(default)]
    pub description: Option<JsonValue>,
    #[serde(default, alias = "applyUrl")]
    pub apply_url: Option<JsonValue>,
}

/// Canonical job record held in the working set.
///
/// List-like fields (`work_location`, `job_type`, `skills`) are comma-joined
/// display strings; re-normalizing one is a no-op.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub work_location: String,
    pub job_type: String,
    pub experience: String,
    pub salary_min: String,
    pub salary_max: String,
    pub salary_type: String,
    pub date_posted: Option<DateTime<Utc>>,
    pub company_size: String,
    pub skills: String,
    pub hiring_multiple: bool,
    pub urgent_hiring: bool,
    pub job_priority: Option<JobPriority>,
    pub description: String,
    pub apply_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobPriority {
    Normal,
    High,
    Urgent,
}

impl JobPriority {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "high" => Some(Self::High),
            "urgent" => Some(Self::Urgent),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

/// City suggestion row from the remote `/cities` endpoint; display-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    pub name: String,
}

/// Numeric salary interval with `min <= max` guaranteed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
}

impl SalaryRange {
    /// Parse raw min/max strings into an interval.
    ///
    /// Each side parses as a float with a leading-numeric-prefix rule
    /// (`"20k"` reads as 20). An unparseable side borrows the other side's
    /// value; both unparseable yields `[0, 0]`. The upper bound is lifted to
    /// `max(min, max)` so the invariant holds for inverted inputs.
    pub fn parse(raw_min: &str, raw_max: &str) -> Self {
        let min = parse_amount(raw_min);
        let max = parse_amount(raw_max);
        let (min, max) = match (min, max) {
            (Some(lo), Some(hi)) => (lo, hi),
            (Some(lo), None) => (lo, lo),
            (None, Some(hi)) => (hi, hi),
            (None, None) => (0.0, 0.0),
        };
        Self {
            min,
            max: min.max(max),
        }
    }
}

fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let mut end = 0;
    for (idx, ch) in trimmed.char_indices() {
        let leading_sign = idx == 0 && (ch == '-' || ch == '+');
        if ch.is_ascii_digit() || ch == '.' || leading_sign {
            end = idx + ch.len_utf8();
        } else {
            break;
        }
    }
    trimmed[..end].parse::<f64>().ok()
}

/// Relative date-posted window selected in the filter bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DatePostedBucket {
    #[default]
    Any,
    Last24h,
    Last3d,
    Last7d,
    Last30d,
}

impl DatePostedBucket {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "24h" => Self::Last24h,
            "3d" => Self::Last3d,
            "7d" => Self::Last7d,
            "30d" => Self::Last30d,
            _ => Self::Any,
        }
    }

    /// Window length, or `None` when the bucket is a wildcard.
    pub fn window(self) -> Option<chrono::Duration> {
        match self {
            Self::Any => None,
            Self::Last24h => Some(chrono::Duration::hours(24)),
            Self::Last3d => Some(chrono::Duration::days(3)),
            Self::Last7d => Some(chrono::Duration::days(7)),
            Self::Last30d => Some(chrono::Duration::days(30)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "",
            Self::Last24h => "24h",
            Self::Last3d => "3d",
            Self::Last7d => "7d",
            Self::Last30d => "30d",
        }
    }
}

impl From<String> for DatePostedBucket {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<DatePostedBucket> for String {
    fn from(bucket: DatePostedBucket) -> Self {
        bucket.as_str().to_string()
    }
}

/// Salary sort direction; `Unsorted` preserves insertion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortOrder {
    #[default]
    Unsorted,
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "asc" => Self::Ascending,
            "desc" => Self::Descending,
            _ => Self::Unsorted,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unsorted => "",
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl From<String> for SortOrder {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<SortOrder> for String {
    fn from(order: SortOrder) -> Self {
        order.as_str().to_string()
    }
}

/// Flat bundle of simultaneous filter inputs.
///
/// An empty field is a wildcard and never excludes a record. Serde
/// round-trips so a navigation layer can pre-seed criteria (e.g. `city=X`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub query: String,
    pub job_type: String,
    pub experience: String,
    pub min_salary: String,
    pub max_salary: String,
    pub work_location: String,
    pub date_posted: DatePostedBucket,
    pub company_size: String,
    pub skill: String,
    pub city: String,
    pub role: String,
    pub hiring_multiple: String,
    pub urgent_hiring: String,
    pub priority: String,
    pub sort: SortOrder,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Normalize one list-like raw value into a comma-joined display string.
///
/// Arrays join with `", "`. A string starting with `[` is tried as a JSON
/// array first, then falls back to comma splitting. Anything else splits on
/// commas, trims, and drops empty parts. Idempotent for every encoding.
pub fn normalize_list_field(value: Option<&JsonValue>) -> String {
    let Some(value) = value else {
        return NOT_SPECIFIED.to_string();
    };
    match value {
        JsonValue::Array(items) => join_or_default(items.iter().map(display_scalar)),
        JsonValue::String(raw) => normalize_list_string(raw),
        JsonValue::Null => NOT_SPECIFIED.to_string(),
        other => other.to_string(),
    }
}

fn normalize_list_string(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return NOT_SPECIFIED.to_string();
    }
    if trimmed.starts_with('[') {
        if let Ok(JsonValue::Array(items)) = serde_json::from_str::<JsonValue>(trimmed) {
            return join_or_default(items.iter().map(display_scalar));
        }
    }
    join_or_default(trimmed.split(',').map(|part| part.trim().to_string()))
}

fn join_or_default(parts: impl Iterator<Item = String>) -> String {
    let joined = parts
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        joined
    }
}

fn display_scalar(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.trim().to_string(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

fn normalize_scalar_field(value: Option<&JsonValue>) -> String {
    match value {
        Some(JsonValue::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(JsonValue::Null) | Some(JsonValue::String(_)) | None => NOT_SPECIFIED.to_string(),
        Some(other) => other.to_string(),
    }
}

fn normalize_flag(value: Option<&JsonValue>) -> bool {
    match value {
        Some(JsonValue::Bool(flag)) => *flag,
        Some(JsonValue::String(s)) => {
            matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "1")
        }
        Some(JsonValue::Number(n)) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
        _ => false,
    }
}

fn normalize_date(value: Option<&JsonValue>) -> Option<DateTime<Utc>> {
    match value? {
        JsonValue::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        JsonValue::Number(n) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

fn normalize_priority(value: Option<&JsonValue>) -> Option<JobPriority> {
    match value? {
        JsonValue::String(s) => JobPriority::parse(s),
        _ => None,
    }
}

/// Coerce a raw payload element into a [`JobRecord`]. Pure; malformed
/// optional fields degrade to defaults instead of failing.
pub fn normalize_job(raw: &RawJob) -> JobRecord {
    JobRecord {
        id: normalize_scalar_field(raw.id.as_ref()),
        title: normalize_scalar_field(raw.title.as_ref()),
        company: normalize_scalar_field(raw.company.as_ref()),
        location: normalize_scalar_field(raw.location.as_ref()),
        work_location: normalize_list_field(raw.work_location.as_ref()),
        job_type: normalize_list_field(raw.job_type.as_ref()),
        experience: normalize_scalar_field(raw.experience.as_ref()),
        salary_min: normalize_scalar_field(raw.salary_min.as_ref()),
        salary_max: normalize_scalar_field(raw.salary_max.as_ref()),
        salary_type: normalize_scalar_field(raw.salary_type.as_ref()),
        date_posted: normalize_date(raw.date_posted.as_ref()),
        company_size: normalize_scalar_field(raw.company_size.as_ref()),
        skills: normalize_list_field(raw.skills.as_ref()),
        hiring_multiple: normalize_flag(raw.hiring_multiple.as_ref()),
        urgent_hiring: normalize_flag(raw.urgent_hiring.as_ref()),
        job_priority: normalize_priority(raw.job_priority.as_ref()),
        description: normalize_scalar_field(raw.description.as_ref()),
        apply_url: normalize_scalar_field(raw.apply_url.as_ref()),
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn substring_criterion(criterion: &str, field: &str) -> bool {
    let needle = criterion.trim();
    needle.is_empty() || contains_ci(field, needle)
}

fn flag_criterion(criterion: &str, flag: bool) -> bool {
    let wanted = criterion.trim();
    if wanted.is_empty() {
        true
    } else if wanted.eq_ignore_ascii_case("yes") {
        flag
    } else {
        !flag
    }
}

/// Evaluate every criterion independently and AND the verdicts.
pub fn matches(record: &JobRecord, criteria: &FilterCriteria, now: DateTime<Utc>) -> bool {
    let query = criteria.query.trim();
    if !query.is_empty()
        && !contains_ci(&record.title, query)
        && !contains_ci(&record.company, query)
    {
        return false;
    }

    // Category fields match by containment on purpose: "full" finds "Full time".
    if !substring_criterion(&criteria.job_type, &record.job_type)
        || !substring_criterion(&criteria.work_location, &record.work_location)
        || !substring_criterion(&criteria.city, &record.location)
        || !substring_criterion(&criteria.role, &record.title)
        || !substring_criterion(&criteria.company_size, &record.company_size)
        || !substring_criterion(&criteria.skill, &record.skills)
    {
        return false;
    }

    let experience = criteria.experience.trim();
    if !experience.is_empty() && !record.experience.trim().eq_ignore_ascii_case(experience) {
        return false;
    }

    // Interval overlap, not containment.
    let range = SalaryRange::parse(&record.salary_min, &record.salary_max);
    if let Some(want_min) = parse_amount(&criteria.min_salary) {
        if range.max < want_min {
            return false;
        }
    }
    if let Some(want_max) = parse_amount(&criteria.max_salary) {
        if range.min > want_max {
            return false;
        }
    }

    if let Some(window) = criteria.date_posted.window() {
        match record.date_posted {
            Some(posted) => {
                if now.signed_duration_since(posted) > window {
                    return false;
                }
            }
            // A record without a date never matches a non-empty bucket.
            None => return false,
        }
    }

    if !flag_criterion(&criteria.hiring_multiple, record.hiring_multiple)
        || !flag_criterion(&criteria.urgent_hiring, record.urgent_hiring)
    {
        return false;
    }

    let priority = criteria.priority.trim();
    if !priority.is_empty() {
        // Absent priority fails the criterion instead of panicking.
        match record.job_priority {
            Some(actual) => {
                if !actual.as_str().eq_ignore_ascii_case(priority) {
                    return false;
                }
            }
            None => return false,
        }
    }

    true
}

fn sort_key(record: &JobRecord) -> f64 {
    SalaryRange::parse(&record.salary_min, &record.salary_max).min
}

/// Stable in-place sort by the salary interval's lower bound.
pub fn sort_jobs(jobs: &mut [JobRecord], order: SortOrder) {
    match order {
        SortOrder::Unsorted => {}
        SortOrder::Ascending => jobs.sort_by(|a, b| sort_key(a).total_cmp(&sort_key(b))),
        SortOrder::Descending => jobs.sort_by(|a, b| sort_key(b).total_cmp(&sort_key(a))),
    }
}

/// Ids of the top 3 records of a descending salary order; display emphasis
/// only, never a data-model property.
pub fn top_salary_ids(ordered: &[JobRecord], order: SortOrder) -> Vec<String> {
    if order != SortOrder::Descending {
        return Vec::new();
    }
    ordered.iter().take(3).map(|job| job.id.clone()).collect()
}

/// The single recomputation path from working set + criteria to ordered
/// results. Pure and deterministic for fixed inputs; callers pass `now` so
/// date-bucket evaluation stays reproducible.
pub struct FilterEngine;

impl FilterEngine {
    pub fn apply(
        working_set: &[JobRecord],
        criteria: &FilterCriteria,
        now: DateTime<Utc>,
    ) -> Vec<JobRecord> {
        let mut ordered = working_set
            .iter()
            .filter(|record| matches(record, criteria, now))
            .cloned()
            .collect::<Vec<_>>();
        sort_jobs(&mut ordered, criteria.sort);
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn job(id: &str, title: &str, company: &str) -> JobRecord {
        JobRecord {
            id: id.to_string(),
            title: title.to_string(),
            company: company.to_string(),
            location: "Pune".to_string(),
            work_location: "Remote".to_string(),
            job_type: "Full time".to_string(),
            experience: "2-4 years".to_string(),
            salary_min: "10000".to_string(),
            salary_max: "20000".to_string(),
            salary_type: "monthly".to_string(),
            date_posted: None,
            company_size: "11-50".to_string(),
            skills: "rust, sql".to_string(),
            hiring_multiple: false,
            urgent_hiring: false,
            job_priority: None,
            description: NOT_SPECIFIED.to_string(),
            apply_url: NOT_SPECIFIED.to_string(),
        }
    }

    fn salaried(id: &str, min: &str, max: &str) -> JobRecord {
        let mut record = job(id, "Engineer", "Acme");
        record.salary_min = min.to_string();
        record.salary_max = max.to_string();
        record
    }

    #[test]
    fn list_field_joins_every_encoding_the_same_way() {
        let from_array = normalize_list_field(Some(&json!(["Remote", "Hybrid"])));
        let from_json_string = normalize_list_field(Some(&json!("[\"Remote\", \"Hybrid\"]")));
        let from_comma_string = normalize_list_field(Some(&json!("Remote ,  Hybrid")));

        assert_eq!(from_array, "Remote, Hybrid");
        assert_eq!(from_json_string, "Remote, Hybrid");
        assert_eq!(from_comma_string, "Remote, Hybrid");
    }

    #[test]
    fn list_field_normalization_is_idempotent() {
        for raw in [
            json!(["Remote", "On site"]),
            json!("[\"Remote\",\"On site\"]"),
            json!("Remote, On site"),
            json!("[broken json"),
            json!(""),
            json!(null),
        ] {
            let once = normalize_list_field(Some(&raw));
            let twice = normalize_list_field(Some(&json!(once.clone())));
            assert_eq!(once, twice, "not idempotent for {raw}");
        }
    }

    #[test]
    fn list_field_defaults_and_fallbacks() {
        assert_eq!(normalize_list_field(None), NOT_SPECIFIED);
        assert_eq!(normalize_list_field(Some(&json!(""))), NOT_SPECIFIED);
        assert_eq!(normalize_list_field(Some(&json!([]))), NOT_SPECIFIED);
        // Malformed JSON-ish string falls back to comma splitting.
        assert_eq!(normalize_list_field(Some(&json!("[a, b"))), "[a, b");
        assert_eq!(normalize_list_field(Some(&json!(42))), "42");
    }

    #[test]
    fn normalized_job_fills_defaults_for_empty_payload() {
        let record = normalize_job(&RawJob::default());
        assert_eq!(record.title, NOT_SPECIFIED);
        assert_eq!(record.skills, NOT_SPECIFIED);
        assert!(!record.hiring_multiple);
        assert!(record.job_priority.is_none());
        assert!(record.date_posted.is_none());
    }

    #[test]
    fn raw_job_accepts_camel_case_payloads() {
        let raw: RawJob = serde_json::from_value(json!({
            "_id": "j1",
            "jobType": "[\"Full time\",\"Contract\"]",
            "salaryMin": 15000,
            "urgentHiring": "yes",
            "jobPriority": "URGENT",
            "datePosted": "2026-08-01T00:00:00Z"
        }))
        .expect("raw job decodes");
        let record = normalize_job(&raw);
        assert_eq!(record.id, "j1");
        assert_eq!(record.job_type, "Full time, Contract");
        assert_eq!(record.salary_min, "15000");
        assert!(record.urgent_hiring);
        assert_eq!(record.job_priority, Some(JobPriority::Urgent));
        assert!(record.date_posted.is_some());
    }

    #[test]
    fn salary_range_invariant_holds_for_adversarial_inputs() {
        for (raw_min, raw_max) in [
            ("10000", "20000"),
            ("20000", "10000"),
            ("garbage", "5000"),
            ("5000", "garbage"),
            ("", ""),
            ("12.5k", "3"),
            ("-10", "-20"),
        ] {
            let range = SalaryRange::parse(raw_min, raw_max);
            assert!(
                range.min <= range.max,
                "violated for ({raw_min}, {raw_max}): {range:?}"
            );
        }
    }

    #[test]
    fn salary_range_borrows_the_only_parseable_side() {
        let range = SalaryRange::parse("n/a", "9000");
        assert_eq!(range.min, 9000.0);
        assert_eq!(range.max, 9000.0);
    }

    #[test]
    fn empty_criteria_is_the_identity() {
        let set = vec![job("a", "Backend", "Acme"), job("b", "Frontend", "Beta")];
        let out = FilterEngine::apply(&set, &FilterCriteria::default(), Utc::now());
        assert_eq!(out, set);
    }

    #[test]
    fn results_are_always_a_subset_of_the_working_set() {
        let set = vec![
            job("a", "Backend Engineer", "Acme"),
            job("b", "Designer", "Beta"),
        ];
        let criteria = FilterCriteria {
            query: "engineer".to_string(),
            ..Default::default()
        };
        let out = FilterEngine::apply(&set, &criteria, Utc::now());
        assert!(out.iter().all(|record| set.contains(record)));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "a");
    }

    #[test]
    fn query_matches_title_or_company() {
        let record = job("a", "Data Engineer", "Rustic Labs");
        let now = Utc::now();
        let mut criteria = FilterCriteria {
            query: "rustic".to_string(),
            ..Default::default()
        };
        assert!(matches(&record, &criteria, now));
        criteria.query = "data".to_string();
        assert!(matches(&record, &criteria, now));
        criteria.query = "nowhere".to_string();
        assert!(!matches(&record, &criteria, now));
    }

    #[test]
    fn category_fields_match_by_substring_not_equality() {
        let record = job("a", "Backend", "Acme");
        let criteria = FilterCriteria {
            job_type: "full".to_string(),
            ..Default::default()
        };
        assert!(matches(&record, &criteria, Utc::now()));
    }

    #[test]
    fn experience_requires_exact_equality() {
        let record = job("a", "Backend", "Acme");
        let mut criteria = FilterCriteria {
            experience: "2-4".to_string(),
            ..Default::default()
        };
        assert!(!matches(&record, &criteria, Utc::now()));
        criteria.experience = "2-4 Years".to_string();
        assert!(matches(&record, &criteria, Utc::now()));
    }

    #[test]
    fn salary_filter_uses_interval_overlap() {
        let record = salaried("a", "10000", "20000");
        let now = Utc::now();

        let included = FilterCriteria {
            min_salary: "15000".to_string(),
            ..Default::default()
        };
        assert!(matches(&record, &included, now));

        let above = FilterCriteria {
            min_salary: "25000".to_string(),
            ..Default::default()
        };
        assert!(!matches(&record, &above, now));

        let below = FilterCriteria {
            max_salary: "5000".to_string(),
            ..Default::default()
        };
        assert!(!matches(&record, &below, now));

        let overlapping = FilterCriteria {
            min_salary: "5000".to_string(),
            max_salary: "12000".to_string(),
            ..Default::default()
        };
        assert!(matches(&record, &overlapping, now));
    }

    #[test]
    fn date_bucket_excludes_old_and_undated_records() {
        let now = Utc::now();
        let mut fresh = job("a", "Backend", "Acme");
        fresh.date_posted = Some(now - chrono::Duration::hours(5));
        let mut stale = job("b", "Backend", "Acme");
        stale.date_posted = Some(now - chrono::Duration::days(9));
        let undated = job("c", "Backend", "Acme");

        let criteria = FilterCriteria {
            date_posted: DatePostedBucket::Last7d,
            ..Default::default()
        };
        assert!(matches(&fresh, &criteria, now));
        assert!(!matches(&stale, &criteria, now));
        assert!(!matches(&undated, &criteria, now));
    }

    #[test]
    fn flag_criterion_is_tristate() {
        let mut record = job("a", "Backend", "Acme");
        record.urgent_hiring = true;
        let now = Utc::now();

        let mut criteria = FilterCriteria {
            urgent_hiring: "yes".to_string(),
            ..Default::default()
        };
        assert!(matches(&record, &criteria, now));
        criteria.urgent_hiring = "no".to_string();
        assert!(!matches(&record, &criteria, now));
        criteria.urgent_hiring = String::new();
        assert!(matches(&record, &criteria, now));
    }

    #[test]
    fn priority_filter_tolerates_absent_priority() {
        let record = job("a", "Backend", "Acme");
        let criteria = FilterCriteria {
            priority: "urgent".to_string(),
            ..Default::default()
        };
        assert!(!matches(&record, &criteria, Utc::now()));

        let mut urgent = record.clone();
        urgent.job_priority = Some(JobPriority::Urgent);
        assert!(matches(&urgent, &criteria, Utc::now()));
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let mut jobs = vec![
            salaried("a", "5000", "6000"),
            salaried("b", "5000", "9000"),
            salaried("c", "1000", "2000"),
            salaried("d", "5000", "5500"),
        ];
        sort_jobs(&mut jobs, SortOrder::Ascending);
        let ids = jobs.iter().map(|j| j.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["c", "a", "b", "d"]);
    }

    #[test]
    fn unsorted_preserves_insertion_order() {
        let jobs = vec![
            salaried("a", "9000", "9000"),
            salaried("b", "1000", "1000"),
        ];
        let out = FilterEngine::apply(&jobs, &FilterCriteria::default(), Utc::now());
        assert_eq!(out, jobs);
    }

    #[test]
    fn top_salary_flags_only_descending_orders() {
        let ordered = vec![
            salaried("a", "9000", "9000"),
            salaried("b", "8000", "8000"),
            salaried("c", "7000", "7000"),
            salaried("d", "6000", "6000"),
        ];
        assert_eq!(
            top_salary_ids(&ordered, SortOrder::Descending),
            ["a", "b", "c"]
        );
        assert!(top_salary_ids(&ordered, SortOrder::Ascending).is_empty());
        assert!(top_salary_ids(&ordered, SortOrder::Unsorted).is_empty());
    }

    #[test]
    fn criteria_round_trip_through_serde_wire_strings() {
        let criteria: FilterCriteria = serde_json::from_value(json!({
            "city": "Mumbai",
            "date_posted": "7d",
            "sort": "desc"
        }))
        .expect("criteria decodes");
        assert_eq!(criteria.city, "Mumbai");
        assert_eq!(criteria.date_posted, DatePostedBucket::Last7d);
        assert_eq!(criteria.sort, SortOrder::Descending);

        let value = serde_json::to_value(&criteria).expect("criteria encodes");
        assert_eq!(value["date_posted"], "7d");
        assert_eq!(value["sort"], "desc");
        // Unknown bucket strings degrade to the wildcard rather than failing.
        let lax: FilterCriteria =
            serde_json::from_value(json!({ "date_posted": "90d" })).expect("lax decode");
        assert_eq!(lax.date_posted, DatePostedBucket::Any);
    }

    #[test]
    fn twenty_five_job_scenario_filters_and_orders_as_specified() {
        let mut set = Vec::new();
        for i in 0..25 {
            let mut record = salaried(
                &format!("job-{i}"),
                &format!("{}", 1000 * (i + 1)),
                &format!("{}", 1000 * (i + 1) + 500),
            );
            record.job_type = if i % 2 == 0 {
                "Full time".to_string()
            } else {
                "Part time".to_string()
            };
            set.push(record);
        }
        let criteria = FilterCriteria {
            job_type: "full".to_string(),
            min_salary: "20000".to_string(),
            sort: SortOrder::Descending,
            ..Default::default()
        };
        let ordered = FilterEngine::apply(&set, &criteria, Utc::now());

        assert!(!ordered.is_empty());
        for record in &ordered {
            assert!(contains_ci(&record.job_type, "full"));
            let range = SalaryRange::parse(&record.salary_min, &record.salary_max);
            assert!(range.max >= 20000.0);
        }
        for pair in ordered.windows(2) {
            assert!(sort_key(&pair[0]) >= sort_key(&pair[1]));
        }
    }
}
