use chrono::{NaiveTime, Timelike, Weekday};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub id: String,
    pub day_of_week: Weekday,
    pub start_time: String,
    pub end_time: String,
    pub teacher_id: Option<String>,
    pub hall_id: Option<String>,
    pub year_id: Option<String>,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProposedEntry {
    pub day_of_week: Option<Weekday>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub teacher_id: Option<String>,
    pub hall_id: Option<String>,
    pub year_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ConflictReport {
    pub fn is_blocking(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn needs_confirmation(&self) -> bool {
        self.errors.is_empty() && !self.warnings.is_empty()
    }

    pub fn is_clear(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

pub fn parse_weekday(raw: &str) -> Option<Weekday> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "sunday" | "sun" => Some(Weekday::Sun),
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        _ => None,
    }
}

pub fn weekday_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "sunday",
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
    }
}

pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

pub fn week_from(first: Weekday) -> [Weekday; 7] {
    let mut out = [first; 7];
    let mut day = first;
    for slot in out.iter_mut() {
        *slot = day;
        day = day.succ();
    }
    out
}

/// `HH:MM` or `HH:MM:SS`. Seconds are dropped; slots have minute granularity.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let t = raw.trim();
    let parsed = NaiveTime::parse_from_str(t, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M:%S"))
        .ok()?;
    NaiveTime::from_hms_opt(parsed.hour(), parsed.minute(), 0)
}

pub fn format_time(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

// Half-open: touching intervals do not overlap.
pub fn intervals_overlap(s1: NaiveTime, e1: NaiveTime, s2: NaiveTime, e2: NaiveTime) -> bool {
    s1 < e2 && s2 < e1
}

fn text_ranges_overlap(s1: &str, e1: &str, s2: &str, e2: &str) -> bool {
    match (parse_time(s1), parse_time(e1), parse_time(s2), parse_time(e2)) {
        (Some(s1), Some(e1), Some(s2), Some(e2)) => intervals_overlap(s1, e1, s2, e2),
        _ => false,
    }
}

fn present(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn same_ref(a: &Option<String>, b: &Option<String>) -> bool {
    matches!((present(a), present(b)), (Some(x), Some(y)) if x == y)
}

fn different_refs(a: &Option<String>, b: &Option<String>) -> bool {
    matches!((present(a), present(b)), (Some(x), Some(y)) if x != y)
}

/// Classifies `proposed` against `existing`.
///
/// Entries on another weekday and the entry named by `editing_id` are
/// ignored. Every overlapping entry is reported, in input order: a teacher
/// clash and a hall clash are errors; otherwise a year-group overlap with a
/// different teacher is a warning.
pub fn validate(
    proposed: &ProposedEntry,
    existing: &[ScheduleEntry],
    editing_id: Option<&str>,
) -> ConflictReport {
    let mut report = ConflictReport::default();

    let (Some(day), Some(start), Some(end)) = (
        proposed.day_of_week,
        proposed.start_time.as_deref(),
        proposed.end_time.as_deref(),
    ) else {
        return report;
    };
    let day_label = weekday_label(day);

    for entry in existing {
        if entry.day_of_week != day {
            continue;
        }
        if editing_id.is_some_and(|id| id == entry.id) {
            continue;
        }
        if !text_ranges_overlap(start, end, &entry.start_time, &entry.end_time) {
            continue;
        }

        if same_ref(&proposed.teacher_id, &entry.teacher_id) {
            report.errors.push(format!(
                "Teacher is already booked this time on {}.",
                day_label
            ));
        }
        if same_ref(&proposed.hall_id, &entry.hall_id) {
            report.errors.push(format!(
                "Hall is already occupied this time on {} by \"{}\".",
                day_label, entry.title
            ));
        } else if same_ref(&proposed.year_id, &entry.year_id)
            && different_refs(&proposed.teacher_id, &entry.teacher_id)
        {
            report.warnings.push(format!(
                "Same year has an overlapping session with a different teacher: \"{}\".",
                entry.title
            ));
        }
    }

    report
}
