use crate::conflict::{
    self, format_time, parse_time, parse_weekday, week_from, weekday_key, ConflictReport,
    ProposedEntry, ScheduleEntry,
};
use crate::ipc::handlers::resources::{resource_exists, resource_name, ResourceKind};
use crate::ipc::handlers::setup::{load_schedule_settings, ScheduleSettings};
use crate::ipc::helpers::{db_conn, non_blank, now_ts, parse_params, respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use chrono::{Duration, NaiveTime, Weekday};
use rusqlite::{params_from_iter, types::Value, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

const DEFAULT_PAGE_SIZE: i64 = 25;
const MAX_PAGE_SIZE: i64 = 200;
const FALLBACK_TITLE: &str = "Session";

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlotInput {
    pub day_of_week: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub teacher_id: Option<String>,
    pub hall_id: Option<String>,
    pub year_id: Option<String>,
    pub subject_id: Option<String>,
    pub title: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ValidateParams {
    input: SlotInput,
    editing_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateParams {
    input: SlotInput,
    #[serde(default)]
    confirm_warnings: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateParams {
    schedule_id: String,
    input: SlotInput,
    #[serde(default)]
    confirm_warnings: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdParams {
    schedule_id: String,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlotFilters {
    pub day_of_week: Option<String>,
    pub teacher_id: Option<String>,
    pub hall_id: Option<String>,
    pub year_id: Option<String>,
    pub subject_id: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ListParams {
    filters: SlotFilters,
    page: Option<i64>,
    page_size: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WeekParams {
    teacher_id: Option<String>,
    hall_id: Option<String>,
    year_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRow {
    pub id: String,
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
    pub teacher_id: Option<String>,
    pub teacher_name: Option<String>,
    pub hall_id: Option<String>,
    pub hall_name: Option<String>,
    pub year_id: Option<String>,
    pub year_name: Option<String>,
    pub subject_id: Option<String>,
    pub subject_name: Option<String>,
    pub title: String,
    pub notes: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone)]
struct NormalizedSlot {
    day: Weekday,
    start: NaiveTime,
    end: NaiveTime,
    teacher_id: Option<String>,
    hall_id: Option<String>,
    year_id: Option<String>,
    subject_id: Option<String>,
    title: String,
    notes: Option<String>,
}

impl NormalizedSlot {
    fn proposed(&self) -> ProposedEntry {
        ProposedEntry {
            day_of_week: Some(self.day),
            start_time: Some(format_time(self.start)),
            end_time: Some(format_time(self.end)),
            teacher_id: self.teacher_id.clone(),
            hall_id: self.hall_id.clone(),
            year_id: self.year_id.clone(),
        }
    }
}

fn proposed_from_input(input: &SlotInput) -> ProposedEntry {
    ProposedEntry {
        day_of_week: input.day_of_week.as_deref().and_then(parse_weekday),
        start_time: non_blank(input.start_time.clone()),
        end_time: non_blank(input.end_time.clone()),
        teacher_id: non_blank(input.teacher_id.clone()),
        hall_id: non_blank(input.hall_id.clone()),
        year_id: non_blank(input.year_id.clone()),
    }
}

fn resolve_end(
    start: NaiveTime,
    end_raw: Option<&str>,
    default_minutes: i64,
) -> Result<NaiveTime, HandlerErr> {
    let end = match end_raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => {
            parse_time(raw).ok_or_else(|| HandlerErr::bad_params("endTime must be HH:MM"))?
        }
        None => {
            let (end, wrapped) = start.overflowing_add_signed(Duration::minutes(default_minutes));
            if wrapped != 0 {
                return Err(HandlerErr::bad_params(
                    "default slot length runs past midnight; give an endTime",
                ));
            }
            end
        }
    };
    if start >= end {
        return Err(HandlerErr::bad_params("startTime must be before endTime"));
    }
    Ok(end)
}

fn normalize_slot(
    conn: &Connection,
    input: SlotInput,
    settings: &ScheduleSettings,
) -> Result<NormalizedSlot, HandlerErr> {
    let day = input
        .day_of_week
        .as_deref()
        .and_then(parse_weekday)
        .ok_or_else(|| HandlerErr::bad_params("dayOfWeek must be a weekday name"))?;
    let start = input
        .start_time
        .as_deref()
        .and_then(parse_time)
        .ok_or_else(|| HandlerErr::bad_params("startTime must be HH:MM"))?;
    let end = resolve_end(start, input.end_time.as_deref(), settings.default_slot_minutes)?;

    let teacher_id = non_blank(input.teacher_id);
    let hall_id = non_blank(input.hall_id);
    let year_id = non_blank(input.year_id);
    let subject_id = non_blank(input.subject_id);

    for (kind, field, id) in [
        (ResourceKind::Teacher, "teacherId", &teacher_id),
        (ResourceKind::Hall, "hallId", &hall_id),
        (ResourceKind::Year, "yearId", &year_id),
        (ResourceKind::Subject, "subjectId", &subject_id),
    ] {
        if let Some(id) = id {
            if !resource_exists(conn, kind, id)? {
                return Err(HandlerErr::not_found(format!("{} does not exist", field))
                    .with_details(json!({ "field": field, "id": id })));
            }
        }
    }

    let title = match non_blank(input.title) {
        Some(t) => t,
        None => match subject_id.as_deref() {
            Some(sid) => resource_name(conn, ResourceKind::Subject, sid)?
                .unwrap_or_else(|| FALLBACK_TITLE.to_string()),
            None => FALLBACK_TITLE.to_string(),
        },
    };

    Ok(NormalizedSlot {
        day,
        start,
        end,
        teacher_id,
        hall_id,
        year_id,
        subject_id,
        title,
        notes: non_blank(input.notes),
    })
}

fn entry_from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Option<ScheduleEntry>> {
    let day_raw: String = r.get(1)?;
    // A row with an unknown day can't clash with anything; skip it.
    let Some(day) = parse_weekday(&day_raw) else {
        return Ok(None);
    };
    Ok(Some(ScheduleEntry {
        id: r.get(0)?,
        day_of_week: day,
        start_time: r.get(2)?,
        end_time: r.get(3)?,
        teacher_id: r.get(4)?,
        hall_id: r.get(5)?,
        year_id: r.get(6)?,
        title: r.get(7)?,
    }))
}

fn load_entries(conn: &Connection, day: Option<Weekday>) -> Result<Vec<ScheduleEntry>, HandlerErr> {
    let mut sql = String::from(
        "SELECT id, day_of_week, start_time, end_time, teacher_id, hall_id, year_id, title
         FROM schedules",
    );
    let mut binds: Vec<Value> = Vec::new();
    if let Some(day) = day {
        sql.push_str(" WHERE day_of_week = ?");
        binds.push(weekday_key(day).to_string().into());
    }
    sql.push_str(" ORDER BY start_time, title, id");

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| HandlerErr::db("db_query_failed", e))?;
    let rows = stmt
        .query_map(params_from_iter(binds), entry_from_row)
        .and_then(|it| it.collect::<Result<Vec<_>, _>>())
        .map_err(|e| HandlerErr::db("db_query_failed", e))?;
    Ok(rows.into_iter().flatten().collect())
}

fn check_slot(
    conn: &Connection,
    slot: &NormalizedSlot,
    editing_id: Option<&str>,
    confirm_warnings: bool,
    settings: &ScheduleSettings,
) -> Result<ConflictReport, HandlerErr> {
    let existing = load_entries(conn, Some(slot.day))?;
    let report = conflict::validate(&slot.proposed(), &existing, editing_id);

    if report.is_blocking() {
        tracing::info!(
            day = weekday_key(slot.day),
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "slot refused: conflicts"
        );
        return Err(HandlerErr::new(
            "schedule_conflict",
            report.errors.first().cloned().unwrap_or_default(),
        )
        .with_details(json!(report)));
    }
    if report.needs_confirmation() && settings.require_warning_confirmation && !confirm_warnings {
        tracing::info!(
            day = weekday_key(slot.day),
            warnings = report.warnings.len(),
            "slot held: warnings need confirmation"
        );
        return Err(HandlerErr::new(
            "schedule_needs_confirmation",
            "overlapping sessions need confirmation",
        )
        .with_details(json!({ "warnings": report.warnings })));
    }
    Ok(report)
}

fn schedule_exists(conn: &Connection, id: &str) -> Result<bool, HandlerErr> {
    conn.query_row("SELECT 1 FROM schedules WHERE id = ?", [id], |r| {
        r.get::<_, i64>(0)
    })
    .optional()
    .map(|v| v.is_some())
    .map_err(|e| HandlerErr::db("db_query_failed", e))
}

const SLOT_SELECT: &str = "SELECT s.id, s.day_of_week, s.start_time, s.end_time,
       s.teacher_id, t.name, s.hall_id, h.name, s.year_id, y.name,
       s.subject_id, sub.name, s.title, s.notes, s.updated_at
     FROM schedules s
     LEFT JOIN teachers t ON t.id = s.teacher_id
     LEFT JOIN halls h ON h.id = s.hall_id
     LEFT JOIN years y ON y.id = s.year_id
     LEFT JOIN subjects sub ON sub.id = s.subject_id";

fn slot_from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<SlotRow> {
    Ok(SlotRow {
        id: r.get(0)?,
        day_of_week: r.get(1)?,
        start_time: r.get(2)?,
        end_time: r.get(3)?,
        teacher_id: r.get(4)?,
        teacher_name: r.get(5)?,
        hall_id: r.get(6)?,
        hall_name: r.get(7)?,
        year_id: r.get(8)?,
        year_name: r.get(9)?,
        subject_id: r.get(10)?,
        subject_name: r.get(11)?,
        title: r.get(12)?,
        notes: r.get(13)?,
        updated_at: r.get(14)?,
    })
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub fn query_slots(
    conn: &Connection,
    filters: &SlotFilters,
    week_start: Weekday,
) -> Result<Vec<SlotRow>, HandlerErr> {
    let mut clauses: Vec<&'static str> = Vec::new();
    let mut binds: Vec<Value> = Vec::new();

    if let Some(raw) = non_blank(filters.day_of_week.clone()) {
        let day = parse_weekday(&raw)
            .ok_or_else(|| HandlerErr::bad_params("filters.dayOfWeek must be a weekday name"))?;
        clauses.push("s.day_of_week = ?");
        binds.push(weekday_key(day).to_string().into());
    }
    for (clause, value) in [
        ("s.teacher_id = ?", &filters.teacher_id),
        ("s.hall_id = ?", &filters.hall_id),
        ("s.year_id = ?", &filters.year_id),
        ("s.subject_id = ?", &filters.subject_id),
    ] {
        if let Some(v) = non_blank(value.clone()) {
            clauses.push(clause);
            binds.push(v.into());
        }
    }
    if let Some(search) = non_blank(filters.search.clone()) {
        clauses.push("s.title LIKE ? ESCAPE '\\'");
        binds.push(format!("%{}%", escape_like(&search)).into());
    }

    let mut sql = SLOT_SELECT.to_string();
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| HandlerErr::db("db_query_failed", e))?;
    let mut rows = stmt
        .query_map(params_from_iter(binds), slot_from_row)
        .and_then(|it| it.collect::<Result<Vec<_>, _>>())
        .map_err(|e| HandlerErr::db("db_query_failed", e))?;

    let week = week_from(week_start);
    let week_pos = |raw: &str| {
        parse_weekday(raw)
            .and_then(|d| week.iter().position(|w| *w == d))
            .unwrap_or(week.len())
    };
    rows.sort_by(|a, b| {
        week_pos(&a.day_of_week)
            .cmp(&week_pos(&b.day_of_week))
            .then_with(|| a.start_time.cmp(&b.start_time))
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.id.cmp(&b.id))
    });
    Ok(rows)
}

fn page_bounds(
    total: usize,
    page: Option<i64>,
    page_size: Option<i64>,
) -> (i64, i64, i64, std::ops::Range<usize>) {
    let page_size = page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let page = page.unwrap_or(1).max(1);
    let page_count = (total as i64 + page_size - 1) / page_size;
    let start = (page - 1).saturating_mul(page_size).min(total as i64) as usize;
    let end = (start + page_size as usize).min(total);
    (page, page_size, page_count, start..end)
}

fn handle_validate(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let conn = db_conn(state)?;
    let params: ValidateParams = parse_params(&req.params)?;
    let settings = load_schedule_settings(conn);
    let proposed = proposed_from_input(&params.input);

    let report = match proposed.day_of_week {
        Some(day) => {
            let existing = load_entries(conn, Some(day))?;
            conflict::validate(&proposed, &existing, params.editing_id.as_deref())
        }
        None => ConflictReport::default(),
    };

    // False when day or times are missing or unreadable, so nothing was checked.
    let assessed = proposed.day_of_week.is_some()
        && proposed.start_time.as_deref().and_then(parse_time).is_some()
        && proposed.end_time.as_deref().and_then(parse_time).is_some();

    Ok(json!({
        "errors": report.errors,
        "warnings": report.warnings,
        "assessed": assessed,
        "canSave": !report.is_blocking(),
        "requiresConfirmation": report.needs_confirmation() && settings.require_warning_confirmation,
    }))
}

fn handle_create(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let conn = db_conn(state)?;
    let params: CreateParams = parse_params(&req.params)?;
    let settings = load_schedule_settings(conn);
    let slot = normalize_slot(conn, params.input, &settings)?;
    let report = check_slot(conn, &slot, None, params.confirm_warnings, &settings)?;

    let id = Uuid::new_v4().to_string();
    let ts = now_ts();
    conn.execute(
        "INSERT INTO schedules(
           id, day_of_week, start_time, end_time, teacher_id, hall_id, year_id,
           subject_id, title, notes, created_at, updated_at)
         VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        (
            &id,
            weekday_key(slot.day),
            format_time(slot.start),
            format_time(slot.end),
            &slot.teacher_id,
            &slot.hall_id,
            &slot.year_id,
            &slot.subject_id,
            &slot.title,
            &slot.notes,
            &ts,
            &ts,
        ),
    )
    .map_err(|e| HandlerErr::db("db_insert_failed", e).with_details(json!({ "table": "schedules" })))?;

    tracing::info!(%id, day = weekday_key(slot.day), title = %slot.title, "slot created");
    Ok(json!({ "scheduleId": id, "warnings": report.warnings }))
}

fn handle_update(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let conn = db_conn(state)?;
    let params: UpdateParams = parse_params(&req.params)?;
    if !schedule_exists(conn, &params.schedule_id)? {
        return Err(HandlerErr::not_found("schedule not found"));
    }
    let settings = load_schedule_settings(conn);
    let slot = normalize_slot(conn, params.input, &settings)?;
    let report = check_slot(
        conn,
        &slot,
        Some(params.schedule_id.as_str()),
        params.confirm_warnings,
        &settings,
    )?;

    conn.execute(
        "UPDATE schedules SET
           day_of_week = ?, start_time = ?, end_time = ?, teacher_id = ?, hall_id = ?,
           year_id = ?, subject_id = ?, title = ?, notes = ?, updated_at = ?
         WHERE id = ?",
        (
            weekday_key(slot.day),
            format_time(slot.start),
            format_time(slot.end),
            &slot.teacher_id,
            &slot.hall_id,
            &slot.year_id,
            &slot.subject_id,
            &slot.title,
            &slot.notes,
            now_ts(),
            &params.schedule_id,
        ),
    )
    .map_err(|e| HandlerErr::db("db_update_failed", e))?;

    Ok(json!({ "scheduleId": params.schedule_id, "warnings": report.warnings }))
}

fn handle_get(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let conn = db_conn(state)?;
    let params: IdParams = parse_params(&req.params)?;
    let sql = format!("{} WHERE s.id = ?", SLOT_SELECT);
    let slot = conn
        .query_row(&sql, [&params.schedule_id], slot_from_row)
        .optional()
        .map_err(|e| HandlerErr::db("db_query_failed", e))?
        .ok_or_else(|| HandlerErr::not_found("schedule not found"))?;
    Ok(json!({ "schedule": slot }))
}

fn handle_delete(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let conn = db_conn(state)?;
    let params: IdParams = parse_params(&req.params)?;
    let n = conn
        .execute("DELETE FROM schedules WHERE id = ?", [&params.schedule_id])
        .map_err(|e| HandlerErr::db("db_delete_failed", e))?;
    if n == 0 {
        return Err(HandlerErr::not_found("schedule not found"));
    }
    tracing::info!(id = %params.schedule_id, "slot deleted");
    Ok(json!({ "ok": true }))
}

fn handle_list(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let params: ListParams = parse_params(&req.params)?;
    let Some(conn) = state.db.as_ref() else {
        return Ok(json!({
            "items": [], "total": 0, "page": 1,
            "pageSize": DEFAULT_PAGE_SIZE, "pageCount": 0
        }));
    };
    let settings = load_schedule_settings(conn);
    let rows = query_slots(conn, &params.filters, settings.week_starts_on)?;
    let total = rows.len();
    let (page, page_size, page_count, range) = page_bounds(total, params.page, params.page_size);

    Ok(json!({
        "items": &rows[range],
        "total": total,
        "page": page,
        "pageSize": page_size,
        "pageCount": page_count,
    }))
}

fn handle_week(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let conn = db_conn(state)?;
    let params: WeekParams = parse_params(&req.params)?;
    let settings = load_schedule_settings(conn);
    let filters = SlotFilters {
        teacher_id: params.teacher_id,
        hall_id: params.hall_id,
        year_id: params.year_id,
        ..SlotFilters::default()
    };
    let rows = query_slots(conn, &filters, settings.week_starts_on)?;

    let days: Vec<serde_json::Value> = week_from(settings.week_starts_on)
        .iter()
        .map(|day| {
            let key = weekday_key(*day);
            let slots: Vec<&SlotRow> = rows.iter().filter(|r| r.day_of_week == key).collect();
            json!({ "dayOfWeek": key, "slots": slots })
        })
        .collect();

    Ok(json!({
        "weekStartsOn": weekday_key(settings.week_starts_on),
        "dayStartTime": format_time(settings.day_start),
        "dayEndTime": format_time(settings.day_end),
        "days": days,
    }))
}

fn handle_audit(state: &AppState, _req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let conn = db_conn(state)?;
    let entries = load_entries(conn, None)?;

    let mut items = Vec::new();
    let mut error_count = 0usize;
    let mut warning_count = 0usize;
    for entry in &entries {
        let proposed = ProposedEntry {
            day_of_week: Some(entry.day_of_week),
            start_time: Some(entry.start_time.clone()),
            end_time: Some(entry.end_time.clone()),
            teacher_id: entry.teacher_id.clone(),
            hall_id: entry.hall_id.clone(),
            year_id: entry.year_id.clone(),
        };
        let report = conflict::validate(&proposed, &entries, Some(entry.id.as_str()));
        if report.is_clear() {
            continue;
        }
        error_count += report.errors.len();
        warning_count += report.warnings.len();
        items.push(json!({
            "scheduleId": entry.id,
            "title": entry.title,
            "dayOfWeek": weekday_key(entry.day_of_week),
            "errors": report.errors,
            "warnings": report.warnings,
        }));
    }

    Ok(json!({
        "items": items,
        "errorCount": error_count,
        "warningCount": warning_count,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "schedules.validate" => handle_validate(state, req),
        "schedules.create" => handle_create(state, req),
        "schedules.update" => handle_update(state, req),
        "schedules.get" => handle_get(state, req),
        "schedules.delete" => handle_delete(state, req),
        "schedules.list" => handle_list(state, req),
        "schedules.week" => handle_week(state, req),
        "schedules.audit" => handle_audit(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(raw: &str) -> NaiveTime {
        parse_time(raw).expect("valid time")
    }

    #[test]
    fn missing_end_uses_default_length() {
        let end = resolve_end(t("10:15"), None, 45).expect("end");
        assert_eq!(format_time(end), "11:00");
        let end = resolve_end(t("10:15"), Some("  "), 60).expect("blank end");
        assert_eq!(format_time(end), "11:15");
    }

    #[test]
    fn end_must_follow_start() {
        let e = resolve_end(t("10:00"), Some("10:00"), 60).expect_err("zero length");
        assert_eq!(e.code, "bad_params");
        let e = resolve_end(t("10:00"), Some("9:00 pm-ish"), 60).expect_err("bad time");
        assert!(e.message.contains("endTime"));
    }

    #[test]
    fn default_length_may_not_cross_midnight() {
        let e = resolve_end(t("23:30"), None, 60).expect_err("wraps");
        assert_eq!(e.code, "bad_params");
    }

    #[test]
    fn paging_clamps_size_and_page() {
        let (page, size, count, range) = page_bounds(53, Some(3), Some(25));
        assert_eq!((page, size, count), (3, 25, 3));
        assert_eq!(range, 50..53);

        let (page, size, count, range) = page_bounds(10, Some(0), Some(1000));
        assert_eq!((page, size, count), (1, MAX_PAGE_SIZE, 1));
        assert_eq!(range, 0..10);

        let (_, _, count, range) = page_bounds(0, None, None);
        assert_eq!(count, 0);
        assert!(range.is_empty());

        let (_, _, _, range) = page_bounds(5, Some(9), Some(2));
        assert!(range.is_empty());
    }

    #[test]
    fn like_wildcards_in_search_are_literal() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn lenient_mapping_drops_unknown_day() {
        let input = SlotInput {
            day_of_week: Some("Funday".into()),
            start_time: Some("10:00".into()),
            end_time: Some("11:00".into()),
            teacher_id: Some(" ".into()),
            ..SlotInput::default()
        };
        let proposed = proposed_from_input(&input);
        assert_eq!(proposed.day_of_week, None);
        assert_eq!(proposed.teacher_id, None);
        assert_eq!(proposed.start_time.as_deref(), Some("10:00"));
    }
}
