use crate::conflict::{parse_time, parse_weekday, weekday_key};
use crate::db;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use chrono::{NaiveTime, Weekday};
use rusqlite::Connection;
use serde_json::{json, Map, Value};

#[derive(Clone, Copy)]
enum SetupSection {
    Schedule,
    Exports,
}

impl SetupSection {
    const ALL: [SetupSection; 2] = [SetupSection::Schedule, SetupSection::Exports];

    fn parse(s: &str) -> Option<Self> {
        match s {
            "schedule" => Some(Self::Schedule),
            "exports" => Some(Self::Exports),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Schedule => "schedule",
            Self::Exports => "exports",
        }
    }

    fn key(self) -> &'static str {
        match self {
            Self::Schedule => "setup.schedule",
            Self::Exports => "setup.exports",
        }
    }
}

fn default_section(section: SetupSection) -> Value {
    match section {
        SetupSection::Schedule => json!({
            "weekStartsOn": "saturday",
            "dayStartTime": "08:00",
            "dayEndTime": "22:00",
            "defaultSlotMinutes": 60,
            "requireWarningConfirmation": true
        }),
        SetupSection::Exports => json!({
            "csvIncludeHeader": true,
            "csvIncludeIds": false
        }),
    }
}

#[derive(Clone, Debug)]
pub struct ScheduleSettings {
    pub week_starts_on: Weekday,
    pub day_start: NaiveTime,
    pub day_end: NaiveTime,
    pub default_slot_minutes: i64,
    pub require_warning_confirmation: bool,
}

#[derive(Clone, Debug)]
pub struct ExportSettings {
    pub csv_include_header: bool,
    pub csv_include_ids: bool,
}

fn load_section(conn: &Connection, section: SetupSection) -> anyhow::Result<Value> {
    let mut merged = default_section(section);
    if let Some(stored) = db::settings_get_json(conn, section.key())? {
        if let (Some(dst), Some(src)) = (merged.as_object_mut(), stored.as_object()) {
            for (k, v) in src {
                if dst.contains_key(k) {
                    dst.insert(k.clone(), v.clone());
                }
            }
        }
    }
    Ok(merged)
}

pub fn load_schedule_settings(conn: &Connection) -> ScheduleSettings {
    let obj = load_section(conn, SetupSection::Schedule)
        .ok()
        .and_then(|v| v.as_object().cloned())
        .unwrap_or_default();
    let time_or = |key: &str, fallback: (u32, u32)| {
        obj.get(key)
            .and_then(|v| v.as_str())
            .and_then(parse_time)
            .or_else(|| NaiveTime::from_hms_opt(fallback.0, fallback.1, 0))
            .unwrap_or_default()
    };
    ScheduleSettings {
        week_starts_on: obj
            .get("weekStartsOn")
            .and_then(|v| v.as_str())
            .and_then(parse_weekday)
            .unwrap_or(Weekday::Sat),
        day_start: time_or("dayStartTime", (8, 0)),
        day_end: time_or("dayEndTime", (22, 0)),
        default_slot_minutes: obj
            .get("defaultSlotMinutes")
            .and_then(|v| v.as_i64())
            .filter(|v| (5..=600).contains(v))
            .unwrap_or(60),
        require_warning_confirmation: obj
            .get("requireWarningConfirmation")
            .and_then(|v| v.as_bool())
            .unwrap_or(true),
    }
}

pub fn load_export_settings(conn: &Connection) -> ExportSettings {
    let obj = load_section(conn, SetupSection::Exports)
        .ok()
        .and_then(|v| v.as_object().cloned())
        .unwrap_or_default();
    ExportSettings {
        csv_include_header: obj
            .get("csvIncludeHeader")
            .and_then(|v| v.as_bool())
            .unwrap_or(true),
        csv_include_ids: obj
            .get("csvIncludeIds")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
    }
}

fn as_object_mut(value: &mut Value) -> Result<&mut Map<String, Value>, String> {
    value
        .as_object_mut()
        .ok_or_else(|| "internal setup object must be a JSON object".to_string())
}

fn patch_bool(dst: &mut Map<String, Value>, key: &str, v: &Value) -> Result<(), String> {
    let b = v.as_bool().ok_or_else(|| format!("{} must be boolean", key))?;
    dst.insert(key.to_string(), json!(b));
    Ok(())
}

fn patch_time(dst: &mut Map<String, Value>, key: &str, v: &Value) -> Result<(), String> {
    let t = v
        .as_str()
        .and_then(parse_time)
        .ok_or_else(|| format!("{} must be HH:MM", key))?;
    dst.insert(key.to_string(), json!(t.format("%H:%M").to_string()));
    Ok(())
}

fn merge_section_patch(
    section: SetupSection,
    current: &mut Value,
    patch: &Map<String, Value>,
) -> Result<(), String> {
    let dst = as_object_mut(current)?;
    for (key, v) in patch {
        match (section, key.as_str()) {
            (SetupSection::Schedule, "weekStartsOn") => {
                let day = v
                    .as_str()
                    .and_then(parse_weekday)
                    .ok_or_else(|| "weekStartsOn must be a weekday name".to_string())?;
                dst.insert(key.clone(), json!(weekday_key(day)));
            }
            (SetupSection::Schedule, "dayStartTime") | (SetupSection::Schedule, "dayEndTime") => {
                patch_time(dst, key, v)?;
            }
            (SetupSection::Schedule, "defaultSlotMinutes") => {
                let n = v
                    .as_i64()
                    .filter(|n| (5..=600).contains(n))
                    .ok_or_else(|| "defaultSlotMinutes must be an integer in 5..=600".to_string())?;
                dst.insert(key.clone(), json!(n));
            }
            (SetupSection::Schedule, "requireWarningConfirmation")
            | (SetupSection::Exports, "csvIncludeHeader")
            | (SetupSection::Exports, "csvIncludeIds") => {
                patch_bool(dst, key, v)?;
            }
            _ => return Err(format!("unknown {} setting: {}", section.name(), key)),
        }
    }

    if let SetupSection::Schedule = section {
        let start = dst.get("dayStartTime").and_then(|v| v.as_str()).and_then(parse_time);
        let end = dst.get("dayEndTime").and_then(|v| v.as_str()).and_then(parse_time);
        if let (Some(start), Some(end)) = (start, end) {
            if start >= end {
                return Err("dayStartTime must be before dayEndTime".to_string());
            }
        }
    }
    Ok(())
}

fn handle_setup_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let mut out = Map::new();
    for section in SetupSection::ALL {
        match load_section(conn, section) {
            Ok(v) => {
                out.insert(section.name().to_string(), v);
            }
            Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
        }
    }
    ok(&req.id, Value::Object(out))
}

fn handle_setup_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    let Some(section_raw) = req.params.get("section").and_then(|v| v.as_str()) else {
        return err(&req.id, "bad_params", "missing section", None);
    };
    let Some(section) = SetupSection::parse(section_raw) else {
        return err(&req.id, "bad_params", "unknown section", None);
    };
    let Some(patch_obj) = req.params.get("patch").and_then(|v| v.as_object()) else {
        return err(&req.id, "bad_params", "patch must be an object", None);
    };

    let mut current = match load_section(conn, section) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "db_query_failed", e.to_string(), None),
    };
    if let Err(msg) = merge_section_patch(section, &mut current, patch_obj) {
        return err(&req.id, "bad_params", msg, None);
    }
    if let Err(e) = db::settings_set_json(conn, section.key(), &current) {
        return err(&req.id, "db_update_failed", e.to_string(), None);
    }
    tracing::info!(section = section.name(), "setup updated");
    ok(&req.id, json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "setup.get" => Some(handle_setup_get(state, req)),
        "setup.update" => Some(handle_setup_update(state, req)),
        _ => None,
    }
}
