use crate::ipc::helpers::{db_conn, non_blank, now_ts, parse_params, respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Teacher,
    Hall,
    Year,
    Subject,
}

impl ResourceKind {
    fn parse(prefix: &str) -> Option<Self> {
        match prefix {
            "teachers" => Some(Self::Teacher),
            "halls" => Some(Self::Hall),
            "years" => Some(Self::Year),
            "subjects" => Some(Self::Subject),
            _ => None,
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            Self::Teacher => "teachers",
            Self::Hall => "halls",
            Self::Year => "years",
            Self::Subject => "subjects",
        }
    }

    pub fn schedule_column(self) -> &'static str {
        match self {
            Self::Teacher => "teacher_id",
            Self::Hall => "hall_id",
            Self::Year => "year_id",
            Self::Subject => "subject_id",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Teacher => "teacher",
            Self::Hall => "hall",
            Self::Year => "year",
            Self::Subject => "subject",
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResourceRow {
    id: String,
    name: String,
    code: Option<String>,
    notes: Option<String>,
    active: bool,
    schedule_count: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ListParams {
    include_inactive: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateParams {
    name: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ResourcePatch {
    name: Option<String>,
    code: Option<String>,
    notes: Option<String>,
    active: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateParams {
    id: String,
    patch: ResourcePatch,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IdParams {
    id: String,
}

pub fn resource_exists(conn: &Connection, kind: ResourceKind, id: &str) -> Result<bool, HandlerErr> {
    conn.query_row(
        &format!("SELECT 1 FROM {} WHERE id = ?", kind.table()),
        [id],
        |r| r.get::<_, i64>(0),
    )
    .optional()
    .map(|v| v.is_some())
    .map_err(|e| HandlerErr::db("db_query_failed", e))
}

pub fn resource_name(
    conn: &Connection,
    kind: ResourceKind,
    id: &str,
) -> Result<Option<String>, HandlerErr> {
    conn.query_row(
        &format!("SELECT name FROM {} WHERE id = ?", kind.table()),
        [id],
        |r| r.get::<_, String>(0),
    )
    .optional()
    .map_err(|e| HandlerErr::db("db_query_failed", e))
}

fn schedule_refs(conn: &Connection, kind: ResourceKind, id: &str) -> Result<i64, HandlerErr> {
    conn.query_row(
        &format!(
            "SELECT COUNT(*) FROM schedules WHERE {} = ?",
            kind.schedule_column()
        ),
        [id],
        |r| r.get(0),
    )
    .map_err(|e| HandlerErr::db("db_query_failed", e))
}

fn list(state: &AppState, kind: ResourceKind, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let Some(conn) = state.db.as_ref() else {
        return Ok(json!({ "items": [] }));
    };
    let params: ListParams = parse_params(&req.params)?;

    let sql = format!(
        "SELECT r.id, r.name, r.code, r.notes, r.active,
           (SELECT COUNT(*) FROM schedules s WHERE s.{col} = r.id) AS schedule_count
         FROM {table} r
         WHERE ?1 OR r.active = 1
         ORDER BY r.sort_order, r.name",
        col = kind.schedule_column(),
        table = kind.table()
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| HandlerErr::db("db_query_failed", e))?;
    let items = stmt
        .query_map([params.include_inactive], |r| {
            Ok(ResourceRow {
                id: r.get(0)?,
                name: r.get(1)?,
                code: r.get(2)?,
                notes: r.get(3)?,
                active: r.get::<_, i64>(4)? != 0,
                schedule_count: r.get(5)?,
            })
        })
        .and_then(|it| it.collect::<Result<Vec<_>, _>>())
        .map_err(|e| HandlerErr::db("db_query_failed", e))?;

    Ok(json!({ "items": items }))
}

fn create(state: &AppState, kind: ResourceKind, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let conn = db_conn(state)?;
    let params: CreateParams = parse_params(&req.params)?;
    let name = params.name.trim().to_string();
    if name.is_empty() {
        return Err(HandlerErr::bad_params("name must not be empty"));
    }

    let next_sort: i64 = conn
        .query_row(
            &format!("SELECT COALESCE(MAX(sort_order), -1) + 1 FROM {}", kind.table()),
            [],
            |r| r.get(0),
        )
        .map_err(|e| HandlerErr::db("db_query_failed", e))?;

    let id = Uuid::new_v4().to_string();
    conn.execute(
        &format!(
            "INSERT INTO {}(id, name, code, notes, active, sort_order, created_at)
             VALUES(?, ?, ?, ?, 1, ?, ?)",
            kind.table()
        ),
        (
            &id,
            &name,
            non_blank(params.code),
            non_blank(params.notes),
            next_sort,
            now_ts(),
        ),
    )
    .map_err(|e| {
        HandlerErr::db("db_insert_failed", e).with_details(json!({ "table": kind.table() }))
    })?;

    tracing::info!(kind = kind.label(), %id, %name, "resource created");
    Ok(json!({ "id": id, "name": name }))
}

fn update(state: &AppState, kind: ResourceKind, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let conn = db_conn(state)?;
    let params: UpdateParams = parse_params(&req.params)?;
    if !resource_exists(conn, kind, &params.id)? {
        return Err(HandlerErr::not_found(format!("{} not found", kind.label())));
    }

    let patch = params.patch;
    let mut sets: Vec<&'static str> = Vec::new();
    let mut values: Vec<rusqlite::types::Value> = Vec::new();

    if let Some(name) = patch.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(HandlerErr::bad_params("name must not be empty"));
        }
        sets.push("name = ?");
        values.push(name.into());
    }
    if let Some(code) = patch.code {
        sets.push("code = ?");
        values.push(non_blank(Some(code)).into());
    }
    if let Some(notes) = patch.notes {
        sets.push("notes = ?");
        values.push(non_blank(Some(notes)).into());
    }
    if let Some(active) = patch.active {
        sets.push("active = ?");
        values.push(i64::from(active).into());
    }
    if sets.is_empty() {
        return Ok(json!({ "ok": true, "changed": false }));
    }

    values.push(params.id.clone().into());
    let sql = format!("UPDATE {} SET {} WHERE id = ?", kind.table(), sets.join(", "));
    conn.execute(&sql, rusqlite::params_from_iter(values))
        .map_err(|e| HandlerErr::db("db_update_failed", e))?;

    Ok(json!({ "ok": true, "changed": true }))
}

fn delete(state: &AppState, kind: ResourceKind, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let conn = db_conn(state)?;
    let params: IdParams = parse_params(&req.params)?;
    if !resource_exists(conn, kind, &params.id)? {
        return Err(HandlerErr::not_found(format!("{} not found", kind.label())));
    }

    let refs = schedule_refs(conn, kind, &params.id)?;
    if refs > 0 {
        return Err(HandlerErr::new(
            "in_use",
            format!("{} is used by {} schedule slot(s)", kind.label(), refs),
        )
        .with_details(json!({ "scheduleCount": refs })));
    }

    conn.execute(
        &format!("DELETE FROM {} WHERE id = ?", kind.table()),
        [&params.id],
    )
    .map_err(|e| {
        HandlerErr::db("db_delete_failed", e).with_details(json!({ "table": kind.table() }))
    })?;

    tracing::info!(kind = kind.label(), id = %params.id, "resource deleted");
    Ok(json!({ "ok": true }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let (prefix, action) = req.method.split_once('.')?;
    let kind = ResourceKind::parse(prefix)?;
    let result = match action {
        "list" => list(state, kind, req),
        "create" => create(state, kind, req),
        "update" => update(state, kind, req),
        "delete" => delete(state, kind, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
