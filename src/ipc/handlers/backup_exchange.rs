use crate::backup;
use crate::ipc::error::{err, ok};
use crate::ipc::handlers::schedules::{query_slots, SlotFilters};
use crate::ipc::handlers::setup::{load_export_settings, load_schedule_settings};
use crate::ipc::helpers::{db_conn, parse_params, respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;

fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn csv_line(fields: &[&str]) -> String {
    let mut line = fields
        .iter()
        .map(|f| csv_quote(f))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportCsvParams {
    out_path: String,
    #[serde(default)]
    filters: SlotFilters,
}

fn handle_backup_export_workspace_bundle(state: &mut AppState, req: &Request) -> serde_json::Value {
    let out_path = match req.params.get("outPath").and_then(|v| v.as_str()) {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => return err(&req.id, "bad_params", "missing outPath", None),
    };
    let workspace_path = req
        .params
        .get("workspacePath")
        .and_then(|v| v.as_str())
        .map(PathBuf::from)
        .or_else(|| state.workspace.clone());
    let Some(workspace_path) = workspace_path else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    if let Some(conn) = state.db.as_ref() {
        let _ = conn.execute_batch("PRAGMA wal_checkpoint(FULL)");
    }

    let out = PathBuf::from(&out_path);
    let export = match backup::export_workspace_bundle(&workspace_path, &out) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(path = %out_path, error = %e, "bundle export failed");
            return err(
                &req.id,
                "io_failed",
                e.to_string(),
                Some(json!({ "path": out_path })),
            );
        }
    };

    tracing::info!(path = %out_path, "workspace bundle exported");
    ok(
        &req.id,
        json!({
            "ok": true,
            "path": out_path,
            "bundleFormat": export.bundle_format,
            "entryCount": export.entry_count,
            "dbSha256": export.db_sha256
        }),
    )
}

fn handle_backup_import_workspace_bundle(state: &mut AppState, req: &Request) -> serde_json::Value {
    let in_path = match req.params.get("inPath").and_then(|v| v.as_str()) {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => return err(&req.id, "bad_params", "missing inPath", None),
    };
    let workspace_path = req
        .params
        .get("workspacePath")
        .and_then(|v| v.as_str())
        .map(PathBuf::from)
        .or_else(|| state.workspace.clone());
    let Some(workspace_path) = workspace_path else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };

    let src = PathBuf::from(&in_path);
    if !src.is_file() {
        return err(
            &req.id,
            "not_found",
            "bundle file not found",
            Some(json!({ "path": in_path })),
        );
    }

    // Drop open handle before replacing file.
    state.db = None;

    let import = match backup::import_workspace_bundle(&src, &workspace_path) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(path = %in_path, error = %e, "bundle import failed");
            // Reopen the previous workspace so the session keeps working.
            if let Some(prev) = state.workspace.clone() {
                let _ = state.open_workspace(&prev);
            }
            return err(
                &req.id,
                "io_failed",
                e.to_string(),
                Some(json!({ "path": src.to_string_lossy() })),
            );
        }
    };

    match state.open_workspace(&workspace_path) {
        Ok(()) => ok(
            &req.id,
            json!({
                "ok": true,
                "workspacePath": workspace_path.to_string_lossy(),
                "bundleFormatDetected": import.bundle_format_detected,
                "checksumVerified": import.checksum_verified
            }),
        ),
        Err(e) => err(&req.id, "db_open_failed", e.to_string(), None),
    }
}

fn export_schedule_csv(state: &AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let conn = db_conn(state)?;
    let params: ExportCsvParams = parse_params(&req.params)?;
    let out_path = params.out_path.trim().to_string();
    if out_path.is_empty() {
        return Err(HandlerErr::bad_params("missing outPath"));
    }

    let schedule_settings = load_schedule_settings(conn);
    let export_settings = load_export_settings(conn);
    let rows = query_slots(conn, &params.filters, schedule_settings.week_starts_on)?;

    let mut csv = String::new();
    if export_settings.csv_include_header {
        let mut header = vec!["day", "start", "end", "title", "teacher", "hall", "year", "subject"];
        if export_settings.csv_include_ids {
            header.extend(["schedule_id", "teacher_id", "hall_id", "year_id", "subject_id"]);
        }
        csv.push_str(&csv_line(&header));
    }
    for r in &rows {
        let mut fields: Vec<&str> = vec![
            r.day_of_week.as_str(),
            r.start_time.as_str(),
            r.end_time.as_str(),
            r.title.as_str(),
            r.teacher_name.as_deref().unwrap_or(""),
            r.hall_name.as_deref().unwrap_or(""),
            r.year_name.as_deref().unwrap_or(""),
            r.subject_name.as_deref().unwrap_or(""),
        ];
        if export_settings.csv_include_ids {
            fields.extend([
                r.id.as_str(),
                r.teacher_id.as_deref().unwrap_or(""),
                r.hall_id.as_deref().unwrap_or(""),
                r.year_id.as_deref().unwrap_or(""),
                r.subject_id.as_deref().unwrap_or(""),
            ]);
        }
        csv.push_str(&csv_line(&fields));
    }

    let out = PathBuf::from(&out_path);
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            HandlerErr::new("io_failed", e.to_string()).with_details(json!({ "path": out_path }))
        })?;
    }
    std::fs::write(&out, csv).map_err(|e| {
        HandlerErr::new("io_failed", e.to_string()).with_details(json!({ "path": out_path }))
    })?;

    tracing::info!(path = %out_path, rows = rows.len(), "schedule csv exported");
    Ok(json!({ "ok": true, "rowsExported": rows.len(), "path": out_path }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "backup.exportWorkspaceBundle" => Some(handle_backup_export_workspace_bundle(state, req)),
        "backup.importWorkspaceBundle" => Some(handle_backup_import_workspace_bundle(state, req)),
        "exchange.exportScheduleCsv" => Some(respond(&req.id, export_schedule_csv(state, req))),
        _ => None,
    }
}
