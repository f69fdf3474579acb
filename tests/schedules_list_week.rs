mod test_support;

use serde_json::json;
use std::io::BufReader;
use std::process::{ChildStdin, ChildStdout};
use test_support::{create_resource, request_err, request_ok, spawn_sidecar, temp_dir};

fn add_slot(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    day: &str,
    start: &str,
    end: &str,
    teacher: &str,
    title: &str,
) {
    let _ = request_ok(
        stdin,
        reader,
        id,
        "schedules.create",
        json!({ "input": {
            "dayOfWeek": day, "startTime": start, "endTime": end,
            "teacherId": teacher, "title": title
        }}),
    );
}

fn titles(items: &serde_json::Value) -> Vec<String> {
    items
        .as_array()
        .expect("items")
        .iter()
        .map(|i| i["title"].as_str().unwrap_or("").to_string())
        .collect()
}

#[test]
fn list_pages_filters_and_orders_by_week() {
    let workspace = temp_dir("center-sched-list");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let t1 = create_resource(&mut stdin, &mut reader, "2", "teachers", "T1");
    let t2 = create_resource(&mut stdin, &mut reader, "3", "teachers", "T2");

    add_slot(&mut stdin, &mut reader, "4", "monday", "12:00", "13:00", &t1, "Mon noon");
    add_slot(&mut stdin, &mut reader, "5", "friday", "09:00", "10:00", &t2, "Fri early");
    add_slot(&mut stdin, &mut reader, "6", "saturday", "16:00", "17:00", &t1, "Sat late");
    add_slot(&mut stdin, &mut reader, "7", "monday", "08:00", "09:00", &t2, "Mon early");
    add_slot(&mut stdin, &mut reader, "8", "saturday", "08:00", "09:00", &t2, "Sat early");

    // Saturday-first week by default.
    let listed = request_ok(&mut stdin, &mut reader, "9", "schedules.list", json!({}));
    assert_eq!(listed["total"], 5);
    assert_eq!(listed["pageSize"], 25);
    assert_eq!(
        titles(&listed["items"]),
        vec!["Sat early", "Sat late", "Mon early", "Mon noon", "Fri early"]
    );

    let page2 = request_ok(
        &mut stdin,
        &mut reader,
        "10",
        "schedules.list",
        json!({ "page": 2, "pageSize": 2 }),
    );
    assert_eq!(page2["pageCount"], 3);
    assert_eq!(titles(&page2["items"]), vec!["Mon early", "Mon noon"]);

    let by_teacher = request_ok(
        &mut stdin,
        &mut reader,
        "11",
        "schedules.list",
        json!({ "filters": { "teacherId": t1 } }),
    );
    assert_eq!(titles(&by_teacher["items"]), vec!["Sat late", "Mon noon"]);

    let by_day = request_ok(
        &mut stdin,
        &mut reader,
        "12",
        "schedules.list",
        json!({ "filters": { "dayOfWeek": "Mon", "search": "early" } }),
    );
    assert_eq!(titles(&by_day["items"]), vec!["Mon early"]);

    let (code, _) = request_err(
        &mut stdin,
        &mut reader,
        "13",
        "schedules.list",
        json!({ "filters": { "dayOfWeek": "Caturday" } }),
    );
    assert_eq!(code, "bad_params");

    // Moving the week start reorders everything.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "14",
        "setup.update",
        json!({ "section": "schedule", "patch": { "weekStartsOn": "monday" } }),
    );
    let listed = request_ok(&mut stdin, &mut reader, "15", "schedules.list", json!({}));
    assert_eq!(
        titles(&listed["items"]),
        vec!["Mon early", "Mon noon", "Fri early", "Sat early", "Sat late"]
    );

    // Search terms match literally, wildcards included.
    add_slot(&mut stdin, &mut reader, "16", "thursday", "10:00", "11:00", &t1, "100% attendance");
    add_slot(&mut stdin, &mut reader, "17", "thursday", "12:00", "13:00", &t1, "1000 club");
    add_slot(&mut stdin, &mut reader, "18", "thursday", "14:00", "15:00", &t1, "lab_b");
    let found = request_ok(
        &mut stdin,
        &mut reader,
        "19",
        "schedules.list",
        json!({ "filters": { "search": "0%" } }),
    );
    assert_eq!(titles(&found["items"]), vec!["100% attendance"]);
    let found = request_ok(
        &mut stdin,
        &mut reader,
        "20",
        "schedules.list",
        json!({ "filters": { "search": "_" } }),
    );
    assert_eq!(titles(&found["items"]), vec!["lab_b"]);

    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn week_view_has_seven_days_from_configured_start() {
    let workspace = temp_dir("center-sched-week");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let t1 = create_resource(&mut stdin, &mut reader, "2", "teachers", "T1");
    let t2 = create_resource(&mut stdin, &mut reader, "3", "teachers", "T2");
    add_slot(&mut stdin, &mut reader, "4", "sunday", "10:00", "11:00", &t1, "Sun A");
    add_slot(&mut stdin, &mut reader, "5", "sunday", "10:00", "11:00", &t2, "Sun B");
    add_slot(&mut stdin, &mut reader, "6", "tuesday", "14:00", "15:00", &t1, "Tue");

    let week = request_ok(&mut stdin, &mut reader, "7", "schedules.week", json!({}));
    assert_eq!(week["weekStartsOn"], "saturday");
    assert_eq!(week["dayStartTime"], "08:00");
    assert_eq!(week["dayEndTime"], "22:00");
    let days = week["days"].as_array().expect("days");
    let keys: Vec<&str> = days
        .iter()
        .map(|d| d["dayOfWeek"].as_str().unwrap_or(""))
        .collect();
    assert_eq!(
        keys,
        vec!["saturday", "sunday", "monday", "tuesday", "wednesday", "thursday", "friday"]
    );
    assert_eq!(titles(&days[1]["slots"]), vec!["Sun A", "Sun B"]);
    assert_eq!(titles(&days[3]["slots"]), vec!["Tue"]);
    assert_eq!(days[0]["slots"], json!([]));

    let mine = request_ok(
        &mut stdin,
        &mut reader,
        "8",
        "schedules.week",
        json!({ "teacherId": t2 }),
    );
    assert_eq!(titles(&mine["days"][1]["slots"]), vec!["Sun B"]);
    assert_eq!(mine["days"][3]["slots"], json!([]));

    let _ = std::fs::remove_dir_all(workspace);
}
