mod test_support;

use serde_json::json;
use test_support::{create_resource, request_err, request_ok, spawn_sidecar, temp_dir};

#[test]
fn registry_crud_and_inactive_filter() {
    let workspace = temp_dir("center-resources-crud");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let a = create_resource(&mut stdin, &mut reader, "2", "halls", "  Main Hall  ");
    let b = create_resource(&mut stdin, &mut reader, "3", "halls", "Lab");

    let (code, _) = request_err(
        &mut stdin,
        &mut reader,
        "4",
        "halls.create",
        json!({ "name": "   " }),
    );
    assert_eq!(code, "bad_params");

    let listed = request_ok(&mut stdin, &mut reader, "5", "halls.list", json!({}));
    let items = listed["items"].as_array().expect("items");
    assert_eq!(items.len(), 2);
    // Creation order, names trimmed.
    assert_eq!(items[0]["id"], a.as_str());
    assert_eq!(items[0]["name"], "Main Hall");
    assert_eq!(items[0]["active"], true);
    assert_eq!(items[0]["scheduleCount"], 0);
    assert_eq!(items[1]["id"], b.as_str());

    let updated = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "halls.update",
        json!({ "id": b, "patch": { "name": "Science Lab", "code": "LAB", "active": false } }),
    );
    assert_eq!(updated["changed"], true);

    let listed = request_ok(&mut stdin, &mut reader, "7", "halls.list", json!({}));
    assert_eq!(listed["items"].as_array().map(|a| a.len()), Some(1));

    let listed = request_ok(
        &mut stdin,
        &mut reader,
        "8",
        "halls.list",
        json!({ "includeInactive": true }),
    );
    let items = listed["items"].as_array().expect("items");
    assert_eq!(items.len(), 2);
    assert_eq!(items[1]["name"], "Science Lab");
    assert_eq!(items[1]["code"], "LAB");
    assert_eq!(items[1]["active"], false);

    // Empty code clears it; an empty patch changes nothing.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "9",
        "halls.update",
        json!({ "id": b, "patch": { "code": "" } }),
    );
    let unchanged = request_ok(
        &mut stdin,
        &mut reader,
        "10",
        "halls.update",
        json!({ "id": b, "patch": {} }),
    );
    assert_eq!(unchanged["changed"], false);
    let listed = request_ok(
        &mut stdin,
        &mut reader,
        "11",
        "halls.list",
        json!({ "includeInactive": true }),
    );
    assert!(listed["items"][1]["code"].is_null());

    let (code, _) = request_err(
        &mut stdin,
        &mut reader,
        "12",
        "halls.update",
        json!({ "id": b, "patch": { "colour": "red" } }),
    );
    assert_eq!(code, "bad_params");

    let (code, _) = request_err(
        &mut stdin,
        &mut reader,
        "13",
        "halls.update",
        json!({ "id": "missing", "patch": { "name": "x" } }),
    );
    assert_eq!(code, "not_found");

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "14",
        "halls.delete",
        json!({ "id": a }),
    );
    let (code, _) = request_err(
        &mut stdin,
        &mut reader,
        "15",
        "halls.delete",
        json!({ "id": a }),
    );
    assert_eq!(code, "not_found");

    let _ = std::fs::remove_dir_all(workspace);
}

#[test]
fn referenced_resources_cannot_be_deleted() {
    let workspace = temp_dir("center-resources-in-use");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let teacher = create_resource(&mut stdin, &mut reader, "2", "teachers", "Ms. Nour");
    let year = create_resource(&mut stdin, &mut reader, "3", "years", "Grade 11");
    let created = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "schedules.create",
        json!({ "input": {
            "dayOfWeek": "thursday", "startTime": "17:00", "endTime": "18:30",
            "teacherId": teacher, "yearId": year, "title": "Chemistry"
        }}),
    );
    let schedule_id = created["scheduleId"].as_str().expect("scheduleId").to_string();

    let (code, details) = request_err(
        &mut stdin,
        &mut reader,
        "5",
        "teachers.delete",
        json!({ "id": teacher }),
    );
    assert_eq!(code, "in_use");
    assert_eq!(details["scheduleCount"], 1);

    let listed = request_ok(&mut stdin, &mut reader, "6", "years.list", json!({}));
    assert_eq!(listed["items"][0]["scheduleCount"], 1);

    // Renaming shows up in schedule reads.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "teachers.update",
        json!({ "id": teacher, "patch": { "name": "Dr. Nour" } }),
    );
    let fetched = request_ok(
        &mut stdin,
        &mut reader,
        "8",
        "schedules.get",
        json!({ "scheduleId": schedule_id }),
    );
    assert_eq!(fetched["schedule"]["teacherName"], "Dr. Nour");
    assert_eq!(fetched["schedule"]["yearName"], "Grade 11");
    assert!(fetched["schedule"]["hallId"].is_null());

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "9",
        "schedules.delete",
        json!({ "scheduleId": schedule_id }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "10",
        "teachers.delete",
        json!({ "id": teacher }),
    );

    let _ = std::fs::remove_dir_all(workspace);
}
