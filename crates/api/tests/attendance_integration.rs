//! Integration tests for the scan-ingestion pipeline and manual attendance
//! entry. Require a running PostgreSQL instance (see `TEST_DATABASE_URL`).

mod common;

use axum::http::{Method, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use common::*;
use dorm_manager_api::services::scan::{ScanError, ScanService};
use persistence::repositories::UserRepository;

/// Everything a scan test needs: one dormitory with a schedule, an assigned
/// device, and an enrolled student.
struct ScanFixture {
    app: Router,
    pool: PgPool,
    admin: AuthenticatedUser,
    schedule_id: String,
    device: CreatedAccount,
    student_id: String,
    rfid_tag: String,
}

async fn scan_fixture(schedule_body: Option<serde_json::Value>) -> ScanFixture {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let admin = register_admin(&app).await;
    let dormitory_id = create_test_dormitory(&app, &admin).await;

    let schedule_id = match schedule_body {
        Some(mut body) => {
            body["dormitory_id"] = json!(dormitory_id);
            create_test_schedule(&app, &admin, body).await
        }
        None => create_open_schedule(&app, &admin, &dormitory_id).await,
    };

    let device = create_test_account(&app, &admin, "io-device").await;
    assign_devices(&app, &admin, &schedule_id, &[&device.user_id]).await;

    let rfid_tag = unique_rfid_tag();
    let student_id = create_test_student(&app, &admin, &dormitory_id, &rfid_tag).await;

    ScanFixture {
        app,
        pool,
        admin,
        schedule_id,
        device,
        student_id,
        rfid_tag,
    }
}

/// A schedule covering Monday 07:00-08:30 only. The dormitory id is filled
/// in by the fixture.
fn monday_morning_schedule() -> serde_json::Value {
    json!({
        "name": format!("Monday morning {}", Uuid::new_v4().simple()),
        "dormitory_id": "",
        "monday": true,
        "start_time": "07:00",
        "end_time": "08:30",
        "start_date": "2025-01-01T00:00:00Z"
    })
}

/// Load the device's account so the pipeline can be driven directly with
/// explicit instants.
async fn load_device_user(pool: &PgPool, device: &CreatedAccount) -> domain::models::User {
    let id = Uuid::parse_str(&device.user_id).unwrap();
    let entity = UserRepository::new(pool.clone())
        .find_by_id(id)
        .await
        .unwrap()
        .unwrap();
    domain::models::User::from(entity)
}

async fn attendance_count(pool: &PgPool, student_id: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendances WHERE student_id = $1")
        .bind(Uuid::parse_str(student_id).unwrap())
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn rfid_log_count(pool: &PgPool, student_id: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rfid_logs WHERE student_id = $1")
        .bind(Uuid::parse_str(student_id).unwrap())
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_scan_toggles_between_check_in_and_check_out() {
    let fx = scan_fixture(None).await;
    let device = login(&fx.app, &fx.device.email, &fx.device.password).await;

    let mut observed = Vec::new();
    for _ in 0..3 {
        let request = json_request_with_auth(
            Method::POST,
            "/api/v1/attendance/rfid-scan",
            json!({ "rfid_tag": fx.rfid_tag }),
            &device.access_token,
        );
        let response = fx.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = parse_response_body(response).await;
        observed.push((
            body["direction"].as_str().unwrap().to_string(),
            body["status"].as_str().unwrap().to_string(),
        ));
    }

    assert_eq!(observed[0], ("check_in".to_string(), "present".to_string()));
    assert_eq!(observed[1], ("check_out".to_string(), "absent".to_string()));
    assert_eq!(observed[2], ("check_in".to_string(), "present".to_string()));

    assert_eq!(attendance_count(&fx.pool, &fx.student_id).await, 3);
    assert_eq!(rfid_log_count(&fx.pool, &fx.student_id).await, 3);
}

#[tokio::test]
async fn test_scan_toggle_at_explicit_instants_within_window() {
    let fx = scan_fixture(Some(monday_morning_schedule())).await;
    let device = load_device_user(&fx.pool, &fx.device).await;
    let service = ScanService::new(fx.pool.clone(), 30);

    // 2025-03-10 is a Monday; all three instants fall inside 07:00-08:30.
    let instants: [DateTime<Utc>; 3] = [
        Utc.with_ymd_and_hms(2025, 3, 10, 7, 15, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 3, 10, 7, 45, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap(),
    ];

    let mut observed = Vec::new();
    for at in instants {
        let response = service.ingest(&device, &fx.rfid_tag, at).await.unwrap();
        observed.push((response.direction, response.status));
    }

    assert_eq!(observed[0], ("check_in".to_string(), "present".to_string()));
    assert_eq!(observed[1], ("check_out".to_string(), "absent".to_string()));
    assert_eq!(observed[2], ("check_in".to_string(), "present".to_string()));

    assert_eq!(attendance_count(&fx.pool, &fx.student_id).await, 3);
}

#[tokio::test]
async fn test_scan_outside_window_rejected_and_writes_nothing() {
    let fx = scan_fixture(Some(monday_morning_schedule())).await;
    let device = load_device_user(&fx.pool, &fx.device).await;
    let service = ScanService::new(fx.pool.clone(), 30);

    // A Tuesday; the schedule only covers Mondays.
    let at = Utc.with_ymd_and_hms(2025, 3, 11, 7, 15, 0).unwrap();
    let err = service.ingest(&device, &fx.rfid_tag, at).await.unwrap_err();
    assert!(matches!(err, ScanError::NoActiveSchedule));

    // Monday, but before the window opens.
    let at = Utc.with_ymd_and_hms(2025, 3, 10, 6, 59, 0).unwrap();
    let err = service.ingest(&device, &fx.rfid_tag, at).await.unwrap_err();
    assert!(matches!(err, ScanError::NoActiveSchedule));

    assert_eq!(attendance_count(&fx.pool, &fx.student_id).await, 0);
    assert_eq!(rfid_log_count(&fx.pool, &fx.student_id).await, 0);
}

#[tokio::test]
async fn test_scan_from_unassigned_device_rejected() {
    let fx = scan_fixture(None).await;

    // A second device in the same dormitory, never assigned to the schedule.
    let other = create_test_account(&fx.app, &fx.admin, "io-device").await;
    let other = login(&fx.app, &other.email, &other.password).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/v1/attendance/rfid-scan",
        json!({ "rfid_tag": fx.rfid_tag }),
        &other.access_token,
    );
    let response = fx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "device_not_authorized");

    assert_eq!(attendance_count(&fx.pool, &fx.student_id).await, 0);
    assert_eq!(rfid_log_count(&fx.pool, &fx.student_id).await, 0);
}

#[tokio::test]
async fn test_scan_from_staff_account_rejected() {
    let fx = scan_fixture(None).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/v1/attendance/rfid-scan",
        json!({ "rfid_tag": fx.rfid_tag }),
        &fx.admin.access_token,
    );
    let response = fx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_tag_recorded_once_with_first_seen_preserved() {
    let fx = scan_fixture(None).await;
    let device = login(&fx.app, &fx.device.email, &fx.device.password).await;
    let unknown_tag = unique_rfid_tag();

    let scan = |tag: String, token: String| {
        let app = fx.app.clone();
        async move {
            let request = json_request_with_auth(
                Method::POST,
                "/api/v1/attendance/rfid-scan",
                json!({ "rfid_tag": tag }),
                &token,
            );
            app.oneshot(request).await.unwrap()
        }
    };

    let response = scan(unknown_tag.clone(), device.access_token.clone()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "unknown_tag");

    let (first_created, _): (DateTime<Utc>, DateTime<Utc>) = sqlx::query_as(
        "SELECT created_at, last_seen FROM unknown_rfids WHERE rfid_tag = $1",
    )
    .bind(&unknown_tag)
    .fetch_one(&fx.pool)
    .await
    .unwrap();

    let response = scan(unknown_tag.clone(), device.access_token.clone()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let rows: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM unknown_rfids WHERE rfid_tag = $1")
            .bind(&unknown_tag)
            .fetch_one(&fx.pool)
            .await
            .unwrap();
    assert_eq!(rows, 1);

    let (created_at, last_seen): (DateTime<Utc>, DateTime<Utc>) = sqlx::query_as(
        "SELECT created_at, last_seen FROM unknown_rfids WHERE rfid_tag = $1",
    )
    .bind(&unknown_tag)
    .fetch_one(&fx.pool)
    .await
    .unwrap();
    assert_eq!(created_at, first_created);
    assert!(last_seen >= created_at);
}

#[tokio::test]
async fn test_unknown_tag_sweep_purges_expired_entries() {
    let fx = scan_fixture(None).await;
    let device = login(&fx.app, &fx.device.email, &fx.device.password).await;

    // A sighting well past the 30-day retention window.
    let stale_tag = unique_rfid_tag();
    let stale_at = Utc::now() - Duration::days(40);
    sqlx::query(
        "INSERT INTO unknown_rfids (rfid_tag, created_at, last_seen) VALUES ($1, $2, $2)",
    )
    .bind(&stale_tag)
    .bind(stale_at)
    .execute(&fx.pool)
    .await
    .unwrap();

    // Any unknown-tag scan triggers the sweep.
    let request = json_request_with_auth(
        Method::POST,
        "/api/v1/attendance/rfid-scan",
        json!({ "rfid_tag": unique_rfid_tag() }),
        &device.access_token,
    );
    let response = fx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let remaining: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM unknown_rfids WHERE rfid_tag = $1")
            .bind(&stale_tag)
            .fetch_one(&fx.pool)
            .await
            .unwrap();
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn test_manual_entry_accepted_in_open_window() {
    let fx = scan_fixture(None).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/v1/attendance",
        json!({
            "student_id": fx.student_id,
            "schedule_id": fx.schedule_id,
            "status": "present",
            "notes": "arrived with the group"
        }),
        &fx.admin.access_token,
    );
    let response = fx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "present");
    assert_eq!(body["student_id"], fx.student_id.as_str());
    assert_eq!(body["recorded_by_id"], fx.admin.user_id.as_str());
}

#[tokio::test]
async fn test_manual_entry_rejected_when_schedule_not_open() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool);

    let admin = register_admin(&app).await;
    let dormitory_id = create_test_dormitory(&app, &admin).await;
    // Date range starts a month out, so the window cannot be open yet.
    let schedule_id = create_future_schedule(&app, &admin, &dormitory_id).await;
    let student_id =
        create_test_student(&app, &admin, &dormitory_id, &unique_rfid_tag()).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/v1/attendance",
        json!({
            "student_id": student_id,
            "schedule_id": schedule_id,
            "status": "present"
        }),
        &admin.access_token,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_manual_correction_updates_status_in_open_window() {
    let fx = scan_fixture(None).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/v1/attendance",
        json!({
            "student_id": fx.student_id,
            "schedule_id": fx.schedule_id,
            "status": "present"
        }),
        &fx.admin.access_token,
    );
    let response = fx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = parse_response_body(response).await;
    let record_id = created["id"].as_str().unwrap();

    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/v1/attendance/{}", record_id),
        json!({ "status": "late", "notes": "overslept" }),
        &fx.admin.access_token,
    );
    let response = fx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "late");
    assert_eq!(body["notes"], "overslept");
}

#[tokio::test]
async fn test_manual_correction_rejected_when_schedule_not_open() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    let app = create_test_app(test_config(), pool.clone());

    let admin = register_admin(&app).await;
    let dormitory_id = create_test_dormitory(&app, &admin).await;
    let schedule_id = create_future_schedule(&app, &admin, &dormitory_id).await;
    let student_id =
        create_test_student(&app, &admin, &dormitory_id, &unique_rfid_tag()).await;

    // Seed the record directly; the API would refuse to create it against a
    // schedule that is not open.
    let record_id: Uuid = sqlx::query_scalar(
        "INSERT INTO attendances (student_id, schedule_id, status, recorded_by_id)
         VALUES ($1, $2, 'present', $3)
         RETURNING id",
    )
    .bind(Uuid::parse_str(&student_id).unwrap())
    .bind(Uuid::parse_str(&schedule_id).unwrap())
    .bind(Uuid::parse_str(&admin.user_id).unwrap())
    .fetch_one(&pool)
    .await
    .unwrap();

    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/v1/attendance/{}", record_id),
        json!({ "status": "late" }),
        &admin.access_token,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_attendance_listing_pages_through_records() {
    let fx = scan_fixture(None).await;
    let device = login(&fx.app, &fx.device.email, &fx.device.password).await;

    for _ in 0..3 {
        let request = json_request_with_auth(
            Method::POST,
            "/api/v1/attendance/rfid-scan",
            json!({ "rfid_tag": fx.rfid_tag }),
            &device.access_token,
        );
        let response = fx.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let uri = format!(
        "/api/v1/attendance/student/{}?limit=2",
        fx.student_id
    );
    let request = get_request_with_auth(&uri, &fx.admin.access_token);
    let response = fx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page = parse_response_body(response).await;
    assert_eq!(page["items"].as_array().unwrap().len(), 2);
    let cursor = page["next_cursor"].as_str().unwrap().to_string();

    let uri = format!(
        "/api/v1/attendance/student/{}?limit=2&cursor={}",
        fx.student_id, cursor
    );
    let request = get_request_with_auth(&uri, &fx.admin.access_token);
    let response = fx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page = parse_response_body(response).await;
    assert_eq!(page["items"].as_array().unwrap().len(), 1);

    // Newest first across pages, strictly descending.
    let request = get_request_with_auth(
        &format!("/api/v1/attendance/student/{}", fx.student_id),
        &fx.admin.access_token,
    );
    let response = fx.app.clone().oneshot(request).await.unwrap();
    let all = parse_response_body(response).await;
    let timestamps: Vec<DateTime<Utc>> = all["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| {
            item["timestamp"]
                .as_str()
                .unwrap()
                .parse::<DateTime<Utc>>()
                .unwrap()
        })
        .collect();
    assert!(timestamps.windows(2).all(|pair| pair[0] >= pair[1]));
}
