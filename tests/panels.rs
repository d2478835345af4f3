//! Dashboards, schedule search and the stored session, end to end.

use bus_book_client::dashboard::{CompanyDashboard, RiderDashboard};
use bus_book_client::forms::SearchForm;
use bus_book_client::guard::{ClientRoute, Guard, GuardOutcome};
use bus_book_client::models::{AuthResponse, Claims, Role, User};
use bus_book_client::search::{ScheduleSearch, SearchSort};
use bus_book_client::session::{forget_if_unauthorized, FileSessionStore};
use bus_book_client::{ApiError, ClientConfig, Services, Session, SessionStore};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn services(server: &MockServer) -> Services {
    let config = ClientConfig::default().with_api_url(format!("{}/api", server.uri()));
    Services::from_config(&config).unwrap()
}

fn schedule_json(id: &str, hours_ahead: i64, seats_left: u32, price: f64) -> serde_json::Value {
    let departure = Utc::now() + Duration::hours(hours_ahead);
    json!({
        "id": id,
        "routeId": "r1",
        "companyId": "c1",
        "origin": "Nairobi",
        "destination": "Mombasa",
        "departureTime": departure.to_rfc3339(),
        "arrivalTime": (departure + Duration::hours(8)).to_rfc3339(),
        "busNumber": "KDA 123X",
        "totalSeats": 49,
        "availableSeats": seats_left,
        "price": price
    })
}

async fn mount_json(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ============================================================================
// Dashboards
// ============================================================================

#[tokio::test]
async fn test_company_dashboard_loads_all_panels() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/api/companies/c1",
        json!({"id": "c1", "name": "Coastline Express", "email": "ops@coastline.co.ke", "status": "ACTIVE"}),
    )
    .await;
    mount_json(
        &server,
        "/api/routes/company/c1",
        json!([
            {"id": "r1", "companyId": "c1", "origin": "Nairobi", "destination": "Mombasa", "duration": 480, "price": 1500.0},
            {"id": "r2", "companyId": "c1", "origin": "Nairobi", "destination": "Malindi", "duration": 600, "price": 1900.0, "isActive": false}
        ]),
    )
    .await;
    mount_json(
        &server,
        "/api/schedules/company/c1",
        json!([schedule_json("s1", 24, 9, 1500.0), schedule_json("s2", -24, 0, 1500.0)]),
    )
    .await;
    mount_json(
        &server,
        "/api/BusBooking/company/c1",
        json!({"data": [
            {"id": "b1", "userId": "u1", "scheduleId": "s1", "seats": "3,4", "totalAmount": 3000.0, "status": "CONFIRMED", "bookedAt": "2026-10-01"},
            {"id": "b2", "userId": "u2", "scheduleId": "s1", "seats": ["5"], "totalAmount": 1500.0, "status": "CANCELLED", "bookedAt": "2026-10-01"}
        ]}),
    )
    .await;

    let s = services(&server).await;
    let dashboard = CompanyDashboard::load("c1", &s.companies, &s.routes, &s.schedules, &s.bookings)
        .await
        .unwrap();

    assert_eq!(dashboard.company.name, "Coastline Express");
    assert_eq!(dashboard.active_routes(), 1);
    assert_eq!(dashboard.upcoming(Utc::now()).len(), 1);
    assert_eq!(dashboard.revenue(), 3000.0);
    assert!((dashboard.average_occupancy(Utc::now()) - 40.0 / 49.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_dashboard_fails_when_any_read_fails() {
    let server = MockServer::start().await;
    mount_json(&server, "/api/BusBooking/user/u1", json!([])).await;
    Mock::given(method("GET"))
        .and(path("/api/payments/user/u1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "payments offline"})))
        .mount(&server)
        .await;

    let s = services(&server).await;
    let err = RiderDashboard::load("u1", &s.bookings, &s.payments).await.unwrap_err();
    assert!(matches!(err, ApiError::Server { status: 500, .. }));
    assert_eq!(err.server_message(), Some("payments offline"));
}

// ============================================================================
// Schedule search
// ============================================================================

#[tokio::test]
async fn test_search_drops_full_and_departed_then_sorts() {
    let server = MockServer::start().await;
    let today = Utc::now().date_naive();
    Mock::given(method("GET"))
        .and(path("/api/schedules/search"))
        .and(query_param("origin", "Nairobi"))
        .and(query_param("destination", "Mombasa"))
        .and(query_param("passengers", "2"))
        .and(query_param("date", today.format("%Y-%m-%d").to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            schedule_json("late", 10, 20, 1200.0),
            schedule_json("early", 5, 30, 1800.0),
            schedule_json("full", 6, 1, 900.0),
            schedule_json("gone", -1, 30, 900.0)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let s = services(&server).await;
    let mut form = SearchForm::new(today);
    form.origin = "Nairobi".to_string();
    form.destination = "Mombasa".to_string();
    form.passengers = 2;

    let search = ScheduleSearch::new(s.schedules.clone());
    let by_departure = search.run(&form, SearchSort::Departure, Utc::now()).await;
    let ids: Vec<String> = by_departure.unwrap().into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec!["early", "late"]);
}

#[tokio::test]
async fn test_invalid_search_never_reaches_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/schedules/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let s = services(&server).await;
    let mut form = SearchForm::new(Utc::now().date_naive());
    form.origin = "Nairobi".to_string();
    form.destination = "nairobi".to_string();

    let err = ScheduleSearch::new(s.schedules.clone())
        .run(&form, SearchSort::Price, Utc::now())
        .await
        .unwrap_err();
    match err {
        ApiError::Validation(errors) => assert!(errors.has_field("destination")),
        other => panic!("expected validation error, got {:?}", other),
    }
}

// ============================================================================
// Session lifecycle
// ============================================================================

fn auth_for(role: &str, exp: i64) -> AuthResponse {
    let claims = Claims {
        sub: "42".to_string(),
        role: role.to_string(),
        exp: exp as usize,
    };
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"server-only")).unwrap();
    AuthResponse {
        token,
        user: User {
            id: "42".to_string(),
            name: "Wanjiru Kamau".to_string(),
            email: "ops@coastline.co.ke".to_string(),
            phone: None,
            role: Role::Rider,
            company_id: Some("c1".to_string()),
            active: true,
            created_at: None,
        },
    }
}

#[test]
fn test_session_reads_role_and_expiry_from_token() {
    let exp = (Utc::now() + Duration::hours(1)).timestamp();
    let session = Session::from_auth(&auth_for("COMPANY", exp));

    assert_eq!(session.user_id, "42");
    assert_eq!(session.role, Role::Company);
    assert_eq!(session.expires_at.map(|e| e.timestamp()), Some(exp));
    assert_eq!(session.company_id.as_deref(), Some("c1"));
    assert_eq!(
        Guard::check(&ClientRoute::CompanyRoutes, Some(&session), Utc::now()),
        GuardOutcome::Allow
    );
    assert_eq!(
        Guard::check(&ClientRoute::AdminUsers, Some(&session), Utc::now()),
        GuardOutcome::Redirect("/company/dashboard".to_string())
    );
}

#[test]
fn test_expired_session_is_sent_to_login() {
    let exp = (Utc::now() - Duration::minutes(5)).timestamp();
    let session = Session::from_auth(&auth_for("ADMIN", exp));
    match Guard::check(&ClientRoute::AdminDashboard, Some(&session), Utc::now()) {
        GuardOutcome::Redirect(to) => assert!(to.starts_with("/login?returnUrl=")),
        GuardOutcome::Allow => panic!("expired session must not pass"),
    }
}

#[test]
fn test_file_store_round_trip_and_clear() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));
    assert_eq!(store.load().unwrap(), None);

    let exp = (Utc::now() + Duration::hours(1)).timestamp();
    let session = Session::from_auth(&auth_for("USER", exp));
    store.save(&session).unwrap();
    assert_eq!(store.load().unwrap(), Some(session));

    store.clear().unwrap();
    assert_eq!(store.load().unwrap(), None);
    store.clear().unwrap();
}

#[test]
fn test_corrupt_session_file_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session.json");
    std::fs::write(&file, "{not json").unwrap();
    assert_eq!(FileSessionStore::new(file).load().unwrap(), None);
}

#[cfg(unix)]
#[test]
fn test_session_file_is_private_to_owner() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("bus-book");
    let file = folder.join("session.json");
    let exp = (Utc::now() + Duration::hours(1)).timestamp();
    let store = FileSessionStore::new(&file);
    store.save(&Session::from_auth(&auth_for("USER", exp))).unwrap();

    let mode = |p: &std::path::Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode(&file), 0o600);
    assert_eq!(mode(&folder), 0o700);

    std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o644)).unwrap();
    store.save(&Session::from_auth(&auth_for("USER", exp))).unwrap();
    assert_eq!(mode(&file), 0o600);
}

#[tokio::test]
async fn test_rejected_token_removes_stored_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/BusBooking/user/42"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid token"})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = FileSessionStore::new(dir.path().join("session.json"));
    let exp = (Utc::now() + Duration::hours(1)).timestamp();
    let session = Session::from_auth(&auth_for("USER", exp));
    store.save(&session).unwrap();

    let s = services(&server).await;
    s.api.set_token(Some(session.token.clone()));
    let err = s.bookings.by_user("42").await.unwrap_err();

    assert!(forget_if_unauthorized(&store, &err).unwrap());
    assert!(!store.path().exists());
    assert_eq!(store.load().unwrap(), None);
}

#[test]
fn test_other_failures_keep_stored_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSessionStore::new(dir.path().join("session.json"));
    let exp = (Utc::now() + Duration::hours(1)).timestamp();
    store.save(&Session::from_auth(&auth_for("USER", exp))).unwrap();

    let err = ApiError::NotFound("Booking not found".to_string());
    assert!(!forget_if_unauthorized(&store, &err).unwrap());
    assert!(store.path().exists());
}
