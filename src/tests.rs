//! Integration tests for the Glico Controle backend.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::config::{Config, Delays, DEFAULT_ADMIN_EMAIL};
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    db_path: PathBuf,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_delays(Delays::none()).await
    }

    async fn with_delays(delays: Delays) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");
        let base_url = serve(test_config(&db_path, delays)).await;

        TestFixture {
            client: Client::new(),
            base_url,
            db_path,
            _temp_dir: temp_dir,
        }
    }

    /// Start a second server over the same database, as after a restart.
    async fn restart(&self) -> String {
        serve(test_config(&self.db_path, Delays::none())).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }

    async fn send(&self, method: reqwest::Method, path: &str, body: Value) -> (StatusCode, Value) {
        let resp = self
            .client
            .request(method, self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(reqwest::Method::POST, path, body).await
    }

    async fn put(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.send(reqwest::Method::PUT, path, body).await
    }

    /// Answer every quiz step and press "next" on the last one.
    async fn complete_quiz(&self, email: &str) -> Value {
        let steps = [
            ("/api/quiz/draft", json!({ "name": "Maria Silva", "email": email, "age": "47" })),
            ("/api/quiz/draft", json!({ "diabetesType": "type2" })),
            ("/api/quiz/toggle", json!({ "field": "challenges", "value": "Controle do peso" })),
            ("/api/quiz/toggle", json!({ "field": "medications", "value": "Metformina" })),
            ("/api/quiz/draft", json!({ "experience": "beginner" })),
        ];

        let mut last = Value::Null;
        for (path, body) in steps {
            let (status, _) = if path.ends_with("draft") {
                self.put(path, body).await
            } else {
                self.post(path, body).await
            };
            assert_eq!(status, StatusCode::OK);

            let (status, body) = self.post("/api/quiz/next", json!({})).await;
            assert_eq!(status, StatusCode::OK, "{}", body);
            last = body;
        }
        last
    }

    async fn add_reading(&self, value: Value) -> (StatusCode, Value) {
        self.post("/api/glucose", json!({ "value": value, "unit": "mg/dL" }))
            .await
    }
}

fn test_config(db_path: &std::path::Path, delays: Delays) -> Config {
    Config {
        db_path: db_path.to_path_buf(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_level: "warn".to_string(),
        delays,
        ..Config::default()
    }
}

async fn serve(config: Config) -> String {
    let state = AppState::build(config).await.expect("Failed to build state");
    let app = create_router(state);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    format!("http://{}", addr)
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_fresh_document() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/datastore").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["revisionId"], 0);
    assert_eq!(body["data"]["currentStep"], "quiz");
    assert_eq!(body["data"]["user"], Value::Null);
    assert_eq!(body["data"]["glucoseReadings"], json!([]));

    let (_, session) = fixture.get("/api/session").await;
    assert_eq!(session["data"]["activeTab"], "home");
    assert_eq!(session["data"]["tabs"].as_array().unwrap().len(), 7);
    assert_eq!(session["data"]["hasUser"], false);
}

#[tokio::test]
async fn test_admin_skips_payment() {
    let fixture = TestFixture::new().await;

    let body = fixture.complete_quiz(DEFAULT_ADMIN_EMAIL).await;
    assert_eq!(body["data"]["completed"], true);
    assert_eq!(body["data"]["screen"], "dashboard");
    assert_eq!(body["data"]["user"]["hasAccess"], true);
    assert_eq!(body["data"]["user"]["age"], 47);
    assert_eq!(body["data"]["user"]["medications"], json!(["Metformina"]));

    // Wizard starts over after completion.
    assert_eq!(body["data"]["quiz"]["stepIndex"], 0);
    assert_eq!(body["data"]["quiz"]["draft"]["name"], "");
}

#[tokio::test]
async fn test_regular_user_goes_through_payment() {
    let fixture = TestFixture::new().await;

    let body = fixture.complete_quiz("maria@example.com").await;
    assert_eq!(body["data"]["screen"], "payment");
    assert_eq!(body["data"]["user"]["hasAccess"], false);

    let (status, body) = fixture.post("/api/payment/confirm", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["screen"], "dashboard");
    assert_eq!(body["data"]["pending"]["payment"], false);

    // Payment does not grant the access flag.
    let (_, doc) = fixture.get("/api/datastore").await;
    assert_eq!(doc["data"]["user"]["hasAccess"], false);
}

#[tokio::test]
async fn test_quiz_validation_and_back() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.post("/api/quiz/next", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    fixture
        .put(
            "/api/quiz/draft",
            json!({ "name": "Ana", "email": "ana@example.com", "age": 30 }),
        )
        .await;
    let (_, body) = fixture.post("/api/quiz/next", json!({})).await;
    assert_eq!(body["data"]["quiz"]["title"], "Tipo de Diabetes");

    fixture.post("/api/quiz/back", json!({})).await;
    let (_, body) = fixture.post("/api/quiz/back", json!({})).await;
    assert_eq!(body["data"]["stepIndex"], 0);
    assert_eq!(body["data"]["draft"]["age"], "30");

    let (status, body) = fixture
        .post("/api/quiz/toggle", json!({ "field": "challenges", "value": "Dormir" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_glucose_statistics() {
    let fixture = TestFixture::new().await;

    for value in [json!(65), json!("120"), json!(210)] {
        let (status, _) = fixture.add_reading(value).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = fixture.get("/api/glucose").await;
    let data = &body["data"];
    assert_eq!(data["total"], 3);
    assert!((data["average"].as_f64().unwrap() - 131.666).abs() < 0.01);
    assert_eq!(data["averageStatus"], "normal");
    assert_eq!(data["recent"].as_array().unwrap().len(), 3);

    let (_, body) = fixture.get("/api/records?range=month").await;
    let data = &body["data"];
    assert_eq!(data["range"], "month");
    assert_eq!(data["rangeLabel"], "Último Mês");
    assert_eq!(data["stats"]["inRange"], 1);
    assert_eq!(data["stats"]["min"], 65.0);
    assert_eq!(data["stats"]["max"], 210.0);
    assert!((data["stats"]["percentageInRange"].as_f64().unwrap() - 33.333).abs() < 0.01);
    assert_eq!(data["insights"]["tier"], "needs-improvement");
    assert_eq!(data["averageWithinGoal"], true);
    assert_eq!(data["dailyAverages"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_records_without_readings() {
    let fixture = TestFixture::new().await;

    let (_, body) = fixture.get("/api/records?range=decade").await;
    assert_eq!(body["data"]["range"], "week");
    assert_eq!(body["data"]["stats"], Value::Null);
    assert_eq!(body["data"]["insights"]["messages"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_glucose_value_is_rejected() {
    let fixture = TestFixture::new().await;

    for value in [json!("abc"), Value::Null] {
        let (status, body) = fixture.add_reading(value).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    let (_, session) = fixture.get("/api/session").await;
    assert_eq!(session["data"]["pending"]["reading"], false);

    let (_, body) = fixture.get("/api/datastore").await;
    assert_eq!(body["revisionId"], 0);
}

#[tokio::test]
async fn test_duplicate_submission_while_pending() {
    let fixture = TestFixture::with_delays(Delays {
        submit: Duration::from_millis(400),
        ..Delays::none()
    })
    .await;

    let (first, second) = tokio::join!(
        fixture.add_reading(json!(100)),
        async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            fixture.add_reading(json!(110)).await
        }
    );

    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(second.0, StatusCode::CONFLICT);
    assert_eq!(second.1["error"]["code"], "OPERATION_PENDING");

    let (_, body) = fixture.get("/api/glucose").await;
    assert_eq!(body["data"]["total"], 1);
}

#[tokio::test]
async fn test_daily_checklist() {
    let fixture = TestFixture::new().await;

    let (_, first) = fixture.get("/api/tasks/today").await;
    let (_, second) = fixture.get("/api/tasks/today").await;
    assert_eq!(first["data"]["tasks"].as_array().unwrap().len(), 5);
    assert_eq!(second["data"]["tasks"], first["data"]["tasks"]);
    assert_eq!(second["revisionId"], first["revisionId"]);

    let id = first["data"]["tasks"][0]["id"].as_str().unwrap().to_string();
    let path = format!("/api/tasks/{}", id);
    let (_, once) = fixture.put(&path, json!({ "completed": true })).await;
    let (_, twice) = fixture.put(&path, json!({ "completed": true })).await;
    assert_eq!(once["data"]["progress"]["completed"], 1);
    assert_eq!(twice["data"]["progress"]["completed"], 1);
    assert_eq!(twice["data"]["progress"]["percentage"], 20.0);
    assert_eq!(twice["revisionId"], once["revisionId"]);

    let (status, body) = fixture
        .put("/api/tasks/unknown-task", json!({ "completed": true }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["revisionId"], twice["revisionId"]);

    let (_, home) = fixture.get("/api/home").await;
    assert_eq!(home["data"]["quickStats"]["tasksCompletedToday"], 1);
    assert_eq!(home["data"]["quickStats"]["totalTasksToday"], 5);
    assert_eq!(home["data"]["firstName"], "Usuário");
}

#[tokio::test]
async fn test_reminders() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post(
            "/api/reminders",
            json!({ "title": "Jantar", "type": "meal", "time": "19:30" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "Lembrete: Jantar");
    assert_eq!(body["data"]["enabled"], true);

    fixture
        .post(
            "/api/reminders",
            json!({ "title": "Glicemia em jejum", "time": "7:00", "message": "Medir antes do café" }),
        )
        .await;

    let (_, body) = fixture.get("/api/reminders").await;
    let list = body["data"].as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["time"], "07:00");
    assert_eq!(list[0]["type"], "glucose");
    assert_eq!(list[1]["title"], "Jantar");

    let (status, _) = fixture
        .post("/api/reminders", json!({ "title": "  ", "time": "08:00" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = fixture
        .post("/api/reminders", json!({ "title": "Remédio", "time": "25:00" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, home) = fixture.get("/api/home").await;
    assert_eq!(home["data"]["quickStats"]["enabledReminders"], 2);
}

#[tokio::test]
async fn test_export_file() {
    let fixture = TestFixture::new().await;
    fixture.add_reading(json!(95)).await;

    let resp = fixture
        .client
        .get(fixture.url("/api/records/export?range=quarter"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "application/json");

    let disposition = resp.headers()["content-disposition"].to_str().unwrap().to_string();
    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    assert_eq!(
        disposition,
        format!("attachment; filename=\"diabetes-records-quarter-{}.json\"", today)
    );

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["timeRange"], "quarter");
    assert_eq!(body["glucoseReadings"].as_array().unwrap().len(), 1);
    assert_eq!(body["stats"]["total"], 1);
    assert!(body["exportDate"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_profile() {
    let fixture = TestFixture::new().await;

    let (_, body) = fixture.get("/api/profile").await;
    assert_eq!(body["data"]["user"], Value::Null);
    assert_eq!(body["data"]["daysSinceSignup"], 0);

    let (status, body) = fixture.put("/api/profile", json!({ "name": "Ana" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let created = fixture.complete_quiz("maria@example.com").await;
    let user = &created["data"]["user"];

    let (status, body) = fixture
        .put("/api/profile", json!({ "name": "Maria Souza", "age": "52", "diabetesType": "type1" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let updated = &body["data"]["user"];
    assert_eq!(updated["name"], "Maria Souza");
    assert_eq!(updated["age"], 52);
    assert_eq!(updated["id"], user["id"]);
    assert_eq!(updated["createdAt"], user["createdAt"]);
    assert_eq!(updated["hasAccess"], user["hasAccess"]);
    assert_eq!(body["data"]["diabetesTypeLabel"], "Diabetes Tipo 1");
}

#[tokio::test]
async fn test_state_survives_restart() {
    let fixture = TestFixture::new().await;

    fixture.complete_quiz(DEFAULT_ADMIN_EMAIL).await;
    fixture.add_reading(json!(130)).await;
    fixture
        .post("/api/reminders", json!({ "title": "Metformina", "type": "medication", "time": "08:00" }))
        .await;
    fixture.put("/api/session/tab", json!({ "tab": "records" })).await;

    let (_, before) = fixture.get("/api/datastore").await;

    let restarted = fixture.restart().await;
    let after: Value = fixture
        .client
        .get(format!("{}/api/datastore", restarted))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(after["data"], before["data"]);
    assert_eq!(after["revisionId"], before["revisionId"]);

    // The tab is not part of the document.
    let session: Value = fixture
        .client
        .get(format!("{}/api/session", restarted))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(session["data"]["activeTab"], "home");
    assert_eq!(session["data"]["screen"], "dashboard");
}

#[tokio::test]
async fn test_set_screen_and_revision() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .put("/api/session/screen", json!({ "screen": "payment" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["screen"], "payment");
    assert_eq!(body["revisionId"], 1);

    let (_, body) = fixture.get("/api/datastore/revision").await;
    assert_eq!(body["data"]["revisionId"], 1);
}

#[tokio::test]
async fn test_daily_summary() {
    let fixture = TestFixture::new().await;
    fixture.add_reading(json!(190)).await;

    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    let (_, body) = fixture.get(&format!("/api/summaries/{}", today)).await;
    assert_eq!(body["data"]["date"], today);
    assert_eq!(body["data"]["averageGlucose"], 190.0);
    assert_eq!(body["data"]["progressLevel"], "needs-attention");

    let (status, _) = fixture.get("/api/summaries/yesterday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ebook_navigation() {
    let fixture = TestFixture::new().await;

    let (_, body) = fixture.get("/api/ebook").await;
    assert_eq!(body["data"]["chapters"].as_array().unwrap().len(), 5);
    assert_eq!(body["data"]["totalPages"], 175);
    assert_eq!(body["data"]["position"], json!({ "chapter": 1, "page": 1 }));

    let (_, body) = fixture.get("/api/ebook/chapters/2").await;
    assert_eq!(body["data"]["chapter"]["title"], "Tipos de Diabetes");
    assert_eq!(body["data"]["position"], json!({ "chapter": 2, "page": 16 }));

    let (_, body) = fixture.put("/api/ebook/pages/500", json!({})).await;
    assert_eq!(body["data"]["moved"], false);
    assert_eq!(body["data"]["position"]["page"], 16);

    let (_, body) = fixture.put("/api/ebook/pages/abc", json!({})).await;
    assert_eq!(body["data"]["moved"], true);
    assert_eq!(body["data"]["position"]["page"], 1);

    let (status, _) = fixture.get("/api/ebook/chapters/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = fixture.get("/api/ebook/search?q=insulina").await;
    assert!(!body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_meal_plan() {
    let fixture = TestFixture::new().await;

    let (_, body) = fixture.get("/api/meals").await;
    let days = body["data"].as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days[0]["label"], "Segunda");
    assert_eq!(days[0]["hasPlan"], true);

    let (_, body) = fixture.get("/api/meals/sunday").await;
    assert_eq!(body["data"]["day"], "monday");
    let meals = body["data"]["meals"].as_array().unwrap();
    assert!(meals.iter().all(|m| m["recommended"] == true));
    assert_eq!(meals[0]["slot"], "breakfast");
    assert_eq!(meals[0]["slotLabel"], "Café da Manhã");
}

#[tokio::test]
async fn test_router_without_network() {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir.path().join("oneshot.sqlite"), Delays::none());
    let app = create_router(AppState::build(config).await.unwrap());

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/ebook/search?q=")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}
