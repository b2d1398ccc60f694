pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::evaluation::handlers as answers;
use crate::questions::handlers as question_sets;
use crate::state::AppState;
use crate::users::handlers as users;

const DEFAULT_HISTORY_LIMIT: i64 = 20;
const MAX_HISTORY_LIMIT: i64 = 100;

/// Page size for history listings: 20 by default, clamped to 1..=100.
pub fn history_limit(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT)
}

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Users
        .route("/api/v1/users", post(users::handle_create_user))
        .route("/api/v1/users/:id", get(users::handle_get_user))
        // Question sets
        .route(
            "/api/v1/question-sets",
            get(question_sets::handle_list_question_sets),
        )
        .route(
            "/api/v1/question-sets/resume",
            post(question_sets::handle_upload_resume),
        )
        .route(
            "/api/v1/question-sets/transcription",
            post(question_sets::handle_transcription),
        )
        .route(
            "/api/v1/question-sets/:id",
            get(question_sets::handle_get_question_set),
        )
        // Answers and feedback
        .route(
            "/api/v1/answers",
            get(answers::handle_answer_history).post(answers::handle_submit_answer),
        )
        .route(
            "/api/v1/feedback/preview",
            post(answers::handle_feedback_preview),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::extraction::entities::NoopEntityRecognizer;
    use crate::llm_client::fake::ScriptedLlm;
    use crate::questions::generator::NO_SKILLS_MESSAGE;
    use crate::store::MemoryStore;

    const BOUNDARY: &str = "interviewer-test-boundary";

    fn test_config() -> Config {
        Config {
            database_url: None,
            llm_api_key: "test-key".to_string(),
            llm_base_url: "http://localhost:1".to_string(),
            llm_model: "test-model".to_string(),
            llm_timeout_secs: 1,
            ner_url: None,
            cors_origin: None,
            max_upload_bytes: 1024 * 1024,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }

    fn app(llm: ScriptedLlm) -> Router {
        build_router(AppState {
            store: Arc::new(MemoryStore::new()),
            llm: Arc::new(llm),
            entities: Arc::new(NoopEntityRecognizer),
            config: test_config(),
        })
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn multipart_upload(filename: Option<&str>, content: &str) -> Request<Body> {
        let disposition = match filename {
            Some(name) => format!("form-data; name=\"file\"; filename=\"{name}\""),
            None => "form-data; name=\"file\"".to_string(),
        };
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\n\
             Content-Type: application/octet-stream\r\n\r\n{content}\r\n--{BOUNDARY}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/api/v1/question-sets/resume")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[test]
    fn test_history_limit_defaults_and_clamps() {
        assert_eq!(history_limit(None), 20);
        assert_eq!(history_limit(Some(500)), 100);
        assert_eq!(history_limit(Some(0)), 1);
        assert_eq!(history_limit(Some(7)), 7);
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(ScriptedLlm::new());
        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "interviewer-api");
        assert_eq!(body["model"], "test-model");
    }

    #[tokio::test]
    async fn test_user_lifecycle() {
        let app = app(ScriptedLlm::new());
        let (status, created) = send(
            &app,
            post_json(
                "/api/v1/users",
                json!({"username": "ada", "email": "Ada@Example.com"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["email"], "ada@example.com");

        let id = created["id"].as_str().unwrap();
        let (status, fetched) = send(&app, get(&format!("/api/v1/users/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["username"], "ada");

        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/users",
                json!({"username": "ada", "email": "other@example.com"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_user_validation_and_not_found() {
        let app = app(ScriptedLlm::new());
        let (status, _) = send(
            &app,
            post_json("/api/v1/users", json!({"username": " ", "email": "a@b.c"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            get("/api/v1/users/00000000-0000-0000-0000-000000000000"),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_transcription_to_answer_flow() {
        let llm = ScriptedLlm::new()
            // skills
            .reply("Go")
            // questions
            .reply(
                "How do Go channels work?\nWhen would you use a Go mutex?\n\
                 Explain Go interfaces.\nHow does Go schedule goroutines?\n\
                 What is Go's escape analysis?",
            )
            // expected answers
            .reply("E1")
            .reply("E2")
            .reply("E3")
            .reply("E4")
            .reply("E5")
            // feedback
            .reply("Explain buffered versus unbuffered channels.");
        let app = app(llm);

        let (status, created) = send(
            &app,
            post_json(
                "/api/v1/question-sets/transcription",
                json!({"transcription": "I mostly write Go services. Skills: Go"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["questions"].as_array().unwrap().len(), 5);
        assert_eq!(created["skills"], json!(["Go"]));

        let set_id = created["question_set_id"].as_str().unwrap().to_string();
        let (status, set) = send(&app, get(&format!("/api/v1/question-sets/{set_id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(set["source"], "voice");
        assert_eq!(set["expected_answers"], json!(["E1", "E2", "E3", "E4", "E5"]));

        let (status, answered) = send(
            &app,
            post_json(
                "/api/v1/answers",
                json!({"question_set_id": set_id, "question_index": 0, "answer": "They pass values"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            answered["feedback"],
            "Explain buffered versus unbuffered channels."
        );
        assert_eq!(answered["expected_answer"], "E1");
        assert_eq!(answered["message"], "Answer submitted successfully");

        let (status, history) = send(
            &app,
            get(&format!("/api/v1/answers?question_set_id={set_id}")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history.as_array().unwrap().len(), 1);
        assert_eq!(history[0]["question_text"], "How do Go channels work?");

        let (status, sets) = send(&app, get("/api/v1/question-sets?limit=5")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(sets.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_transcription_is_rejected() {
        let app = app(ScriptedLlm::new());
        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/question-sets/transcription",
                json!({"transcription": "  "}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_llm_failure_during_generation_is_bad_gateway() {
        let app = app(ScriptedLlm::failing());
        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/question-sets/transcription",
                json!({"transcription": "Skills: Rust"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["message"], "An AI processing error occurred");
    }

    #[tokio::test]
    async fn test_unsupported_upload_yields_no_skills_set() {
        let app = app(ScriptedLlm::new().reply("Upload a PDF or DOCX resume."));
        let (status, body) = send(&app, multipart_upload(Some("resume.txt"), "Skills: Rust")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["questions"], json!([NO_SKILLS_MESSAGE]));
        assert_eq!(body["skills"], json!([]));
    }

    #[tokio::test]
    async fn test_upload_validation() {
        let app = app(ScriptedLlm::new());

        let (status, body) = send(&app, multipart_upload(None, "Skills: Rust")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "No selected file");

        let (status, body) = send(&app, multipart_upload(Some("resume.pdf"), "")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Uploaded file is empty");
    }

    #[tokio::test]
    async fn test_unreadable_pdf_is_bad_request() {
        let app = app(ScriptedLlm::new());
        let (status, body) = send(&app, multipart_upload(Some("resume.pdf"), "not a pdf")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "UNREADABLE_DOCUMENT");
    }

    #[tokio::test]
    async fn test_feedback_preview_falls_back_locally() {
        let app = app(ScriptedLlm::failing());
        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/feedback/preview",
                json!({
                    "user_answer": "Use a loop",
                    "expected_answer": "Recursion with memoization avoids recomputation"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["feedback"].as_str().unwrap().contains("recursion"));

        let (status, _) = send(
            &app,
            post_json(
                "/api/v1/feedback/preview",
                json!({"user_answer": "x", "expected_answer": ""}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
