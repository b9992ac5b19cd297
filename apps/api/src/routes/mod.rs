pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::review::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/augment", post(handlers::handle_augment))
        .route("/grader", post(handlers::handle_grader))
        .route("/comparison", post(handlers::handle_comparison))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::extraction::{docx, pdf};
    use crate::llm_client::{LlmError, TextGenerator};

    const BOUNDARY: &str = "resume-coach-test-boundary";

    enum StubReply {
        Text(String),
        Fail,
    }

    /// Canned LLM that counts how often it is called.
    struct StubGenerator {
        reply: StubReply,
        calls: AtomicUsize,
    }

    impl StubGenerator {
        fn replying(value: Value) -> Arc<Self> {
            Self::replying_text(&value.to_string())
        }

        fn replying_text(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: StubReply::Text(text.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: StubReply::Fail,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        fn model(&self) -> &str {
            "stub-model"
        }

        async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                StubReply::Text(text) => Ok(text.clone()),
                StubReply::Fail => Err(LlmError::Api {
                    status: 429,
                    message: "Quota exceeded".to_string(),
                }),
            }
        }
    }

    fn app(stub: &Arc<StubGenerator>) -> Router {
        build_router(AppState {
            llm: stub.clone(),
            config: Config::for_tests(),
        })
    }

    enum FormPart<'a> {
        File(&'a str, &'a [u8]),
        Text(&'a str, &'a str),
    }

    fn multipart_request(uri: &str, parts: &[FormPart<'_>]) -> Request<Body> {
        let mut body: Vec<u8> = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                FormPart::File(filename, content) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(content);
                }
                FormPart::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn grade_reply() -> Value {
        json!({
            "grade": "B",
            "score": 82,
            "keywords": ["Rust", "Tokio", "Kubernetes", "PostgreSQL", "gRPC"],
            "section_formatting": {"status": "ok", "note": "Standard headings."},
            "highlights": ["Strong systems work.", "Clear structure."],
            "suggestions": ["Add metrics to the migration bullet."]
        })
    }

    #[tokio::test]
    async fn augment_returns_three_distinct_alternatives() {
        let stub = StubGenerator::replying(json!({
            "options": [
                "Coordinated 40+ weekly tasks across a 6-person team, cutting delays 25%",
                "Led task planning for 6 engineers, shipping 3 releases ahead of schedule",
                "Streamlined team task tracking, raising on-time delivery to 95%"
            ]
        }));

        let response = app(&stub)
            .oneshot(json_request(
                "/augment",
                json!({"bullet_point": "Managed team tasks."}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let alternatives = body["alternatives"].as_array().unwrap();
        assert_eq!(alternatives.len(), 3);
        assert!(alternatives.iter().all(|a| !a.as_str().unwrap().is_empty()));
        assert_ne!(alternatives[0], alternatives[1]);
        assert_ne!(alternatives[1], alternatives[2]);
        assert_ne!(alternatives[0], alternatives[2]);
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn augment_rejects_blank_bullet_without_calling_llm() {
        let stub = StubGenerator::replying(json!({}));
        let response = app(&stub)
            .oneshot(json_request("/augment", json!({"bullet_point": "   "})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn augment_missing_field_is_validation_error() {
        let stub = StubGenerator::replying(json!({}));
        let response = app(&stub)
            .oneshot(json_request("/augment", json!({"text": "Managed team tasks."})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn augment_non_json_body_is_validation_error() {
        let stub = StubGenerator::replying(json!({}));
        let request = Request::builder()
            .method("POST")
            .uri("/augment")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("Managed team tasks."))
            .unwrap();

        let response = app(&stub).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn augment_malformed_json_is_validation_error() {
        let stub = StubGenerator::replying(json!({}));
        let request = Request::builder()
            .method("POST")
            .uri("/augment")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"bullet_point\": "))
            .unwrap();

        let response = app(&stub).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn augment_unusable_reply_falls_back_to_raw_text() {
        let stub = StubGenerator::replying_text("Sorry, I can only suggest one option.");
        let response = app(&stub)
            .oneshot(json_request(
                "/augment",
                json!({"bullet_point": "Managed team tasks."}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"raw_response": "Sorry, I can only suggest one option."})
        );
    }

    #[tokio::test]
    async fn grader_pdf_returns_structured_report() {
        let stub = StubGenerator::replying(grade_reply());
        let pdf_bytes = pdf::tests::make_test_pdf("Jane Doe Senior Rust Engineer");

        let response = app(&stub)
            .oneshot(multipart_request(
                "/grader",
                &[FormPart::File("resume.pdf", &pdf_bytes)],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["grade"], "B");
        assert!(body["score"].is_number());
        assert!(body["highlights"].is_array());
        assert!(body["suggestions"].is_array());
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn grader_docx_upload_is_extracted() {
        let stub = StubGenerator::replying(grade_reply());
        let docx_bytes = docx::tests::make_test_docx(&["Jane Doe", "Experience", "Built things"]);

        let response = app(&stub)
            .oneshot(multipart_request(
                "/grader",
                &[FormPart::File("resume.docx", &docx_bytes)],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["score"], 82);
    }

    #[tokio::test]
    async fn grader_unsupported_extension_never_calls_llm() {
        let stub = StubGenerator::replying(grade_reply());
        let response = app(&stub)
            .oneshot(multipart_request(
                "/grader",
                &[FormPart::File("headshot.png", b"\x89PNG\r\n\x1a\n")],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(body_json(response).await["error"]["code"], "UNSUPPORTED_FORMAT");
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn grader_malformed_pdf_is_client_error() {
        let stub = StubGenerator::replying(grade_reply());
        let response = app(&stub)
            .oneshot(multipart_request(
                "/grader",
                &[FormPart::File("resume.pdf", b"%PDF-1.4 truncated")],
            ))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn grader_empty_text_file_is_unprocessable() {
        let stub = StubGenerator::replying(grade_reply());
        let response = app(&stub)
            .oneshot(multipart_request(
                "/grader",
                &[FormPart::File("resume.txt", b"   \n  ")],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn grader_missing_file_is_validation_error() {
        let stub = StubGenerator::replying(grade_reply());
        let response = app(&stub)
            .oneshot(multipart_request(
                "/grader",
                &[FormPart::Text("note", "no file here")],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn grader_without_multipart_body_is_validation_error() {
        let stub = StubGenerator::replying(grade_reply());
        let response = app(&stub)
            .oneshot(json_request("/grader", json!({"file": "resume.txt"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn grader_upstream_failure_is_5xx_json() {
        let stub = StubGenerator::failing();
        let response = app(&stub)
            .oneshot(multipart_request(
                "/grader",
                &[FormPart::File("resume.txt", b"Rust engineer")],
            ))
            .await
            .unwrap();

        assert!(response.status().is_server_error());
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn grader_upload_over_limit_is_rejected() {
        let stub = StubGenerator::replying(grade_reply());
        let mut config = Config::for_tests();
        config.max_upload_bytes = 1024;
        let app = build_router(AppState {
            llm: stub.clone(),
            config,
        });

        let big = vec![b'a'; 8 * 1024];
        let response = app
            .oneshot(multipart_request("/grader", &[FormPart::File("resume.txt", &big)]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn comparison_returns_alignment_report() {
        let stub = StubGenerator::replying(json!({
            "alignment_score": 71,
            "grade": "B",
            "keyword_gaps": [],
            "skill_gaps": "No Go experience listed.",
            "recommendations": ["Highlight the gRPC service work."]
        }));

        let response = app(&stub)
            .oneshot(multipart_request(
                "/comparison",
                &[
                    FormPart::File("resume.txt", b"Rust engineer, built gRPC services"),
                    FormPart::Text("job_application_text", "Backend engineer, Go and gRPC"),
                ],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["alignment_score"], 71);
        assert_eq!(body["keyword_gaps"], json!([]));
        assert!(body["recommendations"].is_array());
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn comparison_requires_job_text() {
        let stub = StubGenerator::replying(json!({}));
        let response = app(&stub)
            .oneshot(multipart_request(
                "/comparison",
                &[FormPart::File("resume.txt", b"Rust engineer")],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn comparison_unsupported_extension_never_calls_llm() {
        let stub = StubGenerator::replying(json!({}));
        let response = app(&stub)
            .oneshot(multipart_request(
                "/comparison",
                &[
                    FormPart::File("resume.rtf", b"{\\rtf1 hello}"),
                    FormPart::Text("job_application_text", "Rust developer"),
                ],
            ))
            .await
            .unwrap();

        assert!(response.status().is_client_error());
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn health_reports_model() {
        let stub = StubGenerator::replying(json!({}));
        let response = app(&stub)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model"], "stub-model");
    }
}
