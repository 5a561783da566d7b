pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::evaluation::handlers as evaluation;
use crate::jobs::handlers as jobs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Jobs
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_register_job),
        )
        .route("/api/v1/jobs/template", get(jobs::handle_job_template))
        .route(
            "/api/v1/jobs/by-name/:name",
            get(jobs::handle_get_job_by_name),
        )
        // Evaluation
        .route(
            "/api/v1/jobs/:id/resumes",
            post(evaluation::handle_upload_resumes),
        )
        .route("/api/v1/submit", post(evaluation::handle_submit))
        .route(
            "/api/v1/jobs/:id/analyses",
            get(evaluation::handle_get_analyses).delete(evaluation::handle_clear_analyses),
        )
        // Résumés
        .route("/api/v1/resumes/:id", get(evaluation::handle_get_resume))
        .route(
            "/api/v1/resumes/:id/file",
            get(evaluation::handle_download_resume),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::evaluation::locks::JobLocks;
    use crate::evaluation::uploads::UploadStore;
    use crate::evaluation::EvaluationPipeline;
    use crate::test_support::{memory_records, sample_pdf, FakeCompletion, FakeReply};

    const BOUNDARY: &str = "recruiter-test-boundary";

    struct TestApp {
        router: Router,
        _dir: tempfile::TempDir,
    }

    async fn test_app(replies: Vec<FakeReply>) -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            openai_api_key: "sk-test".to_string(),
            openai_base_url: "http://127.0.0.1:9/v1".to_string(),
            openai_model: "fake-model".to_string(),
            database_url: "sqlite::memory:".to_string(),
            upload_dir: dir.path().join("uploads"),
            completion_timeout: Duration::from_secs(5),
            max_upload_bytes: 1024 * 1024,
            port: 0,
            rust_log: "info".to_string(),
        };
        let records = memory_records().await;
        let uploads = UploadStore::new(PathBuf::from(&config.upload_dir));
        let locks = JobLocks::new();
        let pipeline = EvaluationPipeline::new(
            records.clone(),
            uploads.clone(),
            Arc::new(FakeCompletion::new(replies)),
            locks.clone(),
            config.completion_timeout,
        );
        let state = AppState {
            records,
            uploads,
            pipeline: Arc::new(pipeline),
            locks,
            config,
        };
        TestApp {
            router: build_router(state),
            _dir: dir,
        }
    }

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, Vec<u8>),
    }

    fn multipart_body(parts: Vec<Part>) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                            .as_bytes(),
                    );
                }
                Part::File(name, filename, data) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(&data);
                    body.extend_from_slice(b"\r\n");
                }
            }
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn send_json(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = send(router, request).await;
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_multipart(uri: &str, parts: Vec<Part>) -> Request<Body> {
        Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_ok() {
        let app = test_app(vec![]).await;
        let (status, body) = send_json(&app.router, get("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "recruiter");
    }

    #[tokio::test]
    async fn test_register_then_list_and_conflict() {
        let app = test_app(vec![]).await;

        let (status, job) = send_json(
            &app.router,
            post_json("/api/v1/jobs", json!({"name": "Backend", "description": "Rust"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(job["name"], "Backend");

        let (status, body) = send_json(
            &app.router,
            post_json("/api/v1/jobs", json!({"name": "Backend", "description": "again"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");

        let (_, jobs) = send_json(&app.router, get("/api/v1/jobs")).await;
        assert_eq!(jobs.as_array().unwrap().len(), 1);
        assert_eq!(jobs[0]["id"], job["id"]);

        let (status, found) = send_json(&app.router, get("/api/v1/jobs/by-name/Backend")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found["description"], "Rust");
    }

    #[tokio::test]
    async fn test_template_is_served() {
        let app = test_app(vec![]).await;
        let (status, body) = send_json(&app.router, get("/api/v1/jobs/template")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["text"].as_str().unwrap().contains("Differentials:"));
    }

    #[tokio::test]
    async fn test_submit_ranks_detail_download_and_clear() {
        let app = test_app(vec![
            FakeReply::text(r#"{"name":"Low","skills":["Go"],"score":40,"opinion":"Meh"}"#),
            FakeReply::text(r#"{"name":"High","skills":["Rust","SQL"],"score":90,"opinion":"Strong"}"#),
        ])
        .await;
        let pdf = sample_pdf(&[Some("Candidate")]);

        let (status, report) = send_json(
            &app.router,
            post_multipart(
                "/api/v1/submit",
                vec![
                    Part::Text("job_name", "Backend"),
                    Part::Text("job_description", "Rust services"),
                    Part::File("files", "low.pdf", pdf.clone()),
                    Part::File("files", "high.pdf", pdf.clone()),
                ],
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["attempted"], 2);
        assert_eq!(report["succeeded"].as_array().unwrap().len(), 2);
        let job_id = report["job_id"].as_str().unwrap().to_string();

        let (status, ranked) =
            send_json(&app.router, get(&format!("/api/v1/jobs/{job_id}/analyses"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ranked["job"]["name"], "Backend");
        let candidates = ranked["candidates"].as_array().unwrap();
        assert_eq!(candidates[0]["name"], "High");
        assert_eq!(candidates[0]["ranking"], 1);
        assert_eq!(candidates[0]["skills_display"], "Rust, SQL");
        assert_eq!(candidates[1]["name"], "Low");

        let resume_id = candidates[0]["resum_id"].as_str().unwrap().to_string();
        let (status, detail) =
            send_json(&app.router, get(&format!("/api/v1/resumes/{resume_id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["opinion"], "Strong");
        assert_eq!(detail["file_name"], "high.pdf");

        let response = app
            .router
            .clone()
            .oneshot(get(&format!("/api/v1/resumes/{resume_id}/file")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes.to_vec(), pdf);

        let (status, summary) = send_json(
            &app.router,
            Request::delete(format!("/api/v1/jobs/{job_id}/analyses"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["analyses_deleted"], 2);
        assert_eq!(summary["files_removed"], 2);

        let (_, ranked) =
            send_json(&app.router, get(&format!("/api/v1/jobs/{job_id}/analyses"))).await;
        assert!(ranked["candidates"].as_array().unwrap().is_empty());

        let (status, _) =
            send_json(&app.router, get(&format!("/api/v1/resumes/{resume_id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_submit_requires_all_fields() {
        let app = test_app(vec![]).await;
        let (status, body) = send_json(
            &app.router,
            post_multipart(
                "/api/v1/submit",
                vec![
                    Part::Text("job_name", "Backend"),
                    Part::Text("job_description", "  "),
                    Part::File("files", "cv.pdf", sample_pdf(&[Some("x")])),
                ],
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_non_pdf_upload_rejects_whole_request() {
        let app = test_app(vec![FakeReply::text(r#"{"name":"A","score":1}"#)]).await;
        let (_, job) = send_json(
            &app.router,
            post_json("/api/v1/jobs", json!({"name": "Backend", "description": "Rust"})),
        )
        .await;
        let job_id = job["id"].as_str().unwrap();

        let (status, _) = send_json(
            &app.router,
            post_multipart(
                &format!("/api/v1/jobs/{job_id}/resumes"),
                vec![
                    Part::File("files", "cv.pdf", sample_pdf(&[Some("x")])),
                    Part::File("files", "notes.txt", b"hello".to_vec()),
                ],
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, ranked) =
            send_json(&app.router, get(&format!("/api/v1/jobs/{job_id}/analyses"))).await;
        assert!(ranked["candidates"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let app = test_app(vec![]).await;
        let id = uuid::Uuid::new_v4();

        for uri in [
            format!("/api/v1/jobs/{id}/analyses"),
            format!("/api/v1/resumes/{id}"),
            format!("/api/v1/resumes/{id}/file"),
            "/api/v1/jobs/by-name/Nobody".to_string(),
        ] {
            let (status, body) = send_json(&app.router, get(&uri)).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["error"]["code"], "NOT_FOUND", "{uri}");
        }

        let (status, _) = send_json(
            &app.router,
            post_multipart(
                &format!("/api/v1/jobs/{id}/resumes"),
                vec![Part::File("files", "cv.pdf", sample_pdf(&[Some("x")]))],
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
