#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use trivia_api::config::DatabaseSettings;
use trivia_api::db::queries::{categories, questions};
use trivia_api::db::{establish_connection, run_migrations, NewQuestion};
use trivia_api::server::app::{build_router, AppState};

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    /// Empty database with the schema applied.
    pub async fn empty() -> Self {
        let settings = DatabaseSettings {
            url: "sqlite::memory:".to_owned().into(),
            max_connections: 1,
        };
        let pool = establish_connection(&settings).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let router = build_router(AppState::new(pool.clone()), "/api");
        Self { router, pool }
    }

    /// Categories 1..=6 and four questions spread over categories 1, 3 and 6.
    pub async fn seeded() -> Self {
        let app = Self::empty().await;
        for label in ["Science", "Art", "Geography", "History", "Entertainment", "Sports"] {
            app.add_category(label).await;
        }
        app.add_question("Who invented Python?", "Guido van Rossum", "1", 4)
            .await;
        app.add_question("Where is the HQ of OpenAI?", "San Francisco", "3", 3)
            .await;
        app.add_question("What is the capital of France?", "Paris", "3", 1)
            .await;
        app.add_question("Who won the 2025 champions league?", "PSG", "6", 1)
            .await;
        app
    }

    pub async fn add_category(&self, label: &str) -> i64 {
        categories::create_category(&self.pool, label).await.unwrap()
    }

    pub async fn add_question(
        &self,
        question: &str,
        answer: &str,
        category: &str,
        difficulty: i64,
    ) -> i64 {
        questions::create_question(
            &self.pool,
            &NewQuestion {
                question: question.to_owned(),
                answer: answer.to_owned(),
                category: category.to_owned(),
                difficulty,
            },
        )
        .await
        .unwrap()
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl TestResponse {
    pub fn assert_error(&self, status: StatusCode, message: &str) {
        assert_eq!(self.status, status);
        assert_eq!(self.body["success"], false);
        assert_eq!(self.body["error"], status.as_u16());
        assert_eq!(self.body["message"], message);
    }
}
