use axum::{extract::State, routing::post, Json, Router};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_category, questions::get_quiz_candidates},
        Question,
    },
    server::{
        app::AppState,
        deserializers::{deserialize_i64_from_number_or_string, deserialize_label},
        errors::ApiError,
        extractors::JsonObject,
        quiz::{pick_next, QuizScope, ALL_CATEGORIES},
    },
    telemetry::QUIZ_QUESTIONS_SERVED,
};

use super::ApiResponse;

#[derive(Deserialize)]
struct QuizCategory {
    #[serde(deserialize_with = "deserialize_i64_from_number_or_string")]
    id: i64,
    #[serde(rename = "type", deserialize_with = "deserialize_label")]
    label: String,
}

#[derive(Serialize)]
struct QuizBody {
    success: bool,
    message: String,
    question: Option<Question>,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_questions: Option<Vec<i64>>,
}

fn parse<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::BadRequest(format!("{what}: {e}")))
}

async fn play_quiz(State(pool): State<SqlitePool>, body: JsonObject) -> ApiResponse<QuizBody> {
    body.require(&["previous_questions", "quiz_category"])?;
    let JsonObject(mut body) = body;

    let quiz_category = match body.remove("quiz_category") {
        Some(Value::Object(category)) => category,
        _ => return Err(ApiError::BadRequest("quiz_category must be an object".to_owned())),
    };
    if !quiz_category.contains_key("id") || !quiz_category.contains_key("type") {
        return Err(ApiError::BadRequest(
            "quiz_category needs both `id` and `type`".to_owned(),
        ));
    }
    let quiz_category: QuizCategory = parse(Value::Object(quiz_category), "quiz_category")?;
    let mut previous_questions: Vec<i64> = parse(
        body.remove("previous_questions").unwrap_or_default(),
        "previous_questions",
    )?;

    if quiz_category.id != ALL_CATEGORIES && get_category(&pool, quiz_category.id).await?.is_none()
    {
        return Err(ApiError::NotFound);
    }
    let scope = QuizScope::new(quiz_category.id, &quiz_category.label);

    let candidates =
        get_quiz_candidates(&pool, scope.category_filter().as_deref(), &previous_questions)
            .await?;
    let Some(question) = pick_next(candidates, &mut previous_questions, &mut rand::thread_rng())
    else {
        return Ok(Json(QuizBody {
            success: true,
            message: scope.exhausted_message(),
            question: None,
            previous_questions: None,
        }));
    };

    let category_label = quiz_category.id.to_string();
    QUIZ_QUESTIONS_SERVED
        .with_label_values(&[category_label.as_str()])
        .inc();
    tracing::debug!(
        question_id = question.id,
        category = quiz_category.id,
        "Quiz question served"
    );

    Ok(Json(QuizBody {
        success: true,
        message: scope.served_message(),
        question: Some(question),
        previous_questions: Some(previous_questions),
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(play_quiz))
        .with_state(state)
}
