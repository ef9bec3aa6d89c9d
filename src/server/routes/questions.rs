use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{get_all_categories, get_category, to_category_map, CategoryMap},
            questions::{self, count_questions, get_all_questions, get_question_by_id},
        },
        NewQuestion, Question,
    },
    server::{
        app::AppState,
        deserializers::deserialize_i64_from_number_or_string,
        errors::ApiError,
        extractors::{AppPath, JsonObject, PageQuery},
        pagination::paginate,
    },
};

use super::ApiResponse;

const NEW_QUESTION_KEYS: [&str; 4] = ["question", "answer", "category", "difficulty"];

#[derive(Deserialize)]
struct NewQuestionBody {
    question: String,
    answer: String,
    #[serde(deserialize_with = "deserialize_i64_from_number_or_string")]
    category: i64,
    #[serde(deserialize_with = "deserialize_i64_from_number_or_string")]
    difficulty: i64,
}

#[derive(Serialize)]
struct QuestionsBody {
    success: bool,
    questions: Vec<Question>,
    total_questions: i64,
    current_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    categories: Option<CategoryMap>,
}

#[derive(Serialize)]
struct CreatedBody {
    success: bool,
    created: i64,
    total_questions: i64,
}

#[derive(Serialize)]
struct DeletedBody {
    success: bool,
    deleted: i64,
    total_questions: i64,
}

async fn get_questions(
    State(pool): State<SqlitePool>,
    PageQuery(page): PageQuery,
) -> ApiResponse<QuestionsBody> {
    let questions = get_all_questions(&pool).await?;
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }
    let total_questions = questions.len() as i64;
    let categories = to_category_map(get_all_categories(&pool).await?);

    Ok(Json(QuestionsBody {
        success: true,
        questions: paginate(page, questions),
        total_questions,
        current_category: None,
        categories: Some(categories),
    }))
}

async fn get_question(
    State(pool): State<SqlitePool>,
    AppPath(id): AppPath<i64>,
) -> ApiResponse<QuestionsBody> {
    let question = get_question_by_id(&pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let total_questions = count_questions(&pool).await?;
    let categories = to_category_map(get_all_categories(&pool).await?);

    Ok(Json(QuestionsBody {
        success: true,
        current_category: Some(question.category.clone()),
        questions: vec![question],
        total_questions,
        categories: Some(categories),
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    AppPath(id): AppPath<i64>,
) -> ApiResponse<DeletedBody> {
    if !questions::delete_question(&pool, id).await? {
        return Err(ApiError::NotFound);
    }
    tracing::info!(question_id = id, "Question deleted");

    Ok(Json(DeletedBody {
        success: true,
        deleted: id,
        total_questions: count_questions(&pool).await?,
    }))
}

async fn create_question(
    State(pool): State<SqlitePool>,
    body: JsonObject,
) -> ApiResponse<CreatedBody> {
    body.require(&NEW_QUESTION_KEYS)?;
    let body: NewQuestionBody = serde_json::from_value(body.into_value())
        .map_err(|e| ApiError::Unprocessable(e.to_string()))?;

    if get_category(&pool, body.category).await?.is_none() {
        return Err(ApiError::Unprocessable(format!(
            "category {} does not exist",
            body.category
        )));
    }

    let new_question = NewQuestion {
        question: body.question,
        answer: body.answer,
        category: body.category.to_string(),
        difficulty: body.difficulty,
    };
    let created = questions::create_question(&pool, &new_question)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert question: {:?}", e);
            ApiError::Unprocessable("question could not be stored".to_owned())
        })?;
    tracing::info!(question_id = created, "Question created");

    Ok(Json(CreatedBody {
        success: true,
        created,
        total_questions: count_questions(&pool).await?,
    }))
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    PageQuery(page): PageQuery,
    body: JsonObject,
) -> ApiResponse<QuestionsBody> {
    body.require(&["searchTerm"])?;
    let term = match &body.0["searchTerm"] {
        Value::String(term) => term.as_str(),
        other => {
            return Err(ApiError::BadRequest(format!(
                "searchTerm must be a string, got {other}"
            )))
        }
    };

    let selection = questions::search_questions(&pool, term).await?;
    let total_questions = selection.len() as i64;

    Ok(Json(QuestionsBody {
        success: true,
        questions: paginate(page, selection),
        total_questions,
        current_category: None,
        categories: None,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(get_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/{id}", get(get_question).delete(delete_question))
        .with_state(state)
}
