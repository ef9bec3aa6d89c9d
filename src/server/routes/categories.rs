use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::{get_all_categories, get_category, to_category_map, CategoryMap},
            questions::get_questions_for_category,
        },
        Question,
    },
    server::{
        app::AppState,
        errors::ApiError,
        extractors::{AppPath, PageQuery},
        pagination::paginate,
    },
};

use super::ApiResponse;

#[derive(Serialize)]
struct CategoriesBody {
    success: bool,
    categories: CategoryMap,
}

#[derive(Serialize)]
struct CategoryQuestionsBody {
    success: bool,
    questions: Vec<Question>,
    current_category: i64,
    total_questions: i64,
}

// an empty table is reported as 404, not as an empty map
async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<CategoriesBody> {
    let categories = get_all_categories(&pool).await?;
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(CategoriesBody {
        success: true,
        categories: to_category_map(categories),
    }))
}

async fn get_category_questions(
    State(pool): State<SqlitePool>,
    AppPath(id): AppPath<i64>,
    PageQuery(page): PageQuery,
) -> ApiResponse<CategoryQuestionsBody> {
    if get_category(&pool, id).await?.is_none() {
        return Err(ApiError::NotFound);
    }
    let selection = get_questions_for_category(&pool, &id.to_string()).await?;
    let total_questions = selection.len() as i64;

    Ok(Json(CategoryQuestionsBody {
        success: true,
        questions: paginate(page, selection),
        current_category: id,
        total_questions,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(get_category_questions))
        .with_state(state)
}
