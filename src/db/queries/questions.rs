use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    /// Decimal string of the owning category id, compared as text.
    pub category: String,
    pub difficulty: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: String,
    pub difficulty: i64,
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn count_questions(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM questions
        "#,
    )
    .fetch_one(pool)
    .await
}

pub async fn get_question_by_id(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category: &str,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question, answer, category, difficulty FROM questions
        WHERE questions.category = ?1
        ORDER BY id
        "#,
    )
    .bind(category)
    .fetch_all(pool)
    .await
}

/// Case-insensitive substring match on the question text. Case folding is
/// done here rather than with SQLite `LOWER`, which only folds ASCII.
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    let term = term.to_lowercase();
    let mut questions = get_all_questions(pool).await?;
    questions.retain(|q| q.question.to_lowercase().contains(&term));
    Ok(questions)
}

/// Questions not in `exclude`, limited to `category` when one is given.
/// `exclude` is bound as one JSON array, so its length is not capped by the
/// bind parameter limit.
pub async fn get_quiz_candidates(
    pool: &SqlitePool,
    category: Option<&str>,
    exclude: &[i64],
) -> sqlx::Result<Vec<Question>> {
    let mut query = QueryBuilder::<Sqlite>::new(
        "SELECT id, question, answer, category, difficulty FROM questions WHERE 1 = 1",
    );
    if let Some(category) = category {
        query.push(" AND category = ").push_bind(category.to_owned());
    }
    if !exclude.is_empty() {
        let ids = serde_json::to_string(exclude).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        query
            .push(" AND id NOT IN (SELECT value FROM json_each(")
            .push_bind(ids)
            .push("))");
    }
    query.push(" ORDER BY id");

    query.build_query_as::<Question>().fetch_all(pool).await
}

pub async fn create_question(pool: &SqlitePool, new_question: &NewQuestion) -> sqlx::Result<i64> {
    let mut conn = pool.acquire().await?;

    let id = sqlx::query(
        r#"
        INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&new_question.question)
    .bind(&new_question.answer)
    .bind(&new_question.category)
    .bind(new_question.difficulty)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Returns `false` when no question had that id.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let mut conn = pool.acquire().await?;

    let deleted = sqlx::query(
        r#"
        DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    Ok(deleted > 0)
}

pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> sqlx::Result<()> {
    let mut conn = pool.acquire().await?;
    for question in questions {
        sqlx::query(
            r#"
            INSERT INTO questions (id, question, answer, category, difficulty)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (id) DO UPDATE SET
                question = excluded.question,
                answer = excluded.answer,
                category = excluded.category,
                difficulty = excluded.difficulty
            "#,
        )
        .bind(question.id)
        .bind(&question.question)
        .bind(&question.answer)
        .bind(&question.category)
        .bind(question.difficulty)
        .execute(&mut *conn)
        .await?;
    }
    tracing::info!("Questions imported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn new_question(text: &str, category: &str) -> NewQuestion {
        NewQuestion {
            question: text.to_owned(),
            answer: "answer".to_owned(),
            category: category.to_owned(),
            difficulty: 1,
        }
    }

    #[tokio::test]
    async fn create_count_and_delete() {
        let pool = test_pool().await;
        assert_eq!(count_questions(&pool).await.unwrap(), 0);

        let id = create_question(&pool, &new_question("Who painted the Mona Lisa?", "2"))
            .await
            .unwrap();
        assert_eq!(count_questions(&pool).await.unwrap(), 1);

        let stored = get_question_by_id(&pool, id).await.unwrap().unwrap();
        assert_eq!(stored.question, "Who painted the Mona Lisa?");
        assert_eq!(stored.category, "2");

        assert!(delete_question(&pool, id).await.unwrap());
        assert!(!delete_question(&pool, id).await.unwrap());
        assert_eq!(get_question_by_id(&pool, id).await.unwrap(), None);
        assert_eq!(count_questions(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_and_literal() {
        let pool = test_pool().await;
        create_question(&pool, &new_question("Who won the Champions League?", "6"))
            .await
            .unwrap();
        create_question(&pool, &new_question("What is 50% of 10?", "1"))
            .await
            .unwrap();

        let found = search_questions(&pool, "champions league").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].category, "6");

        let percent = search_questions(&pool, "50%").await.unwrap();
        assert_eq!(percent.len(), 1);
        assert!(search_questions(&pool, "%").await.unwrap().len() == 1);
        assert!(search_questions(&pool, "_").await.unwrap().is_empty());
        assert!(search_questions(&pool, "zebra").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_folds_non_ascii_case() {
        let pool = test_pool().await;
        create_question(&pool, &new_question("Où se trouve l'ÉCOLE polytechnique?", "3"))
            .await
            .unwrap();

        let found = search_questions(&pool, "école").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(search_questions(&pool, "OÙ SE").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn category_filter_compares_text() {
        let pool = test_pool().await;
        create_question(&pool, &new_question("Q1", "1")).await.unwrap();
        create_question(&pool, &new_question("Q11", "11")).await.unwrap();

        let questions = get_questions_for_category(&pool, "1").await.unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "Q1");
    }

    #[tokio::test]
    async fn quiz_candidates_respect_category_and_exclusions() {
        let pool = test_pool().await;
        let a = create_question(&pool, &new_question("A", "1")).await.unwrap();
        let b = create_question(&pool, &new_question("B", "1")).await.unwrap();
        let c = create_question(&pool, &new_question("C", "3")).await.unwrap();

        let all = get_quiz_candidates(&pool, None, &[]).await.unwrap();
        assert_eq!(all.iter().map(|q| q.id).collect::<Vec<_>>(), vec![a, b, c]);

        let science = get_quiz_candidates(&pool, Some("1"), &[a]).await.unwrap();
        assert_eq!(science.iter().map(|q| q.id).collect::<Vec<_>>(), vec![b]);

        let rest = get_quiz_candidates(&pool, None, &[a, b, 999]).await.unwrap();
        assert_eq!(rest.iter().map(|q| q.id).collect::<Vec<_>>(), vec![c]);

        assert!(get_quiz_candidates(&pool, Some("3"), &[c])
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn quiz_candidates_accept_long_exclusion_lists() {
        let pool = test_pool().await;
        let a = create_question(&pool, &new_question("A", "1")).await.unwrap();
        let b = create_question(&pool, &new_question("B", "1")).await.unwrap();

        let mut exclude: Vec<i64> = (1000..40000).collect();
        exclude.push(a);
        let rest = get_quiz_candidates(&pool, None, &exclude).await.unwrap();
        assert_eq!(rest.iter().map(|q| q.id).collect::<Vec<_>>(), vec![b]);
    }

    #[tokio::test]
    async fn import_upserts_by_id() {
        let pool = test_pool().await;
        let question = Question {
            id: 42,
            question: "Where is the HQ of OpenAI?".to_owned(),
            answer: "San Francisco".to_owned(),
            category: "3".to_owned(),
            difficulty: 3,
        };
        import_questions(&pool, vec![question.clone()]).await.unwrap();
        import_questions(
            &pool,
            vec![Question {
                difficulty: 4,
                ..question.clone()
            }],
        )
        .await
        .unwrap();

        let stored = get_question_by_id(&pool, 42).await.unwrap().unwrap();
        assert_eq!(stored.difficulty, 4);
        assert_eq!(count_questions(&pool).await.unwrap(), 1);
    }
}
