//! Course model, child of a bootcamp.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Course record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Course {
    pub id: Uuid,

    /// Owning bootcamp.
    pub bootcamp_id: Uuid,

    pub title: String,
    pub description: String,

    /// Course duration in weeks.
    pub weeks: i32,

    /// Tuition cost.
    pub tuition: i64,

    /// Required skill level: beginner, intermediate, or advanced.
    pub minimum_skill: String,

    pub scholarship_available: bool,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a course.
#[derive(Debug, Deserialize)]
pub struct CreateCourse {
    pub title: String,
    pub description: String,
    pub weeks: i32,
    pub tuition: i64,
    pub minimum_skill: String,
    #[serde(default)]
    pub scholarship_available: bool,
}

/// Input for updating a course.
#[derive(Debug, Deserialize)]
pub struct UpdateCourse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub weeks: Option<i32>,
    pub tuition: Option<i64>,
    pub minimum_skill: Option<String>,
    pub scholarship_available: Option<bool>,
}

impl Course {
    /// Find a course by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>> {
        let course = sqlx::query_as::<_, Course>("SELECT * FROM course WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .context("failed to fetch course by id")?;

        Ok(course)
    }

    /// List courses for a bootcamp, newest first.
    pub async fn list_for_bootcamp(pool: &PgPool, bootcamp_id: Uuid) -> Result<Vec<Self>> {
        let courses = sqlx::query_as::<_, Course>(
            "SELECT * FROM course WHERE bootcamp_id = $1 ORDER BY created_at DESC",
        )
        .bind(bootcamp_id)
        .fetch_all(pool)
        .await
        .context("failed to list courses for bootcamp")?;

        Ok(courses)
    }

    /// Count courses belonging to a bootcamp.
    pub async fn count_for_bootcamp(pool: &PgPool, bootcamp_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM course WHERE bootcamp_id = $1")
            .bind(bootcamp_id)
            .fetch_one(pool)
            .await
            .context("failed to count courses for bootcamp")?;

        Ok(count)
    }

    /// Create a course and recompute the bootcamp's average cost.
    pub async fn create(pool: &PgPool, bootcamp_id: Uuid, input: CreateCourse) -> Result<Self> {
        let id = Uuid::now_v7();

        let mut tx = pool
            .begin()
            .await
            .context("failed to begin course transaction")?;

        let course = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO course (
                id, bootcamp_id, title, description, weeks, tuition,
                minimum_skill, scholarship_available
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(bootcamp_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.weeks)
        .bind(input.tuition)
        .bind(&input.minimum_skill)
        .bind(input.scholarship_available)
        .fetch_one(&mut *tx)
        .await
        .context("failed to create course")?;

        recompute_average_cost(&mut *tx, bootcamp_id).await?;

        tx.commit()
            .await
            .context("failed to commit course transaction")?;

        Ok(course)
    }

    /// Update a course, recomputing the average cost if tuition changed.
    pub async fn update(pool: &PgPool, id: Uuid, input: UpdateCourse) -> Result<Option<Self>> {
        // Build dynamic update query
        let mut query = String::from("UPDATE course SET ");
        let mut params: Vec<String> = Vec::new();
        let mut param_idx = 1;

        let mut push = |column: &str, params: &mut Vec<String>, param_idx: &mut usize| {
            params.push(format!("{column} = ${param_idx}"));
            *param_idx += 1;
        };

        if input.title.is_some() {
            push("title", &mut params, &mut param_idx);
        }
        if input.description.is_some() {
            push("description", &mut params, &mut param_idx);
        }
        if input.weeks.is_some() {
            push("weeks", &mut params, &mut param_idx);
        }
        if input.tuition.is_some() {
            push("tuition", &mut params, &mut param_idx);
        }
        if input.minimum_skill.is_some() {
            push("minimum_skill", &mut params, &mut param_idx);
        }
        if input.scholarship_available.is_some() {
            push("scholarship_available", &mut params, &mut param_idx);
        }

        if params.is_empty() {
            // Nothing to update, just return the course
            return Self::find_by_id(pool, id).await;
        }

        query.push_str(&params.join(", "));
        query.push_str(&format!(" WHERE id = ${param_idx} RETURNING *"));

        let tuition_changed = input.tuition.is_some();

        let mut tx = pool
            .begin()
            .await
            .context("failed to begin course transaction")?;

        let mut query_builder = sqlx::query_as::<_, Course>(&query);

        if let Some(ref title) = input.title {
            query_builder = query_builder.bind(title);
        }
        if let Some(ref description) = input.description {
            query_builder = query_builder.bind(description);
        }
        if let Some(weeks) = input.weeks {
            query_builder = query_builder.bind(weeks);
        }
        if let Some(tuition) = input.tuition {
            query_builder = query_builder.bind(tuition);
        }
        if let Some(ref minimum_skill) = input.minimum_skill {
            query_builder = query_builder.bind(minimum_skill);
        }
        if let Some(scholarship_available) = input.scholarship_available {
            query_builder = query_builder.bind(scholarship_available);
        }
        query_builder = query_builder.bind(id);

        let course = query_builder
            .fetch_optional(&mut *tx)
            .await
            .context("failed to update course")?;

        if let Some(ref course) = course {
            if tuition_changed {
                recompute_average_cost(&mut *tx, course.bootcamp_id).await?;
            }
        }

        tx.commit()
            .await
            .context("failed to commit course transaction")?;

        Ok(course)
    }

    /// Delete a course and recompute the bootcamp's average cost.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let mut tx = pool
            .begin()
            .await
            .context("failed to begin course transaction")?;

        let bootcamp_id: Option<Uuid> =
            sqlx::query_scalar("DELETE FROM course WHERE id = $1 RETURNING bootcamp_id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .context("failed to delete course")?;

        let Some(bootcamp_id) = bootcamp_id else {
            return Ok(false);
        };

        recompute_average_cost(&mut *tx, bootcamp_id).await?;

        tx.commit()
            .await
            .context("failed to commit course transaction")?;

        Ok(true)
    }
}

/// Recompute a bootcamp's average cost from its courses' tuition.
///
/// NULL when the bootcamp has no courses left.
async fn recompute_average_cost<'e, E>(executor: E, bootcamp_id: Uuid) -> Result<()>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        r#"
        UPDATE bootcamp
        SET average_cost = (
            SELECT ROUND(AVG(tuition))::bigint FROM course WHERE bootcamp_id = $1
        )
        WHERE id = $1
        "#,
    )
    .bind(bootcamp_id)
    .execute(executor)
    .await
    .context("failed to recompute bootcamp average cost")?;

    Ok(())
}
