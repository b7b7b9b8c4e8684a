//! Course route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Bootcamp, Course, CreateCourse, UpdateCourse};
use crate::query::{ListPipeline, RawQuery};
use crate::state::AppState;

use super::{CollectionResponse, DataResponse, ListResponse};

/// Skill levels accepted for courses.
const SKILL_LEVELS: &[&str] = &["beginner", "intermediate", "advanced"];

/// Create the course router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/courses", get(list_courses))
        .route(
            "/api/v1/courses/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route(
            "/api/v1/bootcamps/{id}/courses",
            get(list_bootcamp_courses).post(create_course),
        )
}

fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}

fn validate_skill(minimum_skill: &str) -> AppResult<()> {
    if SKILL_LEVELS.contains(&minimum_skill) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "minimum_skill must be one of: {}",
            SKILL_LEVELS.join(", ")
        )))
    }
}

/// List all courses through the query pipeline.
///
/// GET /api/v1/courses?tuition[lte]=10000&sort=tuition
async fn list_courses(
    State(state): State<AppState>,
    Query(raw): Query<RawQuery>,
) -> AppResult<Json<ListResponse<serde_json::Value>>> {
    let page = ListPipeline::new(state.db().clone(), "course")
        .list(&raw)
        .await?;

    Ok(Json(ListResponse {
        success: true,
        count: page.count,
        pagination: page.pagination,
        data: page.items,
    }))
}

/// List courses belonging to one bootcamp.
///
/// GET /api/v1/bootcamps/{id}/courses
async fn list_bootcamp_courses(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<CollectionResponse<Course>>> {
    let id = parse_id(&id)?;

    let bootcamp = Bootcamp::find_by_id(state.db(), id)
        .await?
        .ok_or(AppError::NotFound)?;

    let courses = Course::list_for_bootcamp(state.db(), bootcamp.id).await?;

    Ok(Json(CollectionResponse::new(courses)))
}

/// Fetch a single course.
///
/// GET /api/v1/courses/{id}
async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Course>>> {
    let id = parse_id(&id)?;

    let course = Course::find_by_id(state.db(), id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(DataResponse::new(course)))
}

/// Create a course under a bootcamp.
///
/// POST /api/v1/bootcamps/{id}/courses
async fn create_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CreateCourse>,
) -> AppResult<(StatusCode, Json<DataResponse<Course>>)> {
    let id = parse_id(&id)?;

    if input.title.trim().is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }
    validate_skill(&input.minimum_skill)?;

    let bootcamp = Bootcamp::find_by_id(state.db(), id)
        .await?
        .ok_or(AppError::NotFound)?;

    let course = Course::create(state.db(), bootcamp.id, input).await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(course))))
}

/// Update a course.
///
/// PUT /api/v1/courses/{id}
async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateCourse>,
) -> AppResult<Json<DataResponse<Course>>> {
    let id = parse_id(&id)?;

    if let Some(ref minimum_skill) = input.minimum_skill {
        validate_skill(minimum_skill)?;
    }

    let course = Course::update(state.db(), id, input)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(DataResponse::new(course)))
}

/// Delete a course.
///
/// DELETE /api/v1/courses/{id}
async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let id = parse_id(&id)?;

    let deleted = Course::delete(state.db(), id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }

    Ok(Json(DataResponse::new(serde_json::json!({}))))
}
