//! Bootcamp route handlers.
//!
//! The list endpoint runs the generic list-query pipeline; the rest
//! are single-record operations against the bootcamp model.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::file::UploadError;
use crate::models::{Bootcamp, CreateBootcamp, UpdateBootcamp};
use crate::query::{ListPipeline, RawQuery};
use crate::state::AppState;

use super::{CollectionResponse, DataResponse, ListResponse};

/// Create the bootcamp router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/bootcamps",
            get(list_bootcamps).post(create_bootcamp),
        )
        .route(
            "/api/v1/bootcamps/{id}",
            get(get_bootcamp)
                .put(update_bootcamp)
                .delete(delete_bootcamp),
        )
        .route(
            "/api/v1/bootcamps/radius/{zipcode}/{distance}",
            get(bootcamps_in_radius),
        )
        .route("/api/v1/bootcamps/{id}/photo", post(upload_photo))
}

/// Parse a path segment as an entity ID.
///
/// A malformed ID can never name an existing record, so it maps to
/// 404 rather than 400.
fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}

/// List bootcamps through the query pipeline.
///
/// GET /api/v1/bootcamps?housing=true&average_cost[lte]=10000&select=name&sort=-created_at&page=2
async fn list_bootcamps(
    State(state): State<AppState>,
    Query(raw): Query<RawQuery>,
) -> AppResult<Json<ListResponse<serde_json::Value>>> {
    let page = ListPipeline::new(state.db().clone(), "bootcamp")
        .list(&raw)
        .await?;

    Ok(Json(ListResponse {
        success: true,
        count: page.count,
        pagination: page.pagination,
        data: page.items,
    }))
}

/// Fetch a single bootcamp.
///
/// GET /api/v1/bootcamps/{id}
async fn get_bootcamp(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Bootcamp>>> {
    let id = parse_id(&id)?;

    let bootcamp = Bootcamp::find_by_id(state.db(), id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(DataResponse::new(bootcamp)))
}

/// Create a bootcamp, geocoding its address when present.
///
/// POST /api/v1/bootcamps
async fn create_bootcamp(
    State(state): State<AppState>,
    Json(input): Json<CreateBootcamp>,
) -> AppResult<(StatusCode, Json<DataResponse<Bootcamp>>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    if input.description.trim().is_empty() {
        return Err(AppError::Validation("description is required".to_string()));
    }

    let location = match input.address.as_deref() {
        Some(address) if !address.trim().is_empty() => {
            state.geocoder().geocode(address).await?
        }
        _ => None,
    };

    let bootcamp = Bootcamp::create(state.db(), input, location).await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(bootcamp))))
}

/// Update a bootcamp.
///
/// PUT /api/v1/bootcamps/{id}
async fn update_bootcamp(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateBootcamp>,
) -> AppResult<Json<DataResponse<Bootcamp>>> {
    let id = parse_id(&id)?;

    let bootcamp = Bootcamp::update(state.db(), id, input)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(DataResponse::new(bootcamp)))
}

/// Delete a bootcamp; its courses go with it.
///
/// DELETE /api/v1/bootcamps/{id}
async fn delete_bootcamp(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let id = parse_id(&id)?;

    let deleted = Bootcamp::delete(state.db(), id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }

    Ok(Json(DataResponse::new(serde_json::json!({}))))
}

/// Find bootcamps within a radius of a zipcode.
///
/// GET /api/v1/bootcamps/radius/{zipcode}/{distance}
///
/// Distance is in miles.
async fn bootcamps_in_radius(
    State(state): State<AppState>,
    Path((zipcode, distance)): Path<(String, f64)>,
) -> AppResult<Json<CollectionResponse<Bootcamp>>> {
    if !distance.is_finite() || distance <= 0.0 {
        return Err(AppError::Validation(
            "distance must be a positive number of miles".to_string(),
        ));
    }

    let location = state
        .geocoder()
        .geocode(&zipcode)
        .await?
        .ok_or_else(|| AppError::Validation(format!("could not geocode zipcode '{zipcode}'")))?;

    let (Some(latitude), Some(longitude)) = (location.latitude, location.longitude) else {
        return Err(AppError::Validation(format!(
            "could not geocode zipcode '{zipcode}'"
        )));
    };

    let bootcamps = Bootcamp::find_within_radius(state.db(), latitude, longitude, distance).await?;

    Ok(Json(CollectionResponse::new(bootcamps)))
}

/// Upload a bootcamp photo.
///
/// POST /api/v1/bootcamps/{id}/photo (multipart, field "file")
///
/// Validation runs before any storage write or database update.
async fn upload_photo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<String>>> {
    let id = parse_id(&id)?;

    let bootcamp = Bootcamp::find_by_id(state.db(), id)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut data = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart upload: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
            data = Some(bytes);
            break;
        }
    }

    let Some(data) = data else {
        return Err(AppError::Validation(
            "multipart field 'file' is required".to_string(),
        ));
    };

    let photo = match state.files().store_photo(bootcamp.id, &data).await {
        Ok(photo) => photo,
        Err(e @ (UploadError::TooLarge { .. } | UploadError::NotAnImage)) => {
            return Err(AppError::Validation(e.to_string()));
        }
        Err(UploadError::Storage(e)) => return Err(AppError::Internal(e)),
    };

    // A replaced photo with a different extension leaves its old file
    // behind; remove it once the new one is stored.
    if let Some(old) = bootcamp.photo.as_deref() {
        if old != photo.filename {
            if let Err(e) = state.files().remove(old).await {
                tracing::warn!(filename = %old, error = %e, "failed to remove replaced photo");
            }
        }
    }

    Bootcamp::update_photo(state.db(), bootcamp.id, &photo.filename).await?;

    Ok(Json(DataResponse::new(photo.filename)))
}
