//! Bootcamp model and CRUD operations.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::services::geocoder::GeoLocation;

/// Earth radius in miles, for radius search.
const EARTH_RADIUS_MILES: f64 = 3963.0;

/// Bootcamp record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bootcamp {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub formatted_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub careers: Vec<String>,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
    /// Mean tuition of this bootcamp's courses; recomputed on course
    /// create/update/delete. NULL when no courses exist.
    pub average_cost: Option<i64>,
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a bootcamp.
#[derive(Debug, Deserialize)]
pub struct CreateBootcamp {
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub careers: Vec<String>,
    #[serde(default)]
    pub housing: bool,
    #[serde(default)]
    pub job_assistance: bool,
    #[serde(default)]
    pub job_guarantee: bool,
    #[serde(default)]
    pub accept_gi: bool,
}

/// Input for updating a bootcamp.
#[derive(Debug, Deserialize)]
pub struct UpdateBootcamp {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub careers: Option<Vec<String>>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    pub accept_gi: Option<bool>,
}

impl Bootcamp {
    /// Find a bootcamp by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>> {
        let bootcamp = sqlx::query_as::<_, Bootcamp>("SELECT * FROM bootcamp WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .context("failed to fetch bootcamp by id")?;

        Ok(bootcamp)
    }

    /// Create a new bootcamp with an optional resolved location.
    pub async fn create(
        pool: &PgPool,
        input: CreateBootcamp,
        location: Option<GeoLocation>,
    ) -> Result<Self> {
        let id = Uuid::now_v7();
        let location = location.unwrap_or_default();

        let bootcamp = sqlx::query_as::<_, Bootcamp>(
            r#"
            INSERT INTO bootcamp (
                id, name, description, website, phone, email, address,
                latitude, longitude, formatted_address, city, state, zipcode,
                careers, housing, job_assistance, job_guarantee, accept_gi
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.website)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(&location.formatted_address)
        .bind(&location.city)
        .bind(&location.state)
        .bind(&location.zipcode)
        .bind(&input.careers)
        .bind(input.housing)
        .bind(input.job_assistance)
        .bind(input.job_guarantee)
        .bind(input.accept_gi)
        .fetch_one(pool)
        .await
        .context("failed to create bootcamp")?;

        Ok(bootcamp)
    }

    /// Update a bootcamp.
    pub async fn update(pool: &PgPool, id: Uuid, input: UpdateBootcamp) -> Result<Option<Self>> {
        // Build dynamic update query
        let mut query = String::from("UPDATE bootcamp SET ");
        let mut params: Vec<String> = Vec::new();
        let mut param_idx = 1;

        let mut push = |column: &str, params: &mut Vec<String>, param_idx: &mut usize| {
            params.push(format!("{column} = ${param_idx}"));
            *param_idx += 1;
        };

        if input.name.is_some() {
            push("name", &mut params, &mut param_idx);
        }
        if input.description.is_some() {
            push("description", &mut params, &mut param_idx);
        }
        if input.website.is_some() {
            push("website", &mut params, &mut param_idx);
        }
        if input.phone.is_some() {
            push("phone", &mut params, &mut param_idx);
        }
        if input.email.is_some() {
            push("email", &mut params, &mut param_idx);
        }
        if input.address.is_some() {
            push("address", &mut params, &mut param_idx);
        }
        if input.careers.is_some() {
            push("careers", &mut params, &mut param_idx);
        }
        if input.housing.is_some() {
            push("housing", &mut params, &mut param_idx);
        }
        if input.job_assistance.is_some() {
            push("job_assistance", &mut params, &mut param_idx);
        }
        if input.job_guarantee.is_some() {
            push("job_guarantee", &mut params, &mut param_idx);
        }
        if input.accept_gi.is_some() {
            push("accept_gi", &mut params, &mut param_idx);
        }

        if params.is_empty() {
            // Nothing to update, just return the bootcamp
            return Self::find_by_id(pool, id).await;
        }

        query.push_str(&params.join(", "));
        query.push_str(&format!(" WHERE id = ${param_idx} RETURNING *"));

        let mut query_builder = sqlx::query_as::<_, Bootcamp>(&query);

        if let Some(ref name) = input.name {
            query_builder = query_builder.bind(name);
        }
        if let Some(ref description) = input.description {
            query_builder = query_builder.bind(description);
        }
        if let Some(ref website) = input.website {
            query_builder = query_builder.bind(website);
        }
        if let Some(ref phone) = input.phone {
            query_builder = query_builder.bind(phone);
        }
        if let Some(ref email) = input.email {
            query_builder = query_builder.bind(email);
        }
        if let Some(ref address) = input.address {
            query_builder = query_builder.bind(address);
        }
        if let Some(ref careers) = input.careers {
            query_builder = query_builder.bind(careers);
        }
        if let Some(housing) = input.housing {
            query_builder = query_builder.bind(housing);
        }
        if let Some(job_assistance) = input.job_assistance {
            query_builder = query_builder.bind(job_assistance);
        }
        if let Some(job_guarantee) = input.job_guarantee {
            query_builder = query_builder.bind(job_guarantee);
        }
        if let Some(accept_gi) = input.accept_gi {
            query_builder = query_builder.bind(accept_gi);
        }
        query_builder = query_builder.bind(id);

        let bootcamp = query_builder
            .fetch_optional(pool)
            .await
            .context("failed to update bootcamp")?;

        Ok(bootcamp)
    }

    /// Delete a bootcamp and its courses.
    ///
    /// The course delete and the bootcamp delete run in one
    /// transaction so a partial cascade can never be observed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let mut tx = pool
            .begin()
            .await
            .context("failed to begin delete transaction")?;

        sqlx::query("DELETE FROM course WHERE bootcamp_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("failed to delete bootcamp courses")?;

        let result = sqlx::query("DELETE FROM bootcamp WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("failed to delete bootcamp")?;

        tx.commit()
            .await
            .context("failed to commit delete transaction")?;

        Ok(result.rows_affected() > 0)
    }

    /// Find bootcamps within `distance_miles` of a point.
    ///
    /// Haversine great-circle distance evaluated in SQL; rows without
    /// a resolved location never match.
    pub async fn find_within_radius(
        pool: &PgPool,
        latitude: f64,
        longitude: f64,
        distance_miles: f64,
    ) -> Result<Vec<Self>> {
        let bootcamps = sqlx::query_as::<_, Bootcamp>(
            r#"
            SELECT * FROM bootcamp
            WHERE latitude IS NOT NULL
              AND longitude IS NOT NULL
              AND $4 * acos(
                    LEAST(1.0,
                        cos(radians($1)) * cos(radians(latitude))
                            * cos(radians(longitude) - radians($2))
                            + sin(radians($1)) * sin(radians(latitude))
                    )
                  ) <= $3
            ORDER BY created_at DESC
            "#,
        )
        .bind(latitude)
        .bind(longitude)
        .bind(distance_miles)
        .bind(EARTH_RADIUS_MILES)
        .fetch_all(pool)
        .await
        .context("failed to search bootcamps by radius")?;

        Ok(bootcamps)
    }

    /// Persist the stored photo filename for a bootcamp.
    pub async fn update_photo(pool: &PgPool, id: Uuid, filename: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE bootcamp SET photo = $1 WHERE id = $2")
            .bind(filename)
            .bind(id)
            .execute(pool)
            .await
            .context("failed to update bootcamp photo")?;

        Ok(result.rows_affected() > 0)
    }
}
