//! HTTP route handlers.

pub mod auth;
pub mod bootcamp;
pub mod course;
pub mod health;

use serde::Serialize;

use crate::query::PaginationMeta;

/// Envelope for single-record and mutation responses.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Envelope for list-pipeline responses.
#[derive(Debug, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub success: bool,
    pub count: usize,
    pub pagination: PaginationMeta,
    pub data: Vec<T>,
}

/// Envelope for collection responses without pagination.
#[derive(Debug, Serialize)]
pub struct CollectionResponse<T: Serialize> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T: Serialize> CollectionResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}
