//! /organizations/* — read-only lookups.

use axum::extract::Query;
use axum::{Extension, Json};
use orgdir_core::{OrganizationId, OrganizationRecord, OrganizationSummary, RadiusQuery};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddressParams {
    pub building_address: String,
}

#[derive(Debug, Deserialize)]
pub struct NameParams {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct IdParams {
    pub org_id: OrganizationId,
}

#[derive(Debug, Deserialize)]
pub struct ActivityParams {
    pub activity: String,
}

pub async fn get_by_address(
    Extension(state): Extension<AppState>,
    Query(params): Query<AddressParams>,
) -> Result<Json<Vec<OrganizationRecord>>, AppError> {
    let records = state
        .run(state.directory.organizations_by_address(&params.building_address))
        .await?;
    Ok(Json(records))
}

pub async fn get_by_name(
    Extension(state): Extension<AppState>,
    Query(params): Query<NameParams>,
) -> Result<Json<OrganizationRecord>, AppError> {
    let record = state
        .run(state.directory.organization_by_name(&params.name))
        .await?;
    Ok(Json(record))
}

pub async fn get_by_id(
    Extension(state): Extension<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Json<OrganizationRecord>, AppError> {
    let record = state
        .run(state.directory.organization_by_id(params.org_id))
        .await?;
    Ok(Json(record))
}

pub async fn all(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<OrganizationRecord>>, AppError> {
    let records = state.run(state.directory.all_organizations()).await?;
    Ok(Json(records))
}

pub async fn get_by_activity(
    Extension(state): Extension<AppState>,
    Query(params): Query<ActivityParams>,
) -> Result<Json<Vec<OrganizationRecord>>, AppError> {
    let records = state
        .run(state.directory.organizations_by_activity(&params.activity))
        .await?;
    Ok(Json(records))
}

pub async fn get_by_radius(
    Extension(state): Extension<AppState>,
    Json(query): Json<RadiusQuery>,
) -> Result<Json<Vec<OrganizationSummary>>, AppError> {
    let hits = state
        .run(state.directory.organizations_by_radius(&query))
        .await?;
    Ok(Json(hits))
}
