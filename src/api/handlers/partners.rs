use crate::{
    AppState,
    api::models::{
        PaginationQuery,
        partners::{PartnerCreate, PartnerResponse, PartnerUpdate},
    },
    crypto::generate_api_key,
    db::{
        handlers::{Partners, Repository, partners::PartnerFilter},
        models::partners::{PartnerCreateDBRequest, PartnerUpdateDBRequest},
    },
    errors::{Error, Result},
    types::PartnerId,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

/// Provision a new partner
#[utoipa::path(
    post,
    path = "/partners",
    tag = "partners",
    summary = "Provision a new partner",
    description = "Create a partner and issue an opaque API key. The key is generated server-side and returned in the response.",
    responses(
        (status = 201, description = "Partner created", body = PartnerResponse),
        (status = 400, description = "Invalid partner name"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn create_partner(
    State(state): State<AppState>,
    Json(data): Json<PartnerCreate>,
) -> Result<(StatusCode, Json<PartnerResponse>)> {
    if data.name.trim().is_empty() {
        return Err(Error::BadRequest {
            message: "Partner name must not be empty".to_string(),
        });
    }

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Partners::new(&mut pool_conn);

    let request = PartnerCreateDBRequest::new(data, generate_api_key());
    let partner = repo.create(&request).await?;

    Ok((StatusCode::CREATED, Json(PartnerResponse::from(partner))))
}

/// List partners
#[utoipa::path(
    get,
    path = "/partners",
    tag = "partners",
    summary = "List partners",
    params(
        PaginationQuery
    ),
    responses(
        (status = 200, description = "List of partners", body = [PartnerResponse]),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn list_partners(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Vec<PartnerResponse>>> {
    let skip = query.skip.unwrap_or(0).max(0);
    let limit = query.limit.unwrap_or(100).clamp(1, 1000);

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Partners::new(&mut pool_conn);

    let partners = repo.list(&PartnerFilter::new(skip, limit)).await?;

    Ok(Json(partners.into_iter().map(PartnerResponse::from).collect()))
}

/// Get a partner by ID
#[utoipa::path(
    get,
    path = "/partners/{partner_id}",
    tag = "partners",
    summary = "Get a partner by ID",
    params(
        ("partner_id" = i64, Path, description = "Partner ID"),
    ),
    responses(
        (status = 200, description = "Partner record", body = PartnerResponse),
        (status = 404, description = "Partner not found"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn get_partner(State(state): State<AppState>, Path(partner_id): Path<PartnerId>) -> Result<Json<PartnerResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Partners::new(&mut pool_conn);

    let partner = repo.get_by_id(partner_id).await?.ok_or_else(|| Error::NotFound {
        resource: "Partner".to_string(),
        id: partner_id.to_string(),
    })?;

    Ok(Json(PartnerResponse::from(partner)))
}

/// Look up a partner by API key
#[utoipa::path(
    get,
    path = "/partners/by-key/{api_key}",
    tag = "partners",
    summary = "Look up a partner by API key",
    params(
        ("api_key" = String, Path, description = "Opaque partner API key"),
    ),
    responses(
        (status = 200, description = "Partner record", body = PartnerResponse),
        (status = 404, description = "No partner with this key"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn get_partner_by_api_key(State(state): State<AppState>, Path(api_key): Path<String>) -> Result<Json<PartnerResponse>> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Partners::new(&mut pool_conn);

    let partner = repo.get_by_api_key(&api_key).await?.ok_or_else(|| Error::NotFound {
        resource: "Partner".to_string(),
        id: "<api key>".to_string(),
    })?;

    Ok(Json(PartnerResponse::from(partner)))
}

/// Update a partner
#[utoipa::path(
    patch,
    path = "/partners/{partner_id}",
    tag = "partners",
    summary = "Update a partner's name",
    params(
        ("partner_id" = i64, Path, description = "Partner ID"),
    ),
    responses(
        (status = 200, description = "Updated partner record", body = PartnerResponse),
        (status = 404, description = "Partner not found"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn update_partner(
    State(state): State<AppState>,
    Path(partner_id): Path<PartnerId>,
    Json(data): Json<PartnerUpdate>,
) -> Result<Json<PartnerResponse>> {
    if let Some(name) = &data.name
        && name.trim().is_empty()
    {
        return Err(Error::BadRequest {
            message: "Partner name must not be empty".to_string(),
        });
    }

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Partners::new(&mut pool_conn);

    let partner = repo.update(partner_id, &PartnerUpdateDBRequest::from(data)).await?;

    Ok(Json(PartnerResponse::from(partner)))
}

/// Delete a partner
#[utoipa::path(
    delete,
    path = "/partners/{partner_id}",
    tag = "partners",
    summary = "Delete a partner",
    params(
        ("partner_id" = i64, Path, description = "Partner ID"),
    ),
    responses(
        (status = 204, description = "Partner deleted"),
        (status = 404, description = "Partner not found"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn delete_partner(State(state): State<AppState>, Path(partner_id): Path<PartnerId>) -> Result<StatusCode> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Partners::new(&mut pool_conn);

    if repo.delete(partner_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::NotFound {
            resource: "Partner".to_string(),
            id: partner_id.to_string(),
        })
    }
}
