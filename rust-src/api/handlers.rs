//! Route handlers.

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use super::error::ApiError;
use super::extract::{resolve_role, AuthUser, EditorUser};
use super::params::{json_object, ListParams, RollupParams};
use super::state::SharedState;
use crate::aggregation::{rollup, summarize, Bucket, Granularity, Summary};
use crate::models::{validate_date, validate_visits, Role, TrafficRecord, UpsertOutcome, ValidationError};


#[derive(Debug, Serialize)]
pub struct TrafficItem {
    pub id: String,
    #[serde(flatten)]
    pub record: TrafficRecord,
}


impl From<TrafficRecord> for TrafficItem {
    fn from(record: TrafficRecord) -> Self {
        Self {
            id: record.id().to_string(),
            record,
        }
    }
}


#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficPage {
    pub items: Vec<TrafficItem>,
    pub next_cursor: Option<String>,
}


#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub uid: String,
    pub email: Option<String>,
    pub role: Role,
}


#[derive(Debug, Serialize)]
pub struct RollupResponse {
    pub granularity: Granularity,
    pub buckets: Vec<Bucket>,
    pub summary: Summary,
}


fn path_id(path: Result<Path<String>, PathRejection>) -> Result<String, ApiError> {
    let Path(id) = path.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    validate_date(&id)?;
    Ok(id)
}


/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}


/// GET /me
pub async fn me(State(state): State<SharedState>, AuthUser(identity): AuthUser) -> Result<Json<MeResponse>, ApiError> {
    let role = resolve_role(&state, &identity).await?;

    Ok(Json(MeResponse {
        uid: identity.uid,
        email: identity.email,
        role,
    }))
}


/// GET /traffic?limit&cursor&order
pub async fn list_traffic(
    State(state): State<SharedState>,
    AuthUser(_): AuthUser,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<TrafficPage>, ApiError> {
    let Query(params) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let page_query = params.into_page_query()?;
    let page = state.with_db(move |db| db.list_traffic(&page_query)).await?;

    Ok(Json(TrafficPage {
        items: page.items.into_iter().map(TrafficItem::from).collect(),
        next_cursor: page.next_cursor,
    }))
}


/// POST /traffic: create or update the record for `date`.
pub async fn create_traffic(
    State(state): State<SharedState>,
    EditorUser(identity): EditorUser,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let body = json_object(&body)?;

    let date = body
        .get("date")
        .and_then(Value::as_str)
        .ok_or(ValidationError::DateFormat)?
        .to_string();
    validate_date(&date)?;
    let visits = validate_visits(body.get("visits").unwrap_or(&Value::Null))?;

    let outcome = {
        let date = date.clone();
        state.with_db(move |db| db.upsert_traffic(&date, visits)).await?
    };
    let action = match outcome {
        UpsertOutcome::Created => "created",
        UpsertOutcome::Updated => "updated",
    };
    info!("Traffic {date} {action} by uid {} (visits={visits})", identity.uid);

    Ok((StatusCode::CREATED, Json(json!({ "id": date }))))
}


/// PUT /traffic/{id}: change visits. The date itself never changes.
pub async fn update_traffic(
    State(state): State<SharedState>,
    EditorUser(identity): EditorUser,
    path: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let id = path_id(path)?;
    let body = json_object(&body)?;

    if let Some(date) = body.get("date") {
        if date.as_str() != Some(id.as_str()) {
            return Err(ApiError::BadRequest("date is immutable".to_string()));
        }
    }
    let visits = validate_visits(body.get("visits").unwrap_or(&Value::Null))?;

    let found = {
        let id = id.clone();
        state.with_db(move |db| db.update_visits(&id, visits)).await?
    };
    if !found {
        return Err(ApiError::NotFound(format!("traffic record {id} not found")));
    }
    info!("Traffic {id} updated by uid {} (visits={visits})", identity.uid);

    Ok(Json(json!({ "ok": true })))
}


/// DELETE /traffic/{id}
pub async fn delete_traffic(
    State(state): State<SharedState>,
    EditorUser(identity): EditorUser,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let id = path_id(path)?;

    let found = {
        let id = id.clone();
        state.with_db(move |db| db.delete_traffic(&id)).await?
    };
    if !found {
        return Err(ApiError::NotFound(format!("traffic record {id} not found")));
    }
    info!("Traffic {id} deleted by uid {}", identity.uid);

    Ok(Json(json!({ "ok": true })))
}


/// GET /traffic/rollup?granularity&from&to
pub async fn rollup_traffic(
    State(state): State<SharedState>,
    AuthUser(_): AuthUser,
    query: Result<Query<RollupParams>, QueryRejection>,
) -> Result<Json<RollupResponse>, ApiError> {
    let Query(params) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let request = params.validate()?;

    let (from, to) = (request.from, request.to);
    let records = state
        .with_db(move |db| db.traffic_in_range(from.as_deref(), to.as_deref()))
        .await?;

    Ok(Json(RollupResponse {
        granularity: request.granularity,
        buckets: rollup(&records, request.granularity),
        summary: summarize(&records),
    }))
}


pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}


pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
