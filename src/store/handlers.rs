use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Map, Value, json};
use tracing::{debug, info};

use super::StoreState;
use super::errors::StoreError;

/// Strip the `.json` suffix every store path segment carries.
fn json_segment(raw: &str) -> Result<&str, StoreError> {
    raw.strip_suffix(".json")
        .filter(|s| !s.is_empty())
        .ok_or_else(|| StoreError::NotFound(format!("unknown path: {raw}")))
}

fn object_body(body: &Bytes) -> Result<Map<String, Value>, StoreError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(obj)) => Ok(obj),
        Ok(_) => Err(StoreError::Validation("body must be a JSON object".to_string())),
        Err(e) => Err(StoreError::Validation(format!("invalid JSON: {e}"))),
    }
}

pub async fn list(
    State(state): State<StoreState>,
    Path(collection): Path<String>,
) -> Result<Json<Value>, StoreError> {
    let collection = json_segment(&collection)?;
    let records = state.with_db(|db| db.list(collection))?;
    if records.is_empty() {
        return Ok(Json(Value::Null));
    }
    let keyed: Map<String, Value> = records.into_iter().collect();
    Ok(Json(Value::Object(keyed)))
}

pub async fn create(
    State(state): State<StoreState>,
    Path(collection): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, StoreError> {
    let collection = json_segment(&collection)?;
    state.check_writable()?;
    let record = Value::Object(object_body(&body)?);
    let key = state.with_db(|db| db.insert(collection, &record))?;
    info!(collection, %key, "record created");
    Ok(Json(json!({ "name": key })))
}

pub async fn fetch(
    State(state): State<StoreState>,
    Path((collection, key)): Path<(String, String)>,
) -> Result<Json<Value>, StoreError> {
    let key = json_segment(&key)?;
    let record = state.with_db(|db| db.get(&collection, key))?;
    Ok(Json(record.unwrap_or(Value::Null)))
}

pub async fn replace(
    State(state): State<StoreState>,
    Path((collection, key)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<Value>, StoreError> {
    let key = json_segment(&key)?;
    state.check_writable()?;
    let record = Value::Object(object_body(&body)?);
    state.with_db(|db| db.put(&collection, key, &record))?;
    info!(%collection, key, "record replaced");
    Ok(Json(record))
}

pub async fn patch(
    State(state): State<StoreState>,
    Path((collection, key)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<Value>, StoreError> {
    let key = json_segment(&key)?;
    state.check_writable()?;
    let fields = object_body(&body)?;
    let merged = state.with_db(|db| db.patch(&collection, key, &fields))?;
    if merged.is_none() {
        return Err(StoreError::NotFound(format!("no record {collection}/{key}")));
    }
    info!(%collection, key, "record patched");
    Ok(Json(Value::Object(fields)))
}

pub async fn remove(
    State(state): State<StoreState>,
    Path((collection, key)): Path<(String, String)>,
) -> Result<(StatusCode, Json<Value>), StoreError> {
    let key = json_segment(&key)?;
    state.check_writable()?;
    let existed = state.with_db(|db| db.delete(&collection, key))?;
    if existed {
        info!(%collection, key, "record deleted");
    } else {
        debug!(%collection, key, "delete of missing record");
    }
    Ok((StatusCode::OK, Json(Value::Null)))
}
