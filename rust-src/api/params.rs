//! Query-string and body parsing for the traffic endpoints.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::ApiError;
use crate::aggregation::Granularity;
use crate::config::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use crate::models::validate_date;
use crate::storage::{PageQuery, SortOrder};


/// Raw `GET /traffic` query. Every field is optional and loosely typed so
/// that bad values fall back to defaults instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
    pub cursor: Option<String>,
    pub order: Option<String>,
}


#[derive(Debug, Default, Deserialize)]
pub struct RollupParams {
    pub granularity: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}


/// Clamp to `[1, MAX_PAGE_LIMIT]`; missing, non-numeric or non-positive
/// values use `DEFAULT_PAGE_LIMIT`.
pub fn parse_limit(raw: Option<&str>) -> u32 {
    match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
        Some(n) if n > 0 => n.min(MAX_PAGE_LIMIT as i64) as u32,
        _ => DEFAULT_PAGE_LIMIT,
    }
}


/// `desc` (any case) sorts newest first, anything else oldest first.
pub fn parse_order(raw: Option<&str>) -> SortOrder {
    match raw.map(|s| s.trim().to_lowercase()).as_deref() {
        Some("desc") => SortOrder::Desc,
        _ => SortOrder::Asc,
    }
}


impl ListParams {
    pub fn into_page_query(self) -> Result<PageQuery, ApiError> {
        let cursor = match self.cursor.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(cursor) => {
                validate_date(cursor)
                    .map_err(|_| ApiError::BadRequest("cursor must be YYYY-MM-DD string".to_string()))?;
                Some(cursor.to_string())
            }
        };

        Ok(PageQuery {
            limit: parse_limit(self.limit.as_deref()),
            cursor,
            order: parse_order(self.order.as_deref()),
        })
    }
}


/// Validated rollup request.
#[derive(Debug)]
pub struct RollupRequest {
    pub granularity: Granularity,
    pub from: Option<String>,
    pub to: Option<String>,
}


impl RollupParams {
    pub fn validate(self) -> Result<RollupRequest, ApiError> {
        let granularity = match self.granularity.as_deref() {
            None | Some("") => Granularity::Daily,
            Some(raw) => Granularity::parse(raw).ok_or_else(|| {
                ApiError::BadRequest("granularity must be daily, weekly or monthly".to_string())
            })?,
        };

        let from = optional_date(self.from, "from")?;
        let to = optional_date(self.to, "to")?;

        if let (Some(from), Some(to)) = (&from, &to) {
            if from > to {
                return Err(ApiError::BadRequest("from must not be after to".to_string()));
            }
        }

        Ok(RollupRequest { granularity, from, to })
    }
}


fn optional_date(raw: Option<String>, name: &str) -> Result<Option<String>, ApiError> {
    match raw {
        Some(s) if !s.trim().is_empty() => {
            let s = s.trim().to_string();
            validate_date(&s).map_err(|e| ApiError::BadRequest(format!("{name}: {e}")))?;
            Ok(Some(s))
        }
        _ => Ok(None),
    }
}


/// Parse a write body into a JSON object. An empty body counts as `{}`.
pub fn json_object(body: &[u8]) -> Result<Map<String, Value>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::BadRequest("body must be a JSON object".to_string())),
        Err(e) => Err(ApiError::BadRequest(format!("invalid JSON body: {e}"))),
    }
}
