//! Card endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use srs_core::tools::{self, RateCardResponse};
use srs_core::CoreError;

use crate::error::{ApiError, Result};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RateCardRequest {
    pub file_path: Option<String>,
    pub rating: Option<RatingValue>,
}

/// A rating as clients send it: `3`, `3.0` or `"3"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RatingValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RatingValue {
    /// The integer rating; the 1-4 range is checked by the core.
    pub fn to_integer(&self) -> Result<i64> {
        match self {
            Self::Integer(value) => Ok(*value),
            Self::Float(value) if value.is_finite() && value.fract() == 0.0 => Ok(*value as i64),
            Self::Float(value) => Err(invalid_rating(value)),
            Self::Text(text) => text.trim().parse().map_err(|_| invalid_rating(format!("{text:?}"))),
        }
    }
}

fn invalid_rating(value: impl std::fmt::Display) -> ApiError {
    ApiError::BadRequest(format!("invalid rating {value}: must be 1-4"))
}

/// POST /api/cards/rate
///
/// Writes are serialized through the shared write lock.
pub async fn rate(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RateCardRequest>, JsonRejection>,
) -> Result<Json<RateCardResponse>> {
    let Json(payload) = payload?;
    let file_path = payload
        .file_path
        .ok_or(CoreError::MissingArgument("file_path"))?;
    let rating = payload
        .rating
        .ok_or(CoreError::MissingArgument("rating"))?
        .to_integer()?;

    let _guard = state.write_lock.lock().await;
    let config = state.config.clone();
    let scheduler = state.scheduler.clone();
    let response = tokio::task::spawn_blocking(move || {
        tools::rate_card(&config, scheduler.as_ref(), &file_path, rating)
    })
    .await??;

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rating(value: serde_json::Value) -> Result<i64> {
        serde_json::from_value::<RatingValue>(value).unwrap().to_integer()
    }

    #[test]
    fn accepts_integer_float_and_text_ratings() {
        assert_eq!(rating(json!(3)).unwrap(), 3);
        assert_eq!(rating(json!(3.0)).unwrap(), 3);
        assert_eq!(rating(json!("3")).unwrap(), 3);
        assert_eq!(rating(json!(" 4 ")).unwrap(), 4);
        assert_eq!(rating(json!(7)).unwrap(), 7);
    }

    #[test]
    fn rejects_fractional_and_non_numeric_ratings() {
        let err = rating(json!(2.5)).unwrap_err();
        assert_eq!(err.to_string(), "Bad request: invalid rating 2.5: must be 1-4");

        let err = rating(json!("abc")).unwrap_err();
        assert_eq!(err.to_string(), "Bad request: invalid rating \"abc\": must be 1-4");
    }
}
