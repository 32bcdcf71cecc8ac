//! Validation of player and draw input arriving from API clients
//!
//! The balancer and the stores trust their input; everything a client sends
//! passes through here first.

use crate::config::RosterConfig;
use crate::error::{DrawError, Result};
use crate::types::{DrawRequest, PlayerInput};
use serde_json::Value;

/// A validated name and rating pair
#[derive(Debug, Clone, PartialEq)]
pub struct ValidPlayer {
    pub name: String,
    pub rating: f64,
}

fn invalid(reason: impl Into<String>) -> anyhow::Error {
    DrawError::InvalidPlayer {
        reason: reason.into(),
    }
    .into()
}

fn bad_request(reason: &str) -> anyhow::Error {
    DrawError::InvalidRequest {
        reason: reason.to_string(),
    }
    .into()
}

/// Accept a JSON number or a numeric string
fn number_from(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Validate a create/update body: both fields present, the trimmed name
/// non-empty, and the rating a finite number within the configured bounds.
pub fn validate_player_input(input: &PlayerInput, config: &RosterConfig) -> Result<ValidPlayer> {
    let (name, rating) = match (&input.name, &input.rating) {
        (Some(name), Some(rating)) => (name, rating),
        _ => return Err(invalid("both 'name' and 'rating' are required")),
    };

    let name = name.trim();
    if name.is_empty() {
        return Err(invalid("name cannot be empty"));
    }

    let rating = number_from(rating)
        .filter(|r| r.is_finite())
        .ok_or_else(|| invalid("rating must be a number"))?;

    if rating < config.min_rating || rating > config.max_rating {
        return Err(invalid(format!(
            "rating must be between {} and {}",
            config.min_rating, config.max_rating
        )));
    }

    Ok(ValidPlayer {
        name: name.to_string(),
        rating,
    })
}

/// Extract the team size from a draw request.
///
/// Integers and integer strings are accepted; sign is not checked here,
/// the balancer rejects non-positive sizes itself.
pub fn parse_team_size(request: &DrawRequest) -> Result<i64> {
    let value = request
        .team_size
        .as_ref()
        .ok_or_else(|| bad_request("missing 'team_size' field"))?;

    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| bad_request("'team_size' must be an integer"))
}
