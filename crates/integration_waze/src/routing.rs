//! Routing request construction and response classification

use serde_json::Value;
use tracing::debug;

use crate::config::SERVER_TIMEOUT_MS;
use crate::error::WazeError;
use crate::models::{Coordinate, RawRoute, RouteOptions};

/// Query parameters for a routing request
#[must_use]
pub fn route_query_params(
    start: &Coordinate,
    end: &Coordinate,
    options: &RouteOptions,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("from", start.to_waze_point()),
        ("to", end.to_waze_point()),
        ("at", options.time_delta.to_string()),
        ("returnJSON", "true".to_string()),
        ("returnGeometries", "true".to_string()),
        ("returnInstructions", "true".to_string()),
        ("timeout", SERVER_TIMEOUT_MS.to_string()),
        ("nPaths", options.alternatives.to_string()),
        ("options", options.options_param()),
    ];

    if let Some(vehicle_type) = options.vehicle_type {
        params.push(("vehicleType", vehicle_type.as_param().to_string()));
    }

    // Vignette roads are included unless explicitly avoided
    if !options.avoid_subscription_roads {
        params.push(("subscription", "*".to_string()));
    }

    params
}

/// Classify a routing response into its routes
///
/// # Errors
///
/// - `ServerError` for a non-success status, carrying the raw body
/// - `EmptyResponse` if the body is not JSON or is empty
/// - `Upstream` if the body carries an `error` field
/// - `WrongResponse` if no route object can be found
pub fn parse_route_response(status: u16, body: &str) -> Result<Vec<RawRoute>, WazeError> {
    if !(200..300).contains(&status) {
        return Err(WazeError::ServerError {
            status,
            body: body.to_string(),
        });
    }

    let mut json: Value = serde_json::from_str(body).map_err(|_| WazeError::EmptyResponse)?;
    if is_empty_json(&json) {
        return Err(WazeError::EmptyResponse);
    }

    let Some(object) = json.as_object_mut() else {
        return Err(WazeError::WrongResponse(
            "routing response is not an object".to_string(),
        ));
    };

    if let Some(error) = object.get("error") {
        let message = error
            .as_str()
            .map_or_else(|| error.to_string(), str::to_string);
        return Err(WazeError::Upstream(message));
    }

    if let Some(Value::Array(alternatives)) = object.remove("alternatives") {
        if !alternatives.is_empty() {
            debug!(count = alternatives.len(), "Routing alternatives received");
            return alternatives
                .into_iter()
                .map(|mut alternative| {
                    let response = alternative
                        .get_mut("response")
                        .map(Value::take)
                        .ok_or_else(|| {
                            WazeError::WrongResponse(
                                "alternative has no response".to_string(),
                            )
                        })?;
                    route_from_value(response)
                })
                .collect();
        }
    }

    let response = object
        .remove("response")
        .ok_or_else(|| WazeError::WrongResponse("routing response has no route".to_string()))?;
    Ok(vec![route_from_value(response)?])
}

/// Deserialize a route, taking the first element when the server sends a list
fn route_from_value(value: Value) -> Result<RawRoute, WazeError> {
    let value = match value {
        Value::Array(items) => items
            .into_iter()
            .next()
            .ok_or_else(|| WazeError::WrongResponse("empty route list".to_string()))?,
        other => other,
    };

    serde_json::from_value(value).map_err(|e| WazeError::WrongResponse(e.to_string()))
}

fn is_empty_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
