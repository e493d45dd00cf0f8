//! Route aggregation
//!
//! Sums the segments of a route into a total duration and distance. With
//! `stop_at_bounds` enabled, segments whose path point lies inside the start
//! or end bounding box are treated as local maneuvering and skipped.

use crate::error::WazeError;
use crate::models::{
    AggregateOptions, BoundingBox, RawRoute, RouteResult, RouteSegment, RouteTotals,
};

/// Sum segment durations (seconds) and lengths (meters) into minutes and kilometers
///
/// # Errors
///
/// Returns `WrongResponse` if a counted segment lacks the selected duration
/// field or its length.
pub fn add_up_route(
    segments: &[RouteSegment],
    start_bounds: Option<&BoundingBox>,
    end_bounds: Option<&BoundingBox>,
    options: AggregateOptions,
) -> Result<RouteTotals, WazeError> {
    let mut seconds = 0.0;
    let mut meters = 0.0;

    for segment in segments {
        if options.stop_at_bounds && within_endpoint(segment, start_bounds, end_bounds) {
            continue;
        }

        seconds += segment.cross_time_secs(options.real_time).ok_or_else(|| {
            WazeError::WrongResponse("segment has no cross time".to_string())
        })?;
        meters += segment
            .length_meters()
            .ok_or_else(|| WazeError::WrongResponse("segment has no length".to_string()))?;
    }

    Ok(RouteTotals {
        duration_minutes: seconds / 60.0,
        distance_km: meters / 1000.0,
    })
}

fn within_endpoint(
    segment: &RouteSegment,
    start_bounds: Option<&BoundingBox>,
    end_bounds: Option<&BoundingBox>,
) -> bool {
    let Some(point) = segment.path() else {
        return false;
    };
    [start_bounds, end_bounds]
        .into_iter()
        .flatten()
        .any(|bounds| bounds.contains(point.x, point.y))
}

/// Aggregate a raw route into a [`RouteResult`]
///
/// # Errors
///
/// Returns `WrongResponse` if the route has no segment list or a segment is
/// missing required fields.
pub fn summarize_route(
    route: &RawRoute,
    start_bounds: Option<&BoundingBox>,
    end_bounds: Option<&BoundingBox>,
    options: AggregateOptions,
) -> Result<RouteResult, WazeError> {
    let totals = add_up_route(route.segments()?, start_bounds, end_bounds, options)?;

    Ok(RouteResult {
        duration_minutes: totals.duration_minutes,
        distance_km: totals.distance_km,
        name: route.name().to_string(),
        street_names: route.street_names(),
        route_type: route.route_type().map(str::to_string),
        short_name: route.short_name().map(str::to_string),
    })
}
