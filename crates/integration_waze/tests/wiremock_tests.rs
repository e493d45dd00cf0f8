//! Integration tests for the route calculator (wiremock-based)

use std::time::Duration;

use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_waze::{
    AggregateOptions, Region, RouteCalculator, RouteOptions, VehicleType, WazeConfig, WazeError,
    WazeRouteCalculator,
};

const ROUTING_PATH: &str = "/row-RoutingManager/routingRequest";
const SEARCH_PATH: &str = "/row-SearchServer/mozi";

const MAINZ: &str = "50.00332659227126,8.262322651915843";
const WIESBADEN: &str = "50.08414976707619,8.247836017342934";

const MAINZ_ADDRESS: &str = "Kaiserstraße 30 55116 Mainz, Germany";
const WIESBADEN_ADDRESS: &str = "Luisenstraße 30 65185 Wiesbaden, Germany";

fn config_for_mock(base_url: &str) -> WazeConfig {
    WazeConfig {
        timeout_secs: 5,
        ..WazeConfig::default()
    }
    .with_base_url(base_url)
}

fn calculator(server: &MockServer) -> WazeRouteCalculator {
    WazeRouteCalculator::new(&config_for_mock(&server.uri())).unwrap()
}

const fn single_route_json() -> &'static str {
    r#"{
        "response": {
            "results": [
                {
                    "path": {"segmentId": 1, "nodeId": 11, "x": 8.2623, "y": 50.0033},
                    "length": 1840, "crossTime": 212, "crossTimeWithoutRealTime": 200
                },
                {
                    "path": {"segmentId": 2, "nodeId": 12, "x": 8.2581, "y": 50.0412},
                    "length": 7315, "crossTime": 530, "crossTimeWithoutRealTime": 515
                },
                {
                    "path": {"segmentId": 3, "nodeId": 13, "x": 8.2478, "y": 50.0841},
                    "length": 3560, "crossTime": 362, "crossTimeWithoutRealTime": 350
                }
            ],
            "routeName": "A643 - Wiesbaden",
            "streetNames": ["Kaiserstraße", null, "A643", "Rheinstraße"],
            "routeType": ["FASTEST"],
            "shortRouteName": "A643"
        }
    }"#
}

const fn alternatives_json() -> &'static str {
    r#"{
        "alternatives": [
            {
                "response": {
                    "results": [
                        {"length": 4100, "crossTime": 400, "crossTimeWithoutRealTime": 380},
                        {"length": 8535, "crossTime": 830, "crossTimeWithoutRealTime": 800}
                    ],
                    "routeName": "B455 - Boelckestraße Wiesbaden",
                    "streetNames": ["Boelckestraße", null, "B455", "Boelckestraße"],
                    "routeType": ["BEST"],
                    "shortRouteName": "B455"
                }
            },
            {
                "response": {
                    "result": [
                        {"length": 6000, "cross_time": 700, "cross_time_without_real_time": 690},
                        {"length": 7066, "cross_time": 853, "cross_time_without_real_time": 840}
                    ],
                    "routeName": "K650 - Mainzer Straße Wiesbaden",
                    "streetNames": ["Mainzer Straße", "K650"],
                    "routeType": ["SHORTEST"],
                    "shortRouteName": "K650"
                }
            },
            {
                "response": {
                    "results": [
                        {"length": 9000, "crossTime": 1000, "crossTimeWithoutRealTime": 950},
                        {"length": 3957, "crossTime": 714, "crossTimeWithoutRealTime": 700}
                    ],
                    "routeName": "A643",
                    "streetNames": [null, "A643", "A643"],
                    "routeType": ["FASTEST"],
                    "shortRouteName": "A643"
                }
            }
        ]
    }"#
}

const fn mainz_geocode_json() -> &'static str {
    r#"[
        {"name": "Kaiserstraße", "city": "", "location": {"lat": 49.0, "lon": 8.0}},
        {
            "name": "Kaiserstraße 30",
            "city": "Mainz",
            "location": {"lat": 50.0063, "lon": 8.2601},
            "bounds": {"top": 49.9963, "bottom": 50.0163, "left": 8.2701, "right": 8.2501}
        }
    ]"#
}

const fn wiesbaden_geocode_json() -> &'static str {
    r#"[
        {
            "name": "Luisenstraße 30",
            "city": "Wiesbaden",
            "location": {"lat": 50.0789, "lon": 8.2401},
            "bounds": {"top": 50.0889, "bottom": 50.0689, "left": 8.2301, "right": 8.2501}
        }
    ]"#
}

/// Route whose first segment sits inside the Mainz bounds and last inside Wiesbaden's
const fn address_route_json() -> &'static str {
    r#"{
        "response": {
            "result": [
                {"path": {"x": 8.2601, "y": 50.0063}, "length": 250, "crossTime": 90, "crossTimeWithoutRealTime": 80},
                {"path": {"x": 8.2550, "y": 50.0450}, "length": 11000, "crossTime": 900, "crossTimeWithoutRealTime": 880},
                {"path": {"x": 8.2401, "y": 50.0789}, "length": 300, "crossTime": 120, "crossTimeWithoutRealTime": 110}
            ],
            "routeName": "Theodor-Heuss-Brücke",
            "streetNames": ["Theodor-Heuss-Brücke"]
        }
    }"#
}

async fn mount_route(server: &MockServer, body: &'static str) {
    Mock::given(method("GET"))
        .and(path(ROUTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_geocoding(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("q", MAINZ_ADDRESS))
        .and(query_param("lang", "eng"))
        .and(query_param("origin", "livemap"))
        .and(query_param("lat", "47.498"))
        .and(query_param("lon", "19.04"))
        .respond_with(ResponseTemplate::new(200).set_body_string(mainz_geocode_json()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("q", WIESBADEN_ADDRESS))
        .respond_with(ResponseTemplate::new(200).set_body_string(wiesbaden_geocode_json()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_calc_routes_literal_coordinates() {
    let server = MockServer::start().await;
    mount_route(&server, single_route_json()).await;

    let results = calculator(&server)
        .calc_routes(
            MAINZ,
            WIESBADEN,
            &RouteOptions::default(),
            AggregateOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].duration_minutes, 18.4);
    assert_eq!(results[0].distance_km, 12.715);
    assert_eq!(results[0].name, "A643 - Wiesbaden");
    assert_eq!(
        results[0].street_names,
        vec!["Kaiserstraße", "A643", "Rheinstraße"]
    );

    // Literal coordinates never hit the geocoder
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), ROUTING_PATH);
}

#[tokio::test]
async fn test_calc_route_info_literal_coordinates() {
    let server = MockServer::start().await;
    mount_route(&server, single_route_json()).await;

    let result = calculator(&server)
        .calc_route_info(MAINZ, WIESBADEN, AggregateOptions::default())
        .await
        .unwrap();

    assert_eq!(result.duration_minutes, 18.4);
    assert_eq!(result.distance_km, 12.715);
    assert_eq!(result.route_key(), "F-A643");
}

#[tokio::test]
async fn test_calc_route_info_honors_aggregate_options() {
    let server = MockServer::start().await;
    mount_geocoding(&server).await;
    mount_route(&server, address_route_json()).await;

    let calculator = calculator(&server);

    let typical = AggregateOptions {
        real_time: false,
        stop_at_bounds: false,
    };
    let result = calculator
        .calc_route_info(MAINZ_ADDRESS, WIESBADEN_ADDRESS, typical)
        .await
        .unwrap();
    assert_eq!(result.duration_minutes, 1070.0 / 60.0);
    assert_eq!(result.distance_km, 11.55);

    let bounded = AggregateOptions {
        real_time: true,
        stop_at_bounds: true,
    };
    let results = calculator
        .calc_all_routes_info(MAINZ_ADDRESS, WIESBADEN_ADDRESS, bounded)
        .await
        .unwrap();
    assert_eq!(results[0].duration_minutes, 15.0);
    assert_eq!(results[0].distance_km, 11.0);
}

#[tokio::test]
async fn test_calc_routes_typical_time() {
    let server = MockServer::start().await;
    mount_route(&server, single_route_json()).await;

    let aggregate = AggregateOptions {
        real_time: false,
        stop_at_bounds: false,
    };
    let results = calculator(&server)
        .calc_routes(MAINZ, WIESBADEN, &RouteOptions::default(), aggregate)
        .await
        .unwrap();

    assert_eq!(results[0].duration_minutes, 1065.0 / 60.0);
    assert_eq!(results[0].distance_km, 12.715);
}

#[tokio::test]
async fn test_calc_routes_three_alternatives() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROUTING_PATH))
        .and(query_param("nPaths", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(alternatives_json()))
        .mount(&server)
        .await;

    let results = calculator(&server)
        .calc_routes(
            MAINZ,
            WIESBADEN,
            &RouteOptions::default().with_alternatives(3),
            AggregateOptions::default(),
        )
        .await
        .unwrap();

    let durations: Vec<f64> = results.iter().map(|r| r.duration_minutes).collect();
    let distances: Vec<f64> = results.iter().map(|r| r.distance_km).collect();
    let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();

    assert_eq!(durations, vec![20.5, 1553.0 / 60.0, 1714.0 / 60.0]);
    assert!((durations[1] - 25.883).abs() < 0.001);
    assert!((durations[2] - 28.566).abs() < 0.001);
    assert_eq!(distances, vec![12.635, 13.066, 12.957]);
    assert_eq!(
        names,
        vec![
            "B455 - Boelckestraße Wiesbaden",
            "K650 - Mainzer Straße Wiesbaden",
            "A643",
        ]
    );
    assert_eq!(
        results[0].street_names,
        vec!["Boelckestraße", "B455", "Boelckestraße"]
    );
    assert_eq!(results[1].street_names, vec!["Mainzer Straße", "K650"]);
    assert_eq!(results[2].street_names, vec!["A643", "A643"]);

    let keys: Vec<String> = results.iter().map(|r| r.route_key()).collect();
    assert_eq!(keys, vec!["B-B455", "S-K650", "F-A643"]);
}

#[tokio::test]
async fn test_calc_all_routes_info_uses_configured_alternatives() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROUTING_PATH))
        .and(query_param("nPaths", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(alternatives_json()))
        .mount(&server)
        .await;

    let results = calculator(&server)
        .calc_all_routes_info(MAINZ, WIESBADEN, AggregateOptions::default())
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
}

#[tokio::test]
async fn test_calc_routes_with_addresses() {
    let server = MockServer::start().await;
    mount_geocoding(&server).await;
    mount_route(&server, address_route_json()).await;

    let results = calculator(&server)
        .calc_routes(
            MAINZ_ADDRESS,
            WIESBADEN_ADDRESS,
            &RouteOptions::default(),
            AggregateOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(results[0].duration_minutes, 1110.0 / 60.0);
    assert_eq!(results[0].distance_km, 11.55);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn test_calc_routes_stop_at_bounds() {
    let server = MockServer::start().await;
    mount_geocoding(&server).await;
    mount_route(&server, address_route_json()).await;

    let aggregate = AggregateOptions {
        real_time: true,
        stop_at_bounds: true,
    };
    let results = calculator(&server)
        .calc_routes(
            MAINZ_ADDRESS,
            WIESBADEN_ADDRESS,
            &RouteOptions::default(),
            aggregate,
        )
        .await
        .unwrap();

    // Only the through segment between the two cities counts
    assert_eq!(results[0].duration_minutes, 15.0);
    assert_eq!(results[0].distance_km, 11.0);
}

#[tokio::test]
async fn test_address_to_coords_normalizes_bounds() {
    let server = MockServer::start().await;
    mount_geocoding(&server).await;

    let coord = calculator(&server)
        .address_to_coords(MAINZ_ADDRESS)
        .await
        .unwrap();

    assert!((coord.lat - 50.0063).abs() < f64::EPSILON);
    assert!((coord.lon - 8.2601).abs() < f64::EPSILON);
    let bounds = coord.bounds.unwrap();
    assert!((bounds.top() - 50.0163).abs() < f64::EPSILON);
    assert!((bounds.bottom() - 49.9963).abs() < f64::EPSILON);
    assert!((bounds.left() - 8.2501).abs() < f64::EPSILON);
    assert!((bounds.right() - 8.2701).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_address_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"[{"name": "Somewhere", "city": ""}, {"name": "Else"}]"#),
        )
        .mount(&server)
        .await;

    let err = calculator(&server)
        .calc_routes(
            "Nowhere Street 1",
            WIESBADEN,
            &RouteOptions::default(),
            AggregateOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, WazeError::AddressNotFound(_)));
    assert!(err.to_string().contains("Nowhere Street 1"));
}

#[tokio::test]
async fn test_route_timeout_is_distinct() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROUTING_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(single_route_json())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = WazeConfig {
        timeout_secs: 1,
        ..config_for_mock(&server.uri())
    };
    let calculator = WazeRouteCalculator::new(&config).unwrap();

    let err = calculator
        .calc_routes(
            MAINZ,
            WIESBADEN,
            &RouteOptions::default(),
            AggregateOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert!(matches!(err, WazeError::Timeout { timeout_secs: 1 }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_geocode_timeout_is_distinct() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(mainz_geocode_json())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = WazeConfig {
        timeout_secs: 1,
        ..config_for_mock(&server.uri())
    };
    let calculator = WazeRouteCalculator::new(&config).unwrap();

    let err = calculator.address_to_coords(MAINZ_ADDRESS).await.unwrap_err();
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_upstream_error_surfaces_verbatim() {
    let server = MockServer::start().await;
    mount_route(
        &server,
        r#"{"error": "Internal Error: routing failed"}"#,
    )
    .await;

    let err = calculator(&server)
        .calc_route_info(MAINZ, WIESBADEN, AggregateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, WazeError::Upstream(_)));
    assert_eq!(err.to_string(), "Internal Error: routing failed");
}

#[tokio::test]
async fn test_server_error_carries_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROUTING_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend unavailable"))
        .mount(&server)
        .await;

    let err = calculator(&server)
        .calc_route_info(MAINZ, WIESBADEN, AggregateOptions::default())
        .await
        .unwrap_err();

    match err {
        WazeError::ServerError { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "backend unavailable");
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_geocode_server_error_carries_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("search unavailable"))
        .mount(&server)
        .await;

    let err = calculator(&server)
        .calc_routes(
            MAINZ_ADDRESS,
            WIESBADEN,
            &RouteOptions::default(),
            AggregateOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(err.is_retryable());
    match err {
        WazeError::ServerError { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "search unavailable");
        },
        other => panic!("unexpected error: {other:?}"),
    }

    // Routing is never attempted
    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() == SEARCH_PATH));
}

#[tokio::test]
async fn test_unparseable_body_is_empty_response() {
    let server = MockServer::start().await;
    mount_route(&server, "<html>maintenance</html>").await;

    let err = calculator(&server)
        .calc_route_info(MAINZ, WIESBADEN, AggregateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, WazeError::EmptyResponse));
    assert!(!err.is_timeout());
}

#[tokio::test]
async fn test_missing_result_list_is_wrong_response() {
    let server = MockServer::start().await;
    mount_route(&server, r#"{"response": {"routeName": "B40"}}"#).await;

    let err = calculator(&server)
        .calc_route_info(MAINZ, WIESBADEN, AggregateOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, WazeError::WrongResponse(_)));
}

#[tokio::test]
async fn test_missing_names_still_aggregate() {
    let server = MockServer::start().await;
    mount_route(
        &server,
        r#"{"response": [{"results": [{"length": 1000, "crossTime": 60, "crossTimeWithoutRealTime": 70}]}]}"#,
    )
    .await;

    let result = calculator(&server)
        .calc_route_info(MAINZ, WIESBADEN, AggregateOptions::default())
        .await
        .unwrap();

    assert_eq!(result.name, "");
    assert!(result.street_names.is_empty());
    assert_eq!(result.duration_minutes, 1.0);
    assert_eq!(result.distance_km, 1.0);
}

#[tokio::test]
async fn test_routing_query_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROUTING_PATH))
        .and(query_param("from", "x:8.262322651915843 y:50.00332659227126"))
        .and(query_param("to", "x:8.247836017342934 y:50.08414976707619"))
        .and(query_param("at", "15"))
        .and(query_param("returnJSON", "true"))
        .and(query_param("returnGeometries", "true"))
        .and(query_param("returnInstructions", "true"))
        .and(query_param("timeout", "60000"))
        .and(query_param("nPaths", "1"))
        .and(query_param(
            "options",
            "AVOID_TRAILS:t,AVOID_TOLL_ROADS:t,AVOID_FERRIES:t",
        ))
        .and(query_param("vehicleType", "TAXI"))
        .and(query_param("subscription", "*"))
        .and(header("referer", format!("{}/", server.uri()).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(single_route_json()))
        .expect(1)
        .mount(&server)
        .await;

    let options = RouteOptions::default()
        .with_vehicle_type(VehicleType::Taxi)
        .avoiding_toll_roads()
        .avoiding_ferries()
        .with_time_delta(15);

    let results = calculator(&server)
        .calc_routes(MAINZ, WIESBADEN, &options, AggregateOptions::default())
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn test_subscription_roads_avoided() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ROUTING_PATH))
        .and(query_param_is_missing("subscription"))
        .and(query_param_is_missing("vehicleType"))
        .respond_with(ResponseTemplate::new(200).set_body_string(single_route_json()))
        .expect(1)
        .mount(&server)
        .await;

    let options = RouteOptions::default().avoiding_subscription_roads();
    let results = calculator(&server)
        .calc_routes(MAINZ, WIESBADEN, &options, AggregateOptions::default())
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn test_region_selects_endpoints() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/RoutingManager/routingRequest"))
        .respond_with(ResponseTemplate::new(200).set_body_string(single_route_json()))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for_mock(&server.uri()).with_region(Region::Us);
    let calculator = WazeRouteCalculator::new(&config).unwrap();

    let result = calculator
        .calc_route_info(
            "40.7128,-74.006",
            "40.7306,-73.9352",
            AggregateOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(result.distance_km, 12.715);
}

#[tokio::test]
async fn test_shared_client_is_not_owned() {
    let server = MockServer::start().await;
    mount_route(&server, single_route_json()).await;

    let shared = reqwest::Client::new();
    let config = config_for_mock(&server.uri());

    let first = WazeRouteCalculator::with_client(&config, shared.clone()).unwrap();
    assert!(!first.owns_client());
    let result = first
        .calc_route_info(MAINZ, WIESBADEN, AggregateOptions::default())
        .await
        .unwrap();
    assert_eq!(result.duration_minutes, 18.4);
    first.close();

    // The shared client outlives the first calculator
    let second = WazeRouteCalculator::with_client(&config, shared).unwrap();
    let result = second
        .calc_route_info(MAINZ, WIESBADEN, AggregateOptions::default())
        .await
        .unwrap();
    assert_eq!(result.distance_km, 12.715);
}

#[tokio::test]
async fn test_is_healthy() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    assert!(calculator(&server).is_healthy().await);

    let unreachable = WazeRouteCalculator::new(
        &WazeConfig::for_testing().with_base_url("http://127.0.0.1:9"),
    )
    .unwrap();
    assert!(!unreachable.is_healthy().await);
}
