mod common;

use approx::assert_abs_diff_eq;
use common::{ORIGIN, downtown_engine, downtown_services};
use responder_core::loading::MapData;
use responder_core::{
    CancelFlag, Coordinate, Error, RouteEngine, RouteEngineConfig, ServiceCategory,
};

#[test]
fn closest_by_travel_time_wins() {
    let engine = downtown_engine();
    let services = downtown_services();

    let nearest = engine
        .find_nearest_services(ORIGIN, &services, None, 1, &CancelFlag::new())
        .expect("nearest services");

    assert_eq!(nearest.len(), 1);
    assert_eq!(nearest[0].service.id, "ambulance-1");
    assert_abs_diff_eq!(nearest[0].distance, 500.0, epsilon = 1e-6);
    assert_abs_diff_eq!(nearest[0].duration, 60.0, epsilon = 1e-6);
}

#[test]
fn results_are_sorted_and_skip_unreachable_services() {
    let engine = downtown_engine();
    let services = downtown_services();

    let nearest = engine
        .find_nearest_services(ORIGIN, &services, None, 10, &CancelFlag::new())
        .unwrap();

    let ids: Vec<_> = nearest.iter().map(|n| n.service.id.as_str()).collect();
    // fire-1 sits on an island, hospital-2 is outside the radius
    assert_eq!(ids, ["ambulance-1", "police-1", "hospital-1"]);
    assert!(
        nearest
            .windows(2)
            .all(|pair| pair[0].duration <= pair[1].duration)
    );
}

#[test]
fn category_filter_is_respected() {
    let engine = downtown_engine();
    let services = downtown_services();

    let nearest = engine
        .find_nearest_services(
            ORIGIN,
            &services,
            Some(ServiceCategory::Hospital),
            5,
            &CancelFlag::new(),
        )
        .unwrap();

    assert_eq!(nearest.len(), 1);
    assert!(
        nearest
            .iter()
            .all(|n| n.service.category == ServiceCategory::Hospital)
    );
}

#[test]
fn unreachable_only_category_returns_empty_list() {
    let engine = downtown_engine();
    let services = downtown_services();

    let nearest = engine
        .find_nearest_services(
            ORIGIN,
            &services,
            Some(ServiceCategory::Fire),
            3,
            &CancelFlag::new(),
        )
        .unwrap();

    assert!(nearest.is_empty());
}

#[test]
fn empty_or_filtered_out_candidates_fail() {
    let engine = downtown_engine();

    let err = engine
        .find_nearest_services(ORIGIN, &[], None, 3, &CancelFlag::new())
        .unwrap_err();
    assert!(matches!(err, Error::NoServicesAvailable));

    let mut services = downtown_services();
    services.retain(|s| s.category != ServiceCategory::Police);
    let err = engine
        .find_nearest_services(
            ORIGIN,
            &services,
            Some(ServiceCategory::Police),
            3,
            &CancelFlag::new(),
        )
        .unwrap_err();
    assert!(matches!(err, Error::NoServicesAvailable));
}

#[test]
fn unavailable_services_are_not_candidates() {
    let engine = downtown_engine();
    let mut services = downtown_services();
    for service in &mut services {
        if service.id == "ambulance-1" {
            service.available = false;
        }
    }

    let nearest = engine
        .find_nearest_services(ORIGIN, &services, None, 1, &CancelFlag::new())
        .unwrap();
    assert_eq!(nearest[0].service.id, "police-1");

    let err = engine
        .find_nearest_services(
            ORIGIN,
            &services,
            Some(ServiceCategory::Ambulance),
            1,
            &CancelFlag::new(),
        )
        .unwrap_err();
    assert!(matches!(err, Error::NoServicesAvailable));
}

#[test]
fn equal_durations_and_distances_tie_break_on_id() {
    let engine = downtown_engine();
    let mut twin = common::find(&downtown_services(), "ambulance-1").clone();
    twin.id = "ambulance-0".into();
    let services = vec![common::find(&downtown_services(), "ambulance-1").clone(), twin];

    let nearest = engine
        .find_nearest_services(ORIGIN, &services, None, 2, &CancelFlag::new())
        .unwrap();
    let ids: Vec<_> = nearest.iter().map(|n| n.service.id.as_str()).collect();
    assert_eq!(ids, ["ambulance-0", "ambulance-1"]);
}

#[test]
fn equal_durations_rank_shorter_path_first() {
    // both stations are a 60 s drive away; the expressway is three times longer
    let map = MapData {
        nodes: vec![
            common::node("origin", ORIGIN.lat, ORIGIN.lon),
            common::node("west", ORIGIN.lat, ORIGIN.lon - 0.003),
            common::node("east", ORIGIN.lat, ORIGIN.lon + 0.003),
        ],
        edges: vec![
            common::road("slow-ln", "origin", "west", "Slow Ln", 300.0, 60.0),
            common::road("expressway", "origin", "east", "Expressway", 900.0, 60.0),
        ],
    };
    let engine = RouteEngine::from_map_data(&map, RouteEngineConfig::default()).unwrap();
    let services = vec![
        common::service(
            "ambulance-a",
            "Expressway Unit",
            ServiceCategory::Ambulance,
            ORIGIN.lat,
            ORIGIN.lon + 0.003,
        ),
        common::service(
            "ambulance-z",
            "Slow Lane Unit",
            ServiceCategory::Ambulance,
            ORIGIN.lat,
            ORIGIN.lon - 0.003,
        ),
    ];

    let nearest = engine
        .find_nearest_services(ORIGIN, &services, None, 2, &CancelFlag::new())
        .unwrap();

    let ids: Vec<_> = nearest.iter().map(|n| n.service.id.as_str()).collect();
    assert_eq!(ids, ["ambulance-z", "ambulance-a"]);
    assert_abs_diff_eq!(nearest[0].duration, nearest[1].duration, epsilon = 1e-9);
    assert_abs_diff_eq!(nearest[0].distance, 300.0, epsilon = 1e-6);
    assert_abs_diff_eq!(nearest[1].distance, 900.0, epsilon = 1e-6);
}

#[test]
fn invalid_origin_is_rejected_first() {
    let engine = downtown_engine();
    let origin = Coordinate {
        lat: 95.0,
        lon: -74.0,
    };

    // even with no services the coordinate check comes first
    let err = engine
        .find_nearest_services(origin, &[], None, 1, &CancelFlag::new())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidCoordinate { lat, .. } if lat == 95.0));
}

#[test]
fn zero_limit_is_an_argument_error() {
    let engine = downtown_engine();
    let err = engine
        .find_nearest_services(ORIGIN, &downtown_services(), None, 0, &CancelFlag::new())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
}

#[test]
fn origin_far_from_any_road_fails() {
    let engine = downtown_engine();
    let origin = Coordinate::new(40.9, -74.0).unwrap();
    let err = engine
        .find_nearest_services(origin, &downtown_services(), None, 1, &CancelFlag::new())
        .unwrap_err();
    assert!(matches!(err, Error::OriginOffNetwork));
}

#[test]
fn cancelled_query_stops() {
    let engine = downtown_engine();
    let cancel = CancelFlag::new();
    cancel.cancel();

    let err = engine
        .find_nearest_services(ORIGIN, &downtown_services(), None, 1, &cancel)
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}
