#![allow(dead_code)]

use chrono::{DateTime, FixedOffset};
use responder_core::loading::{EdgeRecord, MapData, NodeRecord};
use responder_core::{
    Coordinate, RouteEngine, RouteEngineConfig, RouteResult, ServiceCategory, ServiceLocation,
};

pub const ORIGIN: Coordinate = Coordinate {
    lat: 40.7128,
    lon: -74.0060,
};

pub fn node(id: &str, lat: f64, lon: f64) -> NodeRecord {
    NodeRecord {
        id: id.into(),
        lat,
        lon,
    }
}

pub fn road(id: &str, from: &str, to: &str, name: &str, length_m: f64, base_time_s: f64) -> EdgeRecord {
    EdgeRecord {
        id: id.into(),
        from: from.into(),
        to: to.into(),
        name: Some(name.into()),
        length_m: Some(length_m),
        base_time_s: Some(base_time_s),
        speed_kmh: None,
        traffic_multiplier: None,
        bidirectional: true,
    }
}

/// Lower Manhattan toy network.
///
/// - ambulance: 500m east/south of the origin via Current St and Emergency Ave, 60s
/// - hospital: 800m via Main St and Medical Center Dr, 120s
/// - police: 800m straight up Main St, 110s
/// - an island with the fire station that no road connects to
pub fn downtown_map() -> MapData {
    MapData {
        nodes: vec![
            node("origin", 40.7128, -74.0060),
            node("main-1", 40.7146, -74.0060),
            node("medical-1", 40.7146, -74.0012),
            node("hospital", 40.7164, -74.0012),
            node("current-1", 40.7128, -74.0024),
            node("ambulance", 40.7110, -74.0024),
            node("police", 40.7200, -74.0060),
            node("island-1", 40.7400, -74.0400),
            node("island-2", 40.7410, -74.0400),
        ],
        edges: vec![
            road("main-a", "origin", "main-1", "Main St", 200.0, 30.0),
            road("medical-a", "main-1", "medical-1", "Medical Center Dr", 400.0, 60.0),
            road("medical-b", "medical-1", "hospital", "Medical Center Dr", 200.0, 30.0),
            road("current-a", "origin", "current-1", "Current St", 300.0, 36.0),
            road("emergency-a", "current-1", "ambulance", "Emergency Ave", 200.0, 24.0),
            road("main-b", "main-1", "police", "Main St", 600.0, 80.0),
            road("island-a", "island-1", "island-2", "Harbor Rd", 110.0, 15.0),
        ],
    }
}

pub fn service(id: &str, name: &str, category: ServiceCategory, lat: f64, lon: f64) -> ServiceLocation {
    ServiceLocation {
        id: id.into(),
        name: name.into(),
        category,
        coordinate: Coordinate { lat, lon },
        address: format!("{name} address"),
        phone: "+1-555-0123".into(),
        available: true,
    }
}

pub fn downtown_services() -> Vec<ServiceLocation> {
    vec![
        service(
            "hospital-1",
            "City General Hospital",
            ServiceCategory::Hospital,
            40.7164,
            -74.0012,
        ),
        service(
            "ambulance-1",
            "Rapid Response Unit 7",
            ServiceCategory::Ambulance,
            40.7110,
            -74.0024,
        ),
        service(
            "police-1",
            "Police Station 14",
            ServiceCategory::Police,
            40.7200,
            -74.0060,
        ),
        service(
            "fire-1",
            "Harbor Fire Company",
            ServiceCategory::Fire,
            40.7410,
            -74.0400,
        ),
        // ~54km north, outside the default search radius
        service(
            "hospital-2",
            "Emergency Medical Center",
            ServiceCategory::Hospital,
            41.2000,
            -74.0060,
        ),
    ]
}

pub fn find<'a>(services: &'a [ServiceLocation], id: &str) -> &'a ServiceLocation {
    services
        .iter()
        .find(|service| service.id == id)
        .expect("fixture service")
}

pub fn downtown_engine() -> RouteEngine {
    RouteEngine::from_map_data(&downtown_map(), RouteEngineConfig::default())
        .expect("fixture map is valid")
}

/// `size` x `size` grid of two-way streets, 0.001 degrees apart.
///
/// Rows are `Street <r>`, columns `Avenue <c>`; node ids are `g-<r>-<c>`.
pub fn grid_map(size: usize, origin: Coordinate) -> MapData {
    let mut nodes = Vec::with_capacity(size * size);
    let mut edges = Vec::new();
    for r in 0..size {
        for c in 0..size {
            nodes.push(node(
                &format!("g-{r}-{c}"),
                origin.lat - 0.001 * r as f64,
                origin.lon + 0.001 * c as f64,
            ));
            if c + 1 < size {
                edges.push(grid_edge(
                    format!("s-{r}-{c}"),
                    format!("g-{r}-{c}"),
                    format!("g-{r}-{}", c + 1),
                    format!("Street {r}"),
                ));
            }
            if r + 1 < size {
                edges.push(grid_edge(
                    format!("a-{r}-{c}"),
                    format!("g-{r}-{c}"),
                    format!("g-{}-{c}", r + 1),
                    format!("Avenue {c}"),
                ));
            }
        }
    }
    MapData { nodes, edges }
}

fn grid_edge(id: String, from: String, to: String, name: String) -> EdgeRecord {
    EdgeRecord {
        id,
        from,
        to,
        name: Some(name),
        length_m: Some(100.0),
        base_time_s: Some(10.0),
        speed_kmh: None,
        traffic_multiplier: None,
        bidirectional: true,
    }
}

pub fn grid_service(size: usize, origin: Coordinate) -> ServiceLocation {
    let corner = size - 1;
    service(
        "hospital-grid",
        "Grid Hospital",
        ServiceCategory::Hospital,
        origin.lat - 0.001 * corner as f64,
        origin.lon + 0.001 * corner as f64,
    )
}

pub fn departure() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2024-05-01T16:19:00-04:00").expect("valid timestamp")
}

pub fn step_distance_sum(result: &RouteResult) -> f64 {
    result.route.iter().map(|step| step.distance).sum()
}
