use hexsim::{HexMap, MapConfig, Orientation, Simulation, SimulationConfig};
use validator::ValidationErrors;

/// Get the sorted list of fields that failed validation
fn error_fields(err: anyhow::Error) -> Vec<&'static str> {
    let validation_errors = err.downcast::<ValidationErrors>().unwrap();
    let mut error_fields = validation_errors
        .errors()
        .keys()
        .copied()
        .collect::<Vec<&str>>();
    error_fields.sort_unstable();
    error_fields
}

#[test]
fn test_simulation_config_validation() {
    let config = SimulationConfig {
        seed: 0,
        map: MapConfig {
            radius: 10001, // invalid (too big)
            orientation: Orientation::PointyTop,
        },
        agents: 100001,         // invalid
        obstacle_fraction: 1.5, // invalid
        ticks: 0,               // valid (but boring)
        max_path_cost: Some(0), // valid (but nobody can move)
    };

    let err = Simulation::new(config).unwrap_err();
    assert_eq!(error_fields(err), vec!["agents", "map", "obstacle_fraction"]);
}

#[test]
fn test_negative_obstacle_fraction() {
    let config = SimulationConfig {
        seed: 0,
        obstacle_fraction: -0.1,
        ..Default::default()
    };
    let err = Simulation::new(config).unwrap_err();
    assert_eq!(error_fields(err), vec!["obstacle_fraction"]);
}

#[test]
fn test_map_config_validation() {
    let config = MapConfig {
        radius: 20000,
        ..Default::default()
    };
    let err = HexMap::from_config(&config, ()).unwrap_err();
    assert_eq!(error_fields(err), vec!["radius"]);

    let map = HexMap::from_config(
        &MapConfig {
            radius: 3,
            orientation: Orientation::PointyTop,
        },
        (),
    )
    .unwrap();
    assert_eq!(map.len(), 37);
    assert_eq!(map.orientation(), Orientation::PointyTop);
}
