use flood_force_core::{Command, Event, InfraKind, LevelConfig, Phase, TileCoord, Verdict};
use flood_force_system_planner::{PlacementPreview, Planner, PlannerInput};
use flood_force_world::{apply, query, World};

const CONFIG: LevelConfig = LevelConfig {
    starting_resources: 1_000,
    house_count: 0,
    seed: 0,
};

fn scenario_world() -> World {
    let mut world = World::with_straight_river(10, 1, 3, CONFIG).expect("world");
    world.add_house(TileCoord::new(8, 0));
    world
}

fn drive(
    planner: &mut Planner,
    world: &mut World,
    events: &[Event],
    preview: Option<PlacementPreview>,
    input: PlannerInput,
) -> Vec<Event> {
    let mut commands = Vec::new();
    planner.handle(
        events,
        preview,
        input,
        |tile| query::infrastructure_at(world, tile).map(|snapshot| snapshot.kind),
        &mut commands,
    );
    let mut out_events = Vec::new();
    for command in commands {
        apply(world, command, &mut out_events);
    }
    out_events
}

#[test]
fn planned_barrier_survives_the_weather_phase() {
    let mut planner = Planner::default();
    let mut world = scenario_world();
    let bank = TileCoord::new(5, 0);

    let events = drive(
        &mut planner,
        &mut world,
        &[],
        Some(PlacementPreview::new(InfraKind::Barrier, bank, true)),
        PlannerInput {
            confirm_action: true,
            ..PlannerInput::default()
        },
    );
    assert!(matches!(events[0], Event::InfrastructurePlaced { .. }));
    assert_eq!(query::resources(&world), 900);

    let events = drive(
        &mut planner,
        &mut world,
        &events,
        None,
        PlannerInput {
            start_weather: true,
            ..PlannerInput::default()
        },
    );
    assert!(matches!(
        events[0],
        Event::PhaseChanged {
            phase: Phase::Weather,
        },
    ));
    let outcome = query::outcome(&world).expect("outcome");
    assert_eq!(outcome.verdict, Some(Verdict::Victory));
    assert!(!outcome.houses_flooded);
}

#[test]
fn hovered_infrastructure_can_be_demolished_through_the_planner() {
    let mut planner = Planner::default();
    let mut world = scenario_world();
    let bank = TileCoord::new(5, 0);

    let _ = drive(
        &mut planner,
        &mut world,
        &[],
        Some(PlacementPreview::new(InfraKind::Barrier, bank, true)),
        PlannerInput {
            confirm_action: true,
            ..PlannerInput::default()
        },
    );
    let events = drive(
        &mut planner,
        &mut world,
        &[],
        None,
        PlannerInput {
            remove_action: true,
            cursor_tile: Some(bank),
            ..PlannerInput::default()
        },
    );

    assert_eq!(
        events,
        vec![Event::InfrastructureRemoved {
            tile: bank,
            kind: InfraKind::Barrier,
            refund: 50,
            remaining: 950,
        }],
    );
    assert_eq!(query::infrastructure_at(&world, bank), None);
}

#[test]
fn weather_events_deactivate_the_planner() {
    let mut planner = Planner::default();
    let mut world = scenario_world();

    let weather_events = drive(
        &mut planner,
        &mut world,
        &[],
        None,
        PlannerInput {
            start_weather: true,
            ..PlannerInput::default()
        },
    );

    // Once the phase change is observed, further confirms emit nothing.
    let events = drive(
        &mut planner,
        &mut world,
        &weather_events,
        Some(PlacementPreview::new(
            InfraKind::Barrier,
            TileCoord::new(5, 0),
            true,
        )),
        PlannerInput {
            confirm_action: true,
            ..PlannerInput::default()
        },
    );
    assert!(events.is_empty());
}
