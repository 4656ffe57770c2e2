//! Behavioural checks for the smoke solver
//!
//! Each test builds a small room, authors a scene and verifies a property
//! that must hold after `advance()`: authoritative sources, non-negative
//! density, clear barriers, closed walls and the quiet empty room.
//!
//! Run tests with: cargo test --test `smoke_behavior`

mod common;

use rustc_hash::FxHashSet;
use smoke_sim_core::grid::constants::ATMOSPHERIC_PRESSURE;
use smoke_sim_core::{SmokeGrid, SmokeSolver, SolverConfig, SolverError, Vec3};

fn interior_density(grid: &SmokeGrid) -> f32 {
    let dims = grid.dims();
    let mut total = 0.0;
    for z in 1..dims.nz - 1 {
        for y in 1..dims.ny - 1 {
            for x in 1..dims.nx - 1 {
                total += grid.density(x, y, z);
            }
        }
    }
    total
}

fn non_source_density(grid: &SmokeGrid) -> f32 {
    all_cells(grid)
        .filter(|&(x, y, z)| !grid.is_source(x, y, z))
        .map(|(x, y, z)| grid.density(x, y, z))
        .sum()
}

fn all_cells(grid: &SmokeGrid) -> impl Iterator<Item = (usize, usize, usize)> {
    let dims = grid.dims();
    (0..dims.len()).map(move |i| dims.coords(i))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Sources
// ═══════════════════════════════════════════════════════════════════════════════

/// Single source in the floor of a 10³ room: it keeps its density and smoke
/// reaches the first interior layer after one tick.
#[test]
fn test_source_in_floor_spreads_after_one_tick() {
    let config = SolverConfig::new(10, 10, 10, 0.05, 0.3, 1000.0, 0.00001, 0.02);
    let mut solver = SmokeSolver::new(config).unwrap();
    solver.add_source(2, 8, 0);

    solver.advance();

    let grid = solver.grid();
    assert_eq!(grid.density(2, 8, 0), 1000.0);

    let neighbours = [(1, 8, 0), (3, 8, 0), (2, 7, 0), (2, 9, 0), (2, 8, 1)];
    let reached = neighbours
        .iter()
        .filter(|&&(x, y, z)| !grid.is_barrier(x, y, z) && grid.density(x, y, z) > 0.0)
        .count();
    assert!(reached > 0, "No neighbour of the source received smoke");
    assert!(grid.density(2, 8, 1) > 0.0);
}

#[test]
fn test_sources_stay_authoritative() {
    let config = SolverConfig::new(12, 12, 12, 0.1, 3.0, 100.0, 0.00001, 0.02);
    let mut solver = SmokeSolver::new(config).unwrap();
    solver.add_source(3, 9, 3);
    solver.add_source(8, 9, 8);
    solver.add_wind(5, 5, 5, Vec3::new(2.0, 0.0, -1.0));

    for tick in 0..20 {
        solver.advance();
        let grid = solver.grid();
        assert_eq!(grid.density(3, 9, 3), 100.0, "tick {tick}");
        assert_eq!(grid.density(8, 9, 8), 100.0, "tick {tick}");
        assert_eq!(grid.velocity(3, 9, 3).y, -3.0, "tick {tick}");
        assert_eq!(grid.velocity(5, 5, 5), Vec3::new(2.0, 0.0, -1.0));
        assert_eq!(grid.density(5, 5, 5), 0.0);
    }
}

#[test]
fn test_removed_source_fades() {
    let config = SolverConfig::new(8, 8, 8, 0.1, 1.0, 50.0, 0.0001, 0.02);
    let mut solver = SmokeSolver::new(config).unwrap();
    solver.add_source(4, 4, 4);
    for _ in 0..5 {
        solver.advance();
    }
    let at_removal = solver.grid().total_density();

    solver.remove_source(4, 4, 4);
    assert!(!solver.grid().is_source(4, 4, 4));
    assert_eq!(solver.grid().density(4, 4, 4), 0.0);

    for _ in 0..40 {
        solver.advance();
    }
    let after = solver.grid().total_density();
    assert!(
        after < 0.1 * at_removal,
        "Smoke should fade once the source is gone: {at_removal:.3} -> {after:.3}"
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Density bounds
// ═══════════════════════════════════════════════════════════════════════════════

/// Without sources nothing creates smoke: diffusion and advection move it,
/// decay removes it.
#[test]
fn test_interior_density_never_grows_without_sources() {
    let config = SolverConfig::new(10, 10, 10, 0.1, 3.0, 100.0, 0.00001, 0.02);
    let mut solver = SmokeSolver::new(config).unwrap();
    for x in 4..7 {
        for y in 4..7 {
            for z in 4..7 {
                solver.grid_mut().set_density(x, y, z, 5.0);
            }
        }
    }
    solver.add_wind(2, 5, 5, Vec3::new(2.0, 0.0, 0.0));

    let mut previous = interior_density(solver.grid());
    for tick in 0..15 {
        solver.advance();
        let current = interior_density(solver.grid());
        assert!(
            current <= previous + 1e-3,
            "tick {tick}: interior density grew {previous:.4} -> {current:.4}"
        );
        previous = current;
    }
}

/// Backtracing through an expanding flow samples the same smoke from several
/// cells; with decay and diffusion off the total must still not grow.
#[test]
fn test_divergent_flow_does_not_create_smoke() {
    let config = SolverConfig::new(12, 12, 12, 0.1, 3.0, 100.0, 0.0, 0.0);
    let mut solver = SmokeSolver::new(config).unwrap();
    for x in 5..7 {
        for y in 5..7 {
            for z in 5..7 {
                solver.grid_mut().set_density(x, y, z, 5.0);
            }
        }
    }
    for x in 1..11 {
        for y in 1..11 {
            for z in 1..11 {
                let outward = Vec3::new(x as f32 - 5.5, y as f32 - 5.5, z as f32 - 5.5);
                solver.grid_mut().set_velocity(x, y, z, outward * 0.3);
            }
        }
    }

    let start = non_source_density(solver.grid());
    assert_eq!(start, 40.0);

    let mut previous = start;
    for tick in 0..10 {
        solver.advance();
        let current = non_source_density(solver.grid());
        assert!(
            current <= previous + 1e-3,
            "tick {tick}: smoke grew {previous:.4} -> {current:.4}"
        );
        previous = current;
    }
    assert!(previous > 0.0, "Smoke should be moved, not removed");
}

/// Limiting advected mass must not throttle what sources emit.
#[test]
fn test_sources_still_emit_into_divergent_flow() {
    let config = SolverConfig::new(12, 12, 12, 0.1, 3.0, 100.0, 0.0, 0.0);
    let mut solver = SmokeSolver::new(config).unwrap();
    for x in 1..11 {
        for y in 1..11 {
            for z in 1..11 {
                let outward = Vec3::new(x as f32 - 5.5, y as f32 - 5.5, z as f32 - 5.5);
                solver.grid_mut().set_velocity(x, y, z, outward * 0.3);
            }
        }
    }
    solver.add_source(5, 5, 5);

    assert_eq!(non_source_density(solver.grid()), 0.0);
    for _ in 0..3 {
        solver.advance();
        assert_eq!(solver.grid().density(5, 5, 5), 100.0);
    }
    assert!(
        non_source_density(solver.grid()) > 0.0,
        "Source should have emitted smoke"
    );
}

/// Authored cells keep their pinned values against direct writes.
#[test]
fn test_grid_writes_cannot_override_pinned_cells() {
    let config = SolverConfig::new(8, 8, 8, 0.1, 2.0, 60.0, 0.0001, 0.02);
    let mut solver = SmokeSolver::new(config).unwrap();
    solver.add_source(3, 5, 3);
    solver.add_wind(5, 3, 5, Vec3::new(1.0, 0.0, 0.0));

    let grid = solver.grid_mut();
    grid.set_density(3, 5, 3, 0.0);
    grid.set_velocity(3, 5, 3, Vec3::zeros());
    grid.set_velocity(5, 3, 5, Vec3::new(0.0, 4.0, 0.0));
    solver.advance();

    let grid = solver.grid();
    assert_eq!(grid.density(3, 5, 3), 60.0);
    assert_eq!(grid.velocity(3, 5, 3).y, -2.0);
    assert_eq!(grid.velocity(5, 3, 5), Vec3::new(1.0, 0.0, 0.0));
}

#[test]
fn test_decay_never_goes_negative() {
    let config = SolverConfig::new(9, 9, 9, 0.1, 2.0, 10.0, 0.0001, 0.5);
    let mut solver = SmokeSolver::new(config).unwrap();
    solver.add_source(4, 6, 4);
    solver.grid_mut().set_density(2, 2, 2, 0.3);

    for _ in 0..10 {
        solver.advance();
        let grid = solver.grid();
        for (x, y, z) in all_cells(grid) {
            assert!(grid.density(x, y, z) >= 0.0, "cell ({x}, {y}, {z})");
        }
        assert_eq!(grid.density(4, 6, 4), 10.0);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Barriers and walls
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_barriers_stay_clear_and_classified() {
    let config = SolverConfig::new(12, 12, 12, 0.1, 3.0, 100.0, 0.00001, 0.02);
    let mut solver = SmokeSolver::new(config).unwrap();
    solver.add_barrier_range(2..=9, 6..=6, 1..=10);
    solver.add_source(5, 8, 5);
    let flags_before = solver.grid().flags_slice().to_vec();

    for _ in 0..20 {
        solver.advance();
    }

    let grid = solver.grid();
    assert_eq!(grid.flags_slice(), flags_before.as_slice());
    for (x, y, z) in all_cells(grid) {
        if grid.is_barrier(x, y, z) {
            assert_eq!(grid.density(x, y, z), 0.0, "barrier ({x}, {y}, {z})");
        }
    }
}

/// Overlapping boxes mark exactly their union.
#[test]
fn test_barrier_boxes_mark_their_union() {
    let config = SolverConfig::new(10, 10, 10, 0.1, 3.0, 100.0, 0.00001, 0.02);
    let mut solver = SmokeSolver::new(config).unwrap();
    let boxes = [
        ((1, 4), (2, 2), (0, 9)),
        ((3, 6), (1, 3), (4, 5)),
        ((5, 5), (5, 8), (5, 5)),
        // Empty range marks nothing
        ((7, 6), (0, 9), (0, 9)),
    ];

    let mut expected = FxHashSet::default();
    for ((x0, x1), (y0, y1), (z0, z1)) in boxes {
        solver.add_barrier_range(x0..=x1, y0..=y1, z0..=z1);
        for x in x0..=x1 {
            for y in y0..=y1 {
                for z in z0..=z1 {
                    expected.insert((x, y, z));
                }
            }
        }
    }

    let grid = solver.grid();
    for cell @ (x, y, z) in all_cells(grid) {
        assert_eq!(
            grid.is_barrier(x, y, z),
            expected.contains(&cell),
            "cell ({x}, {y}, {z})"
        );
    }
    assert_eq!(solver.stats().barrier_cells, expected.len());
}

/// The shell mirrors the interior with the wall-normal component negated.
#[test]
fn test_walls_reflect_normal_velocity() {
    let config = SolverConfig::new(10, 10, 10, 0.1, 3.0, 100.0, 0.00001, 0.02);
    let mut solver = SmokeSolver::new(config).unwrap();
    solver.add_wind(5, 5, 5, Vec3::new(1.5, -2.0, 1.0));
    for _ in 0..5 {
        solver.advance();
    }

    let grid = solver.grid();
    let n = 10;
    for a in 1..n - 1 {
        for b in 1..n - 1 {
            assert_eq!(grid.velocity(0, a, b).x, -grid.velocity(1, a, b).x);
            assert_eq!(grid.velocity(n - 1, a, b).x, -grid.velocity(n - 2, a, b).x);
            assert_eq!(grid.velocity(0, a, b).y, grid.velocity(1, a, b).y);

            assert_eq!(grid.velocity(a, 0, b).y, -grid.velocity(a, 1, b).y);
            assert_eq!(grid.velocity(a, n - 1, b).y, -grid.velocity(a, n - 2, b).y);

            assert_eq!(grid.velocity(a, b, 0).z, -grid.velocity(a, b, 1).z);
            assert_eq!(grid.velocity(a, b, n - 1).z, -grid.velocity(a, b, n - 2).z);
        }
    }
    assert!(grid.velocity(1, 4, 4).x != 0.0, "Wind should reach the walls");
}

// ═══════════════════════════════════════════════════════════════════════════════
// Quiet room and configuration
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_empty_room_stays_empty() {
    let mut solver = SmokeSolver::new(SolverConfig::new(
        9, 7, 8, 0.1, 3.0, 100.0, 0.001, 0.02,
    ))
    .unwrap();

    for _ in 0..25 {
        solver.advance();
    }

    let grid = solver.grid();
    for (x, y, z) in all_cells(grid) {
        assert_eq!(grid.density(x, y, z), 0.0);
        assert_eq!(grid.velocity(x, y, z), Vec3::zeros());
        assert_eq!(grid.pressure(x, y, z), ATMOSPHERIC_PRESSURE);
    }
    assert_eq!(solver.stats().tick, 25);
}

#[test]
fn test_invalid_configuration_is_reported() {
    let err = SmokeSolver::new(SolverConfig {
        restitution: -0.5,
        ..Default::default()
    })
    .err()
    .unwrap();

    assert!(matches!(
        err,
        SolverError::InvalidParameter {
            name: "restitution",
            ..
        }
    ));
    assert!(err.to_string().starts_with("Solver parameter restitution"));

    let err = SmokeSolver::new(SolverConfig::new(10, 10, 10, 0.1, 3.0, 0.0, 0.0, 0.0))
        .err()
        .unwrap();
    assert!(matches!(
        err,
        SolverError::InvalidParameter {
            name: "source_density",
            ..
        }
    ));

    let err = SmokeSolver::new(SolverConfig::new(10, 10, 0, 0.1, 3.0, 100.0, 0.0, 0.0))
        .err()
        .unwrap();
    assert_eq!(
        err.to_string(),
        "Grid dimension nz must be at least 3, got 0"
    );
}
