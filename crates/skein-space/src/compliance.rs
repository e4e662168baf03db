//! CellSpace trait compliance test helpers.
//!
//! These functions verify that a CellSpace implementation satisfies the
//! structural contract. Reused by the DiscreteSpace and Network test
//! modules.

use crate::cell::SpaceCell;
use crate::config::SpaceRng;
use crate::error::SpaceError;
use crate::space::{CellSpace, CoordOf};
use indexmap::IndexSet;
use rand::SeedableRng;

/// Assert that no connection targets an unregistered cell.
pub fn assert_no_dangling<S: CellSpace>(space: &S) {
    for coord in space.canonical_ordering() {
        let cell = space.cell(&coord).unwrap();
        for target in cell.connections().values() {
            assert!(
                space.contains(target),
                "cell {coord:?} holds a dangling connection to {target:?}"
            );
        }
    }
}

/// Assert that `a` connected to `b` implies `b` connected to `a`.
pub fn assert_connections_symmetric<S: CellSpace>(space: &S) {
    for coord in space.canonical_ordering() {
        let cell = space.cell(&coord).unwrap();
        for target in cell.connections().values() {
            let back = space.cell(target).unwrap();
            assert!(
                back.is_connected_to(&coord),
                "connection symmetry violated: {coord:?} -> {target:?} has no reverse"
            );
        }
    }
}

/// Assert that two calls to `canonical_ordering` return the same result.
pub fn assert_canonical_ordering_deterministic<S: CellSpace>(space: &S) {
    let a = space.canonical_ordering();
    let b = space.canonical_ordering();
    assert_eq!(a, b, "canonical_ordering is non-deterministic");
}

/// Assert that `canonical_ordering` returns exactly `cell_count` unique coords,
/// each resolving to a cell with the same coordinate.
pub fn assert_canonical_ordering_complete<S: CellSpace>(space: &S) {
    let ordering = space.canonical_ordering();
    assert_eq!(
        ordering.len(),
        space.cell_count(),
        "canonical_ordering length {} != cell_count {}",
        ordering.len(),
        space.cell_count()
    );
    let unique: IndexSet<_> = ordering.iter().collect();
    assert_eq!(unique.len(), ordering.len(), "canonical_ordering has duplicates");
    for coord in &ordering {
        let cell = space.cell(coord).unwrap();
        assert_eq!(cell.coordinate(), coord, "cell stored under the wrong key");
    }
}

/// Add a fresh isolated cell, connect it, disconnect it, remove it, and
/// check the space returns to its original shape.
///
/// `fresh` must not be registered. The space must hold at least one cell.
pub fn assert_mutation_roundtrip<S: CellSpace>(space: &mut S, fresh: CoordOf<S>) {
    let before = space.canonical_ordering();
    let anchor = before
        .first()
        .cloned()
        .expect("compliance needs a non-empty space");
    let anchor_connections = space.cell(&anchor).unwrap().connections().clone();

    let mut rng = SpaceRng::seed_from_u64(0);
    let cell = <S::Cell as SpaceCell>::new(fresh.clone(), None, &mut rng);
    space.add_cell(cell).unwrap();
    assert!(space.contains(&fresh));
    assert!(space.cell(&fresh).unwrap().connections().is_empty());
    assert_eq!(space.cell_count(), before.len() + 1);

    space.add_connection(&fresh, &anchor).unwrap();
    assert!(space.cell(&fresh).unwrap().is_connected_to(&anchor));
    assert_no_dangling(space);

    space.remove_connection(&fresh, &anchor).unwrap();
    assert!(!space.cell(&fresh).unwrap().is_connected_to(&anchor));
    assert!(!space.cell(&anchor).unwrap().is_connected_to(&fresh));
    assert!(
        matches!(
            space.remove_connection(&fresh, &anchor),
            Err(SpaceError::ConnectionNotFound { .. })
        ),
        "second removal of the same connection must fail"
    );

    space.add_connection(&anchor, &fresh).unwrap();
    let removed = space.remove_cell(&fresh).unwrap();
    assert_eq!(removed.coordinate(), &fresh);
    assert!(!space.cell(&anchor).unwrap().is_connected_to(&fresh));
    assert_no_dangling(space);

    assert_eq!(space.canonical_ordering(), before);
    assert_eq!(
        space.cell(&anchor).unwrap().connections(),
        &anchor_connections
    );
}

/// Assert that conflicting and missing coordinates are rejected without
/// side effects.
pub fn assert_rejections<S: CellSpace>(space: &mut S, fresh: CoordOf<S>) {
    let before = space.canonical_ordering();
    let existing = before
        .first()
        .cloned()
        .expect("compliance needs a non-empty space");

    let mut rng = SpaceRng::seed_from_u64(0);
    let dup = <S::Cell as SpaceCell>::new(existing.clone(), None, &mut rng);
    assert!(matches!(
        space.add_cell(dup),
        Err(SpaceError::DuplicateCell { .. })
    ));
    assert!(matches!(
        space.remove_cell(&fresh),
        Err(SpaceError::CellNotFound { .. })
    ));
    assert!(matches!(
        space.add_connection(&existing, &fresh),
        Err(SpaceError::CellNotFound { .. })
    ));
    assert!(matches!(
        space.remove_connection(&fresh, &existing),
        Err(SpaceError::CellNotFound { .. })
    ));
    assert_eq!(space.canonical_ordering(), before);
}

/// Run all compliance checks on a space.
pub fn run_full_compliance<S: CellSpace>(space: &mut S, fresh: CoordOf<S>) {
    assert_no_dangling(space);
    assert_canonical_ordering_deterministic(space);
    assert_canonical_ordering_complete(space);
    assert_rejections(space, fresh.clone());
    assert_mutation_roundtrip(space, fresh);
    assert_canonical_ordering_complete(space);
}
