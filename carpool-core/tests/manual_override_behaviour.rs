//! Behavioural tests for manual overrides and draft saving.

use std::cell::RefCell;

use carpool_core::test_support::{MemoryStore, TEST_WEEK, driver, rider, submitted};
use carpool_core::{
    AssignmentResult, AssignmentStore, Destination, Draft, MoveOutcome, StoreError, WeekId,
    apply_move_with_outcome, assign, save_result,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

/// Shared state for override scenarios.
#[derive(Debug)]
struct OverrideWorld {
    store: MemoryStore,
    result: RefCell<AssignmentResult>,
    moved: RefCell<Option<(AssignmentResult, MoveOutcome)>>,
    draft: RefCell<Option<Draft>>,
    save_error: RefCell<Option<StoreError>>,
}

impl OverrideWorld {
    fn new() -> Self {
        Self {
            store: MemoryStore::default(),
            result: RefCell::new(AssignmentResult::empty()),
            moved: RefCell::new(None),
            draft: RefCell::new(None),
            save_error: RefCell::new(None),
        }
    }

    fn week() -> WeekId {
        WeekId::new(TEST_WEEK)
    }

    fn with_draft<T>(&self, f: impl FnOnce(&mut Draft) -> T) -> T {
        let mut borrowed = self.draft.borrow_mut();
        let draft = borrowed.as_mut().expect("a draft should exist");
        f(draft)
    }

    fn save_draft(&self) {
        let outcome = self.with_draft(|draft| {
            let saved = save_result(
                &self.store,
                &Self::week(),
                draft.current(),
                "organiser",
                submitted(60),
            );
            if saved.is_ok() {
                draft.mark_saved();
            }
            saved
        });
        self.save_error.replace(outcome.err());
    }
}

#[fixture]
fn world() -> OverrideWorld {
    OverrideWorld::new()
}

#[given("a full car and one unassigned rider")]
fn given_full_car(world: &OverrideWorld) {
    let signups = vec![
        driver("d1", "Tower A", 2, 0),
        rider("r1", "Tower A", 1),
        rider("r2", "Plaza", 2),
    ];
    world
        .result
        .replace(assign(&signups, &OverrideWorld::week()));
}

#[given("a draft of a computed week")]
fn given_draft(world: &OverrideWorld) {
    let signups = vec![
        driver("d1", "Village", 3, 0),
        rider("r1", "Village", 1),
        rider("r2", "Village North", 2),
    ];
    let computed = assign(&signups, &OverrideWorld::week());
    world.result.replace(computed.clone());
    world
        .draft
        .replace(Some(Draft::new(OverrideWorld::week(), computed)));
}

#[given("the store is offline")]
fn given_offline(world: &OverrideWorld) {
    world.store.set_available(false);
}

#[when("the unassigned rider is moved onto the full car")]
fn when_moved_onto_full(world: &OverrideWorld) {
    let moved = apply_move_with_outcome(
        &world.result.borrow(),
        &"r2".into(),
        &Destination::Car(0),
    );
    world.moved.replace(Some(moved));
}

#[when("a rider is moved to the unassigned pool")]
fn when_moved_to_pool(world: &OverrideWorld) {
    let outcome = world.with_draft(|draft| draft.apply(&"r2".into(), &Destination::Unassigned));
    assert!(matches!(outcome, MoveOutcome::Placed(_)));
}

#[when("the draft is cancelled")]
fn when_cancelled(world: &OverrideWorld) {
    world.with_draft(Draft::cancel);
}

#[when("the draft is saved")]
fn when_saved(world: &OverrideWorld) {
    world.save_draft();
}

#[when("the store comes back and the draft is saved")]
fn when_store_returns(world: &OverrideWorld) {
    world.store.set_available(true);
    world.save_draft();
}

#[then("the full car is unchanged")]
fn then_car_unchanged(world: &OverrideWorld) {
    let moved = world.moved.borrow();
    let (result, outcome) = moved.as_ref().expect("a move should be applied");
    assert_eq!(*outcome, MoveOutcome::Redirected { requested: 0 });
    assert_eq!(result.assignments(), world.result.borrow().assignments());
}

#[then("the rider is still unassigned")]
fn then_rider_waits(world: &OverrideWorld) {
    let moved = world.moved.borrow();
    let (result, _) = moved.as_ref().expect("a move should be applied");
    let waiting: Vec<&str> = result
        .unassigned_riders()
        .iter()
        .map(|signup| signup.id.as_str())
        .collect();
    assert_eq!(waiting, ["r2"]);
}

#[then("the draft matches the computed week")]
fn then_draft_matches(world: &OverrideWorld) {
    let expected = world.result.borrow().clone();
    world.with_draft(|draft| {
        assert!(!draft.is_dirty());
        assert_eq!(draft.current(), &expected);
    });
}

#[then("the save fails and the draft stays dirty")]
fn then_save_failed(world: &OverrideWorld) {
    assert!(matches!(
        world.save_error.borrow().as_ref(),
        Some(StoreError::Unavailable { .. })
    ));
    assert!(world.with_draft(|draft| draft.is_dirty()));
}

#[then("the stored assignment matches the draft")]
fn then_stored(world: &OverrideWorld) {
    assert!(world.save_error.borrow().is_none());
    let stored = world
        .store
        .load(&OverrideWorld::week())
        .expect("store is online")
        .expect("document saved");
    world.with_draft(|draft| {
        assert!(!draft.is_dirty());
        assert_eq!(&stored.assignments, draft.current());
    });
    assert_eq!(stored.created_by, "organiser");
}

#[scenario(path = "tests/features/manual_override.feature", index = 0)]
fn full_car_redirect(world: OverrideWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/manual_override.feature", index = 1)]
fn cancel_draft(world: OverrideWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/manual_override.feature", index = 2)]
fn retry_failed_save(world: OverrideWorld) {
    let _ = world;
}
