use gardenkit_designer::HistoryState;
use proptest::prelude::*;

#[test]
fn test_history_creation() {
    let history = HistoryState::new(0);
    assert_eq!(*history.present(), 0);
    assert!(!history.can_undo());
    assert!(!history.can_redo());
}

#[test]
fn test_undo_moves_present_to_front_of_future() {
    let mut history = HistoryState::new(1);
    history.record(2);
    history.record(3);

    assert!(history.undo());
    assert!(history.undo());
    assert_eq!(*history.present(), 1);
    assert_eq!(history.future().iter().copied().collect::<Vec<_>>(), vec![2, 3]);

    assert!(history.redo());
    assert_eq!(*history.present(), 2);
    assert_eq!(history.past(), &[1]);
}

#[test]
fn test_record_clears_future() {
    let mut history = HistoryState::new("a");
    history.record("b");
    history.undo();
    history.record("c");
    assert!(!history.can_redo());
    assert_eq!(history.past(), &["a"]);
}

#[test]
fn test_undo_and_redo_on_empty_stacks_are_no_ops() {
    let mut history = HistoryState::new(7);
    assert!(!history.undo());
    assert!(!history.redo());
    assert_eq!(*history.present(), 7);
}

#[test]
fn test_limit_drops_oldest_steps() {
    let mut history = HistoryState::with_limit(0, Some(2));
    for n in 1..=5 {
        history.record(n);
    }
    assert_eq!(history.past(), &[3, 4]);
    assert_eq!(history.limit(), Some(2));
}

proptest! {
    #[test]
    fn prop_redo_after_undo_restores_present(values in prop::collection::vec(any::<i32>(), 1..20), undos in 0usize..25) {
        let mut history = HistoryState::new(0);
        for v in &values {
            history.record(*v);
        }
        for _ in 0..undos {
            history.undo();
        }
        let present = *history.present();
        let past = history.past().to_vec();

        if history.undo() {
            prop_assert!(history.redo());
        }
        prop_assert_eq!(*history.present(), present);
        prop_assert_eq!(history.past(), past.as_slice());

        // Repeated pairs change nothing either.
        for _ in 0..3 {
            if history.undo() {
                history.redo();
            }
        }
        prop_assert_eq!(*history.present(), present);
    }
}
