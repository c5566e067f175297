mod common;

use common::{click, list_of};
use notelist_core::{ListEvent, Row, RowSource, TransitionState};

fn assert_pending_hold_remove_tickets(list: &common::TestList) {
    for id in list.animation().pending_removal() {
        assert_eq!(list.animation().ticket(*id), TransitionState::Remove);
    }
}

#[test]
fn remove_then_finish_drops_exactly_one_row() {
    let mut list = list_of((1..=4).map(Row::new));
    list.on_remove_rows_requested(&[3]);
    assert_pending_hold_remove_tickets(&list);
    assert_eq!(list.source().row_count(), 4);
    assert!(list.sink().contains(&ListEvent::TransitionStarted {
        state: TransitionState::Remove,
        rows: vec![3]
    }));

    assert_eq!(list.on_animation_finished(TransitionState::Remove), vec![3]);
    assert_eq!(list.source().row_count(), 3);
    assert!(list.source().position_of(3).is_none());

    assert!(list.on_animation_finished(TransitionState::Remove).is_empty());
    assert_eq!(list.source().row_count(), 3);
}

#[test]
fn non_remove_completions_never_delete() {
    let mut list = list_of((1..=3).map(Row::new));
    list.on_remove_rows_requested(&[1, 2]);
    list.on_rows_inserted(&[3]);

    assert!(list.on_animation_finished(TransitionState::Insert).is_empty());
    assert!(list.on_animation_finished(TransitionState::MoveOut).is_empty());
    assert!(list.on_animation_finished(TransitionState::Normal).is_empty());
    assert_eq!(list.source().row_count(), 3);
    assert_eq!(list.animation().pending_removal(), &[1, 2]);
    assert_pending_hold_remove_tickets(&list);
}

#[test]
fn rows_finish_independently_of_request_order() {
    let mut list = list_of((1..=4).map(Row::new));
    list.on_remove_rows_requested(&[1]);
    list.on_remove_rows_requested(&[4]);

    assert!(list.on_row_animation_finished(4, TransitionState::Remove));
    assert_eq!(list.source().ids(), vec![1, 2, 3]);
    assert_eq!(list.animation().pending_removal(), &[1]);

    assert!(!list.on_row_animation_finished(2, TransitionState::Remove));
    assert!(list.on_row_animation_finished(1, TransitionState::Remove));
    assert_eq!(list.source().ids(), vec![2, 3]);
}

#[test]
fn disabled_animation_removes_without_waiting() {
    let mut list = list_of((1..=3).map(Row::new));
    list.set_animation_enabled(false);
    list.on_remove_rows_requested(&[2]);

    assert_eq!(list.source().ids(), vec![1, 3]);
    assert!(list.animation().pending_removal().is_empty());
    assert!(!list
        .sink()
        .iter()
        .any(|event| matches!(event, ListEvent::TransitionStarted { .. })));
}

#[test]
fn store_deleting_first_makes_completion_a_no_op() {
    let mut list = list_of((1..=3).map(Row::new));
    list.on_remove_rows_requested(&[2]);
    list.source_mut().remove(2).unwrap();

    assert!(list.on_animation_finished(TransitionState::Remove).is_empty());
    assert_eq!(list.source().ids(), vec![1, 3]);
    assert!(list.animation().pending_removal().is_empty());
}

#[test]
fn removing_selected_row_updates_selection() {
    let mut list = list_of((1..=3).map(Row::new));
    click(&mut list, 0, false);
    click(&mut list, 1, true);
    list.on_remove_rows_requested(&[2]);
    assert_eq!(list.selection().selected(), &[1, 2]);

    list.on_animation_finished(TransitionState::Remove);
    assert_eq!(list.selection().selected(), &[1]);
    assert_eq!(list.selection().current(), Some(1));
    assert_eq!(
        list.sink().last(),
        Some(&ListEvent::SelectionChanged { rows: vec![1] })
    );
}

#[test]
fn external_moves_play_move_out_then_insert() {
    let mut list = list_of((1..=3).map(Row::new));
    list.rows_about_to_be_moved(&[2]);
    assert_eq!(list.animation().ticket(2), TransitionState::MoveOut);
    list.rows_moved(&[2]);
    assert_eq!(list.animation().ticket(2), TransitionState::Insert);
    list.on_animation_finished(TransitionState::Insert);
    assert_eq!(list.animation().ticket(2), TransitionState::Normal);
}
