use pretty_assertions::assert_eq;

use pubs_chat::{action::Action, app::next_mode, mode::Mode, sql::QueryResult};

#[test]
fn submitting_a_question_leaves_input_mode() {
    // After Enter the transcript is focused again, so the browse keymap
    // (x, j/k, e, c) must be the one in force.
    let (mode, _) = next_mode(Mode::Input, false, &Action::SubmitQuestion("Autores de California".to_string()));
    assert_eq!(mode, Mode::Home);
}

#[test]
fn focus_results_requires_a_result_set() {
    let (mode, _) = next_mode(Mode::Home, false, &Action::FocusResults);
    assert_eq!(mode, Mode::Home);

    let (mode, _) = next_mode(Mode::Home, true, &Action::FocusResults);
    assert_eq!(mode, Mode::Results);
}

#[test]
fn query_result_enables_results_focus() {
    let result = QueryResult { headers: vec!["title".to_string()], rows: vec![vec!["book".to_string()]] };
    let (mode, has_results) = next_mode(Mode::Home, false, &Action::QueryResult(result));
    assert_eq!(mode, Mode::Home);
    assert!(has_results);
}

#[test]
fn clear_drops_results_and_leaves_results_mode() {
    let (mode, has_results) = next_mode(Mode::Results, true, &Action::ClearTranscript);
    assert_eq!(mode, Mode::Home);
    assert!(!has_results);

    let (mode, has_results) = next_mode(Mode::Home, true, &Action::ClearTranscript);
    assert_eq!(mode, Mode::Home);
    assert!(!has_results);
}

#[test]
fn focus_actions_switch_modes() {
    let (mode, _) = next_mode(Mode::Home, false, &Action::FocusInput);
    assert_eq!(mode, Mode::Input);

    let (mode, _) = next_mode(Mode::Input, false, &Action::FocusTranscript);
    assert_eq!(mode, Mode::Home);
}
