use pretty_assertions::assert_eq;
use rstest::rstest;

use pubs_chat::generator::{select_model, DEFAULT_PREFERRED_MODELS};

fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[rstest]
#[case(
    &["models/gemini-pro", "models/gemini-1.5-pro-001"],
    Some("models/gemini-1.5-pro-001")
)]
#[case(
    &["models/gemini-1.0-pro", "models/gemini-1.5-flash"],
    Some("models/gemini-1.5-flash")
)]
#[case(&["models/gemini-pro"], Some("models/gemini-pro"))]
#[case(&[], None)]
fn preference_order_wins(#[case] available: &[&str], #[case] expected: Option<&str>) {
    let preferred = strings(&DEFAULT_PREFERRED_MODELS);
    assert_eq!(select_model(&preferred, &strings(available)), expected.map(|s| s.to_string()));
}

#[test]
fn falls_back_to_first_available_when_nothing_matches() {
    let preferred = strings(&DEFAULT_PREFERRED_MODELS);
    let available = strings(&["models/chat-bison", "models/text-bison"]);
    assert_eq!(select_model(&preferred, &available), Some("models/chat-bison".to_string()));
}

#[test]
fn preferred_matching_is_substring_based() {
    // Versioned names still match the bare preference entry.
    let preferred = strings(&["gemini-1.5-pro"]);
    let available = strings(&["models/gemini-1.5-pro-exp-0801"]);
    assert_eq!(select_model(&preferred, &available), Some("models/gemini-1.5-pro-exp-0801".to_string()));
}

#[test]
fn empty_preference_list_takes_first_available() {
    let available = strings(&["models/a", "models/b"]);
    assert_eq!(select_model(&[], &available), Some("models/a".to_string()));
}
