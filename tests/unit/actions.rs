use pubs_chat::action::Action;

use crate::test_utils::sample_result;

#[test]
fn test_action_creation() {
    // Test simple actions
    let _ = Action::Quit;
    let _ = Action::FocusInput;
    let _ = Action::ExecutePending;
    let _ = Action::ClearTranscript;
    let _ = Action::ExportTranscript;
    let _ = Action::TranscriptScrollUp;
    let _ = Action::TranscriptScrollDown;
}

#[test]
fn test_action_with_data() {
    // Test actions that carry data
    let question = Action::SubmitQuestion("Autores de California".to_string());
    match question {
        Action::SubmitQuestion(q) => assert_eq!(q, "Autores de California"),
        _ => panic!("Wrong action type"),
    }

    let error = Action::Error("Connection failed".to_string());
    match error {
        Action::Error(e) => assert_eq!(e, "Connection failed"),
        _ => panic!("Wrong action type"),
    }

    let sql = Action::SqlGenerated("SELECT * FROM authors".to_string());
    match sql {
        Action::SqlGenerated(s) => assert!(s.contains("FROM")),
        _ => panic!("Wrong action type"),
    }
}

#[test]
fn test_query_result_action() {
    let result = sample_result();

    let action = Action::QueryResult(result.clone());

    match action {
        Action::QueryResult(r) => {
            assert_eq!(r.headers, result.headers);
            assert_eq!(r.row_count(), 2);
            assert_eq!(r.column_count(), 3);
        }
        _ => panic!("Wrong action type"),
    }
}

#[test]
fn test_action_serialization_round_trip() {
    let action = Action::ExecuteSql("SELECT 1 FROM t".to_string());
    let json = serde_json::to_string(&action).unwrap();
    let back: Action = serde_json::from_str(&json).unwrap();
    assert_eq!(action, back);
}
