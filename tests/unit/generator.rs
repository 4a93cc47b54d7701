use std::sync::Arc;

use pretty_assertions::assert_eq;

use pubs_chat::{
    error::ChatError,
    generator::{build_prompt, SqlGenerator},
    llm::LlmClient,
};

use crate::test_utils::MockLlm;

async fn configured(mock: MockLlm) -> SqlGenerator {
    let mut generator = SqlGenerator::new(vec![]);
    generator.configure(Arc::new(mock) as Arc<dyn LlmClient>, None).await.unwrap();
    generator
}

#[tokio::test]
async fn unconfigured_generator_always_fails() {
    let generator = SqlGenerator::new(vec![]);
    for question in ["Autores de California", "anything", ""] {
        let err = generator.generate(question).await.unwrap_err();
        assert!(matches!(err, ChatError::Unconfigured(_)), "got {err:?}");
    }
}

#[tokio::test]
async fn generate_returns_cleaned_sql() {
    let generator = configured(MockLlm::completing(
        "```sql\nSELECT au_lname FROM authors WHERE state = 'CA'\n```",
    ))
    .await;

    let sql = generator.generate("Autores de California").await.unwrap();
    assert_eq!(sql, "SELECT au_lname FROM authors WHERE state = 'CA'");
    assert!(!sql.contains("```"));
}

#[tokio::test]
async fn generate_result_always_has_select_and_from() {
    let generator = configured(MockLlm::completing("select title from titles order by ytd_sales desc")).await;

    let sql = generator.generate("Top 5 libros más vendidos").await.unwrap();
    let upper = sql.to_uppercase();
    assert!(upper.contains("SELECT"));
    assert!(upper.contains("FROM"));
    assert!(!sql.is_empty());
}

#[tokio::test]
async fn non_select_reply_is_rejected_with_offending_text() {
    let generator = configured(MockLlm::completing("DROP TABLE authors")).await;

    match generator.generate("delete everything").await.unwrap_err() {
        ChatError::InvalidSqlShape(text) => assert_eq!(text, "DROP TABLE authors"),
        other => panic!("expected InvalidSqlShape, got {other:?}"),
    }
}

#[tokio::test]
async fn trailing_statement_rides_past_the_heuristic() {
    // Documented weakness of the two-keyword check: the heuristic is a
    // substring test, not a parser.
    let generator = configured(MockLlm::completing("SELECT * FROM authors; DROP TABLE authors")).await;

    let sql = generator.generate("authors").await.unwrap();
    assert!(sql.contains("DROP TABLE"));
}

#[tokio::test]
async fn provider_failure_surfaces_as_provider_error() {
    let generator = configured(MockLlm::failing("quota exceeded")).await;

    match generator.generate("anything").await.unwrap_err() {
        ChatError::Provider(message) => assert!(message.contains("quota exceeded")),
        other => panic!("expected Provider, got {other:?}"),
    }
}

#[tokio::test]
async fn configure_with_no_models_fails() {
    let mut generator = SqlGenerator::new(vec![]);
    let err = generator
        .configure(Arc::new(MockLlm::with_models(&[])) as Arc<dyn LlmClient>, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::NoModelAvailable));
    assert!(!generator.is_configured());
}

#[tokio::test]
async fn configure_reports_selected_model() {
    let mut generator = SqlGenerator::new(vec![]);
    let model = generator
        .configure(
            Arc::new(MockLlm::with_models(&["models/gemini-1.0-pro", "models/gemini-1.5-pro-002"]))
                as Arc<dyn LlmClient>,
            None,
        )
        .await
        .unwrap();
    assert_eq!(model, "models/gemini-1.5-pro-002");
    assert_eq!(generator.model(), Some("models/gemini-1.5-pro-002"));
}

#[tokio::test]
async fn model_override_skips_listing() {
    let mut generator = SqlGenerator::new(vec![]);
    let mock = MockLlm { models: vec![], completion: Ok(String::new()), fail_listing: true };
    let model = generator
        .configure(Arc::new(mock) as Arc<dyn LlmClient>, Some("models/gemini-exp".to_string()))
        .await
        .unwrap();
    assert_eq!(model, "models/gemini-exp");
}

#[test]
fn prompt_mentions_schema_tables() {
    let prompt = build_prompt("Ventas por tienda");
    for table in ["authors", "publishers", "titles", "titleauthor", "sales", "stores"] {
        assert!(prompt.contains(table), "prompt missing table {table}");
    }
    assert!(prompt.contains("Ventas por tienda"));
}
