//! Extraction over a summarized conversation, with one service shared by the
//! conversation manager and the extractor.

use std::sync::Arc;

use colloquy_conversation::{ConversationConfig, ConversationManager, SUMMARY_PREFIX};
use colloquy_core::mock::MockCompletionService;
use colloquy_extraction::{ExtractionConfig, InformationExtractor};

#[tokio::test]
#[expect(clippy::expect_used, reason = "Test failure should panic with context")]
async fn test_extract_from_summarized_conversation() {
    let mock = MockCompletionService::with_replies([
        "Emma Wilson, reachable at emma.wilson@company.com, wants a business account.",
        r#"{"name": "Emma Wilson", "email": "emma.wilson@company.com", "phone": null, "age": null, "location": "Seattle"}"#,
    ]);
    let service = Arc::new(mock.clone());

    let mut manager = ConversationManager::new(
        Arc::clone(&service),
        ConversationConfig::default()
            .with_summarization_threshold(2)
            .with_preserve_recent(2),
    );
    let script = [
        ("user", "Hi, I'm Emma Wilson and I want to open a business account"),
        ("assistant", "Happy to help, Emma. What's your email?"),
        ("user", "It's emma.wilson@company.com"),
        ("assistant", "Thanks! Where is your business located?"),
        ("user", "We're based in Seattle"),
        ("assistant", "Great, Seattle it is."),
    ];
    for (role, content) in script {
        manager.add_message(role, content).expect("valid message");
    }
    assert!(manager.should_summarize());
    manager.force_summarize().await.expect("summarization succeeds");

    let text = manager.conversation_text();
    assert!(text.starts_with(SUMMARY_PREFIX));
    assert!(text.ends_with("We're based in Seattle Great, Seattle it is."));

    let extractor = InformationExtractor::new(service, ExtractionConfig::default());
    let result = extractor
        .extract_information(&text)
        .await
        .expect("extraction succeeds");

    assert_eq!(result.get("location"), Some("Seattle"));
    assert!((result.confidence_score() - 0.6).abs() < 1e-9);
    assert!(result.is_valid());

    let requests = mock.requests().await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1][1].content(), text);
}
