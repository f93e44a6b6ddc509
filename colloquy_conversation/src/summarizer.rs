//! Summarization prompt construction.

use colloquy_core::{Message, MessageError};

/// Prefix of the synthetic system message that carries the summary.
pub const SUMMARY_PREFIX: &str = "Summary of the conversation so far: ";

const SUMMARIZATION_INSTRUCTIONS: &str = "\
You maintain a running summary of a conversation between a user and an assistant. \
Produce one concise summary that keeps every fact the user stated (names, contact \
details, ages, locations), their open requests, and what the assistant has done \
or promised. If an existing summary is given, merge the new messages into it so \
the result replaces it entirely. Reply with the summary text only.";

/// Build the single request sent to the completion service: a system
/// instruction followed by the prior summary and the window to fold in.
pub fn build_summary_request(
    previous_summary: Option<&str>,
    window: &[Message],
    max_chars: usize,
) -> Result<Vec<Message>, MessageError> {
    let mut instructions = SUMMARIZATION_INSTRUCTIONS.to_string();
    if max_chars > 0 {
        instructions.push_str(&format!(" Keep it under {max_chars} characters."));
    }

    let mut body = String::new();
    if let Some(existing) = previous_summary {
        body.push_str("Existing summary:\n");
        body.push_str(existing);
        body.push_str("\n\nNew messages:\n");
    } else {
        body.push_str("Messages:\n");
    }
    for message in window {
        body.push_str(&format!("{}: {}\n", message.role(), message.content()));
    }

    Ok(vec![Message::system(instructions)?, Message::user(body)?])
}

pub(crate) fn summary_message(summary: &str) -> Result<Message, MessageError> {
    Message::system(format!("{SUMMARY_PREFIX}{summary}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use colloquy_core::Role;

    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn window() -> Vec<Message> {
        vec![
            Message::user("Hi, I need help setting up my account").expect("valid message"),
            Message::assistant("Sure, what's your name?").expect("valid message"),
        ]
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_request_without_existing_summary() {
        let request = build_summary_request(None, &window(), 0).expect("request builds");

        assert_eq!(request.len(), 2);
        assert_eq!(request[0].role(), Role::System);
        assert!(!request[0].content().contains("characters"));
        assert_eq!(request[1].role(), Role::User);
        assert!(request[1].content().starts_with("Messages:\n"));
        assert!(
            request[1]
                .content()
                .contains("user: Hi, I need help setting up my account")
        );
        assert!(request[1].content().contains("assistant: Sure"));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_request_merges_existing_summary() {
        let request = build_summary_request(Some("Emma wants a business account."), &window(), 400)
            .expect("request builds");

        assert!(request[0].content().contains("under 400 characters"));
        let body = request[1].content();
        assert!(body.starts_with("Existing summary:\nEmma wants a business account."));
        assert!(body.contains("New messages:\n"));
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_summary_message_prefix() {
        let message = summary_message("short").expect("valid message");
        assert_eq!(message.role(), Role::System);
        assert_eq!(message.content(), format!("{SUMMARY_PREFIX}short"));
    }
}
