//! Message formatting for terminal display.

use chrono::{DateTime, Utc};

use palaver_server::domain::Message;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format an incoming chat message
    pub fn format_message(message: &Message) -> String {
        let mut line = format!(
            "\n[{}] user {}: {}",
            Self::timestamp(message.created_at),
            message.sender_id,
            message.content
        );
        if let Some(file_url) = &message.file_url {
            line.push_str(&format!(" (attachment: {})", file_url));
        }
        line.push('\n');
        line
    }

    /// Format a typing indicator
    pub fn format_typing(username: &str, is_typing: bool) -> String {
        if is_typing {
            format!("\n* {} is typing...\n", username)
        } else {
            format!("\n* {} stopped typing\n", username)
        }
    }

    /// Format a frame the client does not understand (displayed raw rather
    /// than dropped, so protocol additions stay visible)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n< Received: {}\n", text)
    }

    fn timestamp(at: DateTime<Utc>) -> String {
        at.format("%H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use palaver_server::domain::{ChatId, DeliveryStatus, MessageId, UserId};

    use super::*;

    fn message(content: &str, file_url: Option<&str>) -> Message {
        Message {
            id: MessageId(1),
            chat_id: ChatId(7),
            sender_id: UserId(2),
            content: content.to_string(),
            file_url: file_url.map(str::to_string),
            status: DeliveryStatus::Sent,
            created_at: Utc.with_ymd_and_hms(2023, 1, 1, 12, 30, 5).unwrap(),
        }
    }

    #[test]
    fn formats_message_with_sender_and_time() {
        let result = MessageFormatter::format_message(&message("Hello, world!", None));

        assert!(result.contains("user 2"));
        assert!(result.contains("Hello, world!"));
        assert!(result.contains("12:30:05"));
        assert!(!result.contains("attachment"));
    }

    #[test]
    fn formats_message_with_attachment() {
        let result = MessageFormatter::format_message(&message("see this", Some("/up/a.png")));

        assert!(result.contains("see this"));
        assert!(result.contains("attachment: /up/a.png"));
    }

    #[test]
    fn formats_typing_states() {
        let typing = MessageFormatter::format_typing("sarah", true);
        assert!(typing.contains("sarah is typing"));

        let stopped = MessageFormatter::format_typing("sarah", false);
        assert!(stopped.contains("sarah stopped typing"));
    }

    #[test]
    fn formats_raw_message() {
        let result = MessageFormatter::format_raw_message("unknown frame");

        assert!(result.contains("Received:"));
        assert!(result.contains("unknown frame"));
    }
}
