use super::event::{NotificationContext, NotificationEvent};

/// Renders the Telegram HTML body for an event.
///
/// `base_url` must not end with a slash; [`crate::config::ApplicationConfig`]
/// already trims it.
pub fn render_message(event: &NotificationEvent, base_url: &str) -> String {
    let sender = escape_html(event.sender_name());

    match event.context() {
        NotificationContext::ConnectionRequest => format!(
            "🤝 <b>New Connection Request</b>\n\n\
             <b>{sender}</b> wants to connect with you on CoFound.\n\n\
             <a href=\"{base_url}/connections\">View request</a>"
        ),
        NotificationContext::ConnectionAccepted => format!(
            "✅ <b>Connection Accepted</b>\n\n\
             <b>{sender}</b> accepted your connection request. You can now message each other.\n\n\
             <a href=\"{base_url}/messages\">Open messages</a>"
        ),
        NotificationContext::NewMessage { thread_id } => format!(
            "💬 <b>New Message</b>\n\n\
             <b>{sender}</b> sent you a message.\n\n\
             <a href=\"{base_url}/messages/{thread}\">Reply</a>",
            thread = urlencoding::encode(thread_id),
        ),
        NotificationContext::IdeaInterest {
            idea_id,
            idea_title,
        } => format!(
            "💡 <b>Someone is interested in your idea</b>\n\n\
             <b>{sender}</b> is interested in \"{title}\".\n\n\
             <a href=\"{base_url}/ideas/{idea}\">View idea</a>",
            title = escape_html(idea_title),
            idea = urlencoding::encode(idea_id),
        ),
    }
}

/// Escapes the characters Telegram's HTML parse mode treats as markup.
pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::UserId;

    const BASE: &str = "https://cofound.uz";

    fn target() -> UserId {
        UserId("target".to_string())
    }

    #[test]
    fn connection_request_links_to_inbox() {
        let event = NotificationEvent::connection_request(target(), "Aziz").expect("valid event");
        let text = render_message(&event, BASE);
        assert!(text.contains("New Connection Request"));
        assert!(text.contains("Aziz"));
        assert!(text.contains("href=\"https://cofound.uz/connections\""));
    }

    #[test]
    fn connection_accepted_links_to_conversations() {
        let event = NotificationEvent::connection_accepted(target(), "Aziz").expect("valid event");
        let text = render_message(&event, BASE);
        assert!(text.contains("Connection Accepted"));
        assert!(text.contains("href=\"https://cofound.uz/messages\""));
    }

    #[test]
    fn new_message_links_to_thread() {
        let event = NotificationEvent::new_message(target(), "Aziz", "thread-7").expect("valid event");
        let text = render_message(&event, BASE);
        assert!(text.contains("New Message"));
        assert!(text.contains("https://cofound.uz/messages/thread-7"));
    }

    #[test]
    fn idea_interest_links_to_idea_and_names_it() {
        let event = NotificationEvent::idea_interest(target(), "Aziz", "42", "Delivery App")
            .expect("valid event");
        let text = render_message(&event, BASE);
        assert!(text.contains("Someone is interested in your idea"));
        assert!(text.contains("Delivery App"));
        assert!(text.contains("/ideas/42"));
    }

    #[test]
    fn sender_and_title_are_escaped() {
        let event = NotificationEvent::idea_interest(target(), "<script>", "1", "A & B")
            .expect("valid event");
        let text = render_message(&event, BASE);
        assert!(text.contains("&lt;script&gt;"));
        assert!(text.contains("A &amp; B"));
        assert!(!text.contains("<script>"));
    }

    #[test]
    fn path_identifiers_are_percent_encoded() {
        let event = NotificationEvent::new_message(target(), "Aziz", "a/b c").expect("valid event");
        let text = render_message(&event, BASE);
        assert!(text.contains("/messages/a%2Fb%20c"));
    }
}
