use theatre_domain::Message;

/// One transcript line: `"{character}: {content}"`.
pub fn render_message(message: &Message) -> String {
    format!("{}: {}", message.character, message.content)
}
