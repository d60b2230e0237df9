//! Line-aligned splitting of long messages

/// Default chunk size, below Slack's `chat.postMessage` text limit
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 3500;

/// Split `text` into line-aligned chunks of at most `max` characters
///
/// Lines are never split: a line longer than `max` becomes its own
/// oversized chunk. Joining the chunks with `\n` reproduces `text`.
/// Length is counted in `char`s.
pub fn chunk(text: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    if text.is_empty() {
        return chunks;
    }

    let mut current: Option<(String, usize)> = None;
    for line in text.split('\n') {
        let line_len = line.chars().count();
        current = match current.take() {
            Some((mut buf, len)) if len + 1 + line_len <= max => {
                buf.push('\n');
                buf.push_str(line);
                Some((buf, len + 1 + line_len))
            }
            Some((buf, _)) => {
                chunks.push(buf);
                Some((line.to_string(), line_len))
            }
            None => Some((line.to_string(), line_len)),
        };
    }

    if let Some((buf, _)) = current {
        chunks.push(buf);
    }
    chunks
}
