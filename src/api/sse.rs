use std::time::Duration;

/// One dispatched server-sent event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Event name; `message` when the server sent no `event:` field
    pub event: String,
    pub data: String,
    pub id: Option<String>,
}

impl SseEvent {
    /// True for the dashboard's "something changed" signal. The server names
    /// it `update`, or sends an unnamed event whose payload is `update`.
    pub fn is_update(&self) -> bool {
        self.event == "update" || (self.event == "message" && self.data.trim() == "update")
    }
}

/// Incremental parser for `text/event-stream` bodies. Partial lines,
/// including split UTF-8 sequences, are buffered until complete, and an
/// event is emitted only after its terminating blank line.
#[derive(Debug, Default)]
pub struct SseParser {
    buf: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
    last_id: Option<String>,
    retry: Option<Duration>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconnection delay last requested by the server via `retry:`
    pub fn retry(&self) -> Option<Duration> {
        self.retry
    }

    /// Feed a chunk of the body, returning every event completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buf.extend_from_slice(chunk);
        let mut events = Vec::new();

        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
            line.pop(); // '\n'
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            let line = String::from_utf8_lossy(&line);
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }

        events
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            // comment / keep-alive
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((f, v)) => (f, v.strip_prefix(' ').unwrap_or(v)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            "id" => self.last_id = Some(value.to_string()),
            "retry" => {
                if let Ok(ms) = value.trim().parse::<u64>() {
                    self.retry = Some(Duration::from_millis(ms));
                }
            }
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event = self.event.take();
        if self.data.is_empty() {
            // A block with no data lines dispatches nothing
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseEvent {
            event: event
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| "message".to_string()),
            data,
            id: self.last_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_unnamed_update_event() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"data: update\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "message");
        assert_eq!(events[0].data, "update");
        assert!(events[0].is_update());
    }

    #[test]
    fn parses_named_update_event() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"event: update\ndata: {}\n\n");
        assert_eq!(events.len(), 1);
        assert!(events[0].is_update());
    }

    #[test]
    fn other_events_are_not_updates() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"event: ready\ndata: update\n\n");
        assert!(!events[0].is_update());
    }

    #[test]
    fn keep_alive_comments_are_ignored() {
        let mut parser = SseParser::new();
        let events = parser.feed(b": keep-alive-text\n\n");
        assert!(events.is_empty());
    }

    #[test]
    fn handles_chunk_boundaries_anywhere() {
        let mut parser = SseParser::new();
        let input = "event: update\r\ndata: h\u{e9}llo\r\n\r\n".as_bytes();
        let mut events = Vec::new();
        for byte in input {
            events.extend(parser.feed(std::slice::from_ref(byte)));
        }
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "update");
        assert_eq!(events[0].data, "h\u{e9}llo");
    }

    #[test]
    fn joins_multiline_data() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"data: one\ndata: two\nid: 9\n\n");
        assert_eq!(events[0].data, "one\ntwo");
        assert_eq!(events[0].id.as_deref(), Some("9"));
    }

    #[test]
    fn records_retry_hint() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b"retry: 3000\n\n").is_empty());
        assert_eq!(parser.retry(), Some(Duration::from_millis(3000)));
    }

    #[test]
    fn multiple_events_in_one_chunk() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"data: update\n\ndata: update\n\ndata: par");
        assert_eq!(events.len(), 2);
        let rest = parser.feed(b"tial\n\n");
        assert_eq!(rest[0].data, "partial");
    }
}
