//! Incremental `text/event-stream` decoder.
//!
//! Bytes arrive in arbitrary chunks from the HTTP body; lines (and UTF-8
//! sequences) may be split across chunks, so raw bytes are buffered until a
//! full line is available.

/// Event name used when the stream does not set one.
pub const DEFAULT_EVENT: &str = "message";

const BOM: &str = "\u{feff}";

/// One dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event: String,
    pub data: String,
    pub id: Option<String>,
}

impl SseEvent {
    /// Whether this is an unnamed event, i.e. one `EventSource.onmessage` sees.
    pub fn is_message(&self) -> bool {
        self.event == DEFAULT_EVENT
    }
}

/// Stateful decoder fed with body chunks.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    data: Vec<String>,
    event: Option<String>,
    last_id: Option<String>,
    seen_first_line: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return every event completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        let mut start = 0;
        while let Some(offset) = self.buffer[start..].iter().position(|b| *b == b'\n') {
            let end = start + offset;
            let mut line = &self.buffer[start..end];
            if let Some(stripped) = line.strip_suffix(b"\r") {
                line = stripped;
            }
            let line = String::from_utf8_lossy(line).into_owned();
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
            start = end + 1;
        }
        self.buffer.drain(..start);
        events
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        let line = if self.seen_first_line {
            line
        } else {
            self.seen_first_line = true;
            line.strip_prefix(BOM).unwrap_or(line)
        };

        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "data" => self.data.push(value.to_string()),
            "event" => self.event = Some(value.to_string()),
            "id" if !value.contains('\0') => self.last_id = Some(value.to_string()),
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseEvent {
            event: event
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_EVENT.to_string()),
            data,
            id: self.last_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_of(events: &[SseEvent]) -> Vec<&str> {
        events.iter().map(|e| e.data.as_str()).collect()
    }

    #[test]
    fn decodes_simple_messages() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"data: Starting pipeline for AI\n\ndata: Running Fetcher Agent...\n\n");
        assert_eq!(
            data_of(&events),
            vec!["Starting pipeline for AI", "Running Fetcher Agent..."]
        );
        assert!(events.iter().all(SseEvent::is_message));
    }

    #[test]
    fn event_split_across_chunks_inside_utf8() {
        let payload = "data: ⏳ working...\n\n".as_bytes();
        // The hourglass is three bytes starting at offset 6; cut inside it.
        let (head, tail) = payload.split_at(7);

        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(head).is_empty());
        let events = decoder.feed(tail);
        assert_eq!(data_of(&events), vec!["⏳ working..."]);
    }

    #[test]
    fn byte_by_byte_feed_matches_whole_feed() {
        let stream = b"data: one\n\ndata: {\"articles\":[]}\n\n";
        let mut decoder = SseDecoder::new();
        let mut events = Vec::new();
        for byte in stream.iter() {
            events.extend(decoder.feed(std::slice::from_ref(byte)));
        }
        assert_eq!(data_of(&events), vec!["one", "{\"articles\":[]}"]);
    }

    #[test]
    fn multi_line_data_is_joined() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"data: first\ndata: second\ndata\n\n");
        assert_eq!(data_of(&events), vec!["first\nsecond\n"]);
    }

    #[test]
    fn crlf_comments_and_bom_are_handled() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"\xEF\xBB\xBF: keep-alive\r\ndata:no space\r\n\r\n");
        assert_eq!(data_of(&events), vec!["no space"]);
    }

    #[test]
    fn named_events_and_ids_are_reported() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(b"id: 7\ndata: result\n\nevent: end\ndata: done\n\n");
        assert_eq!(events.len(), 2);
        assert!(events[0].is_message());
        assert_eq!(events[0].id.as_deref(), Some("7"));
        assert_eq!(events[1].event, "end");
        assert!(!events[1].is_message());
        assert_eq!(events[1].id.as_deref(), Some("7"));
    }

    #[test]
    fn blank_lines_without_data_dispatch_nothing() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"\n\nevent: ping\n\nretry: 1000\n\n").is_empty());
        // The dangling event name does not leak into the next event.
        let events = decoder.feed(b"data: x\n\n");
        assert_eq!(events[0].event, DEFAULT_EVENT);
    }

    #[test]
    fn unterminated_event_is_not_dispatched() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed(b"data: partial\n").is_empty());
        assert!(decoder.feed(b"data: still partial").is_empty());
    }
}
