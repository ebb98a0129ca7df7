//! Incremental reader for `streamGenerateContent?alt=sse` bodies.
//! Each SSE `data:` line is one JSON response chunk; the text parts of all
//! chunks are concatenated in arrival order.

use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts joined without separators.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter().filter_map(|p| p.text.as_deref()).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct SseTextAccumulator {
    /// Bytes of a line not yet terminated by `\n`.
    pending: Vec<u8>,
    text: String,
    chunks: usize,
}

impl SseTextAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw body bytes. Lines and UTF-8 sequences may be split anywhere.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<()> {
        self.pending.extend_from_slice(bytes);
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.process_line(&line)?;
        }
        Ok(())
    }

    /// Flush any unterminated last line and return the full text.
    pub fn finish(mut self) -> Result<String> {
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.process_line(&line)?;
        }
        Ok(self.text)
    }

    pub fn chunks(&self) -> usize {
        self.chunks
    }

    fn process_line(&mut self, raw: &[u8]) -> Result<()> {
        let line = String::from_utf8_lossy(raw);
        let line = line.trim_end_matches(['\n', '\r']);
        let Some(data) = line.strip_prefix("data:") else {
            // Comments, `event:` fields and blank separators carry no text.
            return Ok(());
        };
        let data = data.trim_start();
        if data.is_empty() || data == "[DONE]" {
            return Ok(());
        }
        let chunk: GenerateContentResponse = serde_json::from_str(data)?;
        self.text.push_str(&chunk.text());
        self.chunks += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_line(text: &str) -> String {
        let chunk = serde_json::json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
        });
        format!("data: {chunk}\r\n\r\n")
    }

    #[test]
    fn concatenates_chunks_in_order() {
        let body = format!("{}{}", data_line("| Timestamp Range "), data_line("| Metric |"));
        let mut acc = SseTextAccumulator::new();
        acc.feed(body.as_bytes()).unwrap();
        assert_eq!(acc.chunks(), 2);
        assert_eq!(acc.finish().unwrap(), "| Timestamp Range | Metric |");
    }

    #[test]
    fn lines_split_across_reads() {
        let body = format!("{}{}", data_line("Ohtani homers "), data_line("at 112 mph ⚾"));
        let bytes = body.as_bytes();
        let mut acc = SseTextAccumulator::new();
        // Byte-at-a-time splits lines and the multi-byte emoji.
        for b in bytes {
            acc.feed(std::slice::from_ref(b)).unwrap();
        }
        assert_eq!(acc.finish().unwrap(), "Ohtani homers at 112 mph ⚾");
    }

    #[test]
    fn unterminated_last_line_is_flushed() {
        let body = data_line("tail");
        let trimmed = body.trim_end();
        let mut acc = SseTextAccumulator::new();
        acc.feed(trimmed.as_bytes()).unwrap();
        assert_eq!(acc.finish().unwrap(), "tail");
    }

    #[test]
    fn ignores_non_data_lines_and_empty_candidates() {
        let body = ": keep-alive\nevent: message\ndata: {\"candidates\":[]}\n\n";
        let mut acc = SseTextAccumulator::new();
        acc.feed(body.as_bytes()).unwrap();
        assert_eq!(acc.finish().unwrap(), "");
    }

    #[test]
    fn malformed_chunk_is_an_error() {
        let mut acc = SseTextAccumulator::new();
        assert!(acc.feed(b"data: {not json}\n").is_err());
    }

    #[test]
    fn joins_multiple_parts() {
        let resp: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "a" }, { "text": "b" }] } }],
            "usageMetadata": { "totalTokenCount": 3 }
        }))
        .unwrap();
        assert_eq!(resp.text(), "ab");
    }
}
