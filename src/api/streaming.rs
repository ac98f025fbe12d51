//! Streaming Support
//!
//! Turns data-event lines into responses and merges streamed chunks.

use crate::api::response::{Choice, ChoiceContent, Response, Usage};
use std::collections::BTreeMap;

/// Prefix carried by every data event line
pub const DATA_PREFIX: &str = "data: ";

/// Parse one line of a streamed response.
///
/// Only `data: ` lines are decoded. Anything else, and any data line that is
/// not a valid response (including the `[DONE]` sentinel), yields `None`.
pub fn parse_line(line: &str) -> Option<Response> {
    let data = line.strip_prefix(DATA_PREFIX)?;

    match serde_json::from_str(data) {
        Ok(response) => Some(response),
        Err(e) => {
            tracing::trace!(error = %e, "dropping undecodable stream line");
            None
        }
    }
}

/// Accumulator for streamed responses
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    /// Response ID from the first chunk
    pub id: Option<String>,

    /// Object tag from the first chunk
    pub object: Option<String>,

    /// Created timestamp from the first chunk
    pub created: Option<i64>,

    /// Model name from the first chunk
    pub model: Option<String>,

    /// Accumulated choices keyed by the index the server sent
    pub choices: BTreeMap<u32, ChoiceAccumulator>,

    /// Usage from the last chunk that carried it
    pub usage: Option<Usage>,

    /// Number of chunks processed
    pub chunks: usize,
}

/// Accumulator for a single choice index
#[derive(Debug, Default, Clone)]
pub struct ChoiceAccumulator {
    /// Merged fragments, tagged with the source of the first one
    pub content: ChoiceContent,
    pub finish_reason: Option<String>,
}

impl ChoiceAccumulator {
    pub fn text(&self) -> &str {
        self.content.as_str()
    }
}

impl StreamAccumulator {
    /// Create a new accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a streamed response
    pub fn process(&mut self, chunk: &Response) {
        if self.chunks == 0 {
            self.id = chunk.id.clone();
            self.object = Some(chunk.object.clone());
            self.created = chunk.created;
            self.model = chunk.model.clone();
        }
        self.chunks += 1;

        if chunk.usage.is_some() {
            self.usage = chunk.usage;
        }

        for choice in &chunk.choices {
            let acc = self.choices.entry(choice.index).or_default();
            acc.content.append(&choice.content);
            if let Some(reason) = &choice.finish_reason {
                acc.finish_reason = Some(reason.clone());
            }
        }
    }

    /// Accumulated text of the lowest-indexed choice
    pub fn text(&self) -> &str {
        self.choices
            .values()
            .next()
            .map(ChoiceAccumulator::text)
            .unwrap_or("")
    }

    /// Convert into a single merged response
    pub fn into_response(self) -> Response {
        Response {
            id: self.id,
            object: self.object.unwrap_or_default(),
            created: self.created,
            model: self.model,
            choices: self
                .choices
                .into_iter()
                .map(|(index, acc)| Choice {
                    index,
                    content: acc.content,
                    finish_reason: acc.finish_reason,
                })
                .collect(),
            usage: self.usage,
        }
    }
}
