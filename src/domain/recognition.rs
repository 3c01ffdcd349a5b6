//! Recognition job states, results and outcomes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a read operation as reported by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReadStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
    /// Anything the service reports that we do not know about
    #[serde(other)]
    Unknown,
}

impl ReadStatus {
    /// Pending statuses keep the poll loop going; every other status is terminal.
    pub fn is_pending(self) -> bool {
        matches!(self, ReadStatus::NotStarted | ReadStatus::Running)
    }
}

impl fmt::Display for ReadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReadStatus::NotStarted => "notStarted",
            ReadStatus::Running => "running",
            ReadStatus::Succeeded => "succeeded",
            ReadStatus::Failed => "failed",
            ReadStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// One recognized line of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub text: String,
}

/// An ordered group of lines (one page of the image)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBlock {
    pub lines: Vec<TextLine>,
}

impl TextBlock {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines
                .into_iter()
                .map(|text| TextLine { text: text.into() })
                .collect(),
        }
    }
}

/// Snapshot of a read operation. `blocks` is empty until the job succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOperation {
    pub status: ReadStatus,
    pub blocks: Vec<TextBlock>,
}

impl ReadOperation {
    pub fn pending(status: ReadStatus) -> Self {
        Self {
            status,
            blocks: Vec::new(),
        }
    }
}

/// Flatten blocks into a single string.
///
/// Every line is appended after a single space, so the result starts with a
/// space. Existing clients depend on that exact shape.
pub fn flatten_lines(blocks: &[TextBlock]) -> String {
    let mut result = String::new();
    for line in blocks.iter().flat_map(|block| block.lines.iter()) {
        result.push(' ');
        result.push_str(&line.text);
    }
    result
}

/// What came out of one recognition request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionOutcome {
    /// Job succeeded and produced at least one line
    Text(String),
    /// Job succeeded but found nothing
    Empty,
    /// Job reached a terminal status other than success
    Failed(ReadStatus),
    /// Job was still pending after the last allowed status check
    TimedOut { attempts: u32 },
}

impl RecognitionOutcome {
    /// Build the outcome for a terminal operation.
    pub fn from_terminal(operation: &ReadOperation) -> Self {
        if operation.status != ReadStatus::Succeeded {
            return RecognitionOutcome::Failed(operation.status);
        }

        if operation.blocks.iter().all(|block| block.lines.is_empty()) {
            RecognitionOutcome::Empty
        } else {
            RecognitionOutcome::Text(flatten_lines(&operation.blocks))
        }
    }

    /// Historical string contract: the text on success, "" for everything else.
    pub fn legacy_text(&self) -> &str {
        match self {
            RecognitionOutcome::Text(text) => text,
            _ => "",
        }
    }
}
