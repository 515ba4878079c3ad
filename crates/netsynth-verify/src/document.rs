//! Multi-document splitting

use netsynth_common::DOCUMENT_SEPARATOR;

/// One non-empty document from a multi-document stream
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// 1-based position among the non-empty documents
    pub index: usize,
    /// Document text without the separator lines
    pub body: String,
}

/// Split text on lines that are exactly `---` (ignoring surrounding
/// whitespace). Empty and whitespace-only segments are discarded.
pub fn split_documents(text: &str) -> Vec<Document> {
    let mut segments: Vec<String> = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if line.trim() == DOCUMENT_SEPARATOR {
            segments.push(std::mem::take(&mut current));
            continue;
        }
        current.push_str(line);
        current.push('\n');
    }
    segments.push(current);

    segments
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .enumerate()
        .map(|(i, body)| Document { index: i + 1, body })
        .collect()
}
