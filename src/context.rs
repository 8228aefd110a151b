//! Prompt context assembled from retrieved chunks.

use crate::store::Chunk;

/// Separator between chunk entries. Chunk text is only trimmed at its ends,
/// so a blank line inside a chunk survives and also looks like a separator.
pub const CHUNK_SEPARATOR: &str = "\n\n";

/// Source tag for a chunk: `[type | title]`, `[type]`, or `[source]`.
pub fn source_tag(chunk: &Chunk) -> String {
    let doc = chunk.document.as_ref();
    let source_type = doc
        .and_then(|d| d.source_type.as_deref())
        .filter(|s| !s.is_empty());
    let title = doc
        .and_then(|d| d.title.as_deref())
        .filter(|t| !t.is_empty());

    match (source_type, title) {
        (Some(kind), Some(title)) => format!("[{} | {}]", kind, title),
        (Some(kind), None) => format!("[{}]", kind),
        (None, _) => "[source]".to_string(),
    }
}

/// Render chunks as tagged paragraphs separated by blank lines.
pub fn build_context<'a, I>(chunks: I) -> String
where
    I: IntoIterator<Item = &'a Chunk>,
{
    chunks
        .into_iter()
        .map(|c| format!("{} {}", source_tag(c), c.content.trim()))
        .collect::<Vec<_>>()
        .join(CHUNK_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chunk(doc: serde_json::Value, content: &str) -> Chunk {
        serde_json::from_value(json!({"id": "c", "content": content, "rag_documents": doc}))
            .unwrap()
    }

    #[test]
    fn test_empty_input_gives_empty_context() {
        let chunks: Vec<Chunk> = Vec::new();
        assert_eq!(build_context(&chunks), "");
    }

    #[test]
    fn test_source_tags() {
        let titled = chunk(json!({"source_type": "hospital", "title": "Gangnam Clinic"}), "x");
        let untitled = chunk(json!({"source_type": "treatment", "title": ""}), "x");
        let bare = chunk(json!(null), "x");
        let untyped = chunk(json!({"title": "Orphan"}), "x");

        assert_eq!(source_tag(&titled), "[hospital | Gangnam Clinic]");
        assert_eq!(source_tag(&untitled), "[treatment]");
        assert_eq!(source_tag(&bare), "[source]");
        assert_eq!(source_tag(&untyped), "[source]");
    }

    #[test]
    fn test_chunks_are_trimmed_and_separated() {
        let chunks = vec![
            chunk(json!({"source_type": "treatment"}), "  Rhinoplasty, dental implants.\n"),
            chunk(json!({"source_type": "hospital"}), "Partner clinics in Seoul."),
            chunk(json!(null), "HEALO concierge."),
        ];
        let context = build_context(&chunks);
        assert_eq!(
            context,
            "[treatment] Rhinoplasty, dental implants.\n\n[hospital] Partner clinics in Seoul.\n\n[source] HEALO concierge."
        );
        assert_eq!(context.matches(CHUNK_SEPARATOR).count(), chunks.len() - 1);
    }

    #[test]
    fn test_inner_blank_lines_are_kept() {
        let chunks = vec![
            chunk(json!({"source_type": "treatment"}), "Rhinoplasty.\n\nRecovery takes a week.\n"),
            chunk(json!({"source_type": "hospital"}), "Gangnam clinic."),
        ];
        let context = build_context(&chunks);
        assert_eq!(
            context,
            "[treatment] Rhinoplasty.\n\nRecovery takes a week.\n\n[hospital] Gangnam clinic."
        );
        // One boundary between chunks plus the blank line inside the first.
        assert_eq!(context.matches(CHUNK_SEPARATOR).count(), 2);
        assert_eq!(context.matches("\n\n[").count(), chunks.len() - 1);
    }
}
