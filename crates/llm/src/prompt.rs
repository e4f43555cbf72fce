//! Prompt assembly for grounded answers.

use docqa_search::SearchHit;

/// Instructions sent ahead of every question.
pub const SYSTEM_PROMPT: &str = "You are an assistant that answers questions using only the sources below. \
Each source starts with its name followed by a colon. Cite the source name in square brackets \
for every fact you use, for example [info1.txt]. If the sources do not contain the answer, \
say that you don't know.";

/// User prompt: the retrieved context, a blank line, then the question.
pub fn create_prompt(context: &str, query: &str) -> String {
    format!("{context}\n\n{query}\n")
}

/// One `sourcepage: content` line per hit, with the content flattened to a single line.
pub fn format_context(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|hit| format!("{}: {}", hit.sourcepage, hit.content.replace(['\r', '\n'], " ")))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(sourcepage: &str, content: &str) -> SearchHit {
        SearchHit {
            id: format!("{sourcepage}-0"),
            content: content.to_string(),
            category: String::new(),
            sourcepage: sourcepage.to_string(),
            sourcefile: sourcepage.to_string(),
            score: 1.0,
        }
    }

    #[test]
    fn prompt_is_context_blank_line_query() {
        assert_eq!(
            create_prompt("cells.txt: Cells divide.", "Do cells divide?"),
            "cells.txt: Cells divide.\n\nDo cells divide?\n"
        );
        assert_eq!(create_prompt("", "q"), "\n\nq\n");
    }

    #[test]
    fn context_has_one_line_per_hit() {
        let hits = [
            hit("a.txt", "First line.\nSecond line."),
            hit("b.txt", "Other."),
        ];
        assert_eq!(
            format_context(&hits),
            "a.txt: First line. Second line.\nb.txt: Other."
        );
        assert_eq!(format_context(&[]), "");
    }
}
