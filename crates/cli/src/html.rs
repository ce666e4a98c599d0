//! HTML writer for highlighted documents.
//!
//! Serializes a `HighlightedDocument` to a standalone HTML page:
//! paragraph per `<p>`, highlighted runs as `<mark>` with the winning
//! category's background color, and every claiming category listed in
//! the run's `title` attribute so layered codes survive in the output.
//! A coding legend is appended after the transcript.

use qualcode_coding::{Category, HighlightedDocument};

/// Render the document and appended legend as a full HTML page.
pub fn render(document: &HighlightedDocument) -> String {
    let mut out = String::new();
    out.push_str(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Coded transcript</title>\n\
         <style>body{font-family:sans-serif;max-width:52em;margin:2em auto;line-height:1.5}\
         mark{padding:0 1px}</style>\n</head>\n<body>\n",
    );

    for paragraph in document.paragraphs() {
        out.push_str("<p>");
        for run in document.runs(paragraph.index) {
            match run.shading {
                Some(category) => {
                    out.push_str(&format!(
                        "<mark style=\"background:#{}\" title=\"{}\">{}</mark>",
                        category.color(),
                        run_title(&run.categories),
                        escape(&run.text)
                    ));
                }
                None => out.push_str(&escape(&run.text)),
            }
        }
        out.push_str("</p>\n");
    }

    // Coding legend
    out.push_str("<hr>\n<p><strong>Coding legend</strong></p>\n");
    for category in Category::ALL {
        out.push_str(&format!(
            "<p>{}. {} – <mark style=\"background:#{}\">example</mark></p>\n",
            escape(category.code()),
            escape(category.title()),
            category.color()
        ));
    }

    out.push_str("</body>\n</html>\n");
    out
}

/// Title text listing every category claiming a run.
fn run_title(categories: &[Category]) -> String {
    categories
        .iter()
        .map(|c| c.code())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Minimal HTML escaping for text content and attribute values.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
