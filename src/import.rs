//! Loads FTML and Markdown files into a tag [`Document`].
//!
//! Structure that has no counterpart here (headings, lists, quotes,
//! checklists) is flattened into one paragraph per line of text.

use std::{
    fs,
    io::Cursor,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::{info, warn};
use tdoc::{ChecklistItem, Paragraph, ParagraphType, Span, markdown, parse};

use crate::document::{Document, Node};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    Ftml,
    Markdown,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("md") | Some("markdown") | Some("mkd") | Some("mdown") | Some("mdtxt") => {
                DocumentFormat::Markdown
            }
            _ => DocumentFormat::Ftml,
        }
    }
}

/// Reads `path` if it exists. Parse failures fall back to an empty document
/// and come back as a status message instead of an error.
pub fn load_document(path: &PathBuf) -> Result<(Document, Option<String>)> {
    if !path.exists() {
        info!("{} does not exist, starting empty", path.display());
        return Ok((Document::new(), Some("New document".to_string())));
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let parsed = match DocumentFormat::from_path(path) {
        DocumentFormat::Ftml => parse(Cursor::new(content))
            .map_err(|err| -> Box<dyn std::error::Error + Send + Sync> { Box::new(err) }),
        DocumentFormat::Markdown => markdown::parse(Cursor::new(content)),
    };
    match parsed {
        Ok(doc) => Ok((from_tdoc(&doc), None)),
        Err(err) => {
            warn!("failed to parse {}: {err}", path.display());
            let message = format!("Parse error: {err}. Starting with empty document.");
            Ok((Document::new(), Some(message)))
        }
    }
}

pub fn from_tdoc(doc: &tdoc::Document) -> Document {
    let mut blocks = Vec::new();
    for paragraph in &doc.paragraphs {
        flatten_paragraph(paragraph, &mut blocks);
    }
    if blocks.is_empty() {
        return Document::new();
    }
    Document::empty().with_blocks(blocks)
}

fn flatten_paragraph(paragraph: &Paragraph, out: &mut Vec<Node>) {
    let holds_text = matches!(
        paragraph.paragraph_type(),
        ParagraphType::Text
            | ParagraphType::Header1
            | ParagraphType::Header2
            | ParagraphType::Header3
            | ParagraphType::CodeBlock
    );
    if holds_text || !paragraph.content().is_empty() {
        push_lines(&spans_text(paragraph.content()), out);
    }
    for child in paragraph.children() {
        flatten_paragraph(child, out);
    }
    for entry in paragraph.entries() {
        for child in entry {
            flatten_paragraph(child, out);
        }
    }
    if paragraph.paragraph_type() == ParagraphType::Checklist {
        for item in paragraph.checklist_items() {
            flatten_checklist_item(item, out);
        }
    }
}

fn flatten_checklist_item(item: &ChecklistItem, out: &mut Vec<Node>) {
    push_lines(&spans_text(&item.content), out);
    for child in &item.children {
        flatten_checklist_item(child, out);
    }
}

fn push_lines(text: &str, out: &mut Vec<Node>) {
    for line in text.split('\n') {
        out.push(Node::paragraph_text(line.trim_end_matches('\r')));
    }
}

fn spans_text(spans: &[Span]) -> String {
    let mut text = String::new();
    for span in spans {
        collect_span_text(span, &mut text);
    }
    text
}

fn collect_span_text(span: &Span, out: &mut String) {
    out.push_str(&span.text);
    for child in &span.children {
        collect_span_text(child, out);
    }
}
