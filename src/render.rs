use ratatui::{
    style::Style,
    text::{Line, Span},
};
use unicode_width::UnicodeWidthChar;

use crate::document::{Element, Node, NodePath, Point, Range};
use crate::editor::{DocumentEditor, DocumentEngine};
use crate::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorVisualPosition {
    pub line: usize,
    pub column: u16,
}

/// Area covered by a range, in rendered line and column coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenRect {
    pub top: usize,
    pub left: u16,
    pub width: u16,
    pub height: usize,
}

#[derive(Debug)]
pub struct RenderResult {
    pub lines: Vec<Line<'static>>,
    pub cursor: Option<CursorVisualPosition>,
    pub total_lines: usize,
    pub positions: Vec<(Point, CursorVisualPosition)>,
}

impl RenderResult {
    pub fn position_of(&self, point: &Point) -> Option<CursorVisualPosition> {
        self.positions
            .iter()
            .find(|(tracked, _)| tracked == point)
            .map(|(_, position)| *position)
    }

    /// Bounding box of `range`. Both edges must have been tracked while rendering.
    pub fn screen_rect(&self, range: &Range) -> Option<ScreenRect> {
        let (start, end) = range.edges();
        let start = self.position_of(start)?;
        let end = self.position_of(end)?;
        if start.line == end.line {
            return Some(ScreenRect {
                top: start.line,
                left: start.column,
                width: end.column.saturating_sub(start.column).max(1),
                height: 1,
            });
        }
        Some(ScreenRect {
            top: start.line,
            left: 0,
            width: start.column.max(end.column).max(1),
            height: end.line - start.line + 1,
        })
    }
}

/// Lays out every text block of the editor, wrapped at `width` columns.
///
/// `tracked` points get their visual position recorded in the result.
pub fn render_document(
    editor: &DocumentEditor,
    width: usize,
    tracked: &[Point],
    theme: &Theme,
) -> RenderResult {
    let mut renderer = Renderer::new(width.max(1), editor.caret(), tracked, theme);
    for (idx, block_path) in editor.text_blocks().iter().enumerate() {
        if idx > 0 {
            renderer.push_blank_line();
        }
        let children = editor
            .document()
            .children_at(block_path)
            .unwrap_or(&[]);
        renderer.render_block(block_path, children);
    }
    renderer.finish()
}

struct Renderer<'a> {
    wrap_width: usize,
    caret: Option<&'a Point>,
    tracked: &'a [Point],
    theme: &'a Theme,
    cursor: Option<CursorVisualPosition>,
    positions: Vec<(Point, CursorVisualPosition)>,
    lines: Vec<Line<'static>>,
    current_line_index: usize,
}

impl<'a> Renderer<'a> {
    fn new(
        wrap_width: usize,
        caret: Option<&'a Point>,
        tracked: &'a [Point],
        theme: &'a Theme,
    ) -> Self {
        Self {
            wrap_width,
            caret,
            tracked,
            theme,
            cursor: None,
            positions: Vec::new(),
            lines: Vec::new(),
            current_line_index: 0,
        }
    }

    fn render_block(&mut self, block_path: &NodePath, children: &[Node]) {
        let mut fragments = Vec::new();
        for (idx, child) in children.iter().enumerate() {
            match child {
                Node::Text(text) => {
                    let events = self.events_in_leaf(&block_path.child(idx));
                    tokenize_text(text, Style::default(), events, &mut fragments);
                }
                Node::Element(element) => {
                    fragments.push(self.inline_fragment(element));
                }
            }
        }
        let lines = wrap_fragments(&fragments, self.wrap_width);
        self.consume_lines(lines);
    }

    /// Inline elements are laid out as one unbreakable word.
    fn inline_fragment(&self, element: &Element) -> Fragment {
        let text = element.text_content();
        let style = if element.kind.is_tag() {
            self.theme.tag_style()
        } else {
            Style::default()
        };
        Fragment {
            width: visible_width(&text),
            text,
            style,
            kind: FragmentKind::Word,
            events: Vec::new(),
        }
    }

    fn events_in_leaf(&self, leaf: &NodePath) -> Vec<TextEvent> {
        let mut events = Vec::new();
        if let Some(caret) = self.caret.filter(|caret| caret.path == *leaf) {
            events.push(TextEvent {
                offset: caret.offset,
                kind: TextEventKind::Cursor,
            });
        }
        for (idx, point) in self.tracked.iter().enumerate() {
            if point.path == *leaf {
                events.push(TextEvent {
                    offset: point.offset,
                    kind: TextEventKind::Marker(idx),
                });
            }
        }
        events.sort_by_key(|event| event.offset);
        events
    }

    fn push_blank_line(&mut self) {
        self.lines.push(Line::from(""));
        self.current_line_index += 1;
    }

    fn consume_lines(&mut self, outputs: Vec<LineOutput>) {
        for output in outputs {
            let spans: Vec<Span<'static>> = output
                .spans
                .into_iter()
                .map(|segment| Span::styled(segment.text, segment.style))
                .collect();
            for event in output.events {
                let position = CursorVisualPosition {
                    line: self.current_line_index,
                    column: event.column,
                };
                match event.kind {
                    TextEventKind::Cursor => self.cursor = Some(position),
                    TextEventKind::Marker(id) => {
                        if let Some(point) = self.tracked.get(id) {
                            self.positions.push((point.clone(), position));
                        }
                    }
                }
            }
            self.lines.push(Line::from(spans));
            self.current_line_index += 1;
        }
    }

    fn finish(mut self) -> RenderResult {
        if self.lines.is_empty() {
            self.lines.push(Line::from(""));
        }
        let total_lines = self.lines.len();
        RenderResult {
            lines: self.lines,
            cursor: self.cursor,
            total_lines,
            positions: self.positions,
        }
    }
}

#[derive(Clone)]
struct LineSegment {
    text: String,
    style: Style,
}

struct LineOutput {
    spans: Vec<LineSegment>,
    events: Vec<LocatedEvent>,
}

#[derive(Clone, Copy)]
struct LocatedEvent {
    column: u16,
    kind: TextEventKind,
}

#[derive(Clone)]
struct Fragment {
    text: String,
    style: Style,
    kind: FragmentKind,
    width: usize,
    events: Vec<TextEvent>,
}

#[derive(Clone, Copy)]
enum FragmentKind {
    Word,
    Whitespace,
}

#[derive(Clone)]
struct TextEvent {
    offset: usize,
    kind: TextEventKind,
}

#[derive(Clone, Copy)]
enum TextEventKind {
    Marker(usize),
    Cursor,
}

/// Splits a text leaf into word and whitespace runs. `events` carry character
/// offsets into `text` and are attached to the run they fall in.
fn tokenize_text(
    text: &str,
    style: Style,
    events: Vec<TextEvent>,
    fragments: &mut Vec<Fragment>,
) {
    let mut builder: Option<TokenBuilder> = None;
    let mut pending_events: Vec<TextEvent> = Vec::new();
    let mut events = events.into_iter().peekable();

    for (char_idx, ch) in text.chars().enumerate() {
        while let Some(event) = events.next_if(|event| event.offset <= char_idx) {
            pending_events.push(event);
        }
        let (actual, repeat) = if ch == '\t' { (' ', 4) } else { (ch, 1) };
        for _ in 0..repeat {
            let is_whitespace = actual.is_whitespace();
            match builder.as_mut() {
                Some(current) if current.kind_matches(is_whitespace) => {
                    current.add_events(&mut pending_events);
                    current.push_char(actual);
                }
                _ => {
                    if let Some(mut existing) = builder.take() {
                        existing.add_events(&mut pending_events);
                        fragments.push(existing.finish());
                    }
                    let mut new_builder = TokenBuilder::new(style, is_whitespace);
                    new_builder.add_events(&mut pending_events);
                    new_builder.push_char(actual);
                    builder = Some(new_builder);
                }
            }
        }
    }
    pending_events.extend(events);

    if let Some(mut token) = builder {
        token.add_events(&mut pending_events);
        fragments.push(token.finish());
    } else if !pending_events.is_empty() {
        fragments.push(Fragment {
            text: String::new(),
            style,
            kind: FragmentKind::Word,
            width: 0,
            events: pending_events,
        });
    }
}

struct TokenBuilder {
    text: String,
    style: Style,
    kind: FragmentKind,
    width: usize,
    events: Vec<TextEvent>,
}

impl TokenBuilder {
    fn new(style: Style, is_whitespace: bool) -> Self {
        Self {
            text: String::new(),
            style,
            kind: if is_whitespace {
                FragmentKind::Whitespace
            } else {
                FragmentKind::Word
            },
            width: 0,
            events: Vec::new(),
        }
    }

    fn kind_matches(&self, is_whitespace: bool) -> bool {
        matches!(
            (self.kind, is_whitespace),
            (FragmentKind::Whitespace, true) | (FragmentKind::Word, false)
        )
    }

    fn add_events(&mut self, pending: &mut Vec<TextEvent>) {
        for mut event in pending.drain(..) {
            event.offset = self.width;
            self.events.push(event);
        }
    }

    fn push_char(&mut self, ch: char) {
        self.text.push(ch);
        self.width += UnicodeWidthChar::width(ch).unwrap_or(0);
    }

    fn finish(self) -> Fragment {
        Fragment {
            text: self.text,
            style: self.style,
            kind: self.kind,
            width: self.width,
            events: self.events,
        }
    }
}

fn wrap_fragments(fragments: &[Fragment], width: usize) -> Vec<LineOutput> {
    let mut outputs = Vec::new();
    let mut builder = LineBuilder::default();
    let mut pending_whitespace: Vec<Fragment> = Vec::new();

    for token in fragments {
        match token.kind {
            FragmentKind::Whitespace => pending_whitespace.push(token.clone()),
            FragmentKind::Word => {
                let whitespace_width: usize =
                    pending_whitespace.iter().map(|item| item.width).sum();
                if builder.width > 0 && builder.width + whitespace_width + token.width > width {
                    builder.consume_pending(&mut pending_whitespace);
                    outputs.push(builder.build_line());
                    builder = LineBuilder::default();
                }
                builder.consume_pending(&mut pending_whitespace);
                builder.append_token(token.clone());
            }
        }
    }

    builder.consume_pending(&mut pending_whitespace);
    outputs.push(builder.build_line());
    outputs
}

#[derive(Default)]
struct LineBuilder {
    segments: Vec<LineSegment>,
    events: Vec<LocatedEvent>,
    width: usize,
}

impl LineBuilder {
    fn consume_pending(&mut self, pending_whitespace: &mut Vec<Fragment>) {
        for fragment in pending_whitespace.drain(..) {
            self.append_token(fragment);
        }
    }

    fn append_token(&mut self, fragment: Fragment) {
        let start = self.width;
        if !fragment.text.is_empty() {
            self.width += fragment.width;
            self.segments.push(LineSegment {
                text: fragment.text,
                style: fragment.style,
            });
        }
        for event in fragment.events {
            self.events.push(LocatedEvent {
                column: (start + event.offset) as u16,
                kind: event.kind,
            });
        }
    }

    fn build_line(mut self) -> LineOutput {
        if self.segments.is_empty() {
            self.segments.push(LineSegment {
                text: String::new(),
                style: Style::default(),
            });
        }
        self.events.sort_by_key(|event| event.column);
        LineOutput {
            spans: self.segments,
            events: self.events,
        }
    }
}

fn visible_width(text: &str) -> usize {
    text.chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
        .sum()
}
