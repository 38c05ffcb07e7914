use std::{
    cell::Cell,
    io,
    path::PathBuf,
    rc::Rc,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{LevelFilter, debug, info};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use pure_tags::document::{Document, TRIGGER_CHAR};
use pure_tags::editor::{DocumentEditor, DocumentEngine};
use pure_tags::import::load_document;
use pure_tags::logging;
use pure_tags::mention::{KeyOutcome, MentionController, Vocabulary, tag_editor};
use pure_tags::render::{RenderResult, ScreenRect, render_document};
use pure_tags::serialize::{to_markup, to_text};
use pure_tags::theme::Theme;

const STATUS_TIMEOUT: Duration = Duration::from_secs(4);
const PREVIEW_HEIGHT: u16 = 6;

#[derive(Parser)]
#[command(name = "pure-tags")]
#[command(about = "A terminal editor with inline #tag mentions", version)]
struct Cli {
    /// FTML or Markdown file to start from
    file: Option<PathBuf>,

    /// Vocabulary file with one tag per line
    #[arg(long, value_name = "FILE")]
    tags: Option<PathBuf>,

    /// Where log output is written
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Log level, overridden by RUST_LOG
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: LevelFilter,

    /// Print the serialized document and exit
    #[arg(long, value_enum, value_name = "FORMAT")]
    print: Option<PreviewMode>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PreviewMode {
    Text,
    Markup,
}

impl PreviewMode {
    fn toggled(self) -> Self {
        match self {
            PreviewMode::Text => PreviewMode::Markup,
            PreviewMode::Markup => PreviewMode::Text,
        }
    }

    fn title(self) -> &'static str {
        match self {
            PreviewMode::Text => " Text ",
            PreviewMode::Markup => " Markup ",
        }
    }

    fn serialize(self, document: &Document) -> String {
        match self {
            PreviewMode::Text => to_text(document),
            PreviewMode::Markup => to_markup(document),
        }
    }
}

struct Config {
    document_path: Option<PathBuf>,
    vocabulary: Vocabulary,
    print: Option<PreviewMode>,
}

impl Config {
    fn from_cli(cli: Cli) -> Result<Self> {
        let vocabulary = match &cli.tags {
            Some(path) => Vocabulary::load(path)?,
            None => Vocabulary::default(),
        };
        Ok(Self {
            document_path: cli.file,
            vocabulary,
            print: cli.print,
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_path = cli.log_file.clone().unwrap_or_else(logging::default_log_path);
    if let Err(err) = logging::init(&log_path, cli.log_level) {
        eprintln!("warning: {err:#}");
    }
    let config = Config::from_cli(cli)?;
    info!(
        "starting with {} vocabulary entries",
        config.vocabulary.len()
    );

    let (document, initial_status) = match &config.document_path {
        Some(path) => load_document(path)?,
        None => (Document::new(), None),
    };

    if let Some(mode) = config.print {
        println!("{}", mode.serialize(&document));
        return Ok(());
    }

    run(config, document, initial_status)
}

fn run(config: Config, document: Document, initial_status: Option<String>) -> Result<()> {
    let mut app = App::new(config, document, initial_status);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    terminal.clear().ok();

    let res = run_app(&mut terminal, &mut app).context("application error");

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    res
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    while !app.should_quit {
        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw frame")?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout).context("event poll failed")? {
            let evt = event::read().context("failed to read event")?;
            app.handle_event(evt);
        }

        if last_tick.elapsed() >= tick_rate {
            app.prune_status_message();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

struct App {
    editor: DocumentEditor,
    mentions: MentionController,
    theme: Theme,
    title: String,
    preview: PreviewMode,
    scroll_top: usize,
    should_quit: bool,
    status_message: Option<(String, Instant)>,
    /// Set by the mention commit hook; the next draw recomputes the overlay anchor.
    overlay_stale: Rc<Cell<bool>>,
    overlay_anchor: Option<ScreenRect>,
}

impl App {
    fn new(config: Config, document: Document, initial_status: Option<String>) -> Self {
        let overlay_stale = Rc::new(Cell::new(false));
        let mut mentions = MentionController::new(config.vocabulary);
        let stale = Rc::clone(&overlay_stale);
        mentions.on_commit(move |_| stale.set(true));

        let title = config
            .document_path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "[scratch]".to_string());

        Self {
            editor: tag_editor(document),
            mentions,
            theme: Theme::default(),
            title,
            preview: PreviewMode::Text,
            scroll_top: 0,
            should_quit: false,
            status_message: initial_status.map(|msg| (msg, Instant::now())),
            overlay_stale,
            overlay_anchor: None,
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if area.height == 0 || area.width == 0 {
            return;
        }

        let preview_height = if area.height > PREVIEW_HEIGHT + 4 {
            PREVIEW_HEIGHT
        } else {
            0
        };
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(preview_height),
                Constraint::Length(if area.height > 1 { 2 } else { 1 }),
            ])
            .split(area);
        let text_area = vertical[0];
        let preview_area = vertical[1];
        let status_area = vertical[2];

        let render = self.render(text_area.width as usize);
        let viewport_height = text_area.height as usize;
        self.adjust_scroll(&render, viewport_height);

        let paragraph =
            Paragraph::new(Text::from(render.lines.clone())).scroll((self.scroll_top as u16, 0));
        frame.render_widget(paragraph, text_area);

        if let Some(cursor) = render.cursor {
            if cursor.line >= self.scroll_top && cursor.line < self.scroll_top + viewport_height {
                let cursor_y = text_area.y + (cursor.line - self.scroll_top) as u16;
                let cursor_x = text_area.x + cursor.column.min(text_area.width.saturating_sub(1));
                frame.set_cursor_position(Position::new(cursor_x, cursor_y));
            }
        }

        if preview_height > 0 {
            self.draw_preview(frame, preview_area);
        }

        let status = Paragraph::new(self.status_line())
            .style(self.theme.status_bar_style())
            .block(Block::default().borders(Borders::TOP));
        frame.render_widget(status, status_area);

        if self.overlay_stale.replace(false) {
            self.overlay_anchor = self
                .mentions
                .session()
                .and_then(|session| render.screen_rect(session.anchor()));
            debug!("overlay anchor recomputed: {:?}", self.overlay_anchor);
        }
        if self.mentions.is_open() {
            self.draw_suggestions(frame, text_area);
        }
    }

    fn render(&self, width: usize) -> RenderResult {
        let tracked: Vec<_> = self
            .mentions
            .session()
            .map(|session| {
                let (start, end) = session.anchor().edges();
                vec![start.clone(), end.clone()]
            })
            .unwrap_or_default();
        render_document(&self.editor, width, &tracked, &self.theme)
    }

    fn draw_preview(&self, frame: &mut Frame, area: Rect) {
        let content = self.preview.serialize(self.editor.document());
        let preview = Paragraph::new(content)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(self.preview.title())
                    .borders(Borders::TOP)
                    .border_style(self.theme.preview_border_style()),
            );
        frame.render_widget(preview, area);
    }

    /// Suggestion list placed one row below the trigger, or above it when
    /// there is no room underneath.
    fn draw_suggestions(&self, frame: &mut Frame, text_area: Rect) {
        let Some(anchor) = self.overlay_anchor else {
            return;
        };
        let candidates = self.mentions.candidates();
        if candidates.is_empty() {
            return;
        }
        let anchor_bottom = anchor.top + anchor.height;
        if anchor_bottom <= self.scroll_top
            || anchor.top >= self.scroll_top + text_area.height as usize
        {
            return;
        }

        let labels: Vec<String> = candidates
            .iter()
            .map(|candidate| format!("{TRIGGER_CHAR}{candidate}"))
            .collect();
        let content_width = labels.iter().map(|label| label.width()).max().unwrap_or(0);
        let width = (content_width as u16 + 4).min(text_area.width);
        let height = (labels.len() as u16 + 2).min(text_area.height);

        let below = text_area.y + (anchor_bottom - self.scroll_top) as u16;
        let top_row = text_area.y + anchor.top.saturating_sub(self.scroll_top) as u16;
        let y = if below + height <= text_area.bottom() {
            below
        } else {
            top_row.saturating_sub(height).max(text_area.y)
        };
        let x = (text_area.x + anchor.left).min(text_area.right().saturating_sub(width));
        let popup_area = Rect::new(x, y, width, height);

        frame.render_widget(Clear, popup_area);
        let items: Vec<ListItem> = labels
            .into_iter()
            .map(|label| ListItem::new(Line::from(format!(" {label}"))))
            .collect();
        let mut state = ListState::default();
        state.select(self.mentions.highlighted_index());
        let list = List::new(items)
            .style(self.theme.menu_style())
            .highlight_style(self.theme.menu_selected_style())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .style(self.theme.menu_style()),
            );
        frame.render_stateful_widget(list, popup_area, &mut state);
    }

    fn status_line(&mut self) -> Line<'static> {
        self.prune_status_message();
        let details = match &self.status_message {
            Some((message, _)) => format!(" | {message}"),
            None => format!(
                " | Tags: {} | Ctrl-T {} preview | Ctrl-Q quit",
                self.editor.document().tag_count(),
                self.preview.toggled().title().trim().to_lowercase(),
            ),
        };
        Line::from(vec![
            Span::styled(self.title.clone(), self.theme.filename_style()),
            Span::raw(details),
        ])
    }

    fn prune_status_message(&mut self) {
        if let Some((_, instant)) = &self.status_message {
            if instant.elapsed() > STATUS_TIMEOUT {
                self.status_message = None;
            }
        }
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    fn adjust_scroll(&mut self, render: &RenderResult, viewport_height: usize) {
        let viewport = viewport_height.max(1);
        let max_scroll = render.total_lines.saturating_sub(viewport);
        if let Some(cursor) = &render.cursor {
            if cursor.line < self.scroll_top {
                self.scroll_top = cursor.line;
            } else if cursor.line >= self.scroll_top + viewport {
                self.scroll_top = (cursor.line + 1).saturating_sub(viewport);
            }
        }
        self.scroll_top = self.scroll_top.min(max_scroll);
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => self.handle_key(code, modifiers),
            Event::Resize(..) => self.overlay_stale.set(true),
            _ => {}
        }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match self.mentions.handle_key(&mut self.editor, code) {
            KeyOutcome::Inserted(tag) => {
                self.set_status(format!("Inserted {TRIGGER_CHAR}{tag}"));
                self.mentions.on_change(&self.editor);
                return;
            }
            KeyOutcome::Handled => return,
            KeyOutcome::Ignored => {}
        }

        let control = modifiers.contains(KeyModifiers::CONTROL);
        let changed = match code {
            KeyCode::Char('q') | KeyCode::Char('c') if control => {
                self.should_quit = true;
                false
            }
            KeyCode::Char('t') if control => {
                self.preview = self.preview.toggled();
                false
            }
            KeyCode::Left if control => self.editor.move_word_left(),
            KeyCode::Right if control => self.editor.move_word_right(),
            KeyCode::Left => self.editor.move_left(),
            KeyCode::Right => self.editor.move_right(),
            KeyCode::Up => self.editor.move_up(),
            KeyCode::Down => self.editor.move_down(),
            KeyCode::Home => self.editor.move_to_block_start(),
            KeyCode::End => self.editor.move_to_block_end(),
            KeyCode::Backspace => self.editor.backspace(),
            KeyCode::Delete => self.editor.delete_forward(),
            KeyCode::Enter => self.editor.insert_break().is_ok(),
            KeyCode::Char(ch) if !control && !modifiers.contains(KeyModifiers::ALT) => {
                self.editor.insert_char(ch)
            }
            _ => false,
        };
        if changed {
            self.mentions.on_change(&self.editor);
        }
    }
}
