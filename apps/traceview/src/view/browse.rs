use super::draw::{render_results, DrawOpts};
use anyhow::{anyhow, Result};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use std::io::{self, Write};
use traceview_model::ActiveView;
use traceview_results::{LookupLinker, ResultsView};

const HELP: &str = "1/2/3 or Tab: view  j/k: move  Enter: expand  o: lookup  q: quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Results view plus the row cursor and the last status message.
pub struct BrowseState {
    pub view: ResultsView,
    pub cursor: usize,
    pub status: Option<String>,
}

impl BrowseState {
    pub fn new(view: ResultsView) -> Self {
        Self {
            view,
            cursor: 0,
            status: None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, linker: &dyn LookupLinker) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        let hop_count = self.view.interaction().hop_count();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
            KeyCode::Char('1') => self.view.select_view(ActiveView::Timeline),
            KeyCode::Char('2') => self.view.select_view(ActiveView::Chart),
            KeyCode::Char('3') => self.view.select_view(ActiveView::Table),
            KeyCode::Tab => {
                let next = self.view.active_view().next();
                self.view.select_view(next);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < hop_count {
                    self.cursor += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.view.toggle_expand(self.cursor);
            }
            KeyCode::Char('o') => {
                self.status = Some(match self.view.expanded_lookup(linker) {
                    Some(reference) => format!("lookup: {reference}"),
                    None => "expand a hop with an address to look it up".to_string(),
                });
            }
            _ => {}
        }
        Flow::Continue
    }

    pub fn render(&self, linker: &dyn LookupLinker, opts: &DrawOpts) -> String {
        let opts = DrawOpts {
            cursor: Some(self.cursor),
            ..*opts
        };
        let mut output = render_results(&self.view, linker, &opts);
        output.push_str("\n\n");
        output.push_str(HELP);
        if let Some(status) = &self.status {
            output.push('\n');
            output.push_str(status);
        }
        output
    }
}

/// Leaves raw mode and the alternate screen even when the loop errors out.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().map_err(|err| anyhow!("failed to enable raw mode: {err}"))?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)
            .map_err(|err| anyhow!("failed to enter alternate screen: {err}"))?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

pub fn run_browser(view: ResultsView, linker: &dyn LookupLinker, opts: &DrawOpts) -> Result<()> {
    let mut state = BrowseState::new(view);
    let _guard = TerminalGuard::enter()?;
    let mut stdout = io::stdout();

    loop {
        let width = terminal::size().map(|(w, _)| w as usize).unwrap_or(opts.width);
        let frame = state.render(linker, &DrawOpts { width, ..*opts });

        execute!(stdout, MoveTo(0, 0), Clear(ClearType::All))
            .map_err(|err| anyhow!("failed to clear screen: {err}"))?;
        // Raw mode does not translate newlines.
        stdout.write_all(frame.replace('\n', "\r\n").as_bytes())?;
        stdout.flush()?;

        let event = event::read().map_err(|err| anyhow!("failed to read input: {err}"))?;
        if let Event::Key(key) = event {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if state.handle_key(key, linker) == Flow::Quit {
                break;
            }
        }
    }

    Ok(())
}
