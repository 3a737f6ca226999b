use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::DefaultTerminal;
use tracing::{debug, trace};

use crate::app::{App, Message, Model, update};
use crate::editor::TextBuffer;

/// Holds the latest terminal size until resizes stop arriving.
pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl App {
    /// Run the application.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, the terminal cannot be
    /// initialized, or the event loop encounters an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        // Open (or create) the file before touching the terminal so errors print cleanly
        let buffer = TextBuffer::load(&self.file_path)
            .with_context(|| format!("Failed to open {}", self.file_path.display()))?;

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal - lined requires an interactive terminal")?;
        let size = terminal.size()?;

        let mut model = Model::new(buffer, (size.width, size.height));
        model.tab_width = self.tab_width;
        model.viewport.set_line_numbers(self.line_numbers);

        let result = Self::event_loop(&mut terminal, &mut model);

        ratatui::restore();

        let stats = std::mem::take(&mut model.buffer).free();
        debug!(lines = stats.lines, chars = stats.chars, "buffer released");

        result
    }

    fn event_loop(terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(50);
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                *model = update(std::mem::take(model), Message::Resize(width, height));
                needs_render = true;
            }

            if needs_render {
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }

            let poll_ms = if resize_debouncer.is_pending() { 10 } else { 250 };
            if event::poll(Duration::from_millis(poll_ms))? {
                let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                if let Some(msg) =
                    Self::handle_event(&event::read()?, model, event_ms, &mut resize_debouncer)
                {
                    Self::dispatch(model, msg);
                    needs_render = true;
                }

                // Coalesce key repeat bursts into a single render.
                while event::poll(Duration::from_millis(0))? {
                    let drain_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    if let Some(msg) =
                        Self::handle_event(&event::read()?, model, drain_ms, &mut resize_debouncer)
                    {
                        Self::dispatch(model, msg);
                        needs_render = true;
                    }
                }
            }
        }
        Ok(())
    }

    fn dispatch(model: &mut Model, msg: Message) {
        trace!(?msg, "message");
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        Self::handle_message_side_effects(model, &side_msg);
    }
}
