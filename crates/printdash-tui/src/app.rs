//! Application core: event loop and action dispatch.
//!
//! Screen-level actions that change the controller's state (refresh,
//! column toggles, bulk show/hide) are handed to [`Dashboard`] on
//! background tasks; the UI only ever learns the outcome through the
//! snapshot the data bridge forwards.

use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use printdash_core::Dashboard;

use crate::action::Action;
use crate::component::Component;
use crate::data_bridge::spawn_data_bridge;
use crate::event::{Event, EventReader};
use crate::screens::DashboardScreen;
use crate::theme;
use crate::tui::Tui;

pub struct App {
    dashboard: Dashboard,
    screen: DashboardScreen,
    running: bool,
    help_visible: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(dashboard: Dashboard) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screen = DashboardScreen::new(dashboard.config().columns.clone(), dashboard.visible_set());

        Self {
            dashboard,
            screen,
            running: true,
            help_visible: false,
            action_tx,
            action_rx,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let area = tui.area()?;
        self.screen.init(self.action_tx.clone())?;
        debug!(screen = self.screen.id(), "screen ready");
        self.action_tx.send(Action::Resize(area.width, area.height))?;

        let cancel = CancellationToken::new();
        let bridge = tokio::spawn(spawn_data_bridge(
            self.dashboard.clone(),
            self.action_tx.clone(),
            cancel.clone(),
        ));

        // ~15 FPS is plenty for a table that changes once a minute.
        let mut events = EventReader::new(Duration::from_millis(66));
        info!("event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            let action = match event {
                Event::Key(key) => self.handle_key_event(key)?,
                Event::Mouse(mouse) => self.handle_mouse_event(mouse)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                Event::Render => Some(Action::Render),
            };
            if let Some(action) = action {
                self.action_tx.send(action)?;
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;
                if matches!(action, Action::Render) {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        cancel.cancel();
        let _ = bridge.await;
        tui.exit();
        info!("event loop ended");
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?' | 'q') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (_, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            _ => {}
        }

        self.screen.handle_key_event(key)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if self.help_visible {
            return Ok(None);
        }
        self.screen.handle_mouse_event(mouse)
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::ToggleHelp => self.help_visible = !self.help_visible,
            Action::Render => {}
            Action::Refresh => {
                debug!("manual refresh");
                self.dashboard.spawn_refresh();
            }
            Action::ToggleColumn { key, on } => {
                let dashboard = self.dashboard.clone();
                let (key_owned, on) = (key.clone(), *on);
                tokio::spawn(async move {
                    match dashboard.toggle_field(&key_owned, on).await {
                        Err(e) if e.is_fetch_error() => {
                            debug!(key = %key_owned, error = %e, "refresh after toggle failed");
                        }
                        Err(e) => warn!(key = %key_owned, error = %e, "column toggle rejected"),
                        Ok(_) => {}
                    }
                });
                self.forward(action)?;
            }
            Action::AllOn | Action::AllOff => {
                let dashboard = self.dashboard.clone();
                let on = matches!(action, Action::AllOn);
                tokio::spawn(async move {
                    let result = if on { dashboard.all_on().await } else { dashboard.all_off().await };
                    match result {
                        Err(e) if e.is_fetch_error() => {
                            debug!(error = %e, "refresh after bulk change failed");
                        }
                        Err(e) => warn!(error = %e, "bulk column change failed"),
                        Ok(_) => {}
                    }
                });
                self.forward(action)?;
            }
            other => self.forward(other)?,
        }
        Ok(())
    }

    fn forward(&mut self, action: &Action) -> Result<()> {
        if let Some(follow_up) = self.screen.update(action)? {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        self.screen.render(frame, area);
        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }
}

const HELP: &[(&str, &str)] = &[
    ("r", "Refresh now"),
    ("c", "Open / close column picker"),
    ("a", "Show all columns"),
    ("n", "Hide all columns"),
    ("j/k ↑/↓", "Move row / picker cursor"),
    ("g/G", "Top / bottom"),
    ("Space", "Toggle column (picker open)"),
    ("Esc", "Close picker / help"),
    ("?", "This help"),
    ("q", "Quit"),
];

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let lines = u16::try_from(HELP.len()).unwrap_or(u16::MAX);
    let width = 48u16.min(area.width.saturating_sub(4));
    let height = lines.saturating_add(4).min(area.height.saturating_sub(2));
    let help_area = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );

    let block = Block::default()
        .title(" Keys ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused());

    let mut text = vec![Line::from("")];
    text.extend(HELP.iter().map(|(key, what)| {
        Line::from(vec![
            Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
            Span::styled(*what, theme::key_hint()),
        ])
    }));
    text.push(Line::from(Span::styled(
        "  Mouse: click buttons and picker rows",
        Style::default().fg(theme::DIM_TEXT),
    )));

    frame.render_widget(Clear, help_area);
    frame.render_widget(Paragraph::new(text).block(block), help_area);
}
