use newsdash_core::{DashboardController, Notification, SessionEvent};

use crate::action::Action;
use crate::theme::Theme;

/// Which screen is currently displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Article(usize), // index into the controller's articles
}

/// Main application state.
pub struct App {
    pub controller: DashboardController,
    pub screen: Screen,
    /// Contents of the search box.
    pub query: String,
    /// Keys go to the search box instead of being commands.
    pub editing: bool,
    pub article_cursor: usize,
    pub detail_scroll: u16,
    pub tick: usize,
    pub theme: Theme,
    pub should_quit: bool,
    pub show_help: bool,
    /// Height of the visible table area (set on resize, used for page up/down).
    pub visible_rows: usize,
}

impl App {
    pub fn new(controller: DashboardController) -> Self {
        Self {
            controller,
            screen: Screen::Dashboard,
            query: String::new(),
            editing: true,
            article_cursor: 0,
            detail_scroll: 0,
            tick: 0,
            theme: Theme::newsroom(),
            should_quit: false,
            show_help: false,
            visible_rows: 10,
        }
    }

    /// Put `topic` in the search box and run it.
    pub fn search(&mut self, topic: &str) {
        self.query = topic.to_string();
        self.submit();
    }

    fn submit(&mut self) {
        if self.controller.search(&self.query).is_some() {
            self.editing = false;
            self.screen = Screen::Dashboard;
            self.article_cursor = 0;
            self.detail_scroll = 0;
        }
    }

    fn article_count(&self) -> usize {
        self.controller.articles().len()
    }

    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        // When help overlay is shown, only allow a few actions through
        if self.show_help {
            match action {
                Action::Quit => {
                    self.should_quit = true;
                    return true;
                }
                Action::ToggleHelp | Action::NavigateBack => {
                    self.show_help = false;
                }
                Action::Tick => {
                    self.tick = self.tick.wrapping_add(1);
                }
                Action::Resize(_w, h) => {
                    self.visible_rows = table_rows(h);
                }
                _ => {} // swallow everything else
            }
            return false;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
                return true;
            }
            Action::ToggleHelp => {
                self.show_help = true;
            }
            Action::FocusSearch => {
                self.screen = Screen::Dashboard;
                self.editing = true;
            }
            Action::InsertChar(c) => {
                if self.editing {
                    self.query.push(c);
                }
            }
            Action::DeleteChar => {
                if self.editing {
                    self.query.pop();
                }
            }
            Action::ClearInput => {
                if self.editing {
                    self.query.clear();
                }
            }
            Action::Submit => self.submit(),
            Action::CancelSearch => {
                if self.controller.cancel() {
                    log::info!("search canceled by user");
                }
            }
            Action::NavigateBack => match &self.screen {
                Screen::Article(_) => {
                    self.screen = Screen::Dashboard;
                    // article_cursor is preserved
                }
                Screen::Dashboard => {
                    self.editing = false;
                }
            },
            Action::DrillIn => {
                if self.screen == Screen::Dashboard && self.article_cursor < self.article_count() {
                    self.detail_scroll = 0;
                    self.screen = Screen::Article(self.article_cursor);
                }
            }
            Action::MoveDown => match &self.screen {
                Screen::Dashboard => {
                    if self.article_cursor + 1 < self.article_count() {
                        self.article_cursor += 1;
                    }
                }
                Screen::Article(_) => {
                    self.detail_scroll = self.detail_scroll.saturating_add(1);
                }
            },
            Action::MoveUp => match &self.screen {
                Screen::Dashboard => {
                    self.article_cursor = self.article_cursor.saturating_sub(1);
                }
                Screen::Article(_) => {
                    self.detail_scroll = self.detail_scroll.saturating_sub(1);
                }
            },
            Action::PageDown => {
                let page = self.visible_rows.max(1);
                match &self.screen {
                    Screen::Dashboard => {
                        self.article_cursor = (self.article_cursor + page)
                            .min(self.article_count().saturating_sub(1));
                    }
                    Screen::Article(_) => {
                        self.detail_scroll = self.detail_scroll.saturating_add(page as u16);
                    }
                }
            }
            Action::PageUp => {
                let page = self.visible_rows.max(1);
                match &self.screen {
                    Screen::Dashboard => {
                        self.article_cursor = self.article_cursor.saturating_sub(page);
                    }
                    Screen::Article(_) => {
                        self.detail_scroll = self.detail_scroll.saturating_sub(page as u16);
                    }
                }
            }
            Action::GoTop => match &self.screen {
                Screen::Dashboard => self.article_cursor = 0,
                Screen::Article(_) => self.detail_scroll = 0,
            },
            Action::GoBottom => match &self.screen {
                Screen::Dashboard => {
                    self.article_cursor = self.article_count().saturating_sub(1);
                }
                Screen::Article(_) => {
                    self.detail_scroll = u16::MAX; // clamped by Paragraph rendering
                }
            },
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
            }
            Action::Resize(_w, h) => {
                self.visible_rows = table_rows(h);
            }
            Action::None => {}
        }
        false
    }

    /// Apply an event from the streaming connection.
    pub fn handle_session_event(&mut self, event: SessionEvent) {
        match self.controller.handle_event(event) {
            Some(Notification::ResultReady) => {
                self.article_cursor = 0;
            }
            Some(Notification::Failed(message)) => {
                log::debug!("showing stream failure: {message}");
            }
            Some(Notification::LogUpdated(_)) | None => {}
        }
        if let Screen::Article(idx) = self.screen {
            if idx >= self.article_count() {
                self.screen = Screen::Dashboard;
            }
        }
    }

    /// Render the current screen.
    pub fn view(&self, f: &mut ratatui::Frame) {
        match &self.screen {
            Screen::Dashboard => crate::view::dashboard::render(f, self),
            Screen::Article(idx) => crate::view::article::render(f, self, *idx),
        }

        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }
    }
}

/// Rough estimate of table rows: terminal height minus the fixed panels.
fn table_rows(height: u16) -> usize {
    (height as usize).saturating_sub(18)
}
