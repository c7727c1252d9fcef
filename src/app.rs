use std::time::Duration;

use ratatui::widgets::ListState;

use crate::pipeline::Payload;
use crate::source::Story;

pub struct App {
    /// Latest batch, in rank order.
    pub stories: Vec<Story>,
    /// How long the latest batch took.
    pub elapsed: Option<Duration>,
    /// List selection state for scrolling.
    pub list_state: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Set by the `r` key; the main loop forwards it to the poller.
    pub refresh_requested: bool,
    /// Last poll status message.
    pub status: String,
}

impl App {
    pub fn new() -> Self {
        Self {
            stories: Vec::new(),
            elapsed: None,
            list_state: ListState::default(),
            quit: false,
            refresh_requested: false,
            status: "Loading top stories…".into(),
        }
    }

    /// Replace the displayed batch, keeping the selection in range.
    pub fn show_batch(&mut self, payload: Payload) {
        self.status = format!("Fetched {} stories", payload.stories.len());
        self.stories = payload.stories;
        self.elapsed = Some(payload.elapsed);

        let selected = match self.list_state.selected() {
            _ if self.stories.is_empty() => None,
            Some(i) => Some(i.min(self.stories.len() - 1)),
            None => None,
        };
        self.list_state.select(selected);
    }

    /// Keep the previous batch on screen and just report the failure.
    pub fn show_error(&mut self, message: String) {
        self.status = format!("Error: {message}");
    }

    pub fn request_refresh(&mut self) {
        self.refresh_requested = true;
        self.status = "Refreshing…".into();
    }

    /// Consume a pending refresh request.
    pub fn take_refresh_request(&mut self) -> bool {
        std::mem::take(&mut self.refresh_requested)
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.stories.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.stories.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.stories.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.stories.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.stories.is_empty() {
            self.list_state.select(Some(self.stories.len() - 1));
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::source::Item;

    pub(crate) fn make_story(id: u64, title: &str) -> Story {
        Story::from_item(Item {
            id,
            kind: "story".into(),
            title: title.into(),
            url: Some(format!("https://www.example.com/{id}")),
            by: "alice".into(),
            score: 10,
            ..Item::default()
        })
    }

    pub(crate) fn sample_batch() -> Payload {
        Payload {
            stories: vec![
                make_story(1, "First"),
                make_story(2, "Second"),
                make_story(3, "Third"),
            ],
            elapsed: Duration::from_millis(350),
        }
    }

    // -- construction --------------------------------------------------------

    #[test]
    fn new_app_starts_empty() {
        let app = App::new();
        assert!(app.stories.is_empty());
        assert!(!app.quit);
        assert!(app.elapsed.is_none());
        assert!(app.list_state.selected().is_none());
    }

    // -- batches -------------------------------------------------------------

    #[test]
    fn show_batch_keeps_rank_order() {
        let mut app = App::new();
        app.show_batch(sample_batch());

        assert_eq!(app.stories.len(), 3);
        assert_eq!(app.stories[0].item.title, "First");
        assert_eq!(app.stories[2].item.title, "Third");
        assert_eq!(app.elapsed, Some(Duration::from_millis(350)));
        assert_eq!(app.status, "Fetched 3 stories");
    }

    #[test]
    fn show_batch_replaces_previous_batch() {
        let mut app = App::new();
        app.show_batch(sample_batch());
        app.show_batch(Payload {
            stories: vec![make_story(9, "Only")],
            elapsed: Duration::from_millis(5),
        });

        assert_eq!(app.stories.len(), 1);
        assert_eq!(app.stories[0].item.id, 9);
    }

    #[test]
    fn show_batch_clamps_selection() {
        let mut app = App::new();
        app.show_batch(sample_batch());
        app.select_last();

        app.show_batch(Payload {
            stories: vec![make_story(9, "Only")],
            elapsed: Duration::ZERO,
        });
        assert_eq!(app.list_state.selected(), Some(0));

        app.show_batch(Payload {
            stories: vec![],
            elapsed: Duration::ZERO,
        });
        assert!(app.list_state.selected().is_none());
    }

    #[test]
    fn show_error_keeps_stories() {
        let mut app = App::new();
        app.show_batch(sample_batch());
        app.show_error("boom".into());

        assert_eq!(app.stories.len(), 3);
        assert_eq!(app.status, "Error: boom");
    }

    #[test]
    fn refresh_request_is_consumed_once() {
        let mut app = App::new();
        app.request_refresh();

        assert!(app.take_refresh_request());
        assert!(!app.take_refresh_request());
    }

    // -- navigation ----------------------------------------------------------

    #[test]
    fn navigation_on_empty_is_noop() {
        let mut app = App::new();
        app.select_next();
        app.select_previous();
        app.select_first();
        app.select_last();
        assert!(app.list_state.selected().is_none());
    }

    #[test]
    fn select_next_starts_at_zero_then_advances() {
        let mut app = App::new();
        app.show_batch(sample_batch());

        app.select_next();
        assert_eq!(app.list_state.selected(), Some(0));

        app.select_next();
        assert_eq!(app.list_state.selected(), Some(1));
    }

    #[test]
    fn select_next_clamps_at_last_item() {
        let mut app = App::new();
        app.show_batch(sample_batch());

        app.select_last();
        app.select_next();
        assert_eq!(app.list_state.selected(), Some(2));
    }

    #[test]
    fn select_previous_clamps_at_zero() {
        let mut app = App::new();
        app.show_batch(sample_batch());

        app.select_first();
        app.select_previous();
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn select_previous_moves_up() {
        let mut app = App::new();
        app.show_batch(sample_batch());

        app.select_last(); // index 2
        app.select_previous();
        assert_eq!(app.list_state.selected(), Some(1));
    }
}
