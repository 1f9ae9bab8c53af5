use std::sync::Arc;
use chatbox_core::{ChatBackend, ChatController, SubmitOutcome};
use tokio::sync::mpsc::UnboundedSender;
use crate::tui::AppEvent;

pub struct App {
    pub should_quit: bool,

    // Input box
    pub input: String,
    pub cursor: usize, // cursor position in input, in chars

    // Conversation
    pub controller: ChatController,
    pub backend: Arc<dyn ChatBackend>,
    pub endpoint: String,
    events: UnboundedSender<AppEvent>,

    // Transcript view, dimensions updated during render
    pub scroll: u16,
    pub max_scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,

    pub animation_frame: u8,
}

impl App {
    pub fn new(backend: Arc<dyn ChatBackend>, endpoint: String, events: UnboundedSender<AppEvent>) -> Self {
        Self {
            should_quit: false,
            input: String::new(),
            cursor: 0,
            controller: ChatController::new(),
            backend,
            endpoint,
            events,
            scroll: 0,
            max_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.controller.is_awaiting_reply()
    }

    /// Submit the input box. The request runs on its own task and its result
    /// comes back through the event channel as [`AppEvent::Reply`].
    pub fn submit(&mut self) -> SubmitOutcome {
        let outcome = self.controller.begin_submission(&mut self.input);

        if let SubmitOutcome::Dispatched(request) = &outcome {
            self.cursor = 0;
            self.animation_frame = 0;

            let backend = Arc::clone(&self.backend);
            let events = self.events.clone();
            let request = request.clone();
            tokio::spawn(async move {
                let result = backend.send(&request).await;
                if events.send(AppEvent::Reply(result)).is_err() {
                    tracing::debug!("reply arrived after the UI shut down");
                }
            });
        }

        outcome
    }

    pub fn tick_animation(&mut self) {
        if self.is_waiting() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
        if self.scroll < self.max_scroll {
            self.controller.transcript_mut().set_follow_tail(false);
        }
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines).min(self.max_scroll);
        if self.scroll >= self.max_scroll {
            self.controller.transcript_mut().set_follow_tail(true);
        }
    }

    pub fn half_page(&self) -> u16 {
        (self.chat_height / 2).max(1)
    }
}
