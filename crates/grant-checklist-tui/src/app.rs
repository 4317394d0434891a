use ratatui::layout::Rect;
use tokio::task::JoinHandle;

use grant_checklist_core::location::playground_link;
use grant_checklist_core::{
    ApiError, ChatClient, ChatRole, Config, DocumentLocation, LoadTicket, SummaryClient,
    SummaryPayload, SummaryTab, SummaryView, Transcript,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Summary,
    Chat,
}

/// A summary fetch in flight, tagged with the load it belongs to
pub struct SummaryTask {
    pub ticket: LoadTicket,
    pub handle: JoinHandle<Result<SummaryPayload, ApiError>>,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub focus: FocusPane,

    // Summary pane
    pub location: Option<DocumentLocation>,
    pub summary: SummaryView,
    pub summary_task: Option<SummaryTask>,
    pub summary_scroll: u16,
    pub summary_height: u16,
    pub summary_rows: u16, // Wrapped row count of the active section (updated during render)

    // Chat sidebar
    pub transcript: Transcript,
    pub chat_task: Option<JoinHandle<Result<String, ApiError>>>,
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of chat area for scroll calculations
    pub chat_width: u16,  // Width of chat area for wrap calculations

    // Go-to prompt
    pub show_goto: bool,
    pub goto_input: String,

    // One-line notice in the footer (link copied, bad location, ...)
    pub status_message: Option<String>,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Panel areas for mouse hit-testing (updated during render)
    pub summary_area: Option<Rect>,
    pub chat_area: Option<Rect>,

    // Backend
    pub api_base_url: String,
    pub summary_client: SummaryClient,
    pub chat_client: ChatClient,
}

impl App {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let summary_client = SummaryClient::new(config)?;
        let chat_client = ChatClient::new(config)?;

        Ok(Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            focus: FocusPane::Summary,

            location: None,
            summary: SummaryView::new(),
            summary_task: None,
            summary_scroll: 0,
            summary_height: 0,
            summary_rows: 0,

            transcript: Transcript::new(),
            chat_task: None,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,

            show_goto: false,
            goto_input: String::new(),

            status_message: None,

            animation_frame: 0,

            summary_area: None,
            chat_area: None,

            api_base_url: config.api_base_url(),
            summary_client,
            chat_client,
        })
    }

    /// Navigate to a location. A new document triggers a fetch; the fragment
    /// (if it names a tab) selects the active tab either way.
    pub fn open_location(&mut self, location: DocumentLocation) {
        let same_document = self.summary.document() == Some(location.document.as_str());

        if !same_document {
            self.start_summary_load(&location.document);
        }
        if let Some(fragment) = location.fragment.as_deref() {
            self.summary.apply_fragment(fragment);
        }

        self.location = Some(location);
    }

    /// Fetch the summary for `document`, aborting whatever fetch is in flight
    pub fn start_summary_load(&mut self, document: &str) {
        if let Some(previous) = self.summary_task.take() {
            previous.handle.abort();
        }

        let ticket = self.summary.begin_load(document);
        self.summary_scroll = 0;

        let client = self.summary_client.clone();
        let doc = document.to_string();
        let handle = tokio::spawn(async move { client.fetch(&doc).await });

        self.summary_task = Some(SummaryTask { ticket, handle });
    }

    /// Send whatever is in the chat input. Blank input and sends while a
    /// reply is outstanding are ignored.
    pub fn send_chat(&mut self) {
        let Some(request) = self.transcript.submit() else {
            return;
        };

        // Scroll to bottom so the typing indicator is visible
        self.scroll_chat_to_bottom();

        let client = self.chat_client.clone();
        self.chat_task = Some(tokio::spawn(async move { client.send(&request).await }));
    }

    /// Apply the results of any background task that has finished
    pub async fn poll_tasks(&mut self) {
        if self.summary_task.as_ref().is_some_and(|t| t.handle.is_finished()) {
            if let Some(task) = self.summary_task.take() {
                let outcome = match task.handle.await {
                    Ok(result) => result.map_err(|e| e.to_string()),
                    Err(e) => Err(format!("summary task failed: {}", e)),
                };
                self.summary.finish_load(&task.ticket, outcome);
            }
        }

        if self.chat_task.as_ref().is_some_and(|t| t.is_finished()) {
            if let Some(handle) = self.chat_task.take() {
                let outcome = match handle.await {
                    Ok(result) => result.map_err(|e| e.to_string()),
                    Err(e) => Err(format!("chat task failed: {}", e)),
                };
                self.transcript.complete(outcome);
                self.scroll_chat_to_bottom();
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.summary.loading || self.transcript.is_sending()
    }

    // Tabs

    pub fn select_tab(&mut self, tab: SummaryTab) {
        if self.summary.active_tab != tab {
            self.summary.select_tab(tab);
            self.summary_scroll = 0;
        }
    }

    pub fn next_tab(&mut self) {
        self.select_tab(self.summary.active_tab.next());
    }

    pub fn prev_tab(&mut self) {
        self.select_tab(self.summary.active_tab.prev());
    }

    // Scrolling

    pub fn scroll_down(&mut self) {
        match self.focus {
            FocusPane::Summary => {
                let max = self.summary_rows.saturating_sub(self.summary_height.max(1));
                self.summary_scroll = self.summary_scroll.saturating_add(1).min(max);
            }
            FocusPane::Chat => self.chat_scroll = self.chat_scroll.saturating_add(1),
        }
    }

    pub fn scroll_up(&mut self) {
        match self.focus {
            FocusPane::Summary => self.summary_scroll = self.summary_scroll.saturating_sub(1),
            FocusPane::Chat => self.chat_scroll = self.chat_scroll.saturating_sub(1),
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            FocusPane::Summary => FocusPane::Chat,
            FocusPane::Chat => FocusPane::Summary,
        };
    }

    // Chat helpers

    pub fn clear_chat(&mut self) {
        if self.transcript.clear() {
            self.chat_scroll = 0;
        } else {
            self.status_message = Some("Wait for the reply before clearing the chat".to_string());
        }
    }

    pub fn use_quick_reply(&mut self, idx: usize) {
        if self.transcript.use_quick_reply(idx) {
            self.focus = FocusPane::Chat;
            self.input_mode = InputMode::Editing;
        }
    }

    /// Link into a fresh drafting session for the current document
    pub fn drafting_link(&self) -> Option<String> {
        let document = &self.location.as_ref()?.document;
        match playground_link(&self.api_base_url, document) {
            Ok(link) => Some(link),
            Err(e) => {
                tracing::error!("could not build drafting link: {}", e);
                None
            }
        }
    }

    // Go-to prompt

    pub fn open_goto(&mut self) {
        self.show_goto = true;
        self.goto_input = self
            .location
            .as_ref()
            .map(|loc| loc.document.clone())
            .unwrap_or_default();
    }

    pub fn submit_goto(&mut self) {
        match DocumentLocation::parse(&self.goto_input) {
            Some(location) => {
                self.show_goto = false;
                self.goto_input.clear();
                self.status_message = None;
                self.open_location(location);
            }
            None => {
                self.status_message = Some("Enter a document identifier".to_string());
            }
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_busy() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    /// Scroll chat so the newest turn (or the typing indicator) is visible
    pub fn scroll_chat_to_bottom(&mut self) {
        // Use actual chat width for wrap calculation, default to 30 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            30
        };

        let mut total_lines: usize = 0;

        for msg in self.transcript.messages() {
            total_lines = total_lines.saturating_add(1); // Role line ("You:" or "Assistant:")
            for line in msg.content.lines() {
                let char_count = line.chars().count();
                total_lines = total_lines.saturating_add(char_count / wrap_width + 1);
            }
            total_lines = total_lines.saturating_add(1); // Blank line after message
        }

        if self.transcript.is_sending() {
            total_lines = total_lines.saturating_add(2);
        }

        let total_lines = u16::try_from(total_lines).unwrap_or(u16::MAX);

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        self.chat_scroll = total_lines.saturating_sub(visible_height);
    }

    pub fn header_title(&self) -> String {
        if self.summary.loading || self.summary.summary.grant_name.is_empty() {
            match self.summary.document() {
                Some(doc) => doc.to_string(),
                None => String::new(),
            }
        } else {
            self.summary.summary.grant_name.clone()
        }
    }

    pub fn chat_role_label(role: ChatRole) -> &'static str {
        match role {
            ChatRole::User => "You:",
            ChatRole::Bot => "Assistant:",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grant_checklist_core::{ChatMessage, FALLBACK_REPLY};
    use std::time::Duration;

    /// Config pointing at a port nothing listens on
    async fn unreachable_config() -> Config {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        Config {
            api_base_url: Some(format!("http://{}", addr)),
            request_timeout_secs: Some(2),
            ..Config::new()
        }
    }

    async fn settle(app: &mut App) {
        for _ in 0..500 {
            app.poll_tasks().await;
            if app.summary_task.is_none() && app.chat_task.is_none() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("background tasks did not finish");
    }

    #[tokio::test]
    async fn test_open_location_starts_load_and_applies_fragment() {
        let mut app = App::new(&unreachable_config().await).unwrap();
        app.open_location(DocumentLocation::parse("doc-1#deadlines").unwrap());

        assert!(app.summary.loading);
        assert!(app.summary_task.is_some());
        assert_eq!(app.summary.active_tab, SummaryTab::Deadlines);

        settle(&mut app).await;
        assert!(!app.summary.loading);
        assert_eq!(app.summary.summary.eligibility, "");
        assert_eq!(app.summary.summary.grant_name, "");
    }

    #[tokio::test]
    async fn test_same_document_fragment_change_does_not_refetch() {
        let mut app = App::new(&unreachable_config().await).unwrap();
        app.open_location(DocumentLocation::parse("doc-1").unwrap());
        settle(&mut app).await;

        app.open_location(DocumentLocation::parse("doc-1#narrative").unwrap());
        assert!(app.summary_task.is_none());
        assert!(!app.summary.loading);
        assert_eq!(app.summary.active_tab, SummaryTab::Narrative);
    }

    #[tokio::test]
    async fn test_switching_document_supersedes_previous_load() {
        let mut app = App::new(&unreachable_config().await).unwrap();
        app.open_location(DocumentLocation::parse("doc-1").unwrap());
        let first = app.summary_task.as_ref().unwrap().ticket.clone();

        app.open_location(DocumentLocation::parse("doc-2").unwrap());
        let second = app.summary_task.as_ref().unwrap().ticket.clone();

        assert!(!app.summary.is_current(&first));
        assert!(app.summary.is_current(&second));

        settle(&mut app).await;
        assert_eq!(app.summary.document(), Some("doc-2"));
        assert!(!app.summary.loading);
    }

    #[tokio::test]
    async fn test_failed_chat_appends_fallback_once() {
        let mut app = App::new(&unreachable_config().await).unwrap();
        app.transcript.set_input("What is the deadline?");
        app.send_chat();

        assert!(app.transcript.is_sending());
        assert_eq!(app.transcript.messages(), &[ChatMessage::user("What is the deadline?")]);

        settle(&mut app).await;
        assert!(!app.transcript.is_sending());
        assert_eq!(
            app.transcript.messages(),
            &[
                ChatMessage::user("What is the deadline?"),
                ChatMessage::bot(FALLBACK_REPLY),
            ]
        );
    }

    #[tokio::test]
    async fn test_blank_send_spawns_nothing() {
        let mut app = App::new(&unreachable_config().await).unwrap();
        app.transcript.set_input("   ");
        app.send_chat();
        assert!(app.chat_task.is_none());
        assert!(app.transcript.messages().is_empty());
        assert_eq!(app.transcript.input(), "   ");
    }

    #[tokio::test]
    async fn test_submit_goto_rejects_empty_input() {
        let mut app = App::new(&unreachable_config().await).unwrap();
        app.open_goto();
        app.goto_input = "#narrative".to_string();
        app.submit_goto();
        assert!(app.show_goto);
        assert!(app.status_message.is_some());
        assert!(app.summary_task.is_none());
    }

    #[tokio::test]
    async fn test_scroll_to_bottom_with_huge_reply() {
        let mut app = App::new(&unreachable_config().await).unwrap();
        app.chat_height = 20;
        app.chat_width = 40;
        app.transcript.set_input("list everything");
        app.transcript.submit();
        app.transcript.complete::<String>(Ok("x\n".repeat(70_000)));

        app.scroll_chat_to_bottom();
        assert_eq!(app.chat_scroll, u16::MAX - 20);
    }

    #[tokio::test]
    async fn test_scroll_to_bottom_short_transcript_stays_at_top() {
        let mut app = App::new(&unreachable_config().await).unwrap();
        app.chat_height = 20;
        app.chat_width = 40;
        app.transcript.set_input("hi");
        app.transcript.submit();
        app.transcript.complete::<String>(Ok("hello".to_string()));

        app.scroll_chat_to_bottom();
        assert_eq!(app.chat_scroll, 0);
    }

    #[tokio::test]
    async fn test_drafting_link_uses_current_document() {
        let mut app = App::new(&unreachable_config().await).unwrap();
        assert_eq!(app.drafting_link(), None);

        app.open_location(DocumentLocation::parse("doc-9").unwrap());
        let link = app.drafting_link().unwrap();
        assert!(link.contains("/chatbot/playground/"));
        assert!(link.ends_with("?folder=doc-9"));
    }
}
