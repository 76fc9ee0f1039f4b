//! Headless presentation model
//!
//! [`App`] is the single writer for everything a session shows: the loaded
//! posts, the filter inputs, the assistant conversation and the current
//! view. Front ends call its actions and read [`App::screen`], which
//! re-derives the visible subset on every call.

pub mod render;
pub mod view;

pub use view::{LoadState, Route, Screen};

use crate::assistant::{Assistant, ChatMessage, ConversationLog, Delivered, ScheduledReply};
use crate::client::LocationSource;
use crate::config::FeedConfig;
use crate::error::{Error, Result};
use crate::feed::{FilterState, Post, PostRepository, SharePayload};
use std::time::Duration;

/// Session state for the feed and chat views
#[derive(Debug)]
pub struct App {
    load_state: LoadState,
    repository: PostRepository,
    filter: FilterState,
    assistant: Assistant,
    assistant_open: bool,
    selected: Option<String>,
    route: Route,
}

impl App {
    pub fn new(reply_delay: Duration) -> Self {
        Self {
            load_state: LoadState::Loading,
            repository: PostRepository::new(),
            filter: FilterState::default(),
            assistant: Assistant::new(reply_delay),
            assistant_open: false,
            selected: None,
            route: Route::Feed,
        }
    }

    pub fn from_config(config: &FeedConfig) -> Self {
        Self::new(config.assistant.reply_delay())
    }

    /// Fetch the feed once. A failure leaves no partial feed behind.
    pub async fn load(&mut self, source: &dyn LocationSource) {
        self.load_state = LoadState::Loading;
        match source.fetch_locations().await {
            Ok(posts) => {
                self.repository = PostRepository::from_posts(posts);
                self.load_state = LoadState::Ready;
                tracing::info!(posts = self.repository.len(), "Feed ready");
            }
            Err(e) => {
                tracing::warn!("Feed load failed: {}", e);
                self.repository = PostRepository::new();
                self.load_state = LoadState::Failed(e.to_string());
            }
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn repository(&self) -> &PostRepository {
        &self.repository
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn conversation(&self) -> &ConversationLog {
        self.assistant.log()
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn is_assistant_open(&self) -> bool {
        self.assistant_open
    }

    pub fn is_reply_pending(&self) -> bool {
        self.assistant.is_pending()
    }

    /// Visible posts under the current filters, in load order
    pub fn visible(&self) -> Vec<&Post> {
        self.filter.apply(self.repository.iter())
    }

    /// What the feed view shows
    pub fn screen(&self) -> Screen<'_> {
        match &self.load_state {
            LoadState::Loading => Screen::Loading,
            LoadState::Failed(message) => Screen::Error(message),
            LoadState::Ready => {
                let visible = self.visible();
                if visible.is_empty() {
                    Screen::Empty
                } else {
                    Screen::Posts(visible)
                }
            }
        }
    }

    // =========================================================================
    // Filters
    // =========================================================================

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.filter.active_category = category.into();
        tracing::debug!(category = %self.filter.active_category, "Active category changed");
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.filter.search_query = query.into();
    }

    // =========================================================================
    // Post actions
    // =========================================================================

    pub fn like(&mut self, id: &str) -> Option<bool> {
        self.repository.toggle_liked(id)
    }

    pub fn save(&mut self, id: &str) -> Option<bool> {
        self.repository.toggle_saved(id)
    }

    pub fn share(&self, id: &str) -> Option<SharePayload> {
        let payload = self.repository.share(id)?;
        tracing::info!(title = %payload.title, "Sharing post");
        Some(payload)
    }

    /// Remove a post for the rest of the session
    pub fn dismiss(&mut self, id: &str) -> Option<Post> {
        let removed = self.repository.dismiss(id)?;
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        Some(removed)
    }

    /// Open the detail modal for a post. Returns false for unknown ids.
    pub fn select_post(&mut self, id: &str) -> bool {
        if !self.repository.contains(id) {
            return false;
        }
        self.selected = Some(id.to_string());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Post> {
        self.selected.as_deref().and_then(|id| self.repository.get(id))
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Leave the detail modal for the selected post's chat view
    pub fn start_chat(&mut self) -> Option<&Route> {
        let post_id = self.selected.take()?;
        self.route = Route::Chat { post_id };
        tracing::debug!(route = %self.route, "Navigated");
        Some(&self.route)
    }

    pub fn navigate(&mut self, path: &str) -> Result<()> {
        let route =
            Route::parse(path).ok_or_else(|| Error::NotFound(format!("No view at {}", path)))?;
        self.route = route;
        Ok(())
    }

    pub fn back(&mut self) {
        self.route = Route::Feed;
    }

    /// Post addressed by the chat view, if the route names a loaded one
    pub fn chat_post(&self) -> Option<&Post> {
        match &self.route {
            Route::Chat { post_id } => self.repository.get(post_id),
            Route::Feed => None,
        }
    }

    // =========================================================================
    // Assistant
    // =========================================================================

    /// Open or close the assistant panel. Closing discards a pending reply.
    pub fn toggle_assistant(&mut self) -> bool {
        self.assistant_open = !self.assistant_open;
        if !self.assistant_open && self.assistant.cancel_pending() {
            tracing::debug!("Assistant closed with a reply pending");
        }
        self.assistant_open
    }

    /// Send a chat message. Blank input is ignored; the assistant panel
    /// must be open.
    pub fn send_message(&mut self, text: &str) -> Result<Option<&ChatMessage>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        if !self.assistant_open {
            return Err(Error::Assistant("Assistant is closed".to_string()));
        }
        self.assistant.submit(text).map(Some)
    }

    /// Wait for the pending reply; `None` when nothing is pending
    pub async fn next_reply(&mut self) -> Option<ScheduledReply> {
        self.assistant.next_reply().await
    }

    /// Append a reply to the conversation and apply its category command
    pub fn deliver(&mut self, reply: ScheduledReply) -> Option<Delivered> {
        let delivered = self.assistant.deliver(reply)?;
        if let Some(category) = &delivered.category {
            self.set_category(category.clone());
        }
        Some(delivered)
    }

    pub async fn wait_for_reply(&mut self) -> Option<Delivered> {
        let reply = self.next_reply().await?;
        self.deliver(reply)
    }
}
