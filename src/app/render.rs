//! Plain-text rendering for terminal front ends

use super::view::Screen;
use crate::assistant::{ChatMessage, ConversationLog, Sender};
use crate::feed::{Highlighter, Post, CATEGORY_TABS};
use std::fmt::Write;

pub const LOADING_TEXT: &str = "Loading...";
pub const EMPTY_TITLE: &str = "No matches found";
pub const EMPTY_HINT: &str =
    "Try adjusting your search terms or filters to find what you're looking for.";

/// One feed card: title, location line, tags and the short description,
/// with the search query highlighted
pub fn render_card(post: &Post, query: &str, highlighter: &Highlighter) -> String {
    let mut out = String::new();

    let mut marks = String::new();
    if post.liked {
        marks.push_str(" [liked]");
    }
    if post.saved {
        marks.push_str(" [saved]");
    }
    let _ = writeln!(out, "{}{}", highlighter.highlight(&post.title, query), marks);

    let area = highlighter.highlight(&post.area, query);
    match (area.is_empty(), post.category_type.is_empty()) {
        (false, false) => {
            let _ = writeln!(out, "  {} · {}", area, post.category_type);
        }
        (false, true) => {
            let _ = writeln!(out, "  {}", area);
        }
        (true, false) => {
            let _ = writeln!(out, "  {}", post.category_type);
        }
        (true, true) => {}
    }

    if !post.themes.is_empty() {
        let themes: Vec<String> = post
            .themes
            .iter()
            .map(|t| format!("#{}", highlighter.highlight(t, query)))
            .collect();
        let _ = writeln!(out, "  {}", themes.join(" "));
    }

    if !post.short_description.is_empty() {
        let _ = writeln!(
            out,
            "  {}",
            highlighter.highlight(&post.short_description, query)
        );
    }

    out
}

/// Whole feed screen
pub fn render_screen(screen: &Screen<'_>, query: &str, highlighter: &Highlighter) -> String {
    match screen {
        Screen::Loading => format!("{}\n", LOADING_TEXT),
        Screen::Error(message) => format!("Error\n{}\n", message),
        Screen::Empty => format!("{}\n{}\n", EMPTY_TITLE, EMPTY_HINT),
        Screen::Posts(posts) => posts
            .iter()
            .map(|post| render_card(post, query, highlighter))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Category tab bar, one tab per line, the active one starred
pub fn render_category_tabs(active_category: &str) -> String {
    let active = active_category.trim();
    CATEGORY_TABS
        .iter()
        .map(|tab| {
            let marker = if tab.id.eq_ignore_ascii_case(active) { '*' } else { ' ' };
            format!("{} {:<14}{}\n", marker, tab.id, tab.name)
        })
        .collect()
}

/// One chat line, stamped with the local `HH:MM`
pub fn render_message(message: &ChatMessage) -> String {
    let who = match message.sender {
        Sender::User => "You",
        Sender::Assistant => "Assistant",
    };
    format!(
        "[{}] {}: {}",
        message.timestamp.with_timezone(&chrono::Local).format("%H:%M"),
        who,
        message.message
    )
}

pub fn render_conversation(log: &ConversationLog) -> String {
    log.messages()
        .iter()
        .map(|m| render_message(m) + "\n")
        .collect()
}
