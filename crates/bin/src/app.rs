use banter::{Conversation, Entry, FileRef, Theme};
use tracing::debug;

/// Emoji offered by the picker.
pub const EMOJIS: &[&str] = &["😀", "😂", "😍", "👍", "🎉", "🙏", "😢", "🔥", "❤️", "🤔"];

/// What the input line asks for when submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Plain text (possibly empty, which the conversation ignores).
    Message(String),
    /// `/attach <path>`
    Attach(FileRef),
    /// `/attach` with a path that names no file.
    BadAttach(String),
    /// `/clear`
    ClearHistory,
    /// `/theme`
    ToggleTheme,
}

/// Interprets the input line.
pub fn parse_submission(input: &str) -> Submission {
    let trimmed = input.trim();
    if let Some(rest) = trimmed.strip_prefix("/attach")
        && (rest.is_empty() || rest.starts_with(char::is_whitespace))
    {
        let path = rest.trim();
        return match FileRef::from_path(path) {
            Some(file) if !path.is_empty() => Submission::Attach(file),
            _ => Submission::BadAttach(path.to_string()),
        };
    }
    match trimmed {
        "/clear" => Submission::ClearHistory,
        "/theme" => Submission::ToggleTheme,
        _ => Submission::Message(input.to_string()),
    }
}

pub struct App {
    pub chat: Conversation,

    // Snapshot of the conversation, refreshed every loop iteration
    pub entries: Vec<Entry>,
    pub theme: Theme,
    pub typing: bool,

    // Presentation state
    pub selected: Option<usize>,
    pub emoji_picker: Option<usize>,
    pub status_message: Option<String>,

    pub should_quit: bool,
}

impl App {
    pub async fn new(chat: Conversation) -> Self {
        let mut app = Self {
            chat,
            entries: Vec::new(),
            theme: Theme::default(),
            typing: false,
            selected: None,
            emoji_picker: None,
            status_message: None,
            should_quit: false,
        };
        app.refresh().await;
        app
    }

    /// Pulls the latest entries, theme and typing state from the conversation.
    pub async fn refresh(&mut self) {
        self.entries = self.chat.entries().await;
        self.theme = self.chat.theme().await;
        self.typing = self.chat.is_typing();
        if let Some(index) = self.selected
            && index >= self.entries.len()
        {
            self.selected = self.entries.len().checked_sub(1);
        }
    }

    pub fn draft(&self) -> String {
        self.chat.draft()
    }

    pub fn push_char(&mut self, c: char) {
        let mut draft = self.chat.draft();
        draft.push(c);
        self.chat.compose(draft);
    }

    pub fn pop_char(&mut self) {
        let mut draft = self.chat.draft();
        if draft.pop().is_some() {
            self.chat.compose(draft);
        }
    }

    pub async fn submit(&mut self) {
        match parse_submission(&self.chat.draft()) {
            Submission::Message(text) => {
                if self.chat.send(Some(&text), None).await {
                    self.selected = None;
                }
            }
            Submission::Attach(file) => {
                debug!(name = %file.name, "Attaching file");
                self.chat.send(None, Some(file)).await;
                self.selected = None;
            }
            Submission::BadAttach(path) => {
                self.status_message = Some(format!("Cannot attach '{path}': no file name"));
            }
            Submission::ClearHistory => {
                self.chat.clear_history().await;
                self.chat.compose(String::new());
                self.status_message = Some("History cleared".to_string());
            }
            Submission::ToggleTheme => {
                self.chat.compose(String::new());
                self.toggle_theme().await;
            }
        }
        self.refresh().await;
    }

    pub async fn toggle_theme(&mut self) {
        self.theme = self.chat.toggle_theme().await;
        self.status_message = Some(format!("Theme: {}", self.theme));
    }

    /// Deletes the selected entry if it is one of the user's own.
    pub async fn delete_selected(&mut self) {
        let Some(entry) = self.selected.and_then(|i| self.entries.get(i)) else {
            return;
        };
        if !entry.is_outbound() {
            self.status_message = Some("Only your own messages can be deleted".to_string());
            return;
        }
        let id = entry.id.clone();
        self.chat.delete(&id).await;
        self.refresh().await;
    }

    pub fn select_up(&mut self) {
        self.selected = match self.selected {
            Some(i) => Some(i.saturating_sub(1)),
            None => self.entries.len().checked_sub(1),
        };
    }

    pub fn select_down(&mut self) {
        self.selected = match self.selected {
            Some(i) if i + 1 < self.entries.len() => Some(i + 1),
            // Moving past the newest entry returns to following the conversation.
            _ => None,
        };
    }

    pub fn toggle_emoji_picker(&mut self) {
        self.emoji_picker = match self.emoji_picker {
            Some(_) => None,
            None => Some(0),
        };
    }

    pub fn move_emoji(&mut self, forward: bool) {
        if let Some(i) = self.emoji_picker {
            let len = EMOJIS.len();
            self.emoji_picker = Some(if forward { (i + 1) % len } else { (i + len - 1) % len });
        }
    }

    pub fn insert_emoji(&mut self) {
        if let Some(i) = self.emoji_picker.take() {
            self.chat.insert_emoji(EMOJIS[i]);
        }
    }

    pub fn clear_status_message(&mut self) {
        self.status_message = None;
    }
}
