// pdj-client/src/terminal.rs
use parking_lot::Mutex;
use pdj_common::{EditView, FormFields, ImageFile, MessageKind, MessageSink, Navigator, Page};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

// Data URLs get long; only this many characters are echoed.
const PREVIEW_ECHO_CHARS: usize = 48;

/// Form state held in memory and echoed to stdout.
#[derive(Default)]
pub struct TerminalView {
    fields: Mutex<FormFields>,
    file: Mutex<Option<Arc<dyn ImageFile>>>,
    preview: Mutex<Option<String>>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change form values the way a user typing into the controls would.
    pub fn type_into(&self, edit: impl FnOnce(&mut FormFields)) {
        edit(&mut self.fields.lock());
    }

    /// Put `file` into the image input.
    pub fn choose(&self, file: Arc<dyn ImageFile>) {
        println!("Selected image: {} ({}, {} bytes)", file.name(), file.media_type(), file.size());
        *self.file.lock() = Some(file);
    }

    #[cfg(test)]
    pub fn preview(&self) -> Option<String> {
        self.preview.lock().clone()
    }

    pub fn print_form(&self) {
        let fields = self.fields.lock();
        println!("Editing product {}", fields.id);
        println!("  Name:  {}", fields.name);
        println!("  Desc:  {}", fields.desc);
        println!("  Price: {}", fields.price);
        println!("  Stock: {}", fields.stock);
    }
}

impl EditView for TerminalView {
    fn fill_form(&self, fields: &FormFields) {
        *self.fields.lock() = fields.clone();
    }

    fn read_form(&self) -> FormFields {
        self.fields.lock().clone()
    }

    fn selected_image(&self) -> Option<Arc<dyn ImageFile>> {
        self.file.lock().clone()
    }

    fn clear_image_input(&self) {
        *self.file.lock() = None;
    }

    fn show_preview(&self, data_url: &str) {
        let shown: String = data_url.chars().take(PREVIEW_ECHO_CHARS).collect();
        let ellipsis = if data_url.chars().count() > PREVIEW_ECHO_CHARS { "..." } else { "" };
        println!("  Image: {}{} ({} chars)", shown, ellipsis, data_url.len());
        *self.preview.lock() = Some(data_url.to_string());
    }

    fn hide_preview(&self) {
        println!("  Image: (none)");
        *self.preview.lock() = None;
    }
}

/// Prints messages to stderr with their severity.
pub struct ConsoleMessages;

impl MessageSink for ConsoleMessages {
    fn show_message(&self, text: &str, kind: MessageKind) {
        warn!("{}", text);
        eprintln!("[{}] {}", kind, text);
    }
}

/// Remembers where the page wants to go; [`settle`](Self::settle) performs it.
#[derive(Default)]
pub struct TerminalNavigator {
    pending: Mutex<Option<(Page, Duration)>>,
}

impl TerminalNavigator {
    #[cfg(test)]
    pub fn pending(&self) -> Option<(Page, Duration)> {
        *self.pending.lock()
    }

    /// Wait out any requested delay, then report the destination.
    pub async fn settle(&self) -> Option<Page> {
        let (page, delay) = self.pending.lock().take()?;
        if !delay.is_zero() {
            println!("Redirecting to {} in {} ms...", page, delay.as_millis());
            tokio::time::sleep(delay).await;
        }
        info!("Navigating to {}", page);
        println!("-> {}", page);
        Some(page)
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, page: Page) {
        *self.pending.lock() = Some((page, Duration::ZERO));
    }

    fn navigate_after(&self, page: Page, delay: Duration) {
        *self.pending.lock() = Some((page, delay));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdj_common::InMemoryFile;

    #[test]
    fn view_round_trips_form_and_file() {
        let view = TerminalView::new();
        view.fill_form(&FormFields { id: "1".to_string(), name: "A".to_string(), ..Default::default() });
        view.type_into(|f| f.price = "9".to_string());

        let fields = view.read_form();
        assert_eq!(fields.name, "A");
        assert_eq!(fields.price, "9");

        view.choose(Arc::new(InMemoryFile::new("a.png", "image/png", vec![1])));
        assert!(view.selected_image().is_some());
        view.clear_image_input();
        assert!(view.selected_image().is_none());
    }

    #[test]
    fn preview_tracks_show_and_hide() {
        let view = TerminalView::new();
        view.show_preview("data:image/png;base64,AAAA");
        assert_eq!(view.preview().as_deref(), Some("data:image/png;base64,AAAA"));
        view.hide_preview();
        assert_eq!(view.preview(), None);
    }

    #[tokio::test]
    async fn navigator_settles_immediate_navigation() {
        let navigator = TerminalNavigator::default();
        assert_eq!(navigator.settle().await, None);

        navigator.navigate(Page::List);
        assert_eq!(navigator.pending(), Some((Page::List, Duration::ZERO)));
        assert_eq!(navigator.settle().await, Some(Page::List));
        assert_eq!(navigator.pending(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn navigator_waits_for_delayed_navigation() {
        let navigator = TerminalNavigator::default();
        navigator.navigate_after(Page::Create, Duration::from_millis(1500));

        let started = tokio::time::Instant::now();
        assert_eq!(navigator.settle().await, Some(Page::Create));
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }
}
