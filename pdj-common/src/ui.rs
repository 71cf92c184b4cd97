// pdj-common/src/ui.rs
use crate::form::FormFields;
use crate::image::ImageFile;
use crate::{MessageKind, Page};
use std::sync::Arc;
use std::time::Duration;

/// The edit form controls, handed to [`EditPage`](crate::EditPage) instead of
/// being looked up globally.
pub trait EditView: Send + Sync {
    /// Copy values into the form controls
    fn fill_form(&self, fields: &FormFields);

    /// Current values of the form controls
    fn read_form(&self) -> FormFields;

    /// The file chosen in the image input, if any. Only the first file counts.
    fn selected_image(&self) -> Option<Arc<dyn ImageFile>>;

    /// Reset the image input so nothing is selected
    fn clear_image_input(&self);

    fn show_preview(&self, data_url: &str);

    fn hide_preview(&self);
}

/// Where user feedback goes.
pub trait MessageSink: Send + Sync {
    fn show_message(&self, text: &str, kind: MessageKind);
}

/// Page navigation.
pub trait Navigator: Send + Sync {
    /// Leave for `page` right away
    fn navigate(&self, page: Page);

    /// Leave for `page` once `delay` has passed
    fn navigate_after(&self, page: Page, delay: Duration);
}
