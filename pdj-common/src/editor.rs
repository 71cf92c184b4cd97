// pdj-common/src/editor.rs
use crate::error::EditError;
use crate::form::{merge_edit, FormFields};
use crate::image;
use crate::product_store::{find_product, ProductStore};
use crate::query::query_param;
use crate::ui::{EditView, MessageSink, Navigator};
use crate::{MessageKind, Page, Product, REDIRECT_DELAY};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Where a submit currently stands.
///
/// `Idle -> Validating -> (Idle | ImagePending | NoNewImage) -> Persisting -> Redirected`.
/// Validation, image and storage failures fall back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Validating,
    ImagePending,
    NoNewImage,
    Persisting,
    Redirected,
}

/// Controller for the product edit page.
pub struct EditPage {
    store: Arc<dyn ProductStore>,
    view: Arc<dyn EditView>,
    messages: Arc<dyn MessageSink>,
    navigator: Arc<dyn Navigator>,
    state: Mutex<SubmitState>,
}

impl EditPage {
    pub fn new(
        store: Arc<dyn ProductStore>,
        view: Arc<dyn EditView>,
        messages: Arc<dyn MessageSink>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        EditPage {
            store,
            view,
            messages,
            navigator,
            state: Mutex::new(SubmitState::Idle),
        }
    }

    pub fn state(&self) -> SubmitState {
        *self.state.lock()
    }

    fn set_state(&self, next: SubmitState) {
        let mut state = self.state.lock();
        debug!("Submit state {:?} -> {:?}", *state, next);
        *state = next;
    }

    /// Page load: take the product id from `href` and fill the form.
    pub fn open(&self, href: &str) -> Result<Product, EditError> {
        match query_param(href, "id") {
            Some(id) => self.load_into_form(&id),
            None => Err(self.leave_for_create(EditError::MissingIdParameter)),
        }
    }

    /// Fill the form and preview from the stored product `id`.
    pub fn load_into_form(&self, id: &str) -> Result<Product, EditError> {
        let records = self.store.load();
        let Some(product) = find_product(&records, id) else {
            return Err(self.leave_for_create(EditError::RecordNotFound { id: id.to_string() }));
        };

        self.view.fill_form(&FormFields::from_product(&product));
        match product.image() {
            Some(data_url) => self.view.show_preview(data_url),
            None => self.view.hide_preview(),
        }
        info!("Loaded product {} into the edit form", id);
        Ok(product)
    }

    /// Image input changed: validate the new file and preview it.
    ///
    /// Returns the preview data URL, or `None` when the input was emptied.
    pub async fn select_image(&self) -> Result<Option<String>, EditError> {
        let Some(file) = self.view.selected_image() else {
            self.view.hide_preview();
            return Ok(None);
        };

        let outcome = image::intake(file.as_ref()).await;
        if self.state() == SubmitState::Redirected {
            debug!("Page left while {} was read; preview skipped", file.name());
            return Err(EditError::Abandoned);
        }
        match outcome {
            Ok(data_url) => {
                self.view.show_preview(&data_url);
                Ok(Some(data_url))
            }
            Err(e) => Err(self.reject_image(e.into())),
        }
    }

    /// Form submit: validate, resolve the image, save and go to the listing.
    ///
    /// On `Err` the message has already been shown; the page is either back to
    /// `Idle` or on its way to another page. `Abandoned` means the user left
    /// mid-submit and nothing was saved.
    pub async fn submit(&self) -> Result<Page, EditError> {
        {
            let mut state = self.state.lock();
            if *state != SubmitState::Idle {
                warn!("Submit ignored while {:?}", *state);
                return Err(EditError::Busy(*state));
            }
            *state = SubmitState::Validating;
        }

        let fields = self.view.read_form();
        let edit = match fields.validate() {
            Ok(edit) => edit,
            Err(e) => {
                warn!("Edit form rejected: {}", e);
                self.set_state(SubmitState::Idle);
                return Err(self.report(e.into()));
            }
        };

        let records = self.store.load();
        let Some(existing) = find_product(&records, &fields.id) else {
            return Err(self.leave_for_create(EditError::RecordNotFound { id: fields.id }));
        };

        let image = match self.view.selected_image() {
            Some(file) => {
                self.set_state(SubmitState::ImagePending);
                let outcome = image::intake(file.as_ref()).await;
                // Cancel or go-to-create may have run while the image was read.
                if self.state() != SubmitState::ImagePending {
                    info!("Page left during submit; edits to {} discarded", fields.id);
                    return Err(EditError::Abandoned);
                }
                match outcome {
                    Ok(data_url) => Some(data_url),
                    Err(e) => {
                        self.set_state(SubmitState::Idle);
                        return Err(self.reject_image(e.into()));
                    }
                }
            }
            None => {
                self.set_state(SubmitState::NoNewImage);
                existing.image().map(str::to_string)
            }
        };

        let edit = edit.with_image(image);
        let Some(updated) = merge_edit(&records, &fields.id, &edit) else {
            return Err(self.leave_for_create(EditError::RecordNotFound { id: fields.id }));
        };

        self.set_state(SubmitState::Persisting);
        if let Err(e) = self.store.save(&updated) {
            self.set_state(SubmitState::Idle);
            return Err(self.report(e.into()));
        }

        info!("Saved edits to product {}", fields.id);
        self.set_state(SubmitState::Redirected);
        self.navigator.navigate(Page::List);
        Ok(Page::List)
    }

    /// Cancel button: back to the listing, edits discarded.
    pub fn cancel(&self) {
        self.set_state(SubmitState::Redirected);
        self.navigator.navigate(Page::List);
    }

    pub fn go_to_create(&self) {
        self.set_state(SubmitState::Redirected);
        self.navigator.navigate(Page::Create);
    }

    fn report(&self, err: EditError) -> EditError {
        self.messages.show_message(err.user_message(), MessageKind::Error);
        err
    }

    fn reject_image(&self, err: EditError) -> EditError {
        self.view.clear_image_input();
        self.view.hide_preview();
        self.report(err)
    }

    fn leave_for_create(&self, err: EditError) -> EditError {
        warn!("Leaving edit page: {}", err);
        self.set_state(SubmitState::Redirected);
        self.navigator.navigate_after(Page::Create, REDIRECT_DELAY);
        self.report(err)
    }
}
