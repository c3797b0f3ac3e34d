//! Add-site dialog: visibility state machine plus its form fields.
//!
//! The controller is the only owner of its state. Dismissal by clicking
//! outside the dialog is an explicit subscription: the front-end forwards
//! pointer targets to [`ModalController::on_pointer`], which closes only
//! when the target is the backdrop element.

use crate::escape::escape_html;

/// Element id of the modal backdrop.
pub const BACKDROP_ID: &str = "add-site-modal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Hidden,
    Visible,
}

/// Field values of the add-site form, as typed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddSiteForm {
    pub url: String,
    pub name: String,
}

impl AddSiteForm {
    /// Trimmed `(url, name)` ready for submission.
    pub fn trimmed(&self) -> (String, String) {
        (self.url.trim().to_owned(), self.name.trim().to_owned())
    }
}

#[derive(Debug, Default)]
pub struct ModalController {
    state: ModalState,
    form: AddSiteForm,
}

impl ModalController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ModalState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state == ModalState::Visible
    }

    pub fn open(&mut self) {
        self.state = ModalState::Visible;
    }

    /// Hide the dialog. The form keeps whatever was typed.
    pub fn close(&mut self) {
        self.state = ModalState::Hidden;
    }

    /// Successful submission: hide the dialog and clear the form.
    pub fn complete(&mut self) {
        self.state = ModalState::Hidden;
        self.form = AddSiteForm::default();
    }

    /// Pointer interaction on the page. Closes when `target_id` is the
    /// backdrop; clicks inside the dialog content are ignored. Returns
    /// `true` if the dialog was closed.
    pub fn on_pointer(&mut self, target_id: &str) -> bool {
        if self.is_visible() && target_id == BACKDROP_ID {
            self.close();
            return true;
        }
        false
    }

    pub fn form(&self) -> &AddSiteForm {
        &self.form
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.form.url = url.into();
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.form.name = name.into();
    }

    /// The dialog's markup, reflecting visibility and current field values.
    pub fn markup(&self) -> String {
        let display = if self.is_visible() { "block" } else { "none" };
        format!(
            r#"<div id="{BACKDROP_ID}" class="modal" style="display: {display}">
    <div class="modal-content">
        <h2>Добавить сайт</h2>
        <form id="add-site-form">
            <label for="site-url">URL сайта</label>
            <input type="text" id="site-url" name="url" value="{url}" required>
            <label for="site-name">Название (необязательно)</label>
            <input type="text" id="site-name" name="name" value="{name}">
            <button type="submit" class="btn btn-primary">Добавить</button>
        </form>
    </div>
</div>
"#,
            url = escape_html(&self.form.url),
            name = escape_html(&self.form.name),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_hidden() {
        let modal = ModalController::new();
        assert_eq!(modal.state(), ModalState::Hidden);
        assert!(modal.markup().contains("display: none"));
    }

    #[test]
    fn open_and_close() {
        let mut modal = ModalController::new();
        modal.open();
        assert!(modal.is_visible());
        assert!(modal.markup().contains("display: block"));
        modal.close();
        assert!(!modal.is_visible());
    }

    #[test]
    fn close_preserves_form() {
        let mut modal = ModalController::new();
        modal.open();
        modal.set_url("example.com");
        modal.close();
        assert_eq!(modal.form().url, "example.com");
    }

    #[test]
    fn complete_hides_and_clears() {
        let mut modal = ModalController::new();
        modal.open();
        modal.set_url("example.com");
        modal.set_name("Example");
        modal.complete();
        assert_eq!(modal.state(), ModalState::Hidden);
        assert_eq!(*modal.form(), AddSiteForm::default());
    }

    #[test]
    fn backdrop_click_closes() {
        let mut modal = ModalController::new();
        modal.open();
        assert!(modal.on_pointer(BACKDROP_ID));
        assert_eq!(modal.state(), ModalState::Hidden);
    }

    #[test]
    fn content_click_keeps_open() {
        let mut modal = ModalController::new();
        modal.open();
        assert!(!modal.on_pointer("site-url"));
        assert!(!modal.on_pointer("add-site-form"));
        assert!(modal.is_visible());
    }

    #[test]
    fn pointer_while_hidden_is_ignored() {
        let mut modal = ModalController::new();
        assert!(!modal.on_pointer(BACKDROP_ID));
        assert_eq!(modal.state(), ModalState::Hidden);
    }

    #[test]
    fn form_values_are_escaped_in_markup() {
        let mut modal = ModalController::new();
        modal.set_url(r#"x" onfocus="alert(1)"#);
        let markup = modal.markup();
        assert!(markup.contains(r#"value="x&quot; onfocus=&quot;alert(1)""#));
    }

    #[test]
    fn trimmed_submission() {
        let form = AddSiteForm {
            url: "  example.com ".into(),
            name: "\tShop\n".into(),
        };
        assert_eq!(form.trimmed(), ("example.com".into(), "Shop".into()));
    }
}
