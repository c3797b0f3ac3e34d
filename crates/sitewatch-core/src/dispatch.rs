// ── Operator actions ──
//
// Add, delete, check-now and manual refresh. Every action follows the same
// protocol: local preconditions, one gateway call, then a forced refresh
// cycle on success or an operator notification on failure. One-shot callers
// that never read the view can turn the refresh off.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::dashboard::Dashboard;
use crate::error::CoreError;
use crate::modal::ModalController;
use crate::model::CreatedSite;
use crate::refresh::RefreshOutcome;

pub const MSG_URL_REQUIRED: &str = "Введите URL сайта";
pub const MSG_ADD_FAILED: &str = "Ошибка при добавлении сайта";
pub const MSG_CONFIRM_DELETE: &str = "Вы уверены, что хотите удалить этот сайт из мониторинга?";
pub const MSG_DELETE_FAILED: &str = "Ошибка при удалении сайта";
pub const MSG_CHECK_FAILED: &str = "Ошибка при проверке сайта";

/// The human on the other side of the dashboard.
///
/// `confirm` gates destructive actions; `notify` surfaces failures.
pub trait Operator: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
    fn notify(&self, message: &str);
}

/// Routes operator intents to the backend and keeps the view current.
#[derive(Clone)]
pub struct ActionDispatcher {
    dashboard: Dashboard,
    operator: Arc<dyn Operator>,
    refresh_after: bool,
}

impl ActionDispatcher {
    pub fn new(dashboard: Dashboard, operator: Arc<dyn Operator>) -> Self {
        Self {
            dashboard,
            operator,
            refresh_after: true,
        }
    }

    /// Skip the refresh cycle after a successful action.
    pub fn without_refresh(mut self) -> Self {
        self.refresh_after = false;
        self
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Submit the add-site form.
    ///
    /// On success the modal is hidden and its form cleared. On any failure
    /// the modal keeps its state so the operator can correct the input.
    pub async fn add_site(&self, modal: &mut ModalController) -> Result<CreatedSite, CoreError> {
        let (url, name) = modal.form().trimmed();
        let created = self.create_site(&url, &name).await?;
        modal.complete();
        Ok(created)
    }

    /// Register a site with already-collected values. `url` and `name`
    /// are trimmed; an empty url is rejected without a request.
    pub async fn create_site(&self, url: &str, name: &str) -> Result<CreatedSite, CoreError> {
        let url = url.trim();
        let name = name.trim();
        if url.is_empty() {
            self.operator.notify(MSG_URL_REQUIRED);
            return Err(CoreError::Validation {
                message: MSG_URL_REQUIRED.to_owned(),
                status: None,
            });
        }

        match self.dashboard.client().create_site(url, name).await {
            Ok(created) => {
                info!(site_id = ?created.id(), url, "site added");
                self.settle().await;
                Ok(created)
            }
            Err(e) => Err(self.fail(e.into(), MSG_ADD_FAILED)),
        }
    }

    /// Remove a site after the operator confirms.
    pub async fn delete_site(&self, id: i64) -> Result<(), CoreError> {
        if !self.operator.confirm(MSG_CONFIRM_DELETE) {
            debug!(site_id = id, "delete declined");
            return Err(CoreError::UserAbort);
        }

        match self.dashboard.client().delete_site(id).await {
            Ok(()) => {
                info!(site_id = id, "site deleted");
                self.settle().await;
                Ok(())
            }
            Err(e) => Err(self.fail(e.into(), MSG_DELETE_FAILED)),
        }
    }

    /// Ask the backend to probe a site now.
    pub async fn check_now(&self, id: i64) -> Result<(), CoreError> {
        match self.dashboard.client().force_check(id).await {
            Ok(()) => {
                info!(site_id = id, "check requested");
                self.settle().await;
                Ok(())
            }
            Err(e) => Err(self.fail(e.into(), MSG_CHECK_FAILED)),
        }
    }

    /// Run a refresh cycle outside the poller's cadence.
    pub async fn refresh(&self) -> RefreshOutcome {
        self.dashboard.refresh().await
    }

    async fn settle(&self) {
        if self.refresh_after {
            self.dashboard.refresh().await;
        }
    }

    fn fail(&self, err: CoreError, fallback: &str) -> CoreError {
        warn!(error = %err, "action failed");
        self.operator.notify(&err.operator_message(fallback));
        err
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::config::DashboardConfig;
    use crate::modal::ModalState;

    #[derive(Default)]
    struct Recorder {
        answer: bool,
        prompts: Mutex<Vec<String>>,
        notices: Mutex<Vec<String>>,
    }

    impl Operator for Recorder {
        fn confirm(&self, prompt: &str) -> bool {
            self.prompts.lock().unwrap().push(prompt.to_owned());
            self.answer
        }

        fn notify(&self, message: &str) {
            self.notices.lock().unwrap().push(message.to_owned());
        }
    }

    fn offline(operator: Arc<Recorder>) -> ActionDispatcher {
        let config = DashboardConfig::new("http://127.0.0.1:9".parse().unwrap());
        ActionDispatcher::new(Dashboard::new(config).unwrap(), operator)
    }

    #[tokio::test]
    async fn blank_url_is_rejected_locally() {
        let operator = Arc::new(Recorder::default());
        let dispatcher = offline(operator.clone());
        let mut modal = ModalController::new();
        modal.open();
        modal.set_url("   ");
        modal.set_name("Shop");

        let err = dispatcher.add_site(&mut modal).await.unwrap_err();

        assert!(matches!(err, CoreError::Validation { .. }));
        assert_eq!(*operator.notices.lock().unwrap(), vec![MSG_URL_REQUIRED]);
        assert_eq!(modal.state(), ModalState::Visible);
        assert_eq!(modal.form().name, "Shop");
    }

    #[tokio::test]
    async fn declined_delete_sends_nothing() {
        let operator = Arc::new(Recorder::default());
        let dispatcher = offline(operator.clone());

        let err = dispatcher.delete_site(7).await.unwrap_err();

        assert!(err.is_user_abort());
        assert_eq!(*operator.prompts.lock().unwrap(), vec![MSG_CONFIRM_DELETE]);
        assert!(operator.notices.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn network_failure_uses_fallback_message() {
        let operator = Arc::new(Recorder::default());
        let dispatcher = offline(operator.clone());

        let err = dispatcher.check_now(3).await.unwrap_err();

        assert!(matches!(err, CoreError::Network { .. }));
        assert_eq!(*operator.notices.lock().unwrap(), vec![MSG_CHECK_FAILED]);
    }

    #[tokio::test]
    async fn failed_add_keeps_modal_open() {
        let operator = Arc::new(Recorder::default());
        let dispatcher = offline(operator.clone());
        let mut modal = ModalController::new();
        modal.open();
        modal.set_url("example.com");

        assert!(dispatcher.add_site(&mut modal).await.is_err());
        assert!(modal.is_visible());
        assert_eq!(modal.form().url, "example.com");
        assert_eq!(*operator.notices.lock().unwrap(), vec![MSG_ADD_FAILED]);
    }
}
