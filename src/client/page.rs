use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use super::{api::ResourceApi, forms::FormModel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

/// List + add/edit/delete flow for one resource. A failed call pushes an
/// error toast and leaves `items` as they were.
pub struct ResourcePage<E: FormModel> {
    api: Arc<dyn ResourceApi<E>>,
    pub items: Vec<E>,
    pub load: LoadState,
    pub submit: SubmitState,
    /// Id of the record being edited; `None` means the form creates.
    pub editing: Option<Uuid>,
    pub form: Option<E::Create>,
    pub toasts: Vec<Toast>,
}

impl<E: FormModel> ResourcePage<E> {
    pub fn new(api: Arc<dyn ResourceApi<E>>) -> Self {
        Self {
            api,
            items: Vec::new(),
            load: LoadState::Idle,
            submit: SubmitState::Idle,
            editing: None,
            form: None,
            toasts: Vec::new(),
        }
    }

    pub async fn mount(&mut self) {
        self.load = LoadState::Loading;
        match self.api.list().await {
            Ok(items) => {
                self.items = items;
                self.load = LoadState::Loaded;
            }
            Err(e) => {
                self.load = LoadState::Failed(e.to_string());
                self.error(format!("Failed to load {}s", E::NAME), &e);
            }
        }
    }

    pub fn edit(&mut self, record: &E) {
        self.editing = Some(record.id());
        self.form = Some(record.prefill());
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.form = None;
    }

    /// Creates, or updates the record under edit, then re-fetches the list.
    pub async fn submit(&mut self, form: E::Create) {
        self.submit = SubmitState::Submitting;
        let result = match self.editing {
            Some(id) => self.api.update(id, &E::into_patch(form)).await,
            None => self.api.create(&form).await,
        };
        match result {
            Ok(_) => {
                let verb = if self.editing.is_some() { "updated" } else { "added" };
                self.submit = SubmitState::Succeeded;
                self.success(format!("{} {verb} successfully", capitalize(E::NAME)));
                self.cancel_edit();
                self.refresh().await;
            }
            Err(e) => {
                self.submit = SubmitState::Failed(e.to_string());
                self.error(format!("Failed to save {}", E::NAME), &e);
            }
        }
    }

    /// Does nothing unless `confirmed`. Returns whether a delete was sent
    /// and succeeded.
    pub async fn delete(&mut self, id: Uuid, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }
        match self.api.delete(id).await {
            Ok(()) => {
                self.success(format!("{} deleted successfully", capitalize(E::NAME)));
                self.refresh().await;
                true
            }
            Err(e) => {
                self.error(format!("Failed to delete {}", E::NAME), &e);
                false
            }
        }
    }

    async fn refresh(&mut self) {
        match self.api.list().await {
            Ok(items) => self.items = items,
            Err(e) => self.error(format!("Failed to load {}s", E::NAME), &e),
        }
    }

    fn success(&mut self, message: String) {
        self.toasts.push(Toast {
            kind: ToastKind::Success,
            message,
        });
    }

    fn error(&mut self, message: String, cause: &dyn std::fmt::Display) {
        warn!(error = %cause, "{message}");
        self.toasts.push(Toast {
            kind: ToastKind::Error,
            message,
        });
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        client::api::ApiError,
        trainers::{CreateTrainer, Trainer, UpdateTrainer},
    };
    use async_trait::async_trait;
    use time::OffsetDateTime;
    use tokio::sync::Mutex;

    /// In-process stand-in for the API with a switch to fail every call.
    #[derive(Default)]
    struct FakeApi {
        rows: Mutex<Vec<Trainer>>,
        failing: std::sync::atomic::AtomicBool,
    }

    impl FakeApi {
        fn fail(&self, on: bool) {
            self.failing.store(on, std::sync::atomic::Ordering::SeqCst);
        }

        fn check(&self) -> Result<(), ApiError> {
            if self.failing.load(std::sync::atomic::Ordering::SeqCst) {
                return Err(ApiError::Status {
                    status: 500,
                    message: "Internal server error".into(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ResourceApi<Trainer> for FakeApi {
        async fn list(&self) -> Result<Vec<Trainer>, ApiError> {
            self.check()?;
            Ok(self.rows.lock().await.clone())
        }

        async fn create(&self, input: &CreateTrainer) -> Result<Trainer, ApiError> {
            self.check()?;
            let now = OffsetDateTime::now_utc();
            let row = Trainer {
                id: Uuid::new_v4(),
                name: input.name.clone(),
                specialization: input.specialization.clone(),
                created_at: now,
                updated_at: now,
            };
            self.rows.lock().await.push(row.clone());
            Ok(row)
        }

        async fn update(&self, id: Uuid, patch: &UpdateTrainer) -> Result<Trainer, ApiError> {
            self.check()?;
            let mut rows = self.rows.lock().await;
            let row = rows.iter_mut().find(|r| r.id == id).ok_or(ApiError::Status {
                status: 404,
                message: "Not found".into(),
            })?;
            if let Some(name) = &patch.name {
                row.name = name.clone();
            }
            if let Some(spec) = &patch.specialization {
                row.specialization = spec.clone();
            }
            Ok(row.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
            self.check()?;
            self.rows.lock().await.retain(|r| r.id != id);
            Ok(())
        }
    }

    fn coach(name: &str) -> CreateTrainer {
        CreateTrainer {
            name: name.into(),
            specialization: "Yoga".into(),
        }
    }

    fn page() -> (ResourcePage<Trainer>, Arc<FakeApi>) {
        let api = Arc::new(FakeApi::default());
        (ResourcePage::<Trainer>::new(api.clone()), api)
    }

    #[tokio::test]
    async fn mount_loads_or_fails() {
        let (mut page, api) = page();
        assert_eq!(page.load, LoadState::Idle);
        page.mount().await;
        assert_eq!(page.load, LoadState::Loaded);

        api.fail(true);
        page.mount().await;
        assert!(matches!(page.load, LoadState::Failed(_)));
        assert_eq!(page.toasts.last().unwrap().kind, ToastKind::Error);
    }

    #[tokio::test]
    async fn submit_creates_then_edits() {
        let (mut page, _api) = page();
        page.mount().await;

        page.submit(coach("Kai")).await;
        assert_eq!(page.submit, SubmitState::Succeeded);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.toasts.last().unwrap().message, "Trainer added successfully");

        let record = page.items[0].clone();
        page.edit(&record);
        assert_eq!(page.editing, Some(record.id));
        assert_eq!(page.form.as_ref().unwrap().name, "Kai");

        page.submit(coach("Kai Lee")).await;
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "Kai Lee");
        assert_eq!(page.editing, None);
        assert_eq!(page.toasts.last().unwrap().message, "Trainer updated successfully");
    }

    #[tokio::test]
    async fn failed_submit_keeps_previous_list() {
        let (mut page, api) = page();
        page.submit(coach("Kai")).await;
        api.fail(true);
        page.submit(coach("Other")).await;
        assert!(matches!(page.submit, SubmitState::Failed(_)));
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.toasts.last().unwrap().message, "Failed to save trainer");
    }

    #[tokio::test]
    async fn delete_requires_confirmation() {
        let (mut page, _api) = page();
        page.submit(coach("Kai")).await;
        let id = page.items[0].id;

        assert!(!page.delete(id, false).await);
        assert_eq!(page.items.len(), 1);

        assert!(page.delete(id, true).await);
        assert!(page.items.is_empty());
    }
}
