//! Admin dashboard controller.

use std::time::{Duration, Instant};

use storefront_cache::AdminSession;
use storefront_catalog::{Product, ProductId};
use storefront_data::{CatalogApi, FetchError, ProductForm};

use crate::render::{render_admin_row, DisplayConfig};

/// How long the wrong-password message stays up.
pub const LOGIN_MESSAGE_TTL: Duration = Duration::from_secs(3);

pub const WRONG_PASSWORD_MESSAGE: &str = "Contraseña incorrecta.";
pub const CONNECTION_ERROR_MESSAGE: &str = "No se pudo establecer conexión con el servidor.";
pub const EMPTY_LIST_MESSAGE: &str = "No hay productos todavía. Añade tu primer producto.";
pub const LIST_ERROR_MESSAGE: &str = "No se pudieron cargar los productos.";

/// Transient message shown inline under the password field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMessage {
    pub text: String,
    pub shown_at: Instant,
    pub ttl: Duration,
}

impl InlineMessage {
    pub fn new(text: impl Into<String>, shown_at: Instant) -> Self {
        Self {
            text: text.into(),
            shown_at,
            ttl: LOGIN_MESSAGE_TTL,
        }
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < self.ttl
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Blocking dialog the user has to dismiss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: &'static str,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: "Éxito",
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: "Error",
            message: message.into(),
        }
    }
}

/// Result of a login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Unlocked,
    Rejected,
    Unreachable,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ListState {
    #[default]
    Idle,
    Loading,
    Error(String),
    Empty,
    Table(Vec<Product>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(ProductId),
}

/// The open create/edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub mode: FormMode,
    pub initial: ProductForm,
    /// Current image of the product being edited.
    pub preview: Option<String>,
}

impl FormState {
    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Añadir Producto",
            FormMode::Edit(_) => "Editar Producto",
        }
    }
}

/// What the delete dialog shows before anything is removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirmation {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub price: String,
}

/// Admin dashboard behind the session flag.
///
/// Every operation is a no-op while locked. Mutations never patch the
/// local list; on success the list is discarded and fetched again.
pub struct AdminPage<A: CatalogApi> {
    api: A,
    session: AdminSession,
    unlocked: bool,
    list: ListState,
    login_message: Option<InlineMessage>,
    notification: Option<Notification>,
    form: Option<FormState>,
    pending_delete: Option<DeleteConfirmation>,
    config: DisplayConfig,
}

impl<A: CatalogApi> AdminPage<A> {
    pub fn new(api: A, session: AdminSession, config: DisplayConfig) -> Self {
        Self {
            api,
            session,
            unlocked: false,
            list: ListState::Idle,
            login_message: None,
            notification: None,
            form: None,
            pending_delete: None,
            config,
        }
    }

    /// Unlock from a stored flag, if there is one.
    pub async fn restore(&mut self) -> bool {
        if self.session.is_authenticated() {
            tracing::debug!("restoring admin session");
            self.unlocked = true;
            self.reload().await;
        }
        self.unlocked
    }

    pub async fn login(&mut self, password: &str) -> LoginOutcome {
        self.login_at(password, Instant::now()).await
    }

    /// Login with an explicit clock, for the inline message timing.
    pub async fn login_at(&mut self, password: &str, now: Instant) -> LoginOutcome {
        match self.api.authenticate(password).await {
            Ok(true) => {
                if let Err(e) = self.session.mark_authenticated() {
                    tracing::warn!(error = %e, "could not persist admin session");
                }
                self.unlocked = true;
                self.login_message = None;
                self.reload().await;
                LoginOutcome::Unlocked
            }
            Ok(false) => {
                tracing::info!("admin password rejected");
                self.login_message = Some(InlineMessage::new(WRONG_PASSWORD_MESSAGE, now));
                LoginOutcome::Rejected
            }
            Err(e) => {
                tracing::warn!(error = %e, "login failed");
                self.notification = Some(Notification::error(CONNECTION_ERROR_MESSAGE));
                LoginOutcome::Unreachable
            }
        }
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.session.clear() {
            tracing::warn!(error = %e, "could not clear admin session");
        }
        self.unlocked = false;
        self.list = ListState::Idle;
        self.form = None;
        self.pending_delete = None;
        self.login_message = None;
    }

    /// Fetch the canonical list.
    pub async fn reload(&mut self) {
        if !self.unlocked {
            return;
        }
        self.list = ListState::Loading;
        self.list = match self.api.list_products().await {
            Ok(products) if products.is_empty() => ListState::Empty,
            Ok(products) => ListState::Table(products),
            Err(e) => {
                tracing::warn!(error = %e, "could not load admin list");
                ListState::Error(format!("{LIST_ERROR_MESSAGE} {}", e.user_message()))
            }
        };
    }

    pub fn open_create(&mut self) {
        if !self.unlocked {
            return;
        }
        self.form = Some(FormState {
            mode: FormMode::Create,
            initial: ProductForm::default(),
            preview: None,
        });
    }

    /// Open the edit form pre-filled from the listed product.
    pub fn open_edit(&mut self, id: ProductId) -> bool {
        if !self.unlocked {
            return false;
        }
        let Some(product) = self.find(id) else {
            return false;
        };
        let form = FormState {
            mode: FormMode::Edit(id),
            initial: ProductForm::from_product(product),
            preview: product.image.clone(),
        };
        self.form = Some(form);
        true
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Submit the open form. Returns whether the backend accepted it.
    pub async fn submit(&mut self, form: ProductForm) -> bool {
        if !self.unlocked {
            return false;
        }
        let Some(mode) = self.form.as_ref().map(|f| f.mode) else {
            return false;
        };

        let result = match form.validate() {
            Err(e) => Err(e),
            Ok(()) => match mode {
                FormMode::Create => self.api.create_product(&form).await,
                FormMode::Edit(id) => self.api.update_product(id, &form).await,
            },
        };

        match result {
            Ok(()) => {
                self.form = None;
                self.list = ListState::Idle;
                self.reload().await;
                let message = match mode {
                    FormMode::Create => "Producto añadido correctamente.",
                    FormMode::Edit(_) => "Producto actualizado correctamente.",
                };
                self.notification = Some(Notification::success(message));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, ?mode, "save failed");
                self.notification = Some(Notification::error(save_failure(&e)));
                false
            }
        }
    }

    /// Ask for confirmation before deleting.
    pub fn request_delete(&mut self, id: ProductId) -> Option<&DeleteConfirmation> {
        if !self.unlocked {
            return None;
        }
        let product = self.find(id)?;
        let confirmation = DeleteConfirmation {
            id,
            name: product.name.clone(),
            image: product.image_src(&self.config.placeholder).to_string(),
            price: product.money(self.config.currency).display_code(),
        };
        self.pending_delete = Some(confirmation);
        self.pending_delete.as_ref()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Perform the confirmed delete. Returns whether it succeeded.
    pub async fn confirm_delete(&mut self) -> bool {
        if !self.unlocked {
            return false;
        }
        let Some(confirmation) = self.pending_delete.take() else {
            return false;
        };
        match self.api.delete_product(confirmation.id).await {
            Ok(()) => {
                self.list = ListState::Idle;
                self.reload().await;
                self.notification = Some(Notification::success("Producto eliminado correctamente."));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, id = %confirmation.id, "delete failed");
                self.notification = Some(Notification::error(format!(
                    "No se pudo eliminar el producto: {}",
                    e.user_message()
                )));
                false
            }
        }
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    fn find(&self, id: ProductId) -> Option<&Product> {
        match &self.list {
            ListState::Table(products) => products.iter().find(|p| p.id == id),
            _ => None,
        }
    }

    /// Table body markup, empty unless the table is showing.
    pub fn render_table(&self) -> String {
        match &self.list {
            ListState::Table(products) => products
                .iter()
                .map(|p| render_admin_row(p, &self.config))
                .collect::<Vec<_>>()
                .join("\n"),
            _ => String::new(),
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn list(&self) -> &ListState {
        &self.list
    }

    pub fn login_message(&self) -> Option<&InlineMessage> {
        self.login_message.as_ref()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn form(&self) -> Option<&FormState> {
        self.form.as_ref()
    }

    pub fn pending_delete(&self) -> Option<&DeleteConfirmation> {
        self.pending_delete.as_ref()
    }

    pub fn api(&self) -> &A {
        &self.api
    }
}

fn save_failure(e: &FetchError) -> String {
    match e {
        FetchError::Validation(message) => message.clone(),
        other => format!("No se pudo guardar el producto: {}", other.user_message()),
    }
}
