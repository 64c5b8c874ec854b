use std::sync::Arc;

use crate::api::auth::SessionProvider;
use crate::model::session::Credentials;
use crate::session::SessionHandle;
use crate::view::router::Route;

/// Which of the two forms is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthTab {
    #[default]
    Login,
    Register,
}

/// The combined login/registration screen. Login defers all validation to
/// the server; registration is checked locally first, so obviously bad
/// input never leaves the console.
pub struct LoginView {
    provider: Arc<dyn SessionProvider>,
    session: SessionHandle,
    pub tab: AuthTab,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    busy: bool,
    error: Option<String>,
    info: Option<String>,
}

impl LoginView {
    pub fn new(provider: Arc<dyn SessionProvider>, session: SessionHandle) -> Self {
        Self {
            provider,
            session,
            tab: AuthTab::default(),
            username: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            busy: false,
            error: None,
            info: None,
        }
    }

    /// Switching tabs keeps the typed username but drops messages and
    /// passwords.
    pub fn switch_tab(&mut self, tab: AuthTab) {
        self.tab = tab;
        self.password.clear();
        self.confirm_password.clear();
        self.error = None;
        self.info = None;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }

    fn credentials(&self) -> Credentials {
        Credentials {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        }
    }

    /// Submit the login form. On success the session resolves to the
    /// server's identity and the caller navigates to the returned route:
    /// admins land on the management screen, everyone else on the roster.
    pub async fn login(&mut self) -> Option<Route> {
        if self.busy {
            return None;
        }
        self.busy = true;
        self.error = None;
        let outcome = self.provider.login(&self.credentials()).await;
        self.busy = false;

        match outcome {
            Ok(session) => {
                let destination = if session.is_admin() {
                    Route::Admin
                } else {
                    Route::Home
                };
                self.session.resolve(session);
                self.password.clear();
                Some(destination)
            }
            Err(err) => {
                self.error = Some(err.display_message("Login failed. Please try again."));
                None
            }
        }
    }

    /// Local checks for the registration form, in the order the fields
    /// appear. Only the first failure is reported.
    fn validate_registration(&self) -> Option<&'static str> {
        if self.username.trim().is_empty() {
            return Some("Username is required");
        }
        if self.password.is_empty() {
            return Some("Password is required");
        }
        if self.password.len() < 6 {
            return Some("Password must be at least 6 characters");
        }
        if self.password != self.confirm_password {
            return Some("Passwords do not match");
        }
        None
    }

    /// Submit the registration form. Success does not sign the user in; it
    /// flips back to the login tab with a prompt to use the new
    /// credentials.
    pub async fn register(&mut self) -> bool {
        if self.busy {
            return false;
        }
        if let Some(problem) = self.validate_registration() {
            self.error = Some(problem.to_string());
            return false;
        }
        self.busy = true;
        self.error = None;
        let outcome = self.provider.register(&self.credentials()).await;
        self.busy = false;

        match outcome {
            Ok(()) => {
                self.switch_tab(AuthTab::Login);
                self.info =
                    Some("Registration successful! Please login with your credentials.".to_string());
                true
            }
            Err(err) => {
                self.error = Some(err.display_message("Registration failed. Please try again."));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::{Error, Result};
    use crate::model::session::{Role, Session};

    #[derive(Default)]
    struct FakeProvider {
        login_outcome: Mutex<Option<Result<Session>>>,
        register_outcome: Mutex<Option<Result<()>>>,
        register_calls: Mutex<Vec<Credentials>>,
    }

    impl FakeProvider {
        fn logging_in_as(role: Role) -> Self {
            let provider = Self::default();
            *provider.login_outcome.lock().unwrap() = Some(Ok(Session {
                role: Some(role),
                user_id: Some("u1".to_string()),
                is_authenticated: true,
            }));
            provider
        }
    }

    #[async_trait]
    impl SessionProvider for FakeProvider {
        async fn check(&self) -> Result<Session> {
            Ok(Session::anonymous())
        }

        async fn login(&self, _credentials: &Credentials) -> Result<Session> {
            self.login_outcome
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(Error::Server {
                    status: 401,
                    message: Some("Invalid credentials".to_string()),
                }))
        }

        async fn register(&self, credentials: &Credentials) -> Result<()> {
            self.register_calls.lock().unwrap().push(credentials.clone());
            self.register_outcome.lock().unwrap().take().unwrap_or(Ok(()))
        }

        async fn logout(&self) -> Result<()> {
            Ok(())
        }
    }

    fn view(provider: FakeProvider) -> (LoginView, SessionHandle) {
        let session = SessionHandle::new();
        (LoginView::new(Arc::new(provider), session.clone()), session)
    }

    #[tokio::test]
    async fn admin_login_navigates_to_the_management_screen() {
        let (mut view, session) = view(FakeProvider::logging_in_as(Role::Admin));
        view.username = "root".to_string();
        view.password = "hunter22".to_string();

        assert_eq!(Some(Route::Admin), view.login().await);
        assert!(session.is_admin());
        assert!(view.password.is_empty());
    }

    #[tokio::test]
    async fn user_login_navigates_home() {
        let (mut view, session) = view(FakeProvider::logging_in_as(Role::User));
        view.username = "sam".to_string();
        view.password = "hunter22".to_string();

        assert_eq!(Some(Route::Home), view.login().await);
        assert!(session.is_authenticated());
        assert!(!session.is_admin());
    }

    #[tokio::test]
    async fn rejected_login_surfaces_the_server_message() {
        let (mut view, session) = view(FakeProvider::default());
        view.username = "sam".to_string();
        view.password = "wrong".to_string();

        assert_eq!(None, view.login().await);
        assert_eq!(Some("Invalid credentials"), view.error());
        assert!(!session.is_authenticated());
        assert!(!view.is_busy());
    }

    #[tokio::test]
    async fn registration_is_validated_before_any_network_call() {
        let provider = FakeProvider::default();
        let (mut view, _) = view(provider);
        view.tab = AuthTab::Register;

        assert!(!view.register().await);
        assert_eq!(Some("Username is required"), view.error());

        view.username = "sam".to_string();
        assert!(!view.register().await);
        assert_eq!(Some("Password is required"), view.error());

        view.password = "short".to_string();
        assert!(!view.register().await);
        assert_eq!(Some("Password must be at least 6 characters"), view.error());

        view.password = "longenough".to_string();
        view.confirm_password = "different".to_string();
        assert!(!view.register().await);
        assert_eq!(Some("Passwords do not match"), view.error());
    }

    #[tokio::test]
    async fn successful_registration_returns_to_login() {
        let (mut view, session) = view(FakeProvider::default());
        view.tab = AuthTab::Register;
        view.username = "sam".to_string();
        view.password = "longenough".to_string();
        view.confirm_password = "longenough".to_string();

        assert!(view.register().await);
        assert_eq!(AuthTab::Login, view.tab);
        assert_eq!(
            Some("Registration successful! Please login with your credentials."),
            view.info()
        );
        assert!(view.password.is_empty());
        assert!(!session.is_authenticated(), "registration does not sign in");
    }

    #[tokio::test]
    async fn username_is_trimmed_before_submission() {
        let provider = Arc::new(FakeProvider::default());
        let mut view = LoginView::new(provider.clone(), SessionHandle::new());
        view.tab = AuthTab::Register;
        view.username = "  sam  ".to_string();
        view.password = "longenough".to_string();
        view.confirm_password = "longenough".to_string();

        assert!(view.register().await);
        let calls = provider.register_calls.lock().unwrap();
        assert_eq!("sam", calls[0].username);
    }
}
