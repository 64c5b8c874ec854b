use std::str::FromStr;
use std::sync::Arc;

use log::warn;

use crate::api::auth::SessionProvider;
use crate::error::Result;
use crate::model::session::Session;
use crate::session::{SessionHandle, SessionPhase};

/// The navigable locations of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Admin,
    Todos,
    Login,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Admin => "/admin",
            Self::Todos => "/todos",
            Self::Login => "/login",
        }
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "/" => Ok(Self::Home),
            "/admin" => Ok(Self::Admin),
            "/todos" => Ok(Self::Todos),
            "/login" => Ok(Self::Login),
            other => Err(format!("unknown route {other:?}")),
        }
    }
}

/// What a resolved route displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// The voter roster; `admin` selects the management variant with
    /// inline editing and deletion.
    Roster { admin: bool },
    AdminPanel,
    Todos,
    Login,
}

/// The outcome of routing one requested path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The startup session check has not resolved; show nothing yet.
    Loading,
    Show(Screen),
    /// The path exists for some role but not this one, or not at all.
    RedirectToLogin,
}

/// The set of routes the current session may reach. Each session state
/// maps to exactly one tree; switching identity swaps the whole tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTree {
    Loading,
    LoginOnly,
    Admin,
    User,
}

/// Resolves the session once at startup and gates every route on the
/// outcome. A failed check degrades to the anonymous tree rather than
/// blocking the console.
pub struct RoleRouter {
    provider: Arc<dyn SessionProvider>,
    session: SessionHandle,
}

impl RoleRouter {
    pub fn new(provider: Arc<dyn SessionProvider>, session: SessionHandle) -> Self {
        Self { provider, session }
    }

    /// One identity check at startup. Until this returns, every route
    /// resolves to `Disposition::Loading`.
    pub async fn mount(&self) {
        match self.provider.check().await {
            Ok(session) => self.session.resolve(session),
            Err(err) => {
                warn!("session check failed, treating as anonymous: {err}");
                self.session.resolve(Session::anonymous());
            }
        }
    }

    pub fn tree(&self) -> ViewTree {
        match self.session.phase() {
            SessionPhase::Unknown => ViewTree::Loading,
            SessionPhase::Resolved(session) => {
                if !session.is_authenticated {
                    ViewTree::LoginOnly
                } else if session.is_admin() {
                    ViewTree::Admin
                } else {
                    ViewTree::User
                }
            }
        }
    }

    /// Resolve a requested path against the current tree. Unknown paths
    /// and paths belonging to the other role both land on the login
    /// screen; nothing distinguishes "does not exist" from "not yours".
    pub fn dispatch(&self, path: &str) -> Disposition {
        let route = Route::from_str(path).ok();
        match self.tree() {
            ViewTree::Loading => Disposition::Loading,
            ViewTree::LoginOnly => Disposition::Show(Screen::Login),
            ViewTree::Admin => match route {
                Some(Route::Home) => Disposition::Show(Screen::Roster { admin: true }),
                Some(Route::Admin) => Disposition::Show(Screen::AdminPanel),
                Some(Route::Login) => Disposition::Show(Screen::Login),
                Some(Route::Todos) | None => Disposition::RedirectToLogin,
            },
            ViewTree::User => match route {
                Some(Route::Home) => Disposition::Show(Screen::Roster { admin: false }),
                Some(Route::Todos) => Disposition::Show(Screen::Todos),
                Some(Route::Login) => Disposition::Show(Screen::Login),
                Some(Route::Admin) | None => Disposition::RedirectToLogin,
            },
        }
    }

    /// Log out on the server, then drop the local identity. The local
    /// session survives a failed server call so state never claims to be
    /// signed out while the cookie is still live.
    pub async fn logout(&self) -> Result<()> {
        self.provider.logout().await?;
        self.session.invalidate();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::Error;
    use crate::model::session::{Credentials, Role};

    struct FakeProvider {
        check_outcome: Mutex<Option<Result<Session>>>,
        logout_outcome: Mutex<Option<Result<()>>>,
    }

    impl FakeProvider {
        fn checking(outcome: Result<Session>) -> Self {
            Self {
                check_outcome: Mutex::new(Some(outcome)),
                logout_outcome: Mutex::new(Some(Ok(()))),
            }
        }

        fn with_logout(self, outcome: Result<()>) -> Self {
            *self.logout_outcome.lock().unwrap() = Some(outcome);
            self
        }
    }

    fn signed_in(role: Role) -> Session {
        Session {
            role: Some(role),
            user_id: Some("u1".to_string()),
            is_authenticated: true,
        }
    }

    #[async_trait]
    impl SessionProvider for FakeProvider {
        async fn check(&self) -> Result<Session> {
            self.check_outcome
                .lock()
                .unwrap()
                .take()
                .expect("check called more than once")
        }

        async fn login(&self, _credentials: &Credentials) -> Result<Session> {
            unimplemented!("not exercised by router tests")
        }

        async fn register(&self, _credentials: &Credentials) -> Result<()> {
            unimplemented!("not exercised by router tests")
        }

        async fn logout(&self) -> Result<()> {
            self.logout_outcome
                .lock()
                .unwrap()
                .take()
                .expect("logout called more than once")
        }
    }

    async fn router_for(outcome: Result<Session>) -> RoleRouter {
        let router = RoleRouter::new(
            Arc::new(FakeProvider::checking(outcome)),
            SessionHandle::new(),
        );
        router.mount().await;
        router
    }

    #[tokio::test]
    async fn everything_loads_before_the_check_resolves() {
        let router = RoleRouter::new(
            Arc::new(FakeProvider::checking(Ok(Session::anonymous()))),
            SessionHandle::new(),
        );
        assert_eq!(ViewTree::Loading, router.tree());
        assert_eq!(Disposition::Loading, router.dispatch("/"));
        assert_eq!(Disposition::Loading, router.dispatch("/admin"));
    }

    #[tokio::test]
    async fn admin_tree_routes() {
        let router = router_for(Ok(signed_in(Role::Admin))).await;
        assert_eq!(ViewTree::Admin, router.tree());
        assert_eq!(
            Disposition::Show(Screen::Roster { admin: true }),
            router.dispatch("/")
        );
        assert_eq!(
            Disposition::Show(Screen::AdminPanel),
            router.dispatch("/admin")
        );
        assert_eq!(Disposition::Show(Screen::Login), router.dispatch("/login"));
        assert_eq!(Disposition::RedirectToLogin, router.dispatch("/todos"));
        assert_eq!(Disposition::RedirectToLogin, router.dispatch("/nowhere"));
    }

    #[tokio::test]
    async fn user_tree_routes() {
        let router = router_for(Ok(signed_in(Role::User))).await;
        assert_eq!(ViewTree::User, router.tree());
        assert_eq!(
            Disposition::Show(Screen::Roster { admin: false }),
            router.dispatch("/")
        );
        assert_eq!(Disposition::Show(Screen::Todos), router.dispatch("/todos"));
        assert_eq!(Disposition::RedirectToLogin, router.dispatch("/admin"));
    }

    #[tokio::test]
    async fn anonymous_tree_shows_only_login() {
        let router = router_for(Ok(Session::anonymous())).await;
        assert_eq!(ViewTree::LoginOnly, router.tree());
        assert_eq!(Disposition::Show(Screen::Login), router.dispatch("/"));
        assert_eq!(Disposition::Show(Screen::Login), router.dispatch("/admin"));
        assert_eq!(Disposition::Show(Screen::Login), router.dispatch("/todos"));
    }

    #[tokio::test]
    async fn failed_check_degrades_to_anonymous() {
        let router = router_for(Err(Error::Server {
            status: 500,
            message: None,
        }))
        .await;
        assert_eq!(ViewTree::LoginOnly, router.tree());
    }

    #[tokio::test]
    async fn failed_logout_keeps_the_session() {
        let provider = FakeProvider::checking(Ok(signed_in(Role::User))).with_logout(Err(
            Error::Server {
                status: 502,
                message: None,
            },
        ));
        let session = SessionHandle::new();
        let router = RoleRouter::new(Arc::new(provider), session.clone());
        router.mount().await;

        assert!(router.logout().await.is_err());
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn logout_invalidates_on_success() {
        let session = SessionHandle::new();
        let router = RoleRouter::new(
            Arc::new(FakeProvider::checking(Ok(signed_in(Role::Admin)))),
            session.clone(),
        );
        router.mount().await;

        router.logout().await.unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(ViewTree::LoginOnly, router.tree());
    }

    #[test]
    fn routes_round_trip_through_paths() {
        for route in [Route::Home, Route::Admin, Route::Todos, Route::Login] {
            assert_eq!(Ok(route), route.path().parse());
        }
        assert!("/voters/7".parse::<Route>().is_err());
    }
}
