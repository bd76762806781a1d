//! Reducer-based application state store.
//!
//! One [`AppStore`] instance holds the whole client-visible state: auth
//! phase, user record, cart, wishlist, plus the shared loading/error pair.
//! State changes flow through a pure [`reduce`] function and are published
//! wholesale over a `tokio::sync::watch` channel; every UI surface holds a
//! receiver and re-renders from whatever snapshot it sees. There is no
//! partial mutation anywhere: a new `AppState` value replaces the old one.
//!
//! Session persistence lives behind the [`SessionCache`] trait so tests can
//! run against an in-memory cache.

mod session;

pub use session::{
    CachedSession, FileSessionCache, MemorySessionCache, SessionCache, SessionCacheError,
};

use std::collections::BTreeSet;
use std::sync::Arc;

use secrecy::SecretString;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use copperleaf_core::{Cart, ProductId, User, UserPatch};

use crate::api::{ApiClient, ApiError};
use crate::error::{AppError, Result};
use crate::normalize::{ShapeError, normalize_user, string_field, unwrap_record};
use crate::validate::validate_profile;

/// Where the session stands. `Uninitialized` exists so the UI can tell
/// "haven't checked yet" apart from "checked, nobody signed in".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthPhase {
    #[default]
    Uninitialized,
    /// Session restore in progress.
    Loading,
    Authenticated,
    Unauthenticated,
}

/// Complete client-side application state. Cloned on every publish; the
/// payloads are small enough that this beats sharing mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub phase: AuthPhase,
    pub user: Option<User>,
    pub cart: Cart,
    pub wishlist: BTreeSet<ProductId>,
    /// Coarse "a blocking operation is running" flag shared by all surfaces.
    pub loading: bool,
    /// Last surfaced error message, cleared by the next successful action.
    pub error: Option<String>,
}

impl AppState {
    /// Whether the current user is an admin, from live state only.
    ///
    /// The role string is checked alongside the derived flag so records
    /// that predate the flag (older cached session blobs) still count.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user
            .as_ref()
            .is_some_and(|u| u.is_admin || u.role == "admin")
    }
}

/// Every state transition the store knows. Reducing is total: any action is
/// valid in any phase, and unknown combinations fall back to "apply the
/// payload, keep the rest".
#[derive(Debug, Clone)]
pub enum Action {
    /// Session restore started.
    InitBegan,
    /// A user is signed in (fresh login or restored session).
    SignedIn(User),
    /// Session ended or restore found nothing. Wipes user-scoped state.
    SignedOut,
    /// The user record changed (profile save).
    UserUpdated(User),
    /// A new cart snapshot replaces the old one.
    CartReplaced(Cart),
    /// A new wishlist snapshot replaces the old one.
    WishlistReplaced(BTreeSet<ProductId>),
    LoadingChanged(bool),
    ErrorRaised(String),
    ErrorCleared,
}

/// Pure state transition. No I/O, no locking: given the same state and
/// action this always produces the same next state.
#[must_use]
pub fn reduce(state: &AppState, action: Action) -> AppState {
    let mut next = state.clone();
    match action {
        Action::InitBegan => {
            next.phase = AuthPhase::Loading;
        }
        Action::SignedIn(user) => {
            next.phase = AuthPhase::Authenticated;
            next.user = Some(user);
            next.error = None;
        }
        Action::SignedOut => {
            next = AppState {
                phase: AuthPhase::Unauthenticated,
                ..AppState::default()
            };
        }
        Action::UserUpdated(user) => {
            next.user = Some(user);
        }
        Action::CartReplaced(cart) => {
            next.cart = cart;
        }
        Action::WishlistReplaced(wishlist) => {
            next.wishlist = wishlist;
        }
        Action::LoadingChanged(loading) => {
            next.loading = loading;
        }
        Action::ErrorRaised(message) => {
            next.error = Some(message);
        }
        Action::ErrorCleared => {
            next.error = None;
        }
    }
    next
}

/// Keys under which login responses have carried the bearer token.
const TOKEN_KEYS: &[&str] = &["token", "accessToken", "access_token", "jwt"];

/// The application state store. Cheap to clone; all clones share the same
/// state and session cache.
#[derive(Clone)]
pub struct AppStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    tx: watch::Sender<AppState>,
    session: Arc<dyn SessionCache>,
}

impl AppStore {
    #[must_use]
    pub fn new(session: Arc<dyn SessionCache>) -> Self {
        let (tx, _) = watch::channel(AppState::default());
        Self {
            inner: Arc::new(StoreInner { tx, session }),
        }
    }

    /// Subscribe to state snapshots. The receiver immediately sees the
    /// current state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.inner.tx.subscribe()
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> AppState {
        self.inner.tx.borrow().clone()
    }

    /// Run an action through the reducer and publish the result.
    pub fn dispatch(&self, action: Action) {
        self.inner.tx.send_modify(|state| {
            *state = reduce(state, action);
        });
    }

    // =========================================================================
    // Session lifecycle
    // =========================================================================

    /// Restore the previous session, if any.
    ///
    /// Reads the session cache; with a token present, installs it and
    /// verifies it against the profile endpoint. A 401 means the token is
    /// dead: the cache is wiped and the store lands on `Unauthenticated`.
    /// A network failure with a cached user record falls back to that
    /// record, so a flaky connection does not sign the user out.
    ///
    /// # Errors
    ///
    /// Only unexpected session-cache failures surface; every backend
    /// outcome resolves to a phase transition instead.
    #[instrument(skip_all)]
    pub async fn initialize(&self, api: &ApiClient) -> Result<()> {
        self.dispatch(Action::InitBegan);

        let cached = match self.inner.session.load() {
            Ok(cached) => cached.unwrap_or_default(),
            Err(e) => {
                // A corrupt cache is not worth failing startup over.
                warn!(error = %e, "session cache unreadable, starting signed out");
                let _ = self.inner.session.clear();
                CachedSession::default()
            }
        };

        let Some(token) = cached.token() else {
            self.dispatch(Action::SignedOut);
            return Ok(());
        };
        api.set_token(token);

        match api.fetch_profile().await {
            Ok(user) => {
                self.persist_session(&cached.token, &user)?;
                info!(user_id = %user.id, "session restored");
                self.dispatch(Action::SignedIn(user));
            }
            Err(ApiError::Auth) => {
                info!("cached token rejected, signing out");
                self.force_sign_out(api);
            }
            Err(e) => {
                if let Some(user) = cached.user {
                    warn!(error = %e, "profile fetch failed, using cached user record");
                    self.dispatch(Action::SignedIn(user));
                } else {
                    warn!(error = %e, "profile fetch failed with no cached record");
                    self.dispatch(Action::SignedOut);
                }
            }
        }
        Ok(())
    }

    /// Sign in with credentials.
    ///
    /// # Errors
    ///
    /// Fails when the backend rejects the credentials, or when the login
    /// response carries no token or no recognizable user record.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn login(&self, api: &ApiClient, email: &str, password: &str) -> Result<User> {
        let payload = api.login(email, password).await?;
        let token = extract_token(&payload).ok_or(ShapeError { entity: "session" })?;
        let user = normalize_user(&payload)?;

        api.set_token(SecretString::from(token.clone()));
        self.persist_session(&Some(token), &user)?;
        info!(user_id = %user.id, "signed in");
        self.dispatch(Action::SignedIn(user.clone()));
        Ok(user)
    }

    /// Sign out. Server-side invalidation is best-effort; local state and
    /// the session cache are always cleared.
    #[instrument(skip_all)]
    pub async fn logout(&self, api: &ApiClient) {
        if let Err(e) = api.logout().await {
            warn!(error = %e, "server-side logout failed, clearing locally anyway");
        }
        self.force_sign_out(api);
    }

    /// Local-only sign-out: drop the token, wipe the cache, reset state.
    /// Also the landing point for any 401 seen mid-session.
    pub fn force_sign_out(&self, api: &ApiClient) {
        api.clear_token();
        if let Err(e) = self.inner.session.clear() {
            warn!(error = %e, "failed to clear session cache");
        }
        self.dispatch(Action::SignedOut);
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Validate and submit a profile update, then publish the saved record.
    ///
    /// # Errors
    ///
    /// Fails on validation errors (no network call is made), on auth
    /// failures (which also sign the user out), or on backend errors.
    #[instrument(skip_all)]
    pub async fn update_user(&self, api: &ApiClient, patch: UserPatch) -> Result<User> {
        validate_profile(&patch).map_err(AppError::Validation)?;
        if self.state().phase != AuthPhase::Authenticated {
            return Err(AppError::NotAuthenticated);
        }

        let saved = match api.update_profile(&patch).await {
            Ok(saved) => saved,
            Err(ApiError::Auth) => {
                self.force_sign_out(api);
                return Err(AppError::Api(ApiError::Auth));
            }
            Err(e) => return Err(e.into()),
        };

        let token = self.inner.session.load().ok().flatten().and_then(|c| c.token);
        self.persist_session(&token, &saved)?;
        self.dispatch(Action::UserUpdated(saved.clone()));
        Ok(saved)
    }

    // =========================================================================
    // Cart and wishlist snapshots
    // =========================================================================

    /// Replace the published cart wholesale. Callers fetch and normalize;
    /// the store only publishes.
    pub fn update_cart(&self, cart: Cart) {
        self.dispatch(Action::CartReplaced(cart));
    }

    /// Replace the published wishlist wholesale.
    pub fn update_wishlist(&self, wishlist: BTreeSet<ProductId>) {
        self.dispatch(Action::WishlistReplaced(wishlist));
    }

    /// Replace the wishlist with a fresh snapshot from the backend.
    ///
    /// # Errors
    ///
    /// Fails on backend errors; auth failures also sign the user out.
    pub async fn refresh_wishlist(&self, api: &ApiClient) -> Result<()> {
        match api.fetch_wishlist().await {
            Ok(wishlist) => {
                self.dispatch(Action::WishlistReplaced(wishlist));
                Ok(())
            }
            Err(ApiError::Auth) => {
                self.force_sign_out(api);
                Err(AppError::Api(ApiError::Auth))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Toggle a product's wishlist membership. Returns whether the product
    /// is in the wishlist after the call.
    ///
    /// The mutation goes to the backend first; published state changes only
    /// on success, so a failure leaves the previous wishlist intact.
    ///
    /// # Errors
    ///
    /// Fails on backend errors; auth failures also sign the user out.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub async fn toggle_wishlist(&self, api: &ApiClient, product_id: &ProductId) -> Result<bool> {
        let mut wishlist = self.state().wishlist;
        let adding = !wishlist.contains(product_id);

        let result = if adding {
            api.add_to_wishlist(product_id).await
        } else {
            api.remove_from_wishlist(product_id).await
        };
        match result {
            Ok(()) => {}
            Err(ApiError::Auth) => {
                self.force_sign_out(api);
                return Err(AppError::Api(ApiError::Auth));
            }
            Err(e) => return Err(e.into()),
        }

        if adding {
            wishlist.insert(product_id.clone());
        } else {
            wishlist.remove(product_id);
        }
        self.dispatch(Action::WishlistReplaced(wishlist));
        Ok(adding)
    }

    // =========================================================================
    // Shared flags
    // =========================================================================

    pub fn set_loading(&self, loading: bool) {
        self.dispatch(Action::LoadingChanged(loading));
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.dispatch(Action::ErrorRaised(message.into()));
    }

    pub fn clear_error(&self) {
        self.dispatch(Action::ErrorCleared);
    }

    /// Whether the current session belongs to an admin.
    ///
    /// Live state wins; when no user record is loaded yet (mid-restore) the
    /// cached session's flag answers instead, so admin surfaces don't flash
    /// away during startup.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        let state = self.state();
        if state.user.is_some() {
            return state.is_admin();
        }
        self.inner
            .session
            .load()
            .ok()
            .flatten()
            .is_some_and(|cached| cached.is_admin)
    }

    fn persist_session(&self, token: &Option<String>, user: &User) -> Result<()> {
        self.inner.session.save(&CachedSession {
            token: token.clone(),
            user: Some(user.clone()),
            is_admin: user.is_admin,
        })?;
        Ok(())
    }
}

/// Pull the bearer token out of a login response, wherever it lives: at the
/// top level or nested under a `data`/`session` envelope.
fn extract_token(payload: &Value) -> Option<String> {
    let obj = unwrap_record(payload, &["data", "session"])?;
    string_field(obj, TOKEN_KEYS)
}
