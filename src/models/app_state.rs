use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use crate::config;
use crate::models::{Catalog, QuoteSession, SessionStore, VmTemplate};

#[derive(Clone)]
pub struct AppState {
    /// Quote sessions keyed by session cookie.
    pub sessions: Arc<Mutex<SessionStore>>,
    pub catalog: Arc<Mutex<Arc<Catalog>>>,
    pub templates: Arc<Mutex<Arc<Vec<VmTemplate>>>>,
    pub api_base_url: String,
    pub api_token: String,
    pub client: reqwest::Client,
}

impl AppState {
    pub fn new(client: reqwest::Client, api_base_url: String, api_token: String) -> Self {
        AppState {
            sessions: Arc::new(Mutex::new(SessionStore::new(
                config::get_session_idle_ttl(),
                config::get_max_sessions(),
            ))),
            catalog: Arc::new(Mutex::new(Arc::new(Catalog::default()))),
            templates: Arc::new(Mutex::new(Arc::new(Vec::new()))),
            api_base_url,
            api_token,
            client,
        }
    }

    /// Catalog as of now. Later refreshes do not affect the returned snapshot.
    pub fn catalog_snapshot(&self) -> Arc<Catalog> {
        self.catalog.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn templates_snapshot(&self) -> Arc<Vec<VmTemplate>> {
        self.templates.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn replace_catalog(&self, catalog: Catalog) {
        *self.catalog.lock().unwrap_or_else(PoisonError::into_inner) = Arc::new(catalog);
    }

    pub fn replace_templates(&self, templates: Vec<VmTemplate>) {
        *self.templates.lock().unwrap_or_else(PoisonError::into_inner) = Arc::new(templates);
    }

    /// Read the session for `sid`; unknown ids see an empty session and
    /// are not stored.
    pub fn read_session<R>(&self, sid: Option<&str>, f: impl FnOnce(&QuoteSession) -> R) -> R {
        match sid {
            Some(sid) => self
                .sessions
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .read(sid, Instant::now(), f),
            None => f(&QuoteSession::default()),
        }
    }

    /// Mutate an existing session. `None` when there is no such session.
    pub fn with_existing_session<R>(&self, sid: Option<&str>, f: impl FnOnce(&mut QuoteSession) -> R) -> Option<R> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .write_existing(sid?, Instant::now(), f)
    }

    /// Run `f` against the session for `sid`, creating it on first write.
    pub fn with_session<R>(&self, sid: &str, f: impl FnOnce(&mut QuoteSession) -> R) -> R {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .write(sid, Instant::now(), f)
    }
}
