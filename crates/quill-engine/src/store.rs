use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use quill_core::models::document::DocumentId;
use tokio::sync::Mutex;

use crate::session::Session;

pub type SessionHandle = Arc<Mutex<Session>>;

/// In-memory sessions keyed by document id.
///
/// The map lock is only held to look up or insert a handle. Each session has
/// its own async mutex, which callers hold for the whole of a revision or
/// finalize so operations on one document queue in arrival order while
/// other documents proceed independently.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<DocumentId, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, session: Session) -> DocumentId {
        let id = session.document().id();
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(Mutex::new(session)));
        id
    }

    pub fn get(&self, id: DocumentId) -> Option<SessionHandle> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
