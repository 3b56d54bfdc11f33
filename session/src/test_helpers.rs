//! Scripted transport and fixtures shared by the unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use futures::channel::oneshot;

use crate::config::SessionConfig;
use crate::manager::SessionManager;
use crate::store::{MemoryStore, SessionStore};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::types::User;

type Outcome = Result<HttpResponse, TransportError>;

enum Scripted {
    Ready(Outcome),
    Gated(oneshot::Receiver<Outcome>),
}

/// Transport that replays queued outcomes in order and records every request.
#[derive(Default)]
pub struct FakeTransport {
    script: RefCell<VecDeque<Scripted>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn push(&self, outcome: Outcome) {
        self.script.borrow_mut().push_back(Scripted::Ready(outcome));
    }

    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push(Ok(json_response(status, body)));
    }

    /// Queue a response that is only delivered once the returned sender fires.
    pub fn push_gated(&self) -> oneshot::Sender<Outcome> {
        let (tx, rx) = oneshot::channel();
        self.script.borrow_mut().push_back(Scripted::Gated(rx));
        tx
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .borrow()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait::async_trait(?Send)]
impl HttpTransport for FakeTransport {
    async fn send(&self, request: HttpRequest, _timeout: Duration) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request);
        let next = self.script.borrow_mut().pop_front();
        match next {
            Some(Scripted::Ready(outcome)) => outcome,
            Some(Scripted::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(TransportError::Network("gate dropped".to_owned()))),
            None => Err(TransportError::Network("no scripted response".to_owned())),
        }
    }
}

pub fn json_response(status: u16, body: serde_json::Value) -> HttpResponse {
    HttpResponse { status, body: body.to_string() }
}

pub fn user(id: &str) -> User {
    User {
        id: id.to_owned(),
        name: format!("User {id}"),
        email: format!("{id}@example.com"),
        created_at: None,
    }
}

pub fn user_json(id: &str) -> serde_json::Value {
    serde_json::to_value(user(id)).expect("user serializes")
}

pub fn memory_store() -> (Rc<MemoryStore>, SessionStore) {
    let backend = Rc::new(MemoryStore::new());
    let store = SessionStore::new(backend.clone());
    (backend, store)
}

pub fn manager_with(transport: &Rc<FakeTransport>, store: &SessionStore) -> Rc<SessionManager> {
    Rc::new(SessionManager::new(SessionConfig::default(), store.clone(), transport.clone()))
}

/// Store pre-populated with a logged-in session for `id`.
pub fn seeded_store(token: &str, id: &str) -> SessionStore {
    let (_, store) = memory_store();
    store.set_token(token).expect("seed token");
    store.set_user(&user(id)).expect("seed user");
    store
}
