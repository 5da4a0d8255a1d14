// crates/provider-testkit-listener/src/lib.rs
// ============================================================================
// Module: Callback Listener
// Description: Embedded HTTP listener for asynchronously pushed progress events.
// Purpose: Stand in for the orchestrator's callback endpoint during contract runs.
// Dependencies: provider-testkit-core, serde_json, thiserror, tiny_http
// ============================================================================

//! ## Overview
//! A handler running a long operation may push progress events to the caller
//! instead of returning them inline. [`CallbackListener`] binds an ephemeral
//! local port, accepts POSTs on a background worker thread, and appends one
//! [`CallbackRecord`] per request to an ordered log. Bodies with a JSON
//! content type are parsed as progress-event documents; anything else becomes
//! a synthetic error record, so malformed callbacks never crash the listener.
//!
//! Invariants:
//! - Records are observed in receipt order (FIFO); nothing is dropped or
//!   reordered.
//! - Dropping the listener unblocks the accept loop, joins the worker, and
//!   releases the port, on the happy and unhappy path alike.
//! - One listener serves one scenario; the log is the only state shared
//!   between the worker and the scenario thread.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Condvar;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;
use std::time::Instant;

use provider_testkit_core::CallbackRecord;
use provider_testkit_core::CallbackSource;
use thiserror::Error;
use tiny_http::Header;
use tiny_http::Request;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Listener construction errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The ephemeral port could not be bound.
    #[error("callback listener bind failure: {0}")]
    Bind(String),
}

// ============================================================================
// SECTION: Callback Log
// ============================================================================

/// Ordered, thread-safe log of received callback records.
///
/// # Invariants
/// - Single producer (the accept worker) appends; a single consumer pops.
/// - Pops observe records in receipt order.
pub struct CallbackLog {
    /// Records in receipt order.
    records: Mutex<VecDeque<CallbackRecord>>,
    /// Signaled on every append for blocking consumers.
    available: Condvar,
}

impl CallbackLog {
    /// Creates an empty log.
    #[must_use]
    fn new() -> Self {
        Self {
            records: Mutex::new(VecDeque::new()),
            available: Condvar::new(),
        }
    }

    /// Appends a record and wakes a waiting consumer.
    fn push(&self, record: CallbackRecord) {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        records.push_back(record);
        drop(records);
        self.available.notify_one();
    }

    /// Pops the oldest record without waiting.
    #[must_use]
    pub fn pop(&self) -> Option<CallbackRecord> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).pop_front()
    }

    /// Pops the oldest record, waiting up to `wait` for one to arrive.
    #[must_use]
    pub fn wait_pop(&self, wait: Duration) -> Option<CallbackRecord> {
        let deadline = Instant::now() + wait;
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if let Some(record) = records.pop_front() {
                return Some(record);
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            let (next, _timed_out) = self
                .available
                .wait_timeout(records, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            records = next;
        }
    }

    /// Returns the number of buffered records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns true when no records are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// SECTION: Listener
// ============================================================================

/// Embedded callback endpoint scoped to one contract scenario.
///
/// # Invariants
/// - The accept loop runs until the listener is dropped.
/// - `server_address` is stable for the listener's lifetime.
pub struct CallbackListener {
    /// Underlying HTTP server; shared with the accept worker.
    server: Arc<Server>,
    /// Ordered log shared with the accept worker.
    log: Arc<CallbackLog>,
    /// Bound local address.
    address: SocketAddr,
    /// Accept worker handle, joined on drop.
    worker: Option<JoinHandle<()>>,
}

impl CallbackListener {
    /// Binds an ephemeral local port and starts accepting callbacks.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError`] when no local port can be bound.
    pub fn bind() -> Result<Self, ListenerError> {
        let server =
            Server::http("127.0.0.1:0").map_err(|err| ListenerError::Bind(err.to_string()))?;
        let address = server
            .server_addr()
            .to_ip()
            .ok_or_else(|| ListenerError::Bind("listener has no IP address".to_string()))?;
        let server = Arc::new(server);
        let log = Arc::new(CallbackLog::new());
        let worker_server = Arc::clone(&server);
        let worker_log = Arc::clone(&log);
        let worker = thread::spawn(move || accept_loop(&worker_server, &worker_log));
        Ok(Self {
            server,
            log,
            address,
            worker: Some(worker),
        })
    }

    /// Returns the bound local address.
    #[must_use]
    pub const fn server_address(&self) -> SocketAddr {
        self.address
    }

    /// Returns the shared callback log.
    #[must_use]
    pub fn log(&self) -> Arc<CallbackLog> {
        Arc::clone(&self.log)
    }
}

impl CallbackSource for CallbackListener {
    fn callback_url(&self) -> String {
        format!("http://{}/", self.address)
    }

    fn next_record(&self, wait: Duration) -> Option<CallbackRecord> {
        self.log.wait_pop(wait)
    }
}

impl Drop for CallbackListener {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(worker) = self.worker.take() {
            let _joined = worker.join();
        }
    }
}

// ============================================================================
// SECTION: Accept Loop
// ============================================================================

/// Accepts callbacks until the server is unblocked on drop.
fn accept_loop(server: &Server, log: &CallbackLog) {
    while let Ok(mut request) = server.recv() {
        let record = interpret_callback(&mut request);
        log.push(record);
        let response = match Header::from_bytes("Content-Type", "application/json") {
            Ok(header) => Response::from_string("").with_header(header),
            Err(()) => Response::from_string(""),
        };
        let _responded = request.respond(response);
    }
}

/// Interprets one HTTP request as a callback record.
fn interpret_callback(request: &mut Request) -> CallbackRecord {
    let content_type = request
        .headers()
        .iter()
        .find(|header| header.field.equiv("Content-Type"))
        .map(|header| header.value.as_str().to_string());
    if !content_type.as_deref().is_some_and(is_json_media_type) {
        return CallbackRecord::invalid(format!(
            "callback with invalid content type '{}'",
            content_type.unwrap_or_default()
        ));
    }
    let mut body = Vec::new();
    if request.as_reader().read_to_end(&mut body).is_err() {
        return CallbackRecord::invalid("callback body could not be read");
    }
    match serde_json::from_slice(&body) {
        Ok(event) => CallbackRecord::received(event),
        Err(err) => CallbackRecord::invalid(format!("callback body is not valid JSON: {err}")),
    }
}

/// Returns true for `application/json` and `+json` media types.
fn is_json_media_type(value: &str) -> bool {
    let media_type = value.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    media_type == "application/json" || media_type.ends_with("+json")
}
