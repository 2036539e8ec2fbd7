use log::debug;
use serde_json::Value;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use crate::api::client::{ApiClient, Endpoint};
use crate::api::error::FetchError;
use crate::domain::code::Credentials;

pub type RequestId = u64;

#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub id: RequestId,
    pub kind: Endpoint,
    pub credentials: Credentials,
}

/// Sent back to the UI thread once a request completes.
#[derive(Debug)]
pub struct FetchOutcome {
    pub id: RequestId,
    pub kind: Endpoint,
    pub result: Result<Value, FetchError>,
}

/// Runs one request on its own thread and posts exactly one outcome to `tx`.
pub fn spawn_fetch(
    client: ApiClient,
    req: FetchRequest,
    tx: Sender<FetchOutcome>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let result = client.fetch(req.kind, &req.credentials);
        let outcome = FetchOutcome {
            id: req.id,
            kind: req.kind,
            result,
        };
        if tx.send(outcome).is_err() {
            // UI loop already exited
            debug!("dropping outcome of request {}", req.id);
        }
    })
}
