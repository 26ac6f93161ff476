//! Shared helpers for tests that run against a mockito server.

#![allow(dead_code)]

use serde_json::{json, Value};
use socialspark_core::{AuthProvider, NoAuth, SyncGateway};
use std::sync::Arc;

/// Gateway pointed at `{server}/api` with anonymous auth.
pub fn gateway(server: &mockito::ServerGuard) -> SyncGateway {
    gateway_with(server, Arc::new(NoAuth))
}

pub fn gateway_with(server: &mockito::ServerGuard, auth: Arc<dyn AuthProvider>) -> SyncGateway {
    SyncGateway::new(&format!("{}/api", server.url()), auth).expect("mock server url parses")
}

/// Wire form of a stored contact.
pub fn contact_json(id: i64, first: &str, last: &str) -> Value {
    json!({
        "contactid": id,
        "fname": first,
        "lname": last,
        "pnumber": 0,
        "email": null,
        "curCloseness": 0,
        "desiredCloseness": 0,
        "minIFCount": -1,
        "minIFTime": -1,
        "descript": null,
        "label": null,
        "activeflag": 1,
        "location": null,
    })
}
