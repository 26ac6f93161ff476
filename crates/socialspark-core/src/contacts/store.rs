//! Contact store: the authoritative local view of the user's contacts.
//!
//! The collection lives in a `watch` channel so a UI can subscribe to it.
//! Every operation mutates the collection at most once, after its remote
//! call has resolved, so subscribers never see a half-applied change.

use tokio::sync::watch;

use super::{Contact, DeviceContact};
use crate::error::ContactError;
use crate::gateway::{segment, SyncGateway};

/// Outcome of a device-contact import batch.
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    /// Contacts created remotely, in import order.
    pub created: Vec<Contact>,
    /// Items whose create call failed and were skipped.
    pub failed: usize,
}

pub struct ContactStore {
    gateway: SyncGateway,
    user_id: String,
    state: watch::Sender<Vec<Contact>>,
}

impl ContactStore {
    pub fn new(gateway: SyncGateway, user_id: impl Into<String>) -> Self {
        let (state, _) = watch::channel(Vec::new());
        Self {
            gateway,
            user_id: user_id.into(),
            state,
        }
    }

    /// Receiver notified after every collection change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Contact>> {
        self.state.subscribe()
    }

    /// Snapshot of the current collection.
    pub fn contacts(&self) -> Vec<Contact> {
        self.state.borrow().clone()
    }

    pub fn get(&self, id: i64) -> Option<Contact> {
        self.state.borrow().iter().find(|c| c.id == Some(id)).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }

    /// Fetch every contact and replace the local collection in server order.
    ///
    /// On failure the previous collection is kept.
    pub async fn list(&self) -> Result<Vec<Contact>, ContactError> {
        let path = format!("/get/contacts/{}", segment(&self.user_id));
        let contacts: Vec<Contact> = self.gateway.get(&path).await?;
        if contacts.iter().any(|c| c.id.is_none()) {
            return Err(ContactError::MissingServerId);
        }

        tracing::info!(count = contacts.len(), "contacts listed");
        self.state.send_replace(contacts.clone());
        Ok(contacts)
    }

    /// Create a contact remotely and append the server's copy locally.
    pub async fn create(&self, contact: &Contact) -> Result<Contact, ContactError> {
        let path = format!("/create/contact/{}", segment(&self.user_id));
        let created: Contact = self.gateway.post(&path, contact).await?;
        if created.id.is_none() {
            return Err(ContactError::MissingServerId);
        }

        tracing::debug!(id = ?created.id, "contact created");
        self.state.send_modify(|contacts| contacts.push(created.clone()));
        Ok(created)
    }

    /// Update a persisted contact and replace the local entry with the same id.
    ///
    /// If no local entry has that id the collection is left as is.
    pub async fn update(&self, contact: &Contact) -> Result<Contact, ContactError> {
        let id = contact.id.ok_or(ContactError::MissingId)?;
        let path = format!("/update/contact/{}/{}", segment(&self.user_id), id);
        let mut updated: Contact = self.gateway.put(&path, contact).await?;
        if updated.id.is_none() {
            updated.id = Some(id);
        }

        let replaced = self.state.send_if_modified(|contacts| {
            match contacts.iter_mut().find(|c| c.id == Some(id)) {
                Some(slot) => {
                    *slot = updated.clone();
                    true
                }
                None => false,
            }
        });
        if !replaced {
            tracing::debug!(id, "updated contact not present locally; not inserted");
        }
        Ok(updated)
    }

    /// Create one contact per device contact.
    ///
    /// Per-item failures are logged and skipped. No de-duplication is done:
    /// importing the same device contact twice creates two contacts.
    pub async fn merge_imported(&self, device_contacts: &[DeviceContact]) -> ImportSummary {
        let mut summary = ImportSummary::default();
        for device in device_contacts {
            let contact = Contact::from(device);
            match self.create(&contact).await {
                Ok(created) => summary.created.push(created),
                Err(e) => {
                    tracing::warn!(
                        name = %contact.display_name(),
                        error = %e,
                        "skipping imported contact"
                    );
                    summary.failed += 1;
                }
            }
        }
        tracing::info!(
            created = summary.created.len(),
            failed = summary.failed,
            "device contacts imported"
        );
        summary
    }
}
