//! HTTP client for the document store and owner of the shared [`TaskCache`].
//!
//! Reads degrade to an empty result. Writes return a [`ClientError`] and leave
//! the cache untouched when the store rejects them.
//!
//! Every write runs in two steps: the request is built from a copy of the
//! cached task with the cache unlocked, and the result is applied in a short
//! synchronous step once the store answers. Overlapping writes therefore never
//! block each other or readers, and the response that lands last wins.

mod errors;

pub use errors::ClientError;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reqwest::Method;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, error, info, warn};

use crate::cache::TaskCache;
use crate::config::{CONTACTS, Config, TASKS};
use crate::models::{Contact, Status, Task, TaskId};
use crate::normalize::{normalize, normalize_contacts, normalize_snapshot};

/// Clones share one cache.
#[derive(Debug, Clone)]
pub struct RemoteTaskClient {
    http: reqwest::Client,
    config: Config,
    cache: Arc<Mutex<TaskCache>>,
}

impl RemoteTaskClient {
    pub fn new(config: Config) -> Self {
        Self::with_http(config, reqwest::Client::new())
    }

    /// Build a client around an existing `reqwest::Client`.
    pub fn with_http(config: Config, http: reqwest::Client) -> Self {
        RemoteTaskClient {
            http,
            config,
            cache: Arc::new(Mutex::new(TaskCache::new())),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Lock the cache. Never hold the guard across an `.await`.
    pub fn cache(&self) -> MutexGuard<'_, TaskCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Value, ClientError> {
        debug!(%method, url, "store request");
        let mut req = self.http.request(method.clone(), url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Rejected {
                method: method.to_string(),
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let text = resp.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ClientError::Decode(format!("{url}: {e}")))
    }

    /// Replace the cache with the store's task collection and return a copy
    /// of it.
    ///
    /// Any failure leaves an empty cache; the next successful fetch repairs it.
    pub async fn fetch_all(&self) -> Vec<Task> {
        let url = self.config.collection_url(TASKS);
        let tasks = match self.request(Method::GET, &url, None).await {
            Ok(body) => {
                let tasks = normalize_snapshot(&body);
                info!(count = tasks.len(), "fetched tasks");
                tasks
            }
            Err(e) => {
                warn!(error = %e, %url, "task fetch failed, showing an empty board");
                Vec::new()
            }
        };
        let mut cache = self.cache();
        cache.replace_all(tasks);
        cache.snapshot()
    }

    /// Read the contact directory that assignees resolve against.
    pub async fn fetch_contacts(&self) -> Vec<Contact> {
        let url = self.config.collection_url(CONTACTS);
        match self.request(Method::GET, &url, None).await {
            Ok(body) => normalize_contacts(&body),
            Err(e) => {
                warn!(error = %e, %url, "contact fetch failed");
                Vec::new()
            }
        }
    }

    /// Persist a new task and append it to the cache once the store has
    /// assigned its key.
    pub async fn create<D: Serialize + ?Sized>(&self, draft: &D) -> Result<Task, ClientError> {
        let draft = serde_json::to_value(draft)?;
        let body = normalize(&draft).to_draft_record()?;
        let url = self.config.collection_url(TASKS);

        let resp = match self.request(Method::POST, &url, Some(&body)).await {
            Ok(resp) => resp,
            Err(e) => {
                error!(error = %e, "task create failed");
                return Err(e);
            }
        };
        let key = resp
            .get("name")
            .and_then(Value::as_str)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ClientError::Decode(format!("{url}: response carries no key")))?
            .to_string();

        let mut record = draft.as_object().cloned().unwrap_or_default();
        record.insert("remoteKey".to_string(), Value::String(key.clone()));

        let mut cache = self.cache();
        let taken = record
            .get("id")
            .map(|id| normalize(&json!({ "id": id })).id)
            .is_some_and(|id| cache.get(&id).is_some());
        if taken {
            record.remove("id");
        }
        let task = normalize(&Value::Object(record));
        info!(id = %task.id, %key, "created task");
        cache.append(task.clone());
        Ok(task)
    }

    /// Move a task to `status`. Returns `Ok(false)` when the id is unknown.
    ///
    /// A task without a store key is only changed locally.
    pub async fn update_status(&self, id: &TaskId, status: Status) -> Result<bool, ClientError> {
        let key = {
            let mut cache = self.cache();
            let Some(task) = cache.get(id) else {
                debug!(%id, "status update for unknown task ignored");
                return Ok(false);
            };
            match task.remote_key.clone() {
                Some(key) => key,
                None => {
                    debug!(%id, %status, "task not persisted yet, updating status locally");
                    cache.set_status(id, status);
                    return Ok(true);
                }
            }
        };

        let url = self.config.record_url(TASKS, &key);
        let patch = json!({ "status": status.as_str() });
        if let Err(e) = self.request(Method::PATCH, &url, Some(&patch)).await {
            error!(error = %e, %id, %status, "status update failed");
            return Err(e);
        }
        info!(%id, %key, %status, "status updated");
        self.cache().set_status(id, status);
        Ok(true)
    }

    /// Key a write for `task` goes to: its own store key, then its id, then
    /// whatever key the cache already holds for that id.
    fn store_key(&self, task: &Task) -> Option<String> {
        task.remote_key
            .clone()
            .or_else(|| {
                let id = task.id.to_string();
                (!id.is_empty()).then_some(id)
            })
            .or_else(|| self.cache().key_for(&task.id).map(str::to_string))
    }

    /// Full replace of a task record. Does not touch the cache.
    pub async fn save(&self, task: &Task) -> Result<(), ClientError> {
        let key = self
            .store_key(task)
            .ok_or_else(|| ClientError::MissingKey(task.id.to_string()))?;
        let url = self.config.record_url(TASKS, &key);
        let body = task.to_record()?;
        if let Err(e) = self.request(Method::PUT, &url, Some(&body)).await {
            error!(error = %e, id = %task.id, %key, "task save failed");
            return Err(e);
        }
        info!(id = %task.id, %key, "task saved");
        Ok(())
    }

    /// Delete the record behind exactly this task. Does not touch the cache.
    pub async fn delete_task(&self, task: &Task) -> Result<(), ClientError> {
        let key = self
            .store_key(task)
            .ok_or_else(|| ClientError::MissingKey(task.id.to_string()))?;
        let url = self.config.record_url(TASKS, &key);
        if let Err(e) = self.request(Method::DELETE, &url, None).await {
            error!(error = %e, id = %task.id, %key, "task delete failed");
            return Err(e);
        }
        info!(id = %task.id, %key, "task deleted");
        Ok(())
    }

    /// Delete the cached task matched by id or store key.
    ///
    /// Returns `Ok(false)` without a request when nothing matches. The caller
    /// drops the task from the cache with [`RemoteTaskClient::forget`].
    pub async fn delete_by_id(&self, reference: &str) -> Result<bool, ClientError> {
        let found = self.cache().resolve(reference).cloned();
        let Some(task) = found else {
            debug!(reference, "delete for unknown task ignored");
            return Ok(false);
        };
        self.delete_task(&task).await?;
        Ok(true)
    }

    /// Drop a deleted task from the cache.
    pub fn forget(&self, reference: &str) -> Option<Task> {
        self.cache().remove(reference)
    }
}
