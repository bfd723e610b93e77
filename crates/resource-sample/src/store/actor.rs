//! # Store Actor
//!
//! An in-memory table of records owned by a single Tokio task. Requests are
//! processed one at a time, so the table needs no locks.

use super::client::StoreClient;
use super::error::StoreError;
use super::message::StoreRequest;
use super::Record;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The server half of a store: owns the records and the receiving end of the channel.
///
/// # Usage Pattern
///
/// 1.  **Create**: `StoreActor::new()` returns the actor and its client.
/// 2.  **Run**: spawn `actor.run()` in a background task.
/// 3.  **Use**: clone the client wherever records are needed.
///
/// ```rust,ignore
/// let (actor, posts) = StoreActor::<Post>::new(32);
/// tokio::spawn(actor.run());
/// let saved = posts.save(Post::new("Hello", "")).await??;
/// ```
///
/// Ids are assigned sequentially from 1 and never reused.
pub struct StoreActor<R: Record> {
    receiver: mpsc::Receiver<StoreRequest<R>>,
    records: BTreeMap<u32, R>,
    next_id: u32,
}

impl<R: Record> StoreActor<R> {
    /// Creates the actor and its client. `buffer_size` bounds the request queue.
    pub fn new(buffer_size: usize) -> (Self, StoreClient<R>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            records: BTreeMap::new(),
            next_id: 1,
        };
        (actor, StoreClient::new(sender))
    }

    /// Processes requests until every client is dropped.
    pub async fn run(mut self) {
        let record_type = std::any::type_name::<R>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(record_type, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Find { id, respond_to } => {
                    let record = self.records.get(&id).cloned();
                    debug!(record_type, id, found = record.is_some(), "Find");
                    let _ = respond_to.send(Ok(record));
                }
                StoreRequest::List { respond_to } => {
                    debug!(record_type, size = self.records.len(), "List");
                    let _ = respond_to.send(Ok(self.records.values().cloned().collect()));
                }
                StoreRequest::Save { record, respond_to } => {
                    let _ = respond_to.send(self.save(record_type, record));
                }
                StoreRequest::Destroy { id, respond_to } => {
                    debug!(record_type, id, "Destroy");
                    let Some(record) = self.records.get(&id) else {
                        warn!(record_type, id, "Not found");
                        let _ = respond_to.send(Err(StoreError::NotFound(id.to_string())));
                        continue;
                    };
                    let errors = record.check_destroy();
                    if !errors.is_empty() {
                        warn!(record_type, id, ?errors, "Destroy refused");
                        let _ = respond_to.send(Ok(Err(errors)));
                        continue;
                    }
                    self.records.remove(&id);
                    info!(record_type, id, size = self.records.len(), "Destroyed");
                    let _ = respond_to.send(Ok(Ok(())));
                }
            }
        }

        info!(record_type, size = self.records.len(), "Shutdown");
    }

    fn save(&mut self, record_type: &str, mut record: R) -> Result<Result<R, Vec<String>>, StoreError> {
        debug!(record_type, ?record, "Save");
        if let Some(id) = record.id() {
            if !self.records.contains_key(&id) {
                warn!(record_type, id, "Not found");
                return Err(StoreError::NotFound(id.to_string()));
            }
        }

        let errors = record.validate();
        if !errors.is_empty() {
            warn!(record_type, ?errors, "Invalid");
            return Ok(Err(errors));
        }

        let id = match record.id() {
            Some(id) => id,
            None => {
                let id = self.next_id;
                self.next_id += 1;
                record.set_id(id);
                id
            }
        };
        self.records.insert(id, record.clone());
        info!(record_type, id, size = self.records.len(), "Saved");
        Ok(Ok(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Post;

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let (actor, client) = StoreActor::<Post>::new(8);
        tokio::spawn(actor.run());

        let first = client.save(Post::new("One", "")).await.unwrap().unwrap();
        let second = client.save(Post::new("Two", "")).await.unwrap().unwrap();
        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));

        client.destroy(1).await.unwrap().unwrap();
        let third = client.save(Post::new("Three", "")).await.unwrap().unwrap();
        assert_eq!(third.id, Some(3));
        assert_eq!(client.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_records_are_not_stored() {
        let (actor, client) = StoreActor::<Post>::new(8);
        tokio::spawn(actor.run());

        let errors = client.save(Post::new("", "")).await.unwrap().unwrap_err();
        assert_eq!(errors, vec!["title can't be blank"]);
        assert!(client.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_locked_posts_refuse_destroy() {
        let (actor, client) = StoreActor::<Post>::new(8);
        tokio::spawn(actor.run());

        let mut post = Post::new("Pinned", "");
        post.locked = true;
        let post = client.save(post).await.unwrap().unwrap();
        let errors = client.destroy(post.id.unwrap()).await.unwrap().unwrap_err();
        assert_eq!(errors, vec!["post is locked"]);
        assert!(client.find(1).await.unwrap().is_some());
        assert!(matches!(
            client.destroy(42).await,
            Err(StoreError::NotFound(_))
        ));
    }
}
