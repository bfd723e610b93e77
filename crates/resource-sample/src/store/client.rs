//! # Store Client
//!
//! The cloneable half of a store. Besides its own request methods it
//! implements [`ModelGateway`], so a controller can use it directly.

use super::error::StoreError;
use super::message::{Checked, StoreRequest};
use super::Record;
use async_trait::async_trait;
use resource_actions::{ActionError, ModelGateway, MutationOutcome};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

#[derive(Debug)]
pub struct StoreClient<R> {
    sender: mpsc::Sender<StoreRequest<R>>,
}

impl<R> Clone for StoreClient<R> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<R: Record> StoreClient<R> {
    pub fn new(sender: mpsc::Sender<StoreRequest<R>>) -> Self {
        Self { sender }
    }

    pub async fn find(&self, id: u32) -> Result<Option<R>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Find { id, respond_to })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    pub async fn list(&self) -> Result<Vec<R>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::List { respond_to })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    /// Returns the stored record (with its id) or the validation messages.
    pub async fn save(&self, record: R) -> Result<Checked<R>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Save { record, respond_to })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    pub async fn destroy(&self, id: u32) -> Result<Checked<()>, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Destroy { id, respond_to })
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }
}

/// URL parameters are decimal ids; anything else cannot match a record.
fn parse_id(param: &str) -> Result<u32, ActionError> {
    param
        .parse()
        .map_err(|_| ActionError::NotFound(param.to_string()))
}

#[async_trait]
impl<R: Record> ModelGateway<R> for StoreClient<R> {
    fn construct(&self) -> R {
        R::default()
    }

    #[instrument(skip(self))]
    async fn find(&self, id: &str) -> Result<R, ActionError> {
        let key = parse_id(id)?;
        StoreClient::find(self, key)
            .await?
            .ok_or_else(|| ActionError::NotFound(id.to_string()))
    }

    async fn list_all(&self) -> Result<Vec<R>, ActionError> {
        Ok(self.list().await?)
    }

    #[instrument(skip_all)]
    async fn save(&self, record: &mut R) -> Result<MutationOutcome, ActionError> {
        debug!("Sending request");
        match StoreClient::save(self, record.clone()).await? {
            Ok(saved) => {
                *record = saved;
                Ok(MutationOutcome::success())
            }
            Err(errors) => Ok(MutationOutcome::failure(errors)),
        }
    }

    #[instrument(skip_all)]
    async fn destroy(&self, record: &mut R) -> Result<MutationOutcome, ActionError> {
        let id = record
            .id()
            .ok_or_else(|| ActionError::NotFound("unsaved record".to_string()))?;
        debug!(id, "Sending request");
        match StoreClient::destroy(self, id).await? {
            Ok(()) => Ok(MutationOutcome::success()),
            Err(errors) => Ok(MutationOutcome::failure(errors)),
        }
    }
}
