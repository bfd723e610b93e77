//! # Resource Controller
//!
//! [`ResourceController`] implements the seven conventional actions once, for
//! any [`Model`]. A concrete controller is nothing more than a model concept, a
//! set of enabled actions and three collaborators:
//!
//! - a [`ModelGateway`] that persists records,
//! - an [`Authorizer`] that decides what the current user may do,
//! - a [`Translator`] that renders flash messages.
//!
//! ## Mutating actions
//!
//! `create`, `update` and `destroy` run the same protocol and end in exactly
//! one of two branches:
//!
//! ```text
//! resolve record ─▶ authorize ─▶ bind attributes ─▶ save / destroy
//!                      │          (create/update)        │
//!                      │      malformed values skip the  │
//!                      │      save and fail directly     │
//!                      ▼                          ┌──────┴──────┐
//!               Unauthorized (Err)                ▼             ▼
//!                                              Success       Failure
//!                                         flash success   flash error
//!                                         on_success or   redirect back
//!                                         redirect        (fallback: record
//!                                         discard flash    or list view)
//!                                         unless redirect
//! ```
//!
//! Authorization always happens before attributes are assigned and before the
//! gateway is asked to persist anything.
//!
//! ## Building
//!
//! ```rust,ignore
//! let posts = ControllerBuilder::new("posts")
//!     .except([Action::Destroy])
//!     .build(gateway, authorizer, MemoryTranslator::with_defaults());
//!
//! let mut ctx = ActionContext::new(Request::new().param("post", json!({"title": "Hi"})));
//! let branch = posts.create(&mut ctx, None).await?;
//! ```

use crate::actions::{Action, Branch, OnSuccess};
use crate::authorize::{Authorizer, Subject};
use crate::config::{check_redirect_status, ConfigError, ControllerConfig, DEFAULT_REDIRECT_STATUS};
use crate::context::ActionContext;
use crate::error::ActionError;
use crate::flash::{FlashMessageResolver, Severity};
use crate::gateway::{ModelGateway, MutationOutcome};
use crate::model::Model;
use crate::naming::{Inflections, ModelConcept};
use crate::translate::Translator;
use std::collections::BTreeSet;
use std::marker::PhantomData;
use tracing::{debug, info, instrument, warn};

/// Selects and configures the actions of a [`ResourceController`].
#[derive(Debug, Clone)]
pub struct ControllerBuilder {
    controller_path: String,
    model: Option<String>,
    only: Option<BTreeSet<Action>>,
    except: BTreeSet<Action>,
    flash_scope: Option<String>,
    redirect_status: u16,
    inflections: Inflections,
}

impl ControllerBuilder {
    pub fn new(controller_path: impl Into<String>) -> Self {
        Self {
            controller_path: controller_path.into(),
            model: None,
            only: None,
            except: BTreeSet::new(),
            flash_scope: None,
            redirect_status: DEFAULT_REDIRECT_STATUS,
            inflections: Inflections::default(),
        }
    }

    pub fn from_config(config: &ControllerConfig) -> Result<Self, ConfigError> {
        let mut builder = Self::new(config.controller_path.clone())
            .except(config.except.iter().copied())
            .flash_scope(config.flash_scope.clone())
            .redirect_status(config.redirect_status)?
            .inflections(config.inflections.to_inflections());
        if let Some(model) = &config.model {
            builder = builder.model(model.clone());
        }
        if let Some(only) = &config.only {
            builder = builder.only(only.iter().copied());
        }
        Ok(builder)
    }

    /// Names the model explicitly instead of deriving it from the path.
    pub fn model(mut self, name: impl Into<String>) -> Self {
        self.model = Some(name.into());
        self
    }

    pub fn only(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.only = Some(actions.into_iter().collect());
        self
    }

    pub fn except(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.except.extend(actions);
        self
    }

    pub fn flash_scope(mut self, scope: Option<String>) -> Self {
        self.flash_scope = scope;
        self
    }

    /// Status of every redirect the controller issues (default 302).
    ///
    /// Fails unless `status` is redirect-class, so the error flash always
    /// travels with a redirect.
    pub fn redirect_status(mut self, status: u16) -> Result<Self, ConfigError> {
        self.redirect_status = check_redirect_status(status)?;
        Ok(self)
    }

    pub fn inflections(mut self, inflections: Inflections) -> Self {
        self.inflections = inflections;
        self
    }

    pub fn build<M, G, A, T>(
        self,
        gateway: G,
        authorizer: A,
        translator: T,
    ) -> ResourceController<M, G, A, T>
    where
        M: Model,
        G: ModelGateway<M>,
        A: Authorizer<M>,
        T: Translator,
    {
        let concept = ModelConcept::resolve(
            &self.controller_path,
            self.model.as_deref(),
            &self.inflections,
        );
        let actions = self
            .only
            .unwrap_or_else(|| Action::ALL.into_iter().collect())
            .into_iter()
            .filter(|action| !self.except.contains(action))
            .collect();
        debug!(
            controller = concept.controller_path(),
            model = concept.name(),
            ?actions,
            "Controller built"
        );
        ResourceController {
            concept,
            actions,
            flash: FlashMessageResolver::with_scope(self.flash_scope),
            redirect_status: self.redirect_status,
            gateway,
            authorizer,
            translator,
            _model: PhantomData,
        }
    }
}

/// Generic implementation of the conventional actions for one model.
///
/// Immutable once built and safe to share between concurrent requests; all
/// per-request state lives in the [`ActionContext`].
pub struct ResourceController<M, G, A, T> {
    concept: ModelConcept,
    actions: BTreeSet<Action>,
    flash: FlashMessageResolver,
    redirect_status: u16,
    gateway: G,
    authorizer: A,
    translator: T,
    _model: PhantomData<fn() -> M>,
}

impl<M, G, A, T> ResourceController<M, G, A, T>
where
    M: Model,
    G: ModelGateway<M>,
    A: Authorizer<M>,
    T: Translator,
{
    pub fn concept(&self) -> &ModelConcept {
        &self.concept
    }

    pub fn is_enabled(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }

    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.actions.iter().copied()
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn authorizer(&self) -> &A {
        &self.authorizer
    }

    pub fn translator(&self) -> &T {
        &self.translator
    }

    /// The record assigned to the member slot by the last action.
    pub fn resource<'c>(&self, ctx: &'c ActionContext<M>) -> Option<&'c M> {
        ctx.assigns.member(self.concept.singular())
    }

    /// The records assigned to the collection slot by `list`.
    pub fn collection<'c>(&self, ctx: &'c ActionContext<M>) -> Option<&'c [M]> {
        ctx.assigns.collection(self.concept.plural())
    }

    // --- Entry points ---

    /// Lists every record the user may see.
    #[instrument(skip_all, fields(controller = %self.concept.controller_path(), action = "index"))]
    pub async fn list(&self, ctx: &mut ActionContext<M>) -> Result<(), ActionError> {
        self.enter(ctx, Action::List)?;
        self.authorize(Subject::Class(&self.concept), Action::List)
            .await?;
        let records = self.gateway.list_all().await?;
        let records = self.authorizer.scope(records).await;
        debug!(count = records.len(), "Listed");
        ctx.assigns.set_collection(self.concept.plural(), records);
        Ok(())
    }

    #[instrument(skip_all, fields(controller = %self.concept.controller_path(), action = "show"))]
    pub async fn show(&self, ctx: &mut ActionContext<M>) -> Result<(), ActionError> {
        self.load_member(ctx, Action::Show).await
    }

    /// Prepares an unsaved record, pre-filled from submitted parameters.
    #[instrument(skip_all, fields(controller = %self.concept.controller_path(), action = "new"))]
    pub async fn new_form(&self, ctx: &mut ActionContext<M>) -> Result<(), ActionError> {
        self.enter(ctx, Action::NewForm)?;
        let mut record = self.gateway.construct();
        self.authorize(Subject::Instance(&record), Action::NewForm)
            .await?;
        self.bind_attributes(ctx, &mut record, Action::NewForm)
            .await?;
        ctx.assigns.set_member(self.concept.singular(), record);
        Ok(())
    }

    #[instrument(skip_all, fields(controller = %self.concept.controller_path(), action = "edit"))]
    pub async fn edit_form(&self, ctx: &mut ActionContext<M>) -> Result<(), ActionError> {
        self.load_member(ctx, Action::EditForm).await
    }

    #[instrument(skip_all, fields(controller = %self.concept.controller_path(), action = "create"))]
    pub async fn create(
        &self,
        ctx: &mut ActionContext<M>,
        on_success: Option<OnSuccess<M>>,
    ) -> Result<Branch, ActionError> {
        self.enter(ctx, Action::Create)?;
        let record = self.gateway.construct();
        self.mutate(ctx, Action::Create, record, on_success).await
    }

    #[instrument(skip_all, fields(controller = %self.concept.controller_path(), action = "update"))]
    pub async fn update(
        &self,
        ctx: &mut ActionContext<M>,
        on_success: Option<OnSuccess<M>>,
    ) -> Result<Branch, ActionError> {
        self.enter(ctx, Action::Update)?;
        let record = self.find(ctx).await?;
        self.mutate(ctx, Action::Update, record, on_success).await
    }

    #[instrument(skip_all, fields(controller = %self.concept.controller_path(), action = "destroy"))]
    pub async fn destroy(
        &self,
        ctx: &mut ActionContext<M>,
        on_success: Option<OnSuccess<M>>,
    ) -> Result<Branch, ActionError> {
        self.enter(ctx, Action::Destroy)?;
        let record = self.find(ctx).await?;
        self.mutate(ctx, Action::Destroy, record, on_success).await
    }

    // --- Protocol ---

    fn enter(&self, ctx: &mut ActionContext<M>, action: Action) -> Result<(), ActionError> {
        if !self.is_enabled(action) {
            warn!(%action, "Action not enabled");
            return Err(ActionError::ActionNotEnabled(action));
        }
        ctx.enter(action);
        Ok(())
    }

    async fn find(&self, ctx: &ActionContext<M>) -> Result<M, ActionError> {
        let id = ctx.id_param().ok_or_else(|| {
            ActionError::NotFound(format!("{} without id", self.concept.name()))
        })?;
        debug!(%id, "Find");
        self.gateway.find(&id).await
    }

    async fn load_member(&self, ctx: &mut ActionContext<M>, action: Action) -> Result<(), ActionError> {
        self.enter(ctx, action)?;
        let record = self.find(ctx).await?;
        self.authorize(Subject::Instance(&record), action).await?;
        ctx.assigns.set_member(self.concept.singular(), record);
        Ok(())
    }

    async fn authorize(&self, subject: Subject<'_, M>, action: Action) -> Result<(), ActionError> {
        let decision = self.authorizer.authorize(subject, action).await;
        if decision.allowed {
            return Ok(());
        }
        let subject = subject.describe();
        warn!(%subject, reason = ?decision.reason, "Not authorized");
        Err(ActionError::Unauthorized {
            action,
            subject,
            reason: decision.reason,
        })
    }

    /// Applies the permitted part of `params[singular]`, when present. Never persists.
    async fn bind_attributes(
        &self,
        ctx: &ActionContext<M>,
        record: &mut M,
        action: Action,
    ) -> Result<(), ActionError> {
        let Some(params) = ctx.nested_params(self.concept.singular()) else {
            return Ok(());
        };
        let permitted = self
            .authorizer
            .permitted_attributes(record, action, params)
            .await;
        debug!(
            submitted = params.len(),
            permitted = permitted.len(),
            "Binding attributes"
        );
        record.assign_attributes(permitted)
    }

    async fn mutate(
        &self,
        ctx: &mut ActionContext<M>,
        action: Action,
        mut record: M,
        on_success: Option<OnSuccess<M>>,
    ) -> Result<Branch, ActionError> {
        self.authorize(Subject::Instance(&record), action).await?;

        let outcome = if action == Action::Destroy {
            self.gateway.destroy(&mut record).await?
        } else {
            match self.bind_attributes(ctx, &mut record, action).await {
                Ok(()) => self.gateway.save(&mut record).await?,
                // Malformed input is the user's to fix, like a validation error.
                Err(ActionError::InvalidAttributes(message)) => {
                    debug!(%message, "Attributes rejected");
                    MutationOutcome::failure([message])
                }
                Err(e) => return Err(e),
            }
        };

        let param = record.to_param();
        let fallback = match action {
            Action::Destroy => self.concept.collection_path(),
            _ => self.concept.member_path(param.as_deref()),
        };
        ctx.assigns
            .set_member(self.concept.singular(), record.clone());

        if outcome.is_success() {
            let message = self.flash_message(action, Severity::Success, None)?;
            ctx.flash.set(Severity::Success, message);
            match on_success {
                Some(handler) => handler(ctx, &record),
                None => ctx.redirect_to(fallback, self.redirect_status),
            }
            // Decided once, on the final status.
            if !ctx.is_redirect() && ctx.flash.discard(Severity::Success) {
                debug!(status = ctx.status(), "Success flash discarded");
            }
            info!(id = ?param, status = ctx.status(), "Succeeded");
            Ok(Branch::Success)
        } else {
            warn!(id = ?param, errors = ?outcome.errors(), "Failed");
            let message = self.flash_message(action, Severity::Error, Some(outcome.errors()))?;
            ctx.flash.set(Severity::Error, message);
            ctx.redirect_back(fallback, self.redirect_status);
            Ok(Branch::Failure)
        }
    }

    fn flash_message(
        &self,
        action: Action,
        severity: Severity,
        errors: Option<&[String]>,
    ) -> Result<String, ActionError> {
        let mut values = FlashMessageResolver::interpolation(&self.concept)?;
        if let Some(errors) = errors {
            values.insert("errors", errors.join(", "))?;
        }
        Ok(self.flash.resolve(
            &self.translator,
            self.concept.controller_key(),
            action.as_str(),
            severity,
            values,
        ))
    }
}
