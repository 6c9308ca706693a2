//! # Generic Messages
//!
//! The request type exchanged between [`ResourceClient`](crate::ResourceClient) and
//! [`ResourceActor`](crate::ResourceActor).

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::subscription::Subscription;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Message sent to the actor to request an operation.
///
/// The CRUD variants cover the lifecycle of a single document:
///
/// - **Create**: builds a new entity from [`ActorEntity::Create`].
/// - **Get**: fetches the current state by id.
/// - **Update**: applies an [`ActorEntity::Update`] DTO.
/// - **Delete**: removes the entity.
/// - **Action**: runs a custom [`ActorEntity::Action`].
///
/// Two collection-level variants back the document-database style queries:
///
/// - **List**: every entity matching an [`ActorEntity::Query`], in id order.
/// - **Subscribe**: a [`Subscription`] that receives the current matches and then
///   every subsequent change to them.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    List {
        query: T::Query,
        respond_to: Response<Vec<T>>,
    },
    Subscribe {
        query: T::Query,
        respond_to: Response<Subscription<T>>,
    },
}
