//! Domain types and models

pub mod event;
pub mod identity;
pub mod post;

pub use event::{CastAuthor, CastData, CastReference, Embed, WebhookEnvelope};
pub use identity::{LinkedIdentity, ProviderProfile, ProviderTokens};
pub use post::{MediaPayload, OutboundPost, PostConfirmation, PreparedCast, PublishResult, SkippedMedia};
