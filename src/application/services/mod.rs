//! Application services - Use case implementations
//!
//! Each service follows hexagonal architecture principles, taking its
//! collaborators through outbound ports so tests can substitute
//! deterministic fakes for the dice, the prompt, the channel, and the
//! chronicle.

mod authority_service;
mod effect_emitter;
mod outcome_service;
mod prayer_router;
mod turn_interceptor;

pub use authority_service::AuthorityResolver;
pub use effect_emitter::EffectEmitter;
pub use outcome_service::OutcomeResolver;
pub use prayer_router::{PrayerRouter, Routed};
pub use turn_interceptor::TurnStartInterceptor;
