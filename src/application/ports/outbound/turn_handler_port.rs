//! Turn handler port - the host's default turn-start behavior

use async_trait::async_trait;

use crate::domain::entities::Hero;

/// Outbound port for the host's default per-turn handler.
///
/// The interceptor chains to this, unmodified, for every hero that does not
/// qualify for the prayer flow. For qualifying heroes it is suppressed
/// entirely; the two paths are never both taken for one occurrence.
#[async_trait]
pub trait TurnHandlerPort: Send + Sync {
    async fn on_turn_start(&self, hero: &Hero);
}
