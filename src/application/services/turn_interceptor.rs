//! Turn-start interception - the integration point over the host's handler
//!
//! Wraps the host's default per-turn behavior. Non-qualifying heroes pass
//! through to the wrapped handler untouched; qualifying heroes have their
//! passive piety gain suppressed and replaced by the full prayer flow,
//! exactly once per occurrence. The same instance is also the entry point
//! for prayer requests arriving from the channel, so the decision-to-effect
//! tail lives in one place on every client.

use std::sync::Arc;

use crate::application::dto::ChannelMessage;
use crate::application::ports::outbound::TurnHandlerPort;
use crate::application::services::{
    AuthorityResolver, EffectEmitter, OutcomeResolver, PrayerRouter, Routed,
};
use crate::domain::entities::{HeroRegistry, Roster};
use crate::domain::events::TurnStartEvent;

/// Intercepts turn-start occurrences and drives the prayer flow.
pub struct TurnStartInterceptor {
    router: Arc<PrayerRouter>,
    outcome: Arc<OutcomeResolver>,
    emitter: Arc<EffectEmitter>,
    default_handler: Arc<dyn TurnHandlerPort>,
}

impl TurnStartInterceptor {
    /// Wrap the host's default turn-start handler.
    pub fn wrap(
        default_handler: Arc<dyn TurnHandlerPort>,
        router: Arc<PrayerRouter>,
        outcome: Arc<OutcomeResolver>,
        emitter: Arc<EffectEmitter>,
    ) -> Self {
        Self {
            router,
            outcome,
            emitter,
            default_handler,
        }
    }

    /// Handle one turn-start occurrence observed on this client.
    ///
    /// Exactly one of two things happens: the wrapped default handler runs
    /// (non-qualifying hero), or the prayer flow runs (qualifying hero).
    /// Never both. A flow forwarded to a remote authority ends here with
    /// neither a default gain nor an effect; the remote client finishes it.
    pub async fn on_turn_start(
        &self,
        event: &TurnStartEvent,
        roster: &Roster,
        heroes: &HeroRegistry,
    ) {
        let Some(hero) = heroes.get(event.hero_id) else {
            tracing::warn!(hero_id = %event.hero_id, "Turn start for unknown hero, ignoring");
            return;
        };

        if !hero.is_conduit() || hero.turn_gain.is_none() {
            self.default_handler.on_turn_start(hero).await;
            return;
        }

        let authority = AuthorityResolver::resolve(hero, roster);
        match self.router.route(event, hero, authority).await {
            Ok(Routed::Local(decision)) => {
                let outcome = self.outcome.resolve(hero, decision);
                self.emitter.emit(hero, &outcome);
            }
            Ok(Routed::Forwarded) => {
                tracing::debug!(hero = %hero.name, "Prayer decision forwarded to controller");
            }
            Err(e) => {
                // Presentation failure. The occurrence is abandoned: no
                // effect, no default gain. See the error-handling notes in
                // DESIGN.md for why this does not fall back to a decline.
                tracing::error!(hero = %hero.name, "Prayer prompt failed, aborting occurrence: {e}");
            }
        }
    }

    /// Handle a channel message received from another client.
    ///
    /// The router re-validates and prompts; when the local user turns out to
    /// be the authority, the decision resolves and emits here, completing
    /// the occurrence the requesting client started.
    pub async fn on_channel_message(
        &self,
        message: &ChannelMessage,
        roster: &Roster,
        heroes: &HeroRegistry,
    ) {
        match self.router.accept_remote(message, roster, heroes).await {
            Ok(Some((hero, decision))) => {
                let outcome = self.outcome.resolve(hero, decision);
                self.emitter.emit(hero, &outcome);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!("Prayer prompt failed for forwarded request, aborting: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::outbound::{
        BusError, ChroniclePort, MessageBusPort, PrayerPromptRequest, PromptError, PromptPort,
        RandomizerPort,
    };
    use crate::domain::entities::{Hero, SessionUser, CONDUIT_CLASS};
    use crate::domain::events::ChronicleEntry;
    use crate::domain::value_objects::{DiceFormula, PromptChoice, UserId};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingChronicle {
        entries: Mutex<Vec<ChronicleEntry>>,
    }

    impl RecordingChronicle {
        fn effects(&self) -> usize {
            self.entries
                .lock()
                .unwrap()
                .iter()
                .filter(|e| matches!(e, ChronicleEntry::Effect(_)))
                .count()
        }
    }

    impl ChroniclePort for RecordingChronicle {
        fn append(&self, entry: ChronicleEntry) {
            self.entries.lock().unwrap().push(entry);
        }
    }

    #[derive(Default)]
    struct CapturingBus {
        published: Mutex<Vec<ChannelMessage>>,
    }

    impl MessageBusPort for CapturingBus {
        fn publish(&self, message: ChannelMessage) -> Result<(), BusError> {
            self.published.lock().unwrap().push(message);
            Ok(())
        }
    }

    struct FixedDice(u8);

    impl RandomizerPort for FixedDice {
        fn roll_uniform(&self, _sides: u8) -> u8 {
            self.0
        }
    }

    enum PromptScript {
        Answer(PromptChoice),
        Fail,
    }

    struct ScriptedPrompt {
        script: PromptScript,
        presented: AtomicU32,
    }

    impl ScriptedPrompt {
        fn answering(choice: PromptChoice) -> Self {
            Self {
                script: PromptScript::Answer(choice),
                presented: AtomicU32::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                script: PromptScript::Fail,
                presented: AtomicU32::new(0),
            }
        }

        fn presentations(&self) -> u32 {
            self.presented.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl PromptPort for ScriptedPrompt {
        async fn prompt(&self, _request: PrayerPromptRequest) -> Result<PromptChoice, PromptError> {
            self.presented.fetch_add(1, Ordering::SeqCst);
            match &self.script {
                PromptScript::Answer(choice) => Ok(*choice),
                PromptScript::Fail => {
                    Err(PromptError::Presentation("dialog layer exploded".to_string()))
                }
            }
        }
    }

    #[derive(Default)]
    struct CountingHandler {
        calls: AtomicU32,
    }

    #[async_trait::async_trait]
    impl TurnHandlerPort for CountingHandler {
        async fn on_turn_start(&self, _hero: &Hero) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Harness {
        interceptor: TurnStartInterceptor,
        chronicle: Arc<RecordingChronicle>,
        bus: Arc<CapturingBus>,
        prompt: Arc<ScriptedPrompt>,
        handler: Arc<CountingHandler>,
    }

    fn harness(local: &SessionUser, baseline: u8, prompt: ScriptedPrompt) -> Harness {
        let chronicle = Arc::new(RecordingChronicle::default());
        let bus = Arc::new(CapturingBus::default());
        let prompt = Arc::new(prompt);
        let handler = Arc::new(CountingHandler::default());

        let router = Arc::new(PrayerRouter::new(
            local.id,
            local.name.clone(),
            bus.clone(),
            prompt.clone(),
        ));
        let outcome = Arc::new(OutcomeResolver::new(
            Arc::new(FixedDice(baseline)),
            chronicle.clone(),
        ));
        let emitter = Arc::new(EffectEmitter::new(chronicle.clone()));

        Harness {
            interceptor: TurnStartInterceptor::wrap(handler.clone(), router, outcome, emitter),
            chronicle,
            bus,
            prompt,
            handler,
        }
    }

    fn conduit() -> Hero {
        Hero::new("Brother Aldric", 3, CONDUIT_CLASS).with_turn_gain(DiceFormula::new(1, 3))
    }

    #[tokio::test]
    async fn test_ineligible_hero_passes_through_to_default() {
        let hero = Hero::new("Vara", 3, "tactician").with_turn_gain(DiceFormula::new(1, 3));
        let local = SessionUser::new("alice").controlling(hero.id);
        let mut roster = Roster::new();
        roster.upsert(local.clone());
        let mut heroes = HeroRegistry::new();
        heroes.insert(hero.clone());

        let h = harness(&local, 2, ScriptedPrompt::answering(PromptChoice::Pray));
        let event = TurnStartEvent::new(hero.id, local.id);
        h.interceptor.on_turn_start(&event, &roster, &heroes).await;

        assert_eq!(h.handler.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.prompt.presentations(), 0);
        assert!(h.chronicle.entries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_conduit_without_turn_gain_passes_through() {
        let hero = Hero::new("Brother Aldric", 3, CONDUIT_CLASS);
        let local = SessionUser::new("alice").controlling(hero.id);
        let mut roster = Roster::new();
        roster.upsert(local.clone());
        let mut heroes = HeroRegistry::new();
        heroes.insert(hero.clone());

        let h = harness(&local, 2, ScriptedPrompt::answering(PromptChoice::Pray));
        let event = TurnStartEvent::new(hero.id, local.id);
        h.interceptor.on_turn_start(&event, &roster, &heroes).await;

        assert_eq!(h.handler.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.chronicle.effects(), 0);
    }

    #[tokio::test]
    async fn test_local_resolution_emits_exactly_one_effect() {
        let hero = conduit();
        let local = SessionUser::new("alice").controlling(hero.id);
        let mut roster = Roster::new();
        roster.upsert(local.clone());
        let mut heroes = HeroRegistry::new();
        heroes.insert(hero.clone());

        let h = harness(&local, 1, ScriptedPrompt::answering(PromptChoice::Pray));
        let event = TurnStartEvent::new(hero.id, local.id);
        h.interceptor.on_turn_start(&event, &roster, &heroes).await;

        // Prayer flow ran; the default passive gain did not.
        assert_eq!(h.handler.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.chronicle.effects(), 1);

        let entries = h.chronicle.entries.lock().unwrap();
        match (&entries[0], &entries[1]) {
            (ChronicleEntry::Roll(roll), ChronicleEntry::Effect(effect)) => {
                assert_eq!(roll.roll, 1);
                assert_eq!(effect.gain.render(), "gain 2 heroic");
                assert_eq!(
                    effect.damage.as_ref().map(|d| d.render()),
                    Some("damage 1d6+3 psychic unblockable".to_string())
                );
            }
            other => panic!("expected roll then effect, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_remote_authority_means_no_local_effect() {
        let hero = conduit();
        let owner = SessionUser::new("alice").controlling(hero.id);
        let gm = SessionUser::new("gm").privileged();
        let mut roster = Roster::new();
        roster.upsert(owner.clone());
        roster.upsert(gm.clone());
        let mut heroes = HeroRegistry::new();
        heroes.insert(hero.clone());

        let h = harness(&gm, 2, ScriptedPrompt::answering(PromptChoice::Pray));
        let event = TurnStartEvent::new(hero.id, gm.id);
        h.interceptor.on_turn_start(&event, &roster, &heroes).await;

        assert_eq!(h.prompt.presentations(), 0);
        assert_eq!(h.chronicle.effects(), 0);
        assert_eq!(h.handler.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.bus.published.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_offline_owner_falls_back_to_triggering_client() {
        let hero = conduit();
        let owner = SessionUser::new("alice").controlling(hero.id).offline();
        let gm = SessionUser::new("gm").privileged();
        let mut roster = Roster::new();
        roster.upsert(owner);
        roster.upsert(gm.clone());
        let mut heroes = HeroRegistry::new();
        heroes.insert(hero.clone());

        let h = harness(&gm, 2, ScriptedPrompt::answering(PromptChoice::Pray));
        let event = TurnStartEvent::new(hero.id, gm.id);
        h.interceptor.on_turn_start(&event, &roster, &heroes).await;

        // Nobody to forward to: the GM client prompts and resolves itself.
        assert_eq!(h.prompt.presentations(), 1);
        assert_eq!(h.chronicle.effects(), 1);
        assert!(h.bus.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dismissed_prompt_matches_explicit_skip() {
        let hero = conduit();
        let local = SessionUser::new("alice").controlling(hero.id);
        let mut roster = Roster::new();
        roster.upsert(local.clone());
        let mut heroes = HeroRegistry::new();
        heroes.insert(hero.clone());

        let dismissed = harness(&local, 2, ScriptedPrompt::answering(PromptChoice::Dismissed));
        let explicit = harness(&local, 2, ScriptedPrompt::answering(PromptChoice::Skip));

        let event = TurnStartEvent::new(hero.id, local.id);
        dismissed
            .interceptor
            .on_turn_start(&event, &roster, &heroes)
            .await;
        explicit
            .interceptor
            .on_turn_start(&event, &roster, &heroes)
            .await;

        let effect_of = |h: &Harness| {
            h.chronicle
                .entries
                .lock()
                .unwrap()
                .iter()
                .find_map(|e| match e {
                    ChronicleEntry::Effect(effect) => {
                        Some((effect.gain.clone(), effect.label, effect.narrative.clone()))
                    }
                    _ => None,
                })
                .expect("effect expected")
        };
        assert_eq!(effect_of(&dismissed), effect_of(&explicit));
    }

    #[tokio::test]
    async fn test_prompt_failure_aborts_without_effect_or_default() {
        let hero = conduit();
        let local = SessionUser::new("alice").controlling(hero.id);
        let mut roster = Roster::new();
        roster.upsert(local.clone());
        let mut heroes = HeroRegistry::new();
        heroes.insert(hero.clone());

        let h = harness(&local, 2, ScriptedPrompt::failing());
        let event = TurnStartEvent::new(hero.id, local.id);
        h.interceptor.on_turn_start(&event, &roster, &heroes).await;

        assert_eq!(h.chronicle.effects(), 0);
        assert_eq!(h.handler.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_channel_message_resolves_on_the_controller() {
        let hero = conduit();
        let local = SessionUser::new("alice").controlling(hero.id);
        let mut roster = Roster::new();
        roster.upsert(local.clone());
        let mut heroes = HeroRegistry::new();
        heroes.insert(hero.clone());

        let h = harness(&local, 3, ScriptedPrompt::answering(PromptChoice::Pray));
        let message = ChannelMessage::PromptPrayer {
            hero_id: hero.id,
            hero_name: hero.name.clone(),
            requester_id: UserId::new(),
            requester_name: "gm".to_string(),
            occurrence: None,
        };
        h.interceptor
            .on_channel_message(&message, &roster, &heroes)
            .await;

        assert_eq!(h.prompt.presentations(), 1);
        assert_eq!(h.chronicle.effects(), 1);
        let entries = h.chronicle.entries.lock().unwrap();
        match entries.last().unwrap() {
            ChronicleEntry::Effect(effect) => {
                assert_eq!(effect.gain.render(), "gain 5 heroic");
                assert!(effect.boon_available);
            }
            other => panic!("expected effect, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_channel_message_is_noop_for_bystanders() {
        let hero = conduit();
        let local = SessionUser::new("bob");
        let mut roster = Roster::new();
        roster.upsert(local.clone());
        let mut heroes = HeroRegistry::new();
        heroes.insert(hero.clone());

        let h = harness(&local, 3, ScriptedPrompt::answering(PromptChoice::Pray));
        let message = ChannelMessage::PromptPrayer {
            hero_id: hero.id,
            hero_name: hero.name.clone(),
            requester_id: UserId::new(),
            requester_name: "gm".to_string(),
            occurrence: None,
        };
        h.interceptor
            .on_channel_message(&message, &roster, &heroes)
            .await;

        assert_eq!(h.prompt.presentations(), 0);
        assert_eq!(h.chronicle.effects(), 0);
    }
}
