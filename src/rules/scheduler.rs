//! The turn state machine.
//!
//! ```text
//! SETUP -> DRAW -> ACTION -> RESOLUTION -> TURN_END -> DRAW (next actor)
//!                                       \-> VICTORY | DEFEAT
//! ```
//!
//! `TurnScheduler` owns the `CombatState` and is the only way to mutate it.
//! Every public call runs to completion: it applies one request, then
//! advances through automatic phases (including AI turns) until it needs
//! input from a player-controlled combatant or the combat ends.
//!
//! Advancing also stops early in two cases, both reported as events and
//! left for the caller to `resume` or `abort`:
//!
//! - An AI request is rejected (`CombatEvent::Halted`). The request that
//!   triggered the AI turn still succeeds; the error is kept in
//!   `pending_error`.
//! - A full round of turns goes by with no play and no player input
//!   (`CombatEvent::Stalled`), so no combatant can make progress.
//!
//! ## Usage
//!
//! ```
//! use card_combat::cards::{Card, CardType, StatMod, TargetKind};
//! use card_combat::core::{CombatConfig, CombatantSpec, GroupSpec, Phase, HEALTH};
//! use card_combat::rules::TurnScheduler;
//!
//! let strike = Card::new("Strike", CardType::Attack, TargetKind::FrontEnemy)
//!     .with_cost(1)
//!     .with_mod(StatMod::immediate(HEALTH, -6));
//!
//! let mut combat = TurnScheduler::new(
//!     CombatConfig::new(42),
//!     GroupSpec::player(vec![CombatantSpec::new("Hero").with_deck(vec![strike; 5])]),
//!     GroupSpec::ai(vec![CombatantSpec::new("Slime").with_health(10)]),
//! )
//! .unwrap();
//! combat.start().unwrap();
//! assert_eq!(combat.phase(), Phase::Action);
//!
//! let hero = combat.state().actor.unwrap();
//! let plays = combat.legal_plays(hero).unwrap();
//! combat.play_card(hero, plays[0].card, None).unwrap();
//! combat.play_card(hero, plays[1].card, None).unwrap();
//! assert_eq!(combat.phase(), Phase::Victory);
//! ```

use rustc_hash::FxHashMap;

use crate::core::{
    Action, CardInstanceId, CombatConfig, CombatError, CombatResult, CombatState, CombatantId,
    Control, GroupId, GroupSpec, Phase,
};
use crate::effects::{EffectEngine, EffectOutcome, TargetResolver};
use crate::piles::PileKind;

use super::events::{CombatEvent, CombatObserver};
use super::policy::{ActorPolicy, Decision, FirstPlayable, LegalPlay};

/// Drives one encounter from setup to victory or defeat.
pub struct TurnScheduler {
    state: CombatState,
    config: CombatConfig,
    policies: FxHashMap<GroupId, Box<dyn ActorPolicy>>,
    observers: Vec<Box<dyn CombatObserver>>,
    pending_error: Option<CombatError>,
    stalled: bool,
    /// Consecutive turns that ended without a play or player input.
    idle_turns: usize,
    turn_acted: bool,
}

impl TurnScheduler {
    /// Build an encounter in `SETUP`.
    ///
    /// AI-controlled groups start with the `FirstPlayable` policy.
    pub fn new(
        config: CombatConfig,
        group_a: GroupSpec,
        group_b: GroupSpec,
    ) -> Result<Self, CombatError> {
        let state = CombatState::new(&config, group_a, group_b)?;

        let mut policies: FxHashMap<GroupId, Box<dyn ActorPolicy>> = FxHashMap::default();
        for group in GroupId::all() {
            if state.group(group).control == Control::Ai {
                policies.insert(group, Box::new(FirstPlayable));
            }
        }

        Ok(Self {
            state,
            config,
            policies,
            observers: Vec::new(),
            pending_error: None,
            stalled: false,
            idle_turns: 0,
            turn_acted: false,
        })
    }

    // === Accessors ===

    /// Read-only view of the combat.
    #[must_use]
    pub fn state(&self) -> &CombatState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// The final result, once the combat has ended.
    #[must_use]
    pub fn result(&self) -> Option<CombatResult> {
        self.state.phase.result()
    }

    /// The error that halted the last advance, if `resume` is needed.
    #[must_use]
    pub fn pending_error(&self) -> Option<&CombatError> {
        self.pending_error.as_ref()
    }

    /// Check whether the last advance stopped because nobody could act.
    #[must_use]
    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    /// Replace the policy driving an AI-controlled group.
    pub fn set_policy(&mut self, group: GroupId, policy: Box<dyn ActorPolicy>) {
        self.policies.insert(group, policy);
    }

    /// Register a change observer.
    pub fn subscribe(&mut self, observer: Box<dyn CombatObserver>) {
        self.observers.push(observer);
    }

    // === Requests ===

    /// Run `SETUP` and advance until input is needed.
    ///
    /// Shuffles every starting deck, fills energy, and hands the first turn
    /// to the first living combatant of group A.
    pub fn start(&mut self) -> Result<(), CombatError> {
        if self.state.is_over() {
            return Err(CombatError::CombatAlreadyEnded);
        }
        if self.state.phase != Phase::Setup {
            return Err(CombatError::WrongPhase {
                expected: Phase::Setup,
                actual: self.state.phase,
            });
        }

        let ids: Vec<_> = self.state.combatants().map(|c| c.id).collect();
        for id in ids {
            self.state.with_combatant_rng(id, |combatant, rng| {
                combatant.piles_mut().shuffle(PileKind::Draw, rng);
                combatant.energy = i64::from(combatant.energy_per_turn);
                combatant.refresh_alive();
            })?;
        }
        self.state.actor = self.state.next_actor(None);

        tracing::info!(
            seed = self.config.seed,
            combatants = self.state.combatants().count(),
            "combat started"
        );

        if self.state.check_terminal().is_some() {
            self.set_phase(Phase::Resolution);
        } else {
            self.set_phase(Phase::Draw);
        }
        self.advance();
        Ok(())
    }

    /// Play a card from the acting combatant's hand.
    ///
    /// `selection` names the enemy for `TARGET_ENEMY` cards. On error nothing
    /// about the play has been applied and the combat stays in `ACTION`.
    ///
    /// Once the play is applied the call succeeds. A failing AI turn after
    /// it halts the advance instead; see `pending_error`.
    pub fn play_card(
        &mut self,
        actor: CombatantId,
        card: CardInstanceId,
        selection: Option<CombatantId>,
    ) -> Result<EffectOutcome, CombatError> {
        self.check_acting(actor)?;
        let outcome = self.execute_play(actor, card, selection)?;
        self.advance();
        Ok(outcome)
    }

    /// End the acting combatant's `ACTION` phase.
    pub fn pass(&mut self, actor: CombatantId) -> Result<(), CombatError> {
        self.check_acting(actor)?;
        self.turn_acted = true;
        self.apply_pass(actor);
        self.advance();
        Ok(())
    }

    /// Continue advancing after a halt or a stall.
    ///
    /// Retries the AI policy that was rejected, usually after `set_policy`.
    /// Fails with the new error if the retry is rejected again.
    pub fn resume(&mut self) -> Result<(), CombatError> {
        if self.state.is_over() {
            return Err(CombatError::CombatAlreadyEnded);
        }
        if self.state.phase == Phase::Setup {
            return Err(CombatError::WrongPhase {
                expected: Phase::Action,
                actual: Phase::Setup,
            });
        }
        self.advance();
        match &self.pending_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Force the combat into a terminal phase.
    pub fn abort(&mut self, result: CombatResult) -> Result<(), CombatError> {
        if self.state.is_over() {
            return Err(CombatError::CombatAlreadyEnded);
        }
        tracing::info!(?result, phase = ?self.state.phase, "combat aborted");
        self.finish(result);
        Ok(())
    }

    /// Affordable cards in `actor`'s hand with their reachable targets.
    ///
    /// Cards with an unknown target kind, and `TARGET_ENEMY` cards with no
    /// living enemy to select, are left out.
    pub fn legal_plays(&self, actor: CombatantId) -> Result<Vec<LegalPlay>, CombatError> {
        let combatant = self.state.combatant(actor)?;

        let plays = combatant
            .piles()
            .pile(PileKind::Hand)
            .iter()
            .filter(|instance| i64::from(instance.cost()) <= combatant.energy)
            .filter_map(|instance| {
                let kind = &instance.card.target;
                let candidates = TargetResolver::candidates(&self.state, actor, kind).ok()?;
                if kind.needs_selection() && candidates.is_empty() {
                    return None;
                }
                Some(LegalPlay {
                    card: instance.id,
                    name: instance.name().to_string(),
                    cost: instance.cost(),
                    target: kind.clone(),
                    candidates,
                })
            })
            .collect();

        Ok(plays)
    }

    // === State Machine ===

    fn check_acting(&self, actor: CombatantId) -> Result<(), CombatError> {
        if self.state.is_over() {
            return Err(CombatError::CombatAlreadyEnded);
        }
        if self.state.phase != Phase::Action {
            return Err(CombatError::WrongPhase {
                expected: Phase::Action,
                actual: self.state.phase,
            });
        }
        if self.state.actor != Some(actor) {
            return Err(CombatError::NotActingCombatant { combatant: actor });
        }
        Ok(())
    }

    /// Run automatic phases, recording an error as a halt.
    fn advance(&mut self) {
        self.pending_error = None;
        self.stalled = false;

        if let Err(err) = self.run_phases() {
            tracing::warn!(actor = ?self.state.actor, %err, "advance halted");
            self.emit(CombatEvent::Halted {
                actor: self.state.actor,
                reason: err.to_string(),
            });
            self.pending_error = Some(err);
        }
    }

    /// Run automatic phases until input is needed, nobody can act, or the
    /// combat ends.
    fn run_phases(&mut self) -> Result<(), CombatError> {
        loop {
            match self.state.phase {
                Phase::Setup | Phase::Victory | Phase::Defeat => return Ok(()),
                Phase::Draw if self.round_idle() => {
                    self.stall();
                    return Ok(());
                }
                Phase::Draw => self.run_draw()?,
                Phase::Action => {
                    let Some(actor) = self.state.actor else {
                        self.set_phase(Phase::Resolution);
                        continue;
                    };
                    let combatant = self.state.combatant(actor)?;

                    if !combatant.alive || self.state.check_terminal().is_some() {
                        tracing::debug!(%actor, alive = combatant.alive, "forcing resolution");
                        self.set_phase(Phase::Resolution);
                    } else if !combatant.has_playable() {
                        tracing::debug!(%actor, "no playable cards");
                        self.set_phase(Phase::Resolution);
                    } else if self.awaits_policy(actor.group) {
                        self.run_policy(actor)?;
                    } else {
                        return Ok(());
                    }
                }
                Phase::Resolution => match self.state.check_terminal() {
                    Some(result) => self.finish(result),
                    None => self.set_phase(Phase::TurnEnd),
                },
                Phase::TurnEnd => self.run_turn_end()?,
            }
        }
    }

    fn run_draw(&mut self) -> Result<(), CombatError> {
        let Some(actor) = self.state.actor else {
            self.set_phase(Phase::Resolution);
            return Ok(());
        };

        let turn = self.state.turn_number;
        tracing::info!(turn, %actor, "turn started");
        self.emit(CombatEvent::TurnStarted { turn, actor });

        let report = self.state.with_combatant_rng(actor, |combatant, rng| {
            combatant.energy = i64::from(combatant.energy_per_turn);
            let wanted = combatant
                .hand_size
                .saturating_sub(combatant.piles().len(PileKind::Hand));
            combatant.piles_mut().draw(wanted, rng)
        })?;

        tracing::debug!(%actor, drawn = report.drawn.len(), reshuffled = report.reshuffled, "drew cards");
        if report.reshuffled {
            self.emit(CombatEvent::Reshuffled { combatant: actor });
        }
        self.emit(CombatEvent::CardsDrawn {
            combatant: actor,
            cards: report.drawn,
        });

        self.set_phase(Phase::Action);
        Ok(())
    }

    fn run_turn_end(&mut self) -> Result<(), CombatError> {
        let Some(actor) = self.state.actor else {
            self.set_phase(Phase::Resolution);
            return Ok(());
        };

        if std::mem::take(&mut self.turn_acted) {
            self.idle_turns = 0;
        } else {
            self.idle_turns += 1;
        }

        let combatant = self.state.combatant_mut(actor)?;
        let count = combatant.piles_mut().discard_hand();
        let expired = EffectEngine::decay_status(combatant);

        self.emit(CombatEvent::HandDiscarded {
            combatant: actor,
            count,
        });
        for stat in expired {
            tracing::debug!(%actor, %stat, "status expired");
            self.emit(CombatEvent::StatusExpired {
                combatant: actor,
                stat,
            });
        }

        self.state.advance_turn();
        self.state.actor = self.state.next_actor(Some(actor));
        self.set_phase(Phase::Draw);
        Ok(())
    }

    /// Every living combatant has had an idle turn since the last play.
    fn round_idle(&self) -> bool {
        let living = self.state.combatants().filter(|c| c.alive).count();
        living > 0 && self.idle_turns >= living
    }

    fn stall(&mut self) {
        let turns = std::mem::take(&mut self.idle_turns);
        self.stalled = true;
        tracing::warn!(turns, turn = self.state.turn_number, "no combatant can act");
        self.emit(CombatEvent::Stalled { turns });
    }

    fn awaits_policy(&self, group: GroupId) -> bool {
        self.state.group(group).control == Control::Ai && self.policies.contains_key(&group)
    }

    fn run_policy(&mut self, actor: CombatantId) -> Result<(), CombatError> {
        let legal = self.legal_plays(actor)?;
        let Some(policy) = self.policies.get_mut(&actor.group) else {
            return Ok(());
        };

        match policy.choose_action(&self.state, actor, &legal) {
            Decision::Pass => {
                self.apply_pass(actor);
                Ok(())
            }
            Decision::Play(request) => {
                if !legal.iter().any(|play| play.permits(&request)) {
                    tracing::warn!(%actor, card = %request.card, "policy chose a play outside the legal set");
                    return Err(CombatError::IllegalPlay {
                        combatant: actor,
                        card: request.card,
                    });
                }
                self.execute_play(actor, request.card, request.target).map(drop)
            }
        }
    }

    fn execute_play(
        &mut self,
        actor: CombatantId,
        card: CardInstanceId,
        selection: Option<CombatantId>,
    ) -> Result<EffectOutcome, CombatError> {
        let kind = self
            .state
            .combatant(actor)?
            .piles()
            .get(card, PileKind::Hand)
            .ok_or(CombatError::InvalidPileOperation {
                card,
                pile: PileKind::Hand,
            })?
            .card
            .target
            .clone();

        let targets = TargetResolver::resolve(&self.state, actor, card, &kind, selection)?;
        let outcome =
            EffectEngine::apply_card(&mut self.state, actor, card, &targets, &self.config.routing)?;

        self.turn_acted = true;
        self.state.record_action(
            actor,
            Action::Play {
                card,
                name: outcome.card_name.clone(),
                targets: outcome.targets.clone(),
            },
        );
        tracing::info!(
            %actor,
            card = %outcome.card_name,
            targets = outcome.targets.len(),
            deaths = outcome.deaths().count(),
            "card played"
        );
        self.emit(CombatEvent::CardPlayed(outcome.clone()));

        Ok(outcome)
    }

    fn apply_pass(&mut self, actor: CombatantId) {
        self.state.record_action(actor, Action::Pass);
        tracing::debug!(%actor, "passed");
        self.emit(CombatEvent::Passed { combatant: actor });
        self.set_phase(Phase::Resolution);
    }

    fn finish(&mut self, result: CombatResult) {
        self.set_phase(result.phase());
        self.state.actor = None;
        tracing::info!(?result, turn = self.state.turn_number, "combat ended");
        self.emit(CombatEvent::CombatEnded { result });
    }

    fn set_phase(&mut self, to: Phase) {
        let from = self.state.phase;
        self.state.phase = to;
        tracing::info!(?from, ?to, "phase changed");
        self.emit(CombatEvent::PhaseChanged { from, to });
    }

    fn emit(&mut self, event: CombatEvent) {
        for observer in &mut self.observers {
            observer.notify(&event);
        }
    }
}

impl std::fmt::Debug for TurnScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnScheduler")
            .field("phase", &self.state.phase)
            .field("turn", &self.state.turn_number)
            .field("actor", &self.state.actor)
            .field("observers", &self.observers.len())
            .field("pending_error", &self.pending_error)
            .field("stalled", &self.stalled)
            .finish_non_exhaustive()
    }
}
