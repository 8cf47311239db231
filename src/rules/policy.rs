//! Actor policies: who decides what an AI-controlled combatant does.
//!
//! The scheduler hands a policy the current state and the list of legal
//! plays, and gets back a `Decision`. Policies never mutate state; the
//! scheduler validates and applies whatever they choose.
//!
//! ## Key Types
//!
//! - `LegalPlay`: an affordable card in hand and where it could land
//! - `PlayRequest`: a card plus an optional chosen target
//! - `ActorPolicy`: the decision capability
//! - `FirstPlayable`, `RandomPolicy`: stock policies

use serde::{Deserialize, Serialize};

use crate::cards::TargetKind;
use crate::core::{CardInstanceId, CombatState, CombatantId, GameRng};
use crate::effects::TargetList;

/// A request to play one card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayRequest {
    pub card: CardInstanceId,
    /// Required for `TARGET_ENEMY` cards, ignored otherwise.
    pub target: Option<CombatantId>,
}

impl PlayRequest {
    /// A request with no target selection.
    #[must_use]
    pub const fn new(card: CardInstanceId) -> Self {
        Self { card, target: None }
    }

    /// A request aimed at one enemy.
    #[must_use]
    pub const fn targeting(card: CardInstanceId, target: CombatantId) -> Self {
        Self {
            card,
            target: Some(target),
        }
    }
}

/// What an actor does next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Play(PlayRequest),
    Pass,
}

/// A card the actor can afford right now, with its reachable targets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalPlay {
    pub card: CardInstanceId,
    pub name: String,
    pub cost: u32,
    pub target: TargetKind,
    /// For `TARGET_ENEMY`, the enemies a selection may name. Otherwise the
    /// targets the play would hit.
    pub candidates: TargetList,
}

impl LegalPlay {
    /// Every concrete request this play allows.
    pub fn requests(&self) -> Vec<PlayRequest> {
        if self.target.needs_selection() {
            self.candidates
                .iter()
                .map(|&target| PlayRequest::targeting(self.card, target))
                .collect()
        } else {
            vec![PlayRequest::new(self.card)]
        }
    }

    /// Check whether `request` is one of this play's requests.
    #[must_use]
    pub fn permits(&self, request: &PlayRequest) -> bool {
        if request.card != self.card {
            return false;
        }
        if !self.target.needs_selection() {
            return true;
        }
        request.target.map_or(false, |t| self.candidates.contains(&t))
    }
}

/// Decision capability for AI-controlled combatants.
///
/// `legal` is never stale: it is computed from `state` immediately before
/// the call. A request outside `legal` is rejected with `IllegalPlay` and
/// halts the scheduler until `resume`.
pub trait ActorPolicy {
    fn choose_action(
        &mut self,
        state: &CombatState,
        actor: CombatantId,
        legal: &[LegalPlay],
    ) -> Decision;
}

/// Plays the first legal card against its first candidate, then passes.
///
/// Fully deterministic; the default for AI groups.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstPlayable;

impl ActorPolicy for FirstPlayable {
    fn choose_action(
        &mut self,
        _state: &CombatState,
        _actor: CombatantId,
        legal: &[LegalPlay],
    ) -> Decision {
        legal
            .iter()
            .flat_map(LegalPlay::requests)
            .next()
            .map_or(Decision::Pass, Decision::Play)
    }
}

/// Picks uniformly among every legal request and passing.
///
/// Uses its own RNG stream, so it never perturbs the encounter's shuffles.
#[derive(Clone, Debug)]
pub struct RandomPolicy {
    rng: GameRng,
}

impl RandomPolicy {
    /// Create a policy seeded from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed).for_context("ai"),
        }
    }
}

impl ActorPolicy for RandomPolicy {
    fn choose_action(
        &mut self,
        _state: &CombatState,
        _actor: CombatantId,
        legal: &[LegalPlay],
    ) -> Decision {
        let requests: Vec<_> = legal.iter().flat_map(LegalPlay::requests).collect();
        let pick = self.rng.gen_range_usize(0..requests.len() + 1);
        requests.get(pick).copied().map_or(Decision::Pass, Decision::Play)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CombatConfig, GroupId, GroupSpec};
    use smallvec::smallvec;

    const B0: CombatantId = CombatantId::new(GroupId::B, 0);
    const B1: CombatantId = CombatantId::new(GroupId::B, 1);

    fn empty_state() -> CombatState {
        CombatState::new(&CombatConfig::new(0), GroupSpec::player(vec![]), GroupSpec::ai(vec![]))
            .unwrap()
    }

    fn snipe() -> LegalPlay {
        LegalPlay {
            card: CardInstanceId(4),
            name: "Snipe".to_string(),
            cost: 1,
            target: TargetKind::TargetEnemy,
            candidates: smallvec![B0, B1],
        }
    }

    fn guard() -> LegalPlay {
        LegalPlay {
            card: CardInstanceId(7),
            name: "Guard".to_string(),
            cost: 1,
            target: TargetKind::SelfOnly,
            candidates: smallvec![CombatantId::new(GroupId::A, 0)],
        }
    }

    #[test]
    fn test_requests() {
        assert_eq!(
            snipe().requests(),
            vec![
                PlayRequest::targeting(CardInstanceId(4), B0),
                PlayRequest::targeting(CardInstanceId(4), B1)
            ]
        );
        assert_eq!(guard().requests(), vec![PlayRequest::new(CardInstanceId(7))]);
    }

    #[test]
    fn test_permits() {
        let play = snipe();
        assert!(play.permits(&PlayRequest::targeting(CardInstanceId(4), B1)));
        assert!(!play.permits(&PlayRequest::new(CardInstanceId(4))));
        assert!(!play.permits(&PlayRequest::targeting(CardInstanceId(5), B1)));
        assert!(guard().permits(&PlayRequest::targeting(CardInstanceId(7), B0)));
    }

    #[test]
    fn test_first_playable() {
        let state = empty_state();
        let mut policy = FirstPlayable;
        let actor = CombatantId::new(GroupId::A, 0);

        assert_eq!(policy.choose_action(&state, actor, &[]), Decision::Pass);
        assert_eq!(
            policy.choose_action(&state, actor, &[snipe(), guard()]),
            Decision::Play(PlayRequest::targeting(CardInstanceId(4), B0))
        );
    }

    #[test]
    fn test_random_policy_choices_are_legal() {
        let state = empty_state();
        let legal = [snipe(), guard()];
        let actor = CombatantId::new(GroupId::A, 0);
        let mut policy = RandomPolicy::new(3);

        let mut passes = 0;
        for _ in 0..200 {
            match policy.choose_action(&state, actor, &legal) {
                Decision::Pass => passes += 1,
                Decision::Play(request) => assert!(legal.iter().any(|p| p.permits(&request))),
            }
        }
        assert!(passes > 0);
        assert!(passes < 200);
    }

    #[test]
    fn test_random_policy_deterministic() {
        let state = empty_state();
        let legal = [snipe(), guard()];
        let actor = CombatantId::new(GroupId::A, 0);

        let mut a = RandomPolicy::new(11);
        let mut b = RandomPolicy::new(11);
        for _ in 0..20 {
            assert_eq!(
                a.choose_action(&state, actor, &legal),
                b.choose_action(&state, actor, &legal)
            );
        }
    }
}
