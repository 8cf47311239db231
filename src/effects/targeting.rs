//! Target resolution.
//!
//! Expands a card's `TargetKind` into the concrete combatants it affects.
//! Resolution is a pure read of `CombatState`: same state, same answer.
//!
//! | Kind           | Targets                                              |
//! |----------------|------------------------------------------------------|
//! | `SELF`         | the actor                                            |
//! | `FRONT_ENEMY`  | first living enemy, or nobody                        |
//! | `TARGET_ENEMY` | one living enemy chosen by the caller                |
//! | `ALL_ENEMIES`  | living enemies in group order                        |
//! | `ALL_ALLIES`   | living members of the actor's group, actor included  |
//! | `ALL`          | living combatants, actor's group first               |

use smallvec::{smallvec, SmallVec};

use crate::cards::TargetKind;
use crate::core::{CardInstanceId, CombatError, CombatState, CombatantId, GroupId};

/// Resolved targets. Most plays hit four or fewer combatants.
pub type TargetList = SmallVec<[CombatantId; 4]>;

/// Stateless target resolver.
pub struct TargetResolver;

impl TargetResolver {
    /// Every combatant the kind could reach.
    ///
    /// For `TARGET_ENEMY` these are the candidates a selection must come
    /// from. Unknown kinds fail with `InvalidTargetKind`.
    pub fn candidates(
        state: &CombatState,
        actor: CombatantId,
        kind: &TargetKind,
    ) -> Result<TargetList, CombatError> {
        state.combatant(actor)?;

        let own = actor.group;
        let enemy = own.opponent();

        let targets = match kind {
            TargetKind::SelfOnly => smallvec![actor],
            TargetKind::FrontEnemy => living(state, enemy).take(1).collect(),
            TargetKind::TargetEnemy | TargetKind::AllEnemies => living(state, enemy).collect(),
            TargetKind::AllAllies => living(state, own).collect(),
            TargetKind::All => living(state, own).chain(living(state, enemy)).collect(),
            TargetKind::Invalid(tag) => return Err(CombatError::InvalidTargetKind(tag.clone())),
        };

        Ok(targets)
    }

    /// Resolve the final target list for playing `card`.
    ///
    /// `TARGET_ENEMY` requires `selection` to name a living enemy. Other
    /// kinds ignore it.
    pub fn resolve(
        state: &CombatState,
        actor: CombatantId,
        card: CardInstanceId,
        kind: &TargetKind,
        selection: Option<CombatantId>,
    ) -> Result<TargetList, CombatError> {
        let candidates = Self::candidates(state, actor, kind)?;

        if !kind.needs_selection() {
            if let Some(target) = selection {
                tracing::debug!(%card, %target, kind = %kind, "ignoring selection for untargeted card");
            }
            return Ok(candidates);
        }

        let target = selection.ok_or(CombatError::MissingTargetSelection { card })?;
        if !candidates.contains(&target) {
            return Err(CombatError::InvalidTargetSelection { target });
        }

        tracing::debug!(%card, %actor, %target, "resolved selected target");
        Ok(smallvec![target])
    }
}

fn living(state: &CombatState, group: GroupId) -> impl Iterator<Item = CombatantId> + '_ {
    state.group(group).living().map(|c| c.id)
}
