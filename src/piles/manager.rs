//! Pile manager for one combatant's cards.
//!
//! Piles are persistent vectors, so cloning a `PileManager` for a
//! presentation snapshot is O(1). Index 0 is the front of a pile: draws take
//! from the front of `DRAW`, and cards arriving in any pile go to the back.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::CardInstance;
use crate::core::entity::CardInstanceId;
use crate::core::error::CombatError;
use crate::core::rng::GameRng;

/// One of the four piles a combatant owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PileKind {
    Draw,
    Hand,
    Discard,
    Void,
}

impl PileKind {
    /// All piles, in display order.
    pub const ALL: [PileKind; 4] = [PileKind::Draw, PileKind::Hand, PileKind::Discard, PileKind::Void];

    /// Upper-case pile name.
    pub const fn as_str(self) -> &'static str {
        match self {
            PileKind::Draw => "DRAW",
            PileKind::Hand => "HAND",
            PileKind::Discard => "DISCARD",
            PileKind::Void => "VOID",
        }
    }
}

impl std::fmt::Display for PileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a draw.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawReport {
    /// Cards moved into `HAND`, in draw order.
    pub drawn: Vec<CardInstanceId>,
    /// Whether `DISCARD` was shuffled back into `DRAW` along the way.
    pub reshuffled: bool,
}

/// The four ordered piles of one combatant.
///
/// ## Usage
///
/// ```
/// use card_combat::cards::{Card, CardInstance, CardType, TargetKind};
/// use card_combat::core::{CardInstanceId, GameRng};
/// use card_combat::piles::{PileKind, PileManager};
///
/// let card = Card::new("Strike", CardType::Func, TargetKind::TargetEnemy);
/// let deck = (0..5).map(|i| CardInstance::new(CardInstanceId(i), card.clone()));
/// let mut piles = PileManager::from_deck(deck);
///
/// let mut rng = GameRng::new(42);
/// let report = piles.draw(3, &mut rng);
///
/// assert_eq!(report.drawn.len(), 3);
/// assert_eq!(piles.len(PileKind::Hand), 3);
/// assert_eq!(piles.len(PileKind::Draw), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PileManager {
    draw: Vector<CardInstance>,
    hand: Vector<CardInstance>,
    discard: Vector<CardInstance>,
    void: Vector<CardInstance>,
}

impl PileManager {
    /// Create empty piles.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create piles with `deck` in `DRAW`, in the given order.
    #[must_use]
    pub fn from_deck(deck: impl IntoIterator<Item = CardInstance>) -> Self {
        Self {
            draw: deck.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Cards in a pile, front first.
    #[must_use]
    pub fn pile(&self, kind: PileKind) -> &Vector<CardInstance> {
        match kind {
            PileKind::Draw => &self.draw,
            PileKind::Hand => &self.hand,
            PileKind::Discard => &self.discard,
            PileKind::Void => &self.void,
        }
    }

    fn pile_mut(&mut self, kind: PileKind) -> &mut Vector<CardInstance> {
        match kind {
            PileKind::Draw => &mut self.draw,
            PileKind::Hand => &mut self.hand,
            PileKind::Discard => &mut self.discard,
            PileKind::Void => &mut self.void,
        }
    }

    /// Number of cards in a pile.
    #[must_use]
    pub fn len(&self, kind: PileKind) -> usize {
        self.pile(kind).len()
    }

    /// Total cards across all four piles.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        PileKind::ALL.iter().map(|&k| self.len(k)).sum()
    }

    /// Which pile holds a card, if any.
    #[must_use]
    pub fn locate(&self, card: CardInstanceId) -> Option<PileKind> {
        PileKind::ALL
            .into_iter()
            .find(|&k| self.position(card, k).is_some())
    }

    /// Look up a card in a specific pile.
    #[must_use]
    pub fn get(&self, card: CardInstanceId, kind: PileKind) -> Option<&CardInstance> {
        self.position(card, kind).map(|i| &self.pile(kind)[i])
    }

    fn position(&self, card: CardInstanceId, kind: PileKind) -> Option<usize> {
        self.pile(kind).iter().position(|c| c.id == card)
    }

    /// Put a card at the back of a pile.
    ///
    /// Used for cards entering circulation mid-combat (bloat copies, grants).
    pub fn add(&mut self, card: CardInstance, kind: PileKind) {
        self.pile_mut(kind).push_back(card);
    }

    /// Remove a card from a pile.
    pub fn take(&mut self, card: CardInstanceId, from: PileKind) -> Result<CardInstance, CombatError> {
        let index = self
            .position(card, from)
            .ok_or(CombatError::InvalidPileOperation { card, pile: from })?;
        Ok(self.pile_mut(from).remove(index))
    }

    /// Relocate one card to the back of another pile.
    pub fn move_card(
        &mut self,
        card: CardInstanceId,
        from: PileKind,
        to: PileKind,
    ) -> Result<(), CombatError> {
        let instance = self.take(card, from)?;
        self.add(instance, to);
        Ok(())
    }

    /// Draw up to `n` cards from the front of `DRAW` into `HAND`.
    ///
    /// When `DRAW` runs out mid-draw, `DISCARD` is shuffled into `DRAW` and
    /// drawing continues. If both are empty the draw stops short; that is
    /// not an error.
    pub fn draw(&mut self, n: usize, rng: &mut GameRng) -> DrawReport {
        let mut report = DrawReport::default();

        for _ in 0..n {
            if self.draw.is_empty() {
                if self.discard.is_empty() {
                    break;
                }
                self.reshuffle_discard(rng);
                report.reshuffled = true;
            }

            let Some(card) = self.draw.pop_front() else {
                break;
            };
            report.drawn.push(card.id);
            self.hand.push_back(card);
        }

        report
    }

    /// Shuffle all of `DISCARD` and place it behind the current `DRAW`.
    ///
    /// Leaves `DISCARD` empty.
    pub fn reshuffle_discard(&mut self, rng: &mut GameRng) {
        let mut cards = std::mem::take(&mut self.discard);
        rng.shuffle_vector(&mut cards);
        tracing::debug!(cards = cards.len(), "reshuffled discard into draw");
        self.draw.append(cards);
    }

    /// Shuffle one pile in place.
    pub fn shuffle(&mut self, kind: PileKind, rng: &mut GameRng) {
        rng.shuffle_vector(self.pile_mut(kind));
    }

    /// Move every card left in `HAND` to `DISCARD`, preserving order.
    ///
    /// Returns the number of cards discarded.
    pub fn discard_hand(&mut self) -> usize {
        let hand = std::mem::take(&mut self.hand);
        let count = hand.len();
        self.discard.append(hand);
        count
    }
}
