//! The authoritative per-room game state machine.
//!
//! A `RoomTable` owns the deck, the dealer hand, the seated players and
//! the turn order (seat insertion order). Every operation validates phase,
//! seat identity and turn ownership before mutating; a rejected operation
//! returns a `DomainError` and leaves the table untouched.
//!
//! The table is deliberately IO-free. Serialization lives in
//! `snapshot`, broadcasting and scheduling in the service layer.

use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

use crate::config::TableConfig;
use crate::domain::cards::{Card, Rank};
use crate::domain::deck::Deck;
use crate::domain::hand;
use crate::domain::seat::{Difficulty, Seat, SeatId, SeatState};
use crate::domain::settlement::{self, HandClass, Outcome};
use crate::errors::domain::{DomainError, NotFoundKind};

pub type RoomId = Uuid;

#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Waiting,
    Betting,
    Playing,
    DealerTurn,
    Settled,
}

/// Per-seat result of a settled round, consumed by the record store.
#[derive(Debug, Clone)]
pub struct SeatRoundResult {
    pub seat_id: SeatId,
    pub display_name: String,
    pub wager: u32,
    /// Credit minus wager: positive on a win, negative on a loss.
    pub net: i64,
    pub outcome: Outcome,
    pub score: u32,
    pub state: SeatState,
    pub automation: Option<Difficulty>,
}

/// Everything the record store needs about a settled round.
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    pub dealer_score: u32,
    pub dealer_cards: Vec<Card>,
    pub results: Vec<SeatRoundResult>,
    pub message: String,
}

#[derive(Debug)]
pub struct RoomTable {
    id: RoomId,
    name: String,
    seats: Vec<Seat>,
    dealer_hand: Vec<Card>,
    deck: Deck,
    rng: StdRng,
    phase: Phase,
    active_seat: usize,
    message: String,
    last_round: Option<RoundOutcome>,
    config: TableConfig,
}

impl RoomTable {
    pub fn new(id: RoomId, name: impl Into<String>, config: TableConfig) -> Self {
        Self::with_rng(id, name, config, StdRng::from_os_rng())
    }

    /// Deterministic table for tests.
    pub fn with_seed(id: RoomId, name: impl Into<String>, config: TableConfig, seed: u64) -> Self {
        Self::with_rng(id, name, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(id: RoomId, name: impl Into<String>, config: TableConfig, mut rng: StdRng) -> Self {
        let deck = Deck::new(config.reshuffle_threshold, &mut rng);
        Self {
            id,
            name: name.into(),
            seats: Vec::new(),
            dealer_hand: Vec::new(),
            deck,
            rng,
            phase: Phase::Waiting,
            active_seat: 0,
            message: "Waiting for players to join...".to_string(),
            last_round: None,
            config,
        }
    }

    // ---------- Read access ----------

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn capacity(&self) -> usize {
        self.config.room_capacity
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn dealer_hand(&self) -> &[Card] {
        &self.dealer_hand
    }

    pub fn dealer_upcard(&self) -> Option<Card> {
        self.dealer_hand.first().copied()
    }

    pub fn seat(&self, id: SeatId) -> Option<&Seat> {
        self.seats.iter().find(|s| s.id == id)
    }

    fn seat_mut(&mut self, id: SeatId) -> Option<&mut Seat> {
        self.seats.iter_mut().find(|s| s.id == id)
    }

    fn require_seat(&self, id: SeatId) -> Result<&Seat, DomainError> {
        self.seat(id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Seat, format!("seat {id} is not in this room")))
    }

    /// The seat currently holding the turn, if the room is mid-round.
    pub fn active_seat_id(&self) -> Option<SeatId> {
        if self.phase != Phase::Playing {
            return None;
        }
        self.seats
            .get(self.active_seat)
            .filter(|s| s.state == SeatState::Playing)
            .map(|s| s.id)
    }

    // ---------- Seat membership ----------

    /// Flag a seat's transport as reconnected, returning its state.
    pub fn seat_reconnected(&mut self, id: SeatId) -> SeatState {
        match self.seat_mut(id) {
            Some(seat) => {
                seat.connected = true;
                seat.state
            }
            None => SeatState::Waiting,
        }
    }

    /// Flag a seat's transport as disconnected. The seat keeps its turn
    /// slot; only the connectivity flag changes.
    pub fn seat_disconnected(&mut self, id: SeatId) -> Option<SeatState> {
        let seat = self.seat_mut(id)?;
        seat.connected = false;
        Some(seat.state)
    }

    pub fn add_seat(&mut self, seat: Seat) -> Result<&Seat, DomainError> {
        if self.seats.len() >= self.config.room_capacity {
            return Err(DomainError::room_full(format!(
                "room {} is at capacity ({})",
                self.name, self.config.room_capacity
            )));
        }
        if self.seats.iter().any(|s| s.id == seat.id) {
            return Err(DomainError::validation(format!(
                "seat {} already exists in room {}",
                seat.id, self.name
            )));
        }
        self.seats.push(seat);
        Ok(self.seats.last().expect("seat was just pushed"))
    }

    /// Remove a seat without corrupting the turn order.
    ///
    /// If the departing seat held the turn, the turn passes to the next
    /// seat still playing (or to the dealer when none remain). If it sat
    /// later in the order than the active seat, the active index shifts
    /// down so no seat is skipped or repeated.
    pub fn remove_seat(&mut self, id: SeatId) -> Result<Seat, DomainError> {
        let idx = self
            .seats
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Seat, format!("seat {id} is not in this room")))?;
        let removed = self.seats.remove(idx);

        if !self.seats.is_empty() {
            match self.phase {
                Phase::Playing => {
                    if self.active_seat > idx {
                        self.active_seat -= 1;
                    } else if self.active_seat >= self.seats.len() {
                        self.active_seat = 0;
                    }
                    self.resync_turn();
                }
                Phase::Betting => {
                    self.maybe_deal();
                }
                _ => {}
            }
        }

        // A round cannot continue without any participating seats.
        let any_in_round = self.seats.iter().any(|s| s.state.in_round());
        if !any_in_round && matches!(self.phase, Phase::Betting | Phase::Playing | Phase::DealerTurn)
        {
            self.reset_to_waiting("Not enough players, waiting for new players to get ready");
        }

        Ok(removed)
    }

    fn reset_to_waiting(&mut self, message: &str) {
        self.phase = Phase::Waiting;
        self.active_seat = 0;
        self.last_round = None;
        self.dealer_hand.clear();
        for seat in &mut self.seats {
            seat.reset_for_new_round();
        }
        self.message = message.to_string();
    }

    // ---------- Ready / betting ----------

    /// Toggle waiting↔ready, or pull a funded spectator back in. Starts
    /// the betting phase once every funded seat is ready.
    pub fn set_ready(&mut self, id: SeatId) -> Result<(), DomainError> {
        if self.phase != Phase::Waiting {
            return Err(DomainError::phase(format!(
                "cannot change readiness in the {:?} phase",
                self.phase
            )));
        }
        let seat = self
            .seat_mut(id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Seat, format!("seat {id} is not in this room")))?;
        match seat.state {
            SeatState::Waiting => seat.state = SeatState::Ready,
            SeatState::Ready => seat.state = SeatState::Waiting,
            SeatState::Spectating if seat.funds > 0 => seat.state = SeatState::Ready,
            other => {
                return Err(DomainError::validation(format!(
                    "seat {} cannot ready up from the {other:?} state",
                    seat.display_name
                )))
            }
        }
        self.maybe_start_betting();
        Ok(())
    }

    fn funded_seats(&self) -> impl Iterator<Item = &Seat> {
        self.seats
            .iter()
            .filter(|s| s.state != SeatState::Spectating && (s.funds > 0 || s.wager > 0))
    }

    fn maybe_start_betting(&mut self) {
        let should_start = {
            let mut funded = self.funded_seats().peekable();
            funded.peek().is_some() && funded.all(|s| s.state == SeatState::Ready)
        };
        if should_start {
            self.start_betting();
        }
    }

    fn start_betting(&mut self) {
        self.phase = Phase::Betting;
        self.active_seat = 0;
        self.dealer_hand.clear();
        for seat in &mut self.seats {
            seat.hand.clear();
            seat.wager = 0;
            seat.state = if seat.funds > 0 {
                SeatState::Betting
            } else {
                SeatState::Spectating
            };
        }
        self.message = "All players please place your bets".to_string();
    }

    /// Place a wager. When the last outstanding bettor clears, the initial
    /// deal happens and the round enters the playing phase.
    pub fn place_bet(&mut self, id: SeatId, amount: u32) -> Result<(), DomainError> {
        if self.phase != Phase::Betting {
            return Err(DomainError::phase(format!(
                "bets are not accepted in the {:?} phase",
                self.phase
            )));
        }
        let seat = self
            .seat_mut(id)
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Seat, format!("seat {id} is not in this room")))?;
        if seat.state != SeatState::Betting {
            return Err(DomainError::validation(format!(
                "seat {} is not due a wager ({:?})",
                seat.display_name, seat.state
            )));
        }
        if amount == 0 {
            return Err(DomainError::validation("wager must be positive"));
        }
        if amount > seat.funds {
            return Err(DomainError::insufficient_funds(format!(
                "wager {amount} exceeds available funds {}",
                seat.funds
            )));
        }

        seat.funds -= amount;
        seat.wager = amount;
        seat.state = SeatState::Ready;
        let name = seat.display_name.clone();
        self.message = format!("{name} wagered {amount}");

        self.maybe_deal();
        Ok(())
    }

    fn maybe_deal(&mut self) {
        if self.phase != Phase::Betting {
            return;
        }
        let outstanding = self.seats.iter().any(|s| s.state == SeatState::Betting);
        let any_wagered = self.seats.iter().any(|s| s.wager > 0);
        if !outstanding && any_wagered {
            self.deal_initial();
        }
    }

    fn deal_initial(&mut self) {
        self.phase = Phase::Playing;
        for i in 0..self.seats.len() {
            if self.seats[i].state != SeatState::Ready || self.seats[i].wager == 0 {
                continue;
            }
            let first = self.deck.draw(&mut self.rng);
            let second = self.deck.draw(&mut self.rng);
            let seat = &mut self.seats[i];
            seat.hand.clear();
            seat.hand.push(first);
            seat.hand.push(second);
            seat.state = if hand::is_natural(&seat.hand) {
                SeatState::Blackjack
            } else {
                SeatState::Playing
            };
        }
        self.dealer_hand.clear();
        let up = self.deck.draw(&mut self.rng);
        let hole = self.deck.draw(&mut self.rng);
        self.dealer_hand.push(up);
        self.dealer_hand.push(hole);

        self.active_seat = 0;
        self.resync_turn();
    }

    // ---------- Turn actions ----------

    fn require_turn(&self, id: SeatId) -> Result<(), DomainError> {
        if self.phase != Phase::Playing {
            return Err(DomainError::phase(format!(
                "actions are not accepted in the {:?} phase",
                self.phase
            )));
        }
        let seat = self.require_seat(id)?;
        if seat.state != SeatState::Playing {
            return Err(DomainError::validation(format!(
                "seat {} is not in the playing state ({:?})",
                seat.display_name, seat.state
            )));
        }
        match self.active_seat_id() {
            Some(active) if active == id => Ok(()),
            _ => Err(DomainError::out_of_turn(format!(
                "it is not {}'s turn",
                seat.display_name
            ))),
        }
    }

    /// Draw one card for the active seat and resolve the result.
    pub fn hit(&mut self, id: SeatId) -> Result<(), DomainError> {
        self.require_turn(id)?;
        let card = self.deck.draw(&mut self.rng);
        let seat = self.seat_mut(id).expect("turn check found the seat");
        seat.hand.push(card);
        let score = seat.score();
        let name = seat.display_name.clone();

        if score > 21 {
            seat.state = SeatState::Busted;
            self.message = format!("{name} busted!");
            self.advance_turn();
        } else if hand::is_five_dragon(&seat.hand) {
            seat.state = SeatState::FiveDragon;
            self.message = format!("{name} got Five Dragon!");
            self.advance_turn();
        } else if score == 21 {
            seat.state = SeatState::Stand;
            self.message = format!("{name} got 21!");
            self.advance_turn();
        } else {
            self.message = format!("{name} hits");
        }
        Ok(())
    }

    pub fn stand(&mut self, id: SeatId) -> Result<(), DomainError> {
        self.require_turn(id)?;
        let seat = self.seat_mut(id).expect("turn check found the seat");
        seat.state = SeatState::Stand;
        let name = seat.display_name.clone();
        self.message = format!("{name} stands");
        self.advance_turn();
        Ok(())
    }

    /// Double the wager, draw exactly one card, then stand or bust.
    pub fn double_down(&mut self, id: SeatId) -> Result<(), DomainError> {
        self.require_turn(id)?;
        let seat = self.require_seat(id)?;
        if seat.hand.len() != 2 {
            return Err(DomainError::validation(
                "double down is only allowed on the first two cards",
            ));
        }
        if seat.funds < seat.wager {
            return Err(DomainError::insufficient_funds(format!(
                "doubling requires {} more funds, only {} available",
                seat.wager, seat.funds
            )));
        }

        let card = self.deck.draw(&mut self.rng);
        let seat = self.seat_mut(id).expect("turn check found the seat");
        seat.funds -= seat.wager;
        seat.wager *= 2;
        seat.hand.push(card);
        let name = seat.display_name.clone();

        if seat.score() > 21 {
            seat.state = SeatState::Busted;
            self.message = format!("{name} doubled down and busted!");
        } else {
            seat.state = SeatState::Stand;
            self.message = format!("{name} doubled down and stands");
        }
        self.advance_turn();
        Ok(())
    }

    fn advance_turn(&mut self) {
        if self.seats.is_empty() {
            self.dealer_turn();
            return;
        }
        self.active_seat = (self.active_seat + 1) % self.seats.len();
        self.resync_turn();
    }

    /// Point the active index at the next seat still playing, wrapping
    /// from the current position; hand the round to the dealer when no
    /// seat remains.
    pub fn resync_turn(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        let len = self.seats.len();
        for offset in 0..len {
            let idx = (self.active_seat + offset) % len;
            if self.seats[idx].state == SeatState::Playing {
                self.active_seat = idx;
                self.message = format!("{}'s turn to act", self.seats[idx].display_name);
                return;
            }
        }
        self.dealer_turn();
    }

    // ---------- Dealer and settlement ----------

    /// Conservative value of a peeked card: an ace counts 1.
    fn peek_value(card: Card) -> u32 {
        if card.rank == Rank::Ace {
            1
        } else {
            card.rank.face_value()
        }
    }

    fn dealer_turn(&mut self) {
        self.phase = Phase::DealerTurn;
        self.message = "Dealer's turn".to_string();

        let mut score = hand::score(&self.dealer_hand);
        while score < 17 {
            // Holding four cards, the dealer declines a fifth that would
            // bust rather than throw away a Five Dragon chance.
            if self.dealer_hand.len() == 4 && score <= 21 {
                if let Some(next) = self.deck.peek() {
                    if score + Self::peek_value(next) > 21 {
                        break;
                    }
                }
            }
            let card = self.deck.draw(&mut self.rng);
            self.dealer_hand.push(card);
            score = hand::score(&self.dealer_hand);
        }

        self.settle();
    }

    fn settle(&mut self) {
        self.phase = Phase::Settled;

        let dealer_score = hand::score(&self.dealer_hand);
        let dealer_class = settlement::classify(&self.dealer_hand);

        let mut results = Vec::new();
        for seat in &mut self.seats {
            if !seat.state.in_round() {
                continue;
            }
            let class = settlement::classify(&seat.hand);
            let outcome = settlement::resolve(class, seat.score(), dealer_class, dealer_score);
            let credit = settlement::credit(outcome, class, seat.wager);
            seat.funds += credit;
            results.push(SeatRoundResult {
                seat_id: seat.id,
                display_name: seat.display_name.clone(),
                wager: seat.wager,
                net: credit as i64 - seat.wager as i64,
                outcome,
                score: seat.score(),
                state: seat.state,
                automation: seat.automation,
            });
        }

        self.message = match dealer_class {
            HandClass::Busted => format!("Dealer busted at {dealer_score}"),
            HandClass::FiveDragon => format!("Dealer made Five Dragon at {dealer_score}"),
            HandClass::Natural => "Dealer has blackjack".to_string(),
            HandClass::Standing => format!("Dealer stands at {dealer_score}"),
        };

        self.last_round = Some(RoundOutcome {
            dealer_score,
            dealer_cards: self.dealer_hand.clone(),
            results,
            message: self.message.clone(),
        });
    }

    /// The outcome of the most recently settled round, cleared when the
    /// next round is prepared.
    pub fn take_last_round(&mut self) -> Option<RoundOutcome> {
        self.last_round.take()
    }

    /// Cross-check the table's structural invariants after a mutation.
    ///
    /// Violations are fatal to the round, not the process: the caller is
    /// expected to void the round as a push and keep the room alive.
    pub fn verify_invariants(&self) -> Result<(), DomainError> {
        for seat in &self.seats {
            if seat.state.in_round() && seat.wager == 0 {
                return Err(DomainError::invariant(format!(
                    "seat {} is in the round without a wager",
                    seat.display_name
                )));
            }
            if seat.funds > u32::MAX / 2 {
                return Err(DomainError::invariant(format!(
                    "seat {} funds overflowed",
                    seat.display_name
                )));
            }
        }
        if self.phase == Phase::Playing
            && !self.seats.is_empty()
            && self.active_seat >= self.seats.len()
        {
            return Err(DomainError::invariant("active seat index out of bounds"));
        }
        Ok(())
    }

    /// Fatal-invariant recovery: refund every wager as a push and settle
    /// the round so the room can continue.
    pub fn force_settle_push(&mut self, reason: &str) {
        for seat in &mut self.seats {
            if seat.state.in_round() {
                seat.funds += seat.wager;
            }
        }
        self.phase = Phase::Settled;
        self.last_round = None;
        self.message = format!("Round voided: {reason}");
    }

    /// Reset a settled table for the next round.
    pub fn prepare_next_round(&mut self) -> Result<(), DomainError> {
        if self.phase != Phase::Settled {
            return Err(DomainError::phase(format!(
                "the round is still in progress ({:?})",
                self.phase
            )));
        }
        for seat in &mut self.seats {
            seat.reset_for_new_round();
        }
        self.dealer_hand.clear();
        self.deck.rebuild(&mut self.rng);
        self.phase = Phase::Waiting;
        self.active_seat = 0;
        self.last_round = None;
        self.message = "Ready to start a new round, please get ready".to_string();
        Ok(())
    }

    // ---------- Test access ----------

    /// Direct seat access for test setup.
    #[cfg(test)]
    pub(crate) fn seat_mut_for_test(&mut self, id: SeatId) -> &mut Seat {
        self.seat_mut(id).expect("test seat exists")
    }

    #[cfg(test)]
    pub(crate) fn dealer_hand_mut_for_test(&mut self) -> &mut Vec<Card> {
        &mut self.dealer_hand
    }

    #[cfg(test)]
    pub(crate) fn set_phase_for_test(&mut self, phase: Phase) {
        self.phase = phase;
    }

    #[cfg(test)]
    pub(crate) fn reset_active_for_test(&mut self) {
        self.active_seat = 0;
        self.resync_turn();
    }

    #[cfg(test)]
    pub(crate) fn deck_len_for_test(&self) -> usize {
        self.deck.remaining()
    }
}
