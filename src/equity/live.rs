//! Live odds across streets and folds.
//!
//! Every computation is stateless: it takes the hands, the board and the
//! current [`FoldSet`] and estimates each active seat's equity from scratch.
//! Folded hole cards are dead and never dealt again.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::cards::{parse_cards, Board, Card, HoleCards, Street};
use crate::error::{CardLocation, EquityError, Result};
use crate::eval::{HandCategory, HandEvaluator, HandRanker};

use super::config::OddsConfig;
use super::fold::FoldSet;
use super::trials::{Seat, TrialEngine};

/// Minimum seats at a table.
pub const MIN_PLAYERS: usize = 2;
/// Maximum seats at a table.
pub const MAX_PLAYERS: usize = 6;

/// Validated hole cards for every seat plus the current board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    hands: Vec<HoleCards>,
    board: Board,
}

impl Deal {
    /// Create a deal, checking seat count and that no card repeats.
    pub fn new(hands: Vec<HoleCards>, board: Board) -> Result<Self> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&hands.len()) {
            return Err(EquityError::InvalidPlayerCount(hands.len()));
        }

        let mut seen = 0u64;
        for (seat, hand) in hands.iter().enumerate() {
            for card in hand.cards() {
                if seen & card.mask() != 0 {
                    return Err(EquityError::DuplicateCard {
                        card,
                        location: CardLocation::Seat(seat),
                    });
                }
                seen |= card.mask();
            }
        }
        if let Some(&card) = board.cards().iter().find(|c| seen & c.mask() != 0) {
            return Err(EquityError::DuplicateCard {
                card,
                location: CardLocation::Board,
            });
        }

        Ok(Self { hands, board })
    }

    /// Parse a deal from one card string per seat and a board string.
    ///
    /// Errors raised while reading a hand name the seat.
    pub fn parse<S: AsRef<str>>(hands: &[S], board: &str) -> Result<Self> {
        let hands = hands
            .iter()
            .enumerate()
            .map(|(seat, s)| {
                s.as_ref()
                    .parse::<HoleCards>()
                    .map_err(|e| e.in_seat(seat))
            })
            .collect::<Result<Vec<_>>>()?;
        let board = parse_cards(board)
            .and_then(Board::from_cards)
            .map_err(EquityError::in_board)?;
        Self::new(hands, board)
    }

    /// The same hands with a new board.
    ///
    /// The new board must extend the current one; streets never go backwards.
    pub fn with_board(&self, board: Board) -> Result<Self> {
        if !self.board.is_prefix_of(&board) {
            return Err(EquityError::BoardRegression {
                current: self.board.to_string(),
                new: board.to_string(),
            });
        }
        Self::new(self.hands.clone(), board)
    }

    /// Hole cards by seat.
    pub fn hands(&self) -> &[HoleCards] {
        &self.hands
    }

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Number of seats.
    pub fn num_seats(&self) -> usize {
        self.hands.len()
    }

    /// Street implied by the board.
    pub fn street(&self) -> Street {
        self.board.street()
    }
}

/// Equity estimate for every seat at the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityResult {
    /// Street the estimate was made on.
    pub street: Street,
    /// Expected pot share per seat; folded seats are 0.
    pub equities: Vec<f64>,
    /// Probability each seat wins alone.
    pub win_probs: Vec<f64>,
    /// Probability that the pot is split.
    pub split_prob: f64,
    /// Number of trials run (0 when a single seat remains).
    pub trials: usize,
    /// Made hand of each active seat, only on the river.
    pub categories: Vec<Option<HandCategory>>,
}

impl EquityResult {
    /// Equity of one seat.
    pub fn equity(&self, seat: usize) -> f64 {
        self.equities.get(seat).copied().unwrap_or(0.0)
    }

    /// Seats with non-zero equity, best first.
    pub fn ranking(&self) -> Vec<(usize, f64)> {
        let mut seats: Vec<(usize, f64)> = self
            .equities
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, eq)| eq > 0.0)
            .collect();
        seats.sort_by(|a, b| b.1.total_cmp(&a.1));
        seats
    }

    /// Display name of a seat's made hand, if known.
    pub fn hand_name(&self, seat: usize) -> Option<&'static str> {
        self.categories.get(seat).copied().flatten().map(|c| c.name())
    }
}

/// Computes live equities for a table.
pub struct LiveOddsCalculator<R: HandRanker = HandEvaluator> {
    ranker: R,
    config: OddsConfig,
    pool: Option<rayon::ThreadPool>,
}

impl LiveOddsCalculator<HandEvaluator> {
    /// Calculator with the reference evaluator and default config.
    pub fn new() -> Self {
        Self {
            ranker: HandEvaluator::new(),
            config: OddsConfig::default(),
            pool: None,
        }
    }
}

impl Default for LiveOddsCalculator<HandEvaluator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: HandRanker> LiveOddsCalculator<R> {
    /// Create a calculator with a custom oracle and config.
    pub fn with_config(ranker: R, config: OddsConfig) -> Result<Self> {
        config.validate()?;
        let pool = match config.num_threads {
            Some(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| EquityError::InvalidConfig(e.to_string()))?,
            ),
            None => None,
        };
        Ok(Self {
            ranker,
            config,
            pool,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &OddsConfig {
        &self.config
    }

    /// Estimate every seat's equity.
    pub fn compute(&self, deal: &Deal, folds: &FoldSet) -> Result<EquityResult> {
        self.compute_with_dead(deal, folds, &[])
    }

    /// Estimate every seat's equity with extra cards removed from the deck.
    pub fn compute_with_dead(
        &self,
        deal: &Deal,
        folds: &FoldSet,
        dead: &[Card],
    ) -> Result<EquityResult> {
        if folds.num_seats() != deal.num_seats() {
            return Err(EquityError::SeatCountMismatch {
                expected: deal.num_seats(),
                got: folds.num_seats(),
            });
        }

        let mut known = deal.hands().iter().fold(deal.board().mask(), |m, h| m | h.mask());
        for &card in dead {
            if known & card.mask() != 0 {
                return Err(EquityError::DuplicateCard {
                    card,
                    location: CardLocation::Dead,
                });
            }
            known |= card.mask();
        }

        let seats = deal.num_seats();
        let street = deal.street();
        let board = deal.board().cards();
        let categories = self.categories(deal, folds)?;
        let active: Vec<usize> = folds.active().collect();

        if let [winner] = active[..] {
            log::debug!("seat {} is the only active player", winner);
            let mut equities = vec![0.0; seats];
            equities[winner] = 1.0;
            return Ok(EquityResult {
                street,
                win_probs: equities.clone(),
                equities,
                split_prob: 0.0,
                trials: 0,
                categories,
            });
        }

        let mut all_dead: Vec<Card> = folds
            .folded()
            .flat_map(|seat| deal.hands()[seat].cards())
            .collect();
        all_dead.extend_from_slice(dead);

        let active_seats: Vec<Seat> = active
            .iter()
            .map(|&s| Seat::Known(deal.hands()[s]))
            .collect();
        let trials = self.config.schedule.trials_for(street);
        let seed = self.config.seed.unwrap_or_else(|| rand::thread_rng().gen());

        log::debug!(
            "{}: {} active seats, {} dead cards, {} trials, seed {}",
            street,
            active.len(),
            all_dead.len(),
            trials,
            seed
        );

        let engine = TrialEngine::new(&self.ranker).with_batch_size(self.config.batch_size);
        let run = || engine.run(&active_seats, board, &all_dead, trials, seed);
        let tally = match &self.pool {
            Some(pool) => pool.install(run)?,
            None => run()?,
        };

        let mut equities = vec![0.0; seats];
        let mut win_probs = vec![0.0; seats];
        for ((&seat, eq), win) in active.iter().zip(tally.equities()).zip(tally.win_probs()) {
            equities[seat] = eq;
            win_probs[seat] = win;
        }

        Ok(EquityResult {
            street,
            equities,
            win_probs,
            split_prob: tally.split_prob(),
            trials: tally.trials as usize,
            categories,
        })
    }

    /// Made hand of each active seat once the board is complete.
    fn categories(&self, deal: &Deal, folds: &FoldSet) -> Result<Vec<Option<HandCategory>>> {
        let board = deal.board().cards();
        deal.hands()
            .iter()
            .enumerate()
            .map(|(seat, hand)| -> Result<Option<HandCategory>> {
                if deal.street() != Street::River || folds.is_folded(seat) {
                    return Ok(None);
                }
                let rank = self.ranker.rank_with_board(hand.cards(), board)?;
                Ok(Some(rank.category()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equity::TrialSchedule;

    fn calculator(seed: u64) -> LiveOddsCalculator {
        let config = OddsConfig::new()
            .with_schedule(TrialSchedule::uniform(4_000))
            .with_batch_size(500)
            .with_seed(seed);
        LiveOddsCalculator::with_config(HandEvaluator::new(), config).unwrap()
    }

    fn assert_sums_to_one(result: &EquityResult) {
        let total: f64 = result.equities.iter().sum();
        assert!((total - 1.0).abs() < 1e-9, "equities sum to {}", total);
    }

    #[test]
    fn test_deal_validation() {
        assert!(matches!(
            Deal::parse(&["As Ah"], ""),
            Err(EquityError::InvalidPlayerCount(1))
        ));
        let seven = ["2c 2d", "3c 3d", "4c 4d", "5c 5d", "6c 6d", "7c 7d", "8c 8d"];
        assert!(matches!(
            Deal::parse(&seven, ""),
            Err(EquityError::InvalidPlayerCount(7))
        ));

        let err = Deal::parse(&["As Ah", "Ks As"], "").unwrap_err();
        assert!(matches!(
            err,
            EquityError::DuplicateCard { location: CardLocation::Seat(1), .. }
        ));

        let err = Deal::parse(&["As Ah", "Ks Kh"], "Kh 7d 2c").unwrap_err();
        assert!(matches!(
            err,
            EquityError::DuplicateCard { location: CardLocation::Board, .. }
        ));

        let err = Deal::parse(&["As Ah", "Ks X1"], "").unwrap_err();
        assert_eq!(err.seat(), Some(1));
        assert!(err.is_parse());
    }

    #[test]
    fn test_board_lengths() {
        let hands = ["As Ah", "Ks Kh"];
        assert!(Deal::parse(&hands, "Qd 7c 2h 9s").is_ok());
        for board in ["Qd", "Qd 7c", "Qd 7c 2h 9s 3d 4d"] {
            assert!(matches!(
                Deal::parse(&hands, board),
                Err(EquityError::InBoard(_))
            ));
        }
    }

    #[test]
    fn test_streets_never_go_backwards() {
        let flop = Deal::parse(&["As Ah", "Ks Kh"], "Qd 7c 2h").unwrap();
        let turn = flop.with_board("Qd 7c 2h 9s".parse().unwrap()).unwrap();
        assert_eq!(turn.street(), Street::Turn);

        assert!(matches!(
            turn.with_board("Qd 7c 2h".parse().unwrap()),
            Err(EquityError::BoardRegression { .. })
        ));
        assert!(matches!(
            flop.with_board("Qd 7c 3h 9s".parse().unwrap()),
            Err(EquityError::BoardRegression { .. })
        ));
    }

    #[test]
    fn test_preflop_equities() {
        let deal = Deal::parse(&["As Ah", "Kd Kc", "7h 6h"], "").unwrap();
        let result = calculator(1).compute(&deal, &FoldSet::new(3)).unwrap();

        assert_eq!(result.street, Street::Preflop);
        assert_eq!(result.trials, 4_000);
        assert_sums_to_one(&result);
        assert_eq!(result.ranking()[0].0, 0);
        assert!(result.categories.iter().all(Option::is_none));
    }

    #[test]
    fn test_folded_seat_has_zero_equity() {
        let deal = Deal::parse(&["As Ah", "Kd Kc", "7h 6h"], "Qd 7c 2h").unwrap();
        let folds = FoldSet::new(3).fold(1).unwrap();
        let result = calculator(2).compute(&deal, &folds).unwrap();

        assert_eq!(result.equity(1), 0.0);
        assert_eq!(result.win_probs[1], 0.0);
        assert_sums_to_one(&result);
    }

    #[test]
    fn test_fold_matches_fresh_two_seat_computation() {
        let four = Deal::parse(&["As Ah", "Kd Kc", "7h 6h", "Jc Td"], "Qd 7c 2h").unwrap();
        let folds = FoldSet::new(4).fold(1).unwrap().fold(3).unwrap();
        let folded = calculator(9).compute(&four, &folds).unwrap();
        assert_sums_to_one(&folded);

        let two = Deal::parse(&["As Ah", "7h 6h"], "Qd 7c 2h").unwrap();
        let dead = parse_cards("Kd Kc Jc Td").unwrap();
        let fresh = calculator(9)
            .compute_with_dead(&two, &FoldSet::new(2), &dead)
            .unwrap();

        assert_eq!(folded.equity(0), fresh.equity(0));
        assert_eq!(folded.equity(2), fresh.equity(1));
        assert_eq!(folded.split_prob, fresh.split_prob);

        // Without the dead cards the estimate only agrees statistically.
        let open = calculator(9).compute(&two, &FoldSet::new(2)).unwrap();
        assert!((open.equity(0) - folded.equity(0)).abs() < 0.05);
    }

    #[test]
    fn test_single_survivor_takes_all() {
        let deal = Deal::parse(&["As Ah", "Kd Kc", "7h 6h"], "Qd 7c 2h").unwrap();
        let folds = FoldSet::from_folded(3, &[0, 2]).unwrap();
        let result = calculator(3).compute(&deal, &folds).unwrap();

        assert_eq!(result.equities, vec![0.0, 1.0, 0.0]);
        assert_eq!(result.trials, 0);
        assert_eq!(result.split_prob, 0.0);
    }

    #[test]
    fn test_river_is_exact() {
        let deal = Deal::parse(&["As Qs", "Kh Kc"], "Ah Kd 7c 4s 2h").unwrap();
        let result = calculator(4).compute(&deal, &FoldSet::new(2)).unwrap();

        assert_eq!(result.street, Street::River);
        assert_eq!(result.trials, 1);
        assert_eq!(result.equities, vec![0.0, 1.0]);
        assert_eq!(result.hand_name(0), Some("One Pair"));
        assert_eq!(result.hand_name(1), Some("Three of a Kind"));
    }

    #[test]
    fn test_fold_count_mismatch() {
        let deal = Deal::parse(&["As Ah", "Kd Kc"], "").unwrap();
        assert!(matches!(
            calculator(0).compute(&deal, &FoldSet::new(3)),
            Err(EquityError::SeatCountMismatch {
                expected: 2,
                got: 3
            })
        ));
    }

    #[test]
    fn test_thread_count_does_not_change_result() {
        let deal = Deal::parse(&["Ac Kc", "9d 9s"], "").unwrap();
        let config = OddsConfig::fast().with_seed(5).with_batch_size(250);
        let run = |config: OddsConfig| {
            LiveOddsCalculator::with_config(HandEvaluator::new(), config)
                .unwrap()
                .compute(&deal, &FoldSet::new(2))
                .unwrap()
        };
        let single = run(config.clone().with_threads(1));
        let multi = run(config.with_threads(3));
        assert_eq!(single, multi);
    }
}
