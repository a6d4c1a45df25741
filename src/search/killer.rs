//! Lazy memoization of positions, legal moves, and moves-in-hand, and
//! the killer-move ordering built on top of them.

use std::cmp::Ordering as Cmp;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use crate::board::{LegalMoves, Move, Position, Rank};

use super::tt::TranspositionTable;

impl TranspositionTable {
    /// Position for a rank; lazy memoization.
    #[must_use]
    pub fn position(&self, rank: Rank) -> Position {
        if let Some(position) = self.caches.positions.read().get(&rank) {
            return *position;
        }
        let position = Position::unrank(rank);
        self.caches.positions.write().insert(rank, position);
        position
    }

    /// Legal moves for a rank; lazy memoization, shared across
    /// deepener iterations.
    #[must_use]
    pub fn legal_moves(&self, rank: Rank) -> Arc<LegalMoves> {
        self.counters.legal_reads.fetch_add(1, Ordering::Relaxed);
        if let Some(legal) = self.caches.legal.read().get(&rank) {
            return Arc::clone(legal);
        }
        let legal = Arc::new(self.position(rank).legal_moves());
        self.caches
            .legal
            .write()
            .insert(rank, Arc::clone(&legal));
        legal
    }

    /// Moves-in-hand for a rank; lazy memoization, shared across
    /// deepener iterations.
    #[must_use]
    pub fn moves_in_hand(&self, rank: Rank) -> i8 {
        self.counters.mih_reads.fetch_add(1, Ordering::Relaxed);
        if let Some(&mih) = self.caches.moves_in_hand.read().get(&rank) {
            return mih;
        }
        let mih = self.position(rank).moves_in_hand();
        self.caches.moves_in_hand.write().insert(rank, mih);
        mih
    }

    /// Legal moves of the rank, best first: previous-iteration score
    /// knowledge, then capture size, then the opponent's freedom, then
    /// pit order as the deterministic tiebreak.
    #[must_use]
    pub(crate) fn killer_moves(&self, rank: Rank) -> Vec<Move> {
        let legal = self.legal_moves(rank);
        let mut moves = legal.moves().to_vec();

        // Insertion sort: the comparison mixes criteria pair by pair
        // (interval knowledge exists only for some successors), which
        // is not a total order.
        for i in 1..moves.len() {
            let mut j = i;
            while j > 0 && self.killer_order(&legal, moves[j], moves[j - 1]) == Cmp::Less {
                moves.swap(j, j - 1);
                j -= 1;
            }
        }
        moves
    }

    /// `Less` means `a` is searched before `b`.
    fn killer_order(&self, legal: &LegalMoves, a: Move, b: Move) -> Cmp {
        let (rank_a, rank_b) = (legal.next(a), legal.next(b));

        // Scores known from the previous iteration dominate. The
        // successor intervals are the opponent's view, so comparisons
        // stay in that frame throughout.
        if let Some(old) = &self.old {
            if let (Some(ia), Some(ib)) = (old.interval(rank_a), old.interval(rank_b)) {
                if ia.disjoint(&ib) {
                    return if ia.gt(&ib) { Cmp::Less } else { Cmp::Greater };
                }
            }
        }

        // Bigger captures first.
        match legal.captured(b).cmp(&legal.captured(a)) {
            Cmp::Equal => {}
            unequal => return unequal,
        }

        // Less freedom for the opponent first.
        match self
            .moves_in_hand(rank_a)
            .cmp(&self.moves_in_hand(rank_b))
        {
            Cmp::Equal => {}
            unequal => return unequal,
        }

        // Back-to-front pit order keeps single-threaded runs
        // deterministic.
        b.pit().cmp(&a.pit())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::board::{Game, Move, Position};
    use crate::db::Database;
    use crate::search::TranspositionTable;

    fn table_for(position: Position) -> Arc<TranspositionTable> {
        Arc::new(TranspositionTable::new(
            Game::new(position),
            Arc::new(Database::closed()),
        ))
    }

    #[test]
    fn captures_order_first() {
        // F captures two; the other moves capture nothing.
        let position: Position = "1.1.0.0.0.1-1.1.0.0.0.0".parse().expect("board");
        let tt = table_for(position);
        let killers = tt.killer_moves(position.rank());
        assert_eq!(killers.first(), Some(&Move::new(5)));
    }

    #[test]
    fn killer_order_is_a_permutation_of_the_legal_moves() {
        let position = Position::initial();
        let tt = table_for(position);
        let killers = tt.killer_moves(position.rank());
        let mut pits: Vec<usize> = killers.iter().map(|m| m.pit()).collect();
        pits.sort_unstable();
        assert_eq!(pits, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn pit_order_breaks_ties_back_to_front() {
        // Both moves capture nothing and leave the opponent the same
        // untouched side, so captures and ν tie and the F-to-A
        // tiebreak decides.
        let position: Position = "1.1.0.0.0.0-4.4.4.4.4.4".parse().expect("board");
        let tt = table_for(position);
        let killers = tt.killer_moves(position.rank());
        assert_eq!(killers, vec![Move::new(1), Move::new(0)]);
    }

    #[test]
    fn previous_iteration_scores_dominate() {
        let position: Position = "1.1.0.0.0.0-4.4.0.0.0.0".parse().expect("board");
        let tt = table_for(position);
        let legal = tt.legal_moves(position.rank());
        let (a, b) = (Move::new(0), Move::new(1));

        // Disjoint successor intervals from the previous iteration
        // decide the order outright: the greater one sorts first.
        let next = tt.restart();
        tt.set_score(legal.next(a), -48, 48, 5);
        tt.set_score(legal.next(b), -48, 48, -5);

        let killers = next.killer_moves(position.rank());
        assert_eq!(killers.first(), Some(&a));
    }

    #[test]
    fn memoized_values_match_fresh_ones() {
        let position = Position::initial();
        let tt = table_for(position);
        let rank = position.rank();
        assert_eq!(tt.position(rank).board(), position.board());
        assert_eq!(tt.moves_in_hand(rank), position.moves_in_hand());
        assert_eq!(
            tt.legal_moves(rank).moves(),
            position.legal_moves().moves()
        );
        // Second read hits the cache.
        assert_eq!(tt.moves_in_hand(rank), position.moves_in_hand());
    }
}
