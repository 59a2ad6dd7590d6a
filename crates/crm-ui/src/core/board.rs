//! Kanban board with optimistic stage transitions.
//!
//! # Design
//! - Columns are fixed at construction, in stage order.
//! - A cross-column move mutates local state first and hands back a [`PendingMove`].
//! - Reverting looks the card up by id, so other moves that landed meanwhile do not
//!   shift the wrong card; the original index is clamped to the column length.
//! - Same-column drops are pure reorders and never produce a pending move.

use std::fmt::Debug;
use thiserror::Error;

/// A record that lives in exactly one board column.
pub trait StageCard: Clone {
    /// Column key.
    type Stage: Copy + Eq + Debug;

    /// Stable identifier of the card.
    fn card_id(&self) -> i64;
    /// Column the card currently belongs to.
    fn stage(&self) -> Self::Stage;
    /// Move the card to another column.
    fn set_stage(&mut self, stage: Self::Stage);
}

/// Board manipulation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// No card with the given id is on the board.
    #[error("card {0} is not on the board")]
    UnknownCard(i64),
    /// The drop target is not one of the board's columns.
    #[error("Invalid target phase")]
    UnknownColumn,
}

/// One column of cards sharing a stage.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardColumn<T: StageCard> {
    /// Stage shared by every card in the column.
    pub stage: T::Stage,
    /// Cards in display order.
    pub cards: Vec<T>,
}

/// Bookkeeping needed to undo an optimistic move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingMove<S> {
    /// Moved card.
    pub card_id: i64,
    /// Column the card came from.
    pub from_stage: S,
    /// Position the card occupied in its source column.
    pub from_index: usize,
    /// Column the card was dropped on.
    pub to_stage: S,
}

/// Result of handling a drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropOutcome<S> {
    /// Card reordered inside its column; nothing to persist.
    Reordered,
    /// Card moved to another column; persist then settle.
    Moved(PendingMove<S>),
}

/// Final state of an optimistic move once the server answered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveSettlement {
    /// Server accepted the move; local state kept.
    Confirmed,
    /// Server rejected the move; card restored.
    Reverted,
    /// Server rejected the move but the card had already left the board.
    Missing,
}

/// Kanban board grouped by stage.
#[derive(Clone, Debug, PartialEq)]
pub struct Board<T: StageCard> {
    columns: Vec<BoardColumn<T>>,
}

impl<T: StageCard> Board<T> {
    /// Empty board with one column per stage.
    #[must_use]
    pub fn new(stages: &[T::Stage]) -> Self {
        Self {
            columns: stages
                .iter()
                .map(|stage| BoardColumn {
                    stage: *stage,
                    cards: Vec::new(),
                })
                .collect(),
        }
    }

    /// Group items into columns, preserving input order within each column.
    /// Items whose stage has no column are left off the board.
    #[must_use]
    pub fn from_items(stages: &[T::Stage], items: impl IntoIterator<Item = T>) -> Self {
        let mut board = Self::new(stages);
        for item in items {
            if let Some(column) = board.column_mut(item.stage()) {
                column.cards.push(item);
            }
        }
        board
    }

    /// Columns in stage order.
    #[must_use]
    pub fn columns(&self) -> &[BoardColumn<T>] {
        &self.columns
    }

    /// Column for a stage.
    #[must_use]
    pub fn column(&self, stage: T::Stage) -> Option<&BoardColumn<T>> {
        self.columns.iter().find(|column| column.stage == stage)
    }

    fn column_mut(&mut self, stage: T::Stage) -> Option<&mut BoardColumn<T>> {
        self.columns.iter_mut().find(|column| column.stage == stage)
    }

    /// Locate a card as `(column index, card index)`.
    #[must_use]
    pub fn position(&self, card_id: i64) -> Option<(usize, usize)> {
        self.columns.iter().enumerate().find_map(|(col, column)| {
            column
                .cards
                .iter()
                .position(|card| card.card_id() == card_id)
                .map(|idx| (col, idx))
        })
    }

    /// Card by id.
    #[must_use]
    pub fn card(&self, card_id: i64) -> Option<&T> {
        self.position(card_id)
            .and_then(|(col, idx)| self.columns.get(col).and_then(|c| c.cards.get(idx)))
    }

    /// Total number of cards on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.iter().map(|column| column.cards.len()).sum()
    }

    /// Whether the board has no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply a drop of `card_id` on `target` at `to_index`.
    ///
    /// Cross-column drops update the card's stage immediately and return the
    /// [`PendingMove`] to settle once the server answers.
    ///
    /// # Errors
    ///
    /// [`BoardError::UnknownCard`] when the card is not on the board and
    /// [`BoardError::UnknownColumn`] when `target` has no column. The board is
    /// untouched in both cases.
    pub fn drop_card(
        &mut self,
        card_id: i64,
        target: T::Stage,
        to_index: usize,
    ) -> Result<DropOutcome<T::Stage>, BoardError> {
        let (from_col, from_index) = self
            .position(card_id)
            .ok_or(BoardError::UnknownCard(card_id))?;
        let to_col = self
            .columns
            .iter()
            .position(|column| column.stage == target)
            .ok_or(BoardError::UnknownColumn)?;

        let source = &mut self.columns[from_col];
        let from_stage = source.stage;
        let mut card = source.cards.remove(from_index);

        if from_col == to_col {
            let index = to_index.min(source.cards.len());
            source.cards.insert(index, card);
            return Ok(DropOutcome::Reordered);
        }

        card.set_stage(target);
        let destination = &mut self.columns[to_col];
        let index = to_index.min(destination.cards.len());
        destination.cards.insert(index, card);

        Ok(DropOutcome::Moved(PendingMove {
            card_id,
            from_stage,
            from_index,
            to_stage: target,
        }))
    }

    /// Drop `card_id` on `target` just before the `anchor` card, or at the end of
    /// the column when there is no anchor (or it is not in that column).
    ///
    /// # Errors
    ///
    /// Same as [`Board::drop_card`].
    pub fn drop_before(
        &mut self,
        card_id: i64,
        target: T::Stage,
        anchor: Option<i64>,
    ) -> Result<DropOutcome<T::Stage>, BoardError> {
        let index = anchor
            .filter(|anchor| *anchor != card_id)
            .and_then(|anchor| {
                self.column(target).and_then(|column| {
                    column
                        .cards
                        .iter()
                        .filter(|card| card.card_id() != card_id)
                        .position(|card| card.card_id() == anchor)
                })
            })
            .unwrap_or(usize::MAX);
        self.drop_card(card_id, target, index)
    }

    /// Put the card back where `pending` found it and restore its stage.
    pub fn revert(&mut self, pending: &PendingMove<T::Stage>) -> MoveSettlement {
        let Some((col, idx)) = self.position(pending.card_id) else {
            return MoveSettlement::Missing;
        };
        let mut card = self.columns[col].cards.remove(idx);
        card.set_stage(pending.from_stage);
        match self.column_mut(pending.from_stage) {
            Some(column) => {
                let index = pending.from_index.min(column.cards.len());
                column.cards.insert(index, card);
                MoveSettlement::Reverted
            }
            None => {
                // Source column vanished; leave the card where it was.
                card.set_stage(pending.to_stage);
                self.columns[col].cards.insert(idx, card);
                MoveSettlement::Missing
            }
        }
    }

    /// Settle a pending move with the persist result.
    pub fn settle<E>(
        &mut self,
        pending: &PendingMove<T::Stage>,
        result: &Result<(), E>,
    ) -> MoveSettlement {
        match result {
            Ok(()) => MoveSettlement::Confirmed,
            Err(_) => self.revert(pending),
        }
    }

    /// Keep only cards matching the predicate, preserving column order.
    #[must_use]
    pub fn filtered(&self, mut keep: impl FnMut(&T) -> bool) -> Self {
        Self {
            columns: self
                .columns
                .iter()
                .map(|column| BoardColumn {
                    stage: column.stage,
                    cards: column.cards.iter().filter(|c| keep(c)).cloned().collect(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Phase {
        Todo,
        Doing,
        Done,
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Card {
        id: i64,
        phase: Phase,
    }

    impl StageCard for Card {
        type Stage = Phase;

        fn card_id(&self) -> i64 {
            self.id
        }

        fn stage(&self) -> Phase {
            self.phase
        }

        fn set_stage(&mut self, stage: Phase) {
            self.phase = stage;
        }
    }

    const PHASES: [Phase; 3] = [Phase::Todo, Phase::Doing, Phase::Done];

    fn board() -> Board<Card> {
        Board::from_items(
            &PHASES,
            vec![
                Card { id: 1, phase: Phase::Todo },
                Card { id: 2, phase: Phase::Todo },
                Card { id: 3, phase: Phase::Todo },
                Card { id: 4, phase: Phase::Doing },
            ],
        )
    }

    fn ids(board: &Board<Card>, phase: Phase) -> Vec<i64> {
        board
            .column(phase)
            .map(|c| c.cards.iter().map(|card| card.id).collect())
            .unwrap_or_default()
    }

    #[test]
    fn cross_column_drop_moves_card_and_sets_stage() {
        let mut board = board();
        let outcome = board.drop_card(2, Phase::Doing, 0).expect("drop");
        assert_eq!(
            outcome,
            DropOutcome::Moved(PendingMove {
                card_id: 2,
                from_stage: Phase::Todo,
                from_index: 1,
                to_stage: Phase::Doing,
            })
        );
        assert_eq!(ids(&board, Phase::Todo), vec![1, 3]);
        assert_eq!(ids(&board, Phase::Doing), vec![2, 4]);
        assert_eq!(board.card(2).map(|c| c.phase), Some(Phase::Doing));
    }

    #[test]
    fn failed_persist_restores_membership_order_and_stage() {
        let mut board = board();
        let before = board.clone();
        let DropOutcome::Moved(pending) = board.drop_card(2, Phase::Done, 5).expect("drop") else {
            panic!("expected a cross-column move");
        };
        let settled = board.settle(&pending, &Err::<(), _>("boom"));
        assert_eq!(settled, MoveSettlement::Reverted);
        assert_eq!(board, before);
    }

    #[test]
    fn successful_persist_keeps_optimistic_state() {
        let mut board = board();
        let DropOutcome::Moved(pending) = board.drop_card(1, Phase::Done, 0).expect("drop") else {
            panic!("expected a cross-column move");
        };
        let after = board.clone();
        assert_eq!(
            board.settle::<String>(&pending, &Ok(())),
            MoveSettlement::Confirmed
        );
        assert_eq!(board, after);
    }

    #[test]
    fn same_column_drop_is_reorder_only() {
        let mut board = board();
        let outcome = board.drop_card(1, Phase::Todo, 2).expect("drop");
        assert_eq!(outcome, DropOutcome::Reordered);
        assert_eq!(ids(&board, Phase::Todo), vec![2, 3, 1]);
    }

    #[test]
    fn anchored_drops_land_before_the_anchor() {
        let mut board = board();
        board.drop_before(3, Phase::Todo, Some(1)).expect("drop");
        assert_eq!(ids(&board, Phase::Todo), vec![3, 1, 2]);
        board.drop_before(3, Phase::Todo, None).expect("drop");
        assert_eq!(ids(&board, Phase::Todo), vec![1, 2, 3]);
        board.drop_before(1, Phase::Doing, Some(4)).expect("drop");
        assert_eq!(ids(&board, Phase::Doing), vec![1, 4]);
        board.drop_before(2, Phase::Doing, Some(77)).expect("drop");
        assert_eq!(ids(&board, Phase::Doing), vec![1, 4, 2]);
    }

    #[test]
    fn unknown_targets_leave_board_untouched() {
        let mut board = Board::from_items(&PHASES[..2], board().columns[0].cards.clone());
        let before = board.clone();
        assert_eq!(
            board.drop_card(1, Phase::Done, 0),
            Err(BoardError::UnknownColumn)
        );
        assert_eq!(
            board.drop_card(99, Phase::Doing, 0),
            Err(BoardError::UnknownCard(99))
        );
        assert_eq!(board, before);
    }

    #[test]
    fn interleaved_reverts_find_cards_by_id() {
        let mut board = board();
        let DropOutcome::Moved(first) = board.drop_card(1, Phase::Doing, 0).expect("drop") else {
            panic!("expected a cross-column move");
        };
        let DropOutcome::Moved(second) = board.drop_card(3, Phase::Doing, 0).expect("drop") else {
            panic!("expected a cross-column move");
        };
        assert_eq!(board.revert(&first), MoveSettlement::Reverted);
        assert_eq!(board.revert(&second), MoveSettlement::Reverted);
        assert_eq!(board.card(1).map(|c| c.phase), Some(Phase::Todo));
        assert_eq!(board.card(3).map(|c| c.phase), Some(Phase::Todo));
        assert_eq!(ids(&board, Phase::Doing), vec![4]);
        assert_eq!(board.len(), 4);
    }

    #[test]
    fn revert_of_removed_card_reports_missing() {
        let mut board = board();
        let pending = PendingMove {
            card_id: 42,
            from_stage: Phase::Todo,
            from_index: 0,
            to_stage: Phase::Doing,
        };
        assert_eq!(board.revert(&pending), MoveSettlement::Missing);
    }

    #[test]
    fn filtered_keeps_columns() {
        let board = board();
        let view = board.filtered(|card| card.id % 2 == 0);
        assert_eq!(view.columns().len(), 3);
        assert_eq!(ids(&view, Phase::Todo), vec![2]);
        assert_eq!(ids(&view, Phase::Doing), vec![4]);
    }
}
