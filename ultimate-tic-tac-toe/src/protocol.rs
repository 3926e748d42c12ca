//! Line based turn protocol.
//!
//! Every turn the engine reads
//! ```text
//! <opponent row> <opponent col>     (-1 -1 before the first move of the game)
//! <n>
//! <row> <col>                       (n times, every legal move)
//! ```
//! and answers with one line `<row> <col>`.

use std::{
    collections::VecDeque,
    io::{BufRead, Write},
};

use anyhow::{Context, bail};

use crate::{consts, types::Move};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnInput {
    /// `None` if we make the first move of the game
    pub opponent: Option<Move>,
    pub legal_moves: Vec<Move>,
}

/// Splits the input into whitespace separated integers, independent of line breaks.
#[derive(Debug)]
pub struct TurnReader<B> {
    input: B,
    pending: VecDeque<String>,
    line: String,
}

impl<B: BufRead> TurnReader<B> {
    pub fn new(input: B) -> Self {
        Self {
            input,
            pending: VecDeque::new(),
            line: String::new(),
        }
    }

    /// `None` once the input is exhausted
    fn next_token(&mut self) -> anyhow::Result<Option<String>> {
        while self.pending.is_empty() {
            self.line.clear();
            let n_read = self
                .input
                .read_line(&mut self.line)
                .context("reading turn input")?;
            if n_read == 0 {
                return Ok(None);
            }
            self.pending
                .extend(self.line.split_whitespace().map(str::to_owned));
        }
        Ok(self.pending.pop_front())
    }

    fn next_int(&mut self, what: &str) -> anyhow::Result<i32> {
        let token = self
            .next_token()?
            .with_context(|| format!("input ended before {what}"))?;
        token
            .parse()
            .with_context(|| format!("{what} is not an integer: {token:?}"))
    }

    fn next_move(&mut self, what: &str) -> anyhow::Result<Move> {
        let row = self.next_int(what)?;
        let col = self.next_int(what)?;
        to_move(row, col).with_context(|| format!("invalid {what}"))
    }

    /// Reads one full turn.
    ///
    /// `Ok(None)` if the input ends cleanly before the turn starts.
    pub fn read_turn(&mut self) -> anyhow::Result<Option<TurnInput>> {
        let Some(first) = self.next_token()? else {
            return Ok(None);
        };
        let opp_row: i32 = first
            .parse()
            .with_context(|| format!("opponent row is not an integer: {first:?}"))?;
        let opp_col = self.next_int("opponent column")?;
        let opponent = if (opp_row, opp_col) == (-1, -1) {
            None
        } else {
            Some(to_move(opp_row, opp_col).context("invalid opponent move")?)
        };

        let n_legal = self.next_int("legal move count")?;
        if !(0..=consts::N_CELLS_NESTED as i32).contains(&n_legal) {
            bail!("legal move count {n_legal} is out of range");
        }
        let legal_moves = (0..n_legal)
            .map(|_| self.next_move("legal move"))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Some(TurnInput {
            opponent,
            legal_moves,
        }))
    }
}

fn to_move(row: i32, col: i32) -> anyhow::Result<Move> {
    let side = consts::GRID_SIDE as i32;
    if !(0..side).contains(&row) || !(0..side).contains(&col) {
        bail!("({row}, {col}) is outside of the 9x9 grid");
    }
    Ok(Move::new(row as u8, col as u8))
}

/// Writes the answer line and flushes so the referee sees it immediately.
pub fn write_move<W: Write>(output: &mut W, move_: Move) -> anyhow::Result<()> {
    writeln!(output, "{move_}").context("writing move")?;
    output.flush().context("flushing move")
}
