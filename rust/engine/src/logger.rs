use std::fs::{create_dir_all, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::events::ActionOutcome;
use crate::game::{Game, Phase};
use crate::player::{PlayerAction, SeatIndex};

/// One applied action and the street it happened on.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub seat_index: SeatIndex,
    pub street: Phase,
    pub action: PlayerAction,
}

/// Chips awarded to one seat from one pot.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    pub seat_index: SeatIndex,
    pub amount: u32,
}

/// Summary of a finished hand, written as one JSON line.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    /// `YYYYMMDD-NNNNNN`
    pub hand_id: String,
    pub hand_number: u64,
    /// Shuffle seed of the table, when known
    pub seed: Option<u64>,
    pub dealer_seat: Option<SeatIndex>,
    pub actions: Vec<ActionRecord>,
    pub board: Vec<Card>,
    pub payouts: Vec<Payout>,
    /// True when the pot was decided by comparing hands
    pub showdown: bool,
    /// RFC 3339, filled in by [`HandLogger::write`] when missing
    #[serde(default)]
    pub ts: Option<String>,
}

impl HandRecord {
    /// Builds the record of the hand `game` just finished with `outcome`.
    pub fn from_game(game: &Game, hand_id: String, seed: Option<u64>, outcome: &ActionOutcome) -> Self {
        Self {
            hand_id,
            hand_number: game.hand_number(),
            seed,
            dealer_seat: game.dealer_seat(),
            actions: game.history().to_vec(),
            board: game.community_cards().to_vec(),
            payouts: outcome
                .winners()
                .into_iter()
                .map(|w| Payout {
                    seat_index: w.seat_index,
                    amount: w.amount,
                })
                .collect(),
            showdown: matches!(outcome, ActionOutcome::Showdown { .. }),
            ts: None,
        }
    }
}

pub fn format_hand_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

/// Appends [`HandRecord`]s to a JSONL file.
pub struct HandLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl HandLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    /// Logger that only hands out ids, for tests and dry runs.
    pub fn detached(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_hand_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &HandRecord) -> std::io::Result<()> {
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}
