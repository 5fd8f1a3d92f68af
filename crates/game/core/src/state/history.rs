//! Append-only turn log.
//!
//! The engine writes to the history but never reads it back to make
//! decisions. Records are immutable once appended: the log exposes no way to
//! edit or remove entries.

use chrono::{DateTime, Utc};

use super::{EntityId, Path, Position};

/// One logged turn event, with action-specific payload.
#[derive(Clone, Debug, PartialEq, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "action", rename_all = "snake_case"))]
pub enum TurnAction {
    /// A completed traversal; `path` is the realized path including the start tile.
    Move { path: Path },
    Attack {
        target: EntityId,
        damage: u32,
        defeated: bool,
    },
    SkipTurn,
    EndTurn,
    /// The player settled on a map exit tile.
    Exit { position: Position, target: String },
}

impl TurnAction {
    /// Stable label used in logs and serialized output.
    pub fn label(&self) -> &'static str {
        self.into()
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnRecord {
    pub character: EntityId,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub action: TurnAction,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TurnHistory {
    records: Vec<TurnRecord>,
}

impl TurnHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record stamped with the current wall-clock time.
    pub fn append(&mut self, character: EntityId, action: TurnAction) -> &TurnRecord {
        self.records.push(TurnRecord {
            character,
            action,
            timestamp: Utc::now(),
        });
        &self.records[self.records.len() - 1]
    }

    pub fn records(&self) -> &[TurnRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &TurnRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&TurnRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records with index `>= from`, for consumers tailing the log.
    pub fn since(&self, from: usize) -> &[TurnRecord] {
        self.records.get(from..).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_order_and_timestamps_do_not_go_backwards() {
        let mut history = TurnHistory::new();
        history.append(EntityId::PLAYER, TurnAction::SkipTurn);
        history.append(EntityId::PLAYER, TurnAction::EndTurn);

        let labels: Vec<_> = history.iter().map(|r| r.action.label()).collect();
        assert_eq!(labels, ["skip_turn", "end_turn"]);
        assert!(history.records()[0].timestamp <= history.records()[1].timestamp);
        assert_eq!(history.since(1).len(), 1);
        assert!(history.since(5).is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_flat_with_action_tag() {
        let mut history = TurnHistory::new();
        history.append(
            EntityId(2),
            TurnAction::Attack {
                target: EntityId::PLAYER,
                damage: 2,
                defeated: false,
            },
        );

        let value = serde_json::to_value(&history).unwrap();
        let entry = &value[0];
        assert_eq!(entry["character"], 2);
        assert_eq!(entry["action"], "attack");
        assert_eq!(entry["target"], 0);
        assert!(entry["timestamp"].is_string());
    }
}
