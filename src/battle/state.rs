use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;
use std::fmt;

/// One argument of a log tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LogValue {
    Text(String),
    Number(i64),
}

impl fmt::Display for LogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogValue::Text(text) => f.write_str(text),
            LogValue::Number(number) => write!(f, "{}", number),
        }
    }
}

impl From<&str> for LogValue {
    fn from(value: &str) -> Self {
        LogValue::Text(value.to_string())
    }
}

impl From<&String> for LogValue {
    fn from(value: &String) -> Self {
        LogValue::Text(value.clone())
    }
}

impl From<i64> for LogValue {
    fn from(value: i64) -> Self {
        LogValue::Number(value)
    }
}

/// Everything a battle reports to its presentation layer.
///
/// Each event serializes as the flat tuple `[kind, args...]`; the kind names
/// and argument order are a stable protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleEvent {
    // Arena
    SendsToBattle {
        trainer: String,
        pokemon: String,
    },
    RemovesFromBattle {
        trainer: String,
        pokemon: String,
    },
    PokemonFainted {
        trainer: String,
        pokemon: String,
    },
    Recalls {
        trainer: String,
        outgoing: String,
        incoming: String,
    },
    RecallsForFainted {
        trainer: String,
        incoming: String,
    },

    // Moves
    UsesMove {
        trainer: String,
        pokemon: String,
        move_name: String,
    },
    MoveDoesNotHit {
        trainer: String,
        pokemon: String,
        move_name: String,
    },
    ReceivedDamage {
        trainer: String,
        pokemon: String,
        move_name: String,
        amount: u16,
    },
    ReceivedNoDamage {
        trainer: String,
        pokemon: String,
        move_name: String,
    },
    TargetFainted {
        trainer: String,
        pokemon: String,
    },
    ChangesStat {
        trainer: String,
        pokemon: String,
        stat: String,
        change_by: i8,
    },
    ChangesNoStat {
        trainer: String,
        pokemon: String,
        stat: String,
        change_by: i8,
    },
    TargetConditionAdded {
        trainer: String,
        pokemon: String,
        condition: String,
    },

    // Status conditions
    DamageByPoison {
        trainer: String,
        pokemon: String,
        delta: i32,
    },
    DamageByBurn {
        trainer: String,
        pokemon: String,
        delta: i32,
    },
    DamageByBadlyPoisoned {
        trainer: String,
        pokemon: String,
        delta: i32,
    },
    Paralysed {
        trainer: String,
        pokemon: String,
    },
    Frozen {
        trainer: String,
        pokemon: String,
    },
    Sleeping {
        trainer: String,
        pokemon: String,
    },
    Defrosts {
        trainer: String,
        pokemon: String,
    },
    WakeUp {
        trainer: String,
        pokemon: String,
    },

    // Items and growth
    UsesItemOnPokemon {
        trainer: String,
        pokemon: String,
        item: String,
    },
    GrowthEvent {
        trainer: String,
        pokemon: String,
        message: String,
    },
}

impl BattleEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            BattleEvent::SendsToBattle { .. } => "sends_to_battle",
            BattleEvent::RemovesFromBattle { .. } => "removes_from_battle",
            BattleEvent::PokemonFainted { .. } => "pokemon_fainted",
            BattleEvent::Recalls { .. } => "recalls",
            BattleEvent::RecallsForFainted { .. } => "recalls_for_fainted",
            BattleEvent::UsesMove { .. } => "uses_move",
            BattleEvent::MoveDoesNotHit { .. } => "move_does_not_hit",
            BattleEvent::ReceivedDamage { .. } => "received_damage",
            BattleEvent::ReceivedNoDamage { .. } => "received_no_damage",
            BattleEvent::TargetFainted { .. } => "target_fainted",
            BattleEvent::ChangesStat { .. } => "changes_stat",
            BattleEvent::ChangesNoStat { .. } => "changes_no_stat",
            BattleEvent::TargetConditionAdded { .. } => "target_condition_added",
            BattleEvent::DamageByPoison { .. } => "damage_by_poison",
            BattleEvent::DamageByBurn { .. } => "damage_by_burn",
            BattleEvent::DamageByBadlyPoisoned { .. } => "damage_by_badly_poisoned",
            BattleEvent::Paralysed { .. } => "paralysed",
            BattleEvent::Frozen { .. } => "frozen",
            BattleEvent::Sleeping { .. } => "sleeping",
            BattleEvent::Defrosts { .. } => "defrosts",
            BattleEvent::WakeUp { .. } => "wake_up",
            BattleEvent::UsesItemOnPokemon { .. } => "uses_item_on_pokemon",
            BattleEvent::GrowthEvent { .. } => "growth_event",
        }
    }

    /// Arguments in protocol order.
    pub fn args(&self) -> Vec<LogValue> {
        match self {
            BattleEvent::SendsToBattle { trainer, pokemon }
            | BattleEvent::RemovesFromBattle { trainer, pokemon }
            | BattleEvent::PokemonFainted { trainer, pokemon }
            | BattleEvent::TargetFainted { trainer, pokemon }
            | BattleEvent::Paralysed { trainer, pokemon }
            | BattleEvent::Frozen { trainer, pokemon }
            | BattleEvent::Sleeping { trainer, pokemon }
            | BattleEvent::Defrosts { trainer, pokemon }
            | BattleEvent::WakeUp { trainer, pokemon } => vec![trainer.into(), pokemon.into()],
            BattleEvent::Recalls {
                trainer,
                outgoing,
                incoming,
            } => vec![trainer.into(), outgoing.into(), incoming.into()],
            BattleEvent::RecallsForFainted { trainer, incoming } => {
                vec![trainer.into(), incoming.into()]
            }
            BattleEvent::UsesMove {
                trainer,
                pokemon,
                move_name,
            }
            | BattleEvent::MoveDoesNotHit {
                trainer,
                pokemon,
                move_name,
            }
            | BattleEvent::ReceivedNoDamage {
                trainer,
                pokemon,
                move_name,
            } => vec![trainer.into(), pokemon.into(), move_name.into()],
            BattleEvent::ReceivedDamage {
                trainer,
                pokemon,
                move_name,
                amount,
            } => vec![
                trainer.into(),
                pokemon.into(),
                move_name.into(),
                i64::from(*amount).into(),
            ],
            BattleEvent::ChangesStat {
                trainer,
                pokemon,
                stat,
                change_by,
            }
            | BattleEvent::ChangesNoStat {
                trainer,
                pokemon,
                stat,
                change_by,
            } => vec![
                trainer.into(),
                pokemon.into(),
                stat.into(),
                i64::from(*change_by).into(),
            ],
            BattleEvent::TargetConditionAdded {
                trainer,
                pokemon,
                condition,
            } => vec![trainer.into(), pokemon.into(), condition.into()],
            BattleEvent::DamageByPoison {
                trainer,
                pokemon,
                delta,
            }
            | BattleEvent::DamageByBurn {
                trainer,
                pokemon,
                delta,
            }
            | BattleEvent::DamageByBadlyPoisoned {
                trainer,
                pokemon,
                delta,
            } => vec![trainer.into(), pokemon.into(), i64::from(*delta).into()],
            BattleEvent::UsesItemOnPokemon {
                trainer,
                pokemon,
                item,
            } => vec![trainer.into(), pokemon.into(), item.into()],
            BattleEvent::GrowthEvent {
                trainer,
                pokemon,
                message,
            } => vec![trainer.into(), pokemon.into(), message.into()],
        }
    }
}

impl Serialize for BattleEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let args = self.args();
        let mut seq = serializer.serialize_seq(Some(args.len() + 1))?;
        seq.serialize_element(self.kind())?;
        for arg in &args {
            seq.serialize_element(arg)?;
        }
        seq.end()
    }
}

impl fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())?;
        for arg in self.args() {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Append-only event sink, split into one segment per battle start or turn.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventLog {
    segments: Vec<Vec<BattleEvent>>,
    current: Vec<BattleEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.current.push(event);
    }

    /// Closes the open segment, even when it is empty.
    pub fn finish_segment(&mut self) {
        let segment = std::mem::take(&mut self.current);
        self.segments.push(segment);
    }

    pub fn segments(&self) -> &[Vec<BattleEvent>] {
        &self.segments
    }

    pub fn last_segment(&self) -> Option<&[BattleEvent]> {
        self.segments.last().map(Vec::as_slice)
    }

    /// Events logged since the last closed segment.
    pub fn current(&self) -> &[BattleEvent] {
        &self.current
    }

    /// Every event in order, closed segments first.
    pub fn events(&self) -> impl Iterator<Item = &BattleEvent> {
        self.segments.iter().flatten().chain(self.current.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.segments.iter().all(Vec::is_empty) && self.current.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events().count()
    }
}

impl fmt::Display for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            writeln!(f, "-- segment {} --", index)?;
            for event in segment {
                writeln!(f, "  {}", event)?;
            }
        }
        if !self.current.is_empty() {
            writeln!(f, "-- open --")?;
            for event in &self.current {
                writeln!(f, "  {}", event)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn uses_move() -> BattleEvent {
        BattleEvent::UsesMove {
            trainer: "Ash".to_string(),
            pokemon: "Pikachu".to_string(),
            move_name: "Thunder Shock".to_string(),
        }
    }

    #[test]
    fn test_event_serializes_as_flat_tuple() {
        let damage = BattleEvent::ReceivedDamage {
            trainer: "Misty".to_string(),
            pokemon: "Bulbasaur".to_string(),
            move_name: "Thunder Shock".to_string(),
            amount: 3,
        };

        assert_eq!(
            serde_json::to_string(&uses_move()).unwrap(),
            r#"["uses_move","Ash","Pikachu","Thunder Shock"]"#
        );
        assert_eq!(
            serde_json::to_string(&damage).unwrap(),
            r#"["received_damage","Misty","Bulbasaur","Thunder Shock",3]"#
        );
    }

    #[test]
    fn test_negative_deltas_keep_their_sign() {
        let event = BattleEvent::DamageByPoison {
            trainer: "Ash".to_string(),
            pokemon: "Pikachu".to_string(),
            delta: -3,
        };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"["damage_by_poison","Ash","Pikachu",-3]"#
        );
        assert_eq!(event.to_string(), "damage_by_poison Ash Pikachu -3");
    }

    #[test]
    fn test_segments_close_in_order() {
        let mut log = EventLog::new();
        log.push(uses_move());
        log.finish_segment();
        log.finish_segment();
        log.push(uses_move());

        assert_eq!(log.segments().len(), 2);
        assert_eq!(log.segments()[0], vec![uses_move()]);
        assert!(log.segments()[1].is_empty());
        assert_eq!(log.current(), &[uses_move()]);
        assert_eq!(log.len(), 2);
    }
}
