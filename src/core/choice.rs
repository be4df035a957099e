//! Legal choice enumeration from an engine request

use super::{
    action::Action,
    error::{Error, Result},
    request::{Request, RequestUnit},
};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChoiceKind {
    Move,
    Switch,
}

/// A legal action together with a human readable label (move name or species)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(rename = "key")]
    pub action: Action,
    #[serde(rename = "type")]
    pub kind: ChoiceKind,
    pub label: String,
}

/// Ordered legal actions of one side at one decision point.
/// Active-unit options come first, reserve switches after.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoiceSet {
    choices: Vec<Choice>,
}

impl ChoiceSet {
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Choice> {
        self.choices.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Choice> {
        self.choices.get(index)
    }

    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.choices.iter().map(|c| c.action)
    }

    pub fn options(&self) -> impl Iterator<Item = &Choice> {
        self.choices.iter().filter(|c| c.kind == ChoiceKind::Move)
    }

    pub fn switches(&self) -> impl Iterator<Item = &Choice> {
        self.choices.iter().filter(|c| c.kind == ChoiceKind::Switch)
    }

    pub fn contains(&self, action: Action) -> bool {
        self.choices.iter().any(|c| c.action == action)
    }

    fn push_switches(&mut self, roster: &[RequestUnit]) {
        for (i, unit) in roster.iter().enumerate() {
            if !unit.active && !unit.fainted() {
                self.choices.push(Choice {
                    action: Action::Switch(slot(i)),
                    kind: ChoiceKind::Switch,
                    label: unit.species().to_string(),
                });
            }
        }
    }
}

impl FromIterator<Choice> for ChoiceSet {
    fn from_iter<I: IntoIterator<Item = Choice>>(iter: I) -> Self {
        Self {
            choices: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ChoiceSet {
    type Item = &'a Choice;
    type IntoIter = std::slice::Iter<'a, Choice>;

    fn into_iter(self) -> Self::IntoIter {
        self.choices.iter()
    }
}

fn slot(index: usize) -> u8 {
    u8::try_from(index + 1).unwrap_or(u8::MAX)
}

/// List the legal actions for a request. A `Wait` request yields an empty set.
pub fn enumerate(request: &Request) -> Result<ChoiceSet> {
    let mut set = ChoiceSet::default();

    match request {
        Request::Wait { .. } => {}
        Request::ForceSwitch { side, .. } => {
            set.push_switches(&side.pokemon);
        }
        Request::Active { active, side } => {
            let active = active
                .first()
                .ok_or_else(|| Error::InvalidRequest("active request without an active unit".into()))?;

            for (i, option) in active.moves.iter().enumerate() {
                if !option.disabled {
                    set.choices.push(Choice {
                        action: Action::Move(slot(i)),
                        kind: ChoiceKind::Move,
                        label: option.name.clone(),
                    });
                }
            }

            if !active.trapped {
                set.push_switches(&side.pokemon);
            }
        }
        Request::Unknown(value) => {
            return Err(Error::InvalidRequest(format!("unrecognized request shape: {}", value)));
        }
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::request::{ActiveRequest, MoveSlot, SideRequest};
    use crate::core::side::Side;
    use std::collections::HashSet;
    use test_case::test_case;

    fn unit(name: &str, condition: &str, active: bool) -> RequestUnit {
        RequestUnit {
            ident: format!("p1: {}", name),
            details: format!("{}, L50", name),
            condition: condition.to_string(),
            active,
            moves: vec![],
        }
    }

    fn roster(units: Vec<RequestUnit>) -> SideRequest {
        SideRequest {
            name: "p1".into(),
            id: Side::P1,
            pokemon: units,
        }
    }

    fn slot(name: &str, disabled: bool) -> MoveSlot {
        MoveSlot {
            name: name.into(),
            id: name.to_lowercase(),
            pp: if disabled { 0 } else { 10 },
            maxpp: 10,
            disabled,
        }
    }

    fn keys(set: &ChoiceSet) -> Vec<String> {
        set.actions().map(|a| a.key()).collect()
    }

    fn active_request(disabled: [bool; 3], trapped: bool) -> Request {
        Request::Active {
            active: vec![ActiveRequest {
                moves: vec![
                    slot("Surf", disabled[0]),
                    slot("Toxic", disabled[1]),
                    slot("Rest", disabled[2]),
                ],
                trapped,
            }],
            side: roster(vec![
                unit("Lapras", "200/200", true),
                unit("Jynx", "0 fnt", false),
                unit("Snorlax", "300/300", false),
            ]),
        }
    }

    #[test]
    fn test_wait_is_empty() {
        let set = enumerate(&Request::wait()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_force_switch_skips_fainted_and_active() {
        let request = Request::ForceSwitch {
            force_switch: vec![true],
            side: roster(vec![
                unit("Lapras", "0 fnt", true),
                unit("Jynx", "0 fnt", false),
                unit("Snorlax", "300/300", false),
                unit("Gengar", "150/150", false),
            ]),
        };
        let set = enumerate(&request).unwrap();
        assert_eq!(keys(&set), vec!["switch 3", "switch 4"]);
        assert!(set.options().next().is_none());
    }

    #[test_case([false, false, false], false, &["move 1", "move 2", "move 3", "switch 3"]; "all usable")]
    #[test_case([false, true, false], false, &["move 1", "move 3", "switch 3"]; "disabled option skipped")]
    #[test_case([false, false, false], true, &["move 1", "move 2", "move 3"]; "trapped cannot switch")]
    #[test_case([true, true, false], true, &["move 3"]; "single option")]
    fn test_active_phase(disabled: [bool; 3], trapped: bool, expected: &[&str]) {
        let set = enumerate(&active_request(disabled, trapped)).unwrap();
        assert_eq!(keys(&set), expected);
    }

    #[test]
    fn test_partition_and_labels() {
        let set = enumerate(&active_request([false; 3], false)).unwrap();
        let options: Vec<_> = set.options().map(|c| c.label.as_str()).collect();
        let switches: Vec<_> = set.switches().map(|c| c.label.as_str()).collect();
        assert_eq!(options, vec!["Surf", "Toxic", "Rest"]);
        assert_eq!(switches, vec!["Snorlax"]);
        assert!(set.contains(Action::Switch(3)));
        assert!(!set.contains(Action::Switch(2)));
    }

    #[test]
    fn test_keys_unique() {
        let set = enumerate(&active_request([false; 3], false)).unwrap();
        let unique: HashSet<_> = set.actions().collect();
        assert_eq!(unique.len(), set.len());
    }

    #[test]
    fn test_unknown_shape_is_invalid() {
        let request = Request::Unknown(serde_json::json!({"teamPreview": true}));
        assert!(matches!(enumerate(&request), Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn test_active_without_unit_is_invalid() {
        let request = Request::Active {
            active: vec![],
            side: roster(vec![unit("Lapras", "200/200", true)]),
        };
        assert!(matches!(enumerate(&request), Err(Error::InvalidRequest(_))));
    }
}
