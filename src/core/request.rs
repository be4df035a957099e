//! Decision requests the engine presents to each side

use super::side::Side;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One usable option of the active unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSlot {
    #[serde(rename = "move")]
    pub name: String,
    pub id: String,
    pub pp: u32,
    pub maxpp: u32,
    #[serde(default)]
    pub disabled: bool,
}

/// Request details for the active unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRequest {
    pub moves: Vec<MoveSlot>,
    #[serde(default)]
    pub trapped: bool,
}

/// One unit of the requesting side's roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestUnit {
    /// e.g. `"p1: Octillery"`
    pub ident: String,
    /// e.g. `"Octillery, L55"`
    pub details: String,
    /// `"hp/max"`, or `"0 fnt"` once fainted
    pub condition: String,
    pub active: bool,
    #[serde(default)]
    pub moves: Vec<String>,
}

impl RequestUnit {
    pub fn fainted(&self) -> bool {
        self.condition.ends_with(" fnt")
    }

    pub fn species(&self) -> &str {
        self.details.split(',').next().unwrap_or(&self.details)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideRequest {
    pub name: String,
    pub id: Side,
    pub pokemon: Vec<RequestUnit>,
}

/// The three recognised request shapes. Anything else deserializes into
/// `Unknown` and is rejected by the choice enumerator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Request {
    Wait {
        wait: bool,
    },
    ForceSwitch {
        #[serde(rename = "forceSwitch")]
        force_switch: Vec<bool>,
        side: SideRequest,
    },
    Active {
        active: Vec<ActiveRequest>,
        side: SideRequest,
    },
    Unknown(Value),
}

impl Request {
    pub fn wait() -> Self {
        Request::Wait { wait: true }
    }

    pub fn is_wait(&self) -> bool {
        matches!(self, Request::Wait { .. })
    }

    pub fn from_json(value: Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or(Request::Unknown(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn roster() -> Value {
        json!({
            "name": "p1",
            "id": "p1",
            "pokemon": [
                {"ident": "p1: Octillery", "details": "Octillery, L55", "condition": "0 fnt", "active": true},
                {"ident": "p1: Granbull", "details": "Granbull, L55", "condition": "198/198", "active": false}
            ]
        })
    }

    #[test]
    fn test_wait_shape() {
        let request = Request::from_json(json!({"wait": true}));
        assert!(request.is_wait());
    }

    #[test]
    fn test_force_switch_shape() {
        let request = Request::from_json(json!({"forceSwitch": [true], "side": roster()}));
        let Request::ForceSwitch { side, .. } = request else {
            panic!("expected force switch, got {:?}", request);
        };
        assert_eq!(side.id, Side::P1);
        assert!(side.pokemon[0].fainted());
        assert_eq!(side.pokemon[1].species(), "Granbull");
    }

    #[test]
    fn test_active_shape() {
        let request = Request::from_json(json!({
            "active": [{"moves": [{"move": "Surf", "id": "surf", "pp": 15, "maxpp": 15}]}],
            "side": roster()
        }));
        let Request::Active { active, .. } = request else {
            panic!("expected active request");
        };
        assert_eq!(active[0].moves[0].name, "Surf");
        assert!(!active[0].trapped);
        assert!(!active[0].moves[0].disabled);
    }

    #[test]
    fn test_team_preview_is_unknown() {
        let request = Request::from_json(json!({"teamPreview": true, "side": roster()}));
        assert!(matches!(request, Request::Unknown(_)));
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(Request::wait()).unwrap();
        assert_eq!(value, json!({"wait": true}));
    }
}
