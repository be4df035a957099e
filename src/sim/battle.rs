//! Deterministic single-battle engine

use super::dex::{self, MoveData, MoveEffect, STRUGGLE};
use super::party::{self, Party, UnitSpec};
use crate::core::{
    Action, ActiveRequest, Error, MoveSlot, Request, RequestUnit, Result, Side, SideArray,
    SideRequest,
};
use crate::game::Simulator;

use rand::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveState {
    pub id: String,
    pub name: String,
    pub power: u32,
    pub accuracy: u32,
    pub pp: u32,
    pub max_pp: u32,
    pub effect: MoveEffect,
}

impl From<&MoveData> for MoveState {
    fn from(data: &MoveData) -> Self {
        Self {
            id: data.id.to_string(),
            name: data.name.to_string(),
            power: data.power,
            accuracy: data.accuracy,
            pp: data.pp,
            max_pp: data.pp,
            effect: data.effect,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitState {
    pub name: String,
    pub species: String,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub atk: u32,
    pub def: u32,
    pub spe: u32,
    pub moves: Vec<MoveState>,
}

impl UnitState {
    fn from_spec(spec: &UnitSpec) -> Result<Self> {
        let moves = spec
            .moves
            .iter()
            .map(|m| {
                dex::lookup(m)
                    .map(MoveState::from)
                    .ok_or_else(|| Error::Initialization(format!("unknown move '{}'", m)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: spec.name.clone(),
            species: spec.species.clone(),
            level: spec.level,
            hp: spec.stats.hp,
            max_hp: spec.stats.hp,
            atk: spec.stats.atk,
            def: spec.stats.def,
            spe: spec.stats.spe,
            moves,
        })
    }

    pub fn fainted(&self) -> bool {
        self.hp == 0
    }

    /// No PP left on any move
    pub fn struggling(&self) -> bool {
        self.moves.iter().all(|m| m.pp == 0)
    }

    pub fn condition(&self) -> String {
        if self.fainted() {
            "0 fnt".to_string()
        } else {
            format!("{}/{}", self.hp, self.max_hp)
        }
    }

    pub fn details(&self) -> String {
        format!("{}, L{}", self.species, self.level)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideState {
    pub units: Vec<UnitState>,
    pub active: usize,
    /// the active unit may not switch out
    pub trapped: bool,
}

impl SideState {
    pub fn active_unit(&self) -> &UnitState {
        &self.units[self.active]
    }

    fn active_unit_mut(&mut self) -> &mut UnitState {
        &mut self.units[self.active]
    }

    pub fn all_fainted(&self) -> bool {
        self.units.iter().all(UnitState::fainted)
    }

    pub fn remaining(&self) -> usize {
        self.units.iter().filter(|u| !u.fainted()).count()
    }
}

/// Complete battle state, including the RNG seed, so a serialized battle
/// replays identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Battle {
    sides: SideArray<SideState>,
    turn: u32,
    force_switch: SideArray<bool>,
    pending: SideArray<Option<Action>>,
    winner: Option<Side>,
    ended: bool,
    seed: u64,
    log: Vec<String>,
}

fn splitmix64(state: u64) -> u64 {
    let mut z = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

fn illegal(side: Side, action: Action, reason: impl Into<String>) -> Error {
    Error::IllegalAction {
        side,
        action,
        reason: reason.into(),
    }
}

impl Battle {
    pub fn sides(&self) -> &SideArray<SideState> {
        &self.sides
    }

    fn ident(&self, side: Side) -> String {
        format!("{}a: {}", side, self.sides[side].active_unit().species)
    }

    fn in_force_switch(&self) -> bool {
        self.force_switch.iter().any(|&f| f)
    }

    fn owes_action(&self, side: Side) -> bool {
        !self.in_force_switch() || self.force_switch[side]
    }

    fn next_rng(&mut self) -> StdRng {
        self.seed = splitmix64(self.seed);
        StdRng::seed_from_u64(self.seed)
    }

    fn side_request(&self, side: Side) -> SideRequest {
        let state = &self.sides[side];
        SideRequest {
            name: side.to_string(),
            id: side,
            pokemon: state
                .units
                .iter()
                .enumerate()
                .map(|(i, unit)| RequestUnit {
                    ident: format!("{}: {}", side, unit.species),
                    details: unit.details(),
                    condition: unit.condition(),
                    active: i == state.active,
                    moves: unit.moves.iter().map(|m| m.id.clone()).collect(),
                })
                .collect(),
        }
    }

    fn move_slots(unit: &UnitState) -> Vec<MoveSlot> {
        if unit.struggling() {
            return vec![MoveSlot {
                name: STRUGGLE.name.to_string(),
                id: STRUGGLE.id.to_string(),
                pp: 1,
                maxpp: 1,
                disabled: false,
            }];
        }

        unit.moves
            .iter()
            .map(|m| MoveSlot {
                name: m.name.clone(),
                id: m.id.clone(),
                pp: m.pp,
                maxpp: m.max_pp,
                disabled: m.pp == 0,
            })
            .collect()
    }

    fn check_switch_target(&self, side: Side, action: Action, slot: u8) -> Result<()> {
        let state = &self.sides[side];
        let index = usize::from(slot) - 1;
        let unit = state
            .units
            .get(index)
            .ok_or_else(|| illegal(side, action, "no unit in that slot"))?;

        if index == state.active {
            return Err(illegal(side, action, "unit is already active"));
        }
        if unit.fainted() {
            return Err(illegal(side, action, "unit has fainted"));
        }
        Ok(())
    }

    fn check_legal(&self, side: Side, action: Action) -> Result<()> {
        if self.ended {
            return Err(illegal(side, action, "battle has ended"));
        }
        if !self.owes_action(side) {
            return Err(illegal(side, action, "no action expected while the opponent switches"));
        }
        if self.pending[side].is_some() {
            return Err(illegal(side, action, "choice already submitted"));
        }
        if action.slot() == 0 {
            return Err(illegal(side, action, "slots are 1-based"));
        }

        let state = &self.sides[side];
        match action {
            Action::Move(_) if self.in_force_switch() => {
                Err(illegal(side, action, "a replacement must be switched in"))
            }
            Action::Move(slot) => {
                let unit = state.active_unit();
                if unit.struggling() {
                    return match slot {
                        1 => Ok(()),
                        _ => Err(illegal(side, action, "only struggle is available")),
                    };
                }
                match unit.moves.get(usize::from(slot) - 1) {
                    None => Err(illegal(side, action, "no move in that slot")),
                    Some(m) if m.pp == 0 => Err(illegal(side, action, "move has no PP left")),
                    Some(_) => Ok(()),
                }
            }
            Action::Switch(_) if state.trapped && !self.in_force_switch() => {
                Err(illegal(side, action, "active unit is trapped"))
            }
            Action::Switch(slot) => self.check_switch_target(side, action, slot),
        }
    }

    fn resolve(&mut self) {
        let mut rng = self.next_rng();
        let choices = std::mem::take(&mut self.pending);

        if self.in_force_switch() {
            for (side, choice) in choices.sides() {
                if let Some(Action::Switch(slot)) = choice {
                    self.switch_in(side, usize::from(*slot) - 1);
                }
            }
            self.force_switch = SideArray::default();
            self.next_turn();
            return;
        }

        for (side, choice) in choices.sides() {
            if let Some(Action::Switch(slot)) = choice {
                self.switch_in(side, usize::from(*slot) - 1);
            }
        }

        let mut movers: Vec<(Side, u8)> = choices
            .sides()
            .filter_map(|(side, choice)| match choice {
                Some(Action::Move(slot)) => Some((side, *slot)),
                _ => None,
            })
            .collect();

        if movers.len() == 2 {
            let a = self.sides[movers[0].0].active_unit().spe;
            let b = self.sides[movers[1].0].active_unit().spe;
            if b > a || (a == b && rng.random_bool(0.5)) {
                movers.swap(0, 1);
            }
        }

        for (side, slot) in movers {
            if self.ended {
                return;
            }
            if self.sides[side].active_unit().fainted() {
                continue;
            }
            self.use_move(side, slot, &mut rng);
        }

        if self.ended {
            return;
        }

        for side in Side::all() {
            self.force_switch[side] = self.sides[side].active_unit().fainted();
        }

        if !self.in_force_switch() {
            self.next_turn();
        }
    }

    fn next_turn(&mut self) {
        self.turn += 1;
        self.log.push(format!("|turn|{}", self.turn));
    }

    fn switch_in(&mut self, side: Side, index: usize) {
        self.sides[side].active = index;
        for state in self.sides.iter_mut() {
            state.trapped = false;
        }
        let unit = self.sides[side].active_unit();
        let line = format!(
            "|switch|{}|{}|{}",
            self.ident(side),
            unit.details(),
            unit.condition()
        );
        self.log.push(line);
    }

    fn faint(&mut self, side: Side) {
        self.log.push(format!("|faint|{}", self.ident(side)));
        for state in self.sides.iter_mut() {
            state.trapped = false;
        }
    }

    /// Ends the battle as soon as one side has nothing left
    fn check_end(&mut self) -> bool {
        for side in Side::all() {
            if self.sides[side].all_fainted() {
                self.ended = true;
                self.winner = Some(side.opponent());
                self.log.push(format!("|win|{}", side.opponent()));
                return true;
            }
        }
        false
    }

    fn damage(attacker: &UnitState, defender: &UnitState, power: u32, rng: &mut StdRng) -> u32 {
        let level = u64::from(attacker.level);
        let base = ((2 * level / 5 + 2) * u64::from(power) * u64::from(attacker.atk)
            / u64::from(defender.def))
            / 50
            + 2;
        let roll: u64 = rng.random_range(85..=100);
        u32::try_from((base * roll / 100).max(1)).unwrap_or(u32::MAX)
    }

    fn use_move(&mut self, side: Side, slot: u8, rng: &mut StdRng) {
        let target = side.opponent();
        let struggling = self.sides[side].active_unit().struggling();

        let used = if struggling {
            MoveState::from(&STRUGGLE)
        } else {
            let m = &mut self.sides[side].active_unit_mut().moves[usize::from(slot) - 1];
            m.pp -= 1;
            m.clone()
        };

        let (attacker_id, target_id) = (self.ident(side), self.ident(target));
        self.log
            .push(format!("|move|{}|{}|{}", attacker_id, used.name, target_id));

        if rng.random_range(0..100) >= used.accuracy {
            self.log.push(format!("|-miss|{}|{}", attacker_id, target_id));
            return;
        }

        if used.power > 0 {
            let dealt = {
                let attacker = self.sides[side].active_unit();
                let defender = self.sides[target].active_unit();
                Self::damage(attacker, defender, used.power, rng).min(defender.hp)
            };

            let defender = self.sides[target].active_unit_mut();
            defender.hp -= dealt;
            let condition = defender.condition();
            self.log.push(format!("|-damage|{}|{}", target_id, condition));

            if self.sides[target].active_unit().fainted() {
                self.faint(target);
                if self.check_end() {
                    return;
                }
            }

            if used.effect == MoveEffect::Drain {
                let attacker = self.sides[side].active_unit_mut();
                let healed = (dealt / 2).min(attacker.max_hp - attacker.hp);
                if healed > 0 {
                    attacker.hp += healed;
                    let condition = attacker.condition();
                    self.log.push(format!("|-heal|{}|{}|[from] drain", attacker_id, condition));
                }
            }

            if struggling {
                let attacker = self.sides[side].active_unit_mut();
                let recoil = (dealt / 4).max(1).min(attacker.hp);
                attacker.hp -= recoil;
                let condition = attacker.condition();
                self.log.push(format!("|-damage|{}|{}|[from] recoil", attacker_id, condition));
                if self.sides[side].active_unit().fainted() {
                    self.faint(side);
                    if self.check_end() {
                        return;
                    }
                }
            }
        }

        if used.effect == MoveEffect::Trap
            && !self.sides[target].active_unit().fainted()
            && !self.sides[side].active_unit().fainted()
        {
            self.sides[target].trapped = true;
            self.log.push(format!("|-activate|{}|trapped", target_id));
        }
    }
}

impl Simulator for Battle {
    type Party = Party;

    fn start(p1: &Party, p2: &Party, seed: u64) -> Result<Self> {
        party::validate(p1)?;
        party::validate(p2)?;

        let side_state = |party: &Party| -> Result<SideState> {
            Ok(SideState {
                units: party.iter().map(UnitState::from_spec).collect::<Result<_>>()?,
                active: 0,
                trapped: false,
            })
        };

        let mut battle = Battle {
            sides: SideArray::new(side_state(p1)?, side_state(p2)?),
            turn: 0,
            force_switch: SideArray::default(),
            pending: SideArray::default(),
            winner: None,
            ended: false,
            seed,
            log: Vec::new(),
        };

        for side in Side::all() {
            battle.log.push(format!("|player|{}", side));
            let size = battle.sides[side].units.len();
            battle.log.push(format!("|teamsize|{}|{}", side, size));
        }
        battle.log.push("|start".to_string());
        for side in Side::all() {
            battle.switch_in(side, 0);
        }
        battle.next_turn();

        Ok(battle)
    }

    fn choose(&mut self, side: Side, action: Action) -> Result<()> {
        self.check_legal(side, action)?;
        self.pending[side] = Some(action);

        if Side::all()
            .into_iter()
            .filter(|&s| self.owes_action(s))
            .all(|s| self.pending[s].is_some())
        {
            self.resolve();
        }
        Ok(())
    }

    fn ended(&self) -> bool {
        self.ended
    }

    fn winner(&self) -> Option<Side> {
        self.winner
    }

    fn turn(&self) -> u32 {
        self.turn
    }

    fn request(&self, side: Side) -> Request {
        if self.ended || !self.owes_action(side) || self.pending[side].is_some() {
            return Request::wait();
        }

        let side_request = self.side_request(side);
        if self.in_force_switch() {
            return Request::ForceSwitch {
                force_switch: vec![true],
                side: side_request,
            };
        }

        let state = &self.sides[side];
        Request::Active {
            active: vec![ActiveRequest {
                moves: Self::move_slots(state.active_unit()),
                trapped: state.trapped,
            }],
            side: side_request,
        }
    }

    fn log(&self) -> &[String] {
        &self.log
    }
}
