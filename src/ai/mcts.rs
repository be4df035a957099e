//! Monte Carlo tree search over simultaneous turns.
//!
//! Each turn is split into two tree layers: the searching side picks an
//! action first, then a child node for the opponent answers it without
//! seeing it. Only after both halves are known is the pair applied to the
//! game state. Nodes live in a flat arena and refer to each other by index.

use super::{
    playout::{rollout, MAX_TURNS},
    policy::Policy,
    random::WeightedRandom,
    search_log::{ChoiceWinRate, LogLevel, NullLog, SearchLog, SearchLogEntry},
    trace,
};
use crate::core::{enumerate, Action, Error, Result, Side, SideArray};
use crate::game::{GameState, Simulator};

use log::debug;
use rand::prelude::*;
use std::{rc::Rc, time::Instant};

pub type NodeId = usize;

const ROOT: NodeId = 0;

/// Which half of a turn a node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalfTurn {
    /// nothing chosen yet this turn
    Open,
    /// the other side already chose this action
    Answering(Option<Action>),
}

#[derive(Debug, Clone)]
pub struct SearchNode<S: Simulator> {
    pub side: Side,
    /// shared with the parent while the turn is half complete
    state: Rc<GameState<S>>,
    pub half_turn: HalfTurn,
    pub wins: SideArray<u32>,
    pub rollouts: u32,
    pub children: Vec<(Option<Action>, NodeId)>,
    pub unvisited: Vec<Option<Action>>,
    pub terminal: bool,
    pub winner: Option<Side>,
}

impl<S: Simulator> SearchNode<S> {
    fn new(side: Side, state: Rc<GameState<S>>, half_turn: HalfTurn) -> Result<Self> {
        let (terminal, winner, unvisited) = if state.is_ended() {
            let winner = state.winner().ok_or(Error::MissingWinner)?;
            (true, Some(winner), vec![])
        } else {
            let mut actions: Vec<_> = enumerate(&state.request(side))?.actions().map(Some).collect();
            if actions.is_empty() {
                actions.push(None);
            }
            (false, None, actions)
        };

        Ok(Self {
            side,
            state,
            half_turn,
            wins: SideArray::default(),
            rollouts: 0,
            children: Vec::new(),
            unvisited,
            terminal,
            winner,
        })
    }

    pub fn state(&self) -> &GameState<S> {
        &self.state
    }

    pub fn is_expandable(&self) -> bool {
        !self.unvisited.is_empty()
    }

    /// Empirical win rate for `side`; zero when never visited
    pub fn winrate(&self, side: Side) -> f64 {
        if self.rollouts == 0 {
            0.0
        } else {
            f64::from(self.wins[side]) / f64::from(self.rollouts)
        }
    }
}

/// One search worth of nodes, discarded after the action is chosen
#[derive(Debug, Clone)]
pub struct SearchTree<S: Simulator> {
    nodes: Vec<SearchNode<S>>,
}

impl<S: Simulator> SearchTree<S> {
    pub fn new(state: GameState<S>, side: Side) -> Result<Self> {
        let root = SearchNode::new(side, Rc::new(state), HalfTurn::Open)?;
        Ok(Self { nodes: vec![root] })
    }

    pub fn root(&self) -> &SearchNode<S> {
        &self.nodes[ROOT]
    }

    pub fn node(&self, id: NodeId) -> &SearchNode<S> {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Expand one unvisited action of `id`, picked uniformly at random
    pub fn add_random_child(
        &mut self,
        id: NodeId,
        rng: &mut StdRng,
    ) -> Result<(Option<Action>, NodeId)> {
        let node = &mut self.nodes[id];
        let index = match node.unvisited.len() {
            0 => return Err(Error::NoUnvisitedMoves),
            1 => 0,
            n => rng.random_range(0..n),
        };
        let action = node.unvisited.remove(index);

        let (side, half_turn, state) = (node.side, node.half_turn, Rc::clone(&node.state));
        let child = match half_turn {
            HalfTurn::Open => SearchNode::new(side.opponent(), state, HalfTurn::Answering(action))?,
            HalfTurn::Answering(other) => {
                let mut next = (*state).clone();
                next.advance_as(side, action, other)?;
                SearchNode::new(side.opponent(), Rc::new(next), HalfTurn::Open)?
            }
        };

        let child_id = self.nodes.len();
        self.nodes.push(child);
        self.nodes[id].children.push((action, child_id));
        Ok((action, child_id))
    }

    /// UCT over the children of `id`, scored from `id`'s side.
    /// The first child reaching the maximum wins.
    pub fn select_child(&self, id: NodeId, temperature: f64) -> Result<(Option<Action>, NodeId)> {
        let node = &self.nodes[id];
        let total: u32 = node.children.iter().map(|&(_, c)| self.nodes[c].rollouts).sum();
        let ln_total = f64::from(total).ln();

        let mut best = None;
        let mut best_score = f64::NEG_INFINITY;
        for &(action, child_id) in &node.children {
            let child = &self.nodes[child_id];
            let visits = f64::from(child.rollouts);
            let score = child.winrate(node.side) + temperature * (ln_total / visits).sqrt();
            if score > best_score {
                best = Some((action, child_id));
                best_score = score;
            }
        }

        best.ok_or(Error::NoChildren)
    }

    fn backpropagate(&mut self, path: &[NodeId], winner: Side) {
        for &id in path {
            let node = &mut self.nodes[id];
            node.rollouts += 1;
            node.wins[winner] += 1;
        }
    }

    /// Root child with the best win rate for the root's side; first one on a tie
    pub fn best_root_action(&self) -> Result<Option<Action>> {
        let root = self.root();
        let mut best = None;
        let mut best_rate = -1.0;
        for &(action, child_id) in &root.children {
            let rate = self.nodes[child_id].winrate(root.side);
            if rate > best_rate {
                best = Some(action);
                best_rate = rate;
            }
        }
        best.ok_or(Error::NoChildren)
    }

    /// Visit counts of the root's children in expansion order
    pub fn root_visits(&self) -> Vec<(Option<Action>, u32)> {
        self.root()
            .children
            .iter()
            .map(|&(action, id)| (action, self.nodes[id].rollouts))
            .collect()
    }

    fn root_winrates(&self) -> Result<Vec<ChoiceWinRate>> {
        let root = self.root();
        let choices = enumerate(&root.state.request(root.side))?;
        Ok(choices
            .iter()
            .map(|choice| {
                let child = root
                    .children
                    .iter()
                    .find(|&&(action, _)| action == Some(choice.action))
                    .map(|&(_, id)| &self.nodes[id]);
                ChoiceWinRate {
                    choice: choice.clone(),
                    winrate: child.map(|c| c.winrate(root.side)),
                }
            })
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mcts {
    playout_count: u32,
    temperature: f64,
    rollout: WeightedRandom,
    turn_cap: u32,
    seed: Option<u64>,
}

/// What a finished search produced
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub action: Option<Action>,
    pub root_rollouts: u32,
    pub visits: Vec<(Option<Action>, u32)>,
}

impl Mcts {
    pub fn new(playout_count: u32, temperature: f64, switch_bias: f64) -> Result<Self> {
        if playout_count == 0 {
            return Err(Error::Config("playoutCount must be positive".into()));
        }
        if !temperature.is_finite() || temperature < 0.0 {
            return Err(Error::Config(format!("invalid temperature: {}", temperature)));
        }

        Ok(Self {
            playout_count,
            temperature,
            rollout: WeightedRandom::new(switch_bias)?,
            turn_cap: MAX_TURNS,
            seed: None,
        })
    }

    pub fn with_turn_cap(mut self, turn_cap: u32) -> Self {
        self.turn_cap = turn_cap;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn playout_count(&self) -> u32 {
        self.playout_count
    }

    /// Play out from a freshly added node. Draws count for `searcher`.
    fn simulate<S: Simulator>(
        &self,
        node: &SearchNode<S>,
        searcher: Side,
        rng: &mut StdRng,
    ) -> Result<Side> {
        if node.terminal {
            return node.winner.ok_or(Error::MissingWinner);
        }

        let mut state = node.state().clone();
        if let HalfTurn::Answering(other) = node.half_turn {
            let own = self.rollout.select(&state, node.side, rng, &mut NullLog)?;
            state.advance_as(node.side, own, other)?;
        }

        Ok(rollout(state, &self.rollout, rng, self.turn_cap)?.unwrap_or(searcher))
    }

    /// Build the tree and return it with the chosen action
    pub fn grow<S: Simulator>(
        &self,
        state: &GameState<S>,
        side: Side,
        rng: &mut StdRng,
        log: &mut dyn SearchLog,
    ) -> Result<(SearchTree<S>, Option<Action>)> {
        let mut tree = SearchTree::new(state.clone(), side)?;
        if tree.root().unvisited.len() <= 1 {
            let action = tree.root().unvisited.first().copied().flatten();
            return Ok((tree, action));
        }

        let mut rng = StdRng::seed_from_u64(self.seed.unwrap_or_else(|| rng.random()));
        let verbose = log.wants(LogLevel::Verbose);
        let mut playouts = Vec::new();

        for _ in 0..self.playout_count {
            let mut path = vec![ROOT];
            let mut actions = Vec::new();
            let mut id = ROOT;

            loop {
                let node = tree.node(id);
                if node.terminal {
                    break;
                }
                if node.is_expandable() {
                    let (action, child) = tree.add_random_child(id, &mut rng)?;
                    actions.push(action);
                    path.push(child);
                    id = child;
                    break;
                }
                let (action, child) = tree.select_child(id, self.temperature)?;
                actions.push(action);
                path.push(child);
                id = child;
            }

            let winner = self.simulate(tree.node(id), side, &mut rng)?;
            tree.backpropagate(&path, winner);
            log.on_rollout();

            if verbose {
                playouts.push(trace::encode(winner, &actions)?);
            }
        }

        let action = tree.best_root_action()?;

        if log.wants(LogLevel::Info) {
            log.emit(SearchLogEntry::WinRates {
                winrates: tree.root_winrates()?,
            });
        }
        if verbose {
            log.emit(SearchLogEntry::Playouts {
                root: state.serialize()?.into_string(),
                playouts,
            });
        }

        Ok((tree, action))
    }

    pub fn search<S: Simulator>(
        &self,
        state: &GameState<S>,
        side: Side,
        rng: &mut StdRng,
        log: &mut dyn SearchLog,
    ) -> Result<SearchOutcome> {
        let (tree, action) = self.grow(state, side, rng, log)?;
        Ok(SearchOutcome {
            action,
            root_rollouts: tree.root().rollouts,
            visits: tree.root_visits(),
        })
    }
}

impl Policy for Mcts {
    fn select<S: Simulator>(
        &self,
        state: &GameState<S>,
        side: Side,
        rng: &mut StdRng,
        log: &mut dyn SearchLog,
    ) -> Result<Option<Action>> {
        let start = Instant::now();
        let outcome = self.search(state, side, rng, log)?;
        debug!(
            "mcts for {}: {} rollouts over {} root children in {:.3}s, best {}",
            side,
            outcome.root_rollouts,
            outcome.visits.len(),
            start.elapsed().as_secs_f64(),
            Action::optional_key(outcome.action)
        );
        Ok(outcome.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{presets, Battle};
    use crate::utils::make_rng;

    fn tied_tree() -> (SearchTree<Battle>, [(Option<Action>, NodeId); 2]) {
        let state = GameState::from_parties(&presets::electric(), &presets::water(), Some(6)).unwrap();
        let mut tree = SearchTree::new(state, Side::P1).unwrap();
        let mut rng = make_rng(Some(2));
        let first = tree.add_random_child(ROOT, &mut rng).unwrap();
        let second = tree.add_random_child(ROOT, &mut rng).unwrap();

        for (_, id) in [first, second] {
            tree.nodes[id].rollouts = 4;
            tree.nodes[id].wins[Side::P1] = 2;
            tree.nodes[id].wins[Side::P2] = 2;
        }
        tree.nodes[ROOT].rollouts = 8;
        (tree, [first, second])
    }

    #[test]
    fn test_equal_winrates_keep_first_root_child() {
        let (tree, [first, second]) = tied_tree();
        assert_ne!(first.0, second.0);
        assert_eq!(tree.best_root_action().unwrap(), first.0);
    }

    #[test]
    fn test_equal_uct_scores_select_first_child() {
        let (tree, [first, _]) = tied_tree();
        assert_eq!(tree.select_child(ROOT, 0.7).unwrap(), first);
        assert_eq!(tree.select_child(ROOT, 0.0).unwrap(), first);
    }

    #[test]
    fn test_selection_without_children_fails() {
        let state = GameState::<Battle>::from_parties(&presets::electric(), &presets::water(), Some(6)).unwrap();
        let tree = SearchTree::new(state, Side::P1).unwrap();
        assert!(matches!(tree.select_child(ROOT, 0.7), Err(Error::NoChildren)));
        assert!(matches!(tree.best_root_action(), Err(Error::NoChildren)));
    }
}
