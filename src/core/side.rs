use super::convert::{FromIndex, ToIndex};
use super::error::{Error, Result};

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut, Not};
use std::str::FromStr;

/// One of the two players of a battle
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive, Serialize, Deserialize,
)]
pub enum Side {
    #[serde(rename = "p1")]
    P1,
    #[serde(rename = "p2")]
    P2,
}

impl Side {
    pub fn all() -> [Side; 2] {
        [Side::P1, Side::P2]
    }

    pub fn opponent(self) -> Self {
        match self {
            Side::P1 => Side::P2,
            Side::P2 => Side::P1,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Side::P1 => "p1",
            Side::P2 => "p2",
        }
    }
}

impl FromIndex for Side {
    fn from_index(idx: usize) -> Result<Self> {
        FromPrimitive::from_usize(idx)
            .ok_or_else(|| Error::Config(format!("invalid side index: {}", idx)))
    }
}

impl ToIndex for Side {
    fn to_index(&self) -> usize {
        match self {
            Side::P1 => 0,
            Side::P2 => 1,
        }
    }
}

impl Not for Side {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.opponent()
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "p1" => Ok(Side::P1),
            "p2" => Ok(Side::P2),
            _ => Err(Error::Config(format!("unknown side: {}", s))),
        }
    }
}

/// Array indexed by battle side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideArray<T> {
    pub values: [T; 2],
}

impl<T> SideArray<T> {
    pub fn new(p1: T, p2: T) -> Self {
        Self { values: [p1, p2] }
    }

    pub fn from_fn(mut f: impl FnMut(Side) -> T) -> Self {
        Self::new(f(Side::P1), f(Side::P2))
    }

    pub fn get(&self, side: Side) -> &T {
        &self.values[side.to_index()]
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        &mut self.values[side.to_index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.values.iter_mut()
    }

    /// Iterate over `(side, value)` pairs in side order
    pub fn sides(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::all().into_iter().zip(self.values.iter())
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> SideArray<U> {
        let [p1, p2] = self.values;
        SideArray::new(f(p1), f(p2))
    }
}

impl<T> Index<Side> for SideArray<T> {
    type Output = T;

    fn index(&self, index: Side) -> &Self::Output {
        self.get(index)
    }
}

impl<T> IndexMut<Side> for SideArray<T> {
    fn index_mut(&mut self, index: Side) -> &mut Self::Output {
        self.get_mut(index)
    }
}

impl<T: std::ops::AddAssign + Copy> std::ops::AddAssign for SideArray<T> {
    fn add_assign(&mut self, rhs: Self) {
        self.values[0] += rhs.values[0];
        self.values[1] += rhs.values[1];
    }
}
