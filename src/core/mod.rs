//! Core battle vocabulary: sides, actions, requests and legal choices

pub mod action;
pub mod choice;
pub mod convert;
pub mod error;
pub mod request;
pub mod side;

pub use action::Action;
pub use choice::{enumerate, Choice, ChoiceKind, ChoiceSet};
pub use convert::{FromIndex, ToIndex};
pub use error::{Error, Result};
pub use request::{ActiveRequest, MoveSlot, Request, RequestUnit, SideRequest};
pub use side::{Side, SideArray};
