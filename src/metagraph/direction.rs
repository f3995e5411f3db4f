use core::fmt::Debug;
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{HetnetError, HetnetResult};

/// The direction of a [`crate::MetaEdge`]
///
/// `Both` is used for undirected relationships, e.g. a gene-gene interaction.
/// `Forward` and `Backward` always come in pairs: declaring a `forward`
/// metaedge implicitly creates the `backward` one in the opposite direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// From source to target
    Forward,
    /// From target to source
    Backward,
    /// Undirected
    Both,
}

impl Direction {
    /// Returns the direction of the inverse metaedge
    ///
    /// # Examples
    ///
    /// ```
    /// use hetnet::Direction;
    ///
    /// assert_eq!(Direction::Forward.inverse(), Direction::Backward);
    /// assert_eq!(Direction::Backward.inverse(), Direction::Forward);
    /// assert_eq!(Direction::Both.inverse(), Direction::Both);
    /// ```
    pub fn inverse(&self) -> Direction {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
            Direction::Both => Direction::Both,
        }
    }

    /// Returns the name used in edge tuples and JSON documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
            Direction::Both => "both",
        }
    }

    /// Decorates an edge abbreviation with the direction marker
    ///
    /// Forward edges get a trailing `>`, backward edges a leading `<`.
    pub(crate) fn decorate(&self, abbreviation: &str) -> String {
        match self {
            Direction::Forward => format!("{abbreviation}>"),
            Direction::Backward => format!("<{abbreviation}"),
            Direction::Both => abbreviation.to_string(),
        }
    }
}

impl FromStr for Direction {
    type Err = HetnetError;
    fn from_str(s: &str) -> HetnetResult<Self> {
        match s {
            "forward" => Ok(Direction::Forward),
            "backward" => Ok(Direction::Backward),
            "both" => Ok(Direction::Both),
            _ => Err(HetnetError::InvalidDirection(s.to_string())),
        }
    }
}

impl TryFrom<&str> for Direction {
    type Error = HetnetError;
    fn try_from(s: &str) -> HetnetResult<Self> {
        s.parse()
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!("forward".parse::<Direction>().unwrap(), Direction::Forward);
        assert_eq!(Direction::try_from("both").unwrap(), Direction::Both);
        assert!(matches!(
            "sideways".parse::<Direction>(),
            Err(HetnetError::InvalidDirection(_))
        ));
        // case sensitive
        assert!("Forward".parse::<Direction>().is_err());
    }

    #[test]
    fn inverse_is_involution() {
        for d in [Direction::Forward, Direction::Backward, Direction::Both] {
            assert_eq!(d.inverse().inverse(), d);
        }
    }

    #[test]
    fn markers() {
        assert_eq!(Direction::Forward.decorate("r"), "r>");
        assert_eq!(Direction::Backward.decorate("r"), "<r");
        assert_eq!(Direction::Both.decorate("i"), "i");
    }
}
