use core::fmt;
use core::str::FromStr;

use crate::error::CoreError;

/// Visual/semantic state of a cell inside one snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CellState {
    #[default]
    Unvisited,
    StartNode,
    EndNode,
    /// Queued for expansion but not yet expanded.
    Frontier,
    Visited,
    ShortestPath,
}

impl CellState {
    /// Start and end markers are fixed for the life of a run.
    pub fn is_endpoint(self) -> bool {
        matches!(self, CellState::StartNode | CellState::EndNode)
    }
}

/// Search algorithm that produced a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum AlgorithmType {
    Dijkstra,
    AStar,
    BreadthFirst,
    DepthFirst,
    GreedyBestFirst,
}

impl AlgorithmType {
    pub const ALL: [AlgorithmType; 5] = [
        AlgorithmType::Dijkstra,
        AlgorithmType::AStar,
        AlgorithmType::BreadthFirst,
        AlgorithmType::DepthFirst,
        AlgorithmType::GreedyBestFirst,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AlgorithmType::Dijkstra => "dijkstra",
            AlgorithmType::AStar => "a-star",
            AlgorithmType::BreadthFirst => "breadth-first",
            AlgorithmType::DepthFirst => "depth-first",
            AlgorithmType::GreedyBestFirst => "greedy-best-first",
        }
    }
}

impl fmt::Display for AlgorithmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlgorithmType::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::UnknownAlgorithm {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_names_parse_back() {
        for algo in AlgorithmType::ALL {
            assert_eq!(algo.to_string().parse::<AlgorithmType>().unwrap(), algo);
        }
        assert!("bogo".parse::<AlgorithmType>().is_err());
    }

    #[test]
    fn only_start_and_end_are_endpoints() {
        assert!(CellState::StartNode.is_endpoint());
        assert!(CellState::EndNode.is_endpoint());
        assert!(!CellState::Visited.is_endpoint());
        assert!(!CellState::ShortestPath.is_endpoint());
    }
}
