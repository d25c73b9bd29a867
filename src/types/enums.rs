//! Enumeration types for the passenger flow simulator
//!
//! This module contains the closed sets used throughout the simulation:
//! passenger classes, queue-selection strategies, terminal outcomes, stages,
//! resource pool names, queue disciplines and journey transition kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Service class of a passenger
///
/// Classes are ordered by service priority: `PriorityA` is served first on
/// priority-ordered pools, `Standard` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassengerClass {
    /// Highest priority class (first class)
    PriorityA,
    /// Second priority class (business class)
    PriorityB,
    /// Standard class (economy)
    Standard,
}

impl PassengerClass {
    /// All classes in priority order
    pub const ALL: [PassengerClass; 3] =
        [PassengerClass::PriorityA, PassengerClass::PriorityB, PassengerClass::Standard];

    /// Priority rank used by priority-ordered pools (lower is served first)
    pub fn rank(self) -> u8 {
        match self {
            PassengerClass::PriorityA => 0,
            PassengerClass::PriorityB => 1,
            PassengerClass::Standard => 2,
        }
    }

    /// Whether the class is routed to dedicated priority pools
    pub fn is_priority(self) -> bool {
        !matches!(self, PassengerClass::Standard)
    }
}

impl fmt::Display for PassengerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassengerClass::PriorityA => write!(f, "Priority A"),
            PassengerClass::PriorityB => write!(f, "Priority B"),
            PassengerClass::Standard => write!(f, "Standard"),
        }
    }
}

impl FromStr for PassengerClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "priority a" | "prioritya" | "priority_a" | "first" => Ok(PassengerClass::PriorityA),
            "priority b" | "priorityb" | "priority_b" | "business" => Ok(PassengerClass::PriorityB),
            "standard" | "economy" => Ok(PassengerClass::Standard),
            _ => Err(format!("Unknown passenger class: {}", s)),
        }
    }
}

/// Queue-selection strategy a passenger uses when comparing alternatives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueStrategy {
    /// Compare queue lengths
    ShortestQueue,
    /// Compare projected waits based on each pool's historical service rate
    FastestMoving,
    /// Stay in the lane designated for the passenger's class; never jockeys
    ClassRestricted,
}

impl QueueStrategy {
    /// All strategies in declaration order
    pub const ALL: [QueueStrategy; 3] = [
        QueueStrategy::ShortestQueue,
        QueueStrategy::FastestMoving,
        QueueStrategy::ClassRestricted,
    ];

    /// Whether passengers using this strategy may switch pools while waiting
    pub fn allows_jockeying(self) -> bool {
        !matches!(self, QueueStrategy::ClassRestricted)
    }
}

impl fmt::Display for QueueStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueStrategy::ShortestQueue => write!(f, "shortest_queue"),
            QueueStrategy::FastestMoving => write!(f, "fastest_moving"),
            QueueStrategy::ClassRestricted => write!(f, "class_restricted"),
        }
    }
}

impl FromStr for QueueStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "shortest_queue" | "shortest" => Ok(QueueStrategy::ShortestQueue),
            "fastest_moving" | "fastest" => Ok(QueueStrategy::FastestMoving),
            "class_restricted" | "class_appropriate" => Ok(QueueStrategy::ClassRestricted),
            _ => Err(format!("Unknown queue strategy: {}", s)),
        }
    }
}

/// Outcome of a passenger journey
///
/// Every outcome except `InProgress` is terminal and is set exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Still moving through the network
    InProgress,
    /// Boarded successfully
    Completed,
    /// Reached boarding after the departure deadline or a full flight
    MissedDeadline,
    /// Declined to join a queue on arrival at a pool
    Balked,
    /// Abandoned a queue after waiting
    Reneged,
}

impl Outcome {
    /// Whether the outcome ends the journey
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::InProgress => write!(f, "in_progress"),
            Outcome::Completed => write!(f, "completed"),
            Outcome::MissedDeadline => write!(f, "missed_deadline"),
            Outcome::Balked => write!(f, "balked"),
            Outcome::Reneged => write!(f, "reneged"),
        }
    }
}

/// Service stages of the network, in traversal order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Counter or kiosk check-in
    CheckIn,
    /// Document check followed by scanning
    Security,
    /// Gate boarding
    Boarding,
}

impl StageKind {
    /// All stages in traversal order
    pub const ALL: [StageKind; 3] = [StageKind::CheckIn, StageKind::Security, StageKind::Boarding];

    /// The stage that follows this one, if any
    pub fn next(self) -> Option<StageKind> {
        match self {
            StageKind::CheckIn => Some(StageKind::Security),
            StageKind::Security => Some(StageKind::Boarding),
            StageKind::Boarding => None,
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::CheckIn => write!(f, "check_in"),
            StageKind::Security => write!(f, "security"),
            StageKind::Boarding => write!(f, "boarding"),
        }
    }
}

impl FromStr for StageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "check_in" | "checkin" => Ok(StageKind::CheckIn),
            "security" => Ok(StageKind::Security),
            "boarding" => Ok(StageKind::Boarding),
            _ => Err(format!("Unknown stage: {}", s)),
        }
    }
}

/// Named resource pools of the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolId {
    /// Check-in counters reserved for priority classes
    PriorityCounter,
    /// Traditional check-in counters for standard passengers
    EconomyCounter,
    /// Self-service check-in kiosks
    Kiosk,
    /// Priority lane document check
    PriorityDocumentCheck,
    /// Priority lane scanning
    PriorityScanning,
    /// Regular lane document check
    RegularDocumentCheck,
    /// Regular lane scanning
    RegularScanning,
    /// Boarding gates
    Gate,
}

impl PoolId {
    /// All pools in a fixed order
    pub const ALL: [PoolId; 8] = [
        PoolId::PriorityCounter,
        PoolId::EconomyCounter,
        PoolId::Kiosk,
        PoolId::PriorityDocumentCheck,
        PoolId::PriorityScanning,
        PoolId::RegularDocumentCheck,
        PoolId::RegularScanning,
        PoolId::Gate,
    ];

    /// Stage the pool belongs to
    pub fn stage(self) -> StageKind {
        match self {
            PoolId::PriorityCounter | PoolId::EconomyCounter | PoolId::Kiosk => StageKind::CheckIn,
            PoolId::PriorityDocumentCheck
            | PoolId::PriorityScanning
            | PoolId::RegularDocumentCheck
            | PoolId::RegularScanning => StageKind::Security,
            PoolId::Gate => StageKind::Boarding,
        }
    }

    /// Waiting discipline of the pool
    pub fn discipline(self) -> QueueDiscipline {
        match self {
            PoolId::PriorityCounter
            | PoolId::PriorityDocumentCheck
            | PoolId::PriorityScanning
            | PoolId::Gate => QueueDiscipline::Priority,
            PoolId::EconomyCounter
            | PoolId::Kiosk
            | PoolId::RegularDocumentCheck
            | PoolId::RegularScanning => QueueDiscipline::Fifo,
        }
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PoolId::PriorityCounter => "priority_counter",
            PoolId::EconomyCounter => "economy_counter",
            PoolId::Kiosk => "kiosk",
            PoolId::PriorityDocumentCheck => "priority_document_check",
            PoolId::PriorityScanning => "priority_scanning",
            PoolId::RegularDocumentCheck => "regular_document_check",
            PoolId::RegularScanning => "regular_scanning",
            PoolId::Gate => "gate",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for PoolId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PoolId::ALL
            .iter()
            .copied()
            .find(|pool| pool.to_string() == s.to_lowercase())
            .ok_or_else(|| format!("Unknown pool: {}", s))
    }
}

/// Ordering applied to a pool's waiting structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueDiscipline {
    /// First come, first served
    Fifo,
    /// Ordered by (priority rank, arrival order)
    Priority,
}

/// Kinds of state transitions recorded for each passenger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Entered the system
    Arrived,
    /// Joined a pool's waiting structure
    Queued,
    /// Acquired a server
    ServiceStarted,
    /// Released a server
    ServiceCompleted,
    /// Declined to join a queue (terminal)
    Balked,
    /// Balked at the kiosk and joined a counter instead
    BalkJockeyed,
    /// Abandoned a queue (terminal)
    Reneged,
    /// Moved from one waiting structure to an alternative
    Jockeyed,
    /// Sent back to check-in to resolve a document issue
    DocumentIssue,
    /// Held for secondary inspection after security
    SecondaryInspection,
    /// Boarded (terminal)
    Completed,
    /// Missed the departure deadline (terminal)
    MissedDeadline,
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransitionKind::Arrived => "arrived",
            TransitionKind::Queued => "queued",
            TransitionKind::ServiceStarted => "service_started",
            TransitionKind::ServiceCompleted => "service_completed",
            TransitionKind::Balked => "balked",
            TransitionKind::BalkJockeyed => "balk_jockeyed",
            TransitionKind::Reneged => "reneged",
            TransitionKind::Jockeyed => "jockeyed",
            TransitionKind::DocumentIssue => "document_issue",
            TransitionKind::SecondaryInspection => "secondary_inspection",
            TransitionKind::Completed => "completed",
            TransitionKind::MissedDeadline => "missed_deadline",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passenger_class_rank_order() {
        assert!(PassengerClass::PriorityA.rank() < PassengerClass::PriorityB.rank());
        assert!(PassengerClass::PriorityB.rank() < PassengerClass::Standard.rank());
        assert!(PassengerClass::PriorityA.is_priority());
        assert!(!PassengerClass::Standard.is_priority());
    }

    #[test]
    fn test_passenger_class_from_str_aliases() {
        assert_eq!("first".parse::<PassengerClass>().unwrap(), PassengerClass::PriorityA);
        assert_eq!("Business".parse::<PassengerClass>().unwrap(), PassengerClass::PriorityB);
        assert_eq!("economy".parse::<PassengerClass>().unwrap(), PassengerClass::Standard);
        assert!("steerage".parse::<PassengerClass>().is_err());
    }

    #[test]
    fn test_strategy_jockeying() {
        assert!(QueueStrategy::ShortestQueue.allows_jockeying());
        assert!(QueueStrategy::FastestMoving.allows_jockeying());
        assert!(!QueueStrategy::ClassRestricted.allows_jockeying());
        assert_eq!(
            "class-appropriate".parse::<QueueStrategy>().unwrap(),
            QueueStrategy::ClassRestricted
        );
    }

    #[test]
    fn test_stage_order() {
        assert_eq!(StageKind::CheckIn.next(), Some(StageKind::Security));
        assert_eq!(StageKind::Security.next(), Some(StageKind::Boarding));
        assert_eq!(StageKind::Boarding.next(), None);
    }

    #[test]
    fn test_pool_round_trip_names() {
        for pool in PoolId::ALL {
            assert_eq!(pool.to_string().parse::<PoolId>().unwrap(), pool);
        }
        assert_eq!(PoolId::Kiosk.stage(), StageKind::CheckIn);
        assert_eq!(PoolId::Gate.discipline(), QueueDiscipline::Priority);
        assert_eq!(PoolId::RegularScanning.discipline(), QueueDiscipline::Fifo);
    }

    #[test]
    fn test_outcome_terminality() {
        assert!(!Outcome::InProgress.is_terminal());
        for outcome in [Outcome::Completed, Outcome::MissedDeadline, Outcome::Balked, Outcome::Reneged] {
            assert!(outcome.is_terminal());
        }
    }
}
