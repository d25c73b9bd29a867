//! Metrics recording
//!
//! The processor reports everything it does through the MetricsSink trait:
//! delivered events, passenger state transitions, finished journeys and
//! periodic pool snapshots. Sinks are write-only and receive records in the
//! order they happen.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::events::EventRecord;
use crate::facility::PoolSnapshot;
use crate::passenger::{Passenger, StageVisit};
use crate::simulation::SimulationResult;
use crate::types::{Outcome, PassengerClass, PassengerId, PoolId, QueueStrategy, TransitionKind};

/// One passenger state transition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionRecord {
    /// Time of the transition
    pub time: f64,
    /// Passenger concerned
    pub passenger: PassengerId,
    /// What happened
    pub kind: TransitionKind,
    /// Pool involved, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<PoolId>,
    /// Destination pool of a queue switch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_pool: Option<PoolId>,
}

impl TransitionRecord {
    /// Transition without a pool
    pub fn new(time: f64, passenger: PassengerId, kind: TransitionKind) -> Self {
        Self { time, passenger, kind, pool: None, to_pool: None }
    }

    /// Transition at `pool`
    pub fn at(time: f64, passenger: PassengerId, kind: TransitionKind, pool: PoolId) -> Self {
        Self { time, passenger, kind, pool: Some(pool), to_pool: None }
    }

    /// Transition moving from `from` to `to`
    pub fn between(time: f64, passenger: PassengerId, kind: TransitionKind, from: PoolId, to: PoolId) -> Self {
        Self { time, passenger, kind, pool: Some(from), to_pool: Some(to) }
    }
}

/// Summary of one passenger's journey
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JourneyRecord {
    /// Passenger
    pub passenger: PassengerId,
    /// Service class
    pub class: PassengerClass,
    /// Queue-selection strategy
    pub strategy: QueueStrategy,
    /// Arrival time
    pub arrival_time: f64,
    /// Flight departure
    pub departure_time: f64,
    /// Outcome at the time of recording
    pub outcome: Outcome,
    /// When the outcome was reached
    pub finished_at: Option<f64>,
    /// Total time in the terminal for finished journeys
    pub time_in_system: Option<f64>,
    /// Returns to check-in
    pub document_loops: u32,
    /// Secondary inspections
    pub secondary_inspections: u32,
    /// Queue switches
    pub jockeys: u32,
    /// Kiosk balks converted into counter visits
    pub balk_jockeys: u32,
    /// Every pool visit
    pub visits: Vec<StageVisit>,
}

impl From<&Passenger> for JourneyRecord {
    fn from(passenger: &Passenger) -> Self {
        let journey = &passenger.journey;
        Self {
            passenger: passenger.id,
            class: passenger.class,
            strategy: passenger.strategy,
            arrival_time: passenger.arrival_time,
            departure_time: passenger.departure_time,
            outcome: journey.outcome,
            finished_at: journey.finished_at,
            time_in_system: passenger.time_in_system(),
            document_loops: journey.document_loops,
            secondary_inspections: journey.secondary_inspections,
            jockeys: journey.jockeys,
            balk_jockeys: journey.balk_jockeys,
            visits: journey.visits.clone(),
        }
    }
}

/// Write-only receiver of simulation records
pub trait MetricsSink {
    /// A delivered event
    fn record_event(&mut self, record: &EventRecord) -> SimulationResult<()>;

    /// A passenger state transition
    fn record_transition(&mut self, record: &TransitionRecord) -> SimulationResult<()>;

    /// A journey that ended, or was still open when the run ended
    fn record_journey(&mut self, record: &JourneyRecord) -> SimulationResult<()>;

    /// A periodic pool snapshot
    fn record_snapshot(&mut self, snapshot: &PoolSnapshot) -> SimulationResult<()>;

    /// Flush buffered output
    fn flush(&mut self) -> SimulationResult<()> {
        Ok(())
    }
}

/// In-memory sink keeping every record
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsRecorder {
    /// Delivered events in order
    pub events: Vec<EventRecord>,
    /// Transitions in order
    pub transitions: Vec<TransitionRecord>,
    /// Journey records in order
    pub journeys: Vec<JourneyRecord>,
    /// Pool snapshots in order
    pub snapshots: Vec<PoolSnapshot>,
}

impl MetricsRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Transitions of one passenger, in order
    pub fn transitions_for(&self, passenger: PassengerId) -> Vec<&TransitionRecord> {
        self.transitions.iter().filter(|t| t.passenger == passenger).collect()
    }

    /// Number of transitions of `kind`
    pub fn count(&self, kind: TransitionKind) -> usize {
        self.transitions.iter().filter(|t| t.kind == kind).count()
    }
}

impl MetricsSink for MetricsRecorder {
    fn record_event(&mut self, record: &EventRecord) -> SimulationResult<()> {
        self.events.push(record.clone());
        Ok(())
    }

    fn record_transition(&mut self, record: &TransitionRecord) -> SimulationResult<()> {
        self.transitions.push(record.clone());
        Ok(())
    }

    fn record_journey(&mut self, record: &JourneyRecord) -> SimulationResult<()> {
        self.journeys.push(record.clone());
        Ok(())
    }

    fn record_snapshot(&mut self, snapshot: &PoolSnapshot) -> SimulationResult<()> {
        self.snapshots.push(snapshot.clone());
        Ok(())
    }
}

/// Line wrapper that tags each JSON object with its record type
#[derive(Serialize)]
struct Tagged<'a, T: Serialize> {
    record: &'static str,
    #[serde(flatten)]
    data: &'a T,
}

/// Sink writing one JSON object per line to four streams
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    events: W,
    transitions: W,
    journeys: W,
    snapshots: W,
    lines: usize,
}

impl<W: Write> JsonLinesSink<W> {
    /// Create a sink over the given writers
    pub fn new(events: W, transitions: W, journeys: W, snapshots: W) -> Self {
        Self { events, transitions, journeys, snapshots, lines: 0 }
    }

    /// Number of lines written so far
    pub fn lines_written(&self) -> usize {
        self.lines
    }

    /// Recover the writers as (events, transitions, journeys, snapshots)
    pub fn into_inner(self) -> (W, W, W, W) {
        (self.events, self.transitions, self.journeys, self.snapshots)
    }

    fn write_line<T: Serialize>(writer: &mut W, record: &'static str, data: &T) -> SimulationResult<()> {
        serde_json::to_writer(&mut *writer, &Tagged { record, data })?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

impl JsonLinesSink<BufWriter<File>> {
    /// Create `events.jsonl`, `transitions.jsonl`, `journeys.jsonl` and
    /// `snapshots.jsonl` in `dir`, creating the directory if needed
    pub fn create_in<P: AsRef<Path>>(dir: P) -> SimulationResult<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let open = |name: &str| -> SimulationResult<BufWriter<File>> {
            Ok(BufWriter::new(File::create(dir.join(name))?))
        };
        info!("Writing metrics to {}", dir.display());
        Ok(Self::new(
            open("events.jsonl")?,
            open("transitions.jsonl")?,
            open("journeys.jsonl")?,
            open("snapshots.jsonl")?,
        ))
    }
}

impl<W: Write> MetricsSink for JsonLinesSink<W> {
    fn record_event(&mut self, record: &EventRecord) -> SimulationResult<()> {
        Self::write_line(&mut self.events, "event", record)?;
        self.lines += 1;
        Ok(())
    }

    fn record_transition(&mut self, record: &TransitionRecord) -> SimulationResult<()> {
        Self::write_line(&mut self.transitions, "transition", record)?;
        self.lines += 1;
        Ok(())
    }

    fn record_journey(&mut self, record: &JourneyRecord) -> SimulationResult<()> {
        Self::write_line(&mut self.journeys, "journey", record)?;
        self.lines += 1;
        Ok(())
    }

    fn record_snapshot(&mut self, snapshot: &PoolSnapshot) -> SimulationResult<()> {
        Self::write_line(&mut self.snapshots, "snapshot", snapshot)?;
        self.lines += 1;
        Ok(())
    }

    fn flush(&mut self) -> SimulationResult<()> {
        self.events.flush()?;
        self.transitions.flush()?;
        self.journeys.flush()?;
        self.snapshots.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[test]
    fn test_recorder_keeps_order() {
        let mut recorder = MetricsRecorder::new();
        let id = PassengerId::new(1);
        recorder.record_transition(&TransitionRecord::new(0.0, id, TransitionKind::Arrived)).unwrap();
        recorder
            .record_transition(&TransitionRecord::at(0.0, id, TransitionKind::Queued, PoolId::Kiosk))
            .unwrap();
        recorder
            .record_transition(&TransitionRecord::new(1.0, PassengerId::new(2), TransitionKind::Arrived))
            .unwrap();

        let kinds: Vec<_> = recorder.transitions_for(id).iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TransitionKind::Arrived, TransitionKind::Queued]);
        assert_eq!(recorder.count(TransitionKind::Arrived), 2);
    }

    #[test]
    fn test_json_lines_are_tagged() {
        let mut sink = JsonLinesSink::new(Vec::new(), Vec::new(), Vec::new(), Vec::new());
        sink.record_event(&EventRecord {
            seq: 0,
            time: 0.0,
            event: EventKind::Arrival { passenger: PassengerId::new(7) },
        })
        .unwrap();
        sink.record_transition(&TransitionRecord::between(
            2.0,
            PassengerId::new(7),
            TransitionKind::Jockeyed,
            PoolId::EconomyCounter,
            PoolId::Kiosk,
        ))
        .unwrap();
        assert_eq!(sink.lines_written(), 2);

        let (events, transitions, journeys, _) = sink.into_inner();
        let event: serde_json::Value = serde_json::from_slice(&events[..events.len() - 1]).unwrap();
        assert_eq!(event["record"], "event");
        assert_eq!(event["type"], "arrival");

        let line = String::from_utf8(transitions).unwrap();
        let transition: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(transition["kind"], "jockeyed");
        assert_eq!(transition["to_pool"], "kiosk");
        assert!(journeys.is_empty());
    }

    #[test]
    fn test_create_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = JsonLinesSink::create_in(dir.path().join("run")).unwrap();
        sink.record_transition(&TransitionRecord::new(0.0, PassengerId::new(0), TransitionKind::Arrived))
            .unwrap();
        sink.flush().unwrap();

        let written = std::fs::read_to_string(dir.path().join("run/transitions.jsonl")).unwrap();
        assert_eq!(written.lines().count(), 1);
        assert!(dir.path().join("run/snapshots.jsonl").exists());
    }
}
