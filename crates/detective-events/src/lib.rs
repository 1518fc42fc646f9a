use crossbeam_channel::{Receiver, Sender, unbounded};
use detective_core::{GraphEdge, GraphNode, Record};
use serde::Serialize;

/// Outcome of checking a submitted query against a level's ground truth,
/// flattened to plain data so it can cross threads and reach the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum QueryOutcome {
    /// Result sets are equivalent; carries the player's records for preview.
    Match { records: Vec<Record> },
    /// The query ran but returned something else.
    Mismatch { records: Vec<Record> },
    /// Refused before reaching the database (empty or not read-only).
    Rejected { message: String },
    /// The database failed or rejected the query.
    Failed { message: String },
}

impl QueryOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, QueryOutcome::Match { .. })
    }

    /// Whether the submission counts as an attempt in the player's statistics.
    pub fn counts_as_attempt(&self) -> bool {
        !matches!(self, QueryOutcome::Rejected { .. })
    }

    pub fn records(&self) -> &[Record] {
        match self {
            QueryOutcome::Match { records } | QueryOutcome::Mismatch { records } => records,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    // Graph loading
    GraphFetched {
        level: u32,
        nodes: Vec<GraphNode>,
        edges: Vec<GraphEdge>,
    },
    GraphFetchFailed {
        level: u32,
        message: String,
    },

    // Evaluation
    QueryEvaluated {
        level: u32,
        query: String,
        outcome: QueryOutcome,
    },
    /// A level was solved for the first time.
    LevelCompleted {
        level: u32,
    },
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        if self.tx.send(event).is_err() {
            tracing::debug!("event bus has no receivers, event dropped");
        }
    }

    /// Dispatch all pending events to a listener.
    /// Called once per frame from the UI loop.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }

    /// Take every pending event without blocking.
    pub fn drain(&self) -> Vec<Event> {
        self.rx.try_iter().collect()
    }
}

/// Trait for components that respond to events.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use detective_core::{NodeId, Properties};

    #[test]
    fn test_event_bus_publish_receive() {
        let bus = EventBus::new();
        let node = GraphNode::new(NodeId::new("n1"), vec!["Suspect".into()], Properties::new());
        bus.sender()
            .send(Event::GraphFetched {
                level: 3,
                nodes: vec![node],
                edges: Vec::new(),
            })
            .unwrap();

        match bus.receiver().recv().unwrap() {
            Event::GraphFetched { level, nodes, edges } => {
                assert_eq!(level, 3);
                assert_eq!(nodes.len(), 1);
                assert!(edges.is_empty());
            }
            other => panic!("Expected GraphFetched, got {other:?}"),
        }
    }

    struct Recorder {
        levels: Vec<u32>,
        errors: Vec<String>,
    }

    impl EventListener for Recorder {
        fn handle_event(&mut self, event: &Event) {
            match event {
                Event::LevelCompleted { level } => self.levels.push(*level),
                Event::GraphFetchFailed { message, .. } => self.errors.push(message.clone()),
                _ => {}
            }
        }
    }

    #[test]
    fn test_dispatch_preserves_order() {
        let bus = EventBus::new();
        bus.publish(Event::LevelCompleted { level: 1 });
        bus.publish(Event::GraphFetchFailed {
            level: 2,
            message: "connection refused".into(),
        });
        bus.publish(Event::LevelCompleted { level: 2 });

        let mut recorder = Recorder {
            levels: Vec::new(),
            errors: Vec::new(),
        };
        bus.dispatch_to(&mut recorder);
        assert_eq!(recorder.levels, vec![1, 2]);
        assert_eq!(recorder.errors, vec!["connection refused".to_string()]);
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_outcome_attempt_accounting() {
        assert!(QueryOutcome::Mismatch { records: vec![] }.counts_as_attempt());
        assert!(
            QueryOutcome::Failed {
                message: "syntax".into()
            }
            .counts_as_attempt()
        );
        assert!(
            !QueryOutcome::Rejected {
                message: "DELETE".into()
            }
            .counts_as_attempt()
        );
        assert!(QueryOutcome::Match { records: vec![] }.is_match());
    }
}
