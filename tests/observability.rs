use std::sync::{Arc, Mutex};

use collimate::engine::{
    collimate, CollimateObserver, CollimateOptions, CompositeObserver, EngineEvent,
};
use collimate::types::{RawValue, RowSet};

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<EngineEvent>>,
}

impl RecordingObserver {
    fn snapshot(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl CollimateObserver for RecordingObserver {
    fn on_event(&self, event: &EngineEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

fn sample_rows() -> RowSet {
    let colors = ["red", "green", "blue"];
    RowSet::new(
        vec!["color".to_string()],
        (0..30)
            .map(|i| vec![RawValue::from(colors[i % 3])])
            .collect(),
    )
}

#[test]
fn phases_are_reported_in_order() {
    let observer = Arc::new(RecordingObserver::default());
    let options = CollimateOptions {
        normalize_dates: false,
        observer: Some(observer.clone()),
    };
    collimate(&sample_rows(), &options);

    let events = observer.snapshot();
    let phases: Vec<&str> = events
        .iter()
        .map(|e| match e {
            EngineEvent::ScanStarted { .. } => "scan_started",
            EngineEvent::ScanFinished { .. } => "scan_finished",
            EngineEvent::PlanFinished { .. } => "plan_finished",
            EngineEvent::MaterializeStarted => "materialize_started",
            EngineEvent::MaterializeFinished { .. } => "materialize_finished",
            _ => "other",
        })
        .collect();
    assert_eq!(
        phases,
        [
            "scan_started",
            "scan_finished",
            "plan_finished",
            "materialize_started",
            "materialize_finished",
        ]
    );

    // The scan window covers the whole (small) row set, and exactly one column was
    // chosen for encoding.
    assert!(matches!(
        events[0],
        EngineEvent::ScanStarted { rows_total: 30, rows_scanned: 30 }
    ));
    assert!(matches!(events[2], EngineEvent::PlanFinished { encoded_columns: 1 }));
}

#[test]
fn structurally_empty_input_emits_nothing() {
    let observer = Arc::new(RecordingObserver::default());
    let options = CollimateOptions {
        normalize_dates: false,
        observer: Some(observer.clone()),
    };
    collimate(&RowSet::new(vec![], vec![]), &options);
    assert!(observer.snapshot().is_empty());
}

#[test]
fn composite_observer_fans_out() {
    let first = Arc::new(RecordingObserver::default());
    let second = Arc::new(RecordingObserver::default());
    let composite = CompositeObserver::new(vec![
        first.clone() as Arc<dyn CollimateObserver>,
        second.clone() as Arc<dyn CollimateObserver>,
    ]);

    let options = CollimateOptions {
        normalize_dates: false,
        observer: Some(Arc::new(composite)),
    };
    collimate(&sample_rows(), &options);

    assert_eq!(first.snapshot().len(), second.snapshot().len());
    assert!(!first.snapshot().is_empty());
}
