#![forbid(unsafe_code)]

//! Structured logging integration tests.
//!
//! Installs a capturing layer for the duration of each test and checks that
//! the protocol emits the events operators rely on.

use std::sync::{Arc, Mutex};

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use vicpower_runtime::broadcast::Broadcast;
use vicpower_runtime::tracker::{SectionSpec, SectionTracker};
use web_time::Instant;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: Level,
    message: String,
    fields: Vec<(String, String)>,
}

#[derive(Clone, Default)]
struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl EventCapture {
    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }
}

struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields
                .push((field.name().to_string(), format!("{value:?}")));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push((field.name().to_string(), value.to_string()));
        }
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor {
            message: String::new(),
            fields: Vec::new(),
        };
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

fn with_capture<R>(f: impl FnOnce() -> R) -> (R, Vec<CapturedEvent>) {
    let capture = EventCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, capture.events())
}

#[test]
fn listener_panic_is_logged_as_warning() {
    let (delivery, events) = with_capture(|| {
        let bus = Broadcast::<u8>::new();
        let _bad = bus.subscribe(|_| panic!("boom"));
        let _good = bus.subscribe(|_| {});
        bus.publish(&1)
    });

    assert_eq!(delivery.delivered, 1);
    let warning = events
        .iter()
        .find(|e| e.level == Level::WARN)
        .expect("warning emitted");
    assert!(warning.message.contains("listener panicked"));
    assert!(
        warning
            .fields
            .iter()
            .any(|(k, v)| k == "panic" && v.contains("boom"))
    );
}

#[test]
fn adoption_is_logged_at_debug() {
    let ((), events) = with_capture(|| {
        let tracker = SectionTracker::default();
        let _hero = tracker.mount(SectionSpec::with_id("hero"), Instant::now());
    });

    let adopted = events
        .iter()
        .find(|e| e.message == "active section adopted")
        .expect("adoption event");
    assert_eq!(adopted.level, Level::DEBUG);
    assert!(adopted.fields.iter().any(|(k, v)| k == "to" && v == "hero"));
    assert!(events.iter().any(|e| e.message == "section unmounted"));
}
