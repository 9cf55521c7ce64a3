use std::fmt::Write as _;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{layer::Context, Layer, Registry};

use log_bucket::cli::{run, Cli};
use log_bucket::HookError;

/// Custom Layer to collect emitted events as `level name=value ...` lines.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

struct LineVisitor<'a>(&'a mut String);

impl Visit for LineVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let _ = write!(self.0, " {}={:?}", field.name(), value);
    }
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut line = event.metadata().level().to_string();
        event.record(&mut LineVisitor(&mut line));
        self.events.lock().unwrap().push(line);
    }
}

#[tokio::test]
async fn argument_count_mismatch_emits_one_error_event() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    let cli = Cli {
        args: vec!["/tmp/app.log".into()],
    };
    let err = run(cli).await.expect_err("one argument is not enough");
    assert!(matches!(
        err,
        HookError::ArgumentCount {
            expected: 3,
            actual: 1
        }
    ));

    let events = events.lock().unwrap();
    let errors: Vec<&String> = events.iter().filter(|e| e.starts_with("ERROR")).collect();
    assert_eq!(errors.len(), 1, "events: {events:?}");
    assert!(errors[0].contains("expected=3"), "got: {}", errors[0]);
    assert!(errors[0].contains("got=1"), "got: {}", errors[0]);
    assert!(
        errors[0].contains("kind=\"argument_count\""),
        "got: {}",
        errors[0]
    );
}
