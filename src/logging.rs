//! `tracing` layer that appends timestamped log lines to an injected sink,
//! typically the project's run log file.
use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex};

use tracing::{Event, Subscriber, field::Visit};
use tracing_subscriber::layer::{Context, Layer};

pub struct RunLogLayer<W> {
    sink: Arc<Mutex<W>>,
    min_level: tracing::Level,
}

impl<W: Write + Send + 'static> RunLogLayer<W> {
    /// Log INFO and above to `sink`.
    pub fn new(sink: Arc<Mutex<W>>) -> Self {
        Self {
            sink,
            min_level: tracing::Level::INFO,
        }
    }

    pub fn with_min_level(mut self, level: tracing::Level) -> Self {
        self.min_level = level;
        self
    }
}

struct MessageVisitor {
    message: String,
}

impl MessageVisitor {
    fn new() -> Self {
        Self {
            message: String::new(),
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }
}

impl<S, W> Layer<S> for RunLogLayer<W>
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    W: Write + Send + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        // Level ordering is by verbosity: TRACE > DEBUG > INFO > WARN > ERROR.
        if *metadata.level() > self.min_level {
            return;
        }

        let mut visitor = MessageVisitor::new();
        event.record(&mut visitor);

        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        if let Ok(mut sink) = self.sink.lock() {
            // Sink errors are ignored.
            let _ = writeln!(
                sink,
                "{} {:>5} {}: {}",
                timestamp,
                metadata.level().to_string(),
                metadata.target(),
                visitor.message
            );
            let _ = sink.flush();
        }
    }
}
