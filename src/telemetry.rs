use prometheus::register_int_counter_vec;
use prometheus::IntCounterVec;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref QUIZ_QUESTIONS_SERVED: IntCounterVec = register_int_counter_vec!(
        "quiz_questions_served_total",
        "Number of questions served by the quiz endpoint",
        &["category"]
    )
    .expect("quiz_questions_served_total is registered once");
}

const DEFAULT_DIRECTIVES: &str = "info,sqlx=warn";

/// `INCLUDE_SPAN_EVENTS=true` also logs span enter and exit.
fn span_events() -> FmtSpan {
    match std::env::var("INCLUDE_SPAN_EVENTS") {
        Ok(value) if value.eq_ignore_ascii_case("true") => FmtSpan::ENTER | FmtSpan::EXIT,
        _ => FmtSpan::NONE,
    }
}

/// Installs the global subscriber. Directives come from `LOG_LEVEL`, falling
/// back to `info,sqlx=warn` when it is unset or unparsable.
pub fn init_tracing() {
    let filter = match std::env::var("LOG_LEVEL") {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::try_new(&directives)
            .unwrap_or_else(|e| {
                eprintln!("Ignoring LOG_LEVEL={directives:?}: {e}");
                EnvFilter::new(DEFAULT_DIRECTIVES)
            }),
        _ => EnvFilter::new(DEFAULT_DIRECTIVES),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_span_events(span_events()))
        .init();
}
