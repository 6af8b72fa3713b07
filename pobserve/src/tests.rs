use std::sync::{Arc, Mutex};
use std::time::Duration;

use pprovider::{ProviderError, ProviderId, ProviderOperationHooks};

use crate::{
    CompositeProviderHooks, MetricsObservabilityHooks, SafeProviderHooks,
    TracingObservabilityHooks,
};

fn exercise_all_callbacks(hooks: &dyn ProviderOperationHooks) {
    let rate_limited = ProviderError::rate_limited("rate limit exceeded: quota");
    let transport = ProviderError::transport("connection reset");

    hooks.on_attempt_start(ProviderId::Gemini, "send", 1, 0);
    hooks.on_credential_rotated(
        ProviderId::Gemini,
        "send",
        1,
        0,
        1,
        Duration::from_millis(10),
        &rate_limited,
    );
    hooks.on_success(ProviderId::Gemini, "send", 2);
    hooks.on_failure(ProviderId::Gemini, "send", 1, &transport);
    hooks.on_retries_exhausted(ProviderId::Gemini, "send", 2, &rate_limited);
}

#[test]
fn tracing_hooks_smoke_test_all_callbacks() {
    exercise_all_callbacks(&TracingObservabilityHooks);
}

#[test]
fn metrics_hooks_smoke_test_all_callbacks() {
    exercise_all_callbacks(&MetricsObservabilityHooks);
}

#[derive(Default, Clone)]
struct RecordingProviderHooks {
    events: Arc<Mutex<Vec<&'static str>>>,
}

impl ProviderOperationHooks for RecordingProviderHooks {
    fn on_attempt_start(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempt: u32,
        _credential_index: usize,
    ) {
        self.events
            .lock()
            .expect("events lock")
            .push("attempt_start");
    }

    fn on_credential_rotated(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempt: u32,
        _from_index: usize,
        _to_index: usize,
        _delay: Duration,
        _error: &ProviderError,
    ) {
        self.events.lock().expect("events lock").push("rotated");
    }

    fn on_success(&self, _provider: ProviderId, _operation: &str, _attempts: u32) {
        self.events.lock().expect("events lock").push("success");
    }

    fn on_failure(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempts: u32,
        _error: &ProviderError,
    ) {
        self.events.lock().expect("events lock").push("failure");
    }

    fn on_retries_exhausted(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempts: u32,
        _error: &ProviderError,
    ) {
        self.events.lock().expect("events lock").push("exhausted");
    }
}

struct PanicProviderHooks;

impl ProviderOperationHooks for PanicProviderHooks {
    fn on_attempt_start(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempt: u32,
        _credential_index: usize,
    ) {
        panic!("attempt_start panic");
    }

    fn on_credential_rotated(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempt: u32,
        _from_index: usize,
        _to_index: usize,
        _delay: Duration,
        _error: &ProviderError,
    ) {
        panic!("rotated panic");
    }

    fn on_success(&self, _provider: ProviderId, _operation: &str, _attempts: u32) {
        panic!("success panic");
    }

    fn on_failure(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempts: u32,
        _error: &ProviderError,
    ) {
        panic!("failure panic");
    }

    fn on_retries_exhausted(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempts: u32,
        _error: &ProviderError,
    ) {
        panic!("exhausted panic");
    }
}

#[test]
fn safe_provider_hooks_delegate_when_inner_succeeds() {
    let inner = RecordingProviderHooks::default();
    let events = Arc::clone(&inner.events);
    let hooks = SafeProviderHooks::new(inner);

    exercise_all_callbacks(&hooks);

    assert_eq!(
        *events.lock().expect("events lock"),
        vec!["attempt_start", "rotated", "success", "failure", "exhausted"]
    );
}

#[test]
fn safe_provider_hooks_swallow_panics() {
    let hooks = SafeProviderHooks::new(PanicProviderHooks);
    exercise_all_callbacks(&hooks);
}

#[test]
fn composite_hooks_forward_to_every_member_in_order() {
    let first = RecordingProviderHooks::default();
    let second = RecordingProviderHooks::default();
    let first_events = Arc::clone(&first.events);
    let second_events = Arc::clone(&second.events);

    let hooks = CompositeProviderHooks::new()
        .with(first)
        .with(SafeProviderHooks::new(PanicProviderHooks))
        .with(second);
    assert_eq!(hooks.len(), 3);

    exercise_all_callbacks(&hooks);

    assert_eq!(first_events.lock().expect("events lock").len(), 5);
    assert_eq!(
        *first_events.lock().expect("events lock"),
        *second_events.lock().expect("events lock")
    );
}

#[test]
fn empty_composite_is_a_noop() {
    let hooks = CompositeProviderHooks::new();
    assert!(hooks.is_empty());
    exercise_all_callbacks(&hooks);
}
