// ── Payload outbox ──
//
// Holds the last payload the editor pushed to the parent and broadcasts
// new ones over a `watch` channel. A payload structurally equal to the
// previous one is never sent twice.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::trace;

use crate::model::{AvailabilityPayload, FormState};

#[derive(Debug)]
pub(crate) struct PayloadOutbox {
    /// Last emitted payload, owned here so echo detection never has to
    /// infer it from the parent.
    last: Option<AvailabilityPayload>,

    /// The same payload as the parent sees it, for echo comparison.
    last_as_form: Option<FormState>,

    /// Emission counter, bumped on every send.
    version: watch::Sender<u64>,

    /// Latest payload for subscribers.
    latest: watch::Sender<Option<Arc<AvailabilityPayload>>>,
}

impl PayloadOutbox {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (latest, _) = watch::channel(None);
        Self {
            last: None,
            last_as_form: None,
            version,
            latest,
        }
    }

    /// Send `payload` unless it equals the last one. Returns `true` if sent.
    pub(crate) fn offer(&mut self, payload: AvailabilityPayload) -> bool {
        if self.last.as_ref() == Some(&payload) {
            trace!("payload unchanged, not emitting");
            return false;
        }
        let shared = Arc::new(payload.clone());
        self.last_as_form = Some(FormState::from(&payload));
        self.last = Some(payload);
        // `send_modify` updates unconditionally, even with zero receivers.
        self.latest.send_modify(|slot| *slot = Some(shared));
        self.version.send_modify(|v| *v += 1);
        trace!(emissions = *self.version.borrow(), "payload emitted");
        true
    }

    /// Whether `form` is exactly what the editor last emitted.
    pub(crate) fn is_echo(&self, form: &FormState) -> bool {
        self.last_as_form.as_ref() == Some(form)
    }

    pub(crate) fn last(&self) -> Option<&AvailabilityPayload> {
        self.last.as_ref()
    }

    pub(crate) fn emissions(&self) -> u64 {
        *self.version.borrow()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Option<Arc<AvailabilityPayload>>> {
        self.latest.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::ScheduleMode;

    fn payload(mode: ScheduleMode) -> AvailabilityPayload {
        AvailabilityPayload {
            tipo_disponibilidad: mode,
            ..AvailabilityPayload::default()
        }
    }

    #[test]
    fn offer_sends_first_payload() {
        let mut outbox = PayloadOutbox::new();
        assert!(outbox.offer(payload(ScheduleMode::Shifts)));
        assert_eq!(outbox.emissions(), 1);
    }

    #[test]
    fn offer_skips_equal_payload() {
        let mut outbox = PayloadOutbox::new();
        outbox.offer(payload(ScheduleMode::Shifts));
        assert!(!outbox.offer(payload(ScheduleMode::Shifts)));
        assert_eq!(outbox.emissions(), 1);
    }

    #[test]
    fn subscribers_see_latest() {
        let mut outbox = PayloadOutbox::new();
        let rx = outbox.subscribe();
        outbox.offer(payload(ScheduleMode::Shifts));
        outbox.offer(payload(ScheduleMode::ByRequest));
        let seen = rx.borrow().clone().unwrap();
        assert_eq!(seen.tipo_disponibilidad, ScheduleMode::ByRequest);
    }

    #[test]
    fn echo_matches_form_view_of_last_payload() {
        let mut outbox = PayloadOutbox::new();
        let sent = payload(ScheduleMode::Shifts);
        outbox.offer(sent.clone());
        assert!(outbox.is_echo(&FormState::from(&sent)));
        assert!(!outbox.is_echo(&FormState::default()));
    }
}
