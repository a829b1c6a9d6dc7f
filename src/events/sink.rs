use crossbeam::channel::Sender;

use super::Event;

/// Receiver of notifications published by the store and the path specification.
///
/// Works with `crossbeam::channel::Sender<Event>`, closures `Fn(Event)`, or custom
/// implementations.
pub trait EventSink: Send + Sync {
    fn send(&self, event: Event);
}

impl EventSink for Sender<Event> {
    fn send(&self, event: Event) {
        // A dropped receiver means nobody observes anymore.
        let _ = Sender::send(self, event);
    }
}

impl<F> EventSink for F
where
    F: Fn(Event) + Send + Sync,
{
    fn send(&self, event: Event) {
        self(event);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crossbeam::channel::unbounded;

    use super::*;
    use crate::events::PayloadPathChanged;

    fn path_event() -> Event {
        Event::PathChanged(PayloadPathChanged {
            path: vec!["root".to_string()],
        })
    }

    #[test]
    fn channel_sink_delivers() {
        let (tx, rx) = unbounded();
        EventSink::send(&tx, path_event());
        assert_eq!(rx.try_recv().unwrap(), path_event());
    }

    #[test]
    fn channel_sink_ignores_dropped_receiver() {
        let (tx, rx) = unbounded::<Event>();
        drop(rx);
        EventSink::send(&tx, path_event());
    }

    #[test]
    fn closure_sink_delivers() {
        let seen = Mutex::new(Vec::new());
        let sink = |e: Event| seen.lock().unwrap().push(e);
        EventSink::send(&sink, path_event());
        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
