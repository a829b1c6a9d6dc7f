mod event;
mod sink;

pub use event::{Event, PayloadGraphUpdated, PayloadPathChanged, PayloadUpdateSuperseded};

pub use sink::EventSink;
