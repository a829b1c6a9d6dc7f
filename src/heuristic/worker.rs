use std::thread::{self, JoinHandle};

use crossbeam::channel::{unbounded, Receiver, RecvError, TryRecvError};
use log::{debug, info, warn};

use super::{AttributePairStat, AttributePairs, UniqueValueCounts};
use crate::SettingsStats;

#[derive(Debug, Clone, PartialEq)]
pub enum StatMessage {
    Stat(Box<AttributePairStat>),
    /// Sent once after the last stat.
    Done,
}

/// Computes attribute pair stats on a thread of its own and streams them back one by one.
///
/// The worker owns its inputs. Dropping the receiving side, through [`StatWorker::terminate`]
/// or by dropping the worker, makes it stop at its next send.
pub struct StatWorker {
    receiver: Option<Receiver<StatMessage>>,
    handle: Option<JoinHandle<()>>,
}

impl StatWorker {
    pub fn spawn(
        source: UniqueValueCounts,
        target: UniqueValueCounts,
        settings: SettingsStats,
    ) -> Self {
        let (tx, rx) = unbounded();
        let handle = thread::spawn(move || {
            let start = instant::Instant::now();
            let pairs = AttributePairs::new(source, target, &settings);
            let total = pairs.len();
            info!("stat worker started: {total} attribute pairs");

            for stat in pairs {
                debug!("stat {} computed, score {}", stat.id, stat.score());
                if tx.send(StatMessage::Stat(Box::new(stat))).is_err() {
                    warn!("stat worker abandoned after {:?}", start.elapsed());
                    return;
                }
            }
            if tx.send(StatMessage::Done).is_err() {
                warn!("stat worker abandoned after {:?}", start.elapsed());
                return;
            }

            info!("stat worker finished {total} pairs in {:?}", start.elapsed());
        });

        Self {
            receiver: Some(rx),
            handle: Some(handle),
        }
    }

    /// Receiving side of the stream, `None` once terminated.
    pub fn receiver(&self) -> Option<&Receiver<StatMessage>> {
        self.receiver.as_ref()
    }

    /// Next message if one is ready.
    ///
    /// # Errors
    /// `TryRecvError::Empty` while nothing is pending. `TryRecvError::Disconnected` after
    /// termination or once the worker is gone and everything was received.
    pub fn try_recv(&self) -> Result<StatMessage, TryRecvError> {
        self.receiver
            .as_ref()
            .map_or(Err(TryRecvError::Disconnected), Receiver::try_recv)
    }

    /// Blocks until the next message arrives.
    ///
    /// # Errors
    /// `RecvError` after termination or once the worker is gone and everything was received.
    pub fn recv(&self) -> Result<StatMessage, RecvError> {
        self.receiver.as_ref().map_or(Err(RecvError), Receiver::recv)
    }

    /// Abandons the computation. Stats not yet received are lost.
    pub fn terminate(&mut self) {
        if self.receiver.take().is_some() {
            debug!("stat worker terminated");
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.receiver.is_none()
    }

    /// Waits for the worker thread to exit. Returns `false` if it panicked.
    pub fn join(mut self) -> bool {
        self.receiver.take();
        match self.handle.take() {
            Some(handle) => handle.join().is_ok(),
            None => true,
        }
    }
}
