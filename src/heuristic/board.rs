use std::cell::OnceCell;
use std::collections::HashMap;

use crossbeam::channel::{Receiver, TryRecvError};
use log::debug;

use super::{Attr, AttributePairStat, StatMessage};
use crate::{Error, Result};

/// Accumulates streamed stats and answers which pairing looks best so far.
#[derive(Debug, Default)]
pub struct StatBoard {
    stats: HashMap<String, AttributePairStat>,
    // ids by descending score, rebuilt on demand after every insertion
    sorted: OnceCell<Vec<String>>,
    source_attr: Option<Attr>,
    target_attr: Option<Attr>,
    finished: bool,
}

impl StatBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// Returns [`Error::DuplicateStat`] when a stat with the same id was already received.
    pub fn insert(&mut self, stat: AttributePairStat) -> Result<()> {
        if self.stats.contains_key(&stat.id) {
            return Err(Error::DuplicateStat(stat.id));
        }
        self.sorted.take();
        self.stats.insert(stat.id.clone(), stat);
        Ok(())
    }

    /// # Errors
    /// See [`StatBoard::insert`].
    pub fn handle(&mut self, message: StatMessage) -> Result<()> {
        match message {
            StatMessage::Stat(stat) => self.insert(*stat),
            StatMessage::Done => {
                debug!("stat board finished with {} stats", self.stats.len());
                self.finished = true;
                Ok(())
            }
        }
    }

    /// Takes every message that is ready without blocking. Returns how many were taken.
    ///
    /// # Errors
    /// [`Error::WorkerDisconnected`] when the sender went away without finishing, or a duplicate
    /// stat.
    pub fn drain(&mut self, receiver: &Receiver<StatMessage>) -> Result<usize> {
        let mut taken = 0;
        while !self.finished {
            match receiver.try_recv() {
                Ok(message) => {
                    self.handle(message)?;
                    taken += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Err(Error::WorkerDisconnected),
            }
        }
        Ok(taken)
    }

    /// Blocks until the stream is finished.
    ///
    /// # Errors
    /// See [`StatBoard::drain`].
    pub fn drain_blocking(&mut self, receiver: &Receiver<StatMessage>) -> Result<()> {
        while !self.finished {
            let message = receiver.recv().map_err(|_| Error::WorkerDisconnected)?;
            self.handle(message)?;
        }
        Ok(())
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&AttributePairStat> {
        self.stats.get(id)
    }

    /// Ids by descending score; ties are ordered by id.
    pub fn sorted_ids(&self) -> &[String] {
        self.sorted.get_or_init(|| {
            let mut ids: Vec<&AttributePairStat> = self.stats.values().collect();
            ids.sort_by(|a, b| b.score().total_cmp(&a.score()).then_with(|| a.id.cmp(&b.id)));
            ids.into_iter().map(|s| s.id.clone()).collect()
        })
    }

    pub fn best(&self) -> Option<&AttributePairStat> {
        self.sorted_ids().first().and_then(|id| self.stats.get(id))
    }

    pub fn select_source(&mut self, attr: Attr) {
        self.source_attr = Some(attr);
    }

    pub fn select_target(&mut self, attr: Attr) {
        self.target_attr = Some(attr);
    }

    /// Selects both attributes of a received stat.
    pub fn select(&mut self, id: &str) -> bool {
        let Some(stat) = self.stats.get(id) else {
            return false;
        };
        self.source_attr = Some(stat.source_attr.clone());
        self.target_attr = Some(stat.target_attr.clone());
        true
    }

    /// The selected source attribute, or the best stat's.
    pub fn source_attribute(&self) -> Option<Attr> {
        self.source_attr
            .clone()
            .or_else(|| self.best().map(|s| s.source_attr.clone()))
    }

    /// The selected target attribute, or the best stat's.
    pub fn target_attribute(&self) -> Option<Attr> {
        self.target_attr
            .clone()
            .or_else(|| self.best().map(|s| s.target_attr.clone()))
    }

    pub fn current_stat_id(&self) -> Option<String> {
        Some(AttributePairStat::pair_id(
            &self.source_attribute()?,
            &self.target_attribute()?,
        ))
    }

    /// Stat of the current selection, `None` until it has been received.
    pub fn current_stat(&self) -> Option<&AttributePairStat> {
        self.stats.get(&self.current_stat_id()?)
    }

    /// Smallest and largest of all one-to-one-ness scores and their sums, always spanning `0`.
    pub fn score_domain(&self) -> (f64, f64) {
        let init = (0.0, if self.stats.is_empty() { 1.0 } else { 0.0 });
        self.stats.values().fold(init, |(lo, hi), s| {
            let (a, b, sum) = (s.source_one_to_one_ness, s.target_one_to_one_ness, s.score());
            (lo.min(a).min(b).min(sum), hi.max(a).max(b).max(sum))
        })
    }
}
