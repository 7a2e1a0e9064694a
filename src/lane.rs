//! One player's worker thread in two-player mode.
//!
//! A lane runs at most one level at a time.  Levels are submitted over a job
//! channel and their outcome comes back over a result channel, so the owner
//! can check for completion with a non-blocking `try_recv` every frame.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::error::{GameError, Result};
use crate::state::GameState;

pub type LevelJob = Box<dyn FnOnce() -> Result<GameState> + Send>;

pub struct LaneWorker {
    index: usize,
    jobs: Option<Sender<LevelJob>>,
    results: Receiver<Result<GameState>>,
    handle: Option<JoinHandle<()>>,
    busy: bool,
}

impl LaneWorker {
    pub fn spawn(index: usize) -> Result<Self> {
        let (job_tx, job_rx) = mpsc::channel::<LevelJob>();
        let (result_tx, result_rx) = mpsc::channel::<Result<GameState>>();

        let handle = thread::Builder::new()
            .name(format!("lane-{}", index + 1))
            .spawn(move || {
                for job in job_rx {
                    let result = panic::catch_unwind(AssertUnwindSafe(job))
                        .unwrap_or(Err(GameError::LanePanicked(index)));
                    if result_tx.send(result).is_err() {
                        break; // owner dropped → nobody is listening
                    }
                }
            })?;

        Ok(Self {
            index,
            jobs: Some(job_tx),
            results: result_rx,
            handle: Some(handle),
            busy: false,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// A level is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn submit(&mut self, job: LevelJob) -> Result<()> {
        let jobs = self
            .jobs
            .as_ref()
            .ok_or(GameError::LaneDisconnected(self.index))?;
        jobs.send(job)
            .map_err(|_| GameError::LaneDisconnected(self.index))?;
        self.busy = true;
        Ok(())
    }

    /// Non-blocking completion check for the level in flight.
    pub fn try_result(&mut self) -> Option<Result<GameState>> {
        if !self.busy {
            return None;
        }
        match self.results.try_recv() {
            Ok(result) => {
                self.busy = false;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.busy = false;
                Some(Err(GameError::LaneDisconnected(self.index)))
            }
        }
    }

    /// Close the job channel and join the thread.  Blocks until a level still
    /// in flight has finished.
    pub fn shutdown(&mut self) -> Result<()> {
        self.jobs = None;
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| GameError::LanePanicked(self.index)),
            None => Ok(()),
        }
    }
}

impl Drop for LaneWorker {
    fn drop(&mut self) {
        self.jobs = None;
        // An idle worker exits as soon as its channel closes; a busy one is
        // left to finish its level on its own.
        if !self.busy {
            if let Some(handle) = self.handle.take() {
                let _ = handle.join();
            }
        }
    }
}
