//! Parallel resolution of many independent names.
//!
//! Each name is resolved by exactly one worker with the same cascade as
//! [`IdentityResolver::resolve`]. Names do not influence each other: a parse
//! or directory failure for one input is reported on that input only.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use tracing::{debug, warn};

use crate::config::ResolverConfig;
use crate::directory::DirectoryClient;
use crate::error::{ResolveError, ResolveResult};
use crate::name::NameInput;
use crate::resolver::{IdentityResolver, Resolution};
use crate::tier::TierFilter;

/// Outcome for one input of a batch.
#[derive(Debug)]
pub struct BatchItem {
    /// Position of the input in the submitted sequence.
    pub index: usize,
    /// The input as submitted.
    pub input: NameInput,
    /// Resolution, or the error that stopped it.
    pub outcome: ResolveResult<Resolution>,
}

struct Job {
    index: usize,
    input: NameInput,
    filter: Option<TierFilter>,
    reply: Sender<BatchItem>,
}

struct WorkerPool {
    tx: Sender<Job>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    fn start(
        workers: usize,
        queue_capacity: usize,
        resolver: &Arc<IdentityResolver>,
        directory: &Arc<dyn DirectoryClient>,
    ) -> ResolveResult<Self> {
        let workers = workers.max(1);
        let (tx, rx) = bounded::<Job>(queue_capacity.max(1));

        let mut handles = Vec::with_capacity(workers);
        for idx in 0..workers {
            let rx: Receiver<Job> = rx.clone();
            let resolver = Arc::clone(resolver);
            let directory = Arc::clone(directory);
            let handle = thread::Builder::new()
                .name(format!("dirmatch-batch-{idx}"))
                .spawn(move || {
                    while let Ok(job) = rx.recv() {
                        let outcome =
                            resolver.resolve(job.input.clone(), directory.as_ref(), job.filter);
                        let _ = job.reply.send(BatchItem {
                            index: job.index,
                            input: job.input,
                            outcome,
                        });
                    }
                })
                .map_err(|e| ResolveError::batch(format!("failed to spawn worker: {e}")))?;
            handles.push(handle);
        }

        Ok(Self {
            tx,
            workers: handles,
        })
    }

    fn shutdown(self) {
        // Closing the channel lets workers drain queued jobs, then exit.
        drop(self.tx);
        for handle in self.workers {
            if handle.join().is_err() {
                warn!("batch worker panicked");
            }
        }
    }
}

/// Resolves batches of names on a bounded pool of worker threads.
///
/// Dropping the resolver stops and joins its workers.
pub struct BatchResolver {
    pool: Option<WorkerPool>,
    filter: Option<TierFilter>,
}

impl BatchResolver {
    /// Starts `config.workers` threads sharing `resolver` and `directory`.
    pub fn new(
        resolver: IdentityResolver,
        directory: Arc<dyn DirectoryClient>,
        config: &ResolverConfig,
    ) -> ResolveResult<Self> {
        let pool = WorkerPool::start(
            config.workers,
            config.queue_capacity,
            &Arc::new(resolver),
            &directory,
        )?;
        Ok(Self {
            pool: Some(pool),
            filter: None,
        })
    }

    /// Applies `filter` to every resolution of subsequent batches.
    #[must_use]
    pub fn with_filter(mut self, filter: TierFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Resolves every name and returns one item per input, in input order.
    ///
    /// Blocks while the job queue is full.
    pub fn resolve_all<I, N>(&self, names: I) -> Vec<BatchItem>
    where
        I: IntoIterator<Item = N>,
        N: Into<NameInput>,
    {
        let (reply_tx, reply_rx) = unbounded::<BatchItem>();
        let mut inputs: Vec<Option<NameInput>> = Vec::new();
        let mut items: Vec<BatchItem> = Vec::new();

        for (index, name) in names.into_iter().enumerate() {
            let input = name.into();
            inputs.push(Some(input.clone()));
            let job = Job {
                index,
                input,
                filter: self.filter,
                reply: reply_tx.clone(),
            };
            let sent = match &self.pool {
                Some(pool) => pool.tx.send(job).map_err(|e| e.into_inner()),
                None => Err(job),
            };
            if let Err(job) = sent {
                inputs[index] = None;
                items.push(BatchItem {
                    index,
                    input: job.input,
                    outcome: Err(ResolveError::batch("worker pool is shut down")),
                });
            }
        }
        drop(reply_tx);

        for item in reply_rx {
            if let Some(slot) = inputs.get_mut(item.index) {
                *slot = None;
            }
            items.push(item);
        }

        // Inputs still present here belong to a worker that died mid-job.
        for (index, input) in inputs.into_iter().enumerate() {
            if let Some(input) = input {
                items.push(BatchItem {
                    index,
                    input,
                    outcome: Err(ResolveError::batch("worker exited before replying")),
                });
            }
        }

        items.sort_by_key(|item| item.index);
        debug!(count = items.len(), "batch resolved");
        items
    }
}

impl Drop for BatchResolver {
    fn drop(&mut self) {
        if let Some(pool) = self.pool.take() {
            pool.shutdown();
        }
    }
}
