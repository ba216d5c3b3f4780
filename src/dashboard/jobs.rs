use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread;

use crate::alerts::{Alert, AlertStats, AlertsListResponse, AnalyseResult, ApiError, IngestResult};

/// Correlates a network request with the message that completes it.
pub type RequestId = u64;

#[derive(Debug)]
pub(crate) enum JobMessage {
    StatsLoaded {
        request_id: RequestId,
        result: Result<AlertStats, ApiError>,
    },
    AlertsLoaded {
        request_id: RequestId,
        result: Result<AlertsListResponse, ApiError>,
    },
    AlertLoaded {
        request_id: RequestId,
        alert_id: i64,
        result: Result<Alert, ApiError>,
    },
    IngestFinished {
        result: Result<IngestResult, ApiError>,
    },
    AnalyseFinished {
        result: Result<AnalyseResult, ApiError>,
    },
}

/// Where queued network work runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobMode {
    /// Each job runs on its own named thread.
    Threaded,
    /// Jobs wait in a queue until the owner runs them.
    Deferred,
}

/// Run a network call, turning a panic into a transport failure.
pub(crate) fn guarded<T>(
    label: &str,
    call: impl FnOnce() -> Result<T, ApiError>,
) -> Result<T, ApiError> {
    panic::catch_unwind(AssertUnwindSafe(call))
        .unwrap_or_else(|_| Err(ApiError::Transport(format!("{label} request panicked"))))
}

type Job = Box<dyn FnOnce() -> JobMessage + Send + 'static>;

pub(crate) struct ControllerJobs {
    mode: JobMode,
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
    deferred: VecDeque<(&'static str, Job)>,
    next_request_id: RequestId,
    outstanding: usize,
}

impl ControllerJobs {
    pub(crate) fn new(mode: JobMode) -> Self {
        let (message_tx, message_rx) = std::sync::mpsc::channel::<JobMessage>();
        Self {
            mode,
            message_tx,
            message_rx,
            deferred: VecDeque::new(),
            next_request_id: 1,
            outstanding: 0,
        }
    }

    pub(crate) fn next_request_id(&mut self) -> RequestId {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Queue `job`; its message arrives through [`Self::try_recv_message`].
    pub(crate) fn spawn<F>(&mut self, label: &'static str, job: F)
    where
        F: FnOnce() -> JobMessage + Send + 'static,
    {
        self.outstanding += 1;
        match self.mode {
            JobMode::Deferred => self.deferred.push_back((label, Box::new(job))),
            JobMode::Threaded => {
                let tx = self.message_tx.clone();
                let job: Job = Box::new(job);
                // The job travels over a channel so it survives a failed spawn.
                let (job_tx, job_rx) = std::sync::mpsc::channel::<Job>();
                let spawned = thread::Builder::new()
                    .name(format!("regsense-{label}"))
                    .spawn(move || {
                        if let Ok(job) = job_rx.recv() {
                            let _ = tx.send(job());
                        }
                    });
                match spawned {
                    Ok(_) => {
                        let _ = job_tx.send(job);
                    }
                    Err(err) => {
                        tracing::error!("Failed to spawn {label} job thread: {err}; running inline");
                        let _ = self.message_tx.send(job());
                    }
                }
            }
        }
    }

    pub(crate) fn try_recv_message(&mut self) -> Result<JobMessage, TryRecvError> {
        let message = self.message_rx.try_recv()?;
        self.outstanding = self.outstanding.saturating_sub(1);
        Ok(message)
    }

    /// Run the oldest deferred job. Returns false when the queue is empty.
    pub(crate) fn run_next_deferred(&mut self) -> bool {
        let Some((label, job)) = self.deferred.pop_front() else {
            return false;
        };
        tracing::trace!("Running deferred {label} job");
        let _ = self.message_tx.send(job());
        true
    }

    /// Run every deferred job queued so far, oldest first.
    pub(crate) fn run_deferred(&mut self) -> usize {
        let mut ran = 0;
        while self.run_next_deferred() {
            ran += 1;
        }
        ran
    }

    #[cfg(test)]
    pub(crate) fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    /// Jobs whose message has not been drained yet.
    pub(crate) fn outstanding(&self) -> usize {
        self.outstanding
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn ingest_ok() -> JobMessage {
        JobMessage::IngestFinished {
            result: Ok(IngestResult::default()),
        }
    }

    #[test]
    fn deferred_jobs_wait_until_run() {
        let mut jobs = ControllerJobs::new(JobMode::Deferred);
        jobs.spawn("ingest", ingest_ok);
        assert_eq!(jobs.deferred_len(), 1);
        assert!(jobs.try_recv_message().is_err());
        assert_eq!(jobs.outstanding(), 1);

        assert_eq!(jobs.run_deferred(), 1);
        assert!(matches!(
            jobs.try_recv_message(),
            Ok(JobMessage::IngestFinished { result: Ok(_) })
        ));
        assert_eq!(jobs.outstanding(), 0);
    }

    #[test]
    fn threaded_jobs_deliver_messages() {
        let mut jobs = ControllerJobs::new(JobMode::Threaded);
        jobs.spawn("ingest", ingest_ok);
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if jobs.try_recv_message().is_ok() {
                break;
            }
            assert!(Instant::now() < deadline, "job message never arrived");
            thread::sleep(Duration::from_millis(2));
        }
        assert_eq!(jobs.outstanding(), 0);
    }

    #[test]
    fn guarded_maps_panic_to_transport_error() {
        let result: Result<u32, ApiError> = guarded("stats", || panic!("backend exploded"));
        assert_eq!(
            result,
            Err(ApiError::Transport("stats request panicked".into()))
        );
        assert_eq!(guarded("stats", || Ok::<_, ApiError>(3)), Ok(3));
    }

    #[test]
    fn request_ids_increase() {
        let mut jobs = ControllerJobs::new(JobMode::Deferred);
        let first = jobs.next_request_id();
        assert!(jobs.next_request_id() > first);
    }
}
