// Copyright 2026 The Catlynet Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Runs the layout engine off the interactive thread.
//!
//! A `LayoutService` owns at most one worker thread. The worker streams
//! progress and a single completion message over a channel; the interactive
//! thread drains it with `poll()` (or `wait()` when blocking is acceptable).

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Instant;

use crate::common::{Error, ErrorCode, ErrorKind, Result};
use crate::graph::{CoordinateMap, ReactionGraph};
use crate::layout::{LayoutConfig, LayoutOutcome, ProgressListener, compute_layout};
use crate::layout_err;

/// Receives user-facing warnings and errors.
pub trait Notifier {
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

/// Shows the running task and its progress.
pub trait StatusDisplay {
    fn set_task(&self, task: &str);
    fn set_progress(&self, done: usize, total: usize);
}

/// Routes notifications to the `log` facade.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn warning(&self, message: &str) {
        log::warn!("{message}");
    }

    fn error(&self, message: &str) {
        log::error!("{message}");
    }
}

/// Routes status updates to the `log` facade at debug level.
pub struct LogStatus;

impl StatusDisplay for LogStatus {
    fn set_task(&self, task: &str) {
        log::debug!("{task}");
    }

    fn set_progress(&self, done: usize, total: usize) {
        log::trace!("progress {done}/{total}");
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutState {
    Idle,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

/// Result of one layout run as seen by the interactive thread.
#[derive(Clone, Debug, PartialEq)]
pub enum LayoutCompletion {
    Succeeded(CoordinateMap),
    /// Carries the partial coordinates, if any were produced.
    Cancelled(Option<CoordinateMap>),
    Failed(Error),
}

enum WorkerMessage {
    Progress { done: usize, total: usize },
    Done(LayoutCompletion),
}

/// Progress listener living on the worker thread.
struct ChannelProgress {
    sender: Sender<WorkerMessage>,
    cancel: Arc<AtomicBool>,
}

impl ProgressListener for ChannelProgress {
    fn set_progress(&self, done: usize, total: usize) {
        if self.sender.send(WorkerMessage::Progress { done, total }).is_err() {
            // nobody is listening any more
            self.cancel.store(true, Ordering::Relaxed);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}

struct Run {
    receiver: Receiver<WorkerMessage>,
    cancel: Arc<AtomicBool>,
    worker: Option<thread::JoinHandle<()>>,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn into_completion(result: thread::Result<Result<LayoutOutcome>>) -> LayoutCompletion {
    match result {
        Ok(Ok(LayoutOutcome::Finished(coords))) => LayoutCompletion::Succeeded(coords),
        Ok(Ok(LayoutOutcome::Cancelled { partial, .. })) => {
            LayoutCompletion::Cancelled(if partial.is_empty() { None } else { Some(partial) })
        }
        Ok(Err(err)) => LayoutCompletion::Failed(err),
        Err(payload) => LayoutCompletion::Failed(Error::new(
            ErrorKind::Layout,
            ErrorCode::LayoutPanicked,
            Some(panic_message(payload.as_ref())),
        )),
    }
}

/// State machine `Idle -> Running -> {Succeeded, Failed, Cancelled}` around
/// a single background layout run.
pub struct LayoutService {
    state: LayoutState,
    run: Option<Run>,
    progress: (usize, usize),
}

impl Default for LayoutService {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutService {
    pub fn new() -> Self {
        LayoutService {
            state: LayoutState::Idle,
            run: None,
            progress: (0, 0),
        }
    }

    pub fn state(&self) -> LayoutState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LayoutState::Running
    }

    /// Last progress reported by the worker, as `(done, total)`.
    pub fn progress(&self) -> (usize, usize) {
        self.progress
    }

    /// Spawn a worker laying out `graph`. Returns immediately; fails if a
    /// run is already in flight.
    pub fn start(&mut self, graph: Arc<ReactionGraph>, config: LayoutConfig) -> Result<()> {
        if self.is_running() {
            return layout_err!(
                LayoutInFlight,
                "a layout computation is already running".to_string()
            );
        }

        let (sender, receiver) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let listener = ChannelProgress {
            sender: sender.clone(),
            cancel: cancel.clone(),
        };

        let spawned = thread::Builder::new()
            .name("catlynet-layout".to_string())
            .spawn(move || {
                let started = Instant::now();
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    compute_layout(&graph, &config, &listener)
                }));
                log::debug!(
                    "layout of {} nodes finished in {:?}",
                    graph.node_count(),
                    started.elapsed()
                );
                let _ = sender.send(WorkerMessage::Done(into_completion(result)));
            });

        let worker = match spawned {
            Ok(handle) => handle,
            Err(err) => return layout_err!(ThreadPool, err.to_string()),
        };

        self.run = Some(Run {
            receiver,
            cancel,
            worker: Some(worker),
        });
        self.progress = (0, 0);
        self.state = LayoutState::Running;
        Ok(())
    }

    /// Ask the running worker to stop at its next iteration boundary. The
    /// partial result still arrives through `poll()`.
    pub fn cancel(&self) {
        if let Some(run) = &self.run {
            run.cancel.store(true, Ordering::Relaxed);
        }
    }

    /// Cancel the current run and discard its result. Blocks until the
    /// worker has exited, which takes at most one iteration, so a following
    /// `start()` never overlaps with it.
    pub fn abandon(&mut self) {
        if let Some(mut run) = self.run.take() {
            run.cancel.store(true, Ordering::Relaxed);
            log::debug!("abandoning layout run");
            if let Some(worker) = run.worker.take() {
                let _ = worker.join();
            }
        }
        self.state = LayoutState::Idle;
        self.progress = (0, 0);
    }

    fn handle(
        &mut self,
        message: WorkerMessage,
        status: &dyn StatusDisplay,
    ) -> Option<LayoutCompletion> {
        match message {
            WorkerMessage::Progress { done, total } => {
                self.progress = (done, total);
                status.set_progress(done, total);
                None
            }
            WorkerMessage::Done(completion) => Some(self.finish(completion)),
        }
    }

    fn finish(&mut self, completion: LayoutCompletion) -> LayoutCompletion {
        if let Some(mut run) = self.run.take()
            && let Some(worker) = run.worker.take()
        {
            // the worker has sent its last message; joining won't block long
            let _ = worker.join();
        }
        self.state = match &completion {
            LayoutCompletion::Succeeded(_) => LayoutState::Succeeded,
            LayoutCompletion::Cancelled(_) => LayoutState::Cancelled,
            LayoutCompletion::Failed(_) => LayoutState::Failed,
        };
        completion
    }

    fn disconnected(&mut self) -> LayoutCompletion {
        self.finish(LayoutCompletion::Failed(Error::new(
            ErrorKind::Layout,
            ErrorCode::WorkerDisconnected,
            Some("layout worker exited without a result".to_string()),
        )))
    }

    /// Drain pending worker messages without blocking. Returns the
    /// completion once the run has ended.
    pub fn poll(&mut self, status: &dyn StatusDisplay) -> Option<LayoutCompletion> {
        loop {
            let message = match &self.run {
                Some(run) => run.receiver.try_recv(),
                None => return None,
            };
            match message {
                Ok(message) => {
                    if let Some(completion) = self.handle(message, status) {
                        return Some(completion);
                    }
                }
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => return Some(self.disconnected()),
            }
        }
    }

    /// Block until the current run ends. `None` when nothing is running.
    pub fn wait(&mut self, status: &dyn StatusDisplay) -> Option<LayoutCompletion> {
        loop {
            let message = match &self.run {
                Some(run) => run.receiver.recv(),
                None => return None,
            };
            match message {
                Ok(message) => {
                    if let Some(completion) = self.handle(message, status) {
                        return Some(completion);
                    }
                }
                Err(_) => return Some(self.disconnected()),
            }
        }
    }
}

impl Drop for LayoutService {
    fn drop(&mut self) {
        self.abandon();
    }
}
