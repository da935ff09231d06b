use crate::errors::{BoxedError, TaskExecutionError};
use crossbeam_channel::TryRecvError;
use log::trace;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

/// Outcome of one job.
pub type JobResult<T> = Result<T, BoxedError>;

/// Run every job on a pool of at most `nthreads` threads.
///
/// All jobs run to completion even if some of them fail, and every thread has
/// been joined when this returns. Outcomes are in the same order as `jobs`.
pub fn run_jobs<TJob, TOutput, TRunner>(
    jobs: Vec<TJob>,
    nthreads: usize,
    runner: TRunner,
) -> Vec<JobResult<TOutput>>
where
    TJob: Send,
    TOutput: Send,
    TRunner: Fn(TJob) -> JobResult<TOutput> + Sync,
{
    let njobs = jobs.len();
    let (s1, r1) = crossbeam_channel::unbounded();
    for job in jobs.into_iter().enumerate() {
        s1.send(job).expect("job queue is open");
    }
    drop(s1);
    let nthreads = nthreads.clamp(1, njobs.max(1));
    let mut outcomes: Vec<Option<JobResult<TOutput>>> = (0..njobs).map(|_| None).collect();
    trace!(target: "gamestats", "{njobs} jobs, {nthreads} threads");
    thread::scope(|scope| {
        let (s2, r2) = crossbeam_channel::unbounded();
        for _ in 0..nthreads {
            let r1 = r1.clone();
            let s2 = s2.clone();
            let runner = &runner;
            scope.spawn(move || {
                loop {
                    match r1.try_recv() {
                        Ok((i, job)) => {
                            let outcome = panic::catch_unwind(AssertUnwindSafe(|| runner(job)))
                                .unwrap_or_else(|payload| Err(panicked(payload)));
                            s2.send((i, outcome)).expect("outcome queue is open");
                        }
                        Err(TryRecvError::Empty) => unreachable!(),
                        Err(TryRecvError::Disconnected) => break,
                    }
                }
            });
        }
        drop(s2);
        while let Ok((i, outcome)) = r2.recv() {
            outcomes[i] = Some(outcome);
        }
    });
    outcomes
        .into_iter()
        .map(|o| o.expect("every job reports an outcome"))
        .collect()
}

fn panicked(payload: Box<dyn Any + Send>) -> BoxedError {
    let msg = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    };
    TaskExecutionError(format!("worker panicked: {msg}")).into()
}
