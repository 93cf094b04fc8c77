//! Sequential multi-query batch running.
//!
//! Report runs issue several independent queries over the same window. A
//! failed query is recoverable at this level: it is reported and skipped,
//! and the batch moves on. The pause between queries is the caller-side
//! rate-limit courtesy the remote source expects; it is a policy of the
//! batch, not of the extractors.

use std::time::Duration;

use trawl_fetch::QueryTransport;
use trawl_types::{QueryTemplate, Result, ResultSet, TimeWindow};

use crate::{Bisection, ExtractEvent};

/// Pause between consecutive queries observed to keep the remote source
/// happy.
pub const DEFAULT_JOB_PAUSE: Duration = Duration::from_secs(2);

/// One named query in a batch.
#[derive(Debug, Clone)]
pub struct QueryJob {
    /// Name the outcome is reported under.
    pub name: String,
    /// The query to extract.
    pub template: QueryTemplate,
}

impl QueryJob {
    /// Creates a named job.
    pub fn new(name: impl Into<String>, template: QueryTemplate) -> Self {
        Self {
            name: name.into(),
            template,
        }
    }
}

/// The outcome of one job in a batch.
#[derive(Debug)]
pub struct JobOutcome {
    /// The job's name.
    pub name: String,
    /// The extracted rows, or the failure that made the batch skip the
    /// job.
    pub result: Result<ResultSet>,
}

/// Runs every job over `window`, pausing `pause` between jobs.
///
/// A failing job never aborts the batch; its error is recorded in its
/// outcome and reported through the extractor's sink, and the remaining
/// jobs still run. Outcomes are returned in job order.
pub async fn run_batch<T: QueryTransport>(
    extractor: &Bisection<T>,
    jobs: &[QueryJob],
    window: TimeWindow,
    pause: Duration,
) -> Vec<JobOutcome> {
    let mut outcomes = Vec::with_capacity(jobs.len());
    for (i, job) in jobs.iter().enumerate() {
        if i > 0 && pause > Duration::ZERO {
            tokio::time::sleep(pause).await;
        }
        let result = extractor.fetch(&job.template, window).await;
        if let Err(e) = &result {
            extractor.sink().record(ExtractEvent::warn(format!(
                "query '{}' failed, continuing with the rest of the batch: {e}",
                job.name
            )));
        }
        outcomes.push(JobOutcome {
            name: job.name.clone(),
            result,
        });
    }
    outcomes
}
