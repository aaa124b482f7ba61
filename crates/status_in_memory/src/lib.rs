use async_trait::async_trait;
use model::index::{GsiSpec, IndexStatus};
use status::{
    CreationAck, IndexDescription, StatusClient, StatusError, StatusErrorReason, StatusOperation,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// A scripted status client for exercising workflows without the
/// service.
///
/// Each index follows a fixed timeline of statuses, one entry per
/// step of elapsed time since construction (10 time-units by default,
/// matching the poll interval). The final entry repeats forever and a
/// `NotFound` entry means the index is absent from describe output.
/// Driven under `tokio::time::pause` the timelines are fully
/// deterministic, for sequential and parallel callers alike.
pub struct ScriptedStatusClient {
    started: Instant,
    step: Duration,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    timelines: HashMap<String, Vec<IndexStatus>>,
    describe_calls: usize,
    table_missing: bool,
    rejections: HashMap<String, String>,
    duplicates: HashSet<String>,
    creations: Vec<String>,
}

impl Default for ScriptedStatusClient {
    fn default() -> Self {
        ScriptedStatusClient {
            started: Instant::now(),
            step: Duration::from_secs(10),
            inner: Mutex::new(Default::default()),
        }
    }
}

impl ScriptedStatusClient {
    pub fn new() -> Self {
        Default::default()
    }

    /// Override the duration of one timeline step.
    pub fn with_step(mut self, step: Duration) -> Self {
        self.step = step;

        self
    }

    /// Script the status timeline of one index.
    pub fn with_index(self, index_name: &str, timeline: &[IndexStatus]) -> Self {
        self.inner
            .lock()
            .unwrap()
            .timelines
            .insert(index_name.to_string(), timeline.to_vec());

        self
    }

    /// Every describe call fails as if the table did not exist.
    pub fn with_missing_table(self) -> Self {
        self.inner.lock().unwrap().table_missing = true;

        self
    }

    /// Reject any creation submission for the named index.
    pub fn with_rejected_creation(self, index_name: &str, message: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .rejections
            .insert(index_name.to_string(), message.to_string());

        self
    }

    /// Answer creation submissions for the named index with
    /// "already exists".
    pub fn with_duplicate_creation(self, index_name: &str) -> Self {
        self.inner
            .lock()
            .unwrap()
            .duplicates
            .insert(index_name.to_string());

        self
    }

    /// How many creation submissions were made for the named index.
    pub fn creation_count(&self, index_name: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .creations
            .iter()
            .filter(|name| name.as_str() == index_name)
            .count()
    }

    /// Creation submissions in the order they were made.
    pub fn creations(&self) -> Vec<String> {
        self.inner.lock().unwrap().creations.clone()
    }

    pub fn describe_count(&self) -> usize {
        self.inner.lock().unwrap().describe_calls
    }

    fn current_step(&self) -> usize {
        (self.started.elapsed().as_millis() / self.step.as_millis()) as usize
    }
}

#[async_trait]
impl StatusClient for ScriptedStatusClient {
    async fn describe_indexes(
        &self,
        table_name: &str,
    ) -> Result<Vec<IndexDescription>, StatusError> {
        let step: usize = self.current_step();
        let mut inner = self.inner.lock().unwrap();

        inner.describe_calls += 1;

        if inner.table_missing {
            return Err(StatusError::new(
                table_name.to_string(),
                StatusOperation::DescribeIndexes,
                StatusErrorReason::TableMissing,
            ));
        }

        let descriptions: Vec<IndexDescription> = inner
            .timelines
            .iter()
            .filter_map(|(name, timeline)| {
                // An empty timeline reads as absent for the whole run
                let status: IndexStatus = timeline.get(step).or_else(|| timeline.last()).copied()?;

                match status {
                    IndexStatus::NotFound => None,
                    status => Some(IndexDescription {
                        index_name: name.clone(),
                        status,
                    }),
                }
            })
            .collect();

        Ok(descriptions)
    }

    async fn submit_index_creation(
        &self,
        table_name: &str,
        spec: &GsiSpec,
    ) -> Result<CreationAck, StatusError> {
        let mut inner = self.inner.lock().unwrap();

        inner.creations.push(spec.index_name.clone());

        if let Some(message) = inner.rejections.get(&spec.index_name) {
            return Err(StatusError::new(
                table_name.to_string(),
                StatusOperation::SubmitIndexCreation,
                StatusErrorReason::BackendFailure(message.clone().into()),
            ));
        }

        if inner.duplicates.contains(&spec.index_name) {
            return Ok(CreationAck::AlreadyExists);
        }

        Ok(CreationAck::Accepted)
    }
}
