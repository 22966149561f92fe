//! In-memory [`CloudControllerClient`]
//!
//! Replies are scripted per operation: a default reply used for every call,
//! optionally overridden for the n-th call. Arguments of every call are
//! recorded so tests can assert on what the actor sent.

use super::client::CloudControllerClient;
use super::query::Query;
use super::types::{Job, Reply, Resource, ResourceKind};
use crate::warnings::Warnings;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Reply template; errors are stored as messages since `anyhow::Error` is not `Clone`
#[derive(Debug, Clone)]
struct Scripted<T> {
    value: T,
    warnings: Vec<String>,
    error: Option<String>,
}

impl<T: Clone> Scripted<T> {
    fn to_reply(&self) -> Reply<T> {
        let warnings = Warnings::from(self.warnings.clone());
        match &self.error {
            Some(message) => Reply::err(anyhow::anyhow!(message.clone()), warnings),
            None => Reply::ok(self.value.clone(), warnings),
        }
    }
}

#[derive(Debug)]
struct Script<T, A> {
    default: Option<Scripted<T>>,
    on_call: HashMap<usize, Scripted<T>>,
    calls: Vec<A>,
}

impl<T, A> Default for Script<T, A> {
    fn default() -> Self {
        Self {
            default: None,
            on_call: HashMap::new(),
            calls: Vec::new(),
        }
    }
}

impl<T: Clone + Default, A> Script<T, A> {
    fn call(&mut self, args: A) -> Reply<T> {
        let index = self.calls.len();
        self.calls.push(args);
        match self.on_call.get(&index).or(self.default.as_ref()) {
            Some(scripted) => scripted.to_reply(),
            None => Reply::ok(T::default(), Warnings::new()),
        }
    }
}

fn scripted<T>(value: T, warnings: &[&str], error: Option<&str>) -> Scripted<T> {
    Scripted {
        value,
        warnings: warnings.iter().map(|w| w.to_string()).collect(),
        error: error.map(String::from),
    }
}

/// Fake transport with scripted replies and recorded calls
#[derive(Debug, Default)]
pub struct FakeCloudControllerClient {
    list: Mutex<Script<Vec<Resource>, (ResourceKind, Vec<Query>)>>,
    delete: Mutex<Script<Job, (ResourceKind, String)>>,
    job: Mutex<Script<Job, String>>,
}

impl FakeCloudControllerClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list_resources_returns(&self, resources: Vec<Resource>, warnings: &[&str], error: Option<&str>) {
        lock(&self.list).default = Some(scripted(resources, warnings, error));
    }

    pub fn delete_resource_returns(&self, job: Job, warnings: &[&str], error: Option<&str>) {
        lock(&self.delete).default = Some(scripted(job, warnings, error));
    }

    pub fn get_job_returns(&self, job: Job, warnings: &[&str], error: Option<&str>) {
        lock(&self.job).default = Some(scripted(job, warnings, error));
    }

    /// Override the reply of the `index`-th (zero-based) job poll
    pub fn get_job_returns_on_call(&self, index: usize, job: Job, warnings: &[&str], error: Option<&str>) {
        lock(&self.job).on_call.insert(index, scripted(job, warnings, error));
    }

    pub fn list_resources_call_count(&self) -> usize {
        lock(&self.list).calls.len()
    }

    pub fn list_resources_args_for_call(&self, index: usize) -> (ResourceKind, Vec<Query>) {
        lock(&self.list).calls[index].clone()
    }

    pub fn delete_resource_call_count(&self) -> usize {
        lock(&self.delete).calls.len()
    }

    pub fn delete_resource_args_for_call(&self, index: usize) -> (ResourceKind, String) {
        lock(&self.delete).calls[index].clone()
    }

    pub fn get_job_call_count(&self) -> usize {
        lock(&self.job).calls.len()
    }

    pub fn get_job_args_for_call(&self, index: usize) -> String {
        lock(&self.job).calls[index].clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl CloudControllerClient for FakeCloudControllerClient {
    async fn list_resources(&self, kind: ResourceKind, queries: &[Query]) -> Reply<Vec<Resource>> {
        lock(&self.list).call((kind, queries.to_vec()))
    }

    async fn delete_resource(&self, kind: ResourceKind, guid: &str) -> Reply<Job> {
        lock(&self.delete).call((kind, guid.to_string()))
    }

    async fn get_job(&self, guid: &str) -> Reply<Job> {
        lock(&self.job).call(guid.to_string())
    }
}
