#![allow(dead_code)]

use parspec::result::{HookResult, SpecResult, StreamResult};
use parspec::spec::{SpecCollection, Specification};

/// `count` specs named `spec_0.spec`, `spec_1.spec`, ...
pub fn spec_collection(count: usize) -> SpecCollection {
    (0..count)
        .map(|i| Specification::from_path(format!("spec_{i}.spec")))
        .collect()
}

pub fn spec_names(count: usize) -> Vec<String> {
    spec_collection(count).spec_names()
}

/// Builder for `StreamResult` to simplify aggregation tests.
pub struct StreamResultBuilder {
    result: StreamResult,
}

impl StreamResultBuilder {
    pub fn new(stream: usize) -> Self {
        Self {
            result: StreamResult::new(stream),
        }
    }

    pub fn passed(mut self, spec: &str) -> Self {
        self.result.add_spec_result(SpecResult::passed(spec, 10));
        self
    }

    pub fn failed(mut self, spec: &str) -> Self {
        self.result
            .add_spec_result(SpecResult::failed(spec, 10, "assertion failed"));
        self
    }

    pub fn skipped(mut self, spec: &str) -> Self {
        self.result
            .add_spec_result(SpecResult::skipped(spec, "skipped by executor"));
        self
    }

    pub fn pre_suite(mut self, hook: HookResult) -> Self {
        self.result.pre_suite = Some(hook);
        self
    }

    pub fn post_suite(mut self, hook: HookResult) -> Self {
        self.result.post_suite = Some(hook);
        self
    }

    pub fn message_error(mut self, msg: &str) -> Self {
        self.result
            .add_unhandled_error(parspec::result::UnhandledError::Message(msg.to_string()));
        self
    }

    pub fn build(self) -> StreamResult {
        self.result
    }
}
