//! Ordered provider chains with graceful degradation
//!
//! A [`FallbackChain`] invokes its providers in order until one succeeds.
//! Each failure is logged and recorded as an [`Advisory`]; nothing is
//! retried.

use axum::async_trait;
use serde::Serialize;
use shared::{Advisory, AdvisoryStage};

use crate::error::{AppError, AppResult};

/// A source of `O` for a given input
#[async_trait]
pub trait Provider<I, O>: Send + Sync
where
    I: Sync,
{
    /// Short identifier used in logs and advisories
    fn name(&self) -> &'static str;

    /// False for placeholders standing in for an unconfigured service
    fn available(&self) -> bool {
        true
    }

    async fn provide(&self, input: &I) -> AppResult<O>;
}

/// Name and availability of one provider in a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProviderInfo {
    pub name: &'static str,
    pub available: bool,
}

/// Provider for a collaborator that has no configuration; always fails
pub struct Unconfigured {
    name: &'static str,
    service: &'static str,
}

impl Unconfigured {
    pub fn new(name: &'static str, service: &'static str) -> Self {
        Self { name, service }
    }
}

#[async_trait]
impl<I, O> Provider<I, O> for Unconfigured
where
    I: Sync,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn available(&self) -> bool {
        false
    }

    async fn provide(&self, _input: &I) -> AppResult<O> {
        Err(AppError::NotConfigured(self.service))
    }
}

/// Value produced by a chain together with the provider that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<O> {
    pub provider: &'static str,
    pub value: O,
}

/// Providers tried in priority order
pub struct FallbackChain<I, O> {
    stage: AdvisoryStage,
    providers: Vec<Box<dyn Provider<I, O>>>,
}

impl<I, O> FallbackChain<I, O>
where
    I: Sync,
    O: Send,
{
    pub fn new(stage: AdvisoryStage) -> Self {
        Self {
            stage,
            providers: Vec::new(),
        }
    }

    /// Append a provider at the lowest priority
    pub fn with<P>(mut self, provider: P) -> Self
    where
        P: Provider<I, O> + 'static,
    {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn providers(&self) -> Vec<ProviderInfo> {
        self.providers
            .iter()
            .map(|p| ProviderInfo {
                name: p.name(),
                available: p.available(),
            })
            .collect()
    }

    /// Run providers in order; `None` when every provider failed.
    pub async fn resolve(&self, input: &I, advisories: &mut Vec<Advisory>) -> Option<Resolved<O>> {
        for provider in &self.providers {
            match provider.provide(input).await {
                Ok(value) => {
                    tracing::debug!(stage = ?self.stage, provider = provider.name(), "Provider succeeded");
                    return Some(Resolved {
                        provider: provider.name(),
                        value,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        stage = ?self.stage,
                        provider = provider.name(),
                        error = %e,
                        "Provider failed, falling back"
                    );
                    advisories.push(Advisory {
                        stage: self.stage,
                        provider: provider.name().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }
        None
    }
}
