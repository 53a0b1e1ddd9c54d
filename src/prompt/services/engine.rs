//! Prompt resolution, rendering, and usage tracking.

use super::PromptEngineConfig;
use super::context::{self, DefaultContext};
use crate::cache::BoundedCache;
use crate::prompt::{
    domain::{
        DEFAULT_VERSION, ExecutionOutcome, Experiment, PromptError, PromptTemplate,
        PromptVersionMetrics, TemplateKey, TemplateRecord, UsageKey, UsageMetric,
    },
    ports::PromptTemplateSource,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

/// Version selection for one render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    version: Option<String>,
    experiment: Option<Experiment>,
}

impl RenderOptions {
    /// Renders the default version.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders a fixed version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Draws the version from `experiment`; takes precedence over a fixed
    /// version.
    #[must_use]
    pub fn with_experiment(mut self, experiment: Experiment) -> Self {
        self.experiment = Some(experiment);
        self
    }
}

/// A rendered prompt and how it was resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPrompt {
    /// Rendered text.
    pub text: String,
    /// Key of the template actually rendered.
    pub key: TemplateKey,
    /// Version the caller asked for, after experiment selection.
    pub requested_version: String,
    /// Version actually rendered; differs from the request after fallback.
    pub version: String,
    /// Experiment that chose the requested version.
    pub experiment: Option<String>,
    /// Metadata of the rendered template.
    pub metadata: Map<String, Value>,
    /// Approximate token count of `text`.
    pub estimated_tokens: usize,
}

impl RenderedPrompt {
    /// Returns `true` when a fallback template was rendered.
    #[must_use]
    pub fn fell_back(&self) -> bool {
        self.version != self.requested_version
    }
}

type TemplateCache = BoundedCache<String, Arc<PromptTemplate>>;
type UsageCache = BoundedCache<UsageKey, UsageMetric>;

/// Resolves, compiles, caches, and renders prompt templates.
///
/// Resolution tries the requested `(agent, task, version)` template, then the
/// agent's `system` template, then a built-in `basic` template, so a missing
/// or broken record never fails a render.
pub struct PromptEngine<S, C>
where
    S: PromptTemplateSource,
    C: Clock + Send + Sync,
{
    source: Arc<S>,
    clock: Arc<C>,
    config: PromptEngineConfig,
    templates: Mutex<TemplateCache>,
    usage: Mutex<UsageCache>,
    rng: Mutex<StdRng>,
}

impl<S, C> PromptEngine<S, C>
where
    S: PromptTemplateSource,
    C: Clock + Send + Sync,
{
    /// Creates an engine with the default configuration.
    #[must_use]
    pub fn new(source: Arc<S>, clock: Arc<C>) -> Self {
        Self::with_config(source, clock, PromptEngineConfig::default())
    }

    /// Creates an engine with `config`.
    #[must_use]
    pub fn with_config(source: Arc<S>, clock: Arc<C>, config: PromptEngineConfig) -> Self {
        Self {
            templates: Mutex::new(BoundedCache::new(config.template_cache)),
            usage: Mutex::new(BoundedCache::new(config.usage_cache)),
            rng: Mutex::new(StdRng::from_entropy()),
            source,
            clock,
            config,
        }
    }

    /// Seeds the experiment sampler for reproducible draws.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &PromptEngineConfig {
        &self.config
    }

    /// Renders the prompt for `agent_type` and `task_type`.
    ///
    /// Caller `context` values override template metadata, which overrides
    /// the default keys. The render is counted against the version actually
    /// rendered.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::CacheUnavailable`] when an engine lock is
    /// poisoned. Missing, unreadable, or broken templates fall back instead
    /// of failing.
    pub async fn render_prompt(
        &self,
        agent_type: &str,
        task_type: &str,
        context: &Map<String, Value>,
        options: &RenderOptions,
    ) -> Result<RenderedPrompt, PromptError> {
        let requested_version = self.requested_version(options)?;
        let candidates = [
            TemplateKey::new(agent_type, task_type, requested_version.as_str()),
            TemplateKey::system(agent_type),
        ];

        for key in candidates {
            let template = match self.load_template(&key).await {
                Ok(Some(template)) => template,
                Ok(None) => {
                    debug!(template = %key, "template not found, falling back");
                    continue;
                }
                Err(PromptError::CacheUnavailable(reason)) => {
                    return Err(PromptError::CacheUnavailable(reason));
                }
                Err(err) => {
                    warn!(template = %key, error = %err, "template unavailable, falling back");
                    continue;
                }
            };
            match self.render_template(&template, agent_type, task_type, context) {
                Ok(text) => {
                    return self.finish(&template, task_type, text, requested_version, options);
                }
                Err(err) => {
                    warn!(template = %key, error = %err, "template failed to render, falling back");
                }
            }
        }

        let basic = self.basic_template(agent_type)?;
        let text = self.render_template(&basic, agent_type, task_type, context)?;
        self.finish(&basic, task_type, text, requested_version, options)
    }

    /// Returns the compiled template stored under `key`, loading and caching
    /// it on a miss.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Source`] when the source fails,
    /// [`PromptError::Compile`] when the body does not compile, or
    /// [`PromptError::CacheUnavailable`] when the cache lock is poisoned.
    pub async fn load_template(
        &self,
        key: &TemplateKey,
    ) -> Result<Option<Arc<PromptTemplate>>, PromptError> {
        let cache_key = key.to_string();
        let cached = self.lock_templates()?.get(&cache_key, self.clock.utc());
        if cached.is_some() {
            return Ok(cached);
        }

        let Some(record) = self.source.load(key).await? else {
            return Ok(None);
        };
        let template = Arc::new(PromptTemplate::compile(record)?);
        self.lock_templates()?
            .insert(cache_key, Arc::clone(&template), self.clock.utc());
        debug!(template = %key, "template compiled and cached");
        Ok(Some(template))
    }

    /// Folds an execution outcome into the counters of a rendered version.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::CacheUnavailable`] when the usage lock is
    /// poisoned.
    pub fn update_metrics(
        &self,
        agent_type: &str,
        task_type: &str,
        version: &str,
        outcome: &ExecutionOutcome,
    ) -> Result<(), PromptError> {
        let key = UsageKey::new(agent_type, task_type, version);
        self.lock_usage()?.upsert(
            key,
            self.clock.utc(),
            UsageMetric::empty,
            |metric| metric.record_outcome(outcome),
        );
        Ok(())
    }

    /// Counts a reviewer's verdict against the version that produced the
    /// reviewed result.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::CacheUnavailable`] when the usage lock is
    /// poisoned.
    pub fn record_review(
        &self,
        agent_type: &str,
        task_type: &str,
        version: &str,
        approved: bool,
    ) -> Result<(), PromptError> {
        let key = UsageKey::new(agent_type, task_type, version);
        self.lock_usage()?.upsert(
            key,
            self.clock.utc(),
            UsageMetric::empty,
            |metric| metric.record_review(approved),
        );
        Ok(())
    }

    /// Returns derived per-version metrics for `agent_type` and `task_type`,
    /// sorted by version.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::CacheUnavailable`] when the usage lock is
    /// poisoned.
    pub fn get_prompt_metrics(
        &self,
        agent_type: &str,
        task_type: &str,
    ) -> Result<Vec<PromptVersionMetrics>, PromptError> {
        let now = self.clock.utc();
        let mut metrics: Vec<PromptVersionMetrics> = self
            .lock_usage()?
            .collect_live(now, |key| {
                key.agent_type == agent_type && key.task_type == task_type
            })
            .into_iter()
            .map(|(key, metric)| PromptVersionMetrics::derive(key.version, &metric))
            .collect();
        metrics.sort_by(|left, right| left.version.cmp(&right.version));
        Ok(metrics)
    }

    /// Drops compiled templates: all of them for `None`, or those whose key
    /// contains the pattern. Returns how many were dropped.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::CacheUnavailable`] when the cache lock is
    /// poisoned.
    pub fn invalidate_cache(&self, pattern: Option<&str>) -> Result<usize, PromptError> {
        let mut templates = self.lock_templates()?;
        let removed = match pattern {
            Some(fragment) => templates.invalidate_matching(fragment),
            None => {
                let count = templates.len();
                templates.clear();
                count
            }
        };
        drop(templates);
        debug!(pattern = ?pattern, removed, "template cache invalidated");
        Ok(removed)
    }

    fn requested_version(&self, options: &RenderOptions) -> Result<String, PromptError> {
        if let Some(experiment) = &options.experiment {
            let mut rng = self
                .rng
                .lock()
                .map_err(|err| PromptError::CacheUnavailable(err.to_string()))?;
            let version = experiment.sample(&mut *rng).to_owned();
            drop(rng);
            debug!(experiment = %experiment.name, version = %version, "experiment variant selected");
            return Ok(version);
        }
        Ok(options
            .version
            .clone()
            .unwrap_or_else(|| DEFAULT_VERSION.to_owned()))
    }

    fn basic_template(&self, agent_type: &str) -> Result<Arc<PromptTemplate>, PromptError> {
        let record = TemplateRecord::basic(agent_type);
        let cache_key = record.key.to_string();
        let now = self.clock.utc();
        let mut templates = self.lock_templates()?;
        if let Some(cached) = templates.get(&cache_key, now) {
            return Ok(cached);
        }
        let template = Arc::new(PromptTemplate::compile(record)?);
        templates.insert(cache_key, Arc::clone(&template), now);
        Ok(template)
    }

    fn render_template(
        &self,
        template: &PromptTemplate,
        agent_type: &str,
        task_type: &str,
        caller: &Map<String, Value>,
    ) -> Result<String, PromptError> {
        let defaults = DefaultContext {
            now: self.clock.utc(),
            product_name: &self.config.product_name,
            environment: &self.config.environment,
            agent_type,
            task_type,
        };
        let merged = context::merge(&defaults, template.metadata(), caller);
        template.render(&merged)
    }

    fn finish(
        &self,
        template: &PromptTemplate,
        task_type: &str,
        text: String,
        requested_version: String,
        options: &RenderOptions,
    ) -> Result<RenderedPrompt, PromptError> {
        let key = template.key().clone();
        let now: DateTime<Utc> = self.clock.utc();
        self.lock_usage()?.upsert(
            UsageKey::new(key.agent_type.as_str(), task_type, key.version.as_str()),
            now,
            UsageMetric::empty,
            |metric| metric.record_render(now),
        );
        if key.version != requested_version {
            debug!(
                requested = %requested_version,
                rendered = %key.version,
                agent = %key.agent_type,
                "rendered fallback template"
            );
        }
        Ok(RenderedPrompt {
            estimated_tokens: context::estimate_tokens(&text),
            text,
            version: key.version.clone(),
            requested_version,
            experiment: options
                .experiment
                .as_ref()
                .map(|experiment| experiment.name.clone()),
            metadata: template.metadata().clone(),
            key,
        })
    }

    fn lock_templates(&self) -> Result<MutexGuard<'_, TemplateCache>, PromptError> {
        self.templates
            .lock()
            .map_err(|err| PromptError::CacheUnavailable(err.to_string()))
    }

    fn lock_usage(&self) -> Result<MutexGuard<'_, UsageCache>, PromptError> {
        self.usage
            .lock()
            .map_err(|err| PromptError::CacheUnavailable(err.to_string()))
    }
}
