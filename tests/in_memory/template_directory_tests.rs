//! Prompt rendering from a template directory through a worker.

use std::fs;
use std::sync::Arc;

use super::helpers::{ScriptedInvoker, agent, init_tracing};
use atelier::agent::services::{AgentCore, TemplateWorker, Worker};
use atelier::prompt::{
    adapters::DirectoryTemplateSource,
    domain::{Experiment, ExperimentVariant},
    services::{PromptEngine, PromptEngineConfig, RenderOptions},
};
use atelier::task::domain::{Task, TaskDraft, TaskMetadata};
use camino::Utf8Path;
use eyre::{ensure, eyre};
use mockable::DefaultClock;
use serde_json::{Map, json};

fn write_templates(root: &std::path::Path) -> eyre::Result<()> {
    let task_dir = root.join("content_creator").join("blog_post");
    fs::create_dir_all(&task_dir)?;
    fs::write(
        task_dir.join("default.j2"),
        "[{{ product_name }}] {{ prompt }}\n{{ points | bullets }}",
    )?;
    fs::write(task_dir.join("v2.1.j2"), "Variant two: {{ prompt }} in a {{ tone }} tone")?;
    fs::write(task_dir.join("v2.1.json"), r#"{"tone": "playful"}"#)?;
    fs::write(
        root.join("content_creator").join("system.j2"),
        "System fallback for {{ task_type }}: {{ prompt }}",
    )?;
    Ok(())
}

fn open_engine(root: &std::path::Path) -> eyre::Result<PromptEngine<DirectoryTemplateSource, DefaultClock>> {
    let path = Utf8Path::from_path(root).ok_or_else(|| eyre!("temp dir is not UTF-8"))?;
    let source = DirectoryTemplateSource::open(path)?;
    Ok(PromptEngine::with_config(
        Arc::new(source),
        Arc::new(DefaultClock),
        PromptEngineConfig::default().with_product_name("Hearth"),
    ))
}

#[tokio::test(flavor = "multi_thread")]
async fn directory_templates_render_with_metadata_and_filters() -> eyre::Result<()> {
    init_tracing();
    let dir = tempfile::tempdir()?;
    write_templates(dir.path())?;
    let engine = open_engine(dir.path())?;
    let mut context = Map::new();
    context.insert("prompt".to_owned(), json!("Announce the beta"));
    context.insert("points".to_owned(), json!(["faster", "calmer"]));

    let default = engine
        .render_prompt("content_creator", "blog_post", &context, &RenderOptions::new())
        .await?;
    let variant = engine
        .render_prompt(
            "content_creator",
            "blog_post",
            &context,
            &RenderOptions::new().with_version("v2.1"),
        )
        .await?;
    let fallback = engine
        .render_prompt("content_creator", "newsletter", &context, &RenderOptions::new())
        .await?;

    ensure!(default.text == "[Hearth] Announce the beta\n- faster\n- calmer");
    ensure!(variant.text == "Variant two: Announce the beta in a playful tone");
    ensure!(fallback.version == "system");
    ensure!(fallback.text == "System fallback for newsletter: Announce the beta");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn experiment_variants_are_tracked_per_version() -> eyre::Result<()> {
    init_tracing();
    let dir = tempfile::tempdir()?;
    write_templates(dir.path())?;
    let engine = Arc::new(open_engine(dir.path())?.with_seed(3));
    let experiment = Experiment::new("tone-test")
        .with_variant(ExperimentVariant::new("default", 0.5))
        .with_variant(ExperimentVariant::new("v2.1", 0.5));
    let invoker = Arc::new(ScriptedInvoker::answering(&[0.9; 40]));
    let core = AgentCore::new(agent("content_creator"), invoker, Arc::new(DefaultClock));
    let worker = TemplateWorker::new(core, Arc::clone(&engine))
        .with_render_options(RenderOptions::new().with_experiment(experiment));

    for round in 0..40 {
        let task = Task::create(
            TaskDraft::new(
                "launch",
                "project_manager",
                "content_creator",
                format!("Announce build {round}"),
            )
            .with_context_value("task_type", json!("blog_post"))
            .with_context_value("points", json!(["one"])),
            TaskMetadata::new("1.0", "test"),
            &DefaultClock,
        )?;
        let result = worker.process_task(&task).await;
        ensure!(result.success, "round {round} failed: {:?}", result.error);
    }

    let metrics = engine.get_prompt_metrics("content_creator", "blog_post")?;
    let versions: Vec<&str> = metrics.iter().map(|entry| entry.version.as_str()).collect();
    ensure!(versions == vec!["default", "v2.1"], "both variants should be drawn");
    let total: u32 = metrics.iter().map(|entry| entry.executions).sum();
    ensure!(total == 40);
    Ok(())
}
