//! # Hey Kubernetes Engine Commands
//!
//! File: cli/src/commands/gke.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Release and inspection commands for a deployment on Google Kubernetes
//! Engine, driven by the `gke` section of `hey.yml`:
//!
//! ```yaml
//! gke:
//!   project: habitdb
//!   zone: us-central1-f
//!   cluster: cluster-habitdb
//!   images:
//!     - name: gcr.io/habitdb/habitdb-www
//!     - name: gcr.io/habitdb/kanbanflow_sync
//!       context: kanbanflow_sync
//!   deployment: deployment/kubernetes/www.yaml
//!   pod_label: name=www
//!   client_secret:
//!     source: me@secrets-host:/secrets/client_secret.json
//!     destination: ./app/
//! ```
//!
//! ## Release Chain
//!
//! Each release step runs the ones before it, so `hey applygkeconfig` alone
//! performs a full release:
//!
//! 1. `get-credentials`: `gcloud container clusters get-credentials`.
//! 2. `copyclientsecret`: `scp` the OAuth client secret into the build context
//!    (skipped by `build` when no `client_secret` is configured).
//! 3. `build`: for every image, ask the registry for its latest version tag,
//!    bump the last component and `docker build -t <image>:<next> <context>`.
//! 4. `pushtogke`: push each new tag, then retag and push it as `<image>:prod`.
//! 5. `applygkeconfig`: `kubectl apply -f <deployment>`.
//!
//! The inspection commands (`getpodname`, `kubelogs`, `kubeexec`,
//! `kubegettags`, `kubegetlatesttag`) stand alone.
//!
use crate::common::{process, system::RemoteTool};
use crate::core::{
    config::{Config, GkeConfig},
    error::{HeyError, Result},
    registry::Invocation,
    tags,
};
use anyhow::{anyhow, bail};
use tracing::info;

/// Tag every pushed image also receives.
const PROD_TAG: &str = "prod";

fn setting<'a>(value: &'a Option<String>, key: &str) -> Result<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow!(HeyError::Config(format!("gke.{} is not set in hey.yml", key))))
}

fn credentials_args(gke: &GkeConfig) -> Result<Vec<String>> {
    Ok(vec![
        "container".to_string(),
        "clusters".to_string(),
        "get-credentials".to_string(),
        setting(&gke.cluster, "cluster")?.to_string(),
        "--zone".to_string(),
        setting(&gke.zone, "zone")?.to_string(),
        "--project".to_string(),
        setting(&gke.project, "project")?.to_string(),
    ])
}

fn latest_tags_args(image: &str) -> Vec<String> {
    vec![
        "container".to_string(),
        "images".to_string(),
        "list-tags".to_string(),
        image.to_string(),
        "--limit=1".to_string(),
        "--format=value(tags[])".to_string(),
    ]
}

fn pod_name_args(label: &str) -> Vec<String> {
    vec![
        "get".to_string(),
        "pods".to_string(),
        "-l".to_string(),
        label.to_string(),
        "-o=jsonpath={.items[].metadata.name}".to_string(),
    ]
}

/// Cleans up `kubectl` jsonpath output.
fn parse_pod_name(output: &str) -> Option<String> {
    let name = output.replace(&['\'', '"'][..], "");
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn exec_args(pod: &str, container: &str, command: &[String]) -> Vec<String> {
    let mut args = vec![
        "exec".to_string(),
        "-it".to_string(),
        pod.to_string(),
        "-c".to_string(),
        container.to_string(),
        "--".to_string(),
    ];
    args.extend(command.iter().cloned());
    args
}

async fn fetch_latest_tags(image: &str) -> Result<String> {
    process::capture("gcloud", &latest_tags_args(image)).await
}

/// The next `image:vX.Y.Z` for an image, from its latest registry tag.
pub async fn next_tag(image: &str) -> Result<String> {
    let output = fetch_latest_tags(image).await?;
    tags::next_image_tag(image, &output)
}

pub async fn get_credentials(inv: Invocation<'_>) -> Result<()> {
    process::run("gcloud", &credentials_args(&inv.config.gke)?).await
}

async fn copy_client_secret(cfg: &Config) -> Result<()> {
    let secret = cfg
        .gke
        .client_secret
        .as_ref()
        .ok_or_else(|| HeyError::Config("gke.client_secret is not set in hey.yml".into()))?;
    process::run(
        &RemoteTool::Scp.program(),
        &[secret.source.as_str(), secret.destination.as_str()],
    )
    .await
}

pub async fn copyclientsecret(inv: Invocation<'_>) -> Result<()> {
    get_credentials(inv).await?;
    copy_client_secret(inv.config).await
}

/// Builds every configured image under its next version tag and returns the tags.
async fn build_images(inv: Invocation<'_>) -> Result<Vec<(String, String)>> {
    let gke = &inv.config.gke;
    if gke.images.is_empty() {
        bail!(HeyError::Config("gke.images is empty in hey.yml".into()));
    }
    if gke.client_secret.is_some() {
        copyclientsecret(inv).await?;
    } else {
        get_credentials(inv).await?;
    }

    let mut built = Vec::with_capacity(gke.images.len());
    for image in &gke.images {
        let tag = next_tag(&image.name).await?;
        info!("Building {} from '{}'", tag, image.context);
        process::run("docker", &["build", "-t", tag.as_str(), image.context.as_str()]).await?;
        built.push((image.name.clone(), tag));
    }
    Ok(built)
}

pub async fn build(inv: Invocation<'_>) -> Result<()> {
    build_images(inv).await.map(|_| ())
}

/// Pushes a freshly built tag and moves `:prod` onto it.
async fn push_release(image: &str, tag: &str) -> Result<()> {
    let prod = format!("{}:{}", image, PROD_TAG);
    process::run("docker", &["push", tag]).await?;
    process::run("docker", &["tag", tag, prod.as_str()]).await?;
    process::run("docker", &["push", prod.as_str()]).await
}

pub async fn pushtogke(inv: Invocation<'_>) -> Result<()> {
    for (image, tag) in build_images(inv).await? {
        push_release(&image, &tag).await?;
    }
    Ok(())
}

pub async fn applygkeconfig(inv: Invocation<'_>) -> Result<()> {
    let deployment = setting(&inv.config.gke.deployment, "deployment")?.to_string();
    pushtogke(inv).await?;
    process::run("kubectl", &["apply", "-f", deployment.as_str()]).await
}

/// Looks up the name of the pod matching `gke.pod_label`.
async fn pod_name(cfg: &Config) -> Result<String> {
    let label = &cfg.gke.pod_label;
    let output = process::capture("kubectl", &pod_name_args(label)).await?;
    parse_pod_name(&output).ok_or_else(|| anyhow!("No pod found with label '{}'", label))
}

pub async fn getpodname(inv: Invocation<'_>) -> Result<()> {
    println!("{}", pod_name(inv.config).await?);
    Ok(())
}

pub async fn kubelogs(inv: Invocation<'_>) -> Result<()> {
    let Some(container) = inv.args.first() else {
        println!("Error: container name required");
        return Ok(());
    };
    let pod = pod_name(inv.config).await?;
    process::run("kubectl", &["logs", pod.as_str(), "-c", container.as_str()]).await
}

pub async fn kubeexec(inv: Invocation<'_>) -> Result<()> {
    let (container, command) = match inv.args {
        [container, command @ ..] if !command.is_empty() => (container, command),
        _ => {
            println!("Error: container name and command required");
            return Ok(());
        }
    };
    let pod = pod_name(inv.config).await?;
    process::run("kubectl", &exec_args(&pod, container, command)).await
}

pub async fn kubegettags(inv: Invocation<'_>) -> Result<()> {
    let Some(image) = inv.args.first() else {
        println!("Error: image name required");
        return Ok(());
    };
    process::run("gcloud", &["container", "images", "list-tags", image.as_str()]).await
}

pub async fn kubegetlatesttag(inv: Invocation<'_>) -> Result<()> {
    let Some(image) = inv.args.first() else {
        println!("Error: image name required");
        return Ok(());
    };
    let output = fetch_latest_tags(image).await?;
    println!("{}", tags::latest(image, &output)?);
    Ok(())
}
