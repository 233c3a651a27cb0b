//! Manifest parsing and build orchestration
//!
//! Parses kem.toml and converts every listed model into its own container.

use anyhow::{Context, Result, bail};
use hashbrown::HashSet;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::mesh;
use kem_common::KEM_EXTENSION;

/// Root manifest structure
#[derive(Debug, Deserialize)]
pub struct KemManifest {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub models: Vec<ModelEntry>,

    /// Directory relative paths resolve against (the manifest's directory)
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("build")
}

/// One output container and the mesh files that go into it
#[derive(Debug, Deserialize)]
pub struct ModelEntry {
    /// Output file stem
    pub id: String,
    /// Source files, exported in order
    pub inputs: Vec<PathBuf>,
}

impl KemManifest {
    /// Parse manifest text; relative paths resolve against `base_dir`
    pub fn parse(content: &str, base_dir: &Path) -> Result<Self> {
        let mut manifest: KemManifest = toml::from_str(content)?;
        manifest.base_dir = base_dir.to_path_buf();
        Ok(manifest)
    }

    /// Resolve a manifest path against the manifest's directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Output directory from `[output]`, resolved
    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.output.dir)
    }

    /// Resolved input paths of one model
    pub fn model_inputs(&self, model: &ModelEntry) -> Vec<PathBuf> {
        model.inputs.iter().map(|p| self.resolve(p)).collect()
    }
}

/// Load and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<KemManifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    KemManifest::parse(&content, base_dir)
        .with_context(|| format!("Failed to parse manifest: {:?}", path))
}

/// Validate a manifest without building
pub fn validate(manifest: &KemManifest) -> Result<()> {
    if manifest.models.is_empty() {
        tracing::warn!("Manifest lists no models");
    }

    let mut seen = HashSet::new();
    for model in &manifest.models {
        if model.id.trim().is_empty() {
            bail!("Model id must not be empty");
        }
        if !seen.insert(model.id.as_str()) {
            bail!("Duplicate model id '{}'", model.id);
        }
        if model.inputs.is_empty() {
            bail!("Model '{}' has no inputs", model.id);
        }

        for input in manifest.model_inputs(model) {
            if !input.exists() {
                bail!("Model '{}' source not found: {:?}", model.id, input);
            }
            if !mesh::is_supported(&input) {
                bail!(
                    "Unsupported mesh format for '{}': {:?} (use .obj, .gltf, or .glb)",
                    model.id,
                    input
                );
            }
        }
    }
    Ok(())
}

/// Build all models from a manifest
pub fn build_all(manifest: &KemManifest, output_override: Option<&Path>) -> Result<()> {
    validate(manifest)?;

    let output_dir = match output_override {
        Some(dir) => dir.to_path_buf(),
        None => manifest.output_dir(),
    };
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

    for model in &manifest.models {
        let output = output_dir.join(format!("{}.{}", model.id, KEM_EXTENSION));
        tracing::info!("Converting model: {} -> {:?}", model.id, output);
        mesh::convert(&manifest.model_inputs(model), &output)
            .with_context(|| format!("Failed to build model '{}'", model.id))?;
    }

    Ok(())
}
