use std::path::Path;
use std::time::SystemTime;

use serde::Serialize;

use crate::consts::{DEFAULT_DIAGNOSTIC_CHART, DIAGNOSTIC_CHARTS, IMAGE_EXTENSIONS};
use crate::error::AppError;

/// An image file found in a run folder
#[derive(Debug, Clone)]
pub(crate) struct ImageFile {
    pub(crate) name: String,
    pub(crate) modified: SystemTime,
}

/// Chart images of one run, split into summary charts and model candidates
#[derive(Debug, Clone, Default, Serialize)]
pub(crate) struct RunArtifacts {
    /// Known summary charts present in the folder, in catalogue order
    pub(crate) diagnostics: Vec<String>,
    /// Per-model images, oldest first
    pub(crate) candidates: Vec<String>,
}

impl RunArtifacts {
    /// Chart to show first: `pareto_front.png` when present
    pub(crate) fn default_chart(&self) -> Option<&str> {
        self.diagnostics
            .iter()
            .find(|name| name.as_str() == DEFAULT_DIAGNOSTIC_CHART)
            .or_else(|| self.diagnostics.first())
            .map(String::as_str)
    }

    pub(crate) fn model_ids(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(|name| model_id(name))
    }

    pub(crate) fn has_model(&self, id: &str) -> bool {
        self.model_ids().any(|m| m == id)
    }
}

fn image_extension(name: &str) -> Option<&str> {
    let (_, ext) = name.rsplit_once('.')?;
    IMAGE_EXTENSIONS.contains(&ext).then_some(ext)
}

/// Model identifier of a candidate image: its file name without extension
pub(crate) fn model_id(file_name: &str) -> &str {
    match image_extension(file_name) {
        Some(ext) => &file_name[..file_name.len() - ext.len() - 1],
        None => file_name,
    }
}

fn is_candidate_name(name: &str) -> bool {
    name.split('_').count() == 3
}

/// Partition files into diagnostic charts and model candidates.
///
/// Non-image files, and images matching neither rule, are dropped.
pub(crate) fn partition_artifacts(files: Vec<ImageFile>, diagnostic_names: &[&str]) -> RunArtifacts {
    let images: Vec<ImageFile> = files
        .into_iter()
        .filter(|f| image_extension(&f.name).is_some())
        .collect();

    let diagnostics: Vec<String> = diagnostic_names
        .iter()
        .filter(|known| images.iter().any(|f| f.name == **known))
        .map(|known| known.to_string())
        .collect();

    let mut candidates: Vec<ImageFile> = images
        .into_iter()
        .filter(|f| !diagnostics.contains(&f.name) && is_candidate_name(&f.name))
        .collect();
    candidates.sort_by(|a, b| a.modified.cmp(&b.modified).then_with(|| a.name.cmp(&b.name)));

    RunArtifacts {
        diagnostics,
        candidates: candidates.into_iter().map(|f| f.name).collect(),
    }
}

/// List image files directly inside `folder` with their modification times
pub(crate) fn list_images(folder: &Path) -> Result<Vec<ImageFile>, AppError> {
    if !folder.is_dir() {
        return Err(AppError::Read {
            path: folder.to_path_buf(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
    }
    let base = glob::Pattern::escape(&folder.to_string_lossy());

    let mut files = Vec::new();
    for ext in IMAGE_EXTENSIONS {
        let Ok(entries) = glob::glob(&format!("{base}/*.{ext}")) else {
            continue;
        };
        for path in entries.flatten() {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Ok(meta) = std::fs::metadata(&path) else {
                continue;
            };
            if !meta.is_file() {
                continue;
            }
            files.push(ImageFile {
                name: name.to_string(),
                modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            });
        }
    }
    Ok(files)
}

/// Classify the chart images of a run folder against the known summary charts
pub(crate) fn classify_run(folder: &Path) -> Result<RunArtifacts, AppError> {
    Ok(partition_artifacts(list_images(folder)?, DIAGNOSTIC_CHARTS))
}
