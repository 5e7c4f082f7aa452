use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use indicatif::{ParallelProgressIterator, ProgressBar};
use rayon::prelude::*;

use crate::assemble::GeomapOutput;
use crate::geomap::GeomapHeader;
use crate::grouping::GroupKey;

use super::feature::Feature;
use super::geojson::write_features_to_geojson;

/// Characters not allowed in file names on at least one common platform.
const INVALID_FILE_NAME_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_control() && !INVALID_FILE_NAME_CHARS.contains(c))
        .collect()
}

/// Directory (or, for raw output, file stem) of a geomap: `<GeomapId>_<LabelLine1>-<LabelLine2>`.
pub fn geomap_dir_name(header: &GeomapHeader) -> String {
    sanitize_file_name(&format!(
        "{}_{}-{}",
        header.geomap_id, header.label_line1, header.label_line2
    ))
}

/// Path of a group's file relative to the output root.
///
/// Filter groups get a subdirectory per filter token, e.g.
/// `CENTER_CTR-MAP/Filter_05/Filter_05_Lines.geojson`. Attribute groups sit directly in the geomap
/// directory and raw output is one file per geomap.
pub fn relative_output_path(header: &GeomapHeader, key: &GroupKey) -> PathBuf {
    let geomap_dir = geomap_dir_name(header);
    match key {
        GroupKey::Filter { .. } => PathBuf::from(geomap_dir)
            .join(sanitize_file_name(&key.base_token()))
            .join(format!("{}.geojson", sanitize_file_name(&key.token()))),
        GroupKey::Signature { .. } => {
            PathBuf::from(geomap_dir).join(format!("{}.geojson", sanitize_file_name(&key.token())))
        }
        GroupKey::Raw => PathBuf::from(format!("{}.geojson", geomap_dir)),
    }
}

/// Delete `dir` if present and create it empty.
pub fn recreate_dir(dir: &Path) -> anyhow::Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).with_context(|| format!("Removing {:?}", dir))?;
    }
    fs::create_dir_all(dir).with_context(|| format!("Creating {:?}", dir))
}

/// Case-folded form of a path, so names differing only in case count as the same file.
fn path_identity(filepath: &Path) -> String {
    filepath.to_string_lossy().to_lowercase()
}

/// `filepath` itself if no other group claimed it, else the first free `<stem>_2`, `<stem>_3`, ...
fn claim_filepath(filepath: PathBuf, claimed: &mut HashSet<String>) -> PathBuf {
    if claimed.insert(path_identity(&filepath)) {
        return filepath;
    }
    let stem = filepath
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut suffix = 2;
    loop {
        let candidate = filepath.with_file_name(format!("{}_{}.geojson", stem, suffix));
        if claimed.insert(path_identity(&candidate)) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Write every collection of every geomap below `output_root`.
///
/// Groups whose sanitised paths collide, e.g. signatures differing only in a stripped `:`, are
/// written side by side with a numeric suffix; no group overwrites another.
///
/// # Returns
/// The number of files written.
pub fn write_outputs(output_root: &Path, outputs: &[GeomapOutput]) -> anyhow::Result<usize> {
    let mut claimed = HashSet::new();
    let mut files: Vec<(PathBuf, &Vec<Feature>)> = Vec::new();
    for output in outputs {
        for (key, features) in &output.groups {
            let filepath = output_root.join(relative_output_path(&output.header, key));
            let claimed_filepath = claim_filepath(filepath.clone(), &mut claimed);
            if claimed_filepath != filepath {
                log::warn!(
                    "Geomap {} group {} collides with {:?}, writing it to {:?}",
                    output.header.geomap_id,
                    key.token(),
                    filepath,
                    claimed_filepath
                );
            }
            files.push((claimed_filepath, features));
        }
    }

    log::info!("Writing {} GeoJSON files to {:?}", files.len(), output_root);
    let bar = ProgressBar::new(files.len() as u64);
    files
        .par_iter()
        .progress_with(bar)
        .try_for_each(|(filepath, features)| -> anyhow::Result<()> {
            if let Some(parent) = filepath.parent() {
                fs::create_dir_all(parent).with_context(|| format!("Creating {:?}", parent))?;
            }
            write_features_to_geojson(features, filepath)
                .with_context(|| format!("Writing {:?}", filepath))
        })?;
    Ok(files.len())
}
