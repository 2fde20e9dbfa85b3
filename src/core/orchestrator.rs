use crate::core::prompt_builder::build_prompt;
use crate::core::snippet_sampler::sample_snippets;
use crate::domain::errors::RefreshError;
use crate::domain::models::{ProjectContext, RefreshOutcome, RunConfig};
use crate::infra::file_system::{load_manifest, load_readme, scan_files};
use crate::infra::generator::ContentGenerator;
use crate::infra::output::{FileWriter, OutputWriter};
use log::{info, warn};

/// Scans the tree and loads everything the prompt is built from.
pub fn assemble_context(config: &RunConfig) -> anyhow::Result<ProjectContext> {
    let scan = scan_files(&config.root, &config.scan);
    let files = scan.relative_paths();

    let manifest = load_manifest(&config.manifest_path)?;
    let readme = load_readme(&config.readme_path)?;
    let snippets = sample_snippets(&config.root, &files, &config.limits);

    Ok(ProjectContext {
        readme,
        manifest,
        files,
        snippets,
    })
}

/// Regenerates the README and writes it back unless the service returned
/// exactly the current content.
pub fn refresh_readme(
    config: &RunConfig,
    generator: &dyn ContentGenerator,
) -> anyhow::Result<RefreshOutcome> {
    let context = assemble_context(config)?;
    let prompt = build_prompt(&context);

    info!("Generating updated README content");
    let generated = generator.generate(&prompt).map_err(RefreshError::from)?;

    if generated.trim().is_empty() {
        warn!("Generation service did not return any content");
        return Err(RefreshError::EmptyResponse.into());
    }

    if generated == context.readme {
        info!("{} is already up-to-date. No changes made.", config.readme_path.display());
        return Ok(RefreshOutcome::UpToDate);
    }

    FileWriter::new(&config.readme_path).write(&generated)?;
    info!("{} has been successfully updated", config.readme_path.display());
    Ok(RefreshOutcome::Updated {
        bytes: generated.len(),
    })
}
