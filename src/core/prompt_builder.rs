use crate::domain::models::{ProjectContext, Snippet};
use log::{debug, info};

const INSTRUCTIONS: &str = "\
You are an experienced documentation writer and GitHub Actions expert.
Your task is to update the project's README file in Markdown format. If a README does not exist, create it from scratch using the structured format outlined below.

The README should include the following sections with appropriate details drawn from the project:
  • Tech stack
  • Getting started
  • Setup
  • Running the application

Additional requirements:
 - Include a proper heading and an overview of the project.
 - Infer the tech stack from the package manifest and the code snippets.
 - Include a section that lists key repository files (by relative path).
 - If there is existing README content, preserve the parts below the updated sections.
 - Reply with the Markdown document only, without surrounding code fences or commentary.
";

fn count_tokens(content: &str) -> usize {
    content.split_whitespace().count()
}

fn fence_language(snippet: &Snippet) -> &str {
    snippet
        .path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
}

fn render_snippets(snippets: &[Snippet]) -> String {
    let mut rendered = String::new();
    for snippet in snippets {
        rendered.push_str(&format!(
            "\nFile: {}\n```{}\n{}\n```\n",
            snippet.path.display(),
            fence_language(snippet),
            snippet.content
        ));
    }
    rendered
}

/// Renders the full generation prompt: fixed instructions followed by the
/// file list, manifest, current README and sampled snippets.
pub fn build_prompt(context: &ProjectContext) -> String {
    debug!(
        "Building prompt from {} files and {} snippets",
        context.files.len(),
        context.snippets.len()
    );

    let files_list = context
        .files
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n");

    let mut prompt = String::from(INSTRUCTIONS);

    prompt.push_str("\n<file_list>\n");
    prompt.push_str(&files_list);
    prompt.push_str("\n</file_list>\n\n");

    prompt.push_str("<package_manifest>\n");
    prompt.push_str(&context.manifest);
    prompt.push_str("\n</package_manifest>\n\n");

    prompt.push_str("<current_readme>\n");
    if context.readme.is_empty() {
        prompt.push_str("(none)");
    } else {
        prompt.push_str(&context.readme);
    }
    prompt.push_str("\n</current_readme>\n\n");

    prompt.push_str("<code_snippets>");
    prompt.push_str(&render_snippets(&context.snippets));
    prompt.push_str("</code_snippets>\n");

    info!("Prompt assembled (~{} tokens)", count_tokens(&prompt));
    prompt
}
