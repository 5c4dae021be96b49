//! Markdown run summary

use crate::config::OutputConfig;
use crate::output::RunSummary;
use crate::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown run summary to `path`
pub fn write_markdown_summary(
    summary: &RunSummary,
    output: &OutputConfig,
    path: &Path,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let markdown = format_markdown_summary(summary, output);
    let mut file = File::create(path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a run summary as markdown
pub fn format_markdown_summary(summary: &RunSummary, output: &OutputConfig) -> String {
    let mut md = String::new();

    md.push_str("# Portico Crawl Summary\n\n");

    let status = if summary.interrupted {
        "interrupted (progress flushed)"
    } else if summary.frontier_remaining > 0 {
        "stopped at budget"
    } else {
        "completed"
    };

    md.push_str("## Run\n\n");
    md.push_str(&format!("- **Status**: {}\n", status));
    md.push_str(&format!("- **Duration**: {} seconds\n", summary.duration_seconds));
    md.push_str(&format!("- **Pages completed**: {}\n", summary.completed));
    md.push_str(&format!("- **Pages failed**: {}\n", summary.failed));
    md.push_str(&format!("- **Pages skipped**: {}\n\n", summary.skipped));

    md.push_str("## Store\n\n");
    md.push_str(&format!(
        "- **Pages captured so far**: {}\n",
        summary.store_size
    ));
    md.push_str(&format!(
        "- **URLs remaining in frontier**: {}\n\n",
        summary.frontier_remaining
    ));

    md.push_str("## Output Locations\n\n");
    md.push_str("| Artifact | Path |\n");
    md.push_str("|----------|------|\n");
    md.push_str(&format!("| HTML snapshots | {} |\n", output.pages_dir));
    md.push_str(&format!("| PDF renders | {} |\n", output.pdf_dir));
    md.push_str(&format!("| Downloads | {} |\n", output.download_dir));
    md.push_str(&format!("| Images | {} |\n", output.image_dir));
    md.push_str(&format!("| Progress file | {} |\n", output.progress_file));

    md
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_output() -> OutputConfig {
        OutputConfig {
            pages_dir: "./out/pages".to_string(),
            pdf_dir: "./out/pdf".to_string(),
            download_dir: "./out/downloads".to_string(),
            image_dir: "./out/images".to_string(),
            progress_file: "./out/progress_summary.json".to_string(),
            summary_path: "./out/summary.md".to_string(),
        }
    }

    fn test_summary() -> RunSummary {
        RunSummary {
            completed: 12,
            failed: 1,
            skipped: 3,
            store_size: 40,
            frontier_remaining: 0,
            duration_seconds: 95,
            interrupted: false,
        }
    }

    #[test]
    fn test_format_markdown_summary() {
        let md = format_markdown_summary(&test_summary(), &test_output());

        assert!(md.contains("# Portico Crawl Summary"));
        assert!(md.contains("**Status**: completed"));
        assert!(md.contains("**Pages completed**: 12"));
        assert!(md.contains("./out/pages"));
    }

    #[test]
    fn test_interrupted_status() {
        let mut summary = test_summary();
        summary.interrupted = true;

        let md = format_markdown_summary(&summary, &test_output());
        assert!(md.contains("interrupted"));
    }

    #[test]
    fn test_budget_status() {
        let mut summary = test_summary();
        summary.frontier_remaining = 7;

        let md = format_markdown_summary(&summary, &test_output());
        assert!(md.contains("stopped at budget"));
    }
}
