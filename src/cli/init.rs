// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 adflow contributors

//! Init command - write a starter manifest

use colored::Colorize;
use miette::Result;
use std::path::Path;

use crate::manifest::DEFAULT_MANIFEST;

/// Run the init command
pub async fn run(name: Option<String>, force: bool, verbose: bool) -> Result<()> {
    let pipeline_name = name.unwrap_or_else(|| {
        std::env::current_dir()
            .ok()
            .and_then(|p| p.file_name().map(|s| s.to_string_lossy().to_string()))
            .unwrap_or_else(|| "my-pipeline".to_string())
    });

    println!("{}", "Initializing adflow manifest...".bold());
    println!();

    if Path::new(DEFAULT_MANIFEST).exists() && !force {
        return Err(miette::miette!(
            "{} already exists. Use --force to overwrite.",
            DEFAULT_MANIFEST
        ));
    }

    let content = generate_manifest(&pipeline_name);
    std::fs::write(DEFAULT_MANIFEST, &content)
        .map_err(|e| miette::miette!("Failed to write {}: {}", DEFAULT_MANIFEST, e))?;

    println!("  {} Created {}", "✓".green(), DEFAULT_MANIFEST);
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to describe your pipelines", DEFAULT_MANIFEST.cyan());
    println!("  2. Run {} to check them", "adflow validate".cyan());
    println!("  3. Run {} to see the native documents", "adflow render".cyan());
    println!();

    if verbose {
        println!("{}", "Generated manifest:".dimmed());
        println!("{}", "─".repeat(50).dimmed());
        println!("{}", content.dimmed());
    }

    Ok(())
}

fn generate_manifest(name: &str) -> String {
    format!(
        r#"# adflow manifest
version: "1"

pipelines:
  - name: "{name}-watermark"
    activities:
      - name: refresh_watermark
        type: sql_server_stored_procedure
        stored_procedure_name: sp_refresh_watermark
        linked_service: sql_database

  - name: "{name}"
    # Preset (@hourly, @daily, @weekly, @monthly, @yearly) or five-field cron
    schedule: "0 5 * * *"
    depends_on_pipelines:
      - "{name}-watermark"
    activities:
      - name: lookup_tables
        type: lookup
        dataset: table_list
        source: AzureSqlSource

      - name: copy_tables
        type: for_each
        items: "@activity('lookup_tables').output.value"
        # Children run one after another
        activities:
          - name: copy_table
            type: copy
            input_dataset: source_table
            output_dataset: landing_table
            source: AzureSqlSource
            sink: ParquetSink
          - name: cleanup_staging
            type: delete
            dataset: staging
            recursive: true

      - name: notify
        type: set_variable
        variable_name: status
        value: done
        depends_on:
          copy_tables: [Succeeded, Skipped]

    chains:
      - [lookup_tables, copy_tables]
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::Manifest;
    use crate::pipeline::PipelineValidator;

    #[test]
    fn test_generated_manifest_is_valid() {
        let registry = Manifest::from_yaml(&generate_manifest("sales"))
            .unwrap()
            .into_registry()
            .unwrap();

        assert_eq!(registry.len(), 2);
        for pipeline in registry.iter() {
            let result = PipelineValidator::validate(pipeline);
            assert!(result.is_valid(), "{:?}", result.errors);
        }

        let sales = registry.get("sales").unwrap();
        assert!(sales.activity("copy_tables").unwrap().depends_on().contains("lookup_tables"));
    }
}
