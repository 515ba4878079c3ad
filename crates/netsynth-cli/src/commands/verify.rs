//! Verify command - structural check of a policy file

use std::path::PathBuf;

use clap::Args;
use netsynth_verify::ValidationReport;

use super::format::{render_table, OutputFormat};
use crate::config::NetsynthConfig;
use crate::{Error, Result};

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Policy file to check (default: configured policy file)
    pub file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub output: OutputFormat,
}

pub fn run(args: VerifyArgs, config: &NetsynthConfig) -> Result<()> {
    let file = args.file.unwrap_or_else(|| config.policy_file());
    let report = netsynth_verify::validate_file(&file)?;

    match args.output {
        OutputFormat::Table => println!("{}", render_report(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if report.valid {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "{}: {} of {} documents invalid",
            file.display(),
            report.documents.len() - report.valid_count(),
            report.documents.len()
        )))
    }
}

fn render_report(report: &ValidationReport) -> String {
    let rows: Vec<Vec<String>> = report
        .documents
        .iter()
        .map(|d| {
            vec![
                d.index.to_string(),
                d.namespace.clone().unwrap_or_else(|| "-".to_string()),
                d.name.clone().unwrap_or_else(|| "-".to_string()),
                if d.valid { "valid" } else { "invalid" }.to_string(),
                d.errors.len().to_string(),
            ]
        })
        .collect();

    let mut out = render_table(&["INDEX", "NAMESPACE", "NAME", "STATUS", "ERRORS"], &rows);

    for doc in report.invalid_documents() {
        out.push_str(&format!("\n\nDocument {}:", doc.index));
        for error in &doc.errors {
            out.push_str(&format!("\n  - {}", error));
        }
    }

    if !report.errors.is_empty() {
        out.push_str("\n\nFile errors:");
        for error in &report.errors {
            out.push_str(&format!("\n  - {}", error));
        }
    }

    if report.valid {
        out.push_str(&format!(
            "\n\nAll {} policies passed",
            report.documents.len()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"apiVersion: cilium.io/v2
kind: CiliumNetworkPolicy
metadata:
  name: api-policy
  namespace: prod
spec:
  endpointSelector:
    matchLabels:
      app: api
"#;

    fn verify(text: &str, output: OutputFormat) -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.yaml");
        std::fs::write(&path, text).unwrap();
        run(
            VerifyArgs {
                file: Some(path),
                output,
            },
            &NetsynthConfig::default(),
        )
    }

    #[test]
    fn story_valid_file_succeeds() {
        assert!(verify(VALID, OutputFormat::Table).is_ok());
        assert!(verify(VALID, OutputFormat::Json).is_ok());
    }

    #[test]
    fn story_invalid_file_fails_with_validation_error() {
        let text = VALID.replace("cilium.io/v2", "wrong/v1");
        let err = verify(&text, OutputFormat::Table).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert!(err.to_string().contains("1 of 1 documents invalid"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = run(
            VerifyArgs {
                file: Some(PathBuf::from("/nonexistent/policy.yaml")),
                output: OutputFormat::Table,
            },
            &NetsynthConfig::default(),
        );
        assert!(matches!(result, Err(Error::Core(_))));
    }

    #[test]
    fn table_lists_each_document_and_its_errors() {
        let bad = VALID
            .replace("api-policy", "db-policy")
            .replace("kind: CiliumNetworkPolicy", "kind: NetworkPolicy");
        let report = netsynth_verify::validate_policies(&format!("{VALID}---\n{bad}"));
        let out = render_report(&report);

        assert!(out.starts_with("INDEX"));
        assert!(out.contains("api-policy"));
        assert!(out.contains("db-policy"));
        assert!(out.contains("Document 2:"));
        assert!(out.contains("invalid kind"));
        assert!(!out.contains("passed"));
    }
}
