//! Human-readable renderings of a [`Verdict`].
//!
//! - [`check_output`]: title/summary/text shown on the check run
//! - [`step_summary`]: Markdown appended to the Actions job summary
//! - [`missing_reference_message`]: failure message for the job log

use abref_state::CheckOutput;

use crate::classifier::{Verdict, WorkItemRef};

const EXAMPLE_WITH_WORK_ITEM: &str = "Fixed login issue as described in AB#123456";
const EXAMPLE_WITHOUT_WORK_ITEM: &str = "Updated documentation - no-ab";

const REMEDY_ADD_REFERENCE: &str =
    "Add a work item reference in the format `AB#123456` to your PR description";
const REMEDY_ADD_MARKER: &str = "Or bypass the check by adding `no-ab` to your PR description";

const MISSING_REFERENCE_MESSAGE: &str = "❌ Missing Azure Board Reference

This PR needs to be linked to an Azure Board work item.

To fix, either:
   1. Add a work item reference in the format AB#123456 to your PR description
   2. Or bypass the check by adding \"no-ab\" to your PR description

Examples:
   With work item: \"Fixed login issue as described in AB#123456\"
   Without work item: \"Updated documentation - no-ab\"
";

/// Failure message printed when no reference was found.
pub fn missing_reference_message() -> &'static str {
    MISSING_REFERENCE_MESSAGE
}

fn bullet_list(refs: &[WorkItemRef]) -> String {
    refs.iter().map(|r| format!("- {}\n", r)).collect()
}

/// Build the check run display payload.
pub fn check_output(verdict: &Verdict) -> CheckOutput {
    match verdict {
        Verdict::References(refs) => {
            let names: Vec<&str> = refs.iter().map(WorkItemRef::as_str).collect();
            CheckOutput {
                title: "Azure Boards reference found".to_string(),
                summary: format!("Work items referenced in this PR: {}", names.join(", ")),
                text: Some(bullet_list(refs)),
            }
        }
        Verdict::Exempted => CheckOutput {
            title: "Azure Boards reference check bypassed".to_string(),
            summary: "Check bypassed with the `no-ab` exemption keyword.".to_string(),
            text: Some(
                "This PR has been marked as not requiring an Azure Board reference.".to_string(),
            ),
        },
        Verdict::Missing => CheckOutput {
            title: "Azure Boards reference missing".to_string(),
            summary: format!(
                "No Azure Board reference found in PR description.\n\nTo fix, either:\n1. {}\n2. {}",
                REMEDY_ADD_REFERENCE, REMEDY_ADD_MARKER
            ),
            text: Some(examples_markdown()),
        },
    }
}

fn examples_markdown() -> String {
    format!(
        "## Examples:\n\nWith work item:\n\n```markdown\n{}\n```\n\nWithout work item:\n\n```markdown\n{}\n```\n",
        EXAMPLE_WITH_WORK_ITEM, EXAMPLE_WITHOUT_WORK_ITEM
    )
}

/// Render the Markdown job summary.
pub fn step_summary(verdict: &Verdict) -> String {
    match verdict {
        Verdict::References(refs) => {
            let mut md = String::from("# ✅ Azure Board Reference Found\n\n");
            md.push_str("Work items referenced in this PR:\n\n");
            md.push_str(&bullet_list(refs));
            md
        }
        Verdict::Exempted => {
            let mut md = String::from("# ✅ Azure Board Reference Check Bypassed\n\n");
            md.push_str("Check bypassed with `no-ab` keyword\n\n---\n\n");
            md.push_str("This PR has been marked as not requiring an Azure Board reference.\n");
            md
        }
        Verdict::Missing => {
            let mut md = String::from("# ❌ Azure Board Reference Missing\n\n");
            md.push_str("No Azure Board reference found in PR description\n\n---\n\n");
            md.push_str("## To fix, either:\n\n");
            md.push_str(&format!("- {}\n- {}\n\n---\n\n", REMEDY_ADD_REFERENCE, REMEDY_ADD_MARKER));
            md.push_str(&examples_markdown());
            md
        }
    }
}
