#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::test;

    use crate::errors::VizError;
    use crate::implementations::prompts::PromptTemplates;
    use crate::implementations::repair::{ DefectRepairer, RepairContext };
    use crate::models::artifact::{ Artifact, VerifiedExample };
    use crate::tests::mocks::{ sentiment_task, MockOracle, CONFIRM, PATCH, RISK_SCAN };

    const HTML: &str = "<!DOCTYPE html>\n<html><body><div id=\"result\"></div><script>const r = data.result.label;</script></body></html>";

    fn repairer(oracle: MockOracle) -> (DefectRepairer, Arc<MockOracle>) {
        let oracle = Arc::new(oracle);
        let repairer = DefectRepairer::new(oracle.clone(), Arc::new(PromptTemplates::default()));
        (repairer, oracle)
    }

    fn context() -> RepairContext {
        RepairContext::from_task(
            &sentiment_task(),
            VerifiedExample::new("{\"text\": \"ok\"}", "{\"label\": \"positive\"}")
        )
    }

    #[test]
    async fn empty_scan_returns_artifact_unchanged() {
        let (repairer, oracle) = repairer(MockOracle::new().respond(RISK_SCAN, "None."));
        let artifact = Artifact::new(HTML);

        let outcome = repairer.repair(&artifact, &context()).await.unwrap();

        assert_eq!(outcome.artifact, artifact);
        assert!(!outcome.changed);
        assert!(outcome.confirmed_issues.is_none());
        assert_eq!(oracle.call_count(), 1);
    }

    #[test]
    async fn risks_flow_through_confirm_into_patch() {
        let (repairer, oracle) = repairer(
            MockOracle::new()
                .respond(RISK_SCAN, "1. data.result may be undefined")
                .respond(CONFIRM, "Real issue: the API returns {label}, not {result: {label}}.")
                .respond(PATCH, "```html\n<html><script>const r = data.label;</script></html>\n```")
        );

        let outcome = repairer.repair(&Artifact::new(HTML), &context()).await.unwrap();

        assert!(outcome.changed);
        assert_eq!(outcome.artifact.html(), "<html><script>const r = data.label;</script></html>");
        assert_eq!(outcome.risks, "1. data.result may be undefined");

        let confirm = oracle.calls_to(CONFIRM);
        assert!(confirm[0].user.contains("1. data.result may be undefined"));
        assert!(confirm[0].user.contains("localhost:9000/predict"));
        assert!(confirm[0].user.contains(HTML));

        let patch = oracle.calls_to(PATCH);
        assert!(patch[0].user.contains("Real issue: the API returns {label}"));
        assert!(patch[0].user.contains("Classify sentiment of a short English text."));
    }

    #[test]
    async fn placeholder_values_in_inputs_are_not_expanded() {
        let (repairer, oracle) = repairer(
            MockOracle::new()
                .respond(RISK_SCAN, "template literal `{{html}}` is never filled")
                .respond(CONFIRM, "confirmed")
                .respond(PATCH, "<html></html>")
        );

        repairer.repair(&Artifact::new(HTML), &context()).await.unwrap();

        let confirm = oracle.calls_to(CONFIRM);
        assert!(confirm[0].user.contains("template literal `{{html}}` is never filled"));
    }

    #[test]
    async fn oracle_failure_propagates() {
        let (repairer, _) = repairer(
            MockOracle::new().respond(RISK_SCAN, "1. possible null").fail(CONFIRM, "503 from provider")
        );

        let err = repairer.repair(&Artifact::new(HTML), &context()).await.unwrap_err();
        assert!(matches!(err, VizError::TransportFailure { .. }));
    }

    #[test]
    async fn patch_output_is_unwrapped_when_unchanged() {
        let fenced = format!("```html\n{}\n```", HTML);
        let (repairer, _) = repairer(
            MockOracle::new()
                .respond(RISK_SCAN, "1. possible null")
                .respond(CONFIRM, "Not an issue.")
                .respond(PATCH, &fenced)
        );

        let outcome = repairer.repair(&Artifact::new(HTML), &context()).await.unwrap();

        assert!(!outcome.changed);
        assert_eq!(outcome.artifact.html(), HTML);
        assert_eq!(outcome.confirmed_issues.as_deref(), Some("Not an issue."));
    }

    #[test]
    async fn empty_patch_is_malformed() {
        for reply in ["", "```html\n```", "```html\n```\nDone, the script is fixed."] {
            let (repairer, _) = repairer(
                MockOracle::new()
                    .respond(RISK_SCAN, "1. possible null")
                    .respond(CONFIRM, "Confirmed")
                    .respond(PATCH, reply)
            );

            let err = repairer.repair(&Artifact::new(HTML), &context()).await.unwrap_err();
            assert!(
                matches!(&err, VizError::MalformedOutput { context, .. } if context == "patch stage"),
                "unexpected error for {:?}: {:?}",
                reply,
                err
            );
            assert_eq!(err.offending_text(), Some(reply));
        }
    }
}
