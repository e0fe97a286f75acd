#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use tokio::test;

    use crate::errors::{ RecoverableError, VizError, SAMPLE_SYNTHESIS_CONTEXT };
    use crate::implementations::prompts::PromptTemplates;
    use crate::implementations::sample_synthesizer::{ SampleSynthesizer, RAW_INPUT_FIELD };
    use crate::models::artifact::{ VerifiedExample, SENTINEL };
    use crate::models::task::TaskDescription;
    use crate::tests::mocks::{ sentiment_task, MockOracle, MockPredictionApi, FAKE_DATA, SAMPLE };

    fn synthesizer(
        oracle: MockOracle,
        api: MockPredictionApi
    ) -> (SampleSynthesizer, Arc<MockOracle>, Arc<MockPredictionApi>) {
        let oracle = Arc::new(oracle);
        let api = Arc::new(api);
        let synthesizer = SampleSynthesizer::new(
            oracle.clone(),
            api.clone(),
            Arc::new(PromptTemplates::default())
        );
        (synthesizer, oracle, api)
    }

    #[test]
    async fn verified_example_uses_spaced_single_line_json() {
        let (synthesizer, oracle, api) = synthesizer(
            MockOracle::new().respond(SAMPLE, "{\"text\":\"ok\"}"),
            MockPredictionApi::ok("{\"label\":\"positive\"}")
        );

        let example = synthesizer.get_model_output(&sentiment_task()).await.unwrap();

        assert_eq!(example, VerifiedExample::new("{\"text\": \"ok\"}", "{\"label\": \"positive\"}"));
        assert_eq!(api.requests(), vec![("http://localhost:9000/predict".to_string(), json!({ "text": "ok" }))]);

        let calls = oracle.calls_to(SAMPLE);
        assert_eq!(calls.len(), 1);
        assert!(calls[0].user.contains("text: string"));
    }

    #[test]
    async fn non_200_status_yields_sentinel() {
        let (synthesizer, _, api) = synthesizer(
            MockOracle::new().respond(SAMPLE, "{\"text\": \"ok\"}"),
            MockPredictionApi::with_status(500, "internal error")
        );

        let example = synthesizer.get_model_output(&sentiment_task()).await.unwrap();

        assert!(example.is_sentinel());
        assert_eq!(example.input, SENTINEL);
        assert_eq!(api.requests().len(), 1);
    }

    #[test]
    async fn non_json_response_body_is_kept_as_text() {
        let (synthesizer, _, _) = synthesizer(
            MockOracle::new().respond(SAMPLE, "{\"text\": \"ok\"}"),
            MockPredictionApi::ok("  positive\n")
        );

        let example = synthesizer.get_model_output(&sentiment_task()).await.unwrap();
        assert_eq!(example.output, "positive");
    }

    #[test]
    async fn non_json_sample_is_malformed_and_api_is_not_called() {
        let (synthesizer, _, api) = synthesizer(
            MockOracle::new().respond(SAMPLE, "Sure! Here is an input: text=ok"),
            MockPredictionApi::ok("{}")
        );

        let err = synthesizer.get_model_output(&sentiment_task()).await.unwrap_err();

        match &err {
            VizError::MalformedOutput { context, text, .. } => {
                assert_eq!(context, SAMPLE_SYNTHESIS_CONTEXT);
                assert_eq!(text, "Sure! Here is an input: text=ok");
            }
            other => panic!("expected MalformedOutput, got {:?}", other),
        }
        assert!(err.is_recoverable());
        assert!(api.requests().is_empty());
    }

    #[test]
    async fn unreachable_api_is_a_recoverable_transport_failure() {
        let (synthesizer, _, _) = synthesizer(
            MockOracle::new().respond(SAMPLE, "{\"text\": \"ok\"}"),
            MockPredictionApi::unreachable()
        );

        let err = synthesizer.get_model_output(&sentiment_task()).await.unwrap_err();
        assert!(matches!(err, VizError::TransportFailure { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    async fn missing_api_url_is_an_invalid_task() {
        let task = TaskDescription::from_yaml_str(
            "task_description:\n  description: Summarize text\nmodel_information:\n  input_format:\n    text: string\n"
        ).unwrap();
        let (synthesizer, oracle, _) = synthesizer(
            MockOracle::new().respond(SAMPLE, "{\"text\": \"ok\"}"),
            MockPredictionApi::ok("{}")
        );

        let err = synthesizer.get_model_output(&task).await.unwrap_err();
        assert!(matches!(err, VizError::InvalidTask(_)));
        assert_eq!(oracle.call_count(), 0);
    }

    #[test]
    async fn fake_data_parses_json() {
        let (synthesizer, _, api) = synthesizer(
            MockOracle::new().respond(FAKE_DATA, "{\"text\": \"What a lovely day\"}"),
            MockPredictionApi::ok("{}")
        );

        let value = synthesizer.generate_fake_data(&sentiment_task()).await.unwrap();
        assert_eq!(value, json!({ "text": "What a lovely day" }));
        assert!(api.requests().is_empty());
    }

    #[test]
    async fn fake_data_wraps_plain_text() {
        let (synthesizer, _, _) = synthesizer(
            MockOracle::new().respond(FAKE_DATA, "What a lovely day"),
            MockPredictionApi::ok("{}")
        );

        let value = synthesizer.generate_fake_data(&sentiment_task()).await.unwrap();
        assert_eq!(value, json!({ RAW_INPUT_FIELD: "What a lovely day" }));
    }
}
