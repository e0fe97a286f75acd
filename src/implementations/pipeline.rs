use std::fs;
use std::path::{ Path, PathBuf };
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use log::{ debug, info, warn };

use crate::config::PipelineOptions;
use crate::errors::{ RecoverableError, VizError, VizResult };
use crate::implementations::oracle_client::invoke_stage;
use crate::implementations::prompts::PromptTemplates;
use crate::implementations::repair::{ DefectRepairer, RepairContext };
use crate::implementations::sample_synthesizer::SampleSynthesizer;
use crate::implementations::section_extractor::extract_specs;
use crate::models::artifact::{ strip_code_fences, Artifact, DesignDocument, VerifiedExample };
use crate::models::outcome::{ PipelineOutcome, RepairReport };
use crate::models::spec_triple::SpecTriple;
use crate::models::stage::{
    stages_for,
    PromptPair,
    StageDescriptor,
    StageKind,
    StageResult,
    StageTiming,
};
use crate::models::task::TaskDescription;
use crate::traits::oracle::Oracle;
use crate::traits::prediction_api::PredictionApi;

/// State accumulated by one run. Each stage reads what earlier stages left
/// here and fills in its own slot.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub task: Arc<TaskDescription>,
    pub specs: Option<SpecTriple>,
    pub design: Option<DesignDocument>,
    pub artifact: Option<Artifact>,
    pub example: Option<VerifiedExample>,
    pub generated_path: Option<PathBuf>,
    pub timings: Vec<StageTiming>,
}

impl RunContext {
    pub fn new(task: Arc<TaskDescription>) -> Self {
        Self {
            task,
            specs: None,
            design: None,
            artifact: None,
            example: None,
            generated_path: None,
            timings: Vec::new(),
        }
    }

    fn specs(&self, stage: StageKind) -> VizResult<&SpecTriple> {
        self.specs.as_ref().ok_or_else(|| missing_input(stage, "spec triple"))
    }

    fn artifact(&self, stage: StageKind) -> VizResult<&Artifact> {
        self.artifact.as_ref().ok_or_else(|| missing_input(stage, "artifact"))
    }

    fn example(&self, stage: StageKind) -> VizResult<&VerifiedExample> {
        self.example.as_ref().ok_or_else(|| missing_input(stage, "verified example"))
    }
}

fn missing_input(stage: StageKind, what: &str) -> VizError {
    VizError::PipelineState(format!("stage {} ran before the {} was produced", stage, what))
}

/// Drives the ordered stage list for one task and then the defect-repair chain
#[derive(Clone)]
pub struct GenerationPipeline {
    oracle: Arc<dyn Oracle>,
    prompts: Arc<PromptTemplates>,
    synthesizer: SampleSynthesizer,
    repairer: DefectRepairer,
    options: PipelineOptions,
}

impl GenerationPipeline {
    pub fn new(
        oracle: Arc<dyn Oracle>,
        prediction_api: Arc<dyn PredictionApi>,
        prompts: PromptTemplates,
        options: PipelineOptions
    ) -> Self {
        let prompts = Arc::new(prompts);
        Self {
            synthesizer: SampleSynthesizer::new(
                Arc::clone(&oracle),
                prediction_api,
                Arc::clone(&prompts)
            ),
            repairer: DefectRepairer::new(Arc::clone(&oracle), Arc::clone(&prompts)),
            oracle,
            prompts,
            options,
        }
    }

    /// The ordered stage list for the configured variant
    pub fn stages(&self) -> Vec<StageDescriptor> {
        stages_for(self.options.variant)
    }

    /// Load the task file and run everything
    pub async fn run(&self, task_path: &Path) -> VizResult<PipelineOutcome> {
        let task = TaskDescription::from_path(task_path)?;
        self.run_task(task).await
    }

    /// Generate, persist, then repair and persist the repaired artifact.
    ///
    /// A repair failure is returned as an error; the generated artifact has
    /// already been written at that point and stays as the last good state.
    pub async fn run_task(&self, task: TaskDescription) -> VizResult<PipelineOutcome> {
        let started_at = Utc::now();
        let run_id = format!("run_{}", started_at.timestamp_millis());
        info!("Starting {} ({} variant)", run_id, self.options.variant);

        let task = Arc::new(task);
        let ctx = self.generate(Arc::clone(&task)).await?;

        let specs = ctx.specs.clone().ok_or_else(|| missing_input(StageKind::Persist, "spec triple"))?;
        let artifact = ctx.artifact(StageKind::Persist)?.clone();
        let example = ctx.example(StageKind::Persist)?.clone();
        let generated_path = ctx.generated_path
            .clone()
            .ok_or_else(|| VizError::PipelineState("the persist stage did not run".to_string()))?;

        let repair = if self.options.repair {
            let context = RepairContext::from_task(&task, example.clone());
            let outcome = self.repairer.repair(&artifact, &context).await?;
            let path = write_artifact(&self.options.output.repaired, &outcome.artifact)?;
            info!("Saved repaired interface to {}", path.display());
            Some(RepairReport { outcome, path })
        } else {
            debug!("Repair disabled, skipping defect scan");
            None
        };

        Ok(PipelineOutcome {
            run_id,
            variant: self.options.variant,
            started_at,
            finished_at: Utc::now(),
            timings: ctx.timings,
            specs,
            design: ctx.design,
            example,
            artifact,
            generated_path,
            repair,
        })
    }

    /// Run the generation stages (S1 to S7) over `task`.
    ///
    /// With `concurrent_example` the example verification is joined with the
    /// stages that precede the first stage needing it; otherwise every stage
    /// runs in list order.
    pub async fn generate(&self, task: Arc<TaskDescription>) -> VizResult<RunContext> {
        let stages = self.stages();
        let split = stages
            .iter()
            .position(|s| s.kind.requires_example())
            .unwrap_or(stages.len());
        let (leading, trailing) = stages.split_at(split);

        let mut ctx = RunContext::new(Arc::clone(&task));
        let verify_early =
            self.options.concurrent_example &&
            leading.iter().any(|s| s.kind == StageKind::VerifyExample);

        if verify_early {
            let chain: Vec<StageDescriptor> = leading
                .iter()
                .filter(|s| s.kind != StageKind::VerifyExample)
                .copied()
                .collect();

            debug!("Verifying the example alongside {} stages", chain.len());
            let mut side = RunContext::new(Arc::clone(&task));
            let verify = [StageDescriptor::required(StageKind::VerifyExample)];
            tokio::try_join!(
                self.run_sequence(&chain, &mut ctx),
                self.run_sequence(&verify, &mut side)
            )?;
            ctx.example = side.example;
            ctx.timings.extend(side.timings);
        } else {
            self.run_sequence(leading, &mut ctx).await?;
        }

        self.run_sequence(trailing, &mut ctx).await?;
        Ok(ctx)
    }

    async fn run_sequence(
        &self,
        stages: &[StageDescriptor],
        ctx: &mut RunContext
    ) -> VizResult<()> {
        for descriptor in stages {
            let started = Instant::now();
            self.run_stage(descriptor.kind, ctx).await?;
            ctx.timings.push(StageTiming {
                stage: descriptor.kind,
                elapsed: started.elapsed(),
            });
        }
        Ok(())
    }

    /// Run one stage. A failure of a non-fatal stage is replaced by that
    /// stage's degraded value instead of aborting the run.
    async fn run_stage(&self, stage: StageKind, ctx: &mut RunContext) -> VizResult<()> {
        match self.execute_stage(stage, ctx).await {
            Err(e) if !stage.is_fatal() => degrade(stage, ctx, e),
            result => result,
        }
    }

    async fn execute_stage(&self, stage: StageKind, ctx: &mut RunContext) -> VizResult<()> {
        match stage {
            StageKind::VerifyExample => {
                let example = self.synthesizer.get_model_output(&ctx.task).await?;
                ctx.example = Some(example);
            }
            StageKind::Persist => {
                let artifact = ctx.artifact(stage)?;
                let path = write_artifact(&self.options.output.generated, artifact)?;
                info!("Saved generated interface to {}", path.display());
                ctx.generated_path = Some(path);
            }
            _ => {
                let prompt = self.stage_prompt(stage, ctx)?;
                let result = invoke_stage(self.oracle.as_ref(), stage, prompt).await?;
                absorb(ctx, result)?;
            }
        }
        Ok(())
    }

    fn stage_prompt(&self, stage: StageKind, ctx: &RunContext) -> VizResult<PromptPair> {
        let variant = self.options.variant;
        match stage {
            StageKind::Specify => self.prompts.specify(&ctx.task),
            StageKind::Design => self.prompts.design(ctx.specs(stage)?),
            StageKind::Structure =>
                self.prompts.structure(ctx.specs(stage)?, ctx.design.as_ref(), variant),
            StageKind::Behavior => {
                let example = ctx.example(stage)?;
                if example.is_sentinel() {
                    warn!("Embedding the unverified example placeholder in the behavior prompt");
                }
                self.prompts.behavior(
                    ctx.artifact(stage)?,
                    ctx.specs(stage)?,
                    ctx.task.api_url().unwrap_or_default(),
                    example
                )
            }
            StageKind::Style =>
                self.prompts.style(
                    ctx.artifact(stage)?,
                    ctx.specs(stage)?,
                    ctx.design.as_ref(),
                    variant
                ),
            other =>
                Err(VizError::PipelineState(format!("stage {} has no generation prompt", other))),
        }
    }
}

/// Fill in the fallback value of a stage whose failure does not abort the run
fn degrade(stage: StageKind, ctx: &mut RunContext, error: VizError) -> VizResult<()> {
    match stage {
        StageKind::VerifyExample => {
            if error.is_recoverable() {
                warn!("Example verification failed, using placeholder: {}", error);
            } else {
                warn!("Example verification could not run, using placeholder: {}", error);
            }
            ctx.example = Some(VerifiedExample::sentinel());
            Ok(())
        }
        _ => Err(error),
    }
}

/// Fold one oracle response into the run state
fn absorb(ctx: &mut RunContext, result: StageResult) -> VizResult<()> {
    match result.stage {
        StageKind::Specify => {
            ctx.specs = Some(extract_specs(&result.text)?);
        }
        StageKind::Design => {
            ctx.design = Some(DesignDocument(result.text));
        }
        StageKind::Structure | StageKind::Behavior | StageKind::Style => {
            let artifact = Artifact::from_oracle_text(&result.text);
            if artifact.is_empty() {
                return Err(
                    VizError::malformed(
                        format!("{} stage", result.stage),
                        "oracle returned an empty document",
                        result.text
                    )
                );
            }
            ctx.artifact = Some(artifact);
        }
        other => {
            return Err(
                VizError::PipelineState(format!("stage {} does not produce run state", other))
            );
        }
    }
    Ok(())
}

/// Write `artifact` to `path` without wrapping fences, creating parent directories
pub fn write_artifact(path: &Path, artifact: &Artifact) -> VizResult<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, strip_code_fences(artifact.html()))?;
    Ok(path.to_path_buf())
}
