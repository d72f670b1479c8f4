//! The conversation state machine.
//!
//! A conversation runs as one async task. It suspends in exactly three
//! places: between two reveal ticks, while an effect plays, and while
//! waiting for player input. Inputs arrive on an mpsc channel fed by
//! `ConversationHandle`; the current phase is published on a watch channel.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parley_core::clock::Clock;
use parley_core::config::DialogueConfig;
use parley_core::error::DialogueError;
use parley_core::handoff::{SceneHandoff, SceneHandoffStore};
use parley_core::presentation::{ChoiceHandle, ChoiceOption, PresentationPort};
use parley_effects::{EffectMoment, EffectQueue, request_for_branch};
use parley_graph::{Branch, BranchGraph, ChoiceTarget, ConversationSource, Line};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, instrument, warn};

use super::handle::ConversationHandle;
use super::stage::Stage;
use crate::domain::state::{ConversationOutcome, ConversationPhase, ConversationState, PlayerInput};
use crate::domain::transition::{BranchExit, exit_for};
use crate::domain::typing::TypingPlayer;

/// Where play goes after a branch.
enum Departure {
    To(Arc<Branch>),
    End,
    Scene(SceneHandoff),
}

/// Plays conversations over a branch graph.
///
/// One engine runs one conversation at a time; several engines may run
/// side by side as long as they share the same `EffectQueue`.
pub struct ConversationEngine {
    config: DialogueConfig,
    graph: BranchGraph,
    stage: Stage,
    effects: EffectQueue,
    handoff: Arc<dyn SceneHandoffStore>,
    clock: Arc<dyn Clock>,
    typing: TypingPlayer,
    state: ConversationState,
    inputs: mpsc::Receiver<PlayerInput>,
    phase: watch::Sender<ConversationPhase>,
}

impl ConversationEngine {
    /// Creates an idle engine and the handle used to drive it.
    #[must_use]
    pub fn new(
        config: DialogueConfig,
        presentation: Arc<dyn PresentationPort>,
        effects: EffectQueue,
        handoff: Arc<dyn SceneHandoffStore>,
        clock: Arc<dyn Clock>,
    ) -> (Self, ConversationHandle) {
        let (input_tx, input_rx) = mpsc::channel(config.input_buffer.max(1));
        let (phase_tx, phase_rx) = watch::channel(ConversationPhase::Idle);
        let engine = Self {
            config,
            graph: BranchGraph::new(),
            stage: Stage::new(presentation),
            effects,
            handoff,
            clock,
            typing: TypingPlayer::new(),
            state: ConversationState::default(),
            inputs: input_rx,
            phase: phase_tx,
        };
        (engine, ConversationHandle::new(input_tx, phase_rx))
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> ConversationPhase {
        *self.phase.borrow()
    }

    #[must_use]
    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// The graph built by the last `start_conversation`.
    #[must_use]
    pub fn graph(&self) -> &BranchGraph {
        &self.graph
    }

    /// Rebuilds the graph from `source` and plays it from its first branch
    /// until the conversation ends.
    ///
    /// Never fails: conditions that stop traversal are logged and reported
    /// as `ConversationOutcome::Aborted`. The presentation is cleared and
    /// the phase is `Ended` whatever the outcome.
    #[instrument(skip_all, fields(version = source.version))]
    pub async fn start_conversation(&mut self, source: &ConversationSource) -> ConversationOutcome {
        let outcome = match self.run(source).await {
            Ok(outcome) => outcome,
            Err(DialogueError::EngineClosed) => {
                warn!("player input closed; conversation aborted");
                ConversationOutcome::Aborted(DialogueError::EngineClosed)
            }
            Err(e) => {
                error!(error = %e, "conversation aborted");
                ConversationOutcome::Aborted(e)
            }
        };
        self.clean_up();
        info!(?outcome, "conversation ended");
        outcome
    }

    async fn run(&mut self, source: &ConversationSource) -> Result<ConversationOutcome, DialogueError> {
        self.state.reset();
        self.typing.reset();
        self.discard_stale_inputs();
        self.publish(ConversationPhase::Idle);

        debug!(hash = %source.version_hash(), "building branch graph");
        if self.config.strict_branch_ids {
            self.graph.build_strict(&source.groups)?;
        } else {
            self.graph.build(&source.groups);
        }
        let mut branch = self
            .graph
            .first()
            .cloned()
            .ok_or(DialogueError::EmptyGraph)?;

        self.stage.hide_all_speakers();
        self.state.is_active = true;
        info!(branches = self.graph.len(), first = %branch.id, "conversation started");

        // Branches entered since play last waited on anything.
        let mut silent: HashSet<String> = HashSet::new();
        loop {
            if branch.passes_through() {
                if !silent.insert(branch.id.clone()) {
                    error!(branch_id = %branch.id, "branches loop without lines, choices or effects");
                    return Err(DialogueError::SilentCycle(branch.id.clone()));
                }
            } else {
                silent.clear();
            }
            match self.play_branch(&branch).await? {
                Departure::To(next) => {
                    self.leave_branch(&branch).await?;
                    branch = next;
                }
                Departure::End => {
                    self.leave_branch(&branch).await?;
                    return Ok(ConversationOutcome::Finished);
                }
                Departure::Scene(handoff) => {
                    if let Err(e) = self.handoff.save(&handoff).await {
                        error!(error = %e, scene_id = %handoff.scene_id, "scene hand-off not saved");
                    }
                    return Ok(ConversationOutcome::SceneTransition(handoff));
                }
            }
        }
    }

    /// Plays `branch` from its start effect to the resolution of what
    /// follows its last line.
    #[instrument(skip_all, fields(branch_id = %branch.id))]
    async fn play_branch(&mut self, branch: &Arc<Branch>) -> Result<Departure, DialogueError> {
        self.state.enter(Arc::clone(branch));

        if branch.effect_settings.fires_on_start() {
            self.publish(ConversationPhase::AwaitingStartEffect);
            self.play_effect(branch, EffectMoment::Start).await?;
        }

        for (index, line) in branch.lines.iter().enumerate() {
            self.state.line_cursor = Some(index);
            self.reveal(line).await?;
            self.await_advance().await?;
            self.stage.indicator(line.speaker_index, false);
        }

        match exit_for(branch, &self.graph) {
            BranchExit::ShowChoices => {
                let target = self.await_choice(branch).await?;
                match target {
                    ChoiceTarget::GotoBranch(id) => self.resolve(&id).map(Departure::To),
                    ChoiceTarget::GotoScene {
                        scene_id,
                        camera_position,
                    } => Ok(Departure::Scene(SceneHandoff {
                        scene_id,
                        camera_position,
                    })),
                    ChoiceTarget::EndConversation => Ok(Departure::End),
                }
            }
            BranchExit::AutoNext(id) => self.resolve(&id).map(Departure::To),
            BranchExit::Successor(next) => Ok(Departure::To(next)),
            BranchExit::End => Ok(Departure::End),
        }
    }

    fn resolve(&self, id: &str) -> Result<Arc<Branch>, DialogueError> {
        self.graph.lookup(id).cloned().ok_or_else(|| {
            error!(branch_id = id, "branch not found");
            DialogueError::MissingBranch(id.to_owned())
        })
    }

    async fn leave_branch(&mut self, branch: &Branch) -> Result<(), DialogueError> {
        if branch.effect_settings.fires_on_end() {
            self.publish(ConversationPhase::AwaitingEndEffect);
            self.play_effect(branch, EffectMoment::End).await?;
        }
        Ok(())
    }

    async fn play_effect(&mut self, branch: &Branch, moment: EffectMoment) -> Result<(), DialogueError> {
        let settings = &branch.effect_settings;
        let delay = Duration::try_from_secs_f32(settings.delay.max(0.0)).unwrap_or(Duration::ZERO);
        if !delay.is_zero() {
            self.ignoring_input(tokio::time::sleep(delay)).await?;
        }

        let request = request_for_branch(&branch.id, settings, moment, &self.config, self.clock.as_ref());
        let completion = self.effects.enqueue(request);
        let report = self.ignoring_input(completion.wait()).await?;
        debug!(request_id = %report.request_id, executed = report.executed, "effect finished");
        Ok(())
    }

    /// Types out `line`, stopping early on an `Advance`.
    async fn reveal(&mut self, line: &Line) -> Result<(), DialogueError> {
        let speaker = line.speaker_index;
        self.state.current_speaker = Some(speaker);
        self.stage.focus(speaker);
        self.stage.name(speaker, &line.speaker_name);

        self.typing.start(line.text.as_str(), self.config.typing_interval());
        self.state.is_revealing = true;
        self.publish(ConversationPhase::Revealing);

        while let Some(step) = self.typing.tick() {
            self.stage.text(speaker, step.revealed);
            if step.finished {
                break;
            }
            if self.tick_or_skip().await? {
                if let Some(full) = self.typing.skip_to_end() {
                    self.stage.text(speaker, full);
                }
                break;
            }
        }

        self.state.is_revealing = false;
        self.stage.indicator(speaker, true);
        self.publish(ConversationPhase::AwaitingAdvanceInput);
        Ok(())
    }

    /// Waits one reveal interval. Returns true if an `Advance` came first.
    async fn tick_or_skip(&mut self) -> Result<bool, DialogueError> {
        let tick = tokio::time::sleep(self.typing.interval());
        tokio::pin!(tick);
        loop {
            tokio::select! {
                () = &mut tick => return Ok(false),
                input = self.inputs.recv() => match input {
                    Some(PlayerInput::Advance) => return Ok(true),
                    Some(PlayerInput::Choose(choice)) => {
                        debug!(?choice, "choice ignored while revealing");
                    }
                    None => return Err(DialogueError::EngineClosed),
                },
            }
        }
    }

    async fn await_advance(&mut self) -> Result<(), DialogueError> {
        loop {
            match self.inputs.recv().await {
                Some(PlayerInput::Advance) => return Ok(()),
                Some(PlayerInput::Choose(choice)) => {
                    debug!(?choice, "choice ignored while no choices are shown");
                }
                None => return Err(DialogueError::EngineClosed),
            }
        }
    }

    async fn await_choice(&mut self, branch: &Branch) -> Result<ChoiceTarget, DialogueError> {
        if let Some(speaker) = self.state.current_speaker {
            self.stage.hide_speaker(speaker);
        }
        let options: Vec<ChoiceOption> = branch
            .choices
            .iter()
            .enumerate()
            .map(|(index, choice)| ChoiceOption {
                label: choice.label.clone(),
                handle: ChoiceHandle(index),
            })
            .collect();
        self.stage.show_choices(&options);
        self.publish(ConversationPhase::ShowingChoices);

        loop {
            match self.inputs.recv().await {
                Some(PlayerInput::Choose(handle)) => {
                    if let Some(choice) = branch.choices.get(handle.0) {
                        info!(label = %choice.label, "choice selected");
                        self.stage.hide_choices();
                        return Ok(choice.target.clone());
                    }
                    warn!(?handle, "choice handle not on the panel; ignored");
                }
                Some(PlayerInput::Advance) => debug!("advance ignored while choices are shown"),
                None => return Err(DialogueError::EngineClosed),
            }
        }
    }

    /// Awaits `future`, discarding any input that arrives meanwhile.
    ///
    /// If the input channel closes, `future` still runs to completion
    /// before `EngineClosed` is returned.
    async fn ignoring_input<F: Future>(&mut self, future: F) -> Result<F::Output, DialogueError> {
        tokio::pin!(future);
        let mut closed = false;
        loop {
            tokio::select! {
                output = &mut future => {
                    return if closed { Err(DialogueError::EngineClosed) } else { Ok(output) };
                }
                input = self.inputs.recv(), if !closed => match input {
                    Some(input) => debug!(?input, "input ignored while an effect plays"),
                    None => closed = true,
                },
            }
        }
    }

    fn discard_stale_inputs(&mut self) {
        while let Ok(input) = self.inputs.try_recv() {
            debug!(?input, "stale input discarded");
        }
    }

    fn clean_up(&mut self) {
        self.stage.clear();
        self.typing.reset();
        self.state.reset();
        self.publish(ConversationPhase::Ended);
    }

    fn publish(&self, phase: ConversationPhase) {
        self.phase.send_replace(phase);
    }
}
