//! One dataset, its RNG and one player for one algorithm.
//!
//! Replacing the dataset swaps sequence, cursor and state in a single `&mut`
//! call and cancels any in-flight auto-play timer.

use crate::config::VizConfig;
use crate::engine::clock::{Clock, SystemClock};
use crate::engine::{AlgorithmKind, GreedyAlgorithm, StepPlayer, StepSequence, VizRng};
use crate::error::VizResult;
use crate::renderers::{NullSink, RenderSink};

/// RNG stream reserved for `kind` under `seed`.
///
/// Each algorithm draws from its own partition, so a seed reproduces the same
/// dataset for an algorithm regardless of what else was generated.
#[must_use]
pub fn algorithm_rng(seed: u64, kind: AlgorithmKind) -> VizRng {
    VizRng::new(seed)
        .partition(AlgorithmKind::ALL.len())
        .into_iter()
        .nth(kind.index())
        .unwrap_or_else(|| VizRng::new(seed))
}

/// A dataset bound to a player.
#[derive(Debug)]
pub struct Session<A: GreedyAlgorithm, R = NullSink, C = SystemClock> {
    config: VizConfig,
    rng: VizRng,
    dataset: A::Dataset,
    player: StepPlayer<A, R, C>,
}

impl<A, R, C> Session<A, R, C>
where
    A: GreedyAlgorithm,
    R: RenderSink<A>,
    C: Clock,
{
    /// Create a session with a random dataset drawn from the config's seed.
    #[must_use]
    pub fn new(config: VizConfig, sink: R, clock: C) -> Self {
        let mut rng = algorithm_rng(config.seed(), A::KIND);
        let dataset = A::random_dataset(&mut rng, &config.datasets);
        Self::assemble(config, rng, dataset, sink, clock)
    }

    /// Create a session around a fixed dataset.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Dataset`](crate::error::VizError::Dataset) if the
    /// dataset violates an instance invariant.
    pub fn with_dataset(config: VizConfig, dataset: A::Dataset, sink: R, clock: C) -> VizResult<Self> {
        A::validate_dataset(&dataset)?;
        let rng = algorithm_rng(config.seed(), A::KIND);
        Ok(Self::assemble(config, rng, dataset, sink, clock))
    }

    fn assemble(config: VizConfig, rng: VizRng, dataset: A::Dataset, sink: R, clock: C) -> Self {
        let mut player = StepPlayer::new(sink, clock, &config.playback);
        let sequence = A::generate(&dataset);
        tracing::info!(algorithm = %A::KIND, seed = config.seed(), steps = sequence.len(), "session created");
        player.set_sequence(sequence);
        Self {
            config,
            rng,
            dataset,
            player,
        }
    }

    /// Draw a fresh random dataset and restart from step 0.
    pub fn regenerate(&mut self) {
        let dataset = A::random_dataset(&mut self.rng, &self.config.datasets);
        self.install(dataset);
    }

    /// Replace the dataset with a fixed one and restart from step 0.
    ///
    /// # Errors
    ///
    /// Returns [`VizError::Dataset`](crate::error::VizError::Dataset) if the
    /// dataset is invalid; the current session is left untouched.
    pub fn load(&mut self, dataset: A::Dataset) -> VizResult<()> {
        if let Err(err) = A::validate_dataset(&dataset) {
            tracing::warn!(algorithm = %A::KIND, error = %err, "rejected dataset");
            return Err(err);
        }
        self.install(dataset);
        Ok(())
    }

    fn install(&mut self, dataset: A::Dataset) {
        let sequence = A::generate(&dataset);
        tracing::info!(algorithm = %A::KIND, steps = sequence.len(), "dataset replaced");
        self.dataset = dataset;
        self.player.set_sequence(sequence);
    }

    /// The current dataset.
    #[must_use]
    pub const fn dataset(&self) -> &A::Dataset {
        &self.dataset
    }

    /// The configuration the session was built with.
    #[must_use]
    pub const fn config(&self) -> &VizConfig {
        &self.config
    }

    /// The step sequence for the current dataset.
    #[must_use]
    pub const fn steps(&self) -> &StepSequence<A::Kind> {
        self.player.sequence()
    }

    /// The player.
    #[must_use]
    pub const fn player(&self) -> &StepPlayer<A, R, C> {
        &self.player
    }

    /// Mutable access to the player.
    pub fn player_mut(&mut self) -> &mut StepPlayer<A, R, C> {
        &mut self.player
    }
}
