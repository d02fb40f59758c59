use serde::Serialize;

use crate::random::RandomSource;

/// A candidate solution the [`Population`](super::Population) can evolve.
///
/// Implementors own their encoding, fitness function, mutation and
/// crossover. The population only assigns identities, asks for fitness,
/// ranks, and pairs parents.
pub trait Genome: Sized {
    /// Serializable snapshot returned by `Population::states`.
    type State: Serialize;
    /// Strategy selector passed through to [`Genome::crossover`] untouched.
    type Algorithm;

    fn id(&self) -> usize;

    fn set_id(&mut self, id: usize);

    /// Recompute fitness from the current encoding.
    fn calculate_fitness(&mut self);

    /// Last value computed by `calculate_fitness`.
    fn fitness(&self) -> f64;

    fn state(&self) -> Self::State;

    /// Perturb the encoding in place. `rate` is in `[0, 1]`; `gaussian`
    /// selects normal rather than uniform perturbations.
    fn mutate(&mut self, rate: f64, gaussian: bool, rng: &mut RandomSource);

    /// Combine two parents into one or more children.
    fn crossover(
        a: &Self,
        b: &Self,
        algorithm: &Self::Algorithm,
        gaussian: bool,
        rng: &mut RandomSource,
    ) -> Vec<Self>;
}
