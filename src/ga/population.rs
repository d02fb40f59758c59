//! Population management: evaluation, ranking, selection, crossover and
//! mutation over an ordered, growable set of genomes.
//!
//! `count` is fixed at construction. Crossover grows the population past it
//! and the next selection culls back to `count / 2` (or an explicit take).

use tracing::{debug, warn};

use super::genome::Genome;
use crate::error::{Error, Result};
use crate::random::RandomSource;

/// Half-width of the parent window sampled around the front of the ranking.
pub const CROSSOVER_RANGE: usize = 5;

/// Summary of the current fitness values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitnessStats {
    pub best: f64,
    pub worst: f64,
    pub mean: f64,
}

pub struct Population<G: Genome> {
    count: usize,
    pop: Vec<G>,
    rng: RandomSource,
    /// Identity handed to the next child born in crossover.
    next_id: usize,
    /// True once fitness has been recomputed and nothing touched the genomes since.
    evaluated: bool,
}

impl<G: Genome> Population<G> {
    /// Adopt pre-built genomes; identities become their positions.
    pub fn from_genomes<I>(genomes: I, rng: RandomSource) -> Self
    where
        I: IntoIterator<Item = G>,
    {
        let mut pop: Vec<G> = genomes.into_iter().collect();
        for (i, genome) in pop.iter_mut().enumerate() {
            genome.set_id(i);
        }
        Self {
            count: pop.len(),
            next_id: pop.len(),
            pop,
            rng,
            evaluated: false,
        }
    }

    /// Rebuild a population saved mid-run. Identities are kept as they are
    /// and `count` is the construction-time count of the saved run, which
    /// usually differs from the number of genomes handed in.
    pub fn with_count<I>(genomes: I, count: usize, rng: RandomSource) -> Self
    where
        I: IntoIterator<Item = G>,
    {
        let pop: Vec<G> = genomes.into_iter().collect();
        let next_id = pop
            .iter()
            .map(|g| g.id() + 1)
            .max()
            .unwrap_or(0)
            .max(count);
        Self {
            count,
            pop,
            rng,
            next_id,
            evaluated: false,
        }
    }

    /// Build `count` genomes with a per-index factory.
    pub fn from_fn<F>(count: usize, mut creator: F, rng: RandomSource) -> Self
    where
        F: FnMut(usize, &mut RandomSource) -> G,
    {
        let mut rng = rng;
        let mut pop = Vec::with_capacity(count);
        for i in 0..count {
            let mut genome = creator(i, &mut rng);
            genome.set_id(i);
            pop.push(genome);
        }
        Self {
            count,
            pop,
            rng,
            next_id: count,
            evaluated: false,
        }
    }

    /// Genome count recorded at construction.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Current number of genomes.
    pub fn len(&self) -> usize {
        self.pop.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pop.is_empty()
    }

    pub fn genomes(&self) -> &[G] {
        &self.pop
    }

    /// Mutable access; marks fitness stale.
    pub fn genomes_mut(&mut self) -> &mut [G] {
        self.evaluated = false;
        &mut self.pop
    }

    pub fn into_genomes(self) -> Vec<G> {
        self.pop
    }

    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    pub fn rng_mut(&mut self) -> &mut RandomSource {
        &mut self.rng
    }

    fn evaluate(&mut self) {
        for genome in &mut self.pop {
            genome.calculate_fitness();
        }
        self.evaluated = true;
    }

    fn sort(&mut self, minimize: bool) {
        if minimize {
            self.pop.sort_by(|a, b| a.fitness().total_cmp(&b.fitness()));
        } else {
            self.pop.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
        }
    }

    /// Evaluate and return the top-ranked genome without reordering.
    /// Among equal fitness, the earliest genome wins.
    pub fn best_creature(&mut self, minimize: bool) -> Result<&G> {
        self.evaluate();
        let mut best = 0;
        for (i, genome) in self.pop.iter().enumerate().skip(1) {
            let ord = genome.fitness().total_cmp(&self.pop[best].fitness());
            if (minimize && ord.is_lt()) || (!minimize && ord.is_gt()) {
                best = i;
            }
        }
        self.pop.get(best).ok_or(Error::EmptyPopulation)
    }

    /// Evaluate, rank, and keep the best `take` genomes (default `count / 2`).
    pub fn selection(&mut self, minimize: bool, take: Option<usize>) {
        self.evaluate();
        self.sort(minimize);
        let keep = take.unwrap_or(self.count / 2);
        debug!(from = self.pop.len(), keep, minimize, "selection");
        self.pop.truncate(keep);
    }

    /// Pair parents from the front of the ranking and append their children.
    ///
    /// Runs one pairing per `i = 0, 2, 4, .. < count / 2`. Each child gets a
    /// fresh identity, continuing after every id handed out so far. Returns
    /// the number of children appended.
    pub fn crossover(&mut self, algorithm: &G::Algorithm, gaussian: bool) -> Result<usize> {
        let pairings = (0..self.count / 2).step_by(2).len();
        if pairings == 0 {
            return Ok(0);
        }
        if self.pop.is_empty() {
            return Err(Error::EmptyPopulation);
        }
        let last = self.pop.len() - 1;
        if last == 0 {
            warn!("crossover on a single genome: parents cannot be distinct");
        }

        let mut children = Vec::new();
        for _ in 0..pairings {
            let (i1, i2) = pick_parents(&mut self.rng, gaussian, last);
            children.extend(G::crossover(
                &self.pop[i1],
                &self.pop[i2],
                algorithm,
                gaussian,
                &mut self.rng,
            ));
        }

        for child in &mut children {
            child.set_id(self.next_id);
            self.next_id += 1;
        }
        let born = children.len();
        debug!(pairings, born, len = self.pop.len() + born, "crossover");
        self.pop.extend(children);
        self.evaluated = false;
        Ok(born)
    }

    /// Mutate every genome with the given rate and distribution family.
    pub fn mutate(&mut self, rate: f64, gaussian: bool) -> Result<()> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(Error::InvalidRate(rate));
        }
        for genome in &mut self.pop {
            genome.mutate(rate, gaussian, &mut self.rng);
        }
        self.evaluated = false;
        Ok(())
    }

    /// Evaluate and snapshot every genome's state in sequence order.
    pub fn states(&mut self) -> Vec<G::State> {
        self.evaluate();
        self.pop.iter().map(Genome::state).collect()
    }

    /// Mean fitness of the current genomes, without re-evaluating.
    pub fn average_fitness(&self) -> Result<f64> {
        self.check_fresh()?;
        let sum: f64 = self.pop.iter().map(Genome::fitness).sum();
        Ok(sum / self.pop.len() as f64)
    }

    /// Best, worst and mean fitness, without re-evaluating.
    pub fn stats(&self, minimize: bool) -> Result<FitnessStats> {
        self.check_fresh()?;
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for f in self.pop.iter().map(Genome::fitness) {
            lo = lo.min(f);
            hi = hi.max(f);
            sum += f;
        }
        let (best, worst) = if minimize { (lo, hi) } else { (hi, lo) };
        Ok(FitnessStats {
            best,
            worst,
            mean: sum / self.pop.len() as f64,
        })
    }

    fn check_fresh(&self) -> Result<()> {
        if self.pop.is_empty() {
            return Err(Error::EmptyPopulation);
        }
        if !self.evaluated {
            return Err(Error::StaleFitness);
        }
        Ok(())
    }
}

/// Draw two parent indices from `[0, min(CROSSOVER_RANGE, last)]`, the
/// `[-CROSSOVER_RANGE, CROSSOVER_RANGE]` window around index 0 clipped to
/// the population. Equal draws are nudged apart, `i1` down and `i2` up, each
/// clipped to `[0, last]`.
pub fn pick_parents(rng: &mut RandomSource, gaussian: bool, last: usize) -> (usize, usize) {
    let hi = CROSSOVER_RANGE.min(last);
    let mut i1 = rng.next_index(gaussian, 0, hi);
    let mut i2 = rng.next_index(gaussian, 0, hi);
    if i1 == i2 {
        i1 = i1.saturating_sub(1);
        i2 = (i2 + 1).min(last);
    }
    (i1, i2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::testing::{numbered, Numbered};

    #[test]
    fn construction_assigns_positional_ids() {
        let pop = numbered(10);
        let ids: Vec<usize> = pop.genomes().iter().map(|g| g.id).collect();
        assert_eq!(ids, (0..10).collect::<Vec<_>>());
        assert_eq!(pop.count(), 10);

        let adopted = Population::from_genomes(
            vec![Numbered::with_value(3.0), Numbered::with_value(1.0)],
            RandomSource::seeded(0),
        );
        let ids: Vec<usize> = adopted.genomes().iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn selection_defaults_to_half_of_count() {
        let mut pop = numbered(10);
        pop.selection(true, None);
        let ids: Vec<usize> = pop.genomes().iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert_eq!(pop.average_fitness().unwrap(), 2.0);
    }

    #[test]
    fn selection_maximizing_sorts_descending() {
        let mut pop = numbered(10);
        pop.selection(false, Some(3));
        let fitness: Vec<f64> = pop.genomes().iter().map(|g| g.fitness).collect();
        assert_eq!(fitness, vec![9.0, 8.0, 7.0]);
    }

    #[test]
    fn selection_uses_construction_count_after_growth() {
        let mut pop = numbered(10);
        pop.crossover(&(), false).unwrap();
        assert!(pop.len() > 10);
        pop.selection(true, None);
        assert_eq!(pop.len(), 5);
    }

    #[test]
    fn ranking_is_stable_for_ties() {
        let genomes = [2.0, 1.0, 2.0, 1.0].map(Numbered::with_value);
        let mut pop = Population::from_genomes(genomes, RandomSource::seeded(0));
        pop.selection(true, Some(4));
        let ids: Vec<usize> = pop.genomes().iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![1, 3, 0, 2]);

        let genomes = [2.0, 1.0, 2.0, 1.0].map(Numbered::with_value);
        let mut pop = Population::from_genomes(genomes, RandomSource::seeded(0));
        pop.selection(false, Some(4));
        let ids: Vec<usize> = pop.genomes().iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![0, 2, 1, 3]);
    }

    #[test]
    fn best_creature_does_not_reorder() {
        let genomes = [4.0, 1.0, 7.0, 1.0].map(Numbered::with_value);
        let mut pop = Population::from_genomes(genomes, RandomSource::seeded(0));
        assert_eq!(pop.best_creature(true).unwrap().id, 1);
        assert_eq!(pop.best_creature(false).unwrap().id, 2);
        let ids: Vec<usize> = pop.genomes().iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn every_ranking_call_re_evaluates() {
        let mut pop = numbered(4);
        pop.best_creature(true).unwrap();
        pop.best_creature(true).unwrap();
        pop.states();
        assert!(pop.genomes().iter().all(|g| g.evaluations == 3));
    }

    #[test]
    fn best_creature_on_empty_population_errors() {
        let mut pop = numbered(0);
        assert!(matches!(pop.best_creature(true), Err(Error::EmptyPopulation)));
    }

    #[test]
    fn crossover_growth_matches_pairing_count() {
        for n in [2usize, 3, 4, 7, 10, 11, 20] {
            let mut pop = numbered(n);
            pop.selection(true, Some(n));
            let born = pop.crossover(&(), true).unwrap();
            let pairings = (n / 2).div_ceil(2);
            assert_eq!(born, 2 * pairings, "n = {}", n);
            assert_eq!(pop.len(), n + 2 * pairings);
        }
    }

    #[test]
    fn crossover_parents_come_from_the_front() {
        let mut pop = numbered(20);
        pop.selection(true, Some(12));
        pop.crossover(&(), false).unwrap();
        for child in &pop.genomes()[12..] {
            let (a, b) = child.parents.expect("children record parents");
            assert!(a <= CROSSOVER_RANGE && b <= CROSSOVER_RANGE + 1);
        }
    }

    #[test]
    fn children_get_fresh_ids() {
        let mut pop = numbered(8);
        pop.selection(true, None);
        pop.crossover(&(), false).unwrap();
        let ids: Vec<usize> = pop.genomes().iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 8, 9, 10, 11]);

        pop.selection(true, None);
        pop.crossover(&(), false).unwrap();
        let ids: Vec<usize> = pop.genomes()[4..].iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![12, 13, 14, 15]);
    }

    #[test]
    fn with_count_keeps_ids_and_base_count() {
        let genomes = [5usize, 2, 9].map(|id| Numbered {
            id,
            ..Numbered::default()
        });
        let mut pop = Population::with_count(genomes, 8, RandomSource::seeded(0));
        assert_eq!(pop.count(), 8);
        assert_eq!(pop.len(), 3);
        let ids: Vec<usize> = pop.genomes().iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![5, 2, 9]);

        // count 8 gives 2 pairings; new ids continue after the highest kept one
        assert_eq!(pop.crossover(&(), false).unwrap(), 4);
        let ids: Vec<usize> = pop.genomes()[3..].iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![10, 11, 12, 13]);
    }

    #[test]
    fn parent_indices_stay_in_bounds() {
        let mut rng = RandomSource::seeded(17);
        for last in 0..12 {
            for gaussian in [false, true] {
                for _ in 0..200 {
                    let (i1, i2) = pick_parents(&mut rng, gaussian, last);
                    assert!(i1 <= last && i2 <= last);
                    if last > 0 {
                        assert_ne!(i1, i2);
                    }
                }
            }
        }
    }

    #[test]
    fn single_genome_mates_with_itself() {
        let mut pop = numbered(4);
        pop.selection(true, Some(1));
        let born = pop.crossover(&(), true).unwrap();
        assert_eq!(born, 2);
        for child in &pop.genomes()[1..] {
            assert_eq!(child.parents, Some((0, 0)));
        }
    }

    #[test]
    fn crossover_on_emptied_population_errors() {
        let mut pop = numbered(6);
        pop.selection(true, Some(0));
        assert!(matches!(pop.crossover(&(), true), Err(Error::EmptyPopulation)));
    }

    #[test]
    fn tiny_count_skips_crossover() {
        let mut pop = numbered(1);
        assert_eq!(pop.crossover(&(), true).unwrap(), 0);
        assert_eq!(pop.len(), 1);
    }

    #[test]
    fn mutation_touches_every_genome_and_marks_stale() {
        let mut pop = numbered(6);
        pop.selection(true, Some(6));
        assert!(pop.average_fitness().is_ok());
        pop.mutate(0.25, true).unwrap();
        assert!(pop.genomes().iter().all(|g| g.mutations == vec![(0.25, true)]));
        assert!(matches!(pop.average_fitness(), Err(Error::StaleFitness)));
    }

    #[test]
    fn mutation_rejects_rate_outside_unit_interval() {
        let mut pop = numbered(2);
        assert!(matches!(pop.mutate(1.5, false), Err(Error::InvalidRate(_))));
        assert!(matches!(pop.mutate(-0.1, false), Err(Error::InvalidRate(_))));
    }

    #[test]
    fn average_before_evaluation_is_stale() {
        let pop = numbered(3);
        assert!(matches!(pop.average_fitness(), Err(Error::StaleFitness)));
    }

    #[test]
    fn states_follow_sequence_order() {
        let mut pop = numbered(5);
        pop.selection(false, Some(5));
        assert_eq!(pop.states(), vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn stats_report_best_and_worst() {
        let mut pop = numbered(5);
        pop.selection(true, Some(5));
        let s = pop.stats(true).unwrap();
        assert_eq!((s.best, s.worst, s.mean), (0.0, 4.0, 2.0));
        let s = pop.stats(false).unwrap();
        assert_eq!((s.best, s.worst), (4.0, 0.0));
    }
}
