//! Null distributions of path statistics
//!
//! Whether a path statistic is meaningful for a (source, target) pair can
//! be judged by comparing it with the same statistic on degree preserving
//! permutations of the graph (see [`crate::permutation`]). A
//! [`NullDistribution`] collects those permuted values and reports how
//! extreme the observed value is.

use statrs::distribution::{ContinuousCDF, Normal};
use statrs::statistics::Statistics;
use tracing::debug;

use crate::permutation::{permute_graph, PermutationConfig};
use crate::{Graph, HetnetResult};

/// Values of a statistic computed on permuted graphs
///
/// # Examples
///
/// ```
/// use hetnet::stats::NullDistribution;
///
/// let null = NullDistribution::from_values(vec![1.0, 2.0, 3.0, 4.0]);
/// assert_eq!(null.mean(), Some(2.5));
/// assert_eq!(null.empirical_pvalue(4.0), 0.4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NullDistribution {
    values: Vec<f64>,
}

impl NullDistribution {
    /// Constructs an empty distribution
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a distribution of the values
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Computes `statistic` on permutations of `graph`, one per seed
    ///
    /// Undefined values (`None`) are not part of the distribution.
    ///
    /// # Errors
    ///
    /// Returns the first error of the permutation or of `statistic`
    ///
    /// # Examples
    ///
    /// ```
    /// use hetnet::{Data, Graph, MetaGraph, PathOptions};
    /// use hetnet::algorithms::source_path_count;
    /// use hetnet::stats::NullDistribution;
    ///
    /// let metagraph = MetaGraph::from_edge_tuples(&[
    ///     ("gene", "disease", "association", "both"),
    /// ]).unwrap();
    /// let mut graph = Graph::new(metagraph);
    /// for id in ["G1", "G2", "G3"] {
    ///     graph.add_node(id, "gene", Data::new()).unwrap();
    /// }
    /// graph.add_node("D1", "disease", Data::new()).unwrap();
    /// graph.add_node("D2", "disease", Data::new()).unwrap();
    /// graph.add_edge("G1", "D1", "association", "both", Data::new()).unwrap();
    /// graph.add_edge("G2", "D2", "association", "both", Data::new()).unwrap();
    ///
    /// let metapath = graph.metagraph().parse_metapath("GaD").unwrap();
    /// let g1 = graph.node_index("G1").unwrap();
    ///
    /// let null = NullDistribution::from_permutations(&graph, 0..10, |permuted| {
    ///     let pcs = source_path_count(permuted, g1, &metapath, &PathOptions::default())?;
    ///     Ok(Some(pcs as f64))
    /// }).unwrap();
    ///
    /// // the degree of G1 is preserved in every permutation
    /// assert_eq!(null.len(), 10);
    /// assert_eq!(null.mean(), Some(1.0));
    /// ```
    pub fn from_permutations<I, F>(graph: &Graph, seeds: I, mut statistic: F) -> HetnetResult<Self>
    where
        I: IntoIterator<Item = u64>,
        F: FnMut(&Graph) -> HetnetResult<Option<f64>>,
    {
        let mut null = Self::new();
        for seed in seeds {
            let permuted = permute_graph(graph, &PermutationConfig::new(seed))?;
            match statistic(&permuted)? {
                Some(value) => null.push(value),
                None => debug!("Statistic undefined for permutation {seed}"),
            }
        }
        Ok(null)
    }

    /// Adds a value
    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    /// Returns the number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the distribution has no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns all values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the mean, `None` if there are no values
    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().mean())
    }

    /// Returns the sample standard deviation, `None` for less than 2 values
    pub fn std_dev(&self) -> Option<f64> {
        if self.values.len() < 2 {
            return None;
        }
        Some(self.values.iter().std_dev())
    }

    /// Returns the number of standard deviations `observed` is above the mean
    ///
    /// `None` if the standard deviation is undefined or 0
    pub fn z_score(&self, observed: f64) -> Option<f64> {
        let std_dev = self.std_dev()?;
        if std_dev == 0.0 {
            return None;
        }
        Some((observed - self.mean()?) / std_dev)
    }

    /// Returns the share of values at least as large as `observed`
    ///
    /// The observed value counts as one of the values, so the p-value is
    /// never 0: `(count(values >= observed) + 1) / (len + 1)`
    #[allow(clippy::cast_precision_loss)]
    pub fn empirical_pvalue(&self, observed: f64) -> f64 {
        let extreme = self.values.iter().filter(|value| **value >= observed).count();
        (extreme + 1) as f64 / (self.values.len() + 1) as f64
    }

    /// Returns the upper tail probability of `observed` under a normal
    /// distribution with the mean and standard deviation of the values
    ///
    /// `None` if the standard deviation is undefined or 0
    pub fn normal_pvalue(&self, observed: f64) -> Option<f64> {
        let normal = Normal::new(self.mean()?, self.std_dev()?).ok()?;
        Some(1.0 - normal.cdf(observed))
    }
}

impl FromIterator<f64> for NullDistribution {
    fn from_iter<T: IntoIterator<Item = f64>>(iter: T) -> Self {
        Self::from_values(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty() {
        let null = NullDistribution::new();
        assert!(null.is_empty());
        assert_eq!(null.mean(), None);
        assert_eq!(null.std_dev(), None);
        assert_eq!(null.z_score(1.0), None);
        assert_eq!(null.normal_pvalue(1.0), None);
        assert_eq!(null.empirical_pvalue(1.0), 1.0);
    }

    #[test]
    fn moments() {
        let null: NullDistribution = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].into_iter().collect();
        assert_eq!(null.len(), 8);
        assert!((null.mean().unwrap() - 5.0).abs() < 1e-12);
        let std_dev = null.std_dev().unwrap();
        assert!((std_dev - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
        let z = null.z_score(5.0 + std_dev).unwrap();
        assert!((z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn constant_values() {
        let null = NullDistribution::from_values(vec![3.0; 5]);
        assert_eq!(null.std_dev(), Some(0.0));
        assert_eq!(null.z_score(4.0), None);
        assert_eq!(null.normal_pvalue(4.0), None);
    }

    #[test]
    fn pvalues() {
        let null = NullDistribution::from_values(vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(null.empirical_pvalue(100.0), 0.1);
        assert_eq!(null.empirical_pvalue(8.0), 0.2);
        assert_eq!(null.empirical_pvalue(-1.0), 1.0);

        let at_mean = null.normal_pvalue(4.0).unwrap();
        assert!((at_mean - 0.5).abs() < 1e-9);
        assert!(null.normal_pvalue(8.0).unwrap() < 0.1);
    }
}
