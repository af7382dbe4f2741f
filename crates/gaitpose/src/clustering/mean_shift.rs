use nalgebra::SVector;

use super::MeanShiftConfig;

/// Output of [`mean_shift`].
#[derive(Debug, Clone, PartialEq)]
pub struct MeanShiftResult<const D: usize> {
    /// Cluster label per input point, numbered by first appearance.
    pub labels: Vec<usize>,
    /// Cluster modes: mean converged position of each cluster's members.
    pub modes: Vec<SVector<f64, D>>,
    /// `false` where a point hit `max_iters` before settling.
    pub converged: Vec<bool>,
}

impl<const D: usize> MeanShiftResult<D> {
    pub fn n_clusters(&self) -> usize {
        self.modes.len()
    }

    pub fn all_converged(&self) -> bool {
        self.converged.iter().all(|&c| c)
    }
}

/// Shift one start position towards the kernel-weighted mean of `points`.
fn shift_to_convergence<const D: usize>(
    start: SVector<f64, D>,
    points: &[SVector<f64, D>],
    config: &MeanShiftConfig,
) -> (SVector<f64, D>, bool) {
    let eps2 = config.epsilon * config.epsilon;
    let mut x = start;
    for _ in 0..config.max_iters {
        let mut num = SVector::<f64, D>::zeros();
        let mut den = 0.0;
        for p in points {
            let w = config.kernel.weight((p - x).norm_squared());
            if w > 0.0 {
                num += p * w;
                den += w;
            }
        }
        if den <= 0.0 {
            return (x, true);
        }
        let next = num / den;
        let moved = (next - x).norm_squared();
        x = next;
        if moved < eps2 {
            return (x, true);
        }
    }
    (x, false)
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

/// Cluster `points` by mean shift.
///
/// Every point moves independently over the original point set, so the
/// result does not depend on processing order. Converged positions within
/// `merge_tolerance` of each other (transitively) share a label. Empty input
/// gives an empty result.
pub fn mean_shift<const D: usize>(
    points: &[SVector<f64, D>],
    config: &MeanShiftConfig,
) -> MeanShiftResult<D> {
    let n = points.len();
    let (settled, converged): (Vec<SVector<f64, D>>, Vec<bool>) = points
        .iter()
        .map(|&p| shift_to_convergence(p, points, config))
        .unzip();

    let tol2 = config.merge_tolerance * config.merge_tolerance;
    let mut parent: Vec<usize> = (0..n).collect();
    for i in 0..n {
        for j in (i + 1)..n {
            if (settled[i] - settled[j]).norm_squared() <= tol2 {
                let ri = find(&mut parent, i);
                let rj = find(&mut parent, j);
                if ri != rj {
                    parent[rj.max(ri)] = rj.min(ri);
                }
            }
        }
    }

    let mut root_label: Vec<Option<usize>> = vec![None; n];
    let mut labels = Vec::with_capacity(n);
    let mut sums: Vec<(SVector<f64, D>, usize)> = Vec::new();
    for i in 0..n {
        let root = find(&mut parent, i);
        let label = match root_label[root] {
            Some(l) => l,
            None => {
                let l = sums.len();
                root_label[root] = Some(l);
                sums.push((SVector::zeros(), 0));
                l
            }
        };
        sums[label].0 += settled[i];
        sums[label].1 += 1;
        labels.push(label);
    }

    let modes = sums.into_iter().map(|(s, c)| s / c as f64).collect();
    let n_unconverged = converged.iter().filter(|&&c| !c).count();
    if n_unconverged > 0 {
        tracing::debug!(n_unconverged, "mean shift reached the iteration cap");
    }

    MeanShiftResult {
        labels,
        modes,
        converged,
    }
}
