//! Element-wise reaction step
//!
//! Applies a [`ReactionKinetics`] model independently at every grid point.
//! There is no spatial coupling, so the update parallelises trivially over
//! elements once the field is larger than the parallel threshold.

use nalgebra::{Vector2, Vector3};
use ndarray::Zip;

use crate::physics::{Field, ReactionKinetics};
#[cfg(feature = "parallel")]
use crate::solver::parallel_threshold;

/// Advance three fields (G, X, Y) through `dt` of reaction
///
/// # Panics
///
/// Panics when the fields do not share one shape; solvers validate shapes at
/// construction.
pub fn react_three<K>(kinetics: &K, g: &mut Field, x: &mut Field, y: &mut Field, dt: f64)
where
    K: ReactionKinetics<Concentrations = Vector3<f64>>,
{
    let update = |g: &mut f64, x: &mut f64, y: &mut f64| {
        let next = kinetics.advance(Vector3::new(*g, *x, *y), dt);
        (*g, *x, *y) = (next[0], next[1], next[2]);
    };

    let zip = Zip::from(g).and(x).and(y);
    #[cfg(feature = "parallel")]
    if zip.size() > parallel_threshold() {
        zip.par_for_each(update);
        return;
    }
    zip.for_each(update);
}

/// Advance two fields (X, Y) through `dt` of reaction
pub fn react_two<K>(kinetics: &K, x: &mut Field, y: &mut Field, dt: f64)
where
    K: ReactionKinetics<Concentrations = Vector2<f64>>,
{
    let update = |x: &mut f64, y: &mut f64| {
        let next = kinetics.advance(Vector2::new(*x, *y), dt);
        (*x, *y) = (next[0], next[1]);
    };

    let zip = Zip::from(x).and(y);
    #[cfg(feature = "parallel")]
    if zip.size() > parallel_threshold() {
        zip.par_for_each(update);
        return;
    }
    zip.for_each(update);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BrusselatorParameters, ModelGParameters};
    use crate::solver::ThresholdGuard;
    use ndarray::{ArrayD, IxDyn};

    fn ramp(shape: &[usize], scale: f64) -> Field {
        ArrayD::from_shape_fn(IxDyn(shape), |idx| scale * idx[0] as f64)
    }

    #[test]
    fn test_matches_pointwise_advance() {
        let params = ModelGParameters::default();
        let (mut g, mut x, mut y) = (ramp(&[5], 0.01), ramp(&[5], -0.02), ramp(&[5], 0.005));
        let expected = params.advance(Vector3::new(g[[3]], x[[3]], y[[3]]), 0.05);

        react_three(&params, &mut g, &mut x, &mut y, 0.05);
        assert_eq!(Vector3::new(g[[3]], x[[3]], y[[3]]), expected);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let params = BrusselatorParameters::default();
        let shape = [40, 40];

        let sequential = {
            let _guard = ThresholdGuard::save(usize::MAX);
            let (mut x, mut y) = (ramp(&shape, 0.001), ramp(&shape, -0.001));
            react_two(&params, &mut x, &mut y, 0.1);
            (x, y)
        };
        let parallel = {
            let _guard = ThresholdGuard::save(1);
            let (mut x, mut y) = (ramp(&shape, 0.001), ramp(&shape, -0.001));
            react_two(&params, &mut x, &mut y, 0.1);
            (x, y)
        };
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_equilibrium_untouched() {
        let params = ModelGParameters::default();
        let zeros: Field = ArrayD::zeros(IxDyn(&[4, 4]));
        let (mut g, mut x, mut y) = (zeros.clone(), zeros.clone(), zeros.clone());
        react_three(&params, &mut g, &mut x, &mut y, 0.1);
        assert_eq!(g, zeros);
        assert_eq!(x, zeros);
        assert_eq!(y, zeros);
    }
}
