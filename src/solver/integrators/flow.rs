//! Compressible flow update
//!
//! Advances a velocity field `u` driven by a log-density field `ρ`:
//!
//! ```text
//! ∂u_a/∂t = −Σ_b u_b·∂_b u_a                                 (self-advection)
//!           − c²·∂_a ρ                                        (pressure)
//!           + ν·(Σ_b ∂_b ρ·(∂_b u_a + ∂_a u_b) − ⅔·∂_a ρ·div)  (strain coupling)
//!           + ν·(∇²u_a + ⅓·∂_a div)                           (viscous decay)
//! ```
//!
//! The linear viscous part is integrated exactly in Fourier space with the
//! per-axis factor `exp(−ν·(|ω|² + ⅓·ω_a·Σ_b ω_b)·dt)`; the remaining terms are
//! explicit Euler on the decayed velocity.

use ndarray::{ArrayD, IxDyn, Zip};

use crate::physics::Field;
use crate::solver::spectral::SpectralOperators;

/// Result of one flow update
#[derive(Debug, Clone)]
pub struct FlowUpdate {
    /// Velocity components after the step
    pub velocity: Vec<Field>,
    /// `Σ_a ∂_a u_a` of the viscously decayed velocity
    pub divergence: Field,
}

/// Precomputed flow coefficients for one grid, viscosity and time step
#[derive(Debug, Clone)]
pub struct FlowIntegrator {
    viscosity: f64,
    speed_of_sound: f64,
    dt: f64,
    decay: Vec<Field>,
}

impl FlowIntegrator {
    /// Precompute the per-axis viscous decay factors
    pub fn new(ops: &SpectralOperators, viscosity: f64, speed_of_sound: f64, dt: f64) -> Self {
        let grid = ops.grid();
        let ndim = grid.ndim();
        let wavenumbers: Vec<_> = (0..ndim).map(|a| ops.wavenumbers(a)).collect();

        let decay = (0..ndim)
            .map(|axis| {
                let mut factor: Field = ArrayD::from_shape_fn(IxDyn(grid.shape()), |idx| {
                    let omega_sum: f64 = (0..ndim).map(|b| wavenumbers[b][idx[b]]).sum();
                    wavenumbers[axis][idx[axis]] * omega_sum / 3.0
                });
                Zip::from(&mut factor)
                    .and(ops.omega_squared())
                    .for_each(|f, &w2| *f = (-viscosity * (w2 + *f) * dt).exp());
                factor
            })
            .collect();

        Self { viscosity, speed_of_sound, dt, decay }
    }

    /// Viscous decay factor of velocity component `axis`
    pub fn decay(&self, axis: usize) -> &Field {
        &self.decay[axis]
    }

    /// Advance `velocity` by one step under the log-density `rho`
    ///
    /// `velocity` must hold one component per grid axis; the input is left
    /// untouched so callers can still advect with the pre-step field.
    pub fn step(&self, ops: &SpectralOperators, rho: &Field, velocity: &[Field]) -> FlowUpdate {
        let ndim = velocity.len();
        let nu = self.viscosity;
        let c2 = self.speed_of_sound * self.speed_of_sound;

        let rho_d = ops.gradient(&ops.forward(rho));

        // u[a] and u_d[a][b] = ∂_b u_a after viscous decay
        let mut u = Vec::with_capacity(ndim);
        let mut u_d = Vec::with_capacity(ndim);
        for (axis, component) in velocity.iter().enumerate() {
            let mut spectrum = ops.forward(component);
            SpectralOperators::scale_modes(&mut spectrum, &self.decay[axis]);
            u_d.push(ops.gradient(&spectrum));
            u.push(ops.inverse_owned(spectrum));
        }

        let mut divergence = ops.grid().zeros();
        for (a, derivatives) in u_d.iter().enumerate() {
            divergence += &derivatives[a];
        }

        for a in 0..ndim {
            let mut du = ops.grid().zeros();
            for b in 0..ndim {
                Zip::from(&mut du)
                    .and(&u[b])
                    .and(&u_d[a][b])
                    .and(&u_d[b][a])
                    .and(&rho_d[b])
                    .for_each(|d, &ub, &dab, &dba, &rb| *d += nu * rb * (dab + dba) - ub * dab);
            }
            Zip::from(&mut du)
                .and(&rho_d[a])
                .and(&divergence)
                .for_each(|d, &ra, &div| *d -= c2 * ra + 2.0 / 3.0 * nu * ra * div);

            u[a].scaled_add(self.dt, &du);
        }

        FlowUpdate { velocity: u, divergence }
    }
}
