//! Weight mutation and the particle-swarm movement rule.

use crate::bounds::Bounds;
use crate::population::Population;
use crate::random::RandomStream;

/// Replace every weight of `pop` with a mutated copy.
pub fn mutate_weights(
    pop: &mut Population,
    mutation_rate: f64,
    max_velocity: f64,
    rng: &mut impl RandomStream,
) {
    for i in 0..pop.size() {
        let mutated = pop.weight(i).mutated(rng, mutation_rate, max_velocity);
        *pop.weight_mut(i) = mutated;
    }
}

/// Move every particle of `pop` one step.
///
/// Per particle, one perturbation factor `1 + p_perturbation·N(0, 1)` and one
/// communication gate are drawn (in that order) and shared by all dimensions:
///
/// ```text
/// v' = p_inertia·v + p_memory·(pbest - x) + gate·p_cooperation·(g_best·noise - x)
/// x' = x + clamp(v')
/// ```
///
/// Bounds are enforced afterwards.
pub fn update_velocities(
    pop: &mut Population,
    personal_best: &Population,
    global_best: &[f64],
    bounds: &Bounds,
    communication_probability: f64,
    rng: &mut impl RandomStream,
) {
    for i in 0..pop.size() {
        let w = *pop.weight(i);
        let noise = 1.0 + w.p_perturbation * rng.normal();
        let communicates = rng.coin(communication_probability);
        let memory = personal_best.position(i);

        let (position, velocity) = pop.state_mut(i);
        for j in 0..position.len() {
            let x = position[j];
            let mut v = w.p_inertia * velocity[j] + w.p_memory * (memory[j] - x);
            if communicates {
                v += w.p_cooperation * (global_best[j] * noise - x);
            }

            let v = bounds.clamp_velocity(j, v);
            velocity[j] = v;
            position[j] = x + v;
        }

        bounds.enforce_particle(position, velocity);
    }
}
