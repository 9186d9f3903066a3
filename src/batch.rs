//! Parallel resolution of independent attacks.
//!
//! Uses rayon to resolve many (weapon, target, options) requests at once.
//! Every worker owns its own [`Resolver`], so no memo table is shared
//! between threads. Results come back in request order, and a failing
//! request does not affect the others.

use crate::config::ResolverConfig;
use crate::error::CombatError;
use crate::event::Outcomes;
use crate::options::AttackOptions;
use crate::profile::{TargetProfile, WeaponProfile};
use crate::resolver::Resolver;
use rayon::prelude::*;

/// One weapon firing at one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackRequest {
    pub weapon: WeaponProfile,
    pub target: TargetProfile,
    pub options: AttackOptions,
}

impl AttackRequest {
    pub fn new(weapon: WeaponProfile, target: TargetProfile, options: AttackOptions) -> Self {
        Self {
            weapon,
            target,
            options,
        }
    }
}

/// Resolve every request in parallel.
///
/// An invalid `config` fails every request with the same error.
///
/// # Examples
///
/// ```rust
/// use mathhammer::*;
///
/// let weapon = WeaponProfile::new(2, 3, 4, 0, 1);
/// let requests: Vec<AttackRequest> = [3, 4, 5]
///     .into_iter()
///     .map(|toughness| {
///         AttackRequest::new(weapon.clone(), TargetProfile::new(toughness, 4), AttackOptions::new())
///     })
///     .collect();
///
/// let results = resolve_batch(&requests, &ResolverConfig::default());
/// assert_eq!(results.len(), 3);
///
/// // Tougher targets take less damage.
/// let averages: Vec<f64> = results
///     .iter()
///     .map(|r| average_damage(r.as_ref().unwrap()))
///     .collect();
/// assert!(averages[0] > averages[1] && averages[1] > averages[2]);
/// ```
pub fn resolve_batch(
    requests: &[AttackRequest],
    config: &ResolverConfig,
) -> Vec<Result<Outcomes, CombatError>> {
    if let Err(err) = config.validate() {
        tracing::warn!("Rejecting batch of {} requests: {}", requests.len(), err);
        return requests.iter().map(|_| Err(err.clone())).collect();
    }

    tracing::debug!("Resolving batch of {} requests", requests.len());
    requests
        .par_iter()
        .map_init(
            || Resolver::with_valid_config(*config),
            |resolver, request| {
                resolver.attack_roll(&request.weapon, &request.target, &request.options)
            },
        )
        .collect()
}
