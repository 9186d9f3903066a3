//! Basic example: one weapon against one target
//!
//! This example demonstrates:
//! - Building weapon and target profiles
//! - Turning rule names into modifiers
//! - Resolving the exact damage distribution
//! - Reading the average and the "at least k damage" row

use mathhammer::*;

fn main() -> Result<(), CombatError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // A 3, WS 3+, S 5, AP -1, D D3
    let weapon = WeaponProfile::new(3, 3, 5, -1, Dice::parse("d3")?);
    // T 4, Sv 3+, W 2, 6+ feel no pain
    let target = TargetProfile::new(4, 3).with_wounds(2).with_feel_no_pain(6);

    println!("Weapon: {}", weapon);
    println!("Target: {}", target);

    let registry = RuleRegistry::standard();
    let rules = ["Sustained Hits 1", "Lethal Hits", "Heavy"];
    let options = AttackOptions::with_modifiers(registry.resolve_all(rules)?);
    println!("Rules: {}", rules.join(", "));

    let mut resolver = Resolver::default();
    let outcomes = resolver.attack_roll(&weapon, &target, &options)?;

    println!("\n=== Distribution ===");
    for (key, p) in &outcomes {
        println!("  {:<16} {:>7.3}%", key.to_string(), p * 100.0);
    }

    println!("\n=== Summary ===");
    println!("Average damage: {:.3}", average_damage(&outcomes));
    for (k, p) in cumulative_damage_probabilities(&outcomes, 6).iter().enumerate() {
        println!("  P(damage >= {}) = {:.3}", k + 1, p);
    }

    println!("\nMemoized phases: {}", resolver.cache_len());

    Ok(())
}
