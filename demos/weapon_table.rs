//! Weapon table example: many matchups at once
//!
//! This example demonstrates:
//! - Resolving a batch of requests in parallel
//! - Loading resolver limits from JSON
//! - Serializing summary rows for a presentation layer

use mathhammer::*;

fn main() -> Result<(), CombatError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = ResolverConfig::from_json(r#"{"max_outcomes": 500000}"#)?;
    let registry = RuleRegistry::standard();

    let weapons = [
        ("Bolt rifle", WeaponProfile::new(2, 3, 4, -1, 1), vec!["Assault", "Heavy"]),
        ("Plasma gun", WeaponProfile::new(1, 3, 8, -3, 2), vec!["Rapid Fire 1"]),
        ("Meltagun", WeaponProfile::new(1, 3, 9, -4, Dice::parse("d6")?), vec!["Melta 2"]),
        ("Heavy bolter", WeaponProfile::new(3, 4, 5, -1, 2), vec!["Sustained Hits 1"]),
    ];
    let targets = [
        ("Guardsman", TargetProfile::new(3, 5).with_wounds(1)),
        ("Marine", TargetProfile::new(4, 3).with_wounds(2)),
        ("Terminator", TargetProfile::new(5, 2).with_wounds(3).with_invulnerable_save(4)),
    ];

    let mut labels = Vec::new();
    let mut requests = Vec::new();
    for (weapon_name, weapon, rules) in &weapons {
        let options = AttackOptions::with_modifiers(registry.resolve_all(rules.iter().copied())?)
            .with_half_range(true);
        for (target_name, target) in &targets {
            labels.push(format!("{} vs {}", weapon_name, target_name));
            requests.push(AttackRequest::new(weapon.clone(), target.clone(), options.clone()));
        }
    }

    tracing::info!("Resolving {} matchups", requests.len());
    let results = resolve_batch(&requests, &config);

    for (label, result) in labels.iter().zip(results) {
        match result {
            Ok(outcomes) => {
                let summary = DamageSummary::from_outcomes(&outcomes, 4);
                println!("{:<28} {}", label, serde_json::to_string(&summary)?);
            }
            Err(err) => println!("{:<28} error: {}", label, err),
        }
    }

    Ok(())
}
