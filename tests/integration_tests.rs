use mathhammer::*;

const PASS_HIT: f64 = 5.0 / 6.0;
const FAIL_HIT: f64 = 1.0 / 6.0;
const PASS_WOUND: f64 = 5.0 / 6.0;
const FAIL_WOUND: f64 = 1.0 / 6.0;

/// Check a distribution key by key against expected `(total damage, p)`
/// pairs. Every key must have a distinct total and every total must be
/// expected.
fn assert_outcomes(outcomes: &Outcomes, expected: &[(u32, f64)]) {
    let expected_sum: f64 = expected.iter().map(|(_, p)| p).sum();
    assert!((expected_sum - 1.0).abs() < 1e-9, "expectations sum to {}", expected_sum);
    assert_eq!(
        outcomes.len(),
        expected.len(),
        "expected {} outcomes, found {:?}",
        expected.len(),
        outcomes
    );

    for (key, p) in outcomes {
        let damage = key.total();
        let (_, want) = expected
            .iter()
            .find(|(d, _)| *d == damage)
            .unwrap_or_else(|| panic!("unexpected damage {} ({})", damage, key));
        assert!((p - want).abs() < 1e-9, "damage {}: expected {}, got {}", damage, want, p);
    }
}

/// Hits on 2+, wounds on 2+ (S 10 against T 2), no save, no feel no pain.
fn sure_weapon(attacks: impl Into<Characteristic>, damage: impl Into<Characteristic>) -> WeaponProfile {
    WeaponProfile::new(attacks, 2, 10, 0, damage)
}

fn unarmoured() -> TargetProfile {
    TargetProfile::new(2, 7)
}

fn resolve(weapon: &WeaponProfile, target: &TargetProfile) -> Outcomes {
    Resolver::default()
        .attack_roll(weapon, target, &AttackOptions::new())
        .unwrap()
}

fn d(sides: u8) -> Dice {
    Dice::d(sides).unwrap()
}

/// Every skill against every wound roll, one attack, one damage.
#[test]
fn test_single_attack_grid() {
    let pass_hit = [(2, 5.0 / 6.0), (3, 4.0 / 6.0), (4, 3.0 / 6.0), (5, 2.0 / 6.0), (6, 1.0 / 6.0)];
    let pass_wound = [(9, 5.0 / 6.0), (5, 4.0 / 6.0), (4, 3.0 / 6.0), (3, 2.0 / 6.0), (2, 1.0 / 6.0)];
    let target = TargetProfile::new(4, 7);
    let mut resolver = Resolver::default();

    for (skill, hit) in pass_hit {
        for (strength, wound) in pass_wound {
            let weapon = WeaponProfile::new(1, skill, strength, 0, 1);
            let outcomes = resolver
                .attack_roll(&weapon, &target, &AttackOptions::new())
                .unwrap();
            assert_outcomes(&outcomes, &[(0, (1.0 - hit) + hit * (1.0 - wound)), (1, hit * wound)]);
        }
    }
}

#[test]
fn test_one_attack_two_damage() {
    let outcomes = resolve(&sure_weapon(1, 2), &unarmoured());
    assert_outcomes(
        &outcomes,
        &[(0, FAIL_HIT + PASS_HIT * FAIL_WOUND), (2, PASS_HIT * PASS_WOUND)],
    );
}

#[test]
fn test_two_attacks_are_independent() {
    let outcomes = resolve(&sure_weapon(2, 1), &unarmoured());
    let miss = FAIL_HIT + PASS_HIT * FAIL_WOUND;
    let land = PASS_HIT * PASS_WOUND;
    assert_outcomes(&outcomes, &[(0, miss * miss), (1, 2.0 * land * miss), (2, land * land)]);
    assert!((miss - 11.0 / 36.0).abs() < 1e-12);
}

#[test]
fn test_dice_damage() {
    let outcomes = resolve(&sure_weapon(1, d(3)), &unarmoured());
    let third = 1.0 / 3.0;
    let land = PASS_HIT * PASS_WOUND;
    assert_outcomes(
        &outcomes,
        &[
            (0, FAIL_HIT + PASS_HIT * FAIL_WOUND),
            (1, land * third),
            (2, land * third),
            (3, land * third),
        ],
    );
}

#[test]
fn test_d2_attacks() {
    let outcomes = resolve(&sure_weapon(d(2), 1), &unarmoured());
    let a1_0 = FAIL_HIT + PASS_HIT * FAIL_WOUND;
    let a1_1 = PASS_HIT * PASS_WOUND;
    let (a2_0, a2_1, a2_2) = (a1_0 * a1_0, 2.0 * a1_0 * a1_1, a1_1 * a1_1);

    assert_outcomes(
        &outcomes,
        &[
            (0, 0.5 * (a1_0 + a2_0)),
            (1, 0.5 * (a1_1 + a2_1)),
            (2, 0.5 * a2_2),
        ],
    );
}

#[test]
fn test_d3_attacks() {
    let outcomes = resolve(&sure_weapon(d(3), 1), &unarmoured());
    let a1_0 = FAIL_HIT + PASS_HIT * FAIL_WOUND;
    let a1_1 = PASS_HIT * PASS_WOUND;
    let (a2_0, a2_1, a2_2) = (a1_0 * a1_0, 2.0 * a1_0 * a1_1, a1_1 * a1_1);
    let a3_0 = a1_0.powi(3);
    let a3_1 = 3.0 * a1_0 * a1_0 * a1_1;
    let a3_2 = 3.0 * a1_0 * a1_1 * a1_1;
    let a3_3 = a1_1.powi(3);
    let third = 1.0 / 3.0;

    assert_outcomes(
        &outcomes,
        &[
            (0, third * (a1_0 + a2_0 + a3_0)),
            (1, third * (a1_1 + a2_1 + a3_1)),
            (2, third * (a2_2 + a3_2)),
            (3, third * a3_3),
        ],
    );
}

#[test]
fn test_average_damage() {
    let land = PASS_HIT * PASS_WOUND;
    let miss = FAIL_HIT + PASS_HIT * FAIL_WOUND;
    let cases: [(WeaponProfile, f64); 4] = [
        (sure_weapon(1, 1), land),
        (sure_weapon(1, 2), 2.0 * land),
        (sure_weapon(2, 1), 2.0 * land * land + 2.0 * land * miss),
        (sure_weapon(1, d(3)), (1.0 + 2.0 + 3.0) * land / 3.0),
    ];
    for (weapon, expected) in cases {
        let average = average_damage(&resolve(&weapon, &unarmoured()));
        assert!((average - expected).abs() < 1e-9, "{}: {} vs {}", weapon, average, expected);
    }
}

#[test]
fn test_cap_damage_fixed() {
    let cap = 2;
    for damage in 1..=3u32 {
        let outcomes = resolve(&sure_weapon(1, damage), &unarmoured());
        assert_outcomes(
            &cap_damage(&outcomes, cap),
            &[
                (0, FAIL_HIT + PASS_HIT * FAIL_WOUND),
                (damage.min(cap), PASS_HIT * PASS_WOUND),
            ],
        );
    }
}

#[test]
fn test_cap_damage_is_per_allocation() {
    // Two one-damage allocations stay two damage under a cap of one.
    let outcomes = resolve(&sure_weapon(d(2), 1), &unarmoured());
    let a1_0 = FAIL_HIT + PASS_HIT * FAIL_WOUND;
    let a1_1 = PASS_HIT * PASS_WOUND;
    assert_outcomes(
        &cap_damage(&outcomes, 1),
        &[
            (0, 0.5 * (a1_0 + a1_0 * a1_0)),
            (1, 0.5 * (a1_1 + 2.0 * a1_0 * a1_1)),
            (2, 0.5 * a1_1 * a1_1),
        ],
    );
}

#[test]
fn test_cap_damage_dice() {
    let outcomes = resolve(&sure_weapon(1, d(3)), &unarmoured());
    let land = PASS_HIT * PASS_WOUND;
    assert_outcomes(
        &cap_damage(&outcomes, 2),
        &[
            (0, FAIL_HIT + PASS_HIT * FAIL_WOUND),
            (1, land / 3.0),
            (2, land * 2.0 / 3.0),
        ],
    );
}

#[test]
fn test_wounds_cap_each_allocation() {
    let target = unarmoured().with_wounds(2);
    let outcomes = resolve(&sure_weapon(2, 3), &target);
    let miss = FAIL_HIT + PASS_HIT * FAIL_WOUND;
    let land = PASS_HIT * PASS_WOUND;
    assert_outcomes(&outcomes, &[(0, miss * miss), (2, 2.0 * land * miss), (4, land * land)]);
}

#[test]
fn test_save_reduces_damage() {
    let target = TargetProfile::new(2, 4);
    let outcomes = resolve(&sure_weapon(1, 1), &target);
    let land = PASS_HIT * PASS_WOUND * 0.5;
    assert_outcomes(&outcomes, &[(0, 1.0 - land), (1, land)]);

    // AP -1 worsens the save to 5+.
    let weapon = WeaponProfile::new(1, 2, 10, -1, 1);
    let outcomes = resolve(&weapon, &target);
    let land = PASS_HIT * PASS_WOUND * (4.0 / 6.0);
    assert_outcomes(&outcomes, &[(0, 1.0 - land), (1, land)]);
}

#[test]
fn test_invulnerable_save() {
    let target = TargetProfile::new(2, 3).with_invulnerable_save(5);
    let weapon = WeaponProfile::new(1, 2, 10, -3, 1);
    let outcomes = resolve(&weapon, &target);
    let land = PASS_HIT * PASS_WOUND * (4.0 / 6.0);
    assert_outcomes(&outcomes, &[(0, 1.0 - land), (1, land)]);
}

#[test]
fn test_cover_improves_save() {
    let target = TargetProfile::new(2, 5);
    let weapon = sure_weapon(1, 1);
    let mut resolver = Resolver::default();

    let open = resolver
        .attack_roll(&weapon, &target, &AttackOptions::new())
        .unwrap();
    let covered = resolver
        .attack_roll(&weapon, &target, &AttackOptions::new().with_cover(true))
        .unwrap();

    let land = PASS_HIT * PASS_WOUND;
    assert_outcomes(&open, &[(0, 1.0 - land * 4.0 / 6.0), (1, land * 4.0 / 6.0)]);
    assert_outcomes(&covered, &[(0, 1.0 - land * 0.5), (1, land * 0.5)]);
}

#[test]
fn test_feel_no_pain() {
    let target = unarmoured().with_feel_no_pain(5);
    let outcomes = resolve(&sure_weapon(1, 2), &target);
    let land = PASS_HIT * PASS_WOUND;
    let keep = 4.0 / 6.0;
    assert_outcomes(
        &outcomes,
        &[
            (0, (1.0 - land) + land * (1.0 - keep) * (1.0 - keep)),
            (1, land * 2.0 * keep * (1.0 - keep)),
            (2, land * keep * keep),
        ],
    );
}

#[test]
fn test_cumulative_probabilities() {
    let outcomes = resolve(&sure_weapon(2, 1), &unarmoured());
    let row = cumulative_damage_probabilities(&outcomes, 3);
    let miss = FAIL_HIT + PASS_HIT * FAIL_WOUND;
    let land = PASS_HIT * PASS_WOUND;

    assert!((row[0] - (1.0 - miss * miss)).abs() < 1e-9);
    assert!((row[1] - land * land).abs() < 1e-9);
    assert_eq!(row[2], 0.0);

    let summary = DamageSummary::from_outcomes(&outcomes, 3);
    assert_eq!(summary.at_least, row);
    assert!((summary.average - average_damage(&outcomes)).abs() < 1e-12);
}

#[test]
fn test_many_attacks_sum_to_one() {
    let weapon = WeaponProfile::new(Dice::parse("2d6").unwrap(), 3, 5, -1, d(3));
    let target = TargetProfile::new(4, 3).with_wounds(2).with_feel_no_pain(6);
    let outcomes = resolve(&weapon, &target);
    assert!((total_probability(&outcomes) - 1.0).abs() < 1e-7);
    assert!(outcomes.keys().all(|key| key.largest() <= 2));
}

#[test]
fn test_size_limit_is_recoverable() {
    let mut resolver = Resolver::new(ResolverConfig::default().with_max_outcomes(16)).unwrap();
    let big = WeaponProfile::new(30, 3, 4, 0, 1);
    let small = WeaponProfile::new(1, 3, 4, 0, 1);
    let target = TargetProfile::new(4, 4);

    let err = resolver
        .attack_roll(&big, &target, &AttackOptions::new())
        .unwrap_err();
    assert!(err.is_size_limit());
    assert!(err.to_string().contains("limit is 16"));

    let outcomes = resolver
        .attack_roll(&small, &target, &AttackOptions::new())
        .unwrap();
    assert!((total_probability(&outcomes) - 1.0).abs() < 1e-9);
}

#[test]
fn test_dice_attacks_respect_size_limit() {
    // 6d6 attacks enumerate 46656 faces before any hit roll.
    let mut resolver = Resolver::new(ResolverConfig::default().with_max_outcomes(100)).unwrap();
    let weapon = sure_weapon(Dice::parse("6d6").unwrap(), 1);

    let err = resolver
        .attack_roll(&weapon, &unarmoured(), &AttackOptions::new())
        .unwrap_err();
    assert!(err.is_size_limit());
    assert_eq!(resolver.cache_len(), 0);
}

#[test]
fn test_cap_above_tracked_width() {
    let outcomes = resolve(&sure_weapon(1, d(20)), &unarmoured());
    let capped = cap_damage(&outcomes, 15);
    let land = PASS_HIT * PASS_WOUND;

    assert!(capped.keys().all(|key| key.largest() <= 15));
    assert!((total_probability(&capped) - 1.0).abs() < 1e-9);

    let totals = damage_totals(&capped);
    assert!((totals[&15] - land * 6.0 / 20.0).abs() < 1e-9);
    assert!((totals[&14] - land / 20.0).abs() < 1e-9);
    assert!(!totals.contains_key(&16));
    assert_eq!(cap_damage(&capped, 15), capped);
}

#[test]
fn test_memo_reused_across_requests() {
    let mut resolver = Resolver::default();
    let target = unarmoured();
    resolver
        .attack_roll(&sure_weapon(1, 1), &target, &AttackOptions::new())
        .unwrap();
    let after_first = resolver.cache_len();

    resolver
        .attack_roll(&sure_weapon(1, 1), &target, &AttackOptions::new())
        .unwrap();
    assert_eq!(resolver.cache_len(), after_first);

    resolver
        .attack_roll(&sure_weapon(2, 1), &target, &AttackOptions::new())
        .unwrap();
    assert!(resolver.cache_len() > after_first);
}
