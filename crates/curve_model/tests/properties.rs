//! Property tests for the curve model
//!
//! Run with: cargo test -p curve_model --test properties
//! Increase cases: PROPTEST_CASES=10000 cargo test -p curve_model --test properties

use curve_model::*;
use proptest::prelude::*;

// ============================================================================
// Generators
// ============================================================================

fn reserves_strategy() -> impl Strategy<Value = ReserveState> {
    (
        1_000_000_000u64..1_000_000_000_000,
        1_000_000_000_000u64..2_000_000_000_000_000,
        any::<bool>(),
    )
        .prop_map(|(virtual_sol, virtual_token, has_creator)| ReserveState {
            virtual_sol,
            virtual_token,
            real_sol: virtual_sol,
            real_token: virtual_token / 2,
            token_total_supply: 1_000_000_000_000_000,
            complete: false,
            creator: if has_creator { Address([9u8; 32]) } else { Address::ZERO },
            mayhem_mode: false,
        })
}

fn quoter_strategy() -> impl Strategy<Value = Quoter> {
    (0u64..=500, 0u64..=500).prop_map(|(protocol_bps, creator_bps)| {
        let schedule = FeeSchedule::flat(FeeBps::new(0, protocol_bps, creator_bps))
            .expect("bps within bounds");
        Quoter::new(GlobalParams::default(), FeeSource::Tiered(schedule), ONE_BILLION_SUPPLY)
    })
}

fn shareholders_strategy() -> impl Strategy<Value = Vec<Shareholder>> {
    // Random cut points over 1..10_000 give positive shares summing to 10_000
    prop::collection::btree_set(1u16..10_000, 0..MAX_SHAREHOLDERS).prop_map(|cuts| {
        let mut bounds: Vec<u16> = cuts.into_iter().collect();
        bounds.push(10_000);
        let mut prev = 0u16;
        bounds
            .into_iter()
            .enumerate()
            .map(|(i, b)| {
                let share_bps = b - prev;
                prev = b;
                Shareholder { address: Address([i as u8 + 1; 32]), share_bps }
            })
            .collect()
    })
}

// ============================================================================
// Quoter properties
// ============================================================================

proptest! {
    /// Buying then selling the same tokens never returns more SOL than was paid
    #[test]
    fn no_free_lunch(
        reserves in reserves_strategy(),
        quoter in quoter_strategy(),
        fraction in 1u64..1_000,
    ) {
        let tokens = reserves.real_token / 1_000 * fraction;
        prop_assume!(tokens > 0);

        let buy = quoter.quote_buy_exact_tokens(&reserves, tokens, u64::MAX).unwrap();
        let after = reserves.after_buy(&buy).unwrap();
        let sell = quoter.quote_sell_exact_tokens(&after, tokens, 0).unwrap();

        prop_assert!(sell.net_sol <= buy.total_cost);
        prop_assert!(sell.gross_sol <= buy.sol_amount);
    }

    /// Same round trip through the budget-shaped buy
    #[test]
    fn no_free_lunch_exact_sol(
        reserves in reserves_strategy(),
        quoter in quoter_strategy(),
        budget in 1u64..100_000_000_000,
    ) {
        let buy = quoter.quote_buy_exact_sol(&reserves, budget, 0).unwrap();
        prop_assert!(buy.total_cost <= budget);

        let after = reserves.after_buy(&buy).unwrap();
        let sell = quoter.quote_sell_exact_tokens(&after, buy.token_amount, 0).unwrap();
        prop_assert!(sell.net_sol <= budget);
    }

    /// More tokens never cost less
    #[test]
    fn buy_cost_monotone(
        reserves in reserves_strategy(),
        quoter in quoter_strategy(),
        a in 1u64..1_000_000_000_000,
        step in 1u64..1_000_000_000,
    ) {
        let b = a + step;
        prop_assume!(b <= reserves.real_token);

        let qa = quoter.quote_buy_exact_tokens(&reserves, a, u64::MAX).unwrap();
        let qb = quoter.quote_buy_exact_tokens(&reserves, b, u64::MAX).unwrap();
        prop_assert!(qb.total_cost >= qa.total_cost);
    }

    /// Selling more tokens never yields less gross SOL; net SOL rises once the
    /// gross moves past the two per-component fee roundings
    #[test]
    fn sell_proceeds_monotone(
        reserves in reserves_strategy(),
        quoter in quoter_strategy(),
        a in 1u64..1_000_000_000_000,
        step in 1u64..1_000_000_000,
    ) {
        let qa = quoter.quote_sell_exact_tokens(&reserves, a, 0);
        let qb = quoter.quote_sell_exact_tokens(&reserves, a + step, 0);
        if let (Ok(qa), Ok(qb)) = (qa, qb) {
            prop_assert!(qb.gross_sol >= qa.gross_sol);
            if qb.gross_sol >= qa.gross_sol + 3 {
                prop_assert!(qb.net_sol > qa.net_sol);
            }
        }
    }

    /// A whole lamport of price difference shows up as a strict increase
    #[test]
    fn buy_cost_strictly_increasing_per_price_unit(
        reserves in reserves_strategy(),
        quoter in quoter_strategy(),
        a in 1u64..1_000_000_000_000,
    ) {
        // One lamport's worth of tokens at spot, doubled for curvature
        let step = (reserves.virtual_token / reserves.virtual_sol).max(1) * 2;
        let b = a + step;
        prop_assume!(b <= reserves.real_token);

        let qa = quoter.quote_buy_exact_tokens(&reserves, a, u64::MAX).unwrap();
        let qb = quoter.quote_buy_exact_tokens(&reserves, b, u64::MAX).unwrap();
        prop_assert!(qb.total_cost > qa.total_cost);
    }

    /// The inverse budget always buys at least what fits into it
    #[test]
    fn sol_budget_covers_quote(
        reserves in reserves_strategy(),
        quoter in quoter_strategy(),
        tokens in 1u64..1_000_000_000_000,
    ) {
        prop_assume!(tokens <= reserves.real_token);
        let budget = quoter.sol_budget_for_tokens(&reserves, tokens).unwrap();
        let quote = quoter.quote_buy_exact_sol(&reserves, budget, 0).unwrap();
        prop_assert!(quote.total_cost <= budget);
    }
}

// ============================================================================
// Fee properties
// ============================================================================

proptest! {
    /// Rising market cap never selects a lower tier
    #[test]
    fn tier_selection_monotone(
        thresholds in prop::collection::btree_set(any::<u64>(), 0..MAX_FEE_TIERS),
        mc_a in any::<u64>(),
        mc_delta in any::<u64>(),
    ) {
        let tiers: Vec<FeeTier> = thresholds
            .iter()
            .enumerate()
            .map(|(i, t)| FeeTier {
                market_cap_threshold: *t as u128,
                fees: FeeBps::new(0, i as u64 + 1, 0),
            })
            .collect();
        let schedule = FeeSchedule::new(FeeBps::new(0, 0, 0), &tiers).unwrap();

        let mc_a = mc_a as u128;
        let mc_b = mc_a + mc_delta as u128;
        // protocol_bps encodes tier rank; flat is rank 0
        let rank_a = resolve(&schedule, mc_a).protocol_bps;
        let rank_b = resolve(&schedule, mc_b).protocol_bps;
        prop_assert!(rank_b >= rank_a);
    }

    /// Payouts plus remainder always equal the amount; loss is under one unit per holder
    #[test]
    fn distribution_conserves(
        amount in any::<u64>(),
        shareholders in shareholders_strategy(),
    ) {
        let plan = distribute_raw(amount, &shareholders).unwrap();
        let paid: u128 = plan.payouts.iter().map(|p| p.amount as u128).sum();
        prop_assert_eq!(paid + plan.remainder as u128, amount as u128);
        prop_assert!((plan.remainder as usize) < shareholders.len());

        for (payout, sh) in plan.payouts.iter().zip(shareholders.iter()) {
            prop_assert_eq!(payout.address, sh.address);
        }
    }
}

// ============================================================================
// Incentive properties
// ============================================================================

proptest! {
    /// Two reads at the same timestamp agree
    #[test]
    fn unclaimed_idempotent(
        volume in 0u64..1_000_000_000_000,
        unclaimed in 0u64..1_000_000_000,
        last_offset in 0i64..(40 * 86_400),
        now_offset in 0i64..(40 * 86_400),
    ) {
        let start = 1_700_000_000i64;
        let mut global = GlobalVolumeAccumulator {
            start_time: start,
            end_time: start + 30 * 86_400,
            seconds_per_day: 86_400,
            ..Default::default()
        };
        global.total_token_supply = [1_000_000_000_000; VOLUME_WINDOW_DAYS];
        global.sol_volumes = [2_000_000_000_000; VOLUME_WINDOW_DAYS];

        let user = UserVolumeAccumulator {
            total_unclaimed_tokens: unclaimed,
            current_sol_volume: volume,
            last_update_timestamp: start + last_offset,
            ..Default::default()
        };
        let now = start + now_offset;

        let a = unclaimed_tokens(&global, &user, now).unwrap();
        let b = unclaimed_tokens(&global, &user, now).unwrap();
        prop_assert_eq!(a, b);
        prop_assert!(a >= unclaimed);

        let synced = user.sync(&global, now).unwrap();
        prop_assert_eq!(synced.sync(&global, now).unwrap(), synced);
    }
}
