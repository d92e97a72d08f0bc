//! CLI probe for the schedule engine.
//!
//! # Responsibility
//! - Decode a share-code argument and print the per-year schedule.
//! - Keep output deterministic for quick local sanity checks.

use std::collections::BTreeSet;

use permitplan_core::{
    annotate_gaps, decode_permits, encode_permits, group_by_round, EngineConfig, NoHolidays,
    PermitStore,
};

fn main() {
    let config = EngineConfig::default();
    let input = std::env::args().nth(1).unwrap_or_default();

    println!("permitplan_core version={}", permitplan_core::core_version());

    let mut store = PermitStore::new();
    store.replace_all(decode_permits(&input, &config));
    if store.is_empty() {
        println!("no permits decoded; pass a share code like $2026R11T2h");
        return;
    }

    let years: BTreeSet<i32> = store
        .permits()
        .iter()
        .map(|permit| permit.start_year())
        .collect();
    for year in years {
        let year_permits = store.permits_starting_in(year);
        let rounds = group_by_round(&year_permits, &config);
        let gaps = annotate_gaps(&year_permits, &NoHolidays, &config);

        println!(
            "{year}: {} permit(s), {} round(s)",
            year_permits.len(),
            rounds.len()
        );
        for (index, round) in rounds.iter().enumerate() {
            println!("  round {} ({} regular)", index + 1, round.regular_count());
            for permit in round.permits() {
                if let Some(gap) = gaps.get(&permit.id) {
                    let label = gap
                        .label_text(&config.gap_label_delimiter)
                        .map(|text| format!(" [{text}]"))
                        .unwrap_or_default();
                    println!("    .. {} idle day(s){label}", gap.days);
                }
                println!(
                    "    {} {} .. {}",
                    permit.kind.code_char(),
                    permit.start_date,
                    permit.end_date
                );
            }
        }
    }

    println!("share code: {}", encode_permits(store.permits(), None));
}
