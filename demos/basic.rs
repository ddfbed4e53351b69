//! Basic example: ranking an observed creature and its evolutions
//!
//! This example demonstrates:
//! - Loading master data from JSON
//! - Querying the rank of one IV combination in every league
//! - Listing a league's top combinations
//! - Narrowing query output to the level caps of interest

use ivrank::*;

const MASTER: &str = r#"{
    "pokemon": {
        "1": {"attack": 118, "defense": 111, "stamina": 128,
              "evolutions": [{"pokemon": 2}]},
        "2": {"attack": 151, "defense": 143, "stamina": 155,
              "evolutions": [{"pokemon": 3}]},
        "3": {"attack": 198, "defense": 189, "stamina": 190,
              "temp_evolutions": {"1": {"attack": 264, "defense": 250, "stamina": 190}}}
    }
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let master = MasterData::from_json(MASTER)?;
    let engine = RankEngine::new(RankerConfig::default(), master)?;

    println!("=== Query: #1 at 0/14/15, level 20 ===\n");
    let query = RankQuery::new(1, 0, 14, 15, 20.0);
    let results = engine.query_rank(&query)?;
    for (league, entries) in results.iter() {
        println!("{league}:");
        for entry in entries {
            println!(
                "  #{}{} cap {:>5} rank {:>4} level {:>4} CP {:>4} {:.2}%{}",
                entry.pokemon,
                if entry.evolution != 0 { " (mega)" } else { "" },
                entry.cap,
                entry.rank,
                entry.level,
                entry.cp,
                entry.percentage * 100.0,
                if entry.capped { " capped" } else { "" },
            );
        }
    }

    println!("\n=== Top 3 of #2 ===\n");
    let top = engine.calculate_top_ranks(3, 2, 0, 0, 0)?;
    for (league, rankings) in top.iter() {
        println!("{league}:");
        for ranking in rankings {
            println!(
                "  rank {} {}/{}/{} cap {} level {} CP {}",
                ranking.rank,
                ranking.attack,
                ranking.defense,
                ranking.stamina,
                ranking.cap,
                ranking.level,
                ranking.cp,
            );
        }
    }

    println!("\n=== Great league, level 50 only ===\n");
    if let Some(great) = results.get("great") {
        for entry in filter_level_caps(great, &[50.0]) {
            println!("  #{} rank {} at level {}", entry.pokemon, entry.rank, entry.level);
        }
    }

    Ok(())
}
