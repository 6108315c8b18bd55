//! Leaderboard command implementation

use anyhow::{Result, bail};

use banana_quest::config::Config;
use banana_quest::domain::Rank;
use banana_quest::store::GameStore;

/// Print the standings straight from the database
pub fn leaderboard_command(config: &Config, limit: Option<usize>, rank: Option<String>) -> Result<()> {
    let store = GameStore::with_path(&config.database_path())?;
    let limit = config
        .leaderboard
        .resolve_limit(limit.map(|l| l.to_string()).as_deref());

    let entries = match rank {
        Some(raw) => {
            let Some(rank) = Rank::parse(&raw) else {
                bail!("Unknown rank: {}", raw);
            };
            store.leaderboard().by_rank(rank, limit)?
        }
        None => store.leaderboard().top(limit)?,
    };

    if entries.is_empty() {
        println!("No players found.");
        return Ok(());
    }

    println!("Leaderboard ({}):\n", entries.len());
    for entry in entries {
        println!(
            "  {:>3}. {:<20} {:>8} pts  {:<9} {} missions",
            entry.position, entry.username, entry.points, entry.rank, entry.missions_completed
        );
    }

    Ok(())
}
