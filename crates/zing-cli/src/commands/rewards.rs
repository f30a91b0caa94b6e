use clap::Subcommand;
use serde_json::json;
use zing_core::{Config, RewardCalculator, RewardStore};

use super::{http_store, runtime, CliResult};

#[derive(Subcommand)]
pub enum RewardsAction {
    /// Points for the next qualifying read
    Preview {
        /// Qualifying reads already made since the feed was loaded
        #[arg(long, default_value = "0")]
        prior_reads: u32,
        /// Apply the weekend multiplier
        #[arg(long)]
        weekend: bool,
    },
    /// Points for a streak-day reward
    StreakBonus {
        #[arg(long)]
        streak: u32,
        #[arg(long)]
        weekend: bool,
    },
    /// Remote points, streak and reading statistics
    Status,
}

pub fn run(action: RewardsAction) -> CliResult {
    let config = Config::load()?;
    let calculator = RewardCalculator::with_config(config.rewards.clone());

    match action {
        RewardsAction::Preview {
            prior_reads,
            weekend,
        } => {
            let out = json!({
                "prior_reads": prior_reads,
                "weekend": weekend,
                "multiplier": calculator.click_bonus_multiplier(prior_reads),
                "earned_points": calculator.click_reward(prior_reads, weekend),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        RewardsAction::StreakBonus { streak, weekend } => {
            let out = json!({
                "streak": streak,
                "weekend": weekend,
                "multiplier": calculator.streak_bonus_multiplier(streak),
                "earned_points": calculator.streak_reward(streak, weekend),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        RewardsAction::Status => {
            let username = config.server.require_username()?.to_string();
            let store = http_store(&config)?;
            let rt = runtime()?;
            let (points, streak, stats) = rt.block_on(async {
                tokio::join!(
                    store.current_points(&username),
                    store.current_streak(&username),
                    store.reading_statistics(&username),
                )
            });
            let out = json!({
                "username": username,
                "points": points?,
                "streak": streak?,
                "statistics": stats?,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
