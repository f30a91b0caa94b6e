use std::time::Duration;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::warn;
use zing_core::{
    Config, CreditOutcome, EngagementController, Event, HttpRewardStore, RewardStore,
    SystemClock, TriggerPolicy,
};

use super::{coordinator, runtime, CliResult};

#[derive(Args)]
pub struct ReadArgs {
    /// Article URL, used as the article id
    pub article_url: String,
    /// Override `session.trigger` (poll-on-exit or fire-on-threshold)
    #[arg(long)]
    pub policy: Option<TriggerPolicy>,
    /// Print engine events as JSON lines instead of notifications
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ReadArgs) -> CliResult {
    let config = Config::load()?;
    let mut settings = config.engine_settings();
    if let Some(policy) = args.policy {
        settings.session.trigger = policy;
    }

    let mut controller = EngagementController::new(coordinator(&config)?, SystemClock, settings);
    runtime()?.block_on(read_session(&mut controller, &args))
}

async fn read_session(
    controller: &mut EngagementController<HttpRewardStore, SystemClock>,
    args: &ReadArgs,
) -> CliResult {
    if let Err(e) = controller.hydrate().await {
        warn!(error = %e, "could not load points and streak; starting from zero");
    }
    print_events(controller, args.json)?;

    controller.open_article(&args.article_url)?;
    print_events(controller, args.json)?;
    eprintln!(
        "reading {} ({}); press Enter to return to the feed",
        args.article_url,
        controller.policy()
    );

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                line?;
                break;
            }
            _ = ticker.tick() => {
                if controller.poll().await.is_some() {
                    print_events(controller, args.json)?;
                }
            }
        }
    }

    let outcome = controller.on_article_closed().await;
    print_events(controller, args.json)?;
    if !args.json {
        print_summary(controller, &outcome);
    }
    Ok(())
}

fn print_events<S: RewardStore>(
    controller: &mut EngagementController<S, SystemClock>,
    json: bool,
) -> CliResult {
    for event in controller.drain_events() {
        if json {
            println!("{}", serde_json::to_string(&event)?);
        } else if let Some(message) = notification(&event) {
            println!("{message}");
        }
    }
    Ok(())
}

/// User-facing text for an event, if it warrants one.
fn notification(event: &Event) -> Option<String> {
    match event {
        Event::RewardCredited { earned_points, .. } => {
            Some(format!("You earned {earned_points} points!"))
        }
        Event::FeedCompleted { bonus_points, .. } => Some(format!(
            "All articles read! Bonus {bonus_points} points!"
        )),
        Event::MilestoneReached { threshold, .. } => Some(format!(
            "Congratulations! You've reached {threshold} points!"
        )),
        Event::SessionNotQualified { .. } => {
            Some("Not enough time spent reading to earn points.".to_string())
        }
        Event::ConfirmationFailed {
            kind,
            error,
            queued_for_retry,
            ..
        } => Some(format!(
            "warning: {kind:?} was not confirmed by the server ({error}){}",
            if *queued_for_retry { "; queued for retry" } else { "" }
        )),
        Event::StreakReset { .. } => Some("Your reading streak was reset.".to_string()),
        _ => None,
    }
}

fn print_summary<S: RewardStore>(
    controller: &EngagementController<S, SystemClock>,
    outcome: &CreditOutcome,
) {
    let snapshot = controller.snapshot();
    let double = if snapshot.double_points { " (double points today)" } else { "" };
    let total = outcome.earned_points + outcome.bonus_points;
    println!(
        "earned: {total}  points: {}  streak: {}{double}",
        snapshot.points, snapshot.streak
    );
}
