use crate::infra::{sample_profiles, InMemoryProfileRepository, LoggingGateway};
use chrono::Utc;
use clap::Args;
use cofound::config::{ApplicationConfig, TelegramConfig};
use cofound::error::AppError;
use cofound::matching::{compute_score, rank_candidates, ScoreBreakdown};
use cofound::notifications::{DispatchSummary, NotificationDispatcher, NotificationEvent};
use cofound::profiles::{Profile, UserId};
use cofound::widget_auth::{sign, WidgetAuthPayload, WidgetAuthVerifier};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEMO_BOT_TOKEN: &str = "100000:demo-bot-token";

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Profile JSON file for the first founder
    pub(crate) a: PathBuf,
    /// Profile JSON file for the second founder
    pub(crate) b: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Base URL used in notification deep links
    #[arg(long)]
    pub(crate) base_url: Option<String>,
    /// Skip the Telegram login portion of the demo
    #[arg(long)]
    pub(crate) skip_login: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let a = load_profile(&args.a)?;
    let b = load_profile(&args.b)?;

    let breakdown = compute_score(&a, &b);
    println!("Compatibility: {} vs {}", label(&a), label(&b));
    render_breakdown(&breakdown);
    Ok(())
}

fn load_profile(path: &Path) -> Result<Profile, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn label(profile: &Profile) -> &str {
    profile
        .display_name
        .as_deref()
        .unwrap_or(profile.id.as_str())
}

fn render_breakdown(breakdown: &ScoreBreakdown) {
    for component in breakdown.components() {
        println!(
            "  {:<12} {:>3} / {}",
            component.category.label(),
            component.score,
            component.max
        );
    }
    println!("  {:<12} {:>3} / 100", "Total", breakdown.total());
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let profiles = sample_profiles();
    let app = args
        .base_url
        .map(ApplicationConfig::new)
        .unwrap_or_else(|| ApplicationConfig::new("https://cofound.uz"));

    println!("CoFound demo");
    println!("\nMatches for {}", label(&profiles[0]));
    for candidate in rank_candidates(&profiles[0], &profiles) {
        println!(
            "  {:<18} {:>3}",
            candidate
                .display_name
                .as_deref()
                .unwrap_or(candidate.user_id.as_str()),
            candidate.total
        );
    }

    let gateway = Arc::new(LoggingGateway::default());
    let dispatcher = NotificationDispatcher::new(
        Arc::new(InMemoryProfileRepository::with_profiles(profiles)),
        gateway.clone(),
        app,
    );

    let events = [
        NotificationEvent::connection_request(UserId::from("kamola"), "Aziz"),
        NotificationEvent::idea_interest(UserId::from("aziz"), "Kamola", "42", "Delivery App"),
        NotificationEvent::new_message(UserId::from("nurlan"), "Aziz", "thread-7"),
        NotificationEvent::connection_accepted(UserId::from("ghost"), "Aziz"),
        NotificationEvent::new_message(UserId::from("kamola"), "Aziz", " "),
    ];

    println!("\nNotifications");
    for event in events {
        let event = match event {
            Ok(event) => event,
            Err(reason) => {
                println!("  rejected before dispatch: {reason}");
                continue;
            }
        };
        let target = event.target().clone();
        let kind = event.kind();
        let result = dispatcher.dispatch(event).await;
        let summary = DispatchSummary::from(&result);
        println!(
            "  {:<20} -> {:<8} {}",
            kind,
            target,
            serde_json::to_string(&summary)?
        );
    }
    for message in gateway.sent() {
        println!("\n  chat {}:\n{}", message.chat_id, message.text);
    }

    if !args.skip_login {
        run_login_demo();
    }

    Ok(())
}

fn run_login_demo() {
    let verifier = WidgetAuthVerifier::new(&TelegramConfig::new(DEMO_BOT_TOKEN));
    let mut payload = WidgetAuthPayload::from_pairs([
        ("id", "555".to_string()),
        ("first_name", "Aziz".to_string()),
        ("username", "aziz_dev".to_string()),
        ("auth_date", Utc::now().timestamp().to_string()),
    ]);
    let hash = sign(&payload, DEMO_BOT_TOKEN);
    payload.insert("hash", hash);

    println!("\nTelegram login");
    match verifier.authenticate(&payload, Utc::now()) {
        Ok(identity) => println!("  signed payload accepted for {}", identity.display_name()),
        Err(err) => println!("  signed payload rejected: {err}"),
    }

    payload.insert("id", "556");
    match verifier.authenticate(&payload, Utc::now()) {
        Ok(_) => println!("  tampered payload accepted"),
        Err(err) => println!("  tampered payload rejected: {err}"),
    }
}
