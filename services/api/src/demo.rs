use crate::infra::InMemoryJournalRepository;
use chrono::Utc;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use trait_flow::error::AppError;
use trait_flow::workflows::checkin::{CheckinForm, DailyCheckinService, EnergyLevel};
use trait_flow::workflows::messaging::{GenerationPolicy, MessageSelector, MessageSource};
use trait_flow::workflows::onboarding::{OnboardingService, DEFAULT_PAGE_SIZE};
use trait_flow::workflows::personality::{
    compute_scores, AnswerSet, Likert, TipiInventory, TraitScores, NEUTRAL_RESPONSE,
};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Inventory answer as ITEM=VALUE (1-7). Repeat per item; unanswered items count as 4.
    #[arg(long = "answer", value_parser = parse_answer)]
    pub(crate) answers: Vec<(u8, u8)>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Simulated message generation latency in milliseconds.
    #[arg(long, default_value_t = 800)]
    pub(crate) latency_ms: u64,
    /// Mood for the demo check-in (1-5).
    #[arg(long, default_value_t = 2)]
    pub(crate) mood: u8,
    /// Energy for the demo check-in: low, medium or high.
    #[arg(long, default_value = "low", value_parser = parse_energy)]
    pub(crate) energy: EnergyLevel,
    /// Optional note attached to the demo check-in.
    #[arg(long)]
    pub(crate) note: Option<String>,
    /// Write the resulting check-in history to this CSV file.
    #[arg(long)]
    pub(crate) export_csv: Option<PathBuf>,
}

/// Answers favoring conscientiousness, used to drive the demo onboarding.
const DEMO_ANSWERS: [(u8, u8); 10] = [
    (1, 4),
    (2, 5),
    (3, 7),
    (4, 3),
    (5, 5),
    (6, 4),
    (7, 6),
    (8, 1),
    (9, 5),
    (10, 3),
];

fn parse_answer(raw: &str) -> Result<(u8, u8), String> {
    let (item, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ITEM=VALUE, got `{raw}`"))?;
    let item = item
        .trim()
        .parse::<u8>()
        .map_err(|_| format!("invalid item id `{item}`"))?;
    let value = value
        .trim()
        .parse::<u8>()
        .map_err(|_| format!("invalid response `{value}`"))?;
    let value = Likert::new(value).map_err(|err| err.to_string())?;
    Ok((item, value.value()))
}

fn parse_energy(raw: &str) -> Result<EnergyLevel, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "low" => Ok(EnergyLevel::Low),
        "medium" => Ok(EnergyLevel::Medium),
        "high" => Ok(EnergyLevel::High),
        other => Err(format!("unknown energy level `{other}`")),
    }
}

pub(crate) fn run_inventory() -> Result<(), AppError> {
    let inventory = TipiInventory::standard();
    println!("Ten-item personality inventory (1 = disagree strongly, 7 = agree strongly)");
    for item in inventory.items() {
        let marker = if item.reversed { " (reversed)" } else { "" };
        println!(
            "{:>2}. {} [{}{}]",
            item.id,
            item.prompt,
            item.trait_.short_label(),
            marker
        );
    }
    Ok(())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let inventory = TipiInventory::standard();
    let mut answers = AnswerSet::new();
    for (item_id, value) in args.answers {
        if inventory.item(item_id).is_none() {
            println!("Ignoring unknown item {item_id}");
            continue;
        }
        answers.record(item_id, value);
    }

    let unanswered = inventory.len().saturating_sub(answers.len());
    if unanswered > 0 {
        println!("{unanswered} unanswered item(s) scored as {NEUTRAL_RESPONSE}");
    }

    let scores = compute_scores(&inventory, &answers);
    render_scores(&scores);
    Ok(())
}

fn render_scores(scores: &TraitScores) {
    println!("Trait profile");
    for (trait_, score) in scores.iter() {
        let filled = (score * 2.0).round() as usize;
        println!(
            "  {:<18} {:>4.2} {}",
            trait_.label(),
            score,
            "#".repeat(filled)
        );
    }
    println!("Dominant trait: {}", scores.dominant_trait().label());
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        latency_ms,
        mood,
        energy,
        note,
        export_csv,
    } = args;

    println!("Trait Flow demo");
    let repository = Arc::new(InMemoryJournalRepository::default());
    let onboarding = OnboardingService::new(
        repository.clone(),
        Arc::new(TipiInventory::standard()),
        DEFAULT_PAGE_SIZE,
    )?;

    let (session_id, _) = onboarding.create()?;
    let mut view = onboarding.start(&session_id)?;
    while view.step != "result" {
        for item in &view.items {
            let value = DEMO_ANSWERS
                .iter()
                .find(|(id, _)| *id == item.id)
                .map_or(NEUTRAL_RESPONSE, |(_, value)| *value);
            onboarding.answer(&session_id, item.id, value)?;
        }
        println!(
            "- Answered page {} of {}",
            view.page.unwrap_or_default() + 1,
            view.page_count
        );
        view = onboarding.next(&session_id)?;
    }

    let profile = onboarding.finish(&session_id)?;
    render_scores(&profile.scores);

    let selector = Arc::new(MessageSelector::canned(
        Duration::from_millis(latency_ms),
        GenerationPolicy::default(),
    ));
    let service = DailyCheckinService::new(repository, selector);

    println!("\nDaily check-in (mood {mood}, energy {})", energy.label());
    let mut form = CheckinForm::new();
    form.mood = mood;
    form.energy = energy;
    form.note = note.unwrap_or_default();

    let Some(receipt) = form.submit(&service).await else {
        println!("  {}", form.error().unwrap_or("Submission failed."));
        return Ok(());
    };

    let source = match receipt.message.source {
        MessageSource::Generated => "generated",
        MessageSource::Fallback => "fallback template",
    };
    println!("- Recorded {}", receipt.checkin.id.0);
    println!(
        "- Message {} ({source}, based on {}):",
        receipt.message.id.0,
        receipt.message.personalization.base_trait.label()
    );
    println!("  {}", receipt.message.text);

    let rated = service.rate_message(&receipt.message.id, 5)?;
    println!(
        "- Rated {} / 5",
        rated.rating.map(|rating| rating.value()).unwrap_or_default()
    );

    let stats = service.stats(Utc::now().date_naive())?;
    println!(
        "- {} check-in(s) | {} day streak | {} this week",
        stats.total, stats.streak_days, stats.this_week
    );

    if let Some(path) = export_csv {
        let csv = service.export_csv()?;
        std::fs::write(&path, csv)?;
        println!("- Exported history to {}", path.display());
    }

    Ok(())
}
