use clap::Parser;
use dialoguer::{theme::ColorfulTheme, Select};
use quiz_league::client::{api::DEFAULT_BACKEND, Outcome, PlaySession, QuizClient};
use quiz_league::models::difficulty::{Difficulty, SUGGESTED_CATEGORIES};
use quiz_league::models::question::Label;
use tracing_subscriber::EnvFilter;

/// Terminal quiz player for the quiz-league question service.
#[derive(Parser, Debug)]
#[command(name = "play")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base URL of the question service.
    #[arg(short, long, env = "QUIZ_BACKEND", default_value = DEFAULT_BACKEND)]
    backend: String,

    /// Starting category.
    #[arg(short, long, default_value = "general knowledge")]
    category: String,

    /// Starting difficulty (easy|medium|hard|progressive).
    #[arg(short, long, default_value = "progressive", value_parser = parse_difficulty)]
    difficulty: Difficulty,
}

fn parse_difficulty(raw: &str) -> Result<Difficulty, String> {
    raw.parse()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let client = QuizClient::new(&cli.backend)?;
    let mut session = PlaySession::new(&cli.category, cli.difficulty);
    let theme = ColorfulTheme::default();

    println!("\nGully Quiz League\n");

    loop {
        let score = session.score();
        println!(
            "Right: {}   Wrong: {}   [{} / {}]",
            score.right, score.wrong, session.category, session.difficulty
        );

        let next_label = if session.question().is_none() {
            "Start ▶"
        } else {
            "Next Question ▶"
        };
        let menu = [next_label, "Settings", "Reset Score ⟲", "Quit"];
        let choice = Select::with_theme(&theme)
            .with_prompt("What next?")
            .items(&menu)
            .default(0)
            .interact()?;

        match choice {
            0 => play_round(&client, &mut session, &theme).await?,
            1 => configure(&client, &mut session, &theme).await?,
            2 => {
                session.reset();
                println!("\nScores reset and game cleared.\n");
            }
            _ => break,
        }
    }

    let score = session.score();
    println!("\nFinal score: {} right, {} wrong.\n", score.right, score.wrong);
    Ok(())
}

async fn play_round(
    client: &QuizClient,
    session: &mut PlaySession,
    theme: &ColorfulTheme,
) -> anyhow::Result<()> {
    match client
        .next_question(&session.category, session.difficulty)
        .await
    {
        Ok(record) => session.load(record),
        Err(e) => {
            println!("\nBackend error: {}\n", e);
            return Ok(());
        }
    }

    let Some(question) = session.question().cloned() else {
        return Ok(());
    };
    println!("\n{}\n", question.question);

    let items: Vec<String> = question
        .options
        .iter()
        .map(|(label, text)| format!("{}) {}", label, text))
        .collect();
    let picked = Select::with_theme(theme)
        .with_prompt("Your answer")
        .items(&items)
        .interact()?;
    let label = Label::ALL[picked];

    match session.select(label)? {
        Outcome::Correct => println!("\n✅ Correct!"),
        Outcome::Wrong { correct } => println!(
            "\n❌ Wrong. The answer was {}) {}",
            correct,
            question.options.get(correct)
        ),
    }
    if !question.explanation.is_empty() {
        println!("Explanation: {}", question.explanation);
    }
    println!();
    Ok(())
}

async fn configure(
    client: &QuizClient,
    session: &mut PlaySession,
    theme: &ColorfulTheme,
) -> anyhow::Result<()> {
    let categories: Vec<String> = match client.categories().await {
        Ok(resp) => resp.categories,
        Err(e) => {
            tracing::warn!(error = %e, "Falling back to built-in categories");
            SUGGESTED_CATEGORIES.iter().map(|c| c.to_string()).collect()
        }
    };
    let current = categories
        .iter()
        .position(|c| *c == session.category)
        .unwrap_or(0);
    let picked = Select::with_theme(theme)
        .with_prompt("Category")
        .items(&categories)
        .default(current)
        .interact()?;
    session.category = categories[picked].clone();

    let difficulties: Vec<&str> = Difficulty::ALL.iter().map(|d| d.as_str()).collect();
    let current = Difficulty::ALL
        .iter()
        .position(|d| *d == session.difficulty)
        .unwrap_or(0);
    let picked = Select::with_theme(theme)
        .with_prompt("Difficulty")
        .items(&difficulties)
        .default(current)
        .interact()?;
    session.difficulty = Difficulty::ALL[picked];

    Ok(())
}
