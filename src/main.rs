mod advisor;
mod agent;
mod llm;
mod models;
mod search;
mod session;

use std::io::{BufRead, Write};
use std::sync::Arc;

use tracing::{error, info, Level};

use advisor::Advisor;
use agent::MatchAgent;
use llm::LlmClient;
use models::{PredictionRecord, ScoutList};
use search::SearchClient;
use session::SessionState;

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let _ = dotenv::dotenv();

    let llm_client = LlmClient::from_env()?;
    let has_credential = llm_client.has_credential();
    if !has_credential {
        info!("LLM_API_KEY is not set; analysis, scouting and chat are disabled");
    }
    let llm: Arc<dyn llm::TextCompletion> = Arc::new(llm_client);
    let search_client = Arc::new(SearchClient::from_env()?);
    info!("Clients initialized");

    let agent = MatchAgent::new(llm.clone(), search_client);
    let advisor = Advisor::new(llm);

    // One isolated store per interactive session. Actions run sequentially
    // to completion; nothing here is shared or concurrent.
    let mut session = SessionState::new();

    println!("courtside — tennis match advisor");
    println!("Commands: /match <query> | /scout | /refresh | /profile prudent|bold | /quit");
    println!();
    println!("advisor> {}", session.transcript()[0].text());

    let stdin = std::io::stdin();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" {
            break;
        }

        if !has_credential && line != "/refresh" && !line.starts_with("/profile") {
            println!("No API credential configured. Set LLM_API_KEY and restart.");
            continue;
        }

        if let Some(query) = line.strip_prefix("/match ") {
            run_analysis(&agent, &mut session, query).await;
        } else if line == "/scout" {
            run_scout(&agent, &mut session).await;
        } else if line == "/refresh" {
            session.invalidate_scouting();
            println!("Scouting list cleared; next /scout rebuilds it.");
        } else if let Some(choice) = line.strip_prefix("/profile ") {
            set_profile(&mut session, choice);
        } else {
            run_chat(&advisor, &mut session, line).await;
        }
    }

    Ok(())
}

/// Single-match pipeline: only a fully parsed and validated record is
/// written to the session; failures leave the slot untouched.
async fn run_analysis(agent: &MatchAgent, session: &mut SessionState, query: &str) {
    match agent.analyze(query, &today()).await {
        Ok(Some(record)) => {
            render_prediction(&record);
            session.set_prediction(record);
        }
        Ok(None) => {
            println!("No usable prediction came back for that match. Try rephrasing.");
        }
        Err(err) => {
            error!(%err, "Analysis failed");
            println!("Something went wrong while running the analysis. Check your credentials and try again.");
        }
    }
}

async fn run_scout(agent: &MatchAgent, session: &mut SessionState) {
    match agent.scout_list(session, &today()).await {
        Ok(Some(list)) => {
            let list = list.clone();
            render_scout_list(&list);
        }
        Ok(None) => {
            println!("No scoutable matches found today.");
        }
        Err(err) => {
            error!(%err, "Scouting failed");
            println!("Something went wrong while building the scouting list. Check your credentials and try again.");
        }
    }
}

async fn run_chat(advisor: &Advisor, session: &mut SessionState, text: &str) {
    match advisor.reply(session, text).await {
        Ok(reply) => println!("advisor> {}", reply),
        Err(err) => {
            error!(%err, "Chat turn failed");
            println!("The advisor is unavailable right now. Check your credentials and try again.");
        }
    }
}

fn set_profile(session: &mut SessionState, choice: &str) {
    let profile = models::RiskProfile::parse(choice);
    match profile {
        models::RiskProfile::Unset => {
            println!("Unknown profile '{}'. Valid: prudent, bold.", choice.trim());
        }
        _ => {
            session.profile = profile;
            println!("Risk profile set to {}.", profile);
        }
    }
}

fn render_prediction(record: &PredictionRecord) {
    println!();
    println!(
        "  {} {}% — {} {}%",
        record.p1_name, record.p1_score, record.p2_name, record.p2_score
    );
    println!("  {}", record.reason);
    println!();
}

fn render_scout_list(list: &ScoutList) {
    println!();
    for entry in &list.matches {
        let time = entry.match_time.as_deref().unwrap_or("--:--");
        println!(
            "  [{}] {} vs {} ({}%/{}%) -> {} @ {:.2}",
            time, entry.p1, entry.p2, entry.p1_perc, entry.p2_perc, entry.bet_on, entry.odd_value
        );
        println!("        {}", entry.reason);
    }
    println!();
}
