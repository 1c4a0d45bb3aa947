use anyhow::{anyhow, Result};
use meeting_insights_lib::presenters::TriggerOutcome;
use meeting_insights_lib::{
    init_logging, AnalysisScreen, ClientSettings, HttpTransport, LogNotifier, MeetingHeader,
};
use std::env;
use std::sync::Arc;

#[derive(Clone, Copy)]
enum Generate {
    Summary,
    Decisions,
    Actions,
    Discussion,
}

fn parse_generate(arg: &str) -> Option<Generate> {
    match arg {
        "summary" => Some(Generate::Summary),
        "decisions" => Some(Generate::Decisions),
        "actions" => Some(Generate::Actions),
        "discussion" => Some(Generate::Discussion),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: meeting_insights <meeting_id> [summary|decisions|actions|discussion]");
        std::process::exit(2);
    }
    let generate = match args.get(2) {
        None => None,
        Some(arg) => match parse_generate(arg) {
            Some(g) => Some(g),
            None => {
                eprintln!("Unknown analysis: {}", arg);
                std::process::exit(2);
            }
        },
    };

    let settings = ClientSettings::load();
    log::info!("Using backend at {}", settings.api_base_url);
    let transport = Arc::new(HttpTransport::new(&settings)?);
    let mut screen = AnalysisScreen::new(transport, Arc::new(LogNotifier));

    if let Err(e) = screen.open(Some(&args[1])).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let meeting = screen
        .meeting()
        .ok_or_else(|| anyhow!("Screen is not ready"))?;
    println!("{}\n", MeetingHeader::new(meeting));

    let presenters = screen
        .presenters()
        .ok_or_else(|| anyhow!("Screen is not ready"))?;

    if let Some(generate) = generate {
        let outcome = match generate {
            Generate::Summary => presenters.summary.trigger().await,
            Generate::Decisions => presenters.decisions.trigger().await,
            Generate::Actions => presenters.action_items.trigger().await,
            Generate::Discussion => presenters.discussion.trigger().await,
        };
        if outcome == TriggerOutcome::Failed {
            eprintln!("Generation failed; showing previous results");
        }
    }

    println!("{}\n", presenters.summary.view());
    println!("{}\n", presenters.decisions.view());
    println!("{}\n", presenters.action_items.view());
    println!("{}", presenters.discussion.view());

    Ok(())
}
