use std::env;

use study_helper::{config::Config, processing::StudyService};

fn live_config() -> Config {
    dotenvy::dotenv().ok();
    Config::from_env().expect("valid configuration")
}

#[tokio::test]
#[ignore = "Requires a running Ollama with LOCAL_MODEL pulled"]
async fn live_local_model_summarizes_text() {
    let service = StudyService::new(&live_config()).expect("service");
    let notes = service
        .summarize_text(
            "The Krebs Cycle is a series of chemical reactions used by aerobic organisms. \
             It releases stored energy through the oxidation of acetyl-CoA. \
             The cycle also provides precursors for several amino acids.",
        )
        .await
        .expect("notes");
    assert!(notes.starts_with("Key Points:\n• "), "{notes}");
    assert_eq!(notes.matches("\n1) ").count(), 1);
}

#[tokio::test]
#[ignore = "Requires network access to youtube.com and a summarization backend"]
async fn live_youtube_transcript_summary() {
    use study_helper::processing::StudyApi;

    let url = env::var("LIVE_YOUTUBE_URL")
        .unwrap_or_else(|_| "https://www.youtube.com/watch?v=aircAruvnKk".to_string());
    let service = StudyService::new(&live_config()).expect("service");
    let notes = service.summarize_youtube(&url).await.expect("notes");
    assert!(notes.contains("Practice Questions:"), "{notes}");
}
