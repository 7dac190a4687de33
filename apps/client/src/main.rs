mod config;
mod errors;
mod gateway;
mod models;
mod orchestrator;
mod workflows;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use bytes::Bytes;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::gateway::{HttpGateway, ResumeApi};
use crate::models::chat::{Message, MessageRole};
use crate::models::document::UploadFile;
use crate::orchestrator::PageOrchestrator;
use crate::workflows::analysis::{AnalysisState, AnalysisWorkflow};
use crate::workflows::conversation::ConversationWorkflow;
use crate::workflows::document::DocumentWorkflow;
use crate::workflows::scoring::{ScoringState, ScoringWorkflow};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume client v{}", env!("CARGO_PKG_VERSION"));

    let path = std::env::args()
        .nth(1)
        .context("Usage: client <resume.pdf|resume.docx>")?;

    // Build the gateway and the four workflow containers
    let api: Arc<dyn ResumeApi> = Arc::new(HttpGateway::new(&config));
    let documents = Arc::new(DocumentWorkflow::new(api.clone(), config.max_upload_bytes()));
    let scoring = Arc::new(ScoringWorkflow::new(api.clone()));
    let analysis = Arc::new(AnalysisWorkflow::new(api.clone()));
    let conversation = Arc::new(ConversationWorkflow::new(api));
    let page = PageOrchestrator::new(
        documents.clone(),
        scoring.clone(),
        analysis.clone(),
        conversation,
    );
    info!("Workflows initialized (service: {})", config.api_base_url);

    // Upload; on success the orchestrator fires score + analysis
    let file = read_upload(&path)?;
    info!("Uploading {} ({} bytes)", file.file_name, file.bytes.len());
    let document = page.upload(file).await?;

    println!(
        "Uploaded {} — {} skill(s) extracted",
        documents
            .snapshot()
            .file_name
            .as_deref()
            .unwrap_or("resume"),
        document.extracted_skills.len()
    );
    print_scores(&scoring.snapshot());
    print_analysis(&analysis.snapshot());

    chat_loop(&page, &scoring).await
}

/// Reads the file to upload; the MIME type is derived from the extension
/// and validated by the document workflow, not here.
fn read_upload(path: &str) -> Result<UploadFile> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read '{path}'"))?;
    let file_name = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
        .to_string();
    let mime_type = mime_for(&file_name).to_string();
    Ok(UploadFile {
        file_name,
        mime_type,
        bytes: Bytes::from(bytes),
    })
}

fn mime_for(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".pdf") {
        "application/pdf"
    } else if lower.ends_with(".docx") {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    } else {
        "application/octet-stream"
    }
}

/// Interactive loop against the conversation workflow. Commands:
/// /history, /clear, /reset, /jd <text>, /quit; anything else is sent to
/// the assistant.
async fn chat_loop(page: &PageOrchestrator, scoring: &ScoringWorkflow) -> Result<()> {
    let conversation = match page.conversation() {
        Some(c) => c,
        None => return Ok(()),
    };
    conversation.add_local_message(
        MessageRole::Assistant,
        "Hi! Ask me anything about your resume.",
    );
    print_last_message(&conversation.snapshot().messages);
    println!("(commands: /history /clear /reset /jd <text> /quit)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        match input {
            "" => continue,
            "/quit" => break,
            "/history" => {
                if conversation.fetch_history().await.is_ok() {
                    for message in &conversation.snapshot().messages {
                        println!("{}: {}", message.role.as_str(), message.content);
                    }
                } else {
                    print_error(&conversation.snapshot().error);
                }
            }
            "/clear" => match conversation.clear().await {
                Ok(()) => println!("Conversation cleared."),
                Err(_) => print_error(&conversation.snapshot().error),
            },
            "/reset" => match conversation.reset().await {
                Ok(()) => println!("Assistant reset."),
                Err(_) => print_error(&conversation.snapshot().error),
            },
            _ => {
                if let Some(jd_text) = input.strip_prefix("/jd ") {
                    match scoring.score_against_job_description(jd_text).await {
                        Ok(_) => print_scores(&scoring.snapshot()),
                        Err(_) => print_error(&scoring.snapshot().error),
                    }
                    continue;
                }
                match conversation.send(input).await {
                    Ok(()) => print_last_message(&conversation.snapshot().messages),
                    Err(_) => print_error(&conversation.snapshot().error),
                }
            }
        }
    }
    Ok(())
}

fn print_last_message(messages: &[Message]) {
    if let Some(message) = messages.last() {
        if message.role == MessageRole::Assistant {
            let scope_note = match message.relevant {
                Some(false) => " (out of scope)",
                _ => "",
            };
            println!("assistant{scope_note}: {}", message.content);
        }
    }
}

fn print_error(error: &Option<String>) {
    println!("Error: {}", error.as_deref().unwrap_or("An error occurred"));
}

fn print_scores(state: &ScoringState) {
    if let Some(error) = &state.error {
        println!("Score unavailable: {error}");
        return;
    }
    let scores = match &state.scores {
        Some(scores) => scores,
        None => return,
    };
    println!("ATS score: {:.0}/100", scores.ats_score);
    for (section, score) in scores.section_scores.iter() {
        println!("  {section}: {score:.0}");
    }
    for weakness in &scores.weaknesses {
        println!(
            "  needs work: {} ({}, {:.0})",
            weakness.section,
            weakness.severity.as_str(),
            weakness.score
        );
    }
    if let Some(jd) = &state.jd_match {
        println!(
            "JD match: {:.0}% ({}/{} keywords)",
            jd.match_percentage, jd.matching_keywords, jd.total_jd_keywords
        );
        if !jd.missing_keywords.is_empty() {
            println!("  missing: {}", jd.missing_keywords.join(", "));
        }
    }
}

fn print_analysis(state: &AnalysisState) {
    if let Some(error) = &state.error {
        println!("Analysis unavailable: {error}");
        return;
    }
    let analysis = match &state.analysis {
        Some(analysis) => analysis,
        None => return,
    };
    println!("Feedback: {}", analysis.feedback.overall_critique);
    for strength in &analysis.feedback.strengths {
        println!("  + {strength}");
    }
    for improvement in &analysis.section_improvements {
        println!("  {} — {}", improvement.section, improvement.current_quality);
        for suggestion in &improvement.suggestions {
            println!("    - {suggestion}");
        }
    }
    if !analysis.keyword_suggestions.suggested_additions.is_empty() {
        println!(
            "Suggested keywords: {}",
            analysis.keyword_suggestions.suggested_additions.join(", ")
        );
    }
}
