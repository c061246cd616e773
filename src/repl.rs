use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;

use tokio::io::{AsyncBufReadExt, BufReader};
use zerthia_core::thoughts::split_thoughts;
use zerthia_core::{Assistant, Session, UploadOutcome};
use zerthia_documents::{DocumentFormat, IngestionPipeline};
use zerthia_llm::LlmProvider;

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Ask(&'a str),
    Upload(&'a str),
    Docs,
    Quit,
    Empty,
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        match line {
            "" => Self::Empty,
            "/quit" | "exit" => Self::Quit,
            "/docs" => Self::Docs,
            _ => match line.strip_prefix("/upload") {
                Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
                    Self::Upload(rest.trim())
                }
                _ => Self::Ask(line),
            },
        }
    }
}

pub async fn run<P: LlmProvider>(
    name: &str,
    assistant: &Assistant<P>,
    pipeline: &IngestionPipeline,
    mut session: Session,
) -> anyhow::Result<()> {
    if let Some(greeting) = session.transcript().first() {
        println!("{name}: {}\n", greeting.content);
    }
    println!("Commands: /upload <path>, /docs, /quit\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("You: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        match Command::parse(&line) {
            Command::Empty => {}
            Command::Quit => break,
            Command::Docs => println!("{}\n", format_documents(session.uploaded_files())),
            Command::Upload("") => println!("Usage: /upload <path>\n"),
            Command::Upload(path) => upload(pipeline, &mut session, Path::new(path)).await,
            Command::Ask(query) => ask(name, assistant, &mut session, query).await,
        }
    }
    Ok(())
}

async fn upload(pipeline: &IngestionPipeline, session: &mut Session, path: &Path) {
    let filename = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            println!("Failed to read '{}': {e}\n", path.display());
            return;
        }
    };

    match session.upload(pipeline, &filename, bytes).await {
        Ok(UploadOutcome::Ingested { message, .. }) => println!("{message}\n"),
        Ok(UploadOutcome::Duplicate) => println!("'{filename}' was just uploaded.\n"),
        Err(e) => {
            tracing::warn!(source = %filename, "upload failed: {e}");
            println!("Failed to process document '{filename}': {e}\n");
        }
    }
}

async fn ask<P: LlmProvider>(
    name: &str,
    assistant: &Assistant<P>,
    session: &mut Session,
    query: &str,
) {
    if !session.submit(query) {
        return;
    }
    match assistant.process_turn(session).await {
        Ok(Some(outcome)) => {
            let (visible, thoughts) = split_thoughts(&outcome.response);
            println!("{name}: {visible}");
            for thought in thoughts {
                println!("  [thinking] {thought}");
            }
            println!();
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!("response generation failed: {e}");
            println!("Sorry, I couldn't generate a response: {e}\n");
        }
    }
}

fn format_documents(files: &[String]) -> String {
    if files.is_empty() {
        return "No documents uploaded yet.".to_owned();
    }
    let mut out = String::from("Uploaded documents:");
    for (i, file) in files.iter().enumerate() {
        let label = DocumentFormat::from_filename(file).map_or("FILE", DocumentFormat::label);
        let _ = write!(out, "\n  {}. {file} ({label})", i + 1);
    }
    out
}
