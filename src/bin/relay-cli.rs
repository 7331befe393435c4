use std::io::{self, BufRead, Write};

use clap::Parser;
use reqwest::StatusCode;
use serde_json::Value;

/// Words that end the session.
const EXIT_WORDS: [&str; 3] = ["salir", "exit", "quit"];

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Interactive client for the pregunta relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Ask a single question and exit instead of prompting.
    #[arg(short, long)]
    question: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let endpoint = format!("{}/api/proxy", cli.url.trim_end_matches('/'));

    if let Some(question) = cli.question {
        return ask(&client, &endpoint, &question).await;
    }

    let stdin = io::stdin();
    loop {
        print!("Pregunta: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim_end_matches(['\r', '\n']);
        if EXIT_WORDS.contains(&question.to_lowercase().as_str()) {
            break;
        }
        ask(&client, &endpoint, question).await?;
    }

    Ok(())
}

async fn ask(
    client: &reqwest::Client,
    endpoint: &str,
    question: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let res = match client.get(endpoint).query(&[("pregunta", question)]).send().await {
        Ok(res) => res,
        Err(e) => {
            eprintln!("\nError en la consulta: {}", e);
            return Ok(());
        }
    };

    let status = res.status();
    if status == StatusCode::BAD_REQUEST {
        let message = res.text().await.unwrap_or_default();
        println!("\n{}", message);
        return Ok(());
    }
    if !status.is_success() {
        println!("\nError en la consulta.");
        return Ok(());
    }

    print!("\nRespuesta: ");
    io::stdout().flush()?;

    let mut lines = LineBuffer::default();
    let mut res = res;
    while let Some(chunk) = res.chunk().await? {
        for line in lines.push(&chunk) {
            print_answer(&line)?;
        }
    }
    if let Some(rest) = lines.finish() {
        print_answer(&rest)?;
    }
    println!("\n");
    Ok(())
}

fn print_answer(line: &str) -> io::Result<()> {
    if let Some(text) = answer_text(line) {
        print!("{}", text);
        io::stdout().flush()?;
    }
    Ok(())
}

/// Extract the `respuesta` field of one NDJSON line.
///
/// Blank and non-JSON lines yield `None`.
fn answer_text(line: &str) -> Option<String> {
    if line.trim().is_empty() {
        return None;
    }
    let value: Value = serde_json::from_str(line).ok()?;
    Some(match value.get("respuesta") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "No se encontró respuesta.".to_string(),
    })
}

/// Splits a byte stream into complete lines as chunks arrive.
#[derive(Default)]
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            lines.push(String::from_utf8_lossy(&line[..line.len() - 1]).into_owned());
        }
        lines
    }

    fn finish(self) -> Option<String> {
        if self.pending.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&self.pending).into_owned())
        }
    }
}
