//! Interactive read loop and terminal rendering

use colored::*;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};

use super::Agent;
use crate::client::HealthStatus;
use crate::domain::{Decision, ExecutionResult, ToolServerInfo, parameters_to_json};
use crate::error::Result;

const RULE_WIDTH: usize = 50;

/// `quit`, `exit` and `q` end the session, in any case
pub fn is_exit_command(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "quit" | "exit" | "q")
}

pub fn render_banner<'a>(servers: impl IntoIterator<Item = &'a ToolServerInfo>) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = format!("{}\n{}\n{}\n", "Toolpick Agent".bold(), rule, "Available MCPs:");
    for server in servers {
        out.push_str(&format!("  • {}: {}\n", server.name.cyan(), server.description));
        out.push_str(&format!("    Tools: {}\n", server.tools.join(", ")));
    }
    out.push_str(&rule);
    out
}

pub fn render_health(server: &ToolServerInfo, status: &HealthStatus) -> String {
    match status {
        HealthStatus::Connected => format!("{} {} is connected", "✓".green(), server.name),
        HealthStatus::UnexpectedStatus(code) => {
            format!("{} {} responded with status {}", "!".yellow(), server.name, code)
        }
        HealthStatus::Unreachable(reason) => format!(
            "{} {} is not connected ({}). Start it with: toolpick serve-all",
            "✗".red(),
            server.name,
            reason
        ),
    }
}

/// Echo what the LLM picked, before it runs
pub fn render_decision(decision: &Decision, server: Option<&ToolServerInfo>) -> String {
    let mut out = format!("AI Reasoning: {}", decision.rationale);
    if let Some((server_key, tool_name)) = decision.target() {
        let server_name = server.map(|s| s.name.as_str()).unwrap_or(server_key);
        out.push_str(&format!("\nSelected MCP: {}", server_name));
        out.push_str(&format!("\nSelected Tool: {}", tool_name));
        if !decision.parameters.is_empty() {
            out.push_str(&format!("\nParameters: {}", parameters_to_json(&decision.parameters)));
        }
    }
    out
}

pub fn render_result(result: &ExecutionResult) -> String {
    if result.success {
        let data = serde_json::to_string_pretty(&result.data).unwrap_or_else(|_| result.data.to_string());
        format!("{}\n{}", result.message.green(), data)
    } else {
        format!("Failed: {}", result.message).red().to_string()
    }
}

/// Run one request, printing the decision before dispatch and the result after
pub async fn handle_request(agent: &Agent, request: &str) -> ExecutionResult {
    println!("\n{} {}", "Analyzing request:".dimmed(), request);
    let (catalog, decision) = agent.select(request).await;
    let server = decision.server_key.as_deref().and_then(|key| agent.server(key));
    println!("{}", render_decision(&decision, server));

    let result = agent.dispatch(&decision, &catalog).await;
    println!("\n{}", render_result(&result));
    result
}

/// Read requests from stdin until EOF or an exit command
pub async fn run(agent: &Agent) -> Result<()> {
    run_session(agent, BufReader::new(tokio::io::stdin())).await
}

/// Session loop over any line source; a bad line is reported and skipped
pub async fn run_session<R>(agent: &Agent, mut input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    println!("{}", render_banner(agent.servers()));
    println!("Enter your requests (type 'quit' to exit):");

    let mut stdout = tokio::io::stdout();
    let mut buf = Vec::new();

    loop {
        stdout.write_all(b"\nYou: ").await?;
        stdout.flush().await?;

        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim(),
            Err(e) => {
                log::warn!("Skipping input line that is not valid UTF-8: {}", e);
                println!("{}", "Failed: input is not valid UTF-8, please try again".red());
                continue;
            }
        };

        if is_exit_command(line) {
            break;
        }
        if line.is_empty() {
            continue;
        }

        handle_request(agent, line).await;
    }

    println!("Goodbye!");
    Ok(())
}
