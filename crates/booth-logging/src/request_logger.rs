use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::safe_truncate;

/// Longest body echoed to the console before truncation
const CONSOLE_BODY_LIMIT: usize = 5000;

/// Show only the first 10 characters of a key
pub fn mask_api_key(api_key: &str) -> String {
    format!("{}***", api_key.chars().take(10).collect::<String>())
}

fn unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn describe_url(url: &str) -> Vec<(&'static str, String)> {
    let mut fields = vec![("URL", url.to_string())];
    if let Ok(parsed_url) = reqwest::Url::parse(url) {
        fields.push(("Host", parsed_url.host_str().unwrap_or("unknown").to_string()));
        fields.push((
            "Port",
            parsed_url.port().map(|p| p.to_string()).unwrap_or_else(|| {
                if parsed_url.scheme() == "https" {
                    "443 (default)".to_string()
                } else {
                    "80 (default)".to_string()
                }
            }),
        ));
        fields.push(("Scheme", parsed_url.scheme().to_string()));
    }
    fields
}

fn pretty_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or_else(|| body.to_string())
}

fn print_truncated(text: &str) {
    if text.chars().count() > CONSOLE_BODY_LIMIT {
        eprintln!("{}", safe_truncate(text, CONSOLE_BODY_LIMIT));
        eprintln!(
            "\n{}",
            format!("... (truncated, total {} bytes)", text.len()).bright_black()
        );
    } else {
        eprintln!("{}", text);
    }
}

/// Log HTTP request details for debugging (console output)
pub fn log_request<T: Serialize>(url: &str, request: &T, api_key: &str, verbose: bool) {
    if !verbose {
        return;
    }

    eprintln!("\n{}", "═".repeat(80).bright_cyan());
    eprintln!("{}", "🔍 HTTP REQUEST DEBUG".bright_cyan().bold());
    eprintln!("{}", "═".repeat(80).bright_cyan());

    for (name, value) in describe_url(url) {
        eprintln!("{}: {}", name.bright_yellow(), value);
    }

    eprintln!("\n{}", "Headers:".bright_yellow());
    eprintln!("  Content-Type: application/json");
    eprintln!("  Authorization: Bearer {}", mask_api_key(api_key));

    eprintln!("\n{}", "Request Body:".bright_yellow());
    match serde_json::to_string_pretty(request) {
        Ok(json) => print_truncated(&json),
        Err(e) => eprintln!("{}", format!("Error serializing request: {}", e).red()),
    }

    eprintln!("{}", "═".repeat(80).bright_cyan());
    eprintln!();
}

/// Log HTTP request to a file for persistent debugging.
///
/// Returns the written path and the timestamp used in its name so the
/// matching response log can share it.
pub fn log_request_to_file<T: Serialize>(
    logs_dir: &Path,
    url: &str,
    request: &T,
    model: &str,
    api_key: &str,
) -> Result<(PathBuf, u64)> {
    let timestamp = unix_secs();

    let model_name = model.replace('/', "-");
    let file_path = logs_dir.join(format!("req-{}-{}.txt", timestamp, model_name));

    let mut log_content = String::new();
    log_content.push_str("HTTP REQUEST LOG\n");
    log_content.push_str("================\n\n");
    log_content.push_str(&format!("Timestamp: {}\n", timestamp));
    log_content.push_str(&format!("Model: {}\n\n", model));

    for (name, value) in describe_url(url) {
        log_content.push_str(&format!("{}: {}\n", name, value));
    }
    log_content.push('\n');

    log_content.push_str("Headers:\n");
    log_content.push_str("  Content-Type: application/json\n");
    log_content.push_str(&format!("  Authorization: Bearer {}\n\n", mask_api_key(api_key)));

    log_content.push_str("Request Body:\n");
    match serde_json::to_string_pretty(request) {
        Ok(json) => {
            log_content.push_str(&json);
            log_content.push('\n');
        }
        Err(e) => {
            log_content.push_str(&format!("Error serializing request: {}\n", e));
        }
    }

    fs::write(&file_path, log_content)
        .with_context(|| format!("Failed to write request log to {}", file_path.display()))?;

    log::debug!("request logged to {}", file_path.display());

    Ok((file_path, timestamp))
}

/// Log HTTP response to a file next to its request log
pub fn log_response_to_file(
    logs_dir: &Path,
    status: &reqwest::StatusCode,
    headers: &reqwest::header::HeaderMap,
    body: &str,
    request_timestamp: u64,
    model: &str,
) -> Result<PathBuf> {
    let model_name = model.replace('/', "-");
    let file_path = logs_dir.join(format!("resp-{}-{}.txt", request_timestamp, model_name));

    let mut log_content = String::new();
    log_content.push_str("HTTP RESPONSE LOG\n");
    log_content.push_str("=================\n\n");
    log_content.push_str(&format!("Timestamp: {}\n", request_timestamp));
    log_content.push_str(&format!("Model: {}\n\n", model));

    log_content.push_str(&format!(
        "Status: {} {}\n\n",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    ));

    log_content.push_str("Headers:\n");
    for (name, value) in headers.iter() {
        if let Ok(val_str) = value.to_str() {
            log_content.push_str(&format!("  {}: {}\n", name.as_str(), val_str));
        }
    }

    log_content.push_str("\nResponse Body:\n");
    log_content.push_str(&pretty_body(body));
    log_content.push('\n');

    log_content.push_str("\n---\n");
    log_content.push_str(&format!("Response Size: {} bytes\n", body.len()));

    fs::write(&file_path, log_content)
        .with_context(|| format!("Failed to write response log to {}", file_path.display()))?;

    log::debug!("response logged to {}", file_path.display());

    Ok(file_path)
}

/// Log HTTP response details for debugging (console output)
pub fn log_response(
    status: &reqwest::StatusCode,
    headers: &reqwest::header::HeaderMap,
    body: &str,
    verbose: bool,
) {
    if !verbose {
        return;
    }

    eprintln!("\n{}", "═".repeat(80).bright_green());
    eprintln!("{}", "📥 HTTP RESPONSE DEBUG".bright_green().bold());
    eprintln!("{}", "═".repeat(80).bright_green());

    eprintln!(
        "{}: {} {}",
        "Status".bright_yellow(),
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    );

    eprintln!("\n{}", "Headers:".bright_yellow());
    for (name, value) in headers.iter() {
        if let Ok(val_str) = value.to_str() {
            eprintln!("  {}: {}", name.as_str().bright_white(), val_str);
        }
    }

    eprintln!("\n{}", "Response Body:".bright_yellow());
    print_truncated(&pretty_body(body));

    eprintln!("{}", "═".repeat(80).bright_green());
    eprintln!();
}
