// src/output.rs
// =============================================================================
// Turns results into text for the terminal.
//
// Two formats:
// - a numbered list of links with a short summary (default)
// - JSON (--json), so other programs can consume the output
//
// Everything here builds a String; main.rs decides where it goes.
// =============================================================================

use anyhow::Result;
use link_harvest::{FetchError, FetchErrorKind, LinkSet, TargetUrl};
use serde::Serialize;

#[derive(Serialize)]
struct LinkReport<'a> {
    url: &'a TargetUrl,
    links: &'a LinkSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
}

#[derive(Serialize)]
struct FailureReport<'a> {
    url: &'a TargetUrl,
    error: FetchErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    message: String,
}

// Renders the links found on `url` (and optionally the page markup)
//
// `pretty` only matters for JSON: interactive mode wants one line per result.
pub fn render_links(
    url: &TargetUrl,
    links: &LinkSet,
    html: Option<&str>,
    json: bool,
    pretty: bool,
) -> Result<String> {
    if json {
        let report = LinkReport { url, links, html };
        let rendered = if pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        return Ok(rendered);
    }

    let mut out = String::new();

    if let Some(html) = html {
        out.push_str(html);
        if !html.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&"=".repeat(80));
        out.push('\n');
    }

    out.push_str(&format!("🔗 Links on {}\n", url));
    if links.is_empty() {
        out.push_str("   (none)\n");
    }
    for (i, link) in links.iter().enumerate() {
        out.push_str(&format!("{:>4}. {}\n", i + 1, link));
    }
    out.push_str(&format!("📋 Total: {}", links.len()));

    Ok(out)
}

// Renders a failed or aborted fetch
pub fn render_failure(url: &TargetUrl, error: &FetchError, json: bool) -> Result<String> {
    if json {
        let report = FailureReport {
            url,
            error: error.kind(),
            status: error.status_code(),
            message: error.to_string(),
        };
        return Ok(serde_json::to_string(&report)?);
    }

    let line = match error {
        FetchError::Cancelled => format!("⏹️  Aborted: {}", url),
        FetchError::Timeout => format!("⏱️  Timed out: {}", url),
        FetchError::HttpStatus(code) => format!("❌ HTTP {}: {}", code, url),
        FetchError::Network(e) => format!("🌐 Network error for {}: {}", url, e),
    };
    Ok(line)
}
