// src/render.rs
//! HTML for the literature page and marker-based injection into the page file.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::analyze::StructuredSummary;
use crate::ingest::types::Candidate;

pub const START_MARKER: &str = "<!-- AUTO-LITERATURE:START -->";
pub const END_MARKER: &str = "<!-- AUTO-LITERATURE:END -->";
pub const CPG_HUB_URL: &str = "https://www.apta.org/patient-care/evidence-based-practice-resources/cpgs";
pub const PREVIOUS_SHOWN: usize = 5;

const EXT_LINK: &str = r#"target="_blank" rel="noopener noreferrer""#;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InjectError {
    #[error("markers not found in {path} (AUTO-LITERATURE:START/END)")]
    MarkersMissing { path: String },
}

/// An earlier winner shown under "Previously featured".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviousItem {
    pub id: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardContent {
    Featured {
        article: Candidate,
        summary: StructuredSummary,
        score: i32,
        previous: Vec<PreviousItem>,
    },
    NoStrongMatch,
    NoCandidates,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCard {
    pub category: String,
    pub content: CardContent,
}

/// "past 2 years" for whole years, "past N days" otherwise.
pub fn window_label(days_back: i64) -> String {
    match days_back {
        365 => "past year".to_string(),
        d if d > 0 && d % 365 == 0 => format!("past {} years", d / 365),
        d => format!("past {d} days"),
    }
}

pub fn pubmed_url(id: &str) -> String {
    format!("https://pubmed.ncbi.nlm.nih.gov/{}/", id.trim())
}

pub fn doi_url(doi: &str) -> String {
    format!("https://doi.org/{}", doi.trim())
}

/// PMC article url; the `PMC` prefix is added when missing.
pub fn pmc_url(pmcid: &str) -> String {
    let id = pmcid.trim();
    if id.to_ascii_uppercase().starts_with("PMC") {
        format!("https://pmc.ncbi.nlm.nih.gov/articles/{id}/")
    } else {
        format!("https://pmc.ncbi.nlm.nih.gov/articles/PMC{id}/")
    }
}

fn pill(href: &str, label: &str) -> String {
    format!(r#"<a class="pill" href="{}" {EXT_LINK}>{}</a>"#, attr(href), text(label))
}

pub fn access_pills(article: &Candidate) -> String {
    let mut pills = vec![pill(&pubmed_url(&article.id), "PubMed")];
    if let Some(doi) = article.doi.as_deref().filter(|d| !d.trim().is_empty()) {
        pills.push(pill(&doi_url(doi), "DOI"));
    }
    if let Some(pmc) = article.pmcid.as_deref().filter(|d| !d.trim().is_empty()) {
        pills.push(pill(&pmc_url(pmc), "PMC (Full text)"));
    }
    format!(r#"<div class="pills">{}</div>"#, pills.join("\n"))
}

pub fn previous_list(items: &[PreviousItem]) -> String {
    if items.is_empty() {
        return r#"<p class="small"><em>No previous featured articles yet.</em></p>"#.to_string();
    }
    let mut out = String::from(r#"<ul class="list">"#);
    for it in items {
        let title = it
            .title
            .as_deref()
            .map(|t| t.trim().trim_end_matches('.'))
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("PMID {}", it.id));
        let _ = write!(
            out,
            r#"<li><a href="{}" {EXT_LINK}>{}</a> <span class="small">(PMID: {})</span></li>"#,
            attr(&pubmed_url(&it.id)),
            text(&title),
            text(&it.id)
        );
    }
    out.push_str("</ul>");
    out
}

fn featured_card(
    category: &str,
    article: &Candidate,
    summary: &StructuredSummary,
    previous: &[PreviousItem],
) -> String {
    let title = article.title.trim().trim_end_matches('.');
    let venue = if article.venue.trim().is_empty() {
        "Journal"
    } else {
        article.venue.trim()
    };
    let date = if article.pub_date.trim().is_empty() {
        "Date not listed"
    } else {
        article.pub_date.trim()
    };

    format!(
        r#"<div class="card">
  <h2>{category}</h2>
  <p><strong>{title}</strong></p>
  <p class="small">{venue} • {date} • PMID: {id}</p>

  <p><strong>Summary:</strong> {summary}</p>
  <p><strong>Explain like I’m 5:</strong> {explanation}</p>
  <p><strong>How to apply:</strong> {guidance}</p>

  <p><strong>Access full article:</strong></p>
  {pills}

  <p style="margin-top:14px;"><strong>Previously featured:</strong></p>
  {previous}
</div>"#,
        category = text(category),
        title = text(title),
        venue = text(venue),
        date = text(date),
        id = text(&article.id),
        summary = text(&summary.summary),
        explanation = text(&summary.explanation),
        guidance = text(&summary.guidance),
        pills = access_pills(article),
        previous = previous_list(previous),
    )
}

fn placeholder_card(category: &str, message: &str, note: &str) -> String {
    format!(
        r#"<div class="card">
  <h2>{}</h2>
  <p><em>{}</em></p>
  <p class="small">{}</p>
</div>"#,
        text(category),
        text(message),
        text(note)
    )
}

pub fn render_card(card: &CategoryCard, window: &str) -> String {
    match &card.content {
        CardContent::Featured {
            article,
            summary,
            previous,
            ..
        } => featured_card(&card.category, article, summary, previous),
        CardContent::NoStrongMatch => placeholder_card(
            &card.category,
            &format!("No strong PT-focused match found this week within the {window}."),
            "This can happen when recent articles don\u{2019}t match the PT/rehab filters or the topic constraints.",
        ),
        CardContent::NoCandidates => placeholder_card(
            &card.category,
            &format!("No recent results found ({window}) for this category query."),
            "The search returned no articles in the date window.",
        ),
    }
}

pub fn resource_card() -> String {
    format!(
        r#"<div class="card">
  <h2>APTA Resources</h2>
  <p><strong>Clinical Practice Guidelines (CPGs)</strong></p>
  <p class="small">Evidence-based practice resources from the American Physical Therapy Association (manual link; no scraping).</p>
  <div class="pills">
    {}
  </div>
  <p class="small">Tip: Use CPGs to support clinical decision-making and standardized outcome measures when appropriate.</p>
</div>"#,
        pill(CPG_HUB_URL, "APTA CPG Hub")
    )
}

/// Everything that goes between the markers.
pub fn render_page(cards: &[CategoryCard], now: DateTime<Utc>, days_back: i64) -> String {
    let window = window_label(days_back);
    let mut parts = Vec::with_capacity(cards.len() + 3);
    parts.push(format!(
        r#"<p class="small"><strong>Auto-updated:</strong> {} (UTC) • Weekly articles: PT/rehab-focused (PubMed-indexed) • Window: {} • No repeats</p>"#,
        now.format("%b %d, %Y"),
        text(&window)
    ));
    parts.push(r#"<div class="grid">"#.to_string());
    parts.extend(cards.iter().map(|c| render_card(c, &window)));
    parts.push(resource_card());
    parts.push("</div>".to_string());
    parts.join("\n")
}

/// Replace whatever sits between the first start marker and the next end
/// marker. `None` when either marker is missing or they are out of order.
pub fn replace_between_markers(content: &str, inner: &str) -> Option<String> {
    let start = content.find(START_MARKER)?;
    let after_start = start + START_MARKER.len();
    let end = after_start + content[after_start..].find(END_MARKER)?;
    let mut out = String::with_capacity(content.len() + inner.len());
    out.push_str(&content[..start]);
    out.push_str(START_MARKER);
    out.push('\n');
    out.push_str(inner);
    out.push('\n');
    out.push_str(&content[end..]);
    Some(out)
}

/// Inject `inner` into the page at `path`. Returns whether the file changed;
/// an unchanged page is not rewritten. Missing markers fail before any write.
pub fn inject_into_file(path: &Path, inner: &str) -> Result<bool> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading page {}", path.display()))?;
    let updated =
        replace_between_markers(&content, inner).ok_or_else(|| InjectError::MarkersMissing {
            path: path.display().to_string(),
        })?;
    if updated == content {
        tracing::info!(target: "render", path = %path.display(), "page unchanged");
        return Ok(false);
    }
    fs::write(path, &updated).with_context(|| format!("writing page {}", path.display()))?;
    tracing::info!(target: "render", path = %path.display(), bytes = updated.len(), "page updated");
    Ok(true)
}
