// src/ingest/providers/pubmed.rs
//! PubMed via NCBI E-utilities: esearch (ids, JSON), esummary (metadata, JSON),
//! efetch (abstracts, XML).

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use once_cell::sync::OnceCell;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::RunConfig;
use crate::ingest::types::{ArticleMeta, CandidateSource, DateWindow};
use crate::ingest::{collapse_whitespace, ensure_metrics_described, normalize_text};

pub const EUTILS_BASE: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
const USER_AGENT: &str = concat!("literature-digest/", env!("CARGO_PKG_VERSION"));

pub struct PubMedSource {
    client: reqwest::Client,
    base_url: String,
    email: String,
    api_key: Option<String>,
    delay: Duration,
}

impl PubMedSource {
    pub fn from_config(cfg: &RunConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(cfg.request_timeout)
            .build()
            .context("building http client")?;
        Ok(Self {
            client,
            base_url: EUTILS_BASE.to_string(),
            email: cfg.email.clone(),
            api_key: cfg.api_key.clone(),
            delay: cfg.politeness_delay,
        })
    }

    /// Point at a different E-utilities root (mirror or local stub).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Identify ourselves on every call; the key only raises rate limits.
    fn identify(&self, params: &mut Vec<(&'static str, String)>) {
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }
        params.push(("email", self.email.clone()));
    }

    async fn get_text(
        &self,
        endpoint: &str,
        mut params: Vec<(&'static str, String)>,
    ) -> Result<String> {
        ensure_metrics_described();
        self.identify(&mut params);
        let url = format!("{}/{endpoint}", self.base_url);

        counter!("ingest_requests_total", "endpoint" => endpoint.to_string()).increment(1);
        let resp = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                counter!("ingest_request_errors_total").increment(1);
                tracing::warn!(target: "ingest", error = ?e, endpoint, "e-utilities request failed");
                e
            })
            .with_context(|| format!("GET {url}"))?;

        let status = resp.status();
        if !status.is_success() {
            counter!("ingest_request_errors_total").increment(1);
            anyhow::bail!("GET {url} returned HTTP {status}");
        }
        let body = resp
            .text()
            .await
            .with_context(|| format!("reading body of {url}"))?;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(body)
    }
}

#[async_trait]
impl CandidateSource for PubMedSource {
    async fn search_ids(
        &self,
        query: &str,
        window: DateWindow,
        retmax: usize,
    ) -> Result<Vec<String>> {
        let (mindate, maxdate) = window.as_query_dates();
        let params = vec![
            ("db", "pubmed".to_string()),
            ("term", query.to_string()),
            ("sort", "date".to_string()),
            ("retmode", "json".to_string()),
            ("retmax", retmax.to_string()),
            ("mindate", mindate),
            ("maxdate", maxdate),
            ("datetype", "pdat".to_string()),
        ];
        let body = self.get_text("esearch.fcgi", params).await.context("esearch")?;
        parse_esearch(&body).context("parsing esearch response")
    }

    async fn fetch_summaries(&self, ids: &[String]) -> Result<HashMap<String, ArticleMeta>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let params = vec![
            ("db", "pubmed".to_string()),
            ("id", ids.join(",")),
            ("retmode", "json".to_string()),
        ];
        let body = self
            .get_text("esummary.fcgi", params)
            .await
            .context("esummary")?;
        parse_esummary(&body).context("parsing esummary response")
    }

    async fn fetch_abstracts(&self, ids: &[String]) -> Result<HashMap<String, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let params = vec![
            ("db", "pubmed".to_string()),
            ("id", ids.join(",")),
            ("retmode", "xml".to_string()),
        ];
        let body = self.get_text("efetch.fcgi", params).await.context("efetch")?;
        Ok(parse_efetch_abstracts(&body))
    }

    fn name(&self) -> &'static str {
        "PubMed"
    }
}

/// Ids from an esearch JSON body, in the order returned (most recent first).
pub fn parse_esearch(body: &str) -> Result<Vec<String>> {
    let data: Value = serde_json::from_str(body)?;
    let ids = data["esearchresult"]["idlist"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();
    Ok(ids)
}

/// Metadata keyed by id from an esummary JSON body. Entries flagged with an
/// `error` field are skipped.
pub fn parse_esummary(body: &str) -> Result<HashMap<String, ArticleMeta>> {
    let t0 = std::time::Instant::now();
    let data: Value = serde_json::from_str(body)?;
    let result = &data["result"];

    let mut out = HashMap::new();
    let uids = result["uids"].as_array().cloned().unwrap_or_default();
    for uid in uids {
        let Some(uid) = uid.as_str().map(str::to_string) else {
            continue;
        };
        let item = &result[uid.as_str()];
        if !item.is_object() || item.get("error").is_some() {
            continue;
        }

        let title = normalize_text(item["title"].as_str().unwrap_or_default());
        let venue = [item["source"].as_str(), item["fulljournalname"].as_str()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or_default()
            .to_string();
        let pub_date = item["pubdate"].as_str().unwrap_or_default().trim().to_string();

        out.insert(
            uid,
            ArticleMeta {
                title,
                venue,
                pub_date,
                doi: article_id(item, "doi"),
                pmcid: article_id(item, "pmc").or_else(|| {
                    // "pmcid" values look like "pmc-id: PMC1234567;embargo-date: ..."
                    article_id(item, "pmcid").and_then(|v| extract_pmc(&v))
                }),
            },
        );
    }

    histogram!("ingest_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
    Ok(out)
}

fn article_id(item: &Value, idtype: &str) -> Option<String> {
    item["articleids"]
        .as_array()?
        .iter()
        .find(|a| {
            a["idtype"]
                .as_str()
                .is_some_and(|t| t.eq_ignore_ascii_case(idtype))
        })
        .and_then(|a| a["value"].as_str())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// First `PMC<digits>` in a raw `pmcid` value. The "pmc-id:" prefix itself
/// is not followed by digits and is skipped.
fn extract_pmc(raw: &str) -> Option<String> {
    static RE: OnceCell<Regex> = OnceCell::new();
    let re = RE.get_or_init(|| Regex::new(r"(?i)\bPMC(\d+)").unwrap());
    re.captures(raw).map(|c| format!("PMC{}", &c[1]))
}

/// Abstract text keyed by PMID from an efetch XML body. Labeled sections are
/// rendered as `LABEL: text` and joined with spaces. Malformed XML yields an
/// empty map rather than an error.
pub fn parse_efetch_abstracts(xml: &str) -> HashMap<String, String> {
    let t0 = std::time::Instant::now();
    let out = match read_efetch(xml) {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!(target: "ingest", error = %e, "efetch xml parse failed");
            HashMap::new()
        }
    };
    histogram!("ingest_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
    out
}

fn read_efetch(xml: &str) -> Result<HashMap<String, String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut out = HashMap::new();

    let mut pmid = String::new();
    let mut parts: Vec<String> = Vec::new();
    let mut label = String::new();
    let mut text = String::new();
    let mut in_pmid = false;
    let mut in_abstract_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                let parent = stack.last().map(Vec::as_slice);
                match name.as_slice() {
                    b"PubmedArticle" => {
                        pmid.clear();
                        parts.clear();
                    }
                    // The citation's own PMID; reference lists carry others.
                    b"PMID" if parent == Some(b"MedlineCitation".as_slice()) && pmid.is_empty() => {
                        in_pmid = true;
                    }
                    b"AbstractText" if parent == Some(b"Abstract".as_slice()) => {
                        in_abstract_text = true;
                        text.clear();
                        label = e
                            .attributes()
                            .flatten()
                            .find(|a| a.key.as_ref() == b"Label")
                            .and_then(|a| a.unescape_value().ok().map(|v| v.trim().to_string()))
                            .unwrap_or_default();
                    }
                    _ => {}
                }
                stack.push(name);
            }
            Event::Text(e) => {
                let chunk = e
                    .unescape()
                    .map(|c| c.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(&e).into_owned());
                if in_pmid {
                    pmid.push_str(chunk.trim());
                } else if in_abstract_text {
                    text.push_str(&chunk);
                }
            }
            Event::CData(e) => {
                if in_abstract_text {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(e) => {
                stack.pop();
                match e.local_name().as_ref() {
                    b"PMID" => in_pmid = false,
                    b"AbstractText" if in_abstract_text => {
                        in_abstract_text = false;
                        let t = collapse_whitespace(&text);
                        if !t.is_empty() {
                            parts.push(if label.is_empty() {
                                t
                            } else {
                                format!("{label}: {t}")
                            });
                        }
                    }
                    b"PubmedArticle" => {
                        if !pmid.is_empty() {
                            out.insert(pmid.clone(), parts.join(" "));
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(out)
}
