//! Inbound URL rewriting for SEO slugs.
//!
//! Public URLs such as `/registered-nurses-salary/ca/los-angeles` are mapped
//! onto internal routes (`/salary-page?profession=...&location=...&city=...`)
//! before the router sees the request. Classification is a pure function of
//! the path; anything that does not match falls through unchanged.
//!
//! The layer must wrap the whole `Router` (not be added with `Router::layer`)
//! so the rewritten URI is the one used for route matching.

use std::sync::OnceLock;

use axum::http::{Request, Uri};
use regex::Regex;
use tracing::{debug, warn};

static RE_CAREER_GUIDE: OnceLock<Regex> = OnceLock::new();
static RE_SALARY: OnceLock<Regex> = OnceLock::new();
static RE_JOBS: OnceLock<Regex> = OnceLock::new();

fn career_guide_re() -> &'static Regex {
    RE_CAREER_GUIDE.get_or_init(|| Regex::new(r"^/how-to-become-([a-z0-9-]+)$").unwrap())
}

fn salary_re() -> &'static Regex {
    RE_SALARY.get_or_init(|| {
        Regex::new(r"^/([a-z0-9-]+)-salary(?:/([a-z]{2})(?:/([a-z0-9-]+))?)?$").unwrap()
    })
}

fn jobs_re() -> &'static Regex {
    RE_JOBS.get_or_init(|| {
        Regex::new(r"^/([a-z0-9-]+)-jobs(?:/([a-z]{2})(?:/([a-z0-9-]+))?)?$").unwrap()
    })
}

/// Profession plus optional state and city segments taken from an SEO path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeoQuery {
    pub profession: String,
    pub state: Option<String>,
    pub city: Option<String>,
}

impl SeoQuery {
    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("profession", self.profession.clone())];
        if let Some(state) = &self.state {
            params.push(("location", state.clone()));
        }
        if let Some(city) = &self.city {
            params.push(("city", city.clone()));
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    CareerGuide { profession: String },
    Salary(SeoQuery),
    Jobs(SeoQuery),
}

impl Rewrite {
    /// Internal path the request is routed to.
    pub fn path(&self) -> String {
        match self {
            Rewrite::CareerGuide { profession } => format!("/career-guide/{profession}"),
            Rewrite::Salary(_) => "/salary-page".to_string(),
            Rewrite::Jobs(_) => "/jobs-page".to_string(),
        }
    }

    /// Query parameters derived from the path segments.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Rewrite::CareerGuide { .. } => Vec::new(),
            Rewrite::Salary(q) | Rewrite::Jobs(q) => q.params(),
        }
    }

    /// Internal path and query the request is rewritten to.
    pub fn target(&self) -> String {
        self.target_with_query(None)
    }

    /// Like [`Rewrite::target`], merging in the client's query string.
    /// Keys taken from the path replace any the client sent.
    pub fn target_with_query(&self, client_query: Option<&str>) -> String {
        let mut params: Vec<(String, String)> = self
            .params()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        if let Some(q) = client_query.filter(|q| !q.is_empty()) {
            match serde_urlencoded::from_str::<Vec<(String, String)>>(q) {
                Ok(pairs) => {
                    let own: Vec<&str> = self.params().iter().map(|(k, _)| *k).collect();
                    params.extend(pairs.into_iter().filter(|(k, _)| !own.contains(&k.as_str())));
                }
                Err(e) => warn!("Dropping unparseable query {q:?}: {e}"),
            }
        }

        let path = self.path();
        if params.is_empty() {
            return path;
        }
        match serde_urlencoded::to_string(&params) {
            Ok(qs) => format!("{path}?{qs}"),
            Err(e) => {
                warn!("Dropping query for {path}: {e}");
                path
            }
        }
    }
}

/// Classifies a request path. `None` means pass through untouched.
pub fn classify(path: &str) -> Option<Rewrite> {
    if let Some(caps) = career_guide_re().captures(path) {
        return Some(Rewrite::CareerGuide {
            profession: caps[1].to_string(),
        });
    }
    if let Some(q) = seo_query(salary_re(), path) {
        return Some(Rewrite::Salary(q));
    }
    seo_query(jobs_re(), path).map(Rewrite::Jobs)
}

fn seo_query(re: &Regex, path: &str) -> Option<SeoQuery> {
    let caps = re.captures(path)?;
    Some(SeoQuery {
        profession: caps[1].to_string(),
        state: caps.get(2).map(|m| m.as_str().to_string()),
        city: caps.get(3).map(|m| m.as_str().to_string()),
    })
}

/// Rewrites a path-and-query string. Client query parameters are kept
/// unless they collide with one generated from the path.
pub fn rewrite_path_and_query(path: &str, query: Option<&str>) -> Option<String> {
    Some(classify(path)?.target_with_query(query))
}

/// Request mapper used with `tower::util::MapRequestLayer`.
pub fn rewrite_request_uri<B>(mut req: Request<B>) -> Request<B> {
    let uri = req.uri();
    let Some(new_pq) = rewrite_path_and_query(uri.path(), uri.query()) else {
        return req;
    };

    let mut parts = uri.clone().into_parts();
    match new_pq.parse() {
        Ok(pq) => {
            parts.path_and_query = Some(pq);
            match Uri::from_parts(parts) {
                Ok(new_uri) => {
                    debug!("Rewrote {} -> {}", req.uri().path(), new_uri);
                    *req.uri_mut() = new_uri;
                }
                Err(e) => warn!("Discarding rewrite for {}: {e}", req.uri().path()),
            }
        }
        Err(e) => warn!("Discarding rewrite for {}: {e}", req.uri().path()),
    }
    req
}
