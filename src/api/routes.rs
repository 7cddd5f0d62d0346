use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteSpec {
    pub method: HttpMethod,
    pub path: &'static str,
}

impl fmt::Display for RouteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDefinition {
    pub spec: RouteSpec,
    pub handler_id: String,
}

/// Every mounted route, in mount order. Duplicates are dropped.
pub fn route_catalog() -> Vec<RouteDefinition> {
    let mut out = Vec::with_capacity(ROUTES.len());
    let mut seen = BTreeSet::new();

    for &(method, path) in ROUTES {
        let spec = RouteSpec { method, path };
        if !seen.insert(spec.clone()) {
            continue;
        }
        out.push(RouteDefinition {
            handler_id: handler_id_for(method, path),
            spec,
        });
    }

    out
}

fn handler_id_for(method: HttpMethod, path: &str) -> String {
    let mut tokens = vec![method.as_str().to_ascii_lowercase()];

    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        tokens.push(String::from("index"));
    }
    for part in trimmed.split('/').filter(|part| !part.is_empty()) {
        let normalized = if part.starts_with('{') && part.ends_with('}') {
            part.trim_matches(['{', '}']).to_ascii_lowercase()
        } else {
            part.chars()
                .map(|ch| {
                    if ch.is_ascii_alphanumeric() {
                        ch.to_ascii_lowercase()
                    } else {
                        '_'
                    }
                })
                .collect::<String>()
        };
        tokens.push(normalized);
    }

    tokens.join("_")
}

const ROUTES: &[(HttpMethod, &str)] = &[
    (HttpMethod::Get, "/health"),
    (HttpMethod::Get, "/"),
    (HttpMethod::Get, "/image-describer"),
    (HttpMethod::Get, "/speech-to-text"),
    (HttpMethod::Get, "/text-to-speech"),
    (HttpMethod::Get, "/communication-bridge"),
    (HttpMethod::Get, "/document-reader"),
    (HttpMethod::Get, "/saved-content"),
    (HttpMethod::Post, "/api/describe-image"),
    (HttpMethod::Post, "/api/extract-document"),
    (HttpMethod::Post, "/api/simplify-text"),
    (HttpMethod::Post, "/api/save-transcription"),
    (HttpMethod::Post, "/api/save-text"),
    (HttpMethod::Post, "/api/conversation"),
    (HttpMethod::Get, "/api/conversation/{session_id}"),
    (HttpMethod::Get, "/api/preferences"),
    (HttpMethod::Post, "/api/preferences"),
    (HttpMethod::Get, "/api/saved-content"),
    (HttpMethod::Delete, "/api/delete/{table}/{id}"),
];
