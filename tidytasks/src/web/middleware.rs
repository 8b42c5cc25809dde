use askama::Template;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Response};
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use crate::config::Config;

/// Error chain of a failed request, attached to the response's extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultDetail {
    lines: Vec<String>,
}

impl FaultDetail {
    /// Collects `error` followed by each of its sources, outermost first.
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        let mut lines = vec![error.to_string()];
        let mut source = error.source();
        while let Some(cause) = source {
            lines.push(cause.to_string());
            source = cause.source();
        }
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Display for FaultDetail {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines.join(": "))
    }
}

#[derive(Template)]
#[template(path = "fault.html")]
struct FaultTemplate<'a> {
    lines: &'a [String],
}

/// In debug mode, replaces the body of a failed response with its full error chain.
pub async fn fault_detail_middleware(
    State(config): State<Arc<Config>>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if !config.debug {
        return response;
    }
    let Some(detail) = response.extensions().get::<FaultDetail>().cloned() else {
        return response;
    };

    let template = FaultTemplate {
        lines: detail.lines(),
    };
    let Ok(rendered) = template.render() else {
        return response;
    };
    (response.status(), Html(rendered)).into_response()
}
