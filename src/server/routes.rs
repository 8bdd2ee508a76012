use anyhow::Context as _;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect, Response, Result};
use axum::Json;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::feed::{Feed, DEFAULT_LIMIT};
use crate::route::{self, Route, ROUTES};
use crate::server::convert_errors;
use crate::state::State as AppState;
use crate::template::Template;

use super::responses::{InvalidLimit, InvalidPageUrl, NoMatchingFeed, UnknownFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Rss,
    Json,
}

fn parse_limit(limit: Option<&str>) -> Result<u32, InvalidLimit> {
    match limit {
        None | Some("") => Ok(DEFAULT_LIMIT),

        Some(s) => match s.parse::<u32>() {
            Ok(limit) if limit > 0 => Ok(limit),
            _ => Err(InvalidLimit { value: s.into() }),
        },
    }
}

fn parse_format(format: Option<&str>) -> Result<Format, UnknownFormat> {
    match format {
        None | Some("") | Some("rss") => Ok(Format::Rss),
        Some("json") => Ok(Format::Json),
        Some(s) => Err(UnknownFormat { value: s.into() }),
    }
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>> {
    #[derive(Serialize, Debug, Clone)]
    struct Context {
        version: &'static str,
        routes: &'static [Route],
    }

    convert_errors(async move {
        let ctx = Context {
            version: env!("CARGO_PKG_VERSION"),
            routes: ROUTES,
        };
        let html = state
            .template
            .render(Template::Index.as_str(), &ctx)
            .context("could not render the HTML template")?;

        Ok(Html(html))
    })
    .await
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct EventsQuery {
    limit: Option<String>,
    format: Option<String>,
}

pub async fn user_events(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<EventsQuery>,
) -> Result<Response> {
    let limit = parse_limit(query.limit.as_deref())?;
    let format = parse_format(query.format.as_deref())?;

    let feed = convert_errors(async {
        let events = state
            .gitee
            .public_events(&state.cache, &username, limit)
            .await?;

        Feed::build(&username, &events, limit)
    })
    .await?;

    Ok(match format {
        Format::Rss => (
            [(header::CONTENT_TYPE, "application/rss+xml; charset=utf-8")],
            feed.to_rss(),
        )
            .into_response(),

        Format::Json => Json(feed).into_response(),
    })
}

#[derive(Deserialize, Debug, Clone)]
pub struct RadarQuery {
    url: String,
}

pub async fn radar(Query(query): Query<RadarQuery>) -> Result<Redirect> {
    let page = Url::parse(&query.url).map_err(|_| InvalidPageUrl {
        url: query.url.clone(),
    })?;
    let path = route::radar(&page).ok_or(NoMatchingFeed { url: query.url })?;

    Ok(Redirect::temporary(&path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_parsing() {
        assert_eq!(parse_limit(None).unwrap(), DEFAULT_LIMIT);
        assert_eq!(parse_limit(Some("")).unwrap(), DEFAULT_LIMIT);
        assert_eq!(parse_limit(Some("5")).unwrap(), 5);
        assert!(parse_limit(Some("0")).is_err());
        assert!(parse_limit(Some("-1")).is_err());
        assert!(parse_limit(Some("ten")).is_err());
    }

    #[test]
    fn format_parsing() {
        assert_eq!(parse_format(None).unwrap(), Format::Rss);
        assert_eq!(parse_format(Some("rss")).unwrap(), Format::Rss);
        assert_eq!(parse_format(Some("json")).unwrap(), Format::Json);
        assert!(parse_format(Some("atom")).is_err());
    }
}
