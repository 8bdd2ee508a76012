use anyhow::{anyhow, Context, Result};
use rss::extension::dublincore::DublinCoreExtension;
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder};
use serde::Serialize;
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::OffsetDateTime;
use tracing::error;

use crate::gitee::events::{Event, Payload};
use crate::markdown;

pub const DEFAULT_LIMIT: u32 = 100;

const SITE_URL: &str = "https://gitee.com";
const COMMIT_URL_BASE: &str = "http://gitee.com";

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    pub title: String,
    pub link: String,
    pub item: Vec<FeedItem>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub title: String,
    pub author: String,

    #[serde(with = "time::serde::rfc3339")]
    pub pub_date: OffsetDateTime,

    pub guid: String,

    /// Rendered HTML.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

fn short_sha(sha: &str) -> &str {
    sha.char_indices().nth(7).map_or(sha, |(idx, _)| &sha[..idx])
}

impl FeedItem {
    pub fn from_event(event: &Event) -> Result<Self> {
        let pub_date = OffsetDateTime::parse(&event.created_at, &Rfc3339).with_context(|| {
            anyhow!(
                "could not parse the creation date `{}` of the event `{}`",
                event.created_at,
                event.id
            )
        })?;

        let (title, description, link) = match event.payload()? {
            Payload::CommitComment(p) => (
                format!(
                    "commented on commit {} in {}",
                    short_sha(&p.comment.commit_id),
                    event.repo_name()?
                ),
                Some(markdown::render(&p.comment.body)),
                Some(p.comment.html_url),
            ),

            Payload::Create(p) => {
                let repo = event.repo_name()?;

                let title = match p.ref_name {
                    Some(ref_name) => format!("{} {ref_name} created in {repo}", p.ref_type),
                    None => format!("{} created in {repo}", p.ref_type),
                };

                (title, None, None)
            }

            Payload::IssueComment(p) => (
                p.issue.title,
                Some(markdown::render(&p.comment.body)),
                Some(p.comment.html_url),
            ),

            Payload::Issue(p) => (
                format!("{} {}", p.action, p.title),
                Some(markdown::render(&p.body)),
                Some(p.html_url),
            ),

            Payload::ProjectComment(p) => (
                format!("commented on project {}", event.repo_name()?),
                Some(markdown::render(&p.comment.body)),
                Some(p.comment.html_url),
            ),

            Payload::PullRequest(p) => (
                format!(
                    "{} pull request #{} {} in {}",
                    p.action,
                    p.number,
                    p.title,
                    event.repo_name()?
                ),
                Some(markdown::render(&p.body)),
                Some(p.html_url),
            ),

            Payload::Push(p) => {
                let repo = event.repo_name()?;
                let commit = p
                    .commits
                    .first()
                    .ok_or_else(|| anyhow!("the push event `{}` has no commits", event.id))?;

                (
                    format!("committed {} in {repo}", short_sha(&commit.sha)),
                    Some(markdown::render(&commit.message)),
                    Some(format!("{COMMIT_URL_BASE}/{repo}/commit/{}", commit.sha)),
                )
            }

            Payload::Other => (event.kind.clone(), None, None),
        };

        Ok(Self {
            title,
            author: event.actor.login.clone(),
            pub_date,
            guid: event.id.clone(),
            description,
            link,
        })
    }
}

impl Feed {
    /// Builds the feed of `username` from at most `limit` events, keeping their order.
    pub fn build(username: &str, events: &[Event], limit: u32) -> Result<Self> {
        let item = events
            .iter()
            .take(limit.try_into().unwrap_or(usize::MAX))
            .map(FeedItem::from_event)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            title: format!("{username} - 公开动态"),
            link: format!("{SITE_URL}/{username}"),
            item,
        })
    }

    pub fn to_rss(&self) -> String {
        let now = OffsetDateTime::now_utc();
        let mut channel = ChannelBuilder::default();
        channel
            .title(self.title.clone())
            .link(self.link.clone())
            .description(self.title.clone())
            .last_build_date(
                now.format(&Rfc2822)
                    .inspect_err(|e| error!("could not format the last build date ({now}): {e:#}"))
                    .ok(),
            )
            .generator(Some(format!("gitee-feed {}", env!("CARGO_PKG_VERSION"))));

        for item in &self.item {
            let pub_date = item.pub_date;

            channel.item(
                ItemBuilder::default()
                    .title(Some(item.title.clone()))
                    .link(item.link.clone())
                    .description(item.description.clone())
                    .dublin_core_ext(Some(DublinCoreExtension {
                        creators: vec![item.author.clone()],
                        ..Default::default()
                    }))
                    .guid(Some(
                        GuidBuilder::default()
                            .value(item.guid.clone())
                            .permalink(false)
                            .build(),
                    ))
                    .pub_date(
                        pub_date
                            .format(&Rfc2822)
                            .inspect_err(|e| {
                                error!("could not format the publication date ({pub_date}): {e:#}")
                            })
                            .ok(),
                    )
                    .build(),
            );
        }

        channel.build().to_string()
    }
}
