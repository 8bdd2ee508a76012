use std::fmt;

use anyhow::{anyhow, Context, Result};
use serde::de::{self, DeserializeOwned, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One record of a user's public timeline, as returned by the Gitee API.
#[derive(Deserialize, Debug, Clone)]
pub struct Event {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub actor: Actor,
    pub repo: Option<Repo>,

    #[serde(default)]
    pub payload: Value,

    pub created_at: String,
}

impl Event {
    pub fn repo_name(&self) -> Result<&str> {
        self.repo
            .as_ref()
            .map(|repo| repo.full_name.as_str())
            .ok_or_else(|| anyhow!("the {} event `{}` has no repository", self.kind, self.id))
    }

    /// Decodes the payload according to the event type.
    pub fn payload(&self) -> Result<Payload> {
        fn decode<T: DeserializeOwned>(event: &Event) -> Result<T> {
            T::deserialize(&event.payload).with_context(|| {
                anyhow!(
                    "the payload of the {} event `{}` is malformed",
                    event.kind,
                    event.id
                )
            })
        }

        Ok(match self.kind.as_str() {
            "CommitCommentEvent" => Payload::CommitComment(decode(self)?),
            "CreateEvent" => Payload::Create(decode(self)?),
            "IssueCommentEvent" => Payload::IssueComment(decode(self)?),
            "IssueEvent" => Payload::Issue(decode(self)?),
            "ProjectCommentEvent" => Payload::ProjectComment(decode(self)?),
            "PullRequestEvent" => Payload::PullRequest(decode(self)?),
            "PushEvent" => Payload::Push(decode(self)?),
            _ => Payload::Other,
        })
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Actor {
    pub login: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Repo {
    pub full_name: String,
}

#[derive(Debug, Clone)]
pub enum Payload {
    CommitComment(CommitCommentPayload),
    Create(CreatePayload),
    IssueComment(IssueCommentPayload),
    Issue(IssuePayload),
    ProjectComment(ProjectCommentPayload),
    PullRequest(PullRequestPayload),
    Push(PushPayload),
    Other,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Comment {
    pub body: String,
    pub html_url: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CommitComment {
    pub commit_id: String,
    pub body: String,
    pub html_url: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CommitCommentPayload {
    pub comment: CommitComment,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CreatePayload {
    pub ref_type: String,

    #[serde(rename = "ref")]
    pub ref_name: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct IssueRef {
    pub title: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct IssueCommentPayload {
    pub issue: IssueRef,
    pub comment: Comment,
}

#[derive(Deserialize, Debug, Clone)]
pub struct IssuePayload {
    pub action: String,
    pub title: String,
    pub body: String,
    pub html_url: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ProjectCommentPayload {
    pub comment: Comment,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PullRequestPayload {
    pub action: String,
    pub number: u64,
    pub title: String,
    pub body: String,
    pub html_url: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Commit {
    pub sha: String,
    pub message: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PushPayload {
    pub commits: Vec<Commit>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            write!(formatter, "a string or an integer")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.into())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn event(kind: &str, payload: Value) -> Event {
        serde_json::from_value(json!({
            "id": 42,
            "type": kind,
            "actor": { "login": "alice", "name": "Alice" },
            "repo": { "full_name": "alice/repo", "id": 1 },
            "payload": payload,
            "created_at": "2023-01-01T08:00:00+08:00",
            "public": true,
        }))
        .unwrap()
    }

    #[test]
    fn numeric_and_string_ids() {
        assert_eq!(event("FollowEvent", json!({})).id, "42");

        let e: Event = serde_json::from_value(json!({
            "id": "abc",
            "type": "FollowEvent",
            "actor": { "login": "bob" },
            "created_at": "2023-01-01T00:00:00Z",
        }))
        .unwrap();
        assert_eq!(e.id, "abc");
        assert!(e.repo.is_none());
        assert!(e.payload.is_null());
        assert!(e.repo_name().is_err());
    }

    #[test]
    fn decodes_known_payloads() {
        let e = event(
            "PullRequestEvent",
            json!({
                "action": "opened",
                "number": 7,
                "title": "Add docs",
                "body": "see README",
                "html_url": "https://gitee.com/alice/repo/pulls/7",
            }),
        );

        let Payload::PullRequest(pr) = e.payload().unwrap() else {
            panic!("expected a pull request payload");
        };
        assert_eq!(pr.number, 7);
        assert_eq!(pr.action, "opened");
        assert_eq!(pr.body, "see README");
    }

    #[test]
    fn null_bodies_are_malformed() {
        let e = event(
            "PullRequestEvent",
            json!({
                "action": "opened",
                "number": 7,
                "title": "Add docs",
                "body": null,
                "html_url": "https://gitee.com/alice/repo/pulls/7",
            }),
        );

        assert!(e.payload().is_err());

        let e = event(
            "ProjectCommentEvent",
            json!({ "comment": { "html_url": "https://gitee.com/alice/repo#note_3" } }),
        );

        assert!(e.payload().is_err());
    }

    #[test]
    fn create_event_without_ref() {
        let e = event("CreateEvent", json!({ "ref_type": "repository", "ref": null }));

        let Payload::Create(create) = e.payload().unwrap() else {
            panic!("expected a create payload");
        };
        assert_eq!(create.ref_type, "repository");
        assert!(create.ref_name.is_none());
    }

    #[test]
    fn unknown_types_are_not_decoded() {
        let e = event("StarEvent", json!("whatever"));

        assert!(matches!(e.payload().unwrap(), Payload::Other));
    }

    #[test]
    fn missing_fields_are_reported() {
        let e = event("IssueCommentEvent", json!({ "comment": { "body": "hi" } }));
        let err = e.payload().unwrap_err();

        assert!(format!("{err:#}").contains("IssueCommentEvent event `42` is malformed"));
    }
}
