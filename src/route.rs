use serde::Serialize;
use url::Url;

#[derive(Serialize, Debug, Clone, Copy)]
pub struct Parameter {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Serialize, Debug, Clone, Copy)]
pub struct RadarRule {
    /// Page URL pattern on `gitee.com`, without the scheme.
    pub source: &'static str,
    pub target: &'static str,
}

/// Describes a served feed route for listings and URL discovery.
#[derive(Serialize, Debug, Clone, Copy)]
pub struct Route {
    pub path: &'static str,
    pub name: &'static str,
    pub example: &'static str,
    pub categories: &'static [&'static str],
    pub parameters: &'static [Parameter],
    pub maintainers: &'static [&'static str],
    pub require_config: bool,
    pub radar: &'static [RadarRule],
}

pub const USER_EVENTS: Route = Route {
    path: "/events/:username",
    name: "用户公开动态",
    example: "/events/y_project",
    categories: &["programming"],
    parameters: &[Parameter {
        name: "username",
        description: "用户名",
    }],
    maintainers: &["TonyRL"],
    require_config: false,
    radar: &[RadarRule {
        source: "gitee.com/:username",
        target: "/events/:username",
    }],
};

pub const ROUTES: &[Route] = &[USER_EVENTS];

impl RadarRule {
    /// Returns the feed path for a page URL matching this rule.
    pub fn resolve(&self, page: &Url) -> Option<String> {
        let (host, pattern) = self.source.split_once('/')?;

        if !matches!(page.scheme(), "http" | "https") {
            return None;
        }

        let page_host = page.host_str()?;
        if page_host != host && page_host.strip_prefix("www.") != Some(host) {
            return None;
        }

        let pattern = pattern.split('/').collect::<Vec<_>>();
        let segments = page
            .path_segments()?
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        if pattern.len() != segments.len() {
            return None;
        }

        let mut target = self.target.to_owned();

        for (pat, segment) in pattern.iter().zip(&segments) {
            match pat.strip_prefix(':') {
                Some(param) => {
                    let decoded = urlencoding::decode(segment).ok()?;
                    let encoded = urlencoding::encode(&decoded);
                    target = target.replace(&format!(":{param}"), &encoded);
                }

                None if pat == segment => {}
                None => return None,
            }
        }

        Some(target)
    }
}

/// Finds the feed path serving the given page URL, if any.
pub fn radar(page: &Url) -> Option<String> {
    ROUTES
        .iter()
        .flat_map(|route| route.radar)
        .find_map(|rule| rule.resolve(page))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(url: &str) -> Option<String> {
        radar(&Url::parse(url).unwrap())
    }

    #[test]
    fn matches_user_pages() {
        assert_eq!(
            resolve("https://gitee.com/y_project").as_deref(),
            Some("/events/y_project")
        );
        assert_eq!(
            resolve("https://www.gitee.com/y_project/?tab=stars").as_deref(),
            Some("/events/y_project")
        );
    }

    #[test]
    fn ignores_other_pages() {
        assert_eq!(resolve("https://gitee.com/"), None);
        assert_eq!(resolve("https://gitee.com/y_project/RuoYi"), None);
        assert_eq!(resolve("https://github.com/y_project"), None);
        assert_eq!(resolve("ftp://gitee.com/y_project"), None);
    }

    #[test]
    fn reencodes_parameters() {
        assert_eq!(
            resolve("https://gitee.com/a%20b").as_deref(),
            Some("/events/a%20b")
        );
    }
}
