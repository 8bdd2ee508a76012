use std::sync::Arc;

use anyhow::Result;
use handlebars::Handlebars;

use crate::cache::ResponseCache;
use crate::config::Config;
use crate::gitee;
use crate::template;

#[derive(Clone)]
pub struct State {
    pub cfg: Arc<Config>,
    pub gitee: gitee::Client,
    pub cache: ResponseCache,
    pub template: Arc<Handlebars<'static>>,
}

impl State {
    pub fn new(cfg: Config) -> Result<Self> {
        let gitee = gitee::Client::new(cfg.api_base.clone(), cfg.gitee.access_token.clone())?;
        let cache = ResponseCache::new(cfg.cache_ttl.into(), cfg.cache_capacity);
        let template = Arc::new(template::new()?);

        Ok(State {
            cfg: Arc::new(cfg),
            gitee,
            cache,
            template,
        })
    }
}
