use clap::ValueHint;

use std::path::PathBuf;

#[derive(clap::Parser, Debug, Clone)]
#[command(version, about)]
pub struct Args {
    /// Path to the config file.
    ///
    /// By default, gitee-feed looks for a file named `gitee-feed.toml` in the following
    /// directories (in order):
    ///
    /// - `./` (the current directory)
    /// - `/etc`
    #[arg(
        short,
        env = "GITEE_FEED_CONFIG",
        value_hint(ValueHint::FilePath)
    )]
    pub config_path: Option<PathBuf>,

    /// Feed server address to bind to.
    #[arg(long, env = "GITEE_FEED_BIND_ADDR")]
    pub bind_addr: Option<String>,

    /// Gitee personal access token sent with upstream API requests.
    #[arg(long, env = "GITEE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,
}

impl Args {
    pub fn parse() -> Self {
        clap::Parser::parse()
    }
}
