use std::path::PathBuf;

use clap::Parser;

use bookshelf::config::Config;
use bookshelf::logging::{init_logging, Verbosity};

/// Flat-file book catalogue served over HTTP
#[derive(Debug, Parser)]
#[command(name = "bookshelf", author, version, about, long_about = None)]
struct Cli {
    /// 設定ファイル（デフォルト: ./bookshelf.toml）
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// コレクションを保存するJSONファイル
    #[arg(short, long, value_name = "FILE")]
    data_file: Option<PathBuf>,

    #[arg(long)]
    host: Option<String>,

    #[arg(short, long)]
    port: Option<u16>,

    /// -v: debug, -vv: trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// errorのみ出力
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// CLI引数で設定を上書きする。
    fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.data_file {
            config.storage.data_file = path.clone();
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(Verbosity::from_flags(cli.verbose, cli.quiet));

    let mut config = Config::load_from(cli.config.clone())?;
    cli.apply(&mut config);
    config.validate()?;

    bookshelf::interface::http::run(config).await
}
