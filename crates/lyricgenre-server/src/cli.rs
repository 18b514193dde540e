use clap::Parser;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "lyricgenre-server")]
#[command(
    author,
    version,
    about = "Classify pasted (German) song lyrics into a musical genre"
)]
pub struct Cli {
    /// Configuration file path (optional)
    #[arg(short, long, default_value = "lyricgenre.yaml")]
    pub config: String,

    /// Model artifact source: local path, http(s) URL or hf://owner/repo/file
    #[arg(short, long, env = "LYRICGENRE_MODEL")]
    pub model: Option<String>,

    /// Expected SHA-256 digest of the model artifact
    #[arg(long, env = "LYRICGENRE_MODEL_SHA256")]
    pub model_sha256: Option<String>,

    /// Directory holding one `{label}.jpg` image per genre
    #[arg(short, long)]
    pub static_dir: Option<String>,

    /// Listen address
    #[arg(short = 'l', long)]
    pub listen: Option<String>,

    /// Listen port
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
