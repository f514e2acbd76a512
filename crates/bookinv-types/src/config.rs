use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Clone, Args)]
pub struct BackendConfig {
    #[arg(
        long,
        env = "BOOKINV_DATABASE_URL",
        help = "Database URL e.g. sqlite://file.db or similar, default is sqlite://[data-dir]/bookinv.db, where data-dir is set by --data-dir"
    )]
    database_url: Option<String>,

    #[arg(
        long,
        env = "BOOKINV_DATA_DIR",
        help = "Data directory (database etc.), default is system default like ~/.local/share/bookinv",
        default_value_t = default_data_dir()
    )]
    data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("bookinv"))
        .unwrap_or_else(|| PathBuf::from("bookinv"))
        .to_string_lossy()
        .to_string()
}

impl BackendConfig {
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn database_url(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(|| format!("sqlite://{}/bookinv.db", self.data_dir))
    }
}
